//! Request DTOs for booking API endpoints.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use super::selection::SelectedExtra;

fn default_multiplier() -> Decimal {
    Decimal::ONE
}

/// The booking form's selection, sent on every change
#[derive(Debug, Clone, Deserialize)]
pub struct EstimateRequest {
    pub service_id: i64,
    #[serde(default)]
    pub options: Vec<i64>,
    #[serde(default)]
    pub extras: Vec<SelectedExtra>,
    #[serde(default = "default_multiplier")]
    pub multiplier: Decimal,
    /// When present, the multiplier is derived from this price instead
    #[serde(default)]
    pub target_price: Option<Decimal>,
}

/// Request to submit a booking
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitBookingRequest {
    /// Missing service is a validation failure, not a parse failure
    #[serde(default)]
    pub service_id: Option<i64>,
    #[serde(default)]
    pub options: Vec<i64>,
    #[serde(default)]
    pub extras: Vec<SelectedExtra>,
    #[serde(default = "default_multiplier")]
    pub multiplier: Decimal,
    #[serde(default)]
    pub address_id: Option<i64>,
    #[serde(default)]
    pub scheduled_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: String,
}

impl SubmitBookingRequest {
    /// Selection half of the request, if a service was chosen
    pub fn estimate_request(&self) -> Option<EstimateRequest> {
        self.service_id.map(|service_id| EstimateRequest {
            service_id,
            options: self.options.clone(),
            extras: self.extras.clone(),
            multiplier: self.multiplier,
            target_price: None,
        })
    }
}
