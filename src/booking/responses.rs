//! Response DTOs for booking API endpoints.

use rust_decimal::Decimal;
use serde::Serialize;

use super::selection::SelectionState;

/// Response for an estimate
#[derive(Debug, Serialize)]
pub struct EstimateResponse {
    pub service_id: Option<i64>,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub final_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub min_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub max_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub multiplier: Decimal,
    pub duration_minutes: i32,
    pub discount_unlocked: bool,
    pub options: Vec<i64>,
    pub missing_option_groups: Vec<String>,
}

impl From<&SelectionState> for EstimateResponse {
    fn from(selection: &SelectionState) -> Self {
        let totals = selection.totals();
        Self {
            service_id: selection.service_id(),
            price: totals.price,
            final_price: totals.final_price,
            min_price: totals.bounds.min,
            max_price: totals.bounds.max,
            multiplier: totals.effective_multiplier,
            duration_minutes: totals.duration_minutes,
            discount_unlocked: totals.discount_unlocked,
            options: selection.selected_option_ids(),
            missing_option_groups: selection.missing_option_groups(),
        }
    }
}

/// Terminal state of a booking submission
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmissionResponse {
    Submitted {
        booking_id: i64,
        #[serde(with = "rust_decimal::serde::str")]
        final_price: Decimal,
        duration_minutes: i32,
    },
    Errored {
        message: String,
    },
}

/// Generic booking error response
#[derive(Debug, Serialize)]
pub struct BookingErrorResponse {
    pub error_type: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}
