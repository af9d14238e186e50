//! Booking payloads exchanged with the remote booking API

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::booking::selection::SelectedExtra;

/// Body of the booking-creation request
#[derive(Debug, Clone, Serialize)]
pub struct BookingPayload {
    pub service_id: i64,
    pub address_id: i64,
    pub scheduled_at: DateTime<Utc>,
    pub options: Vec<i64>,
    pub extras: Vec<SelectedExtra>,
    #[serde(with = "rust_decimal::serde::float")]
    pub final_price: Decimal,
    pub notes: String,
}

/// What the booking API hands back after a successful create
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedBooking {
    pub id: i64,
}
