//! Submission checks for a booking selection.
//!
//! Validation never touches the price math; it only decides whether the
//! selection plus booking details are complete enough to send.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::BookingPayload;

use super::selection::SelectionState;

/// Booking fields that live outside the price selection
#[derive(Debug, Clone, Default)]
pub struct BookingDetails {
    pub address_id: Option<i64>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub notes: String,
}

/// A single field-level problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    pub field: String,
    pub message: String,
}

impl FieldIssue {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Booking is incomplete ({} issue(s))", .issues.len())]
pub struct ValidationErrors {
    pub issues: Vec<FieldIssue>,
}

impl ValidationErrors {
    pub fn has_field(&self, field: &str) -> bool {
        self.issues.iter().any(|i| i.field == field)
    }
}

/// Check the selection and details, collecting every issue, and build the
/// payload for the booking API.
pub fn build_payload(
    selection: &SelectionState,
    details: &BookingDetails,
) -> Result<BookingPayload, ValidationErrors> {
    let mut issues = Vec::new();

    if selection.service_id().is_none() {
        issues.push(FieldIssue::new("service_id", "Choose a service"));
    }
    for group in selection.missing_option_groups() {
        issues.push(FieldIssue::new("options", format!("Choose an option for {}", group)));
    }
    if details.address_id.is_none() {
        issues.push(FieldIssue::new("address_id", "Choose an address"));
    }
    if details.scheduled_at.is_none() {
        issues.push(FieldIssue::new("scheduled_at", "Choose a date and time"));
    }

    match (selection.service_id(), details.address_id, details.scheduled_at) {
        (Some(service_id), Some(address_id), Some(scheduled_at)) if issues.is_empty() => {
            Ok(BookingPayload {
                service_id,
                address_id,
                scheduled_at,
                options: selection.selected_option_ids(),
                extras: selection.selected_extras().to_vec(),
                final_price: selection.final_price(),
                notes: details.notes.trim().to_string(),
            })
        }
        _ => Err(ValidationErrors { issues }),
    }
}
