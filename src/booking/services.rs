//! Booking service functions with remote API access.
//!
//! These functions combine the catalog cache, the booking API client and the
//! pure selection logic.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::api::ApiError;
use crate::models::{Service, ServiceSummary};
use crate::AppState;

use super::calculators::MultiplierPolicy;
use super::requests::{EstimateRequest, SubmitBookingRequest};
use super::responses::{EstimateResponse, SubmissionResponse};
use super::selection::{SelectionError, SelectionState};
use super::validation::{build_payload, BookingDetails, ValidationErrors};

/// Booking error types
#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("Service {service_id} not found")]
    ServiceNotFound { service_id: i64 },

    #[error("Booking API unavailable: {0}")]
    Upstream(#[from] ApiError),

    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error("Invalid request: {message}")]
    InvalidRequest { status: u16, message: String },
}

/// Load a service, from cache when possible.
pub async fn load_service(state: &AppState, service_id: i64) -> Result<Arc<Service>, BookingError> {
    if let Some(cached) = state.cache.services.get(&service_id).await {
        debug!("Cache HIT for service: {}", service_id);
        return Ok(cached);
    }

    debug!("Cache MISS for service: {}", service_id);
    let service = state
        .api
        .fetch_service(service_id)
        .await?
        .ok_or(BookingError::ServiceNotFound { service_id })?;

    Ok(state.cache.store_service(service).await)
}

/// List bookable services, from cache when possible.
pub async fn list_services(state: &AppState) -> Result<Arc<Vec<ServiceSummary>>, BookingError> {
    if let Some(cached) = state.cache.listing().await {
        debug!("Cache HIT for service listing");
        return Ok(cached);
    }

    debug!("Cache MISS for service listing");
    let services = state.api.list_services().await?;
    Ok(state.cache.store_listing(services).await)
}

/// Rebuild a selection from a stateless request.
///
/// Applies the same updates the booking form would, in request order, so a
/// later option in the same group wins.
pub fn replay_selection(
    service: Arc<Service>,
    request: &EstimateRequest,
    policy: MultiplierPolicy,
) -> Result<SelectionState, SelectionError> {
    let mut selection = SelectionState::new(policy);
    selection.select_service(service);

    for option_id in &request.options {
        selection.select_option(*option_id)?;
    }
    for extra in &request.extras {
        if selection.is_extra_selected(extra.id) {
            return Err(SelectionError::DuplicateExtra(extra.id));
        }
        selection.toggle_extra(extra.id)?;
        selection.set_extra_quantity(extra.id, extra.quantity)?;
    }

    selection.set_multiplier(request.multiplier);
    if let Some(target) = request.target_price {
        selection.set_target_price(target);
    }

    Ok(selection)
}

/// Compute the estimate for the booking form.
pub async fn estimate(
    state: &AppState,
    request: &EstimateRequest,
) -> Result<EstimateResponse, BookingError> {
    let service = load_service(state, request.service_id).await?;
    let selection = replay_selection(service, request, state.policy)?;

    debug!(
        service_id = request.service_id,
        final_price = %selection.final_price(),
        duration_minutes = selection.duration_minutes(),
        "Estimate computed"
    );

    Ok(EstimateResponse::from(&selection))
}

/// Validate and forward a booking.
///
/// The booking API is called once. Its failure, or failing to reach it for
/// the service lookup, becomes `SubmissionResponse::Errored`; nothing is
/// retried.
pub async fn submit_booking(
    state: &AppState,
    request: &SubmitBookingRequest,
) -> Result<SubmissionResponse, BookingError> {
    let selection = match request.estimate_request() {
        Some(estimate_request) => {
            let service = match load_service(state, estimate_request.service_id).await {
                Ok(service) => service,
                Err(BookingError::Upstream(e)) => {
                    warn!("Service lookup failed during submission: {}", e);
                    return Ok(SubmissionResponse::Errored {
                        message: submission_message(&e),
                    });
                }
                Err(e) => return Err(e),
            };
            replay_selection(service, &estimate_request, state.policy)?
        }
        None => SelectionState::new(state.policy),
    };

    let details = BookingDetails {
        address_id: request.address_id,
        scheduled_at: request.scheduled_at,
        notes: request.notes.clone(),
    };
    let payload = build_payload(&selection, &details)?;

    match state.api.create_booking(&payload).await {
        Ok(created) => {
            info!(
                booking_id = created.id,
                service_id = payload.service_id,
                final_price = %payload.final_price,
                "Booking submitted"
            );
            Ok(SubmissionResponse::Submitted {
                booking_id: created.id,
                final_price: payload.final_price,
                duration_minutes: selection.duration_minutes(),
            })
        }
        Err(e) => {
            warn!("Booking submission failed: {}", e);
            Ok(SubmissionResponse::Errored {
                message: submission_message(&e),
            })
        }
    }
}

fn submission_message(error: &ApiError) -> String {
    match error {
        ApiError::Status { status, .. } if (400..500).contains(status) => {
            "The booking was rejected. Please check your details and try again.".to_string()
        }
        _ => "We could not reach the booking service. Please try again.".to_string(),
    }
}
