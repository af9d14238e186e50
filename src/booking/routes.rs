//! JSON endpoints for the booking form.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use crate::AppState;

use super::requests::{EstimateRequest, SubmitBookingRequest};
use super::responses::{BookingErrorResponse, SubmissionResponse};
use super::services::{self, BookingError};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/services", get(list_services))
        .route("/services/:id", get(get_service))
        .route("/estimate", post(estimate))
        .route("/submit", post(submit))
}

async fn list_services(State(state): State<AppState>) -> Result<Response, BookingError> {
    let services = services::list_services(&state).await?;
    Ok(Json(services.as_ref()).into_response())
}

async fn get_service(
    State(state): State<AppState>,
    Path(service_id): Path<i64>,
) -> Result<Response, BookingError> {
    let service = services::load_service(&state, service_id).await?;
    Ok(Json(service.as_ref()).into_response())
}

async fn estimate(
    State(state): State<AppState>,
    payload: Result<Json<EstimateRequest>, JsonRejection>,
) -> Result<Response, BookingError> {
    let Json(request) = payload?;
    let response = services::estimate(&state, &request).await?;
    Ok(Json(response).into_response())
}

async fn submit(
    State(state): State<AppState>,
    payload: Result<Json<SubmitBookingRequest>, JsonRejection>,
) -> Result<Response, BookingError> {
    let Json(request) = payload?;
    let response = services::submit_booking(&state, &request).await?;
    let status = match response {
        SubmissionResponse::Submitted { .. } => StatusCode::CREATED,
        SubmissionResponse::Errored { .. } => StatusCode::BAD_GATEWAY,
    };
    Ok((status, Json(response)).into_response())
}

impl From<JsonRejection> for BookingError {
    fn from(rejection: JsonRejection) -> Self {
        BookingError::InvalidRequest {
            status: rejection.status().as_u16(),
            message: rejection.body_text(),
        }
    }
}

const UPSTREAM_MESSAGE: &str = "The booking service is unavailable right now. Please try again.";

impl IntoResponse for BookingError {
    fn into_response(self) -> Response {
        let (status, error_type, details) = match &self {
            BookingError::ServiceNotFound { service_id } => (
                StatusCode::NOT_FOUND,
                "service_not_found",
                Some(json!({ "service_id": service_id })),
            ),
            BookingError::Upstream(e) => {
                tracing::error!("Booking API error: {}", e);
                (StatusCode::BAD_GATEWAY, "upstream_error", None)
            }
            BookingError::Selection(_) => (StatusCode::UNPROCESSABLE_ENTITY, "invalid_selection", None),
            BookingError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                Some(json!({ "issues": errors.issues })),
            ),
            BookingError::InvalidRequest { status, .. } => (
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_REQUEST),
                "invalid_request",
                None,
            ),
        };

        // Upstream failures may carry the booking API's raw response body
        let message = match &self {
            BookingError::Upstream(_) => UPSTREAM_MESSAGE.to_string(),
            other => other.to_string(),
        };

        let body = BookingErrorResponse {
            error_type: error_type.to_string(),
            message,
            details,
        };
        (status, Json(body)).into_response()
    }
}
