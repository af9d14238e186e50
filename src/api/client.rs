//! HTTP client for the remote booking API

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::config::Config;
use crate::models::{BookingPayload, CreatedBooking, Service, ServiceSummary};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Booking API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Booking API returned {status}: {body}")]
    Status { status: u16, body: String },
}

/// Thin wrapper over the booking API. Cloning shares the connection pool.
#[derive(Clone)]
pub struct BookingApi {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl BookingApi {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(config.api_timeout).build()?;
        Ok(Self {
            client,
            base_url: config.booking_api_url.clone(),
            token: config.booking_api_token.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// List bookable services
    pub async fn list_services(&self) -> Result<Vec<ServiceSummary>, ApiError> {
        let response = self.get("/services/").send().await?;
        decode(response).await
    }

    /// Fetch a service with its options and extras. `None` on 404.
    pub async fn fetch_service(&self, service_id: i64) -> Result<Option<Service>, ApiError> {
        let response = self
            .get(&format!("/services/{}/", service_id))
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        decode(response).await.map(Some)
    }

    /// Create a booking. Called exactly once per submission.
    pub async fn create_booking(&self, payload: &BookingPayload) -> Result<CreatedBooking, ApiError> {
        let response = self
            .authorize(self.client.post(self.url("/bookings/")))
            .json(payload)
            .send()
            .await?;
        decode(response).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.authorize(self.client.get(self.url(path)))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ApiError::Status {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response.json::<T>().await?)
}
