//! Remote booking API access

pub mod client;

pub use client::{ApiError, BookingApi};
