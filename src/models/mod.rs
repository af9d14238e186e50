//! Domain models shared by the catalog pages and the booking engine

pub mod booking;
pub mod catalog;

pub use booking::{BookingPayload, CreatedBooking};
pub use catalog::{Extra, OptionGroup, Service, ServiceOption, ServiceSummary};
