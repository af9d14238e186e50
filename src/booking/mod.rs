//! Booking engine module.
//!
//! Price/duration estimation for the booking form, selection rules,
//! submission checks and the JSON endpoints the form talks to.

pub mod calculators;
pub mod requests;
pub mod responses;
pub mod routes;
pub mod selection;
pub mod services;
pub mod validation;

// Re-export commonly used items
pub use calculators::{round_to_half, MultiplierPolicy, PriceBounds};
pub use routes::router;
pub use selection::{SelectedExtra, SelectionError, SelectionState, Totals};
pub use services::BookingError;
pub use validation::{build_payload, BookingDetails, ValidationErrors};
