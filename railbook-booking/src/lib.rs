pub mod engine;

pub use engine::{BookingError, ReservationEngine};
