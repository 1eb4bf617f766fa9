// --- File: crates/navbat_common/src/lib.rs ---
//! Shared models, store abstraction and ambient utilities for Navbat.

pub mod error;
pub mod logging;
pub mod models;
pub mod services;

pub use error::{HttpStatusCode, StoreError};
pub use models::{NewReservation, Reservation, ReservationStatus};
pub use services::{BoxFuture, ReservationStore};
