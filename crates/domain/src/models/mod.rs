//! Domain models for the Fiesta Pass backend.

pub mod admin_session;
pub mod gate;
pub mod pass;
pub mod registration;

pub use admin_session::AdminSession;
pub use gate::RegistrationGate;
pub use registration::{PaymentMethod, Registration, RegistrationStatus};
