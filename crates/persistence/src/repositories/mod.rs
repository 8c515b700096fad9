//! Repository implementations for database operations.

pub mod admin_session;
pub mod gate;
pub mod registration;

pub use admin_session::AdminSessionRepository;
pub use gate::GateRepository;
pub use registration::{NewRegistration, RegistrationRepository};
