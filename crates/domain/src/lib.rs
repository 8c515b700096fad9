//! Domain layer for the Fiesta Pass backend.
//!
//! This crate contains:
//! - Domain models (Registration, RegistrationGate, AdminSession)
//! - Pass-ID and QR payload generation
//! - Pure moderation-view logic (filtering, stats, CSV projection)

pub mod models;
pub mod services;
