//! Pure business logic services.

pub mod moderation;
