//! Shared utilities and common types for the Fiesta Pass backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Cryptographic utilities (hashing, HMAC URL signing)
//! - Common validation logic

pub mod crypto;
pub mod validation;
