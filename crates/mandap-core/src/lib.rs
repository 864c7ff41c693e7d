//! # mandap-core
//!
//! Shared types for the Mandap marketplace backend.
//!
//! This crate defines the domain error taxonomy used across all Mandap
//! crates. Every service and storage implementation reports failures as an
//! [`AppError`]; the HTTP boundary maps them onto status codes and a common
//! JSON envelope via [`AppError::status_code`] and [`AppError::error_body`].

pub mod error;

pub use error::{AppError, AppResult};
