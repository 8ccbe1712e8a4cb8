//! Deckhand Core Library
//!
//! This crate provides the domain models, validation policies, error types and
//! configuration shared by the Deckhand upload pipeline crates.

pub mod config;
pub mod error;
pub mod models;
pub mod validation;

// Re-export commonly used types
pub use config::ClientConfig;
pub use error::{ErrorMetadata, LogLevel, OperationKind, UploadError};
pub use models::{AssetKind, CandidateFile, Dimensions, UploadResult};
pub use validation::{validate, ValidationError, ValidationPolicy};
