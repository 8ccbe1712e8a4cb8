//! Data models for the upload pipeline
//!
//! `file` holds the user-selected payload, `upload` the server-side shapes
//! returned by the upload and delete endpoints.

mod file;
mod upload;

pub use file::*;
pub use upload::*;
