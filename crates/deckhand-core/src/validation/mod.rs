//! Validation modules

pub mod policy;
pub mod validator;

pub use policy::{
    ValidationPolicy, DECK_ALLOWED_EXTENSIONS, DECK_MAX_SIZE_BYTES, IMAGE_ALLOWED_MEDIA_TYPES,
    IMAGE_MAX_SIZE_BYTES,
};
pub use validator::{validate, ValidationError};
