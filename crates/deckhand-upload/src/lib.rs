//! Deckhand upload pipeline
//!
//! Acquisition surface → validation → upload orchestrator → observable state.
//! `DropZone` produces the file, `UploadStateContainer` uploads or deletes it
//! through the orchestrators and publishes `{uploading, error}`.

pub mod acquisition;
pub mod orchestrator;
pub mod state;

pub use acquisition::{AcquisitionEvent, DragEvent, DragResponse, DragState, DropZone, FilePicker};
pub use orchestrator::{DeleteOrchestrator, UploadOrchestrator, UploadProfile};
pub use state::{OperationState, UploadStateContainer, UploadStatus};
