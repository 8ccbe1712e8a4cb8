//! Drop zone and browse button.
//!
//! `DropZone` tracks pointer drag state and turns a drop or a picker choice
//! into a single `FileSelected` event. It does not validate: the upload
//! orchestrator does that before any request is made.

use anyhow::Result;
use async_trait::async_trait;
use deckhand_core::{CandidateFile, ValidationPolicy};
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    DraggingOver,
}

/// Pointer events delivered by the host surface.
#[derive(Debug, Clone, PartialEq)]
pub enum DragEvent {
    Enter { has_files: bool },
    Over { has_files: bool },
    Leave,
    /// Files in the drop payload, in payload order.
    Drop { files: Vec<CandidateFile> },
}

/// What the host must do after a drag event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragResponse {
    /// Always true: the browser must not open the file and navigate away.
    pub prevent_default: bool,
    /// Whether the event produced a `FileSelected`.
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AcquisitionEvent {
    FileSelected(CandidateFile),
}

/// Native file chooser. `accept` is the policy's filter string, e.g.
/// `image/jpeg,image/png` or `.apkg`. `Ok(None)` means the user cancelled.
#[async_trait]
pub trait FilePicker: Send + Sync {
    async fn pick(&self, accept: &str) -> Result<Option<CandidateFile>>;
}

pub struct DropZone {
    state: DragState,
    accept: String,
    selected: Option<CandidateFile>,
    events: mpsc::UnboundedSender<AcquisitionEvent>,
}

impl DropZone {
    /// Create a drop zone whose picker is filtered by `policy`. Selection
    /// events arrive on the returned receiver.
    pub fn new(policy: &ValidationPolicy) -> (Self, mpsc::UnboundedReceiver<AcquisitionEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let zone = Self {
            state: DragState::Idle,
            accept: policy.accept_filter(),
            selected: None,
            events,
        };
        (zone, rx)
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn accept(&self) -> &str {
        &self.accept
    }

    pub fn handle(&mut self, event: DragEvent) -> DragResponse {
        let selected = match event {
            DragEvent::Enter { has_files } | DragEvent::Over { has_files } => {
                if has_files {
                    self.state = DragState::DraggingOver;
                }
                false
            }
            DragEvent::Leave => {
                self.state = DragState::Idle;
                false
            }
            DragEvent::Drop { files } => {
                self.state = DragState::Idle;
                if files.len() > 1 {
                    tracing::debug!(
                        dropped = files.len(),
                        "Multiple files dropped, keeping the first"
                    );
                }
                match files.into_iter().next() {
                    Some(file) => {
                        self.select(file);
                        true
                    }
                    None => false,
                }
            }
        };

        DragResponse {
            prevent_default: true,
            selected,
        }
    }

    pub fn drag_enter(&mut self, has_files: bool) -> DragResponse {
        self.handle(DragEvent::Enter { has_files })
    }

    pub fn drag_over(&mut self, has_files: bool) -> DragResponse {
        self.handle(DragEvent::Over { has_files })
    }

    pub fn drag_leave(&mut self) -> DragResponse {
        self.handle(DragEvent::Leave)
    }

    pub fn drop_files(&mut self, files: Vec<CandidateFile>) -> DragResponse {
        self.handle(DragEvent::Drop { files })
    }

    /// Open the chooser. Returns whether a file was selected.
    pub async fn browse(&mut self, picker: &dyn FilePicker) -> Result<bool> {
        let picked = picker.pick(&self.accept).await;
        match picked {
            Ok(Some(file)) => {
                self.select(file);
                Ok(true)
            }
            Ok(None) => Ok(false),
            Err(e) => {
                self.reset();
                Err(e)
            }
        }
    }

    /// Back to `Idle` after a host-side error.
    pub fn reset(&mut self) {
        self.state = DragState::Idle;
    }

    pub fn selected(&self) -> Option<&CandidateFile> {
        self.selected.as_ref()
    }

    /// Hand the held file to the caller, leaving the zone empty.
    pub fn take_selected(&mut self) -> Option<CandidateFile> {
        self.selected.take()
    }

    fn select(&mut self, file: CandidateFile) {
        tracing::debug!(
            filename = %file.name(),
            size_bytes = file.size_bytes(),
            "File selected"
        );
        if self
            .events
            .send(AcquisitionEvent::FileSelected(file.clone()))
            .is_err()
        {
            tracing::trace!("No listener for file selection events");
        }
        self.selected = Some(file);
    }
}
