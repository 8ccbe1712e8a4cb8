//! Observable upload state.
//!
//! `UploadStateContainer` wraps the orchestrators and publishes an
//! `{uploading, error}` snapshot plus per-operation state over tokio `watch`
//! channels. It allows one upload and one delete in flight at a time; a
//! second call while one is running fails fast with `UploadError::Busy`.

use std::sync::atomic::{AtomicBool, Ordering};

use deckhand_api_client::ApiClient;
use deckhand_core::{CandidateFile, OperationKind, UploadError, UploadResult};
use tokio::sync::watch;

use crate::orchestrator::{log_failure, DeleteOrchestrator, UploadOrchestrator, UploadProfile};

/// Snapshot read by presentation layers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UploadStatus {
    /// An upload is in flight.
    pub uploading: bool,
    /// Message of the most recent failed upload or delete.
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OperationState {
    #[default]
    Idle,
    InFlight,
    Succeeded,
    Failed(String),
}

struct Slot {
    busy: AtomicBool,
    state: watch::Sender<OperationState>,
}

impl Slot {
    fn new() -> Self {
        Self {
            busy: AtomicBool::new(false),
            state: watch::Sender::new(OperationState::Idle),
        }
    }
}

/// Holds an operation slot for the duration of one call. Dropping it without
/// `finish` (the future was dropped mid-flight) returns the slot to `Idle`.
struct InFlight<'a> {
    kind: OperationKind,
    slot: &'a Slot,
    status: &'a watch::Sender<UploadStatus>,
    finished: bool,
}

impl InFlight<'_> {
    fn finish<T>(mut self, result: &Result<T, UploadError>) {
        let (next, error) = match result {
            Ok(_) => (OperationState::Succeeded, None),
            Err(e) => {
                log_failure(self.kind, e);
                (OperationState::Failed(e.to_string()), Some(e.to_string()))
            }
        };
        self.release(next, error);
        self.finished = true;
    }

    /// Publish the final state and free the slot. `busy` is cleared while both
    /// channels are still locked, so anyone who observes the operation as
    /// finished can start the next one.
    fn release(&self, next: OperationState, error: Option<String>) {
        let kind = self.kind;
        let slot = self.slot;
        self.status.send_modify(|status| {
            if kind == OperationKind::Upload {
                status.uploading = false;
            }
            if error.is_some() {
                status.error = error;
            }
            slot.state.send_modify(|state| {
                *state = next;
                slot.busy.store(false, Ordering::Release);
            });
        });
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.release(OperationState::Idle, None);
        }
    }
}

pub struct UploadStateContainer {
    uploader: UploadOrchestrator,
    deleter: DeleteOrchestrator,
    status: watch::Sender<UploadStatus>,
    upload: Slot,
    delete: Slot,
}

impl UploadStateContainer {
    pub fn new(client: ApiClient, profile: UploadProfile) -> Self {
        Self::from_parts(
            UploadOrchestrator::new(client.clone(), profile),
            DeleteOrchestrator::new(client),
        )
    }

    pub fn from_parts(uploader: UploadOrchestrator, deleter: DeleteOrchestrator) -> Self {
        Self {
            uploader,
            deleter,
            status: watch::Sender::new(UploadStatus::default()),
            upload: Slot::new(),
            delete: Slot::new(),
        }
    }

    pub fn profile(&self) -> &UploadProfile {
        self.uploader.profile()
    }

    pub fn status(&self) -> UploadStatus {
        self.status.borrow().clone()
    }

    pub fn is_uploading(&self) -> bool {
        self.status.borrow().uploading
    }

    pub fn subscribe(&self) -> watch::Receiver<UploadStatus> {
        self.status.subscribe()
    }

    pub fn operation_state(&self, kind: OperationKind) -> OperationState {
        self.slot(kind).state.borrow().clone()
    }

    pub fn subscribe_operation(&self, kind: OperationKind) -> watch::Receiver<OperationState> {
        self.slot(kind).state.subscribe()
    }

    /// Dismiss the stored error message.
    pub fn clear_error(&self) {
        self.status.send_modify(|status| status.error = None);
    }

    /// Validate and upload `file`, publishing progress.
    ///
    /// Fails with `Busy` without touching state if an upload is already in
    /// flight on this container.
    pub async fn upload(&self, file: &CandidateFile) -> Result<UploadResult, UploadError> {
        let guard = self.begin(OperationKind::Upload)?;
        let result = self.uploader.upload(file).await;
        guard.finish(&result);
        result
    }

    /// Delete the asset at `asset_url`, publishing progress. Same
    /// single-flight rule as `upload`, tracked separately.
    pub async fn remove(&self, asset_url: &str) -> Result<bool, UploadError> {
        let guard = self.begin(OperationKind::Delete)?;
        let result = self.deleter.remove(asset_url).await;
        guard.finish(&result);
        result
    }

    fn slot(&self, kind: OperationKind) -> &Slot {
        match kind {
            OperationKind::Upload => &self.upload,
            OperationKind::Delete => &self.delete,
        }
    }

    fn begin(&self, kind: OperationKind) -> Result<InFlight<'_>, UploadError> {
        let slot = self.slot(kind);
        if slot
            .busy
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            let err = UploadError::Busy(kind);
            log_failure(kind, &err);
            return Err(err);
        }

        self.status.send_modify(|status| {
            if kind == OperationKind::Upload {
                status.uploading = true;
            }
            status.error = None;
        });
        slot.state.send_replace(OperationState::InFlight);

        Ok(InFlight {
            kind,
            slot,
            status: &self.status,
            finished: false,
        })
    }
}
