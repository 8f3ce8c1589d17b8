// SPDX-License-Identifier: MPL-2.0

//! Still capture pipeline
//!
//! ```text
//! take_photo ─► shutter callback ─► ShutterNotifier (sound)
//!            └► still callback   ─► PhotoSaver (camera roll) ─► CompletionSignal
//!                                                                   │
//!                          UI thread ◄── CaptureTicket::try_complete ┘
//! ```
//!
//! Both callbacks run on the camera service's capture thread. The only value
//! that crosses back to the UI is the [`CaptureOutcome`], delivered once over
//! a one-shot channel.

pub mod save;
pub mod shutter;

pub use save::{PhotoSaver, write_all_retrying};
pub use shutter::ShutterNotifier;

use crate::backends::camera::types::FrameType;
use crate::errors::{AppError, AppResult, WriteError};
use std::path::PathBuf;
use tokio::sync::oneshot;
use tracing::debug;

/// Result of one capture request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// Whole buffer written
    Saved { path: PathBuf, bytes: usize },
    /// Write abandoned; a truncated file remains at `path`
    Partial { path: PathBuf, error: WriteError },
    /// No output file could be allocated
    Failed(WriteError),
    /// Buffer was not a JPEG and was discarded
    Dropped { frame_type: FrameType },
    /// The camera service never delivered the still
    Cancelled,
}

impl CaptureOutcome {
    /// Path of the file left on storage, if any
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            CaptureOutcome::Saved { path, .. } | CaptureOutcome::Partial { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Saved path and size, or the reason no complete photo exists
    pub fn into_result(self) -> AppResult<(PathBuf, usize)> {
        match self {
            CaptureOutcome::Saved { path, bytes } => Ok((path, bytes)),
            CaptureOutcome::Partial { error, .. } | CaptureOutcome::Failed(error) => {
                Err(error.into())
            }
            CaptureOutcome::Dropped { frame_type } => Err(AppError::Other(format!(
                "Camera delivered an unsupported {:?} image",
                frame_type
            ))),
            CaptureOutcome::Cancelled => Err("Camera did not deliver an image".into()),
        }
    }
}

/// Sending half of the capture-complete signal
///
/// Fires exactly once: explicitly through [`CompletionSignal::complete`], or
/// with [`CaptureOutcome::Cancelled`] when dropped unused.
pub struct CompletionSignal {
    tx: Option<oneshot::Sender<CaptureOutcome>>,
}

/// Receiving half of the capture-complete signal, held by the UI
#[derive(Debug)]
pub struct CaptureTicket {
    rx: oneshot::Receiver<CaptureOutcome>,
}

impl CompletionSignal {
    pub fn channel() -> (CompletionSignal, CaptureTicket) {
        let (tx, rx) = oneshot::channel();
        (CompletionSignal { tx: Some(tx) }, CaptureTicket { rx })
    }

    pub fn complete(mut self, outcome: CaptureOutcome) {
        self.send(outcome);
    }

    fn send(&mut self, outcome: CaptureOutcome) {
        if let Some(tx) = self.tx.take()
            && tx.send(outcome).is_err()
        {
            debug!("Capture completed after the UI stopped waiting");
        }
    }
}

impl Drop for CompletionSignal {
    fn drop(&mut self) {
        self.send(CaptureOutcome::Cancelled);
    }
}

impl CaptureTicket {
    /// Non-blocking check for completion
    pub fn try_complete(&mut self) -> Option<CaptureOutcome> {
        match self.rx.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => Some(CaptureOutcome::Cancelled),
        }
    }

    /// Wait for completion
    pub async fn wait(self) -> CaptureOutcome {
        self.rx.await.unwrap_or(CaptureOutcome::Cancelled)
    }
}
