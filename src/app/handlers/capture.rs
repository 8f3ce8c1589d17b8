// SPDX-License-Identifier: GPL-3.0-only

//! Photo capture handlers

use crate::app::controls::Action;
use crate::app::state::{AppModel, Message};
use crate::pipelines::photo::CaptureOutcome;
use tracing::{debug, info, warn};

impl AppModel {
    // =========================================================================
    // Capture Handlers
    // =========================================================================

    pub(crate) fn handle_take_picture(&mut self) {
        if self.pending_capture.is_some() {
            debug!("Capture already in progress");
            return;
        }
        let Some(ticket) = self.controller.capture_photo() else {
            debug!("Capture requested while idle");
            return;
        };

        self.controls.button_mut(Action::TakePicture).set_enabled(false);
        self.pending_capture = Some(ticket);
        self.status = "Capturing...".to_string();
    }

    pub(crate) fn handle_picture_saved(&mut self, outcome: CaptureOutcome) {
        match &outcome {
            CaptureOutcome::Saved { path, bytes } => {
                info!(path = %path.display(), bytes, "Photo saved");
                self.status = format!("Saved {}", path.display());
            }
            CaptureOutcome::Partial { path, error } => {
                warn!(path = %path.display(), %error, "Photo incomplete");
                self.status = format!("Saved {}", path.display());
            }
            CaptureOutcome::Failed(error) => {
                warn!(%error, "Photo not saved");
                self.status = "Capture complete".to_string();
            }
            CaptureOutcome::Dropped { .. } | CaptureOutcome::Cancelled => {
                self.status = "Capture complete".to_string();
            }
        }

        self.pending_capture = None;
        self.completed_captures += 1;
        self.last_capture = Some(outcome);
        self.controls.button_mut(Action::TakePicture).reset_enabled();
    }

    /// Deliver the pending capture's completion, if it has arrived
    ///
    /// Called once per UI tick.
    pub fn poll_capture(&mut self) -> bool {
        let Some(outcome) = self.pending_capture.as_mut().and_then(|t| t.try_complete()) else {
            return false;
        };
        self.update(Message::PictureSaved(outcome));
        true
    }
}
