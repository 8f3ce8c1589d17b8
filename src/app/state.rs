// SPDX-License-Identifier: GPL-3.0-only

//! Application state and message types

use crate::app::controls::Controls;
use crate::app::session::SessionController;
use crate::app::viewfinder::ViewfinderWindow;
use crate::backends::compositor::{Compositor, WindowHandle};
use crate::pipelines::photo::{CaptureOutcome, CaptureTicket};
use std::sync::Arc;

/// Main application model
pub struct AppModel {
    /// Camera lifecycle
    pub(crate) controller: SessionController,
    /// Viewfinder window binding
    pub(crate) viewfinder: ViewfinderWindow,
    /// Compositor used to configure attached windows
    pub(crate) compositor: Arc<dyn Compositor>,
    /// Button visibility and enablement
    pub(crate) controls: Controls,
    /// Capture waiting for its completion signal
    pub(crate) pending_capture: Option<CaptureTicket>,
    /// Completed capture count
    pub(crate) completed_captures: usize,
    /// Outcome of the most recent capture
    pub(crate) last_capture: Option<CaptureOutcome>,
    /// One-line status shown under the controls
    pub(crate) status: String,
}

/// Messages handled by [`AppModel::update`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // ===== Camera Control =====
    /// Open the front camera and start the viewfinder
    StartFront,
    /// Open the rear camera and start the viewfinder
    StartRear,
    /// Close the running camera
    StopCamera,
    /// Capture a still
    TakePicture,

    // ===== Window Notifications =====
    /// The compositor created a window
    WindowAttached {
        handle: WindowHandle,
        group: String,
        id: String,
    },
    /// The compositor destroyed a window
    WindowDetached {
        handle: WindowHandle,
        group: String,
        id: String,
    },

    // ===== Capture =====
    /// The capture thread signalled completion
    PictureSaved(CaptureOutcome),
}

impl AppModel {
    pub fn controls(&self) -> &Controls {
        &self.controls
    }

    pub fn viewfinder(&self) -> &ViewfinderWindow {
        &self.viewfinder
    }

    pub fn session(&self) -> &SessionController {
        &self.controller
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn is_capturing(&self) -> bool {
        self.pending_capture.is_some()
    }

    pub fn completed_captures(&self) -> usize {
        self.completed_captures
    }

    pub fn last_capture(&self) -> Option<&CaptureOutcome> {
        self.last_capture.as_ref()
    }
}
