// SPDX-License-Identifier: GPL-3.0-only

//! Camera session lifecycle
//!
//! At most one session is open at a time. A start either leaves a fully
//! running session behind or rolls back to idle with no open handle.

use crate::backends::camera::{CameraHandle, CameraMode, CameraService, CameraUnit, PhotoCallbacks};
use crate::errors::{SessionError, Status};
use crate::pipelines::photo::{CaptureTicket, CompletionSignal, PhotoSaver, ShutterNotifier};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// An open camera unit bound to a viewfinder window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraSession {
    pub unit: CameraUnit,
    pub handle: CameraHandle,
    pub group: String,
    pub id: String,
}

/// Opens, closes and captures from one camera unit at a time
pub struct SessionController {
    camera: Arc<dyn CameraService>,
    saver: Arc<PhotoSaver>,
    shutter: Arc<ShutterNotifier>,
    session: Option<CameraSession>,
}

impl SessionController {
    pub fn new(
        camera: Arc<dyn CameraService>,
        saver: Arc<PhotoSaver>,
        shutter: Arc<ShutterNotifier>,
    ) -> Self {
        Self {
            camera,
            saver,
            shutter,
            session: None,
        }
    }

    /// Open `unit` and start its viewfinder as window `group`/`id`
    pub fn start(&mut self, unit: CameraUnit, group: &str, id: &str) -> Result<(), SessionError> {
        if let Some(active) = &self.session {
            warn!(requested = %unit, active = %active.unit, "Camera already open");
            return Err(SessionError::AlreadyOpen(active.unit));
        }

        let result = self.open_session(unit, group, id);
        match &result {
            Ok(session) => info!(unit = %unit, handle = %session.handle, "Camera started"),
            Err(error) => warn!(unit = %unit, %error, status = ?error.status(), "Camera start failed"),
        }
        let result = result.map(|session| {
            self.session = Some(session);
        });
        debug!(status = ?Status::of(&result), "Start finished");
        result
    }

    fn open_session(
        &self,
        unit: CameraUnit,
        group: &str,
        id: &str,
    ) -> Result<CameraSession, SessionError> {
        let handle = self
            .camera
            .open(unit, CameraMode::RW | CameraMode::ROLL)
            .map_err(SessionError::DeviceOpen)?;

        let configured = self
            .camera
            .set_viewfinder_window(handle, group, id)
            .and_then(|()| self.camera.start_viewfinder(handle));

        if let Err(error) = configured {
            if let Err(close_error) = self.camera.close(handle) {
                warn!(%handle, error = %close_error, "Failed to close camera after start failure");
            }
            return Err(SessionError::Configuration(error));
        }

        Ok(CameraSession {
            unit,
            handle,
            group: group.to_string(),
            id: id.to_string(),
        })
    }

    /// Close the open session. Returns `false` when there was none.
    pub fn stop(&mut self) -> bool {
        let Some(session) = self.session.take() else {
            return false;
        };

        info!(unit = %session.unit, handle = %session.handle, "Stopping camera");
        if let Err(error) = self.camera.close(session.handle) {
            warn!(handle = %session.handle, %error, "Camera close failed");
        }
        true
    }

    /// Issue one asynchronous still capture
    ///
    /// Returns the ticket that completes when the still has been handled, or
    /// `None` when no session is open. A ticket is returned even when the
    /// request is rejected; it then completes as cancelled.
    pub fn capture_photo(&self) -> Option<CaptureTicket> {
        let session = self.session.as_ref()?;

        let (signal, ticket) = CompletionSignal::channel();
        let callbacks = PhotoCallbacks {
            shutter: self.shutter.callback(),
            still: self.saver.still_callback(signal),
        };

        debug!(handle = %session.handle, "Taking photo");
        if let Err(error) = self.camera.take_photo(session.handle, callbacks) {
            warn!(
                handle = %session.handle,
                %error,
                status = ?error.status(),
                "Capture request rejected"
            );
        }
        Some(ticket)
    }

    pub fn session(&self) -> Option<&CameraSession> {
        self.session.as_ref()
    }

    /// Unit of the open session
    pub fn active_unit(&self) -> Option<CameraUnit> {
        self.session.as_ref().map(|s| s.unit)
    }

    pub fn is_running(&self) -> bool {
        self.session.is_some()
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        self.stop();
    }
}
