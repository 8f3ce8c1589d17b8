// SPDX-License-Identifier: GPL-3.0-only

//! Camera start/stop handlers

use crate::app::controls::Action;
use crate::app::state::AppModel;
use crate::backends::camera::CameraUnit;
use crate::errors::SessionError;
use tracing::info;

impl AppModel {
    // =========================================================================
    // Camera Lifecycle Handlers
    // =========================================================================

    pub(crate) fn handle_start_camera(&mut self, unit: CameraUnit) {
        let group = self.viewfinder.group().to_string();
        let id = self.viewfinder.id().to_string();

        match self.controller.start(unit, &group, &id) {
            Ok(()) => {
                self.controls.show_running();
                // A capture from the previous session re-enables it on completion
                if self.pending_capture.is_some() {
                    self.controls
                        .button_mut(Action::TakePicture)
                        .set_enabled(false);
                }
                self.status = format!("{} camera running", capitalize(unit));
            }
            // The running session keeps its layout
            Err(SessionError::AlreadyOpen(active)) => {
                self.status = format!("{} camera is already open", capitalize(active));
            }
            Err(error) => {
                self.controls.show_idle();
                self.status = format!("Could not start {} camera: {}", unit, error);
            }
        }
    }

    pub(crate) fn handle_stop_camera(&mut self) {
        if !self.controller.stop() {
            return;
        }
        info!("Camera stopped");
        self.controls.show_idle();
        self.status = "Camera stopped".to_string();
    }
}

fn capitalize(unit: CameraUnit) -> &'static str {
    match unit {
        CameraUnit::Front => "Front",
        CameraUnit::Rear => "Rear",
    }
}
