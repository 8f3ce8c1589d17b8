// SPDX-License-Identifier: GPL-3.0-only

//! Message update handling
//!
//! The main `update()` function is a dispatcher; the handlers live in the
//! `handlers` submodules organized by functional domain.
//!
//! # Handler Modules
//!
//! - `handlers::camera`: Starting and stopping a camera unit
//! - `handlers::capture`: Still capture and its completion
//! - `handlers::window`: Viewfinder attach/detach notifications

use crate::app::controls::Action;
use crate::app::state::{AppModel, Message};
use crate::backends::camera::CameraUnit;
use tracing::debug;

impl AppModel {
    /// Main message handler - routes messages to the handler methods
    pub fn update(&mut self, message: Message) {
        match message {
            // ===== Camera Control =====
            Message::StartFront => self.handle_start_camera(CameraUnit::Front),
            Message::StartRear => self.handle_start_camera(CameraUnit::Rear),
            Message::StopCamera => self.handle_stop_camera(),
            Message::TakePicture => self.handle_take_picture(),

            // ===== Window Notifications =====
            Message::WindowAttached { handle, group, id } => {
                self.handle_window_attached(handle, &group, &id)
            }
            Message::WindowDetached { handle, group, id } => {
                self.handle_window_detached(handle, &group, &id)
            }

            // ===== Capture =====
            Message::PictureSaved(outcome) => self.handle_picture_saved(outcome),
        }
    }

    /// Click the button bound to `action`
    ///
    /// Hidden or disabled buttons ignore the click. Returns whether a message
    /// was dispatched.
    pub fn click(&mut self, action: Action) -> bool {
        match self.controls.click(action) {
            Some(message) => {
                self.update(message);
                true
            }
            None => {
                debug!(?action, "Ignoring click on inactive button");
                false
            }
        }
    }

    /// Close the camera before exit
    pub fn shutdown(&mut self) {
        self.update(Message::StopCamera);
    }
}
