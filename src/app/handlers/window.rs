// SPDX-License-Identifier: GPL-3.0-only

//! Compositor window notification handlers

use crate::app::state::{AppModel, Message};
use crate::backends::compositor::{WindowEvent, WindowHandle};

impl AppModel {
    pub(crate) fn handle_window_attached(&mut self, handle: WindowHandle, group: &str, id: &str) {
        let unit = self.controller.active_unit();
        self.viewfinder
            .on_attached(self.compositor.as_ref(), handle, group, id, unit);
    }

    pub(crate) fn handle_window_detached(&mut self, handle: WindowHandle, group: &str, id: &str) {
        self.viewfinder.on_detached(handle, group, id);
    }

    /// Route a compositor notification through [`AppModel::update`]
    pub fn handle_window_event(&mut self, event: WindowEvent) {
        let message = match event {
            WindowEvent::Attached { handle, group, id } => {
                Message::WindowAttached { handle, group, id }
            }
            WindowEvent::Detached { handle, group, id } => {
                Message::WindowDetached { handle, group, id }
            }
        };
        self.update(message);
    }
}
