// SPDX-License-Identifier: GPL-3.0-only

//! Viewfinder window binding
//!
//! The camera service creates the viewfinder window itself. This adapter only
//! knows the identity the window will carry and configures it once the
//! compositor reports it attached.

use crate::backends::camera::CameraUnit;
use crate::backends::compositor::{Compositor, WindowHandle, WindowProperty};
use crate::constants::VIEWFINDER_Z_ORDER;
use tracing::{debug, info, warn};

/// Binding between the UI and the camera-owned viewfinder window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewfinderWindow {
    group: String,
    id: String,
    handle: Option<WindowHandle>,
}

impl ViewfinderWindow {
    pub fn new(group: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            id: id.into(),
            handle: None,
        }
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Handle of the attached window
    pub fn handle(&self) -> Option<WindowHandle> {
        self.handle
    }

    /// Whether a notification is about this window
    pub fn matches(&self, group: &str, id: &str) -> bool {
        self.group == group && self.id == id
    }

    /// Configure and store a newly attached window
    ///
    /// The window is placed behind the UI, made visible and mirrored when the
    /// active unit faces the user. Pending properties are flushed explicitly
    /// since the compositor would otherwise defer them until the next UI
    /// change. Compositor failures are logged only.
    pub fn on_attached(
        &mut self,
        compositor: &dyn Compositor,
        handle: WindowHandle,
        group: &str,
        id: &str,
        unit: Option<CameraUnit>,
    ) {
        if !self.matches(group, id) {
            debug!(%handle, group, id, "Ignoring attach of foreign window");
            return;
        }

        let mirror = unit.is_some_and(|u| u.is_front_facing());
        info!(%handle, mirror, "Viewfinder window attached");

        let properties = [
            WindowProperty::Mirror(mirror),
            WindowProperty::ZOrder(VIEWFINDER_Z_ORDER),
            WindowProperty::Visible(true),
        ];
        for property in properties {
            if let Err(error) = compositor.set_window_property(handle, property) {
                warn!(%handle, ?property, %error, "Failed to set viewfinder property");
            }
        }
        if let Err(error) = compositor.flush(handle) {
            warn!(%handle, %error, "Failed to flush viewfinder window");
        }

        self.handle = Some(handle);
    }

    /// Forget the window
    ///
    /// The reported handle is not trusted; the binding is cleared whatever
    /// value arrives.
    pub fn on_detached(&mut self, handle: WindowHandle, group: &str, id: &str) {
        if !self.matches(group, id) {
            debug!(%handle, group, id, "Ignoring detach of foreign window");
            return;
        }

        info!(%handle, "Viewfinder window detached");
        self.handle = None;
    }
}
