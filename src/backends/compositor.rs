// SPDX-License-Identifier: GPL-3.0-only

//! Window compositor
//!
//! An in-process registry of native windows. Property changes are staged and
//! only become visible to the renderer after an explicit [`Compositor::flush`].
//! Window creation and destruction are announced on an event channel keyed by
//! (handle, group, id).

use crate::errors::CompositorError;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{Receiver, Sender, channel};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, warn};

/// Native window handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowHandle(pub u64);

impl std::fmt::Display for WindowHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}

/// Per-window property
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowProperty {
    /// Flip horizontally
    Mirror(bool),
    /// Stacking order; negative values sit behind the application surface
    ZOrder(i32),
    Visible(bool),
}

/// Property set of a window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowProperties {
    pub mirror: bool,
    pub z_order: i32,
    pub visible: bool,
}

impl WindowProperties {
    fn apply(&mut self, property: WindowProperty) {
        match property {
            WindowProperty::Mirror(v) => self.mirror = v,
            WindowProperty::ZOrder(v) => self.z_order = v,
            WindowProperty::Visible(v) => self.visible = v,
        }
    }
}

/// Window lifecycle notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowEvent {
    Attached {
        handle: WindowHandle,
        group: String,
        id: String,
    },
    Detached {
        handle: WindowHandle,
        group: String,
        id: String,
    },
}

/// Property and flush primitives used by window owners
pub trait Compositor: Send + Sync {
    /// Stage a property change
    fn set_window_property(
        &self,
        window: WindowHandle,
        property: WindowProperty,
    ) -> Result<(), CompositorError>;

    /// Commit all staged changes of the window's context
    fn flush(&self, window: WindowHandle) -> Result<(), CompositorError>;
}

/// Committed state of a window, as the renderer sees it
#[derive(Debug, Clone)]
pub struct WindowSnapshot {
    pub handle: WindowHandle,
    pub group: String,
    pub id: String,
    pub properties: WindowProperties,
    /// Latest posted frame (JPEG)
    pub frame: Option<Arc<[u8]>>,
    /// Incremented on every posted frame
    pub frame_seq: u64,
}

struct WindowState {
    group: String,
    id: String,
    pending: WindowProperties,
    committed: WindowProperties,
    frame: Option<Arc<[u8]>>,
    frame_seq: u64,
}

/// In-process compositor shared by the camera service and the UI
pub struct WindowCompositor {
    windows: Mutex<HashMap<WindowHandle, WindowState>>,
    next_handle: AtomicU64,
    events: Sender<WindowEvent>,
}

impl WindowCompositor {
    /// Create a compositor and the receiver for its window notifications
    pub fn new() -> (Arc<Self>, Receiver<WindowEvent>) {
        let (events, receiver) = channel();
        let compositor = Arc::new(Self {
            windows: Mutex::new(HashMap::new()),
            next_handle: AtomicU64::new(1),
            events,
        });
        (compositor, receiver)
    }

    fn windows(&self) -> MutexGuard<'_, HashMap<WindowHandle, WindowState>> {
        self.windows.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Create a window; new windows are invisible until configured and flushed
    pub fn create_window(&self, group: &str, id: &str) -> WindowHandle {
        let handle = WindowHandle(self.next_handle.fetch_add(1, Ordering::Relaxed));
        self.windows().insert(
            handle,
            WindowState {
                group: group.to_string(),
                id: id.to_string(),
                pending: WindowProperties::default(),
                committed: WindowProperties::default(),
                frame: None,
                frame_seq: 0,
            },
        );
        debug!(%handle, group, id, "Window created");

        let _ = self.events.send(WindowEvent::Attached {
            handle,
            group: group.to_string(),
            id: id.to_string(),
        });
        handle
    }

    /// Destroy a window and announce the detach
    pub fn destroy_window(&self, handle: WindowHandle) {
        let Some(state) = self.windows().remove(&handle) else {
            warn!(%handle, "Destroying unknown window");
            return;
        };
        debug!(%handle, group = %state.group, id = %state.id, "Window destroyed");

        let _ = self.events.send(WindowEvent::Detached {
            handle,
            group: state.group,
            id: state.id,
        });
    }

    /// Replace the window's content with a new encoded frame
    pub fn post_frame(&self, handle: WindowHandle, frame: Arc<[u8]>) -> Result<(), CompositorError> {
        let mut windows = self.windows();
        let state = windows
            .get_mut(&handle)
            .ok_or(CompositorError::UnknownWindow(handle))?;
        state.frame = Some(frame);
        state.frame_seq = state.frame_seq.wrapping_add(1);
        Ok(())
    }

    /// Committed state of a window
    pub fn snapshot(&self, handle: WindowHandle) -> Option<WindowSnapshot> {
        self.windows().get(&handle).map(|state| WindowSnapshot {
            handle,
            group: state.group.clone(),
            id: state.id.clone(),
            properties: state.committed,
            frame: state.frame.clone(),
            frame_seq: state.frame_seq,
        })
    }

    /// Number of live windows
    pub fn window_count(&self) -> usize {
        self.windows().len()
    }
}

impl Compositor for WindowCompositor {
    fn set_window_property(
        &self,
        window: WindowHandle,
        property: WindowProperty,
    ) -> Result<(), CompositorError> {
        let mut windows = self.windows();
        let state = windows
            .get_mut(&window)
            .ok_or(CompositorError::UnknownWindow(window))?;
        state.pending.apply(property);
        Ok(())
    }

    fn flush(&self, window: WindowHandle) -> Result<(), CompositorError> {
        let mut windows = self.windows();
        let state = windows
            .get_mut(&window)
            .ok_or(CompositorError::UnknownWindow(window))?;
        state.committed = state.pending;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_properties_need_flush() {
        let (compositor, _events) = WindowCompositor::new();
        let handle = compositor.create_window("group", "vf");

        compositor
            .set_window_property(handle, WindowProperty::Visible(true))
            .unwrap();
        assert!(!compositor.snapshot(handle).unwrap().properties.visible);

        compositor.flush(handle).unwrap();
        assert!(compositor.snapshot(handle).unwrap().properties.visible);
    }

    #[test]
    fn test_create_and_destroy_emit_events() {
        let (compositor, events) = WindowCompositor::new();
        let handle = compositor.create_window("group", "vf");
        compositor.destroy_window(handle);

        let received: Vec<_> = events.try_iter().collect();
        assert_eq!(
            received,
            vec![
                WindowEvent::Attached {
                    handle,
                    group: "group".into(),
                    id: "vf".into()
                },
                WindowEvent::Detached {
                    handle,
                    group: "group".into(),
                    id: "vf".into()
                },
            ]
        );
        assert_eq!(compositor.window_count(), 0);
    }

    #[test]
    fn test_unknown_window_is_rejected() {
        let (compositor, _events) = WindowCompositor::new();
        let err = compositor.flush(WindowHandle(42)).unwrap_err();
        assert_eq!(err, CompositorError::UnknownWindow(WindowHandle(42)));
    }

    #[test]
    fn test_post_frame_bumps_sequence() {
        let (compositor, _events) = WindowCompositor::new();
        let handle = compositor.create_window("group", "vf");
        compositor.post_frame(handle, Arc::from(vec![1u8, 2, 3])).unwrap();
        compositor.post_frame(handle, Arc::from(vec![4u8])).unwrap();

        let snapshot = compositor.snapshot(handle).unwrap();
        assert_eq!(snapshot.frame_seq, 2);
        assert_eq!(snapshot.frame.as_deref(), Some(&[4u8][..]));
    }
}
