// SPDX-License-Identifier: MPL-2.0

//! Camera service abstraction
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────┐
//! │ SessionController   │  ← one open session at a time
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │ CameraService trait │  ← open / bind / start / capture / close
//! └──────────┬──────────┘
//!            │
//!            ▼
//!        ┌──────┐
//!        │ V4L2 │  ← Concrete implementation
//!        └──────┘
//! ```

pub mod types;
pub mod v4l2;
pub mod v4l2_utils;

pub use types::*;

use crate::backends::compositor::WindowCompositor;
use crate::config::Config;
use crate::errors::CameraResult;
use std::sync::Arc;

/// Platform camera service
///
/// Calls come from the UI thread. Capture callbacks run on a thread owned by
/// the service.
pub trait CameraService: Send + Sync {
    /// Acquire a handle to a physical camera unit
    fn open(&self, unit: CameraUnit, mode: CameraMode) -> CameraResult<CameraHandle>;

    /// Tell the service which window the viewfinder should be created as
    ///
    /// The service creates the window itself once the viewfinder starts; the
    /// compositor then announces it with an attach notification carrying the
    /// same group and id.
    fn set_viewfinder_window(&self, handle: CameraHandle, group: &str, id: &str)
    -> CameraResult<()>;

    /// Start the live preview
    fn start_viewfinder(&self, handle: CameraHandle) -> CameraResult<()>;

    /// Issue one asynchronous still capture
    ///
    /// On success the service calls `shutter` and then `still` exactly once
    /// each, from its own thread. On error the callbacks are dropped unused.
    fn take_photo(&self, handle: CameraHandle, callbacks: PhotoCallbacks) -> CameraResult<()>;

    /// Release the handle, stopping the viewfinder and destroying its window
    fn close(&self, handle: CameraHandle) -> CameraResult<()>;
}

/// Get the V4L2 camera service
pub fn get_backend(config: &Config, compositor: Arc<WindowCompositor>) -> Arc<dyn CameraService> {
    Arc::new(v4l2::V4l2Camera::new(config, compositor))
}
