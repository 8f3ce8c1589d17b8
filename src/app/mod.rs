// SPDX-License-Identifier: MPL-2.0

//! Main application module for Hello Camera
//!
//! # Architecture
//!
//! - `state`: Application state types (AppModel, Message)
//! - `controls`: The four camera buttons and their visibility rules
//! - `session`: Camera open/close and capture requests
//! - `viewfinder`: Binding to the camera-owned viewfinder window
//! - `update`: Message handling
//!
//! The model is driven from a single UI thread. The terminal front end feeds
//! it key presses, compositor notifications and capture completions.

pub mod controls;
mod handlers;
pub mod session;
mod state;
mod update;
pub mod viewfinder;

pub use controls::{Action, Button, Controls};
pub use session::{CameraSession, SessionController};
pub use state::{AppModel, Message};
pub use viewfinder::ViewfinderWindow;

use crate::backends::audio::SoundPlayer;
use crate::backends::camera::CameraService;
use crate::backends::compositor::Compositor;
use crate::config::Config;
use crate::pipelines::photo::{PhotoSaver, ShutterNotifier};
use crate::storage::PhotoStorage;
use std::sync::Arc;
use tracing::info;

/// Platform services the application runs against
#[derive(Clone)]
pub struct Services {
    pub camera: Arc<dyn CameraService>,
    pub compositor: Arc<dyn Compositor>,
    pub storage: Arc<dyn PhotoStorage>,
    pub sound: Arc<dyn SoundPlayer>,
}

impl AppModel {
    pub fn new(config: &Config, services: Services) -> Self {
        let saver = Arc::new(PhotoSaver::new(services.storage));
        let shutter = Arc::new(ShutterNotifier::new(
            services.sound,
            config.shutter_sound.clone(),
        ));

        info!(
            group = %config.window_group,
            id = %config.viewfinder_id,
            "Application model ready"
        );

        Self {
            controller: SessionController::new(services.camera, saver, shutter),
            viewfinder: ViewfinderWindow::new(
                config.window_group.clone(),
                config.viewfinder_id.clone(),
            ),
            compositor: services.compositor,
            controls: Controls::new(),
            pending_capture: None,
            completed_captures: 0,
            last_capture: None,
            status: "Choose a camera".to_string(),
        }
    }
}
