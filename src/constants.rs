// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

use std::time::Duration;

/// Application id, used for the config directory and the window group
pub const APP_ID: &str = "hello-camera";

/// Config file name inside the config directory
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Log file name used while the terminal UI owns the screen
pub const LOG_FILE_NAME: &str = "hello-camera.log";

/// Window id the viewfinder is created with
pub const VIEWFINDER_WINDOW_ID: &str = "cameraViewfinder";

/// Freedesktop sound-theme name of the shutter sound
pub const SHUTTER_SOUND: &str = "camera-shutter";

/// Helper program used to play theme sounds
pub const DEFAULT_SOUND_PLAYER: &str = "canberra-gtk-play";

/// Folder under the pictures directory that holds the camera roll
pub const DEFAULT_SAVE_FOLDER: &str = "Camera";

/// Default capture resolution
pub const DEFAULT_CAPTURE_WIDTH: u32 = 640;
pub const DEFAULT_CAPTURE_HEIGHT: u32 = 480;

/// Z-order that places the viewfinder behind the application surface
pub const VIEWFINDER_Z_ORDER: i32 = -1;

/// Consecutive `WouldBlock`/`Interrupted` results tolerated while saving
pub const MAX_TRANSIENT_WRITE_RETRIES: u32 = 64;

/// Pause before retrying a write that would block
pub const WRITE_RETRY_BACKOFF: Duration = Duration::from_millis(2);

/// Number of mmap buffers queued on the capture device
pub const V4L2_BUFFER_COUNT: u32 = 4;

/// Longest a viewfinder read blocks before rechecking for stop
pub const VIEWFINDER_POLL_TIMEOUT: Duration = Duration::from_millis(250);

/// How long a capture waits for the viewfinder to produce a fresh frame
pub const STILL_FRAME_TIMEOUT: Duration = Duration::from_secs(3);

/// UI redraw/poll interval
pub const UI_TICK: Duration = Duration::from_millis(16);
