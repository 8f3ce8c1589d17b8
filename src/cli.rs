// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands for camera operations
//!
//! This module provides command-line functionality for:
//! - Listing available cameras
//! - Taking photos without the terminal UI

use hello_camera::app::SessionController;
use hello_camera::backends::audio::SystemSoundPlayer;
use hello_camera::backends::camera::v4l2_utils::{
    auto_device_for_unit, enumerate_capture_devices, resolve_device,
};
use hello_camera::backends::camera::{self, CameraUnit};
use hello_camera::backends::compositor::WindowCompositor;
use hello_camera::config::Config;
use hello_camera::constants::STILL_FRAME_TIMEOUT;
use hello_camera::errors::{AppError, AppResult};
use hello_camera::pipelines::photo::{CaptureOutcome, PhotoSaver, ShutterNotifier};
use hello_camera::storage::CameraRoll;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// List all available cameras
pub fn list_cameras(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let devices = enumerate_capture_devices();

    if devices.is_empty() {
        println!("No cameras found.");
        return Ok(());
    }

    println!("Available cameras:");
    println!();
    for (index, device) in devices.iter().enumerate() {
        println!("  [{}] {} ({})", index, device.name, device.path);
        println!("      Driver: {}", device.driver);
        for unit in CameraUnit::ALL {
            if auto_device_for_unit(&devices, unit).as_deref() == Some(device.path.as_str()) {
                println!("      Default {} camera", unit);
            }
        }
        println!();
    }

    for unit in CameraUnit::ALL {
        match resolve_device(config, unit) {
            Some(path) => println!("{} camera: {}", unit, path),
            None => println!("{} camera: not available", unit),
        }
    }

    Ok(())
}

/// Take a photo with `unit`: start, capture, stop
pub fn take_photo(
    config: Config,
    unit: CameraUnit,
    output: Option<PathBuf>,
) -> AppResult<()> {
    let output_dir = output.unwrap_or_else(|| config.photo_directory());

    // Nothing renders the viewfinder here, so window events are not consumed
    let (compositor, _events) = WindowCompositor::new();
    let service = camera::get_backend(&config, compositor);

    let saver = Arc::new(PhotoSaver::new(Arc::new(CameraRoll::new(&output_dir))));
    let shutter = Arc::new(ShutterNotifier::new(
        Arc::new(SystemSoundPlayer::new(config.sound_player.clone())),
        config.shutter_sound.clone(),
    ));
    let mut controller = SessionController::new(service, saver, shutter);

    println!("Using {} camera", unit);
    controller.start(unit, &config.window_group, &config.viewfinder_id)?;

    println!("Capturing...");
    let ticket = controller
        .capture_photo()
        .ok_or("Camera stopped before capture")?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .map_err(|e| AppError::Other(format!("Failed to start runtime: {}", e)))?;
    let outcome = runtime.block_on(async {
        tokio::time::timeout(STILL_FRAME_TIMEOUT + Duration::from_secs(2), ticket.wait()).await
    });

    controller.stop();

    let outcome = outcome.map_err(|_| AppError::from("Timed out waiting for the camera"))?;
    if let CaptureOutcome::Partial { path, .. } = &outcome {
        eprintln!("Incomplete photo left at {}", path.display());
    }
    let (path, bytes) = outcome.into_result()?;
    println!("Photo saved: {} ({} bytes)", path.display(), bytes);
    Ok(())
}
