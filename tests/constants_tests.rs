// SPDX-License-Identifier: MPL-2.0

//! Integration tests for constants module

use hello_camera::constants::{
    APP_ID, MAX_TRANSIENT_WRITE_RETRIES, STILL_FRAME_TIMEOUT, UI_TICK, VIEWFINDER_Z_ORDER,
    WRITE_RETRY_BACKOFF,
};
use std::time::Duration;

#[test]
fn test_viewfinder_sits_behind_ui() {
    assert!(VIEWFINDER_Z_ORDER < 0);
}

#[test]
fn test_write_retries_are_bounded() {
    assert!(MAX_TRANSIENT_WRITE_RETRIES > 0);
    // Worst case stays well below the capture wait
    let worst = WRITE_RETRY_BACKOFF * MAX_TRANSIENT_WRITE_RETRIES;
    assert!(worst < STILL_FRAME_TIMEOUT);
}

#[test]
fn test_ui_tick_is_interactive() {
    assert!(UI_TICK <= Duration::from_millis(50));
}

#[test]
fn test_app_id_is_path_safe() {
    assert!(!APP_ID.is_empty());
    assert!(APP_ID.chars().all(|c| c.is_ascii_alphanumeric() || c == '-'));
}
