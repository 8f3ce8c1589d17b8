// SPDX-License-Identifier: GPL-3.0-only

//! Shared V4L2 utility functions
//!
//! Device discovery by capability query, used for `list` and for mapping
//! camera units to device nodes when the configuration does not name them.

use super::types::{CameraDevice, CameraUnit};
use crate::config::Config;
use tracing::debug;
use v4l::Device;
use v4l::capability::Flags;

/// Whether the reported capabilities allow streaming video capture
pub fn can_stream_capture(caps: Flags) -> bool {
    caps.contains(Flags::VIDEO_CAPTURE | Flags::STREAMING)
}

/// Probe a device node, returning it only if it can stream video capture
///
/// Metadata nodes that UVC drivers expose next to each camera report no
/// capture capability and are skipped.
pub fn probe_capture_device(path: &str) -> Option<CameraDevice> {
    let caps = Device::with_path(path).ok()?.query_caps().ok()?;
    if !can_stream_capture(caps.capabilities) {
        debug!(path, caps = ?caps.capabilities, "Not a capture device");
        return None;
    }

    Some(CameraDevice {
        name: caps.card,
        path: path.to_string(),
        driver: caps.driver,
    })
}

/// Enumerate capture-capable `/dev/video*` nodes in index order
pub fn enumerate_capture_devices() -> Vec<CameraDevice> {
    let Ok(entries) = std::fs::read_dir("/dev") else {
        return Vec::new();
    };

    let mut indices: Vec<u32> = entries
        .flatten()
        .filter_map(|entry| {
            let name = entry.file_name();
            name.to_str()?.strip_prefix("video")?.parse().ok()
        })
        .collect();
    indices.sort_unstable();

    indices
        .into_iter()
        .filter_map(|idx| probe_capture_device(&format!("/dev/video{}", idx)))
        .collect()
}

/// Device node for a unit from a list of discovered devices
///
/// The first capture device is treated as front facing (the built-in webcam
/// on most laptops), the second as rear.
pub fn auto_device_for_unit(devices: &[CameraDevice], unit: CameraUnit) -> Option<String> {
    let index = match unit {
        CameraUnit::Front => 0,
        CameraUnit::Rear => 1,
    };
    devices.get(index).map(|d| d.path.clone())
}

/// Resolve the device node for a unit, preferring configured paths
pub fn resolve_device(config: &Config, unit: CameraUnit) -> Option<String> {
    let configured = match unit {
        CameraUnit::Front => config.front_device.clone(),
        CameraUnit::Rear => config.rear_device.clone(),
    };
    configured.or_else(|| auto_device_for_unit(&enumerate_capture_devices(), unit))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device(path: &str) -> CameraDevice {
        CameraDevice {
            name: "Test Camera".into(),
            path: path.into(),
            driver: "uvcvideo".into(),
        }
    }

    #[test]
    fn test_auto_mapping_by_order() {
        let devices = vec![device("/dev/video0"), device("/dev/video2")];
        assert_eq!(
            auto_device_for_unit(&devices, CameraUnit::Front).as_deref(),
            Some("/dev/video0")
        );
        assert_eq!(
            auto_device_for_unit(&devices, CameraUnit::Rear).as_deref(),
            Some("/dev/video2")
        );
    }

    #[test]
    fn test_single_device_has_no_rear() {
        let devices = vec![device("/dev/video0")];
        assert_eq!(auto_device_for_unit(&devices, CameraUnit::Rear), None);
    }

    #[test]
    fn test_configured_device_wins() {
        let config = Config {
            rear_device: Some("/dev/video7".into()),
            ..Config::default()
        };
        assert_eq!(
            resolve_device(&config, CameraUnit::Rear).as_deref(),
            Some("/dev/video7")
        );
    }

    #[test]
    fn test_capture_needs_streaming() {
        assert!(can_stream_capture(Flags::VIDEO_CAPTURE | Flags::STREAMING));
        assert!(!can_stream_capture(Flags::VIDEO_CAPTURE | Flags::READ_WRITE));
        assert!(!can_stream_capture(Flags::STREAMING));
    }

    #[test]
    fn test_probe_missing_node() {
        assert!(probe_capture_device("/dev/video-does-not-exist").is_none());
    }

    #[test]
    fn test_non_v4l2_node_is_skipped() {
        assert!(probe_capture_device("/dev/null").is_none());
    }
}
