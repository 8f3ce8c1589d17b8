// SPDX-License-Identifier: GPL-3.0-only
// Shared types for camera backend abstraction

//! Shared types for camera backends

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Physical camera unit
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum CameraUnit {
    /// Faces the user; the viewfinder is mirrored
    Front,
    /// Faces away from the user
    Rear,
}

impl CameraUnit {
    pub const ALL: [CameraUnit; 2] = [CameraUnit::Front, CameraUnit::Rear];

    /// Front-facing units show a mirrored viewfinder
    pub fn is_front_facing(&self) -> bool {
        matches!(self, CameraUnit::Front)
    }
}

impl std::fmt::Display for CameraUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CameraUnit::Front => write!(f, "front"),
            CameraUnit::Rear => write!(f, "rear"),
        }
    }
}

/// Handle to an opened camera unit
///
/// Handles are never reused by a camera service, so a stale handle is
/// rejected instead of aliasing a newer session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CameraHandle(pub u64);

impl std::fmt::Display for CameraHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Access mode requested when opening a camera
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CameraMode(u8);

impl CameraMode {
    pub const READ: CameraMode = CameraMode(0b001);
    pub const WRITE: CameraMode = CameraMode(0b010);
    /// Photos may be written to the camera roll
    pub const ROLL: CameraMode = CameraMode(0b100);
    pub const RW: CameraMode = CameraMode(0b011);

    pub fn contains(self, other: CameraMode) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for CameraMode {
    type Output = CameraMode;

    fn bitor(self, rhs: CameraMode) -> CameraMode {
        CameraMode(self.0 | rhs.0)
    }
}

/// Encoding of a delivered still buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameType {
    Jpeg,
    Unknown,
}

impl FrameType {
    /// Classify a buffer by its leading marker bytes
    pub fn detect(data: &[u8]) -> Self {
        // JPEG streams start with SOI (FF D8) followed by another marker
        if data.len() >= 3 && data[0] == 0xFF && data[1] == 0xD8 && data[2] == 0xFF {
            FrameType::Jpeg
        } else {
            FrameType::Unknown
        }
    }
}

/// Encoded image delivered to the still callback
///
/// Only lent to the callback; anything that needs the bytes afterwards must
/// copy them before returning.
#[derive(Clone)]
pub struct CameraBuffer {
    pub frame_type: FrameType,
    pub data: Arc<[u8]>,
}

impl CameraBuffer {
    /// Wrap raw bytes, detecting the frame type
    pub fn new(data: Arc<[u8]>) -> Self {
        Self {
            frame_type: FrameType::detect(&data),
            data,
        }
    }

    /// Buffer carrying no image, delivered when the device produced nothing
    pub fn empty() -> Self {
        Self {
            frame_type: FrameType::Unknown,
            data: Arc::from(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl std::fmt::Debug for CameraBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CameraBuffer({:?}, {} bytes)", self.frame_type, self.data.len())
    }
}

/// Fired at the instant of capture, before image data is ready
pub type ShutterCallback = Box<dyn FnOnce(CameraHandle) + Send + 'static>;

/// Fired once the encoded still is ready
pub type StillCallback = Box<dyn FnOnce(CameraHandle, &CameraBuffer) + Send + 'static>;

/// Completion callbacks carried by a capture request
pub struct PhotoCallbacks {
    pub shutter: ShutterCallback,
    pub still: StillCallback,
}

/// Capture device discovered on the system
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraDevice {
    /// Card name reported by the driver
    pub name: String,
    /// Device node, e.g. /dev/video0
    pub path: String,
    /// Driver name
    pub driver: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_jpeg() {
        assert_eq!(FrameType::detect(&[0xFF, 0xD8, 0xFF, 0xE0]), FrameType::Jpeg);
        assert_eq!(FrameType::detect(&[0x89, b'P', b'N', b'G']), FrameType::Unknown);
        assert_eq!(FrameType::detect(&[]), FrameType::Unknown);
    }

    #[test]
    fn test_camera_mode_flags() {
        let mode = CameraMode::RW | CameraMode::ROLL;
        assert!(mode.contains(CameraMode::READ));
        assert!(mode.contains(CameraMode::ROLL));
        assert!(!CameraMode::RW.contains(CameraMode::ROLL));
    }

    #[test]
    fn test_only_front_is_mirrored() {
        assert!(CameraUnit::Front.is_front_facing());
        assert!(!CameraUnit::Rear.is_front_facing());
    }
}
