// SPDX-License-Identifier: MPL-2.0

//! Error types for the camera application

use crate::backends::camera::types::{CameraHandle, CameraUnit};
use crate::backends::compositor::WindowHandle;
use std::fmt;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Result type for camera service calls
pub type CameraResult<T> = Result<T, CameraError>;

/// Main application error type
#[derive(Debug, Clone)]
pub enum AppError {
    /// Session lifecycle errors
    Session(SessionError),
    /// Photo write errors
    Write(WriteError),
    /// Configuration errors
    Config(String),
    /// Storage/filesystem errors
    Storage(String),
    /// Generic error with message
    Other(String),
}

/// Errors reported by the platform camera service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraError {
    /// No device is mapped to the requested unit
    NoDevice(String),
    /// Device exists but is held by someone else
    Busy(String),
    /// Handle was never opened or has been closed
    InvalidHandle(CameraHandle),
    /// Viewfinder window identity is missing or malformed
    InvalidWindow(String),
    /// Operation requires a running viewfinder
    ViewfinderNotRunning,
    /// Device I/O failure
    Io(String),
}

/// Coarse status reported to callers of camera lifecycle operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Busy,
    IoError,
}

/// Camera session lifecycle errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// A session is already running on the given unit
    AlreadyOpen(CameraUnit),
    /// The camera device could not be acquired
    DeviceOpen(CameraError),
    /// The viewfinder could not be bound to the window or started
    Configuration(CameraError),
}

/// Failure while writing a captured photo to storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteError {
    /// No output file could be allocated; nothing was written
    Aborted(String),
    /// The write was abandoned; a truncated file is left behind
    Partial {
        written: usize,
        expected: usize,
        reason: String,
    },
}

/// Errors from the window compositor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompositorError {
    UnknownWindow(WindowHandle),
}

impl CameraError {
    /// Map to the coarse status surfaced by the camera service
    pub fn status(&self) -> Status {
        match self {
            CameraError::Busy(_) => Status::Busy,
            _ => Status::IoError,
        }
    }
}

impl SessionError {
    /// Status reported to the UI for a failed start
    pub fn status(&self) -> Status {
        match self {
            SessionError::AlreadyOpen(_) => Status::Busy,
            SessionError::DeviceOpen(_) | SessionError::Configuration(_) => Status::IoError,
        }
    }
}

impl Status {
    /// Status of a session operation result
    pub fn of<T>(result: &Result<T, SessionError>) -> Self {
        match result {
            Ok(_) => Status::Success,
            Err(e) => e.status(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Session(e) => write!(f, "Session error: {}", e),
            AppError::Write(e) => write!(f, "Write error: {}", e),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AppError::Storage(msg) => write!(f, "Storage error: {}", msg),
            AppError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraError::NoDevice(msg) => write!(f, "No camera device: {}", msg),
            CameraError::Busy(msg) => write!(f, "Camera is busy: {}", msg),
            CameraError::InvalidHandle(handle) => write!(f, "Invalid camera handle {}", handle),
            CameraError::InvalidWindow(msg) => write!(f, "Invalid viewfinder window: {}", msg),
            CameraError::ViewfinderNotRunning => write!(f, "Viewfinder is not running"),
            CameraError::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::AlreadyOpen(unit) => write!(f, "{} camera already running", unit),
            SessionError::DeviceOpen(e) => write!(f, "Could not open camera: {}", e),
            SessionError::Configuration(e) => write!(f, "Couldn't start viewfinder: {}", e),
        }
    }
}

impl fmt::Display for WriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteError::Aborted(msg) => write!(f, "Save aborted: {}", msg),
            WriteError::Partial {
                written,
                expected,
                reason,
            } => write!(
                f,
                "Partial save ({} of {} bytes): {}",
                written, expected, reason
            ),
        }
    }
}

impl fmt::Display for CompositorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompositorError::UnknownWindow(handle) => write!(f, "Unknown window {}", handle),
        }
    }
}

impl std::error::Error for AppError {}
impl std::error::Error for CameraError {}
impl std::error::Error for SessionError {}
impl std::error::Error for WriteError {}
impl std::error::Error for CompositorError {}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        AppError::Session(err)
    }
}

impl From<WriteError> for AppError {
    fn from(err: WriteError) -> Self {
        AppError::Write(err)
    }
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Other(msg)
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError::Other(msg.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

// EBUSY from the kernel means another process holds the device
impl From<std::io::Error> for CameraError {
    fn from(err: std::io::Error) -> Self {
        match err.raw_os_error() {
            Some(libc::EBUSY) => CameraError::Busy(err.to_string()),
            Some(libc::ENOENT) | Some(libc::ENODEV) | Some(libc::ENXIO) => {
                CameraError::NoDevice(err.to_string())
            }
            _ => CameraError::Io(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ebusy_maps_to_busy_status() {
        let err: CameraError = std::io::Error::from_raw_os_error(libc::EBUSY).into();
        assert!(matches!(err, CameraError::Busy(_)));
        assert_eq!(err.status(), Status::Busy);
    }

    #[test]
    fn test_start_failures_report_io_status() {
        let open = SessionError::DeviceOpen(CameraError::Busy("held".into()));
        let config = SessionError::Configuration(CameraError::ViewfinderNotRunning);
        assert_eq!(open.status(), Status::IoError);
        assert_eq!(config.status(), Status::IoError);
        assert_eq!(
            SessionError::AlreadyOpen(CameraUnit::Front).status(),
            Status::Busy
        );
    }

    #[test]
    fn test_session_error_converts_to_app_error() {
        let err: AppError = SessionError::AlreadyOpen(CameraUnit::Rear).into();
        assert!(matches!(err, AppError::Session(SessionError::AlreadyOpen(CameraUnit::Rear))));
        assert!(err.to_string().starts_with("Session error: "));
    }

    #[test]
    fn test_status_of_ok_is_success() {
        let ok: Result<(), SessionError> = Ok(());
        assert_eq!(Status::of(&ok), Status::Success);
    }
}
