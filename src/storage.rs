// SPDX-License-Identifier: MPL-2.0

//! Storage utilities for the camera roll

use chrono::Local;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Suffixes tried before giving up on a free file name
const MAX_NAME_ATTEMPTS: u32 = 1000;

/// Output format of a stored photo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoFormat {
    Jpeg,
}

impl PhotoFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            PhotoFormat::Jpeg => "jpg",
        }
    }
}

/// Newly allocated photo file; dropping the writer closes it
pub struct PhotoFile {
    pub path: PathBuf,
    pub writer: Box<dyn Write + Send>,
}

impl std::fmt::Debug for PhotoFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhotoFile").field("path", &self.path).finish()
    }
}

/// Allocates output files for captured photos
pub trait PhotoStorage: Send + Sync {
    /// Create a new, empty photo file
    fn open_photo(&self, format: PhotoFormat) -> io::Result<PhotoFile>;
}

/// Directory of timestamped photos
#[derive(Debug, Clone)]
pub struct CameraRoll {
    dir: PathBuf,
}

impl CameraRoll {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Base file name for a photo taken now, e.g. `IMG_20240131_142501`
    fn base_name() -> String {
        format!("IMG_{}", Local::now().format("%Y%m%d_%H%M%S"))
    }
}

impl PhotoStorage for CameraRoll {
    fn open_photo(&self, format: PhotoFormat) -> io::Result<PhotoFile> {
        std::fs::create_dir_all(&self.dir)?;

        let base = Self::base_name();
        let ext = format.extension();

        // Several captures within one second get a numeric suffix
        for attempt in 0..MAX_NAME_ATTEMPTS {
            let name = if attempt == 0 {
                format!("{}.{}", base, ext)
            } else {
                format!("{}_{}.{}", base, attempt, ext)
            };
            let path = self.dir.join(name);

            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => {
                    debug!(path = %path.display(), "Allocated photo file");
                    return Ok(PhotoFile {
                        path,
                        writer: Box::new(file),
                    });
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e),
            }
        }

        Err(io::Error::other("photo file names exhausted"))
    }
}
