// SPDX-License-Identifier: GPL-3.0-only

//! Writing captured stills to the camera roll

use super::{CaptureOutcome, CompletionSignal};
use crate::backends::camera::types::{CameraBuffer, FrameType, StillCallback};
use crate::constants::{MAX_TRANSIENT_WRITE_RETRIES, WRITE_RETRY_BACKOFF};
use crate::errors::WriteError;
use crate::storage::{PhotoFile, PhotoFormat, PhotoStorage};
use std::io::{ErrorKind, Write};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Write all of `data`, retrying transient failures
///
/// `WouldBlock` and `Interrupted` are retried, up to
/// [`MAX_TRANSIENT_WRITE_RETRIES`] in a row. Any other error, or a write that
/// accepts zero bytes, abandons the write. Returns the number of bytes written.
pub fn write_all_retrying<W: Write + ?Sized>(
    writer: &mut W,
    data: &[u8],
) -> Result<usize, WriteError> {
    let expected = data.len();
    let mut written = 0;
    let mut transient = 0;

    let partial = |written: usize, reason: String| WriteError::Partial {
        written,
        expected,
        reason,
    };

    while written < expected {
        match writer.write(&data[written..]) {
            Ok(0) => return Err(partial(written, "storage accepted no bytes".into())),
            Ok(n) => {
                written += n;
                transient = 0;
            }
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::Interrupted) => {
                transient += 1;
                if transient > MAX_TRANSIENT_WRITE_RETRIES {
                    return Err(partial(
                        written,
                        format!("gave up after {} retries: {}", MAX_TRANSIENT_WRITE_RETRIES, e),
                    ));
                }
                debug!(attempt = transient, error = %e, "Retrying photo write");
                if e.kind() == ErrorKind::WouldBlock {
                    std::thread::sleep(WRITE_RETRY_BACKOFF);
                }
            }
            Err(e) => return Err(partial(written, e.to_string())),
        }
    }

    writer
        .flush()
        .map_err(|e| partial(written, format!("flush failed: {}", e)))?;

    Ok(written)
}

/// Persists still buffers delivered by the camera service
pub struct PhotoSaver {
    storage: Arc<dyn PhotoStorage>,
}

impl PhotoSaver {
    pub fn new(storage: Arc<dyn PhotoStorage>) -> Self {
        Self { storage }
    }

    /// Save a still buffer
    ///
    /// Buffers that are not JPEG are discarded. The buffer is consumed before
    /// returning, as it is only lent for the duration of the callback.
    pub fn save(&self, buffer: &CameraBuffer) -> CaptureOutcome {
        if buffer.frame_type != FrameType::Jpeg {
            warn!(?buffer, "Discarding still that is not a JPEG");
            return CaptureOutcome::Dropped {
                frame_type: buffer.frame_type,
            };
        }

        debug!(size = buffer.len(), "Still image received");

        let PhotoFile { path, mut writer } = match self.storage.open_photo(PhotoFormat::Jpeg) {
            Ok(file) => file,
            Err(e) => {
                warn!(error = %e, "Could not allocate photo file");
                return CaptureOutcome::Failed(WriteError::Aborted(e.to_string()));
            }
        };

        info!(path = %path.display(), "Saving photo");
        let result = write_all_retrying(writer.as_mut(), &buffer.data);
        // Close before signalling so the file is complete on disk
        drop(writer);

        match result {
            Ok(bytes) => CaptureOutcome::Saved { path, bytes },
            Err(error) => {
                warn!(path = %path.display(), %error, "Photo saved partially");
                CaptureOutcome::Partial { path, error }
            }
        }
    }

    /// Still callback that saves the buffer and then fires `signal`
    pub fn still_callback(self: &Arc<Self>, signal: CompletionSignal) -> StillCallback {
        let saver = Arc::clone(self);
        Box::new(move |handle, buffer| {
            debug!(%handle, "Still callback");
            let outcome = saver.save(buffer);
            signal.complete(outcome);
        })
    }
}
