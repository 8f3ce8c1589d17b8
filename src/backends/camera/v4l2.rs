// SPDX-License-Identifier: GPL-3.0-only

//! V4L2 camera service
//!
//! Each opened unit gets a viewfinder thread that streams MJPEG frames from
//! the device into a compositor window. Still captures take the next frame
//! the viewfinder produces, so preview and capture share one stream.

use super::types::*;
use super::v4l2_utils::{can_stream_capture, resolve_device};
use super::CameraService;
use crate::backends::compositor::WindowCompositor;
use crate::config::Config;
use crate::constants::{STILL_FRAME_TIMEOUT, V4L2_BUFFER_COUNT, VIEWFINDER_POLL_TIMEOUT};
use crate::errors::{CameraError, CameraResult};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::sync_channel;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use v4l::buffer::Type;
use v4l::io::mmap::Stream;
use v4l::io::traits::CaptureStream;
use v4l::prelude::*;
use v4l::video::Capture;
use v4l::FourCC;

/// Most recent viewfinder frame, shared with capture threads
struct LatestFrame {
    slot: Mutex<FrameSlot>,
    ready: Condvar,
}

#[derive(Default)]
struct FrameSlot {
    seq: u64,
    frame: Option<Arc<[u8]>>,
    closed: bool,
}

impl LatestFrame {
    fn new() -> Self {
        Self {
            slot: Mutex::new(FrameSlot::default()),
            ready: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, FrameSlot> {
        self.slot.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn publish(&self, frame: Arc<[u8]>) {
        let mut slot = self.lock();
        slot.seq = slot.seq.wrapping_add(1);
        slot.frame = Some(frame);
        self.ready.notify_all();
    }

    fn close(&self) {
        self.lock().closed = true;
        self.ready.notify_all();
    }

    fn seq(&self) -> u64 {
        self.lock().seq
    }

    /// Wait for a frame newer than `seq`; falls back to the last frame seen
    fn wait_newer(&self, seq: u64, timeout: Duration) -> Option<Arc<[u8]>> {
        let guard = self.lock();
        let (slot, result) = self
            .ready
            .wait_timeout_while(guard, timeout, |s| s.seq == seq && !s.closed)
            .unwrap_or_else(|p| p.into_inner());
        if result.timed_out() {
            warn!(?timeout, "No fresh viewfinder frame, using last frame");
        }
        slot.frame.clone()
    }
}

struct Viewfinder {
    running: Arc<AtomicBool>,
    latest: Arc<LatestFrame>,
    thread: Option<JoinHandle<()>>,
}

impl Viewfinder {
    fn stop(mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(thread) = self.thread.take()
            && thread.join().is_err()
        {
            warn!("Viewfinder thread panicked");
        }
        self.latest.close();
    }
}

struct OpenCamera {
    unit: CameraUnit,
    device_path: String,
    window: Option<(String, String)>,
    viewfinder: Option<Viewfinder>,
}

/// Camera service backed by V4L2 capture devices
pub struct V4l2Camera {
    config: Config,
    compositor: Arc<WindowCompositor>,
    next_handle: AtomicU64,
    sessions: Mutex<HashMap<CameraHandle, OpenCamera>>,
}

impl V4l2Camera {
    pub fn new(config: &Config, compositor: Arc<WindowCompositor>) -> Self {
        Self {
            config: config.clone(),
            compositor,
            next_handle: AtomicU64::new(1),
            sessions: Mutex::new(HashMap::new()),
        }
    }

    fn sessions(&self) -> MutexGuard<'_, HashMap<CameraHandle, OpenCamera>> {
        self.sessions.lock().unwrap_or_else(|p| p.into_inner())
    }
}

impl CameraService for V4l2Camera {
    fn open(&self, unit: CameraUnit, mode: CameraMode) -> CameraResult<CameraHandle> {
        if !mode.contains(CameraMode::READ) {
            return Err(CameraError::Io("viewfinder needs read access".into()));
        }

        let device_path = resolve_device(&self.config, unit)
            .ok_or_else(|| CameraError::NoDevice(format!("no {} camera found", unit)))?;

        if self.sessions().values().any(|s| s.device_path == device_path) {
            return Err(CameraError::Busy(device_path));
        }

        // Probe now so an unusable device fails the open rather than the preview
        let dev = Device::with_path(&device_path)?;
        let caps = dev.query_caps()?;
        debug!(card = %caps.card, driver = %caps.driver, "Probed camera device");
        drop(dev);
        if !can_stream_capture(caps.capabilities) {
            return Err(CameraError::NoDevice(format!(
                "{} cannot stream video",
                device_path
            )));
        }

        let handle = CameraHandle(self.next_handle.fetch_add(1, Ordering::Relaxed));
        self.sessions().insert(
            handle,
            OpenCamera {
                unit,
                device_path: device_path.clone(),
                window: None,
                viewfinder: None,
            },
        );

        info!(%handle, %unit, device = %device_path, "Camera opened");
        Ok(handle)
    }

    fn set_viewfinder_window(
        &self,
        handle: CameraHandle,
        group: &str,
        id: &str,
    ) -> CameraResult<()> {
        if group.is_empty() || id.is_empty() {
            return Err(CameraError::InvalidWindow(format!(
                "group {:?} id {:?}",
                group, id
            )));
        }

        let mut sessions = self.sessions();
        let session = sessions
            .get_mut(&handle)
            .ok_or(CameraError::InvalidHandle(handle))?;
        session.window = Some((group.to_string(), id.to_string()));
        Ok(())
    }

    fn start_viewfinder(&self, handle: CameraHandle) -> CameraResult<()> {
        let mut sessions = self.sessions();
        let session = sessions
            .get_mut(&handle)
            .ok_or(CameraError::InvalidHandle(handle))?;

        if session.viewfinder.is_some() {
            return Ok(());
        }

        let (group, id) = session
            .window
            .clone()
            .ok_or_else(|| CameraError::InvalidWindow("viewfinder window not set".into()))?;

        let running = Arc::new(AtomicBool::new(true));
        let latest = Arc::new(LatestFrame::new());
        let (ready_tx, ready_rx) = sync_channel::<CameraResult<()>>(1);

        let params = StreamParams {
            device_path: session.device_path.clone(),
            width: self.config.capture_width,
            height: self.config.capture_height,
            group,
            id,
        };
        let compositor = Arc::clone(&self.compositor);
        let running_clone = Arc::clone(&running);
        let latest_clone = Arc::clone(&latest);

        let thread = std::thread::Builder::new()
            .name(format!("viewfinder-{}", session.unit))
            .spawn(move || {
                viewfinder_loop(params, compositor, running_clone, latest_clone, ready_tx)
            })
            .map_err(CameraError::from)?;

        // Stream setup happens on the thread; wait for its verdict
        match ready_rx.recv() {
            Ok(Ok(())) => {
                session.viewfinder = Some(Viewfinder {
                    running,
                    latest,
                    thread: Some(thread),
                });
                info!(%handle, "Viewfinder started");
                Ok(())
            }
            Ok(Err(e)) => {
                let _ = thread.join();
                Err(e)
            }
            Err(_) => {
                let _ = thread.join();
                Err(CameraError::Io("viewfinder thread exited during setup".into()))
            }
        }
    }

    fn take_photo(&self, handle: CameraHandle, callbacks: PhotoCallbacks) -> CameraResult<()> {
        let latest = {
            let sessions = self.sessions();
            let session = sessions
                .get(&handle)
                .ok_or(CameraError::InvalidHandle(handle))?;
            let viewfinder = session
                .viewfinder
                .as_ref()
                .ok_or(CameraError::ViewfinderNotRunning)?;
            Arc::clone(&viewfinder.latest)
        };

        std::thread::Builder::new()
            .name("camera-capture".into())
            .spawn(move || {
                let seq = latest.seq();
                (callbacks.shutter)(handle);

                let buffer = latest
                    .wait_newer(seq, STILL_FRAME_TIMEOUT)
                    .map(CameraBuffer::new)
                    .unwrap_or_else(CameraBuffer::empty);
                debug!(%handle, ?buffer, "Still frame ready");
                (callbacks.still)(handle, &buffer);
            })
            .map_err(CameraError::from)?;

        Ok(())
    }

    fn close(&self, handle: CameraHandle) -> CameraResult<()> {
        let session = self
            .sessions()
            .remove(&handle)
            .ok_or(CameraError::InvalidHandle(handle))?;

        // Joining outside the lock; the thread destroys the window on exit
        if let Some(viewfinder) = session.viewfinder {
            viewfinder.stop();
        }

        info!(%handle, unit = %session.unit, "Camera closed");
        Ok(())
    }
}

impl Drop for V4l2Camera {
    fn drop(&mut self) {
        let handles: Vec<CameraHandle> = self.sessions().keys().copied().collect();
        for handle in handles {
            let _ = self.close(handle);
        }
    }
}

/// Source of encoded viewfinder frames
trait FrameSource {
    /// Next frame, or `None` when nothing arrived within the poll timeout
    fn next_frame(&mut self) -> std::io::Result<Option<Arc<[u8]>>>;
}

impl FrameSource for Stream<'_> {
    fn next_frame(&mut self) -> std::io::Result<Option<Arc<[u8]>>> {
        match CaptureStream::next(self) {
            Ok((buf, meta)) => {
                let used = (meta.bytesused as usize).min(buf.len());
                let used = if used == 0 { buf.len() } else { used };
                Ok(Some(Arc::from(&buf[..used])))
            }
            Err(e) if e.kind() == std::io::ErrorKind::TimedOut => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// Pull frames until `running` is cleared or the source fails
///
/// A stalled source only delays the stop by one poll timeout.
fn stream_frames(
    source: &mut impl FrameSource,
    running: &AtomicBool,
    mut on_frame: impl FnMut(Arc<[u8]>),
) -> std::io::Result<()> {
    while running.load(Ordering::SeqCst) {
        match source.next_frame()? {
            Some(frame) => on_frame(frame),
            None => debug!("No viewfinder frame within poll timeout"),
        }
    }
    Ok(())
}

struct StreamParams {
    device_path: String,
    width: u32,
    height: u32,
    group: String,
    id: String,
}

/// Viewfinder thread body
fn viewfinder_loop(
    params: StreamParams,
    compositor: Arc<WindowCompositor>,
    running: Arc<AtomicBool>,
    latest: Arc<LatestFrame>,
    ready: std::sync::mpsc::SyncSender<CameraResult<()>>,
) {
    let dev = match open_mjpeg_device(&params) {
        Ok(dev) => dev,
        Err(e) => {
            let _ = ready.send(Err(e));
            return;
        }
    };

    let mut stream = match Stream::with_buffers(&dev, Type::VideoCapture, V4L2_BUFFER_COUNT) {
        Ok(stream) => stream,
        Err(e) => {
            let _ = ready.send(Err(e.into()));
            return;
        }
    };
    stream.set_timeout(VIEWFINDER_POLL_TIMEOUT);

    let _ = ready.send(Ok(()));

    // The service owns the window; the compositor announces it to the UI
    let window = compositor.create_window(&params.group, &params.id);

    let result = stream_frames(&mut stream, &running, |frame| {
        latest.publish(Arc::clone(&frame));
        if let Err(e) = compositor.post_frame(window, frame) {
            warn!(error = %e, "Dropping viewfinder frame");
        }
    });
    if let Err(e) = result {
        error!(error = %e, device = %params.device_path, "Viewfinder stream failed");
    }

    latest.close();
    compositor.destroy_window(window);
    debug!(device = %params.device_path, "Viewfinder thread exiting");
}

fn open_mjpeg_device(params: &StreamParams) -> CameraResult<Device> {
    let dev = Device::with_path(&params.device_path)?;

    let mjpg = FourCC::new(b"MJPG");
    let mut format = dev.format()?;
    format.width = params.width;
    format.height = params.height;
    format.fourcc = mjpg;

    let actual = dev.set_format(&format)?;
    if actual.fourcc != mjpg {
        return Err(CameraError::Io(format!(
            "{} does not deliver MJPEG (got {})",
            params.device_path, actual.fourcc
        )));
    }

    info!(
        device = %params.device_path,
        width = actual.width,
        height = actual.height,
        "Viewfinder format set"
    );
    Ok(dev)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wait_newer_returns_published_frame() {
        let latest = Arc::new(LatestFrame::new());
        let seq = latest.seq();

        let publisher = Arc::clone(&latest);
        let thread = std::thread::spawn(move || {
            publisher.publish(Arc::from(vec![0xFFu8, 0xD8, 0xFF]));
        });

        let frame = latest.wait_newer(seq, Duration::from_secs(5));
        thread.join().unwrap();
        assert_eq!(frame.as_deref(), Some(&[0xFFu8, 0xD8, 0xFF][..]));
    }

    #[test]
    fn test_wait_newer_on_closed_stream_returns_last_frame() {
        let latest = LatestFrame::new();
        latest.publish(Arc::from(vec![1u8]));
        let seq = latest.seq();
        latest.close();

        let frame = latest.wait_newer(seq, Duration::from_secs(5));
        assert_eq!(frame.as_deref(), Some(&[1u8][..]));
    }

    /// Source that never produces a frame, like a stalled device
    struct StalledSource {
        polls: usize,
    }

    impl FrameSource for StalledSource {
        fn next_frame(&mut self) -> std::io::Result<Option<Arc<[u8]>>> {
            self.polls += 1;
            std::thread::sleep(Duration::from_millis(10));
            Ok(None)
        }
    }

    struct FailingSource;

    impl FrameSource for FailingSource {
        fn next_frame(&mut self) -> std::io::Result<Option<Arc<[u8]>>> {
            Err(std::io::Error::other("device unplugged"))
        }
    }

    #[test]
    fn test_stop_returns_with_stalled_stream() {
        let running = Arc::new(AtomicBool::new(true));
        let latest = Arc::new(LatestFrame::new());
        let thread_running = Arc::clone(&running);
        let thread = std::thread::spawn(move || {
            let mut source = StalledSource { polls: 0 };
            stream_frames(&mut source, &thread_running, |_| {}).unwrap();
            assert!(source.polls > 0);
        });
        std::thread::sleep(Duration::from_millis(30));

        let viewfinder = Viewfinder {
            running,
            latest: Arc::clone(&latest),
            thread: Some(thread),
        };
        let started = std::time::Instant::now();
        viewfinder.stop();
        assert!(started.elapsed() < Duration::from_secs(1));
        assert!(latest.lock().closed);
    }

    #[test]
    fn test_stream_error_ends_loop() {
        let running = AtomicBool::new(true);
        let mut frames = 0;
        let result = stream_frames(&mut FailingSource, &running, |_| frames += 1);
        assert!(result.is_err());
        assert_eq!(frames, 0);
    }

    #[test]
    fn test_take_photo_on_unknown_handle() {
        let (compositor, _events) = WindowCompositor::new();
        let camera = V4l2Camera::new(&Config::default(), compositor);
        let callbacks = PhotoCallbacks {
            shutter: Box::new(|_| {}),
            still: Box::new(|_, _| {}),
        };
        let err = camera.take_photo(CameraHandle(9), callbacks).unwrap_err();
        assert_eq!(err, CameraError::InvalidHandle(CameraHandle(9)));
    }

    #[test]
    fn test_open_rejects_write_only_mode() {
        let (compositor, _events) = WindowCompositor::new();
        let camera = V4l2Camera::new(&Config::default(), compositor);
        assert!(camera.open(CameraUnit::Front, CameraMode::WRITE).is_err());
    }

    #[test]
    fn test_open_missing_device_node() {
        let (compositor, _events) = WindowCompositor::new();
        let config = Config {
            front_device: Some("/dev/video-does-not-exist".into()),
            ..Config::default()
        };
        let camera = V4l2Camera::new(&config, compositor);
        let err = camera
            .open(CameraUnit::Front, CameraMode::RW | CameraMode::ROLL)
            .unwrap_err();
        assert!(matches!(err, CameraError::NoDevice(_)));
    }

    #[test]
    fn test_open_non_camera_node_fails() {
        let (compositor, _events) = WindowCompositor::new();
        let config = Config {
            rear_device: Some("/dev/null".into()),
            ..Config::default()
        };
        let camera = V4l2Camera::new(&config, compositor);
        assert!(camera.open(CameraUnit::Rear, CameraMode::RW).is_err());
        assert!(camera.sessions().is_empty());
    }
}
