// SPDX-License-Identifier: MPL-2.0

//! Test doubles for the platform services

#![allow(dead_code)]

use hello_camera::app::{AppModel, Services};
use hello_camera::backends::audio::SoundPlayer;
use hello_camera::backends::camera::{
    CameraBuffer, CameraHandle, CameraMode, CameraService, CameraUnit, PhotoCallbacks,
};
use hello_camera::backends::compositor::{WindowCompositor, WindowEvent, WindowHandle};
use hello_camera::config::Config;
use hello_camera::errors::{CameraError, CameraResult};
use hello_camera::storage::{PhotoFile, PhotoFormat, PhotoStorage};
use std::collections::{HashMap, VecDeque};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Minimal JPEG-looking payload
pub const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 1, 2, 3, 4, 5, 6, 7, 8, 0xFF, 0xD9];

/// How the fake camera answers a capture request
#[derive(Debug, Clone)]
pub enum StillBehavior {
    /// Deliver these bytes through both callbacks
    Deliver(Vec<u8>),
    /// Accept the request and drop the callbacks unused
    Drop,
    /// Reject the request
    Reject(CameraError),
}

struct FakeSession {
    unit: CameraUnit,
    window: Option<(String, String)>,
    window_handle: Option<WindowHandle>,
}

struct FakeState {
    next_handle: u64,
    sessions: HashMap<CameraHandle, FakeSession>,
    fail_open: Option<CameraError>,
    fail_set_window: Option<CameraError>,
    fail_start: Option<CameraError>,
    still: StillBehavior,
    opened: usize,
    closed: Vec<CameraHandle>,
    modes: Vec<CameraMode>,
}

/// In-memory camera service that creates windows on the shared compositor
pub struct FakeCamera {
    compositor: Arc<WindowCompositor>,
    state: Mutex<FakeState>,
}

impl FakeCamera {
    pub fn new(compositor: Arc<WindowCompositor>) -> Self {
        Self {
            compositor,
            state: Mutex::new(FakeState {
                next_handle: 100,
                sessions: HashMap::new(),
                fail_open: None,
                fail_set_window: None,
                fail_start: None,
                still: StillBehavior::Deliver(JPEG.to_vec()),
                opened: 0,
                closed: Vec::new(),
                modes: Vec::new(),
            }),
        }
    }

    pub fn fail_next_open(&self, error: CameraError) {
        self.state.lock().unwrap().fail_open = Some(error);
    }

    pub fn fail_next_set_window(&self, error: CameraError) {
        self.state.lock().unwrap().fail_set_window = Some(error);
    }

    pub fn fail_next_start(&self, error: CameraError) {
        self.state.lock().unwrap().fail_start = Some(error);
    }

    pub fn set_still(&self, behavior: StillBehavior) {
        self.state.lock().unwrap().still = behavior;
    }

    /// Handles currently open
    pub fn open_handles(&self) -> usize {
        self.state.lock().unwrap().sessions.len()
    }

    /// Successful opens so far
    pub fn opened(&self) -> usize {
        self.state.lock().unwrap().opened
    }

    pub fn closed(&self) -> Vec<CameraHandle> {
        self.state.lock().unwrap().closed.clone()
    }

    pub fn modes(&self) -> Vec<CameraMode> {
        self.state.lock().unwrap().modes.clone()
    }
}

impl CameraService for FakeCamera {
    fn open(&self, unit: CameraUnit, mode: CameraMode) -> CameraResult<CameraHandle> {
        let mut state = self.state.lock().unwrap();
        if let Some(error) = state.fail_open.take() {
            return Err(error);
        }
        if state.sessions.values().any(|s| s.unit == unit) {
            return Err(CameraError::Busy(unit.to_string()));
        }

        let handle = CameraHandle(state.next_handle);
        state.next_handle += 1;
        state.opened += 1;
        state.modes.push(mode);
        state.sessions.insert(
            handle,
            FakeSession {
                unit,
                window: None,
                window_handle: None,
            },
        );
        Ok(handle)
    }

    fn set_viewfinder_window(
        &self,
        handle: CameraHandle,
        group: &str,
        id: &str,
    ) -> CameraResult<()> {
        let mut state = self.state.lock().unwrap();
        if let Some(error) = state.fail_set_window.take() {
            return Err(error);
        }
        let session = state
            .sessions
            .get_mut(&handle)
            .ok_or(CameraError::InvalidHandle(handle))?;
        session.window = Some((group.to_string(), id.to_string()));
        Ok(())
    }

    fn start_viewfinder(&self, handle: CameraHandle) -> CameraResult<()> {
        let mut state = self.state.lock().unwrap();
        if let Some(error) = state.fail_start.take() {
            return Err(error);
        }
        let session = state
            .sessions
            .get_mut(&handle)
            .ok_or(CameraError::InvalidHandle(handle))?;
        let (group, id) = session
            .window
            .clone()
            .ok_or_else(|| CameraError::InvalidWindow("not set".into()))?;
        let window = self.compositor.create_window(&group, &id);
        self.compositor
            .post_frame(window, Arc::from(JPEG))
            .map_err(|e| CameraError::Io(e.to_string()))?;
        session.window_handle = Some(window);
        Ok(())
    }

    fn take_photo(&self, handle: CameraHandle, callbacks: PhotoCallbacks) -> CameraResult<()> {
        let state = self.state.lock().unwrap();
        let session = state
            .sessions
            .get(&handle)
            .ok_or(CameraError::InvalidHandle(handle))?;
        if session.window_handle.is_none() {
            return Err(CameraError::ViewfinderNotRunning);
        }

        match state.still.clone() {
            StillBehavior::Deliver(bytes) => {
                std::thread::spawn(move || {
                    (callbacks.shutter)(handle);
                    let buffer = CameraBuffer::new(Arc::from(bytes));
                    (callbacks.still)(handle, &buffer);
                });
                Ok(())
            }
            StillBehavior::Drop => {
                std::thread::spawn(move || drop(callbacks));
                Ok(())
            }
            StillBehavior::Reject(error) => Err(error),
        }
    }

    fn close(&self, handle: CameraHandle) -> CameraResult<()> {
        let mut state = self.state.lock().unwrap();
        let session = state
            .sessions
            .remove(&handle)
            .ok_or(CameraError::InvalidHandle(handle))?;
        state.closed.push(handle);
        if let Some(window) = session.window_handle {
            self.compositor.destroy_window(window);
        }
        Ok(())
    }
}

/// Photo file kept in memory
#[derive(Clone, Default)]
pub struct StoredPhoto {
    pub path: PathBuf,
    pub data: Arc<Mutex<Vec<u8>>>,
}

/// Storage whose writers replay scripted results before accepting data
#[derive(Default)]
pub struct MemoryStorage {
    photos: Mutex<Vec<StoredPhoto>>,
    script: Arc<Mutex<VecDeque<io::Result<usize>>>>,
    fail_open: Mutex<bool>,
}

impl MemoryStorage {
    /// Results returned by the next `write` calls, in order
    pub fn script_writes(&self, script: Vec<io::Result<usize>>) {
        *self.script.lock().unwrap() = script.into();
    }

    pub fn fail_open(&self) {
        *self.fail_open.lock().unwrap() = true;
    }

    pub fn photos(&self) -> Vec<StoredPhoto> {
        self.photos.lock().unwrap().clone()
    }
}

impl PhotoStorage for MemoryStorage {
    fn open_photo(&self, format: PhotoFormat) -> io::Result<PhotoFile> {
        if *self.fail_open.lock().unwrap() {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only roll"));
        }
        let mut photos = self.photos.lock().unwrap();
        let photo = StoredPhoto {
            path: PathBuf::from(format!("roll/IMG_{}.{}", photos.len(), format.extension())),
            data: Arc::default(),
        };
        photos.push(photo.clone());
        Ok(PhotoFile {
            path: photo.path,
            writer: Box::new(MemoryWriter {
                data: photo.data,
                script: Arc::clone(&self.script),
            }),
        })
    }
}

struct MemoryWriter {
    data: Arc<Mutex<Vec<u8>>>,
    script: Arc<Mutex<VecDeque<io::Result<usize>>>>,
}

impl Write for MemoryWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = match self.script.lock().unwrap().pop_front() {
            Some(Ok(limit)) => limit.min(buf.len()),
            Some(Err(e)) => return Err(e),
            None => buf.len(),
        };
        self.data.lock().unwrap().extend_from_slice(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Sound player that records what it was asked to play
#[derive(Default)]
pub struct RecordingPlayer {
    played: Mutex<Vec<String>>,
}

impl RecordingPlayer {
    pub fn played(&self) -> Vec<String> {
        self.played.lock().unwrap().clone()
    }
}

impl SoundPlayer for RecordingPlayer {
    fn play_sound(&self, name: &str) {
        self.played.lock().unwrap().push(name.to_string());
    }
}

/// Application model wired to fakes
pub struct TestApp {
    pub model: AppModel,
    pub camera: Arc<FakeCamera>,
    pub compositor: Arc<WindowCompositor>,
    pub events: Receiver<WindowEvent>,
    pub storage: Arc<MemoryStorage>,
    pub sound: Arc<RecordingPlayer>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_storage(Arc::new(MemoryStorage::default()), None)
    }

    /// Wire the model to `storage`, or to `roll` when given
    pub fn with_storage(storage: Arc<MemoryStorage>, roll: Option<Arc<dyn PhotoStorage>>) -> Self {
        let (compositor, events) = WindowCompositor::new();
        let camera = Arc::new(FakeCamera::new(Arc::clone(&compositor)));
        let sound = Arc::new(RecordingPlayer::default());
        let photo_storage: Arc<dyn PhotoStorage> = match roll {
            Some(roll) => roll,
            None => storage.clone(),
        };
        let services = Services {
            camera: camera.clone(),
            compositor: compositor.clone(),
            storage: photo_storage,
            sound: sound.clone(),
        };
        let model = AppModel::new(&Config::default(), services);

        Self {
            model,
            camera,
            compositor,
            events,
            storage,
            sound,
        }
    }

    /// Deliver pending compositor notifications to the model
    pub fn pump(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            self.model.handle_window_event(event);
        }
    }

    /// Poll until the pending capture completes
    pub fn wait_for_capture(&mut self) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !self.model.poll_capture() {
            assert!(Instant::now() < deadline, "capture never completed");
            std::thread::sleep(Duration::from_millis(5));
        }
    }
}
