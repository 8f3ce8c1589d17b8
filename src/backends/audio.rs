// SPDX-License-Identifier: MPL-2.0

//! System sound playback
//!
//! Sounds are looked up by freedesktop sound-theme name and played by an
//! external helper (`canberra-gtk-play` by default).

use std::io::Write;
use std::process::{Command, Stdio};
use tracing::{debug, warn};

/// Fire-and-forget sound playback
pub trait SoundPlayer: Send + Sync {
    /// Start playing a named system sound and return immediately
    fn play_sound(&self, name: &str);
}

/// Plays sounds through a sound-theme helper program
#[derive(Debug, Clone)]
pub struct SystemSoundPlayer {
    program: String,
}

impl SystemSoundPlayer {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn ring_bell() {
        let mut stderr = std::io::stderr();
        let _ = stderr.write_all(b"\x07");
        let _ = stderr.flush();
    }
}

impl SoundPlayer for SystemSoundPlayer {
    fn play_sound(&self, name: &str) {
        let spawned = Command::new(&self.program)
            .args(["--id", name])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();

        match spawned {
            Ok(mut child) => {
                debug!(program = %self.program, sound = name, "Playing sound");
                // Reap in the background so the caller never waits on playback
                std::thread::spawn(move || {
                    let _ = child.wait();
                });
            }
            Err(e) => {
                warn!(program = %self.program, sound = name, error = %e, "Sound helper unavailable, ringing bell");
                Self::ring_bell();
            }
        }
    }
}
