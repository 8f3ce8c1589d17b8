// SPDX-License-Identifier: GPL-3.0-only

//! Shutter sound
//!
//! The camera service plays no sound of its own. The shutter sound must not
//! be muted (it is a legal requirement in some regions); only the sound name
//! is configurable.

use crate::backends::audio::SoundPlayer;
use crate::backends::camera::types::ShutterCallback;
use std::sync::Arc;
use tracing::debug;

/// Plays the shutter sound when a capture fires
pub struct ShutterNotifier {
    player: Arc<dyn SoundPlayer>,
    sound: String,
}

impl ShutterNotifier {
    pub fn new(player: Arc<dyn SoundPlayer>, sound: impl Into<String>) -> Self {
        Self {
            player,
            sound: sound.into(),
        }
    }

    pub fn fire(&self) {
        self.player.play_sound(&self.sound);
    }

    /// Shutter callback for a capture request
    pub fn callback(self: &Arc<Self>) -> ShutterCallback {
        let notifier = Arc::clone(self);
        Box::new(move |handle| {
            debug!(%handle, "Shutter fired");
            notifier.fire();
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::camera::types::CameraHandle;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingPlayer {
        played: Mutex<Vec<String>>,
    }

    impl SoundPlayer for RecordingPlayer {
        fn play_sound(&self, name: &str) {
            self.played.lock().unwrap().push(name.to_string());
        }
    }

    #[test]
    fn test_callback_plays_configured_sound() {
        let player = Arc::new(RecordingPlayer::default());
        let notifier = Arc::new(ShutterNotifier::new(player.clone(), "camera-shutter"));

        (notifier.callback())(CameraHandle(1));
        assert_eq!(*player.played.lock().unwrap(), vec!["camera-shutter"]);
    }
}
