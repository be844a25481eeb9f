use parking_lot::Mutex;
use tracing::{debug, info};

use crate::director::{Needle, Seconds};
use crate::presenter::{LockScreen, NowPlaying};

/// Last values pushed to the lock screen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LockScreenState {
    pub now_playing: Option<NowPlaying>,
    pub elapsed: Option<Needle>,
    pub duration: Option<Seconds>,
    pub is_playing: bool,
}

/// Lock screen that logs every update and remembers the latest values.
#[derive(Debug, Default)]
pub struct TracingLockScreen {
    state: Mutex<LockScreenState>,
}

impl TracingLockScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> LockScreenState {
        self.state.lock().clone()
    }
}

impl LockScreen for TracingLockScreen {
    fn set_now_playing(&self, now_playing: &NowPlaying) {
        info!(
            title = %now_playing.title,
            artist = %now_playing.artist,
            duration = now_playing.duration,
            "now playing"
        );
        self.state.lock().now_playing = Some(now_playing.clone());
    }

    fn update_elapsed_time(&self, needle: Needle) {
        debug!(needle, "elapsed");
        self.state.lock().elapsed = Some(needle);
    }

    fn update_playback_duration(&self, duration: Seconds) {
        debug!(duration, "duration");
        let mut state = self.state.lock();
        state.duration = Some(duration);
        if let Some(now_playing) = state.now_playing.as_mut() {
            now_playing.duration = duration;
        }
    }

    fn update_playing_status(&self, is_playing: bool) {
        info!(is_playing, "playing status");
        self.state.lock().is_playing = is_playing;
    }
}
