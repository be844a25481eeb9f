//! Stand-ins for the external collaborators: an engine that produces telemetry
//! on a tokio task, a lock screen that logs, and an in-memory media store.

pub mod engine;
pub mod lock_screen;
pub mod media_store;

use url::Url;

use crate::director::{Needle, Seconds};
use crate::key::TrackKey;
use crate::presenter::{EngineControl, LockScreen, NowPlaying};

pub use engine::{EngineCommand, EngineHandle, SimulatedEngine};
pub use lock_screen::{LockScreenState, TracingLockScreen};
pub use media_store::InMemoryMediaStore;

/// Engine handle plus lock screen, acting as the presenter's delegate.
pub struct SimulatedPlayer {
    pub engine: EngineHandle,
    pub lock_screen: TracingLockScreen,
}

impl EngineControl for SimulatedPlayer {
    fn start_streamed(&self, key: &TrackKey, remote: &Url) {
        self.engine.start_streamed(key, remote);
    }

    fn start_downloaded(&self, key: &TrackKey, saved: &Url) {
        self.engine.start_downloaded(key, saved);
    }

    fn play(&self) {
        self.engine.play();
    }

    fn pause(&self) {
        self.engine.pause();
    }

    fn seek(&self, needle: Needle) {
        self.engine.seek(needle);
    }

    fn set_speed(&self, multiple: f64) {
        self.engine.set_speed(multiple);
    }
}

impl LockScreen for SimulatedPlayer {
    fn set_now_playing(&self, now_playing: &NowPlaying) {
        self.lock_screen.set_now_playing(now_playing);
    }

    fn update_elapsed_time(&self, needle: Needle) {
        self.lock_screen.update_elapsed_time(needle);
    }

    fn update_playback_duration(&self, duration: Seconds) {
        self.lock_screen.update_playback_duration(duration);
    }

    fn update_playing_status(&self, is_playing: bool) {
        self.lock_screen.update_playing_status(is_playing);
    }
}
