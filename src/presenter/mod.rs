//! # Playback Presenter
//!
//! Consumer side of the director. Owns the active track key, keeps one
//! subscription per channel for that track and forwards accepted telemetry to
//! the lock screen. Deliveries for any other key are misfires and are dropped.

pub mod delegate;
pub mod downloader;
pub mod remote;

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::PlayerConfig;
use crate::director::{
    ChannelKind, ClockDirector, DurationChannel, Needle, NeedleChannel, PlayingStatusChannel,
    Seconds, Subscriber, SubscriptionId,
};
use crate::error::{Error, Result};
use crate::key::TrackKey;
use crate::telemetry::TelemetryEvent;

pub use delegate::{
    EngineControl, EngineEvent, LockScreen, LockScreenInfo, MediaStore, NowPlaying, PlayerDelegate,
};
pub use downloader::Downloader;
pub use remote::{CommandStatus, RemoteCommand, RemoteCommandCenter};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkipIntervals {
    pub forward: Seconds,
    pub backward: Seconds,
}

#[derive(Debug, Clone, Copy)]
struct Handles {
    duration: SubscriptionId,
    needle: SubscriptionId,
    playing_status: SubscriptionId,
}

#[derive(Debug, Default)]
struct PresenterState {
    key: Option<TrackKey>,
    needle: Option<Needle>,
    duration: Option<Seconds>,
    is_playing: bool,
    media_info: Option<LockScreenInfo>,
    url_key_map: HashMap<TrackKey, Url>,
    handles: Option<Handles>,
}

impl PresenterState {
    fn accepts(&self, key: &TrackKey) -> bool {
        self.key.as_ref() == Some(key)
    }
}

pub struct PlaybackPresenter {
    director: Arc<ClockDirector>,
    delegate: Weak<dyn PlayerDelegate>,
    media_store: Arc<dyn MediaStore>,
    skip: SkipIntervals,
    state: Mutex<PresenterState>,
    // Serializes track switches so two concurrent switches cannot leak handles.
    switching: Mutex<()>,
}

impl PlaybackPresenter {
    pub fn new(
        director: Arc<ClockDirector>,
        delegate: Weak<dyn PlayerDelegate>,
        media_store: Arc<dyn MediaStore>,
        config: &PlayerConfig,
    ) -> Arc<Self> {
        Arc::new(Self {
            director,
            delegate,
            media_store,
            skip: SkipIntervals {
                forward: config.skip_forward_seconds,
                backward: config.skip_backward_seconds,
            },
            state: Mutex::new(PresenterState::default()),
            switching: Mutex::new(()),
        })
    }

    /// Switches playback to `remote`.
    ///
    /// Order matters: old subscriptions are detached, then the active key is
    /// replaced, and only then are new subscriptions attached. Telemetry for the
    /// previous track arriving after this returns is always a misfire.
    pub fn handle_play_audio(self: &Arc<Self>, remote: &Url) {
        let switching = self.switching.lock();

        let previous = self.state.lock().handles.take();
        if let Some(handles) = previous {
            self.director.detach(DurationChannel, handles.duration);
            self.director.detach(NeedleChannel, handles.needle);
            self.director.detach(PlayingStatusChannel, handles.playing_status);
        }

        let saved = self.media_store.persisted_url(remote);
        let key = match &saved {
            Some(saved) => TrackKey::from_locator(saved),
            None => TrackKey::from_locator(remote),
        };

        {
            let mut state = self.state.lock();
            state.key = Some(key.clone());
            state.needle = None;
            state.duration = None;
            state.is_playing = false;
            state.url_key_map.insert(key.clone(), remote.clone());
        }
        self.director.record(TelemetryEvent::TrackSwitched);
        info!(key = %key, downloaded = saved.is_some(), "switched active track");

        let handles = Handles {
            duration: self.director.attach(
                DurationChannel,
                Subscriber::weak(self, |presenter: &Self, key, duration| {
                    presenter.on_duration(key, duration)
                }),
            ),
            needle: self.director.attach(
                NeedleChannel,
                Subscriber::weak(self, |presenter: &Self, key, needle| {
                    presenter.on_needle(key, needle)
                }),
            ),
            playing_status: self.director.attach(
                PlayingStatusChannel,
                Subscriber::weak(self, |presenter: &Self, key, is_playing| {
                    presenter.on_playing_status(key, is_playing)
                }),
            ),
        };
        self.state.lock().handles = Some(handles);
        // The delegate may start another track from inside these calls.
        drop(switching);

        if self.active_key().as_ref() != Some(&key) {
            debug!(key = %key, "superseded before the engine was started");
            return;
        }
        match self.delegate.upgrade() {
            Some(delegate) => match &saved {
                Some(saved) => delegate.start_downloaded(&key, saved),
                None => delegate.start_streamed(&key, remote),
            },
            None => debug!(key = %key, "no delegate, engine not started"),
        }
    }

    /// Stores metadata for the lock screen. Published right away if a duration is known.
    pub fn handle_lockscreen_info(&self, info: LockScreenInfo) {
        let duration = {
            let mut state = self.state.lock();
            state.media_info = Some(info.clone());
            state.duration
        };
        if let (Some(duration), Some(delegate)) = (duration, self.delegate.upgrade()) {
            delegate.set_now_playing(&NowPlaying::new(&info, duration));
        }
    }

    pub fn url_for_key(&self, key: &TrackKey) -> Option<Url> {
        self.state.lock().url_key_map.get(key).cloned()
    }

    pub fn add_url_to_key_map(&self, url: &Url) {
        self.state
            .lock()
            .url_key_map
            .insert(TrackKey::from_locator(url), url.clone());
    }

    pub fn active_key(&self) -> Option<TrackKey> {
        self.state.lock().key.clone()
    }

    pub fn needle(&self) -> Option<Needle> {
        self.state.lock().needle
    }

    pub fn duration(&self) -> Option<Seconds> {
        self.state.lock().duration
    }

    pub fn is_playing(&self) -> bool {
        self.state.lock().is_playing
    }

    pub fn skip_intervals(&self) -> SkipIntervals {
        self.skip
    }

    fn misfire(&self, channel: ChannelKind, key: &TrackKey, expected: Option<TrackKey>) {
        let expected = expected.as_ref().map(TrackKey::as_str).unwrap_or("none");
        debug!(?channel, expected, payload = %key, "misfire");
        self.director.record(TelemetryEvent::Misfire { channel });
    }

    fn on_duration(&self, key: &TrackKey, duration: Seconds) {
        let info = {
            let mut state = self.state.lock();
            if !state.accepts(key) {
                let expected = state.key.clone();
                drop(state);
                self.misfire(ChannelKind::Duration, key, expected);
                return;
            }
            state.duration = Some(duration);
            state.media_info.clone()
        };

        if let Some(delegate) = self.delegate.upgrade() {
            delegate.update_playback_duration(duration);
            if let Some(info) = info {
                delegate.set_now_playing(&NowPlaying::new(&info, duration));
            }
        }
    }

    fn on_needle(&self, key: &TrackKey, needle: Needle) {
        {
            let mut state = self.state.lock();
            if !state.accepts(key) {
                let expected = state.key.clone();
                drop(state);
                self.misfire(ChannelKind::Needle, key, expected);
                return;
            }
            state.needle = Some(needle);
        }

        if let Some(delegate) = self.delegate.upgrade() {
            delegate.update_elapsed_time(needle);
        }
    }

    fn on_playing_status(&self, key: &TrackKey, is_playing: bool) {
        {
            let mut state = self.state.lock();
            if !state.accepts(key) {
                let expected = state.key.clone();
                drop(state);
                self.misfire(ChannelKind::PlayingStatus, key, expected);
                return;
            }
            state.is_playing = is_playing;
        }

        if let Some(delegate) = self.delegate.upgrade() {
            delegate.update_playing_status(is_playing);
        }
    }

    fn with_engine(&self, command: &str, f: impl FnOnce(&dyn PlayerDelegate)) {
        match self.delegate.upgrade() {
            Some(delegate) => f(delegate.as_ref()),
            None => debug!(command, "no delegate, command dropped"),
        }
    }

    pub fn handle_play(&self) {
        self.with_engine("play", |engine| engine.play());
    }

    pub fn handle_pause(&self) {
        self.with_engine("pause", |engine| engine.pause());
    }

    pub fn handle_toggle_playing_and_pausing(&self) {
        if self.is_playing() {
            self.handle_pause();
        } else {
            self.handle_play();
        }
    }

    pub fn handle_skip_forward(&self) {
        let needle = self.needle().unwrap_or(0.0);
        self.handle_seek(needle + self.skip.forward);
    }

    pub fn handle_skip_backward(&self) {
        let needle = self.needle().unwrap_or(0.0);
        self.handle_seek(needle - self.skip.backward);
    }

    /// Seeks to `needle`, clamped to the start of the track and, once known, its end.
    /// Returns the position actually requested from the engine.
    pub fn handle_seek(&self, needle: Needle) -> Needle {
        let mut target = needle.max(0.0);
        if let Some(duration) = self.duration() {
            target = target.min(duration);
        }
        self.with_engine("seek", |engine| engine.seek(target));
        target
    }

    pub fn handle_set_speed(&self, multiple: f64) -> Result<()> {
        if !multiple.is_finite() || multiple <= 0.0 {
            return Err(Error::InvalidSpeed(multiple));
        }
        self.with_engine("set_speed", |engine| engine.set_speed(multiple));
        Ok(())
    }

    /// Engine failures are logged and recorded, never retried here. Events for
    /// a track other than the active one are dropped like any other misfire.
    pub fn handle_engine_event(&self, event: EngineEvent) {
        {
            let mut state = self.state.lock();
            if !state.accepts(event.key()) {
                let expected = state.key.clone();
                drop(state);
                let expected = expected.as_ref().map(TrackKey::as_str).unwrap_or("none");
                debug!(?event, expected, "stale engine event");
                self.director.record(TelemetryEvent::StaleEngineEvent);
                return;
            }
            if let EngineEvent::EndedPlaying(_) = event {
                state.is_playing = false;
            }
        }

        match event {
            EngineEvent::Failed { key, reason } => {
                warn!(reason = %reason, key = %key, "engine failed");
                self.director.record(TelemetryEvent::EngineFailed);
            }
            EngineEvent::EndedPlaying(key) => info!(key = %key, "track ended"),
        }
    }
}
