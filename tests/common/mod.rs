#![allow(dead_code)]

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use url::Url;

use playclock::director::{Needle, Seconds};
use playclock::presenter::delegate::{DownloadCallback, MediaStore};
use playclock::presenter::{EngineControl, LockScreen, NowPlaying, PlayerDelegate};
use playclock::{ClockDirector, PlaybackPresenter, PlayerConfig, TrackKey};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    StartStreamed(TrackKey),
    StartDownloaded(TrackKey),
    Play,
    Pause,
    Seek(Needle),
    SetSpeed(f64),
    NowPlaying(NowPlaying),
    Elapsed(Needle),
    Duration(Seconds),
    Playing(bool),
}

/// Delegate that records every call made by the presenter.
#[derive(Default)]
pub struct RecordingPlayer {
    calls: Mutex<Vec<Call>>,
}

impl RecordingPlayer {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().clear();
    }

    fn push(&self, call: Call) {
        self.calls.lock().push(call);
    }
}

impl EngineControl for RecordingPlayer {
    fn start_streamed(&self, key: &TrackKey, _remote: &Url) {
        self.push(Call::StartStreamed(key.clone()));
    }

    fn start_downloaded(&self, key: &TrackKey, _saved: &Url) {
        self.push(Call::StartDownloaded(key.clone()));
    }

    fn play(&self) {
        self.push(Call::Play);
    }

    fn pause(&self) {
        self.push(Call::Pause);
    }

    fn seek(&self, needle: Needle) {
        self.push(Call::Seek(needle));
    }

    fn set_speed(&self, multiple: f64) {
        self.push(Call::SetSpeed(multiple));
    }
}

impl LockScreen for RecordingPlayer {
    fn set_now_playing(&self, now_playing: &NowPlaying) {
        self.push(Call::NowPlaying(now_playing.clone()));
    }

    fn update_elapsed_time(&self, needle: Needle) {
        self.push(Call::Elapsed(needle));
    }

    fn update_playback_duration(&self, duration: Seconds) {
        self.push(Call::Duration(duration));
    }

    fn update_playing_status(&self, is_playing: bool) {
        self.push(Call::Playing(is_playing));
    }
}

/// Media store with nothing persisted unless told otherwise.
#[derive(Default)]
pub struct FakeStore {
    pub persisted: Mutex<Vec<(Url, Url)>>,
    pub deleted: Mutex<Vec<Url>>,
}

impl MediaStore for FakeStore {
    fn persisted_url(&self, remote: &Url) -> Option<Url> {
        self.persisted
            .lock()
            .iter()
            .find(|(r, _)| r == remote)
            .map(|(_, saved)| saved.clone())
    }

    fn start_download(&self, remote: &Url, on_complete: DownloadCallback) {
        let saved = Url::parse("file:///cache/done.mp3").unwrap();
        self.persisted.lock().push((remote.clone(), saved.clone()));
        on_complete(saved);
    }

    fn delete_download(&self, remote: &Url) {
        self.persisted.lock().retain(|(r, _)| r != remote);
        self.deleted.lock().push(remote.clone());
    }
}

pub struct Harness {
    pub director: Arc<ClockDirector>,
    pub player: Arc<RecordingPlayer>,
    pub store: Arc<FakeStore>,
    pub presenter: Arc<PlaybackPresenter>,
}

pub fn harness() -> Harness {
    harness_with(PlayerConfig::default())
}

pub fn harness_with(config: PlayerConfig) -> Harness {
    let director = Arc::new(ClockDirector::new());
    let player = Arc::new(RecordingPlayer::default());
    let store = Arc::new(FakeStore::default());
    let weak_player = Arc::downgrade(&player);
    let delegate: Weak<dyn PlayerDelegate> = weak_player;
    let presenter = PlaybackPresenter::new(
        Arc::clone(&director),
        delegate,
        store.clone(),
        &config,
    );
    Harness {
        director,
        player,
        store,
        presenter,
    }
}

pub fn url(raw: &str) -> Url {
    Url::parse(raw).unwrap()
}

pub fn key(raw: &str) -> TrackKey {
    TrackKey::parse(raw).unwrap()
}
