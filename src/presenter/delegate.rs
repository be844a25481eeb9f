use url::Url;

use crate::director::{Needle, Seconds};
use crate::key::TrackKey;

/// Metadata shown by the system "now playing" surface.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LockScreenInfo {
    pub title: String,
    pub artist: String,
    /// Unix seconds.
    pub release_date: i64,
    pub artwork: Option<Vec<u8>>,
}

/// Full now-playing record handed to the lock screen once a duration is known.
#[derive(Debug, Clone, PartialEq)]
pub struct NowPlaying {
    pub title: String,
    pub artist: String,
    pub album_title: String,
    pub album_artist: String,
    pub duration: Seconds,
    /// Starts at zero; the lock screen would keep ticking a paused track otherwise.
    pub playback_rate: f64,
    pub release_date: i64,
    /// Empty when the track has no artwork.
    pub artwork: Vec<u8>,
}

impl NowPlaying {
    pub fn new(info: &LockScreenInfo, duration: Seconds) -> Self {
        Self {
            title: info.title.clone(),
            artist: info.artist.clone(),
            album_title: info.artist.clone(),
            album_artist: info.artist.clone(),
            duration,
            playback_rate: 0.0,
            release_date: info.release_date,
            artwork: info.artwork.clone().unwrap_or_default(),
        }
    }
}

/// Commands the presenter sends to the audio engine.
pub trait EngineControl: Send + Sync {
    fn start_streamed(&self, key: &TrackKey, remote: &Url);
    fn start_downloaded(&self, key: &TrackKey, saved: &Url);
    fn play(&self);
    fn pause(&self);
    fn seek(&self, needle: Needle);
    fn set_speed(&self, multiple: f64);
}

/// Receives accepted telemetry for the active track.
pub trait LockScreen: Send + Sync {
    fn set_now_playing(&self, now_playing: &NowPlaying);
    fn update_elapsed_time(&self, needle: Needle);
    fn update_playback_duration(&self, duration: Seconds);
    fn update_playing_status(&self, is_playing: bool);
}

/// Owner of the presenter: drives the engine and renders the lock screen.
pub trait PlayerDelegate: EngineControl + LockScreen {}

impl<T: EngineControl + LockScreen> PlayerDelegate for T {}

pub type DownloadCallback = Box<dyn FnOnce(Url) + Send + 'static>;

/// Download/cache layer resolving remote locators to persisted local copies.
pub trait MediaStore: Send + Sync {
    fn persisted_url(&self, remote: &Url) -> Option<Url>;
    fn start_download(&self, remote: &Url, on_complete: DownloadCallback);
    fn delete_download(&self, remote: &Url);
}

/// Signals reported by the engine outside the telemetry channels, tagged with
/// the key of the track the engine was processing.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    Failed { key: TrackKey, reason: String },
    EndedPlaying(TrackKey),
}

impl EngineEvent {
    pub fn key(&self) -> &TrackKey {
        match self {
            EngineEvent::Failed { key, .. } => key,
            EngineEvent::EndedPlaying(key) => key,
        }
    }
}
