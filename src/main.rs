use std::path::PathBuf;
use std::sync::{Arc, Weak};

use anyhow::Context;
use clap::Parser;
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;
use url::Url;

use playclock::presenter::{LockScreenInfo, PlayerDelegate, RemoteCommand, RemoteCommandCenter};
use playclock::sim::{InMemoryMediaStore, SimulatedEngine, SimulatedPlayer, TracingLockScreen};
use playclock::{ClockDirector, PlaybackPresenter, PlayerConfig};

const DEFAULT_TRACKS: [&str; 2] = [
    "https://media.example.com/episodes/first.mp3",
    "https://media.example.com/episodes/second.mp3?quality=high",
];

/// Plays tracks on a simulated engine and logs the routed telemetry.
#[derive(Parser, Debug)]
#[command(name = "playclock", version)]
struct Args {
    /// TOML configuration file.
    #[arg(long, env = "PLAYCLOCK_CONFIG")]
    config: Option<PathBuf>,

    /// Wall-clock seconds to spend on each track.
    #[arg(long, default_value_t = 3)]
    seconds: u64,

    /// Length of every simulated track, in seconds.
    #[arg(long, default_value_t = 120.0)]
    track_length: f64,

    /// Track locators to play in order.
    tracks: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => PlayerConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => PlayerConfig::default(),
    };
    config.apply_env_overrides()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();
    info!("Playclock booting...");

    let director = ClockDirector::shared();
    let cancel = CancellationToken::new();

    let (engine, mut engine_events, engine_task) = SimulatedEngine::spawn(
        Arc::clone(&director),
        Duration::from_millis(config.tick_interval_ms),
        args.track_length,
        cancel.clone(),
    );
    let player = Arc::new(SimulatedPlayer {
        engine,
        lock_screen: TracingLockScreen::new(),
    });
    let weak_player = Arc::downgrade(&player);
    let delegate: Weak<dyn PlayerDelegate> = weak_player;
    let store = Arc::new(InMemoryMediaStore::new(Url::parse("file:///downloads/")?));

    let presenter = PlaybackPresenter::new(Arc::clone(&director), delegate, store, &config);
    let remote = RemoteCommandCenter::new(&presenter);

    let tracks: Vec<String> = if args.tracks.is_empty() {
        DEFAULT_TRACKS.iter().map(|t| t.to_string()).collect()
    } else {
        args.tracks.clone()
    };

    for (index, raw) in tracks.iter().enumerate() {
        let url = Url::parse(raw).with_context(|| format!("invalid track locator {:?}", raw))?;

        presenter.handle_lockscreen_info(LockScreenInfo {
            title: format!("Track {}", index + 1),
            artist: "Playclock".to_string(),
            release_date: 0,
            artwork: None,
        });
        presenter.handle_play_audio(&url);

        let dwell = tokio::time::sleep(Duration::from_secs(args.seconds));
        tokio::pin!(dwell);
        loop {
            tokio::select! {
                _ = &mut dwell => break,
                Some(event) = engine_events.recv() => presenter.handle_engine_event(event),
            }
        }

        let skip = remote.handle(RemoteCommand::SkipForward);
        let toggle = remote.handle(RemoteCommand::TogglePlayPause);
        info!(?skip, ?toggle, needle = ?presenter.needle(), "remote commands issued");
    }

    let snapshot = director.telemetry_snapshot();
    info!(snapshot = %serde_json::to_string(&snapshot)?, "routing telemetry");
    info!(lock_screen = ?player.lock_screen.state(), "final lock screen");

    cancel.cancel();
    engine_task.await?;
    Ok(())
}
