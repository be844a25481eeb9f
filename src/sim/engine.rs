use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

use crate::director::{
    ClockDirector, DurationChannel, Needle, NeedleChannel, PlayingStatusChannel, Seconds,
};
use crate::key::TrackKey;
use crate::presenter::{EngineControl, EngineEvent};

#[derive(Debug, Clone, PartialEq)]
pub enum EngineCommand {
    Start(TrackKey),
    Play,
    Pause,
    Seek(Needle),
    SetSpeed(f64),
}

/// Cloneable sender side of a running `SimulatedEngine`.
#[derive(Debug, Clone)]
pub struct EngineHandle {
    tx: mpsc::UnboundedSender<EngineCommand>,
}

impl EngineHandle {
    pub fn new(tx: mpsc::UnboundedSender<EngineCommand>) -> Self {
        Self { tx }
    }

    fn send(&self, command: EngineCommand) {
        if let Err(e) = self.tx.send(command) {
            warn!(command = ?e.0, "engine stopped, command dropped");
        }
    }
}

impl EngineControl for EngineHandle {
    fn start_streamed(&self, key: &TrackKey, remote: &Url) {
        debug!(url = %remote, "start streamed");
        self.send(EngineCommand::Start(key.clone()));
    }

    fn start_downloaded(&self, key: &TrackKey, saved: &Url) {
        debug!(url = %saved, "start downloaded");
        self.send(EngineCommand::Start(key.clone()));
    }

    fn play(&self) {
        self.send(EngineCommand::Play);
    }

    fn pause(&self) {
        self.send(EngineCommand::Pause);
    }

    fn seek(&self, needle: Needle) {
        self.send(EngineCommand::Seek(needle));
    }

    fn set_speed(&self, multiple: f64) {
        self.send(EngineCommand::SetSpeed(multiple));
    }
}

/// Fake decoder. Every track is `track_length` seconds long; the needle advances
/// by the tick interval times the speed multiple while playing.
pub struct SimulatedEngine {
    director: Arc<ClockDirector>,
    commands: mpsc::UnboundedReceiver<EngineCommand>,
    events: mpsc::UnboundedSender<EngineEvent>,
    tick: Duration,
    track_length: Seconds,
    key: Option<TrackKey>,
    needle: Needle,
    playing: bool,
    speed: f64,
}

impl SimulatedEngine {
    /// Spawns the engine loop. Returns the command handle, the engine event stream
    /// and the task handle. The loop ends on cancellation or when every handle is dropped.
    pub fn spawn(
        director: Arc<ClockDirector>,
        tick: Duration,
        track_length: Seconds,
        cancel: CancellationToken,
    ) -> (EngineHandle, mpsc::UnboundedReceiver<EngineEvent>, JoinHandle<()>) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let engine = SimulatedEngine {
            director,
            commands: command_rx,
            events: event_tx,
            tick,
            track_length,
            key: None,
            needle: 0.0,
            playing: false,
            speed: 1.0,
        };
        let task = tokio::spawn(engine.run(cancel));

        (EngineHandle::new(command_tx), event_rx, task)
    }

    async fn run(mut self, cancel: CancellationToken) {
        info!(tick_ms = self.tick.as_millis() as u64, "simulated engine started");

        let mut cadence = interval(self.tick);
        cadence.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                command = self.commands.recv() => match command {
                    Some(command) => self.apply(command),
                    None => break,
                },
                _ = cadence.tick() => self.advance(),
            }
        }

        info!("simulated engine stopped");
    }

    fn apply(&mut self, command: EngineCommand) {
        match command {
            EngineCommand::Start(key) => {
                self.key = Some(key);
                self.needle = 0.0;
                self.playing = true;
                self.report_duration();
                self.report_needle();
                self.report_playing();
            }
            EngineCommand::Play => {
                self.playing = self.key.is_some();
                self.report_playing();
            }
            EngineCommand::Pause => {
                self.playing = false;
                self.report_playing();
            }
            EngineCommand::Seek(needle) => {
                self.needle = needle.clamp(0.0, self.track_length);
                self.report_needle();
            }
            EngineCommand::SetSpeed(multiple) => self.speed = multiple,
        }
    }

    fn advance(&mut self) {
        if !self.playing {
            return;
        }
        self.needle += self.tick.as_secs_f64() * self.speed;
        if self.needle >= self.track_length {
            self.needle = self.track_length;
            self.playing = false;
            self.report_needle();
            self.report_playing();
            if let Some(key) = &self.key {
                let _ = self.events.send(EngineEvent::EndedPlaying(key.clone()));
            }
        } else {
            self.report_needle();
        }
    }

    fn report_duration(&self) {
        if let Some(key) = &self.key {
            self.director.broadcast(DurationChannel, key, self.track_length);
        }
    }

    fn report_needle(&self) {
        if let Some(key) = &self.key {
            self.director.broadcast(NeedleChannel, key, self.needle);
        }
    }

    fn report_playing(&self) {
        if let Some(key) = &self.key {
            self.director.broadcast(PlayingStatusChannel, key, self.playing);
        }
    }
}
