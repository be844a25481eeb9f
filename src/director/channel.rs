use serde::{Deserialize, Serialize};

use super::{ChannelRegistry, ClockDirector};

/// Elapsed playback position, in seconds.
pub type Needle = f64;

/// Total track length, in seconds.
pub type Seconds = f64;

/// Runtime name of a telemetry channel, used for logging and telemetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelKind {
    Duration,
    Needle,
    PlayingStatus,
}

mod sealed {
    pub trait Sealed {}
}

/// Type-level channel marker. Fixes the value type a channel carries so a
/// needle subscriber can never be handed a playing-status value.
pub trait Channel: sealed::Sealed + Copy + Send + Sync + 'static {
    type Value: Copy + Send + Sync + std::fmt::Debug + 'static;
    const KIND: ChannelKind;

    #[doc(hidden)]
    fn registry(director: &ClockDirector) -> &ChannelRegistry<Self::Value>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DurationChannel;

#[derive(Debug, Clone, Copy, Default)]
pub struct NeedleChannel;

#[derive(Debug, Clone, Copy, Default)]
pub struct PlayingStatusChannel;

impl Channel for DurationChannel {
    type Value = Seconds;
    const KIND: ChannelKind = ChannelKind::Duration;

    fn registry(director: &ClockDirector) -> &ChannelRegistry<Self::Value> {
        &director.duration
    }
}

impl sealed::Sealed for DurationChannel {}

impl Channel for NeedleChannel {
    type Value = Needle;
    const KIND: ChannelKind = ChannelKind::Needle;

    fn registry(director: &ClockDirector) -> &ChannelRegistry<Self::Value> {
        &director.needle
    }
}

impl sealed::Sealed for NeedleChannel {}

impl Channel for PlayingStatusChannel {
    type Value = bool;
    const KIND: ChannelKind = ChannelKind::PlayingStatus;

    fn registry(director: &ClockDirector) -> &ChannelRegistry<Self::Value> {
        &director.playing_status
    }
}

impl sealed::Sealed for PlayingStatusChannel {}

/// One value on any channel. Lets a producer report through a single entry point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Telemetry {
    Duration(Seconds),
    Needle(Needle),
    PlayingStatus(bool),
}

impl Telemetry {
    pub fn kind(&self) -> ChannelKind {
        match self {
            Telemetry::Duration(_) => ChannelKind::Duration,
            Telemetry::Needle(_) => ChannelKind::Needle,
            Telemetry::PlayingStatus(_) => ChannelKind::PlayingStatus,
        }
    }
}
