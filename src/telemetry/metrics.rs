use std::collections::VecDeque;

use serde::Serialize;

use super::event::TelemetryEvent;
use crate::director::channel::ChannelKind;

#[derive(Debug, Clone, Default, Serialize)]
pub struct TelemetrySnapshot {
    pub duration: ChannelStats,
    pub needle: ChannelStats,
    pub playing_status: ChannelStats,
    pub track_switches: u64,
    pub engine_failures: u64,
    pub stale_engine_events: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChannelStats {
    pub attached: u64,
    pub detached: u64,
    pub redundant_detaches: u64,
    pub broadcasts: u64,
    pub deliveries: u64,
    pub owner_gone: u64,
    pub misfires: u64,
    pub avg_fanout: f64,
}

impl TelemetrySnapshot {
    pub fn channel(&self, kind: ChannelKind) -> &ChannelStats {
        match kind {
            ChannelKind::Duration => &self.duration,
            ChannelKind::Needle => &self.needle,
            ChannelKind::PlayingStatus => &self.playing_status,
        }
    }

    fn channel_mut(&mut self, kind: ChannelKind) -> &mut ChannelStats {
        match kind {
            ChannelKind::Duration => &mut self.duration,
            ChannelKind::Needle => &mut self.needle,
            ChannelKind::PlayingStatus => &mut self.playing_status,
        }
    }

    pub fn total_misfires(&self) -> u64 {
        self.duration.misfires + self.needle.misfires + self.playing_status.misfires
    }
}

pub fn compute_snapshot(events: &VecDeque<TelemetryEvent>) -> TelemetrySnapshot {
    let mut snap = TelemetrySnapshot::default();

    for event in events {
        match event {
            TelemetryEvent::Attached { channel } => snap.channel_mut(*channel).attached += 1,
            TelemetryEvent::Detached { channel } => snap.channel_mut(*channel).detached += 1,
            TelemetryEvent::RedundantDetach { channel } => {
                snap.channel_mut(*channel).redundant_detaches += 1
            }
            TelemetryEvent::Broadcast { channel, delivered } => {
                let stats = snap.channel_mut(*channel);
                stats.broadcasts += 1;
                stats.deliveries += u64::from(*delivered);
            }
            TelemetryEvent::OwnerGone { channel } => snap.channel_mut(*channel).owner_gone += 1,
            TelemetryEvent::Misfire { channel } => snap.channel_mut(*channel).misfires += 1,
            TelemetryEvent::TrackSwitched => snap.track_switches += 1,
            TelemetryEvent::EngineFailed => snap.engine_failures += 1,
            TelemetryEvent::StaleEngineEvent => snap.stale_engine_events += 1,
        }
    }

    for stats in [&mut snap.duration, &mut snap.needle, &mut snap.playing_status] {
        if stats.broadcasts > 0 {
            stats.avg_fanout = stats.deliveries as f64 / stats.broadcasts as f64;
        }
    }

    snap
}
