use std::sync::{Arc, Weak};

use tracing::debug;

use super::{PlaybackPresenter, SkipIntervals};
use crate::director::Needle;

/// Commands raised by lock-screen or hardware media controls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RemoteCommand {
    Play,
    Pause,
    TogglePlayPause,
    SkipForward,
    SkipBackward,
    ChangePlaybackPosition(Needle),
    SetSpeed(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Success,
    CommandFailed,
}

/// Routes remote commands to a presenter it does not keep alive.
#[derive(Debug, Clone)]
pub struct RemoteCommandCenter {
    presenter: Weak<PlaybackPresenter>,
}

impl RemoteCommandCenter {
    pub fn new(presenter: &Arc<PlaybackPresenter>) -> Self {
        Self {
            presenter: Arc::downgrade(presenter),
        }
    }

    pub fn handle(&self, command: RemoteCommand) -> CommandStatus {
        let Some(presenter) = self.presenter.upgrade() else {
            debug!(?command, "presenter gone, remote command failed");
            return CommandStatus::CommandFailed;
        };

        match command {
            RemoteCommand::Play => {
                if presenter.is_playing() {
                    return CommandStatus::CommandFailed;
                }
                presenter.handle_play();
            }
            RemoteCommand::Pause => {
                if !presenter.is_playing() {
                    return CommandStatus::CommandFailed;
                }
                presenter.handle_pause();
            }
            RemoteCommand::TogglePlayPause => presenter.handle_toggle_playing_and_pausing(),
            RemoteCommand::SkipForward => presenter.handle_skip_forward(),
            RemoteCommand::SkipBackward => presenter.handle_skip_backward(),
            RemoteCommand::ChangePlaybackPosition(needle) => {
                presenter.handle_seek(needle);
            }
            RemoteCommand::SetSpeed(multiple) => {
                if let Err(e) = presenter.handle_set_speed(multiple) {
                    debug!(error = %e, "remote speed change rejected");
                    return CommandStatus::CommandFailed;
                }
            }
        }
        CommandStatus::Success
    }

    /// Intervals advertised on the skip buttons, if the presenter is still alive.
    pub fn preferred_intervals(&self) -> Option<SkipIntervals> {
        self.presenter.upgrade().map(|p| p.skip_intervals())
    }
}
