mod common;

use common::{harness, harness_with, key, url, Call};
use playclock::director::{NeedleChannel, PlayingStatusChannel};
use playclock::presenter::{CommandStatus, RemoteCommand, RemoteCommandCenter, SkipIntervals};
use playclock::PlayerConfig;

const TRACK: &str = "https://cdn.example.com/show/ep7.mp3";

#[test]
fn test_play_only_succeeds_when_paused() {
    let h = harness();
    let center = RemoteCommandCenter::new(&h.presenter);
    h.presenter.handle_play_audio(&url(TRACK));
    h.player.clear();

    assert_eq!(center.handle(RemoteCommand::Play), CommandStatus::Success);

    h.director.broadcast(PlayingStatusChannel, &key(TRACK), true);
    assert_eq!(center.handle(RemoteCommand::Play), CommandStatus::CommandFailed);

    assert_eq!(h.player.calls(), vec![Call::Play, Call::Playing(true)]);
}

#[test]
fn test_pause_only_succeeds_when_playing() {
    let h = harness();
    let center = RemoteCommandCenter::new(&h.presenter);
    h.presenter.handle_play_audio(&url(TRACK));

    assert_eq!(center.handle(RemoteCommand::Pause), CommandStatus::CommandFailed);

    h.director.broadcast(PlayingStatusChannel, &key(TRACK), true);
    h.player.clear();
    assert_eq!(center.handle(RemoteCommand::Pause), CommandStatus::Success);
    assert_eq!(h.player.calls(), vec![Call::Pause]);
}

#[test]
fn test_position_and_skip_commands_reach_the_engine() {
    let h = harness_with(PlayerConfig {
        skip_forward_seconds: 30.0,
        skip_backward_seconds: 5.0,
        ..PlayerConfig::default()
    });
    let center = RemoteCommandCenter::new(&h.presenter);
    h.presenter.handle_play_audio(&url(TRACK));
    h.director.broadcast(NeedleChannel, &key(TRACK), 20.0);
    h.player.clear();

    assert_eq!(
        center.handle(RemoteCommand::ChangePlaybackPosition(42.0)),
        CommandStatus::Success
    );
    assert_eq!(center.handle(RemoteCommand::SkipForward), CommandStatus::Success);
    assert_eq!(center.handle(RemoteCommand::SkipBackward), CommandStatus::Success);
    assert_eq!(center.handle(RemoteCommand::TogglePlayPause), CommandStatus::Success);

    assert_eq!(
        h.player.calls(),
        vec![Call::Seek(42.0), Call::Seek(50.0), Call::Seek(15.0), Call::Play]
    );
    assert_eq!(
        center.preferred_intervals(),
        Some(SkipIntervals {
            forward: 30.0,
            backward: 5.0
        })
    );
}

#[test]
fn test_invalid_speed_fails_the_command() {
    let h = harness();
    let center = RemoteCommandCenter::new(&h.presenter);

    assert_eq!(center.handle(RemoteCommand::SetSpeed(-1.0)), CommandStatus::CommandFailed);
    assert_eq!(center.handle(RemoteCommand::SetSpeed(2.0)), CommandStatus::Success);
    assert_eq!(h.player.calls(), vec![Call::SetSpeed(2.0)]);
}

#[test]
fn test_commands_fail_once_presenter_is_gone() {
    let h = harness();
    let center = RemoteCommandCenter::new(&h.presenter);
    drop(h.presenter);

    assert_eq!(center.handle(RemoteCommand::Play), CommandStatus::CommandFailed);
    assert_eq!(center.handle(RemoteCommand::SkipForward), CommandStatus::CommandFailed);
    assert_eq!(center.preferred_intervals(), None);
    assert!(h.player.calls().is_empty());
}
