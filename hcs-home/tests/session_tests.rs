//! Home session integration tests
//!
//! Drive `HomeSession::dispatch` / `tick` with scripted input and inspect
//! navigation state, emitted events, and the media calls recorded by the
//! test engine.

mod helpers;

use hcs_common::events::{HomeEvent, Section};
use hcs_home::input::{KeyInput, PointerTarget, RawInput};
use hcs_home::media::CueId;
use helpers::{Harness, MediaCall};

fn hover_indices(events: &[HomeEvent]) -> Vec<(Section, usize)> {
    events
        .iter()
        .filter_map(|event| match event {
            HomeEvent::Hover { section, index, .. } => Some((*section, *index)),
            _ => None,
        })
        .collect()
}

fn granted_count(events: &[HomeEvent]) -> usize {
    events
        .iter()
        .filter(|event| matches!(event, HomeEvent::InteractionGranted { .. }))
        .count()
}

#[test]
fn test_click_right_enter_launches_second_game() {
    let mut h = Harness::with_games(5, None);
    let mut events = Vec::new();

    events.extend(h.input_at(RawInput::Click { target: None }, 0));
    events.extend(h.input_at(RawInput::Key(KeyInput::Right), 10));
    events.extend(h.input_at(RawInput::Key(KeyInput::Enter), 20));

    assert_eq!(granted_count(&events), 1);
    assert_eq!(h.session.navigation().selected_game_index, 1);
    let launched: Vec<usize> = events
        .iter()
        .filter_map(|event| match event {
            HomeEvent::GameLaunched { index, embedded, .. } => {
                assert!(!embedded);
                Some(*index)
            }
            _ => None,
        })
        .collect();
    assert_eq!(launched, vec![1]);

    let view = h.session.view();
    assert_eq!(view.launching_game, Some(1));
    assert!(view.interaction_granted);
    assert!(!view.help_visible);
    assert!(h.engine.plays().contains(&CueId::Launch));
}

#[test]
fn test_next_wraps_on_four_games() {
    let mut h = Harness::with_games(4, None);
    for _ in 0..3 {
        h.key(KeyInput::Right);
    }
    assert_eq!(h.session.navigation().selected_game_index, 3);

    h.key(KeyInput::Right);
    assert_eq!(h.session.navigation().selected_game_index, 0);
}

#[test]
fn test_prev_on_icons_wraps_and_plays_hover() {
    let mut h = Harness::with_games(5, None);
    h.key(KeyInput::Down);
    assert_eq!(h.session.navigation().focused_section, Section::Icons);
    h.engine.take();

    let events = h.key(KeyInput::Left);
    assert_eq!(hover_indices(&events), vec![(Section::Icons, 6)]);
    assert_eq!(h.session.navigation().selected_icon_index, 6);
    assert_eq!(h.engine.plays(), vec![CueId::Hover]);
}

#[test]
fn test_double_right_produces_two_steps() {
    let mut h = Harness::with_games(5, None);
    let mut events = h.key(KeyInput::Right);
    events.extend(h.key(KeyInput::Right));

    assert_eq!(
        hover_indices(&events),
        vec![(Section::Games, 1), (Section::Games, 2)]
    );
    assert_eq!(h.session.navigation().selected_game_index, 2);
    // Priming play plus two real plays, each a rewind of the same cue
    assert_eq!(h.engine.count(&MediaCall::Play(CueId::Hover)), 3);
}

#[test]
fn test_focus_toggle_is_inverse() {
    let mut h = Harness::with_games(5, None);
    h.key(KeyInput::Right);
    h.key(KeyInput::Right);
    let before = h.session.navigation();

    h.key(KeyInput::Down);
    h.key(KeyInput::Up);
    assert_eq!(h.session.navigation(), before);
}

#[test]
fn test_ignored_directions_emit_nothing() {
    let mut h = Harness::with_games(5, None);
    h.key(KeyInput::Char('q'));
    h.engine.take();

    assert!(h.key(KeyInput::Up).is_empty());
    h.key(KeyInput::Down);
    h.engine.take();
    assert!(h.key(KeyInput::Down).is_empty());
    assert!(h.engine.plays().is_empty());
}

#[test]
fn test_nothing_plays_before_first_input() {
    let mut h = Harness::with_games(5, None);
    h.tick_at(500);
    assert!(h.engine.calls().is_empty());
    assert!(!h.session.media().is_granted());
    assert!(h.session.view().help_visible);
}

#[test]
fn test_grant_is_idempotent() {
    let mut h = Harness::with_games(5, None);
    let mut events = Vec::new();
    for offset in [0, 5, 10] {
        events.extend(h.input_at(RawInput::PointerMove { target: None }, offset));
    }

    assert_eq!(granted_count(&events), 1);
    assert_eq!(h.session.media().priming_passes(), 1);
    // hover, launch, and seven icon cues
    let preloads = h
        .engine
        .calls()
        .iter()
        .filter(|call| matches!(call, MediaCall::Preload(_)))
        .count();
    assert_eq!(preloads, 9);
    assert_eq!(h.session.media().gate().icon_cues().len(), 7);
}

#[test]
fn test_priming_is_silent_then_restored() {
    let mut h = Harness::with_games(5, None);
    h.input_at(RawInput::Key(KeyInput::Char('a')), 0);

    let calls = h.engine.take();
    assert!(calls.contains(&MediaCall::SetVolume(CueId::Launch, 0.0)));
    assert!(calls.contains(&MediaCall::Play(CueId::Launch)));

    h.tick_at(199);
    assert!(!h.engine.calls().contains(&MediaCall::Stop(CueId::Launch)));

    h.tick_at(200);
    let calls = h.engine.take();
    assert!(calls.contains(&MediaCall::Stop(CueId::Launch)));
    assert!(calls.contains(&MediaCall::SetVolume(CueId::Launch, 0.6)));
    assert!(calls.contains(&MediaCall::SetVolume(CueId::Icon(6), 0.5)));
    assert!(h.session.next_deadline().is_none());
}

#[test]
fn test_first_hover_during_priming_is_audible() {
    let mut h = Harness::with_games(5, None);
    h.input_at(RawInput::Key(KeyInput::Right), 0);

    let calls = h.engine.calls();
    let restore = calls
        .iter()
        .position(|call| *call == MediaCall::SetVolume(CueId::Hover, 0.5))
        .expect("level restored");
    let last_play = calls
        .iter()
        .rposition(|call| *call == MediaCall::Play(CueId::Hover))
        .expect("hover played");
    assert!(restore < last_play);
}

#[test]
fn test_banner_clears_after_duration() {
    let mut h = Harness::with_games(5, None);
    h.input_at(RawInput::Key(KeyInput::Enter), 0);
    assert_eq!(h.session.view().launching_game, Some(0));

    assert!(h.tick_at(1999).is_empty());
    assert_eq!(h.session.view().launching_game, Some(0));

    let events = h.tick_at(2000);
    assert!(matches!(
        events.as_slice(),
        [HomeEvent::LaunchBannerCleared { .. }]
    ));
    assert_eq!(h.session.view().launching_game, None);
}

#[test]
fn test_relaunch_rearms_banner() {
    let mut h = Harness::with_games(5, None);
    h.input_at(RawInput::Key(KeyInput::Enter), 0);
    h.input_at(RawInput::Key(KeyInput::Right), 1000);
    h.input_at(RawInput::Key(KeyInput::Enter), 1500);

    assert!(h.tick_at(2000).is_empty());
    assert_eq!(h.session.view().launching_game, Some(1));
    assert_eq!(h.tick_at(3500).len(), 1);
}

#[test]
fn test_embedded_game_locks_navigation() {
    let mut h = Harness::with_games(3, Some(1));
    h.key(KeyInput::Right);
    h.engine.take();

    let events = h.key(KeyInput::Enter);
    assert!(matches!(
        events.as_slice(),
        [HomeEvent::GameLaunched { index: 1, embedded: true, .. }]
    ));
    assert!(h.session.is_locked());
    assert!(h.session.view().embedded_game_open);
    assert_eq!(h.session.view().launching_game, None);
    assert_eq!(h.game.opened(), 1);

    let calls = h.engine.take();
    let stop_hover = calls
        .iter()
        .position(|call| *call == MediaCall::Stop(CueId::Hover))
        .expect("stop_all before launch cue");
    let launch = calls
        .iter()
        .position(|call| *call == MediaCall::Play(CueId::Launch))
        .expect("launch cue");
    assert!(stop_hover < launch);

    let before = h.session.navigation();
    for key in [
        KeyInput::Left,
        KeyInput::Right,
        KeyInput::Down,
        KeyInput::Up,
        KeyInput::Enter,
        KeyInput::Space,
    ] {
        assert!(h.key(key).is_empty());
    }
    assert_eq!(h.session.navigation(), before);
    assert_eq!(h.game.keys().len(), 6);
    assert!(h.engine.plays().is_empty());
}

#[test]
fn test_escape_closes_embedded_game() {
    let mut h = Harness::with_games(3, Some(1));
    h.key(KeyInput::Right);
    h.key(KeyInput::Enter);
    h.engine.take();

    let events = h.key(KeyInput::Escape);
    assert!(matches!(
        events.as_slice(),
        [HomeEvent::EmbeddedGameClosed { .. }]
    ));
    assert!(!h.session.is_locked());
    assert!(!h.session.view().embedded_game_open);
    assert_eq!(h.game.closed(), 1);
    assert!(h.engine.calls().contains(&MediaCall::Stop(CueId::Launch)));

    let nav = h.session.navigation();
    assert_eq!(nav.focused_section, Section::Games);
    assert_eq!(nav.selected_game_index, 1);

    h.key(KeyInput::Right);
    assert_eq!(h.session.navigation().selected_game_index, 2);
}

#[test]
fn test_clicking_exit_closes_embedded_game() {
    let mut h = Harness::with_games(3, Some(1));
    h.key(KeyInput::Right);
    h.key(KeyInput::Enter);
    h.engine.take();

    // The dock sits under the modal; clicks there do nothing
    assert!(h
        .input_at(
            RawInput::Click {
                target: Some(PointerTarget::Icon(2)),
            },
            10,
        )
        .is_empty());
    assert!(h.session.is_locked());
    assert!(h.engine.plays().is_empty());

    let events = h.input_at(
        RawInput::Click {
            target: Some(PointerTarget::ExitGame),
        },
        20,
    );
    assert!(matches!(
        events.as_slice(),
        [HomeEvent::EmbeddedGameClosed { .. }]
    ));
    assert!(!h.session.is_locked());
    assert!(!h.session.view().embedded_game_open);
    assert_eq!(h.game.closed(), 1);
    assert!(h.game.keys().is_empty());
    assert_eq!(h.session.navigation().selected_game_index, 1);
}

#[test]
fn test_exit_click_without_open_game_is_ignored() {
    let mut h = Harness::with_games(3, None);
    h.key(KeyInput::Right);

    let events = h.input_at(
        RawInput::Click {
            target: Some(PointerTarget::ExitGame),
        },
        10,
    );
    assert!(events.is_empty());
    assert_eq!(h.game.closed(), 0);
    assert_eq!(h.session.navigation().selected_game_index, 1);
}

#[test]
fn test_pointer_enter_icon_plays_hover_once() {
    let mut h = Harness::with_games(5, None);
    h.input_at(RawInput::PointerMove { target: None }, 0);
    h.engine.take();

    h.input_at(
        RawInput::PointerMove {
            target: Some(PointerTarget::Icon(2)),
        },
        10,
    );
    h.input_at(
        RawInput::PointerMove {
            target: Some(PointerTarget::Icon(2)),
        },
        20,
    );
    assert_eq!(h.engine.plays(), vec![CueId::Hover]);

    h.input_at(RawInput::PointerMove { target: None }, 30);
    h.input_at(
        RawInput::PointerMove {
            target: Some(PointerTarget::Icon(3)),
        },
        40,
    );
    assert_eq!(h.engine.plays(), vec![CueId::Hover, CueId::Hover]);
}

#[test]
fn test_click_icon_plays_its_cue_without_moving_selection() {
    let mut h = Harness::with_games(5, None);
    let before = h.session.navigation();

    let events = h.input_at(
        RawInput::Click {
            target: Some(PointerTarget::Icon(4)),
        },
        0,
    );
    assert!(events.iter().any(|event| matches!(
        event,
        HomeEvent::IconActivated { index: 4, label, .. } if label == "Controllers"
    )));
    assert_eq!(h.session.navigation(), before);
    assert_eq!(h.engine.plays().last(), Some(&CueId::Icon(4)));
}

#[test]
fn test_activate_icon_from_dock() {
    let mut h = Harness::with_games(5, None);
    h.key(KeyInput::Down);
    h.key(KeyInput::Right);
    h.engine.take();

    let events = h.key(KeyInput::Space);
    assert!(matches!(
        events.as_slice(),
        [HomeEvent::IconActivated { index: 1, .. }]
    ));
    assert_eq!(h.engine.plays(), vec![CueId::Icon(1)]);
}

#[test]
fn test_viewport_follows_games_only() {
    let mut h = Harness::with_games(5, None);
    h.key(KeyInput::Right);
    // 352 - 640 + 168 < 0
    assert_eq!(h.session.view().scroll_target, 0.0);

    h.key(KeyInput::Right);
    assert_eq!(h.session.view().scroll_target, 232.0);

    h.key(KeyInput::Down);
    h.key(KeyInput::Right);
    assert_eq!(h.session.view().scroll_target, 232.0);
}

#[test]
fn test_resize_recomputes_target() {
    let mut h = Harness::with_games(5, None);
    h.key(KeyInput::Right);
    h.key(KeyInput::Right);
    h.session.resize(640.0);
    // 704 - 320 + 168
    assert_eq!(h.session.view().scroll_target, 552.0);
}

#[test]
fn test_rejected_playback_is_swallowed() {
    let mut h = Harness::with_games(5, None);
    h.engine.reject_plays(true);

    h.key(KeyInput::Right);
    h.key(KeyInput::Enter);

    assert!(h.session.media().is_granted());
    assert_eq!(h.session.navigation().selected_game_index, 1);
    assert_eq!(h.session.view().launching_game, Some(1));
}

#[test]
fn test_events_published_on_bus() {
    let mut h = Harness::with_games(5, None);
    let mut rx = h.session.bus().subscribe();

    h.key(KeyInput::Right);

    let first = rx.try_recv().unwrap();
    assert_eq!(first.name(), "InteractionGranted");
    let second = rx.try_recv().unwrap();
    assert_eq!(second.name(), "Hover");
    assert!(rx.try_recv().is_err());
}

#[test]
fn test_shutdown_stops_cues() {
    let mut h = Harness::with_games(3, Some(0));
    h.key(KeyInput::Enter);
    h.engine.take();

    h.session.shutdown();
    assert_eq!(h.game.closed(), 1);
    assert!(h.engine.calls().contains(&MediaCall::Stop(CueId::Hover)));
}
