mod common;

use common::*;
use squarekey_core::{Action, DeviceCode, KeyState, SwipeDirection};

#[test]
fn test_shift_round_trip() {
    let mut engine = create_engine(SHIFT_KEYBOARD);
    assert_eq!(engine.key_label(1, 0, SwipeDirection::None), "Shift");
    assert_eq!(engine.key_label(0, 0, SwipeDirection::None), "a");

    tap(&mut engine, 1, 0);
    assert_eq!(engine.current_state(), "caps");
    assert_eq!(engine.key_label(0, 0, SwipeDirection::None), "A");
    assert_eq!(engine.key_label(1, 0, SwipeDirection::None), "shift");

    tap(&mut engine, 1, 0);
    assert_eq!(engine.current_state(), "main");
    assert_eq!(engine.key_label(0, 0, SwipeDirection::None), "a");
}

#[test]
fn test_typing_in_each_state() {
    let mut engine = create_engine(SHIFT_KEYBOARD);
    assert_eq!(tap(&mut engine, 0, 1), vec![text("b")]);
    assert_eq!(tap(&mut engine, 1, 0), vec![Action::Redraw]);
    assert_eq!(tap(&mut engine, 0, 1), vec![text("B")]);
    // a plain state switch persists across typing
    assert_eq!(engine.current_state(), "caps");
    assert_eq!(tap(&mut engine, 1, 1), vec![Action::Device(DeviceCode::Enter)]);
}

#[test]
fn test_state_switch_disarms_slot() {
    let mut engine = create_engine(SHIFT_KEYBOARD);
    tap(&mut engine, 1, 0);
    assert_eq!(engine.active_meta_slot(), None);
    assert!(!engine.dead_overlay_active());
    assert_eq!(engine.key_state(1, 0, SwipeDirection::None), KeyState::Normal);
}

const LATCHED: &str = r#"
size 1 3
layout letters {
a b S1
}
layout digits {
1 2 *
}
state main {
  layout letters
  S1 123 deadlatch numbers
}
state numbers {
  layout digits letters
  S1 abc state main
}
"#;

#[test]
fn test_latched_key_previews_target() {
    let mut engine = create_engine(LATCHED);
    assert_eq!(engine.key_label(0, 2, SwipeDirection::None), "123");

    assert_eq!(tap(&mut engine, 0, 2), vec![Action::Redraw]);
    assert_eq!(engine.current_state(), "main");
    assert!(engine.dead_overlay_active());
    assert_eq!(engine.active_meta_slot(), Some(1));

    assert_eq!(
        labels(&engine, SwipeDirection::None),
        vec![vec!["1".to_string(), "2".to_string(), "123".to_string()]]
    );
    assert_eq!(engine.key_state(0, 0, SwipeDirection::None), KeyState::DeadKey);
    assert_eq!(engine.key_state(0, 2, SwipeDirection::None), KeyState::DeadMeta);
}

#[test]
fn test_latched_key_types_once() {
    let mut engine = create_engine(LATCHED);
    tap(&mut engine, 0, 2);

    assert_eq!(tap(&mut engine, 0, 0), vec![text("1"), Action::Redraw]);
    assert_eq!(engine.current_state(), "main");
    assert!(!engine.dead_overlay_active());
    assert_eq!(engine.active_meta_slot(), None);
    assert_eq!(engine.key_label(0, 0, SwipeDirection::None), "a");
}

#[test]
fn test_latched_key_second_press_commits() {
    let mut engine = create_engine(LATCHED);
    tap(&mut engine, 0, 2);

    assert_eq!(tap(&mut engine, 0, 2), vec![Action::Redraw]);
    assert_eq!(engine.current_state(), "numbers");
    assert!(!engine.dead_overlay_active());
    assert_eq!(engine.active_meta_slot(), None);
    assert_eq!(
        labels(&engine, SwipeDirection::None),
        vec![vec!["1".to_string(), "2".to_string(), "abc".to_string()]]
    );

    // plain state key back
    assert_eq!(tap(&mut engine, 0, 2), vec![Action::Redraw]);
    assert_eq!(engine.current_state(), "main");
}

#[test]
fn test_external_slot_key() {
    let config = r#"
size 1 2
layout a {
x S3
}
state main {
  layout a
  S3 kbd state CHANGE
}
"#;
    let mut engine = create_engine(config);
    assert_eq!(engine.key_label(0, 1, SwipeDirection::None), "kbd");
    assert_eq!(
        tap(&mut engine, 0, 1),
        vec![Action::ExternalModeChange, Action::Redraw]
    );
    // handing off to the embedder leaves nothing armed
    assert_eq!(engine.active_meta_slot(), None);
    assert_eq!(engine.key_state(0, 1, SwipeDirection::None), KeyState::Normal);
    assert_eq!(
        tap(&mut engine, 0, 1),
        vec![Action::ExternalModeChange, Action::Redraw]
    );
    assert_eq!(engine.active_meta_slot(), None);
    assert_eq!(engine.current_state(), "main");
}

#[test]
fn test_unbound_slot_is_inert() {
    let config = r#"
size 1 2
layout a {
x S2
}
state main {
  layout a
}
"#;
    let mut engine = create_engine(config);
    assert_eq!(engine.key_label(0, 1, SwipeDirection::None), "");
    assert!(tap(&mut engine, 0, 1).is_empty());
    assert_eq!(engine.active_meta_slot(), None);
    assert_eq!(engine.key_state(0, 1, SwipeDirection::None), KeyState::Normal);
}
