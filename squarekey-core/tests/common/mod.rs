use squarekey_core::{Action, SquareKeyboard, SwipeDirection};

/// Compile a layout file and start an engine that records its actions
pub fn create_engine(config: &str) -> SquareKeyboard<Vec<Action>> {
    let keyboard = sklc::compile_str(config).expect("layout should compile");
    SquareKeyboard::new(keyboard, Vec::new())
}

/// Tap a cell and return what the engine emitted for it
pub fn tap(engine: &mut SquareKeyboard<Vec<Action>>, row: usize, col: usize) -> Vec<Action> {
    press(engine, row, col, SwipeDirection::None)
}

pub fn press(
    engine: &mut SquareKeyboard<Vec<Action>>,
    row: usize,
    col: usize,
    swipe: SwipeDirection,
) -> Vec<Action> {
    engine.press(row, col, swipe);
    std::mem::take(engine.listener_mut())
}

/// Labels of every cell, row by row
#[allow(dead_code)]
pub fn labels(engine: &SquareKeyboard<Vec<Action>>, swipe: SwipeDirection) -> Vec<Vec<String>> {
    (0..engine.rows())
        .map(|row| {
            (0..engine.cols())
                .map(|col| engine.key_label(row, col, swipe))
                .collect()
        })
        .collect()
}

#[allow(dead_code)]
pub fn text(s: &str) -> Action {
    Action::Text(s.to_string())
}

/// The two-state shift keyboard used throughout the tests
#[allow(dead_code)]
pub const SHIFT_KEYBOARD: &str = r#"
size 2 2

layout main {
a b
S0 RET
}

layout mainShift {
A B
S0 RET
}

state main {
  layout main
  S0 "Shift" state caps
}

state caps {
  layout mainShift
  S0 "shift" state main
}
"#;
