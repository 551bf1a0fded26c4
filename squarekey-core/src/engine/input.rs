//! Input representation for the SquareKeyboard engine
//!
//! The embedder turns raw pointer input into grid coordinates and a swipe
//! direction before handing it to the engine.

/// Swipe gesture that accompanied a touch
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SwipeDirection {
    /// Plain tap
    #[default]
    None = 0,
    LeftRight = 1,
    UpDown = 2,
    /// Preview of the alternate label; never activates a key
    AltLabel = 3,
}

impl SwipeDirection {
    /// Convert a raw direction code, rejecting undefined values
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(SwipeDirection::None),
            1 => Some(SwipeDirection::LeftRight),
            2 => Some(SwipeDirection::UpDown),
            3 => Some(SwipeDirection::AltLabel),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    /// Swipes that select a key to activate (as opposed to previewing)
    pub fn is_activating(self) -> bool {
        matches!(self, SwipeDirection::LeftRight | SwipeDirection::UpDown)
    }
}

impl TryFrom<u8> for SwipeDirection {
    type Error = u8;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::from_code(code).ok_or(code)
    }
}

/// One touch on the keyboard grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyPress {
    pub row: usize,
    pub col: usize,
    pub swipe: SwipeDirection,
}

impl KeyPress {
    pub fn new(row: usize, col: usize, swipe: SwipeDirection) -> Self {
        Self { row, col, swipe }
    }

    /// A tap without any swipe
    pub fn tap(row: usize, col: usize) -> Self {
        Self::new(row, col, SwipeDirection::None)
    }
}
