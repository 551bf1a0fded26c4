use std::fmt;

/// Device actions a key can emit instead of text.
///
/// Discriminants are the Windows virtual-key codes, which is what most
/// embedders forward to the host input system.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceCode {
    Backspace = 0x08,      // VK_BACK
    Tab = 0x09,            // VK_TAB
    Enter = 0x0D,          // VK_RETURN
    Escape = 0x1B,         // VK_ESCAPE
    Left = 0x25,           // VK_LEFT
    Up = 0x26,             // VK_UP
    Right = 0x27,          // VK_RIGHT
    Down = 0x28,           // VK_DOWN
}

impl DeviceCode {
    pub const ALL: [DeviceCode; 8] = [
        DeviceCode::Backspace,
        DeviceCode::Enter,
        DeviceCode::Left,
        DeviceCode::Right,
        DeviceCode::Up,
        DeviceCode::Down,
        DeviceCode::Tab,
        DeviceCode::Escape,
    ];

    /// Look up a device code by its layout-file name (`BKSP`, `RET`, ...)
    pub fn from_name(name: &str) -> Option<Self> {
        let code = match name {
            "BKSP" => DeviceCode::Backspace,
            "RET" => DeviceCode::Enter,
            "LEFT" => DeviceCode::Left,
            "RIGHT" => DeviceCode::Right,
            "UP" => DeviceCode::Up,
            "DOWN" => DeviceCode::Down,
            "TAB" => DeviceCode::Tab,
            "ESC" => DeviceCode::Escape,
            _ => return None,
        };
        Some(code)
    }

    /// Name used for this code in layout files
    pub fn name(self) -> &'static str {
        match self {
            DeviceCode::Backspace => "BKSP",
            DeviceCode::Enter => "RET",
            DeviceCode::Left => "LEFT",
            DeviceCode::Right => "RIGHT",
            DeviceCode::Up => "UP",
            DeviceCode::Down => "DOWN",
            DeviceCode::Tab => "TAB",
            DeviceCode::Escape => "ESC",
        }
    }

    /// Glyph drawn on the key face
    pub fn glyph(self) -> &'static str {
        match self {
            DeviceCode::Backspace => "\u{21A4}",
            DeviceCode::Enter => "\u{21B5}",
            DeviceCode::Left => "\u{2190}",
            DeviceCode::Right => "\u{2192}",
            DeviceCode::Up => "\u{2191}",
            DeviceCode::Down => "\u{2193}",
            DeviceCode::Tab => "\u{21B9}",
            DeviceCode::Escape => "Esc",
        }
    }

    pub fn vk_code(self) -> u16 {
        self as u16
    }
}

impl fmt::Display for DeviceCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
