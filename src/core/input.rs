//=========================================================================
// Shell Input
//
// Normalised input delivered to the active scene. The platform layer
// converts Winit events into these; scenes never see Winit types.
//
// Only what the shell reacts to is modelled: digit keys (menu
// selection), Escape (back to menu), and pointer presses/moves
// (menu entries and the back control).
//
//=========================================================================

use super::geometry::Point;

//=== KeyCode Enum ========================================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Digit1, Digit2, Digit3, Digit4, Digit5,
    Digit6, Digit7, Digit8, Digit9,
    Escape,
    Enter,

    //--- Fallback ---------------------------------------------------------
    Unidentified,
}

impl KeyCode {
    /// Zero-based menu slot for digit keys (`Digit1` → 0).
    pub fn digit_index(self) -> Option<usize> {
        use KeyCode::*;
        match self {
            Digit1 => Some(0),
            Digit2 => Some(1),
            Digit3 => Some(2),
            Digit4 => Some(3),
            Digit5 => Some(4),
            Digit6 => Some(5),
            Digit7 => Some(6),
            Digit8 => Some(7),
            Digit9 => Some(8),
            _ => None,
        }
    }
}

//=== ShellInput Enum =====================================================
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShellInput {
    KeyDown(KeyCode),
    PointerDown(Point),
    PointerMoved(Point),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digit_keys_map_to_slots() {
        assert_eq!(KeyCode::Digit1.digit_index(), Some(0));
        assert_eq!(KeyCode::Digit9.digit_index(), Some(8));
        assert_eq!(KeyCode::Escape.digit_index(), None);
    }
}
