//=========================================================================
// Input Processor
//=========================================================================
//
// Converts platform-specific Winit events into shell input.
//
// Architecture:
//   Winit Events → InputProcessor → ShellInput → InputBuffer
//
// Stateful cursor tracking: Winit reports button presses without a
// position, so the last cursor position is cached and attached to
// pointer presses. Positions are converted to logical pixels using the
// window scale factor. Releases, key repeats and unmapped keys are
// filtered (returns None).
//
//=========================================================================

//=== External Dependencies ===============================================

use winit::{
    event::{ElementState, KeyEvent, MouseButton},
    keyboard::{KeyCode as WinitKeyCode, PhysicalKey},
};

//=== Internal Dependencies ===============================================

use crate::core::geometry::Point;
use crate::core::input::{KeyCode, ShellInput};

//=== InputProcessor ======================================================

pub(crate) struct InputProcessor {
    cursor: Point,
    scale_factor: f64,
}

impl InputProcessor {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new() -> Self {
        Self {
            cursor: Point::ZERO,
            scale_factor: 1.0,
        }
    }

    //--- Window State -----------------------------------------------------

    pub(crate) fn set_scale_factor(&mut self, scale_factor: f64) {
        if scale_factor > 0.0 {
            self.scale_factor = scale_factor;
        }
    }

    pub(crate) fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    pub(crate) fn cursor(&self) -> Point {
        self.cursor
    }

    //--- Event Processing -------------------------------------------------

    pub(crate) fn process_key_event(&self, key_event: &KeyEvent) -> Option<ShellInput> {
        map_key(key_event.physical_key, key_event.state, key_event.repeat)
    }

    /// Left presses become pointer presses at the cached cursor position.
    pub(crate) fn process_mouse_button(
        &self,
        button: MouseButton,
        state: ElementState,
    ) -> Option<ShellInput> {
        match (button, state) {
            (MouseButton::Left, ElementState::Pressed) => Some(ShellInput::PointerDown(self.cursor)),
            _ => None,
        }
    }

    /// Caches the cursor (physical pixels in) and reports the move.
    pub(crate) fn process_cursor_moved(&mut self, x: f64, y: f64) -> ShellInput {
        self.cursor = Point::new(
            (x / self.scale_factor) as f32,
            (y / self.scale_factor) as f32,
        );
        ShellInput::PointerMoved(self.cursor)
    }
}

//--- Key Mapping ---------------------------------------------------------

fn map_key(key: PhysicalKey, state: ElementState, repeat: bool) -> Option<ShellInput> {
    if state != ElementState::Pressed || repeat {
        return None;
    }

    let key_code = match key {
        PhysicalKey::Code(code) => KeyCode::from(code),
        _ => return None,
    };

    if matches!(key_code, KeyCode::Unidentified) {
        return None;
    }

    Some(ShellInput::KeyDown(key_code))
}

//=========================================================================
// Winit Conversions
//=========================================================================

/// Converts Winit physical key codes to shell key codes.
///
/// Top-row and numpad digits map to the same code. Anything the shell
/// does not react to returns `KeyCode::Unidentified`.
impl From<WinitKeyCode> for KeyCode {
    fn from(code: WinitKeyCode) -> Self {
        use WinitKeyCode::*;
        match code {
            //--- Digits -------------------------------------------------------

            Digit1 | Numpad1 => KeyCode::Digit1,
            Digit2 | Numpad2 => KeyCode::Digit2,
            Digit3 | Numpad3 => KeyCode::Digit3,
            Digit4 | Numpad4 => KeyCode::Digit4,
            Digit5 | Numpad5 => KeyCode::Digit5,
            Digit6 | Numpad6 => KeyCode::Digit6,
            Digit7 | Numpad7 => KeyCode::Digit7,
            Digit8 | Numpad8 => KeyCode::Digit8,
            Digit9 | Numpad9 => KeyCode::Digit9,

            //--- Special ------------------------------------------------------

            Escape => KeyCode::Escape,
            Enter | NumpadEnter => KeyCode::Enter,

            //--- Unmapped (return Unidentified) -------------------------------

            _ => KeyCode::Unidentified,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    //=====================================================================
    // Key Mapping
    //=====================================================================

    #[test]
    fn digits_and_numpad_map_alike() {
        assert_eq!(KeyCode::from(WinitKeyCode::Digit2), KeyCode::Digit2);
        assert_eq!(KeyCode::from(WinitKeyCode::Numpad2), KeyCode::Digit2);
        assert_eq!(KeyCode::from(WinitKeyCode::KeyQ), KeyCode::Unidentified);
    }

    #[test]
    fn pressed_key_becomes_key_down() {
        let input = map_key(PhysicalKey::Code(WinitKeyCode::Escape), ElementState::Pressed, false);
        assert_eq!(input, Some(ShellInput::KeyDown(KeyCode::Escape)));
    }

    #[test]
    fn releases_and_repeats_are_filtered() {
        let key = PhysicalKey::Code(WinitKeyCode::Digit1);
        assert_eq!(map_key(key, ElementState::Released, false), None);
        assert_eq!(map_key(key, ElementState::Pressed, true), None);
    }

    #[test]
    fn unmapped_keys_are_filtered() {
        let key = PhysicalKey::Code(WinitKeyCode::F13);
        assert_eq!(map_key(key, ElementState::Pressed, false), None);
    }

    //=====================================================================
    // Pointer
    //=====================================================================

    #[test]
    fn press_uses_last_cursor_position() {
        let mut processor = InputProcessor::new();
        processor.process_cursor_moved(120.0, 45.0);

        let input = processor.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        assert_eq!(input, Some(ShellInput::PointerDown(Point::new(120.0, 45.0))));
    }

    #[test]
    fn cursor_is_converted_to_logical_pixels() {
        let mut processor = InputProcessor::new();
        processor.set_scale_factor(2.0);

        let moved = processor.process_cursor_moved(200.0, 100.0);
        assert_eq!(moved, ShellInput::PointerMoved(Point::new(100.0, 50.0)));
        assert_eq!(processor.cursor(), Point::new(100.0, 50.0));
    }

    #[test]
    fn invalid_scale_factor_is_ignored() {
        let mut processor = InputProcessor::new();
        processor.set_scale_factor(0.0);
        assert_eq!(processor.scale_factor(), 1.0);
    }

    #[test]
    fn other_buttons_and_releases_are_ignored() {
        let processor = InputProcessor::new();
        assert_eq!(processor.process_mouse_button(MouseButton::Right, ElementState::Pressed), None);
        assert_eq!(processor.process_mouse_button(MouseButton::Left, ElementState::Released), None);
    }
}
