//=========================================================================
// Input Buffer
//
// Collects shell input between frame boundaries. Acts as a transient
// aggregator between Winit callbacks and the logic thread.
//
// Responsibilities:
// - Keep discrete inputs (key presses, pointer presses) in arrival order
// - Coalesce pointer moves to the latest position
// - Hand the frame's input over in one `drain()`
//
//=========================================================================

use crate::core::input::ShellInput;

pub(crate) struct InputBuffer {
    discrete: Vec<ShellInput>,
    pointer: Option<ShellInput>,
}

impl InputBuffer {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new() -> Self {
        const DISCRETE_BASE: usize = 32;

        Self {
            discrete: Vec::with_capacity(DISCRETE_BASE),
            pointer: None,
        }
    }

    //--- Buffering --------------------------------------------------------

    /// Replaces any pointer move buffered earlier this frame.
    pub(crate) fn push_pointer_move(&mut self, event: ShellInput) {
        self.pointer = Some(event);
    }

    pub(crate) fn push_discrete(&mut self, event: ShellInput) {
        self.discrete.push(event);
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.discrete.is_empty() && self.pointer.is_none()
    }

    //--- Drain ------------------------------------------------------------

    /// Returns the frame's input and clears the buffer.
    ///
    /// The coalesced pointer move comes first so hover state is current
    /// before any press is handled.
    pub(crate) fn drain(&mut self) -> Vec<ShellInput> {
        let mut events = Vec::with_capacity(self.discrete.len() + 1);
        events.extend(self.pointer.take());
        events.append(&mut self.discrete);
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::Point;
    use crate::core::input::KeyCode;

    #[test]
    fn pointer_moves_coalesce() {
        let mut buffer = InputBuffer::new();
        buffer.push_pointer_move(ShellInput::PointerMoved(Point::new(1.0, 1.0)));
        buffer.push_pointer_move(ShellInput::PointerMoved(Point::new(5.0, 9.0)));

        assert_eq!(buffer.drain(), vec![ShellInput::PointerMoved(Point::new(5.0, 9.0))]);
    }

    #[test]
    fn discrete_inputs_keep_order_after_pointer() {
        let mut buffer = InputBuffer::new();
        buffer.push_discrete(ShellInput::KeyDown(KeyCode::Digit1));
        buffer.push_pointer_move(ShellInput::PointerMoved(Point::new(2.0, 3.0)));
        buffer.push_discrete(ShellInput::KeyDown(KeyCode::Escape));

        assert_eq!(
            buffer.drain(),
            vec![
                ShellInput::PointerMoved(Point::new(2.0, 3.0)),
                ShellInput::KeyDown(KeyCode::Digit1),
                ShellInput::KeyDown(KeyCode::Escape),
            ]
        );
    }

    #[test]
    fn repeated_presses_are_kept() {
        let mut buffer = InputBuffer::new();
        buffer.push_discrete(ShellInput::KeyDown(KeyCode::Digit1));
        buffer.push_discrete(ShellInput::KeyDown(KeyCode::Digit1));
        assert_eq!(buffer.drain().len(), 2);
    }

    #[test]
    fn drain_empties_buffer() {
        let mut buffer = InputBuffer::new();
        buffer.push_discrete(ShellInput::KeyDown(KeyCode::Enter));
        buffer.drain();

        assert!(buffer.is_empty());
        assert!(buffer.drain().is_empty());
    }
}
