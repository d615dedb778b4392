//! Host input shared between the UI thread and the emulation thread.
//!
//! The host writes key and joystick state at any time; the bus reads it on
//! every $FF00 access. Each call takes the lock for one operation only, so
//! the emulation thread never waits on a host event loop.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::joystick::{Axis, Button, Joysticks, Stick};
use crate::keyboard::KeyboardMatrix;

/// Keyboard and joystick state.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pub keyboard: KeyboardMatrix,
    pub joysticks: Joysticks,
}

/// Cloneable handle to the shared [`InputState`].
#[derive(Debug, Clone, Default)]
pub struct InputHandle {
    state: Arc<Mutex<InputState>>,
}

impl InputHandle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, InputState> {
        // Input state stays consistent even if a holder panicked.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_key(&self, row: u8, col: u8, pressed: bool) {
        self.lock().keyboard.set_key(row, col, pressed);
    }

    pub fn set_joystick_axis(&self, stick: Stick, axis: Axis, value: u8) {
        self.lock().joysticks.set_axis(stick, axis, value);
    }

    pub fn set_joystick_button(&self, stick: Stick, button: Button, pressed: bool) {
        self.lock().joysticks.set_button(stick, button, pressed);
    }

    /// Release every key and button and centre the sticks. Hosts call this
    /// when their window loses focus.
    pub fn release_all(&self) {
        let mut state = self.lock();
        state.keyboard.release_all();
        state.joysticks.release_all();
    }

    /// Value on PIA0 port A: keyboard rows and fire buttons in bits 0-6,
    /// comparator in bit 7.
    #[must_use]
    pub fn port_a(&self, col_mask: u8, dac: u8, mux: u8) -> u8 {
        let state = self.lock();
        let rows = state.keyboard.scan(col_mask) & state.joysticks.button_rows() & 0x7F;
        let comparator = if state.joysticks.compare(dac, mux) {
            0x80
        } else {
            0x00
        };
        rows | comparator
    }

    /// Copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> InputState {
        self.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_share_state() {
        let host = InputHandle::new();
        let machine = host.clone();
        host.set_key(1, 0, true);
        assert_eq!(machine.port_a(0xFE, 0, 0) & 0x7F, 0x7D);
    }

    #[test]
    fn comparator_in_bit_seven() {
        let input = InputHandle::new();
        input.set_joystick_axis(Stick::Right, Axis::X, 40);
        assert_eq!(input.port_a(0xFF, 50, 0) & 0x80, 0x80);
        assert_eq!(input.port_a(0xFF, 30, 0) & 0x80, 0x00);
    }

    #[test]
    fn buttons_share_rows_with_keys() {
        let input = InputHandle::new();
        input.set_joystick_button(Stick::Right, Button::One, true);
        assert_eq!(input.port_a(0xFF, 0, 0) & 0x7F, 0x7E);
        input.release_all();
        assert_eq!(input.port_a(0xFF, 0, 0) & 0x7F, 0x7F);
    }

    #[test]
    fn usable_across_threads() {
        let input = InputHandle::new();
        let host = input.clone();
        std::thread::spawn(move || host.set_key(6, 2, true))
            .join()
            .unwrap();
        assert!(input.snapshot().keyboard.is_pressed(6, 2));
    }
}
