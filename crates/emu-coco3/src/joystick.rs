//! Analogue joysticks and the DAC comparator.
//!
//! The CoCo has no ADC. Software writes a 6-bit value to the sound DAC
//! ($FF20 bits 2-7), selects one of four axes through the analogue mux
//! (PIA0 CA2 = bit 0, CB2 = bit 1) and reads the comparator on $FF00
//! bit 7. It finds the axis position by binary search over repeated DAC
//! writes.
//!
//! | Mux | Axis        |
//! |-----|-------------|
//! | 0   | right X     |
//! | 1   | right Y     |
//! | 2   | left X      |
//! | 3   | left Y      |
//!
//! Fire buttons pull $FF00 rows low: bit 0 right button 1, bit 1 left
//! button 1, bit 2 right button 2, bit 3 left button 2.

/// Full-scale axis value.
pub const AXIS_MAX: u8 = 63;
/// Resting position of a self-centring stick.
pub const AXIS_CENTRE: u8 = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stick {
    Right,
    Left,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    One,
    Two,
}

/// Both joystick ports.
#[derive(Debug, Clone)]
pub struct Joysticks {
    /// `axes[stick][axis]`, 0-63.
    axes: [[u8; 2]; 2],
    /// `buttons[stick][button]`.
    buttons: [[bool; 2]; 2],
}

impl Joysticks {
    #[must_use]
    pub fn new() -> Self {
        Self {
            axes: [[AXIS_CENTRE; 2]; 2],
            buttons: [[false; 2]; 2],
        }
    }

    /// Set an axis. Values above 63 clamp.
    pub fn set_axis(&mut self, stick: Stick, axis: Axis, value: u8) {
        self.axes[stick as usize][axis as usize] = value.min(AXIS_MAX);
    }

    #[must_use]
    pub fn axis(&self, stick: Stick, axis: Axis) -> u8 {
        self.axes[stick as usize][axis as usize]
    }

    pub fn set_button(&mut self, stick: Stick, button: Button, pressed: bool) {
        self.buttons[stick as usize][button as usize] = pressed;
    }

    /// Axis value seen through the analogue mux.
    #[must_use]
    pub fn selected_axis(&self, mux: u8) -> u8 {
        let stick = usize::from((mux >> 1) & 1);
        let axis = usize::from(mux & 1);
        self.axes[stick][axis]
    }

    /// Comparator output: the DAC voltage exceeds the selected axis.
    #[must_use]
    pub fn compare(&self, dac: u8, mux: u8) -> bool {
        dac > self.selected_axis(mux)
    }

    /// Row bits 0-3 as the buttons drive them (active low, other bits 1).
    #[must_use]
    pub fn button_rows(&self) -> u8 {
        let [right, left] = self.buttons;
        let mut rows = 0xFF;
        if right[0] {
            rows &= !0x01;
        }
        if left[0] {
            rows &= !0x02;
        }
        if right[1] {
            rows &= !0x04;
        }
        if left[1] {
            rows &= !0x08;
        }
        rows
    }

    /// Centre both sticks and release the buttons.
    pub fn release_all(&mut self) {
        *self = Self::new();
    }
}

impl Default for Joysticks {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ramp_above_axis_trips_comparator() {
        let mut js = Joysticks::new();
        js.set_axis(Stick::Right, Axis::X, 40);
        assert!(js.compare(50, 0));
        assert!(!js.compare(30, 0));
        assert!(!js.compare(40, 0));
    }

    #[test]
    fn mux_selects_axis() {
        let mut js = Joysticks::new();
        js.set_axis(Stick::Right, Axis::X, 1);
        js.set_axis(Stick::Right, Axis::Y, 2);
        js.set_axis(Stick::Left, Axis::X, 3);
        js.set_axis(Stick::Left, Axis::Y, 4);
        assert_eq!(
            [0, 1, 2, 3].map(|mux| js.selected_axis(mux)),
            [1, 2, 3, 4]
        );
    }

    #[test]
    fn axis_clamps() {
        let mut js = Joysticks::new();
        js.set_axis(Stick::Left, Axis::Y, 200);
        assert_eq!(js.axis(Stick::Left, Axis::Y), AXIS_MAX);
    }

    #[test]
    fn buttons_pull_rows_low() {
        let mut js = Joysticks::new();
        assert_eq!(js.button_rows(), 0xFF);
        js.set_button(Stick::Left, Button::One, true);
        assert_eq!(js.button_rows(), 0xFD);
        js.set_button(Stick::Right, Button::Two, true);
        assert_eq!(js.button_rows(), 0xF9);
        js.release_all();
        assert_eq!(js.button_rows(), 0xFF);
        assert_eq!(js.axis(Stick::Right, Axis::X), AXIS_CENTRE);
    }
}
