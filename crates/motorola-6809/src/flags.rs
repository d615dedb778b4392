//! Condition code register bits.

/// Carry (bit 0).
pub const C: u8 = 0x01;
/// Overflow (bit 1).
pub const V: u8 = 0x02;
/// Zero (bit 2).
pub const Z: u8 = 0x04;
/// Negative (bit 3).
pub const N: u8 = 0x08;
/// IRQ mask (bit 4).
pub const I: u8 = 0x10;
/// Half carry (bit 5). Only meaningful after 8-bit adds.
pub const H: u8 = 0x20;
/// FIRQ mask (bit 6).
pub const F: u8 = 0x40;
/// Entire state saved (bit 7). Tells RTI how much to pull.
pub const E: u8 = 0x80;

/// Condition code register.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConditionCodes(pub u8);

impl ConditionCodes {
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn is_set(self, flag: u8) -> bool {
        self.0 & flag != 0
    }

    pub fn set(&mut self, flag: u8) {
        self.0 |= flag;
    }

    pub fn clear(&mut self, flag: u8) {
        self.0 &= !flag;
    }

    pub fn set_if(&mut self, flag: u8, condition: bool) {
        if condition {
            self.set(flag);
        } else {
            self.clear(flag);
        }
    }

    /// Set N and Z from an 8-bit result.
    pub fn update_nz8(&mut self, value: u8) {
        self.set_if(N, value & 0x80 != 0);
        self.set_if(Z, value == 0);
    }

    /// Set N and Z from a 16-bit result.
    pub fn update_nz16(&mut self, value: u16) {
        self.set_if(N, value & 0x8000 != 0);
        self.set_if(Z, value == 0);
    }

    /// Set N and Z from a 32-bit result (HD6309 Q operations).
    pub fn update_nz32(&mut self, value: u32) {
        self.set_if(N, value & 0x8000_0000 != 0);
        self.set_if(Z, value == 0);
    }

    /// N and Z from an 8-bit result, V cleared. Loads, stores and logic ops.
    pub fn update_nz8_clear_v(&mut self, value: u8) {
        self.update_nz8(value);
        self.clear(V);
    }

    pub fn update_nz16_clear_v(&mut self, value: u16) {
        self.update_nz16(value);
        self.clear(V);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nz_updates_leave_other_bits() {
        let mut cc = ConditionCodes::new(C | I | V);
        cc.update_nz8(0x80);
        assert!(cc.is_set(N));
        assert!(!cc.is_set(Z));
        assert!(cc.is_set(C));
        assert!(cc.is_set(V));
        assert!(cc.is_set(I));

        cc.update_nz16_clear_v(0);
        assert!(cc.is_set(Z));
        assert!(!cc.is_set(N));
        assert!(!cc.is_set(V));
        assert!(cc.is_set(C));
    }
}
