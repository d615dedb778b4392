//! MC6809 / HD6309 register file.

use crate::flags::ConditionCodes;

/// MD bit 0: native mode (HD6309).
pub const MD_NATIVE: u8 = 0x01;
/// MD bit 1: FIRQ stacks the entire state like IRQ.
pub const MD_FIRQ_ENTIRE: u8 = 0x02;
/// MD bit 6: set when an illegal opcode trapped.
pub const MD_ILLEGAL: u8 = 0x40;
/// MD bit 7: set when a division by zero trapped.
pub const MD_DIV_ZERO: u8 = 0x80;

/// CPU registers.
///
/// The accumulators are stored as halves. `d()`, `w()` and `q()` are
/// always derived from them, so a pair view can never disagree with its
/// halves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Registers {
    /// Accumulator A (high half of D).
    pub a: u8,
    /// Accumulator B (low half of D).
    pub b: u8,
    /// Index register X.
    pub x: u16,
    /// Index register Y.
    pub y: u16,
    /// User stack pointer.
    pub u: u16,
    /// System stack pointer. Interrupts stack here.
    pub s: u16,
    /// Program counter.
    pub pc: u16,
    /// Direct page: high byte of direct-mode addresses.
    pub dp: u8,
    /// Condition codes.
    pub cc: ConditionCodes,
    /// HD6309 accumulator E (high half of W).
    pub e: u8,
    /// HD6309 accumulator F (low half of W).
    pub f: u8,
    /// HD6309 value register. Survives reset on real parts; cleared here.
    pub v: u16,
    /// HD6309 mode register.
    pub md: u8,
}

impl Registers {
    /// Accumulator D (A:B).
    #[must_use]
    pub const fn d(&self) -> u16 {
        u16::from_be_bytes([self.a, self.b])
    }

    pub fn set_d(&mut self, value: u16) {
        [self.a, self.b] = value.to_be_bytes();
    }

    /// HD6309 accumulator W (E:F).
    #[must_use]
    pub const fn w(&self) -> u16 {
        u16::from_be_bytes([self.e, self.f])
    }

    pub fn set_w(&mut self, value: u16) {
        [self.e, self.f] = value.to_be_bytes();
    }

    /// HD6309 32-bit accumulator Q (D:W).
    #[must_use]
    pub const fn q(&self) -> u32 {
        u32::from_be_bytes([self.a, self.b, self.e, self.f])
    }

    pub fn set_q(&mut self, value: u32) {
        [self.a, self.b, self.e, self.f] = value.to_be_bytes();
    }

    /// True when the HD6309 runs in native mode.
    #[must_use]
    pub const fn native(&self) -> bool {
        self.md & MD_NATIVE != 0
    }
}
