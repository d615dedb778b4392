//! Register codes for TFR, EXG and the HD6309 register-to-register ops.
//!
//! | Code | Reg | Code | Reg        |
//! |------|-----|------|------------|
//! | 0    | D   | 8    | A          |
//! | 1    | X   | 9    | B          |
//! | 2    | Y   | A    | CC         |
//! | 3    | U   | B    | DP         |
//! | 4    | S   | C, D | 0 (6309)   |
//! | 5    | PC  | E    | E (6309)   |
//! | 6    | W   | F    | F (6309)   |
//! | 7    | V   |      |            |
//!
//! On the MC6809 the HD6309-only codes read as all ones and ignore writes.

use super::Cpu6809;
use crate::alu;
use crate::flags::{C, ConditionCodes};

/// A register value tagged with its width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum RegValue {
    Byte(u8),
    Word(u16),
}

impl RegValue {
    fn low_byte(self) -> u8 {
        match self {
            Self::Byte(v) => v,
            Self::Word(v) => v as u8,
        }
    }
}

/// True for codes naming an 8-bit register.
const fn is_byte_register(code: u8) -> bool {
    code & 0x08 != 0 && !matches!(code, 0xC | 0xD)
}

impl Cpu6809 {
    pub(super) fn read_register(&self, code: u8) -> RegValue {
        let hd = self.variant.has_extended_registers();
        let r = &self.regs;
        match code & 0x0F {
            0x0 => RegValue::Word(r.d()),
            0x1 => RegValue::Word(r.x),
            0x2 => RegValue::Word(r.y),
            0x3 => RegValue::Word(r.u),
            0x4 => RegValue::Word(r.s),
            0x5 => RegValue::Word(r.pc),
            0x6 if hd => RegValue::Word(r.w()),
            0x7 if hd => RegValue::Word(r.v),
            0x8 => RegValue::Byte(r.a),
            0x9 => RegValue::Byte(r.b),
            0xA => RegValue::Byte(r.cc.bits()),
            0xB => RegValue::Byte(r.dp),
            0xC | 0xD if hd => RegValue::Word(0),
            0xE if hd => RegValue::Byte(r.e),
            0xF if hd => RegValue::Byte(r.f),
            code if is_byte_register(code) => RegValue::Byte(0xFF),
            _ => RegValue::Word(0xFFFF),
        }
    }

    /// Write a register. A byte written to a word register is widened: the
    /// MC6809 fills the high byte with $FF, the HD6309 with zero.
    pub(super) fn write_register(&mut self, code: u8, value: RegValue) {
        let hd = self.variant.has_extended_registers();
        let word = match value {
            RegValue::Word(v) => v,
            RegValue::Byte(v) if hd => u16::from(v),
            RegValue::Byte(v) => 0xFF00 | u16::from(v),
        };
        let byte = value.low_byte();
        match code & 0x0F {
            0x0 => self.regs.set_d(word),
            0x1 => self.regs.x = word,
            0x2 => self.regs.y = word,
            0x3 => self.regs.u = word,
            0x4 => self.set_s(word),
            0x5 => self.regs.pc = word,
            0x6 if hd => self.regs.set_w(word),
            0x7 if hd => self.regs.v = word,
            0x8 => self.regs.a = byte,
            0x9 => self.regs.b = byte,
            0xA => self.regs.cc = ConditionCodes::new(byte),
            0xB => self.regs.dp = byte,
            0xE if hd => self.regs.e = byte,
            0xF if hd => self.regs.f = byte,
            _ => {}
        }
    }

    /// TFR r0,r1.
    pub(super) fn transfer(&mut self, post: u8) {
        let value = self.read_register(post >> 4);
        self.write_register(post & 0x0F, value);
    }

    /// EXG r0,r1.
    pub(super) fn exchange(&mut self, post: u8) {
        let first = self.read_register(post >> 4);
        let second = self.read_register(post & 0x0F);
        self.write_register(post >> 4, second);
        self.write_register(post & 0x0F, first);
    }

    /// HD6309 ADDR/ADCR/SUBR/SBCR/ANDR/ORR/EORR/CMPR r0,r1 (`r1 op= r0`).
    ///
    /// The destination decides the width. A byte source feeding a word
    /// destination is zero-extended; a word source feeding a byte
    /// destination contributes its low byte.
    pub(super) fn register_alu(&mut self, op: u8, post: u8) {
        let src_code = post >> 4;
        let dst_code = post & 0x0F;
        let src = self.read_register(src_code);
        let dst = self.read_register(dst_code);
        let carry = self.regs.cc.is_set(C);
        let cc = &mut self.regs.cc;

        let result = match dst {
            RegValue::Byte(d) => {
                let s = src.low_byte();
                let r = match op & 0x07 {
                    0x0 => alu::add8(cc, d, s, false),
                    0x1 => alu::add8(cc, d, s, carry),
                    0x2 => alu::sub8(cc, d, s, false),
                    0x3 => alu::sub8(cc, d, s, carry),
                    0x4 => alu::and8(cc, d, s),
                    0x5 => alu::or8(cc, d, s),
                    0x6 => alu::eor8(cc, d, s),
                    _ => {
                        let _ = alu::sub8(cc, d, s, false);
                        return;
                    }
                };
                RegValue::Byte(r)
            }
            RegValue::Word(d) => {
                let s = match src {
                    RegValue::Word(v) => v,
                    RegValue::Byte(v) => u16::from(v),
                };
                let r = match op & 0x07 {
                    0x0 => alu::add16(cc, d, s, false),
                    0x1 => alu::add16(cc, d, s, carry),
                    0x2 => alu::sub16(cc, d, s, false),
                    0x3 => alu::sub16(cc, d, s, carry),
                    0x4 => alu::and16(cc, d, s),
                    0x5 => alu::or16(cc, d, s),
                    0x6 => alu::eor16(cc, d, s),
                    _ => {
                        let _ = alu::sub16(cc, d, s, false);
                        return;
                    }
                };
                RegValue::Word(r)
            }
        };
        self.write_register(dst_code, result);
    }
}
