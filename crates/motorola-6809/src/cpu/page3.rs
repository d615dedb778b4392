//! $11-prefixed opcodes.

use emu_core::Bus;

use super::addressing::Mode;
use super::{Cpu6809, SWI3_VECTOR};
use crate::alu;

impl Cpu6809 {
    pub(super) fn execute_page3<B: Bus>(&mut self, bus: &mut B, op: u8) {
        let base = self.cycle_table().page3[op as usize];
        if base == 0 {
            self.illegal(bus, 3, op);
            return;
        }
        self.cycles += u32::from(base);

        match op {
            // BAND..STBT (HD6309)
            0x30..=0x37 => self.bit_transfer(bus, op),

            // TFM (HD6309)
            0x38..=0x3B => self.block_transfer(bus, op),

            // BITMD # (HD6309)
            0x3C => {
                let mask = self.fetch(bus);
                self.test_mode_bits(mask);
            }

            // LDMD # (HD6309)
            0x3D => {
                let value = self.fetch(bus);
                self.load_mode(value);
            }

            // SWI3
            0x3F => self.software_interrupt(bus, SWI3_VECTOR),

            // Inherent on E / F (HD6309)
            0x40..=0x4F => {
                if let Some(result) = self.unary8(op, self.regs.e) {
                    self.regs.e = result;
                }
            }
            0x50..=0x5F => {
                if let Some(result) = self.unary8(op, self.regs.f) {
                    self.regs.f = result;
                }
            }

            // CMPU / CMPS
            0x83 | 0x93 | 0xA3 | 0xB3 | 0x8C | 0x9C | 0xAC | 0xBC => {
                let m = self.read_operand16(bus, Mode::from_opcode(op));
                let reg = if op & 0x0F == 0x03 {
                    self.regs.u
                } else {
                    self.regs.s
                };
                let _ = alu::sub16(&mut self.regs.cc, reg, m, false);
            }

            // DIVD / DIVQ / MULD (HD6309)
            0x8D | 0x9D | 0xAD | 0xBD => {
                let divisor = self.read_operand8(bus, Mode::from_opcode(op));
                self.divide_d(bus, divisor);
            }
            0x8E | 0x9E | 0xAE | 0xBE => {
                let divisor = self.read_operand16(bus, Mode::from_opcode(op));
                self.divide_q(bus, divisor);
            }
            0x8F | 0x9F | 0xAF | 0xBF => {
                let m = self.read_operand16(bus, Mode::from_opcode(op));
                self.multiply_d(m);
            }

            // STE / STF (HD6309)
            0x97 | 0xA7 | 0xB7 => self.store8(bus, Mode::from_opcode(op), self.regs.e),
            0xD7 | 0xE7 | 0xF7 => self.store8(bus, Mode::from_opcode(op), self.regs.f),

            // SUB/CMP/LD/ADD on E (rows $8x-$Bx) and F (rows $Cx-$Fx)
            0x80..=0xFF => {
                let m = self.read_operand8(bus, Mode::from_opcode(op));
                let use_f = op & 0x40 != 0;
                let acc = if use_f { self.regs.f } else { self.regs.e };
                if let Some(result) = self.binary8(op, acc, m, false) {
                    if use_f {
                        self.regs.f = result;
                    } else {
                        self.regs.e = result;
                    }
                }
            }

            _ => {}
        }
    }
}
