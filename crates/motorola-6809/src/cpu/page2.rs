//! $10-prefixed opcodes.

use emu_core::Bus;

use super::addressing::Mode;
use super::stack::StackReg;
use super::{Cpu6809, SWI2_VECTOR};
use crate::alu;
use crate::flags::{C, V};

impl Cpu6809 {
    pub(super) fn execute_page2<B: Bus>(&mut self, bus: &mut B, op: u8) {
        let base = self.cycle_table().page2[op as usize];
        if base == 0 {
            self.illegal(bus, 2, op);
            return;
        }
        self.cycles += u32::from(base);

        match op {
            // LBRN..LBLE. The MC6809 spends an extra cycle when taken.
            0x21..=0x2F => {
                let offset = self.fetch_word(bus);
                if self.condition(op) {
                    self.regs.pc = self.regs.pc.wrapping_add(offset);
                    if !self.native() {
                        self.cycles += 1;
                    }
                }
            }

            // ADDR..CMPR (HD6309)
            0x30..=0x37 => {
                let post = self.fetch(bus);
                self.register_alu(op, post);
            }

            // PSHSW/PULSW/PSHUW/PULUW (HD6309)
            0x38 => self.push_word(bus, StackReg::S, self.regs.w()),
            0x39 => {
                let w = self.pull_word(bus, StackReg::S);
                self.regs.set_w(w);
            }
            0x3A => self.push_word(bus, StackReg::U, self.regs.w()),
            0x3B => {
                let w = self.pull_word(bus, StackReg::U);
                self.regs.set_w(w);
            }

            // SWI2
            0x3F => self.software_interrupt(bus, SWI2_VECTOR),

            // Inherent on D (HD6309)
            0x40..=0x4F => {
                if let Some(result) = self.unary16(op, self.regs.d()) {
                    self.regs.set_d(result);
                }
            }

            // Inherent on W (HD6309)
            0x50..=0x5F => {
                if let Some(result) = self.unary16(op, self.regs.w()) {
                    self.regs.set_w(result);
                }
            }

            // Rows $8x-$Bx: W/D ops plus CMPD, CMPY, LDY, STY
            0x80..=0xBF => self.page2_word_op(bus, op),

            // LDQ / STQ (HD6309)
            0xDC | 0xEC | 0xFC => {
                let q = self.read_operand32(bus, Mode::from_opcode(op));
                self.load_q(q);
            }
            0xDD | 0xED | 0xFD => {
                let ea = self.effective_address(bus, Mode::from_opcode(op));
                let q = self.regs.q();
                self.regs.cc.update_nz32(q);
                self.regs.cc.clear(V);
                bus.write_word(ea, (q >> 16) as u16);
                bus.write_word(ea.wrapping_add(2), q as u16);
            }

            // LDS
            0xCE | 0xDE | 0xEE | 0xFE => {
                let m = self.read_operand16(bus, Mode::from_opcode(op));
                self.regs.cc.update_nz16_clear_v(m);
                self.set_s(m);
            }

            // STS
            0xDF | 0xEF | 0xFF => self.store16(bus, Mode::from_opcode(op), self.regs.s),

            _ => {}
        }
    }

    fn page2_word_op<B: Bus>(&mut self, bus: &mut B, op: u8) {
        let mode = Mode::from_opcode(op);
        match op & 0x0F {
            // STW
            0x7 => self.store16(bus, mode, self.regs.w()),
            // STY
            0xF => self.store16(bus, mode, self.regs.y),
            low => {
                let m = self.read_operand16(bus, mode);
                let carry = self.regs.cc.is_set(C);
                let d = self.regs.d();
                let w = self.regs.w();
                let cc = &mut self.regs.cc;
                match low {
                    0x0 => {
                        let r = alu::sub16(cc, w, m, false);
                        self.regs.set_w(r);
                    }
                    0x1 => {
                        let _ = alu::sub16(cc, w, m, false);
                    }
                    0x2 => {
                        let r = alu::sub16(cc, d, m, carry);
                        self.regs.set_d(r);
                    }
                    0x3 => {
                        let _ = alu::sub16(cc, d, m, false);
                    }
                    0x4 => {
                        let r = alu::and16(cc, d, m);
                        self.regs.set_d(r);
                    }
                    0x5 => {
                        let _ = alu::and16(cc, d, m);
                    }
                    0x6 => {
                        cc.update_nz16_clear_v(m);
                        self.regs.set_w(m);
                    }
                    0x8 => {
                        let r = alu::eor16(cc, d, m);
                        self.regs.set_d(r);
                    }
                    0x9 => {
                        let r = alu::add16(cc, d, m, carry);
                        self.regs.set_d(r);
                    }
                    0xA => {
                        let r = alu::or16(cc, d, m);
                        self.regs.set_d(r);
                    }
                    0xB => {
                        let r = alu::add16(cc, w, m, false);
                        self.regs.set_w(r);
                    }
                    0xC => {
                        let _ = alu::sub16(cc, self.regs.y, m, false);
                    }
                    0xE => {
                        cc.update_nz16_clear_v(m);
                        self.regs.y = m;
                    }
                    _ => {}
                }
            }
        }
    }

    /// Single-operand 16-bit op selected by the low nibble (HD6309).
    fn unary16(&mut self, op: u8, value: u16) -> Option<u16> {
        let cc = &mut self.regs.cc;
        match op & 0x0F {
            0x0 => Some(alu::neg16(cc, value)),
            0x3 => Some(alu::com16(cc, value)),
            0x4 => Some(alu::lsr16(cc, value)),
            0x6 => Some(alu::ror16(cc, value)),
            0x7 => Some(alu::asr16(cc, value)),
            0x8 => Some(alu::asl16(cc, value)),
            0x9 => Some(alu::rol16(cc, value)),
            0xA => Some(alu::dec16(cc, value)),
            0xC => Some(alu::inc16(cc, value)),
            0xD => {
                cc.update_nz16_clear_v(value);
                None
            }
            0xF => {
                let _ = alu::clr(cc);
                Some(0)
            }
            _ => None,
        }
    }
}
