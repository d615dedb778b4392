//! Unprefixed opcodes.

use emu_core::Bus;

use super::addressing::Mode;
use super::stack::StackReg;
use super::{Cpu6809, SWI_VECTOR, WaitState};
use crate::alu;
use crate::flags::{C, ConditionCodes, E, Z};

impl Cpu6809 {
    pub(super) fn execute_page0<B: Bus>(&mut self, bus: &mut B, op: u8) {
        let base = self.cycle_table().page0[op as usize];
        if base == 0 {
            self.illegal(bus, 0, op);
            return;
        }
        self.cycles += u32::from(base);

        match op {
            // NEG/COM/LSR/ROR/ASR/ASL/ROL/DEC/INC/TST/CLR on memory
            0x00 | 0x03 | 0x04 | 0x06..=0x0A | 0x0C | 0x0D | 0x0F
            | 0x60 | 0x63 | 0x64 | 0x66..=0x6A | 0x6C | 0x6D | 0x6F
            | 0x70 | 0x73 | 0x74 | 0x76..=0x7A | 0x7C | 0x7D | 0x7F => {
                let ea = self.effective_address(bus, Mode::from_rmw(op));
                let value = bus.read(ea);
                if let Some(result) = self.unary8(op, value) {
                    bus.write(ea, result);
                }
            }

            // OIM/AIM/EIM/TIM (HD6309)
            0x01 | 0x02 | 0x05 | 0x0B | 0x61 | 0x62 | 0x65 | 0x6B | 0x71 | 0x72 | 0x75 | 0x7B => {
                self.immediate_to_memory(bus, op);
            }

            // JMP
            0x0E | 0x6E | 0x7E => {
                self.regs.pc = self.effective_address(bus, Mode::from_rmw(op));
            }

            // NOP
            0x12 => {}

            // SYNC
            0x13 => self.wait = WaitState::Sync,

            // SEXW (HD6309)
            0x14 => {
                let w = self.regs.w();
                self.regs.set_d(if w & 0x8000 != 0 { 0xFFFF } else { 0 });
                self.regs.cc.update_nz32(self.regs.q());
            }

            // LBRA
            0x16 => {
                let offset = self.fetch_word(bus);
                self.regs.pc = self.regs.pc.wrapping_add(offset);
            }

            // LBSR
            0x17 => {
                let offset = self.fetch_word(bus);
                self.push_word(bus, StackReg::S, self.regs.pc);
                self.regs.pc = self.regs.pc.wrapping_add(offset);
            }

            // DAA
            0x19 => self.regs.a = alu::daa(&mut self.regs.cc, self.regs.a),

            // ORCC #
            0x1A => {
                let mask = self.fetch(bus);
                self.regs.cc = ConditionCodes::new(self.regs.cc.bits() | mask);
            }

            // ANDCC #
            0x1C => {
                let mask = self.fetch(bus);
                self.regs.cc = ConditionCodes::new(self.regs.cc.bits() & mask);
            }

            // SEX
            0x1D => {
                self.regs.a = if self.regs.b & 0x80 != 0 { 0xFF } else { 0x00 };
                self.regs.cc.update_nz16(self.regs.d());
            }

            // EXG
            0x1E => {
                let post = self.fetch(bus);
                self.exchange(post);
            }

            // TFR
            0x1F => {
                let post = self.fetch(bus);
                self.transfer(post);
            }

            // BRA..BLE
            0x20..=0x2F => {
                let offset = i16::from(self.fetch(bus) as i8) as u16;
                if self.condition(op) {
                    self.regs.pc = self.regs.pc.wrapping_add(offset);
                }
            }

            // LEAX/LEAY: Z only
            0x30 | 0x31 => {
                let ea = self.effective_address(bus, Mode::Indexed);
                self.regs.cc.set_if(Z, ea == 0);
                if op == 0x30 {
                    self.regs.x = ea;
                } else {
                    self.regs.y = ea;
                }
            }

            // LEAS
            0x32 => {
                let ea = self.effective_address(bus, Mode::Indexed);
                self.set_s(ea);
            }

            // LEAU
            0x33 => self.regs.u = self.effective_address(bus, Mode::Indexed),

            // PSHS/PULS/PSHU/PULU
            0x34 => {
                let mask = self.fetch(bus);
                self.push_registers(bus, StackReg::S, mask);
            }
            0x35 => {
                let mask = self.fetch(bus);
                self.pull_registers(bus, StackReg::S, mask);
            }
            0x36 => {
                let mask = self.fetch(bus);
                self.push_registers(bus, StackReg::U, mask);
            }
            0x37 => {
                let mask = self.fetch(bus);
                self.pull_registers(bus, StackReg::U, mask);
            }

            // RTS
            0x39 => self.regs.pc = self.pull_word(bus, StackReg::S),

            // ABX
            0x3A => self.regs.x = self.regs.x.wrapping_add(u16::from(self.regs.b)),

            // RTI
            0x3B => self.return_from_interrupt(bus),

            // CWAI #
            0x3C => {
                let mask = self.fetch(bus);
                self.regs.cc = ConditionCodes::new(self.regs.cc.bits() & mask);
                self.regs.cc.set(E);
                self.push_entire_state(bus);
                self.wait = WaitState::Cwai;
            }

            // MUL
            0x3D => {
                let product = alu::mul(&mut self.regs.cc, self.regs.a, self.regs.b);
                self.regs.set_d(product);
            }

            // SWI
            0x3F => self.software_interrupt(bus, SWI_VECTOR),

            // Inherent on A / B
            0x40..=0x4F => {
                if let Some(result) = self.unary8(op, self.regs.a) {
                    self.regs.a = result;
                }
            }
            0x50..=0x5F => {
                if let Some(result) = self.unary8(op, self.regs.b) {
                    self.regs.b = result;
                }
            }

            0x80..=0xFF => self.accumulator_op(bus, op),

            // Everything else has a zero table entry and never gets here.
            _ => {}
        }
    }

    /// Single-operand 8-bit op selected by the low nibble. Returns `None`
    /// for TST, which has no write-back.
    pub(super) fn unary8(&mut self, op: u8, value: u8) -> Option<u8> {
        let cc = &mut self.regs.cc;
        match op & 0x0F {
            0x0 => Some(alu::neg8(cc, value)),
            0x3 => Some(alu::com8(cc, value)),
            0x4 => Some(alu::lsr8(cc, value)),
            0x6 => Some(alu::ror8(cc, value)),
            0x7 => Some(alu::asr8(cc, value)),
            0x8 => Some(alu::asl8(cc, value)),
            0x9 => Some(alu::rol8(cc, value)),
            0xA => Some(alu::dec8(cc, value)),
            0xC => Some(alu::inc8(cc, value)),
            0xD => {
                alu::tst8(cc, value);
                None
            }
            0xF => Some(alu::clr(cc)),
            _ => None,
        }
    }

    /// Rows $8x-$Fx: A-side (bit 6 clear) and B-side (bit 6 set) ops.
    fn accumulator_op<B: Bus>(&mut self, bus: &mut B, op: u8) {
        let mode = Mode::from_opcode(op);
        let use_b = op & 0x40 != 0;

        match op & 0x0F {
            // SUB CMP SBC AND BIT LD EOR ADC OR ADD
            0x0..=0x2 | 0x4..=0x6 | 0x8..=0xB => {
                let m = self.read_operand8(bus, mode);
                let acc = if use_b { self.regs.b } else { self.regs.a };
                let carry = self.regs.cc.is_set(C);
                if let Some(result) = self.binary8(op, acc, m, carry) {
                    if use_b {
                        self.regs.b = result;
                    } else {
                        self.regs.a = result;
                    }
                }
            }

            // STA / STB
            0x7 => {
                let value = if use_b { self.regs.b } else { self.regs.a };
                self.store8(bus, mode, value);
            }

            // SUBD / ADDD
            0x3 => {
                let m = self.read_operand16(bus, mode);
                let d = self.regs.d();
                let result = if use_b {
                    alu::add16(&mut self.regs.cc, d, m, false)
                } else {
                    alu::sub16(&mut self.regs.cc, d, m, false)
                };
                self.regs.set_d(result);
            }

            // CMPX / LDD
            0xC => {
                let m = self.read_operand16(bus, mode);
                if use_b {
                    self.regs.cc.update_nz16_clear_v(m);
                    self.regs.set_d(m);
                } else {
                    let _ = alu::sub16(&mut self.regs.cc, self.regs.x, m, false);
                }
            }

            // BSR / JSR, and LDQ # / STD
            0xD => match (use_b, mode) {
                (false, Mode::Immediate) => {
                    let offset = i16::from(self.fetch(bus) as i8) as u16;
                    self.push_word(bus, StackReg::S, self.regs.pc);
                    self.regs.pc = self.regs.pc.wrapping_add(offset);
                }
                (false, _) => {
                    let target = self.effective_address(bus, mode);
                    self.push_word(bus, StackReg::S, self.regs.pc);
                    self.regs.pc = target;
                }
                (true, Mode::Immediate) => {
                    let q = self.read_operand32(bus, mode);
                    self.load_q(q);
                }
                (true, _) => self.store16(bus, mode, self.regs.d()),
            },

            // LDX / LDU
            0xE => {
                let m = self.read_operand16(bus, mode);
                self.regs.cc.update_nz16_clear_v(m);
                if use_b {
                    self.regs.u = m;
                } else {
                    self.regs.x = m;
                }
            }

            // STX / STU
            _ => {
                let value = if use_b { self.regs.u } else { self.regs.x };
                self.store16(bus, mode, value);
            }
        }
    }

    /// Two-operand 8-bit op selected by the low nibble. Returns `None`
    /// for CMP and BIT, which only set flags.
    pub(super) fn binary8(&mut self, op: u8, acc: u8, m: u8, carry: bool) -> Option<u8> {
        let cc = &mut self.regs.cc;
        match op & 0x0F {
            0x0 => Some(alu::sub8(cc, acc, m, false)),
            0x1 => {
                let _ = alu::sub8(cc, acc, m, false);
                None
            }
            0x2 => Some(alu::sub8(cc, acc, m, carry)),
            0x4 => Some(alu::and8(cc, acc, m)),
            0x5 => {
                let _ = alu::and8(cc, acc, m);
                None
            }
            0x6 => {
                cc.update_nz8_clear_v(m);
                Some(m)
            }
            0x8 => Some(alu::eor8(cc, acc, m)),
            0x9 => Some(alu::add8(cc, acc, m, carry)),
            0xA => Some(alu::or8(cc, acc, m)),
            0xB => Some(alu::add8(cc, acc, m, false)),
            _ => None,
        }
    }

    pub(super) fn store8<B: Bus>(&mut self, bus: &mut B, mode: Mode, value: u8) {
        let ea = self.effective_address(bus, mode);
        self.regs.cc.update_nz8_clear_v(value);
        bus.write(ea, value);
    }

    pub(super) fn store16<B: Bus>(&mut self, bus: &mut B, mode: Mode, value: u16) {
        let ea = self.effective_address(bus, mode);
        self.regs.cc.update_nz16_clear_v(value);
        bus.write_word(ea, value);
    }
}
