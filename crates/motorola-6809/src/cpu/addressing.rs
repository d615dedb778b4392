//! Operand addressing modes.

use emu_core::Bus;

use super::Cpu6809;

/// Operand source for memory-reference instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Mode {
    Immediate,
    Direct,
    Indexed,
    Extended,
}

impl Mode {
    /// Mode encoded in bits 5-4 of an opcode in rows $8x-$Fx.
    pub(super) const fn from_opcode(op: u8) -> Self {
        match (op >> 4) & 0x03 {
            0 => Self::Immediate,
            1 => Self::Direct,
            2 => Self::Indexed,
            _ => Self::Extended,
        }
    }

    /// Mode of a read-modify-write opcode in rows $0x, $6x and $7x.
    pub(super) const fn from_rmw(op: u8) -> Self {
        match op >> 4 {
            0x0 => Self::Direct,
            0x6 => Self::Indexed,
            _ => Self::Extended,
        }
    }
}

impl Cpu6809 {
    /// Effective address for a non-immediate mode. Indexed postbyte costs
    /// are charged here.
    pub(super) fn effective_address<B: Bus>(&mut self, bus: &mut B, mode: Mode) -> u16 {
        match mode {
            Mode::Direct => {
                let lo = self.fetch(bus);
                u16::from_be_bytes([self.regs.dp, lo])
            }
            Mode::Extended => self.fetch_word(bus),
            Mode::Indexed => self.indexed_address(bus),
            // Immediate operands live at PC; callers fetch them directly.
            Mode::Immediate => self.regs.pc,
        }
    }

    pub(super) fn read_operand8<B: Bus>(&mut self, bus: &mut B, mode: Mode) -> u8 {
        if mode == Mode::Immediate {
            self.fetch(bus)
        } else {
            let ea = self.effective_address(bus, mode);
            bus.read(ea)
        }
    }

    pub(super) fn read_operand16<B: Bus>(&mut self, bus: &mut B, mode: Mode) -> u16 {
        if mode == Mode::Immediate {
            self.fetch_word(bus)
        } else {
            let ea = self.effective_address(bus, mode);
            bus.read_word(ea)
        }
    }

    pub(super) fn read_operand32<B: Bus>(&mut self, bus: &mut B, mode: Mode) -> u32 {
        if mode == Mode::Immediate {
            let hi = self.fetch_word(bus);
            let lo = self.fetch_word(bus);
            (u32::from(hi) << 16) | u32::from(lo)
        } else {
            let ea = self.effective_address(bus, mode);
            let hi = bus.read_word(ea);
            let lo = bus.read_word(ea.wrapping_add(2));
            (u32::from(hi) << 16) | u32::from(lo)
        }
    }

    /// Index register named by postbyte bits 6-5.
    fn index_register(&self, post: u8) -> u16 {
        match (post >> 5) & 0x03 {
            0 => self.regs.x,
            1 => self.regs.y,
            2 => self.regs.u,
            _ => self.regs.s,
        }
    }

    fn set_index_register(&mut self, post: u8, value: u16) {
        match (post >> 5) & 0x03 {
            0 => self.regs.x = value,
            1 => self.regs.y = value,
            2 => self.regs.u = value,
            _ => self.regs.s = value,
        }
    }

    /// Decode an indexed postbyte and return the effective address.
    ///
    /// | Postbyte    | Mode          | Extra cycles (6809 / native) |
    /// |-------------|---------------|------------------------------|
    /// | `0RRnnnnn`  | n5,R          | 1 / 1                        |
    /// | `1RRi0000`  | ,R+           | 2 / 1                        |
    /// | `1RRi0001`  | ,R++          | 3 / 2                        |
    /// | `1RRi0010`  | ,-R           | 2 / 1                        |
    /// | `1RRi0011`  | ,--R          | 3 / 2                        |
    /// | `1RRi0100`  | ,R            | 0 / 0                        |
    /// | `1RRi0101`  | B,R           | 1 / 1                        |
    /// | `1RRi0110`  | A,R           | 1 / 1                        |
    /// | `1RRi0111`  | E,R (6309)    | 1 / 1                        |
    /// | `1RRi1000`  | n8,R          | 1 / 1                        |
    /// | `1RRi1001`  | n16,R         | 4 / 3                        |
    /// | `1RRi1010`  | F,R (6309)    | 1 / 1                        |
    /// | `1RRi1011`  | D,R           | 4 / 2                        |
    /// | `1xxi1100`  | n8,PC         | 1 / 1                        |
    /// | `1xxi1101`  | n16,PC        | 5 / 3                        |
    /// | `1RRi1110`  | W,R (6309)    | 1 / 1                        |
    /// | `1xxi1111`  | [n16] / n16   | 2 / 1 (+3 indirect)          |
    ///
    /// Indirection (`i` = 1) adds 3 cycles and reads the final address from
    /// the computed one.
    pub(super) fn indexed_address<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let post = self.fetch(bus);
        let native = self.native();

        if post & 0x80 == 0 {
            let offset = i16::from(((post << 3) as i8) >> 3) as u16;
            self.cycles += 1;
            return self.index_register(post).wrapping_add(offset);
        }

        if self.variant.has_extended_registers() {
            if let Some(ea) = self.w_indexed_address(bus, post) {
                return ea;
            }
        }

        let indirect = post & 0x10 != 0;
        let base = self.index_register(post);
        let (ea, extra) = match post & 0x0F {
            0x0 => {
                self.set_index_register(post, base.wrapping_add(1));
                (base, if native { 1 } else { 2 })
            }
            0x1 => {
                self.set_index_register(post, base.wrapping_add(2));
                (base, if native { 2 } else { 3 })
            }
            0x2 => {
                let ea = base.wrapping_sub(1);
                self.set_index_register(post, ea);
                (ea, if native { 1 } else { 2 })
            }
            0x3 => {
                let ea = base.wrapping_sub(2);
                self.set_index_register(post, ea);
                (ea, if native { 2 } else { 3 })
            }
            0x4 => (base, 0),
            0x5 => (base.wrapping_add(i16::from(self.regs.b as i8) as u16), 1),
            0x6 => (base.wrapping_add(i16::from(self.regs.a as i8) as u16), 1),
            0x7 if self.variant.has_extended_registers() => {
                (base.wrapping_add(i16::from(self.regs.e as i8) as u16), 1)
            }
            0x8 => {
                let offset = i16::from(self.fetch(bus) as i8) as u16;
                (base.wrapping_add(offset), 1)
            }
            0x9 => {
                let offset = self.fetch_word(bus);
                (base.wrapping_add(offset), if native { 3 } else { 4 })
            }
            0xA if self.variant.has_extended_registers() => {
                (base.wrapping_add(i16::from(self.regs.f as i8) as u16), 1)
            }
            0xB => (base.wrapping_add(self.regs.d()), if native { 2 } else { 4 }),
            0xC => {
                let offset = i16::from(self.fetch(bus) as i8) as u16;
                (self.regs.pc.wrapping_add(offset), 1)
            }
            0xD => {
                let offset = self.fetch_word(bus);
                (self.regs.pc.wrapping_add(offset), if native { 3 } else { 5 })
            }
            0xE if self.variant.has_extended_registers() => (base.wrapping_add(self.regs.w()), 1),
            // Only [n16] is documented; without indirection the word is
            // used as a plain address.
            0xF => (self.fetch_word(bus), if native { 1 } else { 2 }),
            // E,R, F,R and W,R on the MC6809: behave as ,R.
            _ => (base, 0),
        };
        self.cycles += extra;

        if indirect {
            self.cycles += 3;
            bus.read_word(ea)
        } else {
            ea
        }
    }

    /// HD6309 W-relative modes. These reuse postbytes that are undefined
    /// or indirect-only on the MC6809.
    fn w_indexed_address<B: Bus>(&mut self, bus: &mut B, post: u8) -> Option<u16> {
        let w = self.regs.w();
        let (ea, extra, indirect) = match post {
            0x8F => (w, 0, false),
            0x90 => (w, 0, true),
            0xAF | 0xB0 => {
                let offset = self.fetch_word(bus);
                (w.wrapping_add(offset), 2, post == 0xB0)
            }
            0xCF | 0xD0 => {
                self.regs.set_w(w.wrapping_add(2));
                (w, 1, post == 0xD0)
            }
            0xEF | 0xF0 => {
                let ea = w.wrapping_sub(2);
                self.regs.set_w(ea);
                (ea, 1, post == 0xF0)
            }
            _ => return None,
        };
        self.cycles += extra;
        if indirect {
            self.cycles += 3;
            Some(bus.read_word(ea))
        } else {
            Some(ea)
        }
    }
}
