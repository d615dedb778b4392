//! HD6309-only operations that do not fit the shared row decoders.

use emu_core::Bus;

use super::Cpu6809;
use super::addressing::Mode;
use crate::flags::{C, ConditionCodes, N, V, Z};
use crate::registers::{MD_DIV_ZERO, MD_FIRQ_ENTIRE, MD_ILLEGAL, MD_NATIVE};

impl Cpu6809 {
    /// LDQ: load the 32-bit accumulator and set N, Z; V cleared.
    pub(super) fn load_q(&mut self, value: u32) {
        self.regs.set_q(value);
        self.regs.cc.update_nz32(value);
        self.regs.cc.clear(V);
    }

    /// OIM/AIM/EIM/TIM: immediate byte combined with memory.
    pub(super) fn immediate_to_memory<B: Bus>(&mut self, bus: &mut B, op: u8) {
        let imm = self.fetch(bus);
        let ea = self.effective_address(bus, Mode::from_rmw(op));
        let value = bus.read(ea);
        let result = match op & 0x0F {
            0x1 => value | imm,
            0x2 => value & imm,
            0x5 => value ^ imm,
            _ => value & imm,
        };
        self.regs.cc.update_nz8_clear_v(result);
        if op & 0x0F != 0xB {
            bus.write(ea, result);
        }
    }

    /// DIVD: signed D / 8-bit divisor. Quotient to B, remainder to A.
    pub(super) fn divide_d<B: Bus>(&mut self, bus: &mut B, divisor: u8) {
        if divisor == 0 {
            self.divide_by_zero(bus);
            return;
        }
        let dividend = i32::from(self.regs.d() as i16);
        let divisor = i32::from(divisor as i8);
        let quotient = dividend / divisor;
        let remainder = dividend % divisor;

        if !(-256..=255).contains(&quotient) {
            // Range overflow: registers untouched.
            self.regs.cc.set(V);
            self.regs.cc.clear(N | Z | C);
            return;
        }
        self.regs.b = quotient as u8;
        self.regs.a = remainder as u8;
        self.set_division_flags(quotient, !(-128..=127).contains(&quotient));
    }

    /// DIVQ: signed Q / 16-bit divisor. Quotient to W, remainder to D.
    pub(super) fn divide_q<B: Bus>(&mut self, bus: &mut B, divisor: u16) {
        if divisor == 0 {
            self.divide_by_zero(bus);
            return;
        }
        let dividend = i64::from(self.regs.q() as i32);
        let divisor = i64::from(divisor as i16);
        let quotient = dividend / divisor;
        let remainder = dividend % divisor;

        if !(-65536..=65535).contains(&quotient) {
            self.regs.cc.set(V);
            self.regs.cc.clear(N | Z | C);
            return;
        }
        self.regs.set_w(quotient as u16);
        self.regs.set_d(remainder as u16);
        self.set_division_flags(quotient as i32, !(-32768..=32767).contains(&quotient));
    }

    fn set_division_flags(&mut self, quotient: i32, overflow: bool) {
        let cc = &mut self.regs.cc;
        cc.set_if(N, quotient < 0);
        cc.set_if(Z, quotient == 0);
        cc.set_if(C, quotient & 1 != 0);
        cc.set_if(V, overflow);
    }

    /// MULD: signed D x 16-bit operand into Q.
    pub(super) fn multiply_d(&mut self, operand: u16) {
        let product = i32::from(self.regs.d() as i16) * i32::from(operand as i16);
        self.regs.set_q(product as u32);
        self.regs.cc.update_nz32(product as u32);
        self.regs.cc.clear(V | C);
    }

    /// BAND, BIAND, BOR, BIOR, BEOR, BIEOR, LDBT, STBT.
    ///
    /// Postbyte `RRsssddd`: register (CC, A, B), source bit, destination
    /// bit. For STBT the register bit is the source and the memory bit the
    /// destination.
    pub(super) fn bit_transfer<B: Bus>(&mut self, bus: &mut B, op: u8) {
        let post = self.fetch(bus);
        let ea = self.effective_address(bus, Mode::Direct);
        let source_bit = (post >> 3) & 0x07;
        let dest_bit = post & 0x07;
        let reg = match post >> 6 {
            0 => self.regs.cc.bits(),
            1 => self.regs.a,
            2 => self.regs.b,
            _ => {
                self.trap(bus, MD_ILLEGAL);
                return;
            }
        };
        let memory = bus.read(ea);

        if op == 0x37 {
            let bit = (reg >> source_bit) & 1;
            let value = (memory & !(1 << dest_bit)) | (bit << dest_bit);
            bus.write(ea, value);
            return;
        }

        let mbit = (memory >> source_bit) & 1;
        let rbit = (reg >> dest_bit) & 1;
        let bit = match op {
            0x30 => rbit & mbit,
            0x31 => rbit & !mbit & 1,
            0x32 => rbit | mbit,
            0x33 => rbit | (!mbit & 1),
            0x34 => rbit ^ mbit,
            0x35 => rbit ^ (!mbit & 1),
            _ => mbit,
        };
        let value = (reg & !(1 << dest_bit)) | (bit << dest_bit);
        match post >> 6 {
            0 => self.regs.cc = ConditionCodes::new(value),
            1 => self.regs.a = value,
            _ => self.regs.b = value,
        }
    }

    /// TFM: copy W bytes between the registers named by the postbyte.
    ///
    /// | Opcode | Form       |
    /// |--------|------------|
    /// | $1138  | r0+, r1+   |
    /// | $1139  | r0-, r1-   |
    /// | $113A  | r0+, r1    |
    /// | $113B  | r0, r1+    |
    ///
    /// Only D, X, Y, U and S are legal operands. The whole block runs as one
    /// instruction at 3 cycles per byte.
    pub(super) fn block_transfer<B: Bus>(&mut self, bus: &mut B, op: u8) {
        let post = self.fetch(bus);
        let src_code = post >> 4;
        let dst_code = post & 0x0F;
        if src_code > 4 || dst_code > 4 {
            self.trap(bus, MD_ILLEGAL);
            return;
        }
        let (src_step, dst_step): (i16, i16) = match op {
            0x38 => (1, 1),
            0x39 => (-1, -1),
            0x3A => (1, 0),
            _ => (0, 1),
        };

        while self.regs.w() != 0 {
            let src = self.tfm_register(src_code);
            let dst = self.tfm_register(dst_code);
            let byte = bus.read(src);
            bus.write(dst, byte);
            self.set_tfm_register(src_code, src.wrapping_add(src_step as u16));
            self.set_tfm_register(dst_code, dst.wrapping_add(dst_step as u16));
            self.regs.set_w(self.regs.w().wrapping_sub(1));
            self.cycles += 3;
        }
    }

    fn tfm_register(&self, code: u8) -> u16 {
        match code {
            0 => self.regs.d(),
            1 => self.regs.x,
            2 => self.regs.y,
            3 => self.regs.u,
            _ => self.regs.s,
        }
    }

    fn set_tfm_register(&mut self, code: u8, value: u16) {
        match code {
            0 => self.regs.set_d(value),
            1 => self.regs.x = value,
            2 => self.regs.y = value,
            3 => self.regs.u = value,
            _ => self.regs.s = value,
        }
    }

    /// LDMD: only the native-mode and FIRQ-mode bits are writable.
    pub(super) fn load_mode(&mut self, value: u8) {
        let writable = MD_NATIVE | MD_FIRQ_ENTIRE;
        self.regs.md = (self.regs.md & !writable) | (value & writable);
        log::debug!(
            "HD6309 {} mode",
            if self.regs.native() { "native" } else { "emulation" }
        );
    }

    /// BITMD: Z reflects the tested trap flags, which are then cleared.
    pub(super) fn test_mode_bits(&mut self, mask: u8) {
        let tested = self.regs.md & mask & (MD_DIV_ZERO | MD_ILLEGAL);
        self.regs.cc.set_if(Z, tested == 0);
        self.regs.md &= !tested;
    }
}
