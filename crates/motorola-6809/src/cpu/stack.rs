//! Stack pushes and pulls.

use emu_core::Bus;

use super::Cpu6809;
use crate::flags::{ConditionCodes, E};

/// Which hardware stack an operation uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum StackReg {
    S,
    U,
}

impl StackReg {
    /// The register PSH/PUL bit 6 names on this stack (U for S, S for U).
    fn other(self) -> Self {
        match self {
            Self::S => Self::U,
            Self::U => Self::S,
        }
    }
}

impl Cpu6809 {
    fn stack_pointer(&self, stack: StackReg) -> u16 {
        match stack {
            StackReg::S => self.regs.s,
            StackReg::U => self.regs.u,
        }
    }

    /// Move a stack pointer as a side effect of a push or pull. Does not
    /// arm NMI.
    fn move_stack_pointer(&mut self, stack: StackReg, value: u16) {
        match stack {
            StackReg::S => self.regs.s = value,
            StackReg::U => self.regs.u = value,
        }
    }

    pub(super) fn push_byte<B: Bus>(&mut self, bus: &mut B, stack: StackReg, value: u8) {
        let sp = self.stack_pointer(stack).wrapping_sub(1);
        self.move_stack_pointer(stack, sp);
        bus.write(sp, value);
    }

    /// Push a word low byte first, leaving it big-endian in memory.
    pub(super) fn push_word<B: Bus>(&mut self, bus: &mut B, stack: StackReg, value: u16) {
        let [hi, lo] = value.to_be_bytes();
        self.push_byte(bus, stack, lo);
        self.push_byte(bus, stack, hi);
    }

    pub(super) fn pull_byte<B: Bus>(&mut self, bus: &mut B, stack: StackReg) -> u8 {
        let sp = self.stack_pointer(stack);
        let value = bus.read(sp);
        self.move_stack_pointer(stack, sp.wrapping_add(1));
        value
    }

    pub(super) fn pull_word<B: Bus>(&mut self, bus: &mut B, stack: StackReg) -> u16 {
        let hi = self.pull_byte(bus, stack);
        let lo = self.pull_byte(bus, stack);
        u16::from_be_bytes([hi, lo])
    }

    /// Stack PC, U, Y, X, DP, (W in native mode), B, A, CC on S.
    pub(super) fn push_entire_state<B: Bus>(&mut self, bus: &mut B) {
        let regs = self.regs;
        let s = StackReg::S;
        self.push_word(bus, s, regs.pc);
        self.push_word(bus, s, regs.u);
        self.push_word(bus, s, regs.y);
        self.push_word(bus, s, regs.x);
        self.push_byte(bus, s, regs.dp);
        if self.native() {
            self.push_byte(bus, s, regs.f);
            self.push_byte(bus, s, regs.e);
        }
        self.push_byte(bus, s, regs.b);
        self.push_byte(bus, s, regs.a);
        self.push_byte(bus, s, regs.cc.bits());
    }

    /// Everything after CC in an entire-state frame.
    fn pull_entire_tail<B: Bus>(&mut self, bus: &mut B) {
        let s = StackReg::S;
        self.regs.a = self.pull_byte(bus, s);
        self.regs.b = self.pull_byte(bus, s);
        if self.native() {
            self.regs.e = self.pull_byte(bus, s);
            self.regs.f = self.pull_byte(bus, s);
        }
        self.regs.dp = self.pull_byte(bus, s);
        self.regs.x = self.pull_word(bus, s);
        self.regs.y = self.pull_word(bus, s);
        self.regs.u = self.pull_word(bus, s);
    }

    /// RTI: pull CC, then the rest of the frame if E says it was saved.
    pub(super) fn return_from_interrupt<B: Bus>(&mut self, bus: &mut B) {
        self.regs.cc = ConditionCodes::new(self.pull_byte(bus, StackReg::S));
        if self.regs.cc.is_set(E) {
            self.pull_entire_tail(bus);
            self.cycles += if self.native() { 11 } else { 9 };
        }
        self.regs.pc = self.pull_word(bus, StackReg::S);
    }

    /// PSHS / PSHU. Bits high to low: PC, U/S, Y, X, DP, B, A, CC.
    pub(super) fn push_registers<B: Bus>(&mut self, bus: &mut B, stack: StackReg, mask: u8) {
        let regs = self.regs;
        if mask & 0x80 != 0 {
            self.push_word(bus, stack, regs.pc);
            self.cycles += 2;
        }
        if mask & 0x40 != 0 {
            let other = self.stack_pointer(stack.other());
            self.push_word(bus, stack, other);
            self.cycles += 2;
        }
        if mask & 0x20 != 0 {
            self.push_word(bus, stack, regs.y);
            self.cycles += 2;
        }
        if mask & 0x10 != 0 {
            self.push_word(bus, stack, regs.x);
            self.cycles += 2;
        }
        if mask & 0x08 != 0 {
            self.push_byte(bus, stack, regs.dp);
            self.cycles += 1;
        }
        if mask & 0x04 != 0 {
            self.push_byte(bus, stack, regs.b);
            self.cycles += 1;
        }
        if mask & 0x02 != 0 {
            self.push_byte(bus, stack, regs.a);
            self.cycles += 1;
        }
        if mask & 0x01 != 0 {
            self.push_byte(bus, stack, regs.cc.bits());
            self.cycles += 1;
        }
    }

    /// PULS / PULU, in the reverse order of [`Self::push_registers`].
    pub(super) fn pull_registers<B: Bus>(&mut self, bus: &mut B, stack: StackReg, mask: u8) {
        if mask & 0x01 != 0 {
            self.regs.cc = ConditionCodes::new(self.pull_byte(bus, stack));
            self.cycles += 1;
        }
        if mask & 0x02 != 0 {
            self.regs.a = self.pull_byte(bus, stack);
            self.cycles += 1;
        }
        if mask & 0x04 != 0 {
            self.regs.b = self.pull_byte(bus, stack);
            self.cycles += 1;
        }
        if mask & 0x08 != 0 {
            self.regs.dp = self.pull_byte(bus, stack);
            self.cycles += 1;
        }
        if mask & 0x10 != 0 {
            self.regs.x = self.pull_word(bus, stack);
            self.cycles += 2;
        }
        if mask & 0x20 != 0 {
            self.regs.y = self.pull_word(bus, stack);
            self.cycles += 2;
        }
        if mask & 0x40 != 0 {
            let value = self.pull_word(bus, stack);
            match stack.other() {
                StackReg::S => self.set_s(value),
                StackReg::U => self.regs.u = value,
            }
            self.cycles += 2;
        }
        if mask & 0x80 != 0 {
            self.regs.pc = self.pull_word(bus, stack);
            self.cycles += 2;
        }
    }
}
