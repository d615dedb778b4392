//! MC6809 / HD6309 interpreter core.
//!
//! One interpreter serves both CPUs. The [`Variant`] and, on the HD6309,
//! the native-mode bit in MD select the cycle table; undefined entries in
//! that table are what make an opcode illegal for the part in the socket.
//!
//! Interrupts are sampled before every instruction. An interrupt entry
//! replaces the instruction for that step and costs a fixed number of
//! cycles.

use emu_core::{Bus, Cpu, Observable, Value};

use crate::cycles::{CycleTable, HD6309_EMULATION, HD6309_NATIVE, ILLEGAL_NOP, MC6809};
use crate::flags::{C, E, F, H, I, N, V, Z};
use crate::interrupts::{InterruptController, InterruptLine};
use crate::registers::{MD_DIV_ZERO, MD_FIRQ_ENTIRE, MD_ILLEGAL, Registers};
use crate::variant::Variant;

mod addressing;
mod hd6309;
mod page0;
mod page2;
mod page3;
mod stack;
mod transfer;

/// Vector used by HD6309 illegal-opcode and division-by-zero traps.
const TRAP_VECTOR: u16 = 0xFFF0;
const SWI3_VECTOR: u16 = 0xFFF2;
const SWI2_VECTOR: u16 = 0xFFF4;
const SWI_VECTOR: u16 = 0xFFFA;
const RESET_VECTOR: u16 = 0xFFFE;

/// Why the CPU is not fetching instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitState {
    /// Fetching and executing normally.
    Running,
    /// Stopped by SYNC until any interrupt line is requested.
    Sync,
    /// Stopped by CWAI with the entire state already stacked.
    Cwai,
}

/// MC6809 / HD6309 CPU.
///
/// The CPU does not own the bus. It is passed to [`Cpu::execute`] and
/// [`Cpu6809::step`] so the machine can share it with the scheduler.
pub struct Cpu6809 {
    /// Register file. Public so tests and debuggers can poke it directly.
    pub regs: Registers,
    variant: Variant,
    interrupts: InterruptController,
    /// NMI is ignored after reset until the first load of S.
    nmi_armed: bool,
    wait: WaitState,
    /// Cycles charged so far to the instruction in progress.
    cycles: u32,
    total_cycles: u64,
}

impl Cpu6809 {
    #[must_use]
    pub fn new(variant: Variant) -> Self {
        Self {
            regs: Registers::default(),
            variant,
            interrupts: InterruptController::new(),
            nmi_armed: false,
            wait: WaitState::Running,
            cycles: 0,
            total_cycles: 0,
        }
    }

    #[must_use]
    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Swap the CPU in the socket. MD is cleared when the new part has no
    /// mode register.
    pub fn set_variant(&mut self, variant: Variant) {
        if variant != self.variant {
            log::debug!("CPU variant {} -> {}", self.variant.name(), variant.name());
        }
        self.variant = variant;
        if !variant.has_extended_registers() {
            self.regs.md = 0;
        }
    }

    #[must_use]
    pub fn interrupts(&self) -> &InterruptController {
        &self.interrupts
    }

    pub fn interrupts_mut(&mut self) -> &mut InterruptController {
        &mut self.interrupts
    }

    pub fn assert_interrupt(&mut self, line: InterruptLine) {
        self.interrupts.assert(line);
    }

    pub fn deassert_interrupt(&mut self, line: InterruptLine) {
        self.interrupts.deassert(line);
    }

    #[must_use]
    pub fn wait_state(&self) -> WaitState {
        self.wait
    }

    #[must_use]
    pub fn nmi_armed(&self) -> bool {
        self.nmi_armed
    }

    /// Total cycles consumed since creation.
    #[must_use]
    pub fn total_cycles(&self) -> u64 {
        self.total_cycles
    }

    /// Run one instruction, or one interrupt entry, and return its cost.
    ///
    /// Returns 0 when the CPU is stopped in SYNC or CWAI and nothing has
    /// woken it.
    pub fn step<B: Bus>(&mut self, bus: &mut B) -> u32 {
        self.cycles = 0;
        if !self.service_interrupts(bus) {
            if self.wait != WaitState::Running {
                return 0;
            }
            self.execute_instruction(bus);
        }
        self.total_cycles += u64::from(self.cycles);
        self.cycles
    }

    /// True when the HD6309 is in native mode.
    fn native(&self) -> bool {
        self.variant.has_extended_registers() && self.regs.native()
    }

    fn cycle_table(&self) -> &'static CycleTable {
        match self.variant {
            Variant::Mc6809 => &MC6809,
            Variant::Hd6309 if self.regs.native() => &HD6309_NATIVE,
            Variant::Hd6309 => &HD6309_EMULATION,
        }
    }

    fn fetch<B: Bus>(&mut self, bus: &mut B) -> u8 {
        let value = bus.read(self.regs.pc);
        self.regs.pc = self.regs.pc.wrapping_add(1);
        value
    }

    fn fetch_word<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let hi = self.fetch(bus);
        let lo = self.fetch(bus);
        u16::from_be_bytes([hi, lo])
    }

    /// Load S. The first load arms NMI.
    fn set_s(&mut self, value: u16) {
        self.regs.s = value;
        self.nmi_armed = true;
    }

    fn execute_instruction<B: Bus>(&mut self, bus: &mut B) {
        let op = self.fetch(bus);
        match op {
            0x10 => {
                let op = self.fetch(bus);
                self.execute_page2(bus, op);
            }
            0x11 => {
                let op = self.fetch(bus);
                self.execute_page3(bus, op);
            }
            _ => self.execute_page0(bus, op),
        }
    }

    /// Check for a serviceable interrupt and enter it. Returns true if an
    /// interrupt entry used this step.
    fn service_interrupts<B: Bus>(&mut self, bus: &mut B) -> bool {
        if self.wait == WaitState::Sync && self.interrupts.any_pending() {
            // A masked request still ends SYNC; execution resumes inline.
            self.wait = WaitState::Running;
        }
        match self
            .interrupts
            .highest_pending(self.regs.cc, self.nmi_armed)
        {
            Some(line) => {
                self.enter_interrupt(bus, line);
                true
            }
            None => false,
        }
    }

    fn enter_interrupt<B: Bus>(&mut self, bus: &mut B, line: InterruptLine) {
        self.interrupts.consume(line);
        let stacked = self.wait == WaitState::Cwai;
        self.wait = WaitState::Running;

        let entire = match line {
            InterruptLine::Nmi | InterruptLine::Irq => true,
            InterruptLine::Firq => {
                self.variant.has_extended_registers() && self.regs.md & MD_FIRQ_ENTIRE != 0
            }
        };

        if stacked {
            // CWAI already pushed everything with E set.
            self.cycles += 7;
        } else if entire {
            self.regs.cc.set(E);
            self.push_entire_state(bus);
            self.cycles += if self.native() { 21 } else { 19 };
        } else {
            self.regs.cc.clear(E);
            self.push_word(bus, stack::StackReg::S, self.regs.pc);
            self.push_byte(bus, stack::StackReg::S, self.regs.cc.bits());
            self.cycles += 10;
        }

        match line {
            InterruptLine::Nmi | InterruptLine::Firq => self.regs.cc.set(I | F),
            InterruptLine::Irq => self.regs.cc.set(I),
        }
        self.regs.pc = bus.read_word(line.vector());
        log::trace!("{line:?} -> ${:04X}", self.regs.pc);
    }

    /// SWI, SWI2 and SWI3. Only SWI masks interrupts.
    fn software_interrupt<B: Bus>(&mut self, bus: &mut B, vector: u16) {
        self.regs.cc.set(E);
        self.push_entire_state(bus);
        if vector == SWI_VECTOR {
            self.regs.cc.set(I | F);
        }
        self.regs.pc = bus.read_word(vector);
    }

    /// HD6309 trap: stack everything and vector through $FFF0.
    fn trap<B: Bus>(&mut self, bus: &mut B, md_flag: u8) {
        self.regs.md |= md_flag;
        self.regs.cc.set(E);
        self.push_entire_state(bus);
        self.regs.cc.set(I | F);
        self.regs.pc = bus.read_word(TRAP_VECTOR);
        self.cycles += if self.native() { 22 } else { 20 };
    }

    /// Undefined opcode. The MC6809 runs it as a fixed-cost no-op; the
    /// HD6309 traps.
    fn illegal<B: Bus>(&mut self, bus: &mut B, page: u8, op: u8) {
        log::trace!(
            "illegal opcode page {page} ${op:02X} at ${:04X}",
            self.regs.pc
        );
        if self.variant.traps_illegal_opcodes() {
            self.trap(bus, MD_ILLEGAL);
        } else {
            self.cycles += u32::from(ILLEGAL_NOP) + u32::from(page != 0);
        }
    }

    fn divide_by_zero<B: Bus>(&mut self, bus: &mut B) {
        log::trace!("division by zero at ${:04X}", self.regs.pc);
        self.trap(bus, MD_DIV_ZERO);
    }

    /// Branch condition for the low nibble of a branch opcode.
    fn condition(&self, op: u8) -> bool {
        let cc = self.regs.cc;
        let c = cc.is_set(C);
        let z = cc.is_set(Z);
        let n = cc.is_set(N);
        let v = cc.is_set(V);
        match op & 0x0F {
            0x0 => true,
            0x1 => false,
            0x2 => !(c || z),
            0x3 => c || z,
            0x4 => !c,
            0x5 => c,
            0x6 => !z,
            0x7 => z,
            0x8 => !v,
            0x9 => v,
            0xA => !n,
            0xB => n,
            0xC => n == v,
            0xD => n != v,
            0xE => !z && n == v,
            _ => z || n != v,
        }
    }
}

impl Cpu for Cpu6809 {
    type Registers = Registers;

    fn execute<B: Bus>(&mut self, bus: &mut B, budget: u32) -> u32 {
        let mut consumed = 0u32;
        while consumed < budget {
            let cost = self.step(bus);
            if cost == 0 {
                // Stopped waiting for an interrupt: idle out the slice.
                self.total_cycles += u64::from(budget - consumed);
                consumed = budget;
                break;
            }
            consumed += cost;
        }
        consumed
    }

    fn pc(&self) -> u16 {
        self.regs.pc
    }

    fn registers(&self) -> Registers {
        self.regs
    }

    fn is_halted(&self) -> bool {
        self.wait != WaitState::Running
    }

    fn reset<B: Bus>(&mut self, bus: &mut B) {
        self.regs = Registers {
            cc: crate::flags::ConditionCodes::new(I | F),
            ..Registers::default()
        };
        self.interrupts.clear();
        self.nmi_armed = false;
        self.wait = WaitState::Running;
        self.cycles = 0;
        self.regs.pc = bus.read_word(RESET_VECTOR);
        log::debug!(
            "{} reset, PC=${:04X}",
            self.variant.name(),
            self.regs.pc
        );
    }
}

impl Observable for Cpu6809 {
    fn query(&self, path: &str) -> Option<Value> {
        let r = &self.regs;
        let cc = r.cc;
        match path {
            "pc" => Some(r.pc.into()),
            "a" => Some(r.a.into()),
            "b" => Some(r.b.into()),
            "d" => Some(r.d().into()),
            "x" => Some(r.x.into()),
            "y" => Some(r.y.into()),
            "u" => Some(r.u.into()),
            "s" => Some(r.s.into()),
            "dp" => Some(r.dp.into()),
            "cc" => Some(cc.bits().into()),
            "cc.c" => Some(cc.is_set(C).into()),
            "cc.v" => Some(cc.is_set(V).into()),
            "cc.z" => Some(cc.is_set(Z).into()),
            "cc.n" => Some(cc.is_set(N).into()),
            "cc.i" => Some(cc.is_set(I).into()),
            "cc.h" => Some(cc.is_set(H).into()),
            "cc.f" => Some(cc.is_set(F).into()),
            "cc.e" => Some(cc.is_set(E).into()),
            "variant" => Some(self.variant.name().into()),
            "cycles" => Some(self.total_cycles.into()),
            "waiting" => Some((self.wait != WaitState::Running).into()),
            "nmi_armed" => Some(self.nmi_armed.into()),
            "irq" => Some(self.interrupts.is_asserted(InterruptLine::Irq).into()),
            "firq" => Some(self.interrupts.is_asserted(InterruptLine::Firq).into()),
            "nmi" => Some(self.interrupts.is_asserted(InterruptLine::Nmi).into()),
            "e" | "f" | "w" | "v" | "md" | "native"
                if !self.variant.has_extended_registers() =>
            {
                None
            }
            "e" => Some(r.e.into()),
            "f" => Some(r.f.into()),
            "w" => Some(r.w().into()),
            "v" => Some(r.v.into()),
            "md" => Some(r.md.into()),
            "native" => Some(r.native().into()),
            _ => None,
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &[
            "pc", "a", "b", "d", "x", "y", "u", "s", "dp", "cc", "cc.c", "cc.v", "cc.z", "cc.n",
            "cc.i", "cc.h", "cc.f", "cc.e", "variant", "cycles", "waiting", "nmi_armed", "irq",
            "firq", "nmi", "e", "f", "w", "v", "md", "native",
        ]
    }
}
