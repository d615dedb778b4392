//! Top-level CoCo 3 system.
//!
//! Drives the CPU through the [`Scheduler`] one scanline at a time. A field
//! is 262 lines at 60 Hz; each line runs its active part, pulls HSYNC low
//! for 5 us and releases it. VSYNC is held low across the active part of
//! the last line.
//!
//! # Interrupt wiring
//!
//! | Source              | Path                         | CPU line |
//! |---------------------|------------------------------|----------|
//! | HSYNC               | PIA0 CA1, GIME HBORD         | IRQ      |
//! | VSYNC               | PIA0 CB1, GIME VBORD         | IRQ      |
//! | Cartridge CART      | PIA1 CB1, GIME EI0           | FIRQ     |
//! | GIME timer          | GIME TMR                     | IRQ/FIRQ |
//!
//! GIME sources reach either line depending on $FF92/$FF93. Each event
//! latches a new request on the CPU; between CPU runs the line levels are
//! re-sampled so that acknowledged sources release their line.

use emu_core::{Bus, Cpu, Observable, Value};
use log::{debug, info};
use motorola_6809::{Cpu6809, InterruptLine, Registers, Variant};

use crate::audio::AudioBuffer;
use crate::bus::CocoBus;
use crate::cartridge::Cartridge;
use crate::config::EmulatorConfig;
use crate::error::ConfigError;
use crate::gime::{Raised, SOURCE_CARTRIDGE, SOURCE_HBORD, SOURCE_TIMER, SOURCE_VBORD};
use crate::input::InputHandle;
use crate::memory::Memory;
use crate::scheduler::{
    HSYNC_NANOS, LINES_PER_FRAME, NANOS_PER_LINE, Scheduler, SchedulerHost, SliceEvents,
    TimerUpdate,
};
use crate::video::Framebuffer;

/// CoCo 3 system.
pub struct Coco3 {
    cpu: Cpu6809,
    bus: CocoBus,
    scheduler: Scheduler,
    audio: AudioBuffer,
    framebuffer: Framebuffer,
    /// Completed frame counter.
    frame_count: u64,
}

impl Coco3 {
    /// Build a machine with its own input state.
    pub fn new(config: &EmulatorConfig) -> Result<Self, ConfigError> {
        Self::with_input(config, InputHandle::new())
    }

    /// Build a machine reading the given shared input. The machine is
    /// reset and ready to run.
    pub fn with_input(config: &EmulatorConfig, input: InputHandle) -> Result<Self, ConfigError> {
        config.validate()?;
        let memory = Memory::new(config.ram_size, &config.system_rom);
        let mut machine = Self {
            cpu: Cpu6809::new(config.cpu_type.variant()),
            bus: CocoBus::new(memory, input),
            scheduler: Scheduler::new(config.audio_rate, config.overclock),
            audio: AudioBuffer::new(),
            framebuffer: Framebuffer::new(),
            frame_count: 0,
        };
        machine.reset();
        info!(
            "CoCo 3: {}K RAM, {}",
            config.ram_size.kilobytes(),
            machine.cpu.variant().name()
        );
        Ok(machine)
    }

    /// Hardware reset: clear RAM, reset every chip, restart the scheduler
    /// and load PC from the reset vector.
    pub fn reset(&mut self) {
        self.bus.reset();
        self.scheduler.reset();
        self.audio.clear();
        self.cpu.reset(&mut self.bus);
        self.frame_count = 0;
        debug!("reset: PC=${:04X}", self.cpu.pc());
    }

    /// Run one field: 262 lines with HSYNC on every line and VSYNC on the
    /// last, then paint the framebuffer.
    pub fn run_frame(&mut self) -> SliceEvents {
        let mut events = SliceEvents::default();
        for line in 0..LINES_PER_FRAME {
            let last = line == LINES_PER_FRAME - 1;
            if last {
                self.vsync(false);
            }
            events += self.run_slice(NANOS_PER_LINE - HSYNC_NANOS);
            if last {
                self.vsync(true);
            }
            self.hsync(false);
            events += self.run_slice(HSYNC_NANOS);
            self.hsync(true);
        }
        self.framebuffer.fill_border(self.bus.gime.border());
        self.frame_count += 1;
        events
    }

    /// Run `nanos` of machine time with timer and audio interleaved.
    pub fn run_slice(&mut self, nanos: f64) -> SliceEvents {
        let mut host = Host {
            cpu: &mut self.cpu,
            bus: &mut self.bus,
            audio: &mut self.audio,
        };
        self.scheduler.run(&mut host, nanos)
    }

    /// Execute CPU cycles directly, without timer or audio events. Returns
    /// cycles consumed.
    pub fn run_cycles(&mut self, cycles: u32) -> u32 {
        let consumed = self.cpu.execute(&mut self.bus, cycles);
        sync_interrupt_lines(&mut self.cpu, &self.bus);
        consumed
    }

    fn hsync(&mut self, level: bool) {
        self.bus.pia0.set_ca1(level);
        if self.bus.cartridge.is_some() {
            self.bus.pia1.set_cb1(level);
        }
        if !level {
            self.raise_gime(SOURCE_HBORD);
            if self.bus.cartridge.is_some() {
                self.raise_gime(SOURCE_CARTRIDGE);
            }
            self.assert_pia_lines();
        }
    }

    fn vsync(&mut self, level: bool) {
        self.bus.pia0.set_cb1(level);
        if !level {
            self.raise_gime(SOURCE_VBORD);
            self.assert_pia_lines();
        }
    }

    fn raise_gime(&mut self, source: u8) {
        let raised = self.bus.gime.raise(source);
        assert_raised(&mut self.cpu, raised);
    }

    fn assert_pia_lines(&mut self) {
        if self.bus.pia0.irq_active() {
            self.cpu.assert_interrupt(InterruptLine::Irq);
        }
        if self.bus.pia1.irq_active() {
            self.cpu.assert_interrupt(InterruptLine::Firq);
        }
    }

    /// Insert a cartridge. The caller decides whether to reset.
    pub fn insert_cartridge(&mut self, cartridge: Cartridge) {
        info!("cartridge inserted: {}", cartridge.name());
        self.bus.cartridge = Some(cartridge);
    }

    /// Remove the cartridge, returning it.
    pub fn eject_cartridge(&mut self) -> Option<Cartridge> {
        let cart = self.bus.cartridge.take();
        if let Some(cart) = &cart {
            info!("cartridge ejected: {}", cart.name());
        }
        cart
    }

    #[must_use]
    pub fn cartridge(&self) -> Option<&Cartridge> {
        self.bus.cartridge.as_ref()
    }

    /// Switch the CPU variant. Registers are kept; the next reset starts
    /// the new CPU cleanly.
    pub fn set_variant(&mut self, variant: Variant) {
        if self.cpu.variant() != variant {
            info!("CPU: {}", variant.name());
            self.cpu.set_variant(variant);
        }
    }

    #[must_use]
    pub fn cpu(&self) -> &Cpu6809 {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut Cpu6809 {
        &mut self.cpu
    }

    #[must_use]
    pub fn bus(&self) -> &CocoBus {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut CocoBus {
        &mut self.bus
    }

    #[must_use]
    pub fn registers(&self) -> Registers {
        self.cpu.registers()
    }

    #[must_use]
    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    pub fn audio_mut(&mut self) -> &mut AudioBuffer {
        &mut self.audio
    }

    #[must_use]
    pub fn audio(&self) -> &AudioBuffer {
        &self.audio
    }

    #[must_use]
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    #[must_use]
    pub fn input(&self) -> &InputHandle {
        &self.bus.input
    }

    /// Read memory as the CPU would see it, without side effects.
    #[must_use]
    pub fn peek(&self, addr: u16) -> u8 {
        self.bus.peek(addr)
    }
}

/// Borrowed view of the machine the scheduler drives.
struct Host<'a> {
    cpu: &'a mut Cpu6809,
    bus: &'a mut CocoBus,
    audio: &'a mut AudioBuffer,
}

impl SchedulerHost for Host<'_> {
    fn run_cpu(&mut self, cycles: u32) -> u32 {
        let consumed = self.cpu.execute(&mut *self.bus, cycles);
        sync_interrupt_lines(self.cpu, self.bus);
        consumed
    }

    fn timer_expired(&mut self) {
        let raised = self.bus.gime.raise(SOURCE_TIMER);
        assert_raised(self.cpu, raised);
    }

    fn audio_sample(&mut self) {
        self.audio.push(self.bus.audio_sample());
    }

    fn timer_update(&mut self) -> Option<TimerUpdate> {
        self.bus.gime.take_timer_update()
    }

    fn clock_multiplier(&self) -> u32 {
        self.bus.clock_multiplier()
    }
}

fn assert_raised(cpu: &mut Cpu6809, raised: Raised) {
    if raised.irq {
        cpu.assert_interrupt(InterruptLine::Irq);
    }
    if raised.firq {
        cpu.assert_interrupt(InterruptLine::Firq);
    }
}

/// Bring the CPU's view of IRQ and FIRQ in line with the chips driving
/// them: acknowledged sources release the line, and a source enabled while
/// its flag was already set raises it.
fn sync_interrupt_lines(cpu: &mut Cpu6809, bus: &CocoBus) {
    let interrupts = cpu.interrupts_mut();
    interrupts.set_level(InterruptLine::Irq, bus.irq_level());
    interrupts.set_level(InterruptLine::Firq, bus.firq_level());
}

impl Observable for Coco3 {
    fn query(&self, path: &str) -> Option<Value> {
        if let Some(rest) = path.strip_prefix("cpu.") {
            self.cpu.query(rest)
        } else if let Some(rest) = path.strip_prefix("gime.") {
            self.bus.gime.query(rest)
        } else if let Some(rest) = path.strip_prefix("pia0.") {
            self.bus.pia0.query(rest)
        } else if let Some(rest) = path.strip_prefix("pia1.") {
            self.bus.pia1.query(rest)
        } else if let Some(rest) = path.strip_prefix("mmu.") {
            let mmu = &self.bus.memory.mmu;
            match rest {
                "enabled" => Some(mmu.enabled.into()),
                "task" => Some((mmu.task as u8).into()),
                "all_ram" => Some(mmu.all_ram.into()),
                "constant_page" => Some(mmu.constant_page.into()),
                _ => None,
            }
        } else if let Some(rest) = path.strip_prefix("memory.") {
            parse_address(rest).map(|addr| Value::U8(self.bus.peek(addr)))
        } else {
            match path {
                "frame" => Some(self.frame_count.into()),
                "sam" => Some(self.bus.sam().into()),
                "cartridge" => Some(
                    self.bus
                        .cartridge
                        .as_ref()
                        .map_or("", Cartridge::name)
                        .into(),
                ),
                "audio.buffered" => Some((self.audio.len() as u32).into()),
                _ => None,
            }
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &[
            "cpu.<reg>",
            "gime.<reg>",
            "pia0.<reg>",
            "pia1.<reg>",
            "mmu.enabled",
            "mmu.task",
            "mmu.all_ram",
            "mmu.constant_page",
            "memory.<address>",
            "frame",
            "sam",
            "cartridge",
            "audio.buffered",
        ]
    }
}

/// Parse `$FFFE`, `0xFFFE` or `FFFE`.
fn parse_address(text: &str) -> Option<u16> {
    let digits = text
        .strip_prefix('$')
        .or_else(|| text.strip_prefix("0x"))
        .unwrap_or(text);
    u16::from_str_radix(digits, 16).ok()
}
