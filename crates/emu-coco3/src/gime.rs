//! GIME (Graphics Interrupt Memory Enhancer) control registers.
//!
//! The memory-management half of the chip lives in [`crate::memory::Mmu`];
//! this module holds the interrupt logic, the programmable timer and the
//! video/palette registers the rest of the machine reads back.
//!
//! # Registers
//!
//! | Addr  | Name   | Use here                                         |
//! |-------|--------|--------------------------------------------------|
//! | $FF90 | INIT0  | bit 5 GIME IRQ enable, bit 4 GIME FIRQ enable    |
//! | $FF91 | INIT1  | bit 5 timer input (1 = 279 ns, 0 = 63.5 us)      |
//! | $FF92 | IRQENR | IRQ source enables; read returns latched sources |
//! | $FF93 | FIRQENR| FIRQ source enables; read returns latched sources|
//! | $FF94 | TIMER  | timer bits 11-8                                  |
//! | $FF95 | TIMER  | timer bits 7-0                                   |
//! | $FF98-$FF9F | video mode, resolution, border, scroll, offsets    |
//! | $FFB0-$FFBF | palette (6-bit colours)                            |
//!
//! Interrupt sources share one bit layout in $FF92 and $FF93.
//!
//! A timer value of 0 stops the timer. Changing the clock select only
//! rescales a running timer; it never starts one.

#![allow(clippy::cast_possible_truncation)]

use emu_core::{Observable, Value};

use crate::scheduler::TimerUpdate;

/// Timer source.
pub const SOURCE_TIMER: u8 = 0x20;
/// Horizontal border (HSYNC).
pub const SOURCE_HBORD: u8 = 0x10;
/// Vertical border (VSYNC).
pub const SOURCE_VBORD: u8 = 0x08;
/// Serial data input.
pub const SOURCE_SERIAL: u8 = 0x04;
/// Keyboard.
pub const SOURCE_KEYBOARD: u8 = 0x02;
/// Cartridge CART line.
pub const SOURCE_CARTRIDGE: u8 = 0x01;

const INIT0_IRQ_ENABLE: u8 = 0x20;
const INIT0_FIRQ_ENABLE: u8 = 0x10;
const INIT1_FAST_TIMER: u8 = 0x20;

/// Nanoseconds per timer tick for INIT1 bit 5 clear (one scanline at
/// 60 fields of 262 lines) and set (the 3.58 MHz colour clock).
const TIMER_TICK_NANOS: [f64; 2] = [1.0e9 / (60.0 * 262.0), 1.0e9 / 3_579_545.0];

/// Which CPU lines a raised source newly drives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Raised {
    pub irq: bool,
    pub firq: bool,
}

/// GIME interrupt, timer and video register state.
#[derive(Debug, Clone)]
pub struct Gime {
    init0: u8,
    init1: u8,
    irq_enable: u8,
    firq_enable: u8,
    irq_latched: u8,
    firq_latched: u8,
    timer: u16,
    timer_dirty: bool,
    video: [u8; 8],
    palette: [u8; 16],
}

impl Gime {
    #[must_use]
    pub fn new() -> Self {
        Self {
            init0: 0,
            init1: 0,
            irq_enable: 0,
            firq_enable: 0,
            irq_latched: 0,
            firq_latched: 0,
            timer: 0,
            timer_dirty: false,
            video: [0; 8],
            palette: [0; 16],
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// CPU read of $FF90-$FF9F or $FFB0-$FFBF.
    ///
    /// $FF92/$FF93 hand back the latched sources and clear them. The other
    /// control registers are write-only and float.
    pub fn read(&mut self, addr: u16) -> u8 {
        match addr {
            0xFF92 => std::mem::take(&mut self.irq_latched),
            0xFF93 => std::mem::take(&mut self.firq_latched),
            _ => self.peek(addr),
        }
    }

    /// Read without clearing latched sources.
    #[must_use]
    pub fn peek(&self, addr: u16) -> u8 {
        match addr {
            0xFF92 => self.irq_latched,
            0xFF93 => self.firq_latched,
            0xFFB0..=0xFFBF => self.palette[usize::from(addr & 0x0F)],
            _ => 0xFF,
        }
    }

    /// CPU write of $FF90-$FF9F or $FFB0-$FFBF.
    pub fn write(&mut self, addr: u16, value: u8) {
        match addr {
            0xFF90 => self.init0 = value,
            0xFF91 => {
                if (self.init1 ^ value) & INIT1_FAST_TIMER != 0 && self.timer != 0 {
                    self.timer_dirty = true;
                }
                self.init1 = value;
            }
            0xFF92 => self.irq_enable = value & 0x3F,
            0xFF93 => self.firq_enable = value & 0x3F,
            0xFF94 => {
                self.timer = (self.timer & 0x00FF) | (u16::from(value & 0x0F) << 8);
                self.timer_dirty = true;
            }
            0xFF95 => {
                self.timer = (self.timer & 0x0F00) | u16::from(value);
                self.timer_dirty = true;
            }
            0xFF98..=0xFF9F => self.video[usize::from(addr & 0x07)] = value,
            0xFFB0..=0xFFBF => self.palette[usize::from(addr & 0x0F)] = value & 0x3F,
            _ => {}
        }
    }

    /// An interrupt source fired. Latches it wherever it is enabled and
    /// reports which CPU lines that drives.
    pub fn raise(&mut self, source: u8) -> Raised {
        let mut raised = Raised::default();
        if self.init0 & INIT0_IRQ_ENABLE != 0 && self.irq_enable & source != 0 {
            self.irq_latched |= source;
            raised.irq = true;
        }
        if self.init0 & INIT0_FIRQ_ENABLE != 0 && self.firq_enable & source != 0 {
            self.firq_latched |= source;
            raised.firq = true;
        }
        raised
    }

    /// GIME contribution to the CPU IRQ line.
    #[must_use]
    pub fn irq_active(&self) -> bool {
        self.irq_latched != 0
    }

    /// GIME contribution to the CPU FIRQ line.
    #[must_use]
    pub fn firq_active(&self) -> bool {
        self.firq_latched != 0
    }

    /// 12-bit timer reload value.
    #[must_use]
    pub fn timer(&self) -> u16 {
        self.timer
    }

    /// Time between timer interrupts for the current reload value and
    /// input clock.
    #[must_use]
    pub fn timer_period_nanos(&self) -> f64 {
        let clock = usize::from(self.init1 & INIT1_FAST_TIMER != 0);
        f64::from((self.timer & 0x0FFF) + 1) * TIMER_TICK_NANOS[clock]
    }

    /// Hand the scheduler the timer change, if software reprogrammed the
    /// timer since the last call.
    pub fn take_timer_update(&mut self) -> Option<TimerUpdate> {
        if !std::mem::take(&mut self.timer_dirty) {
            None
        } else if self.timer == 0 {
            Some(TimerUpdate::Stop)
        } else {
            Some(TimerUpdate::Period(self.timer_period_nanos()))
        }
    }

    /// Border colour ($FF9A), 6-bit RGB.
    #[must_use]
    pub fn border(&self) -> u8 {
        self.video[2] & 0x3F
    }

    #[must_use]
    pub fn video_register(&self, index: usize) -> u8 {
        self.video[index & 7]
    }
}

impl Default for Gime {
    fn default() -> Self {
        Self::new()
    }
}

impl Observable for Gime {
    fn query(&self, path: &str) -> Option<Value> {
        match path {
            "init0" => Some(self.init0.into()),
            "init1" => Some(self.init1.into()),
            "irq.enable" => Some(self.irq_enable.into()),
            "irq.latched" => Some(self.irq_latched.into()),
            "firq.enable" => Some(self.firq_enable.into()),
            "firq.latched" => Some(self.firq_latched.into()),
            "timer" => Some(self.timer.into()),
            "timer.period" => Some(Value::U64(self.timer_period_nanos() as u64)),
            "border" => Some(self.border().into()),
            _ => None,
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &[
            "init0",
            "init1",
            "irq.enable",
            "irq.latched",
            "firq.enable",
            "firq.latched",
            "timer",
            "timer.period",
            "border",
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sources_latch_only_when_enabled() {
        let mut gime = Gime::new();
        gime.write(0xFF92, SOURCE_TIMER);
        assert_eq!(gime.raise(SOURCE_TIMER), Raised::default());

        gime.write(0xFF90, INIT0_IRQ_ENABLE);
        assert_eq!(gime.raise(SOURCE_VBORD), Raised::default());
        let raised = gime.raise(SOURCE_TIMER);
        assert!(raised.irq && !raised.firq);
        assert!(gime.irq_active());
    }

    #[test]
    fn reading_enable_register_acknowledges() {
        let mut gime = Gime::new();
        gime.write(0xFF90, INIT0_FIRQ_ENABLE);
        gime.write(0xFF93, SOURCE_HBORD);
        gime.raise(SOURCE_HBORD);
        assert_eq!(gime.peek(0xFF93), SOURCE_HBORD);
        assert_eq!(gime.read(0xFF93), SOURCE_HBORD);
        assert_eq!(gime.read(0xFF93), 0);
        assert!(!gime.firq_active());
    }

    #[test]
    fn timer_period_follows_clock_select() {
        let mut gime = Gime::new();
        gime.write(0xFF94, 0x00);
        gime.write(0xFF95, 0x09);
        let Some(TimerUpdate::Period(slow)) = gime.take_timer_update() else {
            panic!("timer written");
        };
        assert!((slow - 10.0 * 1.0e9 / 15_720.0).abs() < 1e-6);
        assert_eq!(gime.take_timer_update(), None);

        gime.write(0xFF91, INIT1_FAST_TIMER);
        let Some(TimerUpdate::Period(fast)) = gime.take_timer_update() else {
            panic!("clock changed");
        };
        assert!((fast - 10.0 * 1.0e9 / 3_579_545.0).abs() < 1e-6);
    }

    #[test]
    fn clock_select_alone_does_not_start_timer() {
        let mut gime = Gime::new();
        gime.write(0xFF91, INIT1_FAST_TIMER);
        assert_eq!(gime.take_timer_update(), None);
        gime.write(0xFF91, 0);
        assert_eq!(gime.take_timer_update(), None);
    }

    #[test]
    fn zero_value_stops_timer() {
        let mut gime = Gime::new();
        gime.write(0xFF95, 0x40);
        assert!(matches!(
            gime.take_timer_update(),
            Some(TimerUpdate::Period(_))
        ));
        gime.write(0xFF95, 0x00);
        assert_eq!(gime.take_timer_update(), Some(TimerUpdate::Stop));
    }

    #[test]
    fn timer_is_twelve_bits() {
        let mut gime = Gime::new();
        gime.write(0xFF94, 0xFF);
        gime.write(0xFF95, 0xFF);
        assert_eq!(gime.timer(), 0x0FFF);
    }

    #[test]
    fn palette_reads_back_six_bits() {
        let mut gime = Gime::new();
        gime.write(0xFFB3, 0xFF);
        assert_eq!(gime.read(0xFFB3), 0x3F);
    }
}
