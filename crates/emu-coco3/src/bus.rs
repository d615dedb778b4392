//! CoCo 3 bus: memory and I/O routing.
//!
//! Implements `emu_core::Bus`. Logical $FF00-$FFFF is the I/O page and is
//! decoded here before the MMU sees the address, so no RAM ever backs it:
//!
//! | Range       | Device                                         |
//! |-------------|------------------------------------------------|
//! | $FF00-$FF1F | PIA0 (keyboard, joystick, HSYNC/VSYNC), mirrored every 4 |
//! | $FF20-$FF3F | PIA1 (DAC, sound enable, cartridge FIRQ)       |
//! | $FF40       | cartridge bank select                          |
//! | $FF90-$FF9F | GIME control and video registers               |
//! | $FFA0-$FFAF | MMU task registers                             |
//! | $FFB0-$FFBF | palette                                        |
//! | $FFC0-$FFDF | SAM bit pairs (even address clears, odd sets)  |
//! | $FFF0-$FFFF | vectors from the top of the system ROM         |
//!
//! Everything else in the page floats at $FF.

#![allow(clippy::cast_possible_truncation)]

use emu_core::Bus;
use log::trace;
use motorola_6821::Pia6821;

use crate::audio::dac_sample;
use crate::cartridge::Cartridge;
use crate::gime::Gime;
use crate::input::InputHandle;
use crate::memory::{Memory, OPEN_BUS};

/// SAM bit for the CPU rate select ($FFD8/$FFD9).
const SAM_RATE: u16 = 1 << 12;
/// SAM bit for the map type ($FFDE/$FFDF).
const SAM_ALL_RAM: u16 = 1 << 15;

/// The CoCo 3 bus, implementing `emu_core::Bus`.
pub struct CocoBus {
    pub memory: Memory,
    pub gime: Gime,
    pub pia0: Pia6821,
    pub pia1: Pia6821,
    pub cartridge: Option<Cartridge>,
    pub input: InputHandle,
    sam: u16,
}

impl CocoBus {
    #[must_use]
    pub fn new(memory: Memory, input: InputHandle) -> Self {
        Self {
            memory,
            gime: Gime::new(),
            pia0: Pia6821::new(),
            pia1: Pia6821::new(),
            cartridge: None,
            input,
            sam: 0,
        }
    }

    /// Return every chip to its power-on state and clear RAM. The
    /// cartridge stays inserted.
    pub fn reset(&mut self) {
        self.memory.reset();
        self.gime.reset();
        self.pia0.reset();
        self.pia1.reset();
        self.sam = 0;
        if let Some(cart) = self.cartridge.as_mut() {
            cart.reset();
        }
    }

    /// CPU clock multiplier from the SAM rate select.
    #[must_use]
    pub fn clock_multiplier(&self) -> u32 {
        if self.sam & SAM_RATE != 0 { 2 } else { 1 }
    }

    #[must_use]
    pub fn sam(&self) -> u16 {
        self.sam
    }

    /// Combined level on the CPU IRQ input.
    #[must_use]
    pub fn irq_level(&self) -> bool {
        self.pia0.irq_active() || self.gime.irq_active()
    }

    /// Combined level on the CPU FIRQ input.
    #[must_use]
    pub fn firq_level(&self) -> bool {
        self.pia1.irq_active() || self.gime.firq_active()
    }

    /// 6-bit DAC value from PIA1 port A bits 2-7.
    #[must_use]
    pub fn dac(&self) -> u8 {
        self.pia1.port_a_output() >> 2
    }

    /// Analogue mux select from PIA0 CA2 (bit 0) and CB2 (bit 1).
    #[must_use]
    pub fn joystick_mux(&self) -> u8 {
        (u8::from(self.pia0.cb2_output()) << 1) | u8::from(self.pia0.ca2_output())
    }

    /// Current audio output level.
    #[must_use]
    pub fn audio_sample(&self) -> i16 {
        dac_sample(self.dac(), self.pia1.cb2_output())
    }

    fn port_a_inputs(&self) -> u8 {
        self.input
            .port_a(self.pia0.port_b_output(), self.dac(), self.joystick_mux())
    }

    fn io_read(&mut self, addr: u16) -> u8 {
        match addr {
            0xFF00..=0xFF1F => {
                let reg = (addr & 0x03) as u8;
                if reg == 0 {
                    self.pia0.external_a = self.port_a_inputs();
                }
                self.pia0.read(reg)
            }
            0xFF20..=0xFF3F => self.pia1.read((addr & 0x03) as u8),
            0xFF90..=0xFF9F | 0xFFB0..=0xFFBF => self.gime.read(addr),
            0xFFA0..=0xFFAF => self.memory.mmu.register(usize::from(addr & 0x0F)),
            0xFFF0..=0xFFFF => self.memory.vector(addr),
            _ => {
                trace!("unmapped I/O read ${addr:04X}");
                OPEN_BUS
            }
        }
    }

    fn io_peek(&self, addr: u16) -> u8 {
        match addr {
            0xFF00..=0xFF1F => {
                let reg = (addr & 0x03) as u8;
                if reg == 0 {
                    let mut pia = self.pia0.clone();
                    pia.external_a = self.port_a_inputs();
                    pia.peek(0)
                } else {
                    self.pia0.peek(reg)
                }
            }
            0xFF20..=0xFF3F => self.pia1.peek((addr & 0x03) as u8),
            0xFF90..=0xFF9F | 0xFFB0..=0xFFBF => self.gime.peek(addr),
            0xFFA0..=0xFFAF => self.memory.mmu.register(usize::from(addr & 0x0F)),
            0xFFF0..=0xFFFF => self.memory.vector(addr),
            _ => OPEN_BUS,
        }
    }

    fn io_write(&mut self, addr: u16, value: u8) {
        match addr {
            0xFF00..=0xFF1F => self.pia0.write((addr & 0x03) as u8, value),
            0xFF20..=0xFF3F => self.pia1.write((addr & 0x03) as u8, value),
            0xFF40 => {
                if let Some(cart) = self.cartridge.as_mut() {
                    cart.write_bank(value);
                }
            }
            0xFF90..=0xFF9F | 0xFFB0..=0xFFBF => {
                self.gime.write(addr, value);
                match addr {
                    0xFF90 => self.memory.mmu.write_init0(value),
                    0xFF91 => self.memory.mmu.task = usize::from(value & 0x01),
                    0xFF9B => self.memory.mmu.extension = value,
                    _ => {}
                }
            }
            0xFFA0..=0xFFAF => self
                .memory
                .mmu
                .set_register(usize::from(addr & 0x0F), value),
            0xFFC0..=0xFFDF => self.sam_write(addr),
            _ => trace!("unmapped I/O write ${addr:04X} = ${value:02X}"),
        }
    }

    /// SAM registers are bit pairs: the even address clears a bit and the
    /// odd address sets it. The data written is ignored.
    fn sam_write(&mut self, addr: u16) {
        let bit = 1u16 << ((addr & 0x1F) >> 1);
        if addr & 1 != 0 {
            self.sam |= bit;
        } else {
            self.sam &= !bit;
        }
        self.memory.mmu.all_ram = self.sam & SAM_ALL_RAM != 0;
    }
}

impl Bus for CocoBus {
    fn read(&mut self, address: u16) -> u8 {
        if address >= 0xFF00 {
            self.io_read(address)
        } else {
            self.memory.read(address, self.cartridge.as_ref())
        }
    }

    fn write(&mut self, address: u16, value: u8) {
        if address >= 0xFF00 {
            self.io_write(address, value);
        } else {
            self.memory.write(address, value);
        }
    }

    fn peek(&self, address: u16) -> u8 {
        if address >= 0xFF00 {
            self.io_peek(address)
        } else {
            self.memory.read(address, self.cartridge.as_ref())
        }
    }
}
