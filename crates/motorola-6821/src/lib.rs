//! Motorola MC6821 Peripheral Interface Adapter (PIA).
//!
//! The 6821 provides two 8-bit I/O ports, each with a data direction
//! register, a control register, one edge-sensitive interrupt input (CA1 /
//! CB1) and one line (CA2 / CB2) that is either a second interrupt input
//! or an output. Each side drives its own IRQ output.
//!
//! # Registers ($0-$3)
//!
//! | Reg | CRx bit 2 = 1     | CRx bit 2 = 0     |
//! |-----|-------------------|-------------------|
//! | $0  | Port A data       | DDRA (1 = output) |
//! | $1  | CRA               | CRA               |
//! | $2  | Port B data       | DDRB (1 = output) |
//! | $3  | CRB               | CRB               |
//!
//! # Control register
//!
//! | Bit | Meaning                                                   |
//! |-----|-----------------------------------------------------------|
//! | 0   | C1 interrupt enable                                       |
//! | 1   | C1 active edge (0 = falling, 1 = rising)                  |
//! | 2   | Data register select (0 = DDR, 1 = port)                  |
//! | 3   | C2 input: interrupt enable. C2 output: level (manual mode) |
//! | 4   | C2 input: active edge. C2 output: 1 = manual mode         |
//! | 5   | C2 direction (1 = output)                                 |
//! | 6   | C2 interrupt flag (read only)                             |
//! | 7   | C1 interrupt flag (read only)                             |
//!
//! Reading a port data register clears both interrupt flags of that side.

use emu_core::{Observable, Value};

/// One side (A or B) of the PIA.
#[derive(Debug, Clone, Default)]
struct Side {
    /// Output register.
    output: u8,
    /// Data direction register (1 = output).
    ddr: u8,
    /// Control register, without the flag bits.
    control: u8,
    /// C1 interrupt flag (CRx bit 7).
    irq1: bool,
    /// C2 interrupt flag (CRx bit 6).
    irq2: bool,
    /// Previous C1 input level (for edge detection).
    c1_prev: bool,
    /// Previous C2 input level (for edge detection).
    #[cfg(test)]
    c2_prev: bool,
}

impl Side {
    fn new() -> Self {
        Self {
            c1_prev: true,
            #[cfg(test)]
            c2_prev: true,
            ..Self::default()
        }
    }

    fn control_register(&self) -> u8 {
        let mut value = self.control & 0x3F;
        if self.irq1 {
            value |= CR_IRQ1;
        }
        if self.irq2 {
            value |= CR_IRQ2;
        }
        value
    }

    fn write_control(&mut self, value: u8) {
        self.control = value & 0x3F;
        // An output-configured C2 cannot hold an input flag.
        if self.control & CR_C2_OUTPUT != 0 {
            self.irq2 = false;
        }
    }

    fn set_c1(&mut self, state: bool) {
        let rising = self.control & CR_C1_RISING != 0;
        let triggered = if rising {
            !self.c1_prev && state
        } else {
            self.c1_prev && !state
        };
        if triggered {
            self.irq1 = true;
        }
        self.c1_prev = state;
    }

    #[cfg(test)]
    fn set_c2(&mut self, state: bool) {
        if self.control & CR_C2_OUTPUT != 0 {
            self.c2_prev = state;
            return;
        }
        let rising = self.control & CR_C2_RISING != 0;
        let triggered = if rising {
            !self.c2_prev && state
        } else {
            self.c2_prev && !state
        };
        if triggered {
            self.irq2 = true;
        }
        self.c2_prev = state;
    }

    /// Level on C2 when it is configured as an output. Handshake and pulse
    /// modes idle high.
    fn c2_output(&self) -> bool {
        let manual = CR_C2_OUTPUT | CR_C2_MANUAL;
        if self.control & manual == manual {
            self.control & CR_C2_LEVEL != 0
        } else {
            true
        }
    }

    fn irq_active(&self) -> bool {
        let c1 = self.irq1 && self.control & CR_C1_ENABLE != 0;
        let c2 = self.irq2
            && self.control & CR_C2_OUTPUT == 0
            && self.control & CR_C2_ENABLE != 0;
        c1 || c2
    }

    fn port_selected(&self) -> bool {
        self.control & CR_PORT_SELECT != 0
    }

    fn pins(&self, external: u8) -> u8 {
        (self.output & self.ddr) | (external & !self.ddr)
    }
}

/// Motorola MC6821 Peripheral Interface Adapter.
#[derive(Debug, Clone)]
pub struct Pia6821 {
    a: Side,
    b: Side,
    /// External input lines for port A. Bits configured as inputs read
    /// from here.
    pub external_a: u8,
    /// External input lines for port B.
    pub external_b: u8,
}

impl Pia6821 {
    /// Create a new PIA with all registers in their reset state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            a: Side::new(),
            b: Side::new(),
            external_a: 0xFF,
            external_b: 0xFF,
        }
    }

    /// Clear every register, as the RESET pin does.
    pub fn reset(&mut self) {
        self.a = Side::new();
        self.b = Side::new();
    }

    /// Read a PIA register. Only the low two address bits are decoded.
    pub fn read(&mut self, reg: u8) -> u8 {
        match reg & 0x03 {
            0x00 if self.a.port_selected() => {
                self.a.irq1 = false;
                self.a.irq2 = false;
                self.a.pins(self.external_a)
            }
            0x00 => self.a.ddr,
            0x01 => self.a.control_register(),
            0x02 if self.b.port_selected() => {
                self.b.irq1 = false;
                self.b.irq2 = false;
                self.b.pins(self.external_b)
            }
            0x02 => self.b.ddr,
            _ => self.b.control_register(),
        }
    }

    /// Read a register without clearing interrupt flags.
    #[must_use]
    pub fn peek(&self, reg: u8) -> u8 {
        match reg & 0x03 {
            0x00 if self.a.port_selected() => self.a.pins(self.external_a),
            0x00 => self.a.ddr,
            0x01 => self.a.control_register(),
            0x02 if self.b.port_selected() => self.b.pins(self.external_b),
            0x02 => self.b.ddr,
            _ => self.b.control_register(),
        }
    }

    /// Write a PIA register.
    pub fn write(&mut self, reg: u8, value: u8) {
        match reg & 0x03 {
            0x00 if self.a.port_selected() => self.a.output = value,
            0x00 => self.a.ddr = value,
            0x01 => self.a.write_control(value),
            0x02 if self.b.port_selected() => self.b.output = value,
            0x02 => self.b.ddr = value,
            _ => self.b.write_control(value),
        }
    }

    /// Set the CA1 input line. Call this when the external signal changes.
    ///
    /// Edge detection follows CRA bit 1. The active edge sets CRA bit 7.
    pub fn set_ca1(&mut self, state: bool) {
        self.a.set_c1(state);
    }

    /// Set the CB1 input line. Edge detection follows CRB bit 1.
    pub fn set_cb1(&mut self, state: bool) {
        self.b.set_c1(state);
    }

    /// Set the CA2 line when it is configured as an input. The CoCo drives
    /// every C2 pin as an output, so only the tests feed C2 edges.
    #[cfg(test)]
    pub fn set_ca2(&mut self, state: bool) {
        self.a.set_c2(state);
    }

    /// Set the CB2 line when it is configured as an input.
    #[cfg(test)]
    pub fn set_cb2(&mut self, state: bool) {
        self.b.set_c2(state);
    }

    /// IRQA output (active).
    #[must_use]
    pub fn irq_a(&self) -> bool {
        self.a.irq_active()
    }

    /// IRQB output (active).
    #[must_use]
    pub fn irq_b(&self) -> bool {
        self.b.irq_active()
    }

    /// Either IRQ output. Boards that wire-OR the two outputs use this.
    #[must_use]
    pub fn irq_active(&self) -> bool {
        self.irq_a() || self.irq_b()
    }

    /// Port A output value (combines output register and DDR). Input bits
    /// read as 1, the pull-up level.
    #[must_use]
    pub fn port_a_output(&self) -> u8 {
        (self.a.output & self.a.ddr) | !self.a.ddr
    }

    /// Port B output value. Input bits read as 1.
    #[must_use]
    pub fn port_b_output(&self) -> u8 {
        (self.b.output & self.b.ddr) | !self.b.ddr
    }

    /// CA2 output level.
    #[must_use]
    pub fn ca2_output(&self) -> bool {
        self.a.c2_output()
    }

    /// CB2 output level.
    #[must_use]
    pub fn cb2_output(&self) -> bool {
        self.b.c2_output()
    }

    /// CRA including flag bits.
    #[must_use]
    pub fn cra(&self) -> u8 {
        self.a.control_register()
    }

    /// CRB including flag bits.
    #[must_use]
    pub fn crb(&self) -> u8 {
        self.b.control_register()
    }
}

impl Default for Pia6821 {
    fn default() -> Self {
        Self::new()
    }
}

impl Observable for Pia6821 {
    fn query(&self, path: &str) -> Option<Value> {
        match path {
            "cra" => Some(self.cra().into()),
            "crb" => Some(self.crb().into()),
            "ddra" => Some(self.a.ddr.into()),
            "ddrb" => Some(self.b.ddr.into()),
            "ora" => Some(self.a.output.into()),
            "orb" => Some(self.b.output.into()),
            "irqa" => Some(self.irq_a().into()),
            "irqb" => Some(self.irq_b().into()),
            "ca2" => Some(self.ca2_output().into()),
            "cb2" => Some(self.cb2_output().into()),
            _ => None,
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &[
            "cra", "crb", "ddra", "ddrb", "ora", "orb", "irqa", "irqb", "ca2", "cb2",
        ]
    }
}

// Control register bits
const CR_C1_ENABLE: u8 = 0x01;
const CR_C1_RISING: u8 = 0x02;
const CR_PORT_SELECT: u8 = 0x04;
const CR_C2_ENABLE: u8 = 0x08;
const CR_C2_LEVEL: u8 = 0x08;
#[cfg(test)]
const CR_C2_RISING: u8 = 0x10;
const CR_C2_MANUAL: u8 = 0x10;
const CR_C2_OUTPUT: u8 = 0x20;
const CR_IRQ2: u8 = 0x40;
const CR_IRQ1: u8 = 0x80;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ddr_selected_until_control_bit_2_set() {
        let mut pia = Pia6821::new();
        pia.write(0x00, 0xF0); // DDRA
        assert_eq!(pia.read(0x00), 0xF0);

        pia.write(0x01, CR_PORT_SELECT);
        pia.write(0x00, 0xAB); // ORA
        pia.external_a = 0x05;
        // Output bits from ORA, input bits from the pins
        assert_eq!(pia.read(0x00), 0xA5);
    }

    #[test]
    fn port_b_output_reflects_ddr() {
        let mut pia = Pia6821::new();
        pia.write(0x02, 0xFF); // DDRB all output
        pia.write(0x03, CR_PORT_SELECT);
        pia.write(0x02, 0xFE);
        assert_eq!(pia.port_b_output(), 0xFE);
    }

    #[test]
    fn ca1_falling_edge_sets_flag() {
        let mut pia = Pia6821::new();
        pia.set_ca1(false);
        assert_ne!(pia.cra() & CR_IRQ1, 0);
        // Not enabled, so no IRQ output.
        assert!(!pia.irq_a());
    }

    #[test]
    fn ca1_rising_edge_when_selected() {
        let mut pia = Pia6821::new();
        pia.write(0x01, CR_C1_RISING | CR_C1_ENABLE);
        pia.set_ca1(false);
        assert_eq!(pia.cra() & CR_IRQ1, 0);
        pia.set_ca1(true);
        assert_ne!(pia.cra() & CR_IRQ1, 0);
        assert!(pia.irq_a());
    }

    #[test]
    fn reading_port_clears_flags() {
        let mut pia = Pia6821::new();
        pia.write(0x03, CR_PORT_SELECT | CR_C1_ENABLE);
        pia.set_cb1(false);
        assert!(pia.irq_b());
        let _ = pia.read(0x02);
        assert!(!pia.irq_b());
        assert_eq!(pia.crb() & CR_IRQ1, 0);
    }

    #[test]
    fn reading_ddr_keeps_flags() {
        let mut pia = Pia6821::new();
        pia.write(0x01, CR_C1_ENABLE);
        pia.set_ca1(false);
        let _ = pia.read(0x00); // DDRA
        assert!(pia.irq_a());
    }

    #[test]
    fn peek_has_no_side_effects() {
        let mut pia = Pia6821::new();
        pia.write(0x01, CR_PORT_SELECT | CR_C1_ENABLE);
        pia.set_ca1(false);
        let _ = pia.peek(0x00);
        assert!(pia.irq_a());
    }

    #[test]
    fn control_flags_are_read_only() {
        let mut pia = Pia6821::new();
        pia.write(0x01, 0xFF);
        assert_eq!(pia.cra(), 0x3F);
    }

    #[test]
    fn c2_manual_output() {
        let mut pia = Pia6821::new();
        pia.write(0x01, CR_C2_OUTPUT | CR_C2_MANUAL);
        assert!(!pia.ca2_output());
        pia.write(0x01, CR_C2_OUTPUT | CR_C2_MANUAL | CR_C2_LEVEL);
        assert!(pia.ca2_output());
    }

    #[test]
    fn c2_input_edge_interrupt() {
        let mut pia = Pia6821::new();
        pia.write(0x03, CR_C2_ENABLE);
        pia.set_cb2(false);
        assert_ne!(pia.crb() & CR_IRQ2, 0);
        assert!(pia.irq_b());
    }

    #[test]
    fn c2_as_output_ignores_edges() {
        let mut pia = Pia6821::new();
        pia.write(0x01, CR_C2_OUTPUT | CR_C2_MANUAL);
        pia.set_ca2(false);
        assert_eq!(pia.cra() & CR_IRQ2, 0);
    }

    #[test]
    fn reset_clears_registers() {
        let mut pia = Pia6821::new();
        pia.write(0x00, 0xFF);
        pia.write(0x01, 0x3F);
        pia.reset();
        assert_eq!(pia.read(0x00), 0x00);
        assert_eq!(pia.cra(), 0x00);
    }

    #[test]
    fn observable_reports_registers() {
        let mut pia = Pia6821::new();
        pia.write(0x02, 0x0F);
        assert_eq!(pia.query("ddrb"), Some(Value::U8(0x0F)));
        assert_eq!(pia.query("bogus"), None);
    }
}
