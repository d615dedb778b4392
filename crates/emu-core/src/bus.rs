//! Memory and I/O bus interface.

/// Memory and I/O bus interface.
///
/// The CPU reaches RAM, ROM, cartridge space and memory-mapped peripherals
/// only through this trait. The bus decodes the 16-bit logical address and
/// routes the access.
pub trait Bus {
    /// Read a byte from the given address. May trigger port side effects.
    fn read(&mut self, address: u16) -> u8;

    /// Write a byte to the given address.
    fn write(&mut self, address: u16, value: u8);

    /// Read a byte without side effects (debuggers, observers, tests).
    fn peek(&self, address: u16) -> u8;

    /// Read a big-endian word as two byte reads, high byte first.
    ///
    /// A port read side effect fires once per byte, in address order.
    fn read_word(&mut self, address: u16) -> u16 {
        let hi = self.read(address);
        let lo = self.read(address.wrapping_add(1));
        u16::from_be_bytes([hi, lo])
    }

    /// Write a big-endian word as two byte writes, high byte first.
    fn write_word(&mut self, address: u16, value: u16) {
        let [hi, lo] = value.to_be_bytes();
        self.write(address, hi);
        self.write(address.wrapping_add(1), lo);
    }
}

/// Flat 64K RAM bus with no decoding. Used by CPU tests.
pub struct SimpleBus {
    ram: Box<[u8; 0x10000]>,
}

impl SimpleBus {
    #[must_use]
    pub fn new() -> Self {
        Self {
            ram: Box::new([0; 0x10000]),
        }
    }

    /// Copy `data` into RAM starting at `address`, wrapping at $FFFF.
    pub fn load(&mut self, address: u16, data: &[u8]) {
        let mut addr = address;
        for &byte in data {
            self.ram[addr as usize] = byte;
            addr = addr.wrapping_add(1);
        }
    }

    /// Store a big-endian word, typically an interrupt vector.
    pub fn set_word(&mut self, address: u16, value: u16) {
        self.load(address, &value.to_be_bytes());
    }
}

impl Default for SimpleBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus for SimpleBus {
    fn read(&mut self, address: u16) -> u8 {
        self.ram[address as usize]
    }

    fn write(&mut self, address: u16, value: u8) {
        self.ram[address as usize] = value;
    }

    fn peek(&self, address: u16) -> u8 {
        self.ram[address as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Counts reads so word access ordering can be checked.
    struct CountingBus {
        log: Vec<u16>,
    }

    impl Bus for CountingBus {
        fn read(&mut self, address: u16) -> u8 {
            self.log.push(address);
            address as u8
        }

        fn write(&mut self, address: u16, _value: u8) {
            self.log.push(address);
        }

        fn peek(&self, _address: u16) -> u8 {
            0
        }
    }

    #[test]
    fn word_read_is_big_endian_two_accesses() {
        let mut bus = CountingBus { log: Vec::new() };
        let value = bus.read_word(0x1234);
        assert_eq!(value, 0x3435);
        assert_eq!(bus.log, vec![0x1234, 0x1235]);
    }

    #[test]
    fn word_access_wraps_at_top_of_memory() {
        let mut bus = SimpleBus::new();
        bus.write_word(0xFFFF, 0xABCD);
        assert_eq!(bus.peek(0xFFFF), 0xAB);
        assert_eq!(bus.peek(0x0000), 0xCD);
        assert_eq!(bus.read_word(0xFFFF), 0xABCD);
    }
}
