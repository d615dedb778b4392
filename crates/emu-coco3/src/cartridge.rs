//! Program Pak ROM cartridges.
//!
//! A cartridge is a raw ROM image seen through the GIME's cartridge window.
//! Images of 16K or less mirror across the window. Larger images are split
//! into 16K banks; a write to $FF40 picks the bank shown at offset 0 of the
//! window and the rest of the window follows it.

use log::info;

use crate::error::CartridgeError;

/// Largest accepted image.
pub const MAX_CARTRIDGE_SIZE: usize = 512 * 1024;

const BANK_SIZE: usize = 0x4000;

/// A loaded cartridge ROM.
#[derive(Debug, Clone)]
pub struct Cartridge {
    name: String,
    rom: Vec<u8>,
    bank: u8,
}

impl Cartridge {
    /// Wrap a ROM image. The name is kept for display only.
    pub fn from_bytes(name: &str, data: &[u8]) -> Result<Self, CartridgeError> {
        if data.is_empty() {
            return Err(CartridgeError::Empty);
        }
        if data.len() > MAX_CARTRIDGE_SIZE {
            return Err(CartridgeError::TooLarge {
                len: data.len(),
                max: MAX_CARTRIDGE_SIZE,
            });
        }
        info!("cartridge: {name} ({} bytes)", data.len());
        Ok(Self {
            name: name.to_string(),
            rom: data.to_vec(),
            bank: 0,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rom.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rom.is_empty()
    }

    #[must_use]
    pub fn bank(&self) -> u8 {
        self.bank
    }

    /// Bank select port ($FF40).
    pub fn write_bank(&mut self, value: u8) {
        self.bank = value;
    }

    pub fn reset(&mut self) {
        self.bank = 0;
    }

    /// Read at an offset within the 32K cartridge window.
    #[must_use]
    pub fn read(&self, offset: u16) -> u8 {
        let offset = usize::from(offset);
        let index = if self.rom.len() <= BANK_SIZE {
            offset
        } else {
            usize::from(self.bank) * BANK_SIZE + offset
        };
        self.rom[index % self.rom.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i / BANK_SIZE) as u8 ^ (i as u8)).collect()
    }

    #[test]
    fn rejects_empty_and_oversize() {
        assert_eq!(
            Cartridge::from_bytes("x", &[]).unwrap_err(),
            CartridgeError::Empty
        );
        let big = vec![0; MAX_CARTRIDGE_SIZE + 1];
        assert!(matches!(
            Cartridge::from_bytes("x", &big),
            Err(CartridgeError::TooLarge { .. })
        ));
    }

    #[test]
    fn small_image_mirrors() {
        let cart = Cartridge::from_bytes("8k", &image(0x2000)).unwrap();
        assert_eq!(cart.read(0x0005), cart.read(0x2005));
        assert_eq!(cart.read(0x0005), cart.read(0x6005));
    }

    #[test]
    fn bank_select_pages_large_images() {
        let data = image(0x10000);
        let mut cart = Cartridge::from_bytes("64k", &data).unwrap();
        assert_eq!(cart.read(0x0010), data[0x0010]);
        cart.write_bank(2);
        assert_eq!(cart.read(0x0010), data[0x8010]);
        assert_eq!(cart.read(0x4010), data[0xC010]);
        // Bank numbers past the image wrap.
        cart.write_bank(5);
        assert_eq!(cart.read(0x0010), data[0x4010]);
        cart.reset();
        assert_eq!(cart.bank(), 0);
    }

    #[test]
    fn keeps_name() {
        let cart = Cartridge::from_bytes("Demo Pak", &[1, 2, 3]).unwrap();
        assert_eq!(cart.name(), "Demo Pak");
        assert_eq!(cart.len(), 3);
    }
}
