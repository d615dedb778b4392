//! CoCo 3 memory: GIME MMU, banked RAM and the ROM overlay.
//!
//! The GIME splits the 64K logical space into eight 8K slots. With the MMU
//! enabled each slot takes its physical block number from the active task
//! register set ($FFA0-$FFA7 for task 0, $FFA8-$FFAF for task 1). With it
//! disabled the slots map to blocks $38-$3F.
//!
//! # Physical decode
//!
//! | Block      | Backing                                          |
//! |------------|--------------------------------------------------|
//! | $00-$3B    | RAM                                              |
//! | $3C-$3F    | ROM unless all-RAM mode ($FFDF), else RAM        |
//!
//! The ROM window covers 32K. INIT0 bits 0-1 pick what sits in it:
//!
//! | MC1 MC0 | $8000-$BFFF     | $C000-$FEFF     |
//! |---------|-----------------|-----------------|
//! | 0   x   | internal        | cartridge       |
//! | 1   0   | internal        | internal        |
//! | 1   1   | cartridge       | cartridge       |
//!
//! RAM sizes below 512K ignore the high block bits. The 2M and 8M
//! upgrades extend the block number with bits from $FF9B.
//!
//! Logical $FF00-$FFFF never reaches this module: it is the I/O page and
//! the bus decodes it before RAM or ROM.

#![allow(clippy::cast_possible_truncation)]

use crate::cartridge::Cartridge;
use crate::config::{RamSize, SYSTEM_ROM_SIZE};

/// Value read from addresses that nothing drives.
pub const OPEN_BUS: u8 = 0xFF;

/// First physical block of the ROM window.
const ROM_FIRST_BLOCK: u16 = 0x3C;

/// Block used for the constant $FE page (INIT0 bit 3).
const CONSTANT_PAGE_BLOCK: u16 = 0x3F;

const BLOCK_SIZE: usize = 0x2000;

/// ROM window contents selected by INIT0 bits 0-1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RomMap {
    /// 16K internal at $8000, 16K cartridge at $C000.
    Split,
    /// 32K internal.
    Internal,
    /// 32K cartridge.
    External,
}

impl RomMap {
    fn from_init0(value: u8) -> Self {
        match value & 0x03 {
            0x02 => Self::Internal,
            0x03 => Self::External,
            _ => Self::Split,
        }
    }
}

/// Where a logical address lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Physical {
    /// Offset into RAM. May lie past the installed size.
    Ram(usize),
    /// Offset into the internal ROM.
    Rom(usize),
    /// Offset into the 32K cartridge window.
    Cartridge(u16),
}

/// MMU registers.
#[derive(Debug, Clone)]
pub struct Mmu {
    pub enabled: bool,
    /// INIT0 bit 3: $FE00-$FEFF always maps to the top RAM block.
    pub constant_page: bool,
    pub rom_map: RomMap,
    /// SAM TY bit ($FFDF): ROM window replaced by RAM.
    pub all_ram: bool,
    /// Active task (INIT1 bit 0).
    pub task: usize,
    /// Task register sets, eight slots each.
    pub tasks: [[u8; 8]; 2],
    /// Block extension bits from $FF9B for the 2M/8M upgrades.
    pub extension: u8,
}

impl Mmu {
    fn new() -> Self {
        Self {
            enabled: false,
            constant_page: false,
            rom_map: RomMap::Split,
            all_ram: false,
            task: 0,
            tasks: [[0x38, 0x39, 0x3A, 0x3B, 0x3C, 0x3D, 0x3E, 0x3F]; 2],
            extension: 0,
        }
    }

    /// Apply the memory-related bits of INIT0 ($FF90).
    pub fn write_init0(&mut self, value: u8) {
        self.enabled = value & 0x40 != 0;
        self.constant_page = value & 0x08 != 0;
        self.rom_map = RomMap::from_init0(value);
    }

    /// Task register access, `index` 0-15 ($FFA0-$FFAF).
    #[must_use]
    pub fn register(&self, index: usize) -> u8 {
        self.tasks[(index >> 3) & 1][index & 7]
    }

    pub fn set_register(&mut self, index: usize, value: u8) {
        self.tasks[(index >> 3) & 1][index & 7] = value & 0x3F;
    }

    /// Physical block number for a logical address, with extension bits.
    fn block(&self, addr: u16, ram_size: RamSize) -> u16 {
        let raw = if self.constant_page && addr & 0xFF00 == 0xFE00 {
            CONSTANT_PAGE_BLOCK
        } else if self.enabled {
            u16::from(self.tasks[self.task][usize::from(addr >> 13)])
        } else {
            0x38 + (addr >> 13)
        };
        let extension = u16::from(self.extension & ram_size.extension_mask());
        (extension << 6) | (raw & 0x3F)
    }
}

/// RAM, internal ROM and the MMU that maps them.
pub struct Memory {
    ram: Vec<u8>,
    ram_size: RamSize,
    rom: Vec<u8>,
    pub mmu: Mmu,
}

impl Memory {
    /// Allocate RAM for the session. `rom` must be [`SYSTEM_ROM_SIZE`]
    /// bytes; shorter images read as open bus past their end.
    #[must_use]
    pub fn new(ram_size: RamSize, rom: &[u8]) -> Self {
        Self {
            ram: vec![0; ram_size.bytes()],
            ram_size,
            rom: rom.to_vec(),
            mmu: Mmu::new(),
        }
    }

    /// Clear RAM and return the MMU to its power-on mapping.
    pub fn reset(&mut self) {
        self.ram.fill(0);
        self.mmu = Mmu::new();
    }

    #[must_use]
    pub fn ram_size(&self) -> RamSize {
        self.ram_size
    }

    #[must_use]
    pub fn ram(&self) -> &[u8] {
        &self.ram
    }

    /// Resolve a logical address below the I/O page.
    #[must_use]
    pub fn translate(&self, addr: u16) -> Physical {
        let block = self.mmu.block(addr, self.ram_size);
        let low = block & 0x3F;
        let in_rom_window = block >> 6 == 0
            && low >= ROM_FIRST_BLOCK
            && !self.mmu.all_ram
            && !(self.mmu.constant_page && addr & 0xFF00 == 0xFE00);
        if in_rom_window {
            let window = ((low - ROM_FIRST_BLOCK) << 13) | (addr & 0x1FFF);
            return match self.mmu.rom_map {
                RomMap::Internal => Physical::Rom(usize::from(window)),
                RomMap::External => Physical::Cartridge(window),
                RomMap::Split if window < 0x4000 => Physical::Rom(usize::from(window)),
                RomMap::Split => Physical::Cartridge(window - 0x4000),
            };
        }
        let masked = (block & !0x3F) | (low & self.ram_size.block_mask());
        Physical::Ram(usize::from(masked) * BLOCK_SIZE + usize::from(addr & 0x1FFF))
    }

    /// CPU read of a non-I/O address.
    #[must_use]
    pub fn read(&self, addr: u16, cartridge: Option<&Cartridge>) -> u8 {
        match self.translate(addr) {
            Physical::Ram(offset) => self.ram.get(offset).copied().unwrap_or(OPEN_BUS),
            Physical::Rom(offset) => self.rom.get(offset).copied().unwrap_or(OPEN_BUS),
            Physical::Cartridge(offset) => cartridge.map_or(OPEN_BUS, |cart| cart.read(offset)),
        }
    }

    /// CPU write of a non-I/O address. ROM and cartridge writes are dropped.
    pub fn write(&mut self, addr: u16, value: u8) {
        if let Physical::Ram(offset) = self.translate(addr)
            && let Some(cell) = self.ram.get_mut(offset)
        {
            *cell = value;
        }
    }

    /// Interrupt and reset vectors ($FFF0-$FFFF) come from the top of the
    /// internal ROM whatever the MMU state.
    #[must_use]
    pub fn vector(&self, addr: u16) -> u8 {
        let offset = SYSTEM_ROM_SIZE - 0x10 + usize::from(addr & 0x0F);
        self.rom.get(offset).copied().unwrap_or(OPEN_BUS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rom() -> Vec<u8> {
        let mut rom = vec![0u8; SYSTEM_ROM_SIZE];
        rom[0] = 0xA0;
        rom[0x4000] = 0xC0;
        rom[0x7FFE] = 0x8C;
        rom[0x7FFF] = 0x1B;
        rom
    }

    fn cartridge() -> Cartridge {
        let mut data = vec![0u8; 0x4000];
        data[0] = 0xCA;
        Cartridge::from_bytes("test", &data).expect("valid cartridge")
    }

    #[test]
    fn power_on_maps_blocks_38_to_3f() {
        let mem = Memory::new(RamSize::K128, &rom());
        assert_eq!(mem.translate(0x0000), Physical::Ram(0x08 * BLOCK_SIZE));
        assert_eq!(mem.translate(0x8000), Physical::Rom(0));
        assert_eq!(mem.translate(0xC000), Physical::Cartridge(0));
    }

    #[test]
    fn rom_map_modes() {
        let mut mem = Memory::new(RamSize::K512, &rom());
        let cart = cartridge();
        assert_eq!(mem.read(0xC000, Some(&cart)), 0xCA);
        mem.mmu.write_init0(0x02);
        assert_eq!(mem.read(0xC000, Some(&cart)), 0xC0);
        mem.mmu.write_init0(0x03);
        assert_eq!(mem.read(0x8000, Some(&cart)), 0xCA);
    }

    #[test]
    fn empty_cartridge_window_reads_open_bus() {
        let mem = Memory::new(RamSize::K128, &rom());
        assert_eq!(mem.read(0xC000, None), OPEN_BUS);
    }

    #[test]
    fn all_ram_mode_replaces_rom() {
        let mut mem = Memory::new(RamSize::K512, &rom());
        mem.mmu.all_ram = true;
        mem.write(0x8000, 0x55);
        assert_eq!(mem.read(0x8000, None), 0x55);
        assert_eq!(mem.ram()[0x3C * BLOCK_SIZE], 0x55);
    }

    #[test]
    fn rom_writes_are_dropped() {
        let mut mem = Memory::new(RamSize::K512, &rom());
        mem.write(0x8000, 0x55);
        assert_eq!(mem.read(0x8000, None), 0xA0);
    }

    #[test]
    fn mmu_task_registers_take_effect_immediately() {
        let mut mem = Memory::new(RamSize::K512, &rom());
        mem.mmu.write_init0(0x40);
        mem.mmu.set_register(0, 0x05);
        mem.write(0x0010, 0x77);
        assert_eq!(mem.ram()[0x05 * BLOCK_SIZE + 0x10], 0x77);

        mem.mmu.set_register(8, 0x06);
        mem.mmu.task = 1;
        assert_eq!(mem.read(0x0010, None), 0x00);
        mem.mmu.task = 0;
        assert_eq!(mem.read(0x0010, None), 0x77);
    }

    #[test]
    fn small_ram_ignores_high_block_bits() {
        let mut mem = Memory::new(RamSize::K128, &rom());
        mem.mmu.write_init0(0x40);
        mem.mmu.set_register(0, 0x15);
        mem.write(0x0000, 0x42);
        assert_eq!(mem.ram()[0x05 * BLOCK_SIZE], 0x42);
    }

    #[test]
    fn constant_page_maps_top_block() {
        let mut mem = Memory::new(RamSize::K512, &rom());
        mem.mmu.write_init0(0x48);
        mem.mmu.set_register(7, 0x00);
        mem.write(0xFE10, 0x99);
        assert_eq!(mem.ram()[0x3F * BLOCK_SIZE + 0x1E10], 0x99);
        mem.write(0xE010, 0x11);
        assert_eq!(mem.ram()[0x0010], 0x11);
    }

    #[test]
    fn extension_bits_select_upper_banks() {
        let mut mem = Memory::new(RamSize::M2, &rom());
        mem.mmu.write_init0(0x40);
        mem.mmu.set_register(0, 0x01);
        mem.mmu.extension = 0x02;
        mem.write(0x0000, 0x33);
        assert_eq!(mem.ram()[(0x80 + 0x01) * BLOCK_SIZE], 0x33);
    }

    #[test]
    fn vectors_come_from_rom_top() {
        let mem = Memory::new(RamSize::K128, &rom());
        assert_eq!(mem.vector(0xFFFE), 0x8C);
        assert_eq!(mem.vector(0xFFFF), 0x1B);
    }
}
