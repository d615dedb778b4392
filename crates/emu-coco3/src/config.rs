//! CoCo 3 configuration: RAM size, CPU fitted, ROM image and host rates.

use motorola_6809::Variant;

use crate::error::ConfigError;

/// Size of the internal system ROM image (Color BASIC, Extended and Super
/// Extended BASIC in one 32K part).
pub const SYSTEM_ROM_SIZE: usize = 0x8000;

/// Highest accepted overclock multiplier.
pub const MAX_OVERCLOCK: u32 = 100;

/// Default host audio rate in samples per second.
pub const DEFAULT_AUDIO_RATE: u32 = 44_100;

/// Installed RAM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RamSize {
    /// Stock 128K machine.
    #[default]
    K128,
    /// 512K upgrade, the full GIME block space.
    K512,
    /// 2M upgrade using two extension bits in $FF9B.
    M2,
    /// 8M upgrade using four extension bits in $FF9B.
    M8,
}

impl RamSize {
    /// Parse a size given in kilobytes.
    pub fn from_kilobytes(kilobytes: u32) -> Result<Self, ConfigError> {
        match kilobytes {
            128 => Ok(Self::K128),
            512 => Ok(Self::K512),
            2048 => Ok(Self::M2),
            8192 => Ok(Self::M8),
            other => Err(ConfigError::InvalidRamSize(other)),
        }
    }

    #[must_use]
    pub fn kilobytes(self) -> u32 {
        match self {
            Self::K128 => 128,
            Self::K512 => 512,
            Self::M2 => 2048,
            Self::M8 => 8192,
        }
    }

    #[must_use]
    pub fn bytes(self) -> usize {
        self.kilobytes() as usize * 1024
    }

    /// Mask applied to the 6-bit MMU block number before extension bits.
    #[must_use]
    pub(crate) fn block_mask(self) -> u16 {
        match self {
            Self::K128 => 0x0F,
            Self::K512 | Self::M2 | Self::M8 => 0x3F,
        }
    }

    /// Mask applied to the $FF9B extension bits.
    #[must_use]
    pub(crate) fn extension_mask(self) -> u8 {
        match self {
            Self::K128 | Self::K512 => 0x00,
            Self::M2 => 0x03,
            Self::M8 => 0x0F,
        }
    }
}

/// CPU fitted to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CpuType {
    #[default]
    Mc6809,
    Hd6309,
}

impl CpuType {
    #[must_use]
    pub fn variant(self) -> Variant {
        match self {
            Self::Mc6809 => Variant::Mc6809,
            Self::Hd6309 => Variant::Hd6309,
        }
    }
}

/// Configuration for constructing a [`Coco3`](crate::Coco3).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EmulatorConfig {
    pub ram_size: RamSize,
    pub cpu_type: CpuType,
    /// Internal ROM, 32K, mapped at physical blocks $3C-$3F.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub system_rom: Vec<u8>,
    /// Audio sample rate in Hz. 0 disables audio.
    pub audio_rate: u32,
    /// CPU speed multiplier on top of the SAM rate select.
    pub overclock: u32,
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        Self {
            ram_size: RamSize::default(),
            cpu_type: CpuType::default(),
            system_rom: Vec::new(),
            audio_rate: DEFAULT_AUDIO_RATE,
            overclock: 1,
        }
    }
}

impl EmulatorConfig {
    #[must_use]
    pub fn with_ram_size(mut self, ram_size: RamSize) -> Self {
        self.ram_size = ram_size;
        self
    }

    #[must_use]
    pub fn with_cpu_type(mut self, cpu_type: CpuType) -> Self {
        self.cpu_type = cpu_type;
        self
    }

    #[must_use]
    pub fn with_system_rom(mut self, rom: Vec<u8>) -> Self {
        self.system_rom = rom;
        self
    }

    #[must_use]
    pub fn with_audio_rate(mut self, rate: u32) -> Self {
        self.audio_rate = rate;
        self
    }

    #[must_use]
    pub fn with_overclock(mut self, overclock: u32) -> Self {
        self.overclock = overclock;
        self
    }

    /// Check the configuration before any machine state is allocated.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.system_rom.is_empty() {
            return Err(ConfigError::MissingRom);
        }
        if self.system_rom.len() != SYSTEM_ROM_SIZE {
            return Err(ConfigError::InvalidRomSize(self.system_rom.len()));
        }
        if !(1..=MAX_OVERCLOCK).contains(&self.overclock) {
            return Err(ConfigError::InvalidOverclock(self.overclock));
        }
        Ok(())
    }
}
