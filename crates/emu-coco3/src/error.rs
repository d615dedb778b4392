//! Error types for machine construction and the host facade.
//!
//! Only configuration and cartridge problems are errors. Everything the
//! emulated software can provoke (illegal opcodes, unmapped reads, odd bank
//! numbers) has defined hardware behaviour instead.

use thiserror::Error;

/// Rejected [`EmulatorConfig`](crate::EmulatorConfig).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unsupported RAM size {0}K (expected 128, 512, 2048 or 8192)")]
    InvalidRamSize(u32),
    #[error("no system ROM image supplied")]
    MissingRom,
    #[error("system ROM is {0} bytes, expected {expected}", expected = crate::config::SYSTEM_ROM_SIZE)]
    InvalidRomSize(usize),
    #[error("overclock multiplier {0} outside 1..={max}", max = crate::config::MAX_OVERCLOCK)]
    InvalidOverclock(u32),
}

/// Rejected cartridge image.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartridgeError {
    #[error("cartridge image is empty")]
    Empty,
    #[error("cartridge image is {len} bytes, limit is {max}")]
    TooLarge { len: usize, max: usize },
}

/// Failure reported by the [`Emulator`](crate::Emulator) facade.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmulatorError {
    #[error("configuration rejected: {0}")]
    Config(#[from] ConfigError),
    #[error("cartridge rejected: {0}")]
    Cartridge(#[from] CartridgeError),
    #[error("emulator has not been initialised")]
    NotReady,
}
