//! CPU variant capabilities.

/// Which CPU sits in the socket.
///
/// Both variants run through the same interpreter. The variant only
/// decides which opcodes decode, which cycle table applies and what an
/// undefined opcode does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Variant {
    /// Motorola MC6809.
    #[default]
    Mc6809,
    /// Hitachi HD6309: E/F/V/MD registers, extra opcodes, native mode.
    Hd6309,
}

impl Variant {
    /// E, F, W, V, Q and MD exist.
    #[must_use]
    pub const fn has_extended_registers(self) -> bool {
        matches!(self, Self::Hd6309)
    }

    /// Undefined opcodes trap through $FFF0 instead of running as a no-op.
    #[must_use]
    pub const fn traps_illegal_opcodes(self) -> bool {
        matches!(self, Self::Hd6309)
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Mc6809 => "MC6809",
            Self::Hd6309 => "HD6309",
        }
    }
}
