//! Base cycle counts per opcode.
//!
//! Three table sets: MC6809, HD6309 in emulation mode and HD6309 in native
//! mode. A zero entry means the opcode is undefined for that CPU. Counts
//! for prefixed opcodes include the prefix byte. Indexed postbyte costs,
//! taken long branches, stack bytes and block transfers are added by the
//! interpreter.

/// Cycle tables for one CPU/mode combination.
pub(crate) struct CycleTable {
    pub page0: [u8; 256],
    pub page2: [u8; 256],
    pub page3: [u8; 256],
}

#[rustfmt::skip]
const PAGE0_EMULATION: [u8; 256] = [
//  0   1   2   3   4   5   6   7   8   9   A   B   C   D   E   F
    6,  6,  6,  6,  6,  6,  6,  6,  6,  6,  6,  6,  6,  6,  3,  6, // 0x
    0,  0,  2,  4,  4,  0,  5,  9,  0,  2,  3,  0,  3,  2,  8,  6, // 1x
    3,  3,  3,  3,  3,  3,  3,  3,  3,  3,  3,  3,  3,  3,  3,  3, // 2x
    4,  4,  4,  4,  5,  5,  5,  5,  0,  5,  3,  6, 20, 11,  0, 19, // 3x
    2,  0,  0,  2,  2,  0,  2,  2,  2,  2,  2,  0,  2,  2,  0,  2, // 4x
    2,  0,  0,  2,  2,  0,  2,  2,  2,  2,  2,  0,  2,  2,  0,  2, // 5x
    6,  7,  7,  6,  6,  7,  6,  6,  6,  6,  6,  7,  6,  6,  3,  6, // 6x
    7,  7,  7,  7,  7,  7,  7,  7,  7,  7,  7,  7,  7,  7,  4,  7, // 7x
    2,  2,  2,  4,  2,  2,  2,  0,  2,  2,  2,  2,  4,  7,  3,  0, // 8x
    4,  4,  4,  6,  4,  4,  4,  4,  4,  4,  4,  4,  6,  7,  5,  5, // 9x
    4,  4,  4,  6,  4,  4,  4,  4,  4,  4,  4,  4,  6,  7,  5,  5, // Ax
    5,  5,  5,  7,  5,  5,  5,  5,  5,  5,  5,  5,  7,  8,  6,  6, // Bx
    2,  2,  2,  4,  2,  2,  2,  0,  2,  2,  2,  2,  3,  5,  3,  0, // Cx
    4,  4,  4,  6,  4,  4,  4,  4,  4,  4,  4,  4,  5,  5,  5,  5, // Dx
    4,  4,  4,  6,  4,  4,  4,  4,  4,  4,  4,  4,  5,  5,  5,  5, // Ex
    5,  5,  5,  7,  5,  5,  5,  5,  5,  5,  5,  5,  6,  6,  6,  6, // Fx
];

#[rustfmt::skip]
const PAGE0_NATIVE: [u8; 256] = [
//  0   1   2   3   4   5   6   7   8   9   A   B   C   D   E   F
    5,  6,  6,  5,  5,  6,  5,  5,  5,  5,  5,  6,  5,  4,  2,  5, // 0x
    0,  0,  1,  3,  4,  0,  4,  7,  0,  1,  2,  0,  3,  1,  5,  4, // 1x
    3,  3,  3,  3,  3,  3,  3,  3,  3,  3,  3,  3,  3,  3,  3,  3, // 2x
    4,  4,  4,  4,  4,  4,  4,  4,  0,  4,  1,  6, 22, 10,  0, 21, // 3x
    1,  0,  0,  1,  1,  0,  1,  1,  1,  1,  1,  0,  1,  1,  0,  1, // 4x
    1,  0,  0,  1,  1,  0,  1,  1,  1,  1,  1,  0,  1,  1,  0,  1, // 5x
    6,  7,  7,  6,  6,  7,  6,  6,  6,  6,  6,  7,  6,  5,  3,  6, // 6x
    6,  7,  7,  6,  6,  7,  6,  6,  6,  6,  6,  7,  6,  5,  3,  6, // 7x
    2,  2,  2,  3,  2,  2,  2,  0,  2,  2,  2,  2,  3,  6,  3,  0, // 8x
    3,  3,  3,  4,  3,  3,  3,  3,  3,  3,  3,  3,  4,  6,  4,  4, // 9x
    4,  4,  4,  5,  4,  4,  4,  4,  4,  4,  4,  4,  5,  6,  5,  5, // Ax
    4,  4,  4,  5,  4,  4,  4,  4,  4,  4,  4,  4,  5,  7,  5,  5, // Bx
    2,  2,  2,  3,  2,  2,  2,  0,  2,  2,  2,  2,  3,  5,  3,  0, // Cx
    3,  3,  3,  4,  3,  3,  3,  3,  3,  3,  3,  3,  4,  4,  4,  4, // Dx
    4,  4,  4,  5,  4,  4,  4,  4,  4,  4,  4,  4,  5,  5,  5,  5, // Ex
    4,  4,  4,  5,  4,  4,  4,  4,  4,  4,  4,  4,  5,  5,  5,  5, // Fx
];

/// Page 0 opcodes that exist only on the HD6309.
const HD6309_ONLY_PAGE0: [u8; 14] = [
    0x01, 0x02, 0x05, 0x0B, 0x14, 0x61, 0x62, 0x65, 0x6B, 0x71, 0x72, 0x75, 0x7B, 0xCD,
];

const fn strip_hd6309_page0(table: [u8; 256]) -> [u8; 256] {
    let mut out = table;
    let mut i = 0;
    while i < HD6309_ONLY_PAGE0.len() {
        out[HD6309_ONLY_PAGE0[i] as usize] = 0;
        i += 1;
    }
    out
}

/// Page 2 ($10 prefix) base cycles.
const fn page2_cycles(op: u8, native: bool, hd6309: bool) -> u8 {
    let (emu, nat) = match op {
        0x21..=0x2F => (5, 5),
        0x3F => (20, 22),
        0x83 | 0x8C => (5, 4),
        0x8E | 0xCE => (4, 4),
        0x93 | 0x9C => (7, 5),
        0x9E | 0x9F | 0xDE | 0xDF => (6, 5),
        0xA3 | 0xAC => (7, 6),
        0xAE | 0xAF | 0xEE | 0xEF => (6, 6),
        0xB3 | 0xBC => (8, 6),
        0xBE | 0xBF | 0xFE | 0xFF => (7, 6),
        _ if !hd6309 => (0, 0),
        0x30..=0x37 => (4, 4),
        0x38..=0x3B => (6, 6),
        0x40 | 0x43 | 0x44 | 0x46..=0x4A | 0x4C | 0x4D | 0x4F => (3, 2),
        0x53 | 0x54 | 0x56 | 0x59 | 0x5A | 0x5C | 0x5D | 0x5F => (3, 2),
        0x80..=0x82 | 0x84 | 0x85 | 0x88..=0x8B => (5, 4),
        0x86 => (4, 4),
        0x90..=0x92 | 0x94 | 0x95 | 0x98..=0x9B => (7, 5),
        0x96 | 0x97 => (6, 5),
        0xA0..=0xA2 | 0xA4 | 0xA5 | 0xA8..=0xAB => (7, 6),
        0xA6 | 0xA7 => (6, 6),
        0xB0..=0xB2 | 0xB4 | 0xB5 | 0xB8..=0xBB => (8, 6),
        0xB6 | 0xB7 => (7, 6),
        0xDC | 0xDD => (8, 7),
        0xEC | 0xED => (8, 8),
        0xFC | 0xFD => (9, 8),
        _ => (0, 0),
    };
    if native { nat } else { emu }
}

/// Page 3 ($11 prefix) base cycles.
const fn page3_cycles(op: u8, native: bool, hd6309: bool) -> u8 {
    let (emu, nat) = match op {
        0x3F => (20, 22),
        0x83 | 0x8C => (5, 4),
        0x93 | 0x9C => (7, 5),
        0xA3 | 0xAC => (7, 6),
        0xB3 | 0xBC => (8, 6),
        _ if !hd6309 => (0, 0),
        0x30..=0x35 => (7, 6),
        0x36 => (7, 6),
        0x37 => (8, 7),
        0x38..=0x3B => (6, 6),
        0x3C => (4, 4),
        0x3D => (5, 5),
        0x43 | 0x4A | 0x4C | 0x4D | 0x4F => (3, 2),
        0x53 | 0x5A | 0x5C | 0x5D | 0x5F => (3, 2),
        0x80 | 0x81 | 0x86 | 0x8B | 0xC0 | 0xC1 | 0xC6 | 0xCB => (3, 3),
        0x8D => (25, 25),
        0x8E => (34, 34),
        0x8F => (28, 26),
        0x90 | 0x91 | 0x96 | 0x97 | 0x9B | 0xD0 | 0xD1 | 0xD6 | 0xD7 | 0xDB => (5, 4),
        0x9D => (27, 26),
        0x9E => (36, 35),
        0x9F => (30, 28),
        0xA0 | 0xA1 | 0xA6 | 0xA7 | 0xAB | 0xE0 | 0xE1 | 0xE6 | 0xE7 | 0xEB => (5, 5),
        0xAD => (27, 27),
        0xAE => (36, 36),
        0xAF => (30, 30),
        0xB0 | 0xB1 | 0xB6 | 0xB7 | 0xBB | 0xF0 | 0xF1 | 0xF6 | 0xF7 | 0xFB => (6, 5),
        0xBD => (28, 27),
        0xBE => (37, 36),
        0xBF => (31, 29),
        _ => (0, 0),
    };
    if native { nat } else { emu }
}

const fn build_page(page: u8, native: bool, hd6309: bool) -> [u8; 256] {
    let mut out = [0u8; 256];
    let mut op = 0usize;
    while op < 256 {
        out[op] = if page == 2 {
            page2_cycles(op as u8, native, hd6309)
        } else {
            page3_cycles(op as u8, native, hd6309)
        };
        op += 1;
    }
    out
}

pub(crate) static MC6809: CycleTable = CycleTable {
    page0: strip_hd6309_page0(PAGE0_EMULATION),
    page2: build_page(2, false, false),
    page3: build_page(3, false, false),
};

pub(crate) static HD6309_EMULATION: CycleTable = CycleTable {
    page0: PAGE0_EMULATION,
    page2: build_page(2, false, true),
    page3: build_page(3, false, true),
};

pub(crate) static HD6309_NATIVE: CycleTable = CycleTable {
    page0: PAGE0_NATIVE,
    page2: build_page(2, true, true),
    page3: build_page(3, true, true),
};

/// Cost of an undefined opcode on the MC6809, which runs it as a no-op.
pub(crate) const ILLEGAL_NOP: u8 = 2;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mc6809_has_no_hd6309_opcodes() {
        assert_eq!(MC6809.page0[0xCD], 0); // LDQ #
        assert_eq!(MC6809.page0[0x01], 0); // OIM
        assert_eq!(MC6809.page2[0x86], 0); // LDW #
        assert_eq!(MC6809.page3[0x8D], 0); // DIVD
        assert_eq!(MC6809.page2[0x8E], 4); // LDY #
        assert_eq!(MC6809.page3[0x3F], 20); // SWI3
    }

    #[test]
    fn native_mode_is_never_slower_for_common_opcodes() {
        for op in [0x12u8, 0x3A, 0x4F, 0x86, 0x96, 0xB6, 0xCC, 0xFD] {
            assert!(HD6309_NATIVE.page0[op as usize] <= HD6309_EMULATION.page0[op as usize]);
        }
        assert_eq!(HD6309_NATIVE.page0[0x12], 1);
        assert_eq!(HD6309_EMULATION.page0[0x12], 2);
    }

    #[test]
    fn prefixes_are_not_instructions() {
        for table in [&MC6809, &HD6309_EMULATION, &HD6309_NATIVE] {
            assert_eq!(table.page0[0x10], 0);
            assert_eq!(table.page0[0x11], 0);
        }
    }
}
