//! CoCo keyboard matrix.
//!
//! The keyboard is a 7-row by 8-column switch matrix on PIA0. Port B
//! ($FF02) drives the column strobes (active low) and port A ($FF00) bits
//! 0-6 read the rows (active low: 0 = a key in a strobed column is down).
//!
//! | Row | Col 0 | 1 | 2 | 3 | 4 | 5 | 6 | 7 |
//! |-----|-------|---|---|---|---|---|---|---|
//! | 0   | @     | A | B | C | D | E | F | G |
//! | 1   | H     | I | J | K | L | M | N | O |
//! | 2   | P     | Q | R | S | T | U | V | W |
//! | 3   | X     | Y | Z | up| dn| lt| rt| sp|
//! | 4   | 0     | 1 | 2 | 3 | 4 | 5 | 6 | 7 |
//! | 5   | 8     | 9 | : | ; | , | - | . | / |
//! | 6   | ENTER | CLEAR | BREAK | ALT | CTRL | F1 | F2 | SHIFT |

/// Number of row inputs.
pub const ROWS: u8 = 7;
/// Number of column strobes.
pub const COLUMNS: u8 = 8;

/// 7x8 keyboard matrix.
///
/// Internally 1 = pressed. [`KeyboardMatrix::scan`] returns the active-low
/// row byte PIA0 port A sees.
#[derive(Debug, Clone, Default)]
pub struct KeyboardMatrix {
    /// `rows[r]` has bit `c` set if the key at (row r, column c) is down.
    rows: [u8; ROWS as usize],
}

impl KeyboardMatrix {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Press or release the key at a matrix position. Positions outside
    /// the matrix are ignored.
    pub fn set_key(&mut self, row: u8, col: u8, pressed: bool) {
        if row < ROWS && col < COLUMNS {
            if pressed {
                self.rows[row as usize] |= 1 << col;
            } else {
                self.rows[row as usize] &= !(1 << col);
            }
        }
    }

    #[must_use]
    pub fn is_pressed(&self, row: u8, col: u8) -> bool {
        row < ROWS && col < COLUMNS && self.rows[row as usize] & (1 << col) != 0
    }

    /// Scan with the column strobe byte from PIA0 port B.
    ///
    /// A 0 bit in `col_mask` strobes that column. The result has bit `r`
    /// clear when any strobed column has a key down in row `r`. Bit 7 is
    /// always set; it belongs to the joystick comparator.
    #[must_use]
    pub fn scan(&self, col_mask: u8) -> u8 {
        let selected = !col_mask;
        let mut result: u8 = 0;
        for (row, &row_data) in self.rows.iter().enumerate() {
            if row_data & selected != 0 {
                result |= 1 << row;
            }
        }
        !result
    }

    /// Release all keys.
    pub fn release_all(&mut self) {
        self.rows = [0; ROWS as usize];
    }
}
