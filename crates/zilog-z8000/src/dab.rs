//! Decimal-adjust table for the DAB instruction.
//!
//! Indexed by the byte value plus the C, H and DA flags of the preceding
//! byte add/subtract; yields the adjusted byte and the resulting carry.

use once_cell::sync::Lazy;

/// Index bit carrying the C flag.
pub const DAB_C: usize = 0x100;
/// Index bit carrying the H flag.
pub const DAB_H: usize = 0x200;
/// Index bit carrying the DA flag.
pub const DAB_DA: usize = 0x400;

/// `(adjusted_value, carry_out)` per `{DA, H, C, value}` key.
pub static DAB_TABLE: Lazy<[(u8, bool); 0x800]> = Lazy::new(|| {
    let mut table = [(0u8, false); 0x800];
    for (idx, slot) in table.iter_mut().enumerate() {
        let value = (idx & 0xff) as u8;
        let c = idx & DAB_C != 0;
        let h = idx & DAB_H != 0;
        let da = idx & DAB_DA != 0;
        *slot = if da {
            // After subtraction: undo the BCD borrow corrections.
            let mut adjust = 0u8;
            if h {
                adjust += 0x06;
            }
            if c {
                adjust += 0x60;
            }
            (value.wrapping_sub(adjust), c)
        } else {
            // After addition.
            let mut adjust = 0u8;
            let mut carry = c;
            if h || (value & 0x0f) > 9 {
                adjust += 0x06;
            }
            if c || value > 0x99 {
                adjust += 0x60;
                carry = true;
            }
            (value.wrapping_add(adjust), carry)
        };
    }
    table
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjusts_bcd_addition() {
        // 0x19 + 0x28 = 0x41 with H set; DAB yields 0x47.
        let (v, c) = DAB_TABLE[0x41 | DAB_H];
        assert_eq!(v, 0x47);
        assert!(!c);
        // 0x91 + 0x20 = 0xB1; DAB yields 0x11 carry.
        let (v, c) = DAB_TABLE[0xB1];
        assert_eq!(v, 0x11);
        assert!(c);
    }

    #[test]
    fn adjusts_bcd_subtraction() {
        // 0x42 - 0x08 = 0x3A with H and DA set; DAB yields 0x34.
        let (v, c) = DAB_TABLE[0x3A | DAB_H | DAB_DA];
        assert_eq!(v, 0x34);
        assert!(!c);
        // 0x20 - 0x50 = 0xD0 with C and DA set; DAB yields 0x70, borrow kept.
        let (v, c) = DAB_TABLE[0xD0 | DAB_C | DAB_DA];
        assert_eq!(v, 0x70);
        assert!(c);
    }
}
