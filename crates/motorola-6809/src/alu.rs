//! ALU operations.
//!
//! Each helper computes a result and updates exactly the condition codes
//! the hardware defines for that operation. Bits the instruction leaves
//! alone are not touched.

use crate::flags::{C, ConditionCodes, H, N, V, Z};

/// 8-bit add with optional carry in. Sets H, N, Z, V, C.
#[must_use]
pub fn add8(cc: &mut ConditionCodes, a: u8, b: u8, carry: bool) -> u8 {
    let sum = u16::from(a) + u16::from(b) + u16::from(carry);
    let result = sum as u8;
    cc.set_if(H, (a ^ b ^ result) & 0x10 != 0);
    cc.update_nz8(result);
    cc.set_if(V, (a ^ result) & (b ^ result) & 0x80 != 0);
    cc.set_if(C, sum > 0xFF);
    result
}

/// 8-bit subtract with optional borrow in. Sets N, Z, V, C. H is undefined
/// on hardware and left unchanged.
#[must_use]
pub fn sub8(cc: &mut ConditionCodes, a: u8, b: u8, borrow: bool) -> u8 {
    let diff = u16::from(a)
        .wrapping_sub(u16::from(b))
        .wrapping_sub(u16::from(borrow));
    let result = diff as u8;
    cc.update_nz8(result);
    cc.set_if(V, (a ^ b) & (a ^ result) & 0x80 != 0);
    cc.set_if(C, diff & 0x100 != 0);
    result
}

/// 16-bit add with optional carry in. Sets N, Z, V, C.
#[must_use]
pub fn add16(cc: &mut ConditionCodes, a: u16, b: u16, carry: bool) -> u16 {
    let sum = u32::from(a) + u32::from(b) + u32::from(carry);
    let result = sum as u16;
    cc.update_nz16(result);
    cc.set_if(V, (a ^ result) & (b ^ result) & 0x8000 != 0);
    cc.set_if(C, sum > 0xFFFF);
    result
}

/// 16-bit subtract with optional borrow in. Sets N, Z, V, C.
#[must_use]
pub fn sub16(cc: &mut ConditionCodes, a: u16, b: u16, borrow: bool) -> u16 {
    let diff = u32::from(a)
        .wrapping_sub(u32::from(b))
        .wrapping_sub(u32::from(borrow));
    let result = diff as u16;
    cc.update_nz16(result);
    cc.set_if(V, (a ^ b) & (a ^ result) & 0x8000 != 0);
    cc.set_if(C, diff & 0x1_0000 != 0);
    result
}

#[must_use]
pub fn and8(cc: &mut ConditionCodes, a: u8, b: u8) -> u8 {
    let result = a & b;
    cc.update_nz8_clear_v(result);
    result
}

#[must_use]
pub fn or8(cc: &mut ConditionCodes, a: u8, b: u8) -> u8 {
    let result = a | b;
    cc.update_nz8_clear_v(result);
    result
}

#[must_use]
pub fn eor8(cc: &mut ConditionCodes, a: u8, b: u8) -> u8 {
    let result = a ^ b;
    cc.update_nz8_clear_v(result);
    result
}

#[must_use]
pub fn and16(cc: &mut ConditionCodes, a: u16, b: u16) -> u16 {
    let result = a & b;
    cc.update_nz16_clear_v(result);
    result
}

#[must_use]
pub fn or16(cc: &mut ConditionCodes, a: u16, b: u16) -> u16 {
    let result = a | b;
    cc.update_nz16_clear_v(result);
    result
}

#[must_use]
pub fn eor16(cc: &mut ConditionCodes, a: u16, b: u16) -> u16 {
    let result = a ^ b;
    cc.update_nz16_clear_v(result);
    result
}

/// Two's complement negate: 0 - a.
#[must_use]
pub fn neg8(cc: &mut ConditionCodes, a: u8) -> u8 {
    sub8(cc, 0, a, false)
}

/// One's complement. Always sets C.
#[must_use]
pub fn com8(cc: &mut ConditionCodes, a: u8) -> u8 {
    let result = !a;
    cc.update_nz8_clear_v(result);
    cc.set(C);
    result
}

/// Logical shift right. N is always cleared, V unaffected.
#[must_use]
pub fn lsr8(cc: &mut ConditionCodes, a: u8) -> u8 {
    let result = a >> 1;
    cc.set_if(C, a & 0x01 != 0);
    cc.update_nz8(result);
    result
}

/// Rotate right through carry. V unaffected.
#[must_use]
pub fn ror8(cc: &mut ConditionCodes, a: u8) -> u8 {
    let result = (a >> 1) | if cc.is_set(C) { 0x80 } else { 0 };
    cc.set_if(C, a & 0x01 != 0);
    cc.update_nz8(result);
    result
}

/// Arithmetic shift right (sign preserved). V unaffected.
#[must_use]
pub fn asr8(cc: &mut ConditionCodes, a: u8) -> u8 {
    let result = (a >> 1) | (a & 0x80);
    cc.set_if(C, a & 0x01 != 0);
    cc.update_nz8(result);
    result
}

/// Arithmetic shift left. V = bit 7 xor bit 6 of the operand.
#[must_use]
pub fn asl8(cc: &mut ConditionCodes, a: u8) -> u8 {
    let result = a << 1;
    cc.set_if(C, a & 0x80 != 0);
    cc.set_if(V, (a ^ (a << 1)) & 0x80 != 0);
    cc.update_nz8(result);
    result
}

/// Rotate left through carry. V = bit 7 xor bit 6 of the operand.
#[must_use]
pub fn rol8(cc: &mut ConditionCodes, a: u8) -> u8 {
    let result = (a << 1) | u8::from(cc.is_set(C));
    cc.set_if(C, a & 0x80 != 0);
    cc.set_if(V, (a ^ (a << 1)) & 0x80 != 0);
    cc.update_nz8(result);
    result
}

/// Decrement. C unaffected.
#[must_use]
pub fn dec8(cc: &mut ConditionCodes, a: u8) -> u8 {
    let result = a.wrapping_sub(1);
    cc.set_if(V, a == 0x80);
    cc.update_nz8(result);
    result
}

/// Increment. C unaffected.
#[must_use]
pub fn inc8(cc: &mut ConditionCodes, a: u8) -> u8 {
    let result = a.wrapping_add(1);
    cc.set_if(V, a == 0x7F);
    cc.update_nz8(result);
    result
}

/// Test: N and Z from the operand, V cleared.
pub fn tst8(cc: &mut ConditionCodes, a: u8) {
    cc.update_nz8_clear_v(a);
}

/// Clear: N=0, Z=1, V=0, C=0.
#[must_use]
pub fn clr(cc: &mut ConditionCodes) -> u8 {
    cc.clear(N | V | C);
    cc.set(Z);
    0
}

#[must_use]
pub fn neg16(cc: &mut ConditionCodes, a: u16) -> u16 {
    sub16(cc, 0, a, false)
}

#[must_use]
pub fn com16(cc: &mut ConditionCodes, a: u16) -> u16 {
    let result = !a;
    cc.update_nz16_clear_v(result);
    cc.set(C);
    result
}

#[must_use]
pub fn lsr16(cc: &mut ConditionCodes, a: u16) -> u16 {
    let result = a >> 1;
    cc.set_if(C, a & 0x0001 != 0);
    cc.update_nz16(result);
    result
}

#[must_use]
pub fn ror16(cc: &mut ConditionCodes, a: u16) -> u16 {
    let result = (a >> 1) | if cc.is_set(C) { 0x8000 } else { 0 };
    cc.set_if(C, a & 0x0001 != 0);
    cc.update_nz16(result);
    result
}

#[must_use]
pub fn asr16(cc: &mut ConditionCodes, a: u16) -> u16 {
    let result = (a >> 1) | (a & 0x8000);
    cc.set_if(C, a & 0x0001 != 0);
    cc.update_nz16(result);
    result
}

#[must_use]
pub fn asl16(cc: &mut ConditionCodes, a: u16) -> u16 {
    let result = a << 1;
    cc.set_if(C, a & 0x8000 != 0);
    cc.set_if(V, (a ^ (a << 1)) & 0x8000 != 0);
    cc.update_nz16(result);
    result
}

#[must_use]
pub fn rol16(cc: &mut ConditionCodes, a: u16) -> u16 {
    let result = (a << 1) | u16::from(cc.is_set(C));
    cc.set_if(C, a & 0x8000 != 0);
    cc.set_if(V, (a ^ (a << 1)) & 0x8000 != 0);
    cc.update_nz16(result);
    result
}

#[must_use]
pub fn dec16(cc: &mut ConditionCodes, a: u16) -> u16 {
    let result = a.wrapping_sub(1);
    cc.set_if(V, a == 0x8000);
    cc.update_nz16(result);
    result
}

#[must_use]
pub fn inc16(cc: &mut ConditionCodes, a: u16) -> u16 {
    let result = a.wrapping_add(1);
    cc.set_if(V, a == 0x7FFF);
    cc.update_nz16(result);
    result
}

/// Decimal adjust A after a BCD add. V is cleared.
#[must_use]
pub fn daa(cc: &mut ConditionCodes, a: u8) -> u8 {
    let low = a & 0x0F;
    let high = a & 0xF0;
    let mut correction = 0u8;
    if cc.is_set(H) || low > 0x09 {
        correction |= 0x06;
    }
    if cc.is_set(C) || high > 0x90 || (high > 0x80 && low > 0x09) {
        correction |= 0x60;
    }
    let result = a.wrapping_add(correction);
    cc.update_nz8_clear_v(result);
    if correction & 0x60 != 0 {
        cc.set(C);
    }
    result
}

/// Unsigned 8x8 multiply. Z from the product, C from bit 7 of B.
#[must_use]
pub fn mul(cc: &mut ConditionCodes, a: u8, b: u8) -> u16 {
    let result = u16::from(a) * u16::from(b);
    cc.set_if(Z, result == 0);
    cc.set_if(C, result & 0x0080 != 0);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cc() -> ConditionCodes {
        ConditionCodes::new(0)
    }

    #[test]
    fn add8_is_correct_for_every_operand_pair() {
        for a in 0..=255u8 {
            for b in 0..=255u8 {
                let mut flags = cc();
                let result = add8(&mut flags, a, b, false);
                let wide = u16::from(a) + u16::from(b);
                let signed = i16::from(a as i8) + i16::from(b as i8);
                assert_eq!(result, wide as u8);
                assert_eq!(flags.is_set(C), wide > 255, "C {a:02X}+{b:02X}");
                assert_eq!(
                    flags.is_set(V),
                    !(-128..=127).contains(&signed),
                    "V {a:02X}+{b:02X}"
                );
                assert_eq!(flags.is_set(Z), result == 0);
                assert_eq!(flags.is_set(N), result & 0x80 != 0);
                assert_eq!(flags.is_set(H), (a & 0x0F) + (b & 0x0F) > 0x0F);
            }
        }
    }

    #[test]
    fn sub8_is_correct_for_every_operand_pair() {
        for a in 0..=255u8 {
            for b in 0..=255u8 {
                let mut flags = cc();
                let result = sub8(&mut flags, a, b, false);
                let signed = i16::from(a as i8) - i16::from(b as i8);
                assert_eq!(result, a.wrapping_sub(b));
                assert_eq!(flags.is_set(C), b > a);
                assert_eq!(flags.is_set(V), !(-128..=127).contains(&signed));
                assert_eq!(flags.is_set(Z), a == b);
                assert_eq!(flags.is_set(N), result & 0x80 != 0);
            }
        }
    }

    #[test]
    fn logic_ops_clear_v_and_keep_c() {
        for a in 0..=255u8 {
            for b in 0..=255u8 {
                let mut flags = ConditionCodes::new(C | V);
                let result = and8(&mut flags, a, b);
                assert_eq!(result, a & b);
                assert!(flags.is_set(C));
                assert!(!flags.is_set(V));
                assert_eq!(flags.is_set(Z), result == 0);
                assert_eq!(flags.is_set(N), result & 0x80 != 0);
            }
        }
    }

    #[test]
    fn adc_carries_in() {
        let mut flags = cc();
        assert_eq!(add8(&mut flags, 0xFF, 0x00, true), 0x00);
        assert!(flags.is_set(C));
        assert!(flags.is_set(Z));
        assert!(flags.is_set(H));
    }

    #[test]
    fn com_always_sets_carry() {
        let mut flags = cc();
        assert_eq!(com8(&mut flags, 0xFF), 0x00);
        assert!(flags.is_set(C));
        assert!(flags.is_set(Z));
        let mut flags = cc();
        assert_eq!(com16(&mut flags, 0x0000), 0xFFFF);
        assert!(flags.is_set(C));
        assert!(flags.is_set(N));
    }

    #[test]
    fn neg_edge_cases() {
        let mut flags = cc();
        assert_eq!(neg8(&mut flags, 0x80), 0x80);
        assert!(flags.is_set(V));
        assert!(flags.is_set(C));

        let mut flags = cc();
        assert_eq!(neg8(&mut flags, 0x00), 0x00);
        assert!(!flags.is_set(C));
        assert!(flags.is_set(Z));
    }

    #[test]
    fn inc_dec_overflow_and_carry_untouched() {
        let mut flags = ConditionCodes::new(C);
        assert_eq!(inc8(&mut flags, 0x7F), 0x80);
        assert!(flags.is_set(V));
        assert!(flags.is_set(C));

        let mut flags = cc();
        assert_eq!(dec8(&mut flags, 0x80), 0x7F);
        assert!(flags.is_set(V));
        assert!(!flags.is_set(C));
    }

    #[test]
    fn shifts_and_rotates() {
        let mut flags = cc();
        assert_eq!(asl8(&mut flags, 0x40), 0x80);
        assert!(flags.is_set(V));
        assert!(!flags.is_set(C));

        let mut flags = ConditionCodes::new(C);
        assert_eq!(ror8(&mut flags, 0x01), 0x80);
        assert!(flags.is_set(C));
        assert!(flags.is_set(N));

        let mut flags = ConditionCodes::new(N);
        assert_eq!(lsr8(&mut flags, 0x01), 0x00);
        assert!(flags.is_set(C));
        assert!(flags.is_set(Z));
        assert!(!flags.is_set(N));

        let mut flags = cc();
        assert_eq!(asr8(&mut flags, 0x81), 0xC0);
        assert!(flags.is_set(C));
        assert!(flags.is_set(N));

        let mut flags = ConditionCodes::new(C);
        assert_eq!(rol16(&mut flags, 0x8000), 0x0001);
        assert!(flags.is_set(C));
        assert!(flags.is_set(V));
    }

    #[test]
    fn add16_and_sub16() {
        let mut flags = cc();
        assert_eq!(add16(&mut flags, 0x7FFF, 0x0001, false), 0x8000);
        assert!(flags.is_set(V));
        assert!(flags.is_set(N));
        assert!(!flags.is_set(C));

        let mut flags = cc();
        assert_eq!(sub16(&mut flags, 0x0000, 0x0001, false), 0xFFFF);
        assert!(flags.is_set(C));
        assert!(!flags.is_set(V));
    }

    #[test]
    fn daa_adjusts_bcd() {
        // $19 + $28 = $41 with H set -> $47
        let mut flags = cc();
        let sum = add8(&mut flags, 0x19, 0x28, false);
        assert_eq!(sum, 0x41);
        assert_eq!(daa(&mut flags, sum), 0x47);
        assert!(!flags.is_set(C));

        // $99 + $01 = $9A -> $00 with carry
        let mut flags = cc();
        let sum = add8(&mut flags, 0x99, 0x01, false);
        assert_eq!(daa(&mut flags, sum), 0x00);
        assert!(flags.is_set(C));
        assert!(flags.is_set(Z));
    }

    #[test]
    fn mul_sets_carry_from_bit7() {
        let mut flags = cc();
        assert_eq!(mul(&mut flags, 0x10, 0x08), 0x0080);
        assert!(flags.is_set(C));
        assert!(!flags.is_set(Z));

        let mut flags = cc();
        assert_eq!(mul(&mut flags, 0, 0x55), 0);
        assert!(flags.is_set(Z));
    }
}
