use crate::helpers::ensure;
use crate::poly::{Poly, Time};
use crate::reduce::Q16;
use crate::Q;

/// Packs 256 `d`-bit coefficients into `32·d` bytes, little-endian bit
/// order, for `1 ≤ d ≤ 12`. Callers guarantee coefficients fit `d` bits
/// (canonical form for `d = 12`, compressed form below that), so packing
/// cannot fail.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn byte_encode<F>(d: u32, poly: &Poly<F>, bytes: &mut [u8]) {
    debug_assert_eq!(bytes.len(), 32 * d as usize, "encode: wrong output length");
    let mut temp = 0u64;
    let mut bit_index = 0;
    let mut byte_index = 0;
    for coeff in &poly.coeffs {
        let coeff = (*coeff as u64) & ((1u64 << d) - 1);
        temp |= coeff << bit_index;
        bit_index += d as usize;
        while bit_index > 7 {
            bytes[byte_index] = temp as u8;
            temp >>= 8;
            byte_index += 1;
            bit_index -= 8;
        }
    }
}


/// Unpacks `32·d` bytes into 256 `d`-bit coefficients, validating the range:
/// below `2^d` for `d < 12`, below q for `d = 12` (the canonicity check on
/// serialized keys).
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub(crate) fn byte_decode<F>(d: u32, bytes: &[u8]) -> Result<Poly<F>, &'static str> {
    ensure!(bytes.len() == 32 * d as usize, "decode: wrong input length");
    let mut coeffs = [0i16; 256];
    let mut temp = 0u64;
    let mut int_index = 0;
    let mut bit_index = 0;
    for byte in bytes {
        temp |= u64::from(*byte) << bit_index;
        bit_index += 8;
        while bit_index >= d {
            coeffs[int_index] = (temp & ((1u64 << d) - 1)) as i16;
            bit_index -= d;
            temp >>= d;
            int_index += 1;
        }
    }
    let max = if d < 12 { 1i16 << d } else { Q16 };
    ensure!(coeffs.iter().all(|c| *c < max), "decode: coefficient out of range");
    Ok(Poly::from_coeffs(coeffs))
}


/// Spreads a 32-byte message over the ring, bit `i` landing on coefficient
/// `i` as `bit · ⌊(q+1)/2⌋`. Mask-selected, no branch on message bits.
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub(crate) fn msg_to_poly(m: &[u8; 32]) -> Poly<Time> {
    const HALF_Q: i16 = ((Q + 1) / 2) as i16; // 1665
    let mut coeffs = [0i16; 256];
    for (i, c) in coeffs.iter_mut().enumerate() {
        let bit = i16::from((m[i >> 3] >> (i & 7)) & 1);
        *c = HALF_Q & bit.wrapping_neg();
    }
    Poly::from_coeffs(coeffs)
}


/// Recovers the message: bit `i` is 1 iff coefficient `i` lies closer to
/// q/2 than to 0 (cyclically), decided by the sign of `|2c − q| − ⌈q/2⌉`
/// with masks only; the threshold never branches on secret data.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn poly_to_msg(poly: &Poly<Time>) -> [u8; 32] {
    const HALF_Q: i16 = ((Q + 1) / 2) as i16;
    let mut m = [0u8; 32];
    for (i, c) in poly.coeffs.iter().enumerate() {
        let d = 2 * c - Q16;
        let s = d >> 15;
        let dist = (d ^ s) - s; // |2c − q|
        let bit = ((dist - HALF_Q) >> 15) & 1;
        m[i >> 3] |= (bit as u8) << (i & 7);
    }
    m
}
