use crate::poly::{Poly, Time};
use crate::Q;

/// If the condition is not met, return an error message. Borrowed from the
/// `anyhow` crate.
macro_rules! ensure {
    ($cond:expr, $msg:literal $(,)?) => {
        if !$cond {
            return Err($msg);
        }
    };
}

pub(crate) use ensure; // make available throughout crate


/// `x → ⌈(2^d/q) · x⌋ mod 2^d` in place, for canonical input. The division
/// by q runs through a pre-computed 2^36 fixed-point multiplier, so the
/// rounding is plain integer arithmetic with constant shifts: no float, no
/// data-dependent branch. Works for all odd q from 17 to 6307.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_possible_wrap)]
pub(crate) fn compress_poly(d: u32, poly: &mut Poly<Time>) {
    const M: u64 = ((1u64 << 36) + Q as u64 - 1) / Q as u64;
    for x in &mut poly.coeffs {
        let y = (u64::from(*x as u16) << d) + u64::from(Q >> 1);
        *x = (((y * M) >> 36) & ((1 << d) - 1)) as i16;
    }
}


/// `y → ⌈(q/2^d) · y⌋` in place; the inverse scaling of [`compress_poly`],
/// exact up to an additive error of at most `⌈q/2^{d+1}⌉` (cyclically).
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_possible_wrap)]
pub(crate) fn decompress_poly(d: u32, poly: &mut Poly<Time>) {
    for y in &mut poly.coeffs {
        let qy = Q * u32::from(*y as u16) + (1 << (d - 1));
        *y = (qy >> d) as i16;
    }
}


#[cfg(test)]
mod tests {
    #![allow(
        clippy::cast_possible_truncation,
        clippy::cast_possible_wrap,
        clippy::cast_sign_loss
    )]

    use super::*;
    use crate::reduce::Q16;

    // |decompress(compress(x)) − x| ≤ ⌈q / 2^{d+1}⌉, distance taken around q
    #[test]
    fn compression_boundary_bound() {
        for d in [1u32, 4, 5, 10, 11] {
            let bound = (Q16 + (1 << (d + 1)) - 1) / (1 << (d + 1));
            for base in 0..14 {
                let mut coeffs = [0i16; 256];
                for (i, c) in coeffs.iter_mut().enumerate() {
                    *c = (base * 256 + i as i16).min(Q16 - 1);
                }
                let orig = coeffs;
                let mut p = Poly::<Time>::from_coeffs(coeffs);
                compress_poly(d, &mut p);
                assert!(p.coeffs.iter().all(|&c| c < (1 << d)));
                decompress_poly(d, &mut p);
                for (x, y) in orig.iter().zip(p.coeffs.iter()) {
                    let diff = (x - y).rem_euclid(Q16);
                    let dist = diff.min(Q16 - diff);
                    assert!(dist <= bound, "d={d} x={x} y={y} dist={dist}");
                }
            }
        }
    }

    #[test]
    fn compress_matches_rounding_formula() {
        for d in [4u32, 10] {
            for x in 0..Q16 {
                let mut coeffs = [0i16; 256];
                coeffs[0] = x;
                let mut p = Poly::<Time>::from_coeffs(coeffs);
                compress_poly(d, &mut p);
                let expect =
                    (((u64::from(x as u16) << d) + u64::from(Q >> 1)) / u64::from(Q)) & ((1 << d) - 1);
                assert_eq!(u64::from(p.coeffs[0] as u16), expect);
            }
        }
    }
}
