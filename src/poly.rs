use core::marker::PhantomData;

use zeroize::Zeroize;

use crate::ntt;
use crate::reduce::{caddq, cond_sub_q, fqmul, Q16, R2};

/// Marker for the standard (coefficient) basis.
pub(crate) struct Time;

/// Marker for the transformed basis.
pub(crate) struct Ntt;

/// A ring element: 256 coefficients held canonically in `[0, q)`, tagged at
/// the type level with the basis it currently lives in. Addition and
/// subtraction are legal in either basis; pointwise multiplication exists
/// only on [`Ntt`], and the transforms are the only basis changes. Buffers
/// are wiped on drop, as error and secret polynomials routinely pass
/// through here.
pub(crate) struct Poly<F = Time> {
    pub(crate) coeffs: [i16; 256],
    form: PhantomData<F>,
}

impl<F> Clone for Poly<F> {
    fn clone(&self) -> Self {
        Self::from_coeffs(self.coeffs)
    }
}

impl<F> Zeroize for Poly<F> {
    fn zeroize(&mut self) {
        self.coeffs.zeroize();
    }
}

impl<F> Drop for Poly<F> {
    fn drop(&mut self) {
        self.coeffs.zeroize();
    }
}

impl<F> Poly<F> {
    pub(crate) fn zero() -> Self {
        Self::from_coeffs([0i16; 256])
    }

    pub(crate) fn from_coeffs(coeffs: [i16; 256]) -> Self {
        Self { coeffs, form: PhantomData }
    }

    /// Coefficient-wise `self + other mod q`.
    pub(crate) fn add(&self, other: &Self) -> Self {
        let mut out = [0i16; 256];
        for (o, (a, b)) in out.iter_mut().zip(self.coeffs.iter().zip(other.coeffs.iter())) {
            *o = cond_sub_q(a + b);
        }
        Self::from_coeffs(out)
    }

    /// Coefficient-wise `self − other mod q`.
    pub(crate) fn sub(&self, other: &Self) -> Self {
        let mut out = [0i16; 256];
        for (o, (a, b)) in out.iter_mut().zip(self.coeffs.iter().zip(other.coeffs.iter())) {
            *o = caddq(a - b);
        }
        Self::from_coeffs(out)
    }

    /// Coefficient-wise negation mod q. Not on the encapsulation path, but
    /// part of the ring-element surface alongside `scalar_mul`.
    #[allow(dead_code)]
    pub(crate) fn neg(&self) -> Self {
        let mut out = [0i16; 256];
        for (o, a) in out.iter_mut().zip(self.coeffs.iter()) {
            *o = cond_sub_q(Q16 - a);
        }
        Self::from_coeffs(out)
    }

    /// Coefficient-wise multiplication by a public scalar `c ∈ [0, q)`.
    #[allow(dead_code, clippy::cast_possible_wrap)]
    pub(crate) fn scalar_mul(&self, c: u16) -> Self {
        let c_mont = fqmul(c as i16, R2); // lift c into Montgomery form
        let mut out = [0i16; 256];
        for (o, a) in out.iter_mut().zip(self.coeffs.iter()) {
            *o = caddq(fqmul(*a, c_mont));
        }
        Self::from_coeffs(out)
    }
}

impl Poly<Time> {
    /// Forward transform into the pointwise-multiplication basis.
    pub(crate) fn ntt(&self) -> Poly<Ntt> {
        let mut coeffs = self.coeffs;
        ntt::forward(&mut coeffs);
        Poly::from_coeffs(coeffs)
    }

    /// Largest centered magnitude `max_i min(cᵢ, q − cᵢ)`, branch-free.
    /// Unused by encapsulation itself; callers layering rejection-sampled
    /// constructions on the same ring need it.
    #[allow(dead_code, clippy::cast_sign_loss)]
    pub(crate) fn inf_norm(&self) -> u16 {
        let mut max = 0i16;
        for &x in &self.coeffs {
            let y = Q16 - x;
            let d = y - x;
            let m = x + (d & (d >> 15)); // min(x, q − x)
            let e = max - m;
            max -= e & (e >> 15); // max(max, m)
        }
        max as u16
    }
}

impl Poly<Ntt> {
    /// Inverse transform back to the standard basis, including the `n⁻¹`
    /// scaling.
    pub(crate) fn ntt_inv(&self) -> Poly<Time> {
        let mut coeffs = self.coeffs;
        ntt::inverse(&mut coeffs);
        Poly::from_coeffs(coeffs)
    }

    /// Ring multiplication in the transformed basis.
    pub(crate) fn basemul(&self, other: &Self) -> Self {
        let mut out = [0i16; 256];
        ntt::basemul(&self.coeffs, &other.coeffs, &mut out);
        Self::from_coeffs(out)
    }
}


/// A length-`K` vector of ring elements sharing one basis tag.
pub(crate) struct PolyVec<const K: usize, F = Time> {
    pub(crate) polys: [Poly<F>; K],
}

impl<const K: usize, F> Clone for PolyVec<K, F> {
    fn clone(&self) -> Self {
        Self { polys: core::array::from_fn(|i| self.polys[i].clone()) }
    }
}

impl<const K: usize, F> PolyVec<K, F> {
    pub(crate) fn from_fn(f: impl FnMut(usize) -> Poly<F>) -> Self {
        Self { polys: core::array::from_fn(f) }
    }

    /// Component-wise vector addition.
    pub(crate) fn add(&self, other: &Self) -> Self {
        Self::from_fn(|i| self.polys[i].add(&other.polys[i]))
    }

    /// Component-wise vector subtraction.
    #[allow(dead_code)]
    pub(crate) fn sub(&self, other: &Self) -> Self {
        Self::from_fn(|i| self.polys[i].sub(&other.polys[i]))
    }
}

impl<const K: usize> PolyVec<K, Time> {
    /// Transform every component.
    pub(crate) fn ntt(&self) -> PolyVec<K, Ntt> {
        PolyVec::from_fn(|i| self.polys[i].ntt())
    }
}

impl<const K: usize> PolyVec<K, Ntt> {
    /// Inverse-transform every component.
    pub(crate) fn ntt_inv(&self) -> PolyVec<K, Time> {
        PolyVec::from_fn(|i| self.polys[i].ntt_inv())
    }

    /// Inner product `Σᵢ selfᵢ ∘ otherᵢ` in the transformed basis.
    #[allow(clippy::needless_range_loop)] // alternative is harder to understand
    pub(crate) fn dot(&self, other: &Self) -> Poly<Ntt> {
        let mut acc = Poly::zero();
        for i in 0..K {
            acc = acc.add(&self.polys[i].basemul(&other.polys[i]));
        }
        acc
    }
}


/// A `K×K` matrix of transformed ring elements; row-major, never persisted.
pub(crate) type Matrix<const K: usize> = [[Poly<Ntt>; K]; K];

/// `w = A ∘ u`: row `i` is `Σⱼ A[i][j] ∘ u[j]`.
#[allow(clippy::needless_range_loop)] // alternative is harder to understand
pub(crate) fn mat_mul_vec<const K: usize>(
    a: &Matrix<K>, u: &PolyVec<K, Ntt>,
) -> PolyVec<K, Ntt> {
    PolyVec::from_fn(|i| {
        let mut acc = Poly::zero();
        for j in 0..K {
            acc = acc.add(&a[i][j].basemul(&u.polys[j]));
        }
        acc
    })
}

/// `y = Aᵀ ∘ u`: row `i` is `Σⱼ A[j][i] ∘ u[j]`.
#[allow(clippy::needless_range_loop)] // alternative is harder to understand
pub(crate) fn mat_t_mul_vec<const K: usize>(
    a: &Matrix<K>, u: &PolyVec<K, Ntt>,
) -> PolyVec<K, Ntt> {
    PolyVec::from_fn(|i| {
        let mut acc = Poly::zero();
        for j in 0..K {
            acc = acc.add(&a[j][i].basemul(&u.polys[j])); // j, i swapped vs above
        }
        acc
    })
}


#[cfg(test)]
mod tests {
    #![allow(
        clippy::cast_possible_truncation,
        clippy::cast_possible_wrap,
        clippy::cast_sign_loss,
        clippy::needless_range_loop
    )]

    use super::*;
    use crate::reduce::Q32;

    fn sample(seed: i32) -> Poly<Time> {
        let mut c = [0i16; 256];
        for (i, x) in c.iter_mut().enumerate() {
            *x = (((i as i32) * 31 + seed * 17 + 5).rem_euclid(Q32)) as i16;
        }
        Poly::from_coeffs(c)
    }

    /// Schoolbook negacyclic product with i64 accumulators, for reference.
    fn schoolbook(a: &Poly<Time>, b: &Poly<Time>) -> [i16; 256] {
        let mut acc = [0i64; 256];
        for i in 0..256 {
            for j in 0..256 {
                let prod = i64::from(a.coeffs[i]) * i64::from(b.coeffs[j]);
                if i + j < 256 {
                    acc[i + j] += prod;
                } else {
                    acc[i + j - 256] -= prod; // x^256 = −1
                }
            }
        }
        let mut out = [0i16; 256];
        for (o, v) in out.iter_mut().zip(acc.iter()) {
            *o = v.rem_euclid(i64::from(Q32)) as i16;
        }
        out
    }

    #[test]
    fn add_sub_neg_roundtrip() {
        let a = sample(1);
        let b = sample(2);
        let s = a.add(&b);
        assert_eq!(s.sub(&b).coeffs, a.coeffs);
        let z = a.add(&a.neg());
        assert_eq!(z.coeffs, [0i16; 256]);
    }

    #[test]
    fn scalar_mul_matches_repeated_add() {
        let a = sample(3);
        let twice = a.add(&a);
        assert_eq!(a.scalar_mul(2).coeffs, twice.coeffs);
        assert_eq!(a.scalar_mul(0).coeffs, [0i16; 256]);
        assert_eq!(a.scalar_mul(1).coeffs, a.coeffs);
    }

    #[test]
    fn ntt_multiplication_matches_schoolbook() {
        let a = sample(4);
        let b = sample(5);
        let fast = a.ntt().basemul(&b.ntt()).ntt_inv();
        assert_eq!(fast.coeffs, schoolbook(&a, &b));
    }

    // a = 1 + x^255, b = x: the x^255·x term wraps to −1, so the product is
    // x − 1, i.e. coefficient q − 1 at x^0
    #[test]
    fn negacyclic_wraparound() {
        let mut a = [0i16; 256];
        a[0] = 1;
        a[255] = 1;
        let mut b = [0i16; 256];
        b[1] = 1;
        let a = Poly::<Time>::from_coeffs(a);
        let b = Poly::<Time>::from_coeffs(b);
        let prod = a.ntt().basemul(&b.ntt()).ntt_inv();
        assert_eq!(prod.coeffs[0], Q16 - 1);
        assert_eq!(prod.coeffs[1], 1);
        assert!(prod.coeffs[2..].iter().all(|&c| c == 0));
    }

    #[test]
    fn inf_norm_centered() {
        let mut c = [0i16; 256];
        c[0] = 1;
        c[1] = Q16 - 2; // centered magnitude 2
        assert_eq!(Poly::<Time>::from_coeffs(c).inf_norm(), 2);
        assert_eq!(Poly::<Time>::zero().inf_norm(), 0);
        let mut c = [0i16; 256];
        c[7] = (Q16 - 1) / 2;
        assert_eq!(Poly::<Time>::from_coeffs(c).inf_norm(), ((Q16 - 1) / 2) as u16);
    }

    #[test]
    fn vec_add_sub_round_trip() {
        let u = PolyVec::<3, Time>::from_fn(|i| sample(30 + i as i32));
        let v = PolyVec::<3, Time>::from_fn(|i| sample(40 + i as i32));
        let w = u.add(&v).sub(&v);
        for i in 0..3 {
            assert_eq!(w.polys[i].coeffs, u.polys[i].coeffs);
        }
    }

    #[test]
    fn dot_is_sum_of_products() {
        let u = PolyVec::<2, Time>::from_fn(|i| sample(10 + i as i32));
        let v = PolyVec::<2, Time>::from_fn(|i| sample(20 + i as i32));
        let dot = u.ntt().dot(&v.ntt()).ntt_inv();
        let p0 = schoolbook(&u.polys[0], &v.polys[0]);
        let p1 = schoolbook(&u.polys[1], &v.polys[1]);
        let expect = Poly::<Time>::from_coeffs(p0).add(&Poly::from_coeffs(p1));
        assert_eq!(dot.coeffs, expect.coeffs);
    }
}
