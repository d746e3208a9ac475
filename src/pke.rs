use zeroize::Zeroize;

use crate::byte_fns::{byte_decode, byte_encode, msg_to_poly, poly_to_msg};
use crate::helpers::{compress_poly, decompress_poly, ensure};
use crate::poly::{mat_mul_vec, mat_t_mul_vec, Ntt, Poly, PolyVec, Time};
use crate::sampling::{expand_a, sample_cbd};
use crate::xof::{g, prf, TAG_CBD_ERROR, TAG_CBD_SECRET, TAG_G_KEYGEN};

// The CPA-secure triple underneath the KEM. All randomness is deterministic
// in the 32-byte seeds handed in; host entropy never enters below this
// layer. Secret and error vectors draw from separately tagged PRF streams
// with disjoint nonce counters (0..k for the secret vector, k..2k and 2k
// for the errors).

/// Key generation from seed `d`:
/// `(ρ, σ) ← G(d)`, `t̂ ← Â ∘ ŝ + ê`, emitting `ek = pack₁₂(t̂) ‖ ρ` and
/// `dk = pack₁₂(ŝ)`.
#[allow(clippy::similar_names)]
pub(crate) fn pke_key_gen<const K: usize, const ETA1_64: usize>(
    d: &[u8; 32], ek_pke: &mut [u8], dk_pke: &mut [u8],
) {
    debug_assert_eq!(ek_pke.len(), 384 * K + 32, "pke keygen: ek length");
    debug_assert_eq!(dk_pke.len(), 384 * K, "pke keygen: dk length");

    // (ρ, σ) ← G(d ‖ 0x00)    ▷ expand the seed into two independent halves
    let (rho, mut sigma) = g(&[d], TAG_G_KEYGEN);

    // Â ∈ (Z_q^{256})^{k×k} regenerated from ρ, already transformed
    let a_hat = expand_a::<K>(&rho);

    // s[i] ← CBD_η1(σ, 0x02, i);  e[i] ← CBD_η1(σ, 0x03, k + i)
    let s: PolyVec<K, Time> =
        PolyVec::from_fn(|i| sample_cbd(&prf::<ETA1_64>(&sigma, TAG_CBD_SECRET, i.to_le_bytes()[0])));
    let e: PolyVec<K, Time> = PolyVec::from_fn(|i| {
        sample_cbd(&prf::<ETA1_64>(&sigma, TAG_CBD_ERROR, (K + i).to_le_bytes()[0]))
    });

    // t̂ ← Â ∘ ŝ + ê
    let s_hat = s.ntt();
    let e_hat = e.ntt();
    let t_hat = mat_mul_vec(&a_hat, &s_hat).add(&e_hat);

    // ek ← pack₁₂(t̂) ‖ ρ
    for (i, chunk) in ek_pke.chunks_mut(384).enumerate().take(K) {
        byte_encode(12, &t_hat.polys[i], chunk);
    }
    ek_pke[384 * K..].copy_from_slice(&rho);

    // dk ← pack₁₂(ŝ)
    for (i, chunk) in dk_pke.chunks_mut(384).enumerate() {
        byte_encode(12, &s_hat.polys[i], chunk);
    }

    sigma.zeroize();
}


/// Encryption of a 32-byte message under coins `r_seed`:
/// `u ← NTT⁻¹(Âᵀ ∘ r̂) + e₁`, `v ← NTT⁻¹(t̂ ⋅ r̂) + e₂ + Encode(m)`,
/// `c ← pack_du(Compress_du(u)) ‖ pack_dv(Compress_dv(v))`.
#[allow(clippy::similar_names, clippy::many_single_char_names)]
pub(crate) fn pke_encrypt<const K: usize, const ETA1_64: usize, const ETA2_64: usize>(
    du: u32, dv: u32, ek_pke: &[u8], m: &[u8; 32], r_seed: &[u8; 32], ct: &mut [u8],
) -> Result<(), &'static str> {
    ensure!(ek_pke.len() == 384 * K + 32, "pke encrypt: encryption key length mismatch");
    ensure!(
        ct.len() == 32 * (du as usize * K + dv as usize),
        "pke encrypt: ciphertext length mismatch"
    );

    // t̂ ← unpack₁₂(ek), validated canonical
    let mut t_hat: PolyVec<K, Ntt> = PolyVec::from_fn(|_| Poly::zero());
    for (i, chunk) in ek_pke.chunks(384).enumerate().take(K) {
        t_hat.polys[i] = byte_decode(12, chunk)?;
    }

    // ρ ← ek[384k..]; Â regenerated on demand
    let rho = ek_pke[384 * K..].try_into().unwrap();
    let a_hat = expand_a::<K>(rho);

    // r[i] ← CBD_η1(r_seed, 0x02, i);  e₁[i] ← CBD_η2(r_seed, 0x03, k + i);
    // e₂ ← CBD_η2(r_seed, 0x03, 2k)
    let r: PolyVec<K, Time> = PolyVec::from_fn(|i| {
        sample_cbd(&prf::<ETA1_64>(r_seed, TAG_CBD_SECRET, i.to_le_bytes()[0]))
    });
    let e1: PolyVec<K, Time> = PolyVec::from_fn(|i| {
        sample_cbd(&prf::<ETA2_64>(r_seed, TAG_CBD_ERROR, (K + i).to_le_bytes()[0]))
    });
    let e2: Poly<Time> =
        sample_cbd(&prf::<ETA2_64>(r_seed, TAG_CBD_ERROR, (2 * K).to_le_bytes()[0]));

    // u ← NTT⁻¹(Âᵀ ∘ r̂) + e₁
    let r_hat = r.ntt();
    let mut u = mat_t_mul_vec(&a_hat, &r_hat).ntt_inv().add(&e1);

    // v ← NTT⁻¹(t̂ ⋅ r̂) + e₂ + Encode(m)
    let mu = msg_to_poly(m);
    let mut v = t_hat.dot(&r_hat).ntt_inv().add(&e2).add(&mu);

    // c ← pack_du(Compress_du(u)) ‖ pack_dv(Compress_dv(v))
    let step = 32 * du as usize;
    for (i, chunk) in ct.chunks_mut(step).enumerate().take(K) {
        compress_poly(du, &mut u.polys[i]);
        byte_encode(du, &u.polys[i], chunk);
    }
    compress_poly(dv, &mut v);
    byte_encode(dv, &v, &mut ct[K * step..]);

    Ok(())
}


/// Decryption: `m ← Decode(v′ − NTT⁻¹(ŝ ⋅ NTT(u′)))` with the decode
/// threshold evaluated by masks only.
pub(crate) fn pke_decrypt<const K: usize>(
    du: u32, dv: u32, dk_pke: &[u8], ct: &[u8],
) -> Result<[u8; 32], &'static str> {
    ensure!(dk_pke.len() == 384 * K, "pke decrypt: decryption key length mismatch");
    ensure!(
        ct.len() == 32 * (du as usize * K + dv as usize),
        "pke decrypt: ciphertext length mismatch"
    );

    // u′ ← Decompress_du(unpack_du(c₁))
    let c1 = &ct[..32 * du as usize * K];
    let mut u: PolyVec<K, Time> = PolyVec::from_fn(|_| Poly::zero());
    for (i, chunk) in c1.chunks(32 * du as usize).enumerate() {
        let mut p: Poly<Time> = byte_decode(du, chunk)?;
        decompress_poly(du, &mut p);
        u.polys[i] = p;
    }

    // v′ ← Decompress_dv(unpack_dv(c₂))
    let c2 = &ct[32 * du as usize * K..];
    let mut v: Poly<Time> = byte_decode(dv, c2)?;
    decompress_poly(dv, &mut v);

    // ŝ ← unpack₁₂(dk)
    let mut s_hat: PolyVec<K, Ntt> = PolyVec::from_fn(|_| Poly::zero());
    for (i, chunk) in dk_pke.chunks(384).enumerate() {
        s_hat.polys[i] = byte_decode(12, chunk)?;
    }

    // m ← Decode(v′ − NTT⁻¹(ŝ ⋅ NTT(u′)))
    let w = v.sub(&s_hat.dot(&u.ntt()).ntt_inv());
    Ok(poly_to_msg(&w))
}


#[cfg(test)]
mod tests {
    use super::*;

    const K: usize = 2;
    const ETA1_64: usize = 3 * 64;
    const ETA2_64: usize = 2 * 64;
    const DU: u32 = 10;
    const DV: u32 = 4;
    const EK_LEN: usize = 800;
    const DK_LEN: usize = 768;
    const CT_LEN: usize = 768;

    #[test]
    fn encrypt_decrypt_round_trip() {
        let mut ek = [0u8; EK_LEN];
        let mut dk = [0u8; DK_LEN];
        let mut ct = [0u8; CT_LEN];
        for trial in 0u8..20 {
            let d = [trial; 32];
            pke_key_gen::<K, ETA1_64>(&d, &mut ek, &mut dk);

            let mut m = [0u8; 32];
            m[0] = trial;
            m[31] = 0xA5;
            let r = [trial ^ 0xFF; 32];
            pke_encrypt::<K, ETA1_64, ETA2_64>(DU, DV, &ek, &m, &r, &mut ct).unwrap();

            let m_prime = pke_decrypt::<K>(DU, DV, &dk, &ct).unwrap();
            assert_eq!(m, m_prime);
        }
    }

    #[test]
    fn encrypt_rejects_bad_key() {
        let ff_ek = [0xFFu8; EK_LEN]; // oversized coefficients
        let mut ct = [0u8; CT_LEN];
        let res =
            pke_encrypt::<K, ETA1_64, ETA2_64>(DU, DV, &ff_ek, &[0u8; 32], &[0u8; 32], &mut ct);
        assert!(res.is_err());
    }

    #[test]
    fn keygen_is_deterministic() {
        let d = [42u8; 32];
        let (mut ek1, mut dk1) = ([0u8; EK_LEN], [0u8; DK_LEN]);
        let (mut ek2, mut dk2) = ([0u8; EK_LEN], [0u8; DK_LEN]);
        pke_key_gen::<K, ETA1_64>(&d, &mut ek1, &mut dk1);
        pke_key_gen::<K, ETA1_64>(&d, &mut ek2, &mut dk2);
        assert_eq!(ek1, ek2);
        assert_eq!(dk1, dk2);
    }
}
