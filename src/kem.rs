use rand_core::CryptoRngCore;
use subtle::{ConditionallySelectable, ConstantTimeEq};
use zeroize::Zeroize;

use crate::helpers::ensure;
use crate::pke::{pke_decrypt, pke_encrypt, pke_key_gen};
use crate::xof::{g, h, kdf, TAG_G_ENCAPS};
use crate::SharedSecretKey;

// The CCA wrapper: encapsulation commits to the whitened coin through G,
// decapsulation re-encrypts and substitutes the z-derived key on mismatch.
// Nothing in the mismatch path is observable from timing: the ciphertext
// comparison and the key selection are both masked.

/// Key generation from seeds `d` (PKE expansion) and `z` (implicit
/// rejection). `dk ← (dk_pke ‖ ek ‖ H(ek) ‖ z)`.
pub(crate) fn kem_key_gen_internal<const K: usize, const ETA1_64: usize>(
    d: &[u8; 32], z: &[u8; 32], ek: &mut [u8], dk: &mut [u8],
) {
    debug_assert_eq!(ek.len(), 384 * K + 32, "kem keygen: ek length");
    debug_assert_eq!(dk.len(), 768 * K + 96, "kem keygen: dk length");

    // (ek, dk_pke) from the CPA layer; dk_pke lands at the front of dk
    let p1 = 384 * K;
    pke_key_gen::<K, ETA1_64>(d, ek, &mut dk[..p1]);

    // dk ← (dk_pke ‖ ek ‖ H(ek) ‖ z)
    let h_ek = h(ek);
    let p2 = p1 + ek.len();
    let p3 = p2 + h_ek.len();
    dk[p1..p2].copy_from_slice(ek);
    dk[p2..p3].copy_from_slice(&h_ek);
    dk[p3..].copy_from_slice(z);
}


/// Key generation with caller-supplied randomness; the only point at which
/// host entropy enters the scheme (alongside the encapsulation coin).
pub(crate) fn kem_key_gen<const K: usize, const ETA1_64: usize>(
    rng: &mut impl CryptoRngCore, ek: &mut [u8], dk: &mut [u8],
) -> Result<(), &'static str> {
    let mut d = [0u8; 32];
    rng.try_fill_bytes(&mut d).map_err(|_| "keygen: random source failure for d")?;

    let mut z = [0u8; 32];
    rng.try_fill_bytes(&mut z).map_err(|_| "keygen: random source failure for z")?;

    kem_key_gen_internal::<K, ETA1_64>(&d, &z, ek, dk);
    d.zeroize();
    z.zeroize();
    Ok(())
}


/// Encapsulation against `ek` with a fixed 32-byte coin:
/// `m ← H(coin)`, `(K̄, r) ← G(m ‖ H(ek) ‖ 0x01)`, `c ← Enc(ek, m, r)`,
/// `K ← KDF(K̄ ‖ H(c))`. Deterministic in the coin, which is what makes
/// known-answer reproduction possible.
pub(crate) fn kem_encaps_internal<const K: usize, const ETA1_64: usize, const ETA2_64: usize>(
    du: u32, dv: u32, coin: &[u8; 32], ek: &[u8], ct: &mut [u8],
) -> Result<SharedSecretKey, &'static str> {
    // m ← H(coin)    ▷ whiten so a biased caller RNG cannot reach G directly
    let mut m = h(coin);

    // (K̄, r) ← G(m ‖ H(ek) ‖ 0x01)
    let h_ek = h(ek);
    let (mut k_bar, mut r) = g(&[&m, &h_ek], TAG_G_ENCAPS);

    // c ← Enc(ek, m, r)
    pke_encrypt::<K, ETA1_64, ETA2_64>(du, dv, ek, &m, &r, ct)?;

    // K ← KDF(K̄ ‖ H(c) ‖ 0x04)
    let k = kdf(&k_bar, &h(ct));

    m.zeroize();
    k_bar.zeroize();
    r.zeroize();
    Ok(SharedSecretKey(k))
}


/// Encapsulation with caller-supplied randomness for the coin.
pub(crate) fn kem_encaps<const K: usize, const ETA1_64: usize, const ETA2_64: usize>(
    rng: &mut impl CryptoRngCore, du: u32, dv: u32, ek: &[u8], ct: &mut [u8],
) -> Result<SharedSecretKey, &'static str> {
    ensure!(ek.len() == 384 * K + 32, "encaps: encapsulation key length mismatch");
    ensure!(
        ct.len() == 32 * (du as usize * K + dv as usize),
        "encaps: ciphertext length mismatch"
    );

    let mut coin = [0u8; 32];
    rng.try_fill_bytes(&mut coin).map_err(|_| "encaps: random source failure")?;

    let k = kem_encaps_internal::<K, ETA1_64, ETA2_64>(du, dv, &coin, ek, ct)?;
    coin.zeroize();
    Ok(k)
}


/// Decapsulation with implicit rejection. Always returns a well-formed
/// 32-byte secret: on re-encryption mismatch the result is
/// `KDF(z ‖ H(c))`, substituted by masked select so validity never shows in
/// the control flow, the memory access pattern, or an error value.
#[allow(clippy::similar_names)]
pub(crate) fn kem_decaps<
    const K: usize,
    const ETA1_64: usize,
    const ETA2_64: usize,
    const CT_LEN: usize,
>(
    du: u32, dv: u32, dk: &[u8], ct: &[u8; CT_LEN],
) -> Result<SharedSecretKey, &'static str> {
    ensure!(dk.len() == 768 * K + 96, "decaps: decapsulation key length mismatch");
    ensure!(
        ct.len() == 32 * (du as usize * K + dv as usize),
        "decaps: ciphertext length mismatch"
    );

    // dk layout: dk_pke ‖ ek ‖ H(ek) ‖ z; the length check above makes the
    // trailing slice exactly 32 bytes
    let dk_pke = &dk[..384 * K];
    let ek_pke = &dk[384 * K..768 * K + 32];
    let h_ek = &dk[768 * K + 32..768 * K + 64];
    let z: &[u8; 32] = dk[768 * K + 64..].try_into().unwrap();

    // m′ ← Dec(dk_pke, c)
    let mut m_prime = pke_decrypt::<K>(du, dv, dk_pke, ct)?;

    // (K̄′, r′) ← G(m′ ‖ H(ek) ‖ 0x01)
    let (mut k_bar_prime, mut r_prime) = g(&[&m_prime, h_ek], TAG_G_ENCAPS);

    // c′ ← Enc(ek, m′, r′)    ▷ deterministic re-encryption
    let mut c_prime = [0u8; CT_LEN];
    pke_encrypt::<K, ETA1_64, ETA2_64>(du, dv, ek_pke, &m_prime, &r_prime, &mut c_prime)?;

    // K ← c == c′ ? KDF(K̄′ ‖ H(c)) : KDF(z ‖ H(c)), selected by mask
    let h_ct = h(ct);
    let mut k = kdf(&k_bar_prime, &h_ct);
    let mut k_fail = kdf(z, &h_ct);
    k.conditional_assign(&k_fail, ct.ct_ne(&c_prime));

    m_prime.zeroize();
    k_bar_prime.zeroize();
    r_prime.zeroize();
    k_fail.zeroize();
    Ok(SharedSecretKey(k))
}
