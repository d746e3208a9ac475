use sha3::digest::{ExtendableOutput, Update, XofReader};
use sha3::{Shake128, Shake256};

// Two XOF configurations cover every derivation in the scheme: SHAKE128 for
// public matrix expansion, SHAKE256 for everything touching secrets. A seed
// shared between distinct uses is separated by a single tag byte absorbed
// after the seed material; the full tag set lives here so a collision would
// be visible at a glance.

/// Seed split at key generation: `(ρ, σ) ← G(d ‖ 0x00)`.
pub(crate) const TAG_G_KEYGEN: u8 = 0x00;
/// Seed split at encapsulation: `(K̄, r) ← G(m ‖ H(ek) ‖ 0x01)`.
pub(crate) const TAG_G_ENCAPS: u8 = 0x01;
/// Noise stream for the LWE secret vectors (`s` at key generation, `r` at
/// encryption).
pub(crate) const TAG_CBD_SECRET: u8 = 0x02;
/// Noise stream for the error terms (`e`, `e₁`, `e₂`).
pub(crate) const TAG_CBD_ERROR: u8 = 0x03;
/// Final key derivation marker.
pub(crate) const TAG_KDF: u8 = 0x04;


/// Matrix-expansion stream: SHAKE128 over `ρ ‖ b0 ‖ b1`. Carries no tag
/// byte; the index pair already separates the k² uses of `ρ`.
#[must_use]
pub(crate) fn xof_a(rho: &[u8; 32], b0: u8, b1: u8) -> impl XofReader {
    let mut hasher = Shake128::default();
    hasher.update(rho);
    hasher.update(&[b0]);
    hasher.update(&[b1]);
    hasher.finalize_xof()
}


/// Two-way split `G`: absorbs the given parts and the tag, squeezes 64 bytes
/// returned as two 32-byte halves.
pub(crate) fn g(parts: &[&[u8]], tag: u8) -> ([u8; 32], [u8; 32]) {
    let mut hasher = Shake256::default();
    parts.iter().for_each(|p| hasher.update(p));
    hasher.update(&[tag]);
    let mut reader = hasher.finalize_xof();
    let (mut a, mut b) = ([0u8; 32], [0u8; 32]);
    reader.read(&mut a);
    reader.read(&mut b);
    (a, b)
}


/// 32-byte hash `H`, used on public keys, ciphertexts, and to whiten the
/// encapsulation coin. Untagged: its inputs are never shared with a tagged
/// use of the same seed.
#[must_use]
pub(crate) fn h(bytes: &[u8]) -> [u8; 32] {
    let mut hasher = Shake256::default();
    hasher.update(bytes);
    let mut reader = hasher.finalize_xof();
    let mut result = [0u8; 32];
    reader.read(&mut result);
    result
}


/// Noise PRF: squeezes `ETA_64 = 64·η` bytes from `seed ‖ tag ‖ nonce` for
/// one centered-binomial sample.
#[must_use]
pub(crate) fn prf<const ETA_64: usize>(seed: &[u8; 32], tag: u8, nonce: u8) -> [u8; ETA_64] {
    let mut hasher = Shake256::default();
    hasher.update(seed);
    hasher.update(&[tag]);
    hasher.update(&[nonce]);
    let mut reader = hasher.finalize_xof();
    let mut result = [0u8; ETA_64];
    reader.read(&mut result);
    result
}


/// Shared-secret derivation: `KDF(k̄ ‖ H(c) ‖ 0x04)`, 32 bytes out. Also
/// produces the implicit-rejection key when fed `z` in place of `k̄`.
#[must_use]
pub(crate) fn kdf(k_bar: &[u8; 32], h_ct: &[u8; 32]) -> [u8; 32] {
    let mut hasher = Shake256::default();
    hasher.update(k_bar);
    hasher.update(h_ct);
    hasher.update(&[TAG_KDF]);
    let mut reader = hasher.finalize_xof();
    let mut result = [0u8; 32];
    reader.read(&mut result);
    result
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_and_tag_separated() {
        let seed = [7u8; 32];
        let (a1, b1) = g(&[&seed], TAG_G_KEYGEN);
        let (a2, b2) = g(&[&seed], TAG_G_KEYGEN);
        assert_eq!((a1, b1), (a2, b2));
        let (a3, _) = g(&[&seed], TAG_G_ENCAPS);
        assert_ne!(a1, a3);
        assert_ne!(a1, b1);
    }

    #[test]
    fn prf_separates_tag_and_nonce() {
        let seed = [9u8; 32];
        let a: [u8; 128] = prf(&seed, TAG_CBD_SECRET, 0);
        let b: [u8; 128] = prf(&seed, TAG_CBD_SECRET, 1);
        let c: [u8; 128] = prf(&seed, TAG_CBD_ERROR, 0);
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_eq!(a, prf::<128>(&seed, TAG_CBD_SECRET, 0));
    }

    #[test]
    fn xof_a_index_order_matters() {
        let rho = [3u8; 32];
        let mut r1 = xof_a(&rho, 0, 1);
        let mut r2 = xof_a(&rho, 1, 0);
        let (mut a, mut b) = ([0u8; 24], [0u8; 24]);
        r1.read(&mut a);
        r2.read(&mut b);
        assert_ne!(a, b);
    }
}
