use latkem::traits::{Decaps, Encaps, KeyGen};
use latkem::{l1, l3, l5};
use rand_chacha::rand_core::SeedableRng;

// Decryption failure probability is below 2^-security-level for conforming
// parameters, so any mismatch across these sweeps is a bug, not bad luck.

fn sweep_l1(iterations: usize, seed: u64) {
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(seed);
    for i in 0..iterations {
        let (ek, dk) = l1::KG::try_keygen_with_rng(&mut rng).unwrap();
        let (ssk_enc, ct) = ek.try_encaps_with_rng(&mut rng).unwrap();
        let ssk_dec = dk.try_decaps(&ct).unwrap();
        assert!(ssk_enc == ssk_dec, "shared secret mismatch at iteration {i}");
    }
}

#[test]
fn round_trip_stress_l1() {
    sweep_l1(1_000, 11);
}

#[test]
fn round_trip_stress_l3() {
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(22);
    for i in 0..500 {
        let (ek, dk) = l3::KG::try_keygen_with_rng(&mut rng).unwrap();
        let (ssk_enc, ct) = ek.try_encaps_with_rng(&mut rng).unwrap();
        let ssk_dec = dk.try_decaps(&ct).unwrap();
        assert!(ssk_enc == ssk_dec, "shared secret mismatch at iteration {i}");
    }
}

#[test]
fn round_trip_stress_l5() {
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(33);
    for i in 0..500 {
        let (ek, dk) = l5::KG::try_keygen_with_rng(&mut rng).unwrap();
        let (ssk_enc, ct) = ek.try_encaps_with_rng(&mut rng).unwrap();
        let ssk_dec = dk.try_decaps(&ct).unwrap();
        assert!(ssk_enc == ssk_dec, "shared secret mismatch at iteration {i}");
    }
}

// The long-haul failure sweep; run on demand with `cargo test -- --ignored`.
#[test]
#[ignore]
fn round_trip_stress_l1_extended() {
    sweep_l1(100_000, 44);
}
