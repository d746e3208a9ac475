// Runtime leakage check for decapsulation: valid ciphertexts in one class,
// tampered ones in the other. Implicit rejection makes both paths execute
// the same work, so the t statistic should stay in the noise.

use dudect_bencher::{ctbench_main, BenchRng, Class, CtRunner};
use latkem::l1;
use latkem::traits::{Decaps, Encaps, KeyGen, SerDes};

// Could also be l3 or l5.
use crate::l1::CipherText;

fn decaps_valid_vs_tampered(runner: &mut CtRunner, mut _rng: &mut BenchRng) {
    const ITERATIONS_OUTER: usize = 1000;
    const ITERATIONS_INNER: usize = 100;

    let (ek, dk) = l1::KG::keygen_from_seed([101u8; 32], [102u8; 32]);
    let (_ssk, ct) = ek.encaps_from_seed(&[103u8; 32]);
    let ct_good_bytes = ct.into_bytes();

    let mut ct_bad_bytes = ct_good_bytes;
    ct_bad_bytes[0] ^= 1;

    let ct_good = CipherText::try_from_bytes(ct_good_bytes).unwrap();
    let ct_bad = CipherText::try_from_bytes(ct_bad_bytes).unwrap();

    let mut inputs: Vec<CipherText> = Vec::new();
    let mut classes = Vec::new();

    for _ in 0..ITERATIONS_OUTER {
        inputs.push(ct_good.clone());
        classes.push(Class::Left);
    }

    for _ in 0..ITERATIONS_OUTER {
        inputs.push(ct_bad.clone());
        classes.push(Class::Right);
    }

    for (class, input) in classes.into_iter().zip(inputs.into_iter()) {
        runner.run_one(class, || {
            for _ in 0..ITERATIONS_INNER {
                let _ = dk.try_decaps(&input);
            }
        })
    }
}

fn encaps(runner: &mut CtRunner, mut _rng: &mut BenchRng) {
    const ITERATIONS_OUTER: usize = 1000;
    const ITERATIONS_INNER: usize = 100;

    let (ek1, _dk1) = l1::KG::keygen_from_seed([1u8; 32], [2u8; 32]);
    let (ek2, _dk2) = l1::KG::keygen_from_seed([3u8; 32], [4u8; 32]);

    let mut inputs: Vec<l1::EncapsKey> = Vec::new();
    let mut classes = Vec::new();

    for _ in 0..ITERATIONS_OUTER {
        inputs.push(ek1.clone());
        classes.push(Class::Left);
    }

    for _ in 0..ITERATIONS_OUTER {
        inputs.push(ek2.clone());
        classes.push(Class::Right);
    }

    for (class, input) in classes.into_iter().zip(inputs.into_iter()) {
        runner.run_one(class, || {
            for _ in 0..ITERATIONS_INNER {
                let _ = input.encaps_from_seed(&[7u8; 32]);
            }
        })
    }
}


ctbench_main!(decaps_valid_vs_tampered, encaps);

/*
See https://docs.rs/dudect-bencher/latest/dudect_bencher/

$ cargo run --release -- --continuous decaps_valid_vs_tampered
*/
