#![no_std]
#![deny(clippy::pedantic)]
#![deny(warnings)]
#![deny(missing_docs)]
#![doc = include_str!("../README.md")]


///
/// Implements a module-lattice key-encapsulation mechanism over the ring
/// `Z_q[x]/(x^256 + 1)` with q = 3329, at three security levels.
//
// Supports automatically clearing sensitive data on drop
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::traits::SerDes;

// Layer map, leaves first
//
// Montgomery/Barrett modular arithmetic      --> reduce.rs
// Forward/inverse transforms and basemul     --> ntt.rs
// Tagged ring elements and vectors           --> poly.rs
// XOF configurations and domain separation   --> xof.rs
// Uniform and centered-binomial sampling     --> sampling.rs
// Bit packing and the message codec          --> byte_fns.rs
// Compression and shared macros              --> helpers.rs
// CPA public-key encryption                  --> pke.rs
// CCA encapsulation (implicit rejection)     --> kem.rs
//
// The three parameter sets are modules in this file with injected macro code
// that connects them into the functionality in kem.rs. Some of the 'obtuse'
// coding style is driven by clippy pedantic.

mod byte_fns;
mod helpers;
mod kem;
mod ntt;
mod pke;
mod poly;
mod reduce;
mod sampling;
mod xof;

/// All functionality is covered by traits, such that consumers can utilize trait objects as desired.
pub mod traits;

// Relevant to all parameter sets
const _N: u32 = 256;
const Q: u32 = 3329;
const ZETA: u32 = 17;

/// Shared Secret Key Length for all parameter sets (in bytes)
pub const SSK_LEN: usize = 32;

/// The (opaque) shared secret key that can be de/serialized by each party.
#[derive(Clone, Debug, Zeroize, ZeroizeOnDrop)]
pub struct SharedSecretKey([u8; SSK_LEN]);

impl SerDes for SharedSecretKey {
    type ByteArray = [u8; SSK_LEN];

    fn into_bytes(self) -> Self::ByteArray { self.0 }

    fn try_from_bytes(ssk: Self::ByteArray) -> Result<Self, &'static str> {
        // Not really needed but provided for symmetry.
        // No opportunity for validation, but using a Result for a future possibility
        Ok(SharedSecretKey(ssk))
    }
}


// Conservative (constant-time) paranoia...
impl PartialEq for SharedSecretKey {
    fn eq(&self, other: &Self) -> bool {
        let mut result = true;
        for i in 0..self.0.len() {
            result &= self.0[i] == other.0[i];
        }
        result
    }
}


// This common functionality is injected into each parameter set module
macro_rules! functionality {
    () => {
        const ETA1_64: usize = ETA1 as usize * 64; // Currently, Rust does not allow expressions involving constants...
        const ETA2_64: usize = ETA2 as usize * 64; // ...in generics, so these are handled manually.

        use crate::byte_fns::byte_decode;
        use crate::helpers::ensure;
        use crate::kem::{kem_decaps, kem_encaps, kem_key_gen, kem_key_gen_internal};
        use crate::poly::{Ntt, Poly};
        use crate::traits::{Decaps, Encaps, KeyGen, SerDes};
        use crate::xof::h;
        use crate::SharedSecretKey;
        use rand_core::CryptoRngCore;
        use zeroize::{Zeroize, ZeroizeOnDrop};

        /// Correctly sized encapsulation key specific to the target security parameter set.
        #[derive(Clone, Zeroize, ZeroizeOnDrop)]
        pub struct EncapsKey([u8; EK_LEN]);

        /// Correctly sized decapsulation key specific to the target security parameter set.
        #[derive(Clone, Zeroize, ZeroizeOnDrop)]
        pub struct DecapsKey([u8; DK_LEN]);

        /// Correctly sized ciphertext specific to the target security parameter set.
        #[derive(Clone, Zeroize, ZeroizeOnDrop)]
        pub struct CipherText([u8; CT_LEN]);

        /// Key generation for this parameter set; an empty struct carrying
        /// the associated functions that produce keypairs.
        pub struct KG();

        impl KeyGen for KG {
            type DecapsByteArray = [u8; DK_LEN];
            type DecapsKey = DecapsKey;
            type EncapsByteArray = [u8; EK_LEN];
            type EncapsKey = EncapsKey;

            fn try_keygen_with_rng(
                rng: &mut impl CryptoRngCore,
            ) -> Result<(EncapsKey, DecapsKey), &'static str> {
                let (mut ek, mut dk) = ([0u8; EK_LEN], [0u8; DK_LEN]);
                kem_key_gen::<K, ETA1_64>(rng, &mut ek, &mut dk)?;
                Ok((EncapsKey(ek), DecapsKey(dk)))
            }

            fn keygen_from_seed(d: [u8; 32], z: [u8; 32]) -> (EncapsKey, DecapsKey) {
                let (mut ek, mut dk) = ([0u8; EK_LEN], [0u8; DK_LEN]);
                kem_key_gen_internal::<K, ETA1_64>(&d, &z, &mut ek, &mut dk);
                (EncapsKey(ek), DecapsKey(dk))
            }

            fn validate_keypair_vartime(
                ek: &Self::EncapsByteArray, dk: &Self::DecapsByteArray,
            ) -> bool {
                let p1 = 384 * K;
                let p2 = p1 + EK_LEN;
                let same_ek = ek[..] == dk[p1..p2];
                let same_h = h(ek)[..] == dk[p2..p2 + 32];
                same_ek & same_h
            }
        }

        impl Encaps for EncapsKey {
            type CipherText = CipherText;
            type SharedSecretKey = SharedSecretKey;

            fn try_encaps_with_rng(
                &self, rng: &mut impl CryptoRngCore,
            ) -> Result<(Self::SharedSecretKey, Self::CipherText), &'static str> {
                let mut ct = [0u8; CT_LEN];
                let ssk = kem_encaps::<K, ETA1_64, ETA2_64>(rng, DU, DV, &self.0, &mut ct)?;
                Ok((ssk, CipherText(ct)))
            }
        }

        impl Decaps for DecapsKey {
            type CipherText = CipherText;
            type SharedSecretKey = SharedSecretKey;

            fn try_decaps(&self, ct: &CipherText) -> Result<SharedSecretKey, &'static str> {
                kem_decaps::<K, ETA1_64, ETA2_64, CT_LEN>(DU, DV, &self.0, &ct.0)
            }
        }


        impl SerDes for EncapsKey {
            type ByteArray = [u8; EK_LEN];

            fn into_bytes(self) -> Self::ByteArray { self.0 }

            fn try_from_bytes(ek: Self::ByteArray) -> Result<Self, &'static str> {
                // Accepting a byte array of fixed size settles the length
                // check; each packed group must additionally decode to a
                // canonical coefficient below q.
                for i in 0..K {
                    let _t: Poly<Ntt> = byte_decode(12, &ek[384 * i..384 * (i + 1)])?;
                }
                Ok(EncapsKey(ek))
            }
        }


        impl SerDes for DecapsKey {
            type ByteArray = [u8; DK_LEN];

            fn into_bytes(self) -> Self::ByteArray { self.0 }

            fn try_from_bytes(dk: Self::ByteArray) -> Result<Self, &'static str> {
                // Both packed halves (the decryption key and the embedded
                // encapsulation key) must be canonical, and the stored hash
                // must match the embedded encapsulation key. All of this is
                // public data, so vartime validation is fine.
                for i in 0..2 * K {
                    let _t: Poly<Ntt> = byte_decode(12, &dk[384 * i..384 * (i + 1)])?;
                }
                let p2 = 768 * K + 32;
                ensure!(
                    h(&dk[384 * K..p2])[..] == dk[p2..p2 + 32],
                    "decaps key: stored hash mismatch"
                );
                Ok(DecapsKey(dk))
            }
        }

        impl SerDes for CipherText {
            type ByteArray = [u8; CT_LEN];

            fn into_bytes(self) -> Self::ByteArray { self.0 }

            fn try_from_bytes(ct: Self::ByteArray) -> Result<Self, &'static str> {
                // Compressed coefficients use their full bit range, so a
                // correctly sized array is always structurally valid. A
                // Result is used in case future opportunities for
                // validation arise.
                Ok(CipherText(ct))
            }
        }
    };
}


/// Functionality for security level 1 (k = 2, targeting 128-bit security).
#[cfg(feature = "l1")]
pub mod l1 {
    //!
    //! Typical usage flow entails:
    //! 1. The originator runs `try_keygen()` to get an encaps key `encapsKey` and decaps key `decapsKey`.
    //! 2. The originator serializes the encaps key via `encapsKey.into_bytes()` and sends to the remote party.
    //! 3. The remote party deserializes the bytes via `try_from_bytes(<bytes>)` and runs `try_encaps()` to get the
    //!    shared secret key `ssk` and ciphertext `cipherText`.
    //! 4. The remote party serializes the cipertext via `cipherText.into_bytes()` and sends to the originator.
    //! 5. The originator deserializes the ciphertext via `try_from_bytes(<bytes>)` then
    //!    runs `decapsKey.try_decaps(cipherText)` to the get shared secret key `ssk`.
    //! 6. Both the originator and remote party now have the same shared secret key `ssk`.

    const K: usize = 2;
    const ETA1: u32 = 3;
    const ETA2: u32 = 2;
    const DU: u32 = 10;
    const DV: u32 = 4;

    /// Serialized Encapsulation Key Length (in bytes)
    pub const EK_LEN: usize = 800;
    /// Serialized Decapsulation Key Length (in bytes)
    pub const DK_LEN: usize = 1632;
    /// Serialized Ciphertext Length (in bytes)
    pub const CT_LEN: usize = 768;

    functionality!();
}


/// Functionality for security level 3 (k = 3, targeting 192-bit security).
#[cfg(feature = "l3")]
pub mod l3 {
    //!
    //! Typical usage flow entails:
    //! 1. The originator runs `try_keygen()` to get an encaps key `encapsKey` and decaps key `decapsKey`.
    //! 2. The originator serializes the encaps key via `encapsKey.into_bytes()` and sends to the remote party.
    //! 3. The remote party deserializes the bytes via `try_from_bytes(<bytes>)` and runs `try_encaps()` to get the
    //!    shared secret key `ssk` and ciphertext `cipherText`.
    //! 4. The remote party serializes the cipertext via `cipherText.into_bytes()` and sends to the originator.
    //! 5. The originator deserializes the ciphertext via `try_from_bytes(<bytes>)` then
    //!    runs `decapsKey.try_decaps(cipherText)` to the get shared secret key `ssk`.
    //! 6. Both the originator and remote party now have the same shared secret key `ssk`.

    const K: usize = 3;
    const ETA1: u32 = 2;
    const ETA2: u32 = 2;
    const DU: u32 = 10;
    const DV: u32 = 4;

    /// Serialized Encapsulation Key Length (in bytes)
    pub const EK_LEN: usize = 1184;
    /// Serialized Decapsulation Key Length (in bytes)
    pub const DK_LEN: usize = 2400;
    /// Serialized Ciphertext Length (in bytes)
    pub const CT_LEN: usize = 1088;

    functionality!();
}


/// Functionality for security level 5 (k = 4, targeting 256-bit security).
#[cfg(feature = "l5")]
pub mod l5 {
    //!
    //! Typical usage flow entails:
    //! 1. The originator runs `try_keygen()` to get an encaps key `encapsKey` and decaps key `decapsKey`.
    //! 2. The originator serializes the encaps key via `encapsKey.into_bytes()` and sends to the remote party.
    //! 3. The remote party deserializes the bytes via `try_from_bytes(<bytes>)` and runs `try_encaps()` to get the
    //!    shared secret key `ssk` and ciphertext `cipherText`.
    //! 4. The remote party serializes the cipertext via `cipherText.into_bytes()` and sends to the originator.
    //! 5. The originator deserializes the ciphertext via `try_from_bytes(<bytes>)` then
    //!    runs `decapsKey.try_decaps(cipherText)` to the get shared secret key `ssk`.
    //! 6. Both the originator and remote party now have the same shared secret key `ssk`.

    const K: usize = 4;
    const ETA1: u32 = 2;
    const ETA2: u32 = 2;
    const DU: u32 = 11;
    const DV: u32 = 5;

    /// Serialized Encapsulation Key Length (in bytes)
    pub const EK_LEN: usize = 1568;
    /// Serialized Decapsulation Key Length (in bytes)
    pub const DK_LEN: usize = 3168;
    /// Serialized Ciphertext Length (in bytes)
    pub const CT_LEN: usize = 1568;

    functionality!();
}
