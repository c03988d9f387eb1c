use alloc::boxed::Box;

use crypto_bigint::BoxedUint;
use digest::XofReader;
use rand_core::CryptoRngCore;
use serde::{Deserialize, Serialize};
use serde_encoded_bytes::{Hex, SliceLike};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use super::{SigmaError, SigmaMessage};
use crate::tools::{
    bigint::from_be_bytes,
    hashing::{Chain, Hasher},
};

/// A verifier's challenge: `ceil(t / 8)` big-endian bytes holding an integer below $2^t$,
/// where `t` is the soundness parameter.
///
/// A challenge is meant to be used for exactly one verification.
/// It cannot be cloned, is consumed by the verifier, and is zeroized when dropped.
#[derive(Debug, PartialEq, Eq, Zeroize, ZeroizeOnDrop, Serialize, Deserialize)]
pub struct Challenge(#[serde(with = "SliceLike::<Hex>")] Box<[u8]>);

/// The number of bytes in a challenge for the given soundness parameter.
pub(crate) fn challenge_byte_len(soundness_bits: u32) -> usize {
    soundness_bits.div_ceil(8) as usize
}

/// The mask for the most significant byte that keeps the challenge below $2^t$.
fn top_byte_mask(soundness_bits: u32) -> u8 {
    let excess = 8 * soundness_bits.div_ceil(8) - soundness_bits;
    0xff >> excess
}

impl Challenge {
    fn from_masked(mut bytes: Box<[u8]>, soundness_bits: u32) -> Self {
        if let Some(top) = bytes.first_mut() {
            *top &= top_byte_mask(soundness_bits);
        }
        Self(bytes)
    }

    /// Samples a uniformly random challenge.
    pub fn random(rng: &mut impl CryptoRngCore, soundness_bits: u32) -> Self {
        let mut bytes = vec![0u8; challenge_byte_len(soundness_bits)].into_boxed_slice();
        rng.fill_bytes(&mut bytes);
        Self::from_masked(bytes, soundness_bits)
    }

    /// Wraps externally derived challenge bytes,
    /// checking that they encode an integer below $2^t$ in exactly `ceil(t / 8)` bytes.
    pub fn from_bytes(bytes: &[u8], soundness_bits: u32) -> Result<Self, SigmaError> {
        let challenge = Self(bytes.into());
        challenge.validate(soundness_bits)?;
        Ok(challenge)
    }

    /// Derives a challenge non-interactively from the statement and the prover's first message
    /// (the Fiat-Shamir transform).
    pub fn from_transcript(
        dst: &[u8],
        statement: &impl Serialize,
        first_message: &SigmaMessage,
        soundness_bits: u32,
    ) -> Self {
        let mut reader = Hasher::new_with_dst(dst)
            .chain(&soundness_bits)
            .chain(statement)
            .chain(first_message)
            .finalize_to_reader();
        let mut bytes = vec![0u8; challenge_byte_len(soundness_bits)].into_boxed_slice();
        reader.read(&mut bytes);
        Self::from_masked(bytes, soundness_bits)
    }

    pub(crate) fn validate(&self, soundness_bits: u32) -> Result<(), SigmaError> {
        if self.0.len() != challenge_byte_len(soundness_bits) {
            return Err(SigmaError::InvalidChallenge);
        }
        match self.0.first() {
            Some(top) if top & !top_byte_mask(soundness_bits) != 0 => Err(SigmaError::InvalidChallenge),
            _ => Ok(()),
        }
    }

    /// The raw challenge bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The challenge as the exponent `e`, erased when the caller drops it.
    pub(crate) fn to_exponent(&self) -> Zeroizing<BoxedUint> {
        Zeroizing::new(from_be_bytes(&self.0))
    }
}

#[cfg(test)]
mod tests {
    use crypto_bigint::BoxedUint;
    use num_bigint::BigUint;
    use rand_chacha::ChaCha8Rng;
    use rand_core::{OsRng, SeedableRng};

    use super::Challenge;
    use crate::sigma::{SigmaError, SigmaMessage};

    #[test]
    fn random_challenges_fit_the_soundness_parameter() {
        for bits in [1, 7, 8, 9, 80, 127] {
            let challenge = Challenge::random(&mut OsRng, bits);
            assert_eq!(challenge.as_bytes().len(), (bits as usize).div_ceil(8));
            assert!(challenge.to_exponent().bits() <= bits);
            assert!(challenge.validate(bits).is_ok());
        }
    }

    #[test]
    fn seeded_sampling_is_reproducible() {
        let first = Challenge::random(&mut ChaCha8Rng::seed_from_u64(1234567890), 80);
        let second = Challenge::random(&mut ChaCha8Rng::seed_from_u64(1234567890), 80);
        let other = Challenge::random(&mut ChaCha8Rng::seed_from_u64(987654321), 80);
        assert_eq!(first, second);
        assert_ne!(first, other);
    }

    #[test]
    fn external_challenges_are_validated() {
        assert!(Challenge::from_bytes(&[0xff; 10], 80).is_ok());
        assert_eq!(
            Challenge::from_bytes(&[0xff; 9], 80).unwrap_err(),
            SigmaError::InvalidChallenge
        );
        assert_eq!(
            Challenge::from_bytes(&[0xff; 11], 80).unwrap_err(),
            SigmaError::InvalidChallenge
        );

        // t = 12: the top nibble must be clear
        let challenge = Challenge::from_bytes(&[0x0f, 0xff], 12).unwrap();
        assert_eq!(*challenge.to_exponent(), BoxedUint::from(0xfffu32));
        assert_eq!(
            Challenge::from_bytes(&[0x1f, 0xff], 12).unwrap_err(),
            SigmaError::InvalidChallenge
        );
    }

    #[test]
    fn transcript_challenges_are_deterministic() {
        let statement = (BigUint::from(77u32), BigUint::from(5u32));
        let first = SigmaMessage::Integer(BigUint::from(1234u32));
        let other = SigmaMessage::Integer(BigUint::from(1235u32));

        let c1 = Challenge::from_transcript(b"test", &statement, &first, 80);
        let c2 = Challenge::from_transcript(b"test", &statement, &first, 80);
        let c3 = Challenge::from_transcript(b"test", &statement, &other, 80);
        let c4 = Challenge::from_transcript(b"other", &statement, &first, 80);
        assert_eq!(c1, c2);
        assert_ne!(c1, c3);
        assert_ne!(c1, c4);

        let short = Challenge::from_transcript(b"test", &statement, &first, 12);
        assert!(short.validate(12).is_ok());
    }
}
