//! Bridges between the public `num-bigint` integers carried in messages and statements,
//! and the `crypto-bigint` integers secret values are held in.

use alloc::vec::Vec;

use crypto_bigint::{
    modular::{BoxedMontyForm, BoxedMontyParams},
    BoxedUint, Gcd, Limb, NonZero, Odd, RandomMod, Word,
};
use num_bigint::BigUint;
use rand_core::CryptoRngCore;
use zeroize::Zeroizing;

/// Big-endian bytes as a `BoxedUint` with just enough limbs to hold them.
pub(crate) fn from_be_bytes(bytes: &[u8]) -> BoxedUint {
    let limbs = bytes
        .rchunks(Limb::BYTES)
        .map(|chunk| Limb(chunk.iter().fold(0, |acc: Word, byte| (acc << 8) | Word::from(*byte))))
        .collect::<Vec<_>>();
    BoxedUint::from(limbs)
}

/// Converts without leaving the intermediate byte buffer in memory.
pub(crate) fn to_boxed(value: &BigUint) -> BoxedUint {
    let bytes = Zeroizing::new(value.to_bytes_be());
    from_be_bytes(&bytes)
}

/// Only for values that are about to become public.
pub(crate) fn to_biguint(value: &BoxedUint) -> BigUint {
    BigUint::from_bytes_be(&value.to_be_bytes())
}

/// An odd modulus, prepared both for reduction and for Montgomery arithmetic.
#[derive(Debug, Clone)]
pub(crate) struct OddModulus {
    nonzero: NonZero<BoxedUint>,
    params: BoxedMontyParams,
}

impl OddModulus {
    /// Returns `None` if `value` is even.
    pub fn new(value: &BigUint) -> Option<Self> {
        let value = to_boxed(value);
        let nonzero = NonZero::new(value.clone()).into_option()?;
        let odd = Odd::new(value).into_option()?;
        Some(Self {
            nonzero,
            params: BoxedMontyParams::new(odd),
        })
    }

    pub fn bits_precision(&self) -> u32 {
        self.nonzero.bits_precision()
    }

    /// `value` modulo `self`, with the precision of the modulus.
    pub fn reduce(&self, value: &BoxedUint) -> BoxedUint {
        let precision = value.bits_precision().max(self.bits_precision());
        let wide = Zeroizing::new(value.widen(precision));
        let remainder = Zeroizing::new(wide.rem(&self.nonzero.widen(precision)));
        remainder.shorten(self.bits_precision())
    }

    pub fn to_monty(&self, value: &BoxedUint) -> BoxedMontyForm {
        BoxedMontyForm::new(self.reduce(value), self.params.clone())
    }

    /// A uniformly random integer in $[0, m)$.
    pub fn random(&self, rng: &mut impl CryptoRngCore) -> BoxedUint {
        BoxedUint::random_mod(rng, &self.nonzero)
    }

    /// A uniformly random integer in $[1, m)$ coprime with $m$.
    pub fn random_unit(&self, rng: &mut impl CryptoRngCore) -> BoxedUint {
        loop {
            let candidate = self.random(rng);
            if self.params.modulus().gcd(&candidate).is_one().into() {
                return candidate;
            }
        }
    }
}
