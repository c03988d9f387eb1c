//! Damgard-Jurik public keys and ciphertexts.
//!
//! For a length parameter `s`, plaintexts live in $\mathbb{Z}_{n^s}$
//! and ciphertexts in $\mathbb{Z}^*_{n^{s+1}}$:
//! $Enc(m, r) = (1 + n)^m r^{n^s} \mod n^{s+1}$.

use num_bigint::{BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::{One, Pow};
use rand_core::CryptoRngCore;
use serde::{Deserialize, Serialize};

/// A Damgard-Jurik public key, the RSA modulus `n`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamgardJurikPublicKey {
    modulus: BigUint,
}

/// A Damgard-Jurik ciphertext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamgardJurikCiphertext {
    cipher: BigUint,
}

impl DamgardJurikCiphertext {
    /// Wraps a ciphertext value.
    pub fn new(cipher: BigUint) -> Self {
        Self { cipher }
    }

    /// The ciphertext value.
    pub fn cipher(&self) -> &BigUint {
        &self.cipher
    }
}

impl DamgardJurikPublicKey {
    /// Wraps an RSA modulus.
    pub fn new(modulus: BigUint) -> Self {
        Self { modulus }
    }

    /// The modulus `n`.
    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    /// $n^s$, the size of the plaintext space.
    pub fn plaintext_modulus(&self, length_parameter: u32) -> BigUint {
        Pow::pow(&self.modulus, length_parameter)
    }

    /// $n^{s+1}$, the modulus of the ciphertext space.
    pub fn ciphertext_modulus(&self, length_parameter: u32) -> BigUint {
        Pow::pow(&self.modulus, length_parameter + 1)
    }

    /// Samples a uniformly random element of $\mathbb{Z}^*_n$.
    pub fn random_unit(&self, rng: &mut impl CryptoRngCore) -> BigUint {
        loop {
            let candidate = rng.gen_biguint_below(&self.modulus);
            if candidate.gcd(&self.modulus).is_one() {
                return candidate;
            }
        }
    }

    /// Encrypts `message` with the given randomness `r`.
    pub fn encrypt_with_randomness(
        &self,
        message: &BigUint,
        randomness: &BigUint,
        length_parameter: u32,
    ) -> DamgardJurikCiphertext {
        let plaintext_modulus = self.plaintext_modulus(length_parameter);
        let ciphertext_modulus = &plaintext_modulus * &self.modulus;
        let base = &self.modulus + BigUint::one();
        let masked = base.modpow(&(message % &plaintext_modulus), &ciphertext_modulus);
        let blinding = randomness.modpow(&plaintext_modulus, &ciphertext_modulus);
        DamgardJurikCiphertext::new((masked * blinding) % ciphertext_modulus)
    }

    /// Encrypts `message` with fresh randomness.
    pub fn encrypt(
        &self,
        rng: &mut impl CryptoRngCore,
        message: &BigUint,
        length_parameter: u32,
    ) -> DamgardJurikCiphertext {
        let randomness = self.random_unit(rng);
        self.encrypt_with_randomness(message, &randomness, length_parameter)
    }
}
