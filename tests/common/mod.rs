use std::sync::OnceLock;

use crypto_bigint::{Encoding, U1024};
use crypto_primes::RandomPrimeWithRng;
use num_bigint::BigUint;
use rand_core::OsRng;
use sigma_dlog::{
    damgard_jurik::DamgardJurikPublicKey,
    sigma::dj_encrypted_zero::{DjEncryptedZeroCommonInput, DjEncryptedZeroProverInput},
};

fn random_prime() -> BigUint {
    let prime = U1024::generate_prime_with_rng(&mut OsRng, U1024::BITS);
    BigUint::from_bytes_be(&prime.to_be_bytes())
}

/// A 2048-bit RSA modulus, generated once per test binary.
pub fn rsa_modulus() -> &'static BigUint {
    static MODULUS: OnceLock<BigUint> = OnceLock::new();
    MODULUS.get_or_init(|| {
        loop {
            let modulus = random_prime() * random_prime();
            // Two 1024-bit primes may give a 2047-bit product.
            if modulus.bits() == 2048 {
                return modulus;
            }
        }
    })
}

/// An honest statement and witness: an encryption of zero under `rsa_modulus()`.
pub fn encrypted_zero(length_parameter: u32) -> DjEncryptedZeroProverInput {
    let public_key = DamgardJurikPublicKey::new(rsa_modulus().clone());
    let randomness = public_key.random_unit(&mut OsRng);
    let ciphertext = public_key.encrypt_with_randomness(&BigUint::from(0u32), &randomness, length_parameter);
    DjEncryptedZeroProverInput::new(DjEncryptedZeroCommonInput::new(public_key, ciphertext), randomness)
}
