//! Proof that a Damgard-Jurik ciphertext encrypts zero.
//!
//! Statement: a public key `n` and a ciphertext `c`, with length parameter `s`,
//! $N = n^s$ and $N' = n^{s+1}$.
//! Witness: `r` such that $c = r^N \mod N'$.
//!
//! 1. The prover samples $\sigma \in \mathbb{Z}^*_n$ and sends $a = \sigma^N \mod N'$.
//! 2. The verifier sends a challenge $e < 2^t$.
//! 3. The prover sends $z = \sigma r^e \mod n$.
//!
//! The verifier accepts iff $a < N'$, $z < n$, `a`, `z`, `c` are coprime with `n`
//! and $z^N = a c^e \mod N'$.
//! The soundness error is $2^{-t}$ as long as $t < |n| / 3$.

use crypto_bigint::BoxedUint;
use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::One;
use rand_core::CryptoRngCore;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::{
    Challenge, SigmaError, SigmaMessage, SigmaParams, SigmaProverComputation, SigmaVerifierComputation,
    VerifierCore, VerifierState,
};
use crate::{
    damgard_jurik::{DamgardJurikCiphertext, DamgardJurikPublicKey},
    tools::{
        bigint::{to_biguint, to_boxed, OddModulus},
        Secret,
    },
};

/// The public statement: `c` encrypts zero under `n`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DjEncryptedZeroCommonInput {
    public_key: DamgardJurikPublicKey,
    ciphertext: DamgardJurikCiphertext,
}

impl DjEncryptedZeroCommonInput {
    /// Creates the statement.
    pub fn new(public_key: DamgardJurikPublicKey, ciphertext: DamgardJurikCiphertext) -> Self {
        Self { public_key, ciphertext }
    }

    /// The public key.
    pub fn public_key(&self) -> &DamgardJurikPublicKey {
        &self.public_key
    }

    /// The ciphertext.
    pub fn ciphertext(&self) -> &DamgardJurikCiphertext {
        &self.ciphertext
    }
}

/// The statement together with the encryption randomness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DjEncryptedZeroProverInput {
    common: DjEncryptedZeroCommonInput,
    randomness: Secret<BoxedUint>,
}

impl DjEncryptedZeroProverInput {
    /// Creates the prover's input; `randomness` is the `r` the ciphertext was created with.
    ///
    /// `randomness` is consumed and only kept in erasable storage from here on.
    pub fn new(common: DjEncryptedZeroCommonInput, randomness: BigUint) -> Self {
        Self {
            common,
            randomness: Secret::init_with(|| to_boxed(&randomness)),
        }
    }

    /// The public part of the input.
    pub fn common(&self) -> &DjEncryptedZeroCommonInput {
        &self.common
    }
}

/// Checks `t < |n| / 3`.
fn check_soundness(soundness_bits: u32, modulus: &BigUint) -> Result<(), SigmaError> {
    let limit = modulus.bits() / 3;
    if u64::from(soundness_bits) >= limit {
        tracing::warn!(
            soundness_bits,
            modulus_bits = modulus.bits(),
            "Soundness parameter is too large for the modulus"
        );
        return Err(SigmaError::Soundness { soundness_bits, limit });
    }
    Ok(())
}

/// $n$ and $N' = n^{s+1}$ ready for modular arithmetic, and the exponent $N = n^s$.
#[derive(Debug)]
struct Moduli {
    n: OddModulus,
    big_n: BoxedUint,
    big_n_prime: OddModulus,
}

fn check_statement(input: &DjEncryptedZeroCommonInput, length_parameter: u32) -> Result<Moduli, SigmaError> {
    let public_key = &input.public_key;
    if public_key.modulus() <= &BigUint::one() {
        return Err(SigmaError::InvalidStatement("the modulus must be greater than 1"));
    }
    let not_odd = || SigmaError::InvalidStatement("the modulus must be odd");
    Ok(Moduli {
        n: OddModulus::new(public_key.modulus()).ok_or_else(not_odd)?,
        big_n: to_boxed(&public_key.plaintext_modulus(length_parameter)),
        big_n_prime: OddModulus::new(&public_key.ciphertext_modulus(length_parameter)).ok_or_else(not_odd)?,
    })
}

#[derive(Debug)]
struct Ephemeral {
    sigma: Secret<BoxedUint>,
    randomness: Secret<BoxedUint>,
    modulus: OddModulus,
}

/// The prover for [`DjEncryptedZeroVerifier`].
#[derive(Debug)]
pub struct DjEncryptedZeroProver {
    params: SigmaParams,
    ephemeral: Option<Ephemeral>,
}

impl DjEncryptedZeroProver {
    /// Creates a prover.
    pub fn new(params: SigmaParams) -> Result<Self, SigmaError> {
        params.validate()?;
        Ok(Self {
            params,
            ephemeral: None,
        })
    }
}

impl SigmaProverComputation for DjEncryptedZeroProver {
    type Input = DjEncryptedZeroProverInput;

    fn soundness_bits(&self) -> u32 {
        self.params.soundness_bits
    }

    fn compute_first_message(
        &mut self,
        rng: &mut impl CryptoRngCore,
        input: &Self::Input,
    ) -> Result<SigmaMessage, SigmaError> {
        let moduli = check_statement(&input.common, self.params.length_parameter)?;
        check_soundness(self.params.soundness_bits, input.common.public_key.modulus())?;

        let sigma = Secret::init_with(|| moduli.n.random_unit(rng));
        let sigma_monty = Zeroizing::new(moduli.big_n_prime.to_monty(sigma.expose_secret()));
        let a = sigma_monty.pow(&moduli.big_n).retrieve();

        self.ephemeral = Some(Ephemeral {
            sigma,
            randomness: Secret::init_with(|| moduli.n.reduce(input.randomness.expose_secret())),
            modulus: moduli.n,
        });

        Ok(SigmaMessage::Integer(to_biguint(&a)))
    }

    fn compute_second_message(&mut self, challenge: &Challenge) -> Result<SigmaMessage, SigmaError> {
        challenge.validate(self.params.soundness_bits)?;
        let ephemeral = self.ephemeral.take().ok_or(SigmaError::MissingFirstMessage)?;
        let modulus = &ephemeral.modulus;

        let e = challenge.to_exponent();
        let sigma = Zeroizing::new(modulus.to_monty(ephemeral.sigma.expose_secret()));
        let r = Zeroizing::new(modulus.to_monty(ephemeral.randomness.expose_secret()));
        let r_e = Zeroizing::new(r.pow(&e));
        let z = (&*sigma * &*r_e).retrieve();

        Ok(SigmaMessage::Integer(to_biguint(&z)))
    }
}

/// The verifier of the encrypted-zero proof.
#[derive(Debug)]
pub struct DjEncryptedZeroVerifier {
    length_parameter: u32,
    core: VerifierCore<DjEncryptedZeroCommonInput>,
}

impl DjEncryptedZeroVerifier {
    /// Creates a verifier.
    pub fn new(params: SigmaParams) -> Result<Self, SigmaError> {
        Ok(Self {
            length_parameter: params.length_parameter,
            core: VerifierCore::new(&params)?,
        })
    }

    fn check_equation(
        &self,
        input: &DjEncryptedZeroCommonInput,
        moduli: &Moduli,
        a: &BigUint,
        z: &BigUint,
        e: &BoxedUint,
    ) -> bool {
        let n = input.public_key.modulus();
        let c = input.ciphertext.cipher();

        if a >= &input.public_key.ciphertext_modulus(self.length_parameter) || z >= n {
            return false;
        }

        let coprime = [a, z, c].into_iter().all(|value| value.gcd(n).is_one());
        if !coprime {
            return false;
        }

        let big_n_prime = &moduli.big_n_prime;
        let lhs = big_n_prime.to_monty(&to_boxed(z)).pow(&moduli.big_n);
        let rhs = big_n_prime.to_monty(&to_boxed(a)) * big_n_prime.to_monty(&to_boxed(c)).pow(e);
        lhs.retrieve() == rhs.retrieve()
    }
}

impl SigmaVerifierComputation for DjEncryptedZeroVerifier {
    type Input = DjEncryptedZeroCommonInput;

    fn soundness_bits(&self) -> u32 {
        self.core.soundness_bits()
    }

    fn set_input(&mut self, input: Self::Input) -> Result<(), SigmaError> {
        check_statement(&input, self.length_parameter)?;
        check_soundness(self.core.soundness_bits(), input.public_key.modulus())?;
        self.core.set_input(input);
        Ok(())
    }

    fn sample_challenge(&mut self, rng: &mut impl CryptoRngCore) {
        self.core.sample_challenge(rng)
    }

    fn set_challenge(&mut self, challenge: Challenge) -> Result<(), SigmaError> {
        self.core.set_challenge(challenge)
    }

    fn challenge(&self) -> Option<&Challenge> {
        self.core.challenge()
    }

    fn verify(&mut self, first_message: &SigmaMessage, second_message: &SigmaMessage) -> Result<bool, SigmaError> {
        // Dropping the challenge erases it, whichever way this function returns.
        let challenge = self.core.take_challenge();

        let (a, z) = match (first_message, second_message) {
            (SigmaMessage::Integer(a), SigmaMessage::Integer(z)) => (a, z),
            _ => return Err(SigmaError::UnexpectedMessage),
        };
        let input = self.core.input().ok_or(SigmaError::MissingInput)?;
        let challenge = challenge.ok_or(SigmaError::MissingChallenge)?;

        let moduli = check_statement(input, self.length_parameter)?;

        let accepted = self.check_equation(input, &moduli, a, z, &challenge.to_exponent());
        Ok(self.core.record(accepted))
    }

    fn state(&self) -> VerifierState {
        self.core.state()
    }
}
