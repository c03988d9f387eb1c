//! Schnorr proof of knowledge of a discrete logarithm.
//!
//! Publish $h$ and prove that we know a secret $w$ such that $g^w = h$,
//! where $g$ is the generator of a [`DlogGroup`] of order $q$.
//!
//! 1. The prover samples $r \in \mathbb{Z}_q$ and sends $a = g^r$.
//! 2. The verifier sends a challenge $e < 2^t$ (requires $2^t < q$).
//! 3. The prover sends $z = r + e w \mod q$.
//!
//! The verifier accepts iff $g^z = a h^e$.

use crypto_bigint::BoxedUint;
use num_bigint::BigUint;
use rand_core::CryptoRngCore;
use zeroize::Zeroizing;

use super::{
    Challenge, SigmaError, SigmaMessage, SigmaParams, SigmaProverComputation, SigmaVerifierComputation,
    VerifierCore, VerifierState,
};
use crate::{
    dlog::DlogGroup,
    tools::{
        bigint::{to_biguint, to_boxed, OddModulus},
        Secret,
    },
};

/// The public statement: the element $h$.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DlogCommonInput<E> {
    h: E,
}

impl<E> DlogCommonInput<E> {
    /// Creates the statement.
    pub fn new(h: E) -> Self {
        Self { h }
    }

    /// The element whose discrete logarithm is known to the prover.
    pub fn h(&self) -> &E {
        &self.h
    }
}

/// The statement together with the discrete logarithm $w$.
#[derive(Debug, Clone)]
pub struct DlogProverInput<E> {
    common: DlogCommonInput<E>,
    w: Secret<BoxedUint>,
}

impl<E> DlogProverInput<E> {
    /// Creates the prover's input.
    ///
    /// `w` is consumed and only kept in erasable storage from here on.
    pub fn new(common: DlogCommonInput<E>, w: BigUint) -> Self {
        Self {
            common,
            w: Secret::init_with(|| to_boxed(&w)),
        }
    }

    /// The public part of the input.
    pub fn common(&self) -> &DlogCommonInput<E> {
        &self.common
    }
}

/// Checks $2^t < q$.
fn check_soundness<G: DlogGroup>(soundness_bits: u32, group: &G) -> Result<(), SigmaError> {
    // `q` is an odd prime, so $2^t < q$ iff $t < |q|$.
    let limit = group.order().bits();
    if u64::from(soundness_bits) >= limit {
        tracing::warn!(
            soundness_bits,
            group = group.group_type(),
            "Soundness parameter is too large for the group order"
        );
        return Err(SigmaError::Soundness { soundness_bits, limit });
    }
    Ok(())
}

#[derive(Debug)]
struct Ephemeral {
    r: Secret<BoxedUint>,
    w: Secret<BoxedUint>,
}

/// The prover for [`DlogVerifier`].
#[derive(Debug)]
pub struct DlogProver<'a, G> {
    group: &'a G,
    params: SigmaParams,
    order: OddModulus,
    ephemeral: Option<Ephemeral>,
}

impl<'a, G: DlogGroup> DlogProver<'a, G> {
    /// Creates a prover working in `group`.
    pub fn new(group: &'a G, params: SigmaParams) -> Result<Self, SigmaError> {
        params.validate()?;
        check_soundness(params.soundness_bits, group)?;
        let order =
            OddModulus::new(group.order()).ok_or(SigmaError::InvalidStatement("the group order must be odd"))?;
        Ok(Self {
            group,
            params,
            order,
            ephemeral: None,
        })
    }
}

impl<G: DlogGroup> SigmaProverComputation for DlogProver<'_, G> {
    type Input = DlogProverInput<G::Element>;

    fn soundness_bits(&self) -> u32 {
        self.params.soundness_bits
    }

    fn compute_first_message(
        &mut self,
        rng: &mut impl CryptoRngCore,
        input: &Self::Input,
    ) -> Result<SigmaMessage, SigmaError> {
        let group = self.group;
        let r = Secret::init_with(|| self.order.random(rng));
        let a = group.exponentiate_secret(group.generator(), r.expose_secret());
        self.ephemeral = Some(Ephemeral {
            r,
            w: Secret::init_with(|| self.order.reduce(input.w.expose_secret())),
        });
        Ok(SigmaMessage::GroupElement(self.group.element_to_bytes(&a).into()))
    }

    fn compute_second_message(&mut self, challenge: &Challenge) -> Result<SigmaMessage, SigmaError> {
        challenge.validate(self.params.soundness_bits)?;
        let ephemeral = self.ephemeral.take().ok_or(SigmaError::MissingFirstMessage)?;
        let order = &self.order;
        let e = Zeroizing::new(order.to_monty(&challenge.to_exponent()));
        let r = Zeroizing::new(order.to_monty(ephemeral.r.expose_secret()));
        let w = Zeroizing::new(order.to_monty(ephemeral.w.expose_secret()));
        let ew = Zeroizing::new(&*e * &*w);
        let z = (&*r + &*ew).retrieve();
        Ok(SigmaMessage::Integer(to_biguint(&z)))
    }
}

/// The verifier of a discrete logarithm proof, for any [`DlogGroup`].
#[derive(Debug)]
pub struct DlogVerifier<'a, G: DlogGroup> {
    group: &'a G,
    core: VerifierCore<DlogCommonInput<G::Element>>,
}

impl<'a, G: DlogGroup> DlogVerifier<'a, G> {
    /// Creates a verifier working in `group`.
    pub fn new(group: &'a G, params: SigmaParams) -> Result<Self, SigmaError> {
        let core = VerifierCore::new(&params)?;
        check_soundness(params.soundness_bits, group)?;
        Ok(Self { group, core })
    }

    fn check_equation(&self, input: &DlogCommonInput<G::Element>, a: &[u8], z: &BigUint, e: &BoxedUint) -> bool {
        let group = self.group;
        if z >= group.order() {
            return false;
        }
        let a = match group.element_from_bytes(a) {
            Ok(a) => a,
            Err(_) => return false,
        };
        let lhs = group.exponentiate_generator(z);
        let rhs = group.multiply(&a, &group.exponentiate_secret(&input.h, e));
        lhs == rhs
    }
}

impl<G: DlogGroup> SigmaVerifierComputation for DlogVerifier<'_, G> {
    type Input = DlogCommonInput<G::Element>;

    fn soundness_bits(&self) -> u32 {
        self.core.soundness_bits()
    }

    fn set_input(&mut self, input: Self::Input) -> Result<(), SigmaError> {
        if !self.group.is_member(&input.h) {
            return Err(SigmaError::InvalidStatement("the element is not a member of the group"));
        }
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
            (SigmaMessage::GroupElement(a), SigmaMessage::Integer(z)) => (a, z),
            _ => return Err(SigmaError::UnexpectedMessage),
        };
        let input = self.core.input().ok_or(SigmaError::MissingInput)?;
        let challenge = challenge.ok_or(SigmaError::MissingChallenge)?;

        let accepted = self.check_equation(input, a, z, &challenge.to_exponent());
        Ok(self.core.record(accepted))
    }

    fn state(&self) -> VerifierState {
        self.core.state()
    }
}

#[cfg(test)]
mod tests {
    use num_bigint::BigUint;
    use num_traits::{One, Zero};
    use rand_core::OsRng;

    use super::{DlogCommonInput, DlogProver, DlogProverInput, DlogVerifier};
    use crate::{
        dlog::{DlogGroup, EcF2mGroup, F2mCurveArithmetic},
        sigma::{execute, SigmaError, SigmaMessage, SigmaParams, SigmaProverComputation, SigmaVerifierComputation},
    };

    fn group() -> EcF2mGroup {
        EcF2mGroup::nist("K-163").unwrap()
    }

    #[test]
    fn honest_proof() {
        let group = group();
        let params = SigmaParams::default();
        let w = group.random_exponent(&mut OsRng);
        let common = DlogCommonInput::new(group.exponentiate_generator(&w));
        let input = DlogProverInput::new(common.clone(), w);

        let mut prover = DlogProver::new(&group, params).unwrap();
        let mut verifier = DlogVerifier::new(&group, params).unwrap();
        assert!(execute(&mut OsRng, &mut prover, &mut verifier, &input, common).unwrap());
    }

    #[test]
    fn witness_is_taken_modulo_the_order() {
        let group = group();
        let params = SigmaParams::default();
        let w = group.random_exponent(&mut OsRng);
        let common = DlogCommonInput::new(group.exponentiate_generator(&w));
        let input = DlogProverInput::new(common.clone(), &w + group.order() * BigUint::from(5u32));

        let mut prover = DlogProver::new(&group, params).unwrap();
        let mut verifier = DlogVerifier::new(&group, params).unwrap();
        verifier.set_input(common).unwrap();
        let a = prover.compute_first_message(&mut OsRng, &input).unwrap();
        verifier.sample_challenge(&mut OsRng);
        let z = prover.compute_second_message(verifier.challenge().unwrap()).unwrap();
        assert!(z.as_integer().unwrap() < group.order());
        assert!(verifier.verify(&a, &z).unwrap());
    }

    #[test]
    fn wrong_witness() {
        let group = group();
        let params = SigmaParams::default();
        let w = group.random_exponent(&mut OsRng);
        let common = DlogCommonInput::new(group.exponentiate_generator(&w));
        let input = DlogProverInput::new(common.clone(), (w + BigUint::one()) % group.order());

        let mut prover = DlogProver::new(&group, params).unwrap();
        let mut verifier = DlogVerifier::new(&group, params).unwrap();
        assert!(!execute(&mut OsRng, &mut prover, &mut verifier, &input, common).unwrap());
    }

    #[test]
    fn malformed_messages() {
        let group = group();
        let params = SigmaParams::default();
        let w = group.random_exponent(&mut OsRng);
        let common = DlogCommonInput::new(group.exponentiate_generator(&w));
        let input = DlogProverInput::new(common.clone(), w);

        let mut prover = DlogProver::new(&group, params).unwrap();
        let mut verifier = DlogVerifier::new(&group, params).unwrap();
        verifier.set_input(common).unwrap();

        let a = prover.compute_first_message(&mut OsRng, &input).unwrap();
        verifier.sample_challenge(&mut OsRng);
        let z = prover.compute_second_message(verifier.challenge().unwrap()).unwrap();
        assert_eq!(verifier.verify(&z, &a), Err(SigmaError::UnexpectedMessage));

        // A first message that is not a valid encoding is a rejected proof
        verifier.sample_challenge(&mut OsRng);
        let garbage = SigmaMessage::GroupElement(vec![0xffu8; group.element_byte_len()].into());
        assert!(!verifier.verify(&garbage, &z).unwrap());

        // So is an unreduced response
        verifier.sample_challenge(&mut OsRng);
        let unreduced = SigmaMessage::Integer(z.as_integer().unwrap() + group.order());
        assert!(!verifier.verify(&a, &unreduced).unwrap());
    }

    #[test]
    fn soundness_and_statement_checks() {
        let group = group();
        // |q| = 163
        let too_large = SigmaParams {
            soundness_bits: 163,
            ..Default::default()
        };
        assert!(matches!(
            DlogVerifier::new(&group, too_large),
            Err(SigmaError::Soundness { .. })
        ));
        assert!(matches!(
            DlogProver::new(&group, too_large),
            Err(SigmaError::Soundness { .. })
        ));

        let largest = SigmaParams {
            soundness_bits: 162,
            ..Default::default()
        };
        let w = group.random_exponent(&mut OsRng);
        let common = DlogCommonInput::new(group.exponentiate_generator(&w));
        let input = DlogProverInput::new(common.clone(), w);
        let mut prover = DlogProver::new(&group, largest).unwrap();
        let mut verifier = DlogVerifier::new(&group, largest).unwrap();
        assert!(execute(&mut OsRng, &mut prover, &mut verifier, &input, common).unwrap());

        // (0, 1) has order 2 on K-163
        let outsider = group.backend().point_unchecked(&BigUint::zero(), &BigUint::one());
        let mut verifier = DlogVerifier::new(&group, SigmaParams::default()).unwrap();
        assert!(matches!(
            verifier.set_input(DlogCommonInput::new(outsider)),
            Err(SigmaError::InvalidStatement(_))
        ));
    }
}
