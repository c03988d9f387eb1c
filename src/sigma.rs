//! Sigma protocols: three-move (commit, challenge, response) interactive proofs.
//!
//! A prover implements [`SigmaProverComputation`], a verifier implements
//! [`SigmaVerifierComputation`]. Message delivery is left to the caller;
//! [`execute`] runs both roles in memory.

mod challenge;
pub mod dj_encrypted_zero;
pub mod dlog;

use alloc::boxed::Box;

use num_bigint::BigUint;
use rand_core::CryptoRngCore;
use serde::{Deserialize, Serialize};
use serde_encoded_bytes::{Hex, SliceLike};

pub use challenge::Challenge;

/// Errors reported by Sigma protocol participants.
///
/// These are contract violations by the caller; a proof that does not verify
/// is reported as `Ok(false)` instead.
#[derive(displaydoc::Display, Debug, Clone, PartialEq, Eq)]
pub enum SigmaError {
    /// The soundness parameter ({soundness_bits} bits) is too large for the statement (limit: {limit} bits)
    Soundness {
        /// The configured soundness parameter.
        soundness_bits: u32,
        /// The exclusive upper bound allowed by the statement.
        limit: u64,
    },
    /// A protocol message has an unexpected type
    UnexpectedMessage,
    /// The statement has not been set
    MissingInput,
    /// The challenge has not been sampled or set
    MissingChallenge,
    /// The challenge does not fit the soundness parameter
    InvalidChallenge,
    /// The first message has not been computed, or the response was already computed
    MissingFirstMessage,
    /// Invalid protocol parameters: {0}
    InvalidParams(&'static str),
    /// Invalid statement: {0}
    InvalidStatement(&'static str),
}

impl std::error::Error for SigmaError {}

/// Protocol parameters shared by the prover and the verifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SigmaParams {
    /// The soundness parameter `t`: a cheating prover succeeds with probability $2^{-t}$.
    pub soundness_bits: u32,
    /// The Damgard-Jurik length parameter `s`.
    pub length_parameter: u32,
}

impl Default for SigmaParams {
    fn default() -> Self {
        Self {
            soundness_bits: 80,
            length_parameter: 1,
        }
    }
}

impl SigmaParams {
    /// Checks that the parameters are usable at all.
    pub fn validate(&self) -> Result<(), SigmaError> {
        if self.soundness_bits == 0 {
            return Err(SigmaError::InvalidParams("the soundness parameter must be positive"));
        }
        if self.length_parameter == 0 {
            return Err(SigmaError::InvalidParams("the length parameter must be positive"));
        }
        Ok(())
    }
}

/// A message sent by the prover.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SigmaMessage {
    /// An arbitrary-precision integer.
    Integer(BigUint),
    /// A group element in its canonical encoding.
    GroupElement(#[serde(with = "SliceLike::<Hex>")] Box<[u8]>),
}

impl SigmaMessage {
    /// Returns the integer payload, if this is an integer message.
    pub fn as_integer(&self) -> Option<&BigUint> {
        match self {
            Self::Integer(value) => Some(value),
            Self::GroupElement(_) => None,
        }
    }

    /// Returns the encoded element, if this is a group element message.
    pub fn as_group_element(&self) -> Option<&[u8]> {
        match self {
            Self::GroupElement(bytes) => Some(bytes),
            Self::Integer(_) => None,
        }
    }
}

/// The observable state of a verifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifierState {
    /// No statement has been set.
    Uninitialized,
    /// The statement is set, waiting for a challenge.
    InputSet,
    /// The challenge is ready to be sent to the prover.
    ChallengeReady,
    /// The last proof was verified with the given result; the challenge has been erased.
    Verified(bool),
}

/// The prover's side of a Sigma protocol.
pub trait SigmaProverComputation {
    /// The statement together with the witness.
    type Input;

    /// The soundness parameter `t`.
    fn soundness_bits(&self) -> u32;

    /// Samples the ephemeral randomness and computes the first message `a`.
    fn compute_first_message(
        &mut self,
        rng: &mut impl CryptoRngCore,
        input: &Self::Input,
    ) -> Result<SigmaMessage, SigmaError>;

    /// Computes the response `z` to the verifier's challenge,
    /// consuming the randomness sampled for the first message.
    fn compute_second_message(&mut self, challenge: &Challenge) -> Result<SigmaMessage, SigmaError>;
}

/// The verifier's side of a Sigma protocol.
pub trait SigmaVerifierComputation {
    /// The statement.
    type Input;

    /// The soundness parameter `t`.
    fn soundness_bits(&self) -> u32;

    /// Sets the statement to be proven, checking it against the soundness parameter.
    ///
    /// On error the previous state is kept.
    fn set_input(&mut self, input: Self::Input) -> Result<(), SigmaError>;

    /// Samples a fresh random challenge, erasing the previous one.
    fn sample_challenge(&mut self, rng: &mut impl CryptoRngCore);

    /// Replaces the challenge with an externally derived one (e.g. via [`Challenge::from_transcript`]).
    fn set_challenge(&mut self, challenge: Challenge) -> Result<(), SigmaError>;

    /// The current challenge, if any.
    fn challenge(&self) -> Option<&Challenge>;

    /// Verifies the prover's first message `a` and response `z` against the current challenge.
    ///
    /// The challenge is consumed and erased whatever the outcome.
    fn verify(&mut self, first_message: &SigmaMessage, second_message: &SigmaMessage) -> Result<bool, SigmaError>;

    /// The current state.
    fn state(&self) -> VerifierState;
}

/// The bookkeeping shared by all verifiers: the statement, the challenge, and the last outcome.
#[derive(Debug)]
pub(crate) struct VerifierCore<I> {
    soundness_bits: u32,
    input: Option<I>,
    challenge: Option<Challenge>,
    outcome: Option<bool>,
}

impl<I> VerifierCore<I> {
    pub fn new(params: &SigmaParams) -> Result<Self, SigmaError> {
        params.validate()?;
        Ok(Self {
            soundness_bits: params.soundness_bits,
            input: None,
            challenge: None,
            outcome: None,
        })
    }

    pub fn soundness_bits(&self) -> u32 {
        self.soundness_bits
    }

    pub fn input(&self) -> Option<&I> {
        self.input.as_ref()
    }

    pub fn set_input(&mut self, input: I) {
        self.input = Some(input);
        self.outcome = None;
    }

    pub fn sample_challenge(&mut self, rng: &mut impl CryptoRngCore) {
        self.challenge = Some(Challenge::random(rng, self.soundness_bits));
    }

    pub fn set_challenge(&mut self, challenge: Challenge) -> Result<(), SigmaError> {
        challenge.validate(self.soundness_bits)?;
        self.challenge = Some(challenge);
        Ok(())
    }

    pub fn challenge(&self) -> Option<&Challenge> {
        self.challenge.as_ref()
    }

    pub fn take_challenge(&mut self) -> Option<Challenge> {
        self.challenge.take()
    }

    pub fn record(&mut self, accepted: bool) -> bool {
        self.outcome = Some(accepted);
        accepted
    }

    pub fn state(&self) -> VerifierState {
        match (&self.input, &self.challenge, self.outcome) {
            (None, _, _) => VerifierState::Uninitialized,
            (Some(_), Some(_), _) => VerifierState::ChallengeReady,
            (Some(_), None, Some(accepted)) => VerifierState::Verified(accepted),
            (Some(_), None, None) => VerifierState::InputSet,
        }
    }
}

/// Runs one commit-challenge-response exchange between `prover` and `verifier` in memory.
pub fn execute<P, V>(
    rng: &mut impl CryptoRngCore,
    prover: &mut P,
    verifier: &mut V,
    prover_input: &P::Input,
    verifier_input: V::Input,
) -> Result<bool, SigmaError>
where
    P: SigmaProverComputation,
    V: SigmaVerifierComputation,
{
    if prover.soundness_bits() != verifier.soundness_bits() {
        return Err(SigmaError::InvalidParams(
            "the prover and the verifier use different soundness parameters",
        ));
    }
    verifier.set_input(verifier_input)?;
    let first_message = prover.compute_first_message(rng, prover_input)?;
    verifier.sample_challenge(rng);
    let challenge = verifier.challenge().ok_or(SigmaError::MissingChallenge)?;
    let second_message = prover.compute_second_message(challenge)?;
    verifier.verify(&first_message, &second_message)
}

#[cfg(test)]
mod tests {
    use num_bigint::BigUint;

    use super::{SigmaMessage, SigmaParams};

    #[test]
    fn params() {
        let params = SigmaParams::default();
        assert_eq!(params.soundness_bits, 80);
        assert_eq!(params.length_parameter, 1);
        assert!(params.validate().is_ok());

        let partial: SigmaParams = serde_json::from_str(r#"{ "soundness_bits": 40 }"#).unwrap();
        assert_eq!(partial.soundness_bits, 40);
        assert_eq!(partial.length_parameter, 1);

        let zero = SigmaParams {
            soundness_bits: 0,
            ..Default::default()
        };
        assert!(zero.validate().is_err());
    }

    #[test]
    fn message_accessors() {
        let integer = SigmaMessage::Integer(BigUint::from(5u32));
        let element = SigmaMessage::GroupElement(vec![1, 2, 3].into());
        assert_eq!(integer.as_integer(), Some(&BigUint::from(5u32)));
        assert_eq!(integer.as_group_element(), None);
        assert_eq!(element.as_group_element(), Some(&[1u8, 2, 3][..]));
        assert_eq!(element.as_integer(), None);

        let json = serde_json::to_string(&element).unwrap();
        let deserialized: SigmaMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, element);
    }
}
