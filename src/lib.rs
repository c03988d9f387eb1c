#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![warn(
    clippy::mod_module_files,
    missing_docs,
    missing_copy_implementations,
    rust_2018_idioms,
    trivial_casts,
    trivial_numeric_casts,
    unused_qualifications
)]
#![cfg_attr(not(test), warn(clippy::unwrap_used, clippy::indexing_slicing))]

/*!
## Features

`k256`: the secp256k1 group using [`k256`](`::k256`) crate. See [`dlog::Secp256k1Group`].
*/

extern crate alloc;

pub mod damgard_jurik;
pub mod dlog;
pub mod ot;
pub mod sigma;
mod tools;

pub use damgard_jurik::{DamgardJurikCiphertext, DamgardJurikPublicKey};
pub use dlog::{ConfigError, DlogEllipticCurve, DlogGroup, GroupError};
pub use ot::{InputError, OtExtensionSenderInput};
pub use sigma::{
    execute, Challenge, SigmaError, SigmaMessage, SigmaParams, SigmaProverComputation, SigmaVerifierComputation,
    VerifierState,
};
