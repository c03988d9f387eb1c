pub(crate) mod bigint;
pub(crate) mod hashing;
mod secret;

pub(crate) use secret::Secret;
