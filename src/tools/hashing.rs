use digest::{ExtendableOutput, Update};
use hashing_serializer::HashingSerializer;
use serde::Serialize;
use sha3::{Shake256, Shake256Reader};

/// A digest object that takes byte slices or decomposable ([`Hashable`]) objects.
pub(crate) trait Chain: Sized {
    fn as_digest_mut(&mut self) -> &mut impl Update;

    /// Hash raw bytes.
    ///
    /// Note: only for impls in specific types, do not use directly.
    fn chain_raw_bytes(self, bytes: &[u8]) -> Self;

    /// Hash raw bytes in a collision-resistant way.
    fn chain_bytes(self, bytes: &(impl AsRef<[u8]> + ?Sized)) -> Self {
        // Hash the length too to prevent hash conflicts. (e.g. H(AB|CD) == H(ABC|D)).
        // Not strictly necessary for fixed-size arrays, but it's easier to just always do it.
        let len = (bytes.as_ref().len() as u64).to_be_bytes();
        self.chain_raw_bytes(&len).chain_raw_bytes(bytes.as_ref())
    }

    fn chain<T: Hashable>(self, hashable: &T) -> Self {
        hashable.chain(self)
    }
}

/// Wraps an extendable output hash for easier replacement, and standardizes the use of DST.
pub(crate) struct Hasher(Shake256);

impl Chain for Hasher {
    fn as_digest_mut(&mut self) -> &mut impl Update {
        &mut self.0
    }

    fn chain_raw_bytes(self, bytes: &[u8]) -> Self {
        let mut digest = self.0;
        digest.update(bytes);
        Self(digest)
    }
}

impl Hasher {
    fn new() -> Self {
        Self(Shake256::default())
    }

    pub fn new_with_dst(dst: &[u8]) -> Self {
        Self::new().chain_bytes(dst)
    }

    pub fn finalize_to_reader(self) -> Shake256Reader {
        self.0.finalize_xof()
    }
}

/// A trait allowing complex objects to give access to their contents for hashing purposes
/// without the need of a conversion to a new form (e.g. serialization).
pub(crate) trait Hashable {
    fn chain<C: Chain>(&self, digest: C) -> C;
}

// Statements and messages already implement `Serialize`,
// so there's no point in implementing `Hashable` for them separately.
// The reproducibility of this hash depends on `serde` not breaking things,
// which we can be quite certain about - it is stable, and if it does break something,
// all the serialization will likely break too.
impl<T: Serialize> Hashable for T {
    fn chain<C: Chain>(&self, digest: C) -> C {
        let mut digest = digest;

        let serializer = HashingSerializer {
            digest: digest.as_digest_mut(),
        };

        // The only way it can return an error is if there is
        // some non-serializable element encountered, which is 100% reproducible
        // and will be caught in tests.
        self.serialize(serializer).expect("The type is serializable");

        digest
    }
}

#[cfg(test)]
mod tests {
    use digest::XofReader;

    use super::{Chain, Hasher};

    fn read(hasher: Hasher) -> [u8; 16] {
        let mut output = [0u8; 16];
        hasher.finalize_to_reader().read(&mut output);
        output
    }

    #[test]
    fn length_prefix_separates_inputs() {
        let ab_cd = Hasher::new_with_dst(b"test").chain_bytes(b"AB").chain_bytes(b"CD");
        let abc_d = Hasher::new_with_dst(b"test").chain_bytes(b"ABC").chain_bytes(b"D");
        assert_ne!(read(ab_cd), read(abc_d));
    }

    #[test]
    fn serializable_values_hash_deterministically() {
        let value = (1u32, "statement", [7u8; 4]);
        let first = Hasher::new_with_dst(b"test").chain(&value);
        let second = Hasher::new_with_dst(b"test").chain(&value);
        let other_dst = Hasher::new_with_dst(b"other").chain(&value);
        let first = read(first);
        assert_eq!(first, read(second));
        assert_ne!(first, read(other_dst));
    }
}
