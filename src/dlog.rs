//! Discrete-log groups.
//!
//! The Sigma protocols in this crate are written against [`DlogGroup`] only;
//! concrete groups adapt some arithmetic backend to it:
//!
//! - [`EcF2mGroup`]: elliptic curves over binary fields, generic over an [`F2mCurveArithmetic`] backend;
//! - [`Secp256k1Group`]: the prime-field curve secp256k1, backed by `k256`.

mod f2m;
pub mod params;
#[cfg(feature = "k256")]
mod secp256k1;

use alloc::vec::Vec;
use core::fmt::Debug;

use crypto_bigint::BoxedUint;
use num_bigint::{BigUint, RandBigInt};
use rand_core::CryptoRngCore;

pub use f2m::{
    check_curve_membership, check_subgroup_membership, EcF2mGroup, F2mCurveArithmetic, F2mGroupOptions, F2mPoint,
    NativeF2m, DEFAULT_F2M_CURVE,
};
pub use params::{
    ConfigError, CurveParamsSource, F2mBasis, F2mCurveParams, F2mGroupParams, FpCurveParams, GroupParams,
    JsonCurveParams,
};
#[cfg(feature = "k256")]
pub use secp256k1::{Secp256k1Group, Secp256k1Point};

/// Errors reported by group operations.
#[derive(displaydoc::Display, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupError {
    /// The given coordinates or bytes do not describe a member of this group
    InvalidElement,
    /// Expected an encoding of {expected} bytes, got {actual}
    WrongLength {
        /// The expected length.
        expected: usize,
        /// The received length.
        actual: usize,
    },
    /// `{0}` is not supported by this group
    Unsupported(&'static str),
}

impl std::error::Error for GroupError {}

/// A cyclic group of prime order in which the discrete logarithm problem is assumed hard.
pub trait DlogGroup {
    /// An element of the group.
    type Element: Debug + Clone + PartialEq + Eq;

    /// A short description of the group family.
    fn group_type(&self) -> &'static str;

    /// The parameters this group was built from.
    fn params(&self) -> &GroupParams;

    /// The order $q$ of the group.
    fn order(&self) -> &BigUint {
        self.params().order()
    }

    /// The generator $g$ the group was initialized with.
    fn generator(&self) -> &Self::Element;

    /// The identity element.
    fn identity(&self) -> Self::Element;

    /// Returns `true` if `element` is the identity.
    fn is_identity(&self, element: &Self::Element) -> bool {
        element == &self.identity()
    }

    /// Returns `true` if `element` is the identity or a member of the prime-order group.
    fn is_member(&self, element: &Self::Element) -> bool;

    /// The group operation.
    fn multiply(&self, lhs: &Self::Element, rhs: &Self::Element) -> Self::Element;

    /// Repeated application of the group operation, $base^{exponent}$.
    fn exponentiate(&self, base: &Self::Element, exponent: &BigUint) -> Self::Element;

    /// $base^{exponent}$ for a secret exponent.
    ///
    /// The default is a Montgomery ladder over all `exponent.bits_precision()` bits:
    /// the sequence of group operations does not depend on the exponent's value,
    /// though the operations themselves may still take variable time.
    fn exponentiate_secret(&self, base: &Self::Element, exponent: &BoxedUint) -> Self::Element {
        let mut low = self.identity();
        let mut high = base.clone();
        for index in (0..exponent.bits_precision()).rev() {
            if bool::from(exponent.bit(index)) {
                low = self.multiply(&low, &high);
                high = self.multiply(&high, &high);
            } else {
                high = self.multiply(&low, &high);
                low = self.multiply(&low, &low);
            }
        }
        low
    }

    /// The inverse element.
    fn inverse(&self, element: &Self::Element) -> Self::Element;

    /// $g^{exponent}$
    fn exponentiate_generator(&self, exponent: &BigUint) -> Self::Element {
        self.exponentiate(self.generator(), exponent)
    }

    /// The length of [`element_to_bytes`](`Self::element_to_bytes`) output.
    fn element_byte_len(&self) -> usize;

    /// A one-to-one fixed-width encoding of any element.
    fn element_to_bytes(&self, element: &Self::Element) -> Vec<u8>;

    /// Recovers an element from [`element_to_bytes`](`Self::element_to_bytes`) output,
    /// checking group membership.
    fn element_from_bytes(&self, bytes: &[u8]) -> Result<Self::Element, GroupError>;

    /// The maximal length of a byte string that [`encode_bytes_to_element`](`Self::encode_bytes_to_element`)
    /// accepts; zero if the mapping is not supported.
    fn max_encodable_len(&self) -> usize;

    /// Maps an arbitrary byte string into the group, reversibly.
    fn encode_bytes_to_element(&self, bytes: &[u8]) -> Result<Self::Element, GroupError>;

    /// Recovers the byte string an element was created from by
    /// [`encode_bytes_to_element`](`Self::encode_bytes_to_element`).
    fn decode_element_to_bytes(&self, element: &Self::Element) -> Result<Vec<u8>, GroupError>;

    /// A uniformly random exponent in $[0, q)$.
    fn random_exponent(&self, rng: &mut impl CryptoRngCore) -> BigUint {
        rng.gen_biguint_below(self.order())
    }

    /// A uniformly random element of the group.
    fn random_element(&self, rng: &mut impl CryptoRngCore) -> Self::Element {
        let exponent = self.random_exponent(rng);
        self.exponentiate_generator(&exponent)
    }
}

/// A discrete-log group realized as a sub-group of elliptic curve points.
pub trait DlogEllipticCurve: DlogGroup {
    /// Creates a point from affine coordinates.
    ///
    /// This is the only way to build an element from external coordinates,
    /// and it always checks both the curve equation and sub-group membership.
    fn generate_element(&self, x: &BigUint, y: &BigUint) -> Result<Self::Element, GroupError>;

    /// The point at infinity (the identity).
    fn infinity(&self) -> Self::Element {
        self.identity()
    }

    /// The affine coordinates of `element`, or `None` for the point at infinity.
    fn coordinates(&self, element: &Self::Element) -> Option<(BigUint, BigUint)>;
}

/// Exactly `len` big-endian bytes of `value`: left-padded with zeros,
/// or reduced modulo $2^{8 len}$ if `value` is wider.
fn to_fixed_be_bytes(value: &BigUint, len: usize) -> Vec<u8> {
    let mut bytes = value.to_bytes_be();
    match bytes.len().checked_sub(len) {
        Some(excess) => bytes.split_off(excess),
        None => {
            let mut result = alloc::vec![0u8; len - bytes.len()];
            result.append(&mut bytes);
            result
        }
    }
}

/// The canonical encoding shared by the curve groups: `x || y`, with the identity as all zeros.
///
/// Always `2 * coordinate_len` bytes long. Coordinates of valid elements are field elements
/// and fit into `coordinate_len` bytes.
pub(crate) fn encode_coordinates(coordinates: Option<(BigUint, BigUint)>, coordinate_len: usize) -> Vec<u8> {
    match coordinates {
        None => alloc::vec![0u8; 2 * coordinate_len],
        Some((x, y)) => {
            let mut bytes = to_fixed_be_bytes(&x, coordinate_len);
            bytes.extend(to_fixed_be_bytes(&y, coordinate_len));
            bytes
        }
    }
}

/// Splits a canonical `x || y` encoding; `Ok(None)` stands for the identity.
pub(crate) fn decode_coordinates(
    bytes: &[u8],
    coordinate_len: usize,
) -> Result<Option<(BigUint, BigUint)>, GroupError> {
    if bytes.len() != 2 * coordinate_len {
        return Err(GroupError::WrongLength {
            expected: 2 * coordinate_len,
            actual: bytes.len(),
        });
    }
    if bytes.iter().all(|byte| *byte == 0) {
        return Ok(None);
    }
    let (x, y) = bytes.split_at(coordinate_len);
    Ok(Some((BigUint::from_bytes_be(x), BigUint::from_bytes_be(y))))
}

#[cfg(test)]
mod tests {
    use num_bigint::BigUint;

    use super::{decode_coordinates, encode_coordinates};

    #[test]
    fn coordinate_encoding_has_a_fixed_width() {
        let x = BigUint::from(0x0102u32);
        let y = BigUint::from(0x03u32);
        let bytes = encode_coordinates(Some((x.clone(), y.clone())), 4);
        assert_eq!(bytes, [0, 0, 1, 2, 0, 0, 0, 3]);
        assert_eq!(decode_coordinates(&bytes, 4).unwrap(), Some((x, y)));

        assert_eq!(encode_coordinates(None, 4), [0u8; 8]);
        assert_eq!(decode_coordinates(&[0u8; 8], 4).unwrap(), None);

        // A coordinate wider than its slot does not shift the other one
        let wide = BigUint::from(0x0a0b0c0d0eu64);
        let bytes = encode_coordinates(Some((wide, BigUint::from(0x03u32))), 4);
        assert_eq!(bytes, [0x0b, 0x0c, 0x0d, 0x0e, 0, 0, 0, 3]);
    }
}
