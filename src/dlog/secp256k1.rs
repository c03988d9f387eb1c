//! The secp256k1 curve (as implemented by [`k256`]) as a discrete-log group.

use alloc::vec::Vec;

use crypto_bigint::BoxedUint;
use elliptic_curve::{
    bigint::{Encoding, U256}, // Note that this type is different from typenum::U256
    ops::Reduce,
    sec1::{Coordinates, FromEncodedPoint, ToEncodedPoint},
    Curve,
};
use k256::{AffinePoint, EncodedPoint, FieldBytes, ProjectivePoint, Scalar, Secp256k1};
use num_bigint::BigUint;
use num_traits::{One, Zero};
use zeroize::Zeroizing;

use super::{
    decode_coordinates, encode_coordinates,
    params::{FpCurveParams, GroupParams},
    DlogEllipticCurve, DlogGroup, GroupError,
};

const COORDINATE_LEN: usize = 32;

/// Bytes of the `x` coordinate left for the payload in [`DlogGroup::encode_bytes_to_element`]:
/// one byte goes to the payload length, one to the counter.
const MAX_ENCODABLE_LEN: usize = COORDINATE_LEN - 2;

/// A point on secp256k1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Secp256k1Point(ProjectivePoint);

impl Secp256k1Point {
    /// The wrapped `k256` point.
    pub fn to_projective(self) -> ProjectivePoint {
        self.0
    }
}

impl From<ProjectivePoint> for Secp256k1Point {
    fn from(point: ProjectivePoint) -> Self {
        Self(point)
    }
}

/// The secp256k1 group of prime order.
#[derive(Debug, Clone)]
pub struct Secp256k1Group {
    params: GroupParams,
    generator: Secp256k1Point,
}

fn affine_coordinates(point: &ProjectivePoint) -> Option<(BigUint, BigUint)> {
    let encoded = point.to_affine().to_encoded_point(false);
    match encoded.coordinates() {
        Coordinates::Uncompressed { x, y } => Some((BigUint::from_bytes_be(x), BigUint::from_bytes_be(y))),
        _ => None,
    }
}

/// Big-endian field bytes, or `None` if `value` is wider than 256 bits.
fn to_field_bytes(value: &BigUint) -> Option<FieldBytes> {
    if value.bits() > 256 {
        return None;
    }
    let value = value.to_bytes_be();
    let mut bytes = FieldBytes::default();
    bytes
        .iter_mut()
        .rev()
        .zip(value.iter().rev())
        .for_each(|(dst, src)| *dst = *src);
    Some(bytes)
}

impl Secp256k1Group {
    /// Creates the group.
    pub fn new() -> Self {
        let field_modulus = (BigUint::one() << 256u32) - (BigUint::one() << 32u32) - BigUint::from(977u32);
        let order = BigUint::from_bytes_be(&Secp256k1::ORDER.to_be_bytes());
        let (generator_x, generator_y) = affine_coordinates(&ProjectivePoint::GENERATOR).unwrap_or_default();

        let params = GroupParams::Fp(FpCurveParams {
            name: "secp256k1".into(),
            p: field_modulus,
            a: BigUint::zero(),
            b: BigUint::from(7u32),
            generator_x,
            generator_y,
            order,
            cofactor: BigUint::one(),
        });

        tracing::debug!("Initialized the secp256k1 group");

        Self {
            params,
            generator: Secp256k1Point(ProjectivePoint::GENERATOR),
        }
    }

    fn to_scalar(&self, value: &BigUint) -> Scalar {
        let reduced = value % self.order();
        let bytes = to_field_bytes(&reduced).unwrap_or_default();
        <Scalar as Reduce<U256>>::reduce_bytes(&bytes)
    }

    fn point_from_x(x: &[u8]) -> Option<ProjectivePoint> {
        let mut compressed = Vec::with_capacity(COORDINATE_LEN + 1);
        compressed.push(0x02);
        compressed.extend_from_slice(x);
        let encoded = EncodedPoint::from_bytes(&compressed).ok()?;
        Option::<AffinePoint>::from(AffinePoint::from_encoded_point(&encoded)).map(ProjectivePoint::from)
    }
}

impl Default for Secp256k1Group {
    fn default() -> Self {
        Self::new()
    }
}

impl DlogGroup for Secp256k1Group {
    type Element = Secp256k1Point;

    fn group_type(&self) -> &'static str {
        "secp256k1"
    }

    fn params(&self) -> &GroupParams {
        &self.params
    }

    fn generator(&self) -> &Self::Element {
        &self.generator
    }

    fn identity(&self) -> Self::Element {
        Secp256k1Point(ProjectivePoint::IDENTITY)
    }

    fn is_member(&self, _element: &Self::Element) -> bool {
        // `k256` only creates points on the curve, and the cofactor is 1.
        true
    }

    fn multiply(&self, lhs: &Self::Element, rhs: &Self::Element) -> Self::Element {
        Secp256k1Point(lhs.0 + rhs.0)
    }

    fn exponentiate(&self, base: &Self::Element, exponent: &BigUint) -> Self::Element {
        Secp256k1Point(base.0 * self.to_scalar(exponent))
    }

    fn exponentiate_secret(&self, base: &Self::Element, exponent: &BoxedUint) -> Self::Element {
        // Horner's rule over the bytes keeps the exponent inside erasable buffers
        // and reduces it modulo the order along the way.
        let bytes = Zeroizing::new(exponent.to_be_bytes());
        let radix = Scalar::from(256u64);
        let mut scalar = Zeroizing::new(Scalar::ZERO);
        for byte in bytes.iter() {
            *scalar = *scalar * radix + Scalar::from(u64::from(*byte));
        }
        Secp256k1Point(base.0 * *scalar)
    }

    fn inverse(&self, element: &Self::Element) -> Self::Element {
        Secp256k1Point(-element.0)
    }

    fn element_byte_len(&self) -> usize {
        2 * COORDINATE_LEN
    }

    fn element_to_bytes(&self, element: &Self::Element) -> Vec<u8> {
        encode_coordinates(affine_coordinates(&element.0), COORDINATE_LEN)
    }

    fn element_from_bytes(&self, bytes: &[u8]) -> Result<Self::Element, GroupError> {
        match decode_coordinates(bytes, COORDINATE_LEN)? {
            None => Ok(self.identity()),
            Some((x, y)) => self.generate_element(&x, &y),
        }
    }

    fn max_encodable_len(&self) -> usize {
        MAX_ENCODABLE_LEN
    }

    /// Try-and-increment: the candidate `x` is `len || bytes || zero padding || counter`,
    /// and the counter is bumped until `x` is the abscissa of a curve point.
    fn encode_bytes_to_element(&self, bytes: &[u8]) -> Result<Self::Element, GroupError> {
        if bytes.len() > MAX_ENCODABLE_LEN {
            return Err(GroupError::WrongLength {
                expected: MAX_ENCODABLE_LEN,
                actual: bytes.len(),
            });
        }

        let padding = alloc::vec![0u8; MAX_ENCODABLE_LEN - bytes.len()];
        for counter in 0..=u8::MAX {
            let x = [&[bytes.len() as u8][..], bytes, &padding, &[counter]].concat();
            if let Some(point) = Self::point_from_x(&x) {
                return Ok(Secp256k1Point(point));
            }
        }

        // Each attempt succeeds with probability about 1/2.
        Err(GroupError::InvalidElement)
    }

    fn decode_element_to_bytes(&self, element: &Self::Element) -> Result<Vec<u8>, GroupError> {
        let encoded = element.0.to_affine().to_encoded_point(true);
        let x = match encoded.coordinates() {
            Coordinates::Compressed { x, .. } => x,
            _ => return Err(GroupError::InvalidElement),
        };
        let (length, rest) = x.split_first().ok_or(GroupError::InvalidElement)?;
        let length = usize::from(*length);
        if length > MAX_ENCODABLE_LEN {
            return Err(GroupError::InvalidElement);
        }
        rest.get(..length)
            .map(|payload| payload.to_vec())
            .ok_or(GroupError::InvalidElement)
    }
}

impl DlogEllipticCurve for Secp256k1Group {
    fn generate_element(&self, x: &BigUint, y: &BigUint) -> Result<Self::Element, GroupError> {
        let x = to_field_bytes(x).ok_or(GroupError::InvalidElement)?;
        let y = to_field_bytes(y).ok_or(GroupError::InvalidElement)?;
        let encoded = EncodedPoint::from_affine_coordinates(&x, &y, false);
        // Rejects coordinates outside of the field and points off the curve.
        let point = Option::<AffinePoint>::from(AffinePoint::from_encoded_point(&encoded))
            .ok_or(GroupError::InvalidElement)?;
        Ok(Secp256k1Point(point.into()))
    }

    fn coordinates(&self, element: &Self::Element) -> Option<(BigUint, BigUint)> {
        affine_coordinates(&element.0)
    }
}
