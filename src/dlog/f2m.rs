//! Elliptic curve groups over binary extension fields $GF(2^m)$.

mod field;
mod native;

use alloc::vec::Vec;
use core::fmt::Debug;

use num_bigint::BigUint;
use num_traits::One;
use serde::{Deserialize, Serialize};

pub use native::{F2mPoint, NativeF2m};

use super::{
    decode_coordinates, encode_coordinates,
    params::{ConfigError, CurveParamsSource, F2mBasis, F2mCurveParams, F2mGroupParams, GroupParams, JsonCurveParams},
    DlogEllipticCurve, DlogGroup, GroupError,
};

/// The curve used when no name is given.
pub const DEFAULT_F2M_CURVE: &str = "B-163";

/// Point arithmetic on a curve $y^2 + xy = x^3 + ax^2 + b$ over $GF(2^m)$.
///
/// This is the whole surface [`EcF2mGroup`] needs from an arithmetic library.
pub trait F2mCurveArithmetic: Sized {
    /// A curve point.
    type Point: Debug + Clone + PartialEq + Eq;

    /// A curve over the field with the reduction polynomial $z^m + z^k + 1$.
    fn trinomial(m: u32, k: u32, a: &BigUint, b: &BigUint) -> Self;

    /// A curve over the field with the reduction polynomial $z^m + z^{k_3} + z^{k_2} + z^{k_1} + 1$.
    fn pentanomial(m: u32, k1: u32, k2: u32, k3: u32, a: &BigUint, b: &BigUint) -> Self;

    /// The extension degree $m$.
    fn field_bits(&self) -> u32;

    /// The point at infinity.
    fn infinity(&self) -> Self::Point;

    /// Creates a point without any checks.
    fn point_unchecked(&self, x: &BigUint, y: &BigUint) -> Self::Point;

    /// Affine coordinates, `None` for the point at infinity.
    fn coordinates(&self, point: &Self::Point) -> Option<(BigUint, BigUint)>;

    /// Returns `true` if `(x, y)` are field elements satisfying the curve equation.
    fn satisfies_curve_equation(&self, x: &BigUint, y: &BigUint) -> bool;

    /// Point addition.
    fn add(&self, lhs: &Self::Point, rhs: &Self::Point) -> Self::Point;

    /// Point doubling.
    fn double(&self, point: &Self::Point) -> Self::Point;

    /// Point negation.
    fn negate(&self, point: &Self::Point) -> Self::Point;

    /// Scalar multiplication.
    ///
    /// May run in time that depends on `scalar`; the groups route secret exponents
    /// through [`DlogGroup::exponentiate_secret`] instead.
    fn multiply(&self, point: &Self::Point, scalar: &BigUint) -> Self::Point;
}

/// Checks that `(x, y)` is a point of the curve `backend` implements.
pub fn check_curve_membership<B: F2mCurveArithmetic>(backend: &B, x: &BigUint, y: &BigUint) -> bool {
    let m = u64::from(backend.field_bits());
    x.bits() <= m && y.bits() <= m && backend.satisfies_curve_equation(x, y)
}

/// Checks that a curve point lies in the sub-group of order `q`.
///
/// With cofactor 1 every curve point qualifies; otherwise `q * P` must be the point at infinity.
pub fn check_subgroup_membership<B: F2mCurveArithmetic>(backend: &B, curve: &F2mCurveParams, point: &B::Point) -> bool {
    if backend.coordinates(point).is_none() || curve.cofactor().is_one() {
        return true;
    }
    backend.coordinates(&backend.multiply(point, curve.order())).is_none()
}

/// Construction options for [`EcF2mGroup`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct F2mGroupOptions {
    /// Check at construction that the generator from the parameters is a sub-group member.
    ///
    /// Off by default: the generator is trusted, as are the parameters it comes from.
    pub verify_generator: bool,
}

/// A discrete-log group of points on a curve over $GF(2^m)$.
#[derive(Debug, Clone)]
pub struct EcF2mGroup<B: F2mCurveArithmetic = NativeF2m> {
    params: GroupParams,
    curve: F2mCurveParams,
    backend: B,
    generator: B::Point,
    coordinate_len: usize,
}

impl EcF2mGroup<NativeF2m> {
    /// Builds a group over one of the built-in NIST curves (see [`JsonCurveParams::nist_f2m`]).
    pub fn nist(curve_name: &str) -> Result<Self, ConfigError> {
        Self::from_source(&JsonCurveParams::nist_f2m()?, curve_name, F2mGroupOptions::default())
    }
}

impl<B: F2mCurveArithmetic> EcF2mGroup<B> {
    /// Loads `curve_name` from `source` and builds the group.
    pub fn from_source(
        source: &impl CurveParamsSource,
        curve_name: &str,
        options: F2mGroupOptions,
    ) -> Result<Self, ConfigError> {
        match source.curve_params(curve_name)? {
            GroupParams::F2m(params) => Self::from_params(params, options),
            GroupParams::Fp(_) => Err(ConfigError::UnsupportedField {
                curve: curve_name.into(),
                field: "Fp".into(),
            }),
        }
    }

    /// Builds the group from already parsed parameters.
    pub fn from_params(params: F2mGroupParams, options: F2mGroupOptions) -> Result<Self, ConfigError> {
        let curve = params.curve().clone();

        let backend = match curve.basis() {
            F2mBasis::Trinomial { k } => B::trinomial(curve.m(), k, curve.a(), curve.b()),
            F2mBasis::Pentanomial { k1, k2, k3 } => B::pentanomial(curve.m(), k1, k2, k3, curve.a(), curve.b()),
        };

        let (x, y) = curve.generator();
        let generator = backend.point_unchecked(x, y);

        let group = Self {
            coordinate_len: curve.m().div_ceil(8) as usize,
            params: GroupParams::F2m(params),
            curve,
            backend,
            generator,
        };

        if options.verify_generator && !group.is_member(&group.generator) {
            tracing::warn!(curve = group.curve.name(), "Generator failed the membership check");
            return Err(ConfigError::InvalidGenerator(group.curve.name().into()));
        }

        tracing::debug!(
            curve = group.curve.name(),
            m = group.curve.m(),
            basis = ?group.curve.basis(),
            verified_generator = options.verify_generator,
            "Initialized a binary-field curve group"
        );

        Ok(group)
    }

    /// The underlying curve (for Koblitz curves, the unwrapped parameters).
    pub fn curve(&self) -> &F2mCurveParams {
        &self.curve
    }

    /// The arithmetic backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl<B: F2mCurveArithmetic> DlogGroup for EcF2mGroup<B> {
    type Element = B::Point;

    fn group_type(&self) -> &'static str {
        "ECF2m"
    }

    fn params(&self) -> &GroupParams {
        &self.params
    }

    fn generator(&self) -> &Self::Element {
        &self.generator
    }

    fn identity(&self) -> Self::Element {
        self.backend.infinity()
    }

    fn is_member(&self, element: &Self::Element) -> bool {
        let Some((x, y)) = self.backend.coordinates(element) else {
            return true;
        };
        check_curve_membership(&self.backend, &x, &y)
            && check_subgroup_membership(&self.backend, &self.curve, element)
    }

    fn multiply(&self, lhs: &Self::Element, rhs: &Self::Element) -> Self::Element {
        self.backend.add(lhs, rhs)
    }

    fn exponentiate(&self, base: &Self::Element, exponent: &BigUint) -> Self::Element {
        self.backend.multiply(base, exponent)
    }

    fn inverse(&self, element: &Self::Element) -> Self::Element {
        self.backend.negate(element)
    }

    fn element_byte_len(&self) -> usize {
        2 * self.coordinate_len
    }

    fn element_to_bytes(&self, element: &Self::Element) -> Vec<u8> {
        encode_coordinates(self.backend.coordinates(element), self.coordinate_len)
    }

    fn element_from_bytes(&self, bytes: &[u8]) -> Result<Self::Element, GroupError> {
        match decode_coordinates(bytes, self.coordinate_len)? {
            None => Ok(self.backend.infinity()),
            Some((x, y)) => self.generate_element(&x, &y),
        }
    }

    fn max_encodable_len(&self) -> usize {
        0
    }

    fn encode_bytes_to_element(&self, _bytes: &[u8]) -> Result<Self::Element, GroupError> {
        Err(GroupError::Unsupported("encode_bytes_to_element"))
    }

    fn decode_element_to_bytes(&self, _element: &Self::Element) -> Result<Vec<u8>, GroupError> {
        Err(GroupError::Unsupported("decode_element_to_bytes"))
    }
}

impl<B: F2mCurveArithmetic> DlogEllipticCurve for EcF2mGroup<B> {
    fn generate_element(&self, x: &BigUint, y: &BigUint) -> Result<Self::Element, GroupError> {
        if !check_curve_membership(&self.backend, x, y) {
            return Err(GroupError::InvalidElement);
        }
        let point = self.backend.point_unchecked(x, y);
        if !check_subgroup_membership(&self.backend, &self.curve, &point) {
            return Err(GroupError::InvalidElement);
        }
        Ok(point)
    }

    fn coordinates(&self, element: &Self::Element) -> Option<(BigUint, BigUint)> {
        self.backend.coordinates(element)
    }
}
