//! A pure Rust affine-coordinate backend for binary-field curves.

use num_bigint::BigUint;
use num_traits::Zero;

use super::{field::BinaryField, F2mCurveArithmetic};
use crate::dlog::params::F2mBasis;

/// A point on a binary-field curve in affine coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct F2mPoint(Option<(BigUint, BigUint)>);

impl F2mPoint {
    /// The point at infinity.
    pub const INFINITY: Self = Self(None);

    /// Returns `true` for the point at infinity.
    pub fn is_infinity(&self) -> bool {
        self.0.is_none()
    }

    /// The `x` coordinate, `None` for the point at infinity.
    pub fn x(&self) -> Option<&BigUint> {
        self.0.as_ref().map(|(x, _y)| x)
    }

    /// The `y` coordinate, `None` for the point at infinity.
    pub fn y(&self) -> Option<&BigUint> {
        self.0.as_ref().map(|(_x, y)| y)
    }
}

/// The curve $y^2 + xy = x^3 + ax^2 + b$ over $GF(2^m)$, implemented natively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeF2m {
    field: BinaryField,
    a: BigUint,
    b: BigUint,
}

impl NativeF2m {
    fn with_basis(m: u32, basis: F2mBasis, a: &BigUint, b: &BigUint) -> Self {
        let field = BinaryField::new(m, &basis);
        Self {
            a: field.reduce(a),
            b: field.reduce(b),
            field,
        }
    }

    /// $\lambda^2 + \lambda + a$, the common part of the `x` coordinate in addition and doubling.
    fn x_from_slope(&self, lambda: &BigUint) -> BigUint {
        let field = &self.field;
        field.add(&field.add(&field.square(lambda), lambda), &self.a)
    }
}

impl F2mCurveArithmetic for NativeF2m {
    type Point = F2mPoint;

    fn trinomial(m: u32, k: u32, a: &BigUint, b: &BigUint) -> Self {
        Self::with_basis(m, F2mBasis::Trinomial { k }, a, b)
    }

    fn pentanomial(m: u32, k1: u32, k2: u32, k3: u32, a: &BigUint, b: &BigUint) -> Self {
        Self::with_basis(m, F2mBasis::Pentanomial { k1, k2, k3 }, a, b)
    }

    fn field_bits(&self) -> u32 {
        self.field.degree()
    }

    fn infinity(&self) -> Self::Point {
        F2mPoint::INFINITY
    }

    fn point_unchecked(&self, x: &BigUint, y: &BigUint) -> Self::Point {
        F2mPoint(Some((x.clone(), y.clone())))
    }

    fn coordinates(&self, point: &Self::Point) -> Option<(BigUint, BigUint)> {
        point.0.clone()
    }

    fn satisfies_curve_equation(&self, x: &BigUint, y: &BigUint) -> bool {
        let field = &self.field;
        if !field.contains(x) || !field.contains(y) {
            return false;
        }
        // y^2 + xy
        let lhs = field.add(&field.square(y), &field.mul(x, y));
        // x^3 + ax^2 + b
        let x2 = field.square(x);
        let rhs = field.add(&field.add(&field.mul(&x2, x), &field.mul(&self.a, &x2)), &self.b);
        lhs == rhs
    }

    fn add(&self, lhs: &Self::Point, rhs: &Self::Point) -> Self::Point {
        let (x1, y1) = match &lhs.0 {
            None => return rhs.clone(),
            Some(coords) => coords,
        };
        let (x2, y2) = match &rhs.0 {
            None => return lhs.clone(),
            Some(coords) => coords,
        };

        let field = &self.field;
        if x1 == x2 {
            return if y1 == y2 {
                self.double(lhs)
            } else {
                // `rhs` is `-lhs`
                F2mPoint::INFINITY
            };
        }

        let sum_x = field.add(x1, x2);
        let lambda = match field.div(&field.add(y1, y2), &sum_x) {
            Some(lambda) => lambda,
            None => return F2mPoint::INFINITY,
        };
        let x3 = field.add(&self.x_from_slope(&lambda), &sum_x);
        let y3 = field.add(&field.add(&field.mul(&lambda, &field.add(x1, &x3)), &x3), y1);
        F2mPoint(Some((x3, y3)))
    }

    fn double(&self, point: &Self::Point) -> Self::Point {
        let (x1, y1) = match &point.0 {
            None => return F2mPoint::INFINITY,
            Some(coords) => coords,
        };
        let field = &self.field;

        // A point with `x = 0` is its own negative.
        let y_over_x = match field.div(y1, x1) {
            Some(value) => value,
            None => return F2mPoint::INFINITY,
        };
        let lambda = field.add(x1, &y_over_x);
        let x3 = self.x_from_slope(&lambda);
        let y3 = field.add(&field.add(&field.square(x1), &field.mul(&lambda, &x3)), &x3);
        F2mPoint(Some((x3, y3)))
    }

    fn negate(&self, point: &Self::Point) -> Self::Point {
        match &point.0 {
            None => F2mPoint::INFINITY,
            Some((x, y)) => F2mPoint(Some((x.clone(), self.field.add(x, y)))),
        }
    }

    // Double-and-add over the significant bits of `scalar`: variable time.
    fn multiply(&self, point: &Self::Point, scalar: &BigUint) -> Self::Point {
        if scalar.is_zero() {
            return F2mPoint::INFINITY;
        }
        let mut result = F2mPoint::INFINITY;
        for i in (0..scalar.bits()).rev() {
            result = self.double(&result);
            if scalar.bit(i) {
                result = self.add(&result, point);
            }
        }
        result
    }
}
