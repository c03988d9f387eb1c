//! Arithmetic in the binary extension field $GF(2^m)$ in polynomial basis.
//!
//! Field elements are polynomials over $GF(2)$ of degree less than $m$,
//! stored as the bits of a [`BigUint`] (bit $i$ is the coefficient of $z^i$).

use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::dlog::params::F2mBasis;

/// The field $GF(2^m) = GF(2)[z] / f(z)$ for a trinomial or pentanomial $f$.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BinaryField {
    m: u32,
    /// The full reduction polynomial, including the $z^m$ term.
    reduction: BigUint,
}

fn degree(value: &BigUint) -> Option<u64> {
    value.bits().checked_sub(1)
}

impl BinaryField {
    pub fn new(m: u32, basis: &F2mBasis) -> Self {
        let mut reduction = BigUint::zero();
        reduction.set_bit(m.into(), true);
        reduction.set_bit(0, true);
        match basis {
            F2mBasis::Trinomial { k } => reduction.set_bit((*k).into(), true),
            F2mBasis::Pentanomial { k1, k2, k3 } => {
                for k in [k1, k2, k3] {
                    reduction.set_bit((*k).into(), true);
                }
            }
        }
        Self { m, reduction }
    }

    pub fn degree(&self) -> u32 {
        self.m
    }

    /// Returns `true` if `value` is a canonical element (degree below $m$).
    pub fn contains(&self, value: &BigUint) -> bool {
        value.bits() <= u64::from(self.m)
    }

    pub fn add(&self, lhs: &BigUint, rhs: &BigUint) -> BigUint {
        lhs ^ rhs
    }

    /// Reduces an arbitrary polynomial modulo $f$.
    pub fn reduce(&self, value: &BigUint) -> BigUint {
        let m = u64::from(self.m);
        let mut result = value.clone();
        while let Some(deg) = degree(&result) {
            if deg < m {
                break;
            }
            result ^= &self.reduction << (deg - m);
        }
        result
    }

    /// Right-to-left shift-and-add multiplication, keeping the shifted operand reduced.
    pub fn mul(&self, lhs: &BigUint, rhs: &BigUint) -> BigUint {
        let m = u64::from(self.m);
        let mut shifted = self.reduce(lhs);
        let rhs = self.reduce(rhs);
        let mut result = BigUint::zero();

        for i in 0..rhs.bits() {
            if rhs.bit(i) {
                result ^= &shifted;
            }
            shifted <<= 1u32;
            if shifted.bit(m) {
                shifted ^= &self.reduction;
            }
        }
        result
    }

    pub fn square(&self, value: &BigUint) -> BigUint {
        self.mul(value, value)
    }

    /// Inversion with the extended Euclidean algorithm for binary polynomials.
    ///
    /// Returns `None` for zero.
    pub fn invert(&self, value: &BigUint) -> Option<BigUint> {
        let mut u = self.reduce(value);
        if u.is_zero() {
            return None;
        }
        let mut v = self.reduction.clone();
        let mut g1 = BigUint::one();
        let mut g2 = BigUint::zero();

        while !u.is_one() {
            let deg_u = degree(&u)?;
            let deg_v = degree(&v)?;
            if deg_u < deg_v {
                core::mem::swap(&mut u, &mut v);
                core::mem::swap(&mut g1, &mut g2);
            }
            // After the swap `deg(u) >= deg(v)`.
            let shift = degree(&u)? - degree(&v)?;
            u ^= &v << shift;
            g1 ^= &g2 << shift;
        }
        Some(self.reduce(&g1))
    }

    pub fn div(&self, lhs: &BigUint, rhs: &BigUint) -> Option<BigUint> {
        Some(self.mul(lhs, &self.invert(rhs)?))
    }

    /// The unique square root, $x^{2^{m-1}}$.
    pub fn sqrt(&self, value: &BigUint) -> BigUint {
        let mut result = self.reduce(value);
        for _ in 1..self.m {
            result = self.square(&result);
        }
        result
    }
}
