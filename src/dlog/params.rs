//! Elliptic curve parameters and the sources they are loaded from.

use alloc::{boxed::Box, collections::BTreeMap, format, string::String};
use std::path::Path;

use num_bigint::BigUint;
use num_traits::{One, Zero};
use serde::Deserialize;

const NIST_F2M_CURVES: &str = include_str!("nist_f2m_curves.json");

/// Errors that occur while loading group parameters.
#[derive(displaydoc::Display, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Curve `{0}` is not present in the parameter source
    MissingCurve(String),
    /// Curve `{curve}`: missing key `{key}`
    MissingKey {
        /// The curve name.
        curve: String,
        /// The absent key.
        key: &'static str,
    },
    /// Curve `{curve}`: malformed value for `{key}`
    MalformedValue {
        /// The curve name.
        curve: String,
        /// The offending key.
        key: &'static str,
    },
    /// Curve `{0}`: the basis is neither a valid trinomial nor a valid pentanomial
    MalformedBasis(String),
    /// Curve `{curve}`: unsupported field type `{field}`
    UnsupportedField {
        /// The curve name.
        curve: String,
        /// The declared field type.
        field: String,
    },
    /// Curve `{0}`: the generator is not a member of the declared sub-group
    InvalidGenerator(String),
    /// Could not parse the parameter source: {0}
    Parse(String),
    /// Could not read the parameter source: {0}
    Io(String),
}

impl std::error::Error for ConfigError {}

/// The reduction polynomial of a binary field, $z^m + \dots + 1$.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum F2mBasis {
    /// $z^m + z^k + 1$
    Trinomial {
        /// The middle exponent.
        k: u32,
    },
    /// $z^m + z^{k_3} + z^{k_2} + z^{k_1} + 1$
    Pentanomial {
        /// The lowest middle exponent.
        k1: u32,
        /// The second middle exponent.
        k2: u32,
        /// The highest middle exponent.
        k3: u32,
    },
}

/// A curve $y^2 + xy = x^3 + ax^2 + b$ over $GF(2^m)$ with a prime-order sub-group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct F2mCurveParams {
    pub(crate) name: String,
    pub(crate) m: u32,
    pub(crate) basis: F2mBasis,
    pub(crate) a: BigUint,
    pub(crate) b: BigUint,
    pub(crate) generator_x: BigUint,
    pub(crate) generator_y: BigUint,
    pub(crate) order: BigUint,
    pub(crate) cofactor: BigUint,
}

impl F2mCurveParams {
    /// The curve name as it appears in the parameter source.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The extension degree $m$.
    pub fn m(&self) -> u32 {
        self.m
    }

    /// The field basis.
    pub fn basis(&self) -> F2mBasis {
        self.basis
    }

    /// The coefficient $a$.
    pub fn a(&self) -> &BigUint {
        &self.a
    }

    /// The coefficient $b$.
    pub fn b(&self) -> &BigUint {
        &self.b
    }

    /// The generator coordinates.
    pub fn generator(&self) -> (&BigUint, &BigUint) {
        (&self.generator_x, &self.generator_y)
    }

    /// The order of the sub-group.
    pub fn order(&self) -> &BigUint {
        &self.order
    }

    /// The cofactor of the sub-group.
    pub fn cofactor(&self) -> &BigUint {
        &self.cofactor
    }
}

/// Parameters of a binary-field curve group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum F2mGroupParams {
    /// A generic curve.
    Curve(F2mCurveParams),
    /// A Koblitz (anomalous binary) curve, $a \in \{0, 1\}$, $b = 1$.
    Koblitz(F2mCurveParams),
}

impl F2mGroupParams {
    /// Unwraps Koblitz parameters to the underlying curve.
    pub fn curve(&self) -> &F2mCurveParams {
        match self {
            Self::Curve(curve) | Self::Koblitz(curve) => curve,
        }
    }

    /// Returns `true` for Koblitz curves.
    pub fn is_koblitz(&self) -> bool {
        matches!(self, Self::Koblitz(_))
    }
}

/// A curve $y^2 = x^3 + ax + b$ over $GF(p)$.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FpCurveParams {
    pub(crate) name: String,
    pub(crate) p: BigUint,
    pub(crate) a: BigUint,
    pub(crate) b: BigUint,
    pub(crate) generator_x: BigUint,
    pub(crate) generator_y: BigUint,
    pub(crate) order: BigUint,
    pub(crate) cofactor: BigUint,
}

impl FpCurveParams {
    /// The curve name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The field modulus.
    pub fn p(&self) -> &BigUint {
        &self.p
    }

    /// The generator coordinates.
    pub fn generator(&self) -> (&BigUint, &BigUint) {
        (&self.generator_x, &self.generator_y)
    }

    /// The order of the sub-group.
    pub fn order(&self) -> &BigUint {
        &self.order
    }

    /// The cofactor of the sub-group.
    pub fn cofactor(&self) -> &BigUint {
        &self.cofactor
    }
}

/// Parameters of a concrete discrete-log group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupParams {
    /// A curve over a prime field.
    Fp(FpCurveParams),
    /// A curve over a binary extension field.
    F2m(F2mGroupParams),
}

impl GroupParams {
    /// The order of the sub-group.
    pub fn order(&self) -> &BigUint {
        match self {
            Self::Fp(params) => params.order(),
            Self::F2m(params) => params.curve().order(),
        }
    }
}

/// A key-value store of named curve parameters.
pub trait CurveParamsSource {
    /// Returns the validated parameters for `curve_name`.
    fn curve_params(&self, curve_name: &str) -> Result<GroupParams, ConfigError>;
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCurveEntry {
    field: String,
    m: Option<u32>,
    k1: Option<u32>,
    k2: Option<u32>,
    k3: Option<u32>,
    p: Option<String>,
    a: Option<String>,
    b: Option<String>,
    gx: Option<String>,
    gy: Option<String>,
    order: Option<String>,
    cofactor: Option<String>,
    #[serde(default)]
    koblitz: bool,
}

/// Curve parameters stored as a JSON object keyed by curve name.
///
/// Numbers are big-endian hex strings; binary curves carry `m`, `k1` and, for a pentanomial
/// basis, `k2` and `k3`. Entries are only validated when requested.
#[derive(Debug, Clone)]
pub struct JsonCurveParams {
    entries: BTreeMap<String, RawCurveEntry>,
}

impl JsonCurveParams {
    /// Parses a JSON document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let entries = serde_json::from_str(json).map_err(|err| ConfigError::Parse(format!("{err}")))?;
        Ok(Self { entries })
    }

    /// Reads and parses a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref()).map_err(|err| ConfigError::Io(format!("{err}")))?;
        Self::from_json(&json)
    }

    /// The built-in NIST binary curves: B-163, K-163, B-233, K-233.
    pub fn nist_f2m() -> Result<Self, ConfigError> {
        Self::from_json(NIST_F2M_CURVES)
    }

    /// The names of all curves in this source.
    pub fn curve_names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

struct EntryReader<'a> {
    curve: &'a str,
    entry: &'a RawCurveEntry,
}

impl EntryReader<'_> {
    fn missing(&self, key: &'static str) -> ConfigError {
        ConfigError::MissingKey {
            curve: self.curve.into(),
            key,
        }
    }

    fn malformed(&self, key: &'static str) -> ConfigError {
        ConfigError::MalformedValue {
            curve: self.curve.into(),
            key,
        }
    }

    fn number(&self, key: &'static str, value: &Option<String>) -> Result<BigUint, ConfigError> {
        let value = value.as_ref().ok_or_else(|| self.missing(key))?;
        let digits = value.trim().trim_start_matches("0x");
        BigUint::parse_bytes(digits.as_bytes(), 16).ok_or_else(|| self.malformed(key))
    }

    fn group_order(&self) -> Result<(BigUint, BigUint), ConfigError> {
        let order = self.number("order", &self.entry.order)?;
        if order <= BigUint::one() {
            return Err(self.malformed("order"));
        }
        let cofactor = self.number("cofactor", &self.entry.cofactor)?;
        if cofactor.is_zero() {
            return Err(self.malformed("cofactor"));
        }
        Ok((order, cofactor))
    }

    /// A basis is pentanomial only if it declares all three exponents in strictly
    /// increasing order, and trinomial only if it declares exactly one.
    fn basis(&self, m: u32) -> Result<F2mBasis, ConfigError> {
        let k1 = self.entry.k1.ok_or_else(|| self.missing("k1"))?;
        let basis = match (self.entry.k2, self.entry.k3) {
            (None, None) => F2mBasis::Trinomial { k: k1 },
            (Some(k2), Some(k3)) => F2mBasis::Pentanomial { k1, k2, k3 },
            _ => return Err(ConfigError::MalformedBasis(self.curve.into())),
        };
        let valid = match basis {
            F2mBasis::Trinomial { k } => 0 < k && k < m,
            F2mBasis::Pentanomial { k1, k2, k3 } => 0 < k1 && k1 < k2 && k2 < k3 && k3 < m,
        };
        if !valid {
            return Err(ConfigError::MalformedBasis(self.curve.into()));
        }
        Ok(basis)
    }

    fn f2m(&self) -> Result<F2mGroupParams, ConfigError> {
        let m = self.entry.m.ok_or_else(|| self.missing("m"))?;
        if m < 2 {
            return Err(self.malformed("m"));
        }
        let basis = self.basis(m)?;

        let field_element = |key: &'static str, value: &Option<String>| -> Result<BigUint, ConfigError> {
            let number = self.number(key, value)?;
            if number.bits() > u64::from(m) {
                return Err(self.malformed(key));
            }
            Ok(number)
        };

        let a = field_element("a", &self.entry.a)?;
        let b = field_element("b", &self.entry.b)?;
        if b.is_zero() {
            // The curve would be singular.
            return Err(self.malformed("b"));
        }
        let generator_x = field_element("gx", &self.entry.gx)?;
        let generator_y = field_element("gy", &self.entry.gy)?;
        let (order, cofactor) = self.group_order()?;

        let curve = F2mCurveParams {
            name: self.curve.into(),
            m,
            basis,
            a,
            b,
            generator_x,
            generator_y,
            order,
            cofactor,
        };

        if self.entry.koblitz {
            if curve.a > BigUint::one() {
                return Err(self.malformed("a"));
            }
            if !curve.b.is_one() {
                return Err(self.malformed("b"));
            }
            Ok(F2mGroupParams::Koblitz(curve))
        } else {
            Ok(F2mGroupParams::Curve(curve))
        }
    }

    fn fp(&self) -> Result<FpCurveParams, ConfigError> {
        let p = self.number("p", &self.entry.p)?;
        if p <= BigUint::from(3u32) {
            return Err(self.malformed("p"));
        }
        let field_element = |key: &'static str, value: &Option<String>| -> Result<BigUint, ConfigError> {
            let number = self.number(key, value)?;
            if number >= p {
                return Err(self.malformed(key));
            }
            Ok(number)
        };
        let a = field_element("a", &self.entry.a)?;
        let b = field_element("b", &self.entry.b)?;
        let generator_x = field_element("gx", &self.entry.gx)?;
        let generator_y = field_element("gy", &self.entry.gy)?;
        let (order, cofactor) = self.group_order()?;
        Ok(FpCurveParams {
            name: self.curve.into(),
            p,
            a,
            b,
            generator_x,
            generator_y,
            order,
            cofactor,
        })
    }
}

impl CurveParamsSource for JsonCurveParams {
    fn curve_params(&self, curve_name: &str) -> Result<GroupParams, ConfigError> {
        let entry = self
            .entries
            .get(curve_name)
            .ok_or_else(|| ConfigError::MissingCurve(curve_name.into()))?;
        let reader = EntryReader {
            curve: curve_name,
            entry,
        };

        let params = match entry.field.as_str() {
            "F2m" => GroupParams::F2m(reader.f2m()?),
            "Fp" => GroupParams::Fp(reader.fp()?),
            other => {
                return Err(ConfigError::UnsupportedField {
                    curve: curve_name.into(),
                    field: other.into(),
                })
            }
        };

        tracing::debug!(curve = curve_name, field = %entry.field, "Loaded curve parameters");
        Ok(params)
    }
}

impl<T: CurveParamsSource + ?Sized> CurveParamsSource for Box<T> {
    fn curve_params(&self, curve_name: &str) -> Result<GroupParams, ConfigError> {
        self.as_ref().curve_params(curve_name)
    }
}
