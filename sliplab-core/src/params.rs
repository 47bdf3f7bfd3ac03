//! Named, typed model parameters.
//!
//! - `ParamValue`: one value (bool, integer, float or string).
//! - `Params`: the mapping a model carries, keyed by name.
//!
//! Once a key exists its kind is fixed: re-setting it with a different kind is
//! rejected, except that an integer may be written into a float slot.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ─── Error type ──────────────────────────────────────────────────────

/// Errors raised when reading or writing model parameters.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParamError {
    #[error("Parameter not found: {0}")]
    Missing(String),
    #[error("Parameter {key} is {found}, requested as {expected}")]
    WrongType {
        key: String,
        expected: ParamKind,
        found: ParamKind,
    },
    #[error("Parameter {key} is {existing}, cannot be set to a {new} value")]
    TypeMismatch {
        key: String,
        existing: ParamKind,
        new: ParamKind,
    },
    #[error("Parameter {key} = {value} is out of range: {reason}")]
    OutOfRange {
        key: String,
        value: ParamValue,
        reason: String,
    },
}

// ─── Values ──────────────────────────────────────────────────────────

/// Kind tag of a `ParamValue`, used in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    Bool,
    Int,
    Float,
    Str,
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ParamKind::Bool => "bool",
            ParamKind::Int => "int",
            ParamKind::Float => "float",
            ParamKind::Str => "string",
        };
        f.write_str(s)
    }
}

/// A single parameter value.
///
/// Untagged so that config files read naturally: `p = 0.002`, `lots = 3`,
/// `side_aware = true`, `mode = "close"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl ParamValue {
    pub fn kind(&self) -> ParamKind {
        match self {
            ParamValue::Bool(_) => ParamKind::Bool,
            ParamValue::Int(_) => ParamKind::Int,
            ParamValue::Float(_) => ParamKind::Float,
            ParamValue::Str(_) => ParamKind::Str,
        }
    }

    /// Numeric view: floats as-is, integers widened.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Float(v) => Some(*v),
            ParamValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Bool(v) => write!(f, "{v}"),
            ParamValue::Int(v) => write!(f, "{v}"),
            ParamValue::Float(v) => write!(f, "{v}"),
            ParamValue::Str(v) => write!(f, "{v:?}"),
        }
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Bool(v)
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Int(v)
    }
}

impl From<i32> for ParamValue {
    fn from(v: i32) -> Self {
        ParamValue::Int(i64::from(v))
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Float(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Str(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::Str(v)
    }
}

/// Typed extraction from a `ParamValue`.
pub trait FromParam: Sized {
    const KIND: ParamKind;

    fn from_param(value: &ParamValue) -> Option<Self>;
}

impl FromParam for bool {
    const KIND: ParamKind = ParamKind::Bool;

    fn from_param(value: &ParamValue) -> Option<Self> {
        match value {
            ParamValue::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromParam for i64 {
    const KIND: ParamKind = ParamKind::Int;

    fn from_param(value: &ParamValue) -> Option<Self> {
        match value {
            ParamValue::Int(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromParam for f64 {
    const KIND: ParamKind = ParamKind::Float;

    fn from_param(value: &ParamValue) -> Option<Self> {
        value.as_f64()
    }
}

impl FromParam for String {
    const KIND: ParamKind = ParamKind::Str;

    fn from_param(value: &ParamValue) -> Option<Self> {
        match value {
            ParamValue::Str(v) => Some(v.clone()),
            _ => None,
        }
    }
}

// ─── Mapping ─────────────────────────────────────────────────────────

/// Parameter mapping of a model.
///
/// Uses `BTreeMap` so serialization (and therefore config fingerprints) has a
/// deterministic key order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params(BTreeMap<String, ParamValue>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn value(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Read a parameter as `T`.
    pub fn get<T: FromParam>(&self, key: &str) -> Result<T, ParamError> {
        let value = self
            .0
            .get(key)
            .ok_or_else(|| ParamError::Missing(key.to_string()))?;
        T::from_param(value).ok_or_else(|| ParamError::WrongType {
            key: key.to_string(),
            expected: T::KIND,
            found: value.kind(),
        })
    }

    /// Insert or overwrite a parameter, keeping the kind of an existing key.
    pub fn set(&mut self, key: &str, value: impl Into<ParamValue>) -> Result<(), ParamError> {
        let value = value.into();
        let value = match self.0.get(key) {
            None => value,
            Some(existing) => coerce(key, existing.kind(), value)?,
        };
        self.0.insert(key.to_string(), value);
        Ok(())
    }

    /// Insert or overwrite a parameter without kind checks.
    pub fn insert(&mut self, key: &str, value: impl Into<ParamValue>) {
        self.0.insert(key.to_string(), value.into());
    }
}

fn coerce(key: &str, existing: ParamKind, value: ParamValue) -> Result<ParamValue, ParamError> {
    match (existing, value) {
        (ParamKind::Float, ParamValue::Int(v)) => Ok(ParamValue::Float(v as f64)),
        (kind, value) if kind == value.kind() => Ok(value),
        (kind, value) => Err(ParamError::TypeMismatch {
            key: key.to_string(),
            existing: kind,
            new: value.kind(),
        }),
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<'a> IntoIterator for &'a Params {
    type Item = (&'a String, &'a ParamValue);
    type IntoIter = std::collections::btree_map::Iter<'a, String, ParamValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
