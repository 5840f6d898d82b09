//! Numeric payload of a quantity
//!
//! A value is either a single number or a fixed-size array. Binary
//! operations broadcast a scalar over an array; two arrays must have the
//! same length.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{EnergyError, EnergyResult};

/// Scalar or array payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Scalar(f64),
    Array(Vec<f64>),
}

/// Relative comparison used for derived quantities
pub fn approx_eq(a: f64, b: f64, rel: f64) -> bool {
    if a == b {
        return true;
    }
    let scale = a.abs().max(b.abs()).max(1e-300);
    (a - b).abs() / scale <= rel
}

impl Value {
    /// Number of elements (1 for a scalar)
    pub fn len(&self) -> usize {
        match self {
            Value::Scalar(_) => 1,
            Value::Array(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Value::Array(v) if v.is_empty())
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, Value::Scalar(_))
    }

    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Value::Scalar(x) => Some(*x),
            Value::Array(_) => None,
        }
    }

    /// Elements as a slice view (a scalar is a one-element slice)
    pub fn as_slice(&self) -> &[f64] {
        match self {
            Value::Scalar(x) => std::slice::from_ref(x),
            Value::Array(v) => v,
        }
    }

    /// Apply `f` element-wise, keeping the shape
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Value {
        match self {
            Value::Scalar(x) => Value::Scalar(f(*x)),
            Value::Array(v) => Value::Array(v.iter().map(|x| f(*x)).collect()),
        }
    }

    /// Multiply every element by `k`
    pub fn scale(&self, k: f64) -> Value {
        self.map(|x| x * k)
    }

    /// Combine two payloads element-wise with scalar broadcasting
    pub fn zip_with(&self, other: &Value, f: impl Fn(f64, f64) -> f64) -> EnergyResult<Value> {
        match (self, other) {
            (Value::Scalar(a), Value::Scalar(b)) => Ok(Value::Scalar(f(*a, *b))),
            (Value::Scalar(a), Value::Array(bs)) => {
                Ok(Value::Array(bs.iter().map(|b| f(*a, *b)).collect()))
            }
            (Value::Array(xs), Value::Scalar(b)) => {
                Ok(Value::Array(xs.iter().map(|a| f(*a, *b)).collect()))
            }
            (Value::Array(xs), Value::Array(ys)) => {
                if xs.len() != ys.len() {
                    return Err(EnergyError::ShapeMismatch {
                        left: xs.len(),
                        right: ys.len(),
                    });
                }
                Ok(Value::Array(
                    xs.iter().zip(ys.iter()).map(|(a, b)| f(*a, *b)).collect(),
                ))
            }
        }
    }

    /// True when `pred` holds for every broadcast element pair
    pub fn all_pairs(&self, other: &Value, pred: impl Fn(f64, f64) -> bool) -> EnergyResult<bool> {
        let flags = self.zip_with(other, |a, b| if pred(a, b) { 1.0 } else { 0.0 })?;
        Ok(flags.as_slice().iter().all(|f| *f == 1.0))
    }

    /// Element-wise approximate equality with relative tolerance
    pub fn approx_eq(&self, other: &Value, rel: f64) -> bool {
        self.all_pairs(other, |a, b| approx_eq(a, b, rel))
            .unwrap_or(false)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Scalar(x)
    }
}

impl From<i32> for Value {
    fn from(x: i32) -> Self {
        Value::Scalar(x as f64)
    }
}

impl From<Vec<f64>> for Value {
    fn from(v: Vec<f64>) -> Self {
        Value::Array(v)
    }
}

impl From<&[f64]> for Value {
    fn from(v: &[f64]) -> Self {
        Value::Array(v.to_vec())
    }
}

impl<const N: usize> From<[f64; N]> for Value {
    fn from(v: [f64; N]) -> Self {
        Value::Array(v.to_vec())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Scalar(x) => write!(f, "{}", x),
            Value::Array(v) => {
                write!(f, "[")?;
                for (i, x) in v.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", x)?;
                }
                write!(f, "]")
            }
        }
    }
}
