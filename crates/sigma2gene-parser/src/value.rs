//! Scalar and field values from detection entries.
//!
//! YAML values are decoded into these variants once, at parse time, so the
//! translation layer branches on explicit tags instead of re-inspecting YAML
//! nodes.

use std::fmt;

/// A scalar value from a detection entry.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl Scalar {
    pub fn from_yaml(v: &serde_yaml::Value) -> Self {
        match v {
            serde_yaml::Value::Null => Scalar::Null,
            serde_yaml::Value::Bool(b) => Scalar::Bool(*b),
            serde_yaml::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Scalar::Integer(i)
                } else if let Some(f) = n.as_f64() {
                    Scalar::Float(f)
                } else {
                    Scalar::Null
                }
            }
            serde_yaml::Value::String(s) => Scalar::String(s.clone()),
            _ => Scalar::String(format!("{v:?}")),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(s) => Some(s),
            _ => None,
        }
    }

    /// Integer content, accepting decimal digit strings like `"4688"`.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Scalar::Integer(i) => Some(*i),
            Scalar::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Absent values render empty: they become empty match patterns.
            Scalar::Null => Ok(()),
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Integer(i) => write!(f, "{i}"),
            Scalar::Float(x) => write!(f, "{x}"),
            Scalar::String(s) => write!(f, "{s}"),
        }
    }
}

/// The value(s) of a single detection field.
///
/// A list of values is OR-combined by the converter.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Single(Scalar),
    Many(Vec<Scalar>),
}

impl FieldValue {
    pub fn from_yaml(v: &serde_yaml::Value) -> Self {
        match v {
            serde_yaml::Value::Sequence(seq) => {
                FieldValue::Many(seq.iter().map(Scalar::from_yaml).collect())
            }
            _ => FieldValue::Single(Scalar::from_yaml(v)),
        }
    }
}
