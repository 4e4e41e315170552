//! # palisade-types: Core value model for Palisade
//!
//! This crate contains the tagged runtime value shared across the Palisade
//! policy engine:
//! - Attribute values ([`AttributeValue`])
//! - Value kind tags ([`ValueKind`])
//!
//! Context data enters the engine untyped. Every raw value is carried as an
//! [`AttributeValue`] and normalized by an attribute definition before any
//! predicate sees it, so the scalar-vs-sequence distinction is always an
//! explicit branch on the value tag rather than runtime type inspection.

use std::cmp::Ordering;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

// ============================================================================
// AttributeValue
// ============================================================================

/// A tagged runtime value.
///
/// Raw context entries and condition operands are all `AttributeValue`s.
///
/// Note: `Real` equality is by bit pattern (`NaN == NaN`), matching the total
/// ordering used for comparisons.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub enum AttributeValue {
    /// Absent or explicit null.
    #[default]
    Null,
    /// Boolean value.
    Boolean(bool),
    /// 64-bit signed integer.
    Integer(i64),
    /// 64-bit floating point (IEEE 754 double precision).
    Real(f64),
    /// UTF-8 text.
    Text(String),
    /// Canonical enumeration member name, produced by enum-typed attributes.
    ///
    /// `Symbol("ADMIN")` and `Text("ADMIN")` are distinct values.
    Symbol(String),
    /// Ordered sequence of values.
    List(Vec<AttributeValue>),
}

impl PartialEq for AttributeValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (AttributeValue::Null, AttributeValue::Null) => true,
            (AttributeValue::Boolean(a), AttributeValue::Boolean(b)) => a == b,
            (AttributeValue::Integer(a), AttributeValue::Integer(b)) => a == b,
            (AttributeValue::Real(a), AttributeValue::Real(b)) => {
                // Bit equality keeps NaN == NaN, consistent with total ordering
                a.to_bits() == b.to_bits()
            }
            (AttributeValue::Text(a), AttributeValue::Text(b)) => a == b,
            (AttributeValue::Symbol(a), AttributeValue::Symbol(b)) => a == b,
            (AttributeValue::List(a), AttributeValue::List(b)) => a == b,
            _ => false, // Different kinds are never equal
        }
    }
}

impl Eq for AttributeValue {}

impl AttributeValue {
    /// Returns `true` for [`AttributeValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, AttributeValue::Null)
    }

    /// Returns the kind tag of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            AttributeValue::Null => ValueKind::Null,
            AttributeValue::Boolean(_) => ValueKind::Boolean,
            AttributeValue::Integer(_) => ValueKind::Integer,
            AttributeValue::Real(_) => ValueKind::Real,
            AttributeValue::Text(_) => ValueKind::Text,
            AttributeValue::Symbol(_) => ValueKind::Symbol,
            AttributeValue::List(_) => ValueKind::List,
        }
    }

    /// Compares two values when both belong to an ordered kind.
    ///
    /// Returns `Some` only for same-kind pairs of `Integer`, `Real`, `Text`,
    /// or `Symbol`. `Real` uses IEEE 754 total ordering so every pair of
    /// reals is comparable. `Boolean`, `List`, `Null`, and any cross-kind
    /// pair are incomparable and yield `None`.
    pub fn try_compare(&self, other: &AttributeValue) -> Option<Ordering> {
        match (self, other) {
            (AttributeValue::Integer(a), AttributeValue::Integer(b)) => Some(a.cmp(b)),
            (AttributeValue::Real(a), AttributeValue::Real(b)) => Some(a.total_cmp(b)),
            (AttributeValue::Text(a), AttributeValue::Text(b)) => Some(a.cmp(b)),
            (AttributeValue::Symbol(a), AttributeValue::Symbol(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl Display for AttributeValue {
    /// Renders the canonical string form used by text coercion.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Null => write!(f, "null"),
            AttributeValue::Boolean(v) => write!(f, "{v}"),
            AttributeValue::Integer(v) => write!(f, "{v}"),
            AttributeValue::Real(v) => write!(f, "{v}"),
            AttributeValue::Text(s) | AttributeValue::Symbol(s) => write!(f, "{s}"),
            AttributeValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<bool> for AttributeValue {
    fn from(v: bool) -> Self {
        AttributeValue::Boolean(v)
    }
}

impl From<i32> for AttributeValue {
    fn from(v: i32) -> Self {
        AttributeValue::Integer(i64::from(v))
    }
}

impl From<i64> for AttributeValue {
    fn from(v: i64) -> Self {
        AttributeValue::Integer(v)
    }
}

impl From<f64> for AttributeValue {
    fn from(v: f64) -> Self {
        AttributeValue::Real(v)
    }
}

impl From<&str> for AttributeValue {
    fn from(v: &str) -> Self {
        AttributeValue::Text(v.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(v: String) -> Self {
        AttributeValue::Text(v)
    }
}

impl From<Vec<AttributeValue>> for AttributeValue {
    fn from(v: Vec<AttributeValue>) -> Self {
        AttributeValue::List(v)
    }
}

impl<T: Into<AttributeValue>> From<Option<T>> for AttributeValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(AttributeValue::Null, Into::into)
    }
}

// ============================================================================
// ValueKind
// ============================================================================

/// The kind tag of an [`AttributeValue`], without its payload.
///
/// Used in error messages and ordering checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    /// Absent or explicit null.
    Null,
    /// Boolean value.
    Boolean,
    /// 64-bit signed integer.
    Integer,
    /// 64-bit floating point.
    Real,
    /// UTF-8 text.
    Text,
    /// Enumeration member.
    Symbol,
    /// Ordered sequence.
    List,
}

impl ValueKind {
    /// Whether values of this kind carry a total order.
    pub fn is_ordered(self) -> bool {
        matches!(
            self,
            ValueKind::Integer | ValueKind::Real | ValueKind::Text | ValueKind::Symbol
        )
    }
}

impl Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Null => "null",
            ValueKind::Boolean => "boolean",
            ValueKind::Integer => "integer",
            ValueKind::Real => "real",
            ValueKind::Text => "text",
            ValueKind::Symbol => "symbol",
            ValueKind::List => "list",
        };
        write!(f, "{name}")
    }
}

// ============================================================================
// Tests
// ============================================================================
