//! Error taxonomy for policy assembly and evaluation.
//!
//! Three failure classes with different lifetimes:
//! - [`ConstructionError`]: rejected at policy-assembly time, before any
//!   evaluation can observe the defect.
//! - [`ConversionError`]: a data-shape problem in one context value,
//!   recovered inside the evaluator by treating the owning condition as
//!   unsatisfied.
//! - [`OperatorError`]: a relational comparison over operands that carry no
//!   order. Propagates out of evaluation uncaught.

use std::num::ParseIntError;

use palisade_types::ValueKind;
use thiserror::Error;

use crate::condition::Operator;

/// A condition or context assembled in an invalid shape.
///
/// These indicate programming or configuration defects and never reach
/// evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstructionError {
    /// A value condition was built with a membership operator.
    #[error("{operator} requires a value list; build a membership condition instead")]
    MembershipOperator { operator: Operator },

    /// A membership condition was built with a scalar comparison operator.
    #[error("membership conditions only support IN and NOT_IN, got {operator}")]
    ScalarOperator { operator: Operator },

    /// A relational comparison anchored to a null value.
    #[error("{operator} cannot be anchored to a null value")]
    NullAnchor { operator: Operator },

    /// An evaluation context declared no actions.
    #[error("evaluation context requires at least one action")]
    NoActions,

    /// An evaluation context declared a blank action name.
    #[error("action names must be non-empty")]
    EmptyAction,
}

/// A raw context value could not be coerced to an attribute's type, or the
/// coerced value failed the attribute's validator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// The raw value's shape does not fit the attribute's type.
    #[error("cannot convert {value} to {target} for attribute '{attribute}'")]
    TypeMismatch {
        attribute: String,
        target: &'static str,
        value: String,
    },

    /// Text that does not parse as a base-10 integer.
    #[error("'{value}' does not parse as a base-10 integer for attribute '{attribute}'")]
    UnparsableInteger {
        attribute: String,
        value: String,
        #[source]
        source: ParseIntError,
    },

    /// No enumeration member matched the raw value.
    #[error("no member '{value}' in enumeration '{attribute}'")]
    UnknownMember { attribute: String, value: String },

    /// The converted value failed the attribute's validator.
    #[error("value {value} is not valid for attribute '{attribute}'")]
    Rejected { attribute: String, value: String },
}

/// A relational operator met operands that cannot be ordered.
///
/// Signals a policy authored with an incompatible attribute/operator pairing;
/// fix the policy definition rather than masking this at evaluation time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{operator} requires ordered operands, got {context} and {anchor}")]
pub struct OperatorError {
    /// The relational operator that was attempted.
    pub operator: Operator,
    /// Kind of the converted context value.
    pub context: ValueKind,
    /// Kind of the condition's anchored value.
    pub anchor: ValueKind,
}
