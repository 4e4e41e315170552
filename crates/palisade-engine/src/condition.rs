//! Condition predicates over attribute values.
//!
//! A condition binds one [`Attribute`] to a single typed predicate. The two
//! condition shapes form a closed sum: value comparisons anchor a scalar,
//! membership tests anchor a value list. The operator/shape pairing is
//! validated at construction time, so evaluation never meets a membership
//! operator inside a value condition or vice versa.

use std::cmp::Ordering;
use std::fmt::{self, Display};

use palisade_types::AttributeValue;
use serde::{Deserialize, Serialize};

use crate::attribute::Attribute;
use crate::error::{ConstructionError, OperatorError};

// ============================================================================
// Operator
// ============================================================================

/// Comparison operator bound to a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    /// Structural equality.
    Equals,
    /// Negated structural equality.
    NotEquals,
    /// Strict relational comparison; both operands must carry an order.
    GreaterThan,
    /// Strict relational comparison; both operands must carry an order.
    LessThan,
    /// Membership in a value list.
    In,
    /// Negated membership in a value list.
    NotIn,
}

impl Operator {
    /// The membership operators, which require a value list.
    pub fn is_membership(self) -> bool {
        matches!(self, Operator::In | Operator::NotIn)
    }

    /// The relational operators, which require ordered operands.
    pub fn is_relational(self) -> bool {
        matches!(self, Operator::GreaterThan | Operator::LessThan)
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operator::Equals => "EQUALS",
            Operator::NotEquals => "NOT_EQUALS",
            Operator::GreaterThan => "GREATER_THAN",
            Operator::LessThan => "LESS_THAN",
            Operator::In => "IN",
            Operator::NotIn => "NOT_IN",
        };
        write!(f, "{name}")
    }
}

// ============================================================================
// Condition
// ============================================================================

/// A single typed predicate over one attribute's value.
#[derive(Debug, Clone)]
pub enum Condition {
    /// Comparison against a single anchored value.
    Value(ValueCondition),
    /// Membership test against a value list.
    Membership(ListCondition),
}

impl Condition {
    /// An `EQUALS` comparison.
    pub fn equals(attribute: Attribute, value: impl Into<AttributeValue>) -> Self {
        Condition::Value(ValueCondition {
            attribute,
            operator: Operator::Equals,
            value: value.into(),
        })
    }

    /// A `NOT_EQUALS` comparison.
    pub fn not_equals(attribute: Attribute, value: impl Into<AttributeValue>) -> Self {
        Condition::Value(ValueCondition {
            attribute,
            operator: Operator::NotEquals,
            value: value.into(),
        })
    }

    /// A `GREATER_THAN` comparison.
    ///
    /// # Errors
    ///
    /// Rejects a null anchor: there is no order to compare against.
    pub fn greater_than(
        attribute: Attribute,
        value: impl Into<AttributeValue>,
    ) -> Result<Self, ConstructionError> {
        ValueCondition::new(attribute, Operator::GreaterThan, value.into()).map(Condition::Value)
    }

    /// A `LESS_THAN` comparison.
    ///
    /// # Errors
    ///
    /// Rejects a null anchor: there is no order to compare against.
    pub fn less_than(
        attribute: Attribute,
        value: impl Into<AttributeValue>,
    ) -> Result<Self, ConstructionError> {
        ValueCondition::new(attribute, Operator::LessThan, value.into()).map(Condition::Value)
    }

    /// An `IN` membership test.
    pub fn is_in(attribute: Attribute, values: impl IntoIterator<Item = impl Into<AttributeValue>>) -> Self {
        Condition::Membership(ListCondition {
            attribute,
            operator: Operator::In,
            values: values.into_iter().map(Into::into).collect(),
        })
    }

    /// A `NOT_IN` membership test.
    pub fn not_in(
        attribute: Attribute,
        values: impl IntoIterator<Item = impl Into<AttributeValue>>,
    ) -> Self {
        Condition::Membership(ListCondition {
            attribute,
            operator: Operator::NotIn,
            values: values.into_iter().map(Into::into).collect(),
        })
    }

    /// The attribute this condition reads.
    pub fn attribute(&self) -> &Attribute {
        match self {
            Condition::Value(c) => &c.attribute,
            Condition::Membership(c) => &c.attribute,
        }
    }

    /// The bound operator.
    pub fn operator(&self) -> Operator {
        match self {
            Condition::Value(c) => c.operator,
            Condition::Membership(c) => c.operator,
        }
    }

    /// Evaluates this condition against a converted context value.
    ///
    /// # Errors
    ///
    /// Only relational comparisons fail, and only when the operands carry no
    /// order. Equality and membership never fail.
    pub fn evaluate(&self, context_value: &AttributeValue) -> Result<bool, OperatorError> {
        match self {
            Condition::Value(c) => c.evaluate(context_value),
            Condition::Membership(c) => Ok(c.evaluate(context_value)),
        }
    }
}

// ============================================================================
// ValueCondition
// ============================================================================

/// Comparison of a context value against a single anchored value.
#[derive(Debug, Clone)]
pub struct ValueCondition {
    attribute: Attribute,
    operator: Operator,
    value: AttributeValue,
}

impl ValueCondition {
    /// Builds a value condition, rejecting membership operators and null
    /// relational anchors.
    pub fn new(
        attribute: Attribute,
        operator: Operator,
        value: AttributeValue,
    ) -> Result<Self, ConstructionError> {
        if operator.is_membership() {
            return Err(ConstructionError::MembershipOperator { operator });
        }
        if operator.is_relational() && value.is_null() {
            return Err(ConstructionError::NullAnchor { operator });
        }
        Ok(Self {
            attribute,
            operator,
            value,
        })
    }

    /// The attribute this condition reads.
    pub fn attribute(&self) -> &Attribute {
        &self.attribute
    }

    /// The bound operator.
    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// The anchored comparison value.
    pub fn value(&self) -> &AttributeValue {
        &self.value
    }

    /// Evaluates against a converted context value.
    ///
    /// A null context value against a non-null anchor satisfies only
    /// `NOT_EQUALS`; relational operators yield `false` without attempting
    /// the comparison.
    pub fn evaluate(&self, context_value: &AttributeValue) -> Result<bool, OperatorError> {
        if context_value.is_null() && !self.value.is_null() {
            return Ok(self.operator == Operator::NotEquals);
        }
        match self.operator {
            Operator::Equals => Ok(context_value == &self.value),
            Operator::NotEquals => Ok(context_value != &self.value),
            Operator::GreaterThan => Ok(self.order(context_value)? == Ordering::Greater),
            Operator::LessThan => Ok(self.order(context_value)? == Ordering::Less),
            Operator::In | Operator::NotIn => {
                unreachable!("construction rejects membership operators on value conditions")
            }
        }
    }

    fn order(&self, context_value: &AttributeValue) -> Result<Ordering, OperatorError> {
        context_value
            .try_compare(&self.value)
            .ok_or_else(|| OperatorError {
                operator: self.operator,
                context: context_value.kind(),
                anchor: self.value.kind(),
            })
    }
}

// ============================================================================
// ListCondition
// ============================================================================

/// Membership test of a context value against an anchored value list.
///
/// The list may be empty and may contain nulls.
#[derive(Debug, Clone)]
pub struct ListCondition {
    attribute: Attribute,
    operator: Operator,
    values: Vec<AttributeValue>,
}

impl ListCondition {
    /// Builds a membership condition, rejecting scalar comparison operators.
    pub fn new(
        attribute: Attribute,
        operator: Operator,
        values: Vec<AttributeValue>,
    ) -> Result<Self, ConstructionError> {
        if !operator.is_membership() {
            return Err(ConstructionError::ScalarOperator { operator });
        }
        Ok(Self {
            attribute,
            operator,
            values,
        })
    }

    /// The attribute this condition reads.
    pub fn attribute(&self) -> &Attribute {
        &self.attribute
    }

    /// The bound operator.
    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// The anchored value list.
    pub fn values(&self) -> &[AttributeValue] {
        &self.values
    }

    /// Evaluates against a converted context value.
    ///
    /// A null context value is in no list (`IN` false, `NOT_IN` true). A
    /// sequence context value tests for intersection: any of its elements
    /// appearing in the anchored list counts as membership.
    pub fn evaluate(&self, context_value: &AttributeValue) -> bool {
        if context_value.is_null() {
            return self.operator == Operator::NotIn;
        }
        let contains = match context_value {
            AttributeValue::List(items) => items.iter().any(|item| self.values.contains(item)),
            scalar => self.values.contains(scalar),
        };
        match self.operator {
            Operator::In => contains,
            Operator::NotIn => !contains,
            _ => unreachable!("construction rejects scalar operators on membership conditions"),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
