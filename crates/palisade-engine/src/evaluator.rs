//! Single-policy evaluation.
//!
//! Evaluates one policy's condition conjunction against a raw attribute map.
//! Data-shape problems (missing keys, unconvertible values) degrade the
//! policy to `NotApplicable`; only relational comparisons over unordered
//! operands surface an error.

use std::collections::HashMap;

use palisade_types::AttributeValue;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::condition::Condition;
use crate::error::OperatorError;
use crate::policy::{Effect, Policy};

// ============================================================================
// Verdict
// ============================================================================

/// The tri-state result of evaluation.
///
/// `NotApplicable` means no policy spoke; it is distinct from an explicit
/// allow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    /// At least one policy allowed and none denied.
    Allow,
    /// Some policy explicitly denied.
    Deny,
    /// No policy's conditions were satisfied.
    NotApplicable,
}

// ============================================================================
// PolicyEvaluator
// ============================================================================

/// Evaluates one policy against a raw attribute map.
#[derive(Debug, Clone, Copy, Default)]
pub struct PolicyEvaluator;

impl PolicyEvaluator {
    /// Creates a policy evaluator.
    pub fn new() -> Self {
        Self
    }

    /// Evaluates a policy against the raw attribute map.
    ///
    /// Every condition must hold for the policy's effect to apply; a policy
    /// with no conditions is vacuously satisfied. Any unmet condition,
    /// including one whose raw value fails conversion, degrades the verdict
    /// to [`Verdict::NotApplicable`].
    ///
    /// # Errors
    ///
    /// Returns [`OperatorError`] when a relational condition meets operands
    /// that carry no order. That signals a malformed policy definition and is
    /// never recovered here.
    pub fn evaluate(
        &self,
        policy: &Policy,
        attributes: &HashMap<String, AttributeValue>,
    ) -> Result<Verdict, OperatorError> {
        for condition in policy.conditions() {
            if !self.condition_met(condition, attributes)? {
                return Ok(Verdict::NotApplicable);
            }
        }
        Ok(match policy.effect() {
            Effect::Allow => Verdict::Allow,
            Effect::Deny => Verdict::Deny,
        })
    }

    fn condition_met(
        &self,
        condition: &Condition,
        attributes: &HashMap<String, AttributeValue>,
    ) -> Result<bool, OperatorError> {
        let name = condition.attribute().name();
        let null = AttributeValue::Null;
        let raw = attributes.get(name).unwrap_or(&null);

        // Absent keys and explicit nulls evaluate the same way.
        if raw.is_null() {
            return condition.evaluate(&AttributeValue::Null);
        }

        match condition.attribute().convert(raw) {
            Ok(converted) => condition.evaluate(&converted),
            Err(error) => {
                warn!(attribute = %name, %error, "condition skipped after conversion failure");
                Ok(false)
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
