//! Policy definitions.
//!
//! A policy is an effect plus an ordered conjunction of conditions. Policies
//! are assembled through [`PolicyBuilder`] and immutable afterwards, so one
//! policy set can serve many concurrent evaluations without synchronization.

use serde::{Deserialize, Serialize};

use crate::condition::Condition;

// ============================================================================
// Effect
// ============================================================================

/// The outcome a policy produces when all of its conditions hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Effect {
    /// Grant access.
    Allow,
    /// Deny access.
    Deny,
}

impl Default for Effect {
    /// Defaults to `Deny` (safe default: deny unless explicitly allowed).
    fn default() -> Self {
        Self::Deny
    }
}

// ============================================================================
// Policy
// ============================================================================

/// An immutable access-control policy.
///
/// Conditions form an implicit conjunction; their order is irrelevant to the
/// result but fixed for deterministic evaluation cost.
#[derive(Debug, Clone)]
pub struct Policy {
    id: String,
    name: Option<String>,
    description: String,
    conditions: Vec<Condition>,
    effect: Effect,
}

impl Policy {
    /// Starts assembling a policy with the given id and effect.
    pub fn builder(id: impl Into<String>, effect: Effect) -> PolicyBuilder {
        PolicyBuilder {
            id: id.into(),
            name: None,
            description: String::new(),
            conditions: Vec::new(),
            effect,
        }
    }

    /// The policy's unique identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The optional display name.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The display name, falling back to the id when no name is set.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    /// Free-form description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The conditions, in evaluation order.
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// The effect applied when every condition holds.
    pub fn effect(&self) -> Effect {
        self.effect
    }
}

// ============================================================================
// PolicyBuilder
// ============================================================================

/// Builder producing an immutable [`Policy`].
#[derive(Debug)]
pub struct PolicyBuilder {
    id: String,
    name: Option<String>,
    description: String,
    conditions: Vec<Condition>,
    effect: Effect,
}

impl PolicyBuilder {
    /// Sets the display name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Appends one condition.
    pub fn condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Appends several conditions, preserving their order.
    pub fn conditions(mut self, conditions: impl IntoIterator<Item = Condition>) -> Self {
        self.conditions.extend(conditions);
        self
    }

    /// Finalizes the policy.
    pub fn build(self) -> Policy {
        Policy {
            id: self.id,
            name: self.name,
            description: self.description,
            conditions: self.conditions,
            effect: self.effect,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
