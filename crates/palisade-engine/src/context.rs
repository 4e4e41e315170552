//! Evaluation contexts and multi-policy combination.
//!
//! An [`EvaluationContext`] is a per-request snapshot: the requested actions,
//! the raw attribute map, and the [`PolicySource`] consulted during
//! evaluation. The [`ContextEvaluator`] folds per-policy verdicts with
//! deny-override semantics: DENY dominates ALLOW dominates NOT_APPLICABLE,
//! independent of policy order.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use palisade_types::AttributeValue;
use tracing::debug;

use crate::error::{ConstructionError, OperatorError};
use crate::evaluator::{PolicyEvaluator, Verdict};
use crate::policy::Policy;

// ============================================================================
// PolicySource
// ============================================================================

/// Supplies the policies applicable to an evaluation.
///
/// Implemented by whatever holds the policy set (an in-memory table, a cache
/// in front of an admin service, a per-tenant registry). The engine only ever
/// reads.
pub trait PolicySource {
    /// All applicable policies, in evaluation order.
    fn policies(&self) -> Vec<Policy>;

    /// Policies scoped to one action.
    ///
    /// Sources that do not index by action fall back to the unscoped set.
    fn policies_for_action(&self, action: &str) -> Vec<Policy> {
        let _ = action;
        self.policies()
    }
}

/// A [`PolicySource`] backed by in-memory policy lists.
///
/// Holds a flat list plus an optional per-action index. Actions without an
/// index entry fall back to the flat list, matching the default source
/// contract.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPolicySource {
    policies: Vec<Policy>,
    by_action: HashMap<String, Vec<Policy>>,
}

impl InMemoryPolicySource {
    /// Creates a source over a flat policy list.
    pub fn new(policies: Vec<Policy>) -> Self {
        Self {
            policies,
            by_action: HashMap::new(),
        }
    }

    /// Scopes a policy list to one action.
    pub fn with_action_policies(
        mut self,
        action: impl Into<String>,
        policies: Vec<Policy>,
    ) -> Self {
        self.by_action.insert(action.into(), policies);
        self
    }
}

impl PolicySource for InMemoryPolicySource {
    fn policies(&self) -> Vec<Policy> {
        self.policies.clone()
    }

    fn policies_for_action(&self, action: &str) -> Vec<Policy> {
        self.by_action
            .get(action)
            .cloned()
            .unwrap_or_else(|| self.policies.clone())
    }
}

// ============================================================================
// EvaluationContext
// ============================================================================

/// Per-request evaluation snapshot.
///
/// Created per request and discarded after evaluation. The action set is
/// non-empty and duplicate-free; attribute values stay raw until a condition's
/// attribute converts them.
pub struct EvaluationContext<'a> {
    actions: BTreeSet<String>,
    attributes: HashMap<String, AttributeValue>,
    source: &'a dyn PolicySource,
}

impl<'a> EvaluationContext<'a> {
    /// Builds a context from the requested actions, the raw attribute map,
    /// and the policy source.
    ///
    /// # Errors
    ///
    /// Rejects an empty action set and blank action names.
    pub fn new(
        actions: impl IntoIterator<Item = impl Into<String>>,
        attributes: HashMap<String, AttributeValue>,
        source: &'a dyn PolicySource,
    ) -> Result<Self, ConstructionError> {
        let actions: BTreeSet<String> = actions.into_iter().map(Into::into).collect();
        if actions.is_empty() {
            return Err(ConstructionError::NoActions);
        }
        if actions.iter().any(|action| action.trim().is_empty()) {
            return Err(ConstructionError::EmptyAction);
        }
        Ok(Self {
            actions,
            attributes,
            source,
        })
    }

    /// The declared actions.
    pub fn actions(&self) -> &BTreeSet<String> {
        &self.actions
    }

    /// Whether an action was declared on this context.
    pub fn has_action(&self, action: &str) -> bool {
        self.actions.contains(action)
    }

    /// Looks up a raw attribute value.
    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }

    /// The raw attribute map.
    pub fn attributes(&self) -> &HashMap<String, AttributeValue> {
        &self.attributes
    }

    /// All applicable policies from the source.
    pub fn policies(&self) -> Vec<Policy> {
        self.source.policies()
    }

    /// Policies scoped to one action.
    pub fn policies_for_action(&self, action: &str) -> Vec<Policy> {
        self.source.policies_for_action(action)
    }
}

impl fmt::Debug for EvaluationContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvaluationContext")
            .field("actions", &self.actions)
            .field("attributes", &self.attributes)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// ContextEvaluator
// ============================================================================

/// Combines per-policy verdicts across one or many actions.
///
/// The fold is deny-override: the first DENY wins immediately; otherwise any
/// ALLOW wins over NOT_APPLICABLE. Scanning order moves the short-circuit
/// point but never the final verdict.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextEvaluator {
    evaluator: PolicyEvaluator,
}

impl ContextEvaluator {
    /// Creates a context evaluator over the given policy evaluator.
    pub fn new(evaluator: PolicyEvaluator) -> Self {
        Self { evaluator }
    }

    /// Evaluates all policies applicable to the context, unfiltered.
    ///
    /// An empty policy list is immediately [`Verdict::NotApplicable`].
    ///
    /// # Errors
    ///
    /// Propagates [`OperatorError`] from any malformed relational condition.
    pub fn evaluate(&self, context: &EvaluationContext<'_>) -> Result<Verdict, OperatorError> {
        let policies = context.policies();
        if policies.is_empty() {
            debug!(actions = ?context.actions(), "no policies applicable");
            return Ok(Verdict::NotApplicable);
        }
        debug!(
            policies = policies.len(),
            actions = ?context.actions(),
            "evaluating policies"
        );
        self.combine(&policies, context)
    }

    /// Evaluates the policies scoped to one action.
    ///
    /// An action not declared on the context is [`Verdict::NotApplicable`]
    /// without consulting the policy source.
    ///
    /// # Errors
    ///
    /// Propagates [`OperatorError`] from any malformed relational condition.
    pub fn evaluate_for_action(
        &self,
        context: &EvaluationContext<'_>,
        action: &str,
    ) -> Result<Verdict, OperatorError> {
        if !context.has_action(action) {
            debug!(%action, declared = ?context.actions(), "action not declared on context");
            return Ok(Verdict::NotApplicable);
        }
        let policies = context.policies_for_action(action);
        if policies.is_empty() {
            debug!(%action, "no policies for action");
            return Ok(Verdict::NotApplicable);
        }
        debug!(policies = policies.len(), %action, "evaluating policies for action");
        self.combine(&policies, context)
    }

    /// Evaluates every declared action independently.
    ///
    /// # Errors
    ///
    /// Propagates [`OperatorError`] from any malformed relational condition.
    pub fn evaluate_all_actions(
        &self,
        context: &EvaluationContext<'_>,
    ) -> Result<HashMap<String, Verdict>, OperatorError> {
        let mut results = HashMap::with_capacity(context.actions().len());
        for action in context.actions() {
            let verdict = self.evaluate_for_action(context, action)?;
            results.insert(action.clone(), verdict);
        }
        Ok(results)
    }

    fn combine(
        &self,
        policies: &[Policy],
        context: &EvaluationContext<'_>,
    ) -> Result<Verdict, OperatorError> {
        let mut any_allow = false;
        for policy in policies {
            let verdict = self.evaluator.evaluate(policy, context.attributes())?;
            debug!(policy = %policy.display_name(), ?verdict, "policy evaluated");
            match verdict {
                // An explicit DENY takes precedence over everything else.
                Verdict::Deny => return Ok(Verdict::Deny),
                Verdict::Allow => any_allow = true,
                Verdict::NotApplicable => {}
            }
        }
        Ok(if any_allow {
            Verdict::Allow
        } else {
            Verdict::NotApplicable
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::Attribute;
    use crate::condition::Condition;
    use crate::policy::Effect;

    fn resource_policy(id: &str, resource: &str, effect: Effect) -> Policy {
        Policy::builder(id, effect)
            .condition(Condition::equals(Attribute::text("resource"), resource))
            .build()
    }

    fn attributes(entries: &[(&str, AttributeValue)]) -> HashMap<String, AttributeValue> {
        entries
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    fn evaluator() -> ContextEvaluator {
        ContextEvaluator::new(PolicyEvaluator::new())
    }

    #[test]
    fn test_single_allow_policy() {
        let source =
            InMemoryPolicySource::new(vec![resource_policy("p1", "document1", Effect::Allow)]);
        let context = EvaluationContext::new(
            ["read"],
            attributes(&[("resource", "document1".into())]),
            &source,
        )
        .expect("valid context");

        assert_eq!(evaluator().evaluate(&context), Ok(Verdict::Allow));
    }

    #[test]
    fn test_no_policies_is_not_applicable() {
        let source = InMemoryPolicySource::default();
        let context = EvaluationContext::new(
            ["read"],
            attributes(&[("resource", "document1".into())]),
            &source,
        )
        .expect("valid context");

        assert_eq!(evaluator().evaluate(&context), Ok(Verdict::NotApplicable));
    }

    #[test]
    fn test_deny_takes_precedence_over_allow() {
        let allow = resource_policy("p-allow", "document1", Effect::Allow);
        let deny = Policy::builder("p-deny", Effect::Deny)
            .condition(
                Condition::less_than(Attribute::integer("age"), 18).expect("non-null anchor"),
            )
            .build();
        let source = InMemoryPolicySource::new(vec![allow, deny]);
        let context = EvaluationContext::new(
            ["read"],
            attributes(&[("resource", "document1".into()), ("age", 17.into())]),
            &source,
        )
        .expect("valid context");

        assert_eq!(evaluator().evaluate(&context), Ok(Verdict::Deny));
    }

    #[test]
    fn test_deny_wins_regardless_of_position() {
        let deny = resource_policy("p-deny", "document1", Effect::Deny);
        let allow_a = resource_policy("p-a", "document1", Effect::Allow);
        let allow_b = resource_policy("p-b", "document1", Effect::Allow);
        let attrs = attributes(&[("resource", "document1".into())]);

        for policies in [
            vec![deny.clone(), allow_a.clone(), allow_b.clone()],
            vec![allow_a.clone(), deny.clone(), allow_b.clone()],
            vec![allow_a, allow_b, deny],
        ] {
            let source = InMemoryPolicySource::new(policies);
            let context =
                EvaluationContext::new(["read"], attrs.clone(), &source).expect("valid context");
            assert_eq!(evaluator().evaluate(&context), Ok(Verdict::Deny));
        }
    }

    #[test]
    fn test_allow_with_not_applicable_policies() {
        let allow = resource_policy("p-allow", "document1", Effect::Allow);
        let not_applicable = resource_policy("p-na", "document2", Effect::Allow);
        let source = InMemoryPolicySource::new(vec![not_applicable, allow]);
        let context = EvaluationContext::new(
            ["read"],
            attributes(&[("resource", "document1".into())]),
            &source,
        )
        .expect("valid context");

        assert_eq!(evaluator().evaluate(&context), Ok(Verdict::Allow));
    }

    #[test]
    fn test_unsatisfied_deny_does_not_deny() {
        // A deny policy whose conditions do not hold is NOT_APPLICABLE, not a
        // standing denial.
        let deny = resource_policy("p-deny", "document2", Effect::Deny);
        let source = InMemoryPolicySource::new(vec![deny]);
        let context = EvaluationContext::new(
            ["read"],
            attributes(&[("resource", "document1".into())]),
            &source,
        )
        .expect("valid context");

        assert_eq!(evaluator().evaluate(&context), Ok(Verdict::NotApplicable));
    }

    #[test]
    fn test_evaluate_for_action_scopes_policies() {
        let read_allow = resource_policy("p-read", "document1", Effect::Allow);
        let write_deny = resource_policy("p-write", "document1", Effect::Deny);
        let source = InMemoryPolicySource::default()
            .with_action_policies("read", vec![read_allow])
            .with_action_policies("write", vec![write_deny]);
        let context = EvaluationContext::new(
            ["read", "write"],
            attributes(&[("resource", "document1".into())]),
            &source,
        )
        .expect("valid context");
        let evaluator = evaluator();

        assert_eq!(
            evaluator.evaluate_for_action(&context, "read"),
            Ok(Verdict::Allow)
        );
        assert_eq!(
            evaluator.evaluate_for_action(&context, "write"),
            Ok(Verdict::Deny)
        );
    }

    #[test]
    fn test_undeclared_action_is_not_applicable_without_evaluation() {
        // The source would deny everything, but the undeclared action never
        // reaches it.
        let source =
            InMemoryPolicySource::new(vec![Policy::builder("deny-all", Effect::Deny).build()]);
        let context = EvaluationContext::new(
            ["read"],
            attributes(&[("resource", "document1".into())]),
            &source,
        )
        .expect("valid context");

        assert_eq!(
            evaluator().evaluate_for_action(&context, "delete"),
            Ok(Verdict::NotApplicable)
        );
    }

    #[test]
    fn test_unindexed_action_falls_back_to_flat_list() {
        let source =
            InMemoryPolicySource::new(vec![resource_policy("p1", "document1", Effect::Allow)]);
        let context = EvaluationContext::new(
            ["read"],
            attributes(&[("resource", "document1".into())]),
            &source,
        )
        .expect("valid context");

        assert_eq!(
            evaluator().evaluate_for_action(&context, "read"),
            Ok(Verdict::Allow)
        );
    }

    #[test]
    fn test_evaluate_all_actions_is_independent_per_action() {
        let resource_cond = Condition::equals(Attribute::text("resource"), "document1");
        let read_policy = Policy::builder("p-read", Effect::Allow)
            .condition(resource_cond.clone())
            .build();
        let write_policy = Policy::builder("p-write", Effect::Deny)
            .condition(resource_cond)
            .build();
        let source = InMemoryPolicySource::default()
            .with_action_policies("read", vec![read_policy])
            .with_action_policies("write", vec![write_policy])
            .with_action_policies("delete", Vec::new());
        let context = EvaluationContext::new(
            ["read", "write", "delete"],
            attributes(&[("resource", "document1".into())]),
            &source,
        )
        .expect("valid context");

        let results = evaluator()
            .evaluate_all_actions(&context)
            .expect("no malformed conditions");
        assert_eq!(results.len(), 3);
        assert_eq!(results.get("read"), Some(&Verdict::Allow));
        assert_eq!(results.get("write"), Some(&Verdict::Deny));
        assert_eq!(results.get("delete"), Some(&Verdict::NotApplicable));
    }

    #[test]
    fn test_context_rejects_empty_action_set() {
        let source = InMemoryPolicySource::default();
        let err = EvaluationContext::new(Vec::<String>::new(), HashMap::new(), &source)
            .expect_err("empty action set");
        assert_eq!(err, ConstructionError::NoActions);
    }

    #[test]
    fn test_context_rejects_blank_action_names() {
        let source = InMemoryPolicySource::default();
        let err = EvaluationContext::new(["read", "  "], HashMap::new(), &source)
            .expect_err("blank action name");
        assert_eq!(err, ConstructionError::EmptyAction);
    }

    #[test]
    fn test_context_deduplicates_actions() {
        let source = InMemoryPolicySource::default();
        let context = EvaluationContext::new(["read", "read", "write"], HashMap::new(), &source)
            .expect("valid context");
        assert_eq!(context.actions().len(), 2);
        assert!(context.has_action("read"));
        assert!(context.has_action("write"));
        assert!(!context.has_action("delete"));
    }

    #[test]
    fn test_operator_error_propagates_through_combination() {
        let malformed = Policy::builder("p-bad", Effect::Allow)
            .condition(
                Condition::less_than(Attribute::text("role"), 10).expect("non-null anchor"),
            )
            .build();
        let source = InMemoryPolicySource::new(vec![malformed]);
        let context = EvaluationContext::new(
            ["read"],
            attributes(&[("role", "admin".into())]),
            &source,
        )
        .expect("valid context");

        assert!(evaluator().evaluate(&context).is_err());
    }
}
