//! Kani proofs for policy evaluation
//!
//! These proofs verify correctness properties of the evaluation pipeline
//! using bounded model checking.
//!
//! Run with: `cargo kani --tests --harness verify_*`

#[cfg(kani)]
use std::collections::HashMap;

#[cfg(kani)]
use palisade_types::AttributeValue;

#[cfg(kani)]
use crate::attribute::Attribute;
#[cfg(kani)]
use crate::condition::Condition;
#[cfg(kani)]
use crate::context::{ContextEvaluator, EvaluationContext, InMemoryPolicySource};
#[cfg(kani)]
use crate::evaluator::{PolicyEvaluator, Verdict};
#[cfg(kani)]
use crate::policy::{Effect, Policy};

/// Proof: evaluation determinism
///
/// **Property**: Same inputs always produce the same verdict
#[cfg(kani)]
#[kani::proof]
#[kani::unwind(10)]
fn verify_evaluation_determinism() {
    let policy = Policy::builder("p1", Effect::Allow)
        .condition(Condition::equals(Attribute::text("resource"), "document1"))
        .build();
    let source = InMemoryPolicySource::new(vec![policy]);

    let mut attributes = HashMap::new();
    attributes.insert("resource".to_string(), AttributeValue::from("document1"));

    let context = EvaluationContext::new(["read"], attributes, &source).unwrap();
    let evaluator = ContextEvaluator::new(PolicyEvaluator::new());

    let first = evaluator.evaluate(&context).unwrap();
    let second = evaluator.evaluate(&context).unwrap();

    // Postcondition: identical verdicts
    assert_eq!(first, second);
}

/// Proof: deny-override precedence
///
/// **Property**: When an allow policy and a deny policy both apply, the
/// combined verdict is Deny regardless of list position
#[cfg(kani)]
#[kani::proof]
#[kani::unwind(10)]
fn verify_deny_override() {
    let allow = Policy::builder("p-allow", Effect::Allow)
        .condition(Condition::equals(Attribute::text("resource"), "document1"))
        .build();
    let deny = Policy::builder("p-deny", Effect::Deny)
        .condition(Condition::equals(Attribute::text("resource"), "document1"))
        .build();

    let mut attributes = HashMap::new();
    attributes.insert("resource".to_string(), AttributeValue::from("document1"));

    let evaluator = ContextEvaluator::new(PolicyEvaluator::new());

    let allow_first = InMemoryPolicySource::new(vec![allow.clone(), deny.clone()]);
    let deny_first = InMemoryPolicySource::new(vec![deny, allow]);

    let context = EvaluationContext::new(["read"], attributes.clone(), &allow_first).unwrap();
    assert_eq!(evaluator.evaluate(&context).unwrap(), Verdict::Deny);

    let context = EvaluationContext::new(["read"], attributes, &deny_first).unwrap();
    assert_eq!(evaluator.evaluate(&context).unwrap(), Verdict::Deny);
}

/// Proof: undeclared actions never reach the policy source
///
/// **Property**: `evaluate_for_action` on an undeclared action is
/// NotApplicable even when every supplied policy would deny
#[cfg(kani)]
#[kani::proof]
#[kani::unwind(10)]
fn verify_undeclared_action_short_circuit() {
    let deny_all = Policy::builder("deny-all", Effect::Deny).build();
    let source = InMemoryPolicySource::new(vec![deny_all]);

    let context = EvaluationContext::new(["read"], HashMap::new(), &source).unwrap();
    let evaluator = ContextEvaluator::new(PolicyEvaluator::new());

    let verdict = evaluator.evaluate_for_action(&context, "delete").unwrap();
    assert_eq!(verdict, Verdict::NotApplicable);
}
