//! # Palisade
//!
//! Deterministic attribute-based access control decisions.
//!
//! Palisade evaluates declarative policies against a per-request context and
//! answers with a tri-state [`Verdict`]: `Allow`, `Deny`, or `NotApplicable`.
//! It is built for authorization checkpoints: API gateways and service
//! middlewares that hold a policy set and need a side-effect-free decision
//! function:
//!
//! - **Deny-override** - Any applicable deny supersedes every allow
//! - **Typed attributes** - Raw context values normalize through declared
//!   attribute types before predicates see them
//! - **Graceful degradation** - Data-shape problems never fail a request;
//!   they degrade the owning policy to `NotApplicable`
//! - **Share-freely** - Policies are immutable after assembly and safe to
//!   evaluate from many threads at once
//!
//! # Quick Start
//!
//! ```
//! use std::collections::HashMap;
//!
//! use palisade::{
//!     Attribute, AttributeValue, Condition, ContextEvaluator, Effect,
//!     EvaluationContext, InMemoryPolicySource, Policy, PolicyEvaluator, Verdict,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Readers may open document1; minors are denied everything.
//! let readers = Policy::builder("doc1-readers", Effect::Allow)
//!     .description("Readers may open document1")
//!     .condition(Condition::equals(Attribute::text("resource"), "document1"))
//!     .build();
//! let minors = Policy::builder("deny-minors", Effect::Deny)
//!     .condition(Condition::less_than(Attribute::integer("age"), 18)?)
//!     .build();
//!
//! let source = InMemoryPolicySource::new(vec![readers, minors]);
//!
//! let mut attributes = HashMap::new();
//! attributes.insert("resource".to_string(), AttributeValue::from("document1"));
//! attributes.insert("age".to_string(), AttributeValue::from(17));
//!
//! let context = EvaluationContext::new(["read"], attributes, &source)?;
//! let evaluator = ContextEvaluator::new(PolicyEvaluator::new());
//!
//! // The deny policy applies, so deny-override wins over the allow.
//! assert_eq!(evaluator.evaluate(&context)?, Verdict::Deny);
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - **Values**: [`AttributeValue`], [`ValueKind`] - the tagged value model
//! - **Model**: [`Attribute`], [`Condition`], [`Policy`] - immutable
//!   configuration assembled at definition time
//! - **Evaluation**: [`PolicyEvaluator`], [`ContextEvaluator`] - the pure
//!   decision pipeline

pub use palisade_engine::{
    Attribute, AttributeType, Condition, ConstructionError, ContextEvaluator, ConversionError,
    Effect, EvaluationContext, InMemoryPolicySource, ListCondition, Operator, OperatorError,
    Policy, PolicyBuilder, PolicyEvaluator, PolicySource, Validator, ValueCondition, Verdict,
};
pub use palisade_types::{AttributeValue, ValueKind};
