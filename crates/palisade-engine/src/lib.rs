//! # palisade-engine: Attribute-Based Access Control evaluation
//!
//! Evaluates declarative ABAC policies against a per-request context and
//! produces a tri-state verdict. Evaluation is a pure computation over
//! immutable configuration: no I/O, no blocking, no shared mutable state.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  EvaluationContext                            │
//! │  (actions + raw attributes + policy source)   │
//! └─────────────────┬────────────────────────────┘
//!                   │
//!                   ▼
//! ┌──────────────────────────────────────────────┐
//! │  ContextEvaluator                             │
//! │  ├─ Fetch applicable policies                 │
//! │  ├─ PolicyEvaluator per policy                │
//! │  │   ├─ Attribute conversion per condition    │
//! │  │   └─ Condition predicates (conjunction)    │
//! │  └─ Deny-override fold                        │
//! └─────────────────┬────────────────────────────┘
//!                   │
//!                   ▼
//! ┌──────────────────────────────────────────────┐
//! │  Verdict: Allow / Deny / NotApplicable        │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use std::collections::HashMap;
//!
//! use palisade_engine::{
//!     Attribute, Condition, ContextEvaluator, Effect, EvaluationContext,
//!     InMemoryPolicySource, Policy, PolicyEvaluator, Verdict,
//! };
//! use palisade_types::AttributeValue;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let policy = Policy::builder("doc1-readers", Effect::Allow)
//!     .condition(Condition::equals(Attribute::text("resource"), "document1"))
//!     .build();
//! let source = InMemoryPolicySource::new(vec![policy]);
//!
//! let mut attributes = HashMap::new();
//! attributes.insert("resource".to_string(), AttributeValue::from("document1"));
//!
//! let context = EvaluationContext::new(["read"], attributes, &source)?;
//! let verdict = ContextEvaluator::new(PolicyEvaluator::new()).evaluate(&context)?;
//! assert_eq!(verdict, Verdict::Allow);
//! # Ok(())
//! # }
//! ```

pub mod attribute;
pub mod condition;
pub mod context;
pub mod error;
pub mod evaluator;
pub mod policy;

// Kani proofs for bounded model checking
#[cfg(any(test, kani))]
mod kani_proofs;


pub use attribute::{Attribute, AttributeType, Validator};
pub use condition::{Condition, ListCondition, Operator, ValueCondition};
pub use context::{ContextEvaluator, EvaluationContext, InMemoryPolicySource, PolicySource};
pub use error::{ConstructionError, ConversionError, OperatorError};
pub use evaluator::{PolicyEvaluator, Verdict};
pub use policy::{Effect, Policy, PolicyBuilder};
