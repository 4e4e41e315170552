//! End-to-end decision scenarios through the public API.

use std::collections::HashMap;

use palisade::{
    Attribute, AttributeValue, Condition, ContextEvaluator, Effect, EvaluationContext,
    InMemoryPolicySource, Policy, PolicyEvaluator, PolicySource, Verdict,
};

fn evaluator() -> ContextEvaluator {
    ContextEvaluator::new(PolicyEvaluator::new())
}

fn attributes(entries: &[(&str, AttributeValue)]) -> HashMap<String, AttributeValue> {
    entries
        .iter()
        .map(|(k, v)| ((*k).to_string(), v.clone()))
        .collect()
}

#[test]
fn test_single_policy_allows_matching_resource() {
    let policy = Policy::builder("policy1", Effect::Allow)
        .name("Test Policy")
        .condition(Condition::equals(Attribute::text("resource"), "document1"))
        .build();
    let source = InMemoryPolicySource::new(vec![policy]);
    let context = EvaluationContext::new(
        ["read"],
        attributes(&[("resource", "document1".into())]),
        &source,
    )
    .expect("valid context");

    assert_eq!(evaluator().evaluate(&context), Ok(Verdict::Allow));
}

#[test]
fn test_deny_overrides_earlier_allow() {
    let allow = Policy::builder("policy-allow", Effect::Allow)
        .condition(Condition::equals(Attribute::text("resource"), "document1"))
        .build();
    let deny = Policy::builder("policy-deny", Effect::Deny)
        .condition(Condition::less_than(Attribute::integer("age"), 18).expect("non-null anchor"))
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
fn test_role_outside_membership_list_is_not_applicable() {
    let policy = Policy::builder("editors-only", Effect::Allow)
        .condition(Condition::is_in(
            Attribute::text("role"),
            ["admin", "editor"],
        ))
        .build();
    let source = InMemoryPolicySource::new(vec![policy]);
    let context = EvaluationContext::new(
        ["read"],
        attributes(&[("role", "user".into())]),
        &source,
    )
    .expect("valid context");

    assert_eq!(evaluator().evaluate(&context), Ok(Verdict::NotApplicable));
}

#[test]
fn test_comma_separated_context_value_converts_through_list_attribute() {
    // The raw context carries comma-separated text; the list attribute splits
    // and trims it, and membership applies intersection semantics.
    let groups = Attribute::list("groups", Attribute::text("group"));
    let policy = Policy::builder("staff", Effect::Allow)
        .condition(Condition::is_in(groups, ["engineering", "compliance"]))
        .build();
    let source = InMemoryPolicySource::new(vec![policy]);
    let context = EvaluationContext::new(
        ["read"],
        attributes(&[("groups", "sales, engineering , support".into())]),
        &source,
    )
    .expect("valid context");

    assert_eq!(evaluator().evaluate(&context), Ok(Verdict::Allow));
}

#[test]
fn test_numeric_text_converts_for_relational_conditions() {
    let policy = Policy::builder("adults", Effect::Allow)
        .condition(
            Condition::greater_than(Attribute::integer("age"), 17).expect("non-null anchor"),
        )
        .build();
    let source = InMemoryPolicySource::new(vec![policy]);

    // "21" parses; 21.9 truncates; both satisfy age > 17.
    for age in [AttributeValue::from("21"), AttributeValue::from(21.9)] {
        let context =
            EvaluationContext::new(["read"], attributes(&[("age", age)]), &source)
                .expect("valid context");
        assert_eq!(evaluator().evaluate(&context), Ok(Verdict::Allow));
    }
}

#[test]
fn test_enumeration_attribute_normalizes_case() {
    let clearance = Attribute::enumeration("clearance", ["PUBLIC", "SECRET", "TOP_SECRET"]);
    let policy = Policy::builder("secret-docs", Effect::Allow)
        .condition(Condition::equals(
            clearance,
            AttributeValue::Symbol("SECRET".to_string()),
        ))
        .build();
    let source = InMemoryPolicySource::new(vec![policy]);
    let context = EvaluationContext::new(
        ["read"],
        attributes(&[("clearance", "secret".into())]),
        &source,
    )
    .expect("valid context");

    assert_eq!(evaluator().evaluate(&context), Ok(Verdict::Allow));
}

#[test]
fn test_custom_policy_source_scopes_actions() {
    struct ActionScoped {
        read: Vec<Policy>,
        write: Vec<Policy>,
    }

    impl PolicySource for ActionScoped {
        fn policies(&self) -> Vec<Policy> {
            let mut all = self.read.clone();
            all.extend(self.write.clone());
            all
        }

        fn policies_for_action(&self, action: &str) -> Vec<Policy> {
            match action {
                "read" => self.read.clone(),
                "write" => self.write.clone(),
                _ => Vec::new(),
            }
        }
    }

    let resource = Condition::equals(Attribute::text("resource"), "document1");
    let source = ActionScoped {
        read: vec![
            Policy::builder("policy-read", Effect::Allow)
                .condition(resource.clone())
                .build(),
        ],
        write: vec![
            Policy::builder("policy-write", Effect::Deny)
                .condition(resource)
                .build(),
        ],
    };
    let context = EvaluationContext::new(
        ["read", "write", "delete"],
        attributes(&[("resource", "document1".into())]),
        &source,
    )
    .expect("valid context");
    let evaluator = evaluator();

    let results = evaluator
        .evaluate_all_actions(&context)
        .expect("no malformed conditions");
    assert_eq!(results.get("read"), Some(&Verdict::Allow));
    assert_eq!(results.get("write"), Some(&Verdict::Deny));
    assert_eq!(
        results.get("delete"),
        Some(&Verdict::NotApplicable),
        "an action with no policies is not applicable"
    );

    // Actions never declared on the context short-circuit before the source.
    assert_eq!(
        evaluator.evaluate_for_action(&context, "admin"),
        Ok(Verdict::NotApplicable)
    );
}

#[test]
fn test_missing_attribute_degrades_gracefully() {
    let policy = Policy::builder("needs-department", Effect::Allow)
        .condition(Condition::equals(Attribute::text("department"), "sales"))
        .build();
    let source = InMemoryPolicySource::new(vec![policy]);
    let context =
        EvaluationContext::new(["read"], HashMap::new(), &source).expect("valid context");

    assert_eq!(evaluator().evaluate(&context), Ok(Verdict::NotApplicable));
}

#[test]
fn test_verdict_serializes_for_audit_payloads() {
    let json = serde_json::to_string(&Verdict::NotApplicable).expect("serialize verdict");
    let decoded: Verdict = serde_json::from_str(&json).expect("deserialize verdict");
    assert_eq!(decoded, Verdict::NotApplicable);
}
