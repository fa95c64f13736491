//! Property-based tests for the ACL grammar.
//!
//! Any rule the serializer produces must parse back into the same rule.

use olc_acl::{AccessLevel, AclRule, ByClause, Control, DnScope, Subject};
use proptest::prelude::*;

// =============================================================================
// HELPER STRATEGIES
// =============================================================================

fn dn_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex(r#"(cn|ou|dc)=[a-z0-9\\"]{1,8}(,(cn|ou|dc)=[a-z0-9 \\"]{1,8}){0,3}"#).unwrap()
}

fn filter_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex(r#"\((uid|cn|objectClass)=[a-zA-Z0-9* \\"]{1,10}\)"#).unwrap()
}

fn attrs_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z]{1,10}(,[a-zA-Z]{1,10}){0,3}").unwrap()
}

fn level_strategy() -> impl Strategy<Value = Option<AccessLevel>> {
    prop_oneof![
        Just(None),
        Just(Some(AccessLevel::None)),
        Just(Some(AccessLevel::Disclose)),
        Just(Some(AccessLevel::Auth)),
        Just(Some(AccessLevel::Compare)),
        Just(Some(AccessLevel::Read)),
        Just(Some(AccessLevel::Write)),
        Just(Some(AccessLevel::Manage)),
    ]
}

fn control_strategy() -> impl Strategy<Value = Option<Control>> {
    prop_oneof![
        Just(None),
        Just(Some(Control::Stop)),
        Just(Some(Control::Break)),
        Just(Some(Control::Continue)),
    ]
}

fn subject_strategy() -> impl Strategy<Value = Subject> {
    prop_oneof![
        Just(Subject::Any),
        Just(Subject::Anonymous),
        Just(Subject::Users),
        Just(Subject::SelfEntry),
        dn_strategy().prop_map(Subject::Group),
        dn_strategy().prop_map(Subject::DnBase),
        dn_strategy().prop_map(Subject::DnSubtree),
    ]
}

fn by_clause_strategy() -> impl Strategy<Value = ByClause> {
    (subject_strategy(), level_strategy(), control_strategy()).prop_map(
        |(subject, level, control)| {
            let clause = ByClause::new(subject, level);
            match control {
                Some(control) => clause.with_control(control),
                None => clause,
            }
        },
    )
}

fn rule_strategy() -> impl Strategy<Value = AclRule> {
    (
        prop::collection::vec(by_clause_strategy(), 1..5),
        prop::option::of((prop::bool::ANY, dn_strategy())),
        prop::option::of(filter_strategy()),
        prop::option::of(attrs_strategy()),
    )
        .prop_map(|(by, dn, filter, attrs)| {
            let mut rule = AclRule::new(by).unwrap();
            if let Some((subtree, value)) = dn {
                let scope = if subtree { DnScope::Subtree } else { DnScope::Base };
                rule.set_dn(scope, value);
            }
            rule.set_filter(filter);
            rule.set_attributes(attrs);
            rule
        })
}

// =============================================================================
// ROUND TRIP
// =============================================================================

proptest! {
    #[test]
    fn serialized_rule_reparses_equal(rule in rule_strategy()) {
        let text = rule.to_string();
        let parsed: AclRule = text.parse().unwrap();
        prop_assert_eq!(&parsed, &rule);
    }

    #[test]
    fn serialization_is_stable(rule in rule_strategy()) {
        let once = rule.to_string();
        let twice = once.parse::<AclRule>().unwrap().to_string();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn parser_never_panics(s in "to [ -~]{0,60}") {
        let _ = s.parse::<AclRule>();
    }
}
