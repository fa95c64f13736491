use olc_acl::{AccessLevel, AclError, AclRule, ByClause, Control, DnScope, Subject};
use pretty_assertions::assert_eq;

fn parse(s: &str) -> AclRule {
    s.parse().unwrap_or_else(|e| panic!("failed to parse {s:?}: {e}"))
}

// ── What clause ───────────────────────────────────────────────────

#[test]
fn to_star_by_star_read() {
    let rule = parse("to * by * read");
    assert!(rule.matches_all());
    assert_eq!(
        rule.by_clauses(),
        [ByClause::new(Subject::Any, Some(AccessLevel::Read))]
    );
    assert_eq!(rule.to_string(), "to * by * read");
    assert_eq!(parse(&rule.to_string()), rule);
}

#[test]
fn dn_filter_and_attrs_clauses() {
    let rule = parse(r#"to dn.subtree="ou=people,dc=example,dc=com" filter=(objectClass=person) attrs=userPassword by self write by anonymous auth by * none"#);
    assert!(!rule.matches_all());
    assert_eq!(rule.dn_scope(), Some(DnScope::Subtree));
    assert_eq!(rule.dn_value(), Some("ou=people,dc=example,dc=com"));
    assert_eq!(rule.filter(), Some("(objectClass=person)"));
    assert_eq!(rule.attributes(), Some("userPassword"));
    assert_eq!(rule.by_clauses().len(), 3);
    assert_eq!(rule.by_clauses()[1].subject, Subject::Anonymous);
    assert_eq!(rule.by_clauses()[1].level, Some(AccessLevel::Auth));
}

#[test]
fn dn_base_without_quotes() {
    let rule = parse("to dn.base=cn=config by * none");
    assert_eq!(rule.dn_scope(), Some(DnScope::Base));
    assert_eq!(rule.dn_value(), Some("cn=config"));
}

#[test]
fn quoted_filter_with_blanks() {
    let rule = parse(r#"to filter="(cn=John Doe)" by users read"#);
    assert_eq!(rule.filter(), Some("(cn=John Doe)"));
    assert_eq!(rule.to_string(), r#"to filter="(cn=John Doe)" by users read"#);
}

#[test]
fn tabs_are_blanks() {
    let rule = parse("to\tattrs=cn\tby\tusers\tread");
    assert_eq!(rule.attributes(), Some("cn"));
    assert_eq!(rule.by_clauses()[0].subject, Subject::Users);
}

// ── By clauses ────────────────────────────────────────────────────

#[test]
fn group_subject_takes_quoted_value() {
    let rule = parse(r#"to * by group="cn=admins,dc=example,dc=com" manage by * break"#);
    assert_eq!(
        rule.by_clauses()[0].subject,
        Subject::Group("cn=admins,dc=example,dc=com".into())
    );
    assert_eq!(rule.by_clauses()[0].level, Some(AccessLevel::Manage));
    assert_eq!(rule.by_clauses()[1].level, None);
    assert_eq!(rule.by_clauses()[1].control, Some(Control::Break));
}

#[test]
fn dn_subjects() {
    let rule = parse(r#"to * by dn.base="cn=admin" write by dn.subtree="ou=svc" read continue"#);
    assert_eq!(rule.by_clauses()[0].subject, Subject::DnBase("cn=admin".into()));
    assert_eq!(rule.by_clauses()[1].subject, Subject::DnSubtree("ou=svc".into()));
    assert_eq!(rule.by_clauses()[1].control, Some(Control::Continue));
}

#[test]
fn level_is_optional() {
    let rule = parse("to * by self by * read");
    assert_eq!(rule.by_clauses()[0], ByClause::new(Subject::SelfEntry, None));
    assert_eq!(rule.by_clauses()[1].level, Some(AccessLevel::Read));
}

#[test]
fn control_after_level() {
    let rule = parse("to * by users read continue");
    assert_eq!(rule.by_clauses()[0].control, Some(Control::Continue));
}

#[test]
fn explicit_stop_is_the_default_control() {
    let rule = parse("to * by users read stop");
    assert_eq!(rule.by_clauses()[0].control, None);
    assert_eq!(rule, parse("to * by users read"));
    assert_eq!(parse("to * by * stop").by_clauses()[0].control, None);
    assert_eq!(
        ByClause::new(Subject::Users, None).with_control(Control::Stop),
        ByClause::new(Subject::Users, None)
    );
}

#[test]
fn stop_is_elided_on_output() {
    let rule = parse("to * by users read stop by * none break");
    assert_eq!(rule.to_string(), "to * by users read by * none break");
}

// ── Serialization ─────────────────────────────────────────────────

#[test]
fn serialization_orders_dn_filter_attrs() {
    let rule = parse("to attrs=cn filter=(uid=*) dn.base=\"dc=x\" by * read");
    assert_eq!(
        rule.to_string(),
        "to dn.base=\"dc=x\" filter=(uid=*) attrs=cn by * read"
    );
}

#[test]
fn serialization_quotes_subject_values() {
    let rule = parse("to * by group=cn=staff read");
    assert_eq!(rule.to_string(), "to * by group=\"cn=staff\" read");
}

#[test]
fn serialization_reparses_to_equal_rule() {
    for s in [
        "to * by * read",
        r#"to dn.subtree="dc=example,dc=com" attrs=userPassword,shadowLastChange by self write by anonymous auth by * none"#,
        r#"to filter="(&(objectClass=posixAccount)(uid=a b))" by users read by * none"#,
        r#"to * by dn.base="gidNumber=0+uidNumber=0,cn=peercred,cn=external,cn=auth" manage by * break"#,
        "to * by users read stop by * none",
    ] {
        let rule = parse(s);
        assert_eq!(parse(&rule.to_string()), rule, "round trip of {s:?}");
    }
}

#[test]
fn trailing_backslash_survives_round_trip() {
    let rule = parse(r"to dn.base=cn=a\ by * read");
    assert_eq!(rule.dn_value(), Some(r"cn=a\"));
    assert_eq!(rule.to_string(), r#"to dn.base="cn=a\\" by * read"#);
    assert_eq!(parse(&rule.to_string()), rule);

    let rule = parse(r"to * by group=cn=g\ read");
    assert_eq!(rule.by_clauses()[0].subject, Subject::Group(r"cn=g\".into()));
    assert_eq!(parse(&rule.to_string()), rule);
}

#[test]
fn quoted_escapes_are_resolved() {
    let rule = parse(r#"to dn.base="cn=a\\b,cn=\"q\",cn=x\,y" by * read"#);
    assert_eq!(rule.dn_value(), Some(r#"cn=a\b,cn="q",cn=x\,y"#));
    assert_eq!(parse(&rule.to_string()), rule);
}

#[test]
fn built_rule_serializes() {
    let mut rule = AclRule::new(vec![
        ByClause::new(Subject::SelfEntry, Some(AccessLevel::Write)),
        ByClause::new(Subject::Any, Some(AccessLevel::Read)).with_control(Control::Continue),
    ])
    .unwrap();
    rule.set_attributes(Some("mail".into()));
    assert_eq!(rule.to_string(), "to attrs=mail by self write by * read continue");
}

#[test]
fn set_match_all_clears_target() {
    let mut rule = parse("to dn.base=\"dc=x\" filter=(a=b) attrs=cn by * read");
    rule.set_match_all(true);
    assert_eq!(rule.dn_scope(), None);
    assert_eq!(rule.filter(), None);
    assert_eq!(rule.attributes(), None);
    assert_eq!(rule.to_string(), "to * by * read");
}

#[test]
fn empty_by_list_is_rejected() {
    assert_eq!(AclRule::new(Vec::new()), Err(AclError::EmptyByList));
    let mut rule = parse("to * by * read");
    assert_eq!(rule.set_by_clauses(Vec::new()), Err(AclError::EmptyByList));
    assert_eq!(rule.by_clauses().len(), 1);
}

#[test]
fn rule_serde_roundtrip() {
    let rule = parse(r#"to dn.subtree="dc=x" by group="cn=g" write"#);
    let json = serde_json::to_string(&rule).unwrap();
    let back: AclRule = serde_json::from_str(&json).unwrap();
    assert_eq!(back, rule);
}

// ── Grammar errors ────────────────────────────────────────────────

#[test]
fn missing_to_is_an_error() {
    assert_eq!("by * read".parse::<AclRule>(), Err(AclError::MissingTo));
    assert_eq!("tox * by * read".parse::<AclRule>(), Err(AclError::MissingTo));
    assert_eq!("".parse::<AclRule>(), Err(AclError::MissingTo));
}

#[test]
fn group_without_value_is_an_error() {
    assert_eq!(
        "to * by group=".parse::<AclRule>(),
        Err(AclError::MissingValue("group".into()))
    );
    assert_eq!(
        "to * by group= read".parse::<AclRule>(),
        Err(AclError::MissingValue("group".into()))
    );
    assert_eq!(
        "to * by group read".parse::<AclRule>(),
        Err(AclError::MissingEquals("group".into()))
    );
}

#[test]
fn value_on_plain_subject_is_an_error() {
    assert_eq!(
        "to * by users=x read".parse::<AclRule>(),
        Err(AclError::UnexpectedValue("users".into()))
    );
}

#[test]
fn unknown_what_clause_is_an_error() {
    assert_eq!(
        "to dn.regex=.* by * read".parse::<AclRule>(),
        Err(AclError::UnsupportedWhat("dn.regex".into()))
    );
}

#[test]
fn what_key_without_equals_is_an_error() {
    assert_eq!(
        "to attrs by * read".parse::<AclRule>(),
        Err(AclError::MissingEquals("attrs".into()))
    );
}

#[test]
fn missing_by_is_an_error() {
    assert_eq!(
        "to attrs=cn".parse::<AclRule>(),
        Err(AclError::UnexpectedEnd("\"by\""))
    );
    assert_eq!("to *".parse::<AclRule>(), Err(AclError::UnexpectedEnd("\"by\"")));
    assert_eq!(
        "to * by".parse::<AclRule>(),
        Err(AclError::UnexpectedEnd("\"by\" subject"))
    );
}

#[test]
fn empty_what_is_an_error() {
    assert_eq!("to by * read".parse::<AclRule>(), Err(AclError::EmptyTarget));
}

#[test]
fn star_must_be_followed_by_by() {
    assert_eq!(
        "to * attrs=cn by * read".parse::<AclRule>(),
        Err(AclError::UnexpectedToken("attrs=cn".into()))
    );
}

#[test]
fn unknown_subject_is_an_error() {
    assert_eq!(
        "to * by peername=1.2.3.4 read".parse::<AclRule>(),
        Err(AclError::UnsupportedSubject("peername".into()))
    );
}

#[test]
fn unknown_level_is_an_error() {
    assert_eq!(
        "to * by * =rwx".parse::<AclRule>(),
        Err(AclError::UnsupportedLevel("=rwx".into()))
    );
}

#[test]
fn trailing_garbage_is_an_error() {
    assert_eq!(
        "to * by * read stop extra".parse::<AclRule>(),
        Err(AclError::UnexpectedToken("extra".into()))
    );
}

#[test]
fn empty_quoted_value_is_an_error() {
    assert_eq!(
        "to dn.base=\"\" by * read".parse::<AclRule>(),
        Err(AclError::MissingValue("dn.base".into()))
    );
}

#[test]
fn unterminated_quote_is_an_error() {
    assert!(matches!(
        "to dn.base=\"dc=x by * read".parse::<AclRule>(),
        Err(AclError::UnterminatedQuote(_))
    ));
}
