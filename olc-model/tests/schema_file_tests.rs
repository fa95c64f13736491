use olc_model::{ConfigNode, ModelError, fold_lines, import_schema_file, import_schema_str};
use pretty_assertions::assert_eq;
use std::fs;

const MINI_SCHEMA: &str = "\
# a tiny schema
objectidentifier MiniRoot 1.3.6.1.4.1.99999

attributetype ( MiniRoot:1 NAME 'miniName'
\tDESC 'a name'
  EQUALITY caseIgnoreMatch )

ObjectClass ( MiniRoot:2 NAME 'miniObject'
 SUP top AUXILIARY
 MAY miniName )
";

// ── Folding ──────────────────────────────────────────────────────

#[test]
fn space_continuation_joins_previous_line() {
    assert_eq!(
        fold_lines("attributetype ( 1.2.3\n NAME 'x' )\n"),
        ["attributetype ( 1.2.3 NAME 'x' )"]
    );
}

#[test]
fn tab_continuation_becomes_one_space() {
    assert_eq!(
        fold_lines("attributetype ( 1.2.3\n\tNAME 'x' )"),
        ["attributetype ( 1.2.3 NAME 'x' )"]
    );
}

#[test]
fn folding_trims_trailing_whitespace() {
    assert_eq!(fold_lines("a \n b\t\nc \n"), ["a  b", "c"]);
}

#[test]
fn folding_handles_crlf() {
    assert_eq!(fold_lines("a\r\n b\r\nc\r\n"), ["a b", "c"]);
}

// ── Import ───────────────────────────────────────────────────────

#[test]
fn import_collects_all_directives() {
    let schema = import_schema_str("mini", MINI_SCHEMA).unwrap();
    assert!(schema.entry().is_new());
    assert_eq!(schema.name(), "mini");
    assert_eq!(schema.entry().working_dn(), "cn=mini,cn=schema,cn=config");
    assert!(schema.entry().working().has_object_class("olcSchemaConfig"));
    assert_eq!(schema.object_identifiers(), ["MiniRoot 1.3.6.1.4.1.99999"]);
    assert_eq!(
        schema.attribute_types(),
        ["( MiniRoot:1 NAME 'miniName' DESC 'a name'  EQUALITY caseIgnoreMatch )"]
    );
    assert_eq!(
        schema.object_classes(),
        ["( MiniRoot:2 NAME 'miniObject' SUP top AUXILIARY MAY miniName )"]
    );
}

#[test]
fn keywords_are_case_insensitive() {
    let schema = import_schema_str("x", "ATTRIBUTETYPE ( 1.2 NAME 'a' )\nobjectClass ( 1.3 NAME 'b' )").unwrap();
    assert_eq!(schema.attribute_types().len(), 1);
    assert_eq!(schema.object_classes().len(), 1);
}

#[test]
fn unknown_directive_reports_logical_line() {
    let text = "# comment\n\nattributetype ( 1.2\n NAME 'a' )\nmatchingrule ( 1.3 )\n";
    match import_schema_str("bad", text) {
        Err(ModelError::SchemaSyntax { line, .. }) => assert_eq!(line, 4),
        other => panic!("expected syntax error, got {other:?}"),
    }
}

#[test]
fn keyword_needs_whitespace_and_body() {
    for text in ["objectclasses ( 1.2 NAME 'a' )", "attributetype", "attributetype   "] {
        assert!(
            matches!(
                import_schema_str("bad", text),
                Err(ModelError::SchemaSyntax { line: 1, .. })
            ),
            "accepted {text:?}"
        );
    }
}

#[test]
fn continuation_without_previous_line_is_an_error() {
    assert!(matches!(
        import_schema_str("bad", " attributetype ( 1.2 NAME 'a' )"),
        Err(ModelError::SchemaSyntax { line: 1, .. })
    ));
}

#[test]
fn only_identifiers_violates_schema_invariant() {
    assert!(matches!(
        import_schema_str("oids", "objectidentifier Root 1.2.3\n"),
        Err(ModelError::Invariant(_))
    ));
}

#[test]
fn empty_file_violates_schema_invariant() {
    assert!(matches!(
        import_schema_str("empty", "# nothing here\n"),
        Err(ModelError::Invariant(_))
    ));
}

// ── Files ────────────────────────────────────────────────────────

#[test]
fn file_name_without_suffix_names_the_entry() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mini.schema");
    fs::write(&path, MINI_SCHEMA).unwrap();
    let schema = import_schema_file(&path).unwrap();
    assert_eq!(schema.name(), "mini");
    assert_eq!(schema.entry().working_dn(), "cn=mini,cn=schema,cn=config");
}

#[test]
fn other_file_names_are_kept_whole() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mini.txt");
    fs::write(&path, MINI_SCHEMA).unwrap();
    let schema = import_schema_file(&path).unwrap();
    assert_eq!(schema.name(), "mini.txt");
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = import_schema_file(&dir.path().join("absent.schema"));
    assert!(matches!(result, Err(ModelError::Io(_))));
}
