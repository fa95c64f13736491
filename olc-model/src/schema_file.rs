//! Importer for OpenLDAP `.schema` files.
//!
//! A schema file is a sequence of `objectidentifier`, `attributetype` and
//! `objectclass` directives. A physical line starting with a space or tab
//! continues the previous one. `#` lines and blank lines are ignored.

use crate::error::{ModelError, ModelResult};
use crate::schema::{
    ATTRIBUTE_TYPES, OBJECT_CLASSES, OBJECT_IDENTIFIERS, SCHEMA_BASE_DN, SCHEMA_OBJECT_CLASS,
    SchemaConfig,
};
use olc_types::{Attribute, Entry, OBJECT_CLASS};
use std::path::Path;
use tracing::{debug, info, trace};

const SCHEMA_SUFFIX: &str = ".schema";

/// Directive keywords and the attribute their bodies are stored in.
const DIRECTIVES: [(&str, &str); 3] = [
    ("objectidentifier", OBJECT_IDENTIFIERS),
    ("attributetype", ATTRIBUTE_TYPES),
    ("objectclass", OBJECT_CLASSES),
];

/// Joins continuation lines into logical lines.
///
/// The leading space or tab of a continuation becomes a single space.
/// Trailing whitespace is trimmed from every logical line.
pub fn fold_lines(text: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for physical in text.lines() {
        let continued = physical.strip_prefix([' ', '\t']);
        match (continued, lines.last_mut()) {
            (Some(rest), Some(current)) => {
                current.push(' ');
                current.push_str(rest);
            }
            _ => lines.push(physical.to_string()),
        }
    }
    for line in &mut lines {
        line.truncate(line.trim_end().len());
    }
    lines
}

/// Maps a logical line to its target attribute and body.
fn classify(line: &str) -> Option<(&'static str, &str)> {
    DIRECTIVES.iter().find_map(|&(keyword, attribute)| {
        let head = line.get(..keyword.len())?;
        if !head.eq_ignore_ascii_case(keyword) {
            return None;
        }
        let rest = &line[keyword.len()..];
        if !rest.starts_with([' ', '\t']) {
            return None;
        }
        let body = rest.trim_start();
        (!body.is_empty()).then_some((attribute, body))
    })
}

/// Builds a new schema entry `cn=<base>,cn=schema,cn=config` from schema
/// file text.
///
/// # Errors
///
/// [`ModelError::SchemaSyntax`] with the 1-based logical line number for the
/// first line that is not a directive; nothing is imported then.
/// [`ModelError::Invariant`] when the file defines no object classes and no
/// attribute types.
pub fn import_schema_str(base: &str, text: &str) -> ModelResult<SchemaConfig> {
    let mut entry = Entry::with_attributes(
        format!("cn={base},{SCHEMA_BASE_DN}"),
        [
            Attribute::single(OBJECT_CLASS, SCHEMA_OBJECT_CLASS),
            Attribute::single("cn", base),
        ],
    );

    for (number, line) in fold_lines(text).iter().enumerate() {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((attribute, body)) = classify(line) else {
            debug!("schema {} line {}: {:?}", base, number + 1, line);
            return Err(ModelError::SchemaSyntax {
                line: number + 1,
                reason: "expected objectidentifier, attributetype or objectclass".to_string(),
            });
        };
        trace!("{}: {}", attribute, body);
        entry.add_value(attribute, body);
    }

    SchemaConfig::new_entry(entry)
}

/// Reads a `.schema` file. The entry is named after the file, without the
/// `.schema` suffix.
///
/// # Errors
///
/// [`ModelError::Io`] when the file cannot be read, otherwise the errors of
/// [`import_schema_str`].
pub fn import_schema_file(path: &Path) -> ModelResult<SchemaConfig> {
    info!("importing schema file {}", path.display());
    let text = std::fs::read_to_string(path)?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let base = file_name
        .strip_suffix(SCHEMA_SUFFIX)
        .unwrap_or(&file_name);
    import_schema_str(base, &text)
}
