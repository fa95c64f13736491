//! Command implementations behind the `olcconf` binary.
//!
//! Each command takes its input as text and returns what the binary prints,
//! so the binary itself only deals with files and logging.

mod ldif;

pub use ldif::PlainLdif;

use anyhow::{Context, Result};
use olc_acl::AclRule;
use olc_config::{ConfigSession, DatabaseSpec};
use olc_model::{ConfigNode, decode_index_attribute, import_schema_file};
use olc_types::{Entry, diff_entries, split_index};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Parses one access rule per line and prints each in canonical form.
///
/// Blank lines and `#` comments are skipped, `{n}` position tags dropped.
pub fn normalize_acl(text: &str) -> Result<String> {
    let mut out = String::new();
    for (number, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (_, rule) = split_index(line);
        let rule: AclRule = rule
            .parse()
            .with_context(|| format!("line {}: cannot parse access rule", number + 1))?;
        out.push_str(&rule.to_string());
        out.push('\n');
    }
    Ok(out)
}

/// Imports a `.schema` file and returns the resulting entry as JSON.
pub fn schema_to_json(path: &Path) -> Result<String> {
    let schema = import_schema_file(path)
        .with_context(|| format!("importing schema {}", path.display()))?;
    debug!(
        "{} attribute types, {} object classes",
        schema.attribute_types().len(),
        schema.object_classes().len()
    );
    let mut json = serde_json::to_string_pretty(schema.entry().working())?;
    json.push('\n');
    Ok(json)
}

/// Compares two JSON entries and lists the modifications between them, one
/// per line.
pub fn diff_json(old: &str, new: &str) -> Result<String> {
    let old: Entry = serde_json::from_str(old).context("parsing old entry")?;
    let new: Entry = serde_json::from_str(new).context("parsing new entry")?;
    Ok(diff_entries(&old, &new)
        .iter()
        .map(|m| format!("{m}\n"))
        .collect())
}

/// Builds a fresh configuration and renders it as LDIF for offline import.
///
/// `databases` is a JSON list of [`DatabaseSpec`]; the first entry becomes
/// the frontend. Schema files are added below `cn=schema,cn=config` in the
/// order given.
pub fn init_ldif(databases: &str, schema_files: &[PathBuf], with_globals: bool) -> Result<String> {
    let specs = DatabaseSpec::list_from_json(databases).context("reading database list")?;
    let mut session = ConfigSession::new();
    if with_globals {
        session.init_globals();
    }
    session.init_schema();
    for path in schema_files {
        session
            .add_schema_file(path)
            .with_context(|| format!("importing schema {}", path.display()))?;
    }
    session.init_databases(&specs)?;
    Ok(session.to_ldif(&PlainLdif))
}

/// Decodes `olcDbIndex` values into `attribute: flag, flag` lines.
pub fn decode_indexes<'a>(values: impl IntoIterator<Item = &'a str>) -> String {
    values
        .into_iter()
        .map(|raw| {
            let (name, flags) = decode_index_attribute(raw);
            let flags: Vec<String> = flags.iter().map(ToString::to_string).collect();
            format!("{name}: {}\n", flags.join(", "))
        })
        .collect()
}
