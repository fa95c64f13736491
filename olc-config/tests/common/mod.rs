//! Shared test helpers: an in-memory directory standing in for a server.

#![allow(dead_code)]

use olc_config::{ATTRIBUTE_OR_VALUE_EXISTS, NO_SUCH_OBJECT, Transport, TransportError};
use olc_types::{Attribute, Entry, ModOp, Modification, SearchScope};

/// LDAP result code for "entry already exists".
pub const ALREADY_EXISTS: i32 = 68;

/// One request as the server received it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Search { base: String, scope: SearchScope },
    Add(String),
    Delete(String),
    Modify { dn: String, mods: Vec<Modification> },
}

impl Call {
    pub fn search(base: &str, scope: SearchScope) -> Self {
        Self::Search {
            base: base.to_string(),
            scope,
        }
    }

    pub fn add(dn: &str) -> Self {
        Self::Add(dn.to_string())
    }

    pub fn delete(dn: &str) -> Self {
        Self::Delete(dn.to_string())
    }

    pub fn modify(dn: &str, mods: Vec<Modification>) -> Self {
        Self::Modify {
            dn: dn.to_string(),
            mods,
        }
    }

    pub fn is_write(&self) -> bool {
        !matches!(self, Self::Search { .. })
    }
}

/// Entries kept in insertion order, plus a log of every call.
#[derive(Debug, Default)]
pub struct MockDirectory {
    pub entries: Vec<Entry>,
    pub calls: Vec<Call>,
    /// Writes to this DN fail with the given error.
    pub failing: Option<(String, TransportError)>,
}

impl MockDirectory {
    pub fn with_entries(entries: impl IntoIterator<Item = Entry>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn fail_writes_to(mut self, dn: &str, error: TransportError) -> Self {
        self.failing = Some((dn.to_string(), error));
        self
    }

    pub fn get(&self, dn: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.dn().eq_ignore_ascii_case(dn))
    }

    pub fn writes(&self) -> Vec<&Call> {
        self.calls.iter().filter(|c| c.is_write()).collect()
    }

    fn check_failure(&self, dn: &str) -> Result<(), TransportError> {
        match &self.failing {
            Some((failing, error)) if failing.eq_ignore_ascii_case(dn) => Err(error.clone()),
            _ => Ok(()),
        }
    }

    fn position(&self, dn: &str) -> Result<usize, TransportError> {
        self.entries
            .iter()
            .position(|e| e.dn().eq_ignore_ascii_case(dn))
            .ok_or_else(|| TransportError::new(NO_SUCH_OBJECT, format!("no such object: {dn}")))
    }
}

fn parent_of(dn: &str) -> &str {
    dn.split_once(',').map_or("", |(_, parent)| parent)
}

fn in_scope(dn: &str, base: &str, scope: SearchScope) -> bool {
    let dn = dn.to_ascii_lowercase();
    let base = base.to_ascii_lowercase();
    match scope {
        SearchScope::Base => dn == base,
        SearchScope::One => parent_of(&dn) == base,
        SearchScope::Sub => dn == base || dn.ends_with(&format!(",{base}")),
    }
}

/// Understands `objectclass=<class>` only.
fn matches(entry: &Entry, filter: Option<&str>) -> bool {
    match filter.and_then(|f| f.split_once('=')) {
        Some((attr, class)) if attr.eq_ignore_ascii_case("objectclass") => {
            entry.has_object_class(class)
        }
        _ => true,
    }
}

fn apply(entry: &mut Entry, m: &Modification) -> Result<(), TransportError> {
    match m.op {
        ModOp::Add => {
            for value in &m.values {
                let exists = entry
                    .get(&m.attribute)
                    .is_some_and(|a| a.values().iter().any(|v| v.eq_ignore_ascii_case(value)));
                if exists {
                    return Err(TransportError::new(
                        ATTRIBUTE_OR_VALUE_EXISTS,
                        format!("{}: value #0 provided more than once", m.attribute),
                    ));
                }
                entry.add_value(&m.attribute, value.clone());
            }
        }
        ModOp::Delete if m.values.is_empty() => {
            entry.remove_attribute(&m.attribute);
        }
        ModOp::Delete => {
            let kept = entry
                .values(&m.attribute)
                .iter()
                .filter(|v| !m.values.contains(*v))
                .cloned()
                .collect();
            entry.set_values(&m.attribute, kept);
        }
        ModOp::Replace => {
            entry.replace_attribute(Attribute::with_values(m.attribute.clone(), m.values.clone()));
        }
    }
    Ok(())
}

impl Transport for MockDirectory {
    fn search(
        &mut self,
        base: &str,
        scope: SearchScope,
        filter: Option<&str>,
    ) -> Result<Vec<Entry>, TransportError> {
        self.calls.push(Call::search(base, scope));
        Ok(self
            .entries
            .iter()
            .filter(|e| in_scope(e.dn(), base, scope) && matches(e, filter))
            .cloned()
            .collect())
    }

    fn add(&mut self, entry: &Entry) -> Result<(), TransportError> {
        self.calls.push(Call::add(entry.dn()));
        self.check_failure(entry.dn())?;
        if self.get(entry.dn()).is_some() {
            return Err(TransportError::new(ALREADY_EXISTS, "Already exists"));
        }
        self.entries.push(entry.clone());
        Ok(())
    }

    fn delete(&mut self, dn: &str) -> Result<(), TransportError> {
        self.calls.push(Call::delete(dn));
        self.check_failure(dn)?;
        let pos = self.position(dn)?;
        self.entries.remove(pos);
        Ok(())
    }

    fn modify(&mut self, dn: &str, mods: &[Modification]) -> Result<(), TransportError> {
        self.calls.push(Call::modify(dn, mods.to_vec()));
        self.check_failure(dn)?;
        let pos = self.position(dn)?;
        let mut updated = self.entries[pos].clone();
        for m in mods {
            apply(&mut updated, m)?;
        }
        self.entries[pos] = updated;
        Ok(())
    }
}

// ── Fixtures ─────────────────────────────────────────────────────

pub fn entry(dn: &str, attrs: &[(&str, &[&str])]) -> Entry {
    Entry::with_attributes(
        dn,
        attrs
            .iter()
            .map(|(name, values)| Attribute::with_values(*name, values.iter().copied())),
    )
}

pub fn global_entry() -> Entry {
    entry(
        "cn=config",
        &[
            ("objectClass", &["olcGlobal", "olcConfig"]),
            ("cn", &["config"]),
            ("olcLogLevel", &["stats"]),
        ],
    )
}

pub fn schema_base_entry() -> Entry {
    entry(
        "cn=schema,cn=config",
        &[("objectClass", &["olcSchemaConfig"]), ("cn", &["schema"])],
    )
}

pub fn core_schema_entry() -> Entry {
    entry(
        "cn={0}core,cn=schema,cn=config",
        &[
            ("objectClass", &["olcSchemaConfig"]),
            ("cn", &["{0}core"]),
            ("olcAttributeTypes", &["{0}( 2.5.4.3 NAME 'cn' SUP name )"]),
            ("olcObjectClasses", &["{0}( 2.5.6.6 NAME 'person' SUP top STRUCTURAL )"]),
        ],
    )
}

pub fn frontend_entry() -> Entry {
    entry(
        "olcDatabase={-1}frontend,cn=config",
        &[
            ("objectClass", &["olcDatabaseConfig", "olcFrontendConfig"]),
            ("olcDatabase", &["{-1}frontend"]),
        ],
    )
}

pub fn hdb_entry() -> Entry {
    entry(
        "olcDatabase={1}hdb,cn=config",
        &[
            ("objectClass", &["olcDatabaseConfig", "olcHdbConfig"]),
            ("olcDatabase", &["{1}hdb"]),
            ("olcSuffix", &["dc=example,dc=com"]),
            ("olcDbDirectory", &["/var/lib/ldap"]),
        ],
    )
}

pub fn ppolicy_entry() -> Entry {
    entry(
        "olcOverlay={0}ppolicy,olcDatabase={1}hdb,cn=config",
        &[
            ("objectClass", &["olcOverlayConfig", "olcPPolicyConfig"]),
            ("olcOverlay", &["{0}ppolicy"]),
        ],
    )
}

/// A small but complete server: globals, schema, two databases, one overlay.
pub fn populated() -> MockDirectory {
    MockDirectory::with_entries([
        global_entry(),
        schema_base_entry(),
        core_schema_entry(),
        frontend_entry(),
        hdb_entry(),
        ppolicy_entry(),
    ])
}
