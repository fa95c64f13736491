//! `cn=schema,cn=config` and the schema entries below it.

use crate::entry::{ConfigEntry, ConfigNode, NO_INDEX, Ordered};
use crate::error::{ModelError, ModelResult};
use olc_types::{Attribute, Entry, OBJECT_CLASS, split_index};
use tracing::{debug, info};

/// DN of the schema container.
pub const SCHEMA_BASE_DN: &str = "cn=schema,cn=config";

/// Object class of the schema container and its children.
pub const SCHEMA_OBJECT_CLASS: &str = "olcSchemaConfig";

pub(crate) const OBJECT_IDENTIFIERS: &str = "olcObjectIdentifier";
pub(crate) const ATTRIBUTE_TYPES: &str = "olcAttributeTypes";
pub(crate) const OBJECT_CLASSES: &str = "olcObjectClasses";

/// A schema entry, or the schema container itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaConfig {
    entry: ConfigEntry,
    name: String,
}

impl SchemaConfig {
    /// A new, empty `cn=schema,cn=config` container. Not validated.
    pub fn schema_base() -> Self {
        let entry = Entry::with_attributes(
            SCHEMA_BASE_DN,
            [
                Attribute::single(OBJECT_CLASS, SCHEMA_OBJECT_CLASS),
                Attribute::single("cn", "schema"),
            ],
        );
        let mut schema = Self {
            entry: ConfigEntry::new_entry(entry),
            name: String::new(),
        };
        schema.refresh();
        schema
    }

    /// Wraps the schema container as read from the server. Not validated.
    pub fn base_from_entry(entry: Entry) -> Self {
        let mut schema = Self {
            entry: ConfigEntry::from_entry(entry),
            name: String::new(),
        };
        schema.refresh();
        schema
    }

    /// Wraps a schema entry read from the server.
    ///
    /// # Errors
    ///
    /// [`ModelError::Invariant`] when the entry has no `cn`, does not live
    /// below `cn=schema,cn=config`, or defines neither object classes nor
    /// attribute types.
    pub fn from_entry(entry: Entry) -> ModelResult<Self> {
        Self::validated(ConfigEntry::from_entry(entry))
    }

    /// Wraps a schema entry that is not on the server yet.
    ///
    /// # Errors
    ///
    /// Same checks as [`SchemaConfig::from_entry`].
    pub fn new_entry(entry: Entry) -> ModelResult<Self> {
        Self::validated(ConfigEntry::new_entry(entry))
    }

    fn validated(entry: ConfigEntry) -> ModelResult<Self> {
        let working = entry.working();
        let dn = working.dn();
        if entry.string_value("cn").is_none() {
            return Err(ModelError::Invariant(format!(
                "entry '{dn}' has no 'cn' attribute"
            )));
        }
        if !is_below_schema_base(dn) {
            return Err(ModelError::Invariant(format!(
                "entry '{dn}' is not a child of '{SCHEMA_BASE_DN}'"
            )));
        }
        if working.values(OBJECT_CLASSES).is_empty() && working.values(ATTRIBUTE_TYPES).is_empty()
        {
            return Err(ModelError::Invariant(format!(
                "entry '{dn}' does not define any objectclasses or attributetypes"
            )));
        }
        let mut schema = Self {
            entry,
            name: String::new(),
        };
        schema.refresh();
        info!("schema {} ({})", schema.name, schema.entry.working_dn());
        Ok(schema)
    }

    fn refresh(&mut self) {
        let (index, name) = match self.entry.string_value("cn") {
            Some(raw) => {
                let (index, name) = split_index(raw);
                (index, name.to_string())
            }
            None => (NO_INDEX, String::new()),
        };
        self.entry.set_index_value(index);
        self.name = name;
    }

    /// Schema name without its position, e.g. `core`. Empty once the entry
    /// has been cleared.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// True for the `cn=schema,cn=config` container.
    #[must_use]
    pub fn is_schema_base(&self) -> bool {
        self.entry.working_dn().eq_ignore_ascii_case(SCHEMA_BASE_DN)
            || self.entry.dn().eq_ignore_ascii_case(SCHEMA_BASE_DN)
    }

    #[must_use]
    pub fn attribute_types(&self) -> Vec<&str> {
        self.untagged(ATTRIBUTE_TYPES)
    }

    #[must_use]
    pub fn object_classes(&self) -> Vec<&str> {
        self.untagged(OBJECT_CLASSES)
    }

    #[must_use]
    pub fn object_identifiers(&self) -> Vec<&str> {
        self.untagged(OBJECT_IDENTIFIERS)
    }

    fn untagged(&self, name: &str) -> Vec<&str> {
        self.entry
            .string_values(name)
            .iter()
            .map(|v| split_index(v).1)
            .collect()
    }
}

/// True if `dn` ends with `cn=schema,cn=config` (ASCII case-insensitive).
pub(crate) fn is_below_schema_base(dn: &str) -> bool {
    dn.len() >= SCHEMA_BASE_DN.len()
        && dn
            .get(dn.len() - SCHEMA_BASE_DN.len()..)
            .is_some_and(|tail| tail.eq_ignore_ascii_case(SCHEMA_BASE_DN))
}

impl ConfigNode for SchemaConfig {
    fn entry(&self) -> &ConfigEntry {
        &self.entry
    }

    fn entry_mut(&mut self) -> &mut ConfigEntry {
        &mut self.entry
    }

    fn reset(&mut self, entry: Entry) {
        self.entry.reset(entry);
        self.refresh();
    }

    fn clear_changed(&mut self) {
        debug!("clearing schema {}", self.name);
        self.entry.clear_changed();
        self.name.clear();
    }
}

impl Ordered for SchemaConfig {
    fn set_index(&mut self, index: i32, mirror_original: bool) {
        self.entry.set_index_value(index);
        let name = self.name.clone();
        self.entry
            .apply_position("cn", &name, SCHEMA_BASE_DN, mirror_original);
    }
}
