//! `olcDatabase={n}<type>,cn=config` entries.

use crate::entry::{ConfigEntry, ConfigNode, NO_INDEX, Ordered};
use crate::error::{ModelError, ModelResult};
use crate::global::GLOBAL_DN;
use crate::index::{IndexFlag, IndexSpec, decode_index_attribute, encode_index_attribute};
use crate::overlay::OverlayConfig;
use olc_acl::AclRule;
use olc_types::{Attribute, Entry, OBJECT_CLASS, split_index};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

const DATABASE: &str = "olcDatabase";
const SUFFIX: &str = "olcSuffix";
const ROOT_DN: &str = "olcRootDN";
const ROOT_PW: &str = "olcRootPW";
const ACCESS: &str = "olcAccess";
const DB_INDEX: &str = "olcDbIndex";
const DB_DIRECTORY: &str = "olcDbDirectory";
const DB_CACHESIZE: &str = "olcDbCachesize";
const DB_IDL_CACHESIZE: &str = "olcDbIdlCachesize";
const DB_CHECKPOINT: &str = "olcDbCheckpoint";

/// Object class every database entry carries.
pub const DATABASE_OBJECT_CLASS: &str = "olcDatabaseConfig";

/// Backends that support attribute indexing and cache tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexedBackend {
    Bdb,
    Hdb,
    Mdb,
}

impl IndexedBackend {
    const ALL: [Self; 3] = [Self::Bdb, Self::Hdb, Self::Mdb];

    /// The backend named by a database type such as `hdb`.
    #[must_use]
    pub fn from_type(db_type: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|b| b.as_str().eq_ignore_ascii_case(db_type))
    }

    /// The backend whose object class `entry` carries.
    #[must_use]
    pub fn from_entry(entry: &Entry) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|b| entry.has_object_class(b.object_class()))
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bdb => "bdb",
            Self::Hdb => "hdb",
            Self::Mdb => "mdb",
        }
    }

    #[must_use]
    pub fn object_class(&self) -> &'static str {
        match self {
            Self::Bdb => "olcBdbConfig",
            Self::Hdb => "olcHdbConfig",
            Self::Mdb => "olcMdbConfig",
        }
    }
}

impl fmt::Display for IndexedBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A database entry and the overlays stacked on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    entry: ConfigEntry,
    db_type: String,
    backend: Option<IndexedBackend>,
    overlays: Vec<OverlayConfig>,
}

impl DatabaseConfig {
    /// A new database of the given type, e.g. `mdb` or `frontend`.
    ///
    /// Indexed backends get their backend object class as well.
    pub fn new(db_type: &str) -> Self {
        let backend = IndexedBackend::from_type(db_type);
        let mut entry = Entry::with_attributes(
            format!("{DATABASE}={db_type},{GLOBAL_DN}"),
            [
                Attribute::single(OBJECT_CLASS, DATABASE_OBJECT_CLASS),
                Attribute::single(DATABASE, db_type),
            ],
        );
        if let Some(backend) = backend {
            entry.add_value(OBJECT_CLASS, backend.object_class());
        }
        Self {
            entry: ConfigEntry::new_entry(entry),
            db_type: db_type.to_string(),
            backend,
            overlays: Vec::new(),
        }
    }

    /// Wraps a database entry read from the server.
    pub fn from_entry(entry: Entry) -> Self {
        let backend = IndexedBackend::from_entry(&entry);
        let mut db = Self {
            entry: ConfigEntry::from_entry(entry),
            db_type: String::new(),
            backend,
            overlays: Vec::new(),
        };
        db.refresh();
        info!(
            "database {} type {} indexed={}",
            db.entry.dn(),
            db.db_type,
            db.backend.is_some()
        );
        db
    }

    fn refresh(&mut self) {
        let (index, db_type) = match self.entry.string_value(DATABASE) {
            Some(raw) => {
                let (index, name) = split_index(raw);
                (index, name.to_string())
            }
            None => (NO_INDEX, String::new()),
        };
        self.entry.set_index_value(index);
        self.db_type = db_type;
    }

    /// The database type without its position, e.g. `mdb`.
    #[must_use]
    pub fn db_type(&self) -> &str {
        &self.db_type
    }

    #[must_use]
    pub fn backend(&self) -> Option<IndexedBackend> {
        self.backend
    }

    /// Indexing and cache settings, present only for indexed backends.
    pub fn indexed(&mut self) -> Option<IndexedDatabase<'_>> {
        let backend = self.backend?;
        Some(IndexedDatabase {
            backend,
            entry: &mut self.entry,
        })
    }

    #[must_use]
    pub fn suffix(&self) -> Option<&str> {
        self.entry.string_value(SUFFIX)
    }

    pub fn set_suffix(&mut self, suffix: &str) {
        self.entry.set_string_value(SUFFIX, suffix);
    }

    #[must_use]
    pub fn root_dn(&self) -> Option<&str> {
        self.entry.string_value(ROOT_DN)
    }

    pub fn set_root_dn(&mut self, root_dn: &str) {
        self.entry.set_string_value(ROOT_DN, root_dn);
    }

    #[must_use]
    pub fn root_pw(&self) -> Option<&str> {
        self.entry.string_value(ROOT_PW)
    }

    pub fn set_root_pw(&mut self, root_pw: &str) {
        self.entry.set_string_value(ROOT_PW, root_pw);
    }

    /// Parses every `olcAccess` value, position tags stripped.
    ///
    /// # Errors
    ///
    /// Fails on the first value that is not a valid rule.
    pub fn acl(&self) -> ModelResult<Vec<AclRule>> {
        self.entry
            .string_values(ACCESS)
            .iter()
            .map(|value| {
                let (_, text) = split_index(value);
                text.parse::<AclRule>().map_err(|err| {
                    warn!("cannot parse acl {:?}: {}", text, err);
                    ModelError::from(err)
                })
            })
            .collect()
    }

    /// Appends `rule` at `index`, or after the last rule when `None`.
    ///
    /// Existing rules are not renumbered: an occupied index ends up twice.
    pub fn add_access_control(&mut self, rule: &AclRule, index: Option<usize>) {
        let index = index.unwrap_or_else(|| self.entry.string_values(ACCESS).len());
        self.entry
            .add_indexed_string_value(ACCESS, &rule.to_string(), index);
    }

    /// Replaces all rules, numbering them from 0.
    pub fn replace_access_control(&mut self, rules: &[AclRule]) {
        self.entry.set_string_values(ACCESS, Vec::new());
        for (i, rule) in rules.iter().enumerate() {
            self.add_access_control(rule, Some(i));
        }
    }

    #[must_use]
    pub fn overlays(&self) -> &[OverlayConfig] {
        &self.overlays
    }

    pub fn overlays_mut(&mut self) -> &mut [OverlayConfig] {
        &mut self.overlays
    }

    pub fn add_overlay(&mut self, overlay: OverlayConfig) {
        debug!("database {} gets overlay {}", self.entry.working_dn(), overlay.overlay_type());
        self.overlays.push(overlay);
    }
}

impl ConfigNode for DatabaseConfig {
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
}

impl Ordered for DatabaseConfig {
    fn set_index(&mut self, index: i32, mirror_original: bool) {
        self.entry.set_index_value(index);
        let db_type = self.db_type.clone();
        self.entry
            .apply_position(DATABASE, &db_type, GLOBAL_DN, mirror_original);
    }
}

/// Indexing and tuning view of a bdb/hdb/mdb database.
#[derive(Debug)]
pub struct IndexedDatabase<'a> {
    backend: IndexedBackend,
    entry: &'a mut ConfigEntry,
}

impl IndexedDatabase<'_> {
    #[must_use]
    pub fn backend(&self) -> IndexedBackend {
        self.backend
    }

    /// All index definitions, keyed by the name as first written. When an
    /// attribute is listed twice, in any case, the first definition wins.
    #[must_use]
    pub fn indexes(&self) -> IndexSpec {
        let mut spec = IndexSpec::new();
        for raw in self.entry.string_values(DB_INDEX) {
            let (name, flags) = decode_index_attribute(raw);
            if !spec.keys().any(|known| known.eq_ignore_ascii_case(name)) {
                spec.insert(name.to_string(), flags);
            }
        }
        spec
    }

    /// Flags of the first definition for `attr`.
    #[must_use]
    pub fn index(&self, attr: &str) -> Option<Vec<IndexFlag>> {
        self.entry
            .string_values(DB_INDEX)
            .iter()
            .map(|raw| decode_index_attribute(raw))
            .find(|(name, _)| name.eq_ignore_ascii_case(attr))
            .map(|(_, flags)| flags)
    }

    pub fn add_index(&mut self, attr: &str, flags: &[IndexFlag]) {
        let value = encode_index_attribute(attr, flags);
        debug!("adding index {:?}", value);
        self.entry.add_string_value(DB_INDEX, value);
    }

    /// Drops every definition for `attr`.
    pub fn delete_index(&mut self, attr: &str) {
        let kept: Vec<String> = self
            .entry
            .string_values(DB_INDEX)
            .iter()
            .filter(|raw| !decode_index_attribute(raw).0.eq_ignore_ascii_case(attr))
            .cloned()
            .collect();
        self.entry.set_string_values(DB_INDEX, kept);
    }

    #[must_use]
    pub fn directory(&self) -> Option<&str> {
        self.entry.string_value(DB_DIRECTORY)
    }

    pub fn set_directory(&mut self, dir: &str) {
        self.entry.set_string_value(DB_DIRECTORY, dir);
    }

    /// Entry cache size, `None` when unset.
    pub fn entry_cache(&self) -> ModelResult<Option<i64>> {
        self.entry.int_value(DB_CACHESIZE)
    }

    /// Sets the entry cache size; 0 removes the setting.
    pub fn set_entry_cache(&mut self, size: i64) {
        set_nonzero(self.entry, DB_CACHESIZE, size);
    }

    /// IDL cache size, `None` when unset.
    pub fn idl_cache(&self) -> ModelResult<Option<i64>> {
        self.entry.int_value(DB_IDL_CACHESIZE)
    }

    /// Sets the IDL cache size; 0 removes the setting.
    pub fn set_idl_cache(&mut self, size: i64) {
        set_nonzero(self.entry, DB_IDL_CACHESIZE, size);
    }

    /// Checkpoint interval as `(kbytes, minutes)`.
    ///
    /// # Errors
    ///
    /// [`ModelError::InvalidInteger`] when the value is not two integers.
    pub fn checkpoint(&self) -> ModelResult<Option<(i64, i64)>> {
        let Some(raw) = self.entry.string_value(DB_CHECKPOINT) else {
            return Ok(None);
        };
        let invalid = || ModelError::InvalidInteger {
            attribute: DB_CHECKPOINT.to_string(),
            value: raw.to_string(),
        };
        let mut parts = raw.split_whitespace().map(str::parse::<i64>);
        match (parts.next(), parts.next(), parts.next()) {
            (Some(Ok(kbytes)), Some(Ok(minutes)), None) => Ok(Some((kbytes, minutes))),
            _ => Err(invalid()),
        }
    }

    /// Sets the checkpoint interval; `(0, 0)` removes the setting.
    pub fn set_checkpoint(&mut self, kbytes: i64, minutes: i64) {
        if kbytes == 0 && minutes == 0 {
            self.entry.set_string_value(DB_CHECKPOINT, "");
        } else {
            self.entry
                .set_string_value(DB_CHECKPOINT, &format!("{kbytes} {minutes}"));
        }
    }
}

fn set_nonzero(entry: &mut ConfigEntry, name: &str, value: i64) {
    if value == 0 {
        entry.set_string_value(name, "");
    } else {
        entry.set_int_value(name, value);
    }
}
