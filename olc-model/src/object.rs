use crate::database::{DATABASE_OBJECT_CLASS, DatabaseConfig};
use crate::entry::{ConfigEntry, ConfigNode};
use crate::error::ModelResult;
use crate::global::GlobalConfig;
use crate::overlay::{OVERLAY_OBJECT_CLASS, OverlayConfig};
use crate::schema::{SCHEMA_BASE_DN, SCHEMA_OBJECT_CLASS, SchemaConfig};
use olc_types::Entry;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

/// Which config kind an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigKind {
    Global,
    Schema,
    Database,
    Overlay,
    Generic,
}

impl ConfigKind {
    /// Classifies an entry by its object classes. The first match in the
    /// order global, schema, database, overlay wins.
    #[must_use]
    pub fn classify(entry: &Entry) -> Self {
        if entry.has_object_class("olcGlobal") {
            Self::Global
        } else if entry.has_object_class(SCHEMA_OBJECT_CLASS) {
            Self::Schema
        } else if entry.has_object_class(DATABASE_OBJECT_CLASS) {
            Self::Database
        } else if entry.has_object_class(OVERLAY_OBJECT_CLASS) {
            Self::Overlay
        } else {
            Self::Generic
        }
    }
}

impl fmt::Display for ConfigKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Global => "global",
            Self::Schema => "schema",
            Self::Database => "database",
            Self::Overlay => "overlay",
            Self::Generic => "generic",
        };
        f.write_str(s)
    }
}

/// Any entry of the config tree, typed by kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigObject {
    Global(GlobalConfig),
    Schema(SchemaConfig),
    Database(DatabaseConfig),
    Overlay(OverlayConfig),
    Generic(ConfigEntry),
}

impl ConfigObject {
    /// Wraps a server entry in the kind [`ConfigKind::classify`] picks.
    ///
    /// The schema container is accepted as is; other schema entries are
    /// validated.
    ///
    /// # Errors
    ///
    /// The validation errors of [`SchemaConfig::from_entry`].
    pub fn from_entry(entry: Entry) -> ModelResult<Self> {
        let kind = ConfigKind::classify(&entry);
        info!("creating {} config object for {}", kind, entry.dn());
        Ok(match kind {
            ConfigKind::Global => Self::Global(GlobalConfig::from_entry(entry)),
            ConfigKind::Schema if entry.dn().eq_ignore_ascii_case(SCHEMA_BASE_DN) => {
                Self::Schema(SchemaConfig::base_from_entry(entry))
            }
            ConfigKind::Schema => Self::Schema(SchemaConfig::from_entry(entry)?),
            ConfigKind::Database => Self::Database(DatabaseConfig::from_entry(entry)),
            ConfigKind::Overlay => Self::Overlay(OverlayConfig::from_entry(entry)),
            ConfigKind::Generic => Self::Generic(ConfigEntry::from_entry(entry)),
        })
    }

    #[must_use]
    pub fn kind(&self) -> ConfigKind {
        match self {
            Self::Global(_) => ConfigKind::Global,
            Self::Schema(_) => ConfigKind::Schema,
            Self::Database(_) => ConfigKind::Database,
            Self::Overlay(_) => ConfigKind::Overlay,
            Self::Generic(_) => ConfigKind::Generic,
        }
    }

    fn node(&self) -> &dyn ConfigNode {
        match self {
            Self::Global(g) => g,
            Self::Schema(s) => s,
            Self::Database(d) => d,
            Self::Overlay(o) => o,
            Self::Generic(e) => e,
        }
    }

    fn node_mut(&mut self) -> &mut dyn ConfigNode {
        match self {
            Self::Global(g) => g,
            Self::Schema(s) => s,
            Self::Database(d) => d,
            Self::Overlay(o) => o,
            Self::Generic(e) => e,
        }
    }

    #[must_use]
    pub fn as_database(&self) -> Option<&DatabaseConfig> {
        match self {
            Self::Database(db) => Some(db),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_schema(&self) -> Option<&SchemaConfig> {
        match self {
            Self::Schema(schema) => Some(schema),
            _ => None,
        }
    }
}

impl ConfigNode for ConfigObject {
    fn entry(&self) -> &ConfigEntry {
        self.node().entry()
    }

    fn entry_mut(&mut self) -> &mut ConfigEntry {
        self.node_mut().entry_mut()
    }

    fn reset(&mut self, entry: Entry) {
        self.node_mut().reset(entry);
    }

    fn clear_changed(&mut self) {
        self.node_mut().clear_changed();
    }
}
