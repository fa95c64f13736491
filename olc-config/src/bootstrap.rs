//! JSON descriptions of databases for a freshly initialised server.

use crate::error::{ConfigError, ConfigResult};
use olc_acl::AclRule;
use olc_model::{ConfigNode, DatabaseConfig, ModelError, Ordered};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// One database to create, e.g.
///
/// ```json
/// { "type": "hdb", "suffix": "dc=example,dc=com", "checkpoint": [1024, 5] }
/// ```
///
/// `directory`, `entrycache`, `idlcache` and `checkpoint` only apply to
/// indexed backends and are ignored for any other type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseSpec {
    #[serde(rename = "type")]
    pub db_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
    #[serde(default, rename = "rootdn", skip_serializing_if = "Option::is_none")]
    pub root_dn: Option<String>,
    #[serde(default, rename = "rootpw", skip_serializing_if = "Option::is_none")]
    pub root_pw: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub access: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,
    #[serde(default, rename = "entrycache", skip_serializing_if = "Option::is_none")]
    pub entry_cache: Option<i64>,
    #[serde(default, rename = "idlcache", skip_serializing_if = "Option::is_none")]
    pub idl_cache: Option<i64>,
    /// `[kbytes, minutes]`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkpoint: Option<(i64, i64)>,
}

impl DatabaseSpec {
    pub fn new(db_type: impl Into<String>) -> Self {
        Self {
            db_type: db_type.into(),
            ..Self::default()
        }
    }

    /// Parses a JSON array of database descriptions.
    pub fn list_from_json(json: &str) -> ConfigResult<Vec<Self>> {
        Ok(serde_json::from_str(json)?)
    }

    fn has_backend_settings(&self) -> bool {
        self.directory.is_some()
            || self.entry_cache.is_some()
            || self.idl_cache.is_some()
            || self.checkpoint.is_some()
    }

    /// Builds the new database entry at position `index`.
    ///
    /// # Errors
    ///
    /// Fails when one of the `access` lines is not a valid rule.
    pub fn build(&self, index: i32) -> ConfigResult<DatabaseConfig> {
        let mut db = DatabaseConfig::new(&self.db_type);
        db.set_index(index, false);
        if let Some(suffix) = &self.suffix {
            db.set_suffix(suffix);
        }
        if let Some(root_dn) = &self.root_dn {
            db.set_root_dn(root_dn);
        }
        if let Some(root_pw) = &self.root_pw {
            db.set_root_pw(root_pw);
        }
        for line in &self.access {
            let rule = AclRule::parse(line).map_err(|e| ConfigError::Model(ModelError::from(e)))?;
            db.add_access_control(&rule, None);
        }
        match db.indexed() {
            Some(mut indexed) => {
                if let Some(dir) = &self.directory {
                    indexed.set_directory(dir);
                }
                if let Some(size) = self.entry_cache {
                    indexed.set_entry_cache(size);
                }
                if let Some(size) = self.idl_cache {
                    indexed.set_idl_cache(size);
                }
                if let Some((kbytes, minutes)) = self.checkpoint {
                    indexed.set_checkpoint(kbytes, minutes);
                }
            }
            None if self.has_backend_settings() => {
                warn!("ignoring backend settings for {} database", self.db_type);
            }
            None => {}
        }
        debug!("built database {}", db.entry().working_dn());
        Ok(db)
    }
}
