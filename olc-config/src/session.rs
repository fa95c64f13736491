//! The editing session: every config object a tool works on, in one place.

use crate::bootstrap::DatabaseSpec;
use crate::client::OlcConfig;
use crate::error::{ConfigError, ConfigResult};
use crate::transport::Transport;
use olc_model::{
    ConfigNode, ConfigObject, DatabaseConfig, GlobalConfig, SchemaConfig, import_schema_file,
};
use olc_types::Entry;
use olc_types::ldif::{LdifReader, LdifWriter};
use std::path::Path;
use tracing::{debug, info, warn};

/// Owns the global entry, the schema container, the schema entries and the
/// databases (which in turn own their overlays).
///
/// A session is filled either from a running server ([`ConfigSession::load`]),
/// from entries read elsewhere ([`ConfigSession::load_entries`]), or built
/// from scratch with the `init_*` methods. [`ConfigSession::commit`] writes
/// the pending changes back; [`ConfigSession::to_ldif`] renders the whole
/// tree for offline import.
#[derive(Debug, Clone, Default)]
pub struct ConfigSession {
    globals: Option<GlobalConfig>,
    schema_base: Option<SchemaConfig>,
    schema: Vec<SchemaConfig>,
    databases: Vec<DatabaseConfig>,
}

impl ConfigSession {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Bootstrap ────────────────────────────────────────────────────

    /// Starts over with a fresh global entry carrying the server defaults.
    pub fn init_globals(&mut self) {
        let mut globals = GlobalConfig::new();
        globals.init_defaults();
        self.globals = Some(globals);
    }

    /// Starts over with an empty schema container.
    pub fn init_schema(&mut self) {
        self.schema_base = Some(SchemaConfig::schema_base());
    }

    /// Appends one new database per description. The first one gets
    /// position -1 (the frontend), the next 0, and so on.
    ///
    /// # Errors
    ///
    /// Fails on the first description with an invalid access line; the
    /// databases built before it are kept.
    pub fn init_databases(&mut self, specs: &[DatabaseSpec]) -> ConfigResult<()> {
        for (i, spec) in (-1..).zip(specs) {
            info!("initialising {} database at position {}", spec.db_type, i);
            let db = spec.build(i)?;
            self.databases.push(db);
        }
        Ok(())
    }

    /// Takes entries read from somewhere else (typically an LDIF dump) into
    /// the session, by kind. Overlays are attached to the already loaded
    /// database they live below; entries of no known kind are skipped.
    pub fn load_entries(&mut self, entries: impl IntoIterator<Item = Entry>) -> ConfigResult<()> {
        for entry in entries {
            match ConfigObject::from_entry(entry)? {
                ConfigObject::Global(globals) => self.globals = Some(globals),
                ConfigObject::Schema(schema) if schema.is_schema_base() => {
                    self.schema_base = Some(schema);
                }
                ConfigObject::Schema(schema) => self.schema.push(schema),
                ConfigObject::Database(db) => self.databases.push(db),
                ConfigObject::Overlay(overlay) => {
                    let parent = self
                        .databases
                        .iter_mut()
                        .find(|db| db.entry().dn().eq_ignore_ascii_case(overlay.parent_dn()));
                    match parent {
                        Some(db) => db.add_overlay(overlay),
                        None => warn!(
                            "skipping overlay {}: database {} not loaded",
                            overlay.entry().dn(),
                            overlay.parent_dn()
                        ),
                    }
                }
                ConfigObject::Generic(entry) => {
                    debug!("skipping entry {}", entry.dn());
                }
            }
        }
        Ok(())
    }

    /// Replaces the session's content with what the server holds.
    pub fn load<T: Transport>(&mut self, client: &mut OlcConfig<T>) -> ConfigResult<()> {
        let globals = client.globals()?;
        let databases = client.databases()?;
        let (base, schema): (Vec<_>, Vec<_>) = client
            .schema_entries()?
            .into_iter()
            .partition(SchemaConfig::is_schema_base);
        self.globals = Some(globals);
        self.databases = databases;
        self.schema_base = base.into_iter().next();
        self.schema = schema;
        Ok(())
    }

    // ── Schema ───────────────────────────────────────────────────────

    /// Imports a `.schema` file as a new schema entry.
    pub fn add_schema_file(&mut self, path: &Path) -> ConfigResult<&SchemaConfig> {
        info!("reading schema from {}", path.display());
        let schema = import_schema_file(path)?;
        Ok(self.push_schema(schema))
    }

    /// Adds a schema entry that is not on the server yet.
    pub fn add_schema_entry(&mut self, entry: Entry) -> ConfigResult<&SchemaConfig> {
        let schema = SchemaConfig::new_entry(entry)?;
        Ok(self.push_schema(schema))
    }

    /// Adds the first record of an LDIF document as a new schema entry.
    pub fn add_schema_ldif<R: LdifReader>(
        &mut self,
        reader: &R,
        text: &str,
    ) -> ConfigResult<&SchemaConfig> {
        let entry = reader
            .read_record(text)
            .map_err(|e| ConfigError::Ldif(Box::new(e)))?;
        self.add_schema_entry(entry)
    }

    fn push_schema(&mut self, schema: SchemaConfig) -> &SchemaConfig {
        info!("adding {} to the schema list", schema.entry().working_dn());
        self.schema.push(schema);
        &self.schema[self.schema.len() - 1]
    }

    /// Marks every schema entry called `name` for deletion. Returns whether
    /// any matched.
    pub fn remove_schema(&mut self, name: &str) -> bool {
        let mut found = false;
        for schema in self.schema.iter_mut().filter(|s| s.name() == name) {
            info!("removing schema entry {}", schema.entry().dn());
            schema.clear_changed();
            found = true;
        }
        found
    }

    /// Names of the schema entries not marked for deletion.
    #[must_use]
    pub fn schema_names(&self) -> Vec<&str> {
        self.schema
            .iter()
            .map(SchemaConfig::name)
            .filter(|name| !name.is_empty())
            .collect()
    }

    #[must_use]
    pub fn schema(&self, name: &str) -> Option<&SchemaConfig> {
        self.schema.iter().find(|s| s.name() == name)
    }

    #[must_use]
    pub fn schema_list(&self) -> &[SchemaConfig] {
        &self.schema
    }

    #[must_use]
    pub fn schema_base(&self) -> Option<&SchemaConfig> {
        self.schema_base.as_ref()
    }

    // ── Globals & databases ──────────────────────────────────────────

    #[must_use]
    pub fn globals(&self) -> Option<&GlobalConfig> {
        self.globals.as_ref()
    }

    pub fn globals_mut(&mut self) -> Option<&mut GlobalConfig> {
        self.globals.as_mut()
    }

    #[must_use]
    pub fn databases(&self) -> &[DatabaseConfig] {
        &self.databases
    }

    /// The database at position `index` (-1 for the frontend).
    #[must_use]
    pub fn database(&self, index: i32) -> Option<&DatabaseConfig> {
        self.databases.iter().find(|db| db.entry().index() == index)
    }

    pub fn database_mut(&mut self, index: i32) -> Option<&mut DatabaseConfig> {
        self.databases
            .iter_mut()
            .find(|db| db.entry().index() == index)
    }

    pub fn add_database(&mut self, db: DatabaseConfig) {
        self.databases.push(db);
    }

    // ── Output ───────────────────────────────────────────────────────

    /// Writes every pending change to the server: the global entry, the
    /// schema entries, then each database followed by its overlays.
    ///
    /// Stops at the first failure; entries written before it stay written.
    /// The schema container is never written, the server creates it.
    /// Schema entries deleted on the server are dropped from the session.
    pub fn commit<T: Transport>(&mut self, client: &mut OlcConfig<T>) -> ConfigResult<()> {
        if let Some(globals) = &mut self.globals {
            client.update_entry(globals)?;
        }
        for schema in &mut self.schema {
            client.update_entry(schema)?;
        }
        self.schema.retain(|s| !s.entry().is_deleted());
        for db in &mut self.databases {
            client.update_entry(&mut *db)?;
            for overlay in db.overlays_mut() {
                debug!("update overlay {}", overlay.entry().dn());
                client.update_entry(overlay)?;
            }
        }
        Ok(())
    }

    /// Renders the session as one LDIF document: globals, schema container,
    /// schema entries, then each database followed by its overlays. Records
    /// are separated by a blank line.
    pub fn to_ldif(&self, writer: &dyn LdifWriter) -> String {
        let globals = self.globals.iter().map(|g| g.entry());
        let base = self.schema_base.iter().map(|s| s.entry());
        let schema = self.schema.iter().map(|s| s.entry());
        let databases = self.databases.iter().flat_map(|db| {
            std::iter::once(db.entry()).chain(db.overlays().iter().map(|o| o.entry()))
        });
        let mut ldif = String::new();
        for entry in globals.chain(base).chain(schema).chain(databases) {
            ldif.push_str(&entry.to_ldif(writer));
            ldif.push('\n');
        }
        ldif
    }
}
