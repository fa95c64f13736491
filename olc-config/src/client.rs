//! Reading and writing `cn=config` through a [`Transport`].

use crate::error::{ConfigError, ConfigResult};
use crate::transport::Transport;
use olc_model::{
    ConfigNode, DATABASE_OBJECT_CLASS, DatabaseConfig, GLOBAL_DN, GlobalConfig,
    OVERLAY_OBJECT_CLASS, OverlayConfig, SCHEMA_BASE_DN, SCHEMA_OBJECT_CLASS, SchemaConfig,
};
use olc_types::{Modification, SearchScope};
use tracing::{Dispatch, debug, info, warn};

/// Client for the config backend of a running server.
///
/// Built without a transport it still exists but every operation fails
/// with [`ConfigError::NotConnected`]. When a [`Dispatch`] is supplied,
/// each operation logs through it instead of the global subscriber.
pub struct OlcConfig<T> {
    transport: Option<T>,
    dispatch: Option<Dispatch>,
}

impl<T> Default for OlcConfig<T> {
    fn default() -> Self {
        Self::disconnected()
    }
}

impl<T> OlcConfig<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport: Some(transport),
            dispatch: None,
        }
    }

    /// A client with no connection.
    pub fn disconnected() -> Self {
        Self {
            transport: None,
            dispatch: None,
        }
    }

    /// Routes this client's diagnostics to `dispatch`.
    #[must_use]
    pub fn with_dispatch(mut self, dispatch: Dispatch) -> Self {
        self.dispatch = Some(dispatch);
        self
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.transport.is_some()
    }

    pub fn transport(&self) -> Option<&T> {
        self.transport.as_ref()
    }
}

impl<T: Transport> OlcConfig<T> {
    fn run<R>(&mut self, op: impl FnOnce(&mut T) -> ConfigResult<R>) -> ConfigResult<R> {
        let transport = self.transport.as_mut().ok_or(ConfigError::NotConnected)?;
        match &self.dispatch {
            Some(dispatch) => tracing::dispatcher::with_default(dispatch, || op(transport)),
            None => op(transport),
        }
    }

    /// Reads `cn=config`. A server without one yields a fresh, unsaved
    /// global entry.
    pub fn globals(&mut self) -> ConfigResult<GlobalConfig> {
        self.run(|t| {
            let found = t
                .search(GLOBAL_DN, SearchScope::Base, None)
                .inspect_err(|e| warn!("reading {} failed: {}", GLOBAL_DN, e))?
                .into_iter()
                .next();
            Ok(match found {
                Some(entry) => {
                    info!("got global config {}", entry.dn());
                    GlobalConfig::from_entry(entry)
                }
                None => GlobalConfig::new(),
            })
        })
    }

    /// Sends the pending changes of the global entry.
    ///
    /// Unlike [`OlcConfig::update_entry`] the entry is not re-read.
    pub fn set_globals(&mut self, globals: &GlobalConfig) -> ConfigResult<()> {
        let mods = globals.entry().modifications();
        let dn = globals.entry().dn().to_string();
        self.run(|t| {
            if mods.is_empty() {
                debug!("{}: no changes", dn);
                return Ok(());
            }
            t.modify(&dn, &mods)
                .inspect_err(|e| warn!("modifying {} failed: {}", dn, e))?;
            Ok(())
        })
    }

    /// Reads every database below `cn=config`, each with its overlays.
    pub fn databases(&mut self) -> ConfigResult<Vec<DatabaseConfig>> {
        self.run(|t| {
            let filter = format!("objectclass={DATABASE_OBJECT_CLASS}");
            let entries = t.search(GLOBAL_DN, SearchScope::One, Some(&filter))?;
            let mut databases = Vec::with_capacity(entries.len());
            for entry in entries {
                info!("got database entry {}", entry.dn());
                let mut db = DatabaseConfig::from_entry(entry);
                let filter = format!("objectclass={OVERLAY_OBJECT_CLASS}");
                let dn = db.entry().dn().to_string();
                for overlay in t.search(&dn, SearchScope::One, Some(&filter))? {
                    info!("got overlay {}", overlay.dn());
                    db.add_overlay(OverlayConfig::from_entry(overlay));
                }
                databases.push(db);
            }
            Ok(databases)
        })
    }

    /// Reads the schema container and every schema entry below it, in
    /// server order. The container comes back unvalidated.
    pub fn schema_entries(&mut self) -> ConfigResult<Vec<SchemaConfig>> {
        self.run(|t| {
            let filter = format!("objectclass={SCHEMA_OBJECT_CLASS}");
            t.search(SCHEMA_BASE_DN, SearchScope::Sub, Some(&filter))?
                .into_iter()
                .map(|entry| -> ConfigResult<SchemaConfig> {
                    info!("got schema entry {}", entry.dn());
                    if entry.dn().eq_ignore_ascii_case(SCHEMA_BASE_DN) {
                        Ok(SchemaConfig::base_from_entry(entry))
                    } else {
                        Ok(SchemaConfig::from_entry(entry)?)
                    }
                })
                .collect()
        })
    }

    /// Writes one entry back.
    ///
    /// New entries are added, cleared ones deleted, others modified when
    /// their diff is non-empty. After an add or modify the entry is read
    /// again by its working DN and the node reset to what the server
    /// stored, which picks up server-assigned positions.
    pub fn update_entry(&mut self, node: &mut dyn ConfigNode) -> ConfigResult<()> {
        self.run(|t| {
            let entry = node.entry();
            info!(
                "updating entry, old dn {:?} new dn {:?}",
                entry.dn(),
                entry.working_dn()
            );
            let result = if entry.is_new() {
                t.add(entry.working()).map(|()| true)
            } else if entry.is_deleted() {
                t.delete(entry.dn()).map(|()| false)
            } else {
                let mods = entry.modifications();
                if mods.is_empty() {
                    debug!("{}: no changes", entry.dn());
                    Ok(false)
                } else {
                    t.modify(entry.dn(), &mods).map(|()| true)
                }
            };
            let reread = result.inspect_err(|e| warn!("updating {} failed: {}", entry.dn(), e))?;
            if !reread {
                return Ok(());
            }
            let dn = entry.working_dn().to_string();
            if let Some(stored) = t.search(&dn, SearchScope::Base, None)?.into_iter().next() {
                info!("re-read entry {}", stored.dn());
                node.reset(stored);
            }
            Ok(())
        })
    }

    /// Blocks until the server has finished background work such as
    /// indexing.
    ///
    /// The config backend only completes a modify once it is the only
    /// active thread, so a no-op modify of `cn=config` serves as a barrier.
    pub fn wait_for_background_tasks(&mut self) -> ConfigResult<()> {
        self.run(|t| {
            let barrier = [Modification::add("objectClass", vec!["olcConfig".into()])];
            match t.modify(GLOBAL_DN, &barrier) {
                Ok(()) => Ok(()),
                Err(e) if e.is_attribute_or_value_exists() => Ok(()),
                Err(e) => {
                    warn!("waiting for background tasks failed: {}", e);
                    Err(e.into())
                }
            }
        })
    }
}
