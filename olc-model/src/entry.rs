//! The two-snapshot config entry every config kind is built on.

use crate::error::{ModelError, ModelResult};
use olc_types::ldif::LdifWriter;
use olc_types::{Attribute, Entry, Modification, diff_entries, join_index};
use tracing::debug;

/// Index of an entry that carries no explicit `{n}` position.
pub const NO_INDEX: i32 = -1;

/// A config entry as last read from the server (`original`) plus the pending
/// edits made to it (`working`).
///
/// All setters write into `working`. [`ConfigEntry::modifications`] compiles
/// the difference into protocol modifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigEntry {
    original: Entry,
    working: Entry,
    index: i32,
}

impl ConfigEntry {
    /// Wraps an entry read from the server. Both snapshots start equal.
    pub fn from_entry(entry: Entry) -> Self {
        Self {
            original: entry.clone(),
            working: entry,
            index: NO_INDEX,
        }
    }

    /// Wraps an entry that does not exist on the server yet.
    pub fn new_entry(working: Entry) -> Self {
        Self {
            original: Entry::default(),
            working,
            index: NO_INDEX,
        }
    }

    #[must_use]
    pub fn original(&self) -> &Entry {
        &self.original
    }

    #[must_use]
    pub fn working(&self) -> &Entry {
        &self.working
    }

    pub(crate) fn working_mut(&mut self) -> &mut Entry {
        &mut self.working
    }

    /// DN of the server-side entry; empty for new entries.
    #[must_use]
    pub fn dn(&self) -> &str {
        self.original.dn()
    }

    /// DN the entry will have after the next commit.
    #[must_use]
    pub fn working_dn(&self) -> &str {
        self.working.dn()
    }

    #[must_use]
    pub fn index(&self) -> i32 {
        self.index
    }

    pub(crate) fn set_index_value(&mut self, index: i32) {
        self.index = index;
    }

    /// True if the entry has never been written to the server.
    #[must_use]
    pub fn is_new(&self) -> bool {
        self.original.is_unnamed()
    }

    /// True if the entry exists on the server and has been cleared locally.
    #[must_use]
    pub fn is_deleted(&self) -> bool {
        !self.original.is_unnamed() && self.working.is_unnamed()
    }

    /// Empties the working snapshot, marking the entry for deletion.
    pub fn clear_changed(&mut self) {
        self.working = Entry::default();
    }

    /// Replaces both snapshots with the server's canonical entry.
    pub fn reset(&mut self, entry: Entry) {
        debug!("resetting entry {}", entry.dn());
        self.original = entry.clone();
        self.working = entry;
    }

    /// All values of `name`, empty when absent.
    #[must_use]
    pub fn string_values(&self, name: &str) -> &[String] {
        self.working.values(name)
    }

    /// The value of `name` when it holds exactly one.
    #[must_use]
    pub fn string_value(&self, name: &str) -> Option<&str> {
        match self.string_values(name) {
            [value] => Some(value),
            _ => None,
        }
    }

    /// Replaces all values of `name`. An empty list removes the attribute.
    pub fn set_string_values(&mut self, name: &str, values: Vec<String>) {
        self.working.set_values(name, values);
    }

    /// Sets `name` to a single value. An empty value removes the attribute.
    pub fn set_string_value(&mut self, name: &str, value: &str) {
        debug!("set {} to {:?}", name, value);
        if value.is_empty() {
            self.working.remove_attribute(name);
        } else {
            self.working.replace_attribute(Attribute::single(name, value));
        }
    }

    pub fn add_string_value(&mut self, name: &str, value: impl Into<String>) {
        self.working.add_value(name, value);
    }

    /// Appends `{index}value` to `name`.
    pub fn add_indexed_string_value(&mut self, name: &str, value: &str, index: usize) {
        let index = i32::try_from(index).unwrap_or(i32::MAX);
        self.add_string_value(name, join_index(index, value));
    }

    /// Reads `name` as an integer.
    ///
    /// # Errors
    ///
    /// [`ModelError::NotSingleValued`] when the attribute holds several
    /// values, [`ModelError::InvalidInteger`] when its value is not a number.
    pub fn int_value(&self, name: &str) -> ModelResult<Option<i64>> {
        match self.string_values(name) {
            [] => Ok(None),
            [value] => value
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| ModelError::InvalidInteger {
                    attribute: name.to_string(),
                    value: value.clone(),
                }),
            _ => Err(ModelError::NotSingleValued(name.to_string())),
        }
    }

    pub fn set_int_value(&mut self, name: &str, value: i64) {
        self.set_string_value(name, &value.to_string());
    }

    /// Modifications that turn the server entry into the working one.
    #[must_use]
    pub fn modifications(&self) -> Vec<Modification> {
        diff_entries(&self.original, &self.working)
    }

    /// Renders the working snapshot with the given LDIF writer.
    pub fn to_ldif(&self, writer: &dyn LdifWriter) -> String {
        writer.write_record(&self.working)
    }

    /// Recomputes the DN and naming attribute from the current index.
    ///
    /// The entry is named `<naming>={index}<local>,<parent>`. With `mirror`
    /// set and a materialized original, the original is renamed as well so
    /// the new position does not show up as a pending change.
    pub(crate) fn apply_position(&mut self, naming: &str, local: &str, parent: &str, mirror: bool) {
        let value = join_index(self.index, local);
        let dn = format!("{naming}={value},{parent}");
        debug!("positioning entry {} as {}", self.working.dn(), dn);
        self.working.set_dn(dn.clone());
        self.working
            .replace_attribute(Attribute::single(naming, value.clone()));
        if mirror && !self.original.is_unnamed() {
            self.original.set_dn(dn);
            self.original.replace_attribute(Attribute::single(naming, value));
        }
    }
}

/// Shared behavior of every config kind.
///
/// Kinds that derive state from their entry (type names, positions)
/// override [`ConfigNode::reset`] and refresh it there.
pub trait ConfigNode {
    fn entry(&self) -> &ConfigEntry;

    fn entry_mut(&mut self) -> &mut ConfigEntry;

    /// Takes over the server's canonical entry after a commit.
    fn reset(&mut self, entry: Entry) {
        self.entry_mut().reset(entry);
    }

    /// Marks the entry for deletion at the next commit.
    fn clear_changed(&mut self) {
        self.entry_mut().clear_changed();
    }
}

impl ConfigNode for ConfigEntry {
    fn entry(&self) -> &ConfigEntry {
        self
    }

    fn entry_mut(&mut self) -> &mut ConfigEntry {
        self
    }
}

/// Config kinds whose DN carries a `{n}` position among their siblings.
///
/// Siblings are never renumbered automatically: giving two entries the same
/// index yields two entries with the same position.
pub trait Ordered: ConfigNode {
    /// Stores `index` and recomputes the working DN and naming attribute.
    /// With `mirror_original` set, a materialized original is renamed too.
    fn set_index(&mut self, index: i32, mirror_original: bool);
}
