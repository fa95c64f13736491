use crate::entry::{ConfigEntry, ConfigNode, NO_INDEX, Ordered};
use olc_types::{Attribute, Entry, OBJECT_CLASS, split_index};
use tracing::{debug, info};

const OVERLAY: &str = "olcOverlay";

/// Object class every overlay entry carries.
pub const OVERLAY_OBJECT_CLASS: &str = "olcOverlayConfig";

/// An `olcOverlay={n}<type>,<database dn>` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayConfig {
    entry: ConfigEntry,
    overlay_type: String,
    parent: String,
}

impl OverlayConfig {
    /// A new overlay below the database `parent`.
    ///
    /// `object_class` is the overlay's own class, e.g. `olcPPolicyConfig`.
    pub fn new(overlay_type: &str, object_class: &str, parent: &str) -> Self {
        let entry = Entry::with_attributes(
            format!("{OVERLAY}={overlay_type},{parent}"),
            [
                Attribute::with_values(OBJECT_CLASS, [OVERLAY_OBJECT_CLASS, object_class]),
                Attribute::single(OVERLAY, overlay_type),
            ],
        );
        Self {
            entry: ConfigEntry::new_entry(entry),
            overlay_type: overlay_type.to_string(),
            parent: parent.to_string(),
        }
    }

    pub fn from_entry(entry: Entry) -> Self {
        let mut overlay = Self {
            entry: ConfigEntry::from_entry(entry),
            overlay_type: String::new(),
            parent: String::new(),
        };
        overlay.refresh();
        info!("overlay {} type {}", overlay.entry.dn(), overlay.overlay_type);
        overlay
    }

    fn refresh(&mut self) {
        let (index, overlay_type) = match self.entry.string_value(OVERLAY) {
            Some(raw) => {
                let (index, name) = split_index(raw);
                (index, name.to_string())
            }
            None => (NO_INDEX, String::new()),
        };
        self.entry.set_index_value(index);
        self.overlay_type = overlay_type;
        if let Some((_, parent)) = self.entry.working_dn().split_once(',') {
            self.parent = parent.to_string();
        }
    }

    #[must_use]
    pub fn overlay_type(&self) -> &str {
        &self.overlay_type
    }

    /// DN of the database the overlay belongs to.
    #[must_use]
    pub fn parent_dn(&self) -> &str {
        &self.parent
    }

    /// Moves the overlay below another database DN.
    ///
    /// A materialized original is renamed too: a changed parent is the
    /// result of renumbering on the server, not an edit.
    pub fn set_parent_dn(&mut self, parent: &str) {
        parent.clone_into(&mut self.parent);
        let overlay_type = self.overlay_type.clone();
        debug!("overlay {} moves below {}", overlay_type, parent);
        self.entry.apply_position(OVERLAY, &overlay_type, parent, true);
    }
}

impl ConfigNode for OverlayConfig {
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

impl Ordered for OverlayConfig {
    fn set_index(&mut self, index: i32, mirror_original: bool) {
        self.entry.set_index_value(index);
        let overlay_type = self.overlay_type.clone();
        let parent = self.parent.clone();
        self.entry
            .apply_position(OVERLAY, &overlay_type, &parent, mirror_original);
    }
}
