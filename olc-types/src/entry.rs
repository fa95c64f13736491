use crate::{Attribute, AttributeSet};
use serde::{Deserialize, Serialize};

/// Name of the structural object class attribute.
pub const OBJECT_CLASS: &str = "objectClass";

/// A directory entry: a distinguished name plus its attributes.
///
/// An empty `dn` means the entry has not been materialized on a server yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    dn: String,
    attributes: AttributeSet,
}

impl Entry {
    /// Creates an entry with the given DN and no attributes.
    pub fn new(dn: impl Into<String>) -> Self {
        Self {
            dn: dn.into(),
            attributes: AttributeSet::new(),
        }
    }

    /// Creates an entry from a DN and a list of attributes.
    pub fn with_attributes(dn: impl Into<String>, attributes: impl IntoIterator<Item = Attribute>) -> Self {
        Self {
            dn: dn.into(),
            attributes: attributes.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn dn(&self) -> &str {
        &self.dn
    }

    pub fn set_dn(&mut self, dn: impl Into<String>) {
        self.dn = dn.into();
    }

    /// Returns true if the entry has no DN (never written to a server).
    #[must_use]
    pub fn is_unnamed(&self) -> bool {
        self.dn.is_empty()
    }

    #[must_use]
    pub fn attributes(&self) -> &AttributeSet {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut AttributeSet {
        &mut self.attributes
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    /// Values of `name`, empty when the attribute is absent.
    #[must_use]
    pub fn values(&self, name: &str) -> &[String] {
        self.attributes.values(name)
    }

    pub fn set_values(&mut self, name: &str, values: Vec<String>) {
        self.attributes.set(name, values);
    }

    pub fn add_value(&mut self, name: &str, value: impl Into<String>) {
        self.attributes.add_value(name, value);
    }

    pub fn replace_attribute(&mut self, attr: Attribute) {
        self.attributes.replace(attr);
    }

    pub fn remove_attribute(&mut self, name: &str) -> Option<Attribute> {
        self.attributes.remove(name)
    }

    /// Returns true if `objectClass` holds `class`, compared case-insensitively.
    #[must_use]
    pub fn has_object_class(&self, class: &str) -> bool {
        self.values(OBJECT_CLASS)
            .iter()
            .any(|oc| oc.eq_ignore_ascii_case(class))
    }
}
