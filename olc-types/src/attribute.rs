//! Multi-valued attributes with case-insensitive names.
//!
//! Attribute names in a directory are compared without regard to ASCII case
//! (`olcAccess` and `olcaccess` are the same attribute). Values are plain
//! strings, kept in insertion order, duplicates allowed.

use serde::{Deserialize, Serialize};

/// A named, ordered list of string values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    name: String,
    values: Vec<String>,
}

impl Attribute {
    /// Creates an attribute without values.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: Vec::new(),
        }
    }

    /// Creates an attribute holding the given values.
    pub fn with_values<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates a single-valued attribute.
    pub fn single(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: vec![value.into()],
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Returns true if `name` refers to this attribute (ASCII case-insensitive).
    #[must_use]
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// Returns true if one of the values equals `value` exactly.
    #[must_use]
    pub fn contains(&self, value: &str) -> bool {
        self.values.iter().any(|v| v == value)
    }

    pub fn add_value(&mut self, value: impl Into<String>) {
        self.values.push(value.into());
    }

    pub fn set_values(&mut self, values: Vec<String>) {
        self.values = values;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Consumes the attribute and returns its values.
    #[must_use]
    pub fn into_values(self) -> Vec<String> {
        self.values
    }
}

/// An insertion-ordered collection of attributes keyed by case-insensitive name.
///
/// Invariant: no two attributes compare equal by name. Deserializing merges
/// attributes that share a name, as [`FromIterator`] does.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Attribute>", into = "Vec<Attribute>")]
pub struct AttributeSet {
    attrs: Vec<Attribute>,
}

impl AttributeSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.attrs.iter().position(|a| a.is_named(name))
    }

    /// Looks up an attribute by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.attrs.iter().find(|a| a.is_named(name))
    }

    /// Returns the values of `name`, or an empty slice when absent.
    #[must_use]
    pub fn values(&self, name: &str) -> &[String] {
        self.get(name).map(Attribute::values).unwrap_or_default()
    }

    /// Replaces all values of `name`. An empty list removes the attribute.
    pub fn set(&mut self, name: &str, values: Vec<String>) {
        if values.is_empty() {
            self.remove(name);
            return;
        }
        match self.position(name) {
            Some(pos) => self.attrs[pos].set_values(values),
            None => self.attrs.push(Attribute::with_values(name, values)),
        }
    }

    /// Appends a value, creating the attribute if needed.
    pub fn add_value(&mut self, name: &str, value: impl Into<String>) {
        match self.position(name) {
            Some(pos) => self.attrs[pos].add_value(value),
            None => self.attrs.push(Attribute::single(name, value)),
        }
    }

    /// Replaces the attribute with the same name, keeping its position.
    /// Appends it when no such attribute exists.
    pub fn replace(&mut self, attr: Attribute) {
        match self.position(attr.name()) {
            Some(pos) => self.attrs[pos] = attr,
            None => self.attrs.push(attr),
        }
    }

    /// Removes an attribute, returning it if it was present.
    pub fn remove(&mut self, name: &str) -> Option<Attribute> {
        self.position(name).map(|pos| self.attrs.remove(pos))
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Attribute> {
        self.attrs.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }
}

impl<'a> IntoIterator for &'a AttributeSet {
    type Item = &'a Attribute;
    type IntoIter = std::slice::Iter<'a, Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.attrs.iter()
    }
}

impl FromIterator<Attribute> for AttributeSet {
    /// Builds a set, merging values of attributes that share a name.
    fn from_iter<I: IntoIterator<Item = Attribute>>(iter: I) -> Self {
        let mut set = Self::new();
        for attr in iter {
            match set.position(attr.name()) {
                Some(pos) => set.attrs[pos].values.extend(attr.into_values()),
                None => set.attrs.push(attr),
            }
        }
        set
    }
}

impl From<Vec<Attribute>> for AttributeSet {
    fn from(attrs: Vec<Attribute>) -> Self {
        attrs.into_iter().collect()
    }
}

impl From<AttributeSet> for Vec<Attribute> {
    fn from(set: AttributeSet) -> Self {
        set.attrs
    }
}
