use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kind of change a [`Modification`] applies to one attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModOp {
    /// Add the listed values (creating the attribute if needed).
    Add,
    /// Delete the listed values, or the whole attribute when none are listed.
    Delete,
    /// Replace every value with the listed ones.
    Replace,
}

impl fmt::Display for ModOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Add => "add",
            Self::Delete => "delete",
            Self::Replace => "replace",
        };
        f.write_str(s)
    }
}

impl FromStr for ModOp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "add" => Ok(Self::Add),
            "delete" => Ok(Self::Delete),
            "replace" => Ok(Self::Replace),
            _ => Err(Error::InvalidModOp(s.to_string())),
        }
    }
}

/// One protocol-level modification of a single attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modification {
    pub op: ModOp,
    pub attribute: String,
    pub values: Vec<String>,
}

impl Modification {
    pub fn new(op: ModOp, attribute: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            op,
            attribute: attribute.into(),
            values,
        }
    }

    pub fn add(attribute: impl Into<String>, values: Vec<String>) -> Self {
        Self::new(ModOp::Add, attribute, values)
    }

    pub fn delete(attribute: impl Into<String>, values: Vec<String>) -> Self {
        Self::new(ModOp::Delete, attribute, values)
    }

    /// Deletes the whole attribute regardless of its values.
    pub fn delete_all(attribute: impl Into<String>) -> Self {
        Self::new(ModOp::Delete, attribute, Vec::new())
    }

    pub fn replace(attribute: impl Into<String>, values: Vec<String>) -> Self {
        Self::new(ModOp::Replace, attribute, values)
    }
}

impl fmt::Display for Modification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.op, self.attribute)?;
        if !self.values.is_empty() {
            write!(f, " [{}]", self.values.join(", "))?;
        }
        Ok(())
    }
}
