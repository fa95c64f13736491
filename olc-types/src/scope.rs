use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Search scope, spelled the way `ldapsearch -s` spells it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchScope {
    /// Only the base entry.
    Base,
    /// Immediate children of the base.
    One,
    /// The base and everything below it.
    Sub,
}

impl fmt::Display for SearchScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Base => "base",
            Self::One => "one",
            Self::Sub => "sub",
        };
        f.write_str(s)
    }
}

impl FromStr for SearchScope {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "base" => Ok(Self::Base),
            "one" => Ok(Self::One),
            "sub" => Ok(Self::Sub),
            _ => Err(Error::InvalidScope(s.to_string())),
        }
    }
}
