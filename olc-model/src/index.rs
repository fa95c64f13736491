//! `olcDbIndex` value codec.
//!
//! A value reads `<attribute> <flag>[,<flag>...]`, e.g. `uid eq,sub`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::trace;

/// Index definitions keyed by attribute name.
pub type IndexSpec = BTreeMap<String, Vec<IndexFlag>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexFlag {
    #[serde(rename = "pres")]
    Presence,
    #[serde(rename = "eq")]
    Equality,
    Approx,
    #[serde(rename = "sub")]
    Substring,
    SubInitial,
    SubAny,
    SubFinal,
    NoLang,
    NoSubtypes,
}

impl IndexFlag {
    #[must_use]
    pub fn token(&self) -> &'static str {
        match self {
            Self::Presence => "pres",
            Self::Equality => "eq",
            Self::Approx => "approx",
            Self::Substring => "sub",
            Self::SubInitial => "subinitial",
            Self::SubAny => "subany",
            Self::SubFinal => "subfinal",
            Self::NoLang => "nolang",
            Self::NoSubtypes => "nosubtypes",
        }
    }

    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        Some(match token {
            "pres" => Self::Presence,
            "eq" => Self::Equality,
            "approx" => Self::Approx,
            "sub" => Self::Substring,
            "subinitial" => Self::SubInitial,
            "subany" => Self::SubAny,
            "subfinal" => Self::SubFinal,
            "nolang" => Self::NoLang,
            "nosubtypes" => Self::NoSubtypes,
            _ => return None,
        })
    }

    /// Whether [`encode_index_attribute`] writes this flag back out.
    #[must_use]
    pub fn is_encodable(&self) -> bool {
        matches!(self, Self::Presence | Self::Equality | Self::Substring)
    }
}

impl fmt::Display for IndexFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Splits an `olcDbIndex` value into its attribute name and flags.
///
/// Unknown flag tokens are skipped.
#[must_use]
pub fn decode_index_attribute(raw: &str) -> (&str, Vec<IndexFlag>) {
    let raw = raw.trim_start();
    let (name, rest) = match raw.find([' ', '\t']) {
        Some(pos) => (&raw[..pos], raw[pos..].trim_start()),
        None => (raw, ""),
    };
    let flags = rest
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .filter_map(|t| {
            let flag = IndexFlag::from_token(t);
            if flag.is_none() {
                trace!("ignoring index token {:?} on {}", t, name);
            }
            flag
        })
        .collect();
    (name, flags)
}

/// Builds an `olcDbIndex` value.
///
/// Only `pres`, `eq` and `sub` are written; other flags are dropped. With
/// nothing left the value is the bare attribute name.
#[must_use]
pub fn encode_index_attribute(name: &str, flags: &[IndexFlag]) -> String {
    let tokens: Vec<&str> = flags
        .iter()
        .filter(|f| f.is_encodable())
        .map(IndexFlag::token)
        .collect();
    if tokens.is_empty() {
        name.to_string()
    } else {
        format!("{name} {}", tokens.join(","))
    }
}
