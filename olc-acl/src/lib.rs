//! Access-control rules for `olcAccess`.
//!
//! Parses the subset of slapd's access-control language that the
//! configuration model edits:
//!
//! ```text
//! to <what> by <who> [<level>] [<control>] [by ...]
//! ```
//!
//! - `<what>` is `*` or any of `dn.base=`, `dn.subtree=`, `filter=`, `attrs=`
//! - `<who>` is `*`, `anonymous`, `users`, `self`, `group=`, `dn.base=`, `dn.subtree=`
//! - `<level>` is one of `none disclose auth compare read write manage`
//! - `<control>` is one of `stop break continue`
//!
//! [`AclRule`] parses with [`str::parse`] and serializes with `Display` into a
//! canonical form. Serializing and re-parsing yields an equal rule, but not
//! necessarily the original text: whitespace and quoting are normalized and
//! the default `stop` control is omitted.

mod error;
mod parser;
mod rule;

pub use error::{AclError, AclResult};
pub use rule::{AccessLevel, AclRule, ByClause, Control, DnScope, Subject};
