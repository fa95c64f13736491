//! Core directory types for olcconf.
//!
//! This crate defines the plugin-agnostic building blocks the configuration
//! model is made of:
//! - [`Attribute`] and [`AttributeSet`]: case-insensitive, multi-valued attributes
//! - [`Entry`]: a distinguished name plus its attributes
//! - [`Modification`]: one ADD/DELETE/REPLACE instruction for a single attribute
//! - [`diff_entries`]: compiles two entry snapshots into modifications
//! - [`split_index`] / [`join_index`]: the `{n}name` ordering tag codec
//!
//! Nothing in here talks to a server. Transport and LDIF text handling are
//! reached through the traits in [`ldif`] and the `olc-config` crate.

mod attribute;
mod diff;
mod entry;
pub mod ldif;
mod modification;
mod ordered;
mod scope;

pub use attribute::{Attribute, AttributeSet};
pub use diff::diff_entries;
pub use entry::{Entry, OBJECT_CLASS};
pub use modification::{ModOp, Modification};
pub use ordered::{join_index, split_index};
pub use scope::SearchScope;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid search scope: {0}")]
    InvalidScope(String),

    #[error("invalid modification operation: {0}")]
    InvalidModOp(String),
}
