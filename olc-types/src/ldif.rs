//! Hooks for LDIF text handling.
//!
//! The model never formats or parses LDIF itself. Callers that need it plug
//! in an implementation of these traits.

use crate::Entry;

/// Renders a single entry as an LDIF record.
pub trait LdifWriter {
    fn write_record(&self, entry: &Entry) -> String;
}

/// Parses the first LDIF record of a document into an entry.
pub trait LdifReader {
    type Error: std::error::Error + Send + Sync + 'static;

    fn read_record(&self, text: &str) -> Result<Entry, Self::Error>;
}
