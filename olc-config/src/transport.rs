//! Directory protocol abstraction.
//!
//! The client never speaks LDAP itself. Whatever connection the caller
//! holds (an `ldapi://` socket, a test double) is plugged in through
//! [`Transport`].

use olc_types::{Entry, Modification, SearchScope};
use thiserror::Error;

/// LDAP result code for "attribute or value exists".
pub const ATTRIBUTE_OR_VALUE_EXISTS: i32 = 20;

/// LDAP result code for "no such object".
pub const NO_SUCH_OBJECT: i32 = 32;

/// A failed request, as reported by the server.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (result code {code})")]
pub struct TransportError {
    pub code: i32,
    pub message: String,
}

impl TransportError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn is_attribute_or_value_exists(&self) -> bool {
        self.code == ATTRIBUTE_OR_VALUE_EXISTS
    }
}

/// The four directory operations the config client needs.
///
/// Every call is one synchronous request/response round trip. Errors are
/// passed through to the caller untouched.
pub trait Transport {
    /// Returns the entries at or below `base` that match `filter`
    /// (`None` matches everything).
    fn search(
        &mut self,
        base: &str,
        scope: SearchScope,
        filter: Option<&str>,
    ) -> Result<Vec<Entry>, TransportError>;

    fn add(&mut self, entry: &Entry) -> Result<(), TransportError>;

    fn delete(&mut self, dn: &str) -> Result<(), TransportError>;

    fn modify(&mut self, dn: &str, mods: &[Modification]) -> Result<(), TransportError>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn search(
        &mut self,
        base: &str,
        scope: SearchScope,
        filter: Option<&str>,
    ) -> Result<Vec<Entry>, TransportError> {
        (**self).search(base, scope, filter)
    }

    fn add(&mut self, entry: &Entry) -> Result<(), TransportError> {
        (**self).add(entry)
    }

    fn delete(&mut self, dn: &str) -> Result<(), TransportError> {
        (**self).delete(dn)
    }

    fn modify(&mut self, dn: &str, mods: &[Modification]) -> Result<(), TransportError> {
        (**self).modify(dn, mods)
    }
}
