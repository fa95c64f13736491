//! Error types for the ACL grammar.

use thiserror::Error;

/// Grammar errors raised while parsing or building an ACL rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AclError {
    /// Every rule starts with the `to` keyword.
    #[error("acl does not start with \"to\"")]
    MissingTo,

    /// Input ended while more tokens were required.
    #[error("unexpected end of acl, expected {0}")]
    UnexpectedEnd(&'static str),

    /// A quoted value is missing its closing quote.
    #[error("no matching quote for value starting at offset {0}")]
    UnterminatedQuote(usize),

    /// The `<what>` part contains an unknown clause.
    #[error("unsupported \"what\" clause: \"{0}\"")]
    UnsupportedWhat(String),

    /// The `<what>` part names nothing.
    #[error("acl has no \"what\" clause")]
    EmptyTarget,

    /// A clause key is not followed by `=`.
    #[error("expected \"=\" after \"{0}\"")]
    MissingEquals(String),

    /// A clause key is followed by `=` but no value.
    #[error("missing value for \"{0}\"")]
    MissingValue(String),

    /// A subject that takes no value was given one.
    #[error("\"by {0}\" does not take a value")]
    UnexpectedValue(String),

    /// Unknown `<who>` in a by clause.
    #[error("unsupported \"by\" clause: \"{0}\"")]
    UnsupportedSubject(String),

    /// Unknown access level in a by clause.
    #[error("unsupported access level: \"{0}\"")]
    UnsupportedLevel(String),

    /// Unknown control keyword.
    #[error("unsupported control: \"{0}\"")]
    UnsupportedControl(String),

    /// Unknown dn scope.
    #[error("unsupported dn scope: \"{0}\"")]
    UnsupportedScope(String),

    /// A token that cannot appear at this position.
    #[error("unexpected token \"{0}\" while parsing by clause")]
    UnexpectedToken(String),

    /// A rule needs at least one by clause.
    #[error("acl has no \"by\" clause")]
    EmptyByList,
}

/// Result type for ACL operations.
pub type AclResult<T> = Result<T, AclError>;
