//! Error types for the configuration model.

use olc_acl::AclError;
use thiserror::Error;

/// Errors raised by config entries and the schema importer.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A schema file line is neither blank, a comment nor a known directive.
    #[error("schema syntax error on line {line}: {reason}")]
    SchemaSyntax { line: usize, reason: String },

    /// An entry does not satisfy the rules of its config kind.
    #[error("invariant violated: {0}")]
    Invariant(String),

    /// An `olcAccess` value could not be parsed.
    #[error("invalid access control: {0}")]
    Acl(#[from] AclError),

    /// An attribute read as a single value holds several.
    #[error("attribute {0} is not single-valued")]
    NotSingleValued(String),

    /// An attribute read as an integer holds something else.
    #[error("attribute {attribute} holds a non-integer value: {value:?}")]
    InvalidInteger { attribute: String, value: String },

    /// Reading a schema file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;
