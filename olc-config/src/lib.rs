//! Config client and editing session for olcconf.
//!
//! - [`Transport`]: the directory operations the client needs, supplied by
//!   the caller
//! - [`OlcConfig`]: reads the global entry, databases and schema from a
//!   running server and writes single entries back
//! - [`ConfigSession`]: the set of config objects being edited, with
//!   commit and LDIF export
//! - [`DatabaseSpec`]: JSON description used to bootstrap new databases

mod bootstrap;
mod client;
mod error;
mod session;
mod transport;

pub use bootstrap::DatabaseSpec;
pub use client::OlcConfig;
pub use error::{ConfigError, ConfigResult};
pub use session::ConfigSession;
pub use transport::{ATTRIBUTE_OR_VALUE_EXISTS, NO_SUCH_OBJECT, Transport, TransportError};
