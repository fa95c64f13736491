//! Typed model of an OpenLDAP `cn=config` tree.
//!
//! Every config entry keeps the snapshot last read from the server next to
//! the locally edited one; [`ConfigEntry::modifications`] compiles the
//! difference. On top of that sit the config kinds:
//! - [`GlobalConfig`]: `cn=config`, log levels, features, TLS
//! - [`DatabaseConfig`]: `olcDatabase={n}<type>`, ACLs, owned overlays,
//!   and the [`IndexedDatabase`] view for bdb/hdb/mdb backends
//! - [`OverlayConfig`]: `olcOverlay={n}<type>` below a database
//! - [`SchemaConfig`]: `cn=schema,cn=config` and `cn={n}<name>` children
//!
//! [`ConfigObject`] wraps any of them after classification, and
//! [`import_schema_file`] turns a `.schema` file into a new schema entry.

mod database;
mod entry;
mod error;
mod global;
mod index;
mod object;
mod overlay;
mod schema;
mod schema_file;

pub use database::{DATABASE_OBJECT_CLASS, DatabaseConfig, IndexedBackend, IndexedDatabase};
pub use entry::{ConfigEntry, ConfigNode, NO_INDEX, Ordered};
pub use error::{ModelError, ModelResult};
pub use global::{CrlCheck, GLOBAL_DN, GlobalConfig, TlsSettings, VerifyClient};
pub use index::{IndexFlag, IndexSpec, decode_index_attribute, encode_index_attribute};
pub use object::{ConfigKind, ConfigObject};
pub use overlay::{OVERLAY_OBJECT_CLASS, OverlayConfig};
pub use schema::{SCHEMA_BASE_DN, SCHEMA_OBJECT_CLASS, SchemaConfig};
pub use schema_file::{fold_lines, import_schema_file, import_schema_str};
