//! The `{n}name` ordering tag.
//!
//! Ordered siblings in `cn=config` (databases, overlays, schema entries,
//! ACL lines) carry their position as a `{n}` prefix on the naming value,
//! e.g. `olcDatabase={2}mdb`.

/// Splits a tagged value into its index and local name.
///
/// Values without a leading `{...}` tag get index 0 and are returned whole.
/// A tag whose content is not an integer also yields index 0.
#[must_use]
pub fn split_index(raw: &str) -> (i32, &str) {
    if let Some(rest) = raw.strip_prefix('{')
        && let Some(end) = rest.find('}')
    {
        let index = rest[..end].trim().parse().unwrap_or(0);
        return (index, &rest[end + 1..]);
    }
    (0, raw)
}

/// Prefixes `name` with the `{index}` tag.
#[must_use]
pub fn join_index(index: i32, name: &str) -> String {
    format!("{{{index}}}{name}")
}
