//! Entry diff compiler.
//!
//! Turns the difference between a server snapshot and a pending snapshot of
//! the same entry into the modifications a server needs to get from one to
//! the other. Policy per attribute of the original entry:
//!
//! - gone from the working copy: `DELETE` the whole attribute
//! - every original value dropped and something added: one `REPLACE`
//! - otherwise: `DELETE` the dropped values, then `ADD` the new ones
//!
//! Attributes that only exist in the working copy become an `ADD`, unless
//! they carry no values.

use crate::{Attribute, Entry, Modification};
use tracing::{debug, trace};

/// Compiles `original` → `working` into an ordered modification list.
///
/// Output order follows `original`'s attributes first, then attributes only
/// present in `working`. Value comparison is exact; value order is ignored.
#[must_use]
pub fn diff_entries(original: &Entry, working: &Entry) -> Vec<Modification> {
    debug!("diffing entry {} against {}", original.dn(), working.dn());
    let mut mods = Vec::new();

    for old in original.attributes() {
        match working.get(old.name()) {
            Some(new) => diff_attribute(old, new, &mut mods),
            None => {
                debug!("attribute removed: {}", old.name());
                mods.push(Modification::delete_all(old.name()));
            }
        }
    }

    for new in working.attributes() {
        if original.get(new.name()).is_some() {
            continue;
        }
        debug!("attribute added: {}", new.name());
        if !new.is_empty() {
            mods.push(Modification::add(new.name(), new.values().to_vec()));
        }
    }

    mods
}

fn diff_attribute(old: &Attribute, new: &Attribute, mods: &mut Vec<Modification>) {
    let removed: Vec<String> = old
        .values()
        .iter()
        .filter(|v| !new.contains(v))
        .cloned()
        .collect();
    let added: Vec<String> = new
        .values()
        .iter()
        .filter(|v| !old.contains(v))
        .cloned()
        .collect();

    for v in &removed {
        trace!("value deleted: {}", v);
    }
    for v in &added {
        trace!("value added: {}", v);
    }

    if !removed.is_empty() && !added.is_empty() && removed.len() == old.len() {
        debug!("all values of {} dropped, emitting replace", old.name());
        mods.push(Modification::replace(old.name(), added));
        return;
    }
    if !removed.is_empty() {
        mods.push(Modification::delete(old.name(), removed));
    }
    if !added.is_empty() {
        mods.push(Modification::add(old.name(), added));
    }
}
