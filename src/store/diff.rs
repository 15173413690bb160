//! Order-independent document equality.
//!
//! # Responsibilities
//! - Decide whether the current and backup documents are semantically equal
//! - Stay independent of section and key enumeration order
//!
//! # Design Decisions
//! - Mismatched section counts can never be equal, so the count check runs
//!   before any content comparison
//! - Key/value comparison is symmetric: a key added to either side makes the
//!   documents unequal

use crate::document::Document;

/// Returns true iff both documents hold the same sections, keys, and values.
pub(crate) fn documents_equal(a: &Document, b: &Document) -> bool {
    let left = a.table();
    let right = b.table();

    if left.len() != right.len() {
        return false;
    }
    if !left.keys().all(|name| right.contains_key(name)) {
        return false;
    }
    if !right.keys().all(|name| left.contains_key(name)) {
        return false;
    }

    for (name, left_map) in left {
        let right_map = match right.get(name) {
            Some(map) => map,
            None => return false,
        };
        if !left_map.iter().all(|(k, v)| right_map.get(k) == Some(v)) {
            return false;
        }
        if !right_map.iter().all(|(k, v)| left_map.get(k) == Some(v)) {
            return false;
        }
    }
    true
}
