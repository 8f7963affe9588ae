//! Field filter engine used by the list path.

use crate::domain::NlbRecord;

/// Evaluate a field filter against one record.
///
/// An empty `filter_key` matches everything. Matching is exact string
/// equality on the named field, with metadata keys falling through by name;
/// a field the record does not have never matches. Substring semantics are
/// reserved for the bulk-delete `match` parameter and do not apply here.
pub fn matches(record: &NlbRecord, filter_key: &str, filter_val: &str) -> bool {
    if filter_key.is_empty() {
        return true;
    }

    match record.field(filter_key) {
        Some(value) => value == filter_val,
        None => false,
    }
}
