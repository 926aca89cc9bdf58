//! Merging server-confirmed mutation results into the local cache.
//!
//! Each function takes the current snapshot and returns the next one. They
//! run only after a remote call succeeded; a failed call leaves the cache as it
//! was.

use std::collections::HashSet;

use crate::models::InventoryItem;

/// What [`apply_delete`] removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteSummary {
    pub removed: usize,
    /// Name of the removed record when exactly one was removed.
    pub deleted_name: Option<String>,
}

impl DeleteSummary {
    /// User notification text for this deletion.
    pub fn message(&self) -> String {
        match &self.deleted_name {
            Some(name) if self.removed == 1 => format!("{} successfully removed", name),
            _ => format!("{} successfully removed", self.removed),
        }
    }
}

/// Drops any entry sharing `saved`'s id, then appends `saved`.
///
/// A `saved` record without an id is appended as-is; it cannot collide with
/// anything because only non-empty ids are compared.
pub fn apply_upsert(cache: &[InventoryItem], saved: InventoryItem) -> Vec<InventoryItem> {
    let mut next: Vec<InventoryItem> = match saved.saved_id() {
        Some(id) => cache
            .iter()
            .filter(|item| item.saved_id() != Some(id))
            .cloned()
            .collect(),
        None => cache.to_vec(),
    };
    next.push(saved);
    next
}

/// Keeps the entries whose id is not in `ids`.
pub fn apply_delete<S: AsRef<str>>(
    cache: &[InventoryItem],
    ids: &[S],
) -> (Vec<InventoryItem>, DeleteSummary) {
    let ids: HashSet<&str> = ids.iter().map(AsRef::as_ref).collect();
    let mut kept = Vec::with_capacity(cache.len());
    let mut removed = 0usize;
    let mut deleted_name = None;

    for item in cache {
        match item.saved_id() {
            Some(id) if ids.contains(id) => {
                removed += 1;
                deleted_name = Some(item.name.clone());
            }
            _ => kept.push(item.clone()),
        }
    }

    let summary = DeleteSummary {
        removed,
        deleted_name: if removed == 1 { deleted_name } else { None },
    };
    (kept, summary)
}

/// A full fetch replaces the cache verbatim.
pub fn replace_all(_cache: &[InventoryItem], items: Vec<InventoryItem>) -> Vec<InventoryItem> {
    items
}
