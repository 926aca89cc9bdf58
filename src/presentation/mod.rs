//! List presentation: ordering and selection over normalized records.

use crate::models::{normalize_inventory, InventoryItem, InventoryRow};

pub mod selection;
pub mod sort;

pub use selection::Selection;
pub use sort::{compare_rows, stable_sort, SortDirection, SortKey};

/// State of one inventory table: sort column, direction and checked rows.
#[derive(Debug, Clone, Default)]
pub struct ListView {
    order_by: SortKey,
    direction: SortDirection,
    selection: Selection,
}

impl ListView {
    pub fn new(order_by: SortKey, direction: SortDirection) -> Self {
        Self {
            order_by,
            direction,
            selection: Selection::new(),
        }
    }

    pub fn order_by(&self) -> SortKey {
        self.order_by
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }

    /// Header click: the current column flips from ascending to descending,
    /// anything else sorts ascending by the requested column.
    pub fn request_sort(&mut self, key: SortKey) {
        let is_asc = self.order_by == key && self.direction == SortDirection::Asc;
        self.direction = if is_asc {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        };
        self.order_by = key;
    }

    /// Rows to display for `items`. Selected ids missing from `items` are
    /// dropped from the selection first.
    pub fn render(&mut self, items: &[InventoryItem]) -> Vec<InventoryRow> {
        self.selection.retain_existing(items);
        let mut rows = normalize_inventory(items);
        stable_sort(&mut rows, self.order_by, self.direction);
        rows
    }

    pub fn select_all(&mut self, items: &[InventoryItem]) {
        self.selection.select_all(&normalize_inventory(items));
    }
}
