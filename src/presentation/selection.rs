use crate::models::{InventoryItem, InventoryRow};

/// Ids currently checked in a list, in the order they were checked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.ids.iter().any(|selected| selected == id)
    }

    /// Checks an unchecked id, unchecks a checked one.
    pub fn toggle(&mut self, id: &str) {
        match self.ids.iter().position(|selected| selected == id) {
            Some(index) => {
                self.ids.remove(index);
            }
            None => self.ids.push(id.to_string()),
        }
    }

    pub fn select_all(&mut self, rows: &[InventoryRow]) {
        self.ids = rows
            .iter()
            .filter(|row| !row.id.is_empty())
            .map(|row| row.id.clone())
            .collect();
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// The selected id when exactly one row is checked.
    pub fn single(&self) -> Option<&str> {
        match self.ids.as_slice() {
            [only] => Some(only.as_str()),
            _ => None,
        }
    }

    /// Drops ids that no longer exist in `items`; returns how many were dropped.
    pub fn retain_existing(&mut self, items: &[InventoryItem]) -> usize {
        let before = self.ids.len();
        self.ids
            .retain(|id| items.iter().any(|item| item.saved_id() == Some(id.as_str())));
        before - self.ids.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str) -> InventoryItem {
        InventoryItem {
            id: Some(id.into()),
            ..Default::default()
        }
    }

    #[test]
    fn toggle_adds_and_removes() {
        let mut selection = Selection::new();
        selection.toggle("1");
        selection.toggle("2");
        selection.toggle("3");
        selection.toggle("2");
        assert_eq!(selection.ids(), ["1", "3"]);
        assert!(selection.is_selected("3"));
        assert!(!selection.is_selected("2"));
    }

    #[test]
    fn single_requires_exactly_one() {
        let mut selection = Selection::new();
        assert_eq!(selection.single(), None);
        selection.toggle("7");
        assert_eq!(selection.single(), Some("7"));
        selection.toggle("8");
        assert_eq!(selection.single(), None);
    }

    #[test]
    fn retain_existing_drops_missing_ids() {
        let mut selection = Selection::new();
        selection.toggle("1");
        selection.toggle("2");

        let dropped = selection.retain_existing(&[item("2"), item("3")]);
        assert_eq!(dropped, 1);
        assert_eq!(selection.ids(), ["2"]);
    }

    #[test]
    fn select_all_skips_unsaved_rows() {
        let rows = vec![item("1").normalize(), InventoryItem::default().normalize()];
        let mut selection = Selection::new();
        selection.select_all(&rows);
        assert_eq!(selection.ids(), ["1"]);
        selection.clear();
        assert!(selection.is_empty());
    }
}
