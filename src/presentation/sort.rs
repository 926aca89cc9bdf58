use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::models::InventoryRow;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString, IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// Columns a list can be ordered by. Names match the record's wire fields so
/// the same value can be sent as `sortVariable`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum SortKey {
    #[default]
    Name,
    ProductType,
    Description,
    Amount,
    AveragePrice,
    UnitOfMeasurement,
    BestBeforeDate,
}

impl SortKey {
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// Ascending comparison of two rows under `key`. Numbers and dates compare by
/// value; a missing date orders before any date.
pub fn compare_rows(a: &InventoryRow, b: &InventoryRow, key: SortKey) -> Ordering {
    match key {
        SortKey::Name => a.name.cmp(&b.name),
        SortKey::ProductType => a.product_type.cmp(&b.product_type),
        SortKey::Description => a.description.cmp(&b.description),
        SortKey::Amount => a.amount.cmp(&b.amount),
        SortKey::AveragePrice => a.average_price.cmp(&b.average_price),
        SortKey::UnitOfMeasurement => a.unit_of_measurement.cmp(&b.unit_of_measurement),
        SortKey::BestBeforeDate => a.best_before_date.cmp(&b.best_before_date),
    }
}

/// Stable sort: rows equal under `key` keep their relative order in either
/// direction.
pub fn stable_sort(rows: &mut [InventoryRow], key: SortKey, direction: SortDirection) {
    match direction {
        SortDirection::Asc => rows.sort_by(|a, b| compare_rows(a, b, key)),
        SortDirection::Desc => rows.sort_by(|a, b| compare_rows(b, a, key)),
    }
}
