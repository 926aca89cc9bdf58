use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use super::unit_of_measurement::{unit_display_name, UnitOfMeasurement};

/// Date format used when rendering best-before dates in lists.
pub const DISPLAY_DATE_FORMAT: &str = "%m/%d/%Y";

/// One inventory record as exchanged with the inventory service.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    /// Server-assigned identifier; `None` or empty for a record never saved.
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub product_type: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub amount: Decimal,
    #[serde(default, deserialize_with = "null_as_default")]
    pub average_price: Decimal,
    /// Catalog code (see [`UnitOfMeasurement`]). Kept as text so records with
    /// codes this client does not know still load.
    #[serde(default, deserialize_with = "null_as_default")]
    pub unit_of_measurement: String,
    #[serde(default)]
    pub best_before_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub never_expires: bool,
    /// Optimistic concurrency counter. Carried through unchanged; nothing in
    /// this crate compares it.
    #[serde(default)]
    pub version: Option<i64>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl InventoryItem {
    /// The identifier when the record has been saved, `None` for drafts.
    pub fn saved_id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }

    pub fn is_draft(&self) -> bool {
        self.saved_id().is_none()
    }

    pub fn unit(&self) -> Option<UnitOfMeasurement> {
        UnitOfMeasurement::from_code(&self.unit_of_measurement)
    }

    /// Projection used by list views: unit code replaced by its catalog name
    /// and the best-before date rendered as `MM/DD/YYYY`.
    pub fn normalize(&self) -> InventoryRow {
        InventoryRow {
            id: self.saved_id().unwrap_or_default().to_string(),
            name: self.name.clone(),
            product_type: self.product_type.clone(),
            description: self.description.clone().unwrap_or_default(),
            amount: self.amount,
            average_price: self.average_price,
            unit_of_measurement: unit_display_name(&self.unit_of_measurement).to_string(),
            best_before_date: self.best_before_date,
            best_before_display: self
                .best_before_date
                .map(|date| date.format(DISPLAY_DATE_FORMAT).to_string())
                .unwrap_or_default(),
            never_expires: self.never_expires,
        }
    }
}

/// Display-ready view of an [`InventoryItem`].
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryRow {
    pub id: String,
    pub name: String,
    pub product_type: String,
    pub description: String,
    pub amount: Decimal,
    pub average_price: Decimal,
    /// Catalog display name, or the raw code when unknown.
    pub unit_of_measurement: String,
    #[serde(skip)]
    pub best_before_date: Option<DateTime<Utc>>,
    #[serde(rename = "bestBeforeDate")]
    pub best_before_display: String,
    pub never_expires: bool,
}

/// Normalizes a whole cache snapshot for display.
pub fn normalize_inventory(items: &[InventoryItem]) -> Vec<InventoryRow> {
    items.iter().map(InventoryItem::normalize).collect()
}
