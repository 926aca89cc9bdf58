use chrono::{DateTime, NaiveDate, Utc};

use crate::models::InventoryItem;
use crate::validation::{parse_date_input, Field, FieldValues};

/// Date format the form edits best-before dates in.
pub const INPUT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Raw text of every editable field, as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    pub name: String,
    pub product_type: String,
    pub description: String,
    pub average_price: String,
    pub amount: String,
    pub unit_of_measurement: String,
    pub best_before_date: String,
    pub never_expires: String,
}

impl FormValues {
    /// Starting values for a new record.
    pub fn draft(today: NaiveDate) -> Self {
        Self {
            average_price: "0".to_string(),
            amount: "0".to_string(),
            best_before_date: today.format(INPUT_DATE_FORMAT).to_string(),
            never_expires: false.to_string(),
            ..Default::default()
        }
    }

    /// Starting values for editing `item`.
    pub fn from_item(item: &InventoryItem) -> Self {
        Self {
            name: item.name.clone(),
            product_type: item.product_type.clone(),
            description: item.description.clone().unwrap_or_default(),
            average_price: item.average_price.to_string(),
            amount: item.amount.to_string(),
            unit_of_measurement: item.unit_of_measurement.clone(),
            best_before_date: item
                .best_before_date
                .map(|date| date.format(INPUT_DATE_FORMAT).to_string())
                .unwrap_or_default(),
            never_expires: item.never_expires.to_string(),
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::ProductType => &self.product_type,
            Field::Description => &self.description,
            Field::AveragePrice => &self.average_price,
            Field::Amount => &self.amount,
            Field::UnitOfMeasurement => &self.unit_of_measurement,
            Field::BestBeforeDate => &self.best_before_date,
            Field::NeverExpires => &self.never_expires,
        }
    }

    pub fn set(&mut self, field: Field, value: String) {
        let slot = match field {
            Field::Name => &mut self.name,
            Field::ProductType => &mut self.product_type,
            Field::Description => &mut self.description,
            Field::AveragePrice => &mut self.average_price,
            Field::Amount => &mut self.amount,
            Field::UnitOfMeasurement => &mut self.unit_of_measurement,
            Field::BestBeforeDate => &mut self.best_before_date,
            Field::NeverExpires => &mut self.never_expires,
        };
        *slot = value;
    }

    pub fn never_expires(&self) -> bool {
        matches!(
            self.never_expires.trim().to_ascii_lowercase().as_str(),
            "true" | "on" | "yes" | "1"
        )
    }
}

impl FieldValues for FormValues {
    fn field_value(&self, field: Field) -> &str {
        self.get(field)
    }
}

/// Turns the form's date text into the UTC timestamp sent to the service:
/// midnight UTC of the entered calendar date.
pub fn normalize_date(value: &str) -> Option<DateTime<Utc>> {
    parse_date_input(value)?
        .and_hms_opt(0, 0, 0)
        .map(|midnight| midnight.and_utc())
}
