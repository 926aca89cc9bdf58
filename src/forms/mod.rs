//! Create/edit flow for a single inventory record.
//!
//! An [`InventoryForm`] is opened with fresh values (a draft or a copy of a
//! saved record), validates fields as they change, and submits at most one
//! mutation through the [`InventoryService`].

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use strum::IntoEnumIterator;
use tracing::{debug, instrument};
use validator::ValidationErrors;

use crate::errors::ServiceError;
use crate::models::InventoryItem;
use crate::services::InventoryService;
use crate::validation::{
    error_message, field_message, parse_number, Field, InventorySchema, ValidationContext,
};

pub mod values;

pub use values::{normalize_date, FormValues, INPUT_DATE_FORMAT};

#[derive(Debug, Clone)]
pub struct InventoryForm {
    id: Option<String>,
    version: Option<i64>,
    initial: FormValues,
    values: FormValues,
    schema: InventorySchema,
    products: Vec<String>,
    today: NaiveDate,
    errors: BTreeMap<Field, String>,
}

impl InventoryForm {
    /// Form for a new record.
    pub fn create(schema: InventorySchema, products: Vec<String>, today: NaiveDate) -> Self {
        Self::open(None, None, FormValues::draft(today), schema, products, today)
    }

    /// Form editing `item`. The item itself is not touched.
    pub fn edit(
        item: &InventoryItem,
        schema: InventorySchema,
        products: Vec<String>,
        today: NaiveDate,
    ) -> Self {
        Self::open(
            item.saved_id().map(str::to_string),
            item.version,
            FormValues::from_item(item),
            schema,
            products,
            today,
        )
    }

    fn open(
        id: Option<String>,
        version: Option<i64>,
        initial: FormValues,
        schema: InventorySchema,
        products: Vec<String>,
        today: NaiveDate,
    ) -> Self {
        Self {
            id,
            version,
            values: initial.clone(),
            initial,
            schema,
            products,
            today,
            errors: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn is_edit(&self) -> bool {
        self.id.is_some()
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    fn context(&self) -> ValidationContext<'_> {
        let ctx = ValidationContext::new(&self.products, self.today);
        if self.is_edit() {
            ctx.with_saved_best_before(&self.initial.best_before_date)
        } else {
            ctx
        }
    }

    /// Stores `value` and revalidates that field.
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        self.values.set(field, value.into());
        self.check_field(field);
    }

    /// Revalidates `field` when it loses focus.
    pub fn blur(&mut self, field: Field) {
        self.check_field(field);
    }

    fn check_field(&mut self, field: Field) {
        let result = self
            .schema
            .validate_field(field, self.values.get(field), &self.context());
        match result {
            Ok(()) => {
                self.errors.remove(&field);
            }
            Err(err) => {
                self.errors.insert(field, error_message(&err));
            }
        }
    }

    pub fn error(&self, field: Field) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    /// Messages shown so far, one per field.
    pub fn errors(&self) -> &BTreeMap<Field, String> {
        &self.errors
    }

    pub fn is_dirty(&self) -> bool {
        self.values != self.initial
    }

    pub fn is_valid(&self) -> bool {
        self.validate_all().is_ok()
    }

    /// Submit is offered only for modified values that all validate.
    pub fn can_submit(&self) -> bool {
        self.is_dirty() && self.is_valid()
    }

    fn validate_all(&self) -> Result<(), ValidationErrors> {
        self.schema.validate(&self.values, &self.context())
    }

    /// The record the current values describe, with the best-before date
    /// normalized to midnight UTC.
    pub fn build_item(&self) -> Result<InventoryItem, ServiceError> {
        self.validate_all()?;

        let amount = Self::decimal(Field::Amount, &self.values.amount)?;
        let average_price = Self::decimal(Field::AveragePrice, &self.values.average_price)?;
        let best_before_date = if self.values.best_before_date.trim().is_empty() {
            None
        } else {
            Some(normalize_date(&self.values.best_before_date).ok_or_else(|| {
                ServiceError::ValidationError("bestBeforeDate is not a date".into())
            })?)
        };
        let description = self.values.description.trim();

        Ok(InventoryItem {
            id: self.id.clone(),
            name: self.values.name.trim().to_string(),
            product_type: self.values.product_type.trim().to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
            amount,
            average_price,
            unit_of_measurement: self.values.unit_of_measurement.trim().to_string(),
            best_before_date,
            never_expires: self.values.never_expires(),
            version: self.version,
        })
    }

    /// Numeric text that validated but does not fit a record amount.
    fn decimal(field: Field, value: &str) -> Result<Decimal, ServiceError> {
        parse_number(value)
            .ok_or_else(|| ServiceError::ValidationError(format!("{}: Value is out of range", field)))
    }

    /// Validates everything and sends exactly one create or update.
    ///
    /// On a validation failure every failing field gets its message and no
    /// remote call is made.
    #[instrument(skip(self, service), fields(id = ?self.id))]
    pub async fn submit(&mut self, service: &InventoryService) -> Result<InventoryItem, ServiceError> {
        if !self.is_dirty() {
            return Err(ServiceError::InvalidInput("no changes to submit".into()));
        }

        if let Err(errors) = self.validate_all() {
            self.errors = Field::iter()
                .filter_map(|field| field_message(&errors, field).map(|message| (field, message)))
                .collect();
            debug!("Submit blocked by {} invalid fields", self.errors.len());
            return Err(errors.into());
        }

        let item = self.build_item()?;
        let saved = service.save(item).await?;

        self.id = saved.saved_id().map(str::to_string);
        self.version = saved.version;
        self.initial = FormValues::from_item(&saved);
        self.values = self.initial.clone();
        self.errors.clear();
        Ok(saved)
    }

    /// Discards the edits. Nothing is sent and the cache is unchanged.
    pub fn cancel(self) {
        debug!("Inventory form for {:?} cancelled", self.id);
    }
}
