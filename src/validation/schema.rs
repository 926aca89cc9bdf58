use chrono::NaiveDate;
use serde::Deserialize;
use strum::{Display, EnumIter, IntoEnumIterator, IntoStaticStr};
use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

use super::{
    error_message, validate_date, validate_not_blank, validate_not_past, validate_positive,
    validate_product_type, validate_quantity, validate_unit,
};

/// Editable fields of an inventory record, named as on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "camelCase")]
pub enum Field {
    Name,
    ProductType,
    Description,
    AveragePrice,
    Amount,
    UnitOfMeasurement,
    BestBeforeDate,
    NeverExpires,
}

impl Field {
    pub fn key(self) -> &'static str {
        self.into()
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::ProductType => "Product Type",
            Self::Description => "Description",
            Self::AveragePrice => "Average Price",
            Self::Amount => "Amount",
            Self::UnitOfMeasurement => "Unit of Measurement",
            Self::BestBeforeDate => "Best Before Date",
            Self::NeverExpires => "Never Expires",
        }
    }
}

/// A single check applied to a field's raw value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Required,
    NonNegative,
    WholeNonNegative,
    KnownUnit,
    KnownProduct,
    Date,
    NotInPast,
}

/// Switches for the rules that differ between deployments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValidationPolicy {
    /// Amounts must be whole numbers.
    #[serde(default = "default_true")]
    pub whole_amounts: bool,
    /// Best-before dates before today are rejected.
    #[serde(default = "default_true")]
    pub reject_past_dates: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            whole_amounts: true,
            reject_past_dates: true,
        }
    }
}

/// Data some rules check against.
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext<'a> {
    pub products: &'a [String],
    pub today: NaiveDate,
    /// Best-before value of the saved record being edited. Left as is, it is
    /// exempt from the past-date rule so expired records stay editable.
    pub saved_best_before: Option<&'a str>,
}

impl<'a> ValidationContext<'a> {
    pub fn new(products: &'a [String], today: NaiveDate) -> Self {
        Self {
            products,
            today,
            saved_best_before: None,
        }
    }

    pub fn with_saved_best_before(mut self, value: &'a str) -> Self {
        self.saved_best_before = Some(value);
        self
    }

    fn is_saved_best_before(&self, value: &str) -> bool {
        self.saved_best_before
            .map_or(false, |saved| saved.trim() == value.trim())
    }
}

/// Anything that can hand out the raw text of each field.
pub trait FieldValues {
    fn field_value(&self, field: Field) -> &str;
}

/// Per-field rule lists; the one place inventory validation is defined.
#[derive(Debug, Clone)]
pub struct InventorySchema {
    rules: Vec<(Field, Vec<Rule>)>,
}

impl InventorySchema {
    pub fn new(policy: ValidationPolicy) -> Self {
        let rules = Field::iter()
            .map(|field| (field, Self::rules_under(policy, field)))
            .collect();
        Self { rules }
    }

    fn rules_under(policy: ValidationPolicy, field: Field) -> Vec<Rule> {
        match field {
            Field::Name => vec![Rule::Required],
            Field::ProductType => vec![Rule::KnownProduct],
            Field::Description | Field::NeverExpires => Vec::new(),
            Field::AveragePrice => vec![Rule::NonNegative],
            Field::Amount if policy.whole_amounts => vec![Rule::WholeNonNegative],
            Field::Amount => vec![Rule::NonNegative],
            Field::UnitOfMeasurement => vec![Rule::KnownUnit],
            Field::BestBeforeDate if policy.reject_past_dates => {
                vec![Rule::Date, Rule::NotInPast]
            }
            Field::BestBeforeDate => vec![Rule::Date],
        }
    }

    pub fn rules(&self, field: Field) -> &[Rule] {
        self.rules
            .iter()
            .find(|(candidate, _)| *candidate == field)
            .map(|(_, rules)| rules.as_slice())
            .unwrap_or(&[])
    }

    /// Runs the field's rules in order and stops at the first failure.
    pub fn validate_field(
        &self,
        field: Field,
        value: &str,
        ctx: &ValidationContext<'_>,
    ) -> Result<(), ValidationError> {
        for rule in self.rules(field) {
            match rule {
                Rule::Required => validate_not_blank(value)?,
                Rule::NonNegative => validate_positive(value)?,
                Rule::WholeNonNegative => validate_quantity(value)?,
                Rule::KnownUnit => validate_unit(value)?,
                Rule::KnownProduct => validate_product_type(value, ctx.products)?,
                Rule::Date => validate_date(value)?,
                Rule::NotInPast if ctx.is_saved_best_before(value) => {}
                Rule::NotInPast => validate_not_past(value, ctx.today)?,
            }
        }
        Ok(())
    }

    /// Validates every field, collecting one error per failing field.
    pub fn validate(
        &self,
        values: &impl FieldValues,
        ctx: &ValidationContext<'_>,
    ) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        for (field, _) in &self.rules {
            if let Err(err) = self.validate_field(*field, values.field_value(*field), ctx) {
                errors.add(field.key(), err);
            }
        }

        if errors.errors().is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl Default for InventorySchema {
    fn default() -> Self {
        Self::new(ValidationPolicy::default())
    }
}

/// First message recorded against `field`, if any.
pub fn field_message(errors: &ValidationErrors, field: Field) -> Option<String> {
    match errors.errors().get(field.key()) {
        Some(ValidationErrorsKind::Field(list)) => list.first().map(error_message),
        _ => None,
    }
}
