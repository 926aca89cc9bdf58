//! Inventory record model, unit catalog and product catalog entries

pub mod inventory_item;
pub mod product;
pub mod unit_of_measurement;

pub use inventory_item::{normalize_inventory, InventoryItem, InventoryRow};
pub use product::Product;
pub use unit_of_measurement::{unit_display_name, UnitOfMeasurement};
