//! Orchestration over the remote inventory service and the local cache

pub mod inventory;

pub use inventory::InventoryService;
