//! Storekeeper client library.
//!
//! Typed REST access to the Backend Inventory Service: the product catalog,
//! reference data (categories, vendors, departments, staff), receipt
//! history, the dashboard summary, and the issue workflow endpoints the
//! stock ledger drives.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;

pub use api::{ApiError, InventoryApi};
pub use config::{ApiConfig, ConfigError};
