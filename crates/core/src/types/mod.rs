//! Core types for Storekeeper.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;
pub mod quantity;
pub mod status;

pub use id::*;
pub use price::{CurrencyCode, Price};
pub use quantity::{QuantityError, quantity_from_wire};
pub use status::IssueStatus;
