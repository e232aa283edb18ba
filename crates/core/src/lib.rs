//! Storekeeper Core - Shared types library.
//!
//! This crate provides common types used across all Storekeeper components:
//! - `client` - Typed REST wrappers for the Backend Inventory Service
//! - `ledger` - The pending-issue workflow (stock withdrawals to departments)
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no async.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, quantities, prices, and
//!   issue statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
