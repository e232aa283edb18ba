//! Cache types for reference-data responses.
//!
//! Only slow-moving reference lists are cached. Products and issues carry
//! live stock figures and must always be fetched fresh.

use super::types::{Category, Department, StaffMember, Vendor};

/// Cache keys for the reference-data lists.
pub(crate) const CATEGORIES_KEY: &str = "categories";
pub(crate) const VENDORS_KEY: &str = "vendors";
pub(crate) const DEPARTMENTS_KEY: &str = "departments";
pub(crate) const STAFF_KEY: &str = "staff";

/// Cached value types.
#[derive(Debug, Clone)]
pub(crate) enum CacheValue {
    Categories(Vec<Category>),
    Vendors(Vec<Vendor>),
    Departments(Vec<Department>),
    Staff(Vec<StaffMember>),
}
