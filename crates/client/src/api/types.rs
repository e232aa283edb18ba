//! Domain types for the Backend Inventory Service.
//!
//! These types provide a clean, ergonomic API separate from the raw wire
//! payloads the backend serves. Quantities are `u32` here; the wire carries
//! `i64` and the conversion layer validates the range.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use storekeeper_core::{
    CategoryId, DepartmentId, IssueId, IssueStatus, Price, ProductId, ReceiptId, StaffId, VendorId,
};

// =============================================================================
// Product Types
// =============================================================================

/// A stocked product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Backend product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Optional free-form description.
    pub description: Option<String>,
    /// Unit of measure (e.g., "pcs", "kg").
    pub unit: String,
    /// Unit price.
    pub unit_price: Price,
    /// Quantity currently available in the store.
    pub available: u32,
    /// Owning category, if the product is categorized.
    pub category_id: Option<CategoryId>,
}

/// One page of the product catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductPage {
    /// Products on this page.
    pub products: Vec<Product>,
    /// 1-based page number.
    pub page: u32,
    /// Page size requested.
    pub per_page: u32,
    /// Total products across all pages.
    pub total: u64,
}

impl ProductPage {
    /// Whether further pages exist after this one.
    #[must_use]
    pub fn has_more(&self) -> bool {
        u64::from(self.page) * u64::from(self.per_page) < self.total
    }
}

/// Input for creating a product.
#[derive(Debug, Clone, Serialize)]
pub struct ProductCreateInput {
    /// Display name.
    pub name: String,
    /// Optional free-form description.
    pub description: Option<String>,
    /// Unit of measure (e.g., "pcs", "kg").
    pub unit: String,
    /// Unit price amount.
    #[serde(with = "rust_decimal::serde::str")]
    pub rate: Decimal,
    /// Opening stock level.
    pub available_quantity: u32,
    /// Owning category.
    pub category_id: Option<CategoryId>,
}

/// Input for updating a product.
///
/// All fields are optional - only provided fields will be updated. Stock
/// levels are not updatable here; they move through receipts and issues.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProductUpdateInput {
    /// New display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New unit of measure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// New unit price amount.
    #[serde(
        with = "rust_decimal::serde::str_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub rate: Option<Decimal>,
    /// New owning category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
}

// =============================================================================
// Reference Data Types
// =============================================================================

/// A product category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    /// Backend category ID.
    pub id: CategoryId,
    /// Display name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
}

/// A supplier the store receives stock from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vendor {
    /// Backend vendor ID.
    pub id: VendorId,
    /// Vendor name.
    pub name: String,
    /// Contact details (phone or email).
    pub contact: Option<String>,
    /// Postal address.
    pub address: Option<String>,
}

/// A department stock is issued to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Department {
    /// Backend department ID.
    pub id: DepartmentId,
    /// Department name.
    pub name: String,
}

/// A staff member who can issue stock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffMember {
    /// Backend staff ID.
    pub id: StaffId,
    /// Full name.
    pub name: String,
    /// Work email.
    pub email: Option<String>,
    /// Role label (e.g., "storekeeper", "manager").
    pub role: Option<String>,
}

// =============================================================================
// Receipt Types
// =============================================================================

/// A record of stock received from a vendor.
///
/// Receiving stock increments the product's available quantity server-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Receipt {
    /// Backend receipt ID.
    pub id: ReceiptId,
    /// Product received.
    pub product_id: ProductId,
    /// Vendor the stock came from.
    pub vendor_id: VendorId,
    /// Quantity received.
    pub quantity: u32,
    /// Price paid per unit.
    pub unit_price: Price,
    /// When the stock was received.
    pub received_at: DateTime<Utc>,
}

/// One page of receipt history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptPage {
    /// Receipts on this page, newest first.
    pub receipts: Vec<Receipt>,
    /// 1-based page number.
    pub page: u32,
    /// Page size requested.
    pub per_page: u32,
    /// Total receipts across all pages.
    pub total: u64,
}

/// Input for recording received stock.
#[derive(Debug, Clone, Serialize)]
pub struct ReceiptCreateInput {
    /// Product received.
    pub product_id: ProductId,
    /// Vendor the stock came from.
    pub vendor_id: VendorId,
    /// Quantity received.
    pub quantity: u32,
    /// Price paid per unit.
    #[serde(with = "rust_decimal::serde::str")]
    pub rate: Decimal,
}

// =============================================================================
// Issue Types
// =============================================================================

/// A pending or completed stock issue to a department.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    /// Backend issue ID.
    pub id: IssueId,
    /// Department the stock is issued to.
    pub department_id: DepartmentId,
    /// Lifecycle status.
    pub status: IssueStatus,
    /// Line items, in the order the backend stores them.
    pub lines: Vec<IssueLine>,
}

/// One line of an issue: a product and the quantity being moved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueLine {
    /// Product being issued.
    pub product_id: ProductId,
    /// Product name at the time the line was added.
    pub product_name: String,
    /// Unit of measure at the time the line was added.
    pub unit: String,
    /// Quantity to issue.
    pub quantity: u32,
    /// Unit price at the time the line was added.
    pub unit_price: Price,
}

// =============================================================================
// Dashboard Types
// =============================================================================

/// Per-category stock totals for the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryStock {
    /// Category the total belongs to.
    pub category_id: CategoryId,
    /// Category name.
    pub name: String,
    /// Sum of available quantities across the category's products.
    pub total_quantity: u64,
}

/// Aggregate counts and stock totals for the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    /// Total products in the catalog.
    pub products: u64,
    /// Total categories.
    pub categories: u64,
    /// Total vendors.
    pub vendors: u64,
    /// Total departments.
    pub departments: u64,
    /// Total staff members.
    pub staff: u64,
    /// Total receipts recorded.
    pub receipts: u64,
    /// Issues not yet completed.
    pub open_issues: u64,
    /// Stock totals grouped by category.
    pub stock_by_category: Vec<CategoryStock>,
}
