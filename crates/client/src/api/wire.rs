//! Raw wire payloads exchanged with the backend.
//!
//! Kept separate from the domain types in [`types`](super::types) so that
//! range checks happen in one place (`conversions`) and the public API never
//! exposes raw `i64` quantities. Reference entities (categories, vendors,
//! departments, staff) share their shape with the domain types and
//! deserialize directly; only their envelopes live here.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use storekeeper_core::{DepartmentId, IssueStatus, ProductId, StaffId};

use super::types::{Category, Department, StaffMember, Vendor};

// =============================================================================
// Response Payloads
// =============================================================================

#[derive(Debug, Deserialize)]
pub(crate) struct ProductPayload {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub unit: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub rate: Decimal,
    pub available_quantity: i64,
    #[serde(default)]
    pub category_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProductEnvelope {
    pub product: ProductPayload,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProductPageEnvelope {
    pub products: Vec<ProductPayload>,
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct IssueLinePayload {
    pub product_id: i64,
    pub product_name: String,
    pub unit: String,
    pub quantity: i64,
    #[serde(with = "rust_decimal::serde::str")]
    pub rate: Decimal,
}

#[derive(Debug, Deserialize)]
pub(crate) struct IssuePayload {
    pub id: i64,
    pub department_id: i64,
    pub status: IssueStatus,
    #[serde(default)]
    pub lines: Vec<IssueLinePayload>,
}

/// `GET /api/issues/open` body. Some backend builds answer "no open issue"
/// with `{"issue": null}` instead of a 404; both spellings must map to
/// `None`.
#[derive(Debug, Deserialize)]
pub(crate) struct OpenIssueEnvelope {
    pub issue: Option<IssuePayload>,
}

/// `POST /api/issues/lines` body: the issue the line landed in.
#[derive(Debug, Deserialize)]
pub(crate) struct LineAddedEnvelope {
    pub issue_id: i64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReceiptPayload {
    pub id: i64,
    pub product_id: i64,
    pub vendor_id: i64,
    pub quantity: i64,
    #[serde(with = "rust_decimal::serde::str")]
    pub rate: Decimal,
    pub received_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReceiptEnvelope {
    pub receipt: ReceiptPayload,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReceiptPageEnvelope {
    pub receipts: Vec<ReceiptPayload>,
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CategoriesEnvelope {
    pub categories: Vec<Category>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CategoryEnvelope {
    pub category: Category,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VendorsEnvelope {
    pub vendors: Vec<Vendor>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VendorEnvelope {
    pub vendor: Vendor,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DepartmentsEnvelope {
    pub departments: Vec<Department>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DepartmentEnvelope {
    pub department: Department,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StaffListEnvelope {
    pub staff: Vec<StaffMember>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StaffEnvelope {
    pub staff: StaffMember,
}

// =============================================================================
// Request Payloads
// =============================================================================

#[derive(Debug, Serialize)]
pub(crate) struct AddLinePayload {
    pub department_id: DepartmentId,
    pub issued_by: StaffId,
    pub product_id: ProductId,
    pub quantity: u32,
}

#[derive(Debug, Serialize)]
pub(crate) struct SetLineQuantityPayload {
    pub quantity: u32,
}

#[derive(Debug, Serialize)]
pub(crate) struct CategoryWritePayload<'a> {
    pub name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub(crate) struct VendorWritePayload<'a> {
    pub name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub(crate) struct DepartmentWritePayload<'a> {
    pub name: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct StaffWritePayload<'a> {
    pub name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<&'a str>,
}
