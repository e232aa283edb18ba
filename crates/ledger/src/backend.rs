//! The backend seam the ledger drives.
//!
//! [`IssueBackend`] is the slice of the Backend Inventory Service the
//! pending-issue workflow needs. Production code hands the ledger an
//! [`InventoryApi`]; tests hand it a scripted stand-in.

use async_trait::async_trait;
use thiserror::Error;

use storekeeper_client::api::{Issue, Product};
use storekeeper_client::{ApiError, InventoryApi};
use storekeeper_core::{DepartmentId, IssueId, ProductId, StaffId};

/// Page size used when walking the catalog for an availability snapshot.
const SNAPSHOT_PAGE_SIZE: u32 = 100;

/// Failure channel of the backend seam.
///
/// [`Rejected`](BackendError::Rejected) carries the backend's own message
/// verbatim and surfaces upstream as a conflict; everything else is a
/// transport failure.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The backend understood the request and refused it.
    #[error("{message}")]
    Rejected { message: String },

    /// The backend could not be reached or answered unintelligibly.
    #[error("{message}")]
    Unreachable { message: String },
}

impl From<ApiError> for BackendError {
    fn from(e: ApiError) -> Self {
        match e {
            ApiError::Rejected { message, .. } => Self::Rejected { message },
            other => Self::Unreachable {
                message: other.to_string(),
            },
        }
    }
}

/// Backend operations the pending-issue workflow consumes.
#[async_trait]
pub trait IssueBackend: Send + Sync {
    /// The product catalog with live availability figures.
    async fn product_snapshot(&self) -> Result<Vec<Product>, BackendError>;

    /// The department's open issue, or `None` when it has none.
    async fn open_issue(&self, department: DepartmentId) -> Result<Option<Issue>, BackendError>;

    /// Add a line item; the server creates the issue record on a
    /// department's first line. Returns the issue the line landed in.
    async fn add_line(
        &self,
        department: DepartmentId,
        issued_by: StaffId,
        product: ProductId,
        quantity: u32,
    ) -> Result<IssueId, BackendError>;

    /// Set a line item's absolute quantity.
    async fn set_line_quantity(
        &self,
        issue: IssueId,
        product: ProductId,
        quantity: u32,
    ) -> Result<(), BackendError>;

    /// Remove a line item from an issue.
    async fn remove_line(&self, issue: IssueId, product: ProductId) -> Result<(), BackendError>;

    /// Complete the issue, durably decrementing product stock.
    async fn complete_issue(&self, issue: IssueId) -> Result<(), BackendError>;
}

#[async_trait]
impl IssueBackend for InventoryApi {
    async fn product_snapshot(&self) -> Result<Vec<Product>, BackendError> {
        let mut products = Vec::new();
        let mut page_number = 1;
        loop {
            let page = self.list_products(page_number, SNAPSHOT_PAGE_SIZE).await?;
            let has_more = page.has_more();
            products.extend(page.products);
            if !has_more {
                return Ok(products);
            }
            page_number += 1;
        }
    }

    async fn open_issue(&self, department: DepartmentId) -> Result<Option<Issue>, BackendError> {
        Ok(InventoryApi::open_issue(self, department).await?)
    }

    async fn add_line(
        &self,
        department: DepartmentId,
        issued_by: StaffId,
        product: ProductId,
        quantity: u32,
    ) -> Result<IssueId, BackendError> {
        Ok(self
            .add_issue_line(department, issued_by, product, quantity)
            .await?)
    }

    async fn set_line_quantity(
        &self,
        issue: IssueId,
        product: ProductId,
        quantity: u32,
    ) -> Result<(), BackendError> {
        Ok(InventoryApi::set_line_quantity(self, issue, product, quantity).await?)
    }

    async fn remove_line(&self, issue: IssueId, product: ProductId) -> Result<(), BackendError> {
        Ok(self.remove_issue_line(issue, product).await?)
    }

    async fn complete_issue(&self, issue: IssueId) -> Result<(), BackendError> {
        Ok(InventoryApi::complete_issue(self, issue).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_keeps_backend_message_verbatim() {
        let api_error = ApiError::Rejected {
            status: 409,
            message: "Requested quantity exceeds available stock".to_string(),
        };
        match BackendError::from(api_error) {
            BackendError::Rejected { message } => {
                assert_eq!(message, "Requested quantity exceeds available stock");
            }
            BackendError::Unreachable { .. } => panic!("expected Rejected"),
        }
    }

    #[test]
    fn test_other_api_errors_become_unreachable() {
        let api_error = ApiError::Status {
            status: 502,
            body: "<html>Bad Gateway</html>".to_string(),
        };
        match BackendError::from(api_error) {
            BackendError::Unreachable { message } => {
                assert!(message.contains("502"), "unexpected: {message}");
            }
            BackendError::Rejected { .. } => panic!("expected Unreachable"),
        }

        let not_found = ApiError::NotFound("Product 42".to_string());
        assert!(matches!(
            BackendError::from(not_found),
            BackendError::Unreachable { .. }
        ));
    }
}
