//! Issue workflow operations.
//!
//! These are the endpoints the stock ledger drives: fetching a department's
//! open issue and mutating its line items. Nothing here is cached - the open
//! issue is mutable state.

use reqwest::Method;
use tracing::instrument;

use storekeeper_core::{DepartmentId, IssueId, ProductId, StaffId};

use super::conversions::convert_issue;
use super::types::Issue;
use super::wire::{AddLinePayload, LineAddedEnvelope, OpenIssueEnvelope, SetLineQuantityPayload};
use super::{ApiError, InventoryApi};

impl InventoryApi {
    /// Fetch the department's open issue, if one exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    /// "No open issue" - whether the backend answers 404 or `{"issue": null}`
    /// - is `Ok(None)`, not an error.
    #[instrument(skip(self), fields(department_id = %department_id))]
    pub async fn open_issue(
        &self,
        department_id: DepartmentId,
    ) -> Result<Option<Issue>, ApiError> {
        let request = self
            .request(Method::GET, "/api/issues/open")
            .query(&[("department_id", department_id.as_i64())]);

        match self.execute::<OpenIssueEnvelope>(request).await {
            Ok(envelope) => envelope.issue.map(convert_issue).transpose(),
            Err(
                ApiError::Rejected { status: 404, .. } | ApiError::Status { status: 404, .. },
            ) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Add a line item to the department's open issue, creating the issue
    /// server-side if none exists yet. Returns the ID of the issue the line
    /// landed in.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Rejected` with the backend's message when the
    /// request is refused (for example, insufficient stock).
    #[instrument(
        skip(self),
        fields(department_id = %department_id, product_id = %product_id, quantity)
    )]
    pub async fn add_issue_line(
        &self,
        department_id: DepartmentId,
        issued_by: StaffId,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<IssueId, ApiError> {
        let payload = AddLinePayload {
            department_id,
            issued_by,
            product_id,
            quantity,
        };
        let request = self
            .request(Method::POST, "/api/issues/lines")
            .json(&payload);

        let envelope: LineAddedEnvelope = self.execute(request).await?;
        Ok(IssueId::new(envelope.issue_id))
    }

    /// Set the absolute quantity of a line item.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Rejected` with the backend's message when the new
    /// quantity is refused.
    #[instrument(
        skip(self),
        fields(issue_id = %issue_id, product_id = %product_id, quantity)
    )]
    pub async fn set_line_quantity(
        &self,
        issue_id: IssueId,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<(), ApiError> {
        let request = self
            .request(
                Method::PUT,
                &format!("/api/issues/{issue_id}/lines/{product_id}"),
            )
            .json(&SetLineQuantityPayload { quantity });

        self.execute_empty(request).await
    }

    /// Remove a line item from an issue.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend refuses.
    #[instrument(skip(self), fields(issue_id = %issue_id, product_id = %product_id))]
    pub async fn remove_issue_line(
        &self,
        issue_id: IssueId,
        product_id: ProductId,
    ) -> Result<(), ApiError> {
        let request = self.request(
            Method::DELETE,
            &format!("/api/issues/{issue_id}/lines/{product_id}"),
        );

        self.execute_empty(request).await
    }

    /// Complete an issue, materializing the stock movement server-side.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend refuses (for
    /// example, the issue was already completed elsewhere).
    #[instrument(skip(self), fields(issue_id = %issue_id))]
    pub async fn complete_issue(&self, issue_id: IssueId) -> Result<(), ApiError> {
        let request = self.request(Method::POST, &format!("/api/issues/{issue_id}/complete"));

        self.execute_empty(request).await
    }
}
