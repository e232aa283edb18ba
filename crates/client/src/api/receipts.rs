//! Receipt operations - recording stock received from vendors.

use reqwest::Method;
use tracing::instrument;

use super::conversions::{convert_receipt, convert_receipt_page};
use super::types::{Receipt, ReceiptCreateInput, ReceiptPage};
use super::wire::{ReceiptEnvelope, ReceiptPageEnvelope};
use super::{ApiError, InventoryApi};

impl InventoryApi {
    /// Get a page of receipt history, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_receipts(&self, page: u32, per_page: u32) -> Result<ReceiptPage, ApiError> {
        let request = self
            .request(Method::GET, "/api/receipts")
            .query(&[("page", page), ("per_page", per_page)]);

        let envelope: ReceiptPageEnvelope = self.execute(request).await?;
        convert_receipt_page(envelope)
    }

    /// Record received stock.
    ///
    /// The backend increments the product's available quantity; callers
    /// holding a product snapshot should re-fetch it afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the backend refuses.
    #[instrument(
        skip(self, input),
        fields(product_id = %input.product_id, quantity = input.quantity)
    )]
    pub async fn create_receipt(&self, input: &ReceiptCreateInput) -> Result<Receipt, ApiError> {
        let request = self.request(Method::POST, "/api/receipts").json(input);

        let envelope: ReceiptEnvelope = self.execute(request).await?;
        convert_receipt(envelope.receipt)
    }
}
