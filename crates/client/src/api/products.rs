//! Product catalog operations.

use reqwest::Method;
use tracing::instrument;

use storekeeper_core::ProductId;

use super::conversions::{convert_product, convert_product_page};
use super::types::{Product, ProductCreateInput, ProductPage, ProductUpdateInput};
use super::wire::{ProductEnvelope, ProductPageEnvelope};
use super::{ApiError, InventoryApi};

impl InventoryApi {
    /// Get a page of the product catalog with live availability figures.
    ///
    /// Never cached - available quantities change with every receipt and
    /// every completed issue.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_products(&self, page: u32, per_page: u32) -> Result<ProductPage, ApiError> {
        let request = self
            .request(Method::GET, "/api/products")
            .query(&[("page", page), ("per_page", per_page)]);

        let envelope: ProductPageEnvelope = self.execute(request).await?;
        convert_product_page(envelope)
    }

    /// Get a single product.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if no product has this ID.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: ProductId) -> Result<Product, ApiError> {
        let request = self.request(Method::GET, &format!("/api/products/{id}"));

        match self.execute::<ProductEnvelope>(request).await {
            Ok(envelope) => convert_product(envelope.product),
            Err(
                ApiError::Rejected { status: 404, .. } | ApiError::Status { status: 404, .. },
            ) => Err(ApiError::NotFound(format!("Product {id} not found"))),
            Err(e) => Err(e),
        }
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the backend refuses.
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_product(&self, input: &ProductCreateInput) -> Result<Product, ApiError> {
        let request = self.request(Method::POST, "/api/products").json(input);

        let envelope: ProductEnvelope = self.execute(request).await?;
        convert_product(envelope.product)
    }

    /// Update a product. Only the provided fields change.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the backend refuses.
    #[instrument(skip(self, input), fields(product_id = %id))]
    pub async fn update_product(
        &self,
        id: ProductId,
        input: &ProductUpdateInput,
    ) -> Result<Product, ApiError> {
        let request = self
            .request(Method::PUT, &format!("/api/products/{id}"))
            .json(input);

        let envelope: ProductEnvelope = self.execute(request).await?;
        convert_product(envelope.product)
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails; the backend refuses when
    /// the product appears on an open issue.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete_product(&self, id: ProductId) -> Result<(), ApiError> {
        let request = self.request(Method::DELETE, &format!("/api/products/{id}"));

        self.execute_empty(request).await
    }
}
