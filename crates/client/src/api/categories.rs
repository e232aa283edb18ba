//! Category reference-data operations.

use reqwest::Method;
use tracing::{debug, instrument};

use storekeeper_core::CategoryId;

use super::cache::{CATEGORIES_KEY, CacheValue};
use super::types::Category;
use super::wire::{CategoriesEnvelope, CategoryEnvelope, CategoryWritePayload};
use super::{ApiError, InventoryApi};

impl InventoryApi {
    /// List all categories. Cached for five minutes.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        if let Some(CacheValue::Categories(categories)) = self.inner.cache.get(CATEGORIES_KEY).await
        {
            debug!("Cache hit for categories");
            return Ok(categories);
        }

        let request = self.request(Method::GET, "/api/categories");
        let envelope: CategoriesEnvelope = self.execute(request).await?;

        self.inner
            .cache
            .insert(
                CATEGORIES_KEY.to_string(),
                CacheValue::Categories(envelope.categories.clone()),
            )
            .await;

        Ok(envelope.categories)
    }

    /// Create a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the backend refuses.
    #[instrument(skip(self), fields(name = %name))]
    pub async fn create_category(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<Category, ApiError> {
        let payload = CategoryWritePayload { name, description };
        let request = self.request(Method::POST, "/api/categories").json(&payload);

        let envelope: CategoryEnvelope = self.execute(request).await?;
        self.inner.cache.invalidate(CATEGORIES_KEY).await;
        Ok(envelope.category)
    }

    /// Rename or re-describe a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the backend refuses.
    #[instrument(skip(self), fields(category_id = %id))]
    pub async fn update_category(
        &self,
        id: CategoryId,
        name: &str,
        description: Option<&str>,
    ) -> Result<Category, ApiError> {
        let payload = CategoryWritePayload { name, description };
        let request = self
            .request(Method::PUT, &format!("/api/categories/{id}"))
            .json(&payload);

        let envelope: CategoryEnvelope = self.execute(request).await?;
        self.inner.cache.invalidate(CATEGORIES_KEY).await;
        Ok(envelope.category)
    }

    /// Delete a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails; the backend refuses when
    /// products still reference the category.
    #[instrument(skip(self), fields(category_id = %id))]
    pub async fn delete_category(&self, id: CategoryId) -> Result<(), ApiError> {
        let request = self.request(Method::DELETE, &format!("/api/categories/{id}"));

        self.execute_empty(request).await?;
        self.inner.cache.invalidate(CATEGORIES_KEY).await;
        Ok(())
    }
}
