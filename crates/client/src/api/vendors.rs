//! Vendor reference-data operations.

use reqwest::Method;
use tracing::{debug, instrument};

use storekeeper_core::VendorId;

use super::cache::{CacheValue, VENDORS_KEY};
use super::types::Vendor;
use super::wire::{VendorEnvelope, VendorWritePayload, VendorsEnvelope};
use super::{ApiError, InventoryApi};

impl InventoryApi {
    /// List all vendors. Cached for five minutes.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_vendors(&self) -> Result<Vec<Vendor>, ApiError> {
        if let Some(CacheValue::Vendors(vendors)) = self.inner.cache.get(VENDORS_KEY).await {
            debug!("Cache hit for vendors");
            return Ok(vendors);
        }

        let request = self.request(Method::GET, "/api/vendors");
        let envelope: VendorsEnvelope = self.execute(request).await?;

        self.inner
            .cache
            .insert(
                VENDORS_KEY.to_string(),
                CacheValue::Vendors(envelope.vendors.clone()),
            )
            .await;

        Ok(envelope.vendors)
    }

    /// Create a vendor.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the backend refuses.
    #[instrument(skip(self), fields(name = %name))]
    pub async fn create_vendor(
        &self,
        name: &str,
        contact: Option<&str>,
        address: Option<&str>,
    ) -> Result<Vendor, ApiError> {
        let payload = VendorWritePayload {
            name,
            contact,
            address,
        };
        let request = self.request(Method::POST, "/api/vendors").json(&payload);

        let envelope: VendorEnvelope = self.execute(request).await?;
        self.inner.cache.invalidate(VENDORS_KEY).await;
        Ok(envelope.vendor)
    }

    /// Update a vendor's details.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the backend refuses.
    #[instrument(skip(self), fields(vendor_id = %id))]
    pub async fn update_vendor(
        &self,
        id: VendorId,
        name: &str,
        contact: Option<&str>,
        address: Option<&str>,
    ) -> Result<Vendor, ApiError> {
        let payload = VendorWritePayload {
            name,
            contact,
            address,
        };
        let request = self
            .request(Method::PUT, &format!("/api/vendors/{id}"))
            .json(&payload);

        let envelope: VendorEnvelope = self.execute(request).await?;
        self.inner.cache.invalidate(VENDORS_KEY).await;
        Ok(envelope.vendor)
    }

    /// Delete a vendor.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails; the backend refuses when
    /// receipts still reference the vendor.
    #[instrument(skip(self), fields(vendor_id = %id))]
    pub async fn delete_vendor(&self, id: VendorId) -> Result<(), ApiError> {
        let request = self.request(Method::DELETE, &format!("/api/vendors/{id}"));

        self.execute_empty(request).await?;
        self.inner.cache.invalidate(VENDORS_KEY).await;
        Ok(())
    }
}
