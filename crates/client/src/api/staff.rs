//! Staff reference-data operations.

use reqwest::Method;
use tracing::{debug, instrument};

use storekeeper_core::StaffId;

use super::cache::{CacheValue, STAFF_KEY};
use super::types::StaffMember;
use super::wire::{StaffEnvelope, StaffListEnvelope, StaffWritePayload};
use super::{ApiError, InventoryApi};

impl InventoryApi {
    /// List all staff members. Cached for five minutes.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_staff(&self) -> Result<Vec<StaffMember>, ApiError> {
        if let Some(CacheValue::Staff(staff)) = self.inner.cache.get(STAFF_KEY).await {
            debug!("Cache hit for staff");
            return Ok(staff);
        }

        let request = self.request(Method::GET, "/api/staff");
        let envelope: StaffListEnvelope = self.execute(request).await?;

        self.inner
            .cache
            .insert(
                STAFF_KEY.to_string(),
                CacheValue::Staff(envelope.staff.clone()),
            )
            .await;

        Ok(envelope.staff)
    }

    /// Create a staff member.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the backend refuses.
    #[instrument(skip(self), fields(name = %name))]
    pub async fn create_staff(
        &self,
        name: &str,
        email: Option<&str>,
        role: Option<&str>,
    ) -> Result<StaffMember, ApiError> {
        let payload = StaffWritePayload { name, email, role };
        let request = self.request(Method::POST, "/api/staff").json(&payload);

        let envelope: StaffEnvelope = self.execute(request).await?;
        self.inner.cache.invalidate(STAFF_KEY).await;
        Ok(envelope.staff)
    }

    /// Update a staff member's details.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the backend refuses.
    #[instrument(skip(self), fields(staff_id = %id))]
    pub async fn update_staff(
        &self,
        id: StaffId,
        name: &str,
        email: Option<&str>,
        role: Option<&str>,
    ) -> Result<StaffMember, ApiError> {
        let payload = StaffWritePayload { name, email, role };
        let request = self
            .request(Method::PUT, &format!("/api/staff/{id}"))
            .json(&payload);

        let envelope: StaffEnvelope = self.execute(request).await?;
        self.inner.cache.invalidate(STAFF_KEY).await;
        Ok(envelope.staff)
    }

    /// Delete a staff member.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails; the backend refuses when
    /// the member is named on issue history.
    #[instrument(skip(self), fields(staff_id = %id))]
    pub async fn delete_staff(&self, id: StaffId) -> Result<(), ApiError> {
        let request = self.request(Method::DELETE, &format!("/api/staff/{id}"));

        self.execute_empty(request).await?;
        self.inner.cache.invalidate(STAFF_KEY).await;
        Ok(())
    }
}
