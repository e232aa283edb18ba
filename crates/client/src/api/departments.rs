//! Department reference-data operations.

use reqwest::Method;
use tracing::{debug, instrument};

use storekeeper_core::DepartmentId;

use super::cache::{CacheValue, DEPARTMENTS_KEY};
use super::types::Department;
use super::wire::{DepartmentEnvelope, DepartmentWritePayload, DepartmentsEnvelope};
use super::{ApiError, InventoryApi};

impl InventoryApi {
    /// List all departments. Cached for five minutes.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_departments(&self) -> Result<Vec<Department>, ApiError> {
        if let Some(CacheValue::Departments(departments)) =
            self.inner.cache.get(DEPARTMENTS_KEY).await
        {
            debug!("Cache hit for departments");
            return Ok(departments);
        }

        let request = self.request(Method::GET, "/api/departments");
        let envelope: DepartmentsEnvelope = self.execute(request).await?;

        self.inner
            .cache
            .insert(
                DEPARTMENTS_KEY.to_string(),
                CacheValue::Departments(envelope.departments.clone()),
            )
            .await;

        Ok(envelope.departments)
    }

    /// Create a department.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the backend refuses.
    #[instrument(skip(self), fields(name = %name))]
    pub async fn create_department(&self, name: &str) -> Result<Department, ApiError> {
        let payload = DepartmentWritePayload { name };
        let request = self.request(Method::POST, "/api/departments").json(&payload);

        let envelope: DepartmentEnvelope = self.execute(request).await?;
        self.inner.cache.invalidate(DEPARTMENTS_KEY).await;
        Ok(envelope.department)
    }

    /// Rename a department.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the backend refuses.
    #[instrument(skip(self), fields(department_id = %id))]
    pub async fn update_department(
        &self,
        id: DepartmentId,
        name: &str,
    ) -> Result<Department, ApiError> {
        let payload = DepartmentWritePayload { name };
        let request = self
            .request(Method::PUT, &format!("/api/departments/{id}"))
            .json(&payload);

        let envelope: DepartmentEnvelope = self.execute(request).await?;
        self.inner.cache.invalidate(DEPARTMENTS_KEY).await;
        Ok(envelope.department)
    }

    /// Delete a department.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails; the backend refuses when
    /// the department has issue history.
    #[instrument(skip(self), fields(department_id = %id))]
    pub async fn delete_department(&self, id: DepartmentId) -> Result<(), ApiError> {
        let request = self.request(Method::DELETE, &format!("/api/departments/{id}"));

        self.execute_empty(request).await?;
        self.inner.cache.invalidate(DEPARTMENTS_KEY).await;
        Ok(())
    }
}
