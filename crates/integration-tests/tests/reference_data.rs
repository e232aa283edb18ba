//! Integration tests for reference data: categories, vendors, departments,
//! and staff.
//!
//! These tests require a running Backend Inventory Service; point
//! `STOREKEEPER_API_URL` at a test instance. Reference data is cached
//! client-side, so each test also proves that mutations show up in the
//! next list call.

use storekeeper_integration_tests::{api, unique_name};

// ============================================================================
// Categories
// ============================================================================

#[tokio::test]
#[ignore = "Requires a running Backend Inventory Service"]
async fn test_category_mutations_are_visible_through_the_cache() {
    let api = api();
    let name = unique_name("category");

    let created = api
        .create_category(&name, Some("integration test record"))
        .await
        .expect("Failed to create category");

    let listed = api
        .list_categories()
        .await
        .expect("Failed to list categories");
    assert!(
        listed.iter().any(|c| c.id == created.id && c.name == name),
        "created category missing from the list"
    );

    let renamed = unique_name("category-renamed");
    api.update_category(created.id, &renamed, None)
        .await
        .expect("Failed to update category");
    let listed = api
        .list_categories()
        .await
        .expect("Failed to list categories");
    let entry = listed
        .iter()
        .find(|c| c.id == created.id)
        .expect("updated category missing from the list");
    assert_eq!(entry.name, renamed);

    api.delete_category(created.id)
        .await
        .expect("Failed to delete category");
    let listed = api
        .list_categories()
        .await
        .expect("Failed to list categories");
    assert!(
        !listed.iter().any(|c| c.id == created.id),
        "deleted category still listed"
    );
}

// ============================================================================
// Vendors
// ============================================================================

#[tokio::test]
#[ignore = "Requires a running Backend Inventory Service"]
async fn test_vendor_crud_round_trip() {
    let api = api();
    let name = unique_name("vendor");

    let created = api
        .create_vendor(&name, Some("orders@example.com"), Some("12 Depot Rd"))
        .await
        .expect("Failed to create vendor");
    assert_eq!(created.contact.as_deref(), Some("orders@example.com"));

    let updated = api
        .update_vendor(created.id, &name, Some("sales@example.com"), None)
        .await
        .expect("Failed to update vendor");
    assert_eq!(updated.contact.as_deref(), Some("sales@example.com"));

    let listed = api.list_vendors().await.expect("Failed to list vendors");
    assert!(
        listed.iter().any(|v| v.id == created.id),
        "vendor missing from the list"
    );

    api.delete_vendor(created.id)
        .await
        .expect("Failed to delete vendor");
    let listed = api.list_vendors().await.expect("Failed to list vendors");
    assert!(
        !listed.iter().any(|v| v.id == created.id),
        "deleted vendor still listed"
    );
}

// ============================================================================
// Departments and staff
// ============================================================================

#[tokio::test]
#[ignore = "Requires a running Backend Inventory Service"]
async fn test_department_and_staff_round_trip() {
    let api = api();

    let department_name = unique_name("department");
    let department = api
        .create_department(&department_name)
        .await
        .expect("Failed to create department");
    let listed = api
        .list_departments()
        .await
        .expect("Failed to list departments");
    assert!(
        listed
            .iter()
            .any(|d| d.id == department.id && d.name == department_name),
        "created department missing from the list"
    );

    let renamed = unique_name("department-renamed");
    let department = api
        .update_department(department.id, &renamed)
        .await
        .expect("Failed to update department");
    assert_eq!(department.name, renamed);

    let staff_name = unique_name("staff");
    let staff = api
        .create_staff(&staff_name, Some("keeper@example.com"), Some("storekeeper"))
        .await
        .expect("Failed to create staff member");
    let listed = api.list_staff().await.expect("Failed to list staff");
    let entry = listed
        .iter()
        .find(|s| s.id == staff.id)
        .expect("created staff member missing from the list");
    assert_eq!(entry.role.as_deref(), Some("storekeeper"));

    let staff = api
        .update_staff(staff.id, &staff_name, Some("keeper@example.com"), Some("manager"))
        .await
        .expect("Failed to update staff member");
    assert_eq!(staff.role.as_deref(), Some("manager"));

    api.delete_staff(staff.id)
        .await
        .expect("Failed to delete staff member");
    api.delete_department(department.id)
        .await
        .expect("Failed to delete department");
}
