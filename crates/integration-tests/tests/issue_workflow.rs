//! End-to-end issue workflow against a live Backend Inventory Service.
//!
//! Each test provisions its own department, staff member, and product, so
//! nothing depends on seed data. Cleanup is best-effort; unique names keep
//! leftovers from colliding with later runs.

use std::sync::Arc;

use rust_decimal::Decimal;

use storekeeper_client::api::ProductCreateInput;
use storekeeper_client::InventoryApi;
use storekeeper_core::{DepartmentId, ProductId, StaffId};
use storekeeper_integration_tests::{api, unique_name};
use storekeeper_ledger::{LedgerStatus, StockLedger};

struct Fixture {
    department: DepartmentId,
    staff: StaffId,
    product: ProductId,
}

/// Provision a department, a staff member, and a product with the given
/// opening stock.
async fn provision(api: &InventoryApi, opening_stock: u32) -> Fixture {
    let department = api
        .create_department(&unique_name("issue-dept"))
        .await
        .expect("Failed to create department");
    let staff = api
        .create_staff(&unique_name("issue-staff"), None, Some("storekeeper"))
        .await
        .expect("Failed to create staff member");
    let product = api
        .create_product(&ProductCreateInput {
            name: unique_name("issue-product"),
            description: None,
            unit: "pcs".to_string(),
            rate: Decimal::new(475, 2),
            available_quantity: opening_stock,
            category_id: None,
        })
        .await
        .expect("Failed to create product");

    Fixture {
        department: department.id,
        staff: staff.id,
        product: product.id,
    }
}

/// Best-effort teardown; completed-issue history may keep some records
/// undeletable, which is fine for a test backend.
async fn teardown(api: &InventoryApi, fixture: &Fixture) {
    let _ = api.delete_product(fixture.product).await;
    let _ = api.delete_staff(fixture.staff).await;
    let _ = api.delete_department(fixture.department).await;
}

// ============================================================================
// Full round trip
// ============================================================================

#[tokio::test]
#[ignore = "Requires a running Backend Inventory Service"]
async fn test_issue_round_trip_decrements_stock() {
    let api = api();
    let fixture = provision(&api, 10).await;

    let ledger = StockLedger::new(Arc::new(api.clone()), fixture.staff);
    ledger
        .select_department(Some(fixture.department))
        .await
        .expect("Failed to load the department session");
    assert_eq!(ledger.status(), LedgerStatus::Ready);

    ledger
        .add_line_item(fixture.product, 2)
        .await
        .expect("Failed to add the line item");
    ledger
        .increment_quantity(fixture.product)
        .await
        .expect("Failed to increment");
    ledger
        .decrement_quantity(fixture.product)
        .await
        .expect("Failed to decrement");

    let pending = ledger.pending_issue().expect("a pending issue");
    assert_eq!(pending.items.len(), 1);
    assert_eq!(pending.items[0].quantity, 2);

    let completed = ledger.submit_issue().await.expect("Failed to submit");
    assert_eq!(ledger.status(), LedgerStatus::NoDepartment);
    assert!(completed.issue_id.as_i64() > 0);

    // Two units left the store for good
    let product = api
        .get_product(fixture.product)
        .await
        .expect("Failed to fetch product");
    assert_eq!(product.available, 8);

    teardown(&api, &fixture).await;
}

// ============================================================================
// Reopening a pending issue
// ============================================================================

#[tokio::test]
#[ignore = "Requires a running Backend Inventory Service"]
async fn test_reselecting_a_department_adopts_its_pending_issue() {
    let api = api();
    let fixture = provision(&api, 10).await;

    // First session queues a line and is abandoned without submitting
    let first = StockLedger::new(Arc::new(api.clone()), fixture.staff);
    first
        .select_department(Some(fixture.department))
        .await
        .expect("Failed to load the department session");
    first
        .add_line_item(fixture.product, 2)
        .await
        .expect("Failed to add the line item");
    drop(first);

    // A fresh ledger over the same backend adopts the open issue
    let second = StockLedger::new(Arc::new(api.clone()), fixture.staff);
    second
        .select_department(Some(fixture.department))
        .await
        .expect("Failed to reload the department session");
    let pending = second.pending_issue().expect("a pending issue");
    assert!(pending.issue_id.is_some(), "open issue was not adopted");
    assert_eq!(pending.items.len(), 1);
    assert_eq!(pending.items[0].product_id, fixture.product);
    assert_eq!(pending.items[0].quantity, 2);

    // Removing the adopted line leaves nothing pending server-side
    second
        .remove_line_item(fixture.product)
        .await
        .expect("Failed to remove the line item");
    second
        .select_department(Some(fixture.department))
        .await
        .expect("Failed to reload the department session");
    assert!(
        second.pending_issue().expect("a session").items.is_empty(),
        "removed line survived a reload"
    );

    teardown(&api, &fixture).await;
}
