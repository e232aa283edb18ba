//! Integration tests for the product catalog.
//!
//! These tests require a running Backend Inventory Service; point
//! `STOREKEEPER_API_URL` at a test instance. Records are created under
//! unique names and deleted afterwards.

use rust_decimal::Decimal;

use storekeeper_client::api::{Product, ProductCreateInput, ProductUpdateInput};
use storekeeper_integration_tests::{api, unique_name};

fn new_product_input(name: String, available_quantity: u32) -> ProductCreateInput {
    ProductCreateInput {
        name,
        description: Some("integration test record".to_string()),
        unit: "pcs".to_string(),
        rate: Decimal::new(1250, 2),
        available_quantity,
        category_id: None,
    }
}

/// Walk the catalog page by page and collect every product.
async fn all_products(api: &storekeeper_client::InventoryApi, per_page: u32) -> Vec<Product> {
    let mut products = Vec::new();
    let mut page = 1;
    loop {
        let batch = api
            .list_products(page, per_page)
            .await
            .expect("Failed to list products");
        assert!(
            batch.products.len() <= per_page as usize,
            "page {page} exceeded the requested size"
        );
        let has_more = batch.has_more();
        products.extend(batch.products);
        if !has_more {
            return products;
        }
        page += 1;
    }
}

// ============================================================================
// CRUD round trip
// ============================================================================

#[tokio::test]
#[ignore = "Requires a running Backend Inventory Service"]
async fn test_product_crud_round_trip() {
    let api = api();
    let name = unique_name("product");

    let created = api
        .create_product(&new_product_input(name.clone(), 25))
        .await
        .expect("Failed to create product");
    assert_eq!(created.name, name);
    assert_eq!(created.available, 25);
    assert_eq!(created.unit_price.amount, Decimal::new(1250, 2));

    let fetched = api
        .get_product(created.id)
        .await
        .expect("Failed to fetch product");
    assert_eq!(fetched.name, name);
    assert_eq!(fetched.available, 25);

    let renamed = unique_name("product-renamed");
    let updated = api
        .update_product(
            created.id,
            &ProductUpdateInput {
                name: Some(renamed.clone()),
                rate: Some(Decimal::new(999, 2)),
                ..ProductUpdateInput::default()
            },
        )
        .await
        .expect("Failed to update product");
    assert_eq!(updated.name, renamed);
    assert_eq!(updated.unit_price.amount, Decimal::new(999, 2));
    // Stock is not updatable through this endpoint
    assert_eq!(updated.available, 25);

    api.delete_product(created.id)
        .await
        .expect("Failed to delete product");
    let missing = api.get_product(created.id).await;
    assert!(
        matches!(missing, Err(storekeeper_client::ApiError::NotFound(_))),
        "deleted product should be gone, got: {missing:?}"
    );
}

// ============================================================================
// Pagination
// ============================================================================

#[tokio::test]
#[ignore = "Requires a running Backend Inventory Service"]
async fn test_product_pagination_covers_the_whole_catalog() {
    let api = api();
    let prefix = unique_name("page-walk");

    let mut created = Vec::new();
    for n in 0..3 {
        let product = api
            .create_product(&new_product_input(format!("{prefix}-{n}"), 5))
            .await
            .expect("Failed to create product");
        created.push(product);
    }

    // A tiny page size forces the walk across page boundaries
    let all = all_products(&api, 2).await;
    for product in &created {
        assert!(
            all.iter().any(|p| p.id == product.id),
            "product {} missing from the paged walk",
            product.id
        );
    }

    for product in created {
        let _ = api.delete_product(product.id).await;
    }
}
