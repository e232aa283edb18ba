//! Conversions from raw wire payloads to domain types.
//!
//! All quantity fields come off the wire as `i64` and are range-checked
//! here; a negative or oversized figure fails the whole response with
//! [`ApiError::Malformed`] rather than entering the domain.

use storekeeper_core::{
    CategoryId, DepartmentId, IssueId, Price, ProductId, ReceiptId, VendorId, quantity_from_wire,
};

use super::ApiError;
use super::types::{Issue, IssueLine, Product, ProductPage, Receipt, ReceiptPage};
use super::wire::{
    IssueLinePayload, IssuePayload, ProductPageEnvelope, ProductPayload, ReceiptPageEnvelope,
    ReceiptPayload,
};

pub(crate) fn convert_product(payload: ProductPayload) -> Result<Product, ApiError> {
    let available = quantity_from_wire(payload.available_quantity)
        .map_err(|e| ApiError::Malformed(format!("product {}: {e}", payload.id)))?;

    Ok(Product {
        id: ProductId::new(payload.id),
        name: payload.name,
        description: payload.description,
        unit: payload.unit,
        unit_price: Price::usd(payload.rate),
        available,
        category_id: payload.category_id.map(CategoryId::new),
    })
}

pub(crate) fn convert_product_page(envelope: ProductPageEnvelope) -> Result<ProductPage, ApiError> {
    Ok(ProductPage {
        products: envelope
            .products
            .into_iter()
            .map(convert_product)
            .collect::<Result<_, _>>()?,
        page: envelope.page,
        per_page: envelope.per_page,
        total: envelope.total,
    })
}

pub(crate) fn convert_issue_line(payload: IssueLinePayload) -> Result<IssueLine, ApiError> {
    let quantity = quantity_from_wire(payload.quantity)
        .map_err(|e| ApiError::Malformed(format!("line for product {}: {e}", payload.product_id)))?;

    Ok(IssueLine {
        product_id: ProductId::new(payload.product_id),
        product_name: payload.product_name,
        unit: payload.unit,
        quantity,
        unit_price: Price::usd(payload.rate),
    })
}

pub(crate) fn convert_issue(payload: IssuePayload) -> Result<Issue, ApiError> {
    Ok(Issue {
        id: IssueId::new(payload.id),
        department_id: DepartmentId::new(payload.department_id),
        status: payload.status,
        lines: payload
            .lines
            .into_iter()
            .map(convert_issue_line)
            .collect::<Result<_, _>>()?,
    })
}

pub(crate) fn convert_receipt(payload: ReceiptPayload) -> Result<Receipt, ApiError> {
    let quantity = quantity_from_wire(payload.quantity)
        .map_err(|e| ApiError::Malformed(format!("receipt {}: {e}", payload.id)))?;

    Ok(Receipt {
        id: ReceiptId::new(payload.id),
        product_id: ProductId::new(payload.product_id),
        vendor_id: VendorId::new(payload.vendor_id),
        quantity,
        unit_price: Price::usd(payload.rate),
        received_at: payload.received_at,
    })
}

pub(crate) fn convert_receipt_page(envelope: ReceiptPageEnvelope) -> Result<ReceiptPage, ApiError> {
    Ok(ReceiptPage {
        receipts: envelope
            .receipts
            .into_iter()
            .map(convert_receipt)
            .collect::<Result<_, _>>()?,
        page: envelope.page,
        per_page: envelope.per_page,
        total: envelope.total,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn product_payload(available_quantity: i64) -> ProductPayload {
        ProductPayload {
            id: 7,
            name: "Copy paper A4".to_string(),
            description: None,
            unit: "ream".to_string(),
            rate: rust_decimal::Decimal::new(450, 2),
            available_quantity,
            category_id: Some(2),
        }
    }

    #[test]
    fn test_convert_product() {
        let product = convert_product(product_payload(12)).unwrap();
        assert_eq!(product.id, ProductId::new(7));
        assert_eq!(product.available, 12);
        assert_eq!(product.category_id, Some(CategoryId::new(2)));
        assert_eq!(product.unit_price.amount.to_string(), "4.50");
    }

    #[test]
    fn test_convert_product_rejects_negative_quantity() {
        let err = convert_product(product_payload(-3)).unwrap_err();
        match err {
            ApiError::Malformed(message) => {
                assert!(message.contains("product 7"), "unexpected: {message}");
            }
            other => panic!("expected Malformed, got {other:?}"),
        }
    }

    #[test]
    fn test_convert_issue_maps_all_lines() {
        let payload = IssuePayload {
            id: 31,
            department_id: 4,
            status: storekeeper_core::IssueStatus::Open,
            lines: vec![
                IssueLinePayload {
                    product_id: 7,
                    product_name: "Copy paper A4".to_string(),
                    unit: "ream".to_string(),
                    quantity: 5,
                    rate: rust_decimal::Decimal::new(450, 2),
                },
                IssueLinePayload {
                    product_id: 9,
                    product_name: "Stapler".to_string(),
                    unit: "pcs".to_string(),
                    quantity: 1,
                    rate: rust_decimal::Decimal::new(1200, 2),
                },
            ],
        };

        let issue = convert_issue(payload).unwrap();
        assert_eq!(issue.id, IssueId::new(31));
        assert_eq!(issue.lines.len(), 2);
        assert_eq!(issue.lines[0].quantity, 5);
        assert_eq!(issue.lines[1].product_id, ProductId::new(9));
    }

    #[test]
    fn test_convert_issue_fails_on_bad_line() {
        let payload = IssuePayload {
            id: 31,
            department_id: 4,
            status: storekeeper_core::IssueStatus::Open,
            lines: vec![IssueLinePayload {
                product_id: 7,
                product_name: "Copy paper A4".to_string(),
                unit: "ream".to_string(),
                quantity: -1,
                rate: rust_decimal::Decimal::new(450, 2),
            }],
        };

        assert!(convert_issue(payload).is_err());
    }
}
