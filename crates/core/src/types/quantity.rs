//! Stock quantity conversions.
//!
//! Domain types carry stock quantities as `u32`; the Backend Inventory
//! Service serializes them as JSON numbers (`i64`). Conversions between the
//! two are checked here so a malformed payload can never smuggle a negative
//! quantity into the domain.

/// Errors that can occur when converting a wire quantity.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityError {
    /// The wire value is negative.
    #[error("quantity cannot be negative (got {0})")]
    Negative(i64),
    /// The wire value exceeds the supported range.
    #[error("quantity {0} exceeds the supported range")]
    OutOfRange(i64),
}

/// Convert a wire-format quantity into a domain quantity.
///
/// Zero is accepted: an available-quantity figure of 0 is a legitimate
/// (out-of-stock) state. Business rules such as "a line item holds at least
/// one unit" belong to the workflow layer, not the conversion.
///
/// # Errors
///
/// Returns [`QuantityError`] if the value is negative or larger than `u32`
/// can hold.
///
/// # Examples
///
/// ```
/// use storekeeper_core::quantity_from_wire;
///
/// assert_eq!(quantity_from_wire(12), Ok(12));
/// assert_eq!(quantity_from_wire(0), Ok(0));
/// assert!(quantity_from_wire(-1).is_err());
/// ```
pub fn quantity_from_wire(raw: i64) -> Result<u32, QuantityError> {
    if raw < 0 {
        return Err(QuantityError::Negative(raw));
    }
    u32::try_from(raw).map_err(|_| QuantityError::OutOfRange(raw))
}
