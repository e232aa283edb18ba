//! Error taxonomy for ledger operations.
//!
//! Three channels, matching what a presentation shell needs to do next:
//! [`LedgerError::Validation`] never touched the network and names the local
//! rule that failed; [`LedgerError::Conflict`] carries the backend's own
//! rejection message for display, with the local state rolled back;
//! [`LedgerError::Transport`] is a generic connectivity failure, also rolled
//! back, where retrying the same operation is reasonable.

use thiserror::Error;

use storekeeper_core::ProductId;

use crate::backend::BackendError;

/// Local validation failures, rejected before any network traffic.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// No department is selected; nothing can be issued.
    #[error("no department is selected")]
    NoDepartmentSelected,

    /// The department's pending issue is still loading.
    #[error("the department's pending issue is still loading")]
    SessionLoading,

    /// The product is not in the availability snapshot.
    #[error("product {0} is not in the availability snapshot")]
    UnknownProduct(ProductId),

    /// A line item must hold at least one unit.
    #[error("quantity must be at least 1")]
    ZeroQuantity,

    /// The requested quantity is more than the store has left.
    #[error("requested quantity {requested} exceeds the {available} available")]
    InsufficientStock { requested: u32, available: u32 },

    /// The line item already has an operation awaiting the backend.
    #[error("product {0} already has an operation in flight")]
    OperationInFlight(ProductId),

    /// No line item exists for the product.
    #[error("no line item for product {0}")]
    LineNotFound(ProductId),

    /// Decrementing a single-unit line is refused; remove the line instead.
    #[error("quantity is already at the minimum of 1; remove the line instead")]
    QuantityFloor,

    /// Incrementing a single-unit line is refused.
    ///
    /// Longstanding workflow rule: a line holding one unit can only be
    /// removed or re-added at a larger quantity, never incremented in place.
    #[error("a line must hold at least two units before it can be incremented")]
    IncrementFloor,

    /// Incrementing is refused while fewer than two units remain available.
    ///
    /// Stock-side counterpart of [`IncrementFloor`](Self::IncrementFloor),
    /// preserved from the workflow as observed.
    #[error("only {available} available; incrementing requires at least 2 in stock")]
    AvailabilityFloor { available: u32 },

    /// Line edits are pending; the issue cannot be submitted yet.
    #[error("line operations are still in flight; wait before submitting")]
    EditsInFlight,

    /// A submit is already awaiting the backend.
    #[error("a submit is already in flight")]
    SubmitInFlight,

    /// The pending issue has no line items to submit.
    #[error("the pending issue has no line items")]
    EmptyIssue,

    /// No issue exists on the server yet for this session.
    #[error("the pending issue has not been started on the server")]
    IssueNotStarted,
}

/// Failures surfaced by ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Rejected locally; no request was sent.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The backend refused the operation. The message is the backend's own,
    /// verbatim. Local state was rolled back; the availability snapshot may
    /// be stale, so refresh products before retrying.
    #[error("conflict: {message}")]
    Conflict { message: String },

    /// The backend could not be reached or answered unintelligibly. Local
    /// state was rolled back; retrying the same operation is safe.
    #[error("transport failure: {message}")]
    Transport { message: String },
}

impl From<BackendError> for LedgerError {
    fn from(e: BackendError) -> Self {
        match e {
            BackendError::Rejected { message } => Self::Conflict { message },
            BackendError::Unreachable { message } => Self::Transport { message },
        }
    }
}
