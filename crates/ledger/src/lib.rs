//! The stock ledger: a client-side model of the pending-issue workflow.
//!
//! A presentation shell (terminal UI, desktop app, web frontend) owns a
//! [`StockLedger`] and drives it with user intent: select a department, add
//! line items, nudge quantities, submit. The ledger validates every edit
//! against a cached availability snapshot before it touches the network,
//! applies quantity edits optimistically with exact rollback on refusal,
//! and fences off responses that arrive after the department they belonged
//! to has been switched away.
//!
//! The backend is reached through the [`IssueBackend`] trait; production
//! code plugs in `storekeeper_client::InventoryApi`, tests plug in scripted
//! fakes.

#![cfg_attr(not(test), forbid(unsafe_code))]

mod backend;
mod error;
mod ledger;
mod session;

pub use backend::{BackendError, IssueBackend};
pub use error::{LedgerError, ValidationError};
pub use ledger::{CompletedIssue, StockLedger};
pub use session::{LedgerStatus, LineItem, PendingIssue, SessionPhase};
