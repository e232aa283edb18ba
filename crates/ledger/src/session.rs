//! Per-department session state.
//!
//! Everything a pending issue needs lives in one [`EditingSession`] value:
//! the line items, the availability snapshot they are validated against, the
//! lifecycle phase, and the set of products with an operation in flight.
//! Selecting a department replaces the whole value, so no field can survive
//! a switch by accident.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use storekeeper_client::api::{Issue, Product};
use storekeeper_core::{DepartmentId, IssueId, Price, ProductId};

/// Lifecycle phase of a department session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// The product snapshot and open issue are still being fetched.
    Loading,
    /// The session accepts line operations and submit.
    Ready,
    /// A submit is awaiting the backend.
    Submitting,
}

/// One pending line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineItem {
    /// Product being issued.
    pub product_id: ProductId,
    /// Product name at the time the line entered the session.
    pub name: String,
    /// Unit of measure.
    pub unit: String,
    /// Unit price at the time the line entered the session.
    pub unit_price: Price,
    /// Units to issue. Always at least 1.
    pub quantity: u32,
    /// Availability observed when the line was added. Display only;
    /// validation always uses the live cached figure.
    pub available_when_added: u32,
}

/// Read-only snapshot of the pending issue for a presentation shell.
#[derive(Debug, Clone, Serialize)]
pub struct PendingIssue {
    /// Department the issue is for.
    pub department_id: DepartmentId,
    /// Server-side issue ID, once the first line has been accepted.
    pub issue_id: Option<IssueId>,
    /// Lifecycle phase.
    pub phase: SessionPhase,
    /// Line items in insertion order.
    pub items: Vec<LineItem>,
}

/// Coarse machine state, for shells that only need to know what to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerStatus {
    /// No department selected.
    NoDepartment,
    /// Session loading after a department was selected.
    Loading,
    /// Session editable.
    Ready,
    /// Submit in flight.
    Submitting,
}

/// Availability snapshot entry for one product.
#[derive(Debug, Clone)]
pub(crate) struct StockEntry {
    pub name: String,
    pub unit: String,
    pub unit_price: Price,
    pub available: u32,
}

/// The mutable state of one department's pending issue.
#[derive(Debug)]
pub(crate) struct EditingSession {
    pub department_id: DepartmentId,
    pub issue_id: Option<IssueId>,
    pub items: Vec<LineItem>,
    pub stock: HashMap<ProductId, StockEntry>,
    pub phase: SessionPhase,
    pub busy: HashSet<ProductId>,
}

impl EditingSession {
    /// A fresh session awaiting its snapshot fetch.
    pub fn loading(department_id: DepartmentId) -> Self {
        Self {
            department_id,
            issue_id: None,
            items: Vec::new(),
            stock: HashMap::new(),
            phase: SessionPhase::Loading,
            busy: HashSet::new(),
        }
    }

    /// Install the fetched snapshot and make the session editable.
    ///
    /// Lines of an existing open issue are adopted as-is. A line whose
    /// product is missing from the snapshot (deleted since the issue was
    /// started) is kept; quantity edits on it fail validation, but it can
    /// always be removed.
    pub fn install_snapshot(&mut self, products: Vec<Product>, open_issue: Option<Issue>) {
        self.stock = stock_map(products);

        if let Some(issue) = open_issue {
            self.issue_id = Some(issue.id);
            self.items = issue
                .lines
                .into_iter()
                .map(|line| {
                    let available = self
                        .stock
                        .get(&line.product_id)
                        .map_or(0, |entry| entry.available);
                    LineItem {
                        product_id: line.product_id,
                        name: line.product_name,
                        unit: line.unit,
                        unit_price: line.unit_price,
                        quantity: line.quantity,
                        available_when_added: available,
                    }
                })
                .collect();
        }

        self.phase = SessionPhase::Ready;
    }

    /// Reset to an empty editable session after a failed load.
    pub fn clear_to_ready(&mut self) {
        self.issue_id = None;
        self.items.clear();
        self.stock.clear();
        self.busy.clear();
        self.phase = SessionPhase::Ready;
    }

    /// Replace the availability snapshot, keeping line items as they are.
    pub fn replace_stock(&mut self, products: Vec<Product>) {
        self.stock = stock_map(products);
    }

    pub fn line(&self, product_id: ProductId) -> Option<&LineItem> {
        self.items.iter().find(|line| line.product_id == product_id)
    }

    /// Append a new line or merge into an existing one, and take the units
    /// out of the cached availability.
    pub fn record_add(&mut self, product_id: ProductId, quantity: u32, issue_id: IssueId) {
        self.issue_id = Some(issue_id);

        let Some(entry) = self.stock.get_mut(&product_id) else {
            return;
        };

        if let Some(line) = self
            .items
            .iter_mut()
            .find(|line| line.product_id == product_id)
        {
            line.quantity = line.quantity.saturating_add(quantity);
        } else {
            self.items.push(LineItem {
                product_id,
                name: entry.name.clone(),
                unit: entry.unit.clone(),
                unit_price: entry.unit_price,
                quantity,
                available_when_added: entry.available,
            });
        }

        entry.available = entry.available.saturating_sub(quantity);
    }

    /// Set a line's quantity and move the difference against the cached
    /// availability. Calling it again with the previous quantity undoes the
    /// edit exactly.
    pub fn restate_quantity(&mut self, product_id: ProductId, quantity: u32) {
        let Some(line) = self
            .items
            .iter_mut()
            .find(|line| line.product_id == product_id)
        else {
            return;
        };

        let old = line.quantity;
        line.quantity = quantity;

        if let Some(entry) = self.stock.get_mut(&product_id) {
            if quantity > old {
                entry.available = entry.available.saturating_sub(quantity - old);
            } else {
                entry.available = entry.available.saturating_add(old - quantity);
            }
        }
    }

    /// Remove a line and return its units to the cached availability.
    pub fn remove_line(&mut self, product_id: ProductId) {
        if let Some(position) = self
            .items
            .iter()
            .position(|line| line.product_id == product_id)
        {
            let line = self.items.remove(position);
            if let Some(entry) = self.stock.get_mut(&line.product_id) {
                entry.available = entry.available.saturating_add(line.quantity);
            }
        }
    }

    /// Snapshot for the presentation shell.
    pub fn pending_issue(&self) -> PendingIssue {
        PendingIssue {
            department_id: self.department_id,
            issue_id: self.issue_id,
            phase: self.phase,
            items: self.items.clone(),
        }
    }
}

fn stock_map(products: Vec<Product>) -> HashMap<ProductId, StockEntry> {
    products
        .into_iter()
        .map(|product| {
            (
                product.id,
                StockEntry {
                    name: product.name,
                    unit: product.unit,
                    unit_price: product.unit_price,
                    available: product.available,
                },
            )
        })
        .collect()
}

/// A session is either absent or editing one department.
#[derive(Debug)]
pub(crate) enum Session {
    NoDepartment,
    Editing(EditingSession),
}

impl Session {
    pub fn editing(&self) -> Option<&EditingSession> {
        match self {
            Self::Editing(session) => Some(session),
            Self::NoDepartment => None,
        }
    }

    pub fn editing_mut(&mut self) -> Option<&mut EditingSession> {
        match self {
            Self::Editing(session) => Some(session),
            Self::NoDepartment => None,
        }
    }
}

/// The whole ledger state: the session plus the generation counter that
/// fences responses from superseded sessions.
#[derive(Debug)]
pub(crate) struct LedgerState {
    pub generation: u64,
    pub session: Session,
}

impl LedgerState {
    pub const fn new() -> Self {
        Self {
            generation: 0,
            session: Session::NoDepartment,
        }
    }

    /// Install a new session and fence off responses addressed to the old
    /// one. Every session replacement goes through here so the generation
    /// can never fall out of step.
    pub fn replace_session(&mut self, session: Session) {
        self.generation += 1;
        self.session = session;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn product(id: i64, name: &str, available: u32) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_string(),
            description: None,
            unit: "pcs".to_string(),
            unit_price: Price::usd(Decimal::new(250, 2)),
            available,
            category_id: None,
        }
    }

    fn ready_session(products: Vec<Product>) -> EditingSession {
        let mut session = EditingSession::loading(DepartmentId::new(1));
        session.install_snapshot(products, None);
        session
    }

    #[test]
    fn test_install_snapshot_adopts_open_issue_lines() {
        use storekeeper_client::api::IssueLine;
        use storekeeper_core::IssueStatus;

        let mut session = EditingSession::loading(DepartmentId::new(1));
        let issue = Issue {
            id: IssueId::new(40),
            department_id: DepartmentId::new(1),
            status: IssueStatus::Open,
            lines: vec![IssueLine {
                product_id: ProductId::new(7),
                product_name: "Copy paper A4".to_string(),
                unit: "ream".to_string(),
                quantity: 3,
                unit_price: Price::usd(Decimal::new(450, 2)),
            }],
        };

        session.install_snapshot(vec![product(7, "Copy paper A4", 9)], Some(issue));

        assert_eq!(session.phase, SessionPhase::Ready);
        assert_eq!(session.issue_id, Some(IssueId::new(40)));
        assert_eq!(session.items.len(), 1);
        assert_eq!(session.items[0].quantity, 3);
        assert_eq!(session.items[0].available_when_added, 9);
    }

    #[test]
    fn test_record_add_appends_and_decrements() {
        let mut session = ready_session(vec![product(7, "Copy paper A4", 10)]);

        session.record_add(ProductId::new(7), 4, IssueId::new(1));

        assert_eq!(session.items.len(), 1);
        assert_eq!(session.items[0].quantity, 4);
        assert_eq!(session.items[0].available_when_added, 10);
        assert_eq!(session.stock[&ProductId::new(7)].available, 6);
        assert_eq!(session.issue_id, Some(IssueId::new(1)));
    }

    #[test]
    fn test_record_add_merges_existing_line() {
        let mut session = ready_session(vec![product(7, "Copy paper A4", 10)]);

        session.record_add(ProductId::new(7), 4, IssueId::new(1));
        session.record_add(ProductId::new(7), 2, IssueId::new(1));

        assert_eq!(session.items.len(), 1);
        assert_eq!(session.items[0].quantity, 6);
        assert_eq!(session.stock[&ProductId::new(7)].available, 4);
    }

    #[test]
    fn test_restate_quantity_round_trips() {
        let mut session = ready_session(vec![product(7, "Copy paper A4", 10)]);
        session.record_add(ProductId::new(7), 4, IssueId::new(1));

        session.restate_quantity(ProductId::new(7), 5);
        assert_eq!(session.items[0].quantity, 5);
        assert_eq!(session.stock[&ProductId::new(7)].available, 5);

        // Restating the old figure is an exact inverse
        session.restate_quantity(ProductId::new(7), 4);
        assert_eq!(session.items[0].quantity, 4);
        assert_eq!(session.stock[&ProductId::new(7)].available, 6);
    }

    #[test]
    fn test_remove_line_restores_availability() {
        let mut session = ready_session(vec![product(7, "Copy paper A4", 10)]);
        session.record_add(ProductId::new(7), 4, IssueId::new(1));

        session.remove_line(ProductId::new(7));

        assert!(session.items.is_empty());
        assert_eq!(session.stock[&ProductId::new(7)].available, 10);
    }

    #[test]
    fn test_replace_stock_keeps_items() {
        let mut session = ready_session(vec![product(7, "Copy paper A4", 10)]);
        session.record_add(ProductId::new(7), 4, IssueId::new(1));

        session.replace_stock(vec![product(7, "Copy paper A4", 6)]);

        assert_eq!(session.items.len(), 1);
        assert_eq!(session.items[0].quantity, 4);
        assert_eq!(session.stock[&ProductId::new(7)].available, 6);
    }

    #[test]
    fn test_clear_to_ready_empties_everything() {
        let mut session = ready_session(vec![product(7, "Copy paper A4", 10)]);
        session.record_add(ProductId::new(7), 4, IssueId::new(1));
        session.busy.insert(ProductId::new(7));

        session.clear_to_ready();

        assert_eq!(session.phase, SessionPhase::Ready);
        assert!(session.items.is_empty());
        assert!(session.stock.is_empty());
        assert!(session.busy.is_empty());
        assert_eq!(session.issue_id, None);
    }

    #[test]
    fn test_replace_session_bumps_generation() {
        let mut state = LedgerState::new();
        assert_eq!(state.generation, 0);

        state.replace_session(Session::Editing(EditingSession::loading(DepartmentId::new(1))));
        assert_eq!(state.generation, 1);
        assert!(state.session.editing().is_some());

        state.replace_session(Session::NoDepartment);
        assert_eq!(state.generation, 2);
        assert!(state.session.editing().is_none());
    }
}
