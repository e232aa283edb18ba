//! The stock ledger: the pending-issue workflow over a backend.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, instrument, warn};

use storekeeper_client::api::{Issue, Product};
use storekeeper_core::{DepartmentId, IssueId, ProductId, StaffId};

use crate::backend::IssueBackend;
use crate::error::{LedgerError, ValidationError};
use crate::session::{
    EditingSession, LedgerState, LedgerStatus, PendingIssue, Session, SessionPhase,
};

/// Returned by a successful [`StockLedger::submit_issue`].
///
/// Completion durably decrements product stock server-side, so any product
/// views the caller holds should be refreshed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletedIssue {
    /// The issue that was completed.
    pub issue_id: IssueId,
}

/// One optimistic quantity edit and what is needed to settle it.
struct QuantityEdit {
    generation: u64,
    issue_id: IssueId,
    previous: u32,
    next: u32,
}

/// Mediates between a user's intent to move stock to a department and the
/// authoritative backend.
///
/// The ledger keeps one in-memory session per selected department: the
/// pending issue's line items plus a cached availability snapshot the line
/// items are validated against. Obviously invalid edits are rejected before
/// they reach the network; quantity edits are applied optimistically and
/// rolled back exactly when the backend refuses them.
///
/// Cheap to clone; all clones share one session. Operations on different
/// line items may be awaited concurrently. Operations on the *same* line
/// item are serialized: a second mutation while one is awaiting the backend
/// is rejected immediately, never queued, so the server never sees
/// interleaved quantity writes.
///
/// # Department switches and slow responses
///
/// Selecting a department replaces the whole session and bumps a generation
/// counter. Every dispatched request carries the generation current at
/// dispatch time; a response that resolves against a newer generation is
/// reported to its awaiting caller but never applied, so a slow response
/// for one department cannot touch the session of the next.
#[derive(Clone)]
pub struct StockLedger {
    backend: Arc<dyn IssueBackend>,
    issued_by: StaffId,
    state: Arc<Mutex<LedgerState>>,
}

impl StockLedger {
    /// Create a ledger over a backend, issuing stock as the given staff
    /// member.
    #[must_use]
    pub fn new(backend: Arc<dyn IssueBackend>, issued_by: StaffId) -> Self {
        Self {
            backend,
            issued_by,
            state: Arc::new(Mutex::new(LedgerState::new())),
        }
    }

    // State transitions never panic while the lock is held, so a poisoned
    // mutex still holds a structurally sound value.
    fn lock(&self) -> MutexGuard<'_, LedgerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Select the department to issue stock to, or clear the selection.
    ///
    /// The current session is discarded either way; nothing from a previous
    /// department survives. With a department, the availability snapshot and
    /// the department's open issue (if it has one) are fetched and
    /// installed, adopting any existing line items.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Conflict`] or [`LedgerError::Transport`] when
    /// a fetch fails. The department stays selected with an empty session;
    /// selecting it again retries the load.
    #[instrument(skip(self))]
    pub async fn select_department(
        &self,
        department: Option<DepartmentId>,
    ) -> Result<(), LedgerError> {
        let Some(department) = department else {
            self.lock().replace_session(Session::NoDepartment);
            return Ok(());
        };

        let generation = {
            let mut state = self.lock();
            state.replace_session(Session::Editing(EditingSession::loading(department)));
            state.generation
        };

        let loaded = self.load_session(department).await;

        let mut state = self.lock();
        if state.generation != generation {
            debug!(%department, "Discarding session load for a superseded selection");
            return loaded.map(|_| ());
        }
        let Some(session) = state.session.editing_mut() else {
            return loaded.map(|_| ());
        };
        match loaded {
            Ok((products, open_issue)) => {
                session.install_snapshot(products, open_issue);
                Ok(())
            }
            Err(e) => {
                warn!(%department, error = %e, "Failed to load the department session");
                session.clear_to_ready();
                Err(e)
            }
        }
    }

    async fn load_session(
        &self,
        department: DepartmentId,
    ) -> Result<(Vec<Product>, Option<Issue>), LedgerError> {
        let products = self.backend.product_snapshot().await?;
        let open_issue = self.backend.open_issue(department).await?;
        Ok((products, open_issue))
    }

    /// Queue `quantity` units of a product on the department's pending
    /// issue.
    ///
    /// The backend is asked first; only an accepted line enters the session,
    /// and its units are taken out of the cached availability. Adding a
    /// product that is already on the issue merges into the existing line.
    ///
    /// # Errors
    ///
    /// Rejected locally (no request sent) when no department is selected,
    /// the session is still loading or submitting, the product already has
    /// an operation in flight, the quantity is zero, the product is not in
    /// the availability snapshot, or the quantity exceeds what is available.
    /// Backend refusals surface as [`LedgerError::Conflict`] with the
    /// backend's message verbatim; connectivity failures as
    /// [`LedgerError::Transport`].
    #[instrument(skip(self), fields(product_id = %product_id, quantity))]
    pub async fn add_line_item(
        &self,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<(), LedgerError> {
        let (generation, department) = {
            let mut state = self.lock();
            let generation = state.generation;
            let session = ready_session(&mut state)?;
            if session.busy.contains(&product_id) {
                return Err(ValidationError::OperationInFlight(product_id).into());
            }
            if quantity == 0 {
                return Err(ValidationError::ZeroQuantity.into());
            }
            let Some(entry) = session.stock.get(&product_id) else {
                return Err(ValidationError::UnknownProduct(product_id).into());
            };
            if quantity > entry.available {
                return Err(ValidationError::InsufficientStock {
                    requested: quantity,
                    available: entry.available,
                }
                .into());
            }
            session.busy.insert(product_id);
            (generation, session.department_id)
        };

        let outcome = self
            .backend
            .add_line(department, self.issued_by, product_id, quantity)
            .await;

        let mut state = self.lock();
        if state.generation != generation {
            debug!(%product_id, "Discarding line add for a superseded session");
            return outcome.map(|_| ()).map_err(Into::into);
        }
        let Some(session) = state.session.editing_mut() else {
            return outcome.map(|_| ()).map_err(Into::into);
        };
        session.busy.remove(&product_id);
        match outcome {
            Ok(issue_id) => {
                session.record_add(product_id, quantity, issue_id);
                Ok(())
            }
            Err(e) => {
                warn!(%product_id, error = %e, "Backend refused the new line item");
                Err(e.into())
            }
        }
    }

    /// Raise a line item's quantity by one.
    ///
    /// The line's quantity and the cached availability change optimistically
    /// before the backend call; if the backend refuses, both are rolled
    /// back exactly and the error is returned.
    ///
    /// Two floors guard this operation: the line must already hold at least
    /// two units, and at least two units must remain available. Both are
    /// longstanding workflow rules - confirm with the system owner before
    /// relaxing them. A single-unit line is adjusted by removing it and
    /// re-adding at the larger quantity.
    ///
    /// # Errors
    ///
    /// Rejected locally when the session is not editable, the line does not
    /// exist, the product has an operation in flight, or either floor
    /// holds. Backend refusals surface as [`LedgerError::Conflict`] or
    /// [`LedgerError::Transport`] after the rollback.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn increment_quantity(&self, product_id: ProductId) -> Result<(), LedgerError> {
        let edit = {
            let mut state = self.lock();
            let generation = state.generation;
            let session = ready_session(&mut state)?;
            if session.busy.contains(&product_id) {
                return Err(ValidationError::OperationInFlight(product_id).into());
            }
            let Some(line) = session.line(product_id) else {
                return Err(ValidationError::LineNotFound(product_id).into());
            };
            let quantity = line.quantity;
            if quantity < 2 {
                return Err(ValidationError::IncrementFloor.into());
            }
            let Some(entry) = session.stock.get(&product_id) else {
                return Err(ValidationError::UnknownProduct(product_id).into());
            };
            if entry.available < 2 {
                return Err(ValidationError::AvailabilityFloor {
                    available: entry.available,
                }
                .into());
            }
            let issue_id = session.issue_id.ok_or(ValidationError::IssueNotStarted)?;
            session.busy.insert(product_id);
            session.restate_quantity(product_id, quantity + 1);
            QuantityEdit {
                generation,
                issue_id,
                previous: quantity,
                next: quantity + 1,
            }
        };

        self.push_quantity(product_id, edit).await
    }

    /// Lower a line item's quantity by one.
    ///
    /// The line's quantity and the cached availability change optimistically
    /// before the backend call; if the backend refuses, both are rolled
    /// back exactly and the error is returned.
    ///
    /// A quantity of one is the floor: decrementing is rejected there, and
    /// the line is taken off the issue with
    /// [`remove_line_item`](Self::remove_line_item) instead.
    ///
    /// # Errors
    ///
    /// Rejected locally when the session is not editable, the line does not
    /// exist, the product has an operation in flight, the quantity is
    /// already one, or the product is missing from the availability
    /// snapshot. Backend refusals surface as [`LedgerError::Conflict`] or
    /// [`LedgerError::Transport`] after the rollback.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn decrement_quantity(&self, product_id: ProductId) -> Result<(), LedgerError> {
        let edit = {
            let mut state = self.lock();
            let generation = state.generation;
            let session = ready_session(&mut state)?;
            if session.busy.contains(&product_id) {
                return Err(ValidationError::OperationInFlight(product_id).into());
            }
            let Some(line) = session.line(product_id) else {
                return Err(ValidationError::LineNotFound(product_id).into());
            };
            let quantity = line.quantity;
            if quantity <= 1 {
                return Err(ValidationError::QuantityFloor.into());
            }
            if !session.stock.contains_key(&product_id) {
                return Err(ValidationError::UnknownProduct(product_id).into());
            }
            let issue_id = session.issue_id.ok_or(ValidationError::IssueNotStarted)?;
            session.busy.insert(product_id);
            session.restate_quantity(product_id, quantity - 1);
            QuantityEdit {
                generation,
                issue_id,
                previous: quantity,
                next: quantity - 1,
            }
        };

        self.push_quantity(product_id, edit).await
    }

    /// Send the new absolute quantity to the backend and settle the
    /// optimistic edit: keep it on success, invert it exactly on failure.
    async fn push_quantity(
        &self,
        product_id: ProductId,
        edit: QuantityEdit,
    ) -> Result<(), LedgerError> {
        let outcome = self
            .backend
            .set_line_quantity(edit.issue_id, product_id, edit.next)
            .await;

        let mut state = self.lock();
        if state.generation != edit.generation {
            debug!(%product_id, "Discarding quantity update for a superseded session");
            return outcome.map_err(Into::into);
        }
        let Some(session) = state.session.editing_mut() else {
            return outcome.map_err(Into::into);
        };
        session.busy.remove(&product_id);
        match outcome {
            Ok(()) => Ok(()),
            Err(e) => {
                warn!(%product_id, error = %e, "Backend refused the quantity update, rolling back");
                session.restate_quantity(product_id, edit.previous);
                Err(e.into())
            }
        }
    }

    /// Take a line item off the pending issue.
    ///
    /// The backend delete goes first; the line leaves the session and its
    /// units return to the cached availability only once the backend has
    /// agreed. On failure the line stays as it was.
    ///
    /// # Errors
    ///
    /// Rejected locally when the session is not editable, the line does not
    /// exist, or the product has an operation in flight. Backend refusals
    /// surface as [`LedgerError::Conflict`] or [`LedgerError::Transport`].
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn remove_line_item(&self, product_id: ProductId) -> Result<(), LedgerError> {
        let (generation, issue_id) = {
            let mut state = self.lock();
            let generation = state.generation;
            let session = ready_session(&mut state)?;
            if session.busy.contains(&product_id) {
                return Err(ValidationError::OperationInFlight(product_id).into());
            }
            if session.line(product_id).is_none() {
                return Err(ValidationError::LineNotFound(product_id).into());
            }
            let issue_id = session.issue_id.ok_or(ValidationError::IssueNotStarted)?;
            session.busy.insert(product_id);
            (generation, issue_id)
        };

        let outcome = self.backend.remove_line(issue_id, product_id).await;

        let mut state = self.lock();
        if state.generation != generation {
            debug!(%product_id, "Discarding line removal for a superseded session");
            return outcome.map_err(Into::into);
        }
        let Some(session) = state.session.editing_mut() else {
            return outcome.map_err(Into::into);
        };
        session.busy.remove(&product_id);
        match outcome {
            Ok(()) => {
                session.remove_line(product_id);
                Ok(())
            }
            Err(e) => {
                warn!(%product_id, error = %e, "Backend refused the line removal, keeping the line");
                Err(e.into())
            }
        }
    }

    /// Complete the pending issue, making the stock movement durable.
    ///
    /// On success the session clears to [`LedgerStatus::NoDepartment`] and
    /// the returned [`CompletedIssue`] reminds the caller to refresh its
    /// product views, since availability just changed server-side. On
    /// failure the session is left intact and back in its editable phase,
    /// so calling again retries the same issue.
    ///
    /// # Errors
    ///
    /// Rejected locally when the session is not editable, any line
    /// operation is still awaiting the backend, the issue has no line
    /// items, or no issue exists on the server yet. Backend refusals
    /// surface as [`LedgerError::Conflict`] or [`LedgerError::Transport`].
    #[instrument(skip(self))]
    pub async fn submit_issue(&self) -> Result<CompletedIssue, LedgerError> {
        let (generation, issue_id) = {
            let mut state = self.lock();
            let generation = state.generation;
            let session = ready_session(&mut state)?;
            if !session.busy.is_empty() {
                return Err(ValidationError::EditsInFlight.into());
            }
            if session.items.is_empty() {
                return Err(ValidationError::EmptyIssue.into());
            }
            let issue_id = session.issue_id.ok_or(ValidationError::IssueNotStarted)?;
            session.phase = SessionPhase::Submitting;
            (generation, issue_id)
        };

        let outcome = self.backend.complete_issue(issue_id).await;

        let mut state = self.lock();
        if state.generation != generation {
            debug!(%issue_id, "Discarding submit result for a superseded session");
            return outcome
                .map(|()| CompletedIssue { issue_id })
                .map_err(Into::into);
        }
        match outcome {
            Ok(()) => {
                state.replace_session(Session::NoDepartment);
                Ok(CompletedIssue { issue_id })
            }
            Err(e) => {
                warn!(%issue_id, error = %e, "Backend refused to complete the issue");
                if let Some(session) = state.session.editing_mut() {
                    session.phase = SessionPhase::Ready;
                }
                Err(e.into())
            }
        }
    }

    /// Re-fetch the availability snapshot for the current session.
    ///
    /// Line items are kept as they are; only the availability figures and
    /// product metadata are replaced. This is the recommended follow-up to
    /// a [`LedgerError::Conflict`], which means another client moved stock
    /// under this session's feet.
    ///
    /// Refused while line operations or a submit are awaiting the backend:
    /// swapping the snapshot under an unresolved optimistic edit would
    /// break its exact rollback.
    ///
    /// # Errors
    ///
    /// Rejected locally when no department is selected, the session is
    /// loading or submitting, or edits are in flight. Fetch failures
    /// surface as [`LedgerError::Conflict`] or [`LedgerError::Transport`]
    /// with the previous snapshot left in place.
    #[instrument(skip(self))]
    pub async fn refresh_products(&self) -> Result<(), LedgerError> {
        let generation = {
            let mut state = self.lock();
            let generation = state.generation;
            let session = ready_session(&mut state)?;
            if !session.busy.is_empty() {
                return Err(ValidationError::EditsInFlight.into());
            }
            session.phase = SessionPhase::Loading;
            generation
        };

        let outcome = self.backend.product_snapshot().await;

        let mut state = self.lock();
        if state.generation != generation {
            debug!("Discarding product refresh for a superseded session");
            return outcome.map(|_| ()).map_err(Into::into);
        }
        let Some(session) = state.session.editing_mut() else {
            return outcome.map(|_| ()).map_err(Into::into);
        };
        session.phase = SessionPhase::Ready;
        match outcome {
            Ok(products) => {
                session.replace_stock(products);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Failed to refresh the availability snapshot");
                Err(e.into())
            }
        }
    }

    /// Snapshot of the pending issue, or `None` when no department is
    /// selected.
    #[must_use]
    pub fn pending_issue(&self) -> Option<PendingIssue> {
        self.lock()
            .session
            .editing()
            .map(EditingSession::pending_issue)
    }

    /// Cached available quantity for a product in the current session.
    ///
    /// `None` when no department is selected or the product is not in the
    /// snapshot. The figure already accounts for units held by this
    /// session's pending line items.
    #[must_use]
    pub fn available(&self, product_id: ProductId) -> Option<u32> {
        self.lock()
            .session
            .editing()
            .and_then(|session| session.stock.get(&product_id))
            .map(|entry| entry.available)
    }

    /// Coarse machine state, for shells deciding what to render.
    #[must_use]
    pub fn status(&self) -> LedgerStatus {
        match &self.lock().session {
            Session::NoDepartment => LedgerStatus::NoDepartment,
            Session::Editing(session) => match session.phase {
                SessionPhase::Loading => LedgerStatus::Loading,
                SessionPhase::Ready => LedgerStatus::Ready,
                SessionPhase::Submitting => LedgerStatus::Submitting,
            },
        }
    }
}

/// The session, provided it accepts operations right now.
fn ready_session(state: &mut LedgerState) -> Result<&mut EditingSession, ValidationError> {
    let Some(session) = state.session.editing_mut() else {
        return Err(ValidationError::NoDepartmentSelected);
    };
    match session.phase {
        SessionPhase::Loading => Err(ValidationError::SessionLoading),
        SessionPhase::Submitting => Err(ValidationError::SubmitInFlight),
        SessionPhase::Ready => Ok(session),
    }
}
