//! Application service layer.
//!
//! The two services own all SQL against the shared connection and return
//! typed outcomes. Business-rule failures and not-found conditions are data,
//! not errors; only driver faults travel the error channel, and only for
//! single-statement operations. The MCP handlers collapse every outcome into
//! the single contract string at the edge.

mod contact_service;
mod event_service;

pub use contact_service::ContactService;
pub use event_service::EventService;

use crate::error::ValidationError;

/// Outcome of creating a contact.
#[derive(Debug, PartialEq, Eq)]
pub enum CreateOutcome {
    /// Row inserted; carries the generated id
    Created(i64),
    /// Input rejected before any SQL ran
    Invalid(ValidationError),
}

/// Outcome of a contact search.
#[derive(Debug, PartialEq, Eq)]
pub enum SearchOutcome<T> {
    /// Matching rows; empty means "no match", which the edge renders with
    /// the same sentence as a search that produced no usable terms
    Rows(Vec<T>),
    /// The search field was outside the allow-list
    Invalid(ValidationError),
}

/// Outcome of a partial-field update.
#[derive(Debug, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// At least one row changed
    Updated,
    /// Zero rows affected; deliberately ambiguous between "no such id" and
    /// "values identical to the existing row"
    NotFound,
    /// No fields were supplied
    Invalid(ValidationError),
}

/// Outcome of a single-row delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
}

/// Outcome of the event-create transactional unit.
///
/// There is no error channel: driver faults inside the unit are caught at
/// the transaction boundary, logged, and collapsed into `DatabaseFailed`.
#[derive(Debug, PartialEq, Eq)]
pub enum EventCreateOutcome {
    /// Event row and all link rows committed; carries the generated id
    Created(i64),
    /// Input rejected before the transaction opened
    Invalid(ValidationError),
    /// The unit rolled back on a driver fault
    DatabaseFailed,
}

/// Outcome of the event-delete transactional unit. Same no-escalation
/// contract as [`EventCreateOutcome`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventDeleteOutcome {
    /// Event row and its link rows removed
    Deleted,
    /// No such event; the unit rolled back, including the link deletion
    NotFound,
    /// The unit rolled back on a driver fault
    DatabaseFailed,
}
