//! Event service: CRUD, interval-overlap search, and the contact link table.
//!
//! The two multi-statement operations (create with links, delete with link
//! cleanup) run inside scoped transactions. The transaction's drop path
//! rolls back, so every early return, including the logical not-found in
//! delete, leaves the database untouched; commit is the only success exit.

use crate::db::Database;
use crate::error::{StoreResult, ValidationError};
use crate::models::Event;
use crate::services::{EventCreateOutcome, EventDeleteOutcome, UpdateOutcome};
use chrono::Utc;
use rusqlite::{params, ToSql};
use tracing::error;

/// Stateless service over the shared connection. Clones share the handle.
#[derive(Clone)]
pub struct EventService {
    db: Database,
}

impl EventService {
    /// Create a new event service on the shared database handle.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Create an event and, atomically with it, one link row per supplied
    /// contact id (in the supplied order).
    ///
    /// Contact ids are not checked against the contacts table; unknown ids
    /// are inserted as-is. A zero-duration event (`end_time == start_time`)
    /// is valid. On any driver fault the whole unit rolls back and the
    /// detail is logged here, not surfaced.
    pub fn create(
        &self,
        heading: &str,
        start_time: i64,
        end_time: i64,
        description: Option<String>,
        contact_ids: &[i64],
    ) -> EventCreateOutcome {
        if heading.trim().is_empty() {
            return EventCreateOutcome::Invalid(ValidationError::EmptyEventHeading);
        }
        if end_time < start_time {
            return EventCreateOutcome::Invalid(ValidationError::EndBeforeStart);
        }

        match self.insert_with_links(heading, start_time, end_time, description, contact_ids) {
            Ok(id) => EventCreateOutcome::Created(id),
            Err(err) => {
                error!(error = %err, "event create failed, transaction rolled back");
                EventCreateOutcome::DatabaseFailed
            }
        }
    }

    fn insert_with_links(
        &self,
        heading: &str,
        start_time: i64,
        end_time: i64,
        description: Option<String>,
        contact_ids: &[i64],
    ) -> StoreResult<i64> {
        let now = Utc::now().timestamp();
        self.db.with_conn(|conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO events (heading, description, start_time, end_time, created_at, updated_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![heading, description, start_time, end_time, now, now],
            )?;
            let event_id = tx.last_insert_rowid();

            if !contact_ids.is_empty() {
                let mut stmt = tx
                    .prepare("INSERT INTO event_contacts (event_id, contact_id) VALUES (?1, ?2)")?;
                for contact_id in contact_ids {
                    stmt.execute(params![event_id, contact_id])?;
                }
            }

            tx.commit()?;
            Ok(event_id)
        })
    }

    /// List all events ordered by start time ascending.
    pub fn list(&self) -> StoreResult<Vec<Event>> {
        let sql = format!(
            "SELECT {} FROM events ORDER BY start_time ASC",
            Event::COLUMNS
        );
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map([], Event::from_row)?;
            Ok(rows.collect::<Result<Vec<_>, _>>()?)
        })
    }

    /// Find events whose span overlaps the query window, ordered by start
    /// time ascending.
    ///
    /// Overlap is `event.start_time < end_time AND event.end_time >
    /// start_time`, strict on both sides: an event touching the window at
    /// exactly one boundary does not overlap.
    pub fn find(&self, start_time: i64, end_time: i64) -> StoreResult<Vec<Event>> {
        let sql = format!(
            "SELECT {} FROM events WHERE start_time < ?1 AND end_time > ?2 ORDER BY start_time ASC",
            Event::COLUMNS
        );
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params![end_time, start_time], Event::from_row)?;
            Ok(rows.collect::<Result<Vec<_>, _>>()?)
        })
    }

    /// Update the supplied subset of fields on one event.
    ///
    /// The start/end ordering rule is enforced at creation only; a partial
    /// update can push start past a previously stored end.
    pub fn update(
        &self,
        id: i64,
        heading: Option<String>,
        start_time: Option<i64>,
        end_time: Option<i64>,
        description: Option<String>,
    ) -> StoreResult<UpdateOutcome> {
        let now = Utc::now().timestamp();

        let mut assignments: Vec<&'static str> = Vec::new();
        let mut values: Vec<&dyn ToSql> = Vec::new();
        if let Some(ref heading) = heading {
            assignments.push("heading = ?");
            values.push(heading);
        }
        if let Some(ref start_time) = start_time {
            assignments.push("start_time = ?");
            values.push(start_time);
        }
        if let Some(ref end_time) = end_time {
            assignments.push("end_time = ?");
            values.push(end_time);
        }
        if let Some(ref description) = description {
            assignments.push("description = ?");
            values.push(description);
        }

        if assignments.is_empty() {
            return Ok(UpdateOutcome::Invalid(ValidationError::NoUpdateFields));
        }

        assignments.push("updated_at = ?");
        values.push(&now);
        values.push(&id);

        let sql = format!("UPDATE events SET {} WHERE id = ?", assignments.join(", "));
        let affected = self
            .db
            .with_conn(|conn| conn.execute(&sql, values.as_slice()))?;

        Ok(if affected > 0 {
            UpdateOutcome::Updated
        } else {
            UpdateOutcome::NotFound
        })
    }

    /// Delete an event and all its link rows in one transactional unit.
    ///
    /// The link rows go first; if the event row then turns out not to exist
    /// the unit rolls back, restoring any link rows the first statement
    /// removed. Driver faults roll back the same way and are logged here.
    pub fn delete(&self, id: i64) -> EventDeleteOutcome {
        match self.delete_with_links(id) {
            Ok(true) => EventDeleteOutcome::Deleted,
            Ok(false) => EventDeleteOutcome::NotFound,
            Err(err) => {
                error!(error = %err, "event delete failed, transaction rolled back");
                EventDeleteOutcome::DatabaseFailed
            }
        }
    }

    fn delete_with_links(&self, id: i64) -> StoreResult<bool> {
        self.db.with_conn(|conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "DELETE FROM event_contacts WHERE event_id = ?1",
                params![id],
            )?;
            let affected = tx.execute("DELETE FROM events WHERE id = ?1", params![id])?;
            if affected == 0 {
                // Dropping the transaction rolls the link deletion back too.
                return Ok(false);
            }
            tx.commit()?;
            Ok(true)
        })
    }
}
