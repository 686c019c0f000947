//! Contact service: CRUD and flexible search over the `contacts` table.

use crate::db::{Database, SortOrder};
use crate::error::{StoreResult, ValidationError};
use crate::models::{Contact, ContactField};
use crate::services::{CreateOutcome, DeleteOutcome, SearchOutcome, UpdateOutcome};
use chrono::Utc;
use rusqlite::{params, ToSql};

/// Stateless service over the shared connection. Clones share the handle.
#[derive(Clone)]
pub struct ContactService {
    db: Database,
}

impl ContactService {
    /// Create a new contact service on the shared database handle.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Insert a new contact. The name is stored trimmed; both audit
    /// timestamps are set to now. No duplicate detection.
    pub fn create(
        &self,
        name: &str,
        email: Option<String>,
        phone: Option<String>,
        notes: Option<String>,
    ) -> StoreResult<CreateOutcome> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(CreateOutcome::Invalid(ValidationError::EmptyContactName));
        }

        let now = Utc::now().timestamp();
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO contacts (name, email, phone, notes, created_at, updated_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![name, email, phone, notes, now, now],
            )?;
            Ok(CreateOutcome::Created(conn.last_insert_rowid()))
        })
    }

    /// List all contacts ordered by a caller-chosen column and direction.
    ///
    /// An unrecognized column silently falls back to `name`; the direction
    /// normalizes through [`SortOrder::parse`]. Only the fixed identifiers
    /// from the parsed enums reach the ORDER BY clause.
    pub fn list(&self, order_by: &str, order: &str) -> StoreResult<Vec<Contact>> {
        let column = ContactField::parse_order_by(order_by).unwrap_or(ContactField::Name);
        let direction = SortOrder::parse(order);

        let sql = format!(
            "SELECT {} FROM contacts ORDER BY {} {}",
            Contact::COLUMNS,
            column.column(),
            direction.as_sql()
        );
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map([], Contact::from_row)?;
            Ok(rows.collect::<Result<Vec<_>, _>>()?)
        })
    }

    /// Find contacts by one of the allow-listed fields.
    ///
    /// A `name` search splits the value on whitespace and requires every
    /// term to match as a substring (`LIKE '%term%'`, AND-joined), so
    /// "first last" or "initial last" match one name column in any order.
    /// Every other field is an exact-equality match on the bound value.
    pub fn find(&self, field: &str, value: &str) -> StoreResult<SearchOutcome<Contact>> {
        let Some(field) = ContactField::parse_search(field) else {
            return Ok(SearchOutcome::Invalid(ValidationError::InvalidSearchField));
        };

        if field == ContactField::Name {
            let patterns: Vec<String> = value
                .split_whitespace()
                .map(|term| format!("%{term}%"))
                .collect();
            if patterns.is_empty() {
                // No usable terms; observably identical to a zero-row search.
                return Ok(SearchOutcome::Rows(Vec::new()));
            }

            let clause = vec!["name LIKE ?"; patterns.len()].join(" AND ");
            let sql = format!("SELECT {} FROM contacts WHERE {}", Contact::COLUMNS, clause);
            let values: Vec<&dyn ToSql> = patterns.iter().map(|p| p as &dyn ToSql).collect();

            self.db.with_conn(|conn| {
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt.query_map(values.as_slice(), Contact::from_row)?;
                Ok(SearchOutcome::Rows(rows.collect::<Result<Vec<_>, _>>()?))
            })
        } else {
            // The value binds as text; INTEGER affinity on id makes "42"
            // match 42, so one code path covers all exact-match fields.
            let sql = format!(
                "SELECT {} FROM contacts WHERE {} = ?1",
                Contact::COLUMNS,
                field.column()
            );
            self.db.with_conn(|conn| {
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt.query_map(params![value], Contact::from_row)?;
                Ok(SearchOutcome::Rows(rows.collect::<Result<Vec<_>, _>>()?))
            })
        }
    }

    /// Update the supplied subset of fields on one contact.
    ///
    /// `updated_at` is always set when any field is. Name is not re-validated
    /// here; only creation enforces the non-empty rule.
    pub fn update(
        &self,
        id: i64,
        name: Option<String>,
        email: Option<String>,
        phone: Option<String>,
        notes: Option<String>,
    ) -> StoreResult<UpdateOutcome> {
        let now = Utc::now().timestamp();

        let mut assignments: Vec<&'static str> = Vec::new();
        let mut values: Vec<&dyn ToSql> = Vec::new();
        if let Some(ref name) = name {
            assignments.push("name = ?");
            values.push(name);
        }
        if let Some(ref email) = email {
            assignments.push("email = ?");
            values.push(email);
        }
        if let Some(ref phone) = phone {
            assignments.push("phone = ?");
            values.push(phone);
        }
        if let Some(ref notes) = notes {
            assignments.push("notes = ?");
            values.push(notes);
        }

        if assignments.is_empty() {
            return Ok(UpdateOutcome::Invalid(ValidationError::NoUpdateFields));
        }

        assignments.push("updated_at = ?");
        values.push(&now);
        values.push(&id);

        let sql = format!(
            "UPDATE contacts SET {} WHERE id = ?",
            assignments.join(", ")
        );
        let affected = self
            .db
            .with_conn(|conn| conn.execute(&sql, values.as_slice()))?;

        Ok(if affected > 0 {
            UpdateOutcome::Updated
        } else {
            UpdateOutcome::NotFound
        })
    }

    /// Delete one contact.
    ///
    /// Link rows in `event_contacts` are left in place: events may keep
    /// referencing a gone contact id.
    pub fn delete(&self, id: i64) -> StoreResult<DeleteOutcome> {
        let affected = self
            .db
            .with_conn(|conn| conn.execute("DELETE FROM contacts WHERE id = ?1", params![id]))?;

        Ok(if affected > 0 {
            DeleteOutcome::Deleted
        } else {
            DeleteOutcome::NotFound
        })
    }
}
