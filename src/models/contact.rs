//! Contact model for the agenda store.

use rusqlite::Row;
use serde::Serialize;

/// A contact as returned by list/find operations.
///
/// This is the caller-facing projection: the audit timestamps stay in the
/// database and are never serialized. Absent optional fields serialize as
/// JSON `null`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Contact {
    /// Unique identifier, generated by the database
    pub id: i64,

    /// Full name (stored trimmed)
    pub name: String,

    /// Email address
    pub email: Option<String>,

    /// Phone number
    pub phone: Option<String>,

    /// Free-form notes
    pub notes: Option<String>,
}

impl Contact {
    /// Column list matching [`Contact::from_row`].
    pub(crate) const COLUMNS: &'static str = "id, name, email, phone, notes";

    /// Map a row selected with [`Contact::COLUMNS`].
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Contact {
            id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            phone: row.get(3)?,
            notes: row.get(4)?,
        })
    }
}

/// The closed set of contact columns a caller may reference by name.
///
/// Caller text is parsed into this enum and only the fixed identifiers from
/// [`ContactField::column`] are ever interpolated into SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactField {
    Id,
    Name,
    Email,
    Phone,
    CreatedAt,
    UpdatedAt,
}

impl ContactField {
    /// Parse a caller-supplied ORDER BY column (case-insensitive).
    pub fn parse_order_by(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "id" => Some(ContactField::Id),
            "name" => Some(ContactField::Name),
            "email" => Some(ContactField::Email),
            "phone" => Some(ContactField::Phone),
            "created_at" => Some(ContactField::CreatedAt),
            "updated_at" => Some(ContactField::UpdatedAt),
            _ => None,
        }
    }

    /// Parse a caller-supplied search field (case-insensitive).
    ///
    /// The search allow-list is narrower than the ordering one: the audit
    /// timestamps are not searchable.
    pub fn parse_search(s: &str) -> Option<Self> {
        match Self::parse_order_by(s)? {
            f @ (ContactField::Id | ContactField::Name | ContactField::Email
            | ContactField::Phone) => Some(f),
            _ => None,
        }
    }

    /// The fixed column identifier for this field.
    pub fn column(self) -> &'static str {
        match self {
            ContactField::Id => "id",
            ContactField::Name => "name",
            ContactField::Email => "email",
            ContactField::Phone => "phone",
            ContactField::CreatedAt => "created_at",
            ContactField::UpdatedAt => "updated_at",
        }
    }
}
