//! Event model for the agenda store.

use rusqlite::Row;
use serde::Serialize;

/// An event as returned by list/find operations.
///
/// Same shape rules as [`crate::models::Contact`]: audit timestamps are
/// never serialized, absent description is JSON `null`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Event {
    /// Unique identifier, generated by the database
    pub id: i64,

    /// Heading or title (stored as supplied, untrimmed)
    pub heading: String,

    /// Longer description
    pub description: Option<String>,

    /// Start of the event, UNIX seconds
    pub start_time: i64,

    /// End of the event, UNIX seconds; `end_time == start_time` is a valid
    /// zero-duration event
    pub end_time: i64,
}

impl Event {
    /// Column list matching [`Event::from_row`].
    pub(crate) const COLUMNS: &'static str = "id, heading, description, start_time, end_time";

    /// Map a row selected with [`Event::COLUMNS`].
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Event {
            id: row.get(0)?,
            heading: row.get(1)?,
            description: row.get(2)?,
            start_time: row.get(3)?,
            end_time: row.get(4)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization_shape() {
        let event = Event {
            id: 3,
            heading: "Standup".to_string(),
            description: None,
            start_time: 1_700_000_000,
            end_time: 1_700_003_600,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["heading"], "Standup");
        assert!(json["description"].is_null());
        assert_eq!(json["start_time"], 1_700_000_000_i64);
        assert_eq!(json["end_time"], 1_700_003_600_i64);
    }
}
