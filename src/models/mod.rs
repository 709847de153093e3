use chrono::{DateTime, Utc};

/// A row of the `note` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub content: String,
    /// Stamped on insert and re-stamped on every update.
    pub created_at: DateTime<Utc>,
}
