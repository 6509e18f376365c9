//! Daily entry models.
//!
//! A [`DailyEntry`] records how many packages one worker delivered on one
//! work date. Entries are never deleted; edits overwrite in place.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A worker's package count for one work date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyEntry {
    /// Database identifier.
    pub id: i64,
    /// The worker this entry belongs to.
    pub user_id: i64,
    /// The day the packages were delivered.
    pub work_date: NaiveDate,
    /// Number of packages delivered.
    pub packages: u32,
    /// Free-text note from the worker.
    pub notes: String,
    /// Comment visible to the worker but writable only by an admin.
    pub admin_comment: String,
    /// When the entry was first recorded (UTC).
    pub created_at: NaiveDateTime,
    /// When the entry was last edited (UTC).
    pub updated_at: NaiveDateTime,
}

/// An entry joined with its worker's name, for the admin dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryWithWorker {
    /// The entry itself.
    #[serde(flatten)]
    pub entry: DailyEntry,
    /// The owning worker's display name.
    pub worker_name: String,
}

/// Worker-editable fields of an entry.
///
/// Used both to create an entry and to overwrite an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryFields {
    /// The day the packages were delivered.
    pub work_date: NaiveDate,
    /// Number of packages delivered.
    pub packages: u32,
    /// Free-text note.
    pub notes: String,
}
