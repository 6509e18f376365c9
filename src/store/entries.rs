//! Daily entry queries.

use chrono::{NaiveDate, NaiveDateTime, Utc};

use crate::error::{LedgerError, LedgerResult};
use crate::models::{DailyEntry, EntryFields, EntryWithWorker, InvoicePeriod};

use super::Database;

const ENTRY_COLUMNS: &str = "e.id, e.user_id, e.work_date, e.packages, e.notes, e.admin_comment, \
                             e.created_at, e.updated_at";

#[derive(Debug, sqlx::FromRow)]
struct EntryRow {
    id: i64,
    user_id: i64,
    work_date: NaiveDate,
    packages: i64,
    notes: String,
    admin_comment: String,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

#[derive(Debug, sqlx::FromRow)]
struct EntryWithWorkerRow {
    #[sqlx(flatten)]
    entry: EntryRow,
    worker_name: String,
}

impl TryFrom<EntryRow> for DailyEntry {
    type Error = LedgerError;

    fn try_from(row: EntryRow) -> Result<Self, Self::Error> {
        let packages = u32::try_from(row.packages).map_err(|_| LedgerError::CorruptRecord {
            field: "entries.packages".to_string(),
            message: format!("{} is out of range", row.packages),
        })?;

        Ok(DailyEntry {
            id: row.id,
            user_id: row.user_id,
            work_date: row.work_date,
            packages,
            notes: row.notes,
            admin_comment: row.admin_comment,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

impl Database {
    /// Records a new entry owned by `user_id`.
    pub async fn create_entry(&self, user_id: i64, fields: &EntryFields) -> LedgerResult<DailyEntry> {
        let stamp = now();
        let result = sqlx::query(
            "INSERT INTO entries (user_id, work_date, packages, notes, admin_comment, created_at, updated_at) \
             VALUES (?, ?, ?, ?, '', ?, ?)",
        )
        .bind(user_id)
        .bind(fields.work_date)
        .bind(i64::from(fields.packages))
        .bind(&fields.notes)
        .bind(stamp)
        .bind(stamp)
        .execute(self.pool())
        .await?;

        self.get_entry(result.last_insert_rowid()).await
    }

    /// Looks up an entry by id.
    pub async fn find_entry(&self, id: i64) -> LedgerResult<Option<DailyEntry>> {
        let row = sqlx::query_as::<_, EntryRow>(&format!(
            "SELECT {ENTRY_COLUMNS} FROM entries e WHERE e.id = ?"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        row.map(DailyEntry::try_from).transpose()
    }

    /// Like [`Database::find_entry`], but a missing entry is an error.
    pub async fn get_entry(&self, id: i64) -> LedgerResult<DailyEntry> {
        self.find_entry(id)
            .await?
            .ok_or(LedgerError::NotFound { resource: "Entry", id })
    }

    /// Overwrites the worker-editable fields of an entry.
    ///
    /// Last write wins; `updated_at` is refreshed.
    pub async fn update_entry(&self, id: i64, fields: &EntryFields) -> LedgerResult<DailyEntry> {
        let result = sqlx::query(
            "UPDATE entries SET work_date = ?, packages = ?, notes = ?, updated_at = ? WHERE id = ?",
        )
        .bind(fields.work_date)
        .bind(i64::from(fields.packages))
        .bind(&fields.notes)
        .bind(now())
        .bind(id)
        .execute(self.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(LedgerError::NotFound { resource: "Entry", id });
        }
        self.get_entry(id).await
    }

    /// Sets the admin comment on an entry.
    pub async fn set_admin_comment(&self, id: i64, comment: &str) -> LedgerResult<DailyEntry> {
        let result = sqlx::query("UPDATE entries SET admin_comment = ?, updated_at = ? WHERE id = ?")
            .bind(comment)
            .bind(now())
            .bind(id)
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(LedgerError::NotFound { resource: "Entry", id });
        }
        self.get_entry(id).await
    }

    /// Lists a worker's entries, newest work date first.
    pub async fn entries_for_user(&self, user_id: i64) -> LedgerResult<Vec<DailyEntry>> {
        let rows = sqlx::query_as::<_, EntryRow>(&format!(
            "SELECT {ENTRY_COLUMNS} FROM entries e WHERE e.user_id = ? \
             ORDER BY e.work_date DESC, e.id DESC"
        ))
        .bind(user_id)
        .fetch_all(self.pool())
        .await?;

        rows.into_iter().map(DailyEntry::try_from).collect()
    }

    /// Lists the most recent entries across all workers, with worker names.
    pub async fn recent_entries(&self, limit: u32) -> LedgerResult<Vec<EntryWithWorker>> {
        let rows = sqlx::query_as::<_, EntryWithWorkerRow>(&format!(
            "SELECT {ENTRY_COLUMNS}, u.name AS worker_name \
             FROM entries e JOIN users u ON u.id = e.user_id \
             ORDER BY e.work_date DESC, e.id DESC LIMIT ?"
        ))
        .bind(i64::from(limit))
        .fetch_all(self.pool())
        .await?;

        rows.into_iter()
            .map(|row| {
                Ok(EntryWithWorker {
                    entry: DailyEntry::try_from(row.entry)?,
                    worker_name: row.worker_name,
                })
            })
            .collect()
    }

    /// Sums a worker's package counts over an inclusive period.
    ///
    /// Every entry counts, including several on the same day.
    pub async fn package_sum(&self, user_id: i64, period: &InvoicePeriod) -> LedgerResult<u64> {
        let sum: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(packages), 0) FROM entries \
             WHERE user_id = ? AND work_date >= ? AND work_date <= ?",
        )
        .bind(user_id)
        .bind(period.start)
        .bind(period.end)
        .fetch_one(self.pool())
        .await?;

        u64::try_from(sum).map_err(|_| LedgerError::CorruptRecord {
            field: "entries.packages".to_string(),
            message: format!("negative package sum {}", sum),
        })
    }

    /// Returns the work date of every entry a worker has in the period.
    pub async fn work_dates(&self, user_id: i64, period: &InvoicePeriod) -> LedgerResult<Vec<NaiveDate>> {
        let dates: Vec<NaiveDate> = sqlx::query_scalar(
            "SELECT work_date FROM entries \
             WHERE user_id = ? AND work_date >= ? AND work_date <= ? ORDER BY work_date",
        )
        .bind(user_id)
        .bind(period.start)
        .bind(period.end)
        .fetch_all(self.pool())
        .await?;

        Ok(dates)
    }
}
