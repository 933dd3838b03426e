//! SQLite persistence for looked-up quotations.
//!
//! One connection is shared by every request and guarded by a mutex; inserts run on
//! the blocking pool. Each insert is bounded by a caller-supplied deadline: the
//! deadline is checked before the statement starts, a progress handler interrupts
//! the statement if the deadline passes while it runs, and the transaction is rolled
//! back instead of committed if the deadline passed by the time the statement ends.
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use async_trait::async_trait;
use log::{debug, info};
use quotation_common::{QuotationError, QuotationRecord, Result};
use rusqlite::{Connection, ErrorCode, params};
use uuid::Uuid;

const CREATE_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS quotations (
    id TEXT PRIMARY KEY,
    code TEXT,
    codein TEXT,
    name TEXT,
    high TEXT,
    low TEXT,
    varBid TEXT,
    pctChange TEXT,
    bid TEXT,
    ask TEXT,
    timestamp TEXT,
    create_date TEXT
)";

const INSERT_SQL: &str = "INSERT INTO quotations (
    id, code, codein, name, high, low, varBid, pctChange, bid, ask, timestamp, create_date
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)";

/// Virtual machine steps between two deadline checks.
const PROGRESS_STEPS: i32 = 8;

/// Capability to persist a quotation.
#[async_trait]
pub trait QuotationStore: Send + Sync {
    /// Insert `record` as a new row, giving up with `DeadlineExceeded` once `deadline` passes.
    async fn insert(&self, record: &QuotationRecord, deadline: Instant) -> Result<()>;
}

/// `quotations` table in a SQLite database.
pub struct SqliteQuotationStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteQuotationStore {
    /// Open (or create) the database file at `path` and make sure the table exists.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(persistence_error)?;
        let journal_mode: String = conn
            .pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))
            .map_err(persistence_error)?;
        conn.pragma_update(None, "synchronous", "NORMAL")
            .map_err(persistence_error)?;
        info!(
            "Opened quotation database {} (journal mode {})",
            path.display(),
            journal_mode
        );
        Self::with_connection(conn)
    }

    /// Private in-memory database, gone when the store is dropped.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(persistence_error)?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(CREATE_TABLE_SQL)
            .map_err(persistence_error)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Number of stored quotations.
    pub fn count(&self) -> Result<u64> {
        let conn = self.conn.lock()?;
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM quotations", [], |row| row.get(0))
            .map_err(persistence_error)?;
        Ok(count as u64)
    }

    /// Stored bids in insertion order.
    pub fn bids(&self) -> Result<Vec<String>> {
        let conn = self.conn.lock()?;
        let mut stmt = conn
            .prepare("SELECT bid FROM quotations ORDER BY rowid")
            .map_err(persistence_error)?;
        let bids = stmt
            .query_map([], |row| row.get(0))
            .map_err(persistence_error)?
            .collect::<std::result::Result<Vec<String>, _>>()
            .map_err(persistence_error)?;
        Ok(bids)
    }
}

#[async_trait]
impl QuotationStore for SqliteQuotationStore {
    async fn insert(&self, record: &QuotationRecord, deadline: Instant) -> Result<()> {
        if Instant::now() >= deadline {
            return Err(QuotationError::DeadlineExceeded);
        }

        let conn = Arc::clone(&self.conn);
        let row = record.clone();
        let id = tokio::task::spawn_blocking(move || insert_row(&conn, &row, deadline))
            .await
            .map_err(|e| QuotationError::PersistenceFailed(format!("insert task failed: {e}")))??;

        debug!("Stored quotation {} with bid {}", id, record.bid);
        Ok(())
    }
}

/// Runs on the blocking pool. Returns the generated row id.
///
/// The insert runs inside a transaction that only commits if the deadline has not
/// passed once the statement is done, so `DeadlineExceeded` never leaves a row behind.
fn insert_row(
    conn: &Mutex<Connection>,
    record: &QuotationRecord,
    deadline: Instant,
) -> Result<String> {
    let mut conn = conn.lock()?;
    if Instant::now() >= deadline {
        return Err(QuotationError::DeadlineExceeded);
    }

    let id = Uuid::new_v4().to_string();
    match insert_in_transaction(&mut conn, &id, record, deadline) {
        Ok(()) => Ok(id),
        Err(StoreFailure::Expired) => Err(QuotationError::DeadlineExceeded),
        Err(StoreFailure::Sqlite(rusqlite::Error::SqliteFailure(err, _)))
            if err.code == ErrorCode::OperationInterrupted =>
        {
            Err(QuotationError::DeadlineExceeded)
        }
        Err(StoreFailure::Sqlite(e)) => Err(persistence_error(e)),
    }
}

enum StoreFailure {
    Expired,
    Sqlite(rusqlite::Error),
}

impl From<rusqlite::Error> for StoreFailure {
    fn from(err: rusqlite::Error) -> Self {
        StoreFailure::Sqlite(err)
    }
}

fn insert_in_transaction(
    conn: &mut Connection,
    id: &str,
    record: &QuotationRecord,
    deadline: Instant,
) -> std::result::Result<(), StoreFailure> {
    let tx = conn.transaction()?;
    tx.progress_handler(PROGRESS_STEPS, Some(move || Instant::now() >= deadline));
    let inserted = tx.execute(
        INSERT_SQL,
        params![
            id,
            record.code,
            record.codein,
            record.name,
            record.high,
            record.low,
            record.var_bid,
            record.pct_change,
            record.bid,
            record.ask,
            record.timestamp,
            record.create_date_text(),
        ],
    );
    // COMMIT and ROLLBACK must never be interrupted.
    tx.progress_handler(0, None::<fn() -> bool>);
    inserted?;

    if Instant::now() >= deadline {
        tx.rollback()?;
        return Err(StoreFailure::Expired);
    }
    tx.commit()?;
    Ok(())
}

fn persistence_error(err: rusqlite::Error) -> QuotationError {
    QuotationError::PersistenceFailed(err.to_string())
}
