use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use log::{debug, info};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Connection, OpenFlags, ToSql};

use crate::base::{Database, Params, Record, StoreError, StoreResult, Value};

/// Table definitions applied to every new connection
pub const SCHEMA: &str = include_str!("../../data/schema.sql");

// The gateway holds one connection for its lifetime, so the pool never grows past it
fn build_pool(manager: SqliteConnectionManager) -> Result<Arc<Pool<SqliteConnectionManager>>> {
    let manager = manager.with_init(|conn| conn.execute_batch(SCHEMA));
    let pool = Pool::builder()
        .max_size(1)
        .build(manager)
        .context("Failed to build connection pool")?;
    Ok(Arc::new(pool))
}

pub fn init_database(db_path: &Path) -> Result<Arc<Pool<SqliteConnectionManager>>> {
    info!("Opening database at {}", db_path.display());
    let manager = SqliteConnectionManager::file(db_path)
        .with_flags(OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE);
    build_pool(manager)
}

/// Pool over a private in-memory database
pub fn in_memory_pool() -> Result<Arc<Pool<SqliteConnectionManager>>> {
    build_pool(SqliteConnectionManager::memory())
}

/// SQLite-backed [`Database`] holding one checked-out connection.
///
/// Keeping a single connection ties `last_insert_id` to the connection that ran
/// the preceding insert.
pub struct SqliteDatabase {
    conn: Mutex<PooledConnection<SqliteConnectionManager>>,
}

impl SqliteDatabase {
    /// Checks a connection out of `pool` for the lifetime of the gateway
    pub fn new(pool: &Pool<SqliteConnectionManager>) -> StoreResult<Self> {
        let conn = pool.get()?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    pub fn open(db_path: &Path) -> Result<Self> {
        let pool = init_database(db_path)?;
        Self::new(&pool).with_context(|| format!("Failed to connect to {}", db_path.display()))
    }

    pub fn open_in_memory() -> Result<Self> {
        let pool = in_memory_pool()?;
        Self::new(&pool).context("Failed to open in-memory database")
    }

    fn with_connection<T>(&self, f: impl FnOnce(&Connection) -> StoreResult<T>) -> StoreResult<T> {
        let conn = self.conn.lock().map_err(|_| StoreError::ConnectionPoisoned)?;
        f(&conn)
    }
}

fn bind(params: &Params) -> Vec<(&str, &dyn ToSql)> {
    params
        .iter()
        .map(|(name, value)| (name, value as &dyn ToSql))
        .collect()
}

impl Database for SqliteDatabase {
    fn select(&self, sql: &str, params: &Params) -> StoreResult<Vec<Record>> {
        debug!("select: {} ({} params)", sql, params.len());
        self.with_connection(|conn| {
            let mut stmt = conn.prepare(sql)?;
            let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

            let bound = bind(params);
            let mut rows = stmt.query(bound.as_slice())?;
            let mut records = Vec::new();
            while let Some(row) = rows.next()? {
                let mut record = Record::new();
                for (idx, name) in columns.iter().enumerate() {
                    record.insert(name, row.get::<_, Value>(idx)?);
                }
                records.push(record);
            }
            Ok(records)
        })
    }

    fn exec(&self, sql: &str, params: &Params) -> StoreResult<bool> {
        debug!("exec: {} ({} params)", sql, params.len());
        self.with_connection(|conn| {
            let bound = bind(params);
            let affected = conn.execute(sql, bound.as_slice())?;
            Ok(affected > 0)
        })
    }

    fn last_insert_id(&self) -> StoreResult<i64> {
        self.with_connection(|conn| Ok(conn.last_insert_rowid()))
    }
}
