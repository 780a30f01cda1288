use std::sync::{Mutex, Once};
use std::thread::{self, ThreadId};

use log::{Level, LevelFilter, Log, Metadata, Record as LogRecord};
use rusqlite::ffi;

use crate::base::{Database, Params, Record, StoreError, StoreResult};
use crate::data::SqliteDatabase;

struct Fault {
    fragment: String,
    // 1-based occurrence to fail; every occurrence when unset
    nth: Option<usize>,
    seen: usize,
}

/// In-memory store that fails statements containing a configured fragment
/// and remembers every statement it was asked to run.
pub struct FaultyDatabase {
    inner: SqliteDatabase,
    faults: Mutex<Vec<Fault>>,
    statements: Mutex<Vec<String>>,
}

impl FaultyDatabase {
    pub fn new() -> Self {
        Self {
            inner: SqliteDatabase::open_in_memory().expect("in-memory database"),
            faults: Mutex::new(Vec::new()),
            statements: Mutex::new(Vec::new()),
        }
    }

    pub fn fail_on(&self, fragment: &str) {
        self.add_fault(fragment, None);
    }

    /// Fails only the `nth` matching statement run from now on
    pub fn fail_nth(&self, fragment: &str, nth: usize) {
        self.add_fault(fragment, Some(nth));
    }

    fn add_fault(&self, fragment: &str, nth: Option<usize>) {
        self.faults.lock().unwrap().push(Fault {
            fragment: fragment.to_string(),
            nth,
            seen: 0,
        });
    }

    pub fn heal(&self) {
        self.faults.lock().unwrap().clear();
    }

    pub fn statements(&self) -> Vec<String> {
        self.statements.lock().unwrap().clone()
    }

    pub fn ran(&self, fragment: &str) -> usize {
        self.statements().iter().filter(|s| s.contains(fragment)).count()
    }

    fn check(&self, sql: &str) -> StoreResult<()> {
        self.statements.lock().unwrap().push(sql.to_string());

        let mut failed = false;
        for fault in self.faults.lock().unwrap().iter_mut() {
            if sql.contains(fault.fragment.as_str()) {
                fault.seen += 1;
                failed |= fault.nth.map_or(true, |nth| nth == fault.seen);
            }
        }

        if failed {
            return Err(StoreError::Sqlite(rusqlite::Error::SqliteFailure(
                ffi::Error::new(ffi::SQLITE_IOERR),
                Some("injected failure".to_string()),
            )));
        }
        Ok(())
    }
}

impl Database for FaultyDatabase {
    fn select(&self, sql: &str, params: &Params) -> StoreResult<Vec<Record>> {
        self.check(sql)?;
        self.inner.select(sql, params)
    }

    fn exec(&self, sql: &str, params: &Params) -> StoreResult<bool> {
        self.check(sql)?;
        self.inner.exec(sql, params)
    }

    fn last_insert_id(&self) -> StoreResult<i64> {
        self.inner.last_insert_id()
    }
}

/// `log` backend keeping every record together with the thread that emitted it
struct CapturingLogger {
    records: Mutex<Vec<(ThreadId, Level, String)>>,
}

impl Log for CapturingLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &LogRecord) {
        if let Ok(mut records) = self.records.lock() {
            records.push((thread::current().id(), record.level(), record.args().to_string()));
        }
    }

    fn flush(&self) {}
}

static LOGGER: CapturingLogger = CapturingLogger {
    records: Mutex::new(Vec::new()),
};
static INSTALL: Once = Once::new();

/// Routes `log` output of the test binary into memory and forgets what the
/// calling thread logged so far
pub fn capture_logs() {
    INSTALL.call_once(|| {
        log::set_logger(&LOGGER).expect("no other logger in the test binary");
        log::set_max_level(LevelFilter::Trace);
    });
    let current = thread::current().id();
    LOGGER.records.lock().unwrap().retain(|(thread, _, _)| *thread != current);
}

/// Messages logged at `level` by the calling thread
pub fn logged(level: Level) -> Vec<String> {
    let current = thread::current().id();
    LOGGER
        .records
        .lock()
        .unwrap()
        .iter()
        .filter(|(thread, lvl, _)| *thread == current && *lvl == level)
        .map(|(_, _, message)| message.clone())
        .collect()
}
