//! SQLite storage backend.
//!
//! One [`SqliteStore`] owns one connection. Several stores may open the same
//! database file; SQLite's file lock serialises their units of work and the
//! busy timeout bounds how long a writer waits for it. A deadline, when set,
//! bounds how long a unit of work may run once it holds the lock.

mod queries;
mod row;
mod schema;
mod unit_of_work;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use rusqlite::{Connection, InterruptHandle, TransactionBehavior};
use tracing::{debug, debug_span};

use crate::compose;
use crate::error::{GrocerError, Result};
use crate::storage::traits::{GroceryStore, Querier};
use crate::storage::types::{
    NewRecipe, NewSchedule, Recipe, RecipeComposition, Schedule, ScheduleComposition,
    UpdateRecipe,
};

pub use queries::Queries;
use schema::SCHEMA;
use unit_of_work::settle;

/// Connection settings for [`SqliteStore`].
#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// How long a unit of work waits for another writer's lock.
    pub busy_timeout: Duration,
    /// Default run-time limit for each unit of work. `None` means unbounded.
    pub deadline: Option<Duration>,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            busy_timeout: Duration::from_secs(5),
            deadline: None,
        }
    }
}

impl StoreOptions {
    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    pub fn deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

/// SQLite-backed grocery store.
pub struct SqliteStore {
    path: Option<PathBuf>,
    conn: Mutex<Connection>,
    interrupt: Arc<InterruptHandle>,
    deadline: Option<Duration>,
}

impl SqliteStore {
    /// Open (or create) a database file and apply the schema.
    ///
    /// # Errors
    ///
    /// Returns `GrocerError::Connectivity` if the file cannot be opened.
    pub fn open(path: &Path, options: &StoreOptions) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path).map_err(|e| {
            GrocerError::Connectivity(format!("Cannot open {}: {}", path.display(), e))
        })?;
        Self::init(conn, Some(path.to_path_buf()), options)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| GrocerError::Connectivity(format!("Cannot open in-memory db: {}", e)))?;
        Self::init(conn, None, &StoreOptions::default())
    }

    fn init(conn: Connection, path: Option<PathBuf>, options: &StoreOptions) -> Result<Self> {
        conn.busy_timeout(options.busy_timeout)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA)?;
        debug!(path = ?path, "opened store");

        let interrupt = Arc::new(conn.get_interrupt_handle());
        Ok(Self {
            path,
            conn: Mutex::new(conn),
            interrupt,
            deadline: options.deadline,
        })
    }

    /// Database file path, `None` for in-memory stores.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Handle that interrupts the statement currently running on this store.
    ///
    /// The interrupted unit of work fails with `GrocerError::Cancelled` and is
    /// rolled back.
    pub fn interrupt_handle(&self) -> Arc<InterruptHandle> {
        Arc::clone(&self.interrupt)
    }

    /// Lock the database connection, returning an error if the mutex is poisoned.
    fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| GrocerError::Storage("SQLite connection poisoned".to_string()))
    }

    /// Run `work` as one unit of work.
    ///
    /// The transaction is opened `IMMEDIATE` so the write lock is taken up
    /// front. If `work` fails the transaction is rolled back; see
    /// `GrocerError::Rollback` for the case where that fails too. Nothing is
    /// retried. The store's default deadline, if any, applies.
    pub fn execute_tx<T, F>(&self, operation: &'static str, work: F) -> Result<T>
    where
        F: FnOnce(&Queries<'_>) -> Result<T>,
    {
        self.run_tx(operation, self.deadline, work)
    }

    /// Like [`SqliteStore::execute_tx`], with a caller-supplied deadline.
    ///
    /// The deadline starts once the transaction is open. When it expires the
    /// running statement is interrupted, the unit of work is rolled back and
    /// `GrocerError::Timeout` is returned.
    pub fn execute_tx_within<T, F>(
        &self,
        operation: &'static str,
        deadline: Duration,
        work: F,
    ) -> Result<T>
    where
        F: FnOnce(&Queries<'_>) -> Result<T>,
    {
        self.run_tx(operation, Some(deadline), work)
    }

    fn run_tx<T, F>(
        &self,
        operation: &'static str,
        deadline: Option<Duration>,
        work: F,
    ) -> Result<T>
    where
        F: FnOnce(&Queries<'_>) -> Result<T>,
    {
        let span = debug_span!("unit_of_work", operation);
        let _entered = span.enter();

        let mut conn = self.lock_conn()?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| match GrocerError::from(e) {
                err @ (GrocerError::Timeout(_)
                | GrocerError::Cancelled
                | GrocerError::Connectivity(_)) => err,
                other => GrocerError::Transaction(format!("Begin failed: {}", other)),
            })?;

        let queries = Queries::new(&tx);
        let outcome = match deadline {
            Some(limit) => self.bounded(limit, || work(&queries)),
            None => work(&queries),
        };
        settle(operation, tx, outcome)
    }

    /// Run `work` while a timer thread stands ready to interrupt it.
    ///
    /// The timer is stopped and joined before returning, so it never fires
    /// into the commit or rollback that follows.
    fn bounded<T>(&self, limit: Duration, work: impl FnOnce() -> Result<T>) -> Result<T> {
        let (finished, wait) = mpsc::channel::<()>();
        let interrupt = Arc::clone(&self.interrupt);
        let timer = thread::spawn(move || match wait.recv_timeout(limit) {
            Err(RecvTimeoutError::Timeout) => {
                interrupt.interrupt();
                true
            }
            _ => false,
        });

        let outcome = work();
        drop(finished);
        let expired = timer.join().unwrap_or(false);

        match outcome {
            Err(GrocerError::Cancelled) if expired => Err(GrocerError::Timeout(format!(
                "Unit of work exceeded its {} ms deadline",
                limit.as_millis()
            ))),
            other => other,
        }
    }
}

impl GroceryStore for SqliteStore {
    fn create_recipe_with_ingredients(&self, recipe: &NewRecipe) -> Result<RecipeComposition> {
        self.execute_tx("create_recipe_with_ingredients", |q| {
            compose::create_recipe(q, recipe)
        })
    }

    fn load_recipe_composition(&self, recipe_id: i64) -> Result<RecipeComposition> {
        self.execute_tx("load_recipe_composition", |q| {
            compose::load_recipe(q, recipe_id)
        })
    }

    fn update_recipe_composition(&self, update: &UpdateRecipe) -> Result<RecipeComposition> {
        self.execute_tx("update_recipe_composition", |q| {
            compose::update_recipe(q, update)
        })
    }

    fn remove_recipe_ingredient(&self, recipe_id: i64, ingredient_id: i64) -> Result<()> {
        self.execute_tx("remove_recipe_ingredient", |q| {
            compose::remove_ingredient(q, recipe_id, ingredient_id)
        })
    }

    fn generate_grocery_list(&self, schedule: &NewSchedule) -> Result<ScheduleComposition> {
        self.execute_tx("generate_grocery_list", |q| {
            compose::generate_groceries(q, schedule)
        })
    }

    fn load_schedule_composition(&self, schedule_id: i64) -> Result<ScheduleComposition> {
        self.execute_tx("load_schedule_composition", |q| {
            compose::load_schedule(q, schedule_id)
        })
    }

    fn list_recipes(&self) -> Result<Vec<Recipe>> {
        self.execute_tx("list_recipes", |q| q.list_recipes())
    }

    fn delete_recipe(&self, recipe_id: i64) -> Result<()> {
        self.execute_tx("delete_recipe", |q| compose::delete_recipe(q, recipe_id))
    }

    fn list_schedules(&self) -> Result<Vec<Schedule>> {
        self.execute_tx("list_schedules", |q| q.list_schedules())
    }

    fn delete_schedule(&self, schedule_id: i64) -> Result<()> {
        self.execute_tx("delete_schedule", |q| {
            compose::delete_schedule(q, schedule_id)
        })
    }

    fn remove_schedule_recipe(&self, schedule_id: i64, recipe_id: i64) -> Result<()> {
        self.execute_tx("remove_schedule_recipe", |q| {
            compose::remove_recipe(q, schedule_id, recipe_id)
        })
    }

    fn check_integrity(&self) -> Result<()> {
        let conn = self.lock_conn()?;

        let mut stmt = conn.prepare("PRAGMA foreign_key_check")?;
        let mut rows = stmt.query([])?;
        if rows.next()?.is_some() {
            return Err(GrocerError::Storage(
                "Foreign key integrity check failed".to_string(),
            ));
        }

        let status: String = conn.query_row("PRAGMA integrity_check", [], |row| row.get(0))?;
        if status != "ok" {
            return Err(GrocerError::Storage(format!(
                "Integrity check failed: {}",
                status
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;

    use super::*;

    #[test]
    fn test_failed_work_leaves_no_rows() {
        let store = SqliteStore::open_in_memory().unwrap();

        let result: Result<()> = store.execute_tx("test", |q| {
            q.create_unit("gram")?;
            Err(GrocerError::Validation("stop".to_string()))
        });
        assert!(matches!(result, Err(GrocerError::Validation(_))));

        let units = store.execute_tx("test", |q| q.list_units()).unwrap();
        assert!(units.is_empty());
    }

    #[test]
    fn test_successful_work_commits() {
        let store = SqliteStore::open_in_memory().unwrap();
        let unit = store.execute_tx("test", |q| q.create_unit("cup")).unwrap();

        let loaded = store.execute_tx("test", |q| q.get_unit(unit.id)).unwrap();
        assert_eq!(loaded, Some(unit));
    }

    const ENDLESS_QUERY: &str =
        "WITH RECURSIVE c(x) AS (SELECT 1 UNION ALL SELECT x + 1 FROM c) SELECT count(*) FROM c";

    #[test]
    fn test_interrupt_cancels_and_rolls_back() {
        let store = SqliteStore::open_in_memory().unwrap();
        let handle = store.interrupt_handle();

        let result: Result<i64> = store.execute_tx("test", |q| {
            q.create_unit("gram")?;

            // Interrupts sent while no statement runs are dropped, so keep
            // sending until the query has returned. The interrupter is joined
            // before the closure returns and never reaches the rollback.
            let done = Arc::new(AtomicBool::new(false));
            let interrupter = {
                let done = Arc::clone(&done);
                thread::spawn(move || {
                    while !done.load(Ordering::SeqCst) {
                        handle.interrupt();
                        thread::sleep(Duration::from_millis(5));
                    }
                })
            };
            let count = q.conn.query_row(ENDLESS_QUERY, [], |row| row.get(0));
            done.store(true, Ordering::SeqCst);
            interrupter.join().unwrap();
            Ok(count?)
        });

        assert!(matches!(result, Err(GrocerError::Cancelled)));
        let units = store.execute_tx("test", |q| q.list_units()).unwrap();
        assert!(units.is_empty());
    }

    #[test]
    fn test_deadline_times_out_and_rolls_back() {
        let store = SqliteStore::open_in_memory().unwrap();

        let result: Result<i64> =
            store.execute_tx_within("test", Duration::from_millis(50), |q| {
                q.create_unit("gram")?;
                Ok(q.conn.query_row(ENDLESS_QUERY, [], |row| row.get(0))?)
            });

        assert!(matches!(result, Err(GrocerError::Timeout(_))));
        let units = store.execute_tx("test", |q| q.list_units()).unwrap();
        assert!(units.is_empty());
    }

    #[test]
    fn test_default_deadline_lets_fast_work_commit() {
        let options = StoreOptions::default().deadline(Duration::from_secs(5));
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::open(&dir.path().join("grocer.db"), &options).unwrap();

        let unit = store.execute_tx("test", |q| q.create_unit("cup")).unwrap();
        let units = store.execute_tx("test", |q| q.list_units()).unwrap();
        assert_eq!(units, vec![unit]);
    }

    #[test]
    fn test_open_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("grocer.db");

        let store = SqliteStore::open(&path, &StoreOptions::default()).unwrap();
        assert_eq!(store.path(), Some(path.as_path()));
        assert!(path.exists());
        store.check_integrity().unwrap();
    }
}
