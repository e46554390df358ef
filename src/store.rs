//! Sqlite-backed simulation store.
//!
//! A plain keyed record store: simulations go in under their id and come
//! back out whole. Branches are stored as a JSON column, timestamps as
//! unix seconds. The governor and cache have no dependency on this layer —
//! it persists finished results only, never limiter or cache state.

use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use rusqlite::{Connection, OptionalExtension, params};

use crate::Result;
use crate::types::{LifeBranch, Mode, SimulationResult};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS simulations (
    id          TEXT PRIMARY KEY,
    decision    TEXT NOT NULL,
    mode        TEXT NOT NULL,
    branches    TEXT NOT NULL,
    created_at  INTEGER NOT NULL,
    share_count INTEGER NOT NULL DEFAULT 0
)";

/// Keyed store for simulation results.
///
/// The connection lives behind a mutex; rusqlite connections are not
/// `Sync` and simulation traffic is light enough that serialized access
/// is fine.
pub struct SimulationStore {
    conn: Mutex<Connection>,
}

impl SimulationStore {
    /// Open (and initialize) a store at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(Duration::from_millis(3000))?;
        Self::init(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory store (tests, ephemeral runs).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn init(conn: &Connection) -> Result<()> {
        conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Insert or replace a simulation under its id.
    pub fn save(&self, result: &SimulationResult) -> Result<()> {
        let branches = serde_json::to_string(&result.branches)?;
        self.lock().execute(
            "INSERT INTO simulations (id, decision, mode, branches, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(id) DO UPDATE SET
                 decision = excluded.decision,
                 mode = excluded.mode,
                 branches = excluded.branches,
                 created_at = excluded.created_at",
            params![
                result.simulation_id,
                result.decision,
                result.mode.as_str(),
                branches,
                result.created_at,
            ],
        )?;
        Ok(())
    }

    /// Load a simulation by id. Returns `None` when the id is unknown.
    pub fn load(&self, id: &str) -> Result<Option<SimulationResult>> {
        let row = self
            .lock()
            .query_row(
                "SELECT decision, mode, branches, created_at
                 FROM simulations WHERE id = ?1",
                params![id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, i64>(3)?,
                    ))
                },
            )
            .optional()?;

        let Some((decision, mode, branches, created_at)) = row else {
            return Ok(None);
        };

        let branches: Vec<LifeBranch> = serde_json::from_str(&branches)?;
        Ok(Some(SimulationResult {
            simulation_id: id.to_string(),
            decision,
            mode: Mode::parse(&mode),
            branches,
            created_at,
            share_url: None,
        }))
    }

    /// Bump the share counter for a simulation. Returns whether the id
    /// existed.
    pub fn record_share(&self, id: &str) -> Result<bool> {
        let updated = self.lock().execute(
            "UPDATE simulations SET share_count = share_count + 1 WHERE id = ?1",
            params![id],
        )?;
        Ok(updated > 0)
    }

    /// Current share count for a simulation, if it exists.
    pub fn share_count(&self, id: &str) -> Result<Option<i64>> {
        let count = self
            .lock()
            .query_row(
                "SELECT share_count FROM simulations WHERE id = ?1",
                params![id],
                |row| row.get::<_, i64>(0),
            )
            .optional()?;
        Ok(count)
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for SimulationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationStore").finish_non_exhaustive()
    }
}
