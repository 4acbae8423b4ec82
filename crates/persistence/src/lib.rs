// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the Ward Duty roster.
//!
//! This crate provides database persistence for schedules, bookings,
//! cancellation markers, the duty log, and notification rows. It is
//! built on Diesel and supports multiple database backends.
//!
//! ## Database Backend Support
//!
//! ### Supported Backends
//!
//! - **`SQLite`** (default) — Used for development, unit tests, and integration tests
//! - **`MariaDB`/`MySQL`** — Validated via explicit opt-in tests
//!
//! `SQLite` support is always available and requires no external
//! infrastructure. `MySQL`/`MariaDB` support is compiled by default
//! (no feature flags) but validated only via explicit opt-in tests:
//!
//! ```bash
//! cargo xtask test-mariadb
//! ```
//!
//! This command starts a `MariaDB` container via `Docker`, runs the
//! MySQL migrations, executes the backend validation tests marked
//! `#[ignore]`, and cleans up the container.
//!
//! ### Migration Strategy
//!
//! Due to `SQL` syntax differences between backends, we maintain
//! separate migration directories:
//!
//! - `migrations/` — `SQLite`-specific (default)
//! - `migrations_mysql/` — `MySQL`/`MariaDB`-specific
//!
//! Both produce identical schema semantics. In particular, both
//! enforce the booking invariants at the storage boundary: one active
//! booking per (schedule, student), seat capacity, and one booked duty
//! per student per calendar day.
//!
//! ## Testing Philosophy
//!
//! - Standard tests (`cargo test`) run against `SQLite` only
//! - Backend validation tests are explicitly marked `#[ignore]`
//! - External database tests never run automatically
//! - All infrastructure is orchestrated by `xtask`, not embedded in tests

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::{MysqlConnection, SqliteConnection};
use std::sync::atomic::{AtomicU64, Ordering};
use time::{Date, OffsetDateTime};
use tracing::warn;
use ward_duty::{Command, Notification, Roster, TransitionResult};
use ward_duty_audit::AuditEvent;

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID, so
/// tests are isolated without time-based collisions.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Macro to generate monomorphic backend-specific query/mutation functions.
///
/// This macro generates two separate functions from a single function body:
/// - One suffixed with `_sqlite` taking `&mut SqliteConnection`
/// - One suffixed with `_mysql` taking `&mut MysqlConnection`
///
/// This approach is required because Diesel's type system requires
/// concrete backend types at compile time and cannot handle generic
/// backend functions.
///
/// # Constraints
///
/// - The macro ONLY duplicates function bodies and substitutes connection types
/// - No logic, branching, or dispatch occurs within the macro
/// - Backend dispatch happens exclusively in the Persistence adapter
/// - The generated functions are completely monomorphic
///
/// Function bodies reach the few backend-specific operations (e.g. the
/// last inserted row ID) through the `PersistenceBackend` trait, so a
/// single body serves both backends.
macro_rules! backend_fn {
    (
        $(#[$meta:meta])*
        $vis:vis fn $name:ident (
            $conn:ident : &mut _
            $(, $param:ident : $param_ty:ty)* $(,)?
        ) -> $ret:ty
        $body:block
    ) => {
        pastey::paste! {
            // Generate SQLite version
            $(#[$meta])*
            $vis fn [<$name _sqlite>] (
                $conn: &mut SqliteConnection
                $(, $param : $param_ty)*
            ) -> $ret
            $body

            // Generate MySQL version
            $(#[$meta])*
            $vis fn [<$name _mysql>] (
                $conn: &mut MysqlConnection
                $(, $param : $param_ty)*
            ) -> $ret
            $body
        }
    };
}

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use data_models::NotificationData;
pub use error::PersistenceError;
pub use mutations::PersistTransitionResult;

/// Type alias for backward compatibility with single-backend callers.
pub type SqlitePersistence = Persistence;

/// Internal enum for backend-specific database connections.
///
/// This enum allows the persistence adapter to work with either
/// `SQLite` or `MySQL` backends while maintaining a single public API.
pub enum BackendConnection {
    Sqlite(SqliteConnection),
    Mysql(MysqlConnection),
}

/// Macro dispatching an adapter method to the backend-specific function.
///
/// Expands to a match over the connection enum, calling the `_sqlite`
/// or `_mysql` variant of the named function.
macro_rules! dispatch {
    ($self:ident, $module:path, $func:ident, $($arg:expr),* $(,)?) => {{
        pastey::paste! {
            match &mut $self.conn {
                BackendConnection::Sqlite(conn) => $module::[<$func _sqlite>](conn, $($arg),*),
                BackendConnection::Mysql(conn) => $module::[<$func _mysql>](conn, $($arg),*),
            }
        }
    }};
}

/// Persistence adapter for the duty roster.
///
/// Backend selection happens once at construction time and is
/// transparent to callers.
pub struct Persistence {
    pub(crate) conn: BackendConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique database instance via atomic
    /// counter, ensuring deterministic test isolation.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let db_name = format!("memdb_test_{db_id}");
        let shared_memory_url = format!("file:{db_name}?mode=memory&cache=shared");

        let conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        Ok(Self {
            conn: BackendConnection::Sqlite(conn),
        })
    }

    /// Creates a new persistence adapter backed by a `SQLite` file.
    ///
    /// # Arguments
    ///
    /// * `path` - The database file path
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_with_file(path: &str) -> Result<Self, PersistenceError> {
        let conn: SqliteConnection = backend::sqlite::initialize_database(path)?;
        Ok(Self {
            conn: BackendConnection::Sqlite(conn),
        })
    }

    /// Creates a new persistence adapter backed by a MySQL/MariaDB server.
    ///
    /// # Arguments
    ///
    /// * `database_url` - A `mysql://` connection URL
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_with_mysql_url(database_url: &str) -> Result<Self, PersistenceError> {
        let conn: MysqlConnection = backend::mysql::initialize_database(database_url)?;
        Ok(Self {
            conn: BackendConnection::Mysql(conn),
        })
    }

    /// Loads the complete roster state.
    ///
    /// # Arguments
    ///
    /// * `today` - The current facility-local calendar day (bounds the
    ///   cancellation markers loaded)
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails or a stored row is corrupt.
    pub fn load_roster(&mut self, today: Date) -> Result<Roster, PersistenceError> {
        dispatch!(self, queries::roster, load_roster, today)
    }

    /// Persists a core transition atomically.
    ///
    /// # Arguments
    ///
    /// * `command` - The command that produced the transition
    /// * `result` - The transition produced by the core
    /// * `recorded_at` - Timestamp for the duty log entry
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails. A storage-level constraint
    /// violation (a race that slipped past the optimistic pre-checks)
    /// surfaces as `PersistenceError::Conflict` carrying the matching
    /// domain error.
    pub fn persist_transition(
        &mut self,
        command: &Command,
        result: &TransitionResult,
        recorded_at: OffsetDateTime,
    ) -> Result<PersistTransitionResult, PersistenceError> {
        dispatch!(
            self,
            mutations::transition,
            persist_transition,
            command,
            result,
            recorded_at
        )
    }

    /// Writes notification rows for a committed transition.
    ///
    /// Delivery is best-effort: a failure is logged and swallowed, and
    /// must never roll back or block the transition that produced the
    /// notifications.
    pub fn dispatch_notifications(&mut self, batch: &[Notification], created_at: OffsetDateTime) {
        let outcome = dispatch!(
            self,
            mutations::notifications,
            insert_notifications,
            batch,
            created_at
        );
        if let Err(e) = outcome {
            warn!(error = %e, count = batch.len(), "Failed to write notification rows");
        }
    }

    /// Deletes cancellation markers whose calendar day has passed.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn prune_expired_markers(&mut self, today: Date) -> Result<usize, PersistenceError> {
        dispatch!(self, mutations::markers, prune_expired_markers, today)
    }

    /// Returns the duty log timeline, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_duty_log(&mut self, limit: i64) -> Result<Vec<AuditEvent>, PersistenceError> {
        dispatch!(self, queries::audit, get_duty_log, limit)
    }

    /// Returns a single duty log event by its ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the event does not exist.
    pub fn get_duty_log_event(&mut self, event_id: i64) -> Result<AuditEvent, PersistenceError> {
        dispatch!(self, queries::audit, get_duty_log_event, event_id)
    }

    /// Returns a student's notifications, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn notifications_for_student(
        &mut self,
        student_id: i64,
        limit: i64,
    ) -> Result<Vec<NotificationData>, PersistenceError> {
        dispatch!(
            self,
            queries::notifications,
            notifications_for_student,
            student_id,
            limit
        )
    }

    /// Returns the admin-group notifications, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn notifications_for_admins(
        &mut self,
        limit: i64,
    ) -> Result<Vec<NotificationData>, PersistenceError> {
        dispatch!(self, queries::notifications, notifications_for_admins, limit)
    }

    /// Counts a student's unread notifications.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn unread_count_for_student(
        &mut self,
        student_id: i64,
    ) -> Result<i64, PersistenceError> {
        dispatch!(
            self,
            queries::notifications,
            unread_count_for_student,
            student_id
        )
    }

    /// Marks a notification as read.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no such notification exists.
    pub fn mark_notification_read(
        &mut self,
        notification_id: i64,
        read_at: OffsetDateTime,
    ) -> Result<(), PersistenceError> {
        dispatch!(
            self,
            mutations::notifications,
            mark_notification_read,
            notification_id,
            read_at
        )
    }
}
