// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! MySQL/MariaDB-specific backend utilities.
//!
//! MySQL support is compiled by default but validated only via
//! explicit opt-in tests (`cargo xtask test-mariadb`), which provision
//! a `MariaDB` container, run the MySQL migrations, and execute the
//! tests marked `#[ignore]`.

use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::BigInt;
use diesel::{Connection, MysqlConnection, RunQueryDsl};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

use crate::error::PersistenceError;

/// MySQL-specific migrations.
///
/// Identical schema semantics to the `SQLite` migrations, expressed in
/// MySQL syntax (SIGNAL triggers instead of partial indexes).
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations_mysql");

/// Helper row struct for the foreign key check.
#[derive(QueryableByName)]
struct ForeignKeyCheckRow {
    #[diesel(sql_type = BigInt)]
    foreign_key_checks: i64,
}

/// Helper function to get the last inserted row ID.
///
/// MySQL has no `RETURNING` clause; `LAST_INSERT_ID()` is the
/// connection-scoped equivalent.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_last_insert_id(conn: &mut MysqlConnection) -> Result<i64, PersistenceError> {
    Ok(diesel::select(sql::<BigInt>("LAST_INSERT_ID()")).get_result(conn)?)
}

/// Verifies that foreign key enforcement is enabled.
///
/// # Errors
///
/// Returns an error if `foreign_key_checks` is disabled for this session.
pub fn verify_foreign_key_enforcement(conn: &mut MysqlConnection) -> Result<(), PersistenceError> {
    let enabled: i64 =
        diesel::sql_query("SELECT @@foreign_key_checks AS foreign_key_checks")
            .get_result::<ForeignKeyCheckRow>(conn)?
            .foreign_key_checks;

    if enabled == 0 {
        return Err(PersistenceError::ForeignKeyEnforcementNotEnabled);
    }

    info!("MySQL foreign key enforcement is enabled");
    Ok(())
}

/// Run pending migrations on the provided connection.
///
/// # Errors
///
/// Returns an error if migration execution fails.
pub fn run_migrations(
    conn: &mut MysqlConnection,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    info!("Running MySQL database migrations");
    conn.run_pending_migrations(MIGRATIONS)?;
    Ok(())
}

/// Initialize a MySQL database at the given URL and run migrations.
///
/// # Arguments
///
/// * `database_url` - A `mysql://` connection URL
///
/// # Errors
///
/// Returns an error if connection or migration fails.
pub fn initialize_database(database_url: &str) -> Result<MysqlConnection, PersistenceError> {
    let mut conn: MysqlConnection = MysqlConnection::establish(database_url)?;

    run_migrations(&mut conn)
        .map_err(|e| PersistenceError::MigrationFailed(e.to_string()))?;

    verify_foreign_key_enforcement(&mut conn)?;

    Ok(conn)
}
