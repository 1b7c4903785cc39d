//! Shared helpers for the embedded PostgreSQL integration suites.
//!
//! Each suite compiles as its own crate and pulls this module in with
//! `mod support;`, so not every helper is used by every suite.
#![allow(dead_code, reason = "suites use different subsets of the helpers")]

pub mod pg_embed;

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use pg_embedded_setup_unpriv::TestCluster;
use postgres::{Client, NoTls};
use uuid::Uuid;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Render a `postgres` error with the server message and SQLSTATE.
pub fn format_postgres_error(error: &postgres::Error) -> String {
    let Some(db_error) = error.as_db_error() else {
        return error.to_string();
    };

    let mut summary = format!(
        "postgres error {:?}: {}",
        db_error.code(),
        db_error.message()
    );
    if let Some(detail) = db_error.detail() {
        summary.push_str("; detail: ");
        summary.push_str(detail);
    }
    summary
}

/// Whether `SKIP_TEST_CLUSTER` is set to "1", "true", or "yes".
pub fn should_skip_test_cluster() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Skip when `SKIP_TEST_CLUSTER` is truthy, otherwise fail loudly.
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    if should_skip_test_cluster() {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        None
    } else {
        panic!("Test cluster setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.");
    }
}

/// Drop and recreate `name` on the cluster.
pub fn reset_database(cluster: &TestCluster, name: &str) -> Result<(), String> {
    let admin_url = cluster.connection().database_url("postgres");
    let mut client =
        Client::connect(&admin_url, NoTls).map_err(|err| format_postgres_error(&err))?;
    client
        .batch_execute(&format!(
            r#"DROP DATABASE IF EXISTS "{name}" WITH (FORCE); CREATE DATABASE "{name}";"#
        ))
        .map_err(|err| format_postgres_error(&err))
}

/// Run the embedded Diesel migrations.
pub fn migrate_schema(url: &str) -> Result<(), String> {
    let mut conn = PgConnection::establish(url).map_err(|err| format!("connect: {err}"))?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|err| format!("migration: {err}"))?;
    Ok(())
}

/// Insert a user row and return its primary key.
pub fn seed_user(url: &str, user_uuid: Uuid, email: &str) -> Result<i64, String> {
    let mut client = Client::connect(url, NoTls).map_err(|err| format_postgres_error(&err))?;
    let row = client
        .query_one(
            concat!(
                "INSERT INTO users (uuid, email, password_hash, name) ",
                "VALUES ($1, $2, 'not-a-real-hash', 'Ada Lovelace') RETURNING id"
            ),
            &[&user_uuid, &email],
        )
        .map_err(|err| format_postgres_error(&err))?;
    Ok(row.get(0))
}

/// Seed the three catalogs with fixed ids.
///
/// Allergies 1..=3 are egg, milk, peanut; diseases 1..=2 are hypertension
/// and diabetes; special condition 1 is pregnancy.
pub fn seed_catalogs(url: &str) -> Result<(), String> {
    let mut client = Client::connect(url, NoTls).map_err(|err| format_postgres_error(&err))?;
    client
        .batch_execute(concat!(
            "INSERT INTO allergies (id, name, display_name) VALUES ",
            "(1, 'egg', 'Egg'), (2, 'milk', 'Milk'), (3, 'peanut', 'Peanut');",
            "INSERT INTO diseases (id, name, display_name) VALUES ",
            "(1, 'hypertension', 'Hypertension'), (2, 'diabetes', 'Diabetes');",
            "INSERT INTO special_conditions (id, name, display_name) VALUES ",
            "(1, 'pregnancy', 'Pregnancy');"
        ))
        .map_err(|err| format_postgres_error(&err))
}
