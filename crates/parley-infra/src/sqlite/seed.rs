//! Demo company database.
//!
//! Builds a small standalone SQLite file with departments and employees,
//! the dataset the `SqlQuery` tool is described against. Unrelated to the
//! conversation database.

use std::path::Path;

use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{Connection, SqliteConnection};
use tracing::{info, warn};

const DEPARTMENTS: &[(i64, &str)] = &[
    (1, "Engineering"),
    (2, "Sales"),
    (3, "HR"),
    (4, "Marketing"),
];

const EMPLOYEES: &[(i64, &str, &str, i64, i64)] = &[
    (1, "Alice Johnson", "Senior Developer", 120_000, 1),
    (2, "Bob Smith", "Sales Manager", 95_000, 2),
    (3, "Charlie Brown", "HR Specialist", 70_000, 3),
    (4, "Diana Prince", "Junior Developer", 80_000, 1),
    (5, "Eve Adams", "Marketing Lead", 105_000, 4),
    (6, "Frank White", "DevOps Engineer", 115_000, 1),
    (7, "Grace Hall", "Sales Associate", 65_000, 2),
];

/// Row counts written by [`seed_demo_database`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub departments: usize,
    pub employees: usize,
}

/// Create the demo database at `path` from scratch.
///
/// An existing file is removed first. Missing parent directories are created.
pub async fn seed_demo_database(path: &Path) -> anyhow::Result<SeedSummary> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    if tokio::fs::try_exists(path).await? {
        warn!(path = %path.display(), "Database file already exists, recreating it");
        tokio::fs::remove_file(path).await?;
    }

    let opts = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .foreign_keys(true);
    let mut conn = SqliteConnection::connect_with(&opts).await?;
    info!(path = %path.display(), "Created demo database");

    let mut tx = conn.begin().await?;

    sqlx::query(
        "CREATE TABLE departments (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE
        )",
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        "CREATE TABLE employees (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            position TEXT NOT NULL,
            salary INTEGER NOT NULL,
            department_id INTEGER,
            FOREIGN KEY (department_id) REFERENCES departments (id)
        )",
    )
    .execute(&mut *tx)
    .await?;

    for &(id, name) in DEPARTMENTS {
        sqlx::query("INSERT INTO departments (id, name) VALUES (?, ?)")
            .bind(id)
            .bind(name)
            .execute(&mut *tx)
            .await?;
    }

    for &(id, name, position, salary, department_id) in EMPLOYEES {
        sqlx::query(
            "INSERT INTO employees (id, name, position, salary, department_id) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(name)
        .bind(position)
        .bind(salary)
        .bind(department_id)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    conn.close().await?;

    let summary = SeedSummary {
        departments: DEPARTMENTS.len(),
        employees: EMPLOYEES.len(),
    };
    info!(
        departments = summary.departments,
        employees = summary.employees,
        "Demo data inserted"
    );
    Ok(summary)
}
