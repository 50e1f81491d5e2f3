//! Versioned schema migrations tracked in `schema_migrations`

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, Clone)]
pub struct Migration {
    pub version: i64,
    pub name: &'static str,
    pub up_sql: &'static str,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AppliedMigration {
    pub version: i64,
    pub name: String,
    pub checksum: String,
}

pub fn load_migrations() -> BTreeMap<i64, Migration> {
    let mut migrations = BTreeMap::new();

    migrations.insert(1, Migration {
        version: 1,
        name: "kv_store",
        up_sql: include_str!("sql/001_kv_store/up.sql"),
    });

    migrations
}

/// Stable fingerprint of a migration's SQL
pub fn calculate_checksum(sql: &str) -> String {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let mut hasher = DefaultHasher::new();
    sql.hash(&mut hasher);
    format!("{:x}", hasher.finish())
}

async fn init_migration_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            applied_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            checksum TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .context("Failed to create schema_migrations table")?;

    Ok(())
}

pub async fn applied_migrations(pool: &SqlitePool) -> Result<Vec<AppliedMigration>> {
    sqlx::query_as::<_, AppliedMigration>("SELECT version, name, checksum FROM schema_migrations ORDER BY version")
        .fetch_all(pool)
        .await
        .context("Failed to get applied migrations")
}

/// Apply every pending migration, refusing to run over an edited one
pub async fn migrate_up(pool: &SqlitePool) -> Result<()> {
    init_migration_table(pool).await?;

    let available = load_migrations();
    let applied = applied_migrations(pool).await?;

    for migration in &applied {
        match available.get(&migration.version) {
            Some(known) if calculate_checksum(known.up_sql) != migration.checksum => {
                anyhow::bail!(
                    "Migration {} '{}' checksum mismatch; it was modified after being applied",
                    migration.version,
                    migration.name
                );
            }
            Some(_) => {}
            None => anyhow::bail!(
                "Applied migration {} '{}' is unknown to this version",
                migration.version,
                migration.name
            ),
        }
    }

    let done: HashSet<i64> = applied.iter().map(|m| m.version).collect();
    let pending: Vec<&Migration> = available.values().filter(|m| !done.contains(&m.version)).collect();
    if pending.is_empty() {
        log::debug!("No pending migrations");
        return Ok(());
    }

    for migration in pending {
        log::info!("Applying migration {} '{}'", migration.version, migration.name);

        let mut tx = pool.begin().await.context("Failed to start migration transaction")?;
        sqlx::raw_sql(migration.up_sql)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to apply migration {}", migration.version))?;
        sqlx::query("INSERT INTO schema_migrations (version, name, checksum) VALUES (?, ?, ?)")
            .bind(migration.version)
            .bind(migration.name)
            .bind(calculate_checksum(migration.up_sql))
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to record migration {}", migration.version))?;
        tx.commit().await.context("Failed to commit migration")?;
    }

    Ok(())
}

pub async fn current_version(pool: &SqlitePool) -> Result<i64> {
    let version: Option<i64> = sqlx::query_scalar("SELECT MAX(version) FROM schema_migrations")
        .fetch_one(pool)
        .await
        .context("Failed to get current schema version")?;

    Ok(version.unwrap_or(0))
}
