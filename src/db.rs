use anyhow::{Context, Result};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::{Path, PathBuf};
use tokio::fs;

pub const MIGRATIONS_DIR: &str = "migrations";

/// Connects the ORM. The underlying sqlx pool is reachable through
/// `get_postgres_connection_pool` for the raw upserts in `PgStore`.
pub async fn create_orm_conn(database_url: &str) -> Result<DatabaseConnection> {
    let conn = Database::connect(database_url)
        .await
        .context("connecting to the storefront database")?;
    Ok(conn)
}

/// Runs every `.sql` file in `migrations/` in filename order. Migrations are
/// written idempotently (`IF NOT EXISTS`), so rerunning them is harmless.
pub async fn run_migrations(conn: &DatabaseConnection) -> Result<()> {
    let backend = conn.get_database_backend();
    for file in migration_files(Path::new(MIGRATIONS_DIR)).await? {
        let sql = fs::read_to_string(&file)
            .await
            .with_context(|| format!("reading {}", file.display()))?;
        for stmt in statements(&sql) {
            conn.execute(Statement::from_string(backend, stmt))
                .await
                .with_context(|| format!("applying {}", file.display()))?;
        }
        tracing::debug!(file = %file.display(), "migration applied");
    }
    Ok(())
}

async fn migration_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = fs::read_dir(dir)
        .await
        .with_context(|| format!("listing {}", dir.display()))?;
    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "sql") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

// Postgres prepared statements hold a single command each.
fn statements(sql: &str) -> Vec<String> {
    sql.split(';')
        .map(str::trim)
        .filter(|stmt| !stmt.is_empty())
        .map(|stmt| format!("{stmt};"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::statements;

    #[test]
    fn splits_script_into_single_statements() {
        let sql = "CREATE TABLE a (id BIGINT);\n\n  CREATE INDEX a_idx ON a (id);\n";
        assert_eq!(
            statements(sql),
            vec!["CREATE TABLE a (id BIGINT);", "CREATE INDEX a_idx ON a (id);"]
        );
    }
}
