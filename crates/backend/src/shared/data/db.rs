use once_cell::sync::OnceCell;
use sea_orm::{ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement};

static DB_CONN: OnceCell<DatabaseConnection> = OnceCell::new();

/// Таблицы хранилища: имя и DDL создания
const TABLES: &[(&str, &str)] = &[
    (
        "products",
        r#"
        CREATE TABLE products (
            id INTEGER PRIMARY KEY NOT NULL,
            sku TEXT,
            name TEXT NOT NULL DEFAULT '',
            price REAL,
            quantity INTEGER,
            enabled INTEGER NOT NULL DEFAULT 0,
            updated TEXT,
            raw_json TEXT NOT NULL,
            synced_at TEXT NOT NULL
        );
        "#,
    ),
    (
        "categories",
        r#"
        CREATE TABLE categories (
            id INTEGER PRIMARY KEY NOT NULL,
            parent_id INTEGER,
            name TEXT NOT NULL DEFAULT '',
            enabled INTEGER NOT NULL DEFAULT 0,
            product_count INTEGER NOT NULL DEFAULT 0,
            updated TEXT,
            raw_json TEXT NOT NULL,
            synced_at TEXT NOT NULL
        );
        "#,
    ),
    (
        "suppliers",
        r#"
        CREATE TABLE suppliers (
            id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
            code TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            created_at TEXT NOT NULL
        );
        "#,
    ),
    (
        "supplier_files",
        r#"
        CREATE TABLE supplier_files (
            id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
            supplier_id INTEGER NOT NULL REFERENCES suppliers(id) ON DELETE CASCADE,
            file_name TEXT NOT NULL,
            content_type TEXT,
            size INTEGER NOT NULL,
            sha256 TEXT NOT NULL,
            content BLOB NOT NULL,
            uploaded_at TEXT NOT NULL
        );
        "#,
    ),
    (
        "supplier_records",
        r#"
        CREATE TABLE supplier_records (
            id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
            supplier_id INTEGER NOT NULL REFERENCES suppliers(id) ON DELETE RESTRICT,
            supplier_file_id INTEGER REFERENCES supplier_files(id) ON DELETE SET NULL,
            sku TEXT NOT NULL,
            name TEXT,
            price REAL,
            stock INTEGER,
            imported_at TEXT NOT NULL,
            raw TEXT NOT NULL
        );
        "#,
    ),
];

const INDEXES: &[&str] = &[
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_supplier_files_supplier_sha256 ON supplier_files (supplier_id, sha256);",
    "CREATE INDEX IF NOT EXISTS idx_supplier_records_supplier_sku ON supplier_records (supplier_id, sku);",
    "CREATE INDEX IF NOT EXISTS idx_categories_parent ON categories (parent_id);",
];

pub async fn initialize_database(db_path: Option<&str>) -> anyhow::Result<()> {
    let db_file = db_path.unwrap_or("target/db/catalog.db");
    if let Some(parent) = std::path::Path::new(db_file).parent() {
        std::fs::create_dir_all(parent)?;
    }
    let absolute_path = if std::path::Path::new(db_file).is_absolute() {
        std::path::PathBuf::from(db_file)
    } else {
        std::env::current_dir()?.join(db_file)
    };
    // Прямые слэши и корректный URL под Windows
    let normalized = absolute_path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    let db_url = format!("sqlite://{}{}?mode=rwc", prefix, normalized);
    let conn = Database::connect(&db_url).await?;

    ensure_schema(&conn).await?;
    tracing::info!("Database ready: {}", absolute_path.display());

    DB_CONN
        .set(conn)
        .map_err(|_| anyhow::anyhow!("Failed to set DB_CONN"))?;
    Ok(())
}

pub fn get_connection() -> anyhow::Result<&'static DatabaseConnection> {
    DB_CONN
        .get()
        .ok_or_else(|| anyhow::anyhow!("Database connection has not been initialized"))
}

/// Создать недостающие таблицы и индексы, включить внешние ключи.
///
/// Существующие таблицы не трогаются.
pub async fn ensure_schema<C: ConnectionTrait>(conn: &C) -> Result<(), sea_orm::DbErr> {
    execute(conn, "PRAGMA foreign_keys = ON;").await?;

    for (table, ddl) in TABLES {
        let check_sql = format!(
            "SELECT name FROM sqlite_master WHERE type='table' AND name='{}';",
            table
        );
        let existing = conn
            .query_all(Statement::from_string(DatabaseBackend::Sqlite, check_sql))
            .await?;

        if existing.is_empty() {
            tracing::info!("Creating {} table", table);
            execute(conn, ddl).await?;
        }
    }

    for sql in INDEXES {
        execute(conn, sql).await?;
    }

    Ok(())
}

async fn execute<C: ConnectionTrait>(conn: &C, sql: &str) -> Result<(), sea_orm::DbErr> {
    conn.execute(Statement::from_string(DatabaseBackend::Sqlite, sql.to_string()))
        .await?;
    Ok(())
}

/// Отдельная база в памяти с полной схемой, для тестов
#[cfg(test)]
pub async fn connect_in_memory() -> DatabaseConnection {
    let mut opts = sea_orm::ConnectOptions::new("sqlite::memory:".to_string());
    opts.max_connections(1).min_connections(1).sqlx_logging(false);
    let conn = Database::connect(opts)
        .await
        .expect("in-memory sqlite should open");
    ensure_schema(&conn).await.expect("schema should apply");
    conn
}
