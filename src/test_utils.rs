pub mod test_helpers {
    use axum::Router;
    use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
    use tempfile::NamedTempFile;
    use tower_sessions_sqlx_store::SqliteStore;

    use crate::{app::build_router, config::session::SessionConfig, services::password, AppState};

    /// Create a new in-memory SQLite database for testing
    pub async fn create_test_db() -> Result<SqlitePool, sqlx::Error> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(":memory:")
            .await?;

        // Run migrations
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(pool)
    }

    /// Create a temporary file-based SQLite database for testing
    /// Useful when you need to test features that don't work with in-memory databases
    pub async fn create_test_db_file() -> Result<(SqlitePool, NamedTempFile), sqlx::Error> {
        let temp_file = NamedTempFile::new().map_err(sqlx::Error::Io)?;
        let db_path = temp_file
            .path()
            .to_str()
            .ok_or_else(|| sqlx::Error::Configuration("Invalid database path".into()))?;
        let database_url = format!("sqlite://{}", db_path);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(&database_url)
            .await?;

        // Run migrations
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok((pool, temp_file))
    }

    /// Insert a test user with hashed password
    pub async fn insert_test_user(
        pool: &SqlitePool,
        email: &str,
        name: &str,
        password: &str,
    ) -> Result<i64, sqlx::Error> {
        let password_hash = password::hash_password(password).map_err(|e| {
            sqlx::Error::Configuration(format!("Password hashing failed: {}", e).into())
        })?;

        let result =
            sqlx::query("INSERT INTO users (email, name, password_hash) VALUES (?, ?, ?)")
                .bind(email)
                .bind(name)
                .bind(password_hash)
                .execute(pool)
                .await?;

        Ok(result.last_insert_rowid())
    }

    /// Build the full application router on `pool`, with the session table
    /// living in the same database.
    pub async fn create_test_app(pool: SqlitePool) -> Result<Router, sqlx::Error> {
        let session_store = SqliteStore::new(pool.clone())
            .with_table_name("sessions")
            .map_err(|e| sqlx::Error::Configuration(e.into()))?;
        session_store.migrate().await?;

        let session_layer = SessionConfig::from_env().create_layer(session_store);
        Ok(build_router(AppState::from_pool(pool), session_layer))
    }
}

// Shorthand for unit tests inside the crate
// Note: This is test-only code. Panic on error is acceptable in tests.
#[cfg(test)]
pub async fn create_test_pool() -> sqlx::SqlitePool {
    match test_helpers::create_test_db().await {
        Ok(pool) => pool,
        Err(e) => panic!("Failed to create test pool: {}", e),
    }
}

