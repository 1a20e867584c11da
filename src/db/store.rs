use std::path::Path;

use rusqlite::params;
use tokio_rusqlite::Connection;

use crate::error::Result;

use super::schema::{
    COPY_LEGACY_INCOME, DELETE_LEGACY_INCOME, LEGACY_INCOME_CATEGORY, SCHEMA, SCHEMA_VERSION,
    SEED_CATEGORIES,
};

/// Handle to the finance database. Cloning is cheap and every clone talks to
/// the same underlying connection, so writes are visible to later reads.
#[derive(Clone)]
pub struct Store {
    conn: Connection,
}

impl Store {
    pub async fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(db_path.as_ref()).await?;
        Self::initialize(conn).await
    }

    #[cfg(test)]
    pub async fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().await?;
        Self::initialize(conn).await
    }

    /// Creates missing tables and seed rows. Safe to run on every launch.
    async fn initialize(conn: Connection) -> Result<Self> {
        conn.call(|conn| {
            conn.execute_batch(SCHEMA)?;
            conn.execute_batch(SEED_CATEGORIES)?;

            let version: i64 =
                conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
            if version < SCHEMA_VERSION {
                let tx = conn.transaction()?;
                let moved = tx.execute(COPY_LEGACY_INCOME, params![LEGACY_INCOME_CATEGORY])?;
                tx.execute(DELETE_LEGACY_INCOME, params![LEGACY_INCOME_CATEGORY])?;
                tx.pragma_update(None, "user_version", SCHEMA_VERSION)?;
                tx.commit()?;
                if moved > 0 {
                    tracing::info!("Moved {} legacy income rows out of budgets", moved);
                }
            }
            Ok(())
        })
        .await?;

        tracing::debug!("Database schema ready (version {})", SCHEMA_VERSION);
        Ok(Self { conn })
    }

    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }
}
