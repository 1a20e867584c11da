use rusqlite::{ffi, params};

use crate::error::{AppError, Result};
use crate::models::Bill;

use super::Store;

#[derive(Clone)]
pub struct Bills {
    store: Store,
}

impl Bills {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Inserts a bill. Names are unique, so a second bill with the same name
    /// fails with [`AppError::DuplicateBill`] and the existing row is kept.
    pub async fn add(&self, name: &str, amount: f64) -> Result<i64> {
        let owned = name.to_owned();
        let inserted = self
            .store
            .conn()
            .call(move |conn| {
                match conn.execute(
                    "INSERT INTO bills (name, amount) VALUES (?1, ?2)",
                    params![owned, amount],
                ) {
                    Ok(_) => Ok(Some(conn.last_insert_rowid())),
                    Err(rusqlite::Error::SqliteFailure(err, _))
                        if err.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE =>
                    {
                        Ok(None)
                    }
                    Err(e) => Err(e.into()),
                }
            })
            .await?;

        match inserted {
            Some(id) => Ok(id),
            None => {
                tracing::warn!("Bill '{}' already exists", name);
                Err(AppError::DuplicateBill(name.to_owned()))
            }
        }
    }

    pub async fn delete(&self, name: &str) -> Result<()> {
        let name = name.to_owned();
        self.store
            .conn()
            .call(move |conn| {
                conn.execute("DELETE FROM bills WHERE name = ?1", params![name])?;
                Ok(())
            })
            .await?;
        Ok(())
    }

    pub async fn update(&self, name: &str, amount: f64) -> Result<()> {
        let name = name.to_owned();
        self.store
            .conn()
            .call(move |conn| {
                conn.execute(
                    "UPDATE bills SET amount = ?1 WHERE name = ?2",
                    params![amount, name],
                )?;
                Ok(())
            })
            .await?;
        Ok(())
    }

    pub async fn get_bills(&self) -> Result<Vec<Bill>> {
        let bills = self
            .store
            .conn()
            .call(|conn| {
                let mut stmt = conn.prepare("SELECT name, amount FROM bills ORDER BY id")?;
                let bills = stmt
                    .query_map([], |row| {
                        Ok(Bill {
                            name: row.get::<_, Option<String>>(0)?.unwrap_or_default(),
                            amount: row.get::<_, Option<f64>>(1)?.unwrap_or(0.0),
                        })
                    })?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(bills)
            })
            .await?;
        Ok(bills)
    }
}
