use rusqlite::{params, Row};

use crate::error::Result;
use crate::models::{CategoryTotal, Expense};

use super::Store;

#[derive(Clone)]
pub struct Expenses {
    store: Store,
}

impl Expenses {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn add(&self, category: &str, amount: f64, date: &str) -> Result<i64> {
        let category = category.to_owned();
        let date = date.to_owned();
        let id = self
            .store
            .conn()
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO expenses (category, amount, date) VALUES (?1, ?2, ?3)",
                    params![category, amount, date],
                )?;
                Ok(conn.last_insert_rowid())
            })
            .await?;
        tracing::debug!("Added expense {}", id);
        Ok(id)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        let affected = self
            .store
            .conn()
            .call(move |conn| Ok(conn.execute("DELETE FROM expenses WHERE id = ?1", params![id])?))
            .await?;
        if affected == 0 {
            tracing::debug!("No expense with id {} to delete", id);
        }
        Ok(())
    }

    pub async fn update(&self, id: i64, category: &str, amount: f64, date: &str) -> Result<()> {
        let category = category.to_owned();
        let date = date.to_owned();
        let affected = self
            .store
            .conn()
            .call(move |conn| {
                Ok(conn.execute(
                    "UPDATE expenses SET category = ?1, amount = ?2, date = ?3 WHERE id = ?4",
                    params![category, amount, date, id],
                )?)
            })
            .await?;
        if affected == 0 {
            tracing::debug!("No expense with id {} to update", id);
        }
        Ok(())
    }

    pub async fn get(&self) -> Result<Vec<Expense>> {
        let expenses = self
            .store
            .conn()
            .call(|conn| {
                let mut stmt =
                    conn.prepare("SELECT id, category, amount, date FROM expenses ORDER BY id")?;
                let expenses = stmt
                    .query_map([], expense_from_row)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(expenses)
            })
            .await?;
        Ok(expenses)
    }

    pub async fn totals_by_category(&self) -> Result<Vec<CategoryTotal>> {
        let totals = self
            .store
            .conn()
            .call(|conn| {
                let mut stmt = conn.prepare(
                    r#"SELECT COALESCE(category, ''), COALESCE(SUM(amount), 0.0)
                       FROM expenses
                       GROUP BY category
                       ORDER BY category"#,
                )?;
                let totals = stmt
                    .query_map([], |row| {
                        Ok(CategoryTotal {
                            category: row.get(0)?,
                            total: row.get(1)?,
                        })
                    })?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(totals)
            })
            .await?;
        Ok(totals)
    }
}

// Columns are nullable in older databases, so every read tolerates NULL.
fn expense_from_row(row: &Row) -> rusqlite::Result<Expense> {
    Ok(Expense {
        id: row.get(0)?,
        category: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
        amount: row.get::<_, Option<f64>>(2)?.unwrap_or(0.0),
        date: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
    })
}
