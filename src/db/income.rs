use rusqlite::params;

use crate::error::Result;
use crate::models::Income;

use super::Store;

#[derive(Clone)]
pub struct Incomes {
    store: Store,
}

impl Incomes {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn add(&self, amount: f64, received_on: &str) -> Result<i64> {
        let received_on = received_on.to_owned();
        let id = self
            .store
            .conn()
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO income (amount, received_on) VALUES (?1, ?2)",
                    params![amount, received_on],
                )?;
                Ok(conn.last_insert_rowid())
            })
            .await?;
        tracing::debug!("Recorded income {}", id);
        Ok(id)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.store
            .conn()
            .call(move |conn| {
                conn.execute("DELETE FROM income WHERE id = ?1", params![id])?;
                Ok(())
            })
            .await?;
        Ok(())
    }

    pub async fn get(&self) -> Result<Vec<Income>> {
        let income = self
            .store
            .conn()
            .call(|conn| {
                let mut stmt =
                    conn.prepare("SELECT id, amount, received_on FROM income ORDER BY id")?;
                let income = stmt
                    .query_map([], |row| {
                        Ok(Income {
                            id: row.get(0)?,
                            amount: row.get(1)?,
                            received_on: row.get(2)?,
                        })
                    })?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(income)
            })
            .await?;
        Ok(income)
    }

    pub async fn total(&self) -> Result<f64> {
        let total = self
            .store
            .conn()
            .call(|conn| {
                Ok(conn.query_row("SELECT COALESCE(SUM(amount), 0.0) FROM income", [], |row| {
                    row.get::<_, f64>(0)
                })?)
            })
            .await?;
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn total_sums_every_entry() {
        let dao = Incomes::new(Store::open_in_memory().await.expect("open store"));
        assert_eq!(dao.total().await.expect("empty total"), 0.0);

        dao.add(2500.0, "2024-06-01").await.expect("add");
        let bonus = dao.add(400.0, "2024-06-15").await.expect("add");
        assert_eq!(dao.total().await.expect("total"), 2900.0);

        dao.delete(bonus).await.expect("delete");
        let rows = dao.get().await.expect("get");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].received_on, "2024-06-01");
        assert_eq!(dao.total().await.expect("total"), 2500.0);
    }

    #[tokio::test]
    async fn income_does_not_show_up_as_a_budget() {
        let store = Store::open_in_memory().await.expect("open store");
        Incomes::new(store.clone()).add(100.0, "2024-01-01").await.expect("add");

        let budgets = crate::db::Budgets::new(store).get_budgets().await.expect("budgets");
        assert!(budgets.is_empty());
    }
}
