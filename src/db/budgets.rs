use rusqlite::{params, OptionalExtension};

use crate::error::Result;
use crate::models::Budget;

use super::Store;

#[derive(Clone)]
pub struct Budgets {
    store: Store,
}

impl Budgets {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn add(&self, category: &str, amount: f64) -> Result<i64> {
        let category = category.to_owned();
        let id = self
            .store
            .conn()
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO budgets (category, amount) VALUES (?1, ?2)",
                    params![category, amount],
                )?;
                Ok(conn.last_insert_rowid())
            })
            .await?;
        Ok(id)
    }

    /// Deletes every budget row for `category`.
    pub async fn delete(&self, category: &str) -> Result<()> {
        let category = category.to_owned();
        let affected = self
            .store
            .conn()
            .call(move |conn| {
                Ok(conn.execute("DELETE FROM budgets WHERE category = ?1", params![category])?)
            })
            .await?;
        tracing::debug!("Deleted {} budget row(s)", affected);
        Ok(())
    }

    /// Sets the amount on every budget row for `category`.
    pub async fn update(&self, category: &str, amount: f64) -> Result<()> {
        let category = category.to_owned();
        let affected = self
            .store
            .conn()
            .call(move |conn| {
                Ok(conn.execute(
                    "UPDATE budgets SET amount = ?1 WHERE category = ?2",
                    params![amount, category],
                )?)
            })
            .await?;
        tracing::debug!("Updated {} budget row(s)", affected);
        Ok(())
    }

    pub async fn get_budgets(&self) -> Result<Vec<Budget>> {
        let budgets = self
            .store
            .conn()
            .call(|conn| {
                let mut stmt = conn.prepare("SELECT category, amount FROM budgets ORDER BY id")?;
                let budgets = stmt
                    .query_map([], |row| {
                        Ok(Budget {
                            category: row.get::<_, Option<String>>(0)?.unwrap_or_default(),
                            amount: row.get::<_, Option<f64>>(1)?.unwrap_or(0.0),
                        })
                    })?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(budgets)
            })
            .await?;
        Ok(budgets)
    }

    /// Budget for `category` minus everything spent in it.
    ///
    /// Categories are not unique in `budgets`; when several rows share one,
    /// the row with the lowest id is the budget. A missing budget or missing
    /// expenses count as zero.
    pub async fn get_remaining_amount(&self, category: &str) -> Result<f64> {
        let category = category.to_owned();
        let remaining = self
            .store
            .conn()
            .call(move |conn| {
                let budget: f64 = conn
                    .query_row(
                        "SELECT amount FROM budgets WHERE category = ?1 ORDER BY id LIMIT 1",
                        params![category],
                        |row| row.get::<_, Option<f64>>(0),
                    )
                    .optional()?
                    .flatten()
                    .unwrap_or(0.0);

                let spent: f64 = conn
                    .query_row(
                        "SELECT SUM(amount) FROM expenses WHERE category = ?1",
                        params![category],
                        |row| row.get::<_, Option<f64>>(0),
                    )?
                    .unwrap_or(0.0);

                Ok(budget - spent)
            })
            .await?;
        Ok(remaining)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Expenses;

    async fn daos() -> (Budgets, Expenses) {
        let store = Store::open_in_memory().await.expect("open store");
        (Budgets::new(store.clone()), Expenses::new(store))
    }

    #[tokio::test]
    async fn remaining_is_budget_minus_spent() {
        let (budgets, expenses) = daos().await;
        expenses.add("Groceries", 50.0, "2024-01-01").await.expect("add");
        expenses.add("Groceries", 25.0, "2024-01-02").await.expect("add");
        budgets.add("Groceries", 100.0).await.expect("add budget");

        let remaining = budgets.get_remaining_amount("Groceries").await.expect("remaining");
        assert_eq!(remaining, 25.0);
    }

    #[tokio::test]
    async fn remaining_ignores_other_categories() {
        let (budgets, expenses) = daos().await;
        budgets.add("Fun", 40.0).await.expect("add budget");
        expenses.add("Groceries", 10.0, "2024-01-01").await.expect("add");

        assert_eq!(budgets.get_remaining_amount("Fun").await.expect("remaining"), 40.0);
    }

    #[tokio::test]
    async fn remaining_is_zero_when_nothing_exists() {
        let (budgets, _) = daos().await;
        assert_eq!(budgets.get_remaining_amount("Travel").await.expect("remaining"), 0.0);
    }

    #[tokio::test]
    async fn remaining_without_budget_is_negated_spend() {
        let (budgets, expenses) = daos().await;
        expenses.add("Travel", 120.5, "2024-05-01").await.expect("add");

        assert_eq!(budgets.get_remaining_amount("Travel").await.expect("remaining"), -120.5);
    }

    #[tokio::test]
    async fn first_budget_row_wins_for_duplicate_categories() {
        let (budgets, expenses) = daos().await;
        budgets.add("Groceries", 100.0).await.expect("first");
        budgets.add("Groceries", 500.0).await.expect("second");
        expenses.add("Groceries", 30.0, "2024-01-01").await.expect("add");

        assert_eq!(budgets.get_remaining_amount("Groceries").await.expect("remaining"), 70.0);
    }

    #[tokio::test]
    async fn update_and_delete_touch_every_matching_row() {
        let (budgets, _) = daos().await;
        budgets.add("Groceries", 100.0).await.expect("add");
        budgets.add("Groceries", 200.0).await.expect("add");
        budgets.add("Fuel", 60.0).await.expect("add");

        budgets.update("Groceries", 150.0).await.expect("update");
        let amounts: Vec<_> = budgets
            .get_budgets()
            .await
            .expect("get")
            .into_iter()
            .map(|b| (b.category, b.amount))
            .collect();
        assert_eq!(
            amounts,
            [
                ("Groceries".to_string(), 150.0),
                ("Groceries".to_string(), 150.0),
                ("Fuel".to_string(), 60.0),
            ]
        );

        budgets.delete("Groceries").await.expect("delete");
        budgets.delete("Nothing").await.expect("missing delete");
        let left = budgets.get_budgets().await.expect("get");
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].category, "Fuel");
    }
}
