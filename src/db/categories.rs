use crate::error::Result;
use crate::models::{Category, CategoryKind};

use super::Store;

/// Read-only view of the seeded categories.
#[derive(Clone)]
pub struct Categories {
    store: Store,
}

impl Categories {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn get_categories(&self) -> Result<Vec<Category>> {
        let categories = self
            .store
            .conn()
            .call(|conn| {
                let mut stmt = conn.prepare("SELECT name, type FROM categories ORDER BY name")?;
                let categories = stmt
                    .query_map([], |row| {
                        let kind: Option<String> = row.get(1)?;
                        Ok(Category {
                            name: row.get::<_, Option<String>>(0)?.unwrap_or_default(),
                            kind: CategoryKind::from_db(kind.as_deref().unwrap_or_default()),
                        })
                    })?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(categories)
            })
            .await?;
        Ok(categories)
    }
}
