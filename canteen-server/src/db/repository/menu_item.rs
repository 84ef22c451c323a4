//! Menu Item Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{MenuItem, MenuItemUpdate};
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct MenuItemRepository {
    base: BaseRepository,
}

impl MenuItemRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            base: BaseRepository::new(pool),
        }
    }

    /// Find all menu items, including unavailable ones
    pub async fn find_all(&self) -> RepoResult<Vec<MenuItem>> {
        let items = sqlx::query_as::<_, MenuItem>(
            "SELECT id, name, price, is_available FROM menu_items ORDER BY id",
        )
        .fetch_all(self.base.pool())
        .await?;
        Ok(items)
    }

    /// Find a menu item by id
    pub async fn find_by_id(&self, id: i64) -> RepoResult<Option<MenuItem>> {
        let item = sqlx::query_as::<_, MenuItem>(
            "SELECT id, name, price, is_available FROM menu_items WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.base.pool())
        .await?;
        Ok(item)
    }

    /// Create a new menu item
    pub async fn create(&self, name: &str, price: f64, is_available: bool) -> RepoResult<MenuItem> {
        let item = sqlx::query_as::<_, MenuItem>(
            r#"INSERT INTO menu_items (name, price, is_available)
               VALUES (?, ?, ?)
               RETURNING id, name, price, is_available"#,
        )
        .bind(name)
        .bind(price)
        .bind(is_available)
        .fetch_one(self.base.pool())
        .await?;
        Ok(item)
    }

    /// Partially update a menu item; omitted fields keep their previous value
    pub async fn update(&self, id: i64, data: MenuItemUpdate) -> RepoResult<MenuItem> {
        let item = sqlx::query_as::<_, MenuItem>(
            r#"UPDATE menu_items SET
                   name = COALESCE(?, name),
                   price = COALESCE(?, price),
                   is_available = COALESCE(?, is_available)
               WHERE id = ?
               RETURNING id, name, price, is_available"#,
        )
        .bind(data.name)
        .bind(data.price)
        .bind(data.is_available)
        .bind(id)
        .fetch_optional(self.base.pool())
        .await?;

        item.ok_or_else(|| RepoError::NotFound(format!("Menu item {} not found", id)))
    }

    /// Soft delete: mark the item unavailable, never remove the row
    pub async fn mark_unavailable(&self, id: i64) -> RepoResult<()> {
        let result = sqlx::query("UPDATE menu_items SET is_available = 0 WHERE id = ?")
            .bind(id)
            .execute(self.base.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound(format!("Menu item {} not found", id)));
        }
        Ok(())
    }
}
