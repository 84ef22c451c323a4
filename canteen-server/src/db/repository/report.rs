//! Sales Report Repository
//!
//! Aggregation queries over completed orders for the admin sales report.
//! Callers pass a half-open `[start, end)` range in unix millis; date
//! parsing and day-boundary math live in the handler layer.

use super::{BaseRepository, RepoResult};
use crate::db::models::OrderStatus;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

/// One row of the per-item quantity breakdown
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ItemBreakdown {
    pub name: String,
    pub quantity: i64,
}

#[derive(Clone)]
pub struct ReportRepository {
    base: BaseRepository,
}

impl ReportRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            base: BaseRepository::new(pool),
        }
    }

    /// Revenue and order count over completed orders in `[start, end)`
    pub async fn sales_summary(&self, start: i64, end: i64) -> RepoResult<(f64, i64)> {
        let row: (f64, i64) = sqlx::query_as(
            r#"SELECT COALESCE(SUM(total_amount), 0.0), COUNT(*)
               FROM orders
               WHERE status = ? AND created_at >= ? AND created_at < ?"#,
        )
        .bind(OrderStatus::Completed)
        .bind(start)
        .bind(end)
        .fetch_one(self.base.pool())
        .await?;
        Ok(row)
    }

    /// Quantity sold per menu item name over completed orders in `[start, end)`,
    /// sorted descending by quantity
    pub async fn item_breakdown(&self, start: i64, end: i64) -> RepoResult<Vec<ItemBreakdown>> {
        let rows = sqlx::query_as::<_, ItemBreakdown>(
            r#"SELECT m.name AS name, SUM(oi.quantity) AS quantity
               FROM order_items oi
               JOIN orders o ON o.id = oi.order_id
               JOIN menu_items m ON m.id = oi.menu_item_id
               WHERE o.status = ? AND o.created_at >= ? AND o.created_at < ?
               GROUP BY m.name
               ORDER BY quantity DESC"#,
        )
        .bind(OrderStatus::Completed)
        .bind(start)
        .bind(end)
        .fetch_all(self.base.pool())
        .await?;
        Ok(rows)
    }
}
