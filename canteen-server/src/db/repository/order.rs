//! Order Repository
//!
//! Order placement is the only multi-row write in the system and runs in a
//! single transaction: the per-day sequence number is computed, every
//! requested line is validated against the live menu, then the order row and
//! its item rows are inserted. Any failure rolls the whole batch back.

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{MenuItem, Order, OrderDetail, OrderItemLine, OrderLineRequest, OrderStatus};
use crate::utils::time;
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            base: BaseRepository::new(pool),
        }
    }

    /// Place a multi-line order for a user.
    ///
    /// The daily sequence number is count-of-orders-today + 1, read inside
    /// the placement transaction. Two placements racing on the same day can
    /// still observe the same count; duplicate numbering is benign and
    /// matches the historical behavior of this service.
    pub async fn place(
        &self,
        user_id: i64,
        lines: &[OrderLineRequest],
    ) -> RepoResult<OrderDetail> {
        let mut tx = self.base.pool().begin().await?;

        let now = shared::util::now_millis();
        let day_start = time::day_start_millis(time::today_utc());

        let orders_today: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE created_at >= ?")
                .bind(day_start)
                .fetch_one(&mut *tx)
                .await?;
        let daily_order_id = orders_today + 1;

        // Validate every line against the live menu before writing anything.
        // The first invalid line aborts the whole order.
        let mut total_amount = 0.0_f64;
        let mut resolved: Vec<(i64, i64)> = Vec::with_capacity(lines.len());
        for line in lines {
            let menu_item_id = line.menu_item_id.ok_or_else(|| {
                RepoError::Validation("Order line is missing menu_item_id".to_string())
            })?;
            let quantity = line.quantity.unwrap_or(0);

            let item = sqlx::query_as::<_, MenuItem>(
                "SELECT id, name, price, is_available FROM menu_items WHERE id = ?",
            )
            .bind(menu_item_id)
            .fetch_optional(&mut *tx)
            .await?;

            let item = match item {
                Some(item) if item.is_available && quantity > 0 => item,
                _ => {
                    return Err(RepoError::Validation(format!(
                        "Item with id {} is invalid or unavailable",
                        menu_item_id
                    )));
                }
            };

            total_amount += item.price * quantity as f64;
            resolved.push((item.id, quantity));
        }

        let order_id: i64 = sqlx::query_scalar(
            r#"INSERT INTO orders (daily_order_id, user_id, total_amount, created_at, status)
               VALUES (?, ?, ?, ?, ?)
               RETURNING id"#,
        )
        .bind(daily_order_id)
        .bind(user_id)
        .bind(total_amount)
        .bind(now)
        .bind(OrderStatus::AwaitingApproval)
        .fetch_one(&mut *tx)
        .await?;

        for &(menu_item_id, quantity) in &resolved {
            sqlx::query("INSERT INTO order_items (order_id, menu_item_id, quantity) VALUES (?, ?, ?)")
                .bind(order_id)
                .bind(menu_item_id)
                .bind(quantity)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        tracing::info!(
            order_id = order_id,
            daily_order_id = daily_order_id,
            user_id = user_id,
            total_amount = total_amount,
            "Order placed"
        );

        self.find_detail(order_id)
            .await?
            .ok_or_else(|| RepoError::Database(format!("Order {} missing after insert", order_id)))
    }

    /// Find an order row by id
    pub async fn find_by_id(&self, id: i64) -> RepoResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(
            "SELECT id, daily_order_id, user_id, total_amount, created_at, status FROM orders WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.base.pool())
        .await?;
        Ok(order)
    }

    /// Find a fully serialized order (with item lines) by id
    pub async fn find_detail(&self, id: i64) -> RepoResult<Option<OrderDetail>> {
        match self.find_by_id(id).await? {
            None => Ok(None),
            Some(order) => {
                let items = self.item_lines(order.id).await?;
                Ok(Some(OrderDetail::from_parts(order, items)))
            }
        }
    }

    /// All orders of one user, newest first
    pub async fn find_for_user(&self, user_id: i64) -> RepoResult<Vec<OrderDetail>> {
        let orders = sqlx::query_as::<_, Order>(
            r#"SELECT id, daily_order_id, user_id, total_amount, created_at, status
               FROM orders WHERE user_id = ? ORDER BY created_at DESC, id DESC"#,
        )
        .bind(user_id)
        .fetch_all(self.base.pool())
        .await?;

        self.with_item_lines(orders).await
    }

    /// All orders across all users, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<OrderDetail>> {
        let orders = sqlx::query_as::<_, Order>(
            r#"SELECT id, daily_order_id, user_id, total_amount, created_at, status
               FROM orders ORDER BY created_at DESC, id DESC"#,
        )
        .fetch_all(self.base.pool())
        .await?;

        self.with_item_lines(orders).await
    }

    /// Overwrite an order's status (no transition graph)
    pub async fn set_status(&self, id: i64, status: OrderStatus) -> RepoResult<()> {
        let result = sqlx::query("UPDATE orders SET status = ? WHERE id = ?")
            .bind(status)
            .bind(id)
            .execute(self.base.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound(format!("Order {} not found", id)));
        }
        Ok(())
    }

    /// Item lines for one order, joined against the live menu items
    async fn item_lines(&self, order_id: i64) -> RepoResult<Vec<OrderItemLine>> {
        let lines = sqlx::query_as::<_, OrderItemLine>(
            r#"SELECT m.name AS menu_item_name, oi.quantity AS quantity, m.price AS price_per_item
               FROM order_items oi
               JOIN menu_items m ON m.id = oi.menu_item_id
               WHERE oi.order_id = ?
               ORDER BY oi.id"#,
        )
        .bind(order_id)
        .fetch_all(self.base.pool())
        .await?;
        Ok(lines)
    }

    async fn with_item_lines(&self, orders: Vec<Order>) -> RepoResult<Vec<OrderDetail>> {
        let mut details = Vec::with_capacity(orders.len());
        for order in orders {
            let items = self.item_lines(order.id).await?;
            details.push(OrderDetail::from_parts(order, items));
        }
        Ok(details)
    }
}
