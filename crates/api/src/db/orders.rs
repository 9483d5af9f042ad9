//! Order repository.
//!
//! Online orders are deduplicated at the storage level: a partial unique
//! index on `stripe_payment_intent_id` makes the insert itself the
//! idempotency check, so the webhook and the browser redirect can race
//! freely and exactly one order row survives.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use sqlx::PgPool;
use sqlx::types::Json;

use soundbeatx_core::{OrderId, OrderStatus, PaymentMethod, PaymentStatus};

use super::RepositoryError;
use crate::models::{Order, OrderDraft, OrderItem, ShippingAddress};

const ORDER_COLUMNS: &str = "id, user_id, items, shipping_address, subtotal, shipping, total, \
     payment_method, payment_status, order_status, \
     stripe_payment_intent_id, stripe_session_id, created_at, updated_at";

/// Aggregate numbers for the admin dashboard.
#[derive(Debug, Clone)]
pub struct OrderStats {
    pub total_orders: i64,
    pub total_revenue: Decimal,
    pub status_counts: BTreeMap<String, i64>,
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: String,
    user_id: String,
    items: Json<Vec<OrderItem>>,
    shipping_address: Json<ShippingAddress>,
    subtotal: Decimal,
    shipping: Decimal,
    total: Decimal,
    payment_method: String,
    payment_status: String,
    order_status: String,
    stripe_payment_intent_id: Option<String>,
    stripe_session_id: Option<String>,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = RepositoryError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let id = row
            .id
            .parse::<OrderId>()
            .map_err(|e| RepositoryError::DataCorruption(format!("order id: {e}")))?;
        let payment_method = row
            .payment_method
            .parse::<PaymentMethod>()
            .map_err(|e| RepositoryError::DataCorruption(format!("payment_method: {e}")))?;
        let payment_status = row
            .payment_status
            .parse::<PaymentStatus>()
            .map_err(|e| RepositoryError::DataCorruption(format!("payment_status: {e}")))?;
        let order_status = row
            .order_status
            .parse::<OrderStatus>()
            .map_err(|e| RepositoryError::DataCorruption(format!("order_status: {e}")))?;

        Ok(Self {
            id,
            user_id: row.user_id,
            items: row.items.0,
            shipping_address: row.shipping_address.0,
            subtotal: row.subtotal,
            shipping: row.shipping,
            total: row.total,
            payment_method,
            payment_status,
            order_status,
            stripe_payment_intent_id: row.stripe_payment_intent_id,
            stripe_session_id: row.stripe_session_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Repository for order persistence.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new order unconditionally. Used for COD checkouts, which
    /// have no payment intent to deduplicate on.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` on database failure.
    pub async fn create(&self, draft: &OrderDraft) -> Result<Order, RepositoryError> {
        let id = OrderId::generate();
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "INSERT INTO orders \
             (id, user_id, items, shipping_address, subtotal, shipping, total, \
              payment_method, payment_status, order_status, \
              stripe_payment_intent_id, stripe_session_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(id.as_str())
        .bind(&draft.user_id)
        .bind(Json(&draft.items))
        .bind(Json(&draft.shipping_address))
        .bind(draft.subtotal)
        .bind(draft.shipping)
        .bind(draft.total)
        .bind(draft.payment_method.to_string())
        .bind(draft.payment_status.to_string())
        .bind(OrderStatus::default().to_string())
        .bind(draft.stripe_payment_intent_id.as_deref())
        .bind(draft.stripe_session_id.as_deref())
        .fetch_one(self.pool)
        .await?;

        row.try_into()
    }

    /// Insert an online order, treating a payment-intent collision as
    /// success. Returns the order plus whether this call created it.
    ///
    /// The insert carries `ON CONFLICT ... DO NOTHING`; when another writer
    /// won the race the insert returns no row and the existing order is
    /// fetched instead.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` on database failure, or `DataCorruption`
    /// if the conflict row vanished between insert and fetch.
    pub async fn create_idempotent(
        &self,
        draft: &OrderDraft,
    ) -> Result<(Order, bool), RepositoryError> {
        let id = OrderId::generate();
        let inserted = sqlx::query_as::<_, OrderRow>(&format!(
            "INSERT INTO orders \
             (id, user_id, items, shipping_address, subtotal, shipping, total, \
              payment_method, payment_status, order_status, \
              stripe_payment_intent_id, stripe_session_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             ON CONFLICT (stripe_payment_intent_id) \
               WHERE stripe_payment_intent_id IS NOT NULL \
             DO NOTHING \
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(id.as_str())
        .bind(&draft.user_id)
        .bind(Json(&draft.items))
        .bind(Json(&draft.shipping_address))
        .bind(draft.subtotal)
        .bind(draft.shipping)
        .bind(draft.total)
        .bind(draft.payment_method.to_string())
        .bind(draft.payment_status.to_string())
        .bind(OrderStatus::default().to_string())
        .bind(draft.stripe_payment_intent_id.as_deref())
        .bind(draft.stripe_session_id.as_deref())
        .fetch_optional(self.pool)
        .await?;

        if let Some(row) = inserted {
            return Ok((row.try_into()?, true));
        }

        let intent_id = draft.stripe_payment_intent_id.as_deref().ok_or_else(|| {
            RepositoryError::DataCorruption(
                "insert without payment intent returned no row".to_string(),
            )
        })?;
        let existing = self
            .find_by_payment_intent(intent_id)
            .await?
            .ok_or_else(|| {
                RepositoryError::DataCorruption(format!(
                    "conflicting order for intent {intent_id} not found"
                ))
            })?;
        Ok((existing, false))
    }

    /// # Errors
    ///
    /// Returns `RepositoryError` on database failure.
    pub async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
        ))
        .bind(id.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(Order::try_from).transpose()
    }

    /// # Errors
    ///
    /// Returns `RepositoryError` on database failure.
    pub async fn find_by_payment_intent(
        &self,
        intent_id: &str,
    ) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE stripe_payment_intent_id = $1"
        ))
        .bind(intent_id)
        .fetch_optional(self.pool)
        .await?;

        row.map(Order::try_from).transpose()
    }

    /// All orders for a buyer, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` on database failure.
    pub async fn list_by_user(&self, user_id: &str) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Order::try_from).collect()
    }

    /// Paginated order listing for the admin panel, optionally filtered by
    /// status. Returns the page plus the total matching count.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` on database failure.
    pub async fn list(
        &self,
        status: Option<OrderStatus>,
        page: i64,
        limit: i64,
    ) -> Result<(Vec<Order>, i64), RepositoryError> {
        let status = status.map(|s| s.to_string());
        let offset = (page - 1) * limit;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM orders WHERE ($1::text IS NULL OR order_status = $1)",
        )
        .bind(status.as_deref())
        .fetch_one(self.pool)
        .await?;

        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders \
             WHERE ($1::text IS NULL OR order_status = $1) \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3"
        ))
        .bind(status.as_deref())
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        let orders = rows
            .into_iter()
            .map(Order::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((orders, total))
    }

    /// Update order and/or payment status. `None` keeps the current value.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist.
    pub async fn update_status(
        &self,
        id: &OrderId,
        order_status: Option<OrderStatus>,
        payment_status: Option<PaymentStatus>,
    ) -> Result<Order, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "UPDATE orders SET \
               order_status = COALESCE($2, order_status), \
               payment_status = COALESCE($3, payment_status), \
               updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(id.as_str())
        .bind(order_status.map(|s| s.to_string()))
        .bind(payment_status.map(|s| s.to_string()))
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }

    /// Delete an order. Returns whether a row was removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` on database failure.
    pub async fn delete(&self, id: &OrderId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id.as_str())
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Dashboard aggregates: order count, gross revenue, counts per status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` on database failure.
    pub async fn stats(&self) -> Result<OrderStats, RepositoryError> {
        let (total_orders, total_revenue): (i64, Decimal) = sqlx::query_as(
            "SELECT COUNT(*), COALESCE(SUM(total), 0)::numeric FROM orders",
        )
        .fetch_one(self.pool)
        .await?;

        let counts: Vec<(String, i64)> =
            sqlx::query_as("SELECT order_status, COUNT(*) FROM orders GROUP BY order_status")
                .fetch_all(self.pool)
                .await?;

        Ok(OrderStats {
            total_orders,
            total_revenue,
            status_counts: counts.into_iter().collect(),
        })
    }
}
