//! Order repository.
//!
//! Creating an order reserves stock: every referenced item is locked,
//! checked and decremented inside the same transaction as the order insert.

use invoicer_core::invoicing::OrderRecord;
use invoicer_shared::AppError;
use invoicer_shared::types::money::round_currency;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::entities::{
    companies, items, order_items, orders, sea_orm_active_enums::OrderStatus,
};
use crate::ledger::order_record;

/// Error types for order operations.
#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    /// Order not found.
    #[error("Order not found: {0}")]
    NotFound(Uuid),

    /// Customer company not found.
    #[error("Company not found: {0}")]
    CompanyNotFound(Uuid),

    /// Ordered item not found.
    #[error("Item not found: {0}")]
    ItemNotFound(Uuid),

    /// Not enough stock to fill a line.
    #[error("Insufficient stock for item {item_id}: requested {requested}, available {available}")]
    InsufficientStock {
        /// Item ID.
        item_id: Uuid,
        /// Requested quantity.
        requested: Decimal,
        /// Stock on hand.
        available: i32,
    },

    /// Invalid request data.
    #[error("{0}")]
    Validation(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::NotFound(_)
            | OrderError::CompanyNotFound(_)
            | OrderError::ItemNotFound(_) => Self::NotFound(err.to_string()),
            OrderError::InsufficientStock { .. } => Self::Validation(err.to_string()),
            OrderError::Validation(msg) => Self::Validation(msg),
            OrderError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// One requested order line.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderLineInput {
    /// Catalog item.
    pub item_id: Uuid,
    /// Whole number of units.
    pub quantity: Decimal,
}

/// Input for creating an order.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrderInput {
    /// Ordering company.
    pub customer_company_id: Uuid,
    /// Requested lines, at least one.
    pub items: Vec<OrderLineInput>,
}

/// Converts a requested quantity into whole stock units.
fn whole_units(quantity: Decimal) -> Result<i32, OrderError> {
    if quantity <= Decimal::ZERO || !quantity.fract().is_zero() {
        return Err(OrderError::Validation(format!(
            "quantity must be a positive whole number, got {quantity}"
        )));
    }
    quantity
        .to_i32()
        .ok_or_else(|| OrderError::Validation(format!("quantity too large: {quantity}")))
}

/// Order repository.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    db: DatabaseConnection,
}

impl OrderRepository {
    /// Creates a new order repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists orders with their lines, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<OrderRecord>, OrderError> {
        let orders = orders::Entity::find()
            .order_by_desc(orders::Column::OrderDate)
            .all(&self.db)
            .await?;

        let mut records = Vec::with_capacity(orders.len());
        for order in orders {
            records.push(load_lines(&self.db, order).await?);
        }
        Ok(records)
    }

    /// Gets an order with its lines.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no order has this ID.
    pub async fn get(&self, id: Uuid) -> Result<OrderRecord, OrderError> {
        let order = orders::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(OrderError::NotFound(id))?;
        load_lines(&self.db, order).await
    }

    /// Places an order, reserving stock for each line.
    ///
    /// # Errors
    ///
    /// Returns `CompanyNotFound`/`ItemNotFound` for unknown references,
    /// `Validation` for an empty order or fractional quantity, and
    /// `InsufficientStock` when an item cannot cover the request. Nothing is
    /// written on error.
    pub async fn create(&self, input: CreateOrderInput) -> Result<OrderRecord, OrderError> {
        if input.items.is_empty() {
            return Err(OrderError::Validation(
                "order must contain at least one item".into(),
            ));
        }
        let units = input
            .items
            .iter()
            .map(|line| whole_units(line.quantity))
            .collect::<Result<Vec<_>, _>>()?;

        let txn = self.db.begin().await?;

        companies::Entity::find_by_id(input.customer_company_id)
            .one(&txn)
            .await?
            .ok_or(OrderError::CompanyNotFound(input.customer_company_id))?;

        let now = chrono::Utc::now().into();
        let order_id = Uuid::now_v7();
        let mut lines = Vec::with_capacity(input.items.len());
        let mut total = Decimal::ZERO;

        for (line, requested) in input.items.iter().zip(units) {
            let item = items::Entity::find_by_id(line.item_id)
                .lock_exclusive()
                .one(&txn)
                .await?
                .ok_or(OrderError::ItemNotFound(line.item_id))?;

            if item.stock < requested {
                return Err(OrderError::InsufficientStock {
                    item_id: item.id,
                    requested: line.quantity,
                    available: item.stock,
                });
            }

            let item_total = round_currency(item.unit_price * line.quantity);
            total += item_total;

            lines.push(order_items::ActiveModel {
                id: Set(Uuid::now_v7()),
                order_id: Set(order_id),
                item_id: Set(item.id),
                quantity: Set(line.quantity),
                unit_price: Set(item.unit_price),
                item_total: Set(item_total),
                created_at: Set(now),
            });

            let remaining = item.stock - requested;
            let mut stock: items::ActiveModel = item.into();
            stock.stock = Set(remaining);
            stock.updated_at = Set(now);
            stock.update(&txn).await?;
        }

        let order = orders::ActiveModel {
            id: Set(order_id),
            customer_company_id: Set(input.customer_company_id),
            order_date: Set(now),
            total_price: Set(round_currency(total)),
            status: Set(OrderStatus::Pending),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        for line in lines {
            line.insert(&txn).await?;
        }

        let record = load_lines(&txn, order).await?;
        txn.commit().await?;

        info!(
            order_id = %order_id,
            customer_company_id = %record.customer_company_id,
            lines = record.items.len(),
            total = %record.total_price,
            "Order placed"
        );
        Ok(record)
    }
}

async fn load_lines<C: ConnectionTrait>(
    conn: &C,
    order: orders::Model,
) -> Result<OrderRecord, OrderError> {
    let lines = order_items::Entity::find()
        .filter(order_items::Column::OrderId.eq(order.id))
        .find_also_related(items::Entity)
        .order_by_asc(order_items::Column::CreatedAt)
        .order_by_asc(order_items::Column::Id)
        .all(conn)
        .await?;
    Ok(order_record(order, lines))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(dec!(1), Some(1))]
    #[case(dec!(12.00), Some(12))]
    #[case(dec!(0), None)]
    #[case(dec!(-2), None)]
    #[case(dec!(1.5), None)]
    fn test_whole_units(#[case] quantity: Decimal, #[case] expected: Option<i32>) {
        assert_eq!(whole_units(quantity).ok(), expected);
    }

    #[test]
    fn test_insufficient_stock_is_invalid_input() {
        let err: AppError = OrderError::InsufficientStock {
            item_id: Uuid::nil(),
            requested: dec!(5),
            available: 2,
        }
        .into();
        assert_eq!(err.status_code(), 400);
        assert!(err.to_string().contains("Insufficient stock"));
    }
}
