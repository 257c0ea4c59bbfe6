//! Catalog item repository.

use invoicer_shared::AppError;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use serde::Deserialize;
use uuid::Uuid;

use super::{patch, required_text};
use crate::entities::items;

/// Error types for item operations.
#[derive(Debug, thiserror::Error)]
pub enum ItemError {
    /// Item not found.
    #[error("Item not found: {0}")]
    NotFound(Uuid),

    /// Update request matched the stored item exactly.
    #[error("No changes detected")]
    NoChanges,

    /// Invalid request data.
    #[error("{0}")]
    Validation(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<ItemError> for AppError {
    fn from(err: ItemError) -> Self {
        match err {
            ItemError::NotFound(_) => Self::NotFound(err.to_string()),
            ItemError::NoChanges => Self::Conflict(err.to_string()),
            ItemError::Validation(msg) => Self::Validation(msg),
            ItemError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Query filters for listing items.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemFilter {
    /// Exact item type.
    #[serde(rename = "type")]
    pub item_type: Option<String>,
    /// Inclusive lower price bound.
    pub min_price: Option<Decimal>,
    /// Inclusive upper price bound.
    pub max_price: Option<Decimal>,
}

/// Input for creating an item.
#[derive(Debug, Clone, Deserialize)]
#[allow(missing_docs)]
pub struct CreateItemInput {
    pub name: String,
    pub description: Option<String>,
    pub unit_price: Decimal,
    #[serde(alias = "type")]
    pub item_type: String,
    #[serde(default)]
    pub stock: i32,
}

/// Partial update for an item.
#[derive(Debug, Clone, Default, Deserialize)]
#[allow(missing_docs)]
pub struct UpdateItemInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub unit_price: Option<Decimal>,
    #[serde(alias = "type")]
    pub item_type: Option<String>,
    pub stock: Option<i32>,
}

fn check_price(price: Decimal) -> Result<Decimal, ItemError> {
    if price < Decimal::ZERO {
        return Err(ItemError::Validation("unit_price must not be negative".into()));
    }
    Ok(price)
}

fn check_stock(stock: i32) -> Result<i32, ItemError> {
    if stock < 0 {
        return Err(ItemError::Validation("stock must not be negative".into()));
    }
    Ok(stock)
}

/// Item repository.
#[derive(Debug, Clone)]
pub struct ItemRepository {
    db: DatabaseConnection,
}

impl ItemRepository {
    /// Creates a new item repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists items matching the filter, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, filter: &ItemFilter) -> Result<Vec<items::Model>, DbErr> {
        let mut query = items::Entity::find();

        if let Some(item_type) = &filter.item_type {
            query = query.filter(items::Column::ItemType.eq(item_type.as_str()));
        }
        if let Some(min) = filter.min_price {
            query = query.filter(items::Column::UnitPrice.gte(min));
        }
        if let Some(max) = filter.max_price {
            query = query.filter(items::Column::UnitPrice.lte(max));
        }

        query
            .order_by_asc(items::Column::Name)
            .order_by_asc(items::Column::Id)
            .all(&self.db)
            .await
    }

    /// Gets an item by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no item has this ID.
    pub async fn get(&self, id: Uuid) -> Result<items::Model, ItemError> {
        items::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(ItemError::NotFound(id))
    }

    /// Creates a catalog item.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for a blank name or type, a negative price or
    /// negative stock.
    pub async fn create(&self, input: CreateItemInput) -> Result<items::Model, ItemError> {
        let name = required_text("name", &input.name).map_err(ItemError::Validation)?;
        let item_type = required_text("type", &input.item_type).map_err(ItemError::Validation)?;
        let unit_price = check_price(input.unit_price)?;
        let stock = check_stock(input.stock)?;

        let now = chrono::Utc::now().into();
        let item = items::ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(name),
            description: Set(input.description),
            unit_price: Set(unit_price),
            item_type: Set(item_type),
            stock: Set(stock),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(item.insert(&self.db).await?)
    }

    /// Updates an item.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown ID and `NoChanges` when nothing
    /// would change.
    pub async fn update(&self, id: Uuid, input: UpdateItemInput) -> Result<items::Model, ItemError> {
        let name = input
            .name
            .as_deref()
            .map(|v| required_text("name", v))
            .transpose()
            .map_err(ItemError::Validation)?;
        let item_type = input
            .item_type
            .as_deref()
            .map(|v| required_text("type", v))
            .transpose()
            .map_err(ItemError::Validation)?;
        let unit_price = input.unit_price.map(check_price).transpose()?;
        let stock = input.stock.map(check_stock).transpose()?;

        let txn = self.db.begin().await?;

        let existing = items::Entity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(ItemError::NotFound(id))?;

        let mut item: items::ActiveModel = existing.into();
        patch(&mut item.name, name);
        patch(&mut item.description, input.description.map(Some));
        patch(&mut item.unit_price, unit_price);
        patch(&mut item.item_type, item_type);
        patch(&mut item.stock, stock);

        if !item.is_changed() {
            return Err(ItemError::NoChanges);
        }

        item.updated_at = Set(chrono::Utc::now().into());
        let updated = item.update(&txn).await?;
        txn.commit().await?;

        Ok(updated)
    }
}
