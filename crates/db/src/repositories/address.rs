//! Address repository for database operations.

use invoicer_shared::AppError;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use serde::Deserialize;
use uuid::Uuid;

use super::{patch, required_text};
use crate::entities::{addresses, companies, sea_orm_active_enums::AddressType};

/// Error types for address operations.
#[derive(Debug, thiserror::Error)]
pub enum AddressError {
    /// Address not found.
    #[error("Address not found: {0}")]
    NotFound(Uuid),

    /// Owning company not found.
    #[error("Company not found: {0}")]
    CompanyNotFound(Uuid),

    /// Update request matched the stored address exactly.
    #[error("No changes detected")]
    NoChanges,

    /// Invalid request data.
    #[error("{0}")]
    Validation(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<AddressError> for AppError {
    fn from(err: AddressError) -> Self {
        match err {
            AddressError::NotFound(_) | AddressError::CompanyNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            AddressError::NoChanges => Self::Conflict(err.to_string()),
            AddressError::Validation(msg) => Self::Validation(msg),
            AddressError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for creating an address.
#[derive(Debug, Clone, Deserialize)]
#[allow(missing_docs)]
pub struct CreateAddressInput {
    pub company_id: Uuid,
    /// One of `main`, `billing`, `shipping`, `office`, `other`.
    pub address_type: String,
    pub street: String,
    pub city: String,
    pub state_province: Option<String>,
    pub postal_code: Option<String>,
    pub country: String,
}

/// Partial update for an address.
#[derive(Debug, Clone, Default, Deserialize)]
#[allow(missing_docs)]
pub struct UpdateAddressInput {
    pub address_type: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state_province: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

fn parse_type(value: &str) -> Result<AddressType, AddressError> {
    AddressType::parse(value)
        .ok_or_else(|| AddressError::Validation(format!("Invalid address type: {value}")))
}

fn optional_text(field: &str, value: Option<String>) -> Result<Option<String>, AddressError> {
    value
        .as_deref()
        .map(|v| required_text(field, v))
        .transpose()
        .map_err(AddressError::Validation)
}

/// Address repository.
#[derive(Debug, Clone)]
pub struct AddressRepository {
    db: DatabaseConnection,
}

impl AddressRepository {
    /// Creates a new address repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists addresses, optionally restricted to one company.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, company_id: Option<Uuid>) -> Result<Vec<addresses::Model>, DbErr> {
        let mut query = addresses::Entity::find();
        if let Some(company_id) = company_id {
            query = query.filter(addresses::Column::CompanyId.eq(company_id));
        }
        query
            .order_by_asc(addresses::Column::CreatedAt)
            .order_by_asc(addresses::Column::Id)
            .all(&self.db)
            .await
    }

    /// Gets an address by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no address has this ID.
    pub async fn get(&self, id: Uuid) -> Result<addresses::Model, AddressError> {
        addresses::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AddressError::NotFound(id))
    }

    /// Creates an address for an existing company.
    ///
    /// # Errors
    ///
    /// Returns `CompanyNotFound` for an unknown company and `Validation` for
    /// blank fields or an unknown address type.
    pub async fn create(&self, input: CreateAddressInput) -> Result<addresses::Model, AddressError> {
        let address_type = parse_type(&input.address_type)?;
        let street = required_text("street", &input.street).map_err(AddressError::Validation)?;
        let city = required_text("city", &input.city).map_err(AddressError::Validation)?;
        let country = required_text("country", &input.country).map_err(AddressError::Validation)?;

        companies::Entity::find_by_id(input.company_id)
            .one(&self.db)
            .await?
            .ok_or(AddressError::CompanyNotFound(input.company_id))?;

        let now = chrono::Utc::now().into();
        let address = addresses::ActiveModel {
            id: Set(Uuid::now_v7()),
            company_id: Set(input.company_id),
            address_type: Set(address_type),
            street: Set(street),
            city: Set(city),
            state_province: Set(input.state_province),
            postal_code: Set(input.postal_code),
            country: Set(country),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(address.insert(&self.db).await?)
    }

    /// Updates an address.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown ID and `NoChanges` when the update
    /// would not modify the stored row.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateAddressInput,
    ) -> Result<addresses::Model, AddressError> {
        let address_type = input.address_type.as_deref().map(parse_type).transpose()?;
        let street = optional_text("street", input.street)?;
        let city = optional_text("city", input.city)?;
        let country = optional_text("country", input.country)?;

        let txn = self.db.begin().await?;

        let existing = addresses::Entity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(AddressError::NotFound(id))?;

        let mut address: addresses::ActiveModel = existing.into();
        patch(&mut address.address_type, address_type);
        patch(&mut address.street, street);
        patch(&mut address.city, city);
        patch(&mut address.state_province, input.state_province.map(Some));
        patch(&mut address.postal_code, input.postal_code.map(Some));
        patch(&mut address.country, country);

        if !address.is_changed() {
            return Err(AddressError::NoChanges);
        }

        address.updated_at = Set(chrono::Utc::now().into());
        let updated = address.update(&txn).await?;
        txn.commit().await?;

        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_type_rejects_unknown() {
        assert_eq!(parse_type("Billing").unwrap(), AddressType::Billing);
        let err = parse_type("warehouse").unwrap_err();
        assert_eq!(err.to_string(), "Invalid address type: warehouse");
    }

    #[test]
    fn test_optional_text() {
        assert_eq!(optional_text("city", None).unwrap(), None);
        assert_eq!(
            optional_text("city", Some(" Jakarta ".into())).unwrap(),
            Some("Jakarta".into())
        );
        assert!(matches!(
            optional_text("city", Some(String::new())),
            Err(AddressError::Validation(_))
        ));
    }

    #[test]
    fn test_company_not_found_maps_to_404() {
        let err: AppError = AddressError::CompanyNotFound(Uuid::nil()).into();
        assert_eq!(err.status_code(), 404);
    }
}
