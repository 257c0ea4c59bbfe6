//! Company repository for database operations.

use invoicer_shared::AppError;
use invoicer_shared::types::{PageRequest, PageResponse};
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use serde::Deserialize;
use uuid::Uuid;

use super::{patch, required_text};
use crate::entities::companies;

/// Error types for company operations.
#[derive(Debug, thiserror::Error)]
pub enum CompanyError {
    /// Company not found.
    #[error("Company not found: {0}")]
    NotFound(Uuid),

    /// Update request matched the stored company exactly.
    #[error("No changes detected")]
    NoChanges,

    /// Invalid request data.
    #[error("{0}")]
    Validation(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<CompanyError> for AppError {
    fn from(err: CompanyError) -> Self {
        match err {
            CompanyError::NotFound(_) => Self::NotFound(err.to_string()),
            CompanyError::NoChanges => Self::Conflict(err.to_string()),
            CompanyError::Validation(msg) => Self::Validation(msg),
            CompanyError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for creating a company.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCompanyInput {
    /// Display name.
    pub company_name: String,
    /// Primary contact.
    pub contact_person: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Whether the company buys from us.
    #[serde(default)]
    pub is_customer: bool,
    /// Whether the company sells to us.
    #[serde(default)]
    pub is_vendor: bool,
    /// Default billing address.
    pub default_billing_address_id: Option<Uuid>,
    /// Default shipping address.
    pub default_shipping_address_id: Option<Uuid>,
}

/// Partial update for a company. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[allow(missing_docs)]
pub struct UpdateCompanyInput {
    pub company_name: Option<String>,
    pub contact_person: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub is_customer: Option<bool>,
    pub is_vendor: Option<bool>,
    pub default_billing_address_id: Option<Uuid>,
    pub default_shipping_address_id: Option<Uuid>,
}

/// Company repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct CompanyRepository {
    db: DatabaseConnection,
}

impl CompanyRepository {
    /// Creates a new company repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists companies one page at a time, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        page: PageRequest,
    ) -> Result<PageResponse<companies::Model>, CompanyError> {
        let page = page.normalized();
        let total = companies::Entity::find().count(&self.db).await?;

        let data = companies::Entity::find()
            .order_by_asc(companies::Column::CompanyName)
            .order_by_asc(companies::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok(PageResponse::new(data, page, total))
    }

    /// Finds a company by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<companies::Model>, DbErr> {
        companies::Entity::find_by_id(id).one(&self.db).await
    }

    /// Gets a company by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no company has this ID.
    pub async fn get(&self, id: Uuid) -> Result<companies::Model, CompanyError> {
        self.find_by_id(id)
            .await?
            .ok_or(CompanyError::NotFound(id))
    }

    /// Creates a company.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank or the insert fails.
    pub async fn create(&self, input: CreateCompanyInput) -> Result<companies::Model, CompanyError> {
        let company_name =
            required_text("company_name", &input.company_name).map_err(CompanyError::Validation)?;
        let now = chrono::Utc::now().into();

        let company = companies::ActiveModel {
            id: Set(Uuid::now_v7()),
            company_name: Set(company_name),
            contact_person: Set(input.contact_person),
            email: Set(input.email),
            phone: Set(input.phone),
            is_customer: Set(input.is_customer),
            is_vendor: Set(input.is_vendor),
            default_billing_address_id: Set(input.default_billing_address_id),
            default_shipping_address_id: Set(input.default_shipping_address_id),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(company.insert(&self.db).await?)
    }

    /// Updates a company.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown ID and `NoChanges` when every given
    /// field already holds the requested value.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateCompanyInput,
    ) -> Result<companies::Model, CompanyError> {
        let company_name = input
            .company_name
            .as_deref()
            .map(|name| required_text("company_name", name))
            .transpose()
            .map_err(CompanyError::Validation)?;

        let txn = self.db.begin().await?;

        let existing = companies::Entity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(CompanyError::NotFound(id))?;

        let mut company: companies::ActiveModel = existing.into();
        patch(&mut company.company_name, company_name);
        patch(&mut company.contact_person, input.contact_person.map(Some));
        patch(&mut company.email, input.email.map(Some));
        patch(&mut company.phone, input.phone.map(Some));
        patch(&mut company.is_customer, input.is_customer);
        patch(&mut company.is_vendor, input.is_vendor);
        patch(
            &mut company.default_billing_address_id,
            input.default_billing_address_id.map(Some),
        );
        patch(
            &mut company.default_shipping_address_id,
            input.default_shipping_address_id.map(Some),
        );

        if !company.is_changed() {
            return Err(CompanyError::NoChanges);
        }

        company.updated_at = Set(chrono::Utc::now().into());
        let updated = company.update(&txn).await?;
        txn.commit().await?;

        Ok(updated)
    }
}
