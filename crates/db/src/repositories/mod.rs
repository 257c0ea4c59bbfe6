//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod address;
pub mod company;
pub mod invoice;
pub mod item;
pub mod order;
pub mod payment;

pub use address::{AddressError, AddressRepository, CreateAddressInput, UpdateAddressInput};
pub use company::{CompanyError, CompanyRepository, CreateCompanyInput, UpdateCompanyInput};
pub use invoice::{
    CreateInvoiceInput, InvoiceError, InvoiceRepository, LineItemChange, LineItemInput,
    UpdateLineItemInput,
};
pub use item::{CreateItemInput, ItemError, ItemFilter, ItemRepository, UpdateItemInput};
pub use order::{CreateOrderInput, OrderError, OrderLineInput, OrderRepository};
pub use payment::{CreatePaymentInput, PaymentError, PaymentRepository};

use sea_orm::{ActiveValue, Value};

/// Sets `field` to `value` when a value is given and differs from the current one.
///
/// Leaves the field untouched otherwise, so `ActiveModelTrait::is_changed`
/// reports whether an update would modify anything.
pub(crate) fn patch<V>(field: &mut ActiveValue<V>, value: Option<V>)
where
    V: Into<Value> + PartialEq,
{
    let Some(value) = value else {
        return;
    };
    let same = matches!(field, ActiveValue::Set(current) | ActiveValue::Unchanged(current) if *current == value);
    if !same {
        *field = ActiveValue::Set(value);
    }
}

/// Trims a required text field, rejecting blank values.
pub(crate) fn required_text(field: &str, value: &str) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(format!("{field} is required"))
    } else {
        Ok(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_skips_equal_values() {
        let mut field = ActiveValue::Unchanged("Alpha Technologies".to_string());
        patch(&mut field, Some("Alpha Technologies".to_string()));
        assert!(matches!(field, ActiveValue::Unchanged(_)));

        patch(&mut field, None);
        assert!(matches!(field, ActiveValue::Unchanged(_)));

        patch(&mut field, Some("Alpha Tech".to_string()));
        assert_eq!(field, ActiveValue::Set("Alpha Tech".to_string()));
    }

    #[test]
    fn test_required_text() {
        assert_eq!(required_text("name", "  Widget ").unwrap(), "Widget");
        assert_eq!(required_text("name", "   ").unwrap_err(), "name is required");
    }
}
