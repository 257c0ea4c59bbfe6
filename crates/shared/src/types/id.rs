//! Typed IDs for the invoicing entities.
//!
//! A `PaymentId` cannot be handed to a lookup expecting an `InvoiceId`, which matters
//! here because the payment routes take both kinds of identifier in the same path slot.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Creates a new time-ordered ID (UUID v7).
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Wraps an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

typed_id!(CompanyId, "Identifier of a company (sender or recipient).");
typed_id!(AddressId, "Identifier of a company address.");
typed_id!(ItemId, "Identifier of a catalogue item.");
typed_id!(OrderId, "Identifier of a customer order.");
typed_id!(OrderItemId, "Identifier of an order line.");
typed_id!(InvoiceId, "Identifier of an invoice.");
typed_id!(InvoiceItemId, "Identifier of an invoice line item.");
typed_id!(PaymentId, "Identifier of a payment against an invoice.");
