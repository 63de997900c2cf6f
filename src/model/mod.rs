//! Marketplace entities, their create bodies and their patch bodies.

pub mod customer;
pub mod item;
pub mod merchant;

pub use customer::{Association, AssociationRequest, Customer, CustomerPatch, NewCustomer};
pub use item::{Item, ItemPatch, NewItem};
pub use merchant::{Merchant, MerchantPatch, NewMerchant};

use crate::error::{AppError, CONFLICT_MESSAGE};

/// An explicit `null` on a NOT NULL column is a constraint violation, reported as 409.
pub(crate) fn not_null<'a, T>(column: &str, value: &'a Option<T>) -> Result<&'a T, AppError> {
    value.as_ref().ok_or_else(|| {
        tracing::debug!(column, "null for NOT NULL column");
        AppError::Conflict(CONFLICT_MESSAGE.to_string())
    })
}

/// Field deserializers shared by the request bodies.
pub(crate) mod de {
    use serde::{Deserialize, Deserializer};

    /// Required create field that may still arrive as `null`. Absence is a serde error;
    /// `null` becomes `None` and is rejected later by [`super::not_null`].
    /// Use without `#[serde(default)]`.
    pub fn required<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        Option::<T>::deserialize(deserializer)
    }

    /// Patch field on a nullable column: absent = `None`, `null` = `Some(None)`, value = `Some(Some(v))`.
    /// Use with `#[serde(default)]`.
    pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }

    /// Patch field on a required column: absent = `None`, `null` is rejected.
    /// Use with `#[serde(default)]`.
    pub fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        T::deserialize(deserializer).map(Some)
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TextOrNumber {
        Text(String),
        Int(i64),
        UInt(u64),
    }

    impl From<TextOrNumber> for String {
        fn from(v: TextOrNumber) -> Self {
            match v {
                TextOrNumber::Text(s) => s,
                TextOrNumber::Int(n) => n.to_string(),
                TextOrNumber::UInt(n) => n.to_string(),
            }
        }
    }

    /// Phone numbers arrive as strings or bare integers; both are stored as text.
    pub fn phone<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<TextOrNumber>::deserialize(deserializer).map(|v| v.map(String::from))
    }

    pub fn phone_patch<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        phone(deserializer).map(Some)
    }
}
