use super::{de, not_null, Item};
use crate::error::AppError;
use crate::service::validation::{check_text, TextRule, Validate};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

pub(crate) const CUSTOMER_COLUMNS: &str = "id, name, email";

const NAME: TextRule = TextRule::required(100);
const EMAIL: TextRule = TextRule::required(100).email();

/// A buyer with favorite and purchased items.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct Customer {
    pub id: i32,
    pub name: String,
    pub email: String,
    #[sqlx(skip)]
    pub favorites: Vec<Item>,
    #[sqlx(skip)]
    pub purchases: Vec<Item>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct NewCustomer {
    #[serde(deserialize_with = "de::required")]
    #[schema(value_type = String)]
    pub name: Option<String>,
    #[serde(deserialize_with = "de::required")]
    #[schema(value_type = String)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CustomerPatch {
    #[serde(default, deserialize_with = "de::present")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "de::present")]
    pub email: Option<String>,
}

impl CustomerPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none()
    }
}

/// Body of `POST /customers/{id}/favorites` and `POST /customers/{id}/purchases`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct AssociationRequest {
    pub item_id: i32,
}

/// Customer-to-item relations, each backed by a join table keyed on (customer_id, item_id).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Association {
    Favorites,
    Purchases,
}

impl Association {
    pub const ALL: [Association; 2] = [Association::Favorites, Association::Purchases];

    pub fn table(self) -> &'static str {
        match self {
            Association::Favorites => "favorites",
            Association::Purchases => "purchased",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Association::Favorites => "favorite",
            Association::Purchases => "purchase",
        }
    }
}

impl Validate for NewCustomer {
    fn validate(&self) -> Result<(), AppError> {
        let name = not_null("name", &self.name)?;
        let email = not_null("email", &self.email)?;
        check_text("name", Some(name.as_str()), NAME)?;
        check_text("email", Some(email.as_str()), EMAIL)
    }
}

impl Validate for CustomerPatch {
    fn validate(&self) -> Result<(), AppError> {
        check_text("name", self.name.as_deref(), NAME)?;
        check_text("email", self.email.as_deref(), EMAIL)
    }
}
