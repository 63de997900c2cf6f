use super::{de, not_null};
use crate::error::AppError;
use crate::service::validation::{check_price, check_text, TextRule, Validate, IMAGE_LINK, LONG_TEXT};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

pub(crate) const ITEM_COLUMNS: &str = "id, name, price, description, image_link, merchant_id";

const NAME: TextRule = TextRule::required(100);

/// A product belonging to exactly one merchant.
///
/// `description` is stored but not part of the item's wire format.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct Item {
    pub id: i32,
    pub name: String,
    pub price: f64,
    #[serde(skip_serializing)]
    pub description: Option<String>,
    pub image_link: Option<String>,
    pub merchant_id: i32,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct NewItem {
    #[serde(deserialize_with = "de::required")]
    #[schema(value_type = String)]
    pub name: Option<String>,
    #[serde(deserialize_with = "de::required")]
    #[schema(value_type = f64)]
    pub price: Option<f64>,
    #[serde(deserialize_with = "de::required")]
    #[schema(value_type = i32)]
    pub merchant_id: Option<i32>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_link: Option<String>,
}

/// Partial update. `name`, `price` and `merchant_id` cannot be cleared.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct ItemPatch {
    #[serde(default, deserialize_with = "de::present")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "de::present")]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "de::present")]
    pub merchant_id: Option<i32>,
    #[serde(default, deserialize_with = "de::nullable")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "de::nullable")]
    #[schema(value_type = Option<String>)]
    pub image_link: Option<Option<String>>,
}

impl ItemPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.price.is_none()
            && self.merchant_id.is_none()
            && self.description.is_none()
            && self.image_link.is_none()
    }
}

impl Validate for NewItem {
    fn validate(&self) -> Result<(), AppError> {
        let name = not_null("name", &self.name)?;
        let price = not_null("price", &self.price)?;
        not_null("merchant_id", &self.merchant_id)?;
        check_text("name", Some(name.as_str()), NAME)?;
        check_price("price", *price)?;
        check_text("description", self.description.as_deref(), LONG_TEXT)?;
        check_text("image_link", self.image_link.as_deref(), IMAGE_LINK)
    }
}

impl Validate for ItemPatch {
    fn validate(&self) -> Result<(), AppError> {
        check_text("name", self.name.as_deref(), NAME)?;
        if let Some(price) = self.price {
            check_price("price", price)?;
        }
        check_text("description", self.description.as_ref().and_then(|v| v.as_deref()), LONG_TEXT)?;
        check_text("image_link", self.image_link.as_ref().and_then(|v| v.as_deref()), IMAGE_LINK)
    }
}
