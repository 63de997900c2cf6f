use super::{de, not_null, Item};
use crate::error::AppError;
use crate::service::validation::{check_text, TextRule, Validate, IMAGE_LINK, LONG_TEXT, SHORT_TEXT};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

pub(crate) const MERCHANT_COLUMNS: &str =
    "id, name, city, state, phone, email, fb_link, insta_link, image_link, description";

const NAME: TextRule = TextRule::required(80);
const EMAIL: TextRule = SHORT_TEXT.email();

/// A seller and the items it owns.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct Merchant {
    pub id: i32,
    pub name: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub fb_link: Option<String>,
    pub insta_link: Option<String>,
    pub image_link: Option<String>,
    pub description: Option<String>,
    #[sqlx(skip)]
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct NewMerchant {
    #[serde(deserialize_with = "de::required")]
    #[schema(value_type = String)]
    pub name: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "de::phone")]
    #[schema(value_type = Option<String>)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub fb_link: Option<String>,
    #[serde(default)]
    pub insta_link: Option<String>,
    #[serde(default)]
    pub image_link: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Partial update. Only `name` cannot be cleared; every other column accepts `null`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct MerchantPatch {
    #[serde(default, deserialize_with = "de::present")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "de::nullable")]
    #[schema(value_type = Option<String>)]
    pub city: Option<Option<String>>,
    #[serde(default, deserialize_with = "de::nullable")]
    #[schema(value_type = Option<String>)]
    pub state: Option<Option<String>>,
    #[serde(default, deserialize_with = "de::phone_patch")]
    #[schema(value_type = Option<String>)]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "de::nullable")]
    #[schema(value_type = Option<String>)]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "de::nullable")]
    #[schema(value_type = Option<String>)]
    pub fb_link: Option<Option<String>>,
    #[serde(default, deserialize_with = "de::nullable")]
    #[schema(value_type = Option<String>)]
    pub insta_link: Option<Option<String>>,
    #[serde(default, deserialize_with = "de::nullable")]
    #[schema(value_type = Option<String>)]
    pub image_link: Option<Option<String>>,
    #[serde(default, deserialize_with = "de::nullable")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
}

impl MerchantPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.city.is_none()
            && self.state.is_none()
            && self.phone.is_none()
            && self.email.is_none()
            && self.fb_link.is_none()
            && self.insta_link.is_none()
            && self.image_link.is_none()
            && self.description.is_none()
    }
}

fn inner(v: &Option<Option<String>>) -> Option<&str> {
    v.as_ref().and_then(|v| v.as_deref())
}

impl Validate for NewMerchant {
    fn validate(&self) -> Result<(), AppError> {
        let name = not_null("name", &self.name)?;
        check_text("name", Some(name.as_str()), NAME)?;
        check_text("city", self.city.as_deref(), SHORT_TEXT)?;
        check_text("state", self.state.as_deref(), SHORT_TEXT)?;
        check_text("phone", self.phone.as_deref(), SHORT_TEXT)?;
        check_text("email", self.email.as_deref(), EMAIL)?;
        check_text("fb_link", self.fb_link.as_deref(), SHORT_TEXT)?;
        check_text("insta_link", self.insta_link.as_deref(), SHORT_TEXT)?;
        check_text("image_link", self.image_link.as_deref(), IMAGE_LINK)?;
        check_text("description", self.description.as_deref(), LONG_TEXT)
    }
}

impl Validate for MerchantPatch {
    fn validate(&self) -> Result<(), AppError> {
        check_text("name", self.name.as_deref(), NAME)?;
        check_text("city", inner(&self.city), SHORT_TEXT)?;
        check_text("state", inner(&self.state), SHORT_TEXT)?;
        check_text("phone", inner(&self.phone), SHORT_TEXT)?;
        check_text("email", inner(&self.email), EMAIL)?;
        check_text("fb_link", inner(&self.fb_link), SHORT_TEXT)?;
        check_text("insta_link", inner(&self.insta_link), SHORT_TEXT)?;
        check_text("image_link", inner(&self.image_link), IMAGE_LINK)?;
        check_text("description", inner(&self.description), LONG_TEXT)
    }
}
