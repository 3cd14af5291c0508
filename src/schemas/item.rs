use serde::de::{DeserializeOwned, Deserializer, Error as _};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::Item;

/// Accepts both `{"item": {...}}` and a bare payload. An object carrying an
/// `item` key is always read as the wrapped form, so a wrapped payload of the
/// wrong shape is an error instead of an empty bare payload.
#[derive(Debug)]
pub(crate) enum ItemEnvelope<T> {
    Wrapped { item: T },
    Bare(T),
}

impl<T> ItemEnvelope<T> {
    pub(crate) fn into_inner(self) -> T {
        match self {
            Self::Wrapped { item } => item,
            Self::Bare(item) => item,
        }
    }
}

impl<'de, T> Deserialize<'de> for ItemEnvelope<T>
where
    T: DeserializeOwned,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut value = serde_json::Value::deserialize(deserializer)?;
        if let Some(item) = value.as_object_mut().and_then(|object| object.remove("item")) {
            return serde_json::from_value(item)
                .map(|item| Self::Wrapped { item })
                .map_err(|err| D::Error::custom(format!("item: {err}")));
        }

        serde_json::from_value(value).map(Self::Bare).map_err(D::Error::custom)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub(crate) struct ItemCreate {
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "name must be between 1 and 255 characters"))]
    pub(crate) name: String,
    #[serde(default)]
    #[validate(length(max = 2000, message = "description must be at most 2000 characters"))]
    pub(crate) description: Option<String>,
}

impl ItemCreate {
    /// Trim whitespace; an empty description is stored as absent.
    pub(crate) fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            description: self
                .description
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty()),
        }
    }
}

/// Partial update. `None` keeps the current value; an empty description
/// clears it.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub(crate) struct ItemUpdate {
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "name must be between 1 and 255 characters"))]
    pub(crate) name: Option<String>,
    #[serde(default)]
    #[validate(length(max = 2000, message = "description must be at most 2000 characters"))]
    pub(crate) description: Option<String>,
}

impl ItemUpdate {
    pub(crate) fn normalized(self) -> Self {
        Self {
            name: self.name.map(|value| value.trim().to_string()),
            description: self.description.map(|value| value.trim().to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ItemResponse {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl ItemResponse {
    pub(crate) fn from_db(item: Item) -> Self {
        Self {
            id: item.id,
            name: item.name,
            description: item.description,
            created_at: format_primitive(item.created_at),
            updated_at: format_primitive(item.updated_at),
        }
    }
}
