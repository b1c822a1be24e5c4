//! Menu items and the snapshot fetched from the backend.
//!
//! The backend is loose about field names (`id` or `productId`, `items` or
//! `tblProduct`, four spellings of the stock count), so decoding walks the raw JSON
//! and takes the first non-null candidate for each field instead of deriving
//! `Deserialize` on the wire shape.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::Display;
use thiserror::Error;

/// Placeholder name for items and categories the backend sent without one.
pub const UNKNOWN_NAME: &str = "غير معروف";

/// Identifier of a menu item, as assigned by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MenuItemId(pub i64);

impl From<i64> for MenuItemId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl Display for MenuItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Display language. Arabic is primary; English text is optional per item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Ar,
    En,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: MenuItemId,
    pub name: String,
    #[serde(rename = "name_en", default, skip_serializing_if = "Option::is_none")]
    pub name_en: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "description_en", default, skip_serializing_if = "Option::is_none")]
    pub description_en: Option<String>,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub category_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_hint: Option<String>,
    /// Advisory stock count from the last menu fetch.
    #[serde(default)]
    pub available_quantity: u32,
}

impl MenuItem {
    /// Creates an item with no stock in category `"0"`.
    pub fn new(id: i64, name: impl Into<String>, price: f64) -> Self {
        Self {
            id: MenuItemId(id),
            name: name.into(),
            name_en: None,
            description: String::new(),
            description_en: None,
            price,
            image_url: None,
            category_id: "0".to_string(),
            image_hint: None,
            available_quantity: 0,
        }
    }

    pub fn with_stock(mut self, available_quantity: u32) -> Self {
        self.available_quantity = available_quantity;
        self
    }

    pub fn in_category(mut self, category_id: impl Into<String>) -> Self {
        self.category_id = category_id.into();
        self
    }

    pub fn with_english_name(mut self, name_en: impl Into<String>) -> Self {
        self.name_en = Some(name_en.into());
        self
    }

    pub fn is_out_of_stock(&self) -> bool {
        self.available_quantity == 0
    }

    /// Name in `locale`, falling back to the primary name.
    pub fn display_name(&self, locale: Locale) -> &str {
        pick(locale, &self.name, self.name_en.as_deref())
    }

    pub fn display_description(&self, locale: Locale) -> &str {
        pick(locale, &self.description, self.description_en.as_deref())
    }
}

fn pick<'a>(locale: Locale, primary: &'a str, english: Option<&'a str>) -> &'a str {
    match (locale, english) {
        (Locale::En, Some(text)) if !text.trim().is_empty() => text,
        _ => primary,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(rename = "name_en", default, skip_serializing_if = "Option::is_none")]
    pub name_en: Option<String>,
    pub items: Vec<MenuItem>,
}

impl Category {
    pub fn display_name(&self, locale: Locale) -> &str {
        pick(locale, &self.name, self.name_en.as_deref())
    }
}

/// Menu payload that could not be decoded at all.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum MenuError {
    #[error("Menu must be a list of categories, got {0}")]
    NotAList(&'static str),

    #[error("Malformed {0}: expected an object")]
    Malformed(&'static str),
}

/// Why an item cannot go into the cart right now.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StockError {
    #[error("Menu item {0} is not on the menu")]
    UnknownItem(MenuItemId),

    #[error("{name} is out of stock")]
    OutOfStock { item_id: MenuItemId, name: String },

    #[error("Insufficient stock for {name}: requested {requested}, available {available}")]
    Insufficient {
        item_id: MenuItemId,
        name: String,
        requested: u32,
        available: u32,
    },
}

/// Categories and items as fetched at `fetched_at`.
///
/// Stock figures are advisory: nothing is reserved, and the cart never re-reads
/// them on its own.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuSnapshot {
    categories: Vec<Category>,
    fetched_at: DateTime<Utc>,
}

impl MenuSnapshot {
    pub fn new(categories: Vec<Category>) -> Self {
        Self {
            categories,
            fetched_at: Utc::now(),
        }
    }

    /// Decodes the body of `GET /api/menu`.
    pub fn from_backend_json(value: &Value) -> Result<Self, MenuError> {
        let Value::Array(raw) = value else {
            return Err(MenuError::NotAList(json_kind(value)));
        };
        let categories = raw
            .iter()
            .map(decode_category)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(categories))
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn items(&self) -> impl Iterator<Item = &MenuItem> {
        self.categories.iter().flat_map(|c| c.items.iter())
    }

    pub fn item(&self, id: MenuItemId) -> Option<&MenuItem> {
        self.items().find(|item| item.id == id)
    }

    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    pub fn is_empty(&self) -> bool {
        self.items().next().is_none()
    }

    /// Checks that `extra` more units of `item_id` fit next to the `in_cart` already held.
    pub fn check_add(
        &self,
        item_id: MenuItemId,
        in_cart: u32,
        extra: u32,
    ) -> Result<&MenuItem, StockError> {
        let item = self.item(item_id).ok_or(StockError::UnknownItem(item_id))?;
        if item.is_out_of_stock() {
            return Err(StockError::OutOfStock {
                item_id,
                name: item.name.clone(),
            });
        }

        let requested = in_cart.saturating_add(extra);
        if requested > item.available_quantity {
            return Err(StockError::Insufficient {
                item_id,
                name: item.name.clone(),
                requested,
                available: item.available_quantity,
            });
        }
        Ok(item)
    }
}

fn decode_category(value: &Value) -> Result<Category, MenuError> {
    let obj = value.as_object().ok_or(MenuError::Malformed("category"))?;
    let id = first(obj, &["id", "categoryId"])
        .map(stringify)
        .unwrap_or_else(|| "0".to_string());

    let items = match first(obj, &["items", "tblProduct"]).and_then(Value::as_array) {
        Some(raw) => raw
            .iter()
            .map(|item| decode_item(item, &id))
            .collect::<Result<Vec<_>, _>>()?,
        None => Vec::new(),
    };

    Ok(Category {
        name: text(obj, &["name", "CategoryName"]).unwrap_or_else(|| UNKNOWN_NAME.to_string()),
        name_en: text(obj, &["name_en", "nameEn"]),
        id,
        items,
    })
}

fn decode_item(value: &Value, category_id: &str) -> Result<MenuItem, MenuError> {
    let obj = value.as_object().ok_or(MenuError::Malformed("menu item"))?;

    let image_url = text(obj, &["imageUrl"])
        .filter(|url| !url.is_empty())
        .or_else(|| first(obj, &["productImage"]).and_then(image_data_url));

    let available_quantity = first(
        obj,
        &["availableQuantity", "AvailableQuantity", "availablequantity", "stock"],
    )
    .and_then(number)
    .map(|n| n.clamp(0.0, f64::from(u32::MAX)) as u32)
    .unwrap_or(0);

    Ok(MenuItem {
        id: MenuItemId(
            first(obj, &["id", "productId"])
                .and_then(number)
                .map(|n| n as i64)
                .unwrap_or(0),
        ),
        name: text(obj, &["name", "productName"]).unwrap_or_else(|| UNKNOWN_NAME.to_string()),
        name_en: text(obj, &["name_en", "nameEn"]),
        description: text(obj, &["description", "Description"]).unwrap_or_default(),
        description_en: text(obj, &["description_en", "descriptionEn"]),
        price: first(obj, &["price", "productPrice"])
            .and_then(number)
            .unwrap_or(0.0)
            .max(0.0),
        image_url,
        category_id: first(obj, &["categoryId", "CategoryId"])
            .map(stringify)
            .unwrap_or_else(|| category_id.to_string()),
        image_hint: text(obj, &["imageHint"]).filter(|hint| !hint.is_empty()),
        available_quantity,
    })
}

/// First candidate key holding a non-null value.
fn first<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| obj.get(*key))
        .find(|value| !value.is_null())
}

fn text(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    first(obj, keys).and_then(Value::as_str).map(str::to_string)
}

/// Numbers, or strings holding one.
fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// `productImage` arrives either base64-encoded already or as a byte array.
fn image_data_url(value: &Value) -> Option<String> {
    let encoded = match value {
        Value::String(s) if !s.is_empty() => s.clone(),
        Value::Array(raw) => {
            let bytes = raw
                .iter()
                .map(|b| b.as_u64().and_then(|b| u8::try_from(b).ok()))
                .collect::<Option<Vec<u8>>>()?;
            STANDARD.encode(bytes)
        }
        _ => return None,
    };
    Some(format!("data:image/png;base64,{encoded}"))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
