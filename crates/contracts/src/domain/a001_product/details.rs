use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Детальная карточка товара, собранная из сохранённого исходного JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ProductDetails {
    pub id: i64,
    pub sku: Option<String>,
    pub name: String,
    pub price: Option<f64>,
    pub enabled: bool,

    pub in_stock: Option<bool>,
    pub unlimited: Option<bool>,
    pub weight: Option<f64>,
    pub url: Option<String>,

    pub created: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,

    /// Главное изображение (самый подходящий размер из доступных)
    pub image_url: Option<String>,

    pub categories: Vec<String>,
    pub attributes: Vec<NameValue>,
    pub options: Vec<OptionItem>,

    pub description_html: Option<String>,
    /// Описание без HTML-разметки
    pub description_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NameValue {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionItem {
    pub name: String,
    pub choices: Vec<String>,
}
