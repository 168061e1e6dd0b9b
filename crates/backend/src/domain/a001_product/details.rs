use std::collections::HashSet;

use contracts::domain::a001_product::{NameValue, OptionItem, Product, ProductDetails};
use serde_json::Value;

use crate::shared::parse::parse_timestamp;

/// Собрать детальную карточку товара.
///
/// Типизированные поля берутся из `product`, остальное: из исходного JSON.
/// Если JSON не разбирается, карточка содержит только типизированные поля.
pub fn build_details(product: &Product, raw_json: &str) -> ProductDetails {
    let mut details = ProductDetails {
        id: product.id,
        sku: product.sku.clone(),
        name: product.name.clone(),
        price: product.price,
        enabled: product.enabled,
        updated: product.updated,
        ..Default::default()
    };

    let Ok(root) = serde_json::from_str::<Value>(raw_json) else {
        return details;
    };
    if !root.is_object() {
        return details;
    }

    details.url = str_field(&root, "url");
    details.in_stock = root.get("inStock").and_then(Value::as_bool);
    details.unlimited = root.get("unlimited").and_then(Value::as_bool);
    details.weight = root.get("weight").and_then(Value::as_f64);
    details.created = root
        .get("created")
        .and_then(Value::as_str)
        .and_then(parse_timestamp);
    if details.updated.is_none() {
        details.updated = root
            .get("updated")
            .and_then(Value::as_str)
            .and_then(parse_timestamp);
    }

    details.image_url = main_image(&root);
    details.categories = category_names(&root);
    details.attributes = attributes(&root);
    details.options = options(&root);

    if let Some(html) = str_field(&root, "description") {
        details.description_text = Some(html_to_text(&html)).filter(|t| !t.is_empty());
        details.description_html = Some(html);
    }

    details
}

fn str_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn array<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn main_image(root: &Value) -> Option<String> {
    let first = root
        .get("media")
        .map(|media| array(media, "images"))
        .and_then(|images| images.first())?;

    ["image800pxUrl", "imageOriginalUrl", "imageUrl"]
        .iter()
        .find_map(|key| str_field(first, key))
}

fn category_names(root: &Value) -> Vec<String> {
    array(root, "categories")
        .iter()
        .filter_map(|c| str_field(c, "name"))
        .collect()
}

fn attributes(root: &Value) -> Vec<NameValue> {
    array(root, "attributes")
        .iter()
        .filter_map(|a| {
            let name = str_field(a, "name")?;
            let value = match a.get("value") {
                Some(Value::String(s)) => s.trim().to_string(),
                Some(Value::Null) | None => String::new(),
                Some(other) => other.to_string(),
            };
            Some(NameValue { name, value })
        })
        .collect()
}

fn options(root: &Value) -> Vec<OptionItem> {
    array(root, "options")
        .iter()
        .filter_map(|o| {
            let name = str_field(o, "name")?;
            let choices = array(o, "choices")
                .iter()
                .filter_map(|c| str_field(c, "text"))
                .collect();
            Some(OptionItem { name, choices })
        })
        .collect()
}

/// HTML описания в обычный текст: теги вырезаются, блоки разделяются
/// переводами строк, пустые строки отбрасываются.
fn html_to_text(html: &str) -> String {
    let spaced = html
        .replace("<br", "\n<br")
        .replace("</p>", "</p>\n")
        .replace("</div>", "</div>\n")
        .replace("</li>", "</li>\n");

    let stripped = ammonia::Builder::new()
        .tags(HashSet::new())
        .clean(&spaced)
        .to_string();

    decode_entities(&stripped)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn decode_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
