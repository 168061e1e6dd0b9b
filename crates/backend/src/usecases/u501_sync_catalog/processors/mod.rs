//! Разбор исходного JSON удалённого API в типизированные записи.
//!
//! Разбор никогда не падает: отсутствующее или поле не того типа даёт
//! значение по умолчанию, исходный JSON сохраняется дословно.

pub mod category;
pub mod product;

pub use category::map_category;
pub use product::map_product;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::shared::parse::parse_timestamp;

/// Корневой объект записи; всё, что не объект, считается пустой записью
fn as_object(raw: &str) -> Map<String, Value> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

/// Целое, помещающееся в i64. Дробные и слишком большие числа не принимаются.
fn int_field(obj: &Map<String, Value>, key: &str) -> Option<i64> {
    obj.get(key).and_then(Value::as_i64)
}

fn i32_field(obj: &Map<String, Value>, key: &str) -> Option<i32> {
    int_field(obj, key).and_then(|v| i32::try_from(v).ok())
}

fn f64_field(obj: &Map<String, Value>, key: &str) -> Option<f64> {
    obj.get(key).and_then(Value::as_f64)
}

fn str_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_string)
}

fn true_field(obj: &Map<String, Value>, key: &str) -> bool {
    matches!(obj.get(key), Some(Value::Bool(true)))
}

fn timestamp_field(obj: &Map<String, Value>, key: &str) -> Option<DateTime<Utc>> {
    obj.get(key)
        .and_then(Value::as_str)
        .and_then(parse_timestamp)
}
