use contracts::domain::a001_product::Product;
use contracts::domain::common::RawRecord;

use super::{as_object, f64_field, i32_field, int_field, str_field, timestamp_field, true_field};

/// Товар из исходного JSON. id, не помещающийся в i64, становится 0.
pub fn map_product(raw: &str) -> RawRecord<Product> {
    let obj = as_object(raw);

    let product = Product {
        id: int_field(&obj, "id").unwrap_or(0),
        sku: str_field(&obj, "sku"),
        name: str_field(&obj, "name").unwrap_or_default(),
        price: f64_field(&obj, "price"),
        quantity: i32_field(&obj, "quantity"),
        enabled: true_field(&obj, "enabled"),
        updated: timestamp_field(&obj, "updated"),
    };

    RawRecord::new(product, raw)
}
