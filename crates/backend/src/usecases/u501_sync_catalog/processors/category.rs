use contracts::domain::a002_category::Category;
use contracts::domain::common::RawRecord;

use super::{as_object, i32_field, int_field, str_field, timestamp_field, true_field};

/// Категория из исходного JSON. Идентификаторы хранятся как i64 без сужения.
pub fn map_category(raw: &str) -> RawRecord<Category> {
    let obj = as_object(raw);

    let category = Category {
        id: int_field(&obj, "id").unwrap_or(0),
        parent_id: int_field(&obj, "parentId"),
        name: str_field(&obj, "name").unwrap_or_default(),
        enabled: true_field(&obj, "enabled"),
        product_count: i32_field(&obj, "productCount").unwrap_or(0),
        updated: timestamp_field(&obj, "updated"),
    };

    RawRecord::new(category, raw)
}
