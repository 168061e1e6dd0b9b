use std::io::BufRead;

use contracts::domain::a005_supplier_record::SupplierRow;
use contracts::enums::SupplierKind;

use super::{SupplierImporter, SupplierRowIter};
use crate::shared::parse::{clean, parse_int, parse_locale_decimal};

const DELIMITER: u8 = b';';

/// Фрагменты, по которым первая строка опознаётся как заголовок
const HEADER_MARKERS: &[&str] = &["sku", "upc", "description"];

/// CSV EET: разделитель `;`, UTF-8, цены с десятичной запятой.
///
/// Колонки: SKU, наименование, цена, остаток.
pub struct EetCsvImporter;

impl SupplierImporter for EetCsvImporter {
    fn kind(&self) -> SupplierKind {
        SupplierKind::Eet
    }

    fn read<'a>(&self, source: Box<dyn BufRead + Send + 'a>) -> SupplierRowIter<'a> {
        let mut first_line = true;
        let mut header_checked = false;

        Box::new(source.split(b'\n').filter_map(move |line| {
            let bytes = match line {
                Ok(bytes) => bytes,
                Err(e) => return Some(Err(e)),
            };

            let text = String::from_utf8_lossy(&bytes);
            let mut line: &str = &text;
            if first_line {
                first_line = false;
                // BOM в начале файла
                line = line.trim_start_matches('\u{FEFF}');
            }
            let line = line.strip_suffix('\r').unwrap_or(line);

            if line.trim().is_empty() {
                return None;
            }

            if !header_checked {
                header_checked = true;
                if looks_like_header(line) {
                    tracing::debug!("Skipping CSV header: {}", line);
                    return None;
                }
            }

            parse_line(line).map(Ok)
        }))
    }
}

fn looks_like_header(line: &str) -> bool {
    let lower = line.to_lowercase();
    HEADER_MARKERS.iter().any(|marker| lower.contains(marker))
}

/// Поля строки с учётом кавычек; если csv не разобрал строку: простое деление
fn split_fields(line: &str) -> Vec<String> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(line.as_bytes());

    match reader.records().next() {
        Some(Ok(record)) => record.iter().map(str::to_string).collect(),
        _ => line
            .split(DELIMITER as char)
            .map(|s| s.trim().to_string())
            .collect(),
    }
}

fn parse_line(line: &str) -> Option<SupplierRow> {
    let fields = split_fields(line);
    let field = |idx: usize| fields.get(idx).map(String::as_str).unwrap_or("");

    let sku = field(0).trim();
    if sku.is_empty() {
        return None;
    }

    Some(SupplierRow {
        sku: sku.to_string(),
        name: clean(field(1)),
        price: parse_locale_decimal(field(2)),
        stock: parse_int(field(3)),
        imported_at: None,
        raw: line.to_string(),
    })
}
