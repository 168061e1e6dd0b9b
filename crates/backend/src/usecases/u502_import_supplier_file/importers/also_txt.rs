use std::io::BufRead;

use contracts::domain::a005_supplier_record::SupplierRow;
use contracts::enums::SupplierKind;

use super::{SupplierImporter, SupplierRowIter};
use crate::shared::parse::{clean, parse_int, parse_invariant_decimal};

/// Строка короче этого числа колонок считается мусором (подвал, пустые хвосты)
const MIN_COLUMNS: usize = 10;

const SKU_COLUMN: usize = 0;
const NAME_COLUMN: usize = 5;
const STOCK_COLUMN: usize = 6;
const PRICE_COLUMN: usize = 7;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Табличный TXT ALSO: табуляция, фиксированные колонки, Latin-1.
///
/// Если файл начинается с UTF-8 BOM, он читается как UTF-8.
pub struct AlsoTxtImporter;

impl SupplierImporter for AlsoTxtImporter {
    fn kind(&self) -> SupplierKind {
        SupplierKind::Also
    }

    fn read<'a>(&self, source: Box<dyn BufRead + Send + 'a>) -> SupplierRowIter<'a> {
        let mut first_line = true;
        let mut utf8 = false;

        Box::new(source.split(b'\n').filter_map(move |line| {
            let mut bytes = match line {
                Ok(bytes) => bytes,
                Err(e) => return Some(Err(e)),
            };

            if first_line {
                first_line = false;
                if bytes.starts_with(UTF8_BOM) {
                    utf8 = true;
                    bytes.drain(..UTF8_BOM.len());
                }
            }

            let text = if utf8 {
                String::from_utf8_lossy(&bytes).into_owned()
            } else {
                decode_latin1(&bytes)
            };
            parse_line(&text).map(Ok)
        }))
    }
}

/// ISO-8859-1: каждый байт: кодовая точка с тем же номером
fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

fn parse_line(line: &str) -> Option<SupplierRow> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    if line.trim().is_empty() {
        return None;
    }

    let cols: Vec<&str> = line.split('\t').collect();
    if cols.len() < MIN_COLUMNS {
        return None;
    }

    let sku = cols[SKU_COLUMN].trim();
    if sku.is_empty() {
        return None;
    }

    Some(SupplierRow {
        sku: sku.to_string(),
        name: clean(cols[NAME_COLUMN]),
        price: Some(parse_invariant_decimal(cols[PRICE_COLUMN]).unwrap_or(0.0)),
        stock: Some(parse_int(cols[STOCK_COLUMN]).unwrap_or(0)),
        imported_at: None,
        raw: line.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn read_all(bytes: Vec<u8>) -> Vec<SupplierRow> {
        AlsoTxtImporter
            .read(Box::new(Cursor::new(bytes)))
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    }

    fn line(sku: &str, name: &str, stock: &str, price: &str) -> String {
        format!(
            "{}\tx1\tx2\tx3\tx4\t{}\t{}\t{}\tx8\tBrand\r\n",
            sku, name, stock, price
        )
    }

    #[test]
    fn test_short_lines_are_skipped() {
        let mut text = line("A-1", "Mouse", "12", "9.99");
        text.push_str("short\tline\twith\tfive\tcols\r\n");
        text.push('\n');
        text.push_str(&line("A-2", "Keyboard", "", "1,299.50"));

        let rows = read_all(text.into_bytes());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].sku, "A-1");
        assert_eq!(rows[0].name.as_deref(), Some("Mouse"));
        assert_eq!(rows[0].stock, Some(12));
        assert_eq!(rows[0].price, Some(9.99));
        assert_eq!(rows[1].stock, Some(0));
        assert_eq!(rows[1].price, Some(1299.5));
        assert!(!rows[1].raw.ends_with('\r'));
    }

    #[test]
    fn test_unparsable_numbers_default_to_zero() {
        let rows = read_all(line("B-1", "Cable", "n/a", "call").into_bytes());
        assert_eq!(rows[0].stock, Some(0));
        assert_eq!(rows[0].price, Some(0.0));
    }

    #[test]
    fn test_latin1_decoding() {
        let mut bytes = b"C-1\t1\t2\t3\t4\tCaf".to_vec();
        bytes.push(0xE9);
        bytes.extend_from_slice(b" cr\xE8me\t5\t2.5\t8\t9\n");

        let rows = read_all(bytes);
        assert_eq!(rows[0].name.as_deref(), Some("Café crème"));
    }

    #[test]
    fn test_utf8_bom_switches_encoding() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice("D-1\t1\t2\t3\t4\tCafé\t5\t2.5\t8\t9\n".as_bytes());

        let rows = read_all(bytes);
        assert_eq!(rows[0].sku, "D-1");
        assert_eq!(rows[0].name.as_deref(), Some("Café"));
    }

    #[test]
    fn test_blank_sku_is_skipped() {
        let rows = read_all(line("  ", "Ghost", "1", "1.0").into_bytes());
        assert!(rows.is_empty());
    }
}
