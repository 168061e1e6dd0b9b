//! Терпимый разбор чисел и дат из внешних источников.
//!
//! Все функции возвращают `None` вместо ошибки: битое поле не должно
//! ронять всю пачку записей.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Разбор даты/времени в одном из форматов, которые встречаются в API:
/// RFC 3339, `2021-07-21 11:52:16 +0000`, `2021-07-21T11:52:16+0000`,
/// а также время без смещения (считается UTC) и голая дата.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%d %H:%M:%S%.f %z", "%Y-%m-%dT%H:%M:%S%.f%z"] {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Число в инвариантной записи: точка: десятичный разделитель,
/// запятая: разделитель тысяч (`1,234.50`).
pub fn parse_invariant_decimal(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    parse_finite(s).or_else(|| parse_finite(&s.replace(',', "")))
}

/// Число в записи с десятичной запятой (`1.234,56`, `12,5`), а если не
/// получилось: в инвариантной. Кавычки вокруг значения отбрасываются.
pub fn parse_locale_decimal(s: &str) -> Option<f64> {
    let s = strip_quotes(s);
    if s.is_empty() {
        return None;
    }
    parse_comma_decimal(s).or_else(|| parse_invariant_decimal(s))
}

/// Целое число; пробелы по краям и кавычки допускаются.
pub fn parse_int(s: &str) -> Option<i32> {
    let s = strip_quotes(s);
    if s.is_empty() {
        return None;
    }
    s.parse::<i32>().ok()
}

/// Обрезать пробелы; пустую строку превратить в None.
pub fn clean(s: &str) -> Option<String> {
    let s = s.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

fn strip_quotes(s: &str) -> &str {
    s.trim().trim_matches(|c| c == '"' || c == '\'').trim()
}

fn parse_comma_decimal(s: &str) -> Option<f64> {
    let compact: String = s
        .chars()
        .filter(|c| !matches!(c, ' ' | '\u{a0}'))
        .collect();
    let comma = compact.find(',')?;
    let (int_part, frac_part) = (&compact[..comma], &compact[comma + 1..]);
    if frac_part.contains(',') || frac_part.contains('.') {
        return None;
    }
    let normalized = format!("{}.{}", int_part.replace('.', ""), frac_part);
    parse_finite(&normalized)
}

fn parse_finite(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2021, 7, 21, 11, 52, 16).unwrap();
        assert_eq!(parse_timestamp("2021-07-21 11:52:16 +0000"), Some(expected));
        assert_eq!(parse_timestamp("2021-07-21T11:52:16+0000"), Some(expected));
        assert_eq!(parse_timestamp("2021-07-21T11:52:16Z"), Some(expected));
        assert_eq!(parse_timestamp("2021-07-21 14:52:16 +0300"), Some(expected));
        assert_eq!(parse_timestamp("2021-07-21 11:52:16"), Some(expected));
        assert_eq!(parse_timestamp("2021-07-21T11:52:16"), Some(expected));
        assert_eq!(
            parse_timestamp("2021-07-21"),
            Some(Utc.with_ymd_and_hms(2021, 7, 21, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_parse_timestamp_garbage_is_none() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp("2021-13-45 99:00:00"), None);
    }

    #[test]
    fn test_parse_invariant_decimal() {
        assert_eq!(parse_invariant_decimal("12.50"), Some(12.5));
        assert_eq!(parse_invariant_decimal(" 1,234.50 "), Some(1234.5));
        assert_eq!(parse_invariant_decimal(""), None);
        assert_eq!(parse_invariant_decimal("n/a"), None);
        assert_eq!(parse_invariant_decimal("NaN"), None);
    }

    #[test]
    fn test_parse_locale_decimal() {
        assert_eq!(parse_locale_decimal("12,50"), Some(12.5));
        assert_eq!(parse_locale_decimal("1.234,56"), Some(1234.56));
        assert_eq!(parse_locale_decimal("\"5309,00\""), Some(5309.0));
        assert_eq!(parse_locale_decimal("12.5"), Some(12.5));
        assert_eq!(parse_locale_decimal("1,234.56"), Some(1234.56));
        assert_eq!(parse_locale_decimal("abc"), None);
        assert_eq!(parse_locale_decimal("  "), None);
    }

    #[test]
    fn test_parse_int() {
        assert_eq!(parse_int(" 42 "), Some(42));
        assert_eq!(parse_int("-3"), Some(-3));
        assert_eq!(parse_int("'7'"), Some(7));
        assert_eq!(parse_int("4.5"), None);
        assert_eq!(parse_int(""), None);
    }

    #[test]
    fn test_clean() {
        assert_eq!(clean("  abc "), Some("abc".to_string()));
        assert_eq!(clean("   "), None);
    }
}
