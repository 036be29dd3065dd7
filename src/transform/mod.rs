//! Raw rows -> chart-ready records.
//!
//! Every function here is pure. Malformed input never raises: an unparseable
//! date becomes `None` and an uncoercible amount becomes NaN, so the output
//! always has exactly one record per input row, in input order.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

use crate::domain::{Amount, ChartVariant, PointInTime, QuarterLabel, RawRow, Record};

/// Transform rows for the bar variant (date labels retained).
pub fn transform(rows: &[RawRow]) -> Vec<Record> {
    transform_for(rows, ChartVariant::Bar)
}

/// Transform rows for a specific chart variant.
pub fn transform_for(rows: &[RawRow], variant: ChartVariant) -> Vec<Record> {
    rows.iter().map(|row| transform_row(row, variant)).collect()
}

pub fn transform_row(row: &RawRow, variant: ChartVariant) -> Record {
    let RawRow(point, amount) = row;

    let date = match point {
        PointInTime::Text(text) => parse_point_in_time(text),
        PointInTime::Timestamp(ms) => date_from_millis(*ms),
        // Fractional timestamps truncate; null, bools and containers have no date.
        PointInTime::Other(value) => value
            .as_f64()
            .filter(|ms| ms.is_finite())
            .and_then(|ms| date_from_millis(ms.trunc() as i64)),
    };
    // An invalid date has no month, which falls through to Q4.
    let quarter = date
        .map(|d| quarter_for_month(d.month0()))
        .unwrap_or(QuarterLabel::Q4);

    Record {
        date,
        value: coerce_amount(amount),
        year: date.map(|d| d.year()),
        quarter,
        date_label: variant.keeps_date_label().then(|| point.to_string()),
    }
}

/// Fixed month -> quarter mapping.
///
/// Only January, April and July get their own label; every other month is Q4.
pub fn quarter_for_month(month0: u32) -> QuarterLabel {
    match month0 {
        0 => QuarterLabel::Q1,
        3 => QuarterLabel::Q2,
        6 => QuarterLabel::Q3,
        _ => QuarterLabel::Q4,
    }
}

/// Permissive numeric coercion of a raw amount.
pub fn coerce_amount(amount: &Amount) -> f64 {
    match amount {
        Amount::Number(v) => *v,
        Amount::Text(text) => coerce_number(text),
        Amount::Flag(true) => 1.0,
        Amount::Flag(false) => 0.0,
        Amount::Missing => 0.0,
        Amount::Other(_) | Amount::Absent => f64::NAN,
    }
}

/// Coerce a string to a number the way loosely-typed JSON consumers do.
///
/// - surrounding whitespace is ignored; an empty string is `0`
/// - decimal and exponent literals parse normally
/// - `Infinity` (optionally signed) is infinite
/// - `0x`, `0o`, `0b` prefixes parse as unsigned integers
/// - anything else is NaN
pub fn coerce_number(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    match trimmed {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    if let Some(v) = parse_radix_literal(trimmed) {
        return v;
    }

    // Rust accepts spellings like "inf" or "NaN" that we want to reject.
    let is_decimal_literal = trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | '+' | '-' | 'e' | 'E'));
    if !is_decimal_literal {
        return f64::NAN;
    }

    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

fn parse_radix_literal(text: &str) -> Option<f64> {
    let lower = text.to_ascii_lowercase();
    let (radix, digits) = if let Some(rest) = lower.strip_prefix("0x") {
        (16, rest)
    } else if let Some(rest) = lower.strip_prefix("0o") {
        (8, rest)
    } else if let Some(rest) = lower.strip_prefix("0b") {
        (2, rest)
    } else {
        return None;
    };

    // `from_str_radix` tolerates a sign; a radix literal has none.
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Some(f64::NAN);
    }
    Some(
        u64::from_str_radix(digits, radix)
            .map(|v| v as f64)
            .unwrap_or(f64::NAN),
    )
}

/// Parse the date part of a raw row.
///
/// Date-only forms are read as plain calendar dates. Timestamps with an offset
/// are converted to their UTC calendar date.
pub fn parse_point_in_time(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(d) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(d) = NaiveDate::parse_from_str(trimmed, "%Y/%m/%d") {
        return Some(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc().date());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(dt.date());
        }
    }

    parse_partial_date(trimmed)
}

/// `YYYY` or `YYYY-MM`, anchored to the first day of the period.
fn parse_partial_date(text: &str) -> Option<NaiveDate> {
    let mut parts = text.split('-');
    let year_part = parts.next()?;
    if year_part.len() != 4 || !year_part.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let year: i32 = year_part.parse().ok()?;

    let month = match parts.next() {
        None => 1,
        Some(m) if m.len() == 2 && m.chars().all(|c| c.is_ascii_digit()) => m.parse().ok()?,
        Some(_) => return None,
    };
    if parts.next().is_some() {
        return None;
    }

    NaiveDate::from_ymd_opt(year, month, 1)
}

fn date_from_millis(ms: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp_millis(ms).map(|dt| dt.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn preserves_length_and_order() {
        let rows = vec![
            RawRow::text("1950-07-01", "300"),
            RawRow::text("1947-01-01", "243.1"),
            RawRow::text("garbage", "x"),
            RawRow::text("1948-10-01", "275.2"),
        ];
        let records = transform(&rows);

        assert_eq!(records.len(), rows.len());
        let labels: Vec<_> = records.iter().map(|r| r.date_label.clone().unwrap()).collect();
        assert_eq!(labels, vec!["1950-07-01", "1947-01-01", "garbage", "1948-10-01"]);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(transform(&[]).is_empty());
    }

    #[test]
    fn quarter_mapping_only_distinguishes_three_months() {
        assert_eq!(quarter_for_month(0), QuarterLabel::Q1);
        assert_eq!(quarter_for_month(3), QuarterLabel::Q2);
        assert_eq!(quarter_for_month(6), QuarterLabel::Q3);
        for m in [1, 2, 4, 5, 7, 8, 9, 10, 11] {
            assert_eq!(quarter_for_month(m), QuarterLabel::Q4, "month0={m}");
        }
    }

    #[test]
    fn derives_year_and_quarter_from_date() {
        let records = transform(&[
            RawRow::text("1947-01-01", "1"),
            RawRow::text("1947-04-01", "1"),
            RawRow::text("2015-07-01", "1"),
            RawRow::text("2015-10-01", "1"),
            RawRow::text("2015-02-01", "1"),
        ]);

        let got: Vec<_> = records.iter().map(|r| (r.year, r.quarter)).collect();
        assert_eq!(
            got,
            vec![
                (Some(1947), QuarterLabel::Q1),
                (Some(1947), QuarterLabel::Q2),
                (Some(2015), QuarterLabel::Q3),
                (Some(2015), QuarterLabel::Q4),
                (Some(2015), QuarterLabel::Q4),
            ]
        );
        assert_eq!(records[0].date, Some(ymd(1947, 1, 1)));
    }

    #[test]
    fn coerces_numeric_strings() {
        assert_eq!(coerce_number("21045"), 21045.0);
        assert_eq!(coerce_number("21045.5"), 21045.5);
        assert_eq!(coerce_number("  7 "), 7.0);
        assert_eq!(coerce_number(""), 0.0);
        assert_eq!(coerce_number("1e3"), 1000.0);
        assert_eq!(coerce_number("0x1A"), 26.0);
        assert!(coerce_number("0x+1A").is_nan());
        assert!(coerce_number("0b-1").is_nan());
        assert_eq!(coerce_number("-Infinity"), f64::NEG_INFINITY);
        assert!(coerce_number("inf").is_nan());
        assert!(coerce_number("NaN").is_nan());
        assert!(coerce_number("12abc").is_nan());
        assert!(coerce_number("1,000").is_nan());
    }

    #[test]
    fn coerces_non_string_amounts() {
        assert_eq!(coerce_amount(&Amount::Number(246.3)), 246.3);
        assert_eq!(coerce_amount(&Amount::Missing), 0.0);
        assert_eq!(coerce_amount(&Amount::Flag(true)), 1.0);
    }

    #[test]
    fn invalid_date_propagates_as_absent_and_q4() {
        let r = transform_row(&RawRow::text("not a date", "12"), ChartVariant::Bar);
        assert_eq!(r.date, None);
        assert_eq!(r.year, None);
        assert_eq!(r.quarter, QuarterLabel::Q4);
        assert_eq!(r.value, 12.0);
        assert_eq!(r.date_label.as_deref(), Some("not a date"));
    }

    #[test]
    fn bad_amount_becomes_nan_without_failing() {
        let r = transform_row(&RawRow::text("1947-01-01", "n/a"), ChartVariant::Bar);
        assert!(r.value.is_nan());
        assert_eq!(r.year, Some(1947));
    }

    #[test]
    fn scatter_variant_drops_date_label() {
        let records = transform_for(&[RawRow::text("1947-01-01", "1")], ChartVariant::Scatter);
        assert_eq!(records[0].date_label, None);
    }

    #[test]
    fn parses_supported_date_forms() {
        assert_eq!(parse_point_in_time("1947-04-01"), Some(ymd(1947, 4, 1)));
        assert_eq!(parse_point_in_time("1947/04/01"), Some(ymd(1947, 4, 1)));
        assert_eq!(parse_point_in_time("1947-04"), Some(ymd(1947, 4, 1)));
        assert_eq!(parse_point_in_time("1947"), Some(ymd(1947, 1, 1)));
        assert_eq!(parse_point_in_time("1947-04-01T12:30:00"), Some(ymd(1947, 4, 1)));
        assert_eq!(
            parse_point_in_time("1947-03-31T23:00:00-05:00"),
            Some(ymd(1947, 4, 1))
        );
        assert_eq!(parse_point_in_time("1947-13-01"), None);
        assert_eq!(parse_point_in_time("47"), None);
        assert_eq!(parse_point_in_time(""), None);
    }

    #[test]
    fn timestamps_are_read_as_utc_millis() {
        // 1947-01-01T00:00:00Z
        let r = transform_row(
            &RawRow(PointInTime::Timestamp(-725_846_400_000), Amount::Number(1.0)),
            ChartVariant::Bar,
        );
        assert_eq!(r.date, Some(ymd(1947, 1, 1)));
        assert_eq!(r.quarter, QuarterLabel::Q1);
        assert_eq!(r.date_label.as_deref(), Some("-725846400000"));
    }

    #[test]
    fn odd_rows_degrade_instead_of_failing() {
        let ds = crate::data::parse_dataset(
            r#"{"data": [["1947-01-01", "243.1", "extra"], [null, "1"], [-725846400000.7, "2"], ["1947-04-01"]]}"#,
        )
        .unwrap();
        let records = transform(&ds.data);

        assert_eq!(records.len(), 4);
        assert_eq!(records[0].value, 243.1);
        assert_eq!(records[0].quarter, QuarterLabel::Q1);

        assert_eq!(records[1].date, None);
        assert_eq!(records[1].quarter, QuarterLabel::Q4);
        assert_eq!(records[1].value, 1.0);
        assert_eq!(records[1].date_label.as_deref(), Some("null"));

        assert_eq!(records[2].date, Some(ymd(1947, 1, 1)));

        assert_eq!(records[3].date, Some(ymd(1947, 4, 1)));
        assert!(records[3].value.is_nan());
    }
}
