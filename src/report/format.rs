//! Formatted terminal output for the `records` command.
//!
//! We keep formatting code in one place so the transform/render code stays
//! free of presentation concerns.

use crate::domain::{GdpDataset, Record};
use crate::report::series_stats;

/// Dataset metadata plus series statistics.
pub fn format_summary(dataset: &GdpDataset, records: &[Record]) -> String {
    let stats = series_stats(records);
    let mut out = String::new();

    out.push_str("=== gdp - US GDP series ===\n");
    if let Some(name) = &dataset.name {
        out.push_str(&format!("Name: {name}\n"));
    }
    if let Some(freq) = &dataset.frequency {
        out.push_str(&format!("Frequency: {freq}\n"));
    }
    if let Some(note) = dataset.units_note() {
        out.push_str(&format!("Note: {note}\n"));
    }
    if let Some(updated) = &dataset.updated_at {
        out.push_str(&format!("Updated: {updated}\n"));
    }

    out.push_str(&format!("Records: n={}", stats.n_records));
    if stats.n_invalid_dates > 0 || stats.n_invalid_values > 0 {
        out.push_str(&format!(
            " | invalid dates={} | invalid values={}",
            stats.n_invalid_dates, stats.n_invalid_values
        ));
    }
    out.push('\n');

    match (stats.first_date, stats.last_date) {
        (Some(first), Some(last)) => out.push_str(&format!("Dates: [{first}, {last}]\n")),
        _ => out.push_str("Dates: n/a\n"),
    }
    match (stats.value_min, stats.value_max) {
        (Some(lo), Some(hi)) => out.push_str(&format!("Values: [{lo:.1}, {hi:.1}] billion USD\n")),
        _ => out.push_str("Values: n/a\n"),
    }

    out
}

/// Fixed-width record table, optionally limited to the first `limit` rows.
pub fn format_records(records: &[Record], limit: Option<usize>) -> String {
    let mut out = String::new();
    push_line(
        &mut out,
        format!("{:>5} {:<12} {:>6} {:<4} {:>12} {:<12}", "#", "date", "year", "qtr", "value", "raw"),
    );
    push_line(
        &mut out,
        format!("{:->5} {:-<12} {:->6} {:-<4} {:->12} {:-<12}", "", "", "", "", "", ""),
    );

    let shown = limit.unwrap_or(records.len()).min(records.len());
    for (i, r) in records.iter().take(shown).enumerate() {
        let date = r.date.map(|d| d.to_string()).unwrap_or_else(|| "invalid".to_string());
        push_line(
            &mut out,
            format!(
                "{:>5} {:<12} {:>6} {:<4} {:>12.1} {:<12}",
                i,
                date,
                r.year_label(),
                r.quarter.as_str(),
                r.value,
                truncate(r.date_label.as_deref().unwrap_or(""), 12),
            ),
        );
    }

    if shown < records.len() {
        push_line(&mut out, format!("... {} more", records.len() - shown));
    }

    out
}

fn push_line(out: &mut String, line: String) {
    out.push_str(line.trim_end());
    out.push('\n');
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::parse_dataset;
    use crate::transform::transform;

    const DATASET: &str = r#"{
        "name": "Gross Domestic Product, 1 Decimal",
        "description": "Units: Billions of Dollars\nSeasonal Adjustment: Seasonally Adjusted Annual Rate",
        "frequency": "Quarterly",
        "data": [["1947-01-01", "243.1"], ["1947-04-01", "246.3"], ["1947-07-01", "250.1"]]
    }"#;

    #[test]
    fn summary_lists_metadata_and_ranges() {
        let ds = parse_dataset(DATASET).unwrap();
        let records = transform(&ds.data);
        let s = format_summary(&ds, &records);

        assert!(s.contains("Name: Gross Domestic Product, 1 Decimal"));
        assert!(s.contains("Frequency: Quarterly"));
        assert!(s.contains("Note: Units: Billions of Dollars"));
        assert!(s.contains("Records: n=3\n"));
        assert!(s.contains("Dates: [1947-01-01, 1947-07-01]"));
        assert!(s.contains("Values: [243.1, 250.1] billion USD"));
    }

    #[test]
    fn records_table_respects_limit() {
        let ds = parse_dataset(DATASET).unwrap();
        let records = transform(&ds.data);
        let table = format_records(&records, Some(2));
        let lines: Vec<&str> = table.lines().collect();

        // header + rule + 2 rows + "more"
        assert_eq!(lines.len(), 5);
        assert!(lines[2].contains("1947-01-01"));
        assert!(lines[2].contains("Q1"));
        assert!(lines[3].contains("Q2"));
        assert_eq!(lines[4], "... 1 more");
    }

    #[test]
    fn invalid_dates_are_marked() {
        let records = transform(&[crate::domain::RawRow::text("garbage", "1")]);
        let table = format_records(&records, None);
        assert!(table.contains("invalid"));
        assert!(table.contains("n/a"));
        assert!(table.contains("Q4"));
    }

    #[test]
    fn truncate_marks_cut_text() {
        assert_eq!(truncate("short", 12), "short");
        assert_eq!(truncate("abcdefghijklmnop", 5), "abcd.");
    }
}
