//! Reporting utilities: series statistics and formatted terminal output.

use chrono::NaiveDate;

use crate::domain::Record;

pub mod format;

pub use format::*;

/// Summary statistics over the transformed series.
///
/// Records with no parseable date or a non-finite value are counted but do
/// not move the ranges.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesStats {
    pub n_records: usize,
    pub n_invalid_dates: usize,
    pub n_invalid_values: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub value_min: Option<f64>,
    pub value_max: Option<f64>,
}

pub fn series_stats(records: &[Record]) -> SeriesStats {
    let dates: Vec<NaiveDate> = records.iter().filter_map(|r| r.date).collect();
    let values: Vec<f64> = records.iter().map(|r| r.value).filter(|v| v.is_finite()).collect();

    SeriesStats {
        n_records: records.len(),
        n_invalid_dates: records.len() - dates.len(),
        n_invalid_values: records.len() - values.len(),
        first_date: dates.iter().min().copied(),
        last_date: dates.iter().max().copied(),
        value_min: values.iter().copied().reduce(f64::min),
        value_max: values.iter().copied().reduce(f64::max),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ChartVariant, RawRow};
    use crate::transform::transform_for;

    #[test]
    fn stats_skip_invalid_dates_and_values() {
        let rows = vec![
            RawRow::text("1947-01-01", "243.1"),
            RawRow::text("not a date", "250.0"),
            RawRow::text("2015-07-01", "18064.7"),
            RawRow::text("2015-10-01", "n/a"),
        ];
        let records = transform_for(&rows, ChartVariant::Bar);
        let stats = series_stats(&records);

        assert_eq!(stats.n_records, 4);
        assert_eq!(stats.n_invalid_dates, 1);
        assert_eq!(stats.n_invalid_values, 1);
        assert_eq!(stats.first_date, NaiveDate::from_ymd_opt(1947, 1, 1));
        assert_eq!(stats.last_date, NaiveDate::from_ymd_opt(2015, 10, 1));
        assert_eq!(stats.value_min, Some(243.1));
        assert_eq!(stats.value_max, Some(18064.7));
    }

    #[test]
    fn stats_of_empty_series() {
        let stats = series_stats(&[]);
        assert_eq!(stats.n_records, 0);
        assert!(stats.first_date.is_none());
        assert!(stats.value_max.is_none());
    }
}
