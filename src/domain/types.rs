//! Shared domain types.
//!
//! These types are intentionally kept lightweight so they can be:
//!
//! - deserialized straight from the GDP JSON document
//! - carried through the transform step without copies of derived state
//! - handed to the renderer and the reporting code unchanged

use std::fmt;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::de::{IgnoredAny, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// Which chart flavour to draw.
///
/// The bar variant keeps the original date text on every record so it can be
/// used as a stable mark identifier and shown in the tooltip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ChartVariant {
    Bar,
    Scatter,
}

impl ChartVariant {
    pub fn display_name(self) -> &'static str {
        match self {
            ChartVariant::Bar => "bar",
            ChartVariant::Scatter => "scatter",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            ChartVariant::Bar => ChartVariant::Scatter,
            ChartVariant::Scatter => ChartVariant::Bar,
        }
    }

    /// Whether records for this variant retain their unparsed date text.
    pub fn keeps_date_label(self) -> bool {
        matches!(self, ChartVariant::Bar)
    }
}

/// First element of a raw row.
///
/// The source delivers date strings; a bare number is read as a millisecond
/// timestamp. Anything else is kept as-is and yields no date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PointInTime {
    Text(String),
    Timestamp(i64),
    Other(serde_json::Value),
}

impl fmt::Display for PointInTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointInTime::Text(text) => f.write_str(text),
            PointInTime::Timestamp(ms) => write!(f, "{ms}"),
            PointInTime::Other(value) => write!(f, "{value}"),
        }
    }
}

/// Second element of a raw row, before numeric coercion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Number(f64),
    Text(String),
    Flag(bool),
    Missing,
    /// Arrays, objects.
    Other(serde_json::Value),
    /// The row ended before the amount.
    #[serde(skip)]
    Absent,
}

/// A `[pointInTime, amount]` pair exactly as delivered by the data source.
///
/// Deserialization reads the first two elements of the array and ignores the
/// rest, so one odd row never rejects the whole document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawRow(pub PointInTime, pub Amount);

impl RawRow {
    /// Convenience constructor for the common `["YYYY-MM-DD", "123.4"]` shape.
    pub fn text(date: impl Into<String>, amount: impl Into<String>) -> Self {
        RawRow(PointInTime::Text(date.into()), Amount::Text(amount.into()))
    }
}

impl<'de> Deserialize<'de> for RawRow {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RowVisitor;

        impl<'de> Visitor<'de> for RowVisitor {
            type Value = RawRow;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a [date, amount] array")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<RawRow, A::Error> {
                let point = seq
                    .next_element::<PointInTime>()?
                    .unwrap_or(PointInTime::Other(serde_json::Value::Null));
                let amount = seq.next_element::<Amount>()?.unwrap_or(Amount::Absent);
                while seq.next_element::<IgnoredAny>()?.is_some() {}
                Ok(RawRow(point, amount))
            }
        }

        deserializer.deserialize_seq(RowVisitor)
    }
}

/// Fiscal quarter label derived from the month of a record's date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuarterLabel {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl QuarterLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            QuarterLabel::Q1 => "Q1",
            QuarterLabel::Q2 => "Q2",
            QuarterLabel::Q3 => "Q3",
            QuarterLabel::Q4 => "Q4",
        }
    }
}

impl fmt::Display for QuarterLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A chart-ready observation derived 1:1 from a [`RawRow`].
///
/// `date` and `year` are `None` when the source date could not be parsed;
/// `value` is NaN when the amount could not be coerced. Neither case is an
/// error: downstream code treats them as "not a number".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub date: Option<NaiveDate>,
    pub value: f64,
    pub year: Option<i32>,
    pub quarter: QuarterLabel,
    pub date_label: Option<String>,
}

impl Record {
    /// Year rendered for labels, with a placeholder for unparseable dates.
    pub fn year_label(&self) -> String {
        match self.year {
            Some(year) => year.to_string(),
            None => "n/a".to_string(),
        }
    }
}

/// The full JSON document served by the data source.
///
/// Only `data` is required; the descriptive fields are carried along when the
/// source provides them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GdpDataset {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub frequency: Option<String>,
    #[serde(default)]
    pub from_date: Option<String>,
    #[serde(default)]
    pub to_date: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    pub data: Vec<RawRow>,
}

impl GdpDataset {
    pub fn from_rows(data: Vec<RawRow>) -> Self {
        Self {
            data,
            ..Self::default()
        }
    }

    /// First line of the description, used as a chart footnote.
    pub fn units_note(&self) -> Option<String> {
        self.description
            .as_deref()
            .and_then(|d| d.lines().map(str::trim).find(|l| !l.is_empty()))
            .map(str::to_string)
    }
}

/// Overall chart size in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartDimensions {
    pub width: f64,
    pub height: f64,
}

impl Default for ChartDimensions {
    fn default() -> Self {
        Self {
            width: 900.0,
            height: 500.0,
        }
    }
}

/// Insets between the chart edge and the plotted area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 60.0,
            right: 40.0,
            bottom: 60.0,
            left: 80.0,
        }
    }
}

/// Everything the renderer needs besides the records themselves.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartLayout {
    pub dimensions: ChartDimensions,
    pub margins: Margins,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub footnote: Option<String>,
    pub variant: ChartVariant,
}

impl Default for ChartLayout {
    fn default() -> Self {
        Self {
            dimensions: ChartDimensions::default(),
            margins: Margins::default(),
            title: DEFAULT_TITLE.to_string(),
            x_label: "Year".to_string(),
            y_label: "Gross Domestic Product".to_string(),
            footnote: None,
            variant: ChartVariant::Bar,
        }
    }
}

pub const DEFAULT_TITLE: &str = "United States GDP";

/// Where the raw dataset comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceConfig {
    Remote { data_source_url: String },
    File { path: std::path::PathBuf },
    Demo(SampleConfig),
}

/// Parameters for the offline synthetic series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleConfig {
    pub seed: u64,
    pub quarters: usize,
    pub start_year: i32,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            quarters: 275,
            start_year: 1947,
        }
    }
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus `.env` and defaults).
#[derive(Debug, Clone, PartialEq)]
pub struct ChartConfig {
    pub source: SourceConfig,
    pub layout: ChartLayout,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_rows_accept_strings_numbers_and_nulls() {
        let rows: Vec<RawRow> =
            serde_json::from_str(r#"[["1947-01-01", "243.1"], ["1947-04-01", 246.3], [-694224000000, null]]"#)
                .unwrap();

        assert_eq!(rows[0], RawRow::text("1947-01-01", "243.1"));
        assert_eq!(rows[1].1, Amount::Number(246.3));
        assert_eq!(rows[2].0, PointInTime::Timestamp(-694224000000));
        assert_eq!(rows[2].1, Amount::Missing);
    }

    #[test]
    fn odd_rows_do_not_reject_the_document() {
        let ds: GdpDataset = serde_json::from_str(
            r#"{"data": [["1947-01-01", "243.1", "extra", 4], [null, "1"], [true, [1]], ["1947-04-01"], []]}"#,
        )
        .unwrap();

        assert_eq!(ds.data.len(), 5);
        assert_eq!(ds.data[0], RawRow::text("1947-01-01", "243.1"));
        assert_eq!(ds.data[1].0, PointInTime::Other(serde_json::Value::Null));
        assert_eq!(ds.data[1].1, Amount::Text("1".to_string()));
        assert_eq!(ds.data[2].0, PointInTime::Other(serde_json::Value::Bool(true)));
        assert_eq!(ds.data[2].1, Amount::Other(serde_json::json!([1])));
        assert_eq!(ds.data[3].1, Amount::Absent);
        assert_eq!(ds.data[4], RawRow(PointInTime::Other(serde_json::Value::Null), Amount::Absent));
    }

    #[test]
    fn dataset_metadata_is_optional() {
        let ds: GdpDataset = serde_json::from_str(r#"{"data": []}"#).unwrap();
        assert!(ds.name.is_none());
        assert!(ds.data.is_empty());
        assert!(ds.units_note().is_none());
    }

    #[test]
    fn units_note_takes_first_description_line() {
        let ds = GdpDataset {
            description: Some("\nUnits: Billions of Dollars\nSeasonal Adjustment: SAAR".to_string()),
            ..GdpDataset::default()
        };
        assert_eq!(ds.units_note().as_deref(), Some("Units: Billions of Dollars"));
    }
}
