//! Export records to CSV and the rendered chart to SVG/HTML.
//!
//! The CSV is meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use tracing::info;

use crate::domain::Record;
use crate::error::AppError;
use crate::render::{RenderedChart, Scene, svg};

/// Write the transformed records to a CSV file.
pub fn write_records_csv(path: &Path, records: &[Record]) -> Result<(), AppError> {
    let mut file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;

    writeln!(file, "date,year,quarter,value,date_label")
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for r in records {
        writeln!(
            file,
            "{},{},{},{},{}",
            r.date.map(|d| d.to_string()).unwrap_or_default(),
            r.year.map(|y| y.to_string()).unwrap_or_default(),
            r.quarter,
            r.value,
            csv_field(r.date_label.as_deref().unwrap_or("")),
        )
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    info!(path = %path.display(), rows = records.len(), "wrote records CSV");
    Ok(())
}

/// Write the chart's `<svg>` subtree as a standalone SVG document.
pub fn write_svg(path: &Path, scene: &Scene, chart: &RenderedChart) -> Result<(), AppError> {
    write_text(path, &svg::to_svg(scene, chart.svg), "SVG")
}

/// Write the whole page (chart plus tooltip element) as an HTML document.
pub fn write_html(path: &Path, scene: &Scene, title: &str) -> Result<(), AppError> {
    write_text(path, &svg::to_html(scene, title), "HTML")
}

fn write_text(path: &Path, text: &str, what: &str) -> Result<(), AppError> {
    std::fs::write(path, text)
        .map_err(|e| AppError::new(2, format!("Failed to write {what} '{}': {e}", path.display())))?;
    info!(path = %path.display(), bytes = text.len(), "wrote {what}");
    Ok(())
}

fn csv_field(s: &str) -> String {
    if s.contains([',', '"', '\n']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ChartLayout, RawRow};
    use crate::render::Renderer;
    use crate::transform::transform;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("gdp-chart-{}-{name}", std::process::id()))
    }

    #[test]
    fn csv_has_header_and_one_line_per_record() {
        let records = transform(&[
            RawRow::text("1947-01-01", "243.1"),
            RawRow::text("bad,date", "1"),
        ]);
        let path = temp_path("records.csv");
        write_records_csv(&path, &records).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "date,year,quarter,value,date_label");
        assert_eq!(lines[1], "1947-01-01,1947,Q1,243.1,1947-01-01");
        assert_eq!(lines[2], ",,Q4,1,\"bad,date\"");
    }

    #[test]
    fn svg_and_html_files_are_written() {
        let records = transform(&[RawRow::text("1947-01-01", "243.1"), RawRow::text("1947-04-01", "246.3")]);
        let mut scene = Scene::new();
        let chart = Renderer::new(ChartLayout::default()).render(&records, &mut scene).unwrap();

        let svg_path = temp_path("chart.svg");
        write_svg(&svg_path, &scene, &chart).unwrap();
        let svg_text = std::fs::read_to_string(&svg_path).unwrap();
        std::fs::remove_file(&svg_path).ok();
        assert!(svg_text.starts_with("<?xml"));
        assert!(svg_text.contains("class=\"bar\""));

        let html_path = temp_path("chart.html");
        write_html(&html_path, &scene, "United States GDP").unwrap();
        let html_text = std::fs::read_to_string(&html_path).unwrap();
        std::fs::remove_file(&html_path).ok();
        assert!(html_text.contains("id=\"tooltip\""));
    }

    #[test]
    fn unwritable_path_maps_to_io_code() {
        let err = write_records_csv(Path::new("/no/such/dir/records.csv"), &[]).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
