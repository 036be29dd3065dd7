//! Shared "load -> transform -> render" logic used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! source fetch -> transform -> scales/marks on a fresh scene
//!
//! The CLI and the TUI can then focus on presentation (files vs widgets).

use tracing::{debug, error, info};

use crate::data::{GdpClient, generate_sample, read_dataset};
use crate::domain::{ChartConfig, ChartLayout, GdpDataset, Record, SourceConfig};
use crate::error::AppError;
use crate::render::{RenderedChart, Renderer, Scene};

/// Loaded dataset plus its transformed records.
#[derive(Debug, Clone)]
pub struct LoadOutput {
    pub dataset: GdpDataset,
    pub records: Vec<Record>,
}

/// All outputs of a single chart run.
#[derive(Debug)]
pub struct ChartRun {
    pub dataset: GdpDataset,
    pub records: Vec<Record>,
    pub layout: ChartLayout,
    pub scene: Scene,
    pub chart: RenderedChart,
}

/// Fetch (or read, or generate) the raw dataset.
///
/// Failures are logged here, once, before being handed back to the caller.
pub fn load_dataset(source: &SourceConfig) -> Result<GdpDataset, AppError> {
    let result = match source {
        SourceConfig::Remote { data_source_url } => GdpClient::new(data_source_url.clone())
            .fetch_dataset()
            .map_err(AppError::from),
        SourceConfig::File { path } => read_dataset(path).map_err(AppError::from),
        SourceConfig::Demo(sample) => generate_sample(sample),
    };

    match &result {
        Ok(ds) => info!(rows = ds.data.len(), "loaded GDP dataset"),
        Err(err) => error!(error = %err, "failed to load GDP dataset"),
    }
    result
}

/// Load the dataset and transform it for the configured chart variant.
pub fn load_records(config: &ChartConfig) -> Result<LoadOutput, AppError> {
    let dataset = load_dataset(&config.source)?;
    let records = crate::transform::transform_for(&dataset.data, config.layout.variant);
    debug!(?records, "transformed records");
    Ok(LoadOutput { dataset, records })
}

/// Execute the full pipeline and return the drawn scene.
pub fn run_chart(config: &ChartConfig) -> Result<ChartRun, AppError> {
    let dataset = load_dataset(&config.source)?;
    run_chart_with_dataset(&config.layout, dataset)
}

/// Transform and render a pre-loaded dataset.
///
/// The TUI uses this to re-render (e.g. switching variant) without re-fetching.
pub fn run_chart_with_dataset(layout: &ChartLayout, dataset: GdpDataset) -> Result<ChartRun, AppError> {
    let records = crate::transform::transform_for(&dataset.data, layout.variant);
    debug!(?records, "transformed records");

    let mut layout = layout.clone();
    if layout.footnote.is_none() {
        layout.footnote = dataset.units_note();
    }

    let mut scene = Scene::new();
    let chart = Renderer::new(layout.clone()).render(&records, &mut scene)?;
    info!(marks = chart.marks.len(), variant = layout.variant.display_name(), "rendered chart");

    Ok(ChartRun {
        dataset,
        records,
        layout,
        scene,
        chart,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::parse_dataset;
    use crate::domain::{ChartVariant, QuarterLabel, SampleConfig};
    use crate::render::{MarkGeometry, PointerEvent};

    const TWO_QUARTERS: &str = r#"{"data": [["1947-01-01", "243.1"], ["1947-04-01", "246.3"]]}"#;

    #[test]
    fn end_to_end_two_quarters() {
        let dataset = parse_dataset(TWO_QUARTERS).unwrap();
        let run = run_chart_with_dataset(&ChartLayout::default(), dataset).unwrap();

        let years: Vec<_> = run.records.iter().map(|r| r.year).collect();
        let quarters: Vec<_> = run.records.iter().map(|r| r.quarter).collect();
        let values: Vec<_> = run.records.iter().map(|r| r.value).collect();
        assert_eq!(years, vec![Some(1947), Some(1947)]);
        assert_eq!(quarters, vec![QuarterLabel::Q1, QuarterLabel::Q2]);
        assert_eq!(values, vec![243.1, 246.3]);

        assert_eq!(run.chart.marks.len(), 2);
        assert_eq!(run.scene.find_by_class("bar").len(), 2);
        let m1 = MarkGeometry::from_scene(&run.scene, run.chart.marks[0]).unwrap();
        let m2 = MarkGeometry::from_scene(&run.scene, run.chart.marks[1]).unwrap();
        assert!(m1.x < m2.x);
        assert!(m2.height > m1.height);
    }

    #[test]
    fn hover_scenario() {
        let dataset = parse_dataset(TWO_QUARTERS).unwrap();
        let mut run = run_chart_with_dataset(&ChartLayout::default(), dataset).unwrap();
        let mark = run.chart.marks[1];
        let (cx, cy) = MarkGeometry::from_scene(&run.scene, mark).unwrap().center();

        run.scene.dispatch(mark, &PointerEvent::enter(cx, cy));
        let text = run.scene.text(run.chart.tooltip).unwrap().to_string();
        assert!(run.scene.is_visible(run.chart.tooltip));
        assert!(text.contains("1947"));
        assert!(text.contains("Q2"));

        run.scene.dispatch(mark, &PointerEvent::leave(cx, cy));
        assert!(!run.scene.is_visible(run.chart.tooltip));
    }

    #[test]
    fn empty_dataset_is_not_rendered() {
        let dataset = parse_dataset(r#"{"data": []}"#).unwrap();
        let err = run_chart_with_dataset(&ChartLayout::default(), dataset).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn footnote_comes_from_dataset_description() {
        let dataset = parse_dataset(
            r#"{"description": "Units: Billions of Dollars", "data": [["1947-01-01", "1"]]}"#,
        )
        .unwrap();
        let run = run_chart_with_dataset(&ChartLayout::default(), dataset).unwrap();
        assert_eq!(run.layout.footnote.as_deref(), Some("Units: Billions of Dollars"));
    }

    #[test]
    fn demo_source_runs_offline() {
        let config = ChartConfig {
            source: SourceConfig::Demo(SampleConfig { seed: 3, quarters: 12, start_year: 1990 }),
            layout: ChartLayout {
                variant: ChartVariant::Scatter,
                ..ChartLayout::default()
            },
        };
        let loaded = load_records(&config).unwrap();
        assert_eq!(loaded.records.len(), 12);
        assert!(loaded.records.iter().all(|r| r.date_label.is_none()));

        let run = run_chart(&config).unwrap();
        assert_eq!(run.scene.find_by_class("dot").len(), 12);
    }

    #[test]
    fn missing_input_file_fails_with_io_code() {
        let config = ChartConfig {
            source: SourceConfig::File { path: "/no/such/gdp.json".into() },
            layout: ChartLayout::default(),
        };
        let err = load_records(&config).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
