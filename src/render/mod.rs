//! Records -> chart on a draw surface.
//!
//! `Renderer::render` computes a time scale (x) and a value scale (y) from the
//! records, then appends into the surface's container:
//!
//! - an `svg` root sized to the layout
//! - gridlines, a bottom year axis and a left value axis
//! - one mark per record (`rect.bar` or `circle.dot`), each wired to the
//!   shared tooltip
//! - the title (and an optional footnote)
//!
//! The tooltip itself goes on the page, outside the chart.

use thiserror::Error;

use crate::domain::{ChartLayout, ChartVariant, Record};

pub mod axis;
pub mod scale;
pub mod scene;
pub mod surface;
pub mod svg;
pub mod tooltip;

pub use scale::{LinearScale, TimeScale};
pub use scene::Scene;
pub use surface::{fmt_num, DrawSurface, ElementKind, NodeId, PointerEvent, PointerEventKind};
pub use tooltip::TooltipContent;

/// Bar width is the chart width split into this many slots.
pub const BAR_WIDTH_DIVISOR: f64 = 275.0;

pub const DOT_RADIUS: f64 = 3.0;

const MARK_FILL: &str = "#33adff";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("cannot render an empty dataset")]
    EmptyDataset,
}

/// Handles into the drawn chart.
#[derive(Debug, Clone)]
pub struct RenderedChart {
    pub svg: NodeId,
    pub tooltip: NodeId,
    /// One mark per record, in record order.
    pub marks: Vec<NodeId>,
    pub x_scale: TimeScale,
    pub y_scale: LinearScale,
}

#[derive(Debug, Clone)]
pub struct Renderer {
    layout: ChartLayout,
}

impl Renderer {
    pub fn new(layout: ChartLayout) -> Self {
        Self { layout }
    }

    /// `[min(date), max(date)]` -> `[left, width - right]`. Absent dates are ignored.
    pub fn x_scale(&self, records: &[Record]) -> TimeScale {
        let range = [
            self.layout.margins.left,
            self.layout.dimensions.width - self.layout.margins.right,
        ];
        let min = records.iter().filter_map(|r| r.date).min();
        let max = records.iter().filter_map(|r| r.date).max();
        match (min, max) {
            (Some(lo), Some(hi)) => TimeScale::new(lo, hi, range),
            _ => TimeScale::undefined(range),
        }
    }

    /// `[0, max(value)]` -> `[height - bottom, top]`. Non-finite values are ignored.
    pub fn y_scale(&self, records: &[Record]) -> LinearScale {
        let max = records
            .iter()
            .map(|r| r.value)
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |m| m.max(v))))
            .unwrap_or(f64::NAN);
        LinearScale::new(
            [0.0, max],
            [
                self.layout.dimensions.height - self.layout.margins.bottom,
                self.layout.margins.top,
            ],
        )
    }

    pub fn bar_width(&self) -> f64 {
        self.layout.dimensions.width / BAR_WIDTH_DIVISOR
    }

    pub fn render(
        &self,
        records: &[Record],
        surface: &mut dyn DrawSurface,
    ) -> Result<RenderedChart, RenderError> {
        if records.is_empty() {
            return Err(RenderError::EmptyDataset);
        }

        let layout = &self.layout;
        let x = self.x_scale(records);
        let y = self.y_scale(records);

        let container = surface.container();
        let svg = surface.append(container, ElementKind::Svg);
        surface.set_attr(svg, "xmlns", "http://www.w3.org/2000/svg".to_string());
        surface.set_attr(svg, "width", fmt_num(layout.dimensions.width));
        surface.set_attr(svg, "height", fmt_num(layout.dimensions.height));
        surface.set_attr(
            svg,
            "viewBox",
            format!(
                "0 0 {} {}",
                fmt_num(layout.dimensions.width),
                fmt_num(layout.dimensions.height)
            ),
        );

        self.draw_title(surface, svg);
        axis::draw_gridlines(surface, svg, &y, layout);
        axis::draw_bottom_axis(surface, svg, &x, layout);
        axis::draw_left_axis(surface, svg, &y, layout);

        let tooltip = tooltip::create_tooltip(surface);

        let group = surface.append(svg, ElementKind::Group);
        surface.set_attr(group, "class", "marks".to_string());

        let marks = records
            .iter()
            .enumerate()
            .map(|(i, record)| {
                let mark = match layout.variant {
                    ChartVariant::Bar => self.draw_bar(surface, group, i, record, &x, &y),
                    ChartVariant::Scatter => self.draw_dot(surface, group, i, record, &x, &y),
                };
                let content = TooltipContent::from_record(record);
                let title = surface.append(mark, ElementKind::Title);
                surface.set_text(title, content.text());
                tooltip::attach_hover(surface, mark, tooltip, content);
                mark
            })
            .collect();

        if let Some(note) = &layout.footnote {
            let text = surface.append(svg, ElementKind::Text);
            surface.set_attr(text, "class", "footnote".to_string());
            surface.set_attr(text, "x", fmt_num(layout.dimensions.width - layout.margins.right));
            surface.set_attr(text, "y", fmt_num(layout.dimensions.height - 4.0));
            surface.set_attr(text, "text-anchor", "end".to_string());
            surface.set_attr(text, "font-size", "10".to_string());
            surface.set_text(text, note.clone());
        }

        Ok(RenderedChart {
            svg,
            tooltip,
            marks,
            x_scale: x,
            y_scale: y,
        })
    }

    fn draw_title(&self, surface: &mut dyn DrawSurface, svg: NodeId) {
        let title = surface.append(svg, ElementKind::Text);
        surface.set_attr(title, "id", "title".to_string());
        surface.set_attr(title, "x", fmt_num(self.layout.dimensions.width / 2.0));
        surface.set_attr(title, "y", fmt_num(self.layout.margins.top / 2.0));
        surface.set_attr(title, "text-anchor", "middle".to_string());
        surface.set_attr(title, "font-size", "24".to_string());
        surface.set_text(title, self.layout.title.clone());
    }

    fn draw_bar(
        &self,
        surface: &mut dyn DrawSurface,
        group: NodeId,
        index: usize,
        record: &Record,
        x: &TimeScale,
        y: &LinearScale,
    ) -> NodeId {
        let top = y.scale(record.value);
        let bar = surface.append(group, ElementKind::Rect);
        surface.set_attr(bar, "id", mark_id("bar", index, record));
        surface.set_attr(bar, "class", "bar".to_string());
        surface.set_attr(bar, "x", fmt_num(x.scale_opt(record.date)));
        surface.set_attr(bar, "y", fmt_num(top));
        surface.set_attr(bar, "width", fmt_num(self.bar_width()));
        surface.set_attr(bar, "height", fmt_num(y.scale(0.0) - top));
        surface.set_attr(bar, "data-date", record.date_label.clone().unwrap_or_default());
        surface.set_attr(bar, "data-gdp", fmt_num(record.value));
        surface.set_attr(bar, "fill", MARK_FILL.to_string());
        bar
    }

    fn draw_dot(
        &self,
        surface: &mut dyn DrawSurface,
        group: NodeId,
        index: usize,
        record: &Record,
        x: &TimeScale,
        y: &LinearScale,
    ) -> NodeId {
        let dot = surface.append(group, ElementKind::Circle);
        surface.set_attr(dot, "id", mark_id("dot", index, record));
        surface.set_attr(dot, "class", "dot".to_string());
        surface.set_attr(dot, "cx", fmt_num(x.scale_opt(record.date)));
        surface.set_attr(dot, "cy", fmt_num(y.scale(record.value)));
        surface.set_attr(dot, "r", fmt_num(DOT_RADIUS));
        surface.set_attr(dot, "data-gdp", fmt_num(record.value));
        surface.set_attr(dot, "fill", MARK_FILL.to_string());
        dot
    }
}

/// Stable element id: the original date text when kept, else the position.
fn mark_id(prefix: &str, index: usize, record: &Record) -> String {
    match &record.date_label {
        Some(label) => format!("{prefix}-{label}"),
        None => format!("{prefix}-{index}"),
    }
}

/// Box occupied by a drawn mark, in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkGeometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl MarkGeometry {
    /// Read the geometry back from a scene. Circles report their bounding box.
    pub fn from_scene(scene: &Scene, mark: NodeId) -> Option<Self> {
        match scene.kind(mark)? {
            ElementKind::Rect => Some(Self {
                x: scene.attr_f64(mark, "x")?,
                y: scene.attr_f64(mark, "y")?,
                width: scene.attr_f64(mark, "width")?,
                height: scene.attr_f64(mark, "height")?,
            }),
            ElementKind::Circle => {
                let r = scene.attr_f64(mark, "r")?;
                Some(Self {
                    x: scene.attr_f64(mark, "cx")? - r,
                    y: scene.attr_f64(mark, "cy")? - r,
                    width: 2.0 * r,
                    height: 2.0 * r,
                })
            }
            _ => None,
        }
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }
}
