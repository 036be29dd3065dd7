//! Plotters-powered GDP chart widget for Ratatui.
//!
//! The widget replays the geometry already laid out in the [`Scene`] rather than
//! computing its own scales, so the terminal view and the SVG export agree.
//! Plotters works in surface pixels with the y axis flipped (SVG y grows down).
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.
//!
//! [`Scene`]: crate::render::Scene

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::domain::{ChartLayout, ChartVariant};
use crate::render::{LinearScale, MarkGeometry, TimeScale};

/// A lightweight, render-only chart description.
pub struct GdpPlottersChart<'a> {
    /// Mark boxes in surface pixels, in record order.
    pub marks: &'a [MarkGeometry],
    /// Index into `marks` under the pointer.
    pub hovered: Option<usize>,
    pub layout: &'a ChartLayout,
    pub x_scale: &'a TimeScale,
    pub y_scale: &'a LinearScale,
}

impl GdpPlottersChart<'_> {
    /// Plot-area bounds in flipped surface pixels: `(x0..x1, y0..y1)`.
    fn bounds(&self) -> ([f64; 2], [f64; 2]) {
        let d = self.layout.dimensions;
        let m = self.layout.margins;
        ([m.left, d.width - m.right], [m.bottom, d.height - m.top])
    }

    fn flip(&self, y: f64) -> f64 {
        self.layout.dimensions.height - y
    }
}

impl Widget for GdpPlottersChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let ([x0, x1], [y0, y1]) = self.bounds();
        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        let height = self.layout.dimensions.height;
        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .set_label_area_size(LabelAreaPosition::Left, 8)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            // Horizontal gridlines only, matching the SVG.
            chart
                .configure_mesh()
                .disable_x_mesh()
                .x_desc(self.layout.x_label.as_str())
                .y_desc(self.layout.y_label.as_str())
                .x_labels(6)
                .y_labels(5)
                .x_label_formatter(&|v| fmt_year(self.x_scale, *v))
                .y_label_formatter(&|v| fmt_value(self.y_scale, height - *v))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&RGBColor(80, 80, 80))
                .draw()?;

            let bar_color = RGBColor(51, 173, 255);
            let hover_color = RGBColor(255, 255, 0);

            let drawable = self
                .marks
                .iter()
                .enumerate()
                .filter(|(_, g)| g.is_finite());

            match self.layout.variant {
                // One vertical stroke per bar; terminal cells are far wider than a bar.
                ChartVariant::Bar => {
                    chart.draw_series(drawable.map(|(i, g)| {
                        let color = if self.hovered == Some(i) { hover_color } else { bar_color };
                        let cx = g.x + g.width / 2.0;
                        PathElement::new(
                            vec![(cx, self.flip(g.y + g.height)), (cx, self.flip(g.y))],
                            color,
                        )
                    }))?;
                }
                // `Circle` radii are mapped wrongly by the ratatui backend; use pixels.
                ChartVariant::Scatter => {
                    chart.draw_series(drawable.map(|(i, g)| {
                        let color = if self.hovered == Some(i) { hover_color } else { bar_color };
                        let (cx, cy) = g.center();
                        Pixel::new((cx, self.flip(cy)), color)
                    }))?;
                }
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}

fn fmt_year(x_scale: &TimeScale, px: f64) -> String {
    x_scale
        .invert(px)
        .map(|d| chrono::Datelike::year(&d).to_string())
        .unwrap_or_default()
}

fn fmt_value(y_scale: &LinearScale, px: f64) -> String {
    let v = y_scale.invert(px);
    if v.is_finite() { format!("{v:.0}") } else { String::new() }
}
