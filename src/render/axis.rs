//! Axes and gridlines.
//!
//! Tick groups follow the usual SVG axis layout: one `g.tick` per tick holding
//! a short `line` and a `text` label, positioned with a `translate`.

use chrono::NaiveDate;

use crate::domain::ChartLayout;

use super::scale::{LinearScale, TimeScale};
use super::surface::{fmt_num, DrawSurface, ElementKind, NodeId};

pub const X_TICK_COUNT: usize = 10;
pub const Y_TICK_COUNT: usize = 10;

const TICK_SIZE: f64 = 6.0;
const TICK_PADDING: f64 = 3.0;

/// Year label used on the time axis.
pub fn fmt_year_tick(d: NaiveDate) -> String {
    d.format("%Y").to_string()
}

/// Integer label used on the value axis.
pub fn fmt_value_tick(v: f64) -> String {
    if v.is_finite() {
        format!("{v:.0}")
    } else {
        "NaN".to_string()
    }
}

pub fn draw_bottom_axis(
    surface: &mut dyn DrawSurface,
    svg: NodeId,
    x: &TimeScale,
    layout: &ChartLayout,
) -> NodeId {
    let dims = layout.dimensions;
    let margins = layout.margins;
    let [r0, r1] = x.range();

    let axis = axis_group(surface, svg, "x-axis");
    surface.set_attr(
        axis,
        "transform",
        format!("translate(0,{})", fmt_num(dims.height - margins.bottom)),
    );
    surface.set_attr(axis, "text-anchor", "middle".to_string());

    let domain = surface.append(axis, ElementKind::Path);
    surface.set_attr(domain, "class", "domain".to_string());
    surface.set_attr(domain, "stroke", "currentColor".to_string());
    surface.set_attr(domain, "fill", "none".to_string());
    surface.set_attr(
        domain,
        "d",
        format!("M{},{TICK_SIZE}V0H{}V{TICK_SIZE}", fmt_num(r0), fmt_num(r1)),
    );

    for tick in x.ticks(X_TICK_COUNT) {
        let g = tick_group(surface, axis, format!("translate({},0)", fmt_num(x.scale(tick))));
        let line = surface.append(g, ElementKind::Line);
        surface.set_attr(line, "stroke", "currentColor".to_string());
        surface.set_attr(line, "y2", fmt_num(TICK_SIZE));

        let text = surface.append(g, ElementKind::Text);
        surface.set_attr(text, "fill", "currentColor".to_string());
        surface.set_attr(text, "y", fmt_num(TICK_SIZE + TICK_PADDING));
        surface.set_attr(text, "dy", "0.71em".to_string());
        surface.set_text(text, fmt_year_tick(tick));
    }

    let label = surface.append(svg, ElementKind::Text);
    surface.set_attr(label, "class", "axis-label".to_string());
    surface.set_attr(label, "id", "x-axis-label".to_string());
    surface.set_attr(label, "x", fmt_num((r0 + r1) / 2.0));
    surface.set_attr(label, "y", fmt_num(dims.height - margins.bottom / 4.0));
    surface.set_attr(label, "text-anchor", "middle".to_string());
    surface.set_text(label, layout.x_label.clone());

    axis
}

/// Left value axis. The domain line is not drawn; gridlines carry the baseline.
pub fn draw_left_axis(
    surface: &mut dyn DrawSurface,
    svg: NodeId,
    y: &LinearScale,
    layout: &ChartLayout,
) -> NodeId {
    let dims = layout.dimensions;
    let margins = layout.margins;

    let axis = axis_group(surface, svg, "y-axis");
    surface.set_attr(axis, "transform", format!("translate({},0)", fmt_num(margins.left)));
    surface.set_attr(axis, "text-anchor", "end".to_string());

    for tick in y.ticks(Y_TICK_COUNT) {
        let g = tick_group(surface, axis, format!("translate(0,{})", fmt_num(y.scale(tick))));
        let line = surface.append(g, ElementKind::Line);
        surface.set_attr(line, "stroke", "currentColor".to_string());
        surface.set_attr(line, "x2", fmt_num(-TICK_SIZE));

        let text = surface.append(g, ElementKind::Text);
        surface.set_attr(text, "fill", "currentColor".to_string());
        surface.set_attr(text, "x", fmt_num(-(TICK_SIZE + TICK_PADDING)));
        surface.set_attr(text, "dy", "0.32em".to_string());
        surface.set_text(text, fmt_value_tick(tick));
    }

    let label = surface.append(svg, ElementKind::Text);
    surface.set_attr(label, "class", "axis-label".to_string());
    surface.set_attr(label, "id", "y-axis-label".to_string());
    surface.set_attr(label, "transform", "rotate(-90)".to_string());
    surface.set_attr(label, "x", fmt_num(-(dims.height / 2.0)));
    surface.set_attr(label, "y", fmt_num(margins.left / 4.0));
    surface.set_attr(label, "text-anchor", "middle".to_string());
    surface.set_text(label, layout.y_label.clone());

    axis
}

/// One horizontal line across the plot area per value tick.
pub fn draw_gridlines(
    surface: &mut dyn DrawSurface,
    svg: NodeId,
    y: &LinearScale,
    layout: &ChartLayout,
) -> NodeId {
    let dims = layout.dimensions;
    let margins = layout.margins;

    let grid = surface.append(svg, ElementKind::Group);
    surface.set_attr(grid, "class", "grid".to_string());

    for tick in y.ticks(Y_TICK_COUNT) {
        let py = fmt_num(y.scale(tick));
        let line = surface.append(grid, ElementKind::Line);
        surface.set_attr(line, "class", "gridline".to_string());
        surface.set_attr(line, "x1", fmt_num(margins.left));
        surface.set_attr(line, "x2", fmt_num(dims.width - margins.right));
        surface.set_attr(line, "y1", py.clone());
        surface.set_attr(line, "y2", py);
        surface.set_attr(line, "stroke", "#e0e0e0".to_string());
    }

    grid
}

fn axis_group(surface: &mut dyn DrawSurface, svg: NodeId, id: &str) -> NodeId {
    let axis = surface.append(svg, ElementKind::Group);
    surface.set_attr(axis, "id", id.to_string());
    surface.set_attr(axis, "class", "axis".to_string());
    surface.set_attr(axis, "font-size", "10".to_string());
    surface.set_attr(axis, "font-family", "sans-serif".to_string());
    axis
}

fn tick_group(surface: &mut dyn DrawSurface, axis: NodeId, transform: String) -> NodeId {
    let g = surface.append(axis, ElementKind::Group);
    surface.set_attr(g, "class", "tick".to_string());
    surface.set_attr(g, "transform", transform);
    g
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Scene;

    fn scales(layout: &ChartLayout) -> (TimeScale, LinearScale) {
        let d = layout.dimensions;
        let m = layout.margins;
        let x = TimeScale::new(
            NaiveDate::from_ymd_opt(1947, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2015, 7, 1).unwrap(),
            [m.left, d.width - m.right],
        );
        let y = LinearScale::new([0.0, 18064.7], [d.height - m.bottom, m.top]);
        (x, y)
    }

    #[test]
    fn left_axis_has_ticks_but_no_domain_line() {
        let layout = ChartLayout::default();
        let (_, y) = scales(&layout);
        let mut scene = Scene::new();
        let svg = scene.append(scene.container(), ElementKind::Svg);

        let axis = draw_left_axis(&mut scene, svg, &y, &layout);

        let below = scene.descendants(axis);
        assert!(below.iter().all(|&n| !scene.has_class(n, "domain")));
        let labels: Vec<_> = below
            .iter()
            .filter(|&&n| scene.kind(n) == Some(ElementKind::Text))
            .filter_map(|&n| scene.text(n))
            .collect();
        assert_eq!(labels.first(), Some(&"0"));
        assert_eq!(labels.last(), Some(&"18000"));
        assert_eq!(scene.find_by_id("y-axis-label").and_then(|n| scene.text(n)), Some("Gross Domestic Product"));
    }

    #[test]
    fn bottom_axis_labels_are_years() {
        let layout = ChartLayout::default();
        let (x, _) = scales(&layout);
        let mut scene = Scene::new();
        let svg = scene.append(scene.container(), ElementKind::Svg);

        let axis = draw_bottom_axis(&mut scene, svg, &x, &layout);

        assert_eq!(scene.attr(axis, "transform"), Some("translate(0,440)"));
        assert_eq!(scene.find_by_class("domain").len(), 1);
        let ticks = scene.find_by_class("tick");
        assert_eq!(ticks.len(), 14);
        let first_label = scene.children(ticks[0])[1];
        assert_eq!(scene.text(first_label), Some("1950"));
    }

    #[test]
    fn one_gridline_per_value_tick() {
        let layout = ChartLayout::default();
        let (_, y) = scales(&layout);
        let mut scene = Scene::new();
        let svg = scene.append(scene.container(), ElementKind::Svg);

        draw_gridlines(&mut scene, svg, &y, &layout);

        let lines = scene.find_by_class("gridline");
        assert_eq!(lines.len(), y.ticks(Y_TICK_COUNT).len());
        assert_eq!(scene.attr(lines[0], "y1"), Some("440"));
        assert_eq!(scene.attr(lines[0], "x2"), Some("860"));
    }
}
