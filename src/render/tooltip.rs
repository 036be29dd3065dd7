//! Hover tooltip shared by all marks.
//!
//! The tooltip is a single overlay element on the page. Each mark registers
//! its own enter/leave pair that writes into it, so the last hover wins.

use std::rc::Rc;

use crate::domain::{QuarterLabel, Record};

use super::surface::{fmt_num, DrawSurface, ElementKind, NodeId, PointerEvent, PointerEventKind};

/// Tooltip placement relative to the pointer.
pub const OFFSET_X: f64 = 10.0;
pub const OFFSET_Y: f64 = -28.0;

const SHOWN_OPACITY: &str = "0.9";
const HIDDEN_OPACITY: &str = "0";

/// What a mark shows when hovered.
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipContent {
    pub year: String,
    pub quarter: QuarterLabel,
    pub value: f64,
    pub date_label: Option<String>,
}

impl TooltipContent {
    pub fn from_record(record: &Record) -> Self {
        Self {
            year: record.year_label(),
            quarter: record.quarter,
            value: record.value,
            date_label: record.date_label.clone(),
        }
    }

    /// Two lines: `"1947 Q1"` then `"$243.1 Billion"`.
    pub fn text(&self) -> String {
        format!("{} {}\n{}", self.year, self.quarter, format_billions(self.value))
    }
}

/// `$18,064.7 Billion`.
pub fn format_billions(v: f64) -> String {
    if !v.is_finite() {
        return format!("${} Billion", fmt_num(v));
    }
    let fixed = format!("{:.1}", v.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "0"));
    let sign = if v < 0.0 { "-" } else { "" };
    format!("{sign}${}.{frac_part} Billion", group_thousands(int_part))
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Append the (hidden) tooltip element to the page.
pub fn create_tooltip(surface: &mut dyn DrawSurface) -> NodeId {
    let page = surface.page();
    let tooltip = surface.append(page, ElementKind::Div);
    surface.set_attr(tooltip, "id", "tooltip".to_string());
    surface.set_attr(tooltip, "class", "tooltip".to_string());
    surface.set_style(tooltip, "position", "absolute".to_string());
    surface.set_style(tooltip, "pointer-events", "none".to_string());
    surface.set_style(tooltip, "opacity", HIDDEN_OPACITY.to_string());
    tooltip
}

/// Register the enter/leave pair for one mark.
pub fn attach_hover(
    surface: &mut dyn DrawSurface,
    mark: NodeId,
    tooltip: NodeId,
    content: TooltipContent,
) {
    let shown = Rc::new(content);
    surface.on_pointer(
        mark,
        PointerEventKind::Enter,
        Rc::new(move |surface: &mut dyn DrawSurface, ev: &PointerEvent| {
            surface.set_style(tooltip, "opacity", SHOWN_OPACITY.to_string());
            surface.set_text(tooltip, shown.text());
            surface.set_attr(
                tooltip,
                "data-date",
                shown.date_label.clone().unwrap_or_default(),
            );
            surface.set_style(tooltip, "left", format!("{}px", fmt_num(ev.page_x + OFFSET_X)));
            surface.set_style(tooltip, "top", format!("{}px", fmt_num(ev.page_y + OFFSET_Y)));
        }),
    );

    surface.on_pointer(
        mark,
        PointerEventKind::Leave,
        Rc::new(move |surface: &mut dyn DrawSurface, _ev: &PointerEvent| {
            surface.set_style(tooltip, "opacity", HIDDEN_OPACITY.to_string());
        }),
    );
}
