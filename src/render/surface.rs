//! The host UI surface the renderer draws onto.
//!
//! A surface needs three capabilities: create/append elements, mutate their
//! attributes/styles/text, and accept pointer-enter/pointer-leave handlers per
//! element. [`crate::render::Scene`] is the in-memory implementation.

use std::rc::Rc;

/// Handle to an element owned by a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

/// Element kinds the renderer creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// Host page body (tooltip parent).
    Page,
    /// Plain HTML block (chart container, tooltip).
    Div,
    Svg,
    Group,
    Rect,
    Circle,
    Line,
    Path,
    Text,
    /// Hover text attached to a mark.
    Title,
}

impl ElementKind {
    pub fn tag(self) -> &'static str {
        match self {
            ElementKind::Page => "body",
            ElementKind::Div => "div",
            ElementKind::Svg => "svg",
            ElementKind::Group => "g",
            ElementKind::Rect => "rect",
            ElementKind::Circle => "circle",
            ElementKind::Line => "line",
            ElementKind::Path => "path",
            ElementKind::Text => "text",
            ElementKind::Title => "title",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    Enter,
    Leave,
}

/// A pointer event in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    pub page_x: f64,
    pub page_y: f64,
}

impl PointerEvent {
    pub fn enter(page_x: f64, page_y: f64) -> Self {
        Self {
            kind: PointerEventKind::Enter,
            page_x,
            page_y,
        }
    }

    pub fn leave(page_x: f64, page_y: f64) -> Self {
        Self {
            kind: PointerEventKind::Leave,
            page_x,
            page_y,
        }
    }
}

/// Event callback. Handlers get the surface back so they can mutate other
/// elements (the tooltip) in response.
pub type PointerHandler = Rc<dyn Fn(&mut dyn DrawSurface, &PointerEvent)>;

pub trait DrawSurface {
    /// Pre-existing element the chart is appended into.
    fn container(&self) -> NodeId;

    /// The surrounding page; overlays such as the tooltip live here.
    fn page(&self) -> NodeId;

    fn append(&mut self, parent: NodeId, kind: ElementKind) -> NodeId;

    fn set_attr(&mut self, node: NodeId, name: &str, value: String);

    fn set_style(&mut self, node: NodeId, name: &str, value: String);

    fn set_text(&mut self, node: NodeId, text: String);

    fn on_pointer(&mut self, node: NodeId, kind: PointerEventKind, handler: PointerHandler);
}

/// Format a pixel/number attribute.
///
/// Finite values are rounded to three decimals and printed without trailing
/// zeros. Non-finite values print as-is ("NaN", "inf") so degenerate input
/// stays visible in the output instead of being masked.
pub fn fmt_num(v: f64) -> String {
    if !v.is_finite() {
        return if v.is_nan() { "NaN".to_string() } else { format!("{v}") };
    }
    // Past 1e15 the f64 spacing exceeds 1e-3 and scaling could overflow.
    if v.abs() > 1e15 {
        return format!("{v}");
    }
    let rounded = (v * 1000.0).round() / 1000.0;
    // Avoid "-0".
    if rounded == 0.0 {
        return "0".to_string();
    }
    format!("{rounded}")
}
