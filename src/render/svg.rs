//! Serialize a [`Scene`] to SVG or HTML text.
//!
//! Event handlers do not survive serialization. Marks keep their `<title>`
//! children, so hover text still works in a browser or image viewer.

use std::fmt::Write as _;

use super::scene::Scene;
use super::surface::{DrawSurface, ElementKind, NodeId};

/// Standalone SVG document for the subtree rooted at `svg`.
pub fn to_svg(scene: &Scene, svg: NodeId) -> String {
    let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    write_node(scene, svg, 0, &mut out);
    out
}

/// Full HTML page: chart container plus the tooltip overlay.
pub fn to_html(scene: &Scene, title: &str) -> String {
    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    out.push_str("<meta charset=\"utf-8\">\n");
    let _ = writeln!(out, "<title>{}</title>", escape(title));
    out.push_str("<style>\n");
    out.push_str("body { font-family: sans-serif; }\n");
    out.push_str(".tooltip { background: #fff; border: 1px solid #ccc; padding: 4px 8px; }\n");
    out.push_str(".bar:hover, .dot:hover { fill: #fff; stroke: #33adff; }\n");
    out.push_str("</style>\n</head>\n");
    write_node(scene, scene.page(), 0, &mut out);
    out.push_str("</html>\n");
    out
}

fn write_node(scene: &Scene, node: NodeId, depth: usize, out: &mut String) {
    let Some(kind) = scene.kind(node) else {
        return;
    };
    let indent = "  ".repeat(depth);
    let tag = kind.tag();

    let _ = write!(out, "{indent}<{tag}");
    for (name, value) in scene.attrs(node) {
        let _ = write!(out, " {name}=\"{}\"", escape(value));
    }
    let styles = scene.styles(node);
    if !styles.is_empty() {
        let css: Vec<String> = styles.iter().map(|(k, v)| format!("{k}: {v}")).collect();
        let _ = write!(out, " style=\"{}\"", escape(&css.join("; ")));
    }

    let children = scene.children(node);
    let text = scene.text(node);
    if children.is_empty() && text.is_none() {
        if needs_close_tag(kind) {
            out.push_str("></");
            out.push_str(tag);
            out.push_str(">\n");
        } else {
            out.push_str("/>\n");
        }
        return;
    }

    out.push('>');
    if let Some(text) = text {
        out.push_str(&text_content(kind, text));
    }
    if !children.is_empty() {
        out.push('\n');
        for &child in children {
            write_node(scene, child, depth + 1, out);
        }
        out.push_str(&indent);
    }
    let _ = writeln!(out, "</{tag}>");
}

/// HTML elements must not be self-closed.
fn needs_close_tag(kind: ElementKind) -> bool {
    matches!(kind, ElementKind::Page | ElementKind::Div)
}

fn text_content(kind: ElementKind, text: &str) -> String {
    match kind {
        ElementKind::Div | ElementKind::Page => {
            text.split('\n').map(escape).collect::<Vec<_>>().join("<br>")
        }
        _ => escape(text),
    }
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
