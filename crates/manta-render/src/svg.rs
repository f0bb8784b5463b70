//! SVG serialization of the retained stage.
//!
//! Numbers are formatted with JS semantics (shortest round-trip decimal, whole
//! numbers without a trailing `.0`) so snapshots stay byte-stable. Content HTML
//! is escaped into the `foreignObject` text to keep the document well-formed
//! XML; hosts that want live HTML read the stage directly instead.

use crate::model::{Bounds, Rect};
use crate::stage::{NodeVisual, SvgStage};
use crate::viewport::Transform;
use std::fmt::Write as _;

#[derive(Debug, Clone)]
pub struct SvgOptions {
    /// Extra space around the computed viewBox.
    pub viewbox_padding: f64,
}

impl Default for SvgOptions {
    fn default() -> Self {
        Self {
            viewbox_padding: 8.0,
        }
    }
}

pub(crate) fn fmt(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }
    let v = if v == 0.0 { 0.0 } else { v };
    let mut buf = ryu_js::Buffer::new();
    buf.format_finite(v).to_string()
}

pub(crate) fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

pub fn render_svg(
    stage: &SvgStage,
    bounds: &Bounds,
    transform: &Transform,
    options: &SvgOptions,
) -> String {
    let pad = options.viewbox_padding.max(0.0);
    let vb_min_x = bounds.min_x - pad;
    let vb_min_y = bounds.min_y - pad;
    let vb_w = (bounds.width() + pad * 2.0).max(1.0);
    let vb_h = (bounds.height() + pad * 2.0).max(1.0);

    let mut out = String::new();
    let _ = writeln!(
        &mut out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" class="manta-mindmap" viewBox="{} {} {} {}">"#,
        fmt(vb_min_x),
        fmt(vb_min_y),
        fmt(vb_w),
        fmt(vb_h)
    );
    let _ = writeln!(
        &mut out,
        r#"<g transform="translate({},{}) scale({})">"#,
        fmt(transform.x),
        fmt(transform.y),
        fmt(transform.k)
    );

    for visual in stage.nodes() {
        if let Some(parent_key) = &visual.shot.parent_key {
            if let Some(parent) = stage.get(parent_key) {
                write_link(&mut out, parent, visual);
            }
        }
    }
    for visual in stage.nodes() {
        write_node(&mut out, visual);
    }
    if let Some(rect) = stage.highlight() {
        write_highlight(&mut out, &rect);
    }

    out.push_str("</g>\n</svg>\n");
    out
}

/// Cubic from the parent's underline end to the child's underline start.
fn write_link(out: &mut String, parent: &NodeVisual, child: &NodeVisual) {
    let p = &parent.shot.rect;
    let c = &child.shot.rect;
    let (x0, y0) = (p.x + p.width, p.y + p.height);
    let (x1, y1) = (c.x, c.y + c.height);
    let mx = (x0 + x1) / 2.0;
    let _ = writeln!(
        out,
        r#"<path class="mm-link" fill="none" stroke="{}" d="M{},{} C{},{} {},{} {},{}"/>"#,
        escape_xml(&child.color),
        fmt(x0),
        fmt(y0),
        fmt(mx),
        fmt(y0),
        fmt(mx),
        fmt(y1),
        fmt(x1),
        fmt(y1)
    );
}

fn write_node(out: &mut String, visual: &NodeVisual) {
    let r = &visual.shot.rect;
    let bottom = r.y + r.height;
    let color = escape_xml(&visual.color);

    let _ = writeln!(
        out,
        r#"<g class="mm-node" data-path="{}" data-key="{}">"#,
        escape_xml(&visual.shot.path),
        escape_xml(&visual.shot.key)
    );
    let _ = writeln!(
        out,
        r#"<line class="mm-underline" x1="{}" y1="{}" x2="{}" y2="{}" stroke="{color}"/>"#,
        fmt(r.x),
        fmt(bottom),
        fmt(r.x + r.width),
        fmt(bottom)
    );
    if visual.shot.has_children {
        // Toggle circle: filled while the subtree is hidden.
        let fill = if visual.shot.folded {
            color.as_str()
        } else {
            "#fff"
        };
        let _ = writeln!(
            out,
            r#"<circle class="mm-toggle" cx="{}" cy="{}" r="6" stroke="{color}" fill="{fill}"/>"#,
            fmt(r.x + r.width),
            fmt(bottom)
        );
    }
    let _ = writeln!(
        out,
        r#"<foreignObject x="{}" y="{}" width="{}" height="{}"><div xmlns="http://www.w3.org/1999/xhtml">{}</div></foreignObject>"#,
        fmt(r.x),
        fmt(r.y),
        fmt(r.width),
        fmt(r.height),
        escape_xml(&visual.shot.content)
    );
    out.push_str("</g>\n");
}

fn write_highlight(out: &mut String, rect: &Rect) {
    let _ = writeln!(
        out,
        r#"<rect class="mm-highlight" x="{}" y="{}" width="{}" height="{}"/>"#,
        fmt(rect.x),
        fmt(rect.y),
        fmt(rect.width),
        fmt(rect.height)
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_format_like_js() {
        assert_eq!(fmt(1.0), "1");
        assert_eq!(fmt(1.5), "1.5");
        assert_eq!(fmt(-0.0), "0");
        assert_eq!(fmt(f64::NAN), "0");
    }

    #[test]
    fn xml_escaping_covers_markup_characters() {
        assert_eq!(escape_xml(r#"<a href="x">&"#), "&lt;a href=&quot;x&quot;&gt;&amp;");
    }
}
