//! Content measurement.
//!
//! Phase one of a render pass turns content HTML into plain numbers here; every
//! later phase (layout, diff, viewport math) consumes only those numbers, so a
//! host with real font metrics can swap in its own [`TextMeasurer`] without
//! touching anything downstream.

use std::rc::Rc;
use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone)]
pub struct TextStyle {
    pub font_size: f64,
    pub line_height_factor: f64,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: 16.0,
            line_height_factor: 1.2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMetrics {
    pub width: f64,
    pub height: f64,
    pub line_count: usize,
}

pub trait TextMeasurer {
    /// Measures plain text (tags already stripped), wrapping at `max_width`
    /// when given.
    fn measure(&self, text: &str, style: &TextStyle, max_width: Option<f64>) -> TextMetrics;
}

/// Monospace-cell approximation: every terminal cell of a line counts
/// `font_size * char_width_factor` pixels. Deterministic across platforms, which
/// is what snapshot tests need.
#[derive(Debug, Clone)]
pub struct DeterministicTextMeasurer {
    pub char_width_factor: f64,
}

impl Default for DeterministicTextMeasurer {
    fn default() -> Self {
        Self {
            char_width_factor: 0.6,
        }
    }
}

impl TextMeasurer for DeterministicTextMeasurer {
    fn measure(&self, text: &str, style: &TextStyle, max_width: Option<f64>) -> TextMetrics {
        let char_px = (style.font_size * self.char_width_factor).max(1.0);
        let max_cells = max_width.map(|w| ((w / char_px).floor() as usize).max(1));

        let mut line_count = 0usize;
        let mut max_line_cells = 0usize;
        for line in text.split('\n') {
            for wrapped in wrap_cells(line, max_cells) {
                line_count += 1;
                max_line_cells = max_line_cells.max(wrapped);
            }
        }
        if line_count == 0 {
            line_count = 1;
        }

        TextMetrics {
            width: max_line_cells as f64 * char_px,
            height: line_count as f64 * style.font_size * style.line_height_factor,
            line_count,
        }
    }
}

/// Greedy word wrap over display cells; returns the cell width of each produced
/// line. Words wider than the limit overflow on their own line.
fn wrap_cells(line: &str, max_cells: Option<usize>) -> Vec<usize> {
    let Some(max) = max_cells else {
        return vec![UnicodeWidthStr::width(line)];
    };
    let mut lines = Vec::new();
    let mut current = 0usize;
    for word in line.split_whitespace() {
        let w = UnicodeWidthStr::width(word);
        if current == 0 {
            current = w;
        } else if current + 1 + w <= max {
            current += 1 + w;
        } else {
            lines.push(current);
            current = w;
        }
    }
    lines.push(current);
    lines
}

/// Reduces content HTML to measurable plain text: tags out, `<br>` variants back
/// to newlines, the handful of entities the transform emits decoded.
pub fn html_to_text(html: &str) -> String {
    let normalized = html
        .replace("<br>", "\n")
        .replace("<br/>", "\n")
        .replace("<br />", "\n");

    let mut out = String::with_capacity(normalized.len());
    let mut in_tag = false;
    for ch in normalized.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            c if !in_tag => out.push(c),
            _ => {}
        }
    }
    out.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Turns a node's content HTML into its box size.
pub struct ContentSizer {
    measurer: Rc<dyn TextMeasurer>,
    style: TextStyle,
    /// 0 = unlimited.
    max_width: f64,
    node_min_height: f64,
}

impl ContentSizer {
    pub fn new(measurer: Rc<dyn TextMeasurer>, max_width: f64, node_min_height: f64) -> Self {
        Self {
            measurer,
            style: TextStyle::default(),
            max_width,
            node_min_height,
        }
    }

    pub fn size_of(&self, html: &str) -> (f64, f64) {
        let text = html_to_text(html);
        let max_width = (self.max_width > 0.0).then_some(self.max_width);
        let metrics = self.measurer.measure(&text, &self.style, max_width);
        (metrics.width, metrics.height.max(self.node_min_height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_tags_and_decodes_entities() {
        assert_eq!(
            html_to_text("<strong>a</strong> &amp; <em>b</em>"),
            "a & b"
        );
        assert_eq!(html_to_text("x<br>y"), "x\ny");
        assert_eq!(html_to_text("&lt;div&gt;"), "<div>");
    }

    #[test]
    fn measurement_is_deterministic_and_wraps_at_max_width() {
        let m = DeterministicTextMeasurer::default();
        let style = TextStyle::default();

        let one = m.measure("hello world", &style, None);
        assert_eq!(one.line_count, 1);
        // 11 cells at 16px * 0.6.
        assert!((one.width - 11.0 * 9.6).abs() < 1e-9);

        let wrapped = m.measure("hello world", &style, Some(6.0 * 9.6));
        assert_eq!(wrapped.line_count, 2);
        assert!(wrapped.width < one.width);
        assert!(wrapped.height > one.height);
    }

    #[test]
    fn wide_characters_count_double() {
        let m = DeterministicTextMeasurer::default();
        let style = TextStyle::default();
        let narrow = m.measure("ab", &style, None);
        let wide = m.measure("\u{6f22}\u{5b57}", &style, None);
        assert!((wide.width - 2.0 * narrow.width).abs() < 1e-9);
    }

    #[test]
    fn sizer_enforces_the_minimum_height() {
        let sizer = ContentSizer::new(Rc::new(DeterministicTextMeasurer::default()), 0.0, 30.0);
        let (_, h) = sizer.size_of("x");
        assert!((h - 30.0).abs() < 1e-9);
    }
}
