//! Front-matter extraction.
//!
//! A document may begin with a YAML block delimited by un-indented `---` lines. The
//! block is consumed whenever the closing fence exists; YAML parse failures drop the
//! block's effects but never surface as errors (the document renders as if front
//! matter were absent). An unterminated opening fence is not front matter at all.

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq)]
pub struct Frontmatter {
    /// Document text with the front-matter block removed.
    pub rest: String,
    /// Number of source lines the block consumed, for downstream line mapping.
    pub line_offset: usize,
    /// Parsed YAML as JSON, absent when the YAML was malformed.
    pub data: Option<Value>,
}

fn frontmatter_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)\A-{3}\r?\n(.*?)\r?\n-{3}(?:\r?\n|\z)").unwrap())
}

/// Splits a leading front-matter block off `input`. Returns `None` when the document
/// does not start with a terminated `---` fence pair.
pub fn extract(input: &str) -> Option<Frontmatter> {
    let caps = frontmatter_re().captures(input)?;
    let whole = caps.get(0).unwrap();
    let body = caps.get(1).map(|m| m.as_str()).unwrap_or_default();

    // CRLF endings must be normalized before structured-data parsing.
    let body = body.replace("\r\n", "\n").replace('\r', "\n");
    let line_offset = input[..whole.end()].matches('\n').count();

    let data = match serde_yaml::from_str::<Value>(&body) {
        Ok(v) if v.is_object() => Some(v),
        Ok(_) => None,
        Err(err) => {
            tracing::debug!(error = %err, "ignoring malformed front-matter YAML");
            None
        }
    };

    Some(Frontmatter {
        rest: input[whole.end()..].to_string(),
        line_offset,
        data,
    })
}
