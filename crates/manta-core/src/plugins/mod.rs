//! Built-in plugins, composed in a fixed deterministic order.
//!
//! `frontmatter` must install first so its normalized options exist before anything
//! consumes them; `npmUrl` runs at `afterParse` and therefore installs last.

mod checkbox;
mod frontmatter;
mod hljs;
mod katex;
mod npm_url;
mod source_lines;

pub use checkbox::CheckboxPlugin;
pub use frontmatter::FrontmatterPlugin;
pub use hljs::HljsPlugin;
pub use katex::KatexPlugin;
pub use npm_url::NpmUrlPlugin;
pub use source_lines::SourceLinesPlugin;

use crate::plugin::Plugin;
use std::rc::Rc;

/// The default plugin set in installation order.
pub fn builtin_plugins() -> Vec<Rc<dyn Plugin>> {
    vec![
        Rc::new(FrontmatterPlugin),
        Rc::new(KatexPlugin),
        Rc::new(HljsPlugin),
        Rc::new(CheckboxPlugin),
        Rc::new(SourceLinesPlugin),
        Rc::new(NpmUrlPlugin),
    ]
}
