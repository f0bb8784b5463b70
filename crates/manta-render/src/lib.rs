#![forbid(unsafe_code)]

//! Headless view engine for manta mind maps.
//!
//! Design goals:
//! - deterministic, testable outputs (same tree + options => same layout and SVG)
//! - render passes expressed as enter/update/exit patches against a retained stage
//! - runtime-agnostic async APIs (no specific executor required)

pub mod diff;
pub mod instance;
pub mod layout;
pub mod model;
pub mod options;
pub mod stage;
pub mod svg;
pub mod text;
pub mod viewport;

pub use diff::{EnterNode, ExitNode, NodeShot, RenderPatch, Snapshot, UpdateNode, reconcile};
pub use instance::Mindmap;
pub use layout::{MindmapLayout, layout};
pub use model::{Bounds, FoldTable, Rect, RenderNode, enumerate_paths, seed_folds};
pub use options::{ColorScale, MindmapOptions, derive_options};
pub use stage::{NodeVisual, SvgStage};
pub use svg::{SvgOptions, render_svg};
pub use text::{ContentSizer, DeterministicTextMeasurer, TextMeasurer, TextMetrics, TextStyle};
pub use viewport::{Transform, TransitionOutcome, TransitionTicket, Transitions, Viewport};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no node at path {path}")]
    UnknownNode { path: String },
    #[error("no data set on this instance")]
    NoData,
    #[error("instance already destroyed")]
    Destroyed,
}

pub type Result<T> = std::result::Result<T, Error>;
