#![forbid(unsafe_code)]

//! `manta` is a headless Markdown mind-map engine.
//!
//! The core crate transforms Markdown into a content tree through a plugin
//! pipeline; the render crate lays the tree out, diffs consecutive passes and
//! serializes a retained SVG stage. This facade re-exports both and adds
//! one-call helpers.
//!
//! # Features
//!
//! - `render` (default): enable layout + SVG rendering (`manta::render`)

pub use manta_core::*;

#[cfg(feature = "render")]
pub mod render {
    pub use manta_render::{
        Bounds, ColorScale, DeterministicTextMeasurer, Mindmap, MindmapLayout, MindmapOptions,
        Rect, RenderNode, RenderPatch, Snapshot, SvgOptions, SvgStage, TextMeasurer, Transform,
        TransitionOutcome, derive_options,
    };

    #[derive(Debug, thiserror::Error)]
    pub enum HeadlessError {
        #[error(transparent)]
        Transform(#[from] manta_core::Error),
        #[error(transparent)]
        Render(#[from] manta_render::Error),
    }

    pub type Result<T> = std::result::Result<T, HeadlessError>;

    /// One-call pipeline: transform the Markdown, build an instance, fit it to
    /// a default viewport and serialize the stage to SVG.
    ///
    /// With `options` unset, front-matter `markmap:` options apply; an explicit
    /// argument overrides them entirely. Animation is bypassed (executor-free).
    pub fn mindmap_svg(markdown: &str, options: Option<MindmapOptions>) -> Result<String> {
        let transformer = manta_core::Transformer::new();
        let result = transformer.transform(markdown);
        let options = options.unwrap_or_else(|| {
            result
                .json_options
                .as_ref()
                .map(derive_options)
                .unwrap_or_default()
        });

        let mut map = Mindmap::new(MindmapOptions {
            duration: 0.0,
            ..options
        });
        map.set_data(result.root)?;
        map.fit_now()?;
        Ok(map.to_svg())
    }

    /// Async flavor of [`mindmap_svg`] for hosts composing it into async
    /// pipelines. The work itself is synchronous.
    pub async fn mindmap_svg_async(
        markdown: &str,
        options: Option<MindmapOptions>,
    ) -> Result<String> {
        mindmap_svg(markdown, options)
    }
}

#[cfg(all(test, feature = "render"))]
mod tests {
    use super::render::*;
    use futures::executor::block_on;

    #[test]
    fn one_call_helper_produces_well_formed_svg() {
        let svg = mindmap_svg("# a\n## b\n- c\n", None).unwrap();
        let doc = roxmltree::Document::parse(&svg).expect("well-formed SVG");
        assert_eq!(doc.root_element().tag_name().name(), "svg");
    }

    #[test]
    fn front_matter_options_drive_the_helper() {
        let svg = mindmap_svg(
            "---\nmarkmap:\n  color: \"#123456\"\n---\n# a\n## b\n",
            None,
        )
        .unwrap();
        assert!(svg.contains("#123456"));
    }

    #[test]
    fn explicit_options_override_front_matter() {
        let options = MindmapOptions {
            colors: vec!["#abcdef".to_string()],
            ..MindmapOptions::default()
        };
        let svg = mindmap_svg(
            "---\nmarkmap:\n  color: \"#123456\"\n---\n# a\n## b\n",
            Some(options),
        )
        .unwrap();
        assert!(svg.contains("#abcdef"));
        assert!(!svg.contains("#123456"));
    }

    #[test]
    fn async_flavor_matches_the_sync_helper() {
        let sync = mindmap_svg("# a\n## b\n", None).unwrap();
        let async_ = block_on(mindmap_svg_async("# a\n## b\n", None)).unwrap();
        assert_eq!(sync, async_);
    }
}
