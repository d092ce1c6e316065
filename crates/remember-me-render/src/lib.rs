#![forbid(unsafe_code)]

//! Render/transition collaborator for the portrait chart.
//!
//! [`SceneRenderer`] implements [`remember_me_core::ChartRenderer`]: it keeps one dot per record
//! id, animates matched dots from where they were, drops dots that left the layout, and emits a
//! standalone SVG of the current scene (see [`svg`]).

pub mod scene;
pub mod svg;
pub mod tooltip;

pub use scene::{
    AxisState, CategoryLabel, DividerLine, Dot, DotStyle, SceneRenderer, ease_cubic_in_out,
};
pub use svg::{SvgRenderOptions, render_scene_svg};
pub use tooltip::{TooltipContent, TooltipPlacement, TooltipSide, place_tooltip};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] remember_me_core::Error),
    #[error("nothing to render: the scene has not received a layout yet")]
    EmptyScene,
    #[error("scene JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
