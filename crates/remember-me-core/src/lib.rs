#![forbid(unsafe_code)]

//! Headless engine behind the "Remember Me" portrait essay.
//!
//! - [`normalize`]: CSV rows → [`PortraitRecord`]s with a parsed year
//! - [`layout`]: timeline and two-bucket categorical placement
//! - [`ChartSession`]: owned chart state; drives a [`ChartRenderer`] on every mode change
//!
//! All layout work is synchronous and pure. The only async entry point is the one-shot dataset
//! load, which is runtime-agnostic.

pub mod config;
pub mod dimension;
pub mod error;
pub mod layout;
pub mod normalize;
pub mod portrait;
pub mod render;
pub mod scale;
mod session;

pub use config::{ChartConfig, EssayConfig, default_essay_config};
pub use dimension::{Bucket, FilterDimension, FilterSelection};
pub use error::{Error, Result};
pub use layout::{BucketExtent, ChartLayout, LayoutMode, PlottedPoint};
pub use normalize::{load_portraits, load_portraits_from_reader, load_portraits_sync, parse_year};
pub use portrait::{Gender, PortraitRecord, RecordId};
pub use render::{ChartRenderer, LayoutUpdate, TransitionId};
pub use scale::LinearScale;
pub use session::ChartSession;

#[cfg(test)]
mod tests;
