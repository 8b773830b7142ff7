//! Render pipelines.
//!
//! - `hologram`: the textured, interference-lit pipeline and its bind group layouts

pub mod hologram;
