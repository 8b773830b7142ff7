//! hologram-shader
//!
//! A small wgpu demo that renders a textured plane lit by a ring or a
//! double-slit arrangement of point lights. The fragment stage sums the waves
//! emitted by every point light and shades the plane with the resulting
//! interference pattern.
//!
//! High-level modules
//! - `camera`: fixed camera, per-frame state and the time-varying frequency
//! - `config`: renderer, camera and scene defaults
//! - `context`: window, surface, device/queue and depth texture
//! - `data_structures`: lights, materials, meshes, textures and the scene graph
//! - `flow`: winit application handler driving one frame per redraw
//! - `math`: matrix helpers shared by the CPU side and the uniform layouts
//! - `pipelines`: the hologram render pipeline and its bind group layouts
//! - `resources`: asset store plus OBJ and image loading
//! - `render`: the renderer, its uniforms and the draw submission
//!

pub mod camera;
pub mod config;
pub mod context;
pub mod data_structures;
pub mod flow;
pub mod math;
pub mod pipelines;
pub mod render;
pub mod resources;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::*;
