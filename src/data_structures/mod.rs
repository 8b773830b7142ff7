//! Scene data: lights, materials, meshes, textures and the scene graph.
//!
//! - `light` contains point/sun lights, their layouts and GPU records
//! - `material` holds per-surface shading parameters
//! - `model` contains the vertex layout and GPU meshes
//! - `scene_graph` is the node arena, the scene and the draw traversal
//! - `texture` contains the GPU texture wrapper and creation utilities

pub mod light;
pub mod material;
pub mod model;
pub mod scene_graph;
pub mod texture;
