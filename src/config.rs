//! Defaults for everything the demo hard-codes.
//!
//! A [`RendererConfig`] is handed to [`crate::flow::run`]; every field has a
//! sensible default so `RendererConfig::default()` reproduces the demo.

use cgmath::{Point3, Vector3};

use crate::data_structures::light::LightLayout;

#[derive(Clone, Debug)]
pub struct RendererConfig {
    pub window_title: String,
    pub clear_colour: wgpu::Color,
    /// OBJ file below `assets/`.
    pub model_file: String,
    /// Image file below `assets/` used as the plane's base color.
    pub texture_file: String,
    pub camera: CameraConfig,
    pub scene: SceneConfig,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            window_title: "Hologram Shader".to_string(),
            clear_colour: wgpu::Color::BLACK,
            model_file: "plane.obj".to_string(),
            texture_file: "hologram.png".to_string(),
            camera: CameraConfig::default(),
            scene: SceneConfig::default(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct CameraConfig {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Point3::new(0.0, 0.0, 2.5),
            target: Point3::new(0.0, 0.0, 0.0),
            fovy_radians: std::f32::consts::FRAC_PI_3,
            znear: 0.1,
            zfar: 100.0,
        }
    }
}

#[derive(Clone, Debug)]
pub struct SceneConfig {
    pub ambient_light_color: Vector3<f32>,
    pub lights: LightLayout,
    pub with_sun: bool,
    pub sun_position: Vector3<f32>,
    pub plane_scale: f32,
    pub specular_color: Vector3<f32>,
    pub specular_power: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            ambient_light_color: Vector3::new(0.1, 0.1, 0.1),
            lights: LightLayout::Circle(32),
            with_sun: true,
            sun_position: Vector3::new(1.0, 1.0, 1.0),
            plane_scale: 1.5,
            specular_color: Vector3::new(0.8, 0.8, 0.8),
            specular_power: 32.0,
        }
    }
}
