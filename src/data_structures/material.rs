use cgmath::Vector3;

use crate::data_structures::texture::TextureId;

/// Per-surface shading parameters.
///
/// The base color texture is a handle into the asset store; the material never
/// owns GPU memory itself.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub specular_color: Vector3<f32>,
    pub specular_power: f32,
    pub base_color_texture: Option<TextureId>,
}

impl Material {
    pub fn with_texture(texture: TextureId) -> Self {
        Self {
            base_color_texture: Some(texture),
            ..Default::default()
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self {
            specular_color: Vector3::new(1.0, 1.0, 1.0),
            specular_power: 1.0,
            base_color_texture: None,
        }
    }
}
