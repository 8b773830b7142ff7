//! Light records and the light layouts that produce hologram patterns.
//!
//! The CPU side stores lights as `cgmath` vectors. Before every frame they are
//! marshaled into [`LightRaw`] / [`SunLightRaw`], fixed 16 byte aligned records
//! that match the WGSL storage arrays consumed by the fragment stage.

use std::f32::consts::TAU;

use cgmath::Vector3;

/// Distance of every generated light from the origin along Z.
pub const LIGHT_PLANE_Z: f32 = 1.0;

/// Radius of the circular layout and half width of the double slit.
pub const LIGHT_EXTENT: f32 = 0.5;

/// A point light emitting a spherical wave.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Light {
    pub position: Vector3<f32>,
    pub color: Vector3<f32>,
}

impl Light {
    pub fn white(position: Vector3<f32>) -> Self {
        Self {
            position,
            color: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

/// A directional light. The direction towards the light is `normalize(position)`
/// and its color is white.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SunLight {
    pub position: Vector3<f32>,
}

/// Where the point lights of a scene come from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LightLayout {
    /// `n` lights on a ring, see [`light_circle`].
    Circle(usize),
    /// Two columns of `n + 1` lights, see [`double_slit`].
    DoubleSlit(usize),
}

impl LightLayout {
    pub fn build(self) -> Vec<Light> {
        match self {
            LightLayout::Circle(n) => light_circle(n),
            LightLayout::DoubleSlit(n) => double_slit(n),
        }
    }
}

/// `n` white lights evenly spaced on a circle of radius 0.5 in the XY plane.
pub fn light_circle(n: usize) -> Vec<Light> {
    if n == 0 {
        log::warn!("light circle requested with zero lights");
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let angle = TAU * i as f32 / n as f32;
            Light::white(Vector3::new(
                LIGHT_EXTENT * angle.cos(),
                LIGHT_EXTENT * angle.sin(),
                LIGHT_PLANE_Z,
            ))
        })
        .collect()
}

/// Two columns at `x = -0.5` and `x = 0.5`, each holding `n + 1` lights whose
/// y values step from -0.5 to 0.5 inclusive. Yields `2 * (n + 1)` lights.
///
/// With `n == 0` the spacing is undefined and no lights are produced.
pub fn double_slit(n: usize) -> Vec<Light> {
    if n == 0 {
        log::warn!("double slit requested with zero spacing steps");
        return Vec::new();
    }
    let step = 2.0 * LIGHT_EXTENT / n as f32;
    [-LIGHT_EXTENT, LIGHT_EXTENT]
        .into_iter()
        .flat_map(|x| {
            (0..=n).map(move |i| {
                let y = if i == n {
                    LIGHT_EXTENT
                } else {
                    -LIGHT_EXTENT + step * i as f32
                };
                Light::white(Vector3::new(x, y, LIGHT_PLANE_Z))
            })
        })
        .collect()
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightRaw {
    position: [f32; 3],
    // Due to storage arrays requiring 16 byte (4 float) spacing, we need to use a padding field here
    _padding: u32,
    color: [f32; 3],
    _padding2: u32,
}

impl From<&Light> for LightRaw {
    fn from(light: &Light) -> Self {
        Self {
            position: light.position.into(),
            _padding: 0,
            color: light.color.into(),
            _padding2: 0,
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SunLightRaw {
    position: [f32; 3],
    _padding: u32,
}

impl From<&SunLight> for SunLightRaw {
    fn from(sun: &SunLight) -> Self {
        Self {
            position: sun.position.into(),
            _padding: 0,
        }
    }
}

/**
 * A storage binding can't be empty, so an empty light list still uploads one
 * zeroed record. The light counts in the fragment uniforms bound the loops.
 */
fn non_empty<T: bytemuck::Zeroable>(mut records: Vec<T>) -> Vec<T> {
    if records.is_empty() {
        records.push(T::zeroed());
    }
    records
}

pub fn point_lights_raw(lights: &[Light]) -> Vec<LightRaw> {
    non_empty(lights.iter().map(LightRaw::from).collect())
}

pub fn sun_lights_raw(suns: &[SunLight]) -> Vec<SunLightRaw> {
    non_empty(suns.iter().map(SunLightRaw::from).collect())
}
