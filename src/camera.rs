//! Camera and per-frame state.
//!
//! The demo camera never moves. What changes every frame is the elapsed time,
//! the projection (the drawable may be resized) and the wave frequency the
//! hologram shader is driven with.

use cgmath::{EuclideanSpace, Matrix4, Point3, SquareMatrix, Vector3};

use crate::{config::CameraConfig, math};

#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Matrix4<f32> {
        math::perspective(self.fovy_radians, aspect, self.znear, self.zfar)
    }

    pub fn world_position(&self) -> Vector3<f32> {
        self.position.to_vec()
    }
}

impl From<&CameraConfig> for Camera {
    fn from(config: &CameraConfig) -> Self {
        Self {
            position: config.position,
            target: config.target,
            up: Vector3::unit_y(),
            fovy_radians: config.fovy_radians,
            znear: config.znear,
            zfar: config.zfar,
        }
    }
}

/// Time-dependent state recomputed once per frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameState {
    pub time: f32,
    pub view_matrix: Matrix4<f32>,
    pub projection_matrix: Matrix4<f32>,
}

impl Default for FrameState {
    fn default() -> Self {
        Self {
            time: 0.0,
            view_matrix: Matrix4::identity(),
            projection_matrix: Matrix4::identity(),
        }
    }
}

impl FrameState {
    /// The state `dt` seconds later for a drawable with the given aspect ratio.
    pub fn advance(&self, dt: f32, aspect: f32, camera: &Camera) -> Self {
        let aspect = if aspect.is_finite() && aspect > 0.0 {
            aspect
        } else {
            log::warn!("invalid aspect ratio {aspect}, using 1.0");
            1.0
        };
        Self {
            time: self.time + dt,
            view_matrix: camera.view_matrix(),
            projection_matrix: camera.projection_matrix(aspect),
        }
    }

    pub fn view_projection(&self) -> Matrix4<f32> {
        self.projection_matrix * self.view_matrix
    }

    pub fn frequency(&self) -> f32 {
        frequency_at(self.time)
    }
}

/// Wave frequency of the hologram shader at `time` seconds.
pub fn frequency_at(time: f32) -> f32 {
    10.0 * time.sin() + 300.0
}
