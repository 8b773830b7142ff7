//! Matrix and vector helpers.
//!
//! Everything here is a pure function on `cgmath` values in single precision.
//! Matrices compose in one fixed order across the whole crate:
//! `view_projection = projection * view` and `final = view_projection * model`.

use cgmath::{InnerSpace, Matrix, Matrix3, Matrix4, Rad, SquareMatrix, Vector3};

/// Uniform scale.
pub fn scale(s: f32) -> Matrix4<f32> {
    Matrix4::from_scale(s)
}

pub fn scale_nonuniform(x: f32, y: f32, z: f32) -> Matrix4<f32> {
    Matrix4::from_nonuniform_scale(x, y, z)
}

/// Rotation of `radians` around `axis`. The axis does not have to be normalized.
pub fn rotation(axis: Vector3<f32>, radians: f32) -> Matrix4<f32> {
    Matrix4::from_axis_angle(axis.normalize(), Rad(radians))
}

pub fn translation(offset: Vector3<f32>) -> Matrix4<f32> {
    Matrix4::from_translation(offset)
}

/// Right-handed perspective projection mapping depth to `[0, 1]`.
///
/// `cgmath::perspective` targets OpenGL clip space (`[-1, 1]` depth); wgpu
/// expects `[0, 1]`, so the matrix is built directly.
pub fn perspective(fovy_radians: f32, aspect: f32, near: f32, far: f32) -> Matrix4<f32> {
    let ys = 1.0 / (fovy_radians * 0.5).tan();
    let xs = ys / aspect;
    let zs = far / (near - far);
    #[rustfmt::skip]
    let projection = Matrix4::new(
        xs,  0.0, 0.0,       0.0,
        0.0, ys,  0.0,       0.0,
        0.0, 0.0, zs,        -1.0,
        0.0, 0.0, zs * near, 0.0,
    );
    projection
}

/// The upper-left 3x3 block of `m`.
pub fn upper_left(m: &Matrix4<f32>) -> Matrix3<f32> {
    Matrix3::from_cols(m.x.truncate(), m.y.truncate(), m.z.truncate())
}

/// Inverse transpose of the upper-left 3x3 of a model matrix.
///
/// Normals transformed with this matrix stay perpendicular to their surface
/// under non-uniform scale. Singular matrices (a zero scale axis) fall back to
/// the plain 3x3 block.
pub fn normal_matrix(model: &Matrix4<f32>) -> Matrix3<f32> {
    let upper = upper_left(model);
    match upper.invert() {
        Some(inverse) => inverse.transpose(),
        None => upper,
    }
}

/// Column-major array layout of a 4x4 matrix, as WGSL `mat4x4<f32>` expects.
pub fn to_cols4(m: &Matrix4<f32>) -> [[f32; 4]; 4] {
    (*m).into()
}

/// WGSL `mat3x3<f32>` occupies three 16 byte columns in uniform buffers.
pub fn to_padded_cols3(m: &Matrix3<f32>) -> [[f32; 4]; 3] {
    [
        m.x.extend(0.0).into(),
        m.y.extend(0.0).into(),
        m.z.extend(0.0).into(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Point3, Vector4};

    const EPSILON: f32 = 1e-4;

    fn assert_mat4_close(a: Matrix4<f32>, b: Matrix4<f32>) {
        let a: [[f32; 4]; 4] = a.into();
        let b: [[f32; 4]; 4] = b.into();
        for (col_a, col_b) in a.iter().zip(b.iter()) {
            for (x, y) in col_a.iter().zip(col_b.iter()) {
                assert!((x - y).abs() < EPSILON, "{a:?} != {b:?}");
            }
        }
    }

    #[test]
    fn composition_is_associative() {
        let projection = perspective(std::f32::consts::FRAC_PI_3, 16.0 / 9.0, 0.1, 100.0);
        let view = Matrix4::look_at_rh(
            Point3::new(0.0, 1.0, 3.0),
            Point3::new(0.0, 0.0, 0.0),
            Vector3::unit_y(),
        );
        let model = translation(Vector3::new(0.5, -1.0, 2.0))
            * rotation(Vector3::unit_y(), 0.7)
            * scale_nonuniform(2.0, 1.0, 0.5);

        assert_mat4_close(projection * (view * model), (projection * view) * model);
    }

    #[test]
    fn normal_matrix_differs_from_upper_left_under_nonuniform_scale() {
        let model = scale_nonuniform(2.0, 1.0, 1.0);
        let normal = normal_matrix(&model);
        let upper = upper_left(&model);

        assert_ne!(normal, upper);
        assert!((normal.x.x - 0.5).abs() < EPSILON);
        assert!((normal.y.y - 1.0).abs() < EPSILON);
    }

    #[test]
    fn normal_matrix_matches_rotation_for_rigid_transform() {
        let model = rotation(Vector3::unit_z(), 1.1);
        let normal = normal_matrix(&model);
        let upper = upper_left(&model);
        let diff = normal - upper;
        for col in [diff.x, diff.y, diff.z] {
            assert!(col.x.abs() < EPSILON && col.y.abs() < EPSILON && col.z.abs() < EPSILON);
        }
    }

    #[test]
    fn singular_model_falls_back_to_upper_left() {
        let model = scale_nonuniform(1.0, 0.0, 1.0);
        assert_eq!(normal_matrix(&model), upper_left(&model));
    }

    #[test]
    fn perspective_maps_near_and_far_to_unit_depth_range() {
        let (near, far) = (0.1, 100.0);
        let projection = perspective(1.0, 1.5, near, far);

        let at_near = projection * Vector4::new(0.0, 0.0, -near, 1.0);
        let at_far = projection * Vector4::new(0.0, 0.0, -far, 1.0);

        assert!((at_near.z / at_near.w).abs() < EPSILON);
        assert!((at_far.z / at_far.w - 1.0).abs() < EPSILON);
    }

    #[test]
    fn padded_cols3_keeps_columns() {
        let m = Matrix3::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0);
        assert_eq!(
            to_padded_cols3(&m),
            [
                [1.0, 2.0, 3.0, 0.0],
                [4.0, 5.0, 6.0, 0.0],
                [7.0, 8.0, 9.0, 0.0]
            ]
        );
    }
}
