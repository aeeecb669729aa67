//! Column-major 4x4 matrices in the layout WGSL expects (`m[col][row]`).

use super::Vec3;

pub type Mat4 = [[f32; 4]; 4];

pub const MAT4_IDENTITY: Mat4 = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

/// Column-major matrix multiply: c = a * b
pub fn mat4_mul(a: Mat4, b: Mat4) -> Mat4 {
    let mut c = [[0.0f32; 4]; 4];
    for col in 0..4 {
        for row in 0..4 {
            c[col][row] = a[0][row] * b[col][0]
                + a[1][row] * b[col][1]
                + a[2][row] * b[col][2]
                + a[3][row] * b[col][3];
        }
    }
    c
}

/// Right-handed perspective projection with depth range [0, 1].
pub fn mat4_perspective_rh_z0(fov_y_rad: f64, aspect: f64, near: f64, far: f64) -> Mat4 {
    let f = 1.0 / (0.5 * fov_y_rad).tan();
    let m00 = (f / aspect) as f32;
    let m11 = f as f32;
    let m22 = (far / (near - far)) as f32;
    let m23 = ((near * far) / (near - far)) as f32;

    [
        [m00, 0.0, 0.0, 0.0],
        [0.0, m11, 0.0, 0.0],
        [0.0, 0.0, m22, -1.0],
        [0.0, 0.0, m23, 0.0],
    ]
}

pub fn mat4_look_at_rh(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
    let f = (target - eye).normalize();
    let s = f.cross(up).normalize();
    let u = s.cross(f);

    let ex = -s.dot(eye);
    let ey = -u.dot(eye);
    let ez = f.dot(eye);

    [
        [s.x as f32, u.x as f32, (-f.x) as f32, 0.0],
        [s.y as f32, u.y as f32, (-f.y) as f32, 0.0],
        [s.z as f32, u.z as f32, (-f.z) as f32, 0.0],
        [ex as f32, ey as f32, ez as f32, 1.0],
    ]
}

/// Rotation about +Y by `angle_rad` (counter-clockwise looking down -Y).
pub fn mat4_rotation_y(angle_rad: f64) -> Mat4 {
    let (s, c) = angle_rad.sin_cos();
    let (s, c) = (s as f32, c as f32);
    [
        [c, 0.0, -s, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [s, 0.0, c, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]
}

pub fn mat4_transform_point(m: Mat4, p: [f32; 3]) -> [f32; 4] {
    let mut out = [0.0f32; 4];
    for (row, slot) in out.iter_mut().enumerate() {
        *slot = m[0][row] * p[0] + m[1][row] * p[1] + m[2][row] * p[2] + m[3][row];
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{
        MAT4_IDENTITY, mat4_look_at_rh, mat4_mul, mat4_perspective_rh_z0, mat4_rotation_y,
        mat4_transform_point,
    };
    use crate::math::Vec3;

    fn assert_close(a: f32, b: f32, eps: f32) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn identity_is_neutral() {
        let r = mat4_rotation_y(0.7);
        assert_eq!(mat4_mul(MAT4_IDENTITY, r), r);
        assert_eq!(mat4_mul(r, MAT4_IDENTITY), r);
    }

    #[test]
    fn rotation_y_quarter_turn_maps_x_to_minus_z() {
        let p = mat4_transform_point(mat4_rotation_y(std::f64::consts::FRAC_PI_2), [1.0, 0.0, 0.0]);
        assert_close(p[0], 0.0, 1e-6);
        assert_close(p[1], 0.0, 1e-6);
        assert_close(p[2], -1.0, 1e-6);
    }

    #[test]
    fn look_at_puts_target_on_negative_z() {
        let view = mat4_look_at_rh(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, Vec3::Y);
        let p = mat4_transform_point(view, [0.0, 0.0, 0.0]);
        assert_close(p[0], 0.0, 1e-6);
        assert_close(p[1], 0.0, 1e-6);
        assert_close(p[2], -10.0, 1e-5);
    }

    #[test]
    fn perspective_maps_near_and_far_to_depth_range() {
        let proj = mat4_perspective_rh_z0(60f64.to_radians(), 1.5, 0.1, 1000.0);
        let near = mat4_transform_point(proj, [0.0, 0.0, -0.1]);
        let far = mat4_transform_point(proj, [0.0, 0.0, -1000.0]);
        assert_close(near[2] / near[3], 0.0, 1e-5);
        assert_close(far[2] / far[3], 1.0, 1e-5);
    }
}
