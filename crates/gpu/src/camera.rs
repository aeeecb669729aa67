use foundation::math::{Mat4, Vec3, mat4_look_at_rh, mat4_mul, mat4_perspective_rh_z0};
use serde::Deserialize;

#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_y_deg: f64,
    pub near: f64,
    pub far: f64,
    pub position: Vec3,
    pub target: Vec3,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_y_deg: 60.0,
            near: 0.1,
            far: 1000.0,
            // Off-axis so the auto-rotation reads as motion.
            position: Vec3::new(-10.0, 5.0, 15.0),
            target: Vec3::ZERO,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PerspectiveCamera {
    pub fov_y_deg: f64,
    pub near: f64,
    pub far: f64,
    pub position: Vec3,
    pub target: Vec3,
    aspect: f64,
    projection: Mat4,
}

impl PerspectiveCamera {
    pub fn new(config: &CameraConfig, aspect: f64) -> Self {
        let mut camera = Self {
            fov_y_deg: config.fov_y_deg,
            near: config.near,
            far: config.far,
            position: config.position,
            target: config.target,
            aspect: sanitize_aspect(aspect),
            projection: [[0.0; 4]; 4],
        };
        camera.update_projection();
        camera
    }

    pub fn aspect(&self) -> f64 {
        self.aspect
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    /// Set the aspect ratio from surface pixels and recompute the projection.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        let aspect = if height == 0 {
            1.0
        } else {
            width as f64 / height as f64
        };
        self.set_aspect(aspect);
    }

    pub fn set_aspect(&mut self, aspect: f64) {
        self.aspect = sanitize_aspect(aspect);
        self.update_projection();
    }

    pub fn update_projection(&mut self) {
        self.projection =
            mat4_perspective_rh_z0(self.fov_y_deg.to_radians(), self.aspect, self.near, self.far);
    }

    pub fn view(&self) -> Mat4 {
        mat4_look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn view_proj(&self) -> Mat4 {
        mat4_mul(self.projection, self.view())
    }
}

fn sanitize_aspect(aspect: f64) -> f64 {
    if aspect.is_finite() && aspect > 0.0 {
        aspect.max(1e-6)
    } else {
        1.0
    }
}
