//! GPU-facing data packed from the scene and camera each frame.

use bytemuck::{Pod, Zeroable};
use foundation::math::{Mat4, mat4_rotation_y};
use scene::Scene;
use scene::marker::Marker;

use crate::camera::PerspectiveCamera;
use crate::options::{RendererOptions, log_depth_coefficient};

/// Mirrors `struct Globals` in the WGSL shaders. Colors are linear; the
/// surface format does the sRGB encode. All members are 16-byte
/// aligned so the layout is identical under uniform buffer rules.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Globals {
    pub view_proj: Mat4,
    pub star_model: Mat4,
    /// xyz: eye position in world space.
    pub camera_pos: [f32; 4],
    /// xyz: unit vector toward the light.
    pub light_dir: [f32; 4],
    /// rgb: color * intensity.
    pub light_color: [f32; 4],
    pub ambient: [f32; 4],
    /// rgb + opacity.
    pub globe_color: [f32; 4],
    pub globe_emissive: [f32; 4],
    pub star_color: [f32; 4],
    /// x: log-depth coefficient, 0 when logarithmic depth is off.
    pub depth: [f32; 4],
}

impl Globals {
    pub fn new(scene: &Scene, camera: &PerspectiveCamera, options: &RendererOptions) -> Self {
        let sun = scene.sun.direction();
        let eye = camera.position.to_f32();
        let globe = &scene.globe.material;
        let log_fc = if options.logarithmic_depth {
            log_depth_coefficient(camera.far)
        } else {
            0.0
        };
        Self {
            view_proj: camera.view_proj(),
            star_model: mat4_rotation_y(scene.starfield.rotation_y),
            camera_pos: [eye[0], eye[1], eye[2], 1.0],
            light_dir: [sun.x as f32, sun.y as f32, sun.z as f32, 0.0],
            light_color: scene.sun.radiance().with_alpha(1.0),
            ambient: scene.ambient.radiance().with_alpha(1.0),
            globe_color: globe.color.to_linear().with_alpha(globe.opacity),
            globe_emissive: globe.emissive.to_linear().with_alpha(1.0),
            star_color: scene.starfield.color.to_linear().with_alpha(1.0),
            depth: [log_fc, camera.far as f32, 0.0, 0.0],
        }
    }
}

/// Per-instance data for one marker sphere.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct MarkerInstance {
    /// xyz: center, w: radius.
    pub offset_scale: [f32; 4],
    pub color: [f32; 4],
    pub emissive: [f32; 4],
}

impl From<&Marker> for MarkerInstance {
    fn from(marker: &Marker) -> Self {
        let p = marker.position.to_f32();
        Self {
            offset_scale: [p[0], p[1], p[2], marker.size as f32],
            color: marker.material.color.to_linear().with_alpha(marker.material.opacity),
            emissive: marker.material.emissive.to_linear().with_alpha(1.0),
        }
    }
}

pub fn marker_instances(scene: &Scene) -> Vec<MarkerInstance> {
    scene.markers.iter().map(MarkerInstance::from).collect()
}
