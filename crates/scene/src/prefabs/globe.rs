use foundation::Rgb;
use serde::Deserialize;

use crate::material::PhongMaterial;
use crate::mesh::{MeshData, sphere_mesh};

#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GlobeStyle {
    pub radius: f64,
    pub segments: u32,
    pub color: Rgb,
    pub emissive: Rgb,
    pub opacity: f32,
}

impl Default for GlobeStyle {
    fn default() -> Self {
        Self {
            radius: 5.0,
            segments: 128,
            color: Rgb::from_hex(0x0066ff),
            emissive: Rgb::from_hex(0x000033),
            opacity: 0.9,
        }
    }
}

/// The translucent planet sphere at the origin.
#[derive(Debug, Clone, PartialEq)]
pub struct Globe {
    pub radius: f64,
    pub mesh: MeshData,
    pub material: PhongMaterial,
}

pub fn spawn_globe(style: &GlobeStyle) -> Globe {
    Globe {
        radius: style.radius,
        mesh: sphere_mesh(style.radius as f32, style.segments, style.segments),
        material: PhongMaterial::translucent(style.color, style.emissive, style.opacity),
    }
}
