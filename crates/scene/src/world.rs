use foundation::Rgb;
use foundation::math::Vec3;
use serde::Deserialize;

use crate::lights::{AmbientLight, DirectionalLight};
use crate::locations::{LOCATIONS, Location};
use crate::marker::{Marker, MarkerStyles};
use crate::prefabs::{Globe, GlobeStyle, spawn_globe};
use crate::starfield::{Starfield, StarfieldConfig};

#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    pub ambient_color: Rgb,
    pub ambient_intensity: f32,
    pub directional_color: Rgb,
    pub directional_intensity: f32,
    pub directional_position: Vec3,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            ambient_color: Rgb::from_hex(0x404040),
            ambient_intensity: 2.0,
            directional_color: Rgb::from_hex(0x4a9eff),
            directional_intensity: 3.0,
            directional_position: Vec3::new(5.0, 3.0, 5.0),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub starfield: StarfieldConfig,
    pub globe: GlobeStyle,
    pub markers: MarkerStyles,
    pub lighting: LightingConfig,
}

/// Everything drawn in one frame. One scene per mounted globe.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub starfield: Starfield,
    pub globe: Globe,
    pub markers: Vec<Marker>,
    pub ambient: AmbientLight,
    pub sun: DirectionalLight,
}

impl Scene {
    /// Build the full scene from the static location table. Pure; no GPU.
    pub fn bootstrap(config: &SceneConfig) -> Self {
        Self::with_locations(config, &LOCATIONS)
    }

    pub fn with_locations(config: &SceneConfig, locations: &[Location]) -> Self {
        let lighting = &config.lighting;
        Self {
            starfield: Starfield::generate(&config.starfield),
            globe: spawn_globe(&config.globe),
            markers: locations
                .iter()
                .map(|l| Marker::from_location(l, &config.markers))
                .collect(),
            ambient: AmbientLight {
                color: lighting.ambient_color,
                intensity: lighting.ambient_intensity,
            },
            sun: DirectionalLight {
                color: lighting.directional_color,
                intensity: lighting.directional_intensity,
                position: lighting.directional_position,
            },
        }
    }

    /// Per-frame scene animation.
    pub fn advance(&mut self) {
        self.starfield.advance();
    }

    pub fn home_marker(&self) -> Option<&Marker> {
        self.markers.iter().find(|m| m.highlight)
    }
}
