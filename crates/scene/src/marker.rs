use foundation::Rgb;
use foundation::math::{Vec3, project};
use serde::Deserialize;

use crate::locations::Location;
use crate::material::PhongMaterial;

#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MarkerStyle {
    pub color: Rgb,
    pub emissive: Rgb,
}

#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MarkerStyles {
    pub home: MarkerStyle,
    pub other: MarkerStyle,
    /// Radius of the sphere markers are placed on; slightly above the globe.
    pub altitude_radius: f64,
    /// Radius of each marker's own sphere mesh.
    pub size: f64,
}

impl Default for MarkerStyles {
    fn default() -> Self {
        let home = Rgb::from_hex(0xff1493);
        let other = Rgb::from_hex(0x4a9eff);
        Self {
            home: MarkerStyle {
                color: home,
                emissive: home.scale(0.25),
            },
            other: MarkerStyle {
                color: other,
                emissive: other.scale(0.2),
            },
            altitude_radius: 5.2,
            size: 0.05,
        }
    }
}

impl Default for MarkerStyle {
    fn default() -> Self {
        MarkerStyles::default().other
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub name: &'static str,
    pub position: Vec3,
    pub size: f64,
    pub highlight: bool,
    pub material: PhongMaterial,
}

impl Marker {
    pub fn from_location(location: &Location, styles: &MarkerStyles) -> Self {
        let style = if location.is_home {
            styles.home
        } else {
            styles.other
        };
        Self {
            name: location.name,
            position: project(location.lat_deg, location.lng_deg, styles.altitude_radius),
            size: styles.size,
            highlight: location.is_home,
            material: PhongMaterial::opaque(style.color, style.emissive),
        }
    }
}
