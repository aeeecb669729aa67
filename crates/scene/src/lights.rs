use foundation::Rgb;
use foundation::math::Vec3;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AmbientLight {
    pub color: Rgb,
    pub intensity: f32,
}

impl AmbientLight {
    /// Linear color scaled by intensity.
    pub fn radiance(&self) -> Rgb {
        self.color.to_linear().scale(self.intensity)
    }
}

/// Parallel light shining from `position` toward the origin.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DirectionalLight {
    pub color: Rgb,
    pub intensity: f32,
    pub position: Vec3,
}

impl DirectionalLight {
    /// Unit vector pointing from the surface toward the light.
    pub fn direction(&self) -> Vec3 {
        self.position.normalize()
    }

    /// Linear color scaled by intensity.
    pub fn radiance(&self) -> Rgb {
        self.color.to_linear().scale(self.intensity)
    }
}

#[cfg(test)]
mod tests {
    use super::DirectionalLight;
    use foundation::Rgb;
    use foundation::math::Vec3;

    #[test]
    fn direction_is_normalized_position() {
        let light = DirectionalLight {
            color: Rgb::WHITE,
            intensity: 3.0,
            position: Vec3::new(5.0, 3.0, 5.0),
        };
        let d = light.direction();
        assert!((d.length() - 1.0).abs() < 1e-12);
        assert!(d.x > 0.0 && d.y > 0.0 && d.z > 0.0);
        assert_eq!(light.radiance(), Rgb::new(3.0, 3.0, 3.0));
    }
}
