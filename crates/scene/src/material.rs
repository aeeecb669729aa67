use foundation::Rgb;

/// Lambert/Phong-style surface: base color lit by scene lights plus a
/// self-illuminating emissive term.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PhongMaterial {
    pub color: Rgb,
    pub emissive: Rgb,
    pub opacity: f32,
    pub transparent: bool,
}

impl PhongMaterial {
    pub fn opaque(color: Rgb, emissive: Rgb) -> Self {
        Self {
            color,
            emissive,
            opacity: 1.0,
            transparent: false,
        }
    }

    pub fn translucent(color: Rgb, emissive: Rgb, opacity: f32) -> Self {
        Self {
            color,
            emissive,
            opacity: opacity.clamp(0.0, 1.0),
            transparent: true,
        }
    }
}
