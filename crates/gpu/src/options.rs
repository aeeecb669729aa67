use foundation::Rgb;
use serde::Deserialize;

#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RendererOptions {
    pub antialias: bool,
    /// Samples per pixel when `antialias` is on.
    pub msaa_samples: u32,
    /// Ask for a surface that composites with the page behind it.
    pub transparent: bool,
    /// Write logarithmic fragment depth; keeps precision across the huge
    /// range between the starfield and the globe.
    pub logarithmic_depth: bool,
    pub clear_color: Rgb,
    pub clear_alpha: f64,
}

impl Default for RendererOptions {
    fn default() -> Self {
        Self {
            antialias: true,
            msaa_samples: 4,
            transparent: true,
            logarithmic_depth: true,
            clear_color: Rgb::from_hex(0x000014),
            clear_alpha: 1.0,
        }
    }
}

impl RendererOptions {
    pub fn sample_count(&self) -> u32 {
        if self.antialias && self.msaa_samples > 1 {
            // WebGL2 and WebGPU both guarantee 4x; anything else is not portable.
            4
        } else {
            1
        }
    }
}

/// Coefficient for logarithmic depth, mapping clip `w` in [0, far] to [0, 1].
pub fn log_depth_coefficient(far: f64) -> f32 {
    (1.0 / (far + 1.0).log2()) as f32
}

/// Depth value written for a fragment at clip-space `w`.
pub fn log_depth(w: f32, coefficient: f32) -> f32 {
    (1.0 + w).max(1e-6).log2() * coefficient
}
