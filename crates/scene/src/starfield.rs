use foundation::Rgb;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StarfieldConfig {
    pub count: usize,
    /// Side length of the cube, centered at the origin, that stars fill.
    pub extent: f64,
    pub size: f32,
    pub color: Rgb,
    /// Rotation about +Y applied every frame (radians).
    pub rotation_step_rad: f64,
    /// Fixed seed for reproducible layouts; random when absent.
    pub seed: Option<u64>,
}

impl Default for StarfieldConfig {
    fn default() -> Self {
        Self {
            count: 10_000,
            extent: 2000.0,
            size: 0.1,
            color: Rgb::WHITE,
            rotation_step_rad: 0.0001,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Starfield {
    pub positions: Vec<[f32; 3]>,
    pub color: Rgb,
    pub size: f32,
    pub rotation_y: f64,
    rotation_step_rad: f64,
}

impl Starfield {
    pub fn generate(config: &StarfieldConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        let half = (config.extent.abs() * 0.5) as f32;
        let positions = if half > 0.0 {
            (0..config.count)
                .map(|_| {
                    [
                        rng.gen_range(-half..half),
                        rng.gen_range(-half..half),
                        rng.gen_range(-half..half),
                    ]
                })
                .collect()
        } else {
            vec![[0.0; 3]; config.count]
        };

        Self {
            positions,
            color: config.color,
            size: config.size,
            rotation_y: 0.0,
            rotation_step_rad: config.rotation_step_rad,
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// One frame of the slow background drift.
    pub fn advance(&mut self) {
        self.rotation_y = (self.rotation_y + self.rotation_step_rad) % std::f64::consts::TAU;
    }
}
