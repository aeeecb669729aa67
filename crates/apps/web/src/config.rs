use gpu::{CameraConfig, OrbitConfig, RendererOptions};
use scene::SceneConfig;
use serde::Deserialize;

use crate::error::GlobeError;

/// Everything tunable about one mounted globe. Any subset may be given as
/// JSON; omitted fields keep their defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GlobeConfig {
    pub camera: CameraConfig,
    pub controls: OrbitConfig,
    pub renderer: RendererOptions,
    pub scene: SceneConfig,
}

impl GlobeConfig {
    pub fn from_json(json: &str) -> Result<Self, GlobeError> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(json)?)
    }
}
