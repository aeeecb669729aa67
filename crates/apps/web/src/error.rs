use runtime::ScheduleError;
use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum GlobeError {
    #[error("invalid globe configuration: {0}")]
    Config(#[from] serde_json::Error),
    #[error("dom: {0}")]
    Dom(String),
    #[error("gpu: {0}")]
    Gpu(String),
    #[error("event listener: {0}")]
    Listener(String),
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
}

impl GlobeError {
    pub fn dom(err: impl std::fmt::Debug) -> Self {
        GlobeError::Dom(format!("{err:?}"))
    }
}

impl From<GlobeError> for JsValue {
    fn from(err: GlobeError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
