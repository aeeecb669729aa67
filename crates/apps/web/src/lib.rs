//! Animated globe background for web pages: a starfield, a translucent
//! planet with location markers and a slowly orbiting camera.

use std::sync::atomic::{AtomicBool, Ordering};

use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

pub mod config;
pub mod error;
pub mod instance;
pub mod lookup;
pub mod platform;
pub mod web;
pub mod wgpu;

#[cfg(test)]
mod testing;

pub use config::GlobeConfig;
pub use error::GlobeError;
pub use instance::{GlobeInstance, GlobeResources};
pub use lookup::DirectoryLookup;
pub use platform::{Host, InputBinding, RenderBackend, SurfaceSize};
pub use web::WebHost;

static INITIALIZED: AtomicBool = AtomicBool::new(false);

#[wasm_bindgen(start)]
pub fn start() {
    // The module may be instantiated more than once on a page.
    if INITIALIZED.swap(true, Ordering::SeqCst) {
        return;
    }
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
}

fn report(err: GlobeError) -> JsValue {
    warn!("globe mount failed: {err}");
    err.into()
}

/// Handle held by the page for one globe background.
///
/// Dropping the handle (or calling `free` from script) tears the globe down
/// like `unmount`.
#[wasm_bindgen]
#[derive(Default)]
pub struct GlobeBackground {
    instance: Option<GlobeInstance<WebHost>>,
}

#[wasm_bindgen]
impl GlobeBackground {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert the globe into `container`. `config_json` may override any
    /// subset of the defaults. A globe already mounted by this handle is
    /// torn down first.
    pub fn mount(
        &mut self,
        container: HtmlElement,
        config_json: Option<String>,
    ) -> Result<(), JsValue> {
        self.unmount();
        let config = GlobeConfig::from_json(config_json.as_deref().unwrap_or("")).map_err(report)?;
        let host = WebHost::new(container).map_err(report)?;
        self.instance = Some(GlobeInstance::mount(host, &config).map_err(report)?);
        Ok(())
    }

    #[wasm_bindgen(js_name = mountById)]
    pub fn mount_by_id(&mut self, id: &str, config_json: Option<String>) -> Result<(), JsValue> {
        self.unmount();
        let config = GlobeConfig::from_json(config_json.as_deref().unwrap_or("")).map_err(report)?;
        let host = WebHost::from_element_id(id).map_err(report)?;
        self.instance = Some(GlobeInstance::mount(host, &config).map_err(report)?);
        Ok(())
    }

    pub fn unmount(&mut self) {
        if let Some(mut instance) = self.instance.take() {
            instance.teardown();
        }
    }

    #[wasm_bindgen(getter)]
    pub fn running(&self) -> bool {
        self.instance
            .as_ref()
            .is_some_and(|i| i.loop_state() == runtime::LoopState::Running)
    }
}
