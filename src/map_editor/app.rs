//! Browser entry point.
//!
//! The host page owns the timer: it constructs a [`MapEditorApp`] from two
//! stacked canvases and calls [`MapEditorApp::tick`] every
//! [`MapEditorApp::tick_interval_ms`] milliseconds.

use tracing::info;
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::wasm_bindgen;
use web_sys::HtmlCanvasElement;

use crate::config::Config;
use crate::coordinator::Coordinator;
use crate::web::{CanvasSurface, MouseController};

use super::root::build;
use super::{EditorInput, WebEditor};

fn to_js(err: impl std::fmt::Display) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

#[wasm_bindgen]
pub struct MapEditorApp {
    coordinator: Coordinator<WebEditor>,
    _clicks: MouseController,
    tick: u64,
}

#[wasm_bindgen]
impl MapEditorApp {
    /// Draw on `canvas` and take clicks from `input`, an overlay of the same size.
    ///
    /// `config_json` is optional; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns a JS `Error` describing a bad config, a canvas without a
    /// 2D context, or a failure to attach the click listener.
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas: HtmlCanvasElement,
        input: HtmlCanvasElement,
        config_json: Option<String>,
    ) -> Result<MapEditorApp, JsValue> {
        let config = match config_json {
            Some(raw) => Config::from_json(&raw).map_err(to_js)?,
            None => Config::default(),
        };
        let surface = CanvasSurface::new(canvas).map_err(to_js)?;
        let coordinator = build(config, surface, input).map_err(to_js)?;
        let sender = coordinator.input_sender();
        let clicks =
            MouseController::attach(coordinator.input_surface(), sender, EditorInput::PointSignal).map_err(to_js)?;
        info!(app = %coordinator.config().application_name, "running");
        Ok(Self { coordinator, _clicks: clicks, tick: 0 })
    }

    /// Run one tick: inputs, updates, render.
    ///
    /// # Errors
    ///
    /// Returns a JS `Error` if drawing fails.
    pub fn tick(&mut self) -> Result<(), JsValue> {
        self.tick += 1;
        self.coordinator.run_tick(self.tick).map_err(to_js)?;
        Ok(())
    }

    #[wasm_bindgen(getter)]
    #[must_use]
    pub fn tick_interval_ms(&self) -> u32 {
        u32::try_from(self.coordinator.config().tick_interval_ms).unwrap_or(u32::MAX)
    }
}
