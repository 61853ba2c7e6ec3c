// wasm-bindgen class for the simulation.
//
// Exposes `FloodFlockGame`, the one object the page creates. All sim
// interaction goes through methods on this class.
//
// ## What it exposes
//
// - **Lifecycle:** `new(seed)`, `fromConfigJson(json)`, `tick()`,
//   `tickMany(frames)`, `frame()`.
// - **Input:** `clickFace(face)`, `hoverFace(face)`, `clearHover()`. Each
//   queues a `SimCommand` for the next frame. Face indices come from the
//   page's own raycast against the displayed mesh.
// - **Mesh buffers:** `positions()` and `colors()`: `Float32Array`s with
//   nine floats per face (three non-indexed vertices), rebuilt every slow
//   tick. `faceCount()` sizes the geometry.
// - **Sheep:** `sheepPositions()`: `Float32Array` of (x, y, z) per live
//   sheep, refreshed every frame.
// - **Landmarks:** `templePosition()`, `flagPreview()` (undefined once a
//   flock exists).
// - **State:** `statsJson()`, `drainEventsJson()`: JSON strings, parsed on
//   the JS side.
//
// Typed arrays are copied out of wasm memory on each call, so JS never holds
// a view that a later frame could invalidate.
//
// See also: `session.rs` for command queueing and event buffering,
// `flood_flock_sim::event` for the event JSON shape.

use crate::session::GameSession;
use js_sys::Float32Array;
use tracing::warn;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub struct FloodFlockGame {
    session: GameSession,
}

#[wasm_bindgen]
impl FloodFlockGame {
    /// Build an island from a text seed with the default config.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: &str) -> Result<FloodFlockGame, JsError> {
        Ok(Self {
            session: GameSession::new(seed)?,
        })
    }

    /// Build an island from a full `GameConfig` JSON document.
    #[wasm_bindgen(js_name = fromConfigJson)]
    pub fn from_config_json(json: &str) -> Result<FloodFlockGame, JsError> {
        Ok(Self {
            session: GameSession::from_config_json(json)?,
        })
    }

    /// Advance one frame.
    pub fn tick(&mut self) {
        self.session.advance(1);
    }

    /// Advance several frames, e.g. to catch up after a dropped frame.
    #[wasm_bindgen(js_name = tickMany)]
    pub fn tick_many(&mut self, frames: u32) {
        self.session.advance(frames);
    }

    pub fn frame(&self) -> f64 {
        self.session.sim().frame() as f64
    }

    #[wasm_bindgen(js_name = clickFace)]
    pub fn click_face(&mut self, face: u32) {
        self.session.click_face(face);
    }

    #[wasm_bindgen(js_name = hoverFace)]
    pub fn hover_face(&mut self, face: u32) {
        self.session.hover_face(face);
    }

    #[wasm_bindgen(js_name = clearHover)]
    pub fn clear_hover(&mut self) {
        self.session.clear_hover();
    }

    #[wasm_bindgen(js_name = faceCount)]
    pub fn face_count(&self) -> u32 {
        self.session.sim().mesh().face_count() as u32
    }

    pub fn positions(&self) -> Float32Array {
        Float32Array::from(self.session.sim().buffers().positions.as_slice())
    }

    pub fn colors(&self) -> Float32Array {
        Float32Array::from(self.session.sim().buffers().colors.as_slice())
    }

    #[wasm_bindgen(js_name = sheepPositions)]
    pub fn sheep_positions(&self) -> Float32Array {
        Float32Array::from(self.session.sim().sheep_positions().as_slice())
    }

    #[wasm_bindgen(js_name = templePosition)]
    pub fn temple_position(&self) -> Vec<f32> {
        let p = self.session.sim().temple_position();
        vec![p.x, p.y, p.z]
    }

    #[wasm_bindgen(js_name = flagPreview)]
    pub fn flag_preview(&self) -> Option<Vec<f32>> {
        self.session
            .sim()
            .flag_preview()
            .map(|p| vec![p.x, p.y, p.z])
    }

    #[wasm_bindgen(js_name = templeLevel)]
    pub fn temple_level(&self) -> u8 {
        self.session.sim().temple_level()
    }

    #[wasm_bindgen(js_name = waterLevel)]
    pub fn water_level(&self) -> f32 {
        self.session.sim().water_level()
    }

    #[wasm_bindgen(js_name = statsJson)]
    pub fn stats_json(&self) -> String {
        serde_json::to_string(&self.session.sim().stats()).unwrap_or_else(|e| {
            warn!(error = %e, "stats did not serialize");
            String::from("{}")
        })
    }

    /// All events since the last call, as a JSON array.
    #[wasm_bindgen(js_name = drainEventsJson)]
    pub fn drain_events_json(&mut self) -> String {
        let events = self.session.drain_events();
        serde_json::to_string(&events).unwrap_or_else(|e| {
            warn!(error = %e, "events did not serialize");
            String::from("[]")
        })
    }
}
