//! WebAssembly bindings for Bloom Garden.
//!
//! Provides a thin wrapper around [`Garden`] for browser environments. The host owns the
//! animation loop and calls `tick` with `requestAnimationFrame` timestamps.

use glam::Vec2;
use wasm_bindgen::prelude::*;

use crate::garden::{
    Garden, Gesture, LatestMotion, LogFeedback, LowPassMotion, MotionSample, MotionSource, Viewport,
};
use crate::schema::GardenConfig;

/// Initialize WASM module with panic hook and logging.
#[wasm_bindgen(start)]
pub fn init() {
    // Set panic hook for better error messages in browser
    console_error_panic_hook::set_once();

    // Initialize WASM logger
    wasm_logger::init(wasm_logger::Config::default());
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
}

/// Raw motion pushed from JS device-orientation callbacks.
#[derive(Clone, Default)]
struct SharedMotion(std::rc::Rc<std::cell::RefCell<LatestMotion>>);

impl MotionSource for SharedMotion {
    fn sample(&mut self) -> Option<MotionSample> {
        self.0.borrow_mut().sample()
    }
}

/// WebAssembly wrapper for a garden session.
#[wasm_bindgen]
pub struct WasmGarden {
    garden: Garden,
    motion: SharedMotion,
    viewport: Viewport,
}

impl WasmGarden {
    fn gesture(&mut self, gesture: Gesture) -> Result<JsValue, JsValue> {
        let outcome = self.garden.handle_gesture(gesture, self.viewport);
        to_js(&outcome)
    }
}

#[wasm_bindgen]
impl WasmGarden {
    /// Create a garden from JSON configuration.
    ///
    /// # Arguments
    /// * `config_json` - JSON string containing GardenConfig (may be `{}`)
    /// * `width`, `height` - Canvas size in CSS pixels
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str, width: f32, height: f32) -> Result<WasmGarden, JsValue> {
        let config: GardenConfig = serde_json::from_str(config_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid config JSON: {e}")))?;
        let viewport = Viewport::try_new(width, height)
            .map_err(|e| JsValue::from_str(&format!("Invalid canvas: {e}")))?;

        let motion = SharedMotion::default();
        let garden = Garden::new(config, LogFeedback, LowPassMotion::new(motion.clone()))
            .map_err(|e| JsValue::from_str(&format!("Invalid config: {e}")))?;

        Ok(WasmGarden {
            garden,
            motion,
            viewport,
        })
    }

    /// Update the canvas size. Invalid sizes are rejected and the old size kept.
    #[wasm_bindgen]
    pub fn resize(&mut self, width: f32, height: f32) -> Result<(), JsValue> {
        self.viewport = Viewport::try_new(width, height)
            .map_err(|e| JsValue::from_str(&format!("Invalid canvas: {e}")))?;
        Ok(())
    }

    /// Advance to `time` (seconds) and return the frame as a JS value.
    #[wasm_bindgen]
    pub fn tick(&mut self, time: f64) -> Result<JsValue, JsValue> {
        let frame = self.garden.tick(time, self.viewport);
        to_js(&frame)
    }

    /// Push a raw device motion reading. Tilt is low-pass filtered on the next tick.
    #[wasm_bindgen(js_name = setMotion)]
    pub fn set_motion(&mut self, tilt_x: f32, tilt_y: f32, gyro_rate: f32) {
        self.motion.0.borrow_mut().set(MotionSample {
            tilt_x,
            tilt_y,
            gyro_rate,
        });
    }

    #[wasm_bindgen]
    pub fn tap(&mut self, x: f32, y: f32) -> Result<JsValue, JsValue> {
        self.gesture(Gesture::Tap(Vec2::new(x, y)))
    }

    #[wasm_bindgen(js_name = dragStart)]
    pub fn drag_start(&mut self, x: f32, y: f32) -> Result<JsValue, JsValue> {
        self.gesture(Gesture::DragStart {
            point: Vec2::new(x, y),
        })
    }

    #[wasm_bindgen(js_name = dragMove)]
    pub fn drag_move(&mut self, x: f32, y: f32, dx: f32, dy: f32) -> Result<JsValue, JsValue> {
        self.gesture(Gesture::DragMove {
            point: Vec2::new(x, y),
            translation: Vec2::new(dx, dy),
        })
    }

    #[wasm_bindgen(js_name = dragEnd)]
    pub fn drag_end(
        &mut self,
        x: f32,
        y: f32,
        dx: f32,
        dy: f32,
        duration: f64,
    ) -> Result<JsValue, JsValue> {
        self.gesture(Gesture::DragEnd {
            point: Vec2::new(x, y),
            translation: Vec2::new(dx, dy),
            duration,
        })
    }

    /// Apply a pinch step. `factor` is relative to the previous pinch event.
    #[wasm_bindgen]
    pub fn pinch(&mut self, factor: f32) -> Result<JsValue, JsValue> {
        self.gesture(Gesture::Pinch(factor))
    }

    #[wasm_bindgen]
    pub fn shake(&mut self) -> Result<JsValue, JsValue> {
        self.gesture(Gesture::Shake)
    }

    /// Advance the palette and return its name.
    #[wasm_bindgen(js_name = cyclePalette)]
    pub fn cycle_palette(&mut self) -> String {
        self.garden.cycle_palette().name().to_string()
    }

    #[wasm_bindgen(js_name = clearAll)]
    pub fn clear_all(&mut self) {
        self.garden.clear_all();
    }

    #[wasm_bindgen(js_name = setBloomIntensity)]
    pub fn set_bloom_intensity(&mut self, value: f32) -> f32 {
        self.garden.state_mut().set_bloom_intensity(value)
    }

    #[wasm_bindgen(js_name = setChromaticOffset)]
    pub fn set_chromatic_offset(&mut self, value: f32) -> f32 {
        self.garden.state_mut().set_chromatic_offset(value)
    }

    #[wasm_bindgen(js_name = setShowStars)]
    pub fn set_show_stars(&mut self, on: bool) {
        self.garden.state_mut().set_show_stars(on);
    }

    #[wasm_bindgen(js_name = setShowGrass)]
    pub fn set_show_grass(&mut self, on: bool) {
        self.garden.state_mut().set_show_grass(on);
    }

    #[wasm_bindgen(js_name = setShowFireflies)]
    pub fn set_show_fireflies(&mut self, on: bool) {
        self.garden.state_mut().set_show_fireflies(on);
    }

    #[wasm_bindgen(js_name = setParallaxEnabled)]
    pub fn set_parallax_enabled(&mut self, on: bool) {
        self.garden.state_mut().set_parallax_enabled(on);
    }

    #[wasm_bindgen(js_name = setGyroWindEnabled)]
    pub fn set_gyro_wind_enabled(&mut self, on: bool) {
        self.garden.state_mut().set_gyro_wind_enabled(on);
    }

    /// Get garden statistics as a JS value.
    #[wasm_bindgen(js_name = getStats)]
    pub fn get_stats(&self) -> Result<JsValue, JsValue> {
        to_js(&self.garden.stats())
    }

    #[wasm_bindgen(js_name = flowerCount)]
    pub fn flower_count(&self) -> usize {
        self.garden.state().flower_count()
    }
}
