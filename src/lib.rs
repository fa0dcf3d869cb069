pub mod dsp;
pub mod error;
pub mod layout;
pub mod settings;

use crate::dsp::engine::EffectEngine;
use crate::error::FushimiError;
use crate::settings::RenderSettings;
use wasm_bindgen::prelude::*;

pub use crate::dsp::engine::process;
pub use crate::settings::{Gate, MixSettings, Mode};

/// The crate version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

fn js_err(e: FushimiError) -> JsValue {
    JsValue::from_str(&format!("{e}"))
}

/// WASM-exposed: return the fushimi-core version string.
#[wasm_bindgen]
pub fn core_version() -> String {
    VERSION.to_string()
}

/// WASM-exposed: process mono f32 samples with a JSON settings document.
/// Returns the processed buffer for AudioWorklet playback.
#[wasm_bindgen]
pub fn process_samples(samples: Vec<f32>, sample_rate: u32, settings_json: &str) -> Result<Vec<f32>, JsValue> {
    let settings = RenderSettings::from_json(settings_json).map_err(js_err)?;
    EffectEngine::new(sample_rate)
        .process_f32(&samples, &settings)
        .map_err(js_err)
}

/// WASM-exposed: process mono f32 samples and encode the result as WAV bytes.
#[wasm_bindgen]
pub fn process_samples_wav(samples: Vec<f32>, sample_rate: u32, settings_json: &str) -> Result<Vec<u8>, JsValue> {
    let settings = RenderSettings::from_json(settings_json).map_err(js_err)?;
    dsp::renderer::render_wav_f32(&samples, &settings, sample_rate).map_err(js_err)
}

/// WASM-exposed: the per-gate parameters the engine derives from the
/// settings, for display next to each gate.
#[wasm_bindgen]
pub fn describe_gates(settings_json: &str, sample_rate: u32) -> Result<JsValue, JsValue> {
    let settings = RenderSettings::from_json(settings_json).map_err(js_err)?;
    let summary = dsp::params::describe(&settings.gates, settings.mode, sample_rate, settings.mix.bpm)
        .map_err(js_err)?;
    serde_wasm_bindgen::to_value(&summary).map_err(|e| JsValue::from_str(&format!("{e}")))
}

/// WASM-exposed: convert design-export layer positions into a gate list
/// (JSON array of `{x, y}`).
#[wasm_bindgen]
pub fn gates_from_layout(layout_json: &str, frame_width: f64, frame_height: f64) -> Result<JsValue, JsValue> {
    let gates = layout::gates_from_layout_json(layout_json, frame_width, frame_height).map_err(js_err)?;
    serde_wasm_bindgen::to_value(&gates).map_err(|e| JsValue::from_str(&format!("{e}")))
}

/// WASM-exposed: the 0–1 value of a vertical knob track at screen row `py`.
#[wasm_bindgen]
pub fn knob_value(track_top: f64, track_bottom: f64, py: f64) -> f64 {
    layout::KnobTrack::new(track_top, track_bottom).value_at(py)
}

/// WASM-exposed: the `[px, py]` screen position of a gate inside a frame,
/// for placing its handle when a saved settings document is loaded.
#[wasm_bindgen]
pub fn gate_position(frame_width: f64, frame_height: f64, x: f64, y: f64) -> Result<Vec<f64>, JsValue> {
    let area = layout::GateArea::frame(frame_width, frame_height).map_err(js_err)?;
    let (px, py) = area.position_of(&Gate::new(x, y));
    Ok(vec![px, py])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn knob_value_reads_track() {
        assert_eq!(knob_value(696.0, 761.1, 696.0), 1.0);
        assert_eq!(knob_value(696.0, 761.1, 800.0), 0.0);
        assert!((knob_value(0.0, 100.0, 25.0) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn gate_position_inverts_y() {
        assert_eq!(gate_position(1000.0, 800.0, 0.1, 0.875).unwrap(), vec![100.0, 100.0]);
        assert_eq!(gate_position(1000.0, 800.0, 0.0, 0.0).unwrap(), vec![0.0, 800.0]);
    }
}
