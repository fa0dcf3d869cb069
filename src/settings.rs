//! Render settings — the control state a host hands the engine per render.
//!
//! These types map directly to the JSON document the GUI sends across the
//! WASM boundary. Every render receives a fresh `RenderSettings`; the engine
//! never keeps or mutates control state between calls.

use serde::{Deserialize, Serialize};

use crate::dsp::params::{self, DEFAULT_BPM};
use crate::error::FushimiError;

// ── Mode ────────────────────────────────────────────────────

/// Which effect topology the gates drive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Delay,
    Reverb,
}

// ── Gate ────────────────────────────────────────────────────

/// One control point in normalized coordinates.
///
/// `x` is the time/decay axis, `y` the volume axis; both span [0, 1].
/// A gate's index is its position in the gate list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Gate {
    pub x: f64,
    pub y: f64,
}

impl Gate {
    pub fn new(x: f64, y: f64) -> Self {
        Gate { x, y }
    }
}

// ── Mix ─────────────────────────────────────────────────────

/// Dry/wet knob levels plus the tempo used by delay mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MixSettings {
    /// Dry level [0.0, 1.0].
    #[serde(default = "unity")]
    pub dry_gain: f64,
    /// Wet level [0.0, 1.0].
    #[serde(default = "unity")]
    pub wet_gain: f64,
    /// Tempo in beats per minute (delay mode only).
    #[serde(default = "default_bpm")]
    pub bpm: f64,
}

impl Default for MixSettings {
    fn default() -> Self {
        MixSettings {
            dry_gain: 1.0,
            wet_gain: 1.0,
            bpm: DEFAULT_BPM,
        }
    }
}

impl MixSettings {
    pub fn new(dry_gain: f64, wet_gain: f64, bpm: f64) -> Self {
        MixSettings { dry_gain, wet_gain, bpm }
    }
}

fn unity() -> f64 {
    1.0
}

fn default_bpm() -> f64 {
    DEFAULT_BPM
}

// ── Render request ──────────────────────────────────────────

/// Everything one render call needs besides the audio itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderSettings {
    #[serde(default)]
    pub mode: Mode,
    #[serde(default)]
    pub gates: Vec<Gate>,
    #[serde(default)]
    pub mix: MixSettings,
}

impl RenderSettings {
    pub fn new(mode: Mode, gates: Vec<Gate>, mix: MixSettings) -> Self {
        RenderSettings { mode, gates, mix }
    }

    /// Parse and validate a settings document.
    pub fn from_json(json: &str) -> Result<Self, FushimiError> {
        let settings: RenderSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check every control value against its allowed range.
    pub fn validate(&self) -> Result<(), FushimiError> {
        params::validate_gates(&self.gates)?;
        params::validate_mix(&self.mix)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Param, ParamError};

    #[test]
    fn defaults_fill_missing_fields() {
        let settings = RenderSettings::from_json("{}").unwrap();
        assert_eq!(settings.mode, Mode::Delay);
        assert!(settings.gates.is_empty());
        assert_eq!(settings.mix, MixSettings::default());
        assert_eq!(settings.mix.bpm, 120.0);
    }

    #[test]
    fn parses_host_document() {
        let json = r#"{
            "mode": "reverb",
            "gates": [{ "x": 0.2, "y": 0.5 }, { "x": 0.9, "y": 0.0 }],
            "mix": { "dryGain": 0.7, "wetGain": 1.0 }
        }"#;
        let settings = RenderSettings::from_json(json).unwrap();
        assert_eq!(settings.mode, Mode::Reverb);
        assert_eq!(settings.gates.len(), 2);
        assert_eq!(settings.gates[0], Gate::new(0.2, 0.5));
        assert!((settings.mix.dry_gain - 0.7).abs() < 1e-12);
        assert_eq!(settings.mix.bpm, 120.0);
    }

    #[test]
    fn rejects_out_of_range_knob() {
        let json = r#"{ "mix": { "wetGain": 1.2 } }"#;
        let err = RenderSettings::from_json(json).unwrap_err();
        assert_eq!(
            err,
            FushimiError::Param(ParamError::OutOfRange { param: Param::WetGain, value: 1.2 })
        );
    }

    #[test]
    fn rejects_unknown_mode() {
        let err = RenderSettings::from_json(r#"{ "mode": "chorus" }"#).unwrap_err();
        assert!(matches!(err, FushimiError::Json { .. }));
    }
}
