//! Gate layout — screen-space positions to normalized controls.
//!
//! The host draws gates inside a rectangle whose top edge is the loudest
//! position, and dry/wet knobs on vertical tracks. Layer positions exported
//! from a design tool can be loaded as gates too.

use serde::Deserialize;

use crate::dsp::params::MAX_GATES;
use crate::error::{FushimiError, LayoutError, ParamError};
use crate::settings::Gate;

/// Layer names that mark a gate in a design export.
pub const GATE_LAYER_KEYWORDS: [&str; 4] = ["Torii", "Gate", "Tap", "Reverb"];

/// The screen rectangle gates can be dragged within.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GateArea {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl GateArea {
    pub fn new(left: f64, right: f64, top: f64, bottom: f64) -> Result<Self, FushimiError> {
        let width = right - left;
        let height = bottom - top;
        if !(width > 0.0 && height > 0.0) {
            return Err(LayoutError::EmptyArea { width, height }.into());
        }
        Ok(GateArea { left, right, top, bottom })
    }

    /// A frame anchored at the origin.
    pub fn frame(width: f64, height: f64) -> Result<Self, FushimiError> {
        GateArea::new(0.0, width, 0.0, height)
    }

    /// Convert a screen point to a gate. Points outside the area are
    /// clamped to its edges; y is inverted so the top edge is full volume.
    pub fn gate_at(&self, px: f64, py: f64) -> Gate {
        let x = (px - self.left) / (self.right - self.left);
        let y = 1.0 - (py - self.top) / (self.bottom - self.top);
        Gate::new(x.clamp(0.0, 1.0), y.clamp(0.0, 1.0))
    }

    /// Screen position of a gate, the inverse of `gate_at`.
    pub fn position_of(&self, gate: &Gate) -> (f64, f64) {
        (
            self.left + gate.x * (self.right - self.left),
            self.bottom - gate.y * (self.bottom - self.top),
        )
    }
}

/// A vertical knob track; the top end is 1.0 and the bottom end 0.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KnobTrack {
    pub top: f64,
    pub bottom: f64,
}

impl KnobTrack {
    pub fn new(top: f64, bottom: f64) -> Self {
        KnobTrack { top, bottom }
    }

    pub fn value_at(&self, py: f64) -> f64 {
        let mut range = self.bottom - self.top;
        if range == 0.0 {
            range = 1.0;
        }
        (1.0 - (py - self.top) / range).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Deserialize)]
struct LayoutExport {
    #[serde(default)]
    layers: Vec<Layer>,
}

#[derive(Debug, Deserialize)]
struct Layer {
    #[serde(default)]
    name: String,
    #[serde(default)]
    x: f64,
    #[serde(default)]
    y: f64,
}

/// Load gates from a design export of the form
/// `{ "layers": [{ "name": "Torii 1", "x": 120, "y": 80 }, ...] }`.
///
/// Only layers whose name contains a gate keyword are used, in file order,
/// positioned within a `width` × `height` frame.
pub fn gates_from_layout_json(json: &str, width: f64, height: f64) -> Result<Vec<Gate>, FushimiError> {
    let area = GateArea::frame(width, height)?;
    let export: LayoutExport = serde_json::from_str(json)?;
    let gates: Vec<Gate> = export
        .layers
        .iter()
        .filter(|l| GATE_LAYER_KEYWORDS.iter().any(|k| l.name.contains(k)))
        .map(|l| area.gate_at(l.x, l.y))
        .collect();
    if gates.len() > MAX_GATES {
        return Err(ParamError::TooManyGates { count: gates.len() }.into());
    }
    Ok(gates)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_map_to_unit_square() {
        let area = GateArea::new(69.0, 526.5, 213.0, 642.0).unwrap();
        assert_eq!(area.gate_at(69.0, 642.0), Gate::new(0.0, 0.0));
        assert_eq!(area.gate_at(526.5, 213.0), Gate::new(1.0, 1.0));
        let mid = area.gate_at((69.0 + 526.5) / 2.0, (213.0 + 642.0) / 2.0);
        assert!((mid.x - 0.5).abs() < 1e-12);
        assert!((mid.y - 0.5).abs() < 1e-12);
    }

    #[test]
    fn points_outside_are_clamped() {
        let area = GateArea::frame(1000.0, 800.0).unwrap();
        assert_eq!(area.gate_at(-50.0, 900.0), Gate::new(0.0, 0.0));
        assert_eq!(area.gate_at(1200.0, -10.0), Gate::new(1.0, 1.0));
    }

    #[test]
    fn position_round_trips() {
        let area = GateArea::new(10.0, 110.0, 20.0, 220.0).unwrap();
        let gate = Gate::new(0.3, 0.75);
        let (px, py) = area.position_of(&gate);
        let back = area.gate_at(px, py);
        assert!((back.x - gate.x).abs() < 1e-12);
        assert!((back.y - gate.y).abs() < 1e-12);
    }

    #[test]
    fn degenerate_area_is_rejected() {
        let err = GateArea::new(10.0, 10.0, 0.0, 100.0).unwrap_err();
        assert_eq!(
            err,
            FushimiError::Layout(LayoutError::EmptyArea { width: 0.0, height: 100.0 })
        );
        assert!(GateArea::frame(100.0, f64::NAN).is_err());
    }

    #[test]
    fn knob_track_top_is_full() {
        let knob = KnobTrack::new(696.0, 761.1);
        assert_eq!(knob.value_at(696.0), 1.0);
        assert_eq!(knob.value_at(761.1), 0.0);
        assert_eq!(knob.value_at(2000.0), 0.0);
        assert!((knob.value_at(728.55) - 0.5).abs() < 1e-9);

        let flat = KnobTrack::new(50.0, 50.0);
        assert_eq!(flat.value_at(50.0), 1.0);
    }

    #[test]
    fn loads_gate_layers_from_export() {
        let json = r#"{
            "layers": [
                { "name": "Background", "x": 0, "y": 0 },
                { "name": "Torii 1", "x": 100, "y": 100 },
                { "name": "Tap 2", "x": 900, "y": 700 },
                { "name": "Label", "x": 500, "y": 400 },
                { "name": "Gate", "x": 500, "y": 400 }
            ]
        }"#;
        let gates = gates_from_layout_json(json, 1000.0, 800.0).unwrap();
        assert_eq!(gates.len(), 3);
        assert!((gates[0].x - 0.1).abs() < 1e-12);
        assert!((gates[0].y - 0.875).abs() < 1e-12);
        assert!((gates[1].x - 0.9).abs() < 1e-12);
        assert!((gates[1].y - 0.125).abs() < 1e-12);
        assert_eq!(gates[2], Gate::new(0.5, 0.5));
    }

    #[test]
    fn export_without_layers_has_no_gates() {
        assert!(gates_from_layout_json("{}", 100.0, 100.0).unwrap().is_empty());
    }

    #[test]
    fn export_with_too_many_gates_is_rejected() {
        let layers: Vec<String> = (0..6)
            .map(|i| format!(r#"{{ "name": "Torii {i}", "x": 10, "y": 10 }}"#))
            .collect();
        let json = format!(r#"{{ "layers": [{}] }}"#, layers.join(","));
        let err = gates_from_layout_json(&json, 100.0, 100.0).unwrap_err();
        assert_eq!(err, FushimiError::Param(ParamError::TooManyGates { count: 6 }));
    }

    #[test]
    fn malformed_export_is_reported() {
        let err = gates_from_layout_json("[1, 2", 100.0, 100.0).unwrap_err();
        assert!(matches!(err, FushimiError::Json { .. }));
    }
}
