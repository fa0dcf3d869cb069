//! Gate parameter mapping — normalized gate positions to DSP parameters.
//!
//! In delay mode the x axis spans four bars at the session tempo and the
//! y axis spans 0–150% of the dry level. In reverb mode the x axis spans a
//! 0–10 s decay time and the y axis 0–100%.

use serde::Serialize;

use crate::error::{FushimiError, Param, ParamError};
use crate::settings::{Gate, MixSettings, Mode};

/// Maximum number of gates a render accepts.
pub const MAX_GATES: usize = 5;
/// Gains below this are treated as silent and the gate is skipped.
pub const SILENCE_THRESHOLD: f64 = 1e-4;
pub const DEFAULT_BPM: f64 = 120.0;
pub const BEATS_PER_BAR: f64 = 4.0;
/// Length of the delay time axis in bars.
pub const DELAY_MAX_BARS: f64 = 4.0;
/// Delay taps can boost up to 150% of the dry level (about +3.52 dB).
pub const DELAY_MAX_GAIN: f64 = 1.5;
/// Length of the reverb decay axis in seconds.
pub const REVERB_MAX_DECAY_SECONDS: f64 = 10.0;
/// Longest delay axis a tempo may produce. Four bars fit below this down to
/// 16 BPM.
pub const MAX_DELAY_SECONDS: f64 = 60.0;

/// The DSP-domain values one gate maps to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GateParams {
    /// Delay offset (delay mode) or decay time (reverb mode), in samples.
    pub time_samples: usize,
    /// Linear gain relative to the dry signal.
    pub gain: f64,
}

impl GateParams {
    pub fn is_active(&self) -> bool {
        self.gain >= SILENCE_THRESHOLD
    }
}

/// One echo in the multi-tap delay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tap {
    pub offset_samples: usize,
    pub gain: f64,
}

/// One independent reverb network.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Instance {
    pub decay_samples: usize,
    pub gain: f64,
}

/// Duration of one 4/4 bar in seconds.
pub fn bar_seconds(bpm: f64) -> f64 {
    BEATS_PER_BAR * 60.0 / bpm
}

/// Map a single gate. Inputs are assumed validated.
pub fn map_gate(gate: &Gate, mode: Mode, sample_rate: u32, bpm: f64) -> GateParams {
    let sr = sample_rate as f64;
    match mode {
        Mode::Delay => GateParams {
            time_samples: (gate.x * DELAY_MAX_BARS * bar_seconds(bpm) * sr).round() as usize,
            gain: gate.y * DELAY_MAX_GAIN,
        },
        Mode::Reverb => GateParams {
            time_samples: (gate.x * REVERB_MAX_DECAY_SECONDS * sr).round() as usize,
            gain: gate.y,
        },
    }
}

/// Validate and map gates to delay taps, dropping silent ones.
pub fn taps(gates: &[Gate], sample_rate: u32, bpm: f64) -> Result<Vec<Tap>, FushimiError> {
    validate_gates(gates)?;
    validate_sample_rate(sample_rate)?;
    validate_bpm(bpm)?;
    Ok(active(gates, Mode::Delay, sample_rate, bpm)
        .map(|p| Tap {
            offset_samples: p.time_samples,
            gain: p.gain,
        })
        .collect())
}

/// Validate and map gates to reverb instances, dropping silent ones.
pub fn instances(gates: &[Gate], sample_rate: u32) -> Result<Vec<Instance>, FushimiError> {
    validate_gates(gates)?;
    validate_sample_rate(sample_rate)?;
    Ok(active(gates, Mode::Reverb, sample_rate, DEFAULT_BPM)
        .map(|p| Instance {
            decay_samples: p.time_samples,
            gain: p.gain,
        })
        .collect())
}

fn active(gates: &[Gate], mode: Mode, sample_rate: u32, bpm: f64) -> impl Iterator<Item = GateParams> + '_ {
    gates
        .iter()
        .map(move |g| map_gate(g, mode, sample_rate, bpm))
        .filter(GateParams::is_active)
}

// ── Validation ──────────────────────────────────────────────

fn check_unit(param: Param, value: f64) -> Result<(), ParamError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ParamError::OutOfRange { param, value })
    }
}

pub fn validate_gates(gates: &[Gate]) -> Result<(), FushimiError> {
    if gates.len() > MAX_GATES {
        return Err(ParamError::TooManyGates { count: gates.len() }.into());
    }
    for (i, gate) in gates.iter().enumerate() {
        check_unit(Param::GateX(i), gate.x)?;
        check_unit(Param::GateY(i), gate.y)?;
    }
    Ok(())
}

pub fn validate_mix(mix: &MixSettings) -> Result<(), FushimiError> {
    check_unit(Param::DryGain, mix.dry_gain)?;
    check_unit(Param::WetGain, mix.wet_gain)?;
    validate_bpm(mix.bpm)
}

/// A tempo must be positive and fast enough that four bars fit within
/// `MAX_DELAY_SECONDS`.
pub fn validate_bpm(bpm: f64) -> Result<(), FushimiError> {
    if bpm.is_finite() && bpm > 0.0 && DELAY_MAX_BARS * bar_seconds(bpm) <= MAX_DELAY_SECONDS {
        Ok(())
    } else {
        Err(ParamError::OutOfRange { param: Param::Bpm, value: bpm }.into())
    }
}

pub fn validate_sample_rate(sample_rate: u32) -> Result<(), FushimiError> {
    if sample_rate > 0 {
        Ok(())
    } else {
        Err(ParamError::OutOfRange {
            param: Param::SampleRate,
            value: 0.0,
        }
        .into())
    }
}

// ── Display helpers ─────────────────────────────────────────

/// Linear amplitude to decibels. Silence maps to negative infinity.
pub fn linear_to_db(gain: f64) -> f64 {
    20.0 * gain.log10()
}

pub fn db_to_linear(db: f64) -> f64 {
    10f64.powf(db / 20.0)
}

/// A gate's mapped parameters in human units, for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GateSummary {
    pub index: usize,
    pub active: bool,
    /// Delay offset or decay time in milliseconds.
    pub time_ms: f64,
    pub gain: f64,
    /// `None` for a silent gate.
    pub gain_db: Option<f64>,
}

/// Describe every gate (active or not) as the engine will see it.
pub fn describe(
    gates: &[Gate],
    mode: Mode,
    sample_rate: u32,
    bpm: f64,
) -> Result<Vec<GateSummary>, FushimiError> {
    validate_gates(gates)?;
    validate_sample_rate(sample_rate)?;
    validate_bpm(bpm)?;
    Ok(gates
        .iter()
        .enumerate()
        .map(|(index, gate)| {
            let p = map_gate(gate, mode, sample_rate, bpm);
            GateSummary {
                index,
                active: p.is_active(),
                time_ms: p.time_samples as f64 * 1000.0 / sample_rate as f64,
                gain: p.gain,
                gain_db: (p.gain > 0.0).then(|| linear_to_db(p.gain)),
            }
        })
        .collect())
}
