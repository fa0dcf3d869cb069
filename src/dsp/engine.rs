//! Effect Engine — renders a dry buffer through the gate-driven effect.
//!
//! The engine maps gates to taps or reverb instances, renders the wet
//! signal, and mixes it with the dry signal. It holds no state between
//! calls: the same input and settings always give the same output.

use log::debug;

use crate::error::FushimiError;
use crate::settings::{Gate, MixSettings, Mode, RenderSettings};

use super::delay::MultiTapDelay;
use super::mixer;
use super::params::{self, linear_to_db};
use super::reverb::SchroederReverb;

/// A gate-driven effect that turns a dry buffer into a wet one.
pub trait Effect {
    /// Render the wet signal. An effect with no voices returns an empty
    /// buffer.
    fn render_wet(&self, dry: &[f64]) -> Vec<f64>;

    /// Number of active taps or instances.
    fn voices(&self) -> usize;
}

/// Build the effect for `mode` from the gates. This is the only place the
/// pipeline branches on mode.
pub fn build_effect(
    gates: &[Gate],
    mode: Mode,
    mix: &MixSettings,
    sample_rate: u32,
) -> Result<Box<dyn Effect>, FushimiError> {
    let effect: Box<dyn Effect> = match mode {
        Mode::Delay => {
            let taps = params::taps(gates, sample_rate, mix.bpm)?;
            for (i, tap) in taps.iter().enumerate() {
                debug!(
                    " - Tap {}: {:.1}ms at {:.1}dB",
                    i + 1,
                    tap.offset_samples as f64 * 1000.0 / sample_rate as f64,
                    linear_to_db(tap.gain)
                );
            }
            Box::new(MultiTapDelay::new(taps))
        }
        Mode::Reverb => {
            let instances = params::instances(gates, sample_rate)?;
            for (i, instance) in instances.iter().enumerate() {
                debug!(
                    " - Instance {}: decay {:.1}ms at {:.1}dB",
                    i + 1,
                    instance.decay_samples as f64 * 1000.0 / sample_rate as f64,
                    linear_to_db(instance.gain)
                );
            }
            Box::new(SchroederReverb::new(sample_rate, instances))
        }
    };
    Ok(effect)
}

/// Process a dry buffer: validate, map gates, render wet, mix and normalize.
///
/// Invalid controls are rejected before any buffer is allocated.
pub fn process(
    dry: &[f64],
    gates: &[Gate],
    mode: Mode,
    mix: &MixSettings,
    sample_rate: u32,
) -> Result<Vec<f64>, FushimiError> {
    params::validate_mix(mix)?;
    let effect = build_effect(gates, mode, mix, sample_rate)?;
    debug!(
        "Processing {} samples in {:?} mode with {} active gate(s)",
        dry.len(),
        mode,
        effect.voices()
    );

    let wet = effect.render_wet(dry);
    Ok(mixer::mix(dry, &wet, mix.dry_gain, mix.wet_gain))
}

/// Effect engine bound to one sample rate.
#[derive(Debug, Clone, Copy)]
pub struct EffectEngine {
    sample_rate: u32,
}

impl EffectEngine {
    pub fn new(sample_rate: u32) -> Self {
        EffectEngine { sample_rate }
    }

    /// Check the settings and sample rate without rendering anything.
    pub fn validate(&self, settings: &RenderSettings) -> Result<(), FushimiError> {
        settings.validate()?;
        params::validate_sample_rate(self.sample_rate)
    }

    pub fn process(&self, dry: &[f64], settings: &RenderSettings) -> Result<Vec<f64>, FushimiError> {
        process(dry, &settings.gates, settings.mode, &settings.mix, self.sample_rate)
    }

    /// Same as `process`, for hosts that exchange `f32` audio.
    pub fn process_f32(&self, dry: &[f32], settings: &RenderSettings) -> Result<Vec<f32>, FushimiError> {
        self.validate(settings)?;
        let dry: Vec<f64> = dry.iter().map(|&s| s as f64).collect();
        let out = self.process(&dry, settings)?;
        Ok(out.iter().map(|&s| s as f32).collect())
    }
}
