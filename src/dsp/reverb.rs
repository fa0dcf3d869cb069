//! Reverb effect — multi-instance Schroeder reverb.
//!
//! Every active gate gets its own network of parallel comb filters followed
//! by series allpass filters. Comb feedback is derived from the gate's decay
//! time so each comb reaches −60 dB (a factor of e^-5) at that time. All
//! filter state lives inside one `render` call.

use log::debug;

use super::engine::Effect;
use super::params::{Instance, REVERB_MAX_DECAY_SECONDS};

/// A comb filter: `y[n] = x[n] + g·y[n − D]`.
#[derive(Debug, Clone)]
struct CombFilter {
    buffer: Vec<f64>,
    index: usize,
    feedback: f64,
}

impl CombFilter {
    fn new(size: usize, feedback: f64) -> Self {
        Self {
            buffer: vec![0.0; size],
            index: 0,
            feedback,
        }
    }

    #[inline]
    fn process(&mut self, input: f64) -> f64 {
        let output = input + self.feedback * self.buffer[self.index];
        self.buffer[self.index] = output;
        self.index = (self.index + 1) % self.buffer.len();
        output
    }
}

/// An allpass filter: `y[n] = −g·x[n] + x[n − D] + g·y[n − D]`.
#[derive(Debug, Clone)]
struct AllpassFilter {
    buffer: Vec<f64>,
    index: usize,
    feedback: f64,
}

impl AllpassFilter {
    fn new(size: usize, feedback: f64) -> Self {
        Self {
            buffer: vec![0.0; size],
            index: 0,
            feedback,
        }
    }

    #[inline]
    fn process(&mut self, input: f64) -> f64 {
        let output = -self.feedback * input + self.buffer[self.index];
        self.buffer[self.index] = input + self.feedback * output;
        self.index = (self.index + 1) % self.buffer.len();
        output
    }
}

// Tuning constants in milliseconds, scaled to the sample rate.
pub const COMB_TUNING_MS: [f64; 4] = [29.7, 37.1, 41.1, 43.7];
pub const ALLPASS_TUNING_MS: [f64; 2] = [5.0, 1.7];
pub const ALLPASS_FEEDBACK: f64 = 0.7;

/// Amplitude factor a comb reaches after the decay time (−60 dB ≈ e^-5).
const DECAY_EXPONENT: f64 = -5.0;

fn tuning_samples(ms: f64, sample_rate: u32) -> usize {
    ((sample_rate as f64 * ms / 1000.0) as usize).max(1)
}

/// Comb feedback that decays to e^-5 after `decay_samples`.
pub fn comb_feedback(delay_samples: usize, decay_samples: usize) -> f64 {
    let g = (DECAY_EXPONENT * delay_samples as f64 / decay_samples as f64).exp();
    debug_assert!(g > 0.0 && g < 1.0, "unstable comb feedback {g}");
    g
}

/// Multi-instance Schroeder reverb for one sample rate.
#[derive(Debug, Clone)]
pub struct SchroederReverb {
    comb_lengths: [usize; 4],
    allpass_lengths: [usize; 2],
    max_decay: usize,
    instances: Vec<Instance>,
}

impl SchroederReverb {
    pub fn new(sample_rate: u32, instances: Vec<Instance>) -> Self {
        let comb_lengths = COMB_TUNING_MS.map(|ms| tuning_samples(ms, sample_rate));
        let allpass_lengths = ALLPASS_TUNING_MS.map(|ms| tuning_samples(ms, sample_rate));
        let min_decay = comb_lengths.iter().copied().max().unwrap_or(1);
        let max_decay = ((REVERB_MAX_DECAY_SECONDS * sample_rate as f64) as usize).max(min_decay);
        Self {
            comb_lengths,
            allpass_lengths,
            max_decay,
            instances,
        }
    }

    pub fn comb_lengths(&self) -> &[usize] {
        &self.comb_lengths
    }

    pub fn allpass_lengths(&self) -> &[usize] {
        &self.allpass_lengths
    }

    pub fn instances(&self) -> &[Instance] {
        &self.instances
    }

    /// Shortest decay an instance may use: the longest comb delay, which
    /// keeps every comb feedback strictly below one.
    pub fn min_decay(&self) -> usize {
        self.comb_lengths.iter().copied().max().unwrap_or(1)
    }

    /// Clamp a requested decay time into the supported range.
    pub fn effective_decay(&self, decay_samples: usize) -> usize {
        decay_samples.clamp(self.min_decay(), self.max_decay)
    }

    /// Feedback coefficients used for an instance with this decay time.
    pub fn comb_feedbacks(&self, decay_samples: usize) -> [f64; 4] {
        let decay = self.effective_decay(decay_samples);
        self.comb_lengths.map(|d| comb_feedback(d, decay))
    }

    /// Render one instance at unity gain. Output length is
    /// `dry.len() + effective_decay(decay_samples)`.
    pub fn render_instance(&self, dry: &[f64], decay_samples: usize) -> Vec<f64> {
        let decay = self.effective_decay(decay_samples);
        let mut combs: Vec<CombFilter> = self
            .comb_lengths
            .iter()
            .map(|&d| CombFilter::new(d, comb_feedback(d, decay)))
            .collect();
        let mut allpasses: Vec<AllpassFilter> = self
            .allpass_lengths
            .iter()
            .map(|&d| AllpassFilter::new(d, ALLPASS_FEEDBACK))
            .collect();
        let comb_scale = 1.0 / combs.len() as f64;

        let len = dry.len() + decay;
        let mut out = Vec::with_capacity(len);
        for n in 0..len {
            let input = dry.get(n).copied().unwrap_or(0.0);

            // Sum comb filters in parallel
            let mut sample = 0.0;
            for comb in &mut combs {
                sample += comb.process(input);
            }
            sample *= comb_scale;

            // Diffuse through allpass filters in series
            for allpass in &mut allpasses {
                sample = allpass.process(sample);
            }
            out.push(sample);
        }
        out
    }

    /// Total wet length: the dry length plus the longest instance tail.
    pub fn wet_len(&self, dry_len: usize) -> usize {
        self.instances
            .iter()
            .map(|i| dry_len + self.effective_decay(i.decay_samples))
            .max()
            .unwrap_or(0)
    }

    /// Render every instance, scale by its gain and sum. Shorter instances
    /// are zero-padded to the longest tail. No instances gives an empty
    /// buffer.
    pub fn render(&self, dry: &[f64]) -> Vec<f64> {
        let mut wet = vec![0.0; self.wet_len(dry.len())];
        for instance in &self.instances {
            debug!(
                "reverb instance: decay={} samples (effective {}), gain={:.3}",
                instance.decay_samples,
                self.effective_decay(instance.decay_samples),
                instance.gain
            );
            let tail = self.render_instance(dry, instance.decay_samples);
            for (out, s) in wet.iter_mut().zip(tail) {
                *out += instance.gain * s;
            }
        }
        wet
    }
}

impl Effect for SchroederReverb {
    fn render_wet(&self, dry: &[f64]) -> Vec<f64> {
        self.render(dry)
    }

    fn voices(&self) -> usize {
        self.instances.len()
    }
}
