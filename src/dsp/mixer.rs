//! Mixer — combines dry and wet buffers and normalizes the peak.

use log::info;

use super::params::linear_to_db;

/// Sum `dry_gain·dry + wet_gain·wet`, zero-padding the shorter buffer.
/// No normalization is applied.
pub fn sum(dry: &[f64], wet: &[f64], dry_gain: f64, wet_gain: f64) -> Vec<f64> {
    let len = dry.len().max(wet.len());
    (0..len)
        .map(|n| {
            let d = dry.get(n).copied().unwrap_or(0.0);
            let w = wet.get(n).copied().unwrap_or(0.0);
            dry_gain * d + wet_gain * w
        })
        .collect()
}

/// Largest absolute sample value, 0.0 for an empty buffer.
pub fn peak(buffer: &[f64]) -> f64 {
    buffer.iter().fold(0.0f64, |m, s| m.max(s.abs()))
}

/// Scale the buffer down so its peak is 1.0 if it exceeds 1.0.
///
/// Buffers already within [-1, 1] (including silence) come back unchanged,
/// which makes this idempotent.
pub fn normalize(mut buffer: Vec<f64>) -> Vec<f64> {
    let peak = peak(&buffer);
    if peak > 1.0 {
        info!("Normalization applied: signal peaked at {:.2} dB", linear_to_db(peak));
        // Divide rather than multiply by 1/peak so the peak lands on exactly 1.0
        for s in &mut buffer {
            *s /= peak;
        }
    }
    buffer
}

/// Mix dry and wet signals and keep the result inside [-1, 1].
pub fn mix(dry: &[f64], wet: &[f64], dry_gain: f64, wet_gain: f64) -> Vec<f64> {
    normalize(sum(dry, wet, dry_gain, wet_gain))
}
