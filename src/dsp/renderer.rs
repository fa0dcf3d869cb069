//! WAV renderer — encodes a processed buffer as 16-bit mono PCM WAV bytes.

use crate::error::FushimiError;
use crate::settings::RenderSettings;

use super::engine::EffectEngine;

/// Convert samples in [-1, 1] to 16-bit PCM.
pub fn to_pcm_i16(samples: &[f64]) -> Vec<i16> {
    samples
        .iter()
        .map(|&s| (s * 32767.0).round().clamp(-32768.0, 32767.0) as i16)
        .collect()
}

/// Process `dry` and encode the result as a mono WAV file in memory.
pub fn render_wav(dry: &[f64], settings: &RenderSettings, sample_rate: u32) -> Result<Vec<u8>, FushimiError> {
    let out = EffectEngine::new(sample_rate).process(dry, settings)?;
    Ok(encode_wav_mono(&to_pcm_i16(&out), sample_rate))
}

/// `render_wav` for `f32` input. Nothing is copied until the settings and
/// sample rate have been accepted.
pub fn render_wav_f32(dry: &[f32], settings: &RenderSettings, sample_rate: u32) -> Result<Vec<u8>, FushimiError> {
    EffectEngine::new(sample_rate).validate(settings)?;
    let dry: Vec<f64> = dry.iter().map(|&s| s as f64).collect();
    render_wav(&dry, settings, sample_rate)
}

const WAV_HEADER_LEN: usize = 44;
const PCM_BYTES: u16 = 2;

/// Encode 16-bit mono PCM with a canonical 44-byte RIFF header.
pub fn encode_wav_mono(pcm: &[i16], sample_rate: u32) -> Vec<u8> {
    let data_len = (pcm.len() * PCM_BYTES as usize) as u32;
    let header: [&[u8]; 13] = [
        b"RIFF",
        &(WAV_HEADER_LEN as u32 - 8 + data_len).to_le_bytes(),
        b"WAVE",
        b"fmt ",
        &16u32.to_le_bytes(),
        &1u16.to_le_bytes(), // integer PCM
        &1u16.to_le_bytes(), // one channel
        &sample_rate.to_le_bytes(),
        &sample_rate.saturating_mul(PCM_BYTES as u32).to_le_bytes(),
        &PCM_BYTES.to_le_bytes(),
        &(PCM_BYTES * 8).to_le_bytes(),
        b"data",
        &data_len.to_le_bytes(),
    ];

    let mut wav = Vec::with_capacity(WAV_HEADER_LEN + data_len as usize);
    for field in header {
        wav.extend_from_slice(field);
    }
    wav.extend(pcm.iter().flat_map(|s| s.to_le_bytes()));
    wav
}
