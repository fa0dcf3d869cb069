//! DSP Engine — gate-driven delay and reverb, pure Rust.
//!
//! All DSP runs offline over fully materialized buffers and is
//! deterministic. The same code powers the WebAudio host (via WASM) and
//! native callers.

pub mod delay;
pub mod engine;
pub mod mixer;
pub mod params;
pub mod renderer;
pub mod reverb;
