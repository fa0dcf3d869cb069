use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum FushimiError {
    Param(ParamError),
    Layout(LayoutError),
    Json { message: String },
}

/// The control value a `ParamError` refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Param {
    GateX(usize),
    GateY(usize),
    Bpm,
    DryGain,
    WetGain,
    SampleRate,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParamError {
    OutOfRange { param: Param, value: f64 },
    TooManyGates { count: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub enum LayoutError {
    EmptyArea { width: f64, height: f64 },
}

impl fmt::Display for FushimiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FushimiError::Param(e) => write!(f, "Invalid parameter: {e}"),
            FushimiError::Layout(e) => write!(f, "Layout error: {e}"),
            FushimiError::Json { message } => write!(f, "Malformed JSON: {message}"),
        }
    }
}

impl std::error::Error for FushimiError {}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Param::GateX(i) => write!(f, "gate {} x", i + 1),
            Param::GateY(i) => write!(f, "gate {} y", i + 1),
            Param::Bpm => write!(f, "bpm"),
            Param::DryGain => write!(f, "dry gain"),
            Param::WetGain => write!(f, "wet gain"),
            Param::SampleRate => write!(f, "sample rate"),
        }
    }
}

impl fmt::Display for ParamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamError::OutOfRange { param, value } => write!(f, "{param} out of range: {value}"),
            ParamError::TooManyGates { count } => {
                write!(f, "{count} gates supplied, at most {} allowed", crate::dsp::params::MAX_GATES)
            }
        }
    }
}

impl std::error::Error for ParamError {}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutError::EmptyArea { width, height } => {
                write!(f, "Gate area has no extent ({width} x {height})")
            }
        }
    }
}

impl std::error::Error for LayoutError {}

impl From<ParamError> for FushimiError {
    fn from(e: ParamError) -> Self {
        FushimiError::Param(e)
    }
}

impl From<LayoutError> for FushimiError {
    fn from(e: LayoutError) -> Self {
        FushimiError::Layout(e)
    }
}

impl From<serde_json::Error> for FushimiError {
    fn from(e: serde_json::Error) -> Self {
        FushimiError::Json { message: e.to_string() }
    }
}
