//! Delay effect — offline multi-tap echo.
//!
//! Each tap is a scaled, time-shifted copy of the dry signal. There is no
//! feedback path, so taps are independent and their order does not matter.

use super::engine::Effect;
use super::params::Tap;

/// A multi-tap delay built from the active gates of one render.
#[derive(Debug, Clone, Default)]
pub struct MultiTapDelay {
    taps: Vec<Tap>,
}

impl MultiTapDelay {
    pub fn new(taps: Vec<Tap>) -> Self {
        Self { taps }
    }

    pub fn taps(&self) -> &[Tap] {
        &self.taps
    }

    /// Length of the echo tail past the end of the dry signal.
    pub fn tail_samples(&self) -> usize {
        self.taps.iter().map(|t| t.offset_samples).max().unwrap_or(0)
    }

    /// Render the wet signal: `wet[n] = Σ gain_i · dry[n − offset_i]`.
    ///
    /// Output length is `dry.len()` plus the longest offset. With no taps or
    /// no input the result is empty.
    pub fn render(&self, dry: &[f64]) -> Vec<f64> {
        if self.taps.is_empty() || dry.is_empty() {
            return Vec::new();
        }

        let mut wet = vec![0.0; dry.len() + self.tail_samples()];
        for tap in &self.taps {
            let shifted = &mut wet[tap.offset_samples..tap.offset_samples + dry.len()];
            for (out, &sample) in shifted.iter_mut().zip(dry) {
                *out += tap.gain * sample;
            }
        }
        wet
    }
}

impl Effect for MultiTapDelay {
    fn render_wet(&self, dry: &[f64]) -> Vec<f64> {
        self.render(dry)
    }

    fn voices(&self) -> usize {
        self.taps.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn impulse(len: usize) -> Vec<f64> {
        let mut buf = vec![0.0; len];
        buf[0] = 1.0;
        buf
    }

    #[test]
    fn single_tap_shifts_and_scales() {
        let delay = MultiTapDelay::new(vec![Tap { offset_samples: 10, gain: 0.5 }]);
        let wet = delay.render(&impulse(20));
        assert_eq!(wet.len(), 30);
        for (n, &s) in wet.iter().enumerate() {
            let expected = if n == 10 { 0.5 } else { 0.0 };
            assert!((s - expected).abs() < 1e-12, "sample {n}: {s}");
        }
    }

    #[test]
    fn zero_offset_is_immediate_copy() {
        let dry = [0.25, -0.5, 1.0];
        let delay = MultiTapDelay::new(vec![Tap { offset_samples: 0, gain: 1.5 }]);
        let wet = delay.render(&dry);
        assert_eq!(wet, vec![0.375, -0.75, 1.5]);
    }

    #[test]
    fn length_grows_by_longest_offset() {
        let delay = MultiTapDelay::new(vec![
            Tap { offset_samples: 100, gain: 1.0 },
            Tap { offset_samples: 700, gain: 0.2 },
            Tap { offset_samples: 300, gain: 0.6 },
        ]);
        assert_eq!(delay.taps().len(), 3);
        assert_eq!(delay.tail_samples(), 700);
        assert_eq!(delay.render(&[0.1; 50]).len(), 750);
    }

    #[test]
    fn tap_order_does_not_matter() {
        let dry: Vec<f64> = (0..500).map(|n| ((n as f64) * 0.37).sin() * 0.8).collect();
        let taps = vec![
            Tap { offset_samples: 13, gain: 0.3 },
            Tap { offset_samples: 0, gain: 1.2 },
            Tap { offset_samples: 211, gain: 0.75 },
            Tap { offset_samples: 13, gain: 0.1 },
            Tap { offset_samples: 97, gain: 1.5 },
        ];
        let forward = MultiTapDelay::new(taps.clone()).render(&dry);

        let mut reversed = taps.clone();
        reversed.reverse();
        let mut rotated = taps;
        rotated.rotate_left(2);

        for other in [MultiTapDelay::new(reversed), MultiTapDelay::new(rotated)] {
            let out = other.render(&dry);
            assert_eq!(out.len(), forward.len());
            for (a, b) in forward.iter().zip(&out) {
                assert!((a - b).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn empty_cases_yield_empty_output() {
        let delay = MultiTapDelay::new(vec![Tap { offset_samples: 5, gain: 1.0 }]);
        assert!(delay.render(&[]).is_empty());
        assert!(MultiTapDelay::default().render(&impulse(8)).is_empty());
    }
}
