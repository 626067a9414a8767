use anyhow::{bail, Result};
use rand::Rng;

/// Fixation-to-target asynchrony sampler: exponential with rate
/// 1/(mean - min), shifted by min, rejection-truncated above max. The
/// memoryless hazard keeps target onset unpredictable from elapsed fixation
/// time alone, up to the ceiling.
#[derive(Debug, Clone, Copy)]
pub struct SoaSampler {
    min_ms: f64,
    mean_ms: f64,
    max_ms: f64,
}

impl SoaSampler {
    pub fn new(min_ms: f64, mean_ms: f64, max_ms: f64) -> Result<Self> {
        if !(min_ms >= 0.0 && mean_ms > min_ms) {
            bail!(
                "asynchrony mean ({mean_ms} ms) must exceed min ({min_ms} ms), min must be >= 0"
            );
        }
        if max_ms <= min_ms {
            bail!("asynchrony max ({max_ms} ms) must exceed min ({min_ms} ms)");
        }
        Ok(Self {
            min_ms,
            mean_ms,
            max_ms,
        })
    }

    /// Draw one delay in milliseconds. Samples above max are discarded and
    /// redrawn, so each returned value lies in [min, max]. Terminates with
    /// probability 1: every draw lands under max with fixed probability > 0.
    pub fn sample(&self, rng: &mut impl Rng) -> f64 {
        loop {
            let u: f64 = rng.random();
            let value = self.min_ms + (self.mean_ms - self.min_ms) * -(1.0 - u).ln();
            if value <= self.max_ms {
                return value;
            }
        }
    }
}
