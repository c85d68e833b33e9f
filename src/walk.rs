/// Bounded random walk
///
/// A Gaussian random walk whose raw position is unbounded but whose output is
/// folded back into `[min, max]` by reflection. Reflection avoids the pile-up at
/// the edges that clamping would cause.

use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::config::{ConfigError, ConfigResult, WalkParams};

/// Fold an unbounded position into `[min, max]`.
///
/// `pos mod 2r` is a sawtooth over `[0, 2r)`; shifting by `-r` and taking the
/// absolute value turns it into a triangle wave over `[0, r]`.
pub fn reflect(pos: f64, min: f64, max: f64) -> f64 {
    let range = max - min;
    if range <= 0.0 {
        return min;
    }
    // rem_euclid keeps the remainder non-negative for negative positions;
    // min() absorbs the last-ulp rounding of `min + range`
    ((pos.rem_euclid(2.0 * range) - range).abs() + min).min(max)
}

/// Infinite iterator over reflected walk values.
#[derive(Debug, Clone)]
pub struct BoundedRandomWalk<R> {
    params: WalkParams,
    pos: f64,
    step: Normal<f64>,
    rng: R,
}

impl<R: Rng> BoundedRandomWalk<R> {
    /// Start a walk at `params.max`.
    pub fn new(params: WalkParams, rng: R) -> ConfigResult<Self> {
        params.validate("walk")?;
        // validate() already rejected negative and non-finite deviations
        let step = Normal::new(0.0, params.std).map_err(|_| ConfigError::InvalidStd {
            name: "walk",
            std: params.std,
        })?;

        Ok(BoundedRandomWalk {
            params,
            pos: params.max,
            step,
            rng,
        })
    }

    /// Raw, unreflected position after the last step
    pub fn position(&self) -> f64 {
        self.pos
    }
}

impl<R: Rng> Iterator for BoundedRandomWalk<R> {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        self.pos += self.step.sample(&mut self.rng);
        Some(reflect(self.pos, self.params.min, self.params.max))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}
