//! Action noise profiles and weighted random selection

use rand::Rng;

use crate::io::configuration::DEFAULT_MAIN_PROBABILITY;
use crate::io::error::{Result, invalid_parameter};
use crate::spatial::grid::Action;

/// Split of probability mass between an intended action and the other three
///
/// The intended action is executed with the main probability; the remainder is
/// shared uniformly by the three other actions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseProfile {
    main: f64,
    side: f64,
}

impl NoiseProfile {
    /// Create a profile from the probability of executing the intended action
    ///
    /// # Errors
    ///
    /// Returns an error unless `0 < main_probability <= 1`
    pub fn new(main_probability: f64) -> Result<Self> {
        if main_probability.is_nan() || main_probability <= 0.0 || main_probability > 1.0 {
            return Err(invalid_parameter(
                "main_probability",
                &main_probability,
                &"must lie in (0, 1]",
            ));
        }

        Ok(Self {
            main: main_probability,
            side: (1.0 - main_probability) / 3.0,
        })
    }

    /// Probability of executing the intended action
    pub const fn main_probability(&self) -> f64 {
        self.main
    }

    /// Probability of executing each one of the other three actions
    pub const fn side_probability(&self) -> f64 {
        self.side
    }

    /// Probability that `actual` is executed when `intended` was chosen
    pub fn probability(&self, intended: Action, actual: Action) -> f64 {
        if intended == actual {
            self.main
        } else {
            self.side
        }
    }

    /// Outcome distribution of an intended action, in fixed action order
    pub fn kernel(&self, intended: Action) -> [(Action, f64); 4] {
        Action::ALL.map(|actual| (actual, self.probability(intended, actual)))
    }

    /// Weights for the intended action followed by its three alternatives
    ///
    /// Matches the layout of `[intended, intended.others()...]`.
    pub const fn sampling_weights(&self) -> [f64; 4] {
        [self.main, self.side, self.side, self.side]
    }
}

impl Default for NoiseProfile {
    fn default() -> Self {
        Self {
            main: DEFAULT_MAIN_PROBABILITY,
            side: (1.0 - DEFAULT_MAIN_PROBABILITY) / 3.0,
        }
    }
}

/// Generic weighted random selection
///
/// Returns index into weights array using cumulative distribution. A single
/// uniform draw is consumed per call.
pub fn weighted_choice<R: Rng + ?Sized>(rng: &mut R, weights: &[f64]) -> usize {
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return 0;
    }

    let mut rand_val = rng.random::<f64>() * total;
    for (i, &weight) in weights.iter().enumerate() {
        rand_val -= weight;
        if rand_val <= 0.0 {
            return i;
        }
    }
    weights.len() - 1
}
