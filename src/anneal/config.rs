//! Annealing configuration and sample-count schedules.

use crate::error::AnnealError;

/// Starting temperature of every run.
///
/// Not configurable: all runs cool geometrically from this value.
pub const INITIAL_TEMPERATURE: f64 = 100.0;

/// Update rule for the number of samples drawn at each temperature level.
///
/// Called once per outer iteration with the current sample count `m`; the
/// returned value is used for the next level. Any `Fn(f64) -> f64` closure
/// is a schedule.
pub trait SampleSchedule {
    /// Returns the sample count for the next temperature level.
    fn next(&self, samples: f64) -> f64;
}

impl<F> SampleSchedule for F
where
    F: Fn(f64) -> f64,
{
    fn next(&self, samples: f64) -> f64 {
        self(samples)
    }
}

/// Built-in sample-count schedules.
///
/// Growing `m` as the temperature drops spends more effort on the
/// low-temperature levels, where the search settles.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SampleGrowth {
    /// `m` never changes.
    #[default]
    Constant,

    /// `m_{k+1} = m_k + step`.
    Linear {
        /// Samples added per level.
        step: f64,
    },

    /// `m_{k+1} = m_k * factor`.
    ///
    /// Typical `factor`: 1.01–1.1.
    Geometric {
        /// Growth factor per level.
        factor: f64,
    },
}

impl SampleSchedule for SampleGrowth {
    fn next(&self, samples: f64) -> f64 {
        match *self {
            SampleGrowth::Constant => samples,
            SampleGrowth::Linear { step } => samples + step,
            SampleGrowth::Geometric { factor } => samples * factor,
        }
    }
}

/// Configuration for an [`Annealer`](super::Annealer).
///
/// # Examples
///
/// ```
/// use u_anneal::anneal::{AnnealConfig, SampleGrowth};
///
/// let config = AnnealConfig::default()
///     .with_alpha(0.9)
///     .with_epsilon(0.01)
///     .with_initial_samples(20.0)
///     .with_sample_growth(SampleGrowth::Linear { step: 5.0 })
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnnealConfig {
    /// Geometric cooling factor in (0, 1). Higher = slower cooling.
    pub alpha: f64,

    /// Temperature floor. The run stops once the temperature is `<= epsilon`.
    pub epsilon: f64,

    /// Sample count `m` for the first temperature level. Truncated to an
    /// integer when a level runs.
    pub initial_samples: f64,

    /// Perturbation intensity handed to the neighbor generator on every call.
    pub n_changes: usize,

    /// Built-in schedule for `m`. Replaced by [`Annealer::with_beta`](super::Annealer::with_beta).
    pub sample_growth: SampleGrowth,

    /// Report every transition to the observer, not just level boundaries.
    pub verbose: bool,

    /// Trust the objective to be deterministic and score each state once.
    ///
    /// When `false`, the current and best states are rescored on every
    /// comparison, so a noisy objective cannot pin the best state on one
    /// lucky evaluation.
    pub pure_objective: bool,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for AnnealConfig {
    fn default() -> Self {
        Self {
            alpha: 0.95,
            epsilon: 1e-3,
            initial_samples: 100.0,
            n_changes: 1,
            sample_growth: SampleGrowth::Constant,
            verbose: false,
            pure_objective: false,
            seed: None,
        }
    }
}

impl AnnealConfig {
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_initial_samples(mut self, m: f64) -> Self {
        self.initial_samples = m;
        self
    }

    pub fn with_n_changes(mut self, n: usize) -> Self {
        self.n_changes = n;
        self
    }

    pub fn with_sample_growth(mut self, growth: SampleGrowth) -> Self {
        self.sample_growth = growth;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_pure_objective(mut self, pure: bool) -> Self {
        self.pure_objective = pure;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    ///
    /// `alpha` must lie strictly inside (0, 1). `epsilon` must be positive
    /// and finite, otherwise the cooling loop never reaches it.
    /// `initial_samples` must be finite and non-negative.
    pub fn validate(&self) -> Result<(), AnnealError> {
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(AnnealError::invalid(
                "alpha",
                self.alpha,
                "must be in (0, 1)",
            ));
        }
        if !(self.epsilon > 0.0 && self.epsilon.is_finite()) {
            return Err(AnnealError::invalid(
                "epsilon",
                self.epsilon,
                "must be positive and finite",
            ));
        }
        if !(self.initial_samples >= 0.0 && self.initial_samples.is_finite()) {
            return Err(AnnealError::invalid(
                "initial_samples",
                self.initial_samples,
                "must be non-negative and finite",
            ));
        }
        Ok(())
    }

    /// Number of outer iterations a run with this configuration performs.
    ///
    /// See [`expected_levels`].
    pub fn expected_levels(&self) -> usize {
        expected_levels(self.alpha, self.epsilon)
    }
}

/// Number of cooling steps needed to bring [`INITIAL_TEMPERATURE`] to or
/// below `epsilon` under `T_{k+1} = alpha * T_k`.
///
/// Counted by repeated multiplication, so the result matches the run loop
/// exactly instead of the rounded `ceil(ln(epsilon / 100) / ln(alpha))`.
/// Returns 0 for an `alpha` outside (0, 1) or an `epsilon` that is not
/// positive.
pub fn expected_levels(alpha: f64, epsilon: f64) -> usize {
    if !(alpha > 0.0 && alpha < 1.0) || !(epsilon > 0.0) {
        return 0;
    }
    let mut temperature = INITIAL_TEMPERATURE;
    let mut levels = 0;
    while temperature > epsilon {
        temperature *= alpha;
        levels += 1;
    }
    levels
}
