//! Annealing execution loop.
//!
//! # Algorithm
//!
//! 1. Start at temperature [`INITIAL_TEMPERATURE`] with `m = initial_samples`
//! 2. While the temperature is above `epsilon`:
//!    a. Run `floor(m)` transitions, each feeding the next
//!    b. After every transition, adopt the visited state as best if its cost
//!       is `<=` the best cost so far
//!    c. `m = beta(m)`, then `T = alpha * T`
//! 3. Return the best state visited

use super::config::{AnnealConfig, SampleSchedule, INITIAL_TEMPERATURE};
use super::observer::{AnnealObserver, TracingObserver};
use super::types::{metropolis, AcceptancePolicy, NeighborGenerator, Objective, Scored};
use crate::error::AnnealError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info_span};

/// Result of an annealing run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnnealResult<S> {
    /// The best state visited.
    pub best: S,

    /// Cost of the best state.
    pub best_cost: f64,

    /// Completed temperature levels (outer iterations).
    pub levels: usize,

    /// Total transitions attempted.
    pub transitions: usize,

    /// Transitions that moved to the candidate.
    pub accepted_moves: usize,

    /// Temperature when the run stopped.
    pub final_temperature: f64,

    /// Sample count the next level would have used.
    pub final_samples: f64,

    /// Whether cancelled externally.
    pub cancelled: bool,

    /// Best cost after each completed level.
    pub cost_history: Vec<f64>,

    /// Seed of the run's random source. Replays the run when set in the config.
    pub seed: u64,
}

/// Simulated annealer over states of type `S`.
///
/// Holds the schedule parameters and the collaborators; the evolving search
/// state lives in an [`AnnealRun`], created fresh for every run.
///
/// # Examples
///
/// ```
/// use rand::{Rng, RngCore};
/// use u_anneal::anneal::{AnnealConfig, Annealer};
///
/// let config = AnnealConfig::default()
///     .with_alpha(0.9)
///     .with_epsilon(0.01)
///     .with_initial_samples(50.0)
///     .with_seed(42);
///
/// let annealer = Annealer::new(
///     |x: &f64| (x - 3.0) * (x - 3.0),
///     |x: &f64, _n: usize, rng: &mut dyn RngCore| x + rng.random_range(-0.5..0.5),
///     config,
/// )
/// .unwrap()
/// .with_observer(());
///
/// let result = annealer.run(-10.0);
/// assert!(result.best_cost < 0.5);
/// ```
pub struct Annealer<'a, S> {
    config: AnnealConfig,
    objective: Box<dyn Objective<S> + 'a>,
    neighbor: Box<dyn NeighborGenerator<S> + 'a>,
    beta: Box<dyn SampleSchedule + 'a>,
    pchange: Option<Box<dyn AcceptancePolicy<S> + 'a>>,
    observer: Box<dyn AnnealObserver + 'a>,
}

impl<'a, S: Clone> Annealer<'a, S> {
    /// Creates an annealer after validating `config`.
    ///
    /// The sample schedule starts as `config.sample_growth`, acceptance as
    /// the Metropolis rule and reporting as [`TracingObserver`].
    pub fn new<F, N>(objective: F, neighbor: N, config: AnnealConfig) -> Result<Self, AnnealError>
    where
        F: Objective<S> + 'a,
        N: NeighborGenerator<S> + 'a,
    {
        config.validate()?;
        Ok(Self {
            beta: Box::new(config.sample_growth),
            config,
            objective: Box::new(objective),
            neighbor: Box::new(neighbor),
            pchange: None,
            observer: Box::new(TracingObserver),
        })
    }

    /// Replaces the sample-count schedule.
    pub fn with_beta<B: SampleSchedule + 'a>(mut self, beta: B) -> Self {
        self.beta = Box::new(beta);
        self
    }

    /// Replaces the Metropolis rule with a custom acceptance policy.
    pub fn with_acceptance<P: AcceptancePolicy<S> + 'a>(mut self, policy: P) -> Self {
        self.pchange = Some(Box::new(policy));
        self
    }

    /// Replaces the progress observer.
    pub fn with_observer<O: AnnealObserver + 'a>(mut self, observer: O) -> Self {
        self.observer = Box::new(observer);
        self
    }

    /// Configuration this annealer runs with.
    pub fn config(&self) -> &AnnealConfig {
        &self.config
    }

    /// Probability of moving from `current` to `candidate` at `temperature`.
    ///
    /// Uses the custom policy when one is set (ignoring `temperature`),
    /// otherwise scores both states and applies [`metropolis`].
    pub fn accept_probability(&self, current: &S, candidate: &S, temperature: f64) -> f64 {
        match &self.pchange {
            Some(policy) => policy.probability(current, candidate),
            None => metropolis(
                self.objective.cost(current),
                self.objective.cost(candidate),
                temperature,
            ),
        }
    }

    fn acceptance(&self, current: &Scored<S>, candidate: &Scored<S>, temperature: f64) -> f64 {
        match &self.pchange {
            Some(policy) => policy.probability(&current.state, &candidate.state),
            None => metropolis(current.cost, candidate.cost, temperature),
        }
    }

    /// Creates the run-scoped search state for manual stepping.
    ///
    /// [`run`](Self::run) is a loop over this; use it directly to interleave
    /// your own logic between levels.
    pub fn start(&self) -> AnnealRun<'_, 'a, S> {
        let seed = self.config.seed.unwrap_or_else(rand::random);
        AnnealRun {
            annealer: self,
            rng: StdRng::seed_from_u64(seed),
            seed,
            temperature: INITIAL_TEMPERATURE,
            samples: self.config.initial_samples,
            best: None,
            levels: 0,
            transitions: 0,
            accepted_moves: 0,
            cost_history: Vec::new(),
            cancel: None,
            cancelled: false,
        }
    }

    /// Anneals from `initial` until the temperature reaches `epsilon`.
    pub fn run(&self, initial: S) -> AnnealResult<S> {
        self.run_with_cancel(initial, None)
    }

    /// Runs with an optional cancellation token.
    ///
    /// The token is polled before every level and every transition. A
    /// cancelled run returns the best state seen so far.
    pub fn run_with_cancel(&self, initial: S, cancel: Option<Arc<AtomicBool>>) -> AnnealResult<S> {
        let span = info_span!(
            "anneal",
            alpha = self.config.alpha,
            epsilon = self.config.epsilon,
            n_changes = self.config.n_changes
        );
        let _guard = span.enter();

        let mut run = self.start();
        if let Some(flag) = cancel {
            run = run.with_cancel(flag);
        }
        debug!(seed = run.seed(), "starting run");

        let mut current = initial;
        while !run.is_converged() {
            if run.poll_cancel() {
                break;
            }
            current = run.run_level(current);
            if run.is_cancelled() {
                break;
            }
            run.cool();
        }

        run.finish(current)
    }
}

/// Search state of a single annealing run.
///
/// Owns the temperature, the sample count, the best state and the random
/// source. States themselves are passed in and returned by value.
pub struct AnnealRun<'r, 'a, S> {
    annealer: &'r Annealer<'a, S>,
    rng: StdRng,
    seed: u64,
    temperature: f64,
    samples: f64,
    best: Option<Scored<S>>,
    levels: usize,
    transitions: usize,
    accepted_moves: usize,
    cost_history: Vec<f64>,
    cancel: Option<Arc<AtomicBool>>,
    cancelled: bool,
}

impl<S: Clone> AnnealRun<'_, '_, S> {
    /// Attaches a cancellation token.
    pub fn with_cancel(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Seed of this run's random source.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Current temperature.
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Current sample count `m`, before truncation.
    pub fn samples(&self) -> f64 {
        self.samples
    }

    /// Completed temperature levels.
    pub fn levels(&self) -> usize {
        self.levels
    }

    /// Transitions attempted so far.
    pub fn transitions(&self) -> usize {
        self.transitions
    }

    /// Transitions that moved to the candidate.
    pub fn accepted_moves(&self) -> usize {
        self.accepted_moves
    }

    /// Best state visited so far.
    pub fn best(&self) -> Option<&S> {
        self.best.as_ref().map(|b| &b.state)
    }

    /// Latest score of the best state.
    pub fn best_cost(&self) -> Option<f64> {
        self.best.as_ref().map(|b| b.cost)
    }

    /// `true` once the temperature is at or below `epsilon`.
    ///
    /// A NaN temperature also counts as converged.
    pub fn is_converged(&self) -> bool {
        let temperature = self.temperature;
        temperature <= self.annealer.config.epsilon || temperature.is_nan()
    }

    /// Whether a cancellation token stopped the run.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    fn poll_cancel(&mut self) -> bool {
        if let Some(flag) = &self.cancel {
            if flag.load(Ordering::Relaxed) {
                self.cancelled = true;
            }
        }
        self.cancelled
    }

    /// Acceptance probability at the current temperature.
    pub fn accept_probability(&self, current: &S, candidate: &S) -> f64 {
        self.annealer
            .accept_probability(current, candidate, self.temperature)
    }

    fn score(&self, state: S) -> Scored<S> {
        let cost = self.annealer.objective.cost(&state);
        Scored { state, cost }
    }

    /// Scores `scored` again unless the objective is declared pure.
    fn refresh(&self, scored: Scored<S>) -> Scored<S> {
        if self.annealer.config.pure_objective {
            scored
        } else {
            self.score(scored.state)
        }
    }

    /// One stochastic transition from `current`.
    ///
    /// Generates a single candidate, draws a single uniform cutoff in
    /// `[0, 1)` and returns the candidate if `cutoff <= p`, else `current`.
    /// Does not touch the best state.
    pub fn step(&mut self, current: S) -> S {
        let current = self.score(current);
        self.transition(current).state
    }

    fn transition(&mut self, current: Scored<S>) -> Scored<S> {
        let annealer = self.annealer;
        // The Metropolis rule compares against a fresh score of `current`.
        let current = if annealer.pchange.is_none() {
            self.refresh(current)
        } else {
            current
        };

        let moves = &annealer.neighbor;
        let n_changes = annealer.config.n_changes;
        let state = moves.neighbor(&current.state, n_changes, &mut self.rng);
        let candidate = self.score(state);

        let cutoff: f64 = self.rng.random();
        let pmove = annealer.acceptance(&current, &candidate, self.temperature);
        self.transitions += 1;

        if cutoff <= pmove {
            self.accepted_moves += 1;
            candidate
        } else {
            current
        }
    }

    fn track_best(&mut self, visited: &mut Scored<S>) {
        let annealer = self.annealer;
        let pure = annealer.config.pure_objective;
        if !pure {
            visited.cost = annealer.objective.cost(&visited.state);
        }

        let adopt = match &mut self.best {
            None => true,
            Some(best) => {
                if !pure {
                    best.cost = annealer.objective.cost(&best.state);
                }
                // Ties go to the most recently visited state.
                visited.cost <= best.cost
            }
        };
        if adopt {
            self.best = Some(visited.clone());
        }
    }

    /// Runs `floor(m)` transitions at the current temperature.
    ///
    /// Each transition starts from the previous one's output. The best state
    /// is updated after every transition. Returns the final state of the
    /// trajectory.
    pub fn run_level(&mut self, current: S) -> S {
        let annealer = self.annealer;
        let observer = &annealer.observer;
        let samples = self.samples.max(0.0) as usize;
        let (level, temperature) = (self.levels, self.temperature);
        observer.on_level_start(level, samples, temperature);
        if samples == 0 {
            return current;
        }

        let mut current = self.score(current);
        for step in 0..samples {
            if self.poll_cancel() {
                break;
            }
            current = self.transition(current);
            self.track_best(&mut current);
            if annealer.config.verbose {
                let best_cost = self.best_cost().unwrap_or(current.cost);
                observer.on_step(step, samples, best_cost);
            }
        }

        current.state
    }

    /// Advances the schedule: `m = beta(m)`, then `T = alpha * T`.
    pub fn cool(&mut self) {
        let annealer = self.annealer;
        self.samples = annealer.beta.next(self.samples);
        self.temperature *= annealer.config.alpha;

        let best_cost = self.best_cost();
        if let Some(cost) = best_cost {
            self.cost_history.push(cost);
        }
        let (level, temperature) = (self.levels, self.temperature);
        annealer.observer.on_level_end(level, temperature, best_cost);
        self.levels += 1;
    }

    /// Ends the run.
    ///
    /// If no transition ever ran, `current` is reported as the best state.
    pub fn finish(mut self, current: S) -> AnnealResult<S> {
        let best = match self.best.take() {
            Some(best) => best,
            None => self.score(current),
        };
        let observer = &self.annealer.observer;
        observer.on_finish(self.levels, best.cost, self.cancelled);

        AnnealResult {
            best: best.state,
            best_cost: best.cost,
            levels: self.levels,
            transitions: self.transitions,
            accepted_moves: self.accepted_moves,
            final_temperature: self.temperature,
            final_samples: self.samples,
            cancelled: self.cancelled,
            cost_history: self.cost_history,
            seed: self.seed,
        }
    }
}
