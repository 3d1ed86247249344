//! Progress hooks for annealing runs.

use tracing::{debug, info};

/// Receives progress notifications from a run.
///
/// All hooks default to doing nothing. `()` is the silent observer and
/// [`TracingObserver`] is the one an [`Annealer`](super::Annealer) starts with.
pub trait AnnealObserver {
    /// A temperature level is about to run `samples` transitions.
    fn on_level_start(&self, _level: usize, _samples: usize, _temperature: f64) {}

    /// Transition `step` of `samples` at the current level finished.
    ///
    /// Only called when the configuration is verbose.
    fn on_step(&self, _step: usize, _samples: usize, _best_cost: f64) {}

    /// A level finished; `temperature` is the already-cooled value.
    fn on_level_end(&self, _level: usize, _temperature: f64, _best_cost: Option<f64>) {}

    /// The run stopped after `levels` outer iterations.
    fn on_finish(&self, _levels: usize, _best_cost: f64, _cancelled: bool) {}
}

impl AnnealObserver for () {}

impl<T: AnnealObserver + ?Sized> AnnealObserver for &T {
    fn on_level_start(&self, level: usize, samples: usize, temperature: f64) {
        (**self).on_level_start(level, samples, temperature);
    }

    fn on_step(&self, step: usize, samples: usize, best_cost: f64) {
        (**self).on_step(step, samples, best_cost);
    }

    fn on_level_end(&self, level: usize, temperature: f64, best_cost: Option<f64>) {
        (**self).on_level_end(level, temperature, best_cost);
    }

    fn on_finish(&self, levels: usize, best_cost: f64, cancelled: bool) {
        (**self).on_finish(levels, best_cost, cancelled);
    }
}

/// Reports progress as `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl AnnealObserver for TracingObserver {
    fn on_level_start(&self, level: usize, samples: usize, temperature: f64) {
        info!(
            iteration = level,
            samples,
            temperature,
            "running temperature level"
        );
    }

    fn on_step(&self, step: usize, samples: usize, best_cost: f64) {
        debug!(step = step + 1, samples, best_cost, "transition");
    }

    fn on_level_end(&self, level: usize, temperature: f64, best_cost: Option<f64>) {
        info!(iteration = level, temperature, ?best_cost, "level finished");
    }

    fn on_finish(&self, levels: usize, best_cost: f64, cancelled: bool) {
        info!(levels, best_cost, cancelled, "annealing finished");
    }
}
