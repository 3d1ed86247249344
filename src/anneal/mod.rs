//! Generalized Simulated Annealing.
//!
//! A single-trajectory metaheuristic. An outer loop cools the temperature
//! geometrically from a fixed start of 100 down to a floor; at each level an
//! inner loop attempts a schedule-determined number of stochastic moves.
//! Worsening moves are accepted with a probability that shrinks as the
//! temperature drops, which lets the search escape local optima early and
//! settle late.
//!
//! The objective, neighbor generator, sample schedule, acceptance policy and
//! progress observer are all pluggable; closures work for each of them.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Metropolis et al. (1953), "Equation of State Calculations by Fast Computing Machines"

mod config;
mod observer;
mod runner;
mod types;

pub use config::{expected_levels, INITIAL_TEMPERATURE};
pub use config::{AnnealConfig, SampleGrowth, SampleSchedule};
pub use observer::{AnnealObserver, TracingObserver};
pub use runner::{AnnealResult, AnnealRun, Annealer};
pub use types::{metropolis, AcceptancePolicy, NeighborGenerator, Objective};
