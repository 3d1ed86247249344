//! Generalized simulated annealing.
//!
//! Searches a candidate-solution space for a state minimizing a
//! user-supplied objective. The caller provides:
//!
//! - an **objective** scoring states (lower is better),
//! - a **neighbor generator** perturbing a state by a configured intensity,
//! - optionally a **sample schedule** growing the per-temperature sample
//!   count, a custom **acceptance policy** replacing the Metropolis rule,
//!   and a progress **observer**.
//!
//! Temperature always starts at 100 and decays geometrically until it
//! reaches the configured floor. The best state visited over the whole
//! trajectory is returned.
//!
//! ```
//! use rand::{Rng, RngCore};
//! use u_anneal::anneal::{AnnealConfig, Annealer};
//!
//! let annealer = Annealer::new(
//!     |x: &i64| ((x - 17) * (x - 17)) as f64,
//!     |x: &i64, n: usize, rng: &mut dyn RngCore| x + rng.random_range(-(n as i64)..=n as i64),
//!     AnnealConfig::default().with_n_changes(2).with_initial_samples(30.0).with_seed(1),
//! )?;
//!
//! let result = annealer.run(0);
//! assert_eq!(result.best, 17);
//! # Ok::<(), u_anneal::AnnealError>(())
//! ```
//!
//! # Non-goals
//!
//! No guarantee of global optimality, no multi-start search and no
//! parallel runs: each run is one sequential trajectory.

pub mod anneal;
pub mod error;

pub use error::AnnealError;
