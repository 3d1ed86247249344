//! Collaborator traits for simulated annealing.
//!
//! The annealer never inspects a state; it only hands states to these
//! capabilities. Each trait is implemented for the matching closure type,
//! so a plain function is usually enough.
//!
//! # Minimization
//!
//! The annealer minimizes the objective. For maximization, negate it.

use rand::RngCore;

/// Scores a state. Lower is better.
///
/// Must be pure over the states reachable by the neighbor generator.
pub trait Objective<S> {
    /// Computes the cost of `state`.
    fn cost(&self, state: &S) -> f64;
}

impl<S, F> Objective<S> for F
where
    F: Fn(&S) -> f64,
{
    fn cost(&self, state: &S) -> f64 {
        self(state)
    }
}

/// Produces a candidate state from the current one.
///
/// `n_changes` is the configured perturbation intensity, passed through
/// unchanged on every call. The input must be treated as immutable: the
/// candidate is a new value.
///
/// # Examples
///
/// ```
/// use rand::{Rng, RngCore};
/// use u_anneal::anneal::NeighborGenerator;
///
/// // Swap `n_changes` random pairs of a permutation.
/// let swaps = |perm: &Vec<usize>, n_changes: usize, rng: &mut dyn RngCore| {
///     let mut next = perm.clone();
///     for _ in 0..n_changes {
///         let i = rng.random_range(0..next.len());
///         let j = rng.random_range(0..next.len());
///         next.swap(i, j);
///     }
///     next
/// };
///
/// let mut rng = rand::rng();
/// let next = swaps.neighbor(&vec![0, 1, 2, 3], 2, &mut rng);
/// assert_eq!(next.len(), 4);
/// ```
pub trait NeighborGenerator<S> {
    /// Generates a neighbor of `state`.
    fn neighbor(&self, state: &S, n_changes: usize, rng: &mut dyn RngCore) -> S;
}

impl<S, F> NeighborGenerator<S> for F
where
    F: Fn(&S, usize, &mut dyn RngCore) -> S,
{
    fn neighbor(&self, state: &S, n_changes: usize, rng: &mut dyn RngCore) -> S {
        self(state, n_changes, rng)
    }
}

/// Custom probability of moving from `current` to `candidate`.
///
/// Replaces the Metropolis rule entirely. The temperature is not passed;
/// a policy that needs it must track it itself.
pub trait AcceptancePolicy<S> {
    /// Returns the transition probability, expected in `[0, 1]`.
    fn probability(&self, current: &S, candidate: &S) -> f64;
}

impl<S, F> AcceptancePolicy<S> for F
where
    F: Fn(&S, &S) -> f64,
{
    fn probability(&self, current: &S, candidate: &S) -> f64 {
        self(current, candidate)
    }
}

/// Metropolis acceptance probability for a minimization objective.
///
/// `min(1, exp((current_cost - candidate_cost) / temperature))`. Improving
/// and equal moves give exactly 1. Worsening moves decay exponentially in
/// the cost gap, more slowly at high temperature. A NaN result is reported
/// as 1.
///
/// ```
/// use u_anneal::anneal::metropolis;
///
/// assert_eq!(metropolis(5.0, 3.0, 10.0), 1.0);
/// assert!((metropolis(3.0, 5.0, 10.0) - (-0.2f64).exp()).abs() < 1e-12);
/// ```
pub fn metropolis(current_cost: f64, candidate_cost: f64, temperature: f64) -> f64 {
    let boltzmann = ((current_cost - candidate_cost) / temperature).exp();
    if boltzmann < 1.0 {
        boltzmann
    } else {
        1.0
    }
}

/// A state paired with its cached objective value.
#[derive(Debug, Clone)]
pub(crate) struct Scored<S> {
    pub(crate) state: S,
    pub(crate) cost: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_metropolis_improving_is_certain() {
        assert_eq!(metropolis(10.0, 2.0, 1.0), 1.0);
        assert_eq!(metropolis(10.0, 10.0, 1.0), 1.0);
    }

    #[test]
    fn test_metropolis_higher_temperature_is_more_tolerant() {
        let cold = metropolis(1.0, 3.0, 1.0);
        let hot = metropolis(1.0, 3.0, 100.0);
        assert!(cold < hot, "cold {cold} should be below hot {hot}");
    }

    #[test]
    fn test_metropolis_nan_is_accepted() {
        assert_eq!(metropolis(f64::NAN, 1.0, 1.0), 1.0);
        assert_eq!(metropolis(f64::INFINITY, f64::INFINITY, 1.0), 1.0);
    }

    #[test]
    fn test_metropolis_huge_gap_underflows_to_zero() {
        assert_eq!(metropolis(0.0, 1e6, 1.0), 0.0);
    }

    #[test]
    fn test_closures_implement_traits() {
        let objective = |x: &i64| (*x as f64).abs();
        assert_eq!(objective.cost(&-4), 4.0);

        let step = |x: &i64, n: usize, _rng: &mut dyn RngCore| x + n as i64;
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(step.neighbor(&3, 2, &mut rng), 5);

        let always = |_: &i64, _: &i64| 0.25;
        assert_eq!(always.probability(&0, &1), 0.25);
    }

    proptest! {
        #[test]
        fn metropolis_is_one_for_non_worsening(
            current in -1e6f64..1e6,
            improvement in 0.0f64..1e6,
            temperature in 1e-3f64..1e3,
        ) {
            prop_assert_eq!(metropolis(current, current - improvement, temperature), 1.0);
        }

        #[test]
        fn metropolis_strictly_decreases_with_gap(
            current in -100.0f64..100.0,
            gap in 1e-3f64..50.0,
            extra in 1e-3f64..50.0,
            temperature in 1.0f64..100.0,
        ) {
            let near = metropolis(current, current + gap, temperature);
            let far = metropolis(current, current + gap + extra, temperature);
            prop_assert!(near > 0.0 && near < 1.0);
            prop_assert!(far > 0.0 && far < 1.0);
            prop_assert!(far < near);
        }
    }
}
