//! Error types.

/// Error returned when an [`Annealer`](crate::anneal::Annealer) cannot be built.
///
/// Collaborator failures are not represented here: an objective or neighbor
/// generator that panics unwinds through [`Annealer::run`](crate::anneal::Annealer::run)
/// unchanged.
#[derive(Clone, Debug, thiserror::Error, PartialEq)]
pub enum AnnealError {
    /// A configuration value is outside its valid range.
    #[error("invalid parameter `{name}` = {value}: {reason}")]
    InvalidParameter {
        /// Name of the offending configuration field.
        name: &'static str,
        /// The rejected value.
        value: f64,
        /// Which bound was violated.
        reason: &'static str,
    },
}

impl AnnealError {
    pub(crate) fn invalid(name: &'static str, value: f64, reason: &'static str) -> Self {
        AnnealError::InvalidParameter {
            name,
            value,
            reason,
        }
    }
}
