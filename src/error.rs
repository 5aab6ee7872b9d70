use thiserror::Error;

/// Failures surfaced by the simulation core. Setter-level numeric garbage
/// (NaN radii, distances) is normalized to 0 instead of raised; only
/// operations with no safe default end up here.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SimError {
    /// A required argument was missing or non-finite.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// A name lookup missed. Recoverable; callers keep their prior state.
    #[error("no body named {0:?} in the scene")]
    ObjectNotFound(String),

    /// Copy/clone was asked to pull state from an incompatible body kind.
    #[error("copy source kind {found:?} is incompatible with {expected:?}")]
    InvalidSourceType {
        expected: &'static str,
        found: &'static str,
    },

    /// `reset()` was called on a rig that never had an origin set.
    #[error("camera origin has not been set")]
    OriginUndefined,
}
