use snafu::Snafu;

pub use crate::errors::Error::*;

/// Configuration errors raised synchronously by the animation engine.
///
/// Binding failures (a property that cannot be resolved on a target) are never reported here:
/// the engine silently degrades and only logs them.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// Configuration error: animators cannot have negative duration ({duration}ms).
    NegativeDuration { duration: i64 },
    /// Configuration error: animators may only be started with an attached scheduler.
    NoScheduler,
    /// Configuration error: circular dependencies cannot exist in an animator set.
    CircularDependency,
}
