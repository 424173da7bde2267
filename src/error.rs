//! Error types surfaced by the engine.

use thiserror::Error;

/// Malformed animation parameters, rejected before any run starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("unknown animation id {0}")]
    UnknownAnimation(u8),
    #[error("unknown speed type id {0}")]
    UnknownSpeedType(u8),
    #[error("user defined speed {0} is outside 0..=255")]
    SpeedOutOfRange(i32),
}

/// Failures of the animation start/stop protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LifecycleError {
    /// The previous run did not finish within the configured stop timeout.
    #[error("previous animation did not stop in time")]
    StartFailed,
}

/// A telemetry reading could not be produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TelemetryError {
    /// No reading has been recorded yet or the last poll failed.
    #[error("telemetry reading unavailable")]
    Unavailable,
}
