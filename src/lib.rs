#![no_std]

pub mod animation;
pub mod cancel;
pub mod color;
pub mod error;
pub mod lifecycle;
pub mod pacing;
pub mod parameters;
pub mod renderer;
pub mod telemetry;

use core::fmt::Debug;

pub use animation::{Animation, WHEEL_STEPS};
pub use cancel::CancellationToken;
pub use error::{LifecycleError, TelemetryError, ValidationError};
pub use lifecycle::{AnimationManager, DEFAULT_GRACE_PERIOD, EngineConfig};
pub use pacing::{FramePacer, SpeedScaling};
pub use parameters::{AnimationParameters, AnimationRequest, SpeedType, WireColor};
pub use renderer::{Renderer, RunOutcome};
pub use telemetry::{SharedTelemetry, Subscription, Telemetry, TelemetryCache};

pub use color::Rgb;
pub use embassy_time::Duration;

/// Number of LEDs on the strip the device ships with
pub const DEFAULT_LED_COUNT: usize = 108;

/// Abstract LED driver trait
///
/// Implement this trait to support different hardware platforms.
/// The engine is generic over this trait and never writes to two drivers
/// at once.
pub trait OutputDriver {
    type Error: Debug;

    /// Prepare the strip for a run of `led_count` LEDs at `brightness`
    fn configure(&mut self, led_count: usize, brightness: u8) -> Result<(), Self::Error>;

    /// Write one complete frame to the LED strip
    fn write(&mut self, colors: &[Rgb]) -> Result<(), Self::Error>;

    /// Switch every LED off
    fn reset(&mut self) -> Result<(), Self::Error>;

    /// Give up the hardware until the next `configure`
    fn release(&mut self) {}
}
