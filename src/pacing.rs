//! Frame pacing
//!
//! Converts animation parameters and, for telemetry driven speed types, the
//! latest vehicle reading into the delay between two frames. A faster
//! vehicle means a shorter delay.

use core::fmt::Debug;

use embassy_time::Duration;
use log::warn;

use crate::parameters::{AnimationParameters, SpeedType};
use crate::telemetry::Telemetry;

/// Base of the delay formula: `delay_ms = BASE_FRAME_DELAY_MS - scaled_speed`
pub const BASE_FRAME_DELAY_MS: u64 = 256;

/// Vehicle speed (km/h) mapped to the fastest animation
pub const MAX_VEHICLE_SPEED: u32 = 140;

/// Engine RPM mapped to the fastest animation
pub const MAX_ENGINE_RPM: u32 = 6000;

/// Order of operations when mapping a reading onto the 0-255 speed scale
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SpeedScaling {
    /// `reading * 255 / full_scale`, proportional pacing
    #[default]
    MultiplyFirst,
    /// `reading / full_scale * 255` in integer arithmetic, truncated to a byte
    ///
    /// Matches the legacy device firmware: any reading below full scale
    /// paces as zero and readings past full scale wrap around.
    DivideFirst,
}

impl SpeedScaling {
    /// Map `reading` onto `0..=255` relative to `full_scale`
    ///
    /// [`MultiplyFirst`](Self::MultiplyFirst) saturates above full scale,
    /// [`DivideFirst`](Self::DivideFirst) keeps the low byte.
    pub fn scale(self, reading: u32, full_scale: u32) -> u8 {
        let full_scale = u64::from(full_scale.max(1));
        let reading = u64::from(reading);
        match self {
            Self::MultiplyFirst => u8::try_from(reading * 255 / full_scale).unwrap_or(u8::MAX),
            #[allow(clippy::cast_possible_truncation)]
            Self::DivideFirst => (reading / full_scale * 255) as u8,
        }
    }
}

/// Delay before the next frame for a scaled speed
#[allow(clippy::cast_lossless)]
pub const fn delay_for(scaled_speed: u8) -> Duration {
    Duration::from_millis(BASE_FRAME_DELAY_MS - scaled_speed as u64)
}

/// Computes inter-frame delays
#[derive(Debug, Clone, Copy, Default)]
pub struct FramePacer {
    scaling: SpeedScaling,
}

impl FramePacer {
    pub const fn new(scaling: SpeedScaling) -> Self {
        Self { scaling }
    }

    pub const fn scaling(&self) -> SpeedScaling {
        self.scaling
    }

    /// Speed on the 0-255 scale for the given parameters.
    ///
    /// Suspends only while reading telemetry. Failed reads count as zero.
    pub async fn scaled_speed<T: Telemetry>(
        &self,
        parameters: &AnimationParameters,
        telemetry: &T,
    ) -> u8 {
        match parameters.speed_type {
            SpeedType::UserDefined => parameters.user_defined_speed,
            SpeedType::VehicleSpeed => {
                let speed = or_zero(telemetry.vehicle_speed().await, "vehicle speed");
                self.scaling.scale(speed, MAX_VEHICLE_SPEED)
            }
            SpeedType::EngineRpm => {
                let rpm = or_zero(telemetry.engine_rpm().await, "engine rpm");
                self.scaling.scale(rpm, MAX_ENGINE_RPM)
            }
        }
    }

    /// Delay before the next frame.
    pub async fn frame_delay<T: Telemetry>(
        &self,
        parameters: &AnimationParameters,
        telemetry: &T,
    ) -> Duration {
        delay_for(self.scaled_speed(parameters, telemetry).await)
    }
}

fn or_zero<E: Debug>(reading: Result<u32, E>, what: &str) -> u32 {
    reading.unwrap_or_else(|err| {
        warn!("pacing: failed to read {what}, using 0: {err:?}");
        0
    })
}
