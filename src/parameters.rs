//! Animation parameters
//!
//! [`AnimationRequest`] is the wire shape received from the control surface.
//! It is validated once into [`AnimationParameters`], which stays immutable
//! for the lifetime of a render loop.

use serde::{Deserialize, Serialize};

use crate::animation::Animation;
use crate::color::{BLACK, Rgb};
use crate::error::ValidationError;

const SPEED_TYPE_ID_USER_DEFINED: u8 = 0;
const SPEED_TYPE_ID_VEHICLE_SPEED: u8 = 1;
const SPEED_TYPE_ID_ENGINE_RPM: u8 = 2;

/// Source of the frame pacing
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum SpeedType {
    /// Fixed speed from [`AnimationParameters::user_defined_speed`]
    #[default]
    UserDefined = SPEED_TYPE_ID_USER_DEFINED,
    /// Paced by the current vehicle speed
    VehicleSpeed = SPEED_TYPE_ID_VEHICLE_SPEED,
    /// Paced by the current engine RPM
    EngineRpm = SPEED_TYPE_ID_ENGINE_RPM,
}

impl SpeedType {
    pub fn from_raw(value: u8) -> Option<Self> {
        Some(match value {
            SPEED_TYPE_ID_USER_DEFINED => Self::UserDefined,
            SPEED_TYPE_ID_VEHICLE_SPEED => Self::VehicleSpeed,
            SPEED_TYPE_ID_ENGINE_RPM => Self::EngineRpm,
            _ => return None,
        })
    }

    /// Whether pacing needs live telemetry
    pub const fn uses_telemetry(self) -> bool {
        matches!(self, Self::VehicleSpeed | Self::EngineRpm)
    }
}

/// Validated description of one animation run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnimationParameters {
    pub animation: Animation,
    /// Base color of the pulse and wave animations
    pub custom_color: Rgb,
    pub speed_type: SpeedType,
    pub user_defined_speed: u8,
    /// Global brightness, applied by the output driver
    pub brightness: u8,
}

impl AnimationParameters {
    /// Strip switched off, reported before any animation was started
    pub const OFF: Self = Self {
        animation: Animation::Off,
        custom_color: BLACK,
        speed_type: SpeedType::UserDefined,
        user_defined_speed: 0,
        brightness: 0,
    };
}

/// Color as sent over the wire
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Start request as received from the control surface
///
/// Enum fields carry raw ids; use `AnimationParameters::try_from` to validate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationRequest {
    pub animation: u8,
    #[serde(default)]
    pub custom_color: WireColor,
    pub speed_type: u8,
    #[serde(default)]
    pub user_defined_speed: i32,
    #[serde(default)]
    pub brightness: u8,
}

impl TryFrom<AnimationRequest> for AnimationParameters {
    type Error = ValidationError;

    fn try_from(request: AnimationRequest) -> Result<Self, Self::Error> {
        let animation = Animation::from_raw(request.animation)
            .ok_or(ValidationError::UnknownAnimation(request.animation))?;
        let speed_type = SpeedType::from_raw(request.speed_type)
            .ok_or(ValidationError::UnknownSpeedType(request.speed_type))?;
        let user_defined_speed = u8::try_from(request.user_defined_speed)
            .map_err(|_| ValidationError::SpeedOutOfRange(request.user_defined_speed))?;

        Ok(Self {
            animation,
            custom_color: Rgb::new(
                request.custom_color.r,
                request.custom_color.g,
                request.custom_color.b,
            ),
            speed_type,
            user_defined_speed,
            brightness: request.brightness,
        })
    }
}

impl From<AnimationParameters> for AnimationRequest {
    fn from(parameters: AnimationParameters) -> Self {
        Self {
            animation: parameters.animation as u8,
            custom_color: WireColor {
                r: parameters.custom_color.r,
                g: parameters.custom_color.g,
                b: parameters.custom_color.b,
            },
            speed_type: parameters.speed_type as u8,
            user_defined_speed: i32::from(parameters.user_defined_speed),
            brightness: parameters.brightness,
        }
    }
}
