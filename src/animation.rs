//! Animation catalogue
//!
//! Every animation is a stateless mapping from a wheel step to a full frame,
//! so the enum itself is all the state a render loop needs.

use crate::color::{
    BLACK, Rgb, color_pulse, color_wave, fire_wheel, forest_wheel, ocean_wheel,
    rainbow_wheel,
};

/// Number of wheel steps in one animation cycle
pub const WHEEL_STEPS: usize = 256;

/// Wheel positions wrap at this value, so position 255 is never produced
/// by the spatial sweep.
const WHEEL_WRAP: usize = 255;

const ANIMATION_NAME_OFF: &str = "off";
const ANIMATION_NAME_RAINBOW: &str = "rainbow";
const ANIMATION_NAME_FIRE: &str = "fire";
const ANIMATION_NAME_OCEAN: &str = "ocean";
const ANIMATION_NAME_FOREST: &str = "forest";
const ANIMATION_NAME_COLOR_PULSE: &str = "color_pulse";
const ANIMATION_NAME_COLOR_WAVE: &str = "color_wave";

const ANIMATION_ID_OFF: u8 = 0;
const ANIMATION_ID_RAINBOW: u8 = 1;
const ANIMATION_ID_FIRE: u8 = 2;
const ANIMATION_ID_OCEAN: u8 = 3;
const ANIMATION_ID_FOREST: u8 = 4;
const ANIMATION_ID_COLOR_PULSE: u8 = 5;
const ANIMATION_ID_COLOR_WAVE: u8 = 6;

/// Known animations that can be requested.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum Animation {
    /// Every LED black, still rendered each frame
    #[default]
    Off = ANIMATION_ID_OFF,
    Rainbow = ANIMATION_ID_RAINBOW,
    Fire = ANIMATION_ID_FIRE,
    Ocean = ANIMATION_ID_OCEAN,
    Forest = ANIMATION_ID_FOREST,
    /// Whole strip breathing in the custom color
    ColorPulse = ANIMATION_ID_COLOR_PULSE,
    /// Custom color brightness wave travelling along the strip
    ColorWave = ANIMATION_ID_COLOR_WAVE,
}

impl Animation {
    pub fn from_raw(value: u8) -> Option<Self> {
        Some(match value {
            ANIMATION_ID_OFF => Self::Off,
            ANIMATION_ID_RAINBOW => Self::Rainbow,
            ANIMATION_ID_FIRE => Self::Fire,
            ANIMATION_ID_OCEAN => Self::Ocean,
            ANIMATION_ID_FOREST => Self::Forest,
            ANIMATION_ID_COLOR_PULSE => Self::ColorPulse,
            ANIMATION_ID_COLOR_WAVE => Self::ColorWave,
            _ => return None,
        })
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Off => ANIMATION_NAME_OFF,
            Self::Rainbow => ANIMATION_NAME_RAINBOW,
            Self::Fire => ANIMATION_NAME_FIRE,
            Self::Ocean => ANIMATION_NAME_OCEAN,
            Self::Forest => ANIMATION_NAME_FOREST,
            Self::ColorPulse => ANIMATION_NAME_COLOR_PULSE,
            Self::ColorWave => ANIMATION_NAME_COLOR_WAVE,
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            ANIMATION_NAME_OFF => Some(Self::Off),
            ANIMATION_NAME_RAINBOW => Some(Self::Rainbow),
            ANIMATION_NAME_FIRE => Some(Self::Fire),
            ANIMATION_NAME_OCEAN => Some(Self::Ocean),
            ANIMATION_NAME_FOREST => Some(Self::Forest),
            ANIMATION_NAME_COLOR_PULSE => Some(Self::ColorPulse),
            ANIMATION_NAME_COLOR_WAVE => Some(Self::ColorWave),
            _ => None,
        }
    }

    /// Color of a single wheel position
    ///
    /// `base` is only used by the custom color animations.
    pub fn wheel_color(self, base: Rgb, position: u8) -> Rgb {
        match self {
            Self::Off => BLACK,
            Self::Rainbow => rainbow_wheel(position),
            Self::Fire => fire_wheel(position),
            Self::Ocean => ocean_wheel(position),
            Self::Forest => forest_wheel(position),
            Self::ColorPulse => color_pulse(base, position),
            Self::ColorWave => color_wave(base, position),
        }
    }

    /// Render the frame for wheel `step` into `leds`
    ///
    /// Color pulse lights the whole strip with one color taken directly
    /// from `step`. All other animations offset the wheel per LED so the
    /// gradient sweeps along the strip.
    pub fn render(self, base: Rgb, step: u8, leds: &mut [Rgb]) {
        match self {
            Self::Off => leds.fill(BLACK),
            Self::ColorPulse => leds.fill(color_pulse(base, step)),
            _ => {
                let count = leds.len();
                for (index, led) in leds.iter_mut().enumerate() {
                    *led = self.wheel_color(base, wheel_position(index, count, step));
                }
            }
        }
    }
}

/// Wheel position of LED `index` on a strip of `count` LEDs at `step`
#[allow(clippy::cast_possible_truncation)]
pub fn wheel_position(index: usize, count: usize, step: u8) -> u8 {
    if count == 0 {
        return 0;
    }
    let offset = index * WHEEL_STEPS / count;
    ((offset + usize::from(step)) % WHEEL_WRAP) as u8
}
