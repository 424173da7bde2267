mod wheel;

use smart_leds::RGB8;
pub use wheel::{
    color_pulse, color_wave, fire_wheel, forest_wheel, ocean_wheel, rainbow_wheel,
};

pub type Rgb = RGB8;

/// All channels off
pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

/// Scale every channel of `color` by `factor`, truncating toward zero.
///
/// Factors outside `0.0..=1.0` are clamped so the result stays a valid color.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn scale_color(color: Rgb, factor: f64) -> Rgb {
    let factor = factor.clamp(0.0, 1.0);
    let scale = |channel: u8| (f64::from(channel) * factor) as u8;
    Rgb {
        r: scale(color.r),
        g: scale(color.g),
        b: scale(color.b),
    }
}
