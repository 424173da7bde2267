//! Color wheels
//!
//! Every wheel maps a position on a cyclic 0-255 gradient to a color.
//! All functions are pure and can be called from any task.

use core::f64::consts::PI;

use super::{Rgb, scale_color};

/// Length of one pulse/wave period in wheel positions
const PERIOD: f64 = 255.0;

/// Clamp an intermediate channel value into the `u8` range
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
const fn channel(value: i32) -> u8 {
    if value < 0 {
        0
    } else if value > 255 {
        255
    } else {
        value as u8
    }
}

const fn rgb(r: i32, g: i32, b: i32) -> Rgb {
    Rgb {
        r: channel(r),
        g: channel(g),
        b: channel(b),
    }
}

/// Full hue sweep in three 85 wide bands, normalized so that the
/// strongest channel is always at full intensity.
pub fn rainbow_wheel(position: u8) -> Rgb {
    let mut pos = i32::from(position);
    let (r, g, b) = if pos < 85 {
        (pos * 3, 255 - pos * 3, 0)
    } else if pos < 170 {
        pos -= 85;
        (255 - pos * 3, 0, pos * 3)
    } else {
        pos -= 170;
        (0, pos * 3, 255 - pos * 3)
    };

    let max = r.max(g).max(b);
    if max <= 0 {
        return rgb(r, g, b);
    }

    // Integer rescale keeps the strongest channel at exactly 255
    rgb(r * 255 / max, g * 255 / max, b * 255 / max)
}

/// Red with a green ramp: 0 to 150 over `[0, 170)`, back to 0 over `[170, 255]`.
pub fn fire_wheel(position: u8) -> Rgb {
    let pos = i32::from(position);
    let g = if pos < 170 {
        pos * 150 / 170
    } else {
        150 - (pos - 170) * 150 / 85
    };

    rgb(255, g, 0)
}

/// Greens and blues, band edges at 85 and 170.
pub fn forest_wheel(position: u8) -> Rgb {
    let mut pos = i32::from(position);
    let (g, b) = if pos < 85 {
        (pos * 3, 255)
    } else if pos < 170 {
        pos -= 85;
        (255, 255 - pos * 3)
    } else {
        pos -= 170;
        (255 - pos * 3, pos * 3)
    };

    rgb(0, g, b)
}

/// Deep blue with a green swell, band edges at 64, 128 and 192.
pub fn ocean_wheel(position: u8) -> Rgb {
    let mut pos = i32::from(position);
    let g = if pos < 64 {
        pos * 2
    } else if pos < 128 {
        pos -= 64;
        128 + pos * 2
    } else if pos < 192 {
        pos -= 128;
        255 - pos * 2
    } else {
        pos -= 192;
        128 - pos * 2
    };

    rgb(0, g, 255)
}

/// Breathing effect: full `base` at index 0, near black at 127/128.
pub fn color_pulse(base: Rgb, index: u8) -> Rgb {
    let phase = f64::from(index) / PERIOD * 2.0 * PI;
    scale_color(base, (libm::cos(phase) + 1.0) / 2.0)
}

/// Same envelope as [`color_pulse`], shifted by a quarter period.
pub fn color_wave(base: Rgb, index: u8) -> Rgb {
    let phase = f64::from(index) / PERIOD * 2.0 * PI;
    scale_color(base, (libm::sin(phase) + 1.0) / 2.0)
}
