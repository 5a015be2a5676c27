//! Intensity to colour mapping for heatmap pixels.

/// Hue of the heatmap ramp in degrees (blue).
pub const HEATMAP_HUE: f64 = 215.0;

/// Convert HSV to 8-bit RGB.
///
/// # Arguments
/// * `h` - Hue in degrees (wrapped into [0, 360))
/// * `s` - Saturation in [0, 1]
/// * `v` - Value in [0, 1]
///
/// # Returns
/// RGB tuple as (u8, u8, u8), each channel rounded to nearest
pub fn hsv_to_rgb(h: f64, s: f64, v: f64) -> (u8, u8, u8) {
    let h = h.rem_euclid(360.0);
    let c = v * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = v - c;

    let (r, g, b) = if h < 60.0 {
        (c, x, 0.0)
    } else if h < 120.0 {
        (x, c, 0.0)
    } else if h < 180.0 {
        (0.0, c, x)
    } else if h < 240.0 {
        (0.0, x, c)
    } else if h < 300.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };

    (to_channel(r + m), to_channel(g + m), to_channel(b + m))
}

#[inline]
fn to_channel(value: f64) -> u8 {
    (value * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Saturating tone curve mapping `[0, ∞)` onto `[0, 1)`.
#[inline]
pub fn tone_map(t: f64) -> f64 {
    t / (t + 1.0)
}

/// RGBA for a tone-mapped intensity `t` in `[0, 1)`.
///
/// Alpha follows `√t` so sparse areas stay visible; saturation drops as
/// `1 - t²`, washing dense areas towards white.
pub fn density_color(t: f64) -> [u8; 4] {
    let alpha = to_channel(t.sqrt());
    let (r, g, b) = hsv_to_rgb(HEATMAP_HUE, 1.0 - t * t, 1.0);
    [r, g, b, alpha]
}
