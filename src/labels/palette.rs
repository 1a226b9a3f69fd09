//! Default per-class palette.

use super::Rgb;
use crate::util::math::hsv_to_rgb;

/// Saturation of palette colors.
pub const PALETTE_SATURATION: f32 = 0.8;
/// Value (brightness) of palette colors.
pub const PALETTE_VALUE: f32 = 0.9;

/// Returns the palette color for `class_index` out of `num_classes`.
///
/// Hues are spaced evenly around the color wheel.
pub fn palette_color(class_index: usize, num_classes: usize) -> Rgb {
    let hue = class_index as f32 / num_classes.max(1) as f32 * 360.0;
    Rgb(hsv_to_rgb(hue, PALETTE_SATURATION, PALETTE_VALUE))
}
