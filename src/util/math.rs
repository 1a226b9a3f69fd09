//! Small numeric helpers shared by the decoder and the label table.

/// Returns the index and value of the largest element.
///
/// Ties keep the lowest index and NaN entries never win against an earlier
/// finite value. Returns `None` for an empty slice.
pub(crate) fn argmax(values: &[f32]) -> Option<(usize, f32)> {
    let (&first, rest) = values.split_first()?;
    let mut best_idx = 0usize;
    let mut best = first;
    for (offset, &value) in rest.iter().enumerate() {
        if value > best || (best.is_nan() && !value.is_nan()) {
            best = value;
            best_idx = offset + 1;
        }
    }
    Some((best_idx, best))
}

/// Converts HSV (hue in degrees, saturation and value in `[0, 1]`) to 8-bit RGB.
pub(crate) fn hsv_to_rgb(hue_deg: f32, saturation: f32, value: f32) -> [u8; 3] {
    let h = hue_deg.rem_euclid(360.0);
    let c = value * saturation;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = value - c;

    let (r, g, b) = match (h / 60.0) as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    let to_u8 = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    [to_u8(r), to_u8(g), to_u8(b)]
}
