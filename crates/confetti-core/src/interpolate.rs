//! Clamped piecewise-linear interpolation.

/// Linear blend between `a` and `b`.
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Map `value` through the piecewise-linear curve defined by `input` (ascending)
/// and `output` keyframes, clamping to the first/last output outside the input
/// range.
///
/// Keyframe slices of different lengths are truncated to the shorter one. An
/// empty curve yields `0.0`; a zero-width segment yields its left output.
pub fn interpolate(value: f32, input: &[f32], output: &[f32]) -> f32 {
    let len = input.len().min(output.len());
    if len == 0 {
        return 0.0;
    }
    if len == 1 || value.is_nan() || value <= input[0] {
        return output[0];
    }
    if value >= input[len - 1] {
        return output[len - 1];
    }

    // First segment whose right edge reaches the value.
    let seg = (1..len).find(|&i| value <= input[i]).unwrap_or(len - 1);
    let (x0, x1) = (input[seg - 1], input[seg]);
    let (y0, y1) = (output[seg - 1], output[seg]);
    let span = x1 - x0;
    if span <= f32::EPSILON {
        return y0;
    }
    lerp(y0, y1, (value - x0) / span)
}
