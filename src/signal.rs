use std::collections::HashSet;

/// `n / d`, or 0 when the denominator is not positive.
pub fn ratio(n: f32, d: f32) -> f32 {
    if d <= 0.0 {
        return 0.0;
    }
    n / d
}

/// Linear rescale of `value` from `[min, max]` to `[0, 1]`, clamped.
/// Returns 0 when `max <= min`. Detector thresholds live in the `min`/`max`
/// arguments at call sites, not here.
pub fn bounded_scale(value: f32, min: f32, max: f32) -> f32 {
    if max <= min {
        return 0.0;
    }
    ((value - min) / (max - min)).clamp(0.0, 1.0)
}

pub fn average(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f32>() / values.len() as f32
}

/// Population standard deviation; fewer than 2 samples yields 0.
pub fn stddev(values: &[f32]) -> f32 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean = average(values);
    let variance = values
        .iter()
        .map(|value| (value - mean) * (value - mean))
        .sum::<f32>()
        / values.len() as f32;
    variance.sqrt()
}

/// Jaccard index over two token sets; an empty union yields 0.
pub fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f32 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    intersection as f32 / union as f32
}
