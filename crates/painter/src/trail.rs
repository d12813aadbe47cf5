use foundation::math::Vec2;

/// Points along `from → to` so consecutive marks are at most `step` apart.
///
/// Returns `max(1, ceil(d / step))` points at fractions `k / n`, `k = 1..=n`;
/// `from` itself is excluded and `to` is always last. A non-positive or
/// non-finite step yields just `to`.
pub fn resample(from: Vec2, to: Vec2, step: f64) -> Vec<Vec2> {
    let d = from.distance(to);
    if !(step.is_finite() && step > 0.0) || !d.is_finite() {
        return vec![to];
    }
    let n = ((d / step).ceil() as usize).max(1);
    (1..=n)
        .map(|k| from.lerp(to, k as f64 / n as f64))
        .collect()
}
