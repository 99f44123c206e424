/// Linear 0-100 scale against `max`, with `max` floored at 1.
pub fn normalize(value: f64, max: f64) -> f64 {
    if !value.is_finite() || !max.is_finite() {
        return 0.0;
    }
    let denominator = max.max(1.0);
    normalize_percent((100.0 * value / denominator).round())
}

pub fn normalize_percent(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 100.0)
}

pub fn column_max<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(0.0, f64::max)
}
