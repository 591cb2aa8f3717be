use chrono::{TimeZone, Utc};

/// `YYYY-MM` (UTC) of an epoch-millisecond timestamp.
pub fn month_key(epoch_ms: i64) -> String {
    Utc.timestamp_millis_opt(epoch_ms)
        .single()
        .map(|dt| dt.format("%Y-%m").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// `part / whole`, 0 when `whole` is not positive, clamped to [0, 1].
pub fn share(part: i64, whole: i64) -> f64 {
    if whole <= 0 {
        return 0.0;
    }
    (part.max(0) as f64 / whole as f64).min(1.0)
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Population variance.
pub fn variance(values: &[f64]) -> Option<f64> {
    let avg = mean(values)?;
    Some(values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / values.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_key_uses_utc() {
        // 2025-03-31T23:30:00Z
        assert_eq!(month_key(1_743_463_800_000), "2025-03");
        assert_eq!(month_key(1_735_689_600_000), "2025-01");
    }

    #[test]
    fn share_is_bounded() {
        assert_eq!(share(5, 0), 0.0);
        assert_eq!(share(5, 10), 0.5);
        assert_eq!(share(12, 10), 1.0);
        assert_eq!(share(-3, 10), 0.0);
    }

    #[test]
    fn variance_is_population_variance() {
        assert_eq!(variance(&[1.0, 3.0]), Some(1.0));
        assert_eq!(variance(&[]), None);
        assert_eq!(round_to(2.345_67, 2), 2.35);
    }
}
