//! Percentile estimation shared by per-image and periodic statistics.
//!
//! Both paths use linear interpolation between the closest ranks, so a
//! channel's 50th percentile and a summary's `gcc_50` are the same estimator.

use num_traits::Float;

/// Interpolate between `a` and `b`, evaluated from the nearer endpoint.
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    let diff = b - a;
    if t >= 0.5 {
        b - diff * (1.0 - t)
    } else {
        a + diff * t
    }
}

/// Quantile `q` in `[0, 1]` of an ascending, NaN-free slice.
///
/// Returns NaN for an empty slice.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return f64::NAN;
    }
    let rank = q.clamp(0.0, 1.0) * (n - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = (lo + 1).min(n - 1);
    lerp(sorted[lo], sorted[hi], rank - lo as f64)
}

/// Percentile `pct` in `[0, 100]` of an ascending, NaN-free slice.
pub fn percentile_sorted(sorted: &[f64], pct: f64) -> f64 {
    quantile_sorted(sorted, pct / 100.0)
}

/// Finite values of `values` as an ascending `Vec<f64>`.
pub fn sorted_finite<T: Float>(values: &[T]) -> Vec<f64> {
    let mut out: Vec<f64> = values
        .iter()
        .filter_map(|v| v.to_f64())
        .filter(|v| !v.is_nan())
        .collect();
    out.sort_unstable_by(f64::total_cmp);
    out
}

/// Quantile `q` of `values`, ignoring NaN.
pub fn quantile<T: Float>(values: &[T], q: f64) -> f64 {
    quantile_sorted(&sorted_finite(values), q)
}

/// Mean ignoring NaN. NaN when no finite values remain.
pub fn nanmean<T: Float>(values: &[T]) -> f64 {
    let (sum, count) = values
        .iter()
        .filter_map(|v| v.to_f64())
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}

/// Population standard deviation ignoring NaN.
pub fn nanstd<T: Float>(values: &[T]) -> f64 {
    let mean = nanmean(values);
    if mean.is_nan() {
        return f64::NAN;
    }
    let (sum_sq, count) = values
        .iter()
        .filter_map(|v| v.to_f64())
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(s, c), v| (s + (v - mean) * (v - mean), c + 1));
    (sum_sq / count as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_is_exact_at_endpoints() {
        assert_eq!(lerp(1.0, 3.0, 0.0), 1.0);
        assert_eq!(lerp(1.0, 3.0, 1.0), 3.0);
        assert_eq!(lerp(1.0, 3.0, 0.5), 2.0);
    }
}
