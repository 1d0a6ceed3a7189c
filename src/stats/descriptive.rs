//! Descriptive statistics over 1-D slices
//!
//! Reductions that have no answer for empty input return
//! [`Error::InvalidArgument`]. Spread measures take a `ddof` (delta degrees
//! of freedom): the divisor is `n - ddof`, so `ddof = 0` is the population
//! estimate and `ddof = 1` the unbiased sample estimate.

use super::select::median_in_place;
use crate::buffer::check_len;
use crate::error::{Error, Result};
use crate::kernels::elementwise;

// ============================================================================
// Interpolation Methods
// ============================================================================

/// How [`quantile`] resolves a rank that falls between two order statistics
///
/// For data `[1, 2, 3, 4]` and `q = 0.25` (virtual index 0.75):
/// - `Linear`: `1·0.25 + 2·0.75 = 1.75`
/// - `Lower`: `1`
/// - `Higher`: `2`
/// - `Nearest`: `2`
/// - `Midpoint`: `1.5`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Interpolation {
    /// `lower·(1 - frac) + upper·frac`
    #[default]
    Linear,
    /// Floor order statistic
    Lower,
    /// Ceil order statistic
    Higher,
    /// Order statistic nearest the virtual index
    Nearest,
    /// Mean of the two surrounding order statistics
    Midpoint,
}

impl Interpolation {
    /// Parse a method name (case-insensitive)
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "linear" => Ok(Interpolation::Linear),
            "lower" => Ok(Interpolation::Lower),
            "higher" => Ok(Interpolation::Higher),
            "nearest" => Ok(Interpolation::Nearest),
            "midpoint" => Ok(Interpolation::Midpoint),
            _ => Err(Error::InvalidArgument {
                arg: "interpolation",
                reason: format!(
                    "unknown method '{s}', expected linear, lower, higher, nearest or midpoint"
                ),
            }),
        }
    }

    /// Combine the two surrounding order statistics
    #[inline]
    pub fn interpolate(&self, lower: f64, upper: f64, frac: f64) -> f64 {
        match self {
            Interpolation::Linear => lower * (1.0 - frac) + upper * frac,
            Interpolation::Lower => lower,
            Interpolation::Higher => upper,
            Interpolation::Nearest => {
                if frac < 0.5 {
                    lower
                } else {
                    upper
                }
            }
            Interpolation::Midpoint => 0.5 * (lower + upper),
        }
    }
}

/// `(floor, ceil, frac)` of the virtual index `q·(n-1)`
#[inline]
pub fn quantile_indices(q: f64, n: usize) -> (usize, usize, f64) {
    debug_assert!(n > 0);
    let virtual_idx = q * (n - 1) as f64;
    let floor = virtual_idx.floor() as usize;
    let ceil = (virtual_idx.ceil() as usize).min(n - 1);
    (floor, ceil, virtual_idx - floor as f64)
}

fn require_nonempty(data: &[f64], op: &'static str) -> Result<()> {
    if data.is_empty() {
        return Err(Error::InvalidArgument {
            arg: "data",
            reason: format!("{op} of empty slice"),
        });
    }
    Ok(())
}

fn divisor(n: usize, ddof: usize) -> Result<f64> {
    if ddof >= n {
        return Err(Error::InvalidArgument {
            arg: "ddof",
            reason: format!("ddof {ddof} must be less than the sample size {n}"),
        });
    }
    Ok((n - ddof) as f64)
}

fn sorted_copy(data: &[f64]) -> Vec<f64> {
    let mut v = data.to_vec();
    v.sort_by(f64::total_cmp);
    v
}

// ============================================================================
// Reductions
// ============================================================================

/// Sum of all elements (0 for an empty slice)
#[inline]
pub fn sum(data: &[f64]) -> f64 {
    elementwise::sum(data)
}

/// Product of all elements (1 for an empty slice)
pub fn prod(data: &[f64]) -> f64 {
    data.iter().product()
}

/// Smallest element; NaN if any element is NaN
pub fn min(data: &[f64]) -> Result<f64> {
    require_nonempty(data, "min")?;
    Ok(data.iter().skip(1).fold(data[0], |m, &x| {
        if m.is_nan() || x.is_nan() { f64::NAN } else { m.min(x) }
    }))
}

/// Largest element; NaN if any element is NaN
pub fn max(data: &[f64]) -> Result<f64> {
    require_nonempty(data, "max")?;
    Ok(data.iter().skip(1).fold(data[0], |m, &x| {
        if m.is_nan() || x.is_nan() { f64::NAN } else { m.max(x) }
    }))
}

/// Arithmetic mean
pub fn mean(data: &[f64]) -> Result<f64> {
    require_nonempty(data, "mean")?;
    Ok(sum(data) / data.len() as f64)
}

// ============================================================================
// Moments
// ============================================================================

/// Two-pass variance with divisor `n - ddof`
pub fn variance(data: &[f64], ddof: usize) -> Result<f64> {
    let d = divisor(data.len(), ddof)?;
    let mu = mean(data)?;
    let ss: f64 = data.iter().map(|&x| (x - mu) * (x - mu)).sum();
    Ok(ss / d)
}

/// Standard deviation with divisor `n - ddof`
pub fn std(data: &[f64], ddof: usize) -> Result<f64> {
    Ok(variance(data, ddof)?.sqrt())
}

/// Central moments `(m2, m3, m4)` with divisor `n`
fn central_moments(data: &[f64]) -> Result<(f64, f64, f64)> {
    let mu = mean(data)?;
    let n = data.len() as f64;
    let (mut m2, mut m3, mut m4) = (0.0, 0.0, 0.0);
    for &x in data {
        let d = x - mu;
        let d2 = d * d;
        m2 += d2;
        m3 += d2 * d;
        m4 += d2 * d2;
    }
    Ok((m2 / n, m3 / n, m4 / n))
}

/// Population skewness `m3 / m2^(3/2)`; NaN for constant data
pub fn skewness(data: &[f64]) -> Result<f64> {
    let (m2, m3, _) = central_moments(data)?;
    Ok(m3 / (m2 * m2.sqrt()))
}

/// Excess kurtosis `m4 / m2² - 3`; NaN for constant data
pub fn kurtosis(data: &[f64]) -> Result<f64> {
    let (m2, _, m4) = central_moments(data)?;
    Ok(m4 / (m2 * m2) - 3.0)
}

// ============================================================================
// Order statistics
// ============================================================================

/// Quantile `q ∈ [0, 1]` of `data`
///
/// ```
/// # use numkern::stats::{Interpolation, quantile};
/// let q = quantile(&[1.0, 2.0, 3.0, 4.0], 0.25, Interpolation::Linear)?;
/// assert!((q - 1.75).abs() < 1e-15);
/// # Ok::<(), numkern::error::Error>(())
/// ```
pub fn quantile(data: &[f64], q: f64, interpolation: Interpolation) -> Result<f64> {
    require_nonempty(data, "quantile")?;
    if !(0.0..=1.0).contains(&q) {
        return Err(Error::InvalidArgument {
            arg: "q",
            reason: format!("quantile {q} outside [0, 1]"),
        });
    }
    let sorted = sorted_copy(data);
    let (lo, hi, frac) = quantile_indices(q, sorted.len());
    Ok(interpolation.interpolate(sorted[lo], sorted[hi], frac))
}

/// Percentile `p ∈ [0, 100]`
pub fn percentile(data: &[f64], p: f64, interpolation: Interpolation) -> Result<f64> {
    if !(0.0..=100.0).contains(&p) {
        return Err(Error::InvalidArgument {
            arg: "p",
            reason: format!("percentile {p} outside [0, 100]"),
        });
    }
    quantile(data, p / 100.0, interpolation)
}

/// Median absolute deviation `median(|x - median(x)|)`
pub fn mad(data: &[f64]) -> Result<f64> {
    require_nonempty(data, "mad")?;
    let mut buf = data.to_vec();
    let m = median_in_place(&mut buf)?;
    for (b, &x) in buf.iter_mut().zip(data) {
        *b = (x - m).abs();
    }
    median_in_place(&mut buf)
}

/// Most frequent value; ties resolve to the smallest
pub fn mode(data: &[f64]) -> Result<f64> {
    require_nonempty(data, "mode")?;
    let sorted = sorted_copy(data);
    let (mut best, mut best_count) = (sorted[0], 0usize);
    let mut i = 0;
    while i < sorted.len() {
        let v = sorted[i];
        let run = sorted[i..].iter().take_while(|&&x| x == v).count().max(1);
        if run > best_count {
            best = v;
            best_count = run;
        }
        i += run;
    }
    Ok(best)
}

/// Running sum
pub fn cumsum(data: &[f64]) -> Vec<f64> {
    data.iter()
        .scan(0.0, |acc, &x| {
            *acc += x;
            Some(*acc)
        })
        .collect()
}

// ============================================================================
// Bivariate
// ============================================================================

/// Covariance of two equal-length samples with divisor `n - ddof`
pub fn covariance(x: &[f64], y: &[f64], ddof: usize) -> Result<f64> {
    check_len(x.len(), y.len())?;
    let d = divisor(x.len(), ddof)?;
    let (mx, my) = (mean(x)?, mean(y)?);
    let s: f64 = x.iter().zip(y).map(|(&a, &b)| (a - mx) * (b - my)).sum();
    Ok(s / d)
}

/// Pearson correlation coefficient; NaN when either sample is constant
pub fn correlation(x: &[f64], y: &[f64]) -> Result<f64> {
    check_len(x.len(), y.len())?;
    let (mx, my) = (mean(x)?, mean(y)?);
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (&a, &b) in x.iter().zip(y) {
        let (da, db) = (a - mx, b - my);
        sxy += da * db;
        sxx += da * da;
        syy += db * db;
    }
    Ok((sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0))
}

/// Standard scores `(x - mean) / std(ddof)`
pub fn zscore(data: &[f64], ddof: usize) -> Result<Vec<f64>> {
    let mu = mean(data)?;
    let sd = std(data, ddof)?;
    Ok(data.iter().map(|&x| (x - mu) / sd).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATA: [f64; 8] = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];

    #[test]
    fn test_reductions() {
        assert_eq!(sum(&DATA), 40.0);
        assert_eq!(sum(&[]), 0.0);
        assert_eq!(prod(&[2.0, 3.0, 4.0]), 24.0);
        assert_eq!(prod(&[]), 1.0);
        assert_eq!(min(&DATA).unwrap(), 2.0);
        assert_eq!(max(&DATA).unwrap(), 9.0);
        assert!(max(&[1.0, f64::NAN]).unwrap().is_nan());
        assert_eq!(mean(&DATA).unwrap(), 5.0);
        assert!(mean(&[]).is_err());
    }

    #[test]
    fn test_variance_ddof() {
        assert_eq!(variance(&DATA, 0).unwrap(), 4.0);
        assert_eq!(std(&DATA, 0).unwrap(), 2.0);
        assert!((variance(&DATA, 1).unwrap() - 32.0 / 7.0).abs() < 1e-14);
        assert!((variance(&DATA, 3).unwrap() - 32.0 / 5.0).abs() < 1e-14);
        assert!(matches!(
            variance(&DATA, 8),
            Err(Error::InvalidArgument { arg: "ddof", .. })
        ));
    }

    #[test]
    fn test_shape_moments() {
        // symmetric data has zero skew
        assert!(skewness(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap().abs() < 1e-15);
        // m2 = 4, m3 = 21/4 -> 21/32
        assert!((skewness(&DATA).unwrap() - 21.0 / 32.0).abs() < 1e-14);
        // two-point distribution: kurtosis 1 - 3
        assert!((kurtosis(&[-1.0, 1.0, -1.0, 1.0]).unwrap() + 2.0).abs() < 1e-14);
        assert!(skewness(&[3.0, 3.0]).unwrap().is_nan());
    }

    #[test]
    fn test_quantile_methods() {
        let d = [4.0, 1.0, 3.0, 2.0];
        let q = |m| quantile(&d, 0.25, m).unwrap();
        assert!((q(Interpolation::Linear) - 1.75).abs() < 1e-15);
        assert_eq!(q(Interpolation::Lower), 1.0);
        assert_eq!(q(Interpolation::Higher), 2.0);
        assert_eq!(q(Interpolation::Nearest), 2.0);
        assert_eq!(q(Interpolation::Midpoint), 1.5);
        assert_eq!(quantile(&d, 0.0, Interpolation::Linear).unwrap(), 1.0);
        assert_eq!(quantile(&d, 1.0, Interpolation::Linear).unwrap(), 4.0);
        assert_eq!(percentile(&d, 50.0, Interpolation::Linear).unwrap(), 2.5);
        assert!(quantile(&d, 1.5, Interpolation::Linear).is_err());
        assert!(percentile(&d, -1.0, Interpolation::Linear).is_err());
        assert_eq!(Interpolation::parse("MidPoint").unwrap(), Interpolation::Midpoint);
        assert!(Interpolation::parse("cubic").is_err());
    }

    #[test]
    fn test_quantile_indices() {
        assert_eq!(quantile_indices(0.5, 5), (2, 2, 0.0));
        let (lo, hi, f) = quantile_indices(0.25, 4);
        assert_eq!((lo, hi), (0, 1));
        assert!((f - 0.75).abs() < 1e-15);
    }

    #[test]
    fn test_mad_mode_cumsum() {
        // median 4.5, deviations [2.5,.5,.5,.5,.5,.5,2.5,4.5] -> 0.5
        assert_eq!(mad(&DATA).unwrap(), 0.5);
        assert_eq!(mode(&DATA).unwrap(), 4.0);
        assert_eq!(mode(&[3.0, 1.0, 3.0, 1.0]).unwrap(), 1.0);
        assert_eq!(cumsum(&[1.0, 2.0, 3.0]), vec![1.0, 3.0, 6.0]);
        assert!(cumsum(&[]).is_empty());
    }

    #[test]
    fn test_bivariate() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [2.0, 4.0, 6.0, 8.0];
        assert!((covariance(&x, &y, 1).unwrap() - 10.0 / 3.0).abs() < 1e-14);
        assert!((covariance(&x, &y, 0).unwrap() - 2.5).abs() < 1e-14);
        assert!((correlation(&x, &y).unwrap() - 1.0).abs() < 1e-15);
        let neg: Vec<f64> = y.iter().map(|v| -v).collect();
        assert!((correlation(&x, &neg).unwrap() + 1.0).abs() < 1e-15);
        assert!(matches!(
            covariance(&x, &y[..3], 0),
            Err(Error::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_zscore() {
        let z = zscore(&DATA, 0).unwrap();
        assert_eq!(z[0], -1.5);
        assert_eq!(z[7], 2.0);
        assert!(sum(&z).abs() < 1e-14);
    }
}
