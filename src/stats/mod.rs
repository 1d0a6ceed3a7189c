//! Selection and descriptive statistics
//!
//! - [`select`]: k-th order statistics by quickselect, median-of-medians and
//!   introselect, plus the median
//! - [`descriptive`]: moments, quantiles, robust spread, covariance and
//!   correlation over `&[f64]`

pub mod descriptive;
pub mod select;

pub use descriptive::{
    Interpolation, correlation, covariance, cumsum, kurtosis, mad, max, mean, min, mode,
    percentile, prod, quantile, quantile_indices, skewness, std, sum, variance, zscore,
};
pub use select::{intro_depth_limit, introselect, median, median_of_medians, partition_select};
