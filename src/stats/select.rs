//! Order statistics by partial partitioning
//!
//! All selectors rearrange the slice in place. On return the k-th smallest
//! value sits at index `k`, everything before it compares `<=` and everything
//! after compares `>=` (under [`f64::total_cmp`], so NaNs order last).
//!
//! ```text
//! partition_select   three-way Lomuto quickselect, middle pivot   O(n) avg, O(n²) worst
//! median_of_medians  BFPRT groups-of-five pivot                   O(n) worst
//! introselect        quickselect until depth 2·⌊log2 n⌋,
//!                    then median-of-medians pivots                O(n) worst
//! ```

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy)]
enum Pivot {
    Middle,
    MedianOfMedians,
    Intro { depth_limit: usize },
}

/// Recursion depth after which [`introselect`] switches pivot strategy
#[inline]
pub fn intro_depth_limit(n: usize) -> usize {
    if n == 0 {
        0
    } else {
        2 * (usize::BITS - 1 - n.leading_zeros()) as usize
    }
}

fn check_rank(n: usize, k: usize) -> Result<()> {
    if k >= n {
        return Err(Error::InvalidArgument {
            arg: "k",
            reason: format!("rank {k} out of range for {n} elements"),
        });
    }
    Ok(())
}

/// Three-way Lomuto partition of `arr[lo..=hi]` around `arr[pivot]`
///
/// A single forward scan groups `< p`, then `== p`, then `> p`. Returns the
/// inclusive range `(first, last)` holding values equal to the pivot, so runs
/// of ties leave the search in one pass.
fn lomuto(arr: &mut [f64], lo: usize, hi: usize, pivot: usize) -> (usize, usize) {
    arr.swap(pivot, hi);
    let p = arr[hi];
    // [lo, lt) < p, [lt, eq) == p, [eq, i) > p
    let mut lt = lo;
    let mut eq = lo;
    for i in lo..hi {
        match arr[i].total_cmp(&p) {
            std::cmp::Ordering::Less => {
                arr.swap(i, eq);
                arr.swap(eq, lt);
                lt += 1;
                eq += 1;
            }
            std::cmp::Ordering::Equal => {
                arr.swap(i, eq);
                eq += 1;
            }
            std::cmp::Ordering::Greater => {}
        }
    }
    arr.swap(eq, hi);
    (lt, eq)
}

fn insertion_sort(arr: &mut [f64]) {
    for i in 1..arr.len() {
        let mut j = i;
        while j > 0 && arr[j - 1].total_cmp(&arr[j]).is_gt() {
            arr.swap(j - 1, j);
            j -= 1;
        }
    }
}

/// Index of the median of group medians within `arr[lo..=hi]`
///
/// Group medians are gathered at the front of the range, then the median of
/// those is selected recursively.
fn mom_pivot(arr: &mut [f64], lo: usize, hi: usize) -> usize {
    let n = hi - lo + 1;
    if n <= 5 {
        insertion_sort(&mut arr[lo..=hi]);
        return lo + (n - 1) / 2;
    }
    let mut m = 0;
    let mut g = lo;
    while g <= hi {
        let end = (g + 4).min(hi);
        insertion_sort(&mut arr[g..=end]);
        arr.swap(g + (end - g) / 2, lo + m);
        m += 1;
        g += 5;
    }
    let mid = lo + (m - 1) / 2;
    select_in(arr, lo, lo + m - 1, mid, Pivot::MedianOfMedians);
    mid
}

fn select_in(arr: &mut [f64], mut lo: usize, mut hi: usize, k: usize, strategy: Pivot) {
    let mut depth = 0;
    while lo < hi {
        let use_mom = match strategy {
            Pivot::Middle => false,
            Pivot::MedianOfMedians => true,
            Pivot::Intro { depth_limit } => depth >= depth_limit,
        };
        let pivot = if use_mom {
            mom_pivot(arr, lo, hi)
        } else {
            lo + (hi - lo) / 2
        };
        let (first, last) = lomuto(arr, lo, hi, pivot);
        if k < first {
            hi = first - 1;
        } else if k > last {
            lo = last + 1;
        } else {
            return;
        }
        depth += 1;
    }
}

fn select(arr: &mut [f64], k: usize, strategy: Pivot) -> Result<f64> {
    check_rank(arr.len(), k)?;
    select_in(arr, 0, arr.len() - 1, k, strategy);
    Ok(arr[k])
}

/// k-th smallest element (0-based) by Lomuto quickselect
///
/// # Example
///
/// ```
/// # use numkern::stats::partition_select;
/// let mut v = [5.0, 3.0, 8.0, 1.0, 9.0];
/// assert_eq!(partition_select(&mut v, 2)?, 5.0);
/// # Ok::<(), numkern::error::Error>(())
/// ```
pub fn partition_select(arr: &mut [f64], k: usize) -> Result<f64> {
    select(arr, k, Pivot::Middle)
}

/// k-th smallest element with guaranteed linear time
pub fn median_of_medians(arr: &mut [f64], k: usize) -> Result<f64> {
    select(arr, k, Pivot::MedianOfMedians)
}

/// k-th smallest element: quickselect with a median-of-medians fallback once
/// the partition depth passes [`intro_depth_limit`]
pub fn introselect(arr: &mut [f64], k: usize) -> Result<f64> {
    let depth_limit = intro_depth_limit(arr.len());
    select(arr, k, Pivot::Intro { depth_limit })
}

/// Median of `data`; even lengths average the two middle order statistics
pub fn median(data: &[f64]) -> Result<f64> {
    if data.is_empty() {
        return Err(Error::InvalidArgument {
            arg: "data",
            reason: "median of empty slice".into(),
        });
    }
    let mut buf = data.to_vec();
    median_in_place(&mut buf)
}

pub(crate) fn median_in_place(buf: &mut [f64]) -> Result<f64> {
    let n = buf.len();
    let upper = introselect(buf, n / 2)?;
    if n % 2 == 1 {
        return Ok(upper);
    }
    // left of n/2 is already <= upper; its maximum is the lower middle
    let lower = buf[..n / 2]
        .iter()
        .copied()
        .max_by(f64::total_cmp)
        .unwrap_or(upper);
    Ok(0.5 * (lower + upper))
}
