//! Single embedded Runge–Kutta steps
//!
//! Stage derivatives `k` are a flat row-major `S × n` buffer: stage `s` is
//! `k[s*n .. (s+1)*n]`. The caller evaluates its right-hand side at the
//! points produced by the `*_stage_input` functions, or hands a closure to
//! the `*_stages` helpers which do that loop.

use super::tableau::{BS23, DP45, Tableau};
use crate::buffer::{check_len, check_work, rk45_work_size};
use crate::error::{Error, Result};

fn check_stage(stage: usize, stages: usize) -> Result<()> {
    if stage == 0 || stage >= stages {
        return Err(Error::InvalidArgument {
            arg: "stage",
            reason: format!("stage {stage} outside 1..{stages}"),
        });
    }
    Ok(())
}

/// `out = y + h·Σ_{j<stage} a[stage][j]·k_j`
pub fn stage_input<const S: usize>(
    tab: &Tableau<S>,
    y: &[f64],
    h: f64,
    k: &[f64],
    stage: usize,
    out: &mut [f64],
) -> Result<()> {
    let n = y.len();
    check_stage(stage, S)?;
    check_len(S * n, k.len())?;
    check_len(n, out.len())?;
    out.copy_from_slice(y);
    for (j, &a) in tab.a[stage][..stage].iter().enumerate() {
        if a == 0.0 {
            continue;
        }
        let kj = &k[j * n..(j + 1) * n];
        for (o, &kv) in out.iter_mut().zip(kj) {
            *o += h * a * kv;
        }
    }
    Ok(())
}

/// Combine the stages into the propagated solution and the error estimate
///
/// ```text
/// y_next = y + h·Σ b_s·k_s
/// y_err  = h·Σ (b_s - b_hat_s)·k_s
/// ```
pub fn embedded_step<const S: usize>(
    tab: &Tableau<S>,
    y: &[f64],
    h: f64,
    k: &[f64],
    y_next: &mut [f64],
    y_err: &mut [f64],
) -> Result<()> {
    let n = y.len();
    check_len(S * n, k.len())?;
    check_len(n, y_next.len())?;
    check_len(n, y_err.len())?;
    let e = tab.error_weights();
    for i in 0..n {
        let mut acc = 0.0;
        let mut err = 0.0;
        for s in 0..S {
            let ks = k[s * n + i];
            acc += tab.b[s] * ks;
            err += e[s] * ks;
        }
        y_next[i] = y[i] + h * acc;
        y_err[i] = h * err;
    }
    Ok(())
}

/// Evaluate every stage of `tab` with the caller's right-hand side
///
/// `f(t, y, dydt)` writes the derivative into `dydt`. `work` is the stage
/// input buffer (`n` elements).
pub fn evaluate_stages<const S: usize, F>(
    tab: &Tableau<S>,
    mut f: F,
    t: f64,
    y: &[f64],
    h: f64,
    k: &mut [f64],
    work: &mut [f64],
) -> Result<()>
where
    F: FnMut(f64, &[f64], &mut [f64]),
{
    let n = y.len();
    check_len(S * n, k.len())?;
    check_work("evaluate_stages", work, rk45_work_size(n))?;
    let work = &mut work[..n];
    f(t, y, &mut k[..n]);
    for s in 1..S {
        stage_input(tab, y, h, k, s, work)?;
        f(t + tab.c[s] * h, work, &mut k[s * n..(s + 1) * n]);
    }
    Ok(())
}

// ============================================================================
// Bogacki–Shampine 3(2)
// ============================================================================

/// State at which stage `stage` (1..4) of BS23 is evaluated
pub fn rk23_stage_input(y: &[f64], h: f64, k: &[f64], stage: usize, out: &mut [f64]) -> Result<()> {
    stage_input(&BS23, y, h, k, stage, out)
}

/// BS23 step from four stage derivatives
pub fn rk23_step(y: &[f64], h: f64, k: &[f64], y_next: &mut [f64], y_err: &mut [f64]) -> Result<()> {
    embedded_step(&BS23, y, h, k, y_next, y_err)
}

/// Fill the four BS23 stages by calling `f`
pub fn rk23_stages<F>(f: F, t: f64, y: &[f64], h: f64, k: &mut [f64], work: &mut [f64]) -> Result<()>
where
    F: FnMut(f64, &[f64], &mut [f64]),
{
    evaluate_stages(&BS23, f, t, y, h, k, work)
}

// ============================================================================
// Dormand–Prince 5(4)
// ============================================================================

/// State at which stage `stage` (1..7) of DP45 is evaluated
pub fn rk45_stage_input(y: &[f64], h: f64, k: &[f64], stage: usize, out: &mut [f64]) -> Result<()> {
    stage_input(&DP45, y, h, k, stage, out)
}

/// DP45 step from seven stage derivatives
pub fn rk45_step(y: &[f64], h: f64, k: &[f64], y_next: &mut [f64], y_err: &mut [f64]) -> Result<()> {
    embedded_step(&DP45, y, h, k, y_next, y_err)
}

/// Fill the seven DP45 stages by calling `f`
///
/// `work` needs [`rk45_work_size`]`(n)` elements.
pub fn rk45_stages<F>(f: F, t: f64, y: &[f64], h: f64, k: &mut [f64], work: &mut [f64]) -> Result<()>
where
    F: FnMut(f64, &[f64], &mut [f64]),
{
    evaluate_stages(&DP45, f, t, y, h, k, work)
}

/// Largest absolute component of an error vector; NaN if any component is NaN
pub fn max_error(err: &[f64]) -> f64 {
    err.iter().fold(0.0, |m: f64, &e| {
        if e.is_nan() || m.is_nan() {
            f64::NAN
        } else {
            m.max(e.abs())
        }
    })
}
