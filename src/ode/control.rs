//! Adaptive step-size control and dense output
//!
//! The controller is a pure function of the current step: no solver object
//! survives between calls. A caller-driven loop looks like
//!
//! ```text
//! while t != tf:
//!     h   = trim_step(t, h, tf)
//!     k   = stages(f, t, y, h)
//!     y', e = rk45_step(y, h, k)
//!     r   = step_control(t, h, tf, max_error(e), DP45.order, &ctl)
//!     if r.accepted: t, y = r.t, y'
//!     h = r.h_next
//! ```

use crate::config::StepControl;

/// Step scale factor `safety·(tolerance/error)^(1/order)` clamped to
/// `[min_delta, max_delta]`
///
/// A zero error grows by `max_delta`; a NaN error shrinks by `min_delta`.
pub fn compute_step_adjustment(
    error: f64,
    tolerance: f64,
    order: u32,
    safety: f64,
    min_delta: f64,
    max_delta: f64,
) -> f64 {
    if error.is_nan() {
        return min_delta;
    }
    if error == 0.0 {
        return max_delta;
    }
    let delta = safety * (tolerance / error).powf(1.0 / order as f64);
    delta.max(min_delta).min(max_delta)
}

/// True when a step of `h` from `t` would pass `tf` (either direction)
#[inline]
pub fn would_overshoot(t: f64, h: f64, tf: f64) -> bool {
    if h >= 0.0 { t + h > tf } else { t + h < tf }
}

/// Clip `h` so the step lands exactly on `tf` instead of passing it
#[inline]
pub fn trim_step(t: f64, h: f64, tf: f64) -> f64 {
    if would_overshoot(t, h, tf) { tf - t } else { h }
}

/// Cubic Hermite interpolation between two accepted steps
///
/// Uses the states `y0`, `y1` and derivatives `f0`, `f1` at `t0`, `t1`:
///
/// ```text
/// θ   = (t - t0) / h
/// out = (2θ³-3θ²+1)·y0 + (θ³-2θ²+θ)·h·f0 + (-2θ³+3θ²)·y1 + (θ³-θ²)·h·f1
/// ```
#[allow(clippy::too_many_arguments)]
pub fn hermite_interpolate(
    t0: f64,
    y0: &[f64],
    f0: &[f64],
    t1: f64,
    y1: &[f64],
    f1: &[f64],
    t: f64,
    out: &mut [f64],
) {
    debug_assert!(y0.len() == out.len() && y1.len() == out.len());
    debug_assert!(f0.len() == out.len() && f1.len() == out.len());
    let h = t1 - t0;
    let th = if h == 0.0 { 0.0 } else { (t - t0) / h };
    let th2 = th * th;
    let th3 = th2 * th;
    let h00 = 2.0 * th3 - 3.0 * th2 + 1.0;
    let h10 = th3 - 2.0 * th2 + th;
    let h01 = -2.0 * th3 + 3.0 * th2;
    let h11 = th3 - th2;
    for (i, o) in out.iter_mut().enumerate() {
        *o = h00 * y0[i] + h10 * h * f0[i] + h01 * y1[i] + h11 * h * f1[i];
    }
}

/// Outcome of one controller decision
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepResult {
    /// Whether the step met the tolerance
    pub accepted: bool,
    /// Time after the decision (`t + h` when accepted, else `t`)
    pub t: f64,
    /// Proposed next step, clipped to the step bounds and to `tf`
    pub h_next: f64,
    /// Scale factor applied to `h`
    pub factor: f64,
}

/// Accept or reject a step of size `h` with error `error` and propose the
/// next one
pub fn step_control(t: f64, h: f64, tf: f64, error: f64, order: u32, ctl: &StepControl) -> StepResult {
    let accepted = error <= ctl.tolerance;
    let factor = compute_step_adjustment(
        error,
        ctl.tolerance,
        order,
        ctl.safety,
        ctl.min_delta,
        ctl.max_delta,
    );
    let t_new = if accepted { t + h } else { t };
    let magnitude = (h.abs() * factor).max(ctl.min_step).min(ctl.max_step);
    let h_next = trim_step(t_new, magnitude.copysign(h), tf);
    StepResult {
        accepted,
        t: t_new,
        h_next,
        factor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ODE_SAFETY_FACTOR;

    #[test]
    fn test_step_adjustment() {
        // error equal to tolerance: pure safety factor
        let d = compute_step_adjustment(1e-6, 1e-6, 5, ODE_SAFETY_FACTOR, 0.2, 5.0);
        assert!((d - ODE_SAFETY_FACTOR).abs() < 1e-15);
        // tiny error clamps to growth limit, huge error to shrink limit
        assert_eq!(compute_step_adjustment(1e-30, 1e-6, 5, 0.84, 0.2, 5.0), 5.0);
        assert_eq!(compute_step_adjustment(1.0, 1e-6, 5, 0.84, 0.2, 5.0), 0.2);
        assert_eq!(compute_step_adjustment(0.0, 1e-6, 5, 0.84, 0.2, 5.0), 5.0);
        assert_eq!(compute_step_adjustment(f64::NAN, 1e-6, 5, 0.84, 0.2, 5.0), 0.2);
        // (tol/err)^(1/order) with tol/err = 32, order 5 -> 2
        let d = compute_step_adjustment(1.0, 32.0, 5, 1.0, 0.2, 5.0);
        assert!((d - 2.0).abs() < 1e-14);
    }

    #[test]
    fn test_overshoot_and_trim() {
        assert!(would_overshoot(0.9, 0.2, 1.0));
        assert!(!would_overshoot(0.5, 0.2, 1.0));
        assert!(would_overshoot(0.1, -0.2, 0.0));
        assert_eq!(trim_step(0.5, 0.2, 1.0), 0.2);
        assert!((trim_step(0.9, 0.2, 1.0) - 0.1).abs() < 1e-15);
        assert!((trim_step(0.1, -0.2, 0.0) + 0.1).abs() < 1e-15);
    }

    #[test]
    fn test_hermite_reproduces_cubic() {
        // y = t^3, y' = 3t^2
        let (t0, t1) = (1.0, 2.0);
        let mut out = [0.0];
        hermite_interpolate(t0, &[1.0], &[3.0], t1, &[8.0], &[12.0], 1.5, &mut out);
        assert!((out[0] - 3.375).abs() < 1e-14);
        hermite_interpolate(t0, &[1.0], &[3.0], t1, &[8.0], &[12.0], 1.0, &mut out);
        assert_eq!(out[0], 1.0);
    }

    #[test]
    fn test_step_control_accept_and_reject() {
        let ctl = StepControl {
            tolerance: 1e-6,
            ..StepControl::default()
        };
        let r = step_control(0.0, 0.1, 1.0, 1e-8, 5, &ctl);
        assert!(r.accepted);
        assert_eq!(r.t, 0.1);
        assert!(r.h_next > 0.1);

        let r = step_control(0.0, 0.1, 1.0, 1e-3, 5, &ctl);
        assert!(!r.accepted);
        assert_eq!(r.t, 0.0);
        assert!(r.h_next < 0.1);

        // accepted step near the end is trimmed onto tf
        let r = step_control(0.8, 0.15, 1.0, 1e-9, 5, &ctl);
        assert!(r.accepted);
        assert!((r.t + r.h_next - 1.0).abs() < 1e-15);
    }
}
