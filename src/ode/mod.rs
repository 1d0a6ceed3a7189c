//! Embedded Runge–Kutta steps with adaptive step control
//!
//! The kernel never owns an integration loop: the caller threads `(t, y, h)`
//! through successive calls and decides when `t` has reached `tf`. Each
//! piece is a pure function of its inputs.
//!
//! - [`tableau`]: Bogacki–Shampine 3(2) and Dormand–Prince 5(4) coefficients
//! - [`step`]: stage inputs, embedded steps, error reduction
//! - [`control`]: step-size adjustment, end-point trimming, dense output
//!
//! # Example
//!
//! ```
//! use numkern::config::StepControl;
//! use numkern::ode::{DP45, max_error, rk45_stages, rk45_step, step_control, trim_step};
//!
//! // y' = -y, y(0) = 1 on [0, 2]
//! let f = |_t: f64, y: &[f64], dy: &mut [f64]| dy[0] = -y[0];
//! let ctl = StepControl { tolerance: 1e-10, ..StepControl::default() };
//! let (mut t, tf, mut h) = (0.0, 2.0, 0.1);
//! let mut y = vec![1.0];
//! let mut k = vec![0.0; 7];
//! let mut work = vec![0.0; 1];
//! let (mut y_next, mut y_err) = (vec![0.0], vec![0.0]);
//! while t < tf {
//!     h = trim_step(t, h, tf);
//!     rk45_stages(f, t, &y, h, &mut k, &mut work)?;
//!     rk45_step(&y, h, &k, &mut y_next, &mut y_err)?;
//!     let r = step_control(t, h, tf, max_error(&y_err), DP45.order, &ctl);
//!     if r.accepted {
//!         t = r.t;
//!         y.copy_from_slice(&y_next);
//!     }
//!     h = r.h_next;
//!     if t >= tf {
//!         break;
//!     }
//! }
//! assert!((y[0] - (-2.0f64).exp()).abs() < 1e-8);
//! # Ok::<(), numkern::error::Error>(())
//! ```

pub mod control;
pub mod step;
pub mod tableau;

pub use control::{
    StepResult, compute_step_adjustment, hermite_interpolate, step_control, trim_step,
    would_overshoot,
};
pub use step::{
    embedded_step, evaluate_stages, max_error, rk23_stage_input, rk23_stages, rk23_step,
    rk45_stage_input, rk45_stages, rk45_step, stage_input,
};
pub use tableau::{BS23, DP45, Tableau};
