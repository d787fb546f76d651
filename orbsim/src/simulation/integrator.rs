//! Fixed-step time integration for a single body
//!
//! Semi-implicit (symplectic) Euler: the velocity kick is applied first and
//! the drift uses the freshly kicked velocity.

use super::states::NVec2;

/// One step of size `dt` from position `x` and velocity `v` under
/// acceleration `a`; returns the new `(x, v)` without touching the body
pub fn semi_implicit_euler(x: NVec2, v: NVec2, a: NVec2, dt: f64) -> (NVec2, NVec2) {
    // Kick: v_n+1 = v_n + dt * a_n
    let v_next = v + a * dt;

    // Drift: x_n+1 = x_n + dt * v_n+1
    let x_next = x + v_next * dt;

    (x_next, v_next)
}
