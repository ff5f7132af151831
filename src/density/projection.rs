use ndarray::{Array, ArrayBase, Data, Dimension, Zip};
use serde::{Deserialize, Serialize};

use crate::foundation::{error::InvdesResult, grid::ensure_same_shape};

/// Parameters of the smooth threshold applied by [`operator_proj`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionOpts {
    /// Threshold center, nominally in `(0, 1)`.
    pub eta: f64,
    /// Sharpness; large values approach a hard step at `eta`.
    pub beta: f64,
    /// Number of times the projection is applied.
    pub n: usize,
}

impl Default for ProjectionOpts {
    fn default() -> Self {
        Self {
            eta: 0.5,
            beta: 100.0,
            n: 1,
        }
    }
}

impl ProjectionOpts {
    fn denominator(self) -> f64 {
        (self.beta * self.eta).tanh() + (self.beta * (1.0 - self.eta)).tanh()
    }

    fn apply_once(self, x: f64, denom: f64) -> f64 {
        ((self.beta * self.eta).tanh() + (self.beta * (x - self.eta)).tanh()) / denom
    }

    fn derivative(self, x: f64, denom: f64) -> f64 {
        let t = (self.beta * (x - self.eta)).tanh();
        self.beta * (1.0 - t * t) / denom
    }
}

/// Density projection: push values toward 0 or 1 with a smooth `tanh` step.
///
/// Each of the `opts.n` passes maps
/// `x -> (tanh(beta*eta) + tanh(beta*(x-eta))) / (tanh(beta*eta) + tanh(beta*(1-eta)))`.
///
/// The denominator is not guarded: with `eta` at 0 or 1 and large `beta` it approaches zero
/// and the output blows up. Keeping `eta` away from the ends is the caller's job.
pub fn operator_proj<S, D>(rho: &ArrayBase<S, D>, opts: ProjectionOpts) -> Array<f64, D>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    let denom = opts.denominator();
    let mut out = rho.to_owned();
    for _ in 0..opts.n {
        out.mapv_inplace(|x| opts.apply_once(x, denom));
    }
    out
}

/// Vector-Jacobian product of [`operator_proj`] at `rho`.
///
/// Forward intermediates are recomputed pass by pass, then the per-element derivatives are
/// chained in reverse.
pub fn operator_proj_vjp<S1, S2, D>(
    rho: &ArrayBase<S1, D>,
    grad: &ArrayBase<S2, D>,
    opts: ProjectionOpts,
) -> InvdesResult<Array<f64, D>>
where
    S1: Data<Elem = f64>,
    S2: Data<Elem = f64>,
    D: Dimension,
{
    ensure_same_shape("operator_proj_vjp: grad", rho, grad)?;

    let denom = opts.denominator();
    let mut inputs = Vec::with_capacity(opts.n);
    let mut x = rho.to_owned();
    for _ in 0..opts.n {
        let next = x.mapv(|v| opts.apply_once(v, denom));
        inputs.push(x);
        x = next;
    }

    let mut g = grad.to_owned();
    for input in inputs.iter().rev() {
        Zip::from(&mut g)
            .and(input)
            .for_each(|g, &v| *g *= opts.derivative(v, denom));
    }
    Ok(g)
}

#[cfg(test)]
#[path = "../../tests/unit/density/projection.rs"]
mod tests;
