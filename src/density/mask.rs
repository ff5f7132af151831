use ndarray::{Array, ArrayBase, Data, Dimension, Zip};

use crate::foundation::{error::InvdesResult, grid::ensure_same_shape};

/// Merge the design density into the background density.
///
/// Cells where `design_region != 0` take `rho`; every other cell takes `bg_rho`. All three
/// arrays must share one shape.
pub fn mask_combine_rho<S1, S2, S3, D>(
    rho: &ArrayBase<S1, D>,
    bg_rho: &ArrayBase<S2, D>,
    design_region: &ArrayBase<S3, D>,
) -> InvdesResult<Array<f64, D>>
where
    S1: Data<Elem = f64>,
    S2: Data<Elem = f64>,
    S3: Data<Elem = f64>,
    D: Dimension,
{
    ensure_same_shape("mask_combine_rho: bg_rho", rho, bg_rho)?;
    ensure_same_shape("mask_combine_rho: design_region", rho, design_region)?;

    Ok(Zip::from(rho)
        .and(bg_rho)
        .and(design_region)
        .map_collect(|&r, &bg, &m| if m != 0.0 { r } else { bg }))
}

/// Vector-Jacobian product of [`mask_combine_rho`] with respect to `rho`.
///
/// The background is constant, so the incoming gradient survives only inside the design
/// region.
pub fn mask_combine_rho_vjp<S1, S2, D>(
    grad: &ArrayBase<S1, D>,
    design_region: &ArrayBase<S2, D>,
) -> InvdesResult<Array<f64, D>>
where
    S1: Data<Elem = f64>,
    S2: Data<Elem = f64>,
    D: Dimension,
{
    ensure_same_shape("mask_combine_rho_vjp: design_region", grad, design_region)?;

    Ok(Zip::from(grad)
        .and(design_region)
        .map_collect(|&g, &m| if m != 0.0 { g } else { 0.0 }))
}

#[cfg(test)]
#[path = "../../tests/unit/density/mask.rs"]
mod tests;
