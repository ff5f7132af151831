use ndarray::{Array2, ArrayBase, Data, Ix2};
use serde::{Deserialize, Serialize};

use crate::{
    density::{
        blur::{BlurOpts, operator_blur, operator_blur_vjp},
        mask::{mask_combine_rho, mask_combine_rho_vjp},
        projection::{ProjectionOpts, operator_proj, operator_proj_vjp},
    },
    foundation::{
        error::{InvdesError, InvdesResult},
        grid::ensure_same_shape,
    },
};

/// Mapping from a design density to relative permittivity.
///
/// Stages: combine with the background, blur, project, combine again (so background cells
/// get their exact background value back), then rescale `[0, 1]` onto
/// `[epsr_min, epsr_max]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EpsrParams {
    /// Permittivity assigned to density 0.
    pub epsr_min: f64,
    /// Permittivity assigned to density 1.
    pub epsr_max: f64,
    /// Blur stage settings.
    #[serde(default)]
    pub blur: BlurOpts,
    /// Projection stage settings.
    #[serde(default)]
    pub projection: ProjectionOpts,
}

impl EpsrParams {
    /// Parameters with the default blur (radius 2, one pass) and projection
    /// (`eta = 0.5`, `beta = 100`, one pass).
    pub fn new(epsr_min: f64, epsr_max: f64) -> Self {
        Self {
            epsr_min,
            epsr_max,
            blur: BlurOpts::default(),
            projection: ProjectionOpts::default(),
        }
    }

    /// Reject non-finite permittivity bounds.
    pub fn validate(&self) -> InvdesResult<()> {
        if !self.epsr_min.is_finite() || !self.epsr_max.is_finite() {
            return Err(InvdesError::validation(
                "epsr_min and epsr_max must be finite",
            ));
        }
        Ok(())
    }

    /// Run the full parameterization.
    ///
    /// The output has the input's shape. Cells outside the design region come out as
    /// exactly `epsr_min + (epsr_max - epsr_min) * bg_rho`. Inside, the projection keeps
    /// values near `[0, 1]` but does not clamp them.
    #[tracing::instrument(skip_all, fields(shape = ?rho.shape()))]
    pub fn apply<S1, S2, S3>(
        &self,
        rho: &ArrayBase<S1, Ix2>,
        bg_rho: &ArrayBase<S2, Ix2>,
        design_region: &ArrayBase<S3, Ix2>,
    ) -> InvdesResult<Array2<f64>>
    where
        S1: Data<Elem = f64>,
        S2: Data<Elem = f64>,
        S3: Data<Elem = f64>,
    {
        self.validate()?;
        let projected = self.density(rho, bg_rho, design_region)?;
        Ok(self.rescale(&projected))
    }

    /// Gradient of `sum(grad_epsr * apply(rho, ..))` with respect to `rho`.
    #[tracing::instrument(skip_all, fields(shape = ?rho.shape()))]
    pub fn vjp<S1, S2, S3, S4>(
        &self,
        rho: &ArrayBase<S1, Ix2>,
        bg_rho: &ArrayBase<S2, Ix2>,
        design_region: &ArrayBase<S3, Ix2>,
        grad_epsr: &ArrayBase<S4, Ix2>,
    ) -> InvdesResult<Array2<f64>>
    where
        S1: Data<Elem = f64>,
        S2: Data<Elem = f64>,
        S3: Data<Elem = f64>,
        S4: Data<Elem = f64>,
    {
        self.validate()?;
        ensure_same_shape("vjp: grad_epsr", rho, grad_epsr)?;

        let combined = mask_combine_rho(rho, bg_rho, design_region)?;
        let blurred = operator_blur(&combined, self.blur);

        let g = grad_epsr.mapv(|g| g * (self.epsr_max - self.epsr_min));
        let g = mask_combine_rho_vjp(&g, design_region)?;
        let g = operator_proj_vjp(&blurred, &g, self.projection)?;
        let g = operator_blur_vjp(&g, self.blur);
        mask_combine_rho_vjp(&g, design_region)
    }

    /// The processed density before rescaling.
    fn density<S1, S2, S3>(
        &self,
        rho: &ArrayBase<S1, Ix2>,
        bg_rho: &ArrayBase<S2, Ix2>,
        design_region: &ArrayBase<S3, Ix2>,
    ) -> InvdesResult<Array2<f64>>
    where
        S1: Data<Elem = f64>,
        S2: Data<Elem = f64>,
        S3: Data<Elem = f64>,
    {
        let combined = mask_combine_rho(rho, bg_rho, design_region)?;
        let blurred = operator_blur(&combined, self.blur);
        let projected = operator_proj(&blurred, self.projection);
        mask_combine_rho(&projected, bg_rho, design_region)
    }

    fn rescale(&self, rho: &Array2<f64>) -> Array2<f64> {
        let span = self.epsr_max - self.epsr_min;
        rho.mapv(|r| self.epsr_min + span * r)
    }
}

/// Free-function form of [`EpsrParams::apply`] taking every setting explicitly.
#[allow(clippy::too_many_arguments)]
pub fn epsr_parameterization<S1, S2, S3>(
    rho: &ArrayBase<S1, Ix2>,
    bg_rho: &ArrayBase<S2, Ix2>,
    design_region: &ArrayBase<S3, Ix2>,
    epsr_min: f64,
    epsr_max: f64,
    radius: usize,
    n_blur: usize,
    beta: f64,
    eta: f64,
    n_proj: usize,
) -> InvdesResult<Array2<f64>>
where
    S1: Data<Elem = f64>,
    S2: Data<Elem = f64>,
    S3: Data<Elem = f64>,
{
    EpsrParams {
        epsr_min,
        epsr_max,
        blur: BlurOpts { radius, n: n_blur },
        projection: ProjectionOpts {
            eta,
            beta,
            n: n_proj,
        },
    }
    .apply(rho, bg_rho, design_region)
}

#[cfg(test)]
#[path = "../../tests/unit/density/pipeline.rs"]
mod tests;
