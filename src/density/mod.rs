//! Density operators and the permittivity parameterization built from them.
//!
//! Every operator has a forward map and a vector-Jacobian product so a gradient-based
//! optimizer can pull an objective gradient on the permittivity back to the design density.

pub(crate) mod blur;
pub(crate) mod mask;
pub(crate) mod pipeline;
pub(crate) mod projection;
