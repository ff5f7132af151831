//! Auxiliary numerics for photonic inverse design.
//!
//! invdes turns a design-region density into a permittivity map and renders complex field
//! snapshots as looping animations.
//!
//! # Parameterization
//!
//! [`EpsrParams::apply`] (or [`epsr_parameterization`]) runs:
//!
//! 1. [`mask_combine_rho`]: design density inside the mask, background outside
//! 2. [`operator_blur`]: disk-kernel convolution for a minimum length scale
//! 3. [`operator_proj`]: smooth `tanh` threshold toward 0/1
//! 4. [`mask_combine_rho`] again, restoring the exact background
//! 5. linear rescale onto `[epsr_min, epsr_max]`
//!
//! Each step has a `*_vjp` companion and [`EpsrParams::vjp`] chains them, so an external
//! optimizer can pull gradients back to the density.
//!
//! # Animation
//!
//! [`animate`] renders `Re(val * exp(i*2*pi*k/N))` for `k in 0..N` on a shared color scale,
//! stages each frame as a PNG, assembles a looping GIF and deletes the staged frames.
//! [`render_animation`] drives any [`FrameSink`] instead.
#![deny(unsafe_code)]
#![deny(missing_docs)]

mod animate;
mod density;
mod encode;
mod foundation;
mod render;

pub use animate::{AnimateOpts, AnimationReport, animate, render_animation};
pub use density::blur::{BlurOpts, create_blur_kernel, operator_blur, operator_blur_vjp};
pub use density::mask::{mask_combine_rho, mask_combine_rho_vjp};
pub use density::pipeline::{EpsrParams, epsr_parameterization};
pub use density::projection::{ProjectionOpts, operator_proj, operator_proj_vjp};
pub use encode::gif::{GifSink, GifSinkOpts, ensure_parent_dir};
pub use encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use foundation::constants::{C_0, EPSILON_0, MU_0, Q_E};
pub use foundation::error::{InvdesError, InvdesResult};
pub use render::colormap::{BAD_RGBA, Colormap};
pub use render::frame::{
    FrameRGBA, FrameStyle, Outline, OutlineLevel, field_vmax, phase_snapshot, render_field,
};

pub use ndarray;
pub use num_complex;
