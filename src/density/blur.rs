use ndarray::{Array2, ArrayBase, ArrayView2, Data, Ix2, Zip, s};
use serde::{Deserialize, Serialize};

/// Parameters of the disk blur applied by [`operator_blur`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlurOpts {
    /// Kernel radius in cells. The kernel side is `2 * radius + 1`.
    pub radius: usize,
    /// Number of times the blur is applied.
    pub n: usize,
}

impl Default for BlurOpts {
    fn default() -> Self {
        Self { radius: 2, n: 1 }
    }
}

/// Build the normalized disk kernel for `radius`.
///
/// Cell `(i, j)` of the `(2r+1) x (2r+1)` grid is set when
/// `(i - r)^2 + (j - r)^2 < (r + 1)^2`, then the kernel is divided by its sum. For `r <= 2`
/// that fills the whole square; larger radii get pixelated circles.
pub fn create_blur_kernel(radius: usize) -> Array2<f64> {
    let side = 2 * radius + 1;
    let r = radius as i64;
    let limit = (r + 1) * (r + 1);
    let mut kernel = Array2::from_shape_fn((side, side), |(i, j)| {
        let di = i as i64 - r;
        let dj = j as i64 - r;
        if di * di + dj * dj < limit { 1.0 } else { 0.0 }
    });
    // The center cell is always inside, so the sum is at least one.
    let total = kernel.sum();
    kernel.mapv_inplace(|v| v / total);
    kernel
}

/// Blur `rho` with the disk kernel, `opts.n` times.
///
/// Each pass is a full 2-D convolution cropped by `radius` cells on every side, so the
/// output has the input's shape and cells past the border count as zero.
pub fn operator_blur<S>(rho: &ArrayBase<S, Ix2>, opts: BlurOpts) -> Array2<f64>
where
    S: Data<Elem = f64>,
{
    let kernel = create_blur_kernel(opts.radius);
    let mut out = rho.to_owned();
    for _ in 0..opts.n {
        out = convolve_cropped(out.view(), kernel.view());
    }
    out
}

/// Vector-Jacobian product of [`operator_blur`].
///
/// The blur is linear, so the adjoint does not depend on `rho`: each pass becomes a cropped
/// correlation with the same kernel.
pub fn operator_blur_vjp<S>(grad: &ArrayBase<S, Ix2>, opts: BlurOpts) -> Array2<f64>
where
    S: Data<Elem = f64>,
{
    let kernel = create_blur_kernel(opts.radius);
    let flipped = kernel.slice(s![..;-1, ..;-1]);
    let mut out = grad.to_owned();
    for _ in 0..opts.n {
        out = convolve_cropped(out.view(), flipped);
    }
    out
}

/// `convolve(x, kernel, mode="full")` cropped back to the shape of `x`.
///
/// Works tap by tap: every nonzero kernel weight adds a shifted, scaled copy of `x`.
fn convolve_cropped(x: ArrayView2<'_, f64>, kernel: ArrayView2<'_, f64>) -> Array2<f64> {
    let (rows, cols) = x.dim();
    let (kr, kc) = kernel.dim();
    let (cr, cc) = ((kr / 2) as isize, (kc / 2) as isize);
    let mut out = Array2::<f64>::zeros((rows, cols));

    for ((p, q), &w) in kernel.indexed_iter() {
        if w == 0.0 {
            continue;
        }
        let (src_r, dst_r, h) = shift_range(cr - p as isize, rows);
        let (src_c, dst_c, wd) = shift_range(cc - q as isize, cols);
        if h == 0 || wd == 0 {
            continue;
        }
        Zip::from(out.slice_mut(s![dst_r..dst_r + h, dst_c..dst_c + wd]))
            .and(x.slice(s![src_r..src_r + h, src_c..src_c + wd]))
            .for_each(|o, &v| *o += w * v);
    }
    out
}

/// Overlap of `dst[i]` and `src[i + offset]` along an axis of length `len`.
///
/// Returns `(src_start, dst_start, count)`.
fn shift_range(offset: isize, len: usize) -> (usize, usize, usize) {
    let shift = offset.unsigned_abs();
    if shift >= len {
        return (0, 0, 0);
    }
    if offset >= 0 {
        (shift, 0, len - shift)
    } else {
        (0, shift, len - shift)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/density/blur.rs"]
mod tests;
