use std::f64::consts::PI;

use ndarray::{Array2, ArrayView2};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::{
    foundation::{
        error::{InvdesError, InvdesResult},
        grid::{ensure_same_shape, finite_range},
    },
    render::colormap::Colormap,
};

const CBAR_GAP_PX: u32 = 4;
const CBAR_HEIGHT_PX: u32 = 8;
const CBAR_GAP_RGBA: [u8; 4] = [255, 255, 255, 255];

/// A rendered frame as straight-alpha RGBA8 pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major, top row first.
    pub data: Vec<u8>,
}

impl FrameRGBA {
    /// RGBA8 value of pixel `(x, y)`, with `y = 0` the top row.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        [
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ]
    }

    fn put(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        self.data[idx..idx + 4].copy_from_slice(&rgba);
    }
}

/// Which level of the outline array the contour is drawn at.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutlineLevel {
    /// Midpoint of the outline's finite value range.
    #[default]
    Auto,
    /// An explicit level.
    Value(f64),
}

impl OutlineLevel {
    fn resolve(self, outline: ArrayView2<'_, f64>) -> Option<f64> {
        match self {
            Self::Value(v) => Some(v),
            Self::Auto => finite_range(outline.iter()).map(|(lo, hi)| 0.5 * (lo + hi)),
        }
    }
}

/// Everything that stays fixed across the frames of one animation.
#[derive(Clone, Debug)]
pub struct FrameStyle {
    /// Colormap for field values.
    pub cmap: Colormap,
    /// Symmetric color scale `[-vmax, vmax]`.
    pub vmax: f64,
    /// Side of one array cell in output pixels.
    pub pixels_per_cell: u32,
    /// Whether to append a horizontal colorbar strip below the field.
    pub cbar: bool,
    /// Opacity of the black contour line.
    pub outline_alpha: f64,
}

/// Contour cells precomputed once per animation.
#[derive(Clone, Debug)]
pub struct Outline {
    above: Array2<bool>,
}

impl Outline {
    /// Classify every cell of `outline` against `level`.
    ///
    /// Returns `None` when there is no level to draw (an `Auto` level on an array with no
    /// finite values).
    pub fn new(outline: ArrayView2<'_, f64>, level: OutlineLevel) -> Option<Self> {
        let level = level.resolve(outline)?;
        Some(Self {
            above: outline.mapv(|v| v > level),
        })
    }
}

/// Largest absolute value of `val`, or `max` when one is given.
pub fn field_vmax(val: ArrayView2<'_, Complex64>, max: Option<f64>) -> f64 {
    match max {
        Some(m) => m,
        None => val
            .iter()
            .map(|c| c.norm())
            .filter(|v| v.is_finite())
            .fold(0.0, f64::max),
    }
}

/// Real part of `val * exp(i * 2*pi * frame / frames_num)`.
pub fn phase_snapshot(val: ArrayView2<'_, Complex64>, frame: u32, frames_num: u32) -> Array2<f64> {
    let phase = Complex64::from_polar(1.0, 2.0 * PI * f64::from(frame) / f64::from(frames_num));
    val.mapv(|c| (c * phase).re)
}

/// Rasterise a real field.
///
/// Array axis 0 runs left to right and axis 1 runs bottom to top, so a `(nx, ny)` array
/// becomes an image `nx * ppc` wide and `ny * ppc` tall (plus the colorbar strip).
pub fn render_field(
    values: ArrayView2<'_, f64>,
    style: &FrameStyle,
    outline: Option<&Outline>,
) -> InvdesResult<FrameRGBA> {
    let (nx, ny) = values.dim();
    let ppc = style.pixels_per_cell;
    if nx == 0 || ny == 0 {
        return Err(InvdesError::render("cannot render an empty field"));
    }
    if ppc == 0 {
        return Err(InvdesError::validation("pixels_per_cell must be > 0"));
    }
    if let Some(o) = outline {
        ensure_same_shape("render_field: outline", &values, &o.above)?;
    }

    let field_w = u32::try_from(nx)
        .ok()
        .and_then(|n| n.checked_mul(ppc))
        .ok_or_else(|| InvdesError::render("frame width overflow"))?;
    let field_h = u32::try_from(ny)
        .ok()
        .and_then(|n| n.checked_mul(ppc))
        .ok_or_else(|| InvdesError::render("frame height overflow"))?;
    let height = if style.cbar {
        field_h + CBAR_GAP_PX + CBAR_HEIGHT_PX
    } else {
        field_h
    };

    let mut frame = FrameRGBA {
        width: field_w,
        height,
        data: vec![0u8; (field_w as usize) * (height as usize) * 4],
    };

    let cell_at = |x: u32, y: u32| -> (usize, usize) {
        let i = (x / ppc) as usize;
        let j = ny - 1 - (y / ppc) as usize;
        (i, j)
    };

    for y in 0..field_h {
        for x in 0..field_w {
            let cell = cell_at(x, y);
            let mut rgba = style.cmap.sample_symmetric(values[cell], style.vmax);

            if let Some(o) = outline {
                let side = o.above[cell];
                let edge = (x + 1 < field_w && o.above[cell_at(x + 1, y)] != side)
                    || (y + 1 < field_h && o.above[cell_at(x, y + 1)] != side);
                if edge {
                    rgba = darken(rgba, style.outline_alpha);
                }
            }
            frame.put(x, y, rgba);
        }
    }

    if style.cbar {
        for y in field_h..field_h + CBAR_GAP_PX {
            for x in 0..field_w {
                frame.put(x, y, CBAR_GAP_RGBA);
            }
        }
        let denom = f64::from(field_w.saturating_sub(1).max(1));
        for x in 0..field_w {
            let rgba = style.cmap.sample(f64::from(x) / denom);
            for y in field_h + CBAR_GAP_PX..height {
                frame.put(x, y, rgba);
            }
        }
    }

    Ok(frame)
}

/// Composite black at opacity `alpha` over an opaque color.
fn darken(rgba: [u8; 4], alpha: f64) -> [u8; 4] {
    let keep = 1.0 - alpha.clamp(0.0, 1.0);
    let scale = |c: u8| (f64::from(c) * keep).round() as u8;
    [scale(rgba[0]), scale(rgba[1]), scale(rgba[2]), rgba[3]]
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;
