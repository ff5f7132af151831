use std::path::PathBuf;

use ndarray::ArrayView2;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::{
    encode::{
        gif::{GifSink, GifSinkOpts},
        sink::{FrameSink, SinkConfig},
    },
    foundation::{
        error::{InvdesError, InvdesResult},
        grid::ensure_same_shape,
    },
    render::{
        colormap::Colormap,
        frame::{FrameStyle, Outline, OutlineLevel, field_vmax, phase_snapshot, render_field},
    },
};

/// Options for [`animate`] and [`render_animation`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimateOpts {
    /// Fixed color scale; defaults to the largest `|val|`.
    pub max: Option<f64>,
    /// Animation title, recorded in the tracing span.
    pub title: Option<String>,
    /// Append a colorbar strip under each frame.
    pub cbar: bool,
    /// Colormap for the field.
    pub cmap: Colormap,
    /// Opacity of the outline contour.
    pub outline_alpha: f64,
    /// Level at which the outline contour is drawn.
    pub outline_level: OutlineLevel,
    /// Output file stem.
    pub gif_name: String,
    /// Number of frames over one period.
    pub frames_num: u32,
    /// Output root; frames are staged in `<out_dir>/frames/`.
    pub out_dir: PathBuf,
    /// Side of one array cell in pixels.
    pub pixels_per_cell: u32,
    /// Display time of each frame.
    pub frame_delay_ms: u32,
}

impl Default for AnimateOpts {
    fn default() -> Self {
        Self {
            max: None,
            title: None,
            cbar: false,
            cmap: Colormap::RdBu,
            outline_alpha: 0.5,
            outline_level: OutlineLevel::Auto,
            gif_name: "mygif".to_string(),
            frames_num: 24,
            out_dir: PathBuf::from("gif"),
            pixels_per_cell: 4,
            frame_delay_ms: 100,
        }
    }
}

impl AnimateOpts {
    /// Check the numeric options.
    pub fn validate(&self) -> InvdesResult<()> {
        if self.frames_num == 0 {
            return Err(InvdesError::validation("frames_num must be > 0"));
        }
        if self.pixels_per_cell == 0 {
            return Err(InvdesError::validation("pixels_per_cell must be > 0"));
        }
        if !(0.0..=1.0).contains(&self.outline_alpha) {
            return Err(InvdesError::validation("outline_alpha must be in [0, 1]"));
        }
        if let Some(m) = self.max
            && (!m.is_finite() || m < 0.0)
        {
            return Err(InvdesError::validation("max must be finite and >= 0"));
        }
        Ok(())
    }
}

/// Outcome of a finished [`animate`] call.
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationReport {
    /// Path of the written GIF.
    pub out_path: PathBuf,
    /// Number of frames written.
    pub frames: u32,
    /// Color scale shared by every frame.
    pub vmax: f64,
}

/// Render `frames_num` phase-rotated snapshots of `val` into `sink`.
///
/// Frame `k` shows `Re(val * exp(i*2*pi*k/frames_num))` on the fixed scale
/// `[-vmax, vmax]`. Returns that `vmax`.
pub fn render_animation<K: FrameSink + ?Sized>(
    val: ArrayView2<'_, Complex64>,
    outline: Option<ArrayView2<'_, f64>>,
    opts: &AnimateOpts,
    sink: &mut K,
) -> InvdesResult<f64> {
    opts.validate()?;
    let outline = match outline {
        Some(o) => {
            ensure_same_shape("animate: outline", &val, &o)?;
            Outline::new(o, opts.outline_level)
        }
        None => None,
    };

    let style = FrameStyle {
        cmap: opts.cmap,
        vmax: field_vmax(val, opts.max),
        pixels_per_cell: opts.pixels_per_cell,
        cbar: opts.cbar,
        outline_alpha: opts.outline_alpha,
    };

    for k in 0..opts.frames_num {
        let snapshot = phase_snapshot(val, k, opts.frames_num);
        let frame = render_field(snapshot.view(), &style, outline.as_ref())?;
        if k == 0 {
            sink.begin(SinkConfig {
                width: frame.width,
                height: frame.height,
                frame_count: opts.frames_num,
                frame_delay_ms: opts.frame_delay_ms,
            })?;
        }
        sink.push_frame(k, &frame)?;
    }
    sink.end()?;
    Ok(style.vmax)
}

/// Animate the harmonic oscillation of a complex field as a looping GIF.
///
/// Frames are staged as `<out_dir>/frames/<k>.png`, assembled into
/// `<out_dir>/<gif_name>.gif` and then deleted. Missing directories are created. Staged
/// frames are removed on failure too.
#[tracing::instrument(skip(val, outline, opts), fields(title = ?opts.title, frames = opts.frames_num))]
pub fn animate(
    val: ArrayView2<'_, Complex64>,
    outline: Option<ArrayView2<'_, f64>>,
    opts: &AnimateOpts,
) -> InvdesResult<AnimationReport> {
    let mut sink = GifSink::new(GifSinkOpts {
        out_dir: opts.out_dir.clone(),
        gif_name: opts.gif_name.clone(),
    })?;
    let vmax = render_animation(val, outline, opts, &mut sink)?;
    Ok(AnimationReport {
        out_path: sink.out_path(),
        frames: opts.frames_num,
        vmax,
    })
}

#[cfg(test)]
#[path = "../tests/unit/animate.rs"]
mod tests;
