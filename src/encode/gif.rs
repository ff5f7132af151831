use std::{
    fs::File,
    io::BufWriter,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use image::{
    Delay, Frame,
    codecs::gif::{GifEncoder, Repeat},
};

use crate::{
    encode::sink::{FrameSink, SinkConfig},
    foundation::error::{InvdesError, InvdesResult},
    render::frame::FrameRGBA,
};

/// Where a [`GifSink`] stages frames and writes its output.
#[derive(Clone, Debug)]
pub struct GifSinkOpts {
    /// Root directory. Frames are staged in `<out_dir>/frames/`.
    pub out_dir: PathBuf,
    /// Output file stem; the GIF is written to `<out_dir>/<gif_name>.gif`.
    pub gif_name: String,
}

impl GifSinkOpts {
    /// Directory that holds the staged PNG frames.
    pub fn frames_dir(&self) -> PathBuf {
        self.out_dir.join("frames")
    }

    /// Final GIF path.
    pub fn out_path(&self) -> PathBuf {
        self.out_dir.join(format!("{}.gif", self.gif_name))
    }
}

/// Create the parent directory of `path` if needed.
pub fn ensure_parent_dir(path: &Path) -> InvdesResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Staged frame files, removed on drop unless already cleaned up.
#[derive(Debug, Default)]
struct StagedFrames {
    paths: Vec<PathBuf>,
}

impl StagedFrames {
    fn push(&mut self, path: PathBuf) {
        self.paths.push(path);
    }

    fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    fn remove_all(&mut self) -> InvdesResult<()> {
        while let Some(path) = self.paths.pop() {
            std::fs::remove_file(&path)
                .with_context(|| format!("failed to remove staged frame '{}'", path.display()))?;
        }
        Ok(())
    }
}

impl Drop for StagedFrames {
    fn drop(&mut self) {
        for path in self.paths.drain(..) {
            match std::fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "failed to remove staged frame");
                }
            }
        }
    }
}

/// Sink that writes each frame to `<out_dir>/frames/<idx>.png`, assembles the frames into a
/// looping GIF on `end`, then deletes the staged PNGs.
///
/// Staged files are also deleted if the sink is dropped before `end` succeeds.
#[derive(Debug)]
pub struct GifSink {
    opts: GifSinkOpts,
    cfg: Option<SinkConfig>,
    staged: StagedFrames,
}

impl GifSink {
    /// Create a sink. Nothing touches the filesystem until `begin`.
    pub fn new(opts: GifSinkOpts) -> InvdesResult<Self> {
        if opts.gif_name.is_empty() {
            return Err(InvdesError::validation("gif_name must be non-empty"));
        }
        Ok(Self {
            opts,
            cfg: None,
            staged: StagedFrames::default(),
        })
    }

    /// Final GIF path.
    pub fn out_path(&self) -> PathBuf {
        self.opts.out_path()
    }

    /// Currently staged frame files, in push order.
    pub fn staged_paths(&self) -> &[PathBuf] {
        self.staged.paths()
    }

    fn assemble(&self, delay_ms: u32) -> InvdesResult<()> {
        let out_path = self.opts.out_path();
        let file = File::create(&out_path)
            .with_context(|| format!("failed to create gif '{}'", out_path.display()))?;
        let mut encoder = GifEncoder::new(BufWriter::new(file));
        encoder
            .set_repeat(Repeat::Infinite)
            .context("failed to set gif repeat")?;

        for path in self.staged.paths() {
            let image = image::open(path)
                .with_context(|| format!("failed to read staged frame '{}'", path.display()))?
                .into_rgba8();
            let frame = Frame::from_parts(image, 0, 0, Delay::from_numer_denom_ms(delay_ms, 1));
            encoder
                .encode_frame(frame)
                .with_context(|| format!("failed to encode frame '{}'", path.display()))?;
        }
        Ok(())
    }
}

impl FrameSink for GifSink {
    fn begin(&mut self, cfg: SinkConfig) -> InvdesResult<()> {
        if cfg.width == 0 || cfg.height == 0 {
            return Err(InvdesError::validation("gif width/height must be non-zero"));
        }
        if cfg.width > u32::from(u16::MAX) || cfg.height > u32::from(u16::MAX) {
            return Err(InvdesError::validation(
                "gif width/height must fit in 16 bits",
            ));
        }
        let frames_dir = self.opts.frames_dir();
        std::fs::create_dir_all(&frames_dir).with_context(|| {
            format!("failed to create frame directory '{}'", frames_dir.display())
        })?;
        ensure_parent_dir(&self.opts.out_path())?;
        self.cfg = Some(cfg);
        Ok(())
    }

    fn push_frame(&mut self, idx: u32, frame: &FrameRGBA) -> InvdesResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| InvdesError::render("push_frame called before begin"))?;
        if frame.width != cfg.width || frame.height != cfg.height {
            return Err(InvdesError::render(format!(
                "frame {idx} is {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }

        let path = self.opts.frames_dir().join(format!("{idx}.png"));
        image::save_buffer_with_format(
            &path,
            &frame.data,
            frame.width,
            frame.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;
        tracing::debug!(frame = idx, path = %path.display(), "staged frame");
        self.staged.push(path);
        Ok(())
    }

    fn end(&mut self) -> InvdesResult<()> {
        let cfg = self
            .cfg
            .take()
            .ok_or_else(|| InvdesError::render("end called before begin"))?;
        self.assemble(cfg.frame_delay_ms)?;
        tracing::info!(path = %self.opts.out_path().display(), frames = cfg.frame_count, "gif saved");
        self.staged.remove_all()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/gif.rs"]
mod tests;
