use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use invdes::{
    Colormap, EpsrParams, FrameStyle,
    ndarray::{Array2, Zip},
    num_complex::Complex64,
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

#[derive(Parser, Debug)]
#[command(name = "invdes", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Map a design density to a permittivity array.
    Param(ParamArgs),
    /// Animate a complex field as a looping GIF.
    Animate(AnimateArgs),
}

#[derive(Parser, Debug)]
struct ParamArgs {
    /// Input problem JSON: `{ rho, bg_rho, design_region, params }`.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output JSON path for the permittivity rows.
    #[arg(long)]
    out: PathBuf,

    /// Also render the permittivity map as a grayscale PNG.
    #[arg(long)]
    png: Option<PathBuf>,

    /// Pixels per array cell for `--png`.
    #[arg(long, default_value_t = 4)]
    pixels_per_cell: u32,
}

#[derive(Parser, Debug)]
struct AnimateArgs {
    /// Input field JSON: `{ re, im, outline? }`.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output root; frames are staged in `<out-dir>/frames/`.
    #[arg(long, default_value = "gif")]
    out_dir: PathBuf,

    /// Output file stem.
    #[arg(long, default_value = "mygif")]
    name: String,

    /// Number of frames over one period.
    #[arg(long, default_value_t = 24)]
    frames: u32,

    /// Colormap (RdBu, RdBu_r, gray).
    #[arg(long, default_value = "RdBu")]
    cmap: Colormap,

    /// Fixed color scale; defaults to the largest field magnitude.
    #[arg(long)]
    max: Option<f64>,

    /// Append a colorbar strip.
    #[arg(long)]
    cbar: bool,

    /// Opacity of the outline contour.
    #[arg(long, default_value_t = 0.5)]
    outline_alpha: f64,

    /// Contour level for the outline; defaults to the midpoint of the outline's range.
    #[arg(long)]
    outline_level: Option<f64>,

    /// Pixels per array cell.
    #[arg(long, default_value_t = 4)]
    pixels_per_cell: u32,

    /// Display time of each frame in milliseconds.
    #[arg(long, default_value_t = 100)]
    delay_ms: u32,
}

#[derive(Deserialize, Debug)]
struct ProblemFile {
    rho: Vec<Vec<f64>>,
    bg_rho: Vec<Vec<f64>>,
    design_region: Vec<Vec<f64>>,
    params: EpsrParams,
}

#[derive(Serialize, Debug)]
struct EpsrFile {
    epsr: Vec<Vec<f64>>,
}

#[derive(Deserialize, Debug)]
struct FieldFile {
    re: Vec<Vec<f64>>,
    im: Vec<Vec<f64>>,
    #[serde(default)]
    outline: Option<Vec<Vec<f64>>>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Param(args) => cmd_param(args),
        Command::Animate(args) => cmd_animate(args),
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let f = File::open(path).with_context(|| format!("open '{}'", path.display()))?;
    let r = BufReader::new(f);
    serde_json::from_reader(r).with_context(|| format!("parse JSON '{}'", path.display()))
}

fn rows_to_array(what: &str, rows: Vec<Vec<f64>>) -> anyhow::Result<Array2<f64>> {
    let nrows = rows.len();
    let ncols = rows.first().map_or(0, Vec::len);
    if let Some(bad) = rows.iter().position(|r| r.len() != ncols) {
        anyhow::bail!("{what}: row {bad} has {} entries, expected {ncols}", rows[bad].len());
    }
    let flat: Vec<f64> = rows.into_iter().flatten().collect();
    Array2::from_shape_vec((nrows, ncols), flat).with_context(|| format!("{what}: bad shape"))
}

fn array_to_rows(a: &Array2<f64>) -> Vec<Vec<f64>> {
    a.rows().into_iter().map(|r| r.to_vec()).collect()
}

fn cmd_param(args: ParamArgs) -> anyhow::Result<()> {
    let problem: ProblemFile = read_json(&args.in_path)?;
    let rho = rows_to_array("rho", problem.rho)?;
    let bg_rho = rows_to_array("bg_rho", problem.bg_rho)?;
    let design_region = rows_to_array("design_region", problem.design_region)?;

    let epsr = problem.params.apply(&rho, &bg_rho, &design_region)?;

    invdes::ensure_parent_dir(&args.out)?;
    let f = File::create(&args.out).with_context(|| format!("create '{}'", args.out.display()))?;
    serde_json::to_writer(
        BufWriter::new(f),
        &EpsrFile {
            epsr: array_to_rows(&epsr),
        },
    )
    .with_context(|| format!("write '{}'", args.out.display()))?;
    eprintln!("wrote {}", args.out.display());

    if let Some(png) = args.png {
        write_epsr_png(&epsr, &problem.params, args.pixels_per_cell, &png)?;
        eprintln!("wrote {}", png.display());
    }
    Ok(())
}

fn write_epsr_png(
    epsr: &Array2<f64>,
    params: &EpsrParams,
    pixels_per_cell: u32,
    out: &Path,
) -> anyhow::Result<()> {
    // Center the symmetric scale on the middle of the permittivity range.
    let mid = 0.5 * (params.epsr_min + params.epsr_max);
    let half = 0.5 * (params.epsr_max - params.epsr_min).abs();
    let centered = epsr.mapv(|e| e - mid);
    let style = FrameStyle {
        cmap: Colormap::Gray,
        vmax: half,
        pixels_per_cell,
        cbar: false,
        outline_alpha: 0.0,
    };
    let frame = invdes::render_field(centered.view(), &style, None)?;

    invdes::ensure_parent_dir(out)?;
    image::save_buffer_with_format(
        out,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", out.display()))?;
    Ok(())
}

fn cmd_animate(args: AnimateArgs) -> anyhow::Result<()> {
    let field: FieldFile = read_json(&args.in_path)?;
    let re = rows_to_array("re", field.re)?;
    let im = rows_to_array("im", field.im)?;
    if re.dim() != im.dim() {
        anyhow::bail!("re is {:?} but im is {:?}", re.dim(), im.dim());
    }
    let val = Zip::from(&re)
        .and(&im)
        .map_collect(|&r, &i| Complex64::new(r, i));
    let outline = field
        .outline
        .map(|rows| rows_to_array("outline", rows))
        .transpose()?;

    let opts = invdes::AnimateOpts {
        max: args.max,
        title: None,
        cbar: args.cbar,
        cmap: args.cmap,
        outline_alpha: args.outline_alpha,
        outline_level: args
            .outline_level
            .map_or(invdes::OutlineLevel::Auto, invdes::OutlineLevel::Value),
        gif_name: args.name,
        frames_num: args.frames,
        out_dir: args.out_dir,
        pixels_per_cell: args.pixels_per_cell,
        frame_delay_ms: args.delay_ms,
    };

    let report = invdes::animate(val.view(), outline.as_ref().map(|o| o.view()), &opts)?;
    eprintln!("wrote {}", report.out_path.display());
    Ok(())
}
