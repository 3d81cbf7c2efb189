use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use gm_core::{GrayImage, Point, Rect, instr};
use log::info;
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(name = "gm")]
#[command(about = "Apply graymap operations to raw PGM images")]
struct Cli {
    /// Log time and pixel/comparison counters for the operation
    #[arg(long, global = true)]
    stats: bool,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print dimensions, maxval and gray-level range as JSON
    Info(InfoArgs),
    Negative(IoArgs),
    Threshold(ThresholdArgs),
    Brighten(BrightenArgs),
    /// Rotate 90 degrees counter-clockwise, `--turns` times
    Rotate(RotateArgs),
    Mirror(IoArgs),
    Crop(CropArgs),
    Paste(PasteArgs),
    Blend(BlendArgs),
    /// Find the first raster-order position of `--needle` and print it as JSON
    Locate(LocateArgs),
    Blur(BlurArgs),
    /// Convert any image format readable by the `image` crate into 8-bit PGM
    Import(IoArgs),
    /// Convert a PGM into the format implied by the output extension
    Export(IoArgs),
}

#[derive(Args, Debug, Clone)]
struct IoArgs {
    #[arg(long, required = true)]
    input: PathBuf,
    #[arg(long, required = true)]
    output: PathBuf,
}

#[derive(Args, Debug, Clone)]
struct InfoArgs {
    #[arg(long, required = true)]
    input: PathBuf,
}

#[derive(Args, Debug, Clone)]
struct ThresholdArgs {
    #[command(flatten)]
    io: IoArgs,
    #[arg(long, default_value_t = 128)]
    level: u8,
}

#[derive(Args, Debug, Clone)]
struct BrightenArgs {
    #[command(flatten)]
    io: IoArgs,
    #[arg(long, default_value_t = 1.0)]
    factor: f64,
}

#[derive(Args, Debug, Clone)]
struct RotateArgs {
    #[command(flatten)]
    io: IoArgs,
    #[arg(long, default_value_t = 1)]
    turns: u8,
}

#[derive(Args, Debug, Clone)]
struct CropArgs {
    #[command(flatten)]
    io: IoArgs,
    #[arg(long, default_value_t = 0)]
    x: usize,
    #[arg(long, default_value_t = 0)]
    y: usize,
    #[arg(long, required = true)]
    width: usize,
    #[arg(long, required = true)]
    height: usize,
}

#[derive(Args, Debug, Clone)]
struct PasteArgs {
    #[command(flatten)]
    io: IoArgs,
    #[arg(long, required = true)]
    overlay: PathBuf,
    #[arg(long, default_value_t = 0)]
    x: usize,
    #[arg(long, default_value_t = 0)]
    y: usize,
}

#[derive(Args, Debug, Clone)]
struct BlendArgs {
    #[command(flatten)]
    paste: PasteArgs,
    #[arg(long, default_value_t = 0.5)]
    alpha: f64,
}

#[derive(Args, Debug, Clone)]
struct LocateArgs {
    #[arg(long, required = true)]
    input: PathBuf,
    #[arg(long, required = true)]
    needle: PathBuf,
}

#[derive(Args, Debug, Clone)]
struct BlurArgs {
    #[command(flatten)]
    io: IoArgs,
    #[arg(long, default_value_t = 1)]
    dx: usize,
    #[arg(long, default_value_t = 1)]
    dy: usize,
}

#[derive(Debug, Clone, Serialize)]
struct InfoDto {
    width: usize,
    height: usize,
    maxval: u8,
    min: Option<u8>,
    max: Option<u8>,
}

#[derive(Debug, Clone, Serialize)]
struct LocateDto {
    found: bool,
    x: Option<usize>,
    y: Option<usize>,
    comparisons: u64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let default_filter = if cli.stats { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let (result, report) = instr::measure(|| run(cli.cmd));
    if cli.stats {
        info!("{report}");
    }
    result
}

fn run(cmd: Command) -> Result<()> {
    match cmd {
        Command::Info(args) => run_info(args),
        Command::Negative(args) => transform(&args, |img| {
            gm_ops::negative(img);
            Ok(())
        }),
        Command::Threshold(args) => transform(&args.io, |img| {
            gm_ops::threshold(img, args.level);
            Ok(())
        }),
        Command::Brighten(args) => {
            check_factor(args.factor)?;
            transform(&args.io, |img| {
                gm_ops::brighten(img, args.factor);
                Ok(())
            })
        }
        Command::Rotate(args) => transform(&args.io, |img| {
            for _ in 0..quarter_turns(args.turns) {
                *img = gm_ops::rotate_ccw90(img).context("rotating image")?;
            }
            Ok(())
        }),
        Command::Mirror(args) => transform(&args, |img| {
            *img = gm_ops::mirror_lr(img).context("mirroring image")?;
            Ok(())
        }),
        Command::Crop(args) => run_crop(args),
        Command::Paste(args) => run_paste(args, None),
        Command::Blend(args) => {
            check_alpha(args.alpha)?;
            run_paste(args.paste, Some(args.alpha))
        }
        Command::Locate(args) => run_locate(args),
        Command::Blur(args) => transform(&args.io, |img| {
            gm_blur::blur(img, args.dx, args.dy).context("blurring image")
        }),
        Command::Import(args) => run_import(args),
        Command::Export(args) => run_export(args),
    }
}

fn transform(io: &IoArgs, op: impl FnOnce(&mut GrayImage) -> Result<()>) -> Result<()> {
    let mut img = load_pgm(&io.input)?;
    op(&mut img)?;
    save_pgm(&io.output, &img)
}

fn run_info(args: InfoArgs) -> Result<()> {
    let img = load_pgm(&args.input)?;
    let stats = img.stats();
    print_json(&InfoDto {
        width: img.width(),
        height: img.height(),
        maxval: img.maxval(),
        min: stats.map(|(min, _)| min),
        max: stats.map(|(_, max)| max),
    })
}

fn run_crop(args: CropArgs) -> Result<()> {
    let img = load_pgm(&args.io.input)?;
    let rect = Rect::new(args.x, args.y, args.width, args.height);
    check_fits(&img, rect, "crop rectangle")?;
    let out = gm_ops::crop(&img, rect).context("cropping image")?;
    save_pgm(&args.io.output, &out)
}

fn run_paste(args: PasteArgs, alpha: Option<f64>) -> Result<()> {
    let mut img = load_pgm(&args.io.input)?;
    let overlay = load_pgm(&args.overlay)?;
    let at = Point::new(args.x, args.y);
    check_fits(&img, Rect::at(at, overlay.width(), overlay.height()), "overlay")?;

    match alpha {
        Some(alpha) => gm_ops::blend(&mut img, at, &overlay, alpha),
        None => gm_ops::paste(&mut img, at, &overlay),
    }
    save_pgm(&args.io.output, &img)
}

fn run_locate(args: LocateArgs) -> Result<()> {
    let img = load_pgm(&args.input)?;
    let needle = load_pgm(&args.needle)?;

    let (found, report) = instr::measure(|| gm_match::locate(&img, &needle));
    print_json(&LocateDto {
        found: found.is_some(),
        x: found.map(|p| p.x),
        y: found.map(|p| p.y),
        comparisons: report.counters.comparisons,
    })
}

fn run_import(args: IoArgs) -> Result<()> {
    let luma = image::open(&args.input)
        .with_context(|| format!("opening input image {}", args.input.display()))?
        .to_luma8();
    let (w, h) = luma.dimensions();
    let img = GrayImage::from_vec(w as usize, h as usize, gm_core::PIX_MAX, luma.into_raw())
        .with_context(|| format!("constructing gray image from {}", args.input.display()))?;
    save_pgm(&args.output, &img)
}

fn run_export(args: IoArgs) -> Result<()> {
    let img = load_pgm(&args.input)?;
    let (w, h) = img.dims();
    let gray = image::GrayImage::from_raw(w as u32, h as u32, export_levels(&img))
        .context("constructing GrayImage from raw bytes")?;
    gray.save(&args.output)
        .with_context(|| format!("saving image {}", args.output.display()))
}

fn check_factor(factor: f64) -> Result<()> {
    if factor.is_nan() || factor < 0.0 {
        bail!("brighten factor must be >= 0, got {factor}.");
    }
    Ok(())
}

fn check_alpha(alpha: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&alpha) {
        bail!("blend alpha must be in [0, 1], got {alpha}.");
    }
    Ok(())
}

fn check_fits(img: &GrayImage, rect: Rect, what: &str) -> Result<()> {
    if !img.valid_rect(&rect) {
        bail!(
            "{what} {}x{} at ({}, {}) does not fit inside the {}x{} input.",
            rect.width,
            rect.height,
            rect.x,
            rect.y,
            img.width(),
            img.height()
        );
    }
    Ok(())
}

fn quarter_turns(turns: u8) -> u8 {
    turns % 4
}

/// Samples rescaled from `0..=maxval` to the full `0..=255` range.
fn export_levels(img: &GrayImage) -> Vec<u8> {
    let scale = 255.0 / f64::from(img.maxval());
    img.data()
        .iter()
        .map(|&v| gm_ops::round_to_level(f64::from(v) * scale))
        .collect()
}

fn load_pgm(path: &Path) -> Result<GrayImage> {
    gm_pgm::load(path).with_context(|| format!("loading PGM {}", path.display()))
}

fn save_pgm(path: &Path, img: &GrayImage) -> Result<()> {
    gm_pgm::save(img, path).with_context(|| format!("saving PGM {}", path.display()))
}

fn print_json(value: &impl Serialize) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("serializing json")?;
    println!("{text}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use gm_core::{GrayImage, Point, Rect};

    use super::{
        Cli, Command, check_alpha, check_factor, check_fits, export_levels, quarter_turns,
    };

    #[test]
    fn factor_must_be_non_negative_number() {
        assert!(check_factor(0.0).is_ok());
        assert!(check_factor(2.5).is_ok());
        assert!(check_factor(-0.1).is_err());
        assert!(check_factor(f64::NAN).is_err());
    }

    #[test]
    fn alpha_must_lie_in_unit_interval() {
        assert!(check_alpha(0.0).is_ok());
        assert!(check_alpha(1.0).is_ok());
        assert!(check_alpha(1.01).is_err());
        assert!(check_alpha(-0.5).is_err());
        assert!(check_alpha(f64::NAN).is_err());
    }

    #[test]
    fn rectangles_must_fit_input() {
        let img = GrayImage::new(4, 3, 255).expect("valid image");
        assert!(check_fits(&img, Rect::new(1, 1, 3, 2), "crop rectangle").is_ok());
        assert!(check_fits(&img, Rect::at(Point::new(4, 3), 0, 0), "overlay").is_ok());

        let err = check_fits(&img, Rect::new(2, 0, 3, 1), "overlay").expect_err("overhang");
        assert!(err.to_string().contains("4x3"), "{err}");
        assert!(check_fits(&img, Rect::new(usize::MAX, 0, 2, 1), "overlay").is_err());
    }

    #[test]
    fn turns_wrap_modulo_four() {
        assert_eq!(quarter_turns(0), 0);
        assert_eq!(quarter_turns(3), 3);
        assert_eq!(quarter_turns(4), 0);
        assert_eq!(quarter_turns(6), 2);
        assert_eq!(quarter_turns(255), 3);
    }

    #[test]
    fn export_stretches_to_full_range() {
        let img = GrayImage::from_vec(3, 1, 2, vec![0, 1, 2]).expect("valid image");
        // 127.5 -> 128
        assert_eq!(export_levels(&img), vec![0, 128, 255]);

        let full = GrayImage::from_vec(2, 1, 255, vec![7, 200]).expect("valid image");
        assert_eq!(export_levels(&full), vec![7, 200]);
    }

    #[test]
    fn parses_rotate_and_global_stats_flag() {
        let cli = Cli::try_parse_from([
            "gm", "rotate", "--input", "a.pgm", "--output", "b.pgm", "--turns", "5", "--stats",
        ])
        .expect("valid arguments");
        assert!(cli.stats);
        match cli.cmd {
            Command::Rotate(args) => assert_eq!(quarter_turns(args.turns), 1),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn blend_requires_overlay() {
        let res = Cli::try_parse_from(["gm", "blend", "--input", "a.pgm", "--output", "b.pgm"]);
        assert!(res.is_err());
    }
}
