use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context as _;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use panosplit::{
    BatchRunner, ConsoleProgress, FfmpegProjector, FfmpegProjectorOpts, Interactive, Quality,
    RunOpts, ViewParams,
};

/// Split an equirectangular panorama into 72 rectilinear views (3 pitch rings x 24 yaw steps).
#[derive(Parser, Debug)]
#[command(name = "panosplit", version)]
struct Cli {
    /// Input panorama (.jpg, .jpeg, .png, .bmp, .tiff). Omit to enter interactive mode.
    input: Option<PathBuf>,

    /// Output width in pixels.
    #[arg(short = 'w', long, default_value_t = 1280)]
    width: u32,

    /// Output height in pixels.
    #[arg(long, default_value_t = 720)]
    height: u32,

    /// JPEG quality passed to ffmpeg `-q:v` (1-10, lower is better).
    #[arg(short = 'q', long, default_value_t = 2)]
    quality: u8,

    /// Horizontal field of view in degrees.
    #[arg(long = "h-fov", default_value_t = 130.0)]
    h_fov: f64,

    /// Vertical field of view in degrees.
    #[arg(long = "v-fov", default_value_t = 120.0)]
    v_fov: f64,

    /// Prompt for the input and parameters.
    #[arg(short = 'i', long)]
    interactive: bool,

    /// Explicit ffmpeg executable.
    #[arg(long, env = "PANOSPLIT_FFMPEG")]
    ffmpeg: Option<PathBuf>,

    /// Root directory; views land in `<output-root>/<input stem>/`.
    #[arg(long, env = "PANOSPLIT_OUTPUT_ROOT", default_value = "output")]
    output_root: PathBuf,

    /// Per-view ffmpeg time limit in seconds.
    #[arg(long, env = "PANOSPLIT_TIMEOUT_SECS", default_value_t = 30)]
    timeout_secs: u64,

    /// Check that every produced image has the requested dimensions.
    #[arg(long, default_value_t = false)]
    verify_output: bool,

    /// Project views concurrently.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long)]
    threads: Option<usize>,

    /// Also write the batch report as JSON to this path.
    #[arg(long)]
    report_json: Option<PathBuf>,
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let tool = panosplit::locate_ffmpeg(cli.ffmpeg.as_deref())?;
    let projector = FfmpegProjector::new(FfmpegProjectorOpts {
        timeout: Duration::from_secs(cli.timeout_secs),
        verify_dimensions: cli.verify_output,
        ..FfmpegProjectorOpts::new(tool)
    })?;
    let runner = BatchRunner::with_opts(
        projector,
        RunOpts {
            parallel: cli.parallel,
            threads: cli.threads,
        },
    )?;

    let params = ViewParams {
        h_fov: cli.h_fov,
        v_fov: cli.v_fov,
        width: cli.width,
        height: cli.height,
        quality: Quality::new(cli.quality)?,
    };

    let input = match cli.input {
        Some(input) if !cli.interactive => input,
        _ => {
            let stdin = std::io::stdin();
            let mut session = Interactive::new(stdin.lock(), std::io::stdout(), params);
            session.run(|source, params| {
                let report = panosplit::split_panorama(
                    source,
                    &cli.output_root,
                    params,
                    &runner,
                    &mut ConsoleProgress::stderr(),
                )?;
                Ok(report.is_success())
            })?;
            return Ok(ExitCode::SUCCESS);
        }
    };

    eprintln!("panosplit: {}", input.display());
    eprintln!(
        "parameters: {}x{}, quality={}, FOV={}°x{}°",
        params.width, params.height, params.quality, params.h_fov, params.v_fov
    );

    let report = panosplit::split_panorama(
        &input,
        &cli.output_root,
        &params,
        &runner,
        &mut ConsoleProgress::stderr(),
    )?;

    if let Some(path) = &cli.report_json {
        std::fs::write(path, report.to_json()?)
            .with_context(|| format!("write report '{}'", path.display()))?;
    }

    Ok(if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
