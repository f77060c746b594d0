use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

use clap::Parser;

use ar_capture_core::capture::domain::capture_error::CaptureError;
use ar_capture_core::capture::frame_capture_service::{CaptureOutcome, FrameCaptureService};
use ar_capture_core::capture::infrastructure::gpu_context::GpuContext;
use ar_capture_core::capture::infrastructure::image_file_writer::ImageFileWriter;
use ar_capture_core::capture::infrastructure::texture_frame_source::TextureFrameSource;
use ar_capture_core::capture::infrastructure::wgpu_capture_backend::{
    ReadbackMode, WgpuCaptureBackend,
};
use ar_capture_core::shared::capture_config::{CaptureConfig, ErrorPolicy, ImageFormat};
use ar_capture_core::shared::frame::Frame;
use ar_capture_core::shared::output_dir::default_output_dir;
use ar_capture_core::shared::settings::CaptureSettings;

/// Capture a background image through the GPU to an image file.
#[derive(Parser)]
#[command(name = "ar-capture")]
struct Cli {
    /// Image used as the camera background.
    background: PathBuf,

    /// Output filename, relative to the output directory.
    #[arg(long)]
    filename: Option<String>,

    /// Output encoding: exr, jpeg or png. Defaults to the filename's extension.
    #[arg(long)]
    format: Option<String>,

    /// Directory captures are written to.
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Capture width in pixels (defaults to the background width).
    #[arg(long)]
    width: Option<u32>,

    /// Capture height in pixels (defaults to the background height).
    #[arg(long)]
    height: Option<u32>,

    /// Use the blocking readback path instead of async readback.
    #[arg(long)]
    sync: bool,

    /// Skip silently instead of failing on missing inputs or readback errors.
    #[arg(long)]
    lenient: bool,

    /// Persist the effective filename, format and policy as the new defaults.
    #[arg(long)]
    save_settings: bool,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let mut settings = CaptureSettings::load();
    apply_overrides(&cli, &mut settings)?;
    if cli.save_settings {
        settings.save();
    }

    let background = load_background(&cli.background)?;
    let width = cli.width.unwrap_or(background.width());
    let height = cli.height.unwrap_or(background.height());

    let ctx = Arc::new(GpuContext::try_new()?);
    let mode = if settings.blocking_readback {
        ReadbackMode::Blocking
    } else {
        ReadbackMode::Async
    };
    log::info!("Capturing {width}x{height} with {mode:?} readback");

    let source = TextureFrameSource::from_frame(ctx.clone(), &background)?;
    let mut backend = WgpuCaptureBackend::new(ctx, width, height)?.with_readback_mode(mode);
    backend.bind_source(Arc::new(source));

    let output_dir = match &settings.output_dir {
        Some(dir) => dir.clone(),
        None => default_output_dir()?,
    };
    let mut service = FrameCaptureService::new(
        Box::new(backend),
        Box::new(ImageFileWriter::new()),
        output_dir,
    );

    let config = settings.capture_config();
    let outcome = match service.capture(&config)? {
        CaptureOutcome::Pending => service.wait()?,
        outcome => outcome,
    };
    report(outcome);
    Ok(())
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.background.exists() {
        return Err(format!("Background image not found: {}", cli.background.display()).into());
    }
    if cli.width == Some(0) || cli.height == Some(0) {
        return Err("Capture width and height must be positive".into());
    }
    Ok(())
}

fn apply_overrides(cli: &Cli, settings: &mut CaptureSettings) -> Result<(), CaptureError> {
    if let Some(filename) = &cli.filename {
        settings.filename = filename.clone();
        if cli.format.is_none() {
            settings.format = ImageFormat::from_path(Path::new(filename))?;
        }
    }
    if let Some(format) = &cli.format {
        settings.format = format.parse()?;
    }
    if let Some(dir) = &cli.output_dir {
        settings.output_dir = Some(dir.clone());
    }
    if cli.sync {
        settings.blocking_readback = true;
    }
    if cli.lenient {
        settings.policy = ErrorPolicy::Lenient;
    }
    Ok(())
}

fn load_background(path: &Path) -> Result<Frame, Box<dyn std::error::Error>> {
    let img = image::open(path)?.to_rgb8();
    let (width, height) = img.dimensions();
    Ok(Frame::new(img.into_raw(), width, height))
}

fn report(outcome: CaptureOutcome) {
    match outcome {
        CaptureOutcome::Written(path) => println!("{}", path.display()),
        CaptureOutcome::Skipped(reason) => eprintln!("Capture skipped: {reason}"),
        CaptureOutcome::Aborted => eprintln!("Capture aborted, nothing written"),
        CaptureOutcome::Idle | CaptureOutcome::Pending => {}
    }
}
