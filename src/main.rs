//! Auromix Sensors CLI
//!
//! Command-line interface for inspecting cameras and marker
//! configurations. Runs against the simulated depth camera.

use auro_sensors::{
    camera::{BasicCamera, FileConfig, SaveOptions, SimulatedCamera, StreamKind},
    markers::MarkerConfig,
    preview,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{error, info, warn};

type CliResult = Result<(), Box<dyn std::error::Error>>;

#[derive(Debug, Parser)]
#[command(name = "auro-sensors", version, about = "Camera and marker tooling")]
struct Cli {
    /// TOML configuration file ([camera], [markers], [stream] tables).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the intrinsics of one stream.
    Intrinsics {
        #[arg(long, default_value = "color")]
        stream: StreamKind,
    },
    /// Capture one frame per stream and save them as images.
    Save {
        #[arg(long, default_value = "")]
        prefix: String,
        #[arg(long, default_value = ".png")]
        suffix: String,
    },
    /// Poll frames until Ctrl-C or the frame limit.
    Stream {
        /// Frames to poll (0 runs until interrupted); overrides the config file.
        #[arg(long)]
        frames: Option<u64>,
        /// Write a preview mosaic every N frames; overrides the config file.
        #[arg(long)]
        preview_every: Option<u64>,
    },
    /// Validate and list marker definitions.
    Markers {
        /// JSON marker file; defaults to the [markers] table of the config.
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();
    info!("Auromix Sensors v{}", auro_sensors::VERSION);

    let config = match &cli.config {
        Some(path) => match FileConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load config {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => FileConfig::default(),
    };

    let result = match cli.command {
        Command::Intrinsics { stream } => print_intrinsics(&config, stream),
        Command::Save { prefix, suffix } => save_frames(&config, SaveOptions { prefix, suffix }),
        Command::Stream {
            frames,
            preview_every,
        } => stream_frames(
            &config,
            frames.unwrap_or(config.stream.frame_limit),
            preview_every.unwrap_or(config.stream.preview_every),
        ),
        Command::Markers { file } => list_markers(&config, file),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn print_intrinsics(config: &FileConfig, stream: StreamKind) -> CliResult {
    let camera = SimulatedCamera::connect(&config.camera)?;
    let intrinsics = camera.get_intrinsics_for(stream)?;

    println!("{}", intrinsics);
    println!(
        "fx={} fy={} ppx={} ppy={}",
        intrinsics.fx, intrinsics.fy, intrinsics.ppx, intrinsics.ppy
    );
    println!("distortion coefficients: {:?}", intrinsics.coeffs);
    for row in intrinsics.intrinsics_matrix() {
        println!("{:?}", row);
    }
    Ok(())
}

fn save_frames(config: &FileConfig, options: SaveOptions) -> CliResult {
    let mut camera = SimulatedCamera::connect(&config.camera)?;
    camera.start()?;

    let frames = [
        ("color", camera.get_color(true)?),
        ("depth", camera.get_depth(None)?),
        ("ir1", camera.get_ir(1)?),
        ("ir2", camera.get_ir(2)?),
    ];
    for (name, frame) in &frames {
        let path = camera.save_data(frame, name, &options)?;
        println!("{}", path.display());
    }

    camera.stop()?;
    Ok(())
}

fn stream_frames(config: &FileConfig, frame_limit: u64, preview_every: u64) -> CliResult {
    let running = Arc::new(AtomicBool::new(true));
    let flag = running.clone();
    ctrlc::set_handler(move || flag.store(false, Ordering::SeqCst))?;

    let mut camera = SimulatedCamera::connect(&config.camera)?;
    camera.start()?;

    let save_directory = &config.camera.camera_data_save_directory;
    if preview_every > 0 && !save_directory.as_os_str().is_empty() {
        std::fs::create_dir_all(save_directory)?;
    }

    let tile_width = config.stream.preview_tile_width.max(1);
    let tile_height = (u64::from(tile_width) * 9 / 16).max(1) as u32;
    let mut polled = 0u64;

    while running.load(Ordering::SeqCst) && (frame_limit == 0 || polled < frame_limit) {
        let frames = match camera.get_current_frames() {
            Ok(frames) => frames,
            Err(e) => {
                error!("An error occurred while polling frames: {}", e);
                break;
            }
        };
        polled += 1;
        tracing::debug!(sequence = frames.color.sequence(), "Polled frame set");

        if preview_every > 0 && polled % preview_every == 0 {
            let path = save_directory.join(format!("preview_{:06}.png", frames.color.sequence()));
            let written = preview::compose_frame_set(&frames, tile_width, tile_height)
                .and_then(|mosaic| mosaic.save(&path).map_err(Into::into));
            if let Err(e) = written {
                warn!("Failed to write preview {}: {}", path.display(), e);
            }
        }
    }

    info!("Polled {} frame sets", polled);
    camera.stop()?;
    Ok(())
}

fn list_markers(config: &FileConfig, file: Option<PathBuf>) -> CliResult {
    let markers = match file {
        Some(path) => MarkerConfig::from_json_file(path)?,
        None => config.markers.clone(),
    };

    if markers.is_empty() {
        warn!("No markers configured");
        return Ok(());
    }

    for spec in markers.iter() {
        println!(
            "{}: {} id={} size={}m",
            spec.marker_name, spec.dictionary_name, spec.marker_id, spec.marker_size
        );
    }
    Ok(())
}
