use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{ArgAction, CommandFactory, Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use collage_core::config::DEFAULT_OUTPUT;
use collage_core::encode::DEFAULT_JPEG_QUALITY;
use collage_core::{
    build_collage, compute_layout, select_images, write_output, CollageConfig, CollageError,
    DecodePolicy, FilterType, GridConfig, SelectOptions,
};

#[derive(Parser, Debug)]
#[command(
    name = "collage",
    version,
    about = "Tile the images in a directory into a single collage",
    disable_help_flag = true
)]
struct Args {
    /// Directory containing the source images
    directory: Option<PathBuf>,

    /// Number of columns in the grid
    #[arg(long = "cols", value_name = "N", default_value_t = GridConfig::DEFAULT_COLUMNS)]
    columns: u32,

    /// Edge length of each square cell, in pixels
    #[arg(long = "cellsize", value_name = "PX", default_value_t = GridConfig::DEFAULT_CELL_SIZE)]
    cell_size: u32,

    /// Output file; a .jpg extension writes JPEG, anything else PNG
    #[arg(long, value_name = "PATH", default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// JPEG quality
    #[arg(long, default_value_t = DEFAULT_JPEG_QUALITY, value_parser = clap::value_parser!(u8).range(1..=100))]
    quality: u8,

    /// Skip images whose width or height is at most this many pixels
    #[arg(long = "min-size", value_name = "PX", default_value_t = SelectOptions::DEFAULT_MIN_DIMENSION)]
    min_size: u32,

    /// Leave out files that fail to decode instead of aborting
    #[arg(long)]
    skip_invalid: bool,

    /// Ignore EXIF orientation tags
    #[arg(long)]
    no_orientation: bool,

    /// Resampling filter used to scale images into their cells
    #[arg(long, value_enum, default_value_t = Filter::Bilinear)]
    filter: Filter,

    /// Print the computed layout as JSON instead of writing an image
    #[arg(long)]
    plan: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Print help
    #[arg(short = 'h', long = "help", short_alias = '?', action = ArgAction::Help)]
    help: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Filter {
    Nearest,
    Bilinear,
    Lanczos3,
}

impl From<Filter> for FilterType {
    fn from(filter: Filter) -> Self {
        match filter {
            Filter::Nearest => FilterType::Nearest,
            Filter::Bilinear => FilterType::Bilinear,
            Filter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

impl Args {
    fn to_config(&self, directory: PathBuf) -> Result<CollageConfig, CollageError> {
        let mut config = CollageConfig::new(directory);
        config.grid = GridConfig::new(self.columns, self.cell_size)?;
        config.output = self.output.clone();
        config.quality = self.quality;
        config.select.min_dimension = self.min_size;
        config.select.apply_orientation = !self.no_orientation;
        if self.skip_invalid {
            config.select.decode_policy = DecodePolicy::Skip;
        }
        config.render.filter = self.filter.into();
        Ok(config)
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &Args, directory: PathBuf, out: &mut impl Write) -> anyhow::Result<()> {
    let config = args.to_config(directory)?;
    let images = select_images(&config.directory, &config.select).map_err(CollageError::from)?;

    if args.plan {
        let layout = compute_layout(&images, &config.grid)?;
        let plan = layout.plan(|image| image.path().display().to_string());
        let json = serde_json::to_string_pretty(&plan).context("serializing layout plan")?;
        writeln!(out, "{json}")?;
        return Ok(());
    }

    if images.is_empty() {
        return Err(CollageError::NoImages(config.directory).into());
    }

    writeln!(
        out,
        "Creating collage with {} images in {}",
        images.len(),
        config.output.display()
    )?;
    let (bytes, report) = build_collage(&images, &config)?;
    write_output(&config.output, &bytes)?;

    info!(
        output = %config.output.display(),
        width = report.canvas.width,
        height = report.canvas.height,
        "wrote collage"
    );
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    let Some(directory) = args.directory.clone() else {
        // No directory: show usage, same as --help
        let mut command = Args::command();
        println!("{}", command.render_help());
        return ExitCode::SUCCESS;
    };

    match run(&args, directory, &mut io::stdout().lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<CollageError>() {
                Some(e @ (CollageError::DirectoryNotFound(_) | CollageError::NoImages(_))) => {
                    eprintln!("{e}")
                }
                _ => eprintln!("Error: {err:#}"),
            }
            ExitCode::FAILURE
        }
    }
}
