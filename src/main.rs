use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chartscore::models::{AppConfig, ManualCalibrationConfig, ModeName};
use chartscore::server;
use chartscore::services::{AnalysisRequest, AnalysisService, DimensionPolicy};

#[derive(Parser)]
#[command(name = "chartscore")]
#[command(about = "Extract per-topic scores from exam-score chart images")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a chart image and print the scores
    Analyze {
        /// PNG or JPEG chart image
        image: PathBuf,

        /// Calibration mode: fixed, grid, strict-grid or manual
        #[arg(short, long, default_value = "fixed")]
        mode: ModeName,

        /// Manual calibration file (YAML, or JSON by extension)
        #[arg(short, long)]
        calibration: Option<PathBuf>,

        /// Configuration file (overrides CONFIG_FILE)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Write the debug overlay PNG here
        #[arg(short, long)]
        debug_image: Option<PathBuf>,

        /// Print the report as JSON instead of a table
        #[arg(long)]
        json: bool,

        /// Fail when the image is not one of the accepted upload sizes
        #[arg(long)]
        enforce_dimensions: bool,
    },
    /// Start the HTTP server
    Serve {
        /// Configuration file (overrides CONFIG_FILE)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Analyze {
            image,
            mode,
            calibration,
            config,
            debug_image,
            json,
            enforce_dimensions,
        }) => run_analyze_command(
            &image,
            mode,
            calibration.as_deref(),
            config.as_deref(),
            debug_image.as_deref(),
            json,
            enforce_dimensions,
        ),
        Some(Commands::Serve { config }) => run_server(config.as_deref()).await,
        None => {
            run_status_command();
            Ok(())
        }
    }
}

/// Analyze one image from disk (no server needed)
fn run_analyze_command(
    image: &Path,
    mode: ModeName,
    calibration: Option<&Path>,
    config: Option<&Path>,
    debug_image: Option<&Path>,
    json: bool,
    enforce_dimensions: bool,
) -> anyhow::Result<()> {
    // Minimal logging for CLI
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chartscore=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time().with_writer(std::io::stderr))
        .init();

    let service = AnalysisService::new(AppConfig::load_optional(config));

    let manual = match calibration {
        Some(path) => Some(ManualCalibrationConfig::load(path)?.into()),
        None if mode == ModeName::Manual => Some(ManualCalibrationConfig::default().into()),
        None => None,
    };
    if calibration.is_some() && mode != ModeName::Manual {
        tracing::warn!(%mode, "Calibration file ignored outside manual mode");
    }

    let request = AnalysisRequest {
        mode: service.config().mode(mode, manual)?,
        include_debug_image: debug_image.is_some(),
        enforce_dimensions: enforce_dimensions
            || service.enforce_dimensions(None, false),
    };

    let bytes = std::fs::read(image)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", image.display()))?;
    let report = service.analyze_blocking(&bytes, &request)?;

    if let (Some(path), Some(png_bytes)) = (debug_image, report.debug_image_png.as_ref()) {
        std::fs::write(path, png_bytes)?;
        eprintln!("Wrote debug image {} ({} bytes)", path.display(), png_bytes.len());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.format_table());
    }

    Ok(())
}

/// Display status and configuration information
fn run_status_command() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let bind_addr = std::env::var("BIND_ADDR").ok();
    let config_file = std::env::var("CONFIG_FILE").ok();
    let rust_log = std::env::var("RUST_LOG").ok();

    println!("Chartscore v{VERSION}");
    println!("Per-topic score extraction from exam-score charts\n");

    println!("Environment Variables:");
    println!(
        "  BIND_ADDR   = {}",
        bind_addr.as_deref().unwrap_or("0.0.0.0:3000 (default)")
    );
    println!(
        "  CONFIG_FILE = {}",
        config_file.as_deref().unwrap_or("(not set)")
    );
    println!(
        "  RUST_LOG    = {}",
        rust_log.as_deref().unwrap_or("(not set)")
    );

    let config_source = match config_file {
        Some(ref path) if Path::new(path).exists() => path.to_string(),
        Some(_) => "built-in defaults (file not found)".to_string(),
        None => "built-in defaults".to_string(),
    };
    println!("\nConfiguration: {config_source}");

    let config = AppConfig::load_optional(None);
    let policy = DimensionPolicy::from(&config.upload);
    println!(
        "  Template:    {}x{} (0% at y={}, 100% at y={})",
        config.template.base_width,
        config.template.base_height,
        config.template.y_zero,
        config.template.y_hundred
    );
    println!(
        "  Uploads:     {} (±{}%)",
        policy
            .accepted_sizes()
            .iter()
            .map(|(w, h)| format!("{w}×{h}"))
            .collect::<Vec<_>>()
            .join(", "),
        policy.tolerance_percent
    );

    println!("\nCommands:");
    println!("  chartscore analyze <IMAGE>   Print the scores of a chart image");
    println!("  chartscore serve             Start the HTTP server");
    println!("\nRun 'chartscore --help' for more details.");
}

/// Run the HTTP server
async fn run_server(config: Option<&Path>) -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chartscore=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

    let state = server::create_app_state(AppConfig::load_optional(config));
    let app = server::build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "Chartscore server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
