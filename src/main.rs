use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use memboxd::{config::BoxConfig, rest, AppContext};
use tracing::info;

#[derive(Parser)]
#[command(
    name = "memboxd",
    about = "Memory Box — self-hosted keepsake server with AI letter polishing",
    version
)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// HTTP server port
    #[arg(long, env = "MEMBOX_PORT")]
    port: Option<u16>,

    /// Data directory for the memory blob and config.toml
    #[arg(long, env = "MEMBOX_DATA_DIR")]
    data_dir: Option<std::path::PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "MEMBOX_LOG")]
    log: Option<String>,

    /// Log output format: "pretty" (default, human-readable) | "json"
    /// (structured for log aggregators)
    #[arg(long, env = "MEMBOX_LOG_FORMAT")]
    log_format: Option<String>,

    /// Bind address (default: 127.0.0.1; use 0.0.0.0 for LAN access)
    #[arg(long, env = "MEMBOX_BIND")]
    bind_address: Option<String>,

    /// Directory of single-page-app assets to serve alongside the API
    #[arg(long, env = "MEMBOX_ASSETS")]
    assets_dir: Option<std::path::PathBuf>,

    /// Write logs to this file path (rotated daily). Optional.
    #[arg(long, env = "MEMBOX_LOG_FILE")]
    log_file: Option<std::path::PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Start the server (default when no subcommand given).
    ///
    /// Runs memboxd in the foreground.
    ///
    /// Examples:
    ///   memboxd serve
    ///   memboxd
    Serve,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config first — {data_dir}/config.toml may set the log filter/format.
    let config = BoxConfig::new(
        args.port,
        args.data_dir,
        args.log,
        args.log_format,
        args.bind_address,
        args.assets_dir,
    );

    // ── Logging setup ────────────────────────────────────────────────────────
    // Init once — must happen before any tracing calls.
    let _file_guard = setup_logging(&config.log, args.log_file.as_deref(), &config.log_format);

    match args.command {
        None | Some(Command::Serve) => {
            run_server(config).await?;
        }
    }

    Ok(())
}

async fn run_server(config: BoxConfig) -> Result<()> {
    tokio::fs::create_dir_all(&config.data_dir)
        .await
        .with_context(|| format!("creating data dir {}", config.data_dir.display()))?;

    if config.gemini_api_key.is_none() {
        info!("GEMINI_API_KEY not set — letter enhancement will answer 500 until configured");
    }

    let ctx = AppContext::init(config).await?;
    rest::start_rest_server(ctx).await
}

/// Initialize the tracing subscriber.
/// If `log_file` is set, logs go to both stdout and a daily-rolling file.
/// Returns a `WorkerGuard` that must stay alive for the process lifetime.
///
/// `log_format` may be `"pretty"` (default, human-readable compact format) or
/// `"json"` (structured JSON for log aggregators).
///
/// If the log directory cannot be created, falls back to stdout-only logging
/// with a warning — never panics.
fn setup_logging(
    log_level: &str,
    log_file: Option<&std::path::Path>,
    log_format: &str,
) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let use_json = log_format == "json";

    if let Some(path) = log_file {
        let dir = path.parent().unwrap_or_else(|| std::path::Path::new("."));
        let filename = path
            .file_name()
            .unwrap_or_else(|| std::ffi::OsStr::new("memboxd.log"));

        // Ensure the directory exists before tracing-appender tries to open it.
        if let Err(e) = std::fs::create_dir_all(dir) {
            // Fall back to stdout-only — don't panic on a bad log path.
            eprintln!(
                "warn: could not create log directory '{}': {e} — falling back to stdout",
                dir.display()
            );
            if use_json {
                tracing_subscriber::fmt().json().with_env_filter(log_level).init();
            } else {
                tracing_subscriber::fmt().with_env_filter(log_level).compact().init();
            }
            return None;
        }

        let appender = tracing_appender::rolling::daily(dir, filename);
        let (non_blocking, guard) = tracing_appender::non_blocking(appender);

        if use_json {
            tracing_subscriber::registry()
                .with(EnvFilter::new(log_level))
                .with(fmt::layer().json())
                .with(fmt::layer().json().with_writer(non_blocking))
                .init();
        } else {
            tracing_subscriber::registry()
                .with(EnvFilter::new(log_level))
                .with(fmt::layer().compact())
                .with(fmt::layer().with_writer(non_blocking))
                .init();
        }

        Some(guard)
    } else if use_json {
        tracing_subscriber::fmt().json().with_env_filter(log_level).init();
        None
    } else {
        tracing_subscriber::fmt().with_env_filter(log_level).compact().init();
        None
    }
}
