//! drawbridge server entry point.
//!
//! ```text
//! drawbridge-srv                     Serve stdin/stdout, draw data on fd 3
//! drawbridge-srv --draw-fd <n>       Read and write draw data on fd n
//! drawbridge-srv --loopback-draw     Keep draw data in memory
//! drawbridge-srv --config <path>     Load a custom config TOML
//! drawbridge-srv --gen-config        Write default config to stdout
//! ```
//!
//! Exits 0 when the client closes stdin, 1 on any fatal protocol error.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, info_span};
use tracing_subscriber::EnvFilter;

use drawbridge_core::{
    DrawChannel, DrawError, HeadlessBackend, LoopbackDrawChannel, ServeStats, Server,
};
use drawbridge_srv::config::SrvConfig;

// ── CLI ──────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "drawbridge-srv", about = "Window-system bridge for graphics clients")]
struct Cli {
    /// Path to configuration TOML file.
    #[arg(short, long, default_value = "drawbridge.toml")]
    config: PathBuf,

    /// File descriptor carrying draw data (overrides the config).
    #[arg(long)]
    draw_fd: Option<i32>,

    /// Keep draw data in an in-memory loopback instead of a descriptor.
    #[arg(long)]
    loopback_draw: bool,

    /// Name attached to every log line, to tell sessions apart.
    #[arg(long, default_value = "drawbridge")]
    label: String,

    /// Print the default configuration to stdout and exit.
    #[arg(long)]
    gen_config: bool,
}

// ── Main ─────────────────────────────────────────────────────────

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // --gen-config: dump defaults and exit.
    if cli.gen_config {
        let text = toml::to_string_pretty(&SrvConfig::default())?;
        println!("{text}");
        return Ok(ExitCode::SUCCESS);
    }

    let mut config = SrvConfig::load(&cli.config);
    if let Some(fd) = cli.draw_fd {
        config.channels.draw_fd = fd;
    }
    if cli.loopback_draw {
        config.channels.loopback_draw = true;
    }

    // stdout carries replies, so logs go to stderr.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let span = info_span!("session", label = %cli.label);
    let _enter = span.enter();
    info!("drawbridge-srv v{}", env!("CARGO_PKG_VERSION"));

    let result = if config.channels.loopback_draw {
        info!("draw data: loopback");
        serve(&config, LoopbackDrawChannel::new())
    } else {
        serve_fd(&config)
    };

    match result {
        Ok(stats) => {
            info!(requests = stats.requests, errors = stats.errors, "done");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            error!("fatal: {e}");
            eprintln!("drawbridge-srv: {e}");
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Run the server over stdin/stdout with the given draw channel.
fn serve<D: DrawChannel>(config: &SrvConfig, draw: D) -> Result<ServeStats, DrawError> {
    let stdin = std::io::stdin().lock();
    let stdout = std::io::stdout().lock();
    Server::new(stdin, stdout, HeadlessBackend::new(), draw)
        .with_settings(config.to_handler_settings())
        .run()
}

#[cfg(unix)]
fn serve_fd(config: &SrvConfig) -> Result<ServeStats, DrawError> {
    use std::fs::File;
    use std::os::fd::FromRawFd;

    use drawbridge_core::StreamDrawChannel;

    let fd = config.channels.draw_fd;
    if fd <= 2 {
        return Err(DrawError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("draw fd {fd} collides with a standard stream"),
        )));
    }
    info!(fd, "draw data: descriptor");
    // SAFETY: the descriptor is inherited from the parent for our exclusive
    // use and is not owned by anything else in this process.
    let file = unsafe { File::from_raw_fd(fd) };
    serve(config, StreamDrawChannel::new(file))
}

#[cfg(not(unix))]
fn serve_fd(config: &SrvConfig) -> Result<ServeStats, DrawError> {
    tracing::warn!(
        fd = config.channels.draw_fd,
        "descriptor draw channels need a unix host; using loopback"
    );
    serve(config, LoopbackDrawChannel::new())
}
