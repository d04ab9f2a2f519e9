//! Companion Host - headless console front end
//!
//! Runs the host with console windows: worker output and replies are written
//! as JSON lines to stdout, requests are read as JSON lines from stdin, and
//! logs go to stderr.

use std::env;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error, info, warn};

use companion_host::console::{stdout_writer, ConsoleSurface, HeadlessDesktop};
use companion_host::{Config, Host, HostEvent, HostRequest, WindowRole, WindowSurface};

/// Command line options
#[derive(Debug, Default)]
struct AppArgs {
    /// Configuration file path
    config_path: Option<PathBuf>,
    /// Enable debug logging
    debug: bool,
    /// Do not start the worker on launch
    no_autostart: bool,
}

impl AppArgs {
    /// Parse command line arguments
    fn parse() -> Result<Self> {
        let args: Vec<String> = env::args().collect();
        let mut app_args = AppArgs::default();

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--config" | "-c" => {
                    if i + 1 < args.len() {
                        app_args.config_path = Some(PathBuf::from(&args[i + 1]));
                        i += 1;
                    } else {
                        anyhow::bail!("Missing config file path");
                    }
                }
                "--debug" | "-d" => {
                    app_args.debug = true;
                }
                "--no-autostart" => {
                    app_args.no_autostart = true;
                }
                "--help" | "-h" => {
                    print_help();
                    process::exit(0);
                }
                "--version" | "-v" => {
                    println!("{} v{} ({})", companion_host::NAME, companion_host::VERSION, companion_host::commit_hash());
                    process::exit(0);
                }
                arg if arg.starts_with('-') => {
                    anyhow::bail!("Unknown option: {}", arg);
                }
                _ => {
                    eprintln!("Ignoring positional argument: {}", args[i]);
                }
            }
            i += 1;
        }

        Ok(app_args)
    }
}

/// Print help information
fn print_help() {
    println!("{} - {}", companion_host::NAME, companion_host::DESCRIPTION);
    println!();
    println!("USAGE:");
    println!("    companion-host [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -c, --config <PATH>    Path to configuration file");
    println!("    -d, --debug            Enable debug logging");
    println!("        --no-autostart     Wait for a start_process request");
    println!("    -h, --help             Print this help message");
    println!("    -v, --version          Print version information");
    println!();
    println!("CONFIGURATION:");
    println!("    Configuration files are looked up in the following order:");
    println!("    1. Path specified with --config");
    println!("    2. $COMPANION_HOST_CONFIG");
    println!("    3. <config dir>/companion-host/config.{{toml,json}}");
    println!("    4. ~/.companion-host.{{toml,json}}");
    println!("    5. ./companion-host.{{toml,json}}");
    println!("    6. Built-in defaults");
    println!();
    println!("ENVIRONMENT:");
    println!("    COMPANION_HOST_CONFIG  Path to configuration file");
    println!("    COMPANION_HOST_DEBUG   Enable debug logging (1 or true)");
    println!("    RUST_LOG               Log filter (overrides config and --debug)");
}

fn load_configuration(args: &AppArgs) -> Result<Config> {
    let config = match &args.config_path {
        Some(path) => companion_host::init_with_config(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => companion_host::init().context("Failed to load configuration")?,
    };
    Ok(config)
}

fn init_logging(args: &AppArgs, config: &Config) {
    let debug_env = env::var("COMPANION_HOST_DEBUG").is_ok_and(|v| v == "1" || v.eq_ignore_ascii_case("true"));
    let fallback = if args.debug || debug_env {
        "debug".to_string()
    } else {
        config.logging.filter.clone()
    };

    let env_filter = env::var("RUST_LOG").unwrap_or(fallback);
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(env_filter))
        .with_writer(std::io::stderr)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();
}

/// Dispatch requests read from stdin until it closes
async fn read_requests(host: Arc<Host>, primary: Arc<ConsoleSurface>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                error!("Failed to read request: {}", e);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let reply = match serde_json::from_str::<HostRequest>(&line) {
            Ok(request) => {
                let name = request.name();
                let outcome = host.dispatch(request).await;
                if let Err(e) = &outcome {
                    warn!("Request {} failed: {}", name, e);
                }
                HostEvent::reply(name, &outcome)
            }
            Err(e) => {
                warn!("Malformed request: {}", e);
                HostEvent::reply("unknown", &Err(e.into()))
            }
        };

        if let Err(e) = primary.emit(&reply) {
            debug!("Reply dropped: {}", e);
        }
    }

    info!("Request stream closed, closing primary window");
    host.force_close().await;
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = AppArgs::parse().unwrap_or_else(|e| {
        eprintln!("Failed to parse arguments: {}", e);
        print_help();
        process::exit(1);
    });

    let config = load_configuration(&args)?;
    init_logging(&args, &config);

    info!("Starting {} v{}", companion_host::NAME, companion_host::VERSION);
    debug!("Debug mode enabled");

    let writer = stdout_writer();
    let primary = Arc::new(ConsoleSurface::new(WindowRole::Primary, Arc::clone(&writer)));
    let desktop = Arc::new(HeadlessDesktop::new(config.displays.clone(), writer));
    let primary_window: Arc<dyn WindowSurface> = Arc::clone(&primary) as Arc<dyn WindowSurface>;
    let host = Arc::new(Host::new(&config, primary_window, desktop)?);

    if !args.no_autostart {
        if let Err(e) = host.start_process().await {
            error!("Failed to start worker: {}", e);
        }
    }

    let requests = tokio::spawn(read_requests(Arc::clone(&host), Arc::clone(&primary)));

    let mut interrupts = 0u32;
    loop {
        tokio::select! {
            _ = host.closed() => break,
            signal = tokio::signal::ctrl_c() => {
                signal.context("Failed to listen for Ctrl+C")?;
                interrupts += 1;
                if interrupts == 1 {
                    info!("Close requested, waiting for the window to acknowledge (Ctrl+C again to force)");
                    if let Err(e) = host.on_close_requested(host.primary_id()) {
                        error!("Close request failed: {}", e);
                    }
                } else {
                    host.force_close().await;
                }
            }
        }
    }

    requests.abort();
    host.teardown().await;
    info!("Shutdown complete");
    Ok(())
}
