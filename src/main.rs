//! netpulse - terminal-resident network health monitor

use clap::Parser;
use netpulse::{
    cli::Cli,
    config::load_config,
    error::{AppError, Result},
    logging::{LogLevel, Logger},
    monitor::Monitor,
    output::{FormattingOptions, OutputFormatterFactory, ScreenRenderer},
    PKG_NAME, VERSION,
};
use std::error::Error;
use std::process;
use std::time::Duration;
use tokio::sync::watch;

#[tokio::main]
async fn main() {
    // Set up better panic handling
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panic: {}", panic_info);
        // Leave the terminal usable: the renderer's cursor-hide may
        // not have been unwound.
        print!("\x1b[?25h");
        process::exit(1);
    }));

    // Parse command line arguments
    let cli = Cli::parse();

    if let Err(message) = cli.validate() {
        eprintln!("Error: {}", message);
        process::exit(1);
    }

    if let Err(e) = run_application(cli).await {
        eprintln!("Error: {}", e);

        if let Some(source) = e.source() {
            eprintln!("Caused by: {}", source);
        }

        print_error_suggestions(&e);

        process::exit(e.exit_code());
    }
}

/// Main application logic
async fn run_application(cli: Cli) -> Result<()> {
    let config = load_config(cli)?;

    if config.debug {
        println!(
            "{} v{} (built {}, commit {})",
            PKG_NAME,
            VERSION,
            option_env!("BUILD_TIME").unwrap_or("unknown"),
            option_env!("GIT_COMMIT").unwrap_or("unknown"),
        );
        println!("Debug mode enabled");
        println!("  Ping targets: {}", config.ping_targets.join(", "));
        println!("  DNS hostname: {}", config.dns_hostname);
        println!(
            "  Endpoint: {}://{}{}",
            config.http_scheme, config.http_host, config.http_path
        );
        println!("  Interval: {} ms", config.interval_ms);
        println!();
    }

    if config.verbose && !config.debug {
        println!("Ping targets: {}", config.ping_targets.join(", "));
        println!("DNS hostname: {}", config.dns_hostname);
        println!(
            "Endpoint: {}://{}{}",
            config.http_scheme, config.http_host, config.http_path
        );
    }

    let min_level = if config.debug {
        LogLevel::Debug
    } else {
        LogLevel::Warn
    };
    let mut logger = Logger::new(min_level, config.enable_color);
    if let Some(ref path) = config.log_file {
        logger = logger.with_file(path)?;
    }

    println!(
        "Starting {} (interval {} ms). Press Ctrl+C to exit.",
        PKG_NAME, config.interval_ms
    );
    tokio::time::sleep(Duration::from_millis(800)).await;

    // Ctrl+C feeds the cancellation channel the loop selects on.
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown_tx.send(true);
        }
    });

    let options = FormattingOptions {
        interval: config.interval(),
    };
    let formatter = OutputFormatterFactory::create_formatter(config.enable_color, options);
    let mut renderer = ScreenRenderer::new(formatter, config.plain);

    let mut monitor = Monitor::new(config, shutdown_rx, logger)?;
    monitor.run(&mut renderer).await?;

    // Dropping the renderer restores the cursor before the goodbye.
    drop(renderer);
    println!("\nStopped.");

    Ok(())
}

/// Print helpful suggestions for common errors
fn print_error_suggestions(error: &AppError) {
    match error {
        AppError::Config { .. } => {
            eprintln!();
            eprintln!("Configuration help:");
            eprintln!("  - Ping targets must be dotted-decimal IPv4 literals");
            eprintln!("  - The interval is in milliseconds (minimum 500)");
            eprintln!("  - Check your .env file and NETPULSE_* variables");
        }
        AppError::CapabilityUnavailable { .. } => {
            eprintln!();
            eprintln!("Capability help:");
            eprintln!("  - Install the system ping utility (iputils on Linux)");
            eprintln!("  - Probing continues without ICMP; other probes still run");
        }
        AppError::Resolver { .. } => {
            eprintln!();
            eprintln!("DNS troubleshooting:");
            eprintln!("  - Check /etc/resolv.conf");
            eprintln!("  - Test resolution manually with 'dig' or 'nslookup'");
        }
        AppError::Io { .. } => {
            eprintln!();
            eprintln!("I/O troubleshooting:");
            eprintln!("  - Check the --log-file and --status-file paths and permissions");
        }
        _ => {}
    }
}
