use clap::Parser;
use std::ffi::OsString;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

use olx_watcher::config::{AppConfig, DEFAULT_CONFIG_PATH};
use olx_watcher::notifiers::SmtpMailer;
use olx_watcher::runner::{RunOptions, RunReport, run};
use olx_watcher::scraper::Fetcher;
use olx_watcher::utils::error::NETWORK_EXIT_CODE;

#[derive(Parser, Debug)]
#[command(
    name = "olx-watcher",
    version,
    about = "Checks OLX.ro search results and emails when the lowest price drops below a threshold"
)]
struct Cli {
    /// Log each step with its timing (also accepted as `-log`)
    #[arg(long)]
    log: bool,

    /// Path to the INI configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Price below which a notification is sent, overrides [Alert] threshold
    #[arg(long)]
    threshold: Option<f64>,

    /// Notification recipient, overrides [Alert] recipient
    #[arg(long)]
    recipient: Option<String>,

    /// Print the sorted listings as JSON
    #[arg(long)]
    json: bool,
}

/// clap short flags are single characters, so `-log` is rewritten to `--log`.
fn normalize_args(args: impl IntoIterator<Item = OsString>) -> Vec<OsString> {
    args.into_iter()
        .map(|arg| if arg == "-log" { OsString::from("--log") } else { arg })
        .collect()
}

fn log_filter(verbose: bool) -> anyhow::Result<EnvFilter> {
    Ok(match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) if verbose => EnvFilter::new("info").add_directive("olx_watcher=debug".parse()?),
        Err(_) => EnvFilter::new("error"),
    })
}

fn init_tracing(verbose: bool) -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter(log_filter(verbose)?).init();
    Ok(())
}

/// Reports a failed run on `stderr`, once, and picks the exit code.
fn exit_code(result: &olx_watcher::Result<RunReport>, stderr: &mut dyn Write) -> u8 {
    match result {
        Ok(report) if report.search_failed() => NETWORK_EXIT_CODE,
        Ok(_) => 0,
        Err(e) => {
            let _ = writeln!(stderr, "Error: {}", e);
            e.exit_code()
        }
    }
}

async fn execute(cli: &Cli) -> olx_watcher::Result<RunReport> {
    let mut config = AppConfig::load(&cli.config)?;
    config.override_alert(cli.threshold, cli.recipient.as_deref());
    config.validate()?;

    let options = RunOptions {
        log: cli.log,
        json: cli.json,
        ..RunOptions::from_config(&config)
    };
    let fetcher = Fetcher::new(&config.olx.user_agent)?;
    let mailer = SmtpMailer::new(&config.email)?;

    let mut stdout = std::io::stdout().lock();
    run(&config, &options, &fetcher, &mailer, &mut stdout).await
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse_from(normalize_args(std::env::args_os()));

    // Before init_tracing: `.env` may carry RUST_LOG.
    let dotenv = dotenvy::dotenv();
    if let Err(e) = init_tracing(cli.log) {
        eprintln!("Failed to initialize logging: {}", e);
    }
    if let Ok(path) = dotenv {
        info!("Loaded environment from {}", path.display());
    }

    let result = execute(&cli).await;
    ExitCode::from(exit_code(&result, &mut std::io::stderr()))
}
