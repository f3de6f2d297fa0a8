use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use studyctl::cli::args::{Cli, Commands};
use studyctl::cli::commands;
use studyctl::config::{ColorSetting, Config};
use studyctl::error::StudyError;
use studyctl::ApiClient;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), StudyError> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load()?.with_api_url(cli.api_url.as_deref());
    match config.general.color {
        ColorSetting::Always => colored::control::set_override(true),
        ColorSetting::Never => colored::control::set_override(false),
        ColorSetting::Auto => {}
    }
    let format = cli.output.unwrap_or(config.general.default_output);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(dispatch(cli.command, &config, format));
    // A pending stdin read would otherwise hold up shutdown.
    runtime.shutdown_background();

    let output = result?;
    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}

async fn dispatch(
    command: Commands,
    config: &Config,
    format: studyctl::OutputFormat,
) -> Result<String, StudyError> {
    let client = || ApiClient::from_config(&config.api);
    match command {
        Commands::Session(args) => commands::session(&client()?, config, args.command, format).await,
        Commands::Plan(args) => commands::plan(&client()?, config, args, format).await,
        Commands::Block(args) => commands::block(&client()?, config, args, format).await,
        Commands::Unblock => commands::unblock(&client()?, format).await,
        Commands::Status => commands::status(&client()?, config, format).await,
        Commands::Diagnose => commands::diagnose(&client()?, config, format).await,
        Commands::Analytics => commands::analytics(&client()?, format).await,
        Commands::Calendar(args) => commands::calendar(&client()?, args.command, format).await,
        Commands::Prefs(args) => commands::prefs(&client()?, args.command, format).await,
        Commands::Completions { shell, install } => commands::completions(shell, install),
    }
}

/// Log to stderr. `RUST_LOG` wins; otherwise `-v` raises the level from warn.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("studyctl={default_level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
