// Main entry point for allure-listener

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::{error, info};

use allure_listener::cli::{Cli, Commands, InitConfigArgs, ReplayArgs};
use allure_listener::config::{self, Config, OutputFormat};
use allure_listener::replay::{self, ReplaySummary};
use allure_listener::report::{ConsoleSink, EventSink, StreamingJsonSink};
use allure_listener::Listener;

use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::sync::Arc;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing
    let filter = if cli.verbose {
        "allure_listener=debug,warn"
    } else {
        "allure_listener=warn"
    };

    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .event_format(allure_listener::logging::CustomFormatter)
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    if cli.verbose {
        info!("Starting allure-listener v{}", env!("CARGO_PKG_VERSION"));
    }

    let config = match &cli.config {
        Some(path) => Some(Config::load_from_file(path)?),
        None => Config::load(),
    };

    match &cli.command {
        Commands::Replay(args) => {
            let summary = handle_replay(&cli, args, config.unwrap_or_default())?;
            if !summary.all_passed() {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::InitConfig(args) => handle_init_config(args),
        Commands::ShowConfig => {
            match config {
                Some(cfg) => print!("{}", cfg.to_toml()?),
                None => {
                    let defaults = Config::default().to_toml()?;
                    println!("# No configuration file loaded, showing defaults");
                    print!("{}", defaults);
                }
            }
            Ok(())
        }
    }
}

fn handle_replay(cli: &Cli, args: &ReplayArgs, config: Config) -> Result<ReplaySummary> {
    let format = args
        .format
        .map(OutputFormat::from)
        .unwrap_or(config.output.format);
    let output = args.output.clone().or_else(|| config.output.path.clone());
    let color = config.output.color && !cli.no_color && output.is_none();

    let sink: Arc<dyn EventSink> = match (format, output) {
        (OutputFormat::Jsonl, None) => Arc::new(StreamingJsonSink::stdout()),
        (OutputFormat::Console, None) => Arc::new(ConsoleSink::stdout(color)),
        (format, Some(path)) => {
            let file = File::create(&path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            let writer = BufWriter::new(file);
            let sink: Arc<dyn EventSink> = match format {
                OutputFormat::Jsonl => Arc::new(StreamingJsonSink::new(writer)),
                OutputFormat::Console => Arc::new(ConsoleSink::new(writer, false)),
            };
            sink
        }
    };

    let listener = Listener::new(sink)
        .with_annotations(config.annotations())
        .with_options(config.listener_options());

    let result = if args.script.as_os_str() == "-" {
        replay::replay(&listener, io::stdin().lock())
    } else {
        let file = File::open(&args.script)
            .with_context(|| format!("Failed to open script: {}", args.script.display()))?;
        replay::replay(&listener, BufReader::new(file))
    };

    let summary = result.inspect_err(|e| error!("Replay aborted: {:#}", e))?;

    info!(
        "Replayed {} callbacks: {} passed, {} failed, {} skipped",
        summary.callbacks(),
        summary.passed(),
        summary.failed(),
        summary.skipped()
    );

    Ok(summary)
}

fn handle_init_config(args: &InitConfigArgs) -> Result<()> {
    if args.path.exists() && !args.force {
        bail!(
            "{} already exists (use --force to overwrite)",
            args.path.display()
        );
    }

    let contents = Config::default().to_toml()?;
    std::fs::write(&args.path, contents)
        .with_context(|| format!("Failed to write {}", args.path.display()))?;
    println!("Configuration file created: {}", args.path.display());
    println!(
        "\nIt is picked up from ./{} or ~/{}, or pass --config <FILE>.",
        config::CONFIG_FILE_NAME,
        config::CONFIG_FILE_NAME
    );
    Ok(())
}
