// CLI argument definitions using Clap

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::OutputFormat;

/// Output format for replayed events
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Jsonl,
    Console,
}

impl From<FormatArg> for OutputFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Jsonl => OutputFormat::Jsonl,
            FormatArg::Console => OutputFormat::Console,
        }
    }
}

/// Translate test lifecycle callbacks into Allure reporting events
#[derive(Parser, Debug)]
#[command(name = "allure-listener")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Replay test lifecycle callbacks as Allure events", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose debug output
    #[arg(short = 'v', long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(short = 'c', long, global = true, default_value_t = false)]
    pub no_color: bool,

    /// Configuration file (default: .allurelistenerrc.toml in cwd or home)
    #[arg(long, global = true, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Feed a script of host callbacks through the listener
    Replay(ReplayArgs),

    /// Write a default configuration file
    InitConfig(InitConfigArgs),

    /// Print the effective configuration
    ShowConfig,
}

#[derive(Args, Debug, Clone)]
pub struct ReplayArgs {
    /// JSON-lines script of host callbacks ("-" for stdin)
    pub script: PathBuf,

    /// Output format (overrides config)
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,

    /// Output file (overrides config, default stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct InitConfigArgs {
    /// Where to write the configuration
    #[arg(default_value = crate::config::CONFIG_FILE_NAME)]
    pub path: PathBuf,

    /// Overwrite an existing file
    #[arg(long, default_value_t = false)]
    pub force: bool,
}
