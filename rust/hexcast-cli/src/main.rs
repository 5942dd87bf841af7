//! Hexcast CLI — cast operator programs in a sandbox world.

use clap::{ArgAction, Parser as ClapParser, Subcommand};
use hexcast_cli::commands;
use hexcast_cli::scenario::Scenario;
use hexcast_rt::config::HexcastConfig;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

fn red(s: &str) -> String {
    format!("\x1b[31m{}\x1b[0m", s)
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{}\x1b[0m", s)
}
fn gray(s: &str) -> String {
    format!("\x1b[90m{}\x1b[0m", s)
}
fn status_label(label: &str) -> String {
    format!("\x1b[1;32m{:>12}\x1b[0m", label)
}

#[derive(ClapParser)]
#[command(name = "hexcast", version, about = "Cast hexes against a sandbox world")]
struct Cli {
    /// Log more (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scenario file and print the outcome as JSON
    Run {
        /// Path to the scenario .toml
        #[arg()]
        file: PathBuf,

        /// Config file (default: search for hexcast.toml)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// List the registered operators
    Ops,
    /// Create a hexcast.toml config file in the current directory
    Init,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Run { file, config } => cmd_run(&file, config.as_deref()),
        Commands::Ops => cmd_ops(),
        Commands::Init => cmd_init(),
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> HexcastConfig {
    match path {
        Some(path) => HexcastConfig::load_from(path).unwrap_or_else(|e| {
            eprintln!("{} {}", red("error:"), e);
            std::process::exit(1);
        }),
        None => HexcastConfig::load(),
    }
}

fn cmd_run(file: &Path, config: Option<&Path>) {
    let config = load_config(config);
    let scenario = Scenario::load(file).unwrap_or_else(|e| {
        eprintln!("{} {}", red("error:"), e);
        std::process::exit(1);
    });
    let prepared = scenario.prepare(&config.casting).unwrap_or_else(|e| {
        eprintln!("{} {}", red("error:"), e);
        std::process::exit(1);
    });

    let outcome = prepared.run(config.casting);
    match serde_json::to_string_pretty(&outcome) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("{} serializing outcome: {}", red("error:"), e);
            std::process::exit(1);
        }
    }
    if !outcome.is_cast() {
        std::process::exit(2);
    }
}

fn cmd_ops() {
    for (name, signature) in commands::operator_rows() {
        println!("{:<16} {}", bold(name), gray(signature));
    }
}

fn cmd_init() {
    let path = commands::init_config(Path::new(".")).unwrap_or_else(|e| {
        eprintln!("{} {}", red("error:"), e);
        std::process::exit(1);
    });
    println!("{} {}", status_label("Created"), path.display());
}
