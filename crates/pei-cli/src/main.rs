mod config;
mod generate_cmd;
mod tui;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tracing_subscriber::EnvFilter;

use pei_core::generator::{GeneratorRegistry, PlanGenerator};

use config::PeiConfig;
use generate_cmd::OutputFormat;

#[derive(Parser)]
#[command(name = "pei", about = "Terminal wizard for drafting Individualized Education Plans")]
struct Cli {
    /// Plan generation strategy (overrides PEI_GENERATOR env var)
    #[arg(long, global = true)]
    generator: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default pei config file
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Launch the interactive wizard (default)
    Run,
    /// Generate a plan for a profile file without the interactive UI
    Generate {
        /// Student profile as .toml or .json
        #[arg(long)]
        profile: PathBuf,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Print shell completions
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Execute the `pei init` command: write config file.
fn cmd_init(force: bool) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let cfg = config::ConfigFile::default();
    config::save_config(&cfg)?;

    println!("Config written to {}", path.display());
    println!("  generation.generator = {}", cfg.generation.generator);
    println!(
        "  generation.tick_interval_ms = {}",
        cfg.generation.tick_interval_ms
    );
    println!("  ui.seed_dashboard = {}", cfg.ui.seed_dashboard);
    println!();
    println!("Next: run `pei` to start the wizard.");

    Ok(())
}

/// Look up the configured generation strategy.
fn resolve_generator(config: &PeiConfig) -> anyhow::Result<Arc<dyn PlanGenerator>> {
    let registry = GeneratorRegistry::with_defaults();
    let generator = registry.resolve(&config.generator)?;
    Ok(generator)
}

/// Log to stderr, or to `pei.log` while the TUI owns the terminal.
fn init_tracing(config: &PeiConfig, to_file: bool) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));

    if to_file {
        let path = config::log_path();
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create log directory {}", dir.display()))?;
        }
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("failed to open log file {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Run);

    match command {
        Commands::Init { force } => {
            cmd_init(force)?;
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "pei", &mut std::io::stdout());
        }
        Commands::Run => {
            let resolved = PeiConfig::resolve(cli.generator.as_deref())?;
            init_tracing(&resolved, true)?;
            let generator = resolve_generator(&resolved)?;
            tui::run_wizard(&resolved, generator)?;
        }
        Commands::Generate { profile, format } => {
            let resolved = PeiConfig::resolve(cli.generator.as_deref())?;
            init_tracing(&resolved, false)?;
            let generator = resolve_generator(&resolved)?;
            generate_cmd::run_generate(&profile, format, generator, resolved.simulator).await?;
        }
    }

    Ok(())
}
