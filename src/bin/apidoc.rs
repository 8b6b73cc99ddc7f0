//! API Documentation CLI
//!
//! Builds the Swagger document for a set of classes and routes, and manages
//! the build configuration.

use std::path::PathBuf;

use anyhow::Context;
use apidoc_models::{build_document, ApiDocConfig, ApiSource, OutputFormat};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "apidoc")]
#[command(about = "Generate API documentation definitions from routes and models")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build and print the documentation
    Dump {
        /// Classes and routes to document (.json or .toml)
        #[arg(short, long)]
        input: PathBuf,

        /// Config file to load (optional)
        #[arg(short, long)]
        config: Option<String>,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Compact JSON regardless of configuration
        #[arg(long)]
        compact: bool,
    },

    /// View and manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration
    Show {
        /// Config file to load (optional)
        #[arg(short, long)]
        config: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Initialize a new config file
    Init {
        /// Output path (default: apidoc.toml)
        #[arg(short, long, default_value = "apidoc.toml")]
        output: String,
    },

    /// Validate configuration
    Validate {
        /// Config file to validate
        #[arg(short, long)]
        config: Option<String>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Dump { input, config, output, compact } => {
            let cfg = ApiDocConfig::load_from(config.as_deref()).context("loading configuration")?;
            let source = ApiSource::load(&input)
                .with_context(|| format!("reading {}", input.display()))?;

            let document = build_document(&cfg, source)?;

            let format = if compact { OutputFormat::Compact } else { cfg.export.output_format };
            let json = document.to_json(format)?;

            if let Some(path) = output {
                std::fs::write(&path, &json).with_context(|| format!("writing {}", path.display()))?;
                eprintln!("✅ {} definitions written to {:?}", document.definitions().len(), path);
            } else {
                println!("{}", json);
            }
        }

        Commands::Config { command } => match command {
            ConfigCommands::Show { config, json } => {
                let cfg = ApiDocConfig::load_from(config.as_deref())?;

                if json {
                    println!("{}", serde_json::to_string_pretty(&cfg)?);
                } else {
                    println!("{}", toml::to_string_pretty(&cfg)?);
                }
            }

            ConfigCommands::Init { output } => {
                let cfg = ApiDocConfig::default();
                cfg.save(&output)?;
                println!("✅ Created config file: {}", output);
            }

            ConfigCommands::Validate { config } => match ApiDocConfig::load_from(config.as_deref()) {
                Ok(cfg) => {
                    println!("✅ Configuration is valid");
                    println!("   Document: {} {}", cfg.document.title, cfg.document.version);
                    println!("   Alternative names: {}", cfg.alternative_names.len());
                    for alt in &cfg.alternative_names {
                        println!("     - {} -> {}", alt.name, alt.class);
                    }
                }
                Err(e) => {
                    eprintln!("❌ Configuration error: {}", e);
                    std::process::exit(1);
                }
            },
        },
    }

    Ok(())
}
