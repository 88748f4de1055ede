use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use dtkit::export::RenderFormat;

mod cmd;

#[derive(Parser)]
#[command(name = "dtkit")]
#[command(version, about = "Design Thinking case toolkit")]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true)]
    pub project_dir: Option<PathBuf>,

    /// Path to the config file. Defaults to dtkit.toml in the project directory
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the phases of the workflow
    Phases {
        /// JSON catalog file (overrides the configured catalog)
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
    /// Sanitize text from the argument or stdin
    Sanitize {
        text: Option<String>,

        #[arg(long)]
        max_length: Option<usize>,

        /// Keep markup tags
        #[arg(long)]
        allow_html: bool,

        /// Do not trim leading and trailing whitespace
        #[arg(long)]
        keep_whitespace: bool,
    },
    /// Validate text against a rule
    Validate {
        text: String,

        /// Named rule: company, industry, description, short_text, long_text, name, email
        #[arg(long, conflicts_with_all = ["required", "min", "max", "pattern"])]
        preset: Option<String>,

        #[arg(long)]
        required: bool,

        #[arg(long)]
        min: Option<usize>,

        #[arg(long)]
        max: Option<usize>,

        /// Regular expression the text must match
        #[arg(long)]
        pattern: Option<String>,
    },
    /// Export a JSON answers file as a paginated document
    Export {
        #[arg(long)]
        title: String,

        /// JSON object of field → answer
        #[arg(long)]
        input: PathBuf,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(long, default_value = "text")]
        format: RenderFormat,
    },
    /// Replay an answers file through the workflow
    Session {
        /// JSON object of phase id → answers
        #[arg(long)]
        answers: PathBuf,

        /// Export each accepted phase into this directory
        #[arg(long)]
        output_dir: Option<PathBuf>,

        #[arg(long, default_value = "text")]
        format: RenderFormat,
    },
    /// View, create or validate configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Validate configuration and show any warnings
    Validate,
    /// Write a default dtkit.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    dtkit::logging::init_logger(cli.verbose);

    let project_dir = match cli.project_dir.clone() {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };

    // `config init` must work even when the current file is broken.
    if let Commands::Config {
        command: Some(ConfigCommands::Init { force }),
    } = &cli.command
    {
        return cmd::cmd_config_init(&project_dir, cli.config.as_deref(), *force);
    }

    let config = dtkit::config::DtkitConfig::new(project_dir, cli.config.clone())?;

    let success = match cli.command {
        Commands::Phases { catalog } => {
            cmd::cmd_phases(&config, catalog.as_deref())?;
            true
        }
        Commands::Sanitize {
            text,
            max_length,
            allow_html,
            keep_whitespace,
        } => {
            cmd::cmd_sanitize(&config, text, max_length, allow_html, keep_whitespace)?;
            true
        }
        Commands::Validate {
            text,
            preset,
            required,
            min,
            max,
            pattern,
        } => {
            let rule = cmd::RuleArgs {
                preset,
                required,
                min,
                max,
                pattern,
            };
            cmd::cmd_validate(&text, &rule)?
        }
        Commands::Export {
            title,
            input,
            output,
            format,
        } => {
            cmd::cmd_export(&config, &title, &input, output.as_deref(), format)?;
            true
        }
        Commands::Session {
            answers,
            output_dir,
            format,
        } => cmd::cmd_session(&config, &answers, output_dir.as_deref(), format)?,
        Commands::Config { command } => {
            cmd::cmd_config(&config, command)?;
            true
        }
    };

    if !success {
        std::process::exit(1);
    }
    Ok(())
}
