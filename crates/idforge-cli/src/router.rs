// Command routing and dispatch

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::{Command, ConfigCommand, GenerateCommand, SettingsSource, TemplatesCommand};
use crate::error::CliResult;

/// idforge - strongly typed entity IDs for C# structs
#[derive(Parser, Debug)]
#[command(name = "idforge")]
#[command(about = "Generate strongly typed entity ID members for marked C# structs")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress everything but errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate entity ID members for every marked struct in the inputs
    #[command(alias = "g")]
    Generate {
        /// C# source files to scan
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        #[command(flatten)]
        settings: SettingsArgs,

        /// Write generated code here instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// List the available templates and their placeholders
    Templates {
        #[command(flatten)]
        settings: SettingsArgs,
    },

    /// Print the effective configuration as TOML
    Config {
        #[command(flatten)]
        settings: SettingsArgs,
    },
}

/// Options shared by every subcommand that loads settings
#[derive(clap::Args, Debug, Clone, Default)]
pub struct SettingsArgs {
    /// Configuration file (default: per-user config, when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory whose templates override the bundled ones
    #[arg(short = 't', long)]
    pub template_dir: Option<PathBuf>,
}

impl From<SettingsArgs> for SettingsSource {
    fn from(args: SettingsArgs) -> Self {
        SettingsSource {
            config: args.config,
            template_dir: args.template_dir,
        }
    }
}

/// Route and execute commands
pub struct CommandRouter;

impl CommandRouter {
    /// Initialize logging from the parsed flags and execute the command
    pub fn run(cli: Cli) -> CliResult<()> {
        crate::logging::init_logging(cli.verbose, cli.quiet);

        Self::execute(cli.command)
    }

    /// Execute a parsed command
    pub fn execute(command: Commands) -> CliResult<()> {
        match command {
            Commands::Generate {
                inputs,
                settings,
                out,
            } => GenerateCommand::new(inputs, settings.into(), out).execute(),
            Commands::Templates { settings } => TemplatesCommand::new(settings.into()).execute(),
            Commands::Config { settings } => ConfigCommand::new(settings.into()).execute(),
        }
    }
}
