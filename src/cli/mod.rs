mod commands;
mod edit;

use clap::{ArgAction, Args, Parser, Subcommand};
use inputmask::error::Result;
use inputmask::config::RuleDef;
use inputmask::{MaskConfig, ValueMode};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;

#[derive(Debug, Parser)]
#[command(bin_name = "inputmask")]
#[command(about = "Apply, validate and edit masked text input")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub global: GlobalOptions,
}

#[derive(Debug, Args)]
pub struct GlobalOptions {
    #[arg(
        global = true,
        long,
        short = 'c',
        help = "Read the mask definition from a YAML or JSON file."
    )]
    pub config: Option<PathBuf>,

    #[arg(
        global = true,
        long,
        short = 'v',
        action = ArgAction::Count,
        help = "Log to stderr. Repeat for more detail."
    )]
    pub verbose: u8,
}

#[derive(Debug, Args)]
pub struct MaskArgs {
    #[arg(
        long,
        short = 'f',
        conflicts_with = "pattern",
        help = "Date/time format, e.g. MM-DD-YYYY."
    )]
    pub format: Option<String>,

    #[arg(long, short = 'p', help = "Character mask, e.g. '(###) ###-####'.")]
    pub pattern: Option<String>,

    #[arg(long, help = "Bind the raw (separator free) value instead of the formatted one.")]
    pub raw: bool,

    #[arg(long, help = "Earliest accepted date, written in the format.")]
    pub min: Option<String>,

    #[arg(long, help = "Latest accepted date, written in the format.")]
    pub max: Option<String>,

    #[arg(long, value_name = "REGEX", help = "Also require the value to match a regex.")]
    pub matches: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run text through a mask and print the formatted, raw and cursor values.
    Apply {
        #[command(flatten)]
        mask: MaskArgs,
        input: String,
        #[arg(long, help = "Cursor offset in the input. Defaults to the end.")]
        cursor: Option<usize>,
    },
    /// Check a finished value against a mask. Exits non-zero when invalid.
    Validate {
        #[command(flatten)]
        mask: MaskArgs,
        value: String,
    },
    /// Print the length a complete value has.
    Length {
        #[command(flatten)]
        mask: MaskArgs,
    },
    /// Edit a value interactively in the terminal.
    Edit {
        #[command(flatten)]
        mask: MaskArgs,
        #[arg(long, help = "Initial value.")]
        default: Option<String>,
        #[arg(long, help = "Refuse to submit an empty value.")]
        required: bool,
    },
    /// Print the JSON schema of the config file.
    Schema,
}

pub fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

pub fn run(cli: Cli) -> Result<ExitCode> {
    let base = match &cli.global.config {
        Some(path) => MaskConfig::load(path)?,
        None => MaskConfig::default(),
    };

    match cli.command {
        Command::Apply {
            mask,
            input,
            cursor,
        } => commands::apply(&resolve(base, mask), &input, cursor),
        Command::Validate { mask, value } => commands::validate(&resolve(base, mask), &value),
        Command::Length { mask } => commands::length(&resolve(base, mask)),
        Command::Edit {
            mask,
            default,
            required,
        } => edit::run(&resolve(base, mask), default.as_deref(), required),
        Command::Schema => commands::schema(),
    }
}

/// Command-line flags win over the config file.
fn resolve(mut config: MaskConfig, args: MaskArgs) -> MaskConfig {
    if let Some(format) = args.format {
        config.format = Some(format);
        config.pattern = None;
    }
    if let Some(pattern) = args.pattern {
        config.pattern = Some(pattern);
        config.format = None;
    }
    if args.raw {
        config.value_mode = ValueMode::Raw;
    }
    if args.min.is_some() {
        config.min = args.min;
    }
    if args.max.is_some() {
        config.max = args.max;
    }
    if let Some(regex) = args.matches {
        config.rules.push(RuleDef::Matches {
            regex,
            message: None,
        });
    }
    config
}
