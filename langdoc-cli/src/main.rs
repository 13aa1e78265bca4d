use std::{
    fs,
    io,
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use langdoc::{Error, FormatType, KeyPath, KeyStyle, Parser as _};
use langdoc_cli::{
    CliConfig, backend_for, locate, print_view, run_convert_command, run_format_command,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a langdoc.toml file (defaults to ./langdoc.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging (overrides RUST_LOG)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    commands: Commands,
}

/// Supported subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// List the entries of a localization file.
    View {
        /// The input file to view
        #[arg(short, long)]
        input: PathBuf,

        /// `nested` lists every leaf, `flat` lists root keys only
        #[arg(long)]
        key_style: Option<KeyStyle>,

        /// Display full values without truncation
        #[arg(long)]
        full: bool,
    },

    /// Print the value stored under a key.
    Get {
        /// The input file to read
        #[arg(short, long)]
        input: PathBuf,

        /// Key path, e.g. `menu.file.open` or `items[0]`
        #[arg(short, long)]
        key: KeyPath,

        #[arg(long)]
        key_style: Option<KeyStyle>,
    },

    /// Print the character range of a key's value in the raw file.
    Locate {
        /// The input file to search
        #[arg(short, long)]
        input: PathBuf,

        /// Key path, e.g. `menu.file.open` or `items[0]`
        #[arg(short, long)]
        key: KeyPath,

        #[arg(long)]
        key_style: Option<KeyStyle>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Rewrite a file with consistent indentation and optional key sorting.
    Format {
        /// The input file to format
        #[arg(short, long)]
        input: PathBuf,

        /// Write here instead of formatting in place
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Sort keys lexicographically at every level
        #[arg(long)]
        sort: bool,

        /// Indentation units per nesting level (0 for compact JSON)
        #[arg(long)]
        indent: Option<usize>,

        /// Indentation unit, e.g. " " or "\t"
        #[arg(long)]
        tab: Option<String>,
    },

    /// Convert localization files between formats.
    Convert {
        /// The input file to process
        #[arg(short, long)]
        input: PathBuf,

        /// The output file to write the results to
        #[arg(short, long)]
        output: PathBuf,

        /// Sort keys lexicographically at every level
        #[arg(long)]
        sort: bool,

        /// Rewrite keys as dotted root keys (`flat`) or nested objects (`nested`)
        #[arg(long)]
        key_style: Option<KeyStyle>,
    },

    /// Generate a shell completion script.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn init_tracing(verbose: u8) {
    let filter = if verbose > 0 {
        tracing_subscriber::EnvFilter::new("langdoc=debug,langdoc_cli=debug")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "langdoc=warn,langdoc_cli=warn".into())
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<ExitCode, Error> {
    let config = CliConfig::load(args.config.as_deref())?;

    match args.commands {
        Commands::View {
            input,
            key_style,
            full,
        } => {
            let document = backend_for(&input, None)?.load(&input)?;
            print_view(&document, config.key_style(key_style), full);
        }
        Commands::Get {
            input,
            key,
            key_style,
        } => {
            let backend = backend_for(&input, None)?;
            let document = backend.load(&input)?;
            // Properties files only hold flat keys.
            let key_style = match backend.format_type() {
                FormatType::Properties => KeyStyle::Flat,
                _ => config.key_style(key_style),
            };
            match document.get(&key, key_style) {
                Some(value) => println!("{}", value),
                None => return Ok(key_not_found(&key, &input)),
            }
        }
        Commands::Locate {
            input,
            key,
            key_style,
            json,
        } => {
            let backend = backend_for(&input, None)?;
            let text = fs::read_to_string(&input)?;
            let Some(report) = locate(&backend, &text, &key, config.key_style(key_style)) else {
                return Ok(key_not_found(&key, &input));
            };
            if json {
                let json = serde_json::to_string_pretty(&report)
                    .map_err(|e| Error::DataMismatch(e.to_string()))?;
                println!("{}", json);
            } else {
                println!("{}", report.to_text());
            }
        }
        Commands::Format {
            input,
            output,
            sort,
            indent,
            tab,
        } => {
            run_format_command(
                &input,
                output.as_deref(),
                config.parser_options(indent, tab),
                config.sort_keys(sort),
            )?;
        }
        Commands::Convert {
            input,
            output,
            sort,
            key_style,
        } => {
            run_convert_command(
                &input,
                &output,
                config.parser_options(None, None),
                config.sort_keys(sort),
                key_style.or(config.key_style),
            )?;
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Args::command(), "langdoc", &mut io::stdout());
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn key_not_found(key: &KeyPath, input: &Path) -> ExitCode {
    eprintln!("Key `{}` not found in {}", key, input.display());
    ExitCode::FAILURE
}
