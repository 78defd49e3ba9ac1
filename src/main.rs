//! The command-line interface for the `msl` shader parser.

use clap::{Args, Parser, Subcommand};
use msl_parse::{syntax::TranslationUnit, Diagnostic, ParseOptions, Precedence};
use std::{fs, path::PathBuf, process::ExitCode};
use thiserror::Error;

#[derive(Parser)]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    /// main command
    #[command(subcommand)]
    command: Command,
    /// use C operator precedence instead of a single precedence level
    #[arg(long, global = true)]
    c_precedence: bool,
    /// accept parenthesized expressions
    #[arg(long, global = true)]
    parens: bool,
}

#[derive(Subcommand)]
enum Command {
    /// check correctness of the source file
    Check(CommonArgs),
    /// parse the source and convert it back to code from the syntax tree
    Parse(CommonArgs),
    /// output the syntax tree to stdout
    Dump(DumpArgs),
}

#[derive(Args)]
struct CommonArgs {
    /// msl source file
    input: PathBuf,
}

#[derive(Args)]
struct DumpArgs {
    #[command(flatten)]
    common: CommonArgs,
    /// output the syntax tree as json
    #[arg(long)]
    json: bool,
}

#[derive(Error, Debug)]
enum CliError {
    #[error("could not read `{}`: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{count} error(s) in `{}`", path.display())]
    Syntax { count: usize, path: PathBuf },
    #[error("could not serialize the syntax tree: {0}")]
    Json(#[from] serde_json::Error),
}

impl Cli {
    fn options(&self) -> ParseOptions {
        ParseOptions {
            precedence: if self.c_precedence {
                Precedence::CLike
            } else {
                Precedence::Flat
            },
            parenthesized: self.parens,
        }
    }
}

fn read_source(args: &CommonArgs) -> Result<String, CliError> {
    fs::read_to_string(&args.input).map_err(|source| CliError::Read {
        path: args.input.clone(),
        source,
    })
}

/// Parse the input, printing the diagnostics to stderr. Fails if there was any.
fn parse(cli: &Cli, args: &CommonArgs) -> Result<TranslationUnit, CliError> {
    let source = read_source(args)?;
    let parser = msl_parse::Parser::with_options(cli.options());
    let (unit, diagnostics) = parser.parse(&source);
    if diagnostics.is_empty() {
        Ok(unit)
    } else {
        print_diagnostics(&diagnostics, &source, args);
        Err(CliError::Syntax {
            count: diagnostics.len(),
            path: args.input.clone(),
        })
    }
}

fn print_diagnostics(diagnostics: &[Diagnostic], source: &str, args: &CommonArgs) {
    let origin = args.input.display().to_string();
    for diag in diagnostics {
        eprintln!("{}", diag.report(source).with_origin(&origin).styled(true));
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    match &cli.command {
        Command::Check(args) => {
            parse(cli, args)?;
            println!("{} -- OK", args.input.display());
        }
        Command::Parse(args) => {
            let unit = parse(cli, args)?;
            println!("{unit}");
        }
        Command::Dump(args) => {
            let unit = parse(cli, &args.common)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&unit)?);
            } else {
                println!("{unit:#?}");
            }
        }
    };
    Ok(())
}

fn main() -> ExitCode {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .try_init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(error = ?err, "command failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
