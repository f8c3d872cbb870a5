use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use jsonkit_lib::{DeserializeOptions, SerializeOptions};

mod commands;

#[derive(Parser)]
#[command(name = "jsonkit", version, about = "Reformat and validate JSON files")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print a JSON file re-serialized
    Fmt {
        path: PathBuf,

        /// Indent output with two spaces
        #[arg(long)]
        pretty: bool,

        /// Omit fields whose value is null
        #[arg(long)]
        drop_nulls: bool,

        #[command(flatten)]
        parse: ParseArgs,
    },
    /// Check that each file parses as JSON
    Check {
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        #[command(flatten)]
        parse: ParseArgs,
    },
}

#[derive(Args)]
struct ParseArgs {
    /// Reject trailing commas
    #[arg(long)]
    strict: bool,
}

impl ParseArgs {
    fn options(&self) -> DeserializeOptions {
        DeserializeOptions::default().with_trailing_commas(!self.strict)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    jsonkit_lib::logger::init(cli.verbose);

    let result = match cli.command {
        Command::Fmt {
            path,
            pretty,
            drop_nulls,
            parse,
        } => {
            let layout = SerializeOptions::default()
                .with_prettify(pretty)
                .with_exclude_null_fields(drop_nulls);
            commands::fmt_file(&path, parse.options(), layout).map(|text| {
                println!("{text}");
                ExitCode::SUCCESS
            })
        }
        Command::Check { paths, parse } => {
            let mut stdout = std::io::stdout().lock();
            commands::check_files(&paths, parse.options(), &mut stdout).map(|failed| {
                if failed == 0 {
                    ExitCode::SUCCESS
                } else {
                    ExitCode::FAILURE
                }
            })
        }
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            tracing::debug!(error = ?e, "Command failed");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
