use std::fs;
use std::path::PathBuf;

use chemparse::{FormulaError, Lexer, error::EmptyFormulaError};
use clap::Parser;
use clap::Subcommand;
use log::LevelFilter;
use miette::IntoDiagnostic;
use miette::WrapErr;

/// Parse chemical formulas into element counts.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Log more; repeat for more detail (overridden by RUST_LOG)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the tokens of a formula
    Tokenize { formula: String },
    /// Print the element counts of each formula
    Parse {
        #[arg(required = true)]
        formulas: Vec<String>,
    },
    /// Parse every line of a file; blank lines and `#` comments are skipped
    File { filename: PathBuf },
}

/// Exit status for malformed formulas (EX_DATAERR).
const DATA_ERROR: i32 = 65;

fn main() -> miette::Result<()> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    match args.command {
        Commands::Tokenize { formula } => {
            if formula.is_empty() {
                report(EmptyFormulaError.into());
            }
            for token in Lexer::new(None, &formula) {
                let token = match token {
                    Ok(token) => token,
                    Err(e) => report(e),
                };
                println!("{token}");
            }
            println!("EOF");
        }
        Commands::Parse { formulas } => {
            for formula in &formulas {
                match chemparse::parse_formula(formula) {
                    Ok(composition) => println!("{formula} => {composition}"),
                    Err(e) => report(e),
                }
            }
        }
        Commands::File { filename } => {
            let file_contents = fs::read_to_string(&filename)
                .into_diagnostic()
                .wrap_err_with(|| format!("reading `{}` failed", filename.display()))?;

            let mut failed = 0;
            for (index, line) in file_contents.lines().enumerate() {
                let formula = line.trim();
                if formula.is_empty() || formula.starts_with('#') {
                    continue;
                }

                let name = format!("{}:{}", filename.display(), index + 1);
                match chemparse::Parser::new(Some(name.as_str()), formula).parse() {
                    Ok(composition) => println!("{formula} => {composition}"),
                    Err(e) => {
                        eprintln!("{:?}", miette::Report::new(e));
                        failed += 1;
                    }
                }
            }

            if failed > 0 {
                log::warn!("{failed} formula(s) in `{}` failed to parse", filename.display());
                std::process::exit(DATA_ERROR);
            }
        }
    }
    Ok(())
}

fn report(e: FormulaError) -> ! {
    eprintln!("{:?}", miette::Report::new(e));
    std::process::exit(DATA_ERROR);
}
