use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use clap::Subcommand;
use env_logger::Builder;
use log::{debug, info};

use rox_parser as rox;

use rox::ast_printer::Ast;
use rox::error::ParseFailure;
use rox::parser::Parser;
use rox::scanner::{scan_tokens, Scanner};

/// Exit status for malformed source (lexical or syntax errors).
const EXIT_DATA_ERR: u8 = 65;

/// Exit status for internal failures (broken token stream contract).
const EXIT_SOFTWARE: u8 = 70;

#[derive(ClapParser, Debug)]
#[command(version, about = "Parser front end for a small Lox-like language", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    commands: Commands,

    /// Enable logging to app.log
    #[arg(long, global = true)]
    log: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tokenizes input from a file, printing each token
    Tokenize { filename: Option<PathBuf> },

    /// Parses input from a file as a program and prints its syntax tree
    Parse {
        filename: Option<PathBuf>,

        /// Print the tree as JSON instead of S-expressions
        #[arg(long)]
        json: bool,
    },
}

/// Reads the contents of a file into a String
fn read_file(filename: PathBuf) -> Result<String> {
    info!("Reading file: {:?}", filename);
    let file = File::open(&filename).context(format!("Failed to open file {:?}", filename))?;
    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();

    let bytes = reader
        .read_to_end(&mut buf)
        .context(format!("Failed to read file {:?}", filename))?;

    info!("Read {} bytes from {:?}", bytes, filename);

    String::from_utf8(buf).context(format!("File {:?} is not valid UTF-8", filename))
}

fn init_logger() -> Result<()> {
    // Create or open the log file
    let log_file = File::create("app.log").context("Failed to create app.log")?;

    // Configure env_logger to write to file with module and source line
    Builder::new()
        .format(|buf, record| {
            // Strip 'rox_parser::' from module path
            let module = record
                .module_path()
                .unwrap_or("<unnamed>")
                .strip_prefix("rox_parser::")
                .unwrap_or(record.module_path().unwrap_or("<unnamed>"));
            writeln!(
                buf,
                "[{}:{}] - {}",
                module,
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter(None, log::LevelFilter::Debug)
        .parse_default_env() // RUST_LOG overrides the Debug default
        .init();

    info!("Logger initialized, writing to app.log");
    Ok(())
}

fn tokenize(filename: PathBuf) -> Result<ExitCode> {
    info!("Running Tokenize subcommand");
    let source = read_file(filename)?;
    let mut tokenized = true;

    for token in Scanner::new(&source) {
        match token {
            Ok(token) => {
                debug!("Scanned token: {}", token);

                println!("{}", token);
            }

            Err(e) => {
                tokenized = false;

                debug!("Tokenization debug: {}", e);

                eprintln!("{}", e);
            }
        }
    }

    if !tokenized {
        debug!("Tokenization failed, exiting with code {}", EXIT_DATA_ERR);

        return Ok(ExitCode::from(EXIT_DATA_ERR));
    }

    info!("Tokenization completed successfully");
    Ok(ExitCode::SUCCESS)
}

fn parse(filename: PathBuf, json: bool) -> Result<ExitCode> {
    info!("Running Parse subcommand");
    let source = read_file(filename)?;

    let tokens = match scan_tokens(&source) {
        Ok(tokens) => tokens,
        Err(errors) => {
            for e in &errors {
                eprintln!("{}", e);
            }

            debug!("Scanning failed with {} error(s)", errors.len());
            return Ok(ExitCode::from(EXIT_DATA_ERR));
        }
    };

    match Parser::new(&tokens).parse() {
        Ok(tree) => {
            info!("Program parsed successfully");

            if json {
                let rendered =
                    serde_json::to_string_pretty(&tree).context("Failed to serialize tree")?;
                println!("{}", rendered);
            } else {
                println!("{}", Ast.print_tree(&tree));
            }

            Ok(ExitCode::SUCCESS)
        }

        Err(ParseFailure::Syntax(report)) => {
            debug!("Parse failed with {} error(s)", report.len());

            for error in report.errors() {
                eprintln!("{}", error);
            }

            Ok(ExitCode::from(EXIT_DATA_ERR))
        }

        Err(ParseFailure::Fatal(e)) => {
            debug!("Fatal parse failure: {}", e);
            eprintln!("{}", e);

            Ok(ExitCode::from(EXIT_SOFTWARE))
        }
    }
}

fn main() -> Result<ExitCode> {
    let args: Cli = Cli::parse();

    // Initialize logger only if --log flag is provided
    if args.log {
        init_logger()?;
    } else {
        // Initialize a minimal logger to avoid "no logger" errors
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Off)
            .init();
    }

    info!("CLI arguments: {:?}", args);

    match args.commands {
        Commands::Tokenize {
            filename: Some(filename),
        } => tokenize(filename),

        Commands::Parse {
            filename: Some(filename),
            json,
        } => parse(filename, json),

        Commands::Tokenize { filename: None } | Commands::Parse { filename: None, .. } => {
            info!("No filepath provided");
            println!("No input filepath was provided. Exiting...");

            Ok(ExitCode::SUCCESS)
        }
    }
}
