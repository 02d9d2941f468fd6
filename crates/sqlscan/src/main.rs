use std::fmt::Debug;
use std::io::{self, BufWriter, Read, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use sqlscan_parser::error::ParseError;
use sqlscan_parser::parser::Parsed;
use sqlscan_parser::tokens::{Lexer, TokenKind};
use sqlscan_parser::{parse_create_table, parse_query};
use tracing::debug;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormatArg {
    Human,
    Json,
}

impl From<LogFormatArg> for logutil::LogFormat {
    fn from(value: LogFormatArg) -> Self {
        match value {
            LogFormatArg::Human => logutil::LogFormat::HumanReadable,
            LogFormatArg::Json => logutil::LogFormat::Json,
        }
    }
}

#[derive(Parser)]
#[clap(name = "sqlscan")]
struct Arguments {
    /// Default log level. RUST_LOG takes precedence.
    #[clap(long, env = "SQLSCAN_LOG_LEVEL", default_value = "error")]
    log_level: tracing::Level,
    /// Format of log output written to stderr.
    #[clap(long, env = "SQLSCAN_LOG_FORMAT", value_enum, default_value = "human")]
    log_format: LogFormatArg,
    /// Print output as JSON instead of debug formatting.
    #[clap(long, global = true)]
    json: bool,
    /// Read the SQL statement from a file. Use '-' for stdin.
    #[clap(short = 'f', long, global = true)]
    file: Option<PathBuf>,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the tokens of a statement.
    Tokens { sql: Option<String> },
    /// Parse a SELECT statement.
    Query { sql: Option<String> },
    /// Parse a CREATE TABLE statement.
    CreateTable { sql: Option<String> },
}

/// Dump tokens and parse trees for SQL statements.
fn main() {
    let args = Arguments::parse();
    logutil::configure_global_logger(args.log_level, args.log_format.into(), io::stderr);

    if let Err(err) = run(args) {
        println!("ERROR: {err}");
        std::process::exit(1);
    }
}

fn run(args: Arguments) -> Result<(), CliError> {
    let mut stdout = BufWriter::new(io::stdout());

    match args.command {
        Command::Tokens { sql } => {
            let sql = read_sql(args.file, sql)?;
            let tokens = Lexer::new(&sql).tokenize();
            debug!(count = tokens.len(), "tokenized input");
            write_value(&mut stdout, &tokens, args.json)?;
            stdout.flush()?;

            match tokens.last() {
                Some(tok) if tok.kind == TokenKind::Error => Err(ParseError::Lex {
                    line: tok.line,
                    message: tok.text.clone(),
                }
                .into()),
                _ => Ok(()),
            }
        }
        Command::Query { sql } => {
            let sql = read_sql(args.file, sql)?;
            write_parsed(&mut stdout, parse_query(&sql), args.json)
        }
        Command::CreateTable { sql } => {
            let sql = read_sql(args.file, sql)?;
            write_parsed(&mut stdout, parse_create_table(&sql), args.json)
        }
    }
}

/// Get the SQL text from the positional argument, or from the file if one was
/// provided.
fn read_sql(file: Option<PathBuf>, sql: Option<String>) -> Result<String, CliError> {
    match (file, sql) {
        (Some(path), _) if path.as_os_str() == "-" => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        (Some(path), _) => Ok(std::fs::read_to_string(path)?),
        (None, Some(sql)) => Ok(sql),
        (None, None) => Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "missing SQL, provide it as an argument or with --file",
        )
        .into()),
    }
}

/// Write the value even if parsing failed since the partial value helps with
/// debugging. The parse error is returned afterwards.
fn write_parsed<V>(w: &mut impl Write, parsed: Parsed<V>, json: bool) -> Result<(), CliError>
where
    V: Debug + Serialize,
{
    write_value(w, &parsed.value, json)?;
    w.flush()?;
    parsed.into_result()?;
    Ok(())
}

fn write_value<V>(w: &mut impl Write, value: &V, json: bool) -> Result<(), CliError>
where
    V: Debug + Serialize + ?Sized,
{
    if json {
        serde_json::to_writer_pretty(&mut *w, value)?;
        writeln!(w)?;
    } else {
        writeln!(w, "{value:#?}")?;
    }
    Ok(())
}
