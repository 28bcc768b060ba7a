//! CLI glue around the codec: reads a path or stdin, writes a path or
//! stdout, and selects pretty vs. compact JSON. All parsing logic lives in
//! the library.

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;
use std::process::ExitCode;

use clap::builder::PossibleValuesParser;
use clap::{Parser, Subcommand};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use far2l_hst::core::lexer::{detect_header, KNOWN_HEADERS};
use far2l_hst::error::HistoryError;
use far2l_hst::format::{service_for_header, HistoryFormat};

#[derive(Parser, Debug)]
#[command(name = "far2l-hst", version, about = "far2l history export/import tool")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Export .hst to JSON (auto-detect header).
    Export {
        /// Input .hst file path, or '-' for stdin.
        hst_in: String,
        /// Output JSON path, or '-' for stdout.
        json_out: String,
        /// Force a specific parser when auto-detection is ambiguous/missing.
        #[arg(long, value_parser = PossibleValuesParser::new(KNOWN_HEADERS))]
        header: Option<String>,
        /// Pretty-print JSON output with indentation.
        #[arg(long)]
        pretty: bool,
        /// Include a small _cli block with detection info.
        #[arg(long)]
        include_header: bool,
    },
    /// Import JSON to .hst (header inferred from JSON).
    Import {
        /// Input JSON path, or '-' for stdin.
        json_in: String,
        /// Output .hst path, or '-' for stdout.
        hst_out: String,
        /// Override the JSON document's Header field when importing.
        #[arg(long, value_parser = PossibleValuesParser::new(KNOWN_HEADERS))]
        header: Option<String>,
    },
}

#[derive(Error, Debug)]
enum CliError {
    #[error("file not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    History(#[from] HistoryError),
}

impl CliError {
    /// 1 for usage/file errors, 2 for parse/serialization errors.
    fn exit_code(&self) -> u8 {
        match self {
            CliError::NotFound(_) | CliError::Io(_) => 1,
            CliError::Json(_) | CliError::History(_) => 2,
        }
    }
}

fn read_input(path: &str) -> Result<String, CliError> {
    if path == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }
    fs::read_to_string(path).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            CliError::NotFound(path.to_string())
        } else {
            CliError::Io(e)
        }
    })
}

fn write_output(path: &str, text: &str) -> Result<(), CliError> {
    if path == "-" {
        io::stdout().write_all(text.as_bytes())?;
        return Ok(());
    }
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, text)?;
    Ok(())
}

fn cmd_export(
    hst_in: &str,
    json_out: &str,
    forced: Option<&str>,
    pretty: bool,
    include_header: bool,
) -> Result<(), CliError> {
    let text = read_input(hst_in)?;

    let header = match forced {
        Some(h) => h,
        None => detect_header(&text).ok_or_else(|| {
            HistoryError::UnknownHeader(
                "header not found; pass --header to force a parser".to_string(),
            )
        })?,
    };
    debug!(header, input = hst_in, "dispatching export");

    let service = service_for_header(header)?;
    let mut data = service.export(&text)?;

    if include_header {
        if let Some(obj) = data.as_object_mut() {
            obj.insert(
                "_cli".to_string(),
                serde_json::json!({ "detectedHeader": header }),
            );
        }
    }

    let mut rendered = if pretty {
        serde_json::to_string_pretty(&data)?
    } else {
        serde_json::to_string(&data)?
    };
    if pretty {
        rendered.push('\n');
    }
    write_output(json_out, &rendered)
}

fn cmd_import(json_in: &str, hst_out: &str, forced: Option<&str>) -> Result<(), CliError> {
    let raw = read_input(json_in)?;
    let data: Value = serde_json::from_str(&raw)?;

    let header = match forced {
        Some(h) => h.to_string(),
        None => data
            .get("Header")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                HistoryError::UnknownHeader(
                    "JSON lacks 'Header' and no --header override was given".to_string(),
                )
            })?,
    };
    debug!(header = %header, input = json_in, "dispatching import");

    let service = service_for_header(&header)?;
    let text = service.import(&data)?;
    write_output(hst_out, &text)
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.cmd {
        Cmd::Export {
            hst_in,
            json_out,
            header,
            pretty,
            include_header,
        } => cmd_export(&hst_in, &json_out, header.as_deref(), pretty, include_header),
        Cmd::Import {
            json_in,
            hst_out,
            header,
        } => cmd_import(&json_in, &hst_out, header.as_deref()),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("far2l-hst: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}
