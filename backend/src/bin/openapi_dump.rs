//! Print the OpenAPI document as JSON, or write it to a file.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::io::{self, Write};
use std::path::PathBuf;

use allergy_scan_backend::ApiDoc;
use clap::Parser;
use utoipa::OpenApi;

/// `openapi_dump` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "openapi_dump",
    about = "Export the allergy scan backend OpenAPI document",
    version
)]
struct CliArgs {
    /// Write to this file instead of standard output.
    #[arg(long, value_name = "path")]
    output: Option<PathBuf>,
}

fn main() -> io::Result<()> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let document = ApiDoc::openapi()
        .to_pretty_json()
        .map_err(|error| io::Error::other(format!("serialise OpenAPI document: {error}")))?;

    match args.output {
        Some(path) => std::fs::write(&path, document),
        None => writeln!(io::stdout().lock(), "{document}"),
    }
}
