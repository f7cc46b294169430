//! Writes the HTTP API's OpenAPI document, for client generation.
//!
//! Usage:
//!   cargo run --bin generate_openapi > openapi.json
//!   cargo run --bin generate_openapi -- --output openapi.json

use std::{env, fs, io::Write, path::PathBuf};

use agro_station_service::api::handlers::ApiDoc;
use anyhow::{Context, Result};
use utoipa::OpenApi;

fn main() -> Result<()> {
    let json = ApiDoc::openapi()
        .to_pretty_json()
        .context("failed to serialise OpenAPI document")?;

    let args: Vec<String> = env::args().skip(1).collect();
    let output = args
        .windows(2)
        .find(|w| w[0] == "--output")
        .map(|w| PathBuf::from(&w[1]));

    match output {
        Some(path) => {
            fs::write(&path, &json).with_context(|| format!("writing {}", path.display()))?;
            eprintln!("OpenAPI document written to {}", path.display());
        }
        None => std::io::stdout()
            .write_all(json.as_bytes())
            .context("writing to stdout")?,
    }

    Ok(())
}
