//! services/api/src/bin/openapi.rs
//!
//! Writes the OpenAPI document of the Wingman REST surface to disk, so the
//! mobile client can generate its bindings without a running server.
//!
//! Usage: `openapi [OUTPUT]` (defaults to `openapi.json`).

use std::path::PathBuf;
use utoipa::OpenApi;
use wingman_api::web::rest::ApiDoc;

const DEFAULT_OUTPUT: &str = "openapi.json";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let output = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));

    let document = ApiDoc::openapi().to_pretty_json()?;
    std::fs::write(&output, document)?;
    println!("Wrote OpenAPI document to {}", output.display());
    Ok(())
}
