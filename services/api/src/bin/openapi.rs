//! services/api/src/bin/openapi.rs
//!
//! This binary generates the OpenAPI 3.0 specification for the REST API
//! and saves it to a file, `openapi.json` unless a path is given.

use api_lib::web::rest::ApiDoc;
use utoipa::OpenApi;

/// Renders the OpenAPI document and writes it to a file.
fn write_openapi(
    api_doc: utoipa::openapi::OpenApi,
    path: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let path_count = api_doc.paths.paths.len();
    let spec_json = api_doc.to_pretty_json()?;
    std::fs::write(path, spec_json)?;
    println!("OpenAPI specification ({} paths) generated at {}", path_count, path);
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "openapi.json".to_string());
    write_openapi(ApiDoc::openapi(), &path)?;
    Ok(())
}
