//! services/api/src/bin/openapi.rs
//!
//! This binary generates the OpenAPI 3.0 document for the REST API
//! and saves it to a file, `openapi.json` unless a path is given.

use api_lib::web::ApiDoc;
use utoipa::OpenApi;

fn write_openapi_doc(
    api_doc: utoipa::openapi::OpenApi,
    path: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc_json = api_doc.to_pretty_json()?;
    std::fs::write(path, doc_json)?;
    println!("OpenAPI document written to {}", path);
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "openapi.json".to_string());
    write_openapi_doc(ApiDoc::openapi(), &path)?;
    Ok(())
}
