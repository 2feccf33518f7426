//! Write the Bloglist OpenAPI document as JSON.
//!
//! Usage:
//!   export_openapi                      # stdout
//!   export_openapi --output openapi.json

use anyhow::Context;
use bloglist::gateway::openapi::ApiDoc;
use utoipa::OpenApi;

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let output = match args.as_slice() {
        [_, flag, path, ..] if flag == "--output" || flag == "-o" => Some(path.as_str()),
        _ => None,
    };

    let json = ApiDoc::openapi()
        .to_pretty_json()
        .context("Failed to serialize OpenAPI document")?;

    match output {
        Some(path) => {
            std::fs::write(path, &json).with_context(|| format!("Failed to write {}", path))?;
            eprintln!("OpenAPI document written to {}", path);
        }
        None => println!("{}", json),
    }
    Ok(())
}
