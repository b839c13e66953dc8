//! Version command

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;

/// Run the version command.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn run(app: &AppContext) -> Result<ExitCode> {
    let version = env!("CARGO_PKG_VERSION");
    match app.renderer() {
        crate::output::Renderer::Json(r) => r.render(&serde_json::json!({ "version": version }))?,
        crate::output::Renderer::Human(_) => println!("sitepub {version}"),
    }
    Ok(ExitCode::SUCCESS)
}
