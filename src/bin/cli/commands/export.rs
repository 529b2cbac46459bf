use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use bizlingo_lib::export::{default_export_file_name, export_saved_csv};

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, output: Option<&Path>, format: &OutputFormat) -> Result<()> {
    let state = app.session.state();
    if !state.terms.iter().any(|t| t.saved) && !state.sentences.iter().any(|s| s.saved) {
        match format {
            OutputFormat::Json => println!("{}", serde_json::json!({ "rows": 0 })),
            OutputFormat::Plain => println!("Nothing saved yet; no file written."),
        }
        return Ok(());
    }

    let path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(default_export_file_name(app.session.today())));
    let file = File::create(&path).with_context(|| format!("Failed to create {}", path.display()))?;
    let rows = export_saved_csv(file, &state.terms, &state.sentences)
        .context("Failed to write CSV")?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::json!({ "rows": rows, "path": path.to_string_lossy() }));
        }
        OutputFormat::Plain => println!("Exported {} items to {}", rows, path.display()),
    }
    Ok(())
}
