use anyhow::{bail, Result};

use crate::app::App;
use crate::render::terminal::{paint, wrap_lines, Color};
use crate::OutputFormat;

pub async fn run(
    app: &mut App,
    topic: &str,
    add: bool,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    if topic.trim().is_empty() {
        bail!("Topic must not be empty");
    }

    let drafts = app.session.generate_terms(topic).await;
    if drafts.is_empty() {
        match format {
            OutputFormat::Json => println!("[]"),
            OutputFormat::Plain => println!("No terms generated for '{}'.", topic.trim()),
        }
        return Ok(());
    }

    if add {
        let mut added = Vec::with_capacity(drafts.len());
        for draft in drafts {
            added.push(app.session.add_generated_term(draft)?);
        }
        match format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&added)?),
            OutputFormat::Plain => {
                for term in &added {
                    println!("+ {} ({})", paint(&term.term_en, Color::BOLD, use_color), term.id);
                }
                println!("\nAdded {} saved terms to your library.", added.len());
            }
        }
        return Ok(());
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&drafts)?),
        OutputFormat::Plain => {
            for (i, draft) in drafts.iter().enumerate() {
                println!(
                    "{}. {}  {}",
                    i + 1,
                    paint(&draft.term_en, Color::BOLD, use_color),
                    draft.term_zh
                );
                for line in wrap_lines(&draft.explanation, "    ", 80) {
                    println!("{}", line);
                }
            }
            println!("\nRun again with --add to keep these terms.");
        }
    }
    Ok(())
}
