use anyhow::{Context, Result};

use crate::app::App;
use crate::render::terminal::{paint, render_web_context, wrap_lines, Color};
use crate::OutputFormat;

pub async fn run_explain(
    app: &App,
    id: &str,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let term = app.term(id)?.term_en.clone();
    let explanation = app
        .session
        .explain_term(id)
        .await
        .with_context(|| format!("No term with id '{}'", id))?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "id": id,
                "term": term,
                "explanation": explanation,
            });
            println!("{}", output);
        }
        OutputFormat::Plain => {
            println!("{}", paint(&term, Color::BOLD, use_color));
            for line in wrap_lines(&explanation, "", 80) {
                println!("{}", line);
            }
        }
    }
    Ok(())
}

pub async fn run_rewrite(
    app: &App,
    id: &str,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let content = app.sentence(id)?.content.clone();
    let variations = app
        .session
        .sentence_variations(id)
        .await
        .with_context(|| format!("No sentence with id '{}'", id))?;

    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "id": id,
                    "sentence": content,
                    "variations": variations,
                }))?
            );
        }
        OutputFormat::Plain => {
            println!("{}", paint(&content, Color::DIM, use_color));
            if variations.is_empty() {
                println!("No variations available.");
            }
            for variation in &variations {
                for line in wrap_lines(variation, "  - ", 80) {
                    println!("{}", line);
                }
            }
        }
    }
    Ok(())
}

pub async fn run_context(
    app: &App,
    id: &str,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let term = app.term(id)?.term_en.clone();
    let context = app
        .session
        .search_web(id)
        .await
        .with_context(|| format!("No term with id '{}'", id))?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&context)?),
        OutputFormat::Plain => {
            println!("{}\n", paint(&format!("{} in the real world", term), Color::BOLD, use_color));
            println!("{}", render_web_context(&context, use_color));
        }
    }
    Ok(())
}
