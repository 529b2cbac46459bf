use anyhow::{bail, Result};

use bizlingo_lib::vocab::models::ItemKind;
use bizlingo_lib::vocab::search::{
    saved_sentences, saved_terms_by_category, search_sentences, search_terms,
};

use crate::app::App;
use crate::render::terminal::{paint, render_sentence, render_term, Color};
use crate::OutputFormat;

pub fn run_search(
    app: &App,
    query: Option<&str>,
    sentences: bool,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let query = query.unwrap_or("");
    let state = app.session.state();

    if sentences {
        let results = search_sentences(&state.sentences, query);
        match format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&results)?),
            OutputFormat::Plain => {
                if results.is_empty() {
                    println!("No sentences found for '{}'.", query);
                    return Ok(());
                }
                for sentence in &results {
                    println!("{}\n", render_sentence(sentence, use_color).join("\n"));
                }
                println!("{} sentences", results.len());
            }
        }
    } else {
        let results = search_terms(&state.terms, query);
        match format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&results)?),
            OutputFormat::Plain => {
                if results.is_empty() {
                    println!("No terms found for '{}'.", query);
                    return Ok(());
                }
                for term in &results {
                    println!("{}\n", render_term(term, use_color).join("\n"));
                }
                println!("{} terms", results.len());
            }
        }
    }
    Ok(())
}

pub fn run_saved(app: &App, format: &OutputFormat, use_color: bool) -> Result<()> {
    let state = app.session.state();
    let grouped = saved_terms_by_category(&state.terms);
    let sentences = saved_sentences(&state.sentences);

    match format {
        OutputFormat::Json => {
            let categories: Vec<serde_json::Value> = grouped
                .iter()
                .map(|(category, terms)| {
                    serde_json::json!({ "category": category, "terms": terms })
                })
                .collect();
            let output = serde_json::json!({
                "terms": categories,
                "sentences": sentences,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if grouped.is_empty() && sentences.is_empty() {
                println!(
                    "Nothing saved yet. Save terms or sentences from your daily set or the library."
                );
                return Ok(());
            }
            for (category, terms) in &grouped {
                println!("{}", paint(category, Color::BOLD, use_color));
                for term in terms {
                    for line in render_term(term, use_color) {
                        println!("  {}", line);
                    }
                }
                println!();
            }
            if !sentences.is_empty() {
                println!("{}", paint("Sentences", Color::BOLD, use_color));
                for sentence in &sentences {
                    for line in render_sentence(sentence, use_color) {
                        println!("  {}", line);
                    }
                }
            }
        }
    }
    Ok(())
}

pub fn run_toggle(app: &mut App, id: &str, sentence: bool, format: &OutputFormat) -> Result<()> {
    let kind = if sentence { ItemKind::Sentence } else { ItemKind::Term };
    let Some(saved) = app.session.toggle_save(kind, id)? else {
        bail!("No {} with id '{}' in the library", kind.as_str(), id);
    };

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::json!({ "id": id, "kind": kind.as_str(), "saved": saved }));
        }
        OutputFormat::Plain => {
            println!("{} {} {}", if saved { "Saved" } else { "Unsaved" }, kind.as_str(), id);
        }
    }
    Ok(())
}
