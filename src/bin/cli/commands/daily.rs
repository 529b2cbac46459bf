use anyhow::{bail, Result};

use bizlingo_lib::session::RefreshOutcome;

use crate::app::App;
use crate::render::terminal::{paint, render_daily_set, Color};
use crate::OutputFormat;

pub async fn run_today(app: &mut App, format: &OutputFormat, use_color: bool) -> Result<()> {
    app.session.ensure_resource().await?;
    print_daily(app, format, use_color)
}

pub async fn run_refresh(
    app: &mut App,
    topic: &str,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    if topic.trim().is_empty() {
        bail!("Topic must not be empty");
    }

    let outcome = app.session.refresh_daily(topic).await?;
    match outcome {
        RefreshOutcome::Generated { .. } | RefreshOutcome::FellBack => {
            app.session.ensure_resource().await?;
        }
        RefreshOutcome::AlreadyRefreshing | RefreshOutcome::Superseded => {
            bail!("Another refresh is in progress");
        }
    }

    if let (OutputFormat::Plain, RefreshOutcome::FellBack) = (format, &outcome) {
        println!(
            "{}\n",
            paint(
                "Could not generate new content; picked from your library instead.",
                Color::YELLOW,
                use_color,
            )
        );
    }
    print_daily(app, format, use_color)
}

pub fn run_complete(app: &mut App, format: &OutputFormat, use_color: bool) -> Result<()> {
    let newly_completed = app.session.complete_daily()?;
    let progress = &app.session.state().progress;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "completed": true,
                "newlyCompleted": newly_completed,
                "streak": progress.streak,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if newly_completed {
                println!("{}", paint("Daily set complete!", Color::GREEN, use_color));
            } else {
                println!("Today's set was already complete.");
            }
            let plural = if progress.streak == 1 { "" } else { "s" };
            println!("Streak: {} day{}", progress.streak, plural);
        }
    }
    Ok(())
}

pub fn run_save_all(app: &mut App, format: &OutputFormat) -> Result<()> {
    let count = app.session.save_all_daily()?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::json!({ "saved": count })),
        OutputFormat::Plain => println!("Saved {} items from today's set.", count),
    }
    Ok(())
}

fn print_daily(app: &App, format: &OutputFormat, use_color: bool) -> Result<()> {
    let state = app.session.state();
    let Some(daily) = &state.daily_set else {
        bail!("No daily set available");
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(daily)?),
        OutputFormat::Plain => {
            println!("{}", render_daily_set(daily, &state.terms, &state.sentences, use_color));
        }
    }
    Ok(())
}
