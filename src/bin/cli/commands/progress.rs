use anyhow::Result;

use crate::app::App;
use crate::render::terminal::{paint, Color};
use crate::OutputFormat;

pub fn run(app: &App, format: &OutputFormat, use_color: bool) -> Result<()> {
    let progress = &app.session.state().progress;
    let today = app.session.today();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(progress)?),
        OutputFormat::Plain => {
            let plural = if progress.streak == 1 { "" } else { "s" };
            let streak = format!("{} day{}", progress.streak, plural);
            println!("Streak: {}", paint(&streak, Color::BOLD, use_color));
            match progress.last_check_in {
                Some(date) => println!("Last check-in: {}", date),
                None => println!("Last check-in: never"),
            }
            let today_status = if progress.has_completed(today) {
                paint("done", Color::GREEN, use_color)
            } else {
                paint("not yet", Color::YELLOW, use_color)
            };
            println!("Today: {}", today_status);

            if !progress.completed_dates.is_empty() {
                println!("\nCompleted days:");
                for date in progress.completed_dates.iter().rev() {
                    println!("  {}", date);
                }
            }
        }
    }
    Ok(())
}
