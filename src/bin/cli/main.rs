mod app;
mod commands;
mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "bizlingo", about = "Daily business English vocabulary", version)]
struct Cli {
    /// Read config from this file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Show today's terms and sentences
    Today,

    /// Replace today's set with fresh content on a topic
    Refresh {
        /// Topic, e.g. "Negotiation"
        topic: String,
    },

    /// Mark today's set as complete
    Complete,

    /// Save or unsave a library item
    Save {
        /// Item id
        id: String,
        /// The id is a sentence, not a term
        #[arg(long)]
        sentence: bool,
    },

    /// Save every item in today's set
    SaveAll,

    /// Search the library
    Library {
        /// Search text (empty lists everything)
        query: Option<String>,
        /// Search sentences instead of terms
        #[arg(long)]
        sentences: bool,
    },

    /// List saved items by category
    Saved,

    /// Generate new terms on a topic
    Generate {
        /// Topic, e.g. "Supply Chain"
        topic: String,
        /// Add the generated terms to the library as saved
        #[arg(long)]
        add: bool,
    },

    /// Explain a term in plain language
    Explain {
        /// Term id
        id: String,
    },

    /// Suggest professional rewrites of a sentence
    Rewrite {
        /// Sentence id
        id: String,
    },

    /// Show how a term is used in current news and business writing
    Context {
        /// Term id
        id: String,
    },

    /// Export saved items to CSV
    Export {
        /// Output file (default: bizlingo_export_YYYY-MM-DD.csv)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Show streak and completed days
    Progress,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let use_color = !cli.no_color && atty_check();
    let mut app = app::App::open(cli.config.as_deref())?;

    match cli.command {
        Command::Today => {
            commands::daily::run_today(&mut app, &cli.format, use_color).await?;
        }
        Command::Refresh { topic } => {
            commands::daily::run_refresh(&mut app, &topic, &cli.format, use_color).await?;
        }
        Command::Complete => {
            commands::daily::run_complete(&mut app, &cli.format, use_color)?;
        }
        Command::Save { id, sentence } => {
            commands::library::run_toggle(&mut app, &id, sentence, &cli.format)?;
        }
        Command::SaveAll => {
            commands::daily::run_save_all(&mut app, &cli.format)?;
        }
        Command::Library { query, sentences } => {
            commands::library::run_search(
                &app,
                query.as_deref(),
                sentences,
                &cli.format,
                use_color,
            )?;
        }
        Command::Saved => {
            commands::library::run_saved(&app, &cli.format, use_color)?;
        }
        Command::Generate { topic, add } => {
            commands::generate::run(&mut app, &topic, add, &cli.format, use_color).await?;
        }
        Command::Explain { id } => {
            commands::assist::run_explain(&app, &id, &cli.format, use_color).await?;
        }
        Command::Rewrite { id } => {
            commands::assist::run_rewrite(&app, &id, &cli.format, use_color).await?;
        }
        Command::Context { id } => {
            commands::assist::run_context(&app, &id, &cli.format, use_color).await?;
        }
        Command::Export { output } => {
            commands::export::run(&app, output.as_deref(), &cli.format)?;
        }
        Command::Progress => {
            commands::progress::run(&app, &cli.format, use_color)?;
        }
    }

    Ok(())
}

/// Check if stdout is a terminal (for color support)
fn atty_check() -> bool {
    unsafe { libc_isatty(1) != 0 }
}

extern "C" {
    #[link_name = "isatty"]
    fn libc_isatty(fd: i32) -> i32;
}
