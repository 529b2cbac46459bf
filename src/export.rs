//! CSV export of saved items

use std::io::Write;

use chrono::NaiveDate;
use thiserror::Error;

use crate::vocab::models::{Sentence, Term};
use crate::vocab::search::saved_sentences;

pub const CSV_HEADER: [&str; 5] = ["Type", "Category", "Content", "Translation/Meaning", "Notes"];

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ExportError>;

pub fn default_export_file_name(date: NaiveDate) -> String {
    format!("bizlingo_export_{}.csv", date.format("%Y-%m-%d"))
}

/// Write saved terms then saved sentences, one row each.
/// Returns the number of rows; nothing is written when nothing is saved.
pub fn export_saved_csv<W: Write>(
    writer: W,
    terms: &[Term],
    sentences: &[Sentence],
) -> Result<usize> {
    let saved_terms: Vec<&Term> = terms.iter().filter(|t| t.saved).collect();
    let saved_sentences = saved_sentences(sentences);
    if saved_terms.is_empty() && saved_sentences.is_empty() {
        return Ok(0);
    }

    let mut csv_writer = csv::WriterBuilder::new().from_writer(writer);
    csv_writer.write_record(CSV_HEADER)?;

    for term in &saved_terms {
        let meaning = format!("{} - {}", term.term_zh, term.explanation);
        csv_writer.write_record([
            "Term",
            term.category.as_str(),
            term.term_en.as_str(),
            meaning.as_str(),
            term.user_notes.as_deref().unwrap_or(""),
        ])?;
    }
    for sentence in &saved_sentences {
        csv_writer.write_record([
            "Sentence",
            sentence.category.as_str(),
            sentence.content.as_str(),
            "",
            "",
        ])?;
    }
    csv_writer.flush()?;

    let rows = saved_terms.len() + saved_sentences.len();
    log::info!("Exported {} saved items", rows);
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::seed::{sample_sentences, sample_terms};

    #[test]
    fn test_export_writes_saved_items_only() {
        let mut terms = sample_terms();
        terms[0].saved = true;
        let mut sentences = sample_sentences();
        sentences[2].saved = true;

        let mut out = Vec::new();
        let rows = export_saved_csv(&mut out, &terms, &sentences).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(rows, 2);
        assert_eq!(lines[0], "Type,Category,Content,Translation/Meaning,Notes");
        assert_eq!(
            lines[1],
            "Term,Project Management,Deliverable,交付成果 - A tangible or intangible good or service produced as a result of a project.,"
        );
        assert_eq!(
            lines[2],
            "Sentence,Meetings,Let's take this offline to avoid holding up the meeting.,,"
        );
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_export_quotes_fields_with_commas_and_quotes() {
        let sentences = vec![Sentence {
            id: "x".to_string(),
            content: "He said \"fine, ship it\"".to_string(),
            category: "Email".to_string(),
            saved: true,
        }];

        let mut out = Vec::new();
        export_saved_csv(&mut out, &[], &sentences).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("\"He said \"\"fine, ship it\"\"\""));
    }

    #[test]
    fn test_export_with_nothing_saved_writes_nothing() {
        let mut out = Vec::new();
        let rows = export_saved_csv(&mut out, &sample_terms(), &sample_sentences()).unwrap();

        assert_eq!(rows, 0);
        assert!(out.is_empty());
    }

    #[test]
    fn test_default_file_name() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        assert_eq!(default_export_file_name(date), "bizlingo_export_2026-01-05.csv");
    }
}
