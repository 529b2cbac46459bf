use bizlingo_lib::provider::WebContext;
use bizlingo_lib::vocab::models::{DailyItem, DailyResource, DailySet, Sentence, Term};

/// ANSI color codes
#[allow(dead_code)]
pub struct Color;

#[allow(dead_code)]
impl Color {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const ITALIC: &str = "\x1b[3m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";
}

const WIDTH: usize = 80;

pub fn paint(text: &str, color: &str, use_color: bool) -> String {
    if use_color {
        format!("{}{}{}", color, text, Color::RESET)
    } else {
        text.to_string()
    }
}

fn saved_marker(saved: bool, use_color: bool) -> String {
    if saved {
        paint("[saved]", Color::GREEN, use_color)
    } else {
        String::new()
    }
}

pub fn render_term(term: &Term, use_color: bool) -> Vec<String> {
    let mut lines = vec![format!(
        "{}  {}  {} {}",
        paint(&term.term_en, Color::BOLD, use_color),
        term.term_zh,
        paint(&format!("({}, {})", term.category, term.id), Color::GRAY, use_color),
        saved_marker(term.saved, use_color),
    )
    .trim_end()
    .to_string()];
    lines.extend(wrap_lines(&term.explanation, "    ", WIDTH));
    for example in &term.examples {
        let quoted = format!("\u{201c}{}\u{201d}", example);
        lines.extend(
            wrap_lines(&quoted, "    - ", WIDTH)
                .into_iter()
                .map(|l| paint(&l, Color::ITALIC, use_color)),
        );
    }
    if let Some(notes) = term.user_notes.as_deref().filter(|n| !n.is_empty()) {
        lines.extend(wrap_lines(&format!("Notes: {}", notes), "    ", WIDTH));
    }
    lines
}

pub fn render_sentence(sentence: &Sentence, use_color: bool) -> Vec<String> {
    let mut lines = wrap_lines(&sentence.content, "", WIDTH);
    lines.push(
        format!(
            "    {} {}",
            paint(&format!("({}, {})", sentence.category, sentence.id), Color::GRAY, use_color),
            saved_marker(sentence.saved, use_color),
        )
        .trim_end()
        .to_string(),
    );
    lines
}

pub fn render_resource(resource: &DailyResource, use_color: bool) -> Vec<String> {
    let mut lines = vec![format!(
        "{} {}",
        paint(&format!("[{}]", resource.kind.as_str()), Color::CYAN, use_color),
        paint(&resource.title, Color::BOLD, use_color),
    )];
    lines.extend(wrap_lines(&resource.summary, "    ", WIDTH));
    lines.push(format!("    {}", paint(&resource.url, Color::BLUE, use_color)));
    lines
}

/// Daily set with each item's saved flag taken from the library
pub fn render_daily_set(
    daily: &DailySet,
    terms: &[Term],
    sentences: &[Sentence],
    use_color: bool,
) -> String {
    let status = if daily.completed {
        paint("completed", Color::GREEN, use_color)
    } else {
        paint("in progress", Color::YELLOW, use_color)
    };
    let mut lines = vec![
        format!(
            "{}  {}",
            paint(
                &format!("Daily set for {}: {}", daily.date, daily.topic),
                Color::BOLD,
                use_color,
            ),
            status
        ),
        String::new(),
    ];

    for item in &daily.items {
        let item_lines = match item {
            DailyItem::Term(term) => {
                let current = terms.iter().find(|t| t.id == term.id).unwrap_or(term);
                render_term(current, use_color)
            }
            DailyItem::Sentence(sentence) => {
                let current = sentences.iter().find(|s| s.id == sentence.id).unwrap_or(sentence);
                render_sentence(current, use_color)
            }
        };
        lines.extend(item_lines);
        lines.push(String::new());
    }

    if let Some(resource) = &daily.resource {
        lines.push(paint("Recommended", Color::DIM, use_color));
        lines.extend(render_resource(resource, use_color));
    }

    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}

pub fn render_web_context(context: &WebContext, use_color: bool) -> String {
    let mut lines = wrap_lines(&context.text, "", WIDTH);
    if !context.links.is_empty() {
        lines.push(String::new());
        lines.push(paint("Sources", Color::DIM, use_color));
        for link in &context.links {
            lines.push(format!("  - {} {}", link.title, paint(&link.url, Color::BLUE, use_color)));
        }
    }
    lines.join("\n")
}

pub fn wrap_lines(text: &str, prefix: &str, max_width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let effective_width = max_width.saturating_sub(prefix.chars().count());

    for line in text.lines() {
        if line.chars().count() <= effective_width {
            lines.push(format!("{}{}", prefix, line));
            continue;
        }
        let mut current_line = String::new();
        for word in line.split_whitespace() {
            if current_line.is_empty() {
                current_line = word.to_string();
            } else if current_line.chars().count() + 1 + word.chars().count() <= effective_width {
                current_line.push(' ');
                current_line.push_str(word);
            } else {
                lines.push(format!("{}{}", prefix, current_line));
                current_line = word.to_string();
            }
        }
        if !current_line.is_empty() {
            lines.push(format!("{}{}", prefix, current_line));
        }
    }

    if lines.is_empty() && !text.is_empty() {
        lines.push(format!("{}{}", prefix, text));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_lines_respects_width_and_prefix() {
        let lines = wrap_lines("one two three four five", "  ", 12);
        assert_eq!(lines, vec!["  one two", "  three four", "  five"]);
    }

    #[test]
    fn test_paint_without_color_is_plain() {
        assert_eq!(paint("x", Color::BOLD, false), "x");
        assert_eq!(paint("x", Color::BOLD, true), "\x1b[1mx\x1b[0m");
    }
}
