//! Library search and saved-item views

use super::models::{Sentence, Term};

/// Terms whose English text or explanation contains `query` (ignoring case),
/// or whose Chinese text contains it verbatim. An empty query matches all.
pub fn search_terms<'a>(terms: &'a [Term], query: &str) -> Vec<&'a Term> {
    let query = query.trim();
    let needle = query.to_lowercase();
    terms
        .iter()
        .filter(|t| {
            t.term_en.to_lowercase().contains(&needle)
                || t.term_zh.contains(query)
                || t.explanation.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Sentences whose content or category contains `query`, ignoring case
pub fn search_sentences<'a>(sentences: &'a [Sentence], query: &str) -> Vec<&'a Sentence> {
    let needle = query.trim().to_lowercase();
    sentences
        .iter()
        .filter(|s| {
            s.content.to_lowercase().contains(&needle)
                || s.category.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Saved terms grouped by category, groups in first-seen order
pub fn saved_terms_by_category(terms: &[Term]) -> Vec<(String, Vec<&Term>)> {
    let mut groups: Vec<(String, Vec<&Term>)> = Vec::new();
    for term in terms.iter().filter(|t| t.saved) {
        match groups.iter_mut().find(|(category, _)| *category == term.category) {
            Some((_, members)) => members.push(term),
            None => groups.push((term.category.clone(), vec![term])),
        }
    }
    groups
}

pub fn saved_sentences(sentences: &[Sentence]) -> Vec<&Sentence> {
    sentences.iter().filter(|s| s.saved).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::seed::{sample_sentences, sample_terms};

    #[test]
    fn test_search_terms_matches_english_and_explanation() {
        let terms = sample_terms();

        let hits = search_terms(&terms, "bottleneck");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "t8");

        // "growing amount of work" only appears in the Scalability explanation
        let hits = search_terms(&terms, "GROWING AMOUNT");
        assert_eq!(hits[0].id, "t3");
    }

    #[test]
    fn test_search_terms_matches_chinese_verbatim() {
        let terms = sample_terms();
        let hits = search_terms(&terms, "痛点");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "t4");
    }

    #[test]
    fn test_empty_query_matches_everything() {
        assert_eq!(search_terms(&sample_terms(), "").len(), 8);
        assert_eq!(search_sentences(&sample_sentences(), "  ").len(), 6);
    }

    #[test]
    fn test_search_sentences_matches_category() {
        let sentences = sample_sentences();
        let hits = search_sentences(&sentences, "meetings");
        assert_eq!(hits.iter().map(|s| s.id.as_str()).collect::<Vec<_>>(), vec!["s2", "s3"]);
    }

    #[test]
    fn test_saved_terms_grouped_in_first_seen_order() {
        let mut terms = sample_terms();
        for id in ["t8", "t1", "t3"] {
            terms.iter_mut().find(|t| t.id == id).unwrap().saved = true;
        }
        terms[2].category = "Project Management".to_string();

        let groups = saved_terms_by_category(&terms);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "Project Management");
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[1].0, "Operations");
    }

    #[test]
    fn test_saved_sentences_filters_unsaved() {
        let mut sentences = sample_sentences();
        sentences[4].saved = true;
        let saved = saved_sentences(&sentences);
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].id, "s5");
    }
}
