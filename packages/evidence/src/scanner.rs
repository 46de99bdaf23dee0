//! Word-bounded mention scanning.
//!
//! Lines are matched in a case-folded, whitespace-collapsed form, but
//! snippets are cut from the original lines so casing and spacing survive
//! into the output.

use std::collections::BTreeSet;

use regex::Regex;
use tracing::{trace, warn};

use crate::types::Document;

/// Lines of context kept on each side of a matching line.
pub const DEFAULT_WINDOW: usize = 2;

/// Split text into lines.
///
/// Breaks on `\n`, `\r\n`, lone `\r`, `\x0b`, `\x0c`, `\x1c`-`\x1e`,
/// `\u{85}`, `\u{2028}` and `\u{2029}`. A trailing break does not produce a
/// final empty line.
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if !is_line_break(c) {
            continue;
        }
        lines.push(&text[start..i]);
        start = i + c.len_utf8();
        if c == '\r' {
            if let Some(&(j, '\n')) = chars.peek() {
                chars.next();
                start = j + 1;
            }
        }
    }

    if start < text.len() {
        lines.push(&text[start..]);
    }
    lines
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Collapse whitespace runs to single spaces and lowercase.
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Ordered set of normalized search terms for one subject.
///
/// The subject comes first, then aliases in the order given. Each term is
/// compiled to a pattern that refuses to match when the term touches a word
/// character on either side, so `tom` never matches inside `tommy` or
/// `bottom`.
#[derive(Debug, Clone)]
pub struct SearchTerms {
    terms: Vec<(String, Regex)>,
}

impl SearchTerms {
    /// Build the term list for a subject and its aliases.
    pub fn new<S: AsRef<str>>(subject: &str, aliases: &[S]) -> Self {
        let mut terms: Vec<(String, Regex)> = Vec::with_capacity(aliases.len() + 1);

        let candidates = std::iter::once(subject).chain(aliases.iter().map(AsRef::as_ref));
        for term in candidates.map(normalize) {
            if term.is_empty() || terms.iter().any(|(t, _)| *t == term) {
                continue;
            }
            match bounded_pattern(&term) {
                Ok(pattern) => terms.push((term, pattern)),
                Err(e) => warn!(term = %term, error = %e, "Skipping unusable search term"),
            }
        }

        Self { terms }
    }

    /// True when no usable terms remain.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Number of usable terms.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// The normalized terms in match order.
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(|(t, _)| t.as_str())
    }

    /// First term found in an already-normalized line.
    pub fn first_match(&self, normalized_line: &str) -> Option<&str> {
        self.terms
            .iter()
            .find(|(_, pattern)| pattern.is_match(normalized_line))
            .map(|(term, _)| term.as_str())
    }
}

fn bounded_pattern(term: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(r"(?:^|\W){}(?:\W|$)", regex::escape(term)))
}

/// Find every context snippet mentioning `subject` or one of its aliases.
///
/// Each matching line contributes at most one snippet: the line plus
/// `window` lines either side, clipped to the document, trimmed. Results are
/// deduplicated and sorted lexicographically.
pub fn find_mentions<S: AsRef<str>>(
    subject: &str,
    aliases: &[S],
    corpus: &[Document],
    window: usize,
) -> Vec<String> {
    let terms = SearchTerms::new(subject, aliases);
    if terms.is_empty() {
        return Vec::new();
    }

    let mut snippets = BTreeSet::new();
    for document in corpus {
        scan_document(&terms, document, window, &mut snippets);
    }
    snippets.into_iter().collect()
}

fn scan_document(
    terms: &SearchTerms,
    document: &Document,
    window: usize,
    snippets: &mut BTreeSet<String>,
) {
    let lines = split_lines(&document.text);

    for (i, line) in lines.iter().enumerate() {
        let Some(term) = terms.first_match(&normalize(line)) else {
            continue;
        };

        let start = i.saturating_sub(window);
        let end = i.saturating_add(window).saturating_add(1).min(lines.len());
        let snippet = lines[start..end].join("\n");
        let snippet = snippet.trim();

        trace!(
            term,
            line = i,
            source = document.source.as_deref().unwrap_or("-"),
            "Mention found"
        );

        if !snippet.is_empty() {
            snippets.insert(snippet.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_ALIASES: &[&str] = &[];

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  Dr.   Eleanor\tVANCE \n"), "dr. eleanor vance");
        assert_eq!(normalize(" \t "), "");
    }

    #[test]
    fn test_word_boundary() {
        let corpus = vec![Document::from_lines([
            "Tom is excellent.",
            "Tommy is his son.",
            "Bottom line is clear.",
        ])];

        let snippets = find_mentions("Thomas Monk", &["Tom"], &corpus, 0);
        assert_eq!(snippets, vec!["Tom is excellent."]);
    }

    #[test]
    fn test_context_window() {
        let corpus = vec![Document::from_lines([
            "Line 1: Previous unrelated sentence.",
            "Line 2: Professor Delta is truly outstanding.",
            "Line 3: Her dedication is clear.",
            "Line 4: Another sentence after.",
        ])];

        let snippets = find_mentions("Professor Delta", NO_ALIASES, &corpus, 1);
        assert_eq!(
            snippets,
            vec![
                "Line 1: Previous unrelated sentence.\n\
                 Line 2: Professor Delta is truly outstanding.\n\
                 Line 3: Her dedication is clear."
            ]
        );
    }

    #[test]
    fn test_window_clips_to_document_bounds() {
        let corpus = vec![Document::from_lines(["Dr. Alpha opened.", "Second line."])];

        let snippets = find_mentions("Dr. Alpha", NO_ALIASES, &corpus, DEFAULT_WINDOW);
        assert_eq!(snippets, vec!["Dr. Alpha opened.\nSecond line."]);
    }

    #[test]
    fn test_line_with_two_mentions_counts_once() {
        let corpus = vec![Document::new("Dr. Epsilon is good. We like Dr. Epsilon.")];

        let snippets = find_mentions("Dr. Epsilon", &["Epsilon"], &corpus, 0);
        assert_eq!(snippets, vec!["Dr. Epsilon is good. We like Dr. Epsilon."]);
    }

    #[test]
    fn test_case_insensitive() {
        let corpus = vec![Document::new("We all agree dr. alpha. She is fantastic")];

        let snippets = find_mentions("Dr. Alpha", NO_ALIASES, &corpus, 0);
        assert_eq!(snippets.len(), 1);
        assert!(snippets[0].contains("dr. alpha. She is fantastic"));
    }

    #[test]
    fn test_whitespace_in_line_is_collapsed_for_matching_only() {
        let corpus = vec![Document::new("Thanks to   Professor\tDelta  today")];

        let snippets = find_mentions("Professor Delta", NO_ALIASES, &corpus, 0);
        assert_eq!(snippets, vec!["Thanks to   Professor\tDelta  today"]);
    }

    #[test]
    fn test_identical_windows_are_deduplicated_and_sorted() {
        let corpus = vec![
            Document::new("Zed says Dr. Phi helped."),
            Document::new("Zed says Dr. Phi helped."),
            Document::new("Also Dr. Phi ran the review."),
        ];

        let snippets = find_mentions("Dr. Phi", NO_ALIASES, &corpus, 0);
        assert_eq!(
            snippets,
            vec!["Also Dr. Phi ran the review.", "Zed says Dr. Phi helped."]
        );
    }

    #[test]
    fn test_alias_only_mentions_are_found() {
        let corpus = vec![Document::from_lines([
            "Prof. Alpha is great.",
            "",
            "Also, Dr. A. did a fantastic job this semester.",
        ])];

        let snippets = find_mentions("Prof. Alpha", &["Dr. A."], &corpus, 0);
        assert_eq!(
            snippets,
            vec![
                "Also, Dr. A. did a fantastic job this semester.",
                "Prof. Alpha is great."
            ]
        );
    }

    #[test]
    fn test_blank_aliases_are_discarded() {
        let terms = SearchTerms::new("Dr. Omega", &["  ", "", "Omega", "omega"]);
        assert_eq!(terms.terms().collect::<Vec<_>>(), vec!["dr. omega", "omega"]);
        assert_eq!(terms.len(), 2);
    }

    #[test]
    fn test_regex_metacharacters_are_literal() {
        let corpus = vec![Document::from_lines(["Dr. A+ (Math) rocks", "Dr A (Math) rocks"])];

        let snippets = find_mentions("Dr. A+ (Math)", NO_ALIASES, &corpus, 0);
        assert_eq!(snippets, vec!["Dr. A+ (Math) rocks"]);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(find_mentions("Dr. Alpha", NO_ALIASES, &[], 2).is_empty());
        assert!(find_mentions("Dr. Alpha", NO_ALIASES, &[Document::new("")], 2).is_empty());
        assert!(find_mentions("  ", NO_ALIASES, &[Document::new("anything")], 2).is_empty());
    }

    #[test]
    fn test_split_lines_boundaries() {
        assert_eq!(split_lines("a\nb\r\nc\rd"), vec!["a", "b", "c", "d"]);
        assert_eq!(
            split_lines("a\x0bb\x0cc\x1cd\x1de\x1ef\u{85}g\u{2028}h\u{2029}i"),
            vec!["a", "b", "c", "d", "e", "f", "g", "h", "i"]
        );
        assert_eq!(split_lines("a\n\nb\n"), vec!["a", "", "b"]);
        assert_eq!(split_lines("\r\r\n"), vec!["", ""]);
        assert!(split_lines("").is_empty());
    }

    #[test]
    fn test_lone_carriage_returns_separate_lines() {
        let corpus = vec![Document::new("Intro line\rDr. Alpha is great\rOutro line")];

        let snippets = find_mentions("Dr. Alpha", NO_ALIASES, &corpus, 0);
        assert_eq!(snippets, vec!["Dr. Alpha is great"]);
    }

    #[test]
    fn test_huge_window_keeps_whole_document() {
        let corpus = vec![Document::from_lines(["Intro", "Dr. Alpha is great", "Outro"])];

        let snippets = find_mentions("Dr. Alpha", NO_ALIASES, &corpus, usize::MAX);
        assert_eq!(snippets, vec!["Intro\nDr. Alpha is great\nOutro"]);
    }

    #[test]
    fn test_crlf_lines() {
        let corpus = vec![Document::new("Intro\r\nMs. Kappa presented\r\nOutro")];

        let snippets = find_mentions("Ms. Kappa", NO_ALIASES, &corpus, 1);
        assert_eq!(snippets, vec!["Intro\nMs. Kappa presented\nOutro"]);
    }
}
