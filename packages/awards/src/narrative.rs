//! Recommendation drafting.
//!
//! The backend writes only the message body. Headings, the sign-off and the
//! list of quotes that went into the prompt are added here, so every file has
//! the same shape whether or not generation succeeded.

use evidence::{split_lines, BackendError, CompletionRequest, TextBackend};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::prompts::{
    format_recommendation_prompt, MAX_FEEDBACK_QUOTES, MAX_MESSAGE_CHARS, MAX_OPINION_QUOTES,
    RECOMMENDATION_MAX_TOKENS, RECOMMENDATION_SYSTEM_PROMPT,
};

const TITLES: &[&str] = &["dr", "mr", "ms", "mrs", "prof", "professor"];

#[derive(Debug, Error)]
pub enum NarrativeError {
    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("backend returned an empty recommendation")]
    Empty,
}

/// A finished recommendation ready to be saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub teacher: String,
    pub markdown: String,
    /// True when generation failed and the body is a manual-review notice.
    pub fallback: bool,
}

impl Recommendation {
    /// Placeholder written when generation fails.
    pub fn fallback(teacher: &str, reason: &str) -> Self {
        let notice = format!(
            "[Automated generation failed due to an error: {reason}. \
             Please review available data for {teacher} manually.]"
        );
        Self {
            teacher: teacher.to_string(),
            markdown: frame(teacher, &notice),
            fallback: true,
        }
    }

    /// Length in characters.
    pub fn char_count(&self) -> usize {
        self.markdown.chars().count()
    }
}

/// The word to greet a teacher by.
///
/// A leading title (`Dr`, `Prof.`, ...) is skipped when another word follows.
pub fn first_name(name: &str) -> &str {
    let parts: Vec<&str> = name.split_whitespace().collect();
    match parts.as_slice() {
        [] => name,
        [title, next, ..] if is_title(title) => *next,
        [first, ..] => *first,
    }
}

fn is_title(word: &str) -> bool {
    let word = word.to_lowercase();
    TITLES.contains(&word.trim_end_matches('.'))
}

fn frame(teacher: &str, body: &str) -> String {
    format!(
        "# {teacher}\n\n# Recommendation message:\n\n{body}\n\nFantastic job, {}!",
        first_name(teacher)
    )
}

/// Collapse a multi-line quote to one line.
fn flatten(text: &str) -> String {
    split_lines(text).join(" ").trim().to_string()
}

fn sources_block(feedback: &[String], opinions: &[String], had_opinions: bool) -> String {
    let mut lines = vec![
        "---".to_string(),
        "**Sources Used for Generation:**".to_string(),
        "**Student Feedback:**".to_string(),
    ];

    if feedback.is_empty() {
        lines.push("- No specific student feedback provided.".to_string());
    } else {
        lines.extend(feedback.iter().map(|quote| format!("- \"{quote}\"")));
    }

    lines.push("**Professor Opinions:**".to_string());
    if !opinions.is_empty() {
        lines.extend(opinions.iter().map(|quote| format!("- \"{quote}\"")));
    } else if had_opinions {
        lines.push("- No professor opinions were included in the prompt.".to_string());
    } else {
        lines.push("- No specific professor opinions provided.".to_string());
    }

    lines.join("\n")
}

/// Drafts recommendation messages with a [`TextBackend`].
pub struct NarrativeWriter<B> {
    backend: B,
}

impl<B: TextBackend> NarrativeWriter<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Draft the recommendation for one teacher.
    ///
    /// Uses the first few feedback quotes and opinions. An overlong result is
    /// logged and kept.
    #[instrument(
        skip(self, feedback, opinions),
        fields(teacher = %teacher, feedback = feedback.len(), opinions = opinions.len())
    )]
    pub async fn write(
        &self,
        teacher: &str,
        feedback: &[String],
        opinions: &[String],
    ) -> Result<Recommendation, NarrativeError> {
        let feedback_used: Vec<String> = feedback.iter().take(MAX_FEEDBACK_QUOTES).cloned().collect();
        let opinions_used: Vec<String> = opinions
            .iter()
            .take(MAX_OPINION_QUOTES)
            .map(|opinion| flatten(opinion))
            .filter(|opinion| !opinion.is_empty())
            .collect();

        let request = CompletionRequest::new(
            RECOMMENDATION_SYSTEM_PROMPT,
            format_recommendation_prompt(teacher, &feedback_used, &opinions_used),
        )
        .with_max_tokens(RECOMMENDATION_MAX_TOKENS);

        let response = self.backend.complete(request).await?;
        let body = response.trim();
        if body.is_empty() {
            return Err(NarrativeError::Empty);
        }

        let markdown = format!(
            "{}\n\n{}",
            frame(teacher, body),
            sources_block(&feedback_used, &opinions_used, !opinions.is_empty())
        );

        let recommendation = Recommendation {
            teacher: teacher.to_string(),
            markdown,
            fallback: false,
        };

        let chars = recommendation.char_count();
        if chars > MAX_MESSAGE_CHARS {
            warn!(chars, limit = MAX_MESSAGE_CHARS, "Recommendation exceeds character limit");
        } else {
            debug!(chars, "Recommendation drafted");
        }

        Ok(recommendation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evidence::{MockBackend, MockCall};

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_first_name() {
        assert_eq!(first_name("Dr. Ada Lovelace"), "Ada");
        assert_eq!(first_name("PROF Alan Turing"), "Alan");
        assert_eq!(first_name("Professor X"), "X");
        assert_eq!(first_name("Grace Hopper"), "Grace");
        assert_eq!(first_name("Dr."), "Dr.");
        assert_eq!(first_name("Drew Carey"), "Drew");
        assert_eq!(first_name(""), "");
    }

    #[test]
    fn test_flatten() {
        assert_eq!(flatten(" Line one\nline two \r\n"), "Line one line two");
        assert_eq!(flatten("One\rtwo\u{2028}three\x0bfour"), "One two three four");
    }

    #[test]
    fn test_fallback_layout() {
        let rec = Recommendation::fallback("Dr. Ada Lovelace", "backend unreachable: timeout");

        assert!(rec.fallback);
        assert_eq!(
            rec.markdown,
            "# Dr. Ada Lovelace\n\n# Recommendation message:\n\n\
             [Automated generation failed due to an error: backend unreachable: timeout. \
             Please review available data for Dr. Ada Lovelace manually.]\n\n\
             Fantastic job, Ada!"
        );
    }

    #[tokio::test]
    async fn test_write_renders_template_and_sources() {
        let backend = MockBackend::new().with_default_response("  She is brilliant.  ");
        let writer = NarrativeWriter::new(backend.clone());

        let rec = writer
            .write(
                "Dr. Ada Lovelace",
                &strings(&["Clear explanations"]),
                &strings(&["Dr. Ada ran the\nrevision class."]),
            )
            .await
            .unwrap();

        assert!(!rec.fallback);
        assert_eq!(
            rec.markdown,
            "# Dr. Ada Lovelace\n\n# Recommendation message:\n\nShe is brilliant.\n\n\
             Fantastic job, Ada!\n\n---\n**Sources Used for Generation:**\n\
             **Student Feedback:**\n- \"Clear explanations\"\n\
             **Professor Opinions:**\n- \"Dr. Ada ran the revision class.\""
        );

        let calls = backend.calls();
        assert_eq!(calls.len(), 1);
        let MockCall::Complete { user, max_tokens, .. } = &calls[0];
        assert_eq!(*max_tokens, Some(1000));
        assert!(user.contains("Professor Comment 1: \"Dr. Ada ran the revision class.\""));
    }

    #[tokio::test]
    async fn test_write_limits_quotes() {
        let backend = MockBackend::new().with_default_response("Body");
        let writer = NarrativeWriter::new(backend.clone());
        let feedback: Vec<String> = (1..=7).map(|i| format!("quote {i}")).collect();
        let opinions: Vec<String> = (1..=4).map(|i| format!("opinion {i}")).collect();

        let rec = writer.write("Grace Hopper", &feedback, &opinions).await.unwrap();

        assert!(rec.markdown.contains("- \"quote 5\""));
        assert!(!rec.markdown.contains("quote 6"));
        assert!(rec.markdown.contains("- \"opinion 3\""));
        assert!(!rec.markdown.contains("opinion 4"));

        let MockCall::Complete { user, .. } = &backend.calls()[0];
        assert!(!user.contains("quote 6"));
        assert!(!user.contains("opinion 4"));
    }

    #[tokio::test]
    async fn test_write_without_sources() {
        let writer = NarrativeWriter::new(MockBackend::new().with_default_response("Body"));

        let rec = writer.write("Ms. Grace Hopper", &[], &[]).await.unwrap();
        assert!(rec.markdown.contains("- No specific student feedback provided."));
        assert!(rec.markdown.contains("- No specific professor opinions provided."));

        let rec = writer
            .write("Ms. Grace Hopper", &[], &strings(&[" \n "]))
            .await
            .unwrap();
        assert!(rec.markdown.contains("- No professor opinions were included in the prompt."));
    }

    #[tokio::test]
    async fn test_write_errors() {
        let writer = NarrativeWriter::new(MockBackend::failing());
        let err = writer.write("Dr. Ada Lovelace", &[], &[]).await.unwrap_err();
        assert!(matches!(err, NarrativeError::Backend(BackendError::Network(_))));

        let writer = NarrativeWriter::new(MockBackend::new().with_default_response("   "));
        let err = writer.write("Dr. Ada Lovelace", &[], &[]).await.unwrap_err();
        assert!(matches!(err, NarrativeError::Empty));
    }

    #[tokio::test]
    async fn test_overlong_message_is_kept() {
        let long = "a".repeat(MAX_MESSAGE_CHARS + 10);
        let writer = NarrativeWriter::new(MockBackend::new().with_default_response(long));

        let rec = writer.write("Dr. Ada Lovelace", &[], &[]).await.unwrap();
        assert!(rec.char_count() > MAX_MESSAGE_CHARS);
    }
}
