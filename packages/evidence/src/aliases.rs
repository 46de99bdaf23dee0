//! Alias generation with local collision filtering.
//!
//! The backend proposes nicknames, initials and shortenings. Nothing it
//! returns is trusted: every fragment is checked against the subject and
//! the rest of the roster before it can become a search term.

use std::collections::HashSet;

use tracing::{debug, instrument, warn};

use crate::error::BackendResult;
use crate::prompts::{format_alias_prompt, ALIAS_MAX_TOKENS, ALIAS_SYSTEM_PROMPT, ALIAS_TEMPERATURE};
use crate::scanner::normalize;
use crate::traits::backend::{CompletionRequest, TextBackend};

/// Generates collision-free aliases for roster members.
pub struct AliasGenerator<B> {
    backend: B,
}

impl<B: TextBackend> AliasGenerator<B> {
    /// Create a generator backed by `backend`.
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Access the underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Aliases for `subject`, or an empty list if the backend fails.
    ///
    /// Failures are logged and absorbed; exact-name matching still works
    /// without aliases.
    #[instrument(skip(self, roster), fields(subject = %subject, roster_size = roster.len()))]
    pub async fn generate(&self, subject: &str, roster: &[String]) -> Vec<String> {
        match self.try_generate(subject, roster).await {
            Ok(aliases) => {
                if aliases.is_empty() {
                    debug!("No distinct aliases suggested");
                } else {
                    debug!(aliases = ?aliases, "Generated aliases");
                }
                aliases
            }
            Err(e) => {
                warn!(error = %e, "Alias generation failed, continuing without aliases");
                Vec::new()
            }
        }
    }

    /// Aliases for `subject`, surfacing backend failures.
    pub async fn try_generate(&self, subject: &str, roster: &[String]) -> BackendResult<Vec<String>> {
        let subject_key = normalize(subject);
        if subject_key.is_empty() {
            return Ok(Vec::new());
        }

        let others: Vec<&str> = roster
            .iter()
            .filter(|name| normalize(name) != subject_key)
            .map(String::as_str)
            .collect();

        let request = CompletionRequest::new(ALIAS_SYSTEM_PROMPT, format_alias_prompt(subject, &others))
            .with_max_tokens(ALIAS_MAX_TOKENS)
            .with_temperature(ALIAS_TEMPERATURE);

        let raw = self.backend.complete(request).await?;
        Ok(parse_alias_response(&raw, subject, roster))
    }
}

/// Turn a raw comma-separated backend answer into a filtered alias list.
///
/// - empty text or the `None` sentinel yields no aliases
/// - fragments are trimmed and empty ones dropped
/// - anything equal to `subject` or another roster name (ignoring case and
///   whitespace) is dropped
/// - duplicates are dropped, keeping the first spelling seen
pub fn parse_alias_response(raw: &str, subject: &str, roster: &[String]) -> Vec<String> {
    let body = strip_fences(raw);
    if body.is_empty() || body.trim_end_matches('.').eq_ignore_ascii_case("none") {
        return Vec::new();
    }

    let subject_key = normalize(subject);
    let taken: HashSet<String> = roster
        .iter()
        .map(|name| normalize(name))
        .chain(std::iter::once(subject_key))
        .collect();

    let mut seen = HashSet::new();
    let mut aliases = Vec::new();
    for fragment in body.split(',').map(str::trim).filter(|f| !f.is_empty()) {
        let key = normalize(fragment);
        if key.is_empty() || taken.contains(&key) {
            continue;
        }
        if seen.insert(key) {
            aliases.push(fragment.to_string());
        }
    }
    aliases
}

fn strip_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let trimmed = trimmed
        .strip_prefix("```text")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    trimmed.trim_end_matches("```").trim()
}
