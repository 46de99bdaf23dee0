//! LLM prompts for alias generation.

/// System prompt for alias generation.
pub const ALIAS_SYSTEM_PROMPT: &str = "You are an expert in names and cultural naming conventions. \
Your task is to provide a list of common aliases for a given name.";

/// Prompt for proposing short forms of one roster member's name.
pub const ALIAS_PROMPT: &str = r#"Given the teacher's full name: '{name}'
And a list of other distinct full names of teachers in the same faculty: {others}

Task: Provide a comma-separated list of common alternative names, nicknames, or shortened versions that colleagues or students might use for '{name}'.
Consider the following types of aliases:
1.  Common shortenings of the first name (e.g., Thomas -> Tom, Elizabeth -> Liz, Beth).
2.  Initials if commonly used (e.g., T. Monk, if Thomas Monk is the full name).
3.  Common nicknames (e.g., Raffaele -> Raffi, William -> Bill, Billy).
4.  If the name appears to be of non-Western origin, suggest plausible common English/Westernized equivalents or shortenings that might be adopted in a Western academic setting.
5.  Avoid overly generic or ambiguous aliases that could easily be confused with other names if not strongly associated with the original name.

Constraints:
- The output must be a single line of text containing only the comma-separated aliases.
- Do NOT include the original full name '{name}' in the alias list.
- If no common, distinct, and plausible aliases are likely, or if generating an alias risks collision with another teacher's name (from the provided list or common knowledge), return an empty string or the word 'None'.
- Do not add any explanatory text, preamble, or markdown formatting. Just the comma-separated list.

Example for 'Thomas Monk' (with no other conflicting names): Tom, T. Monk, Tommy
Example for 'Raffaele Blasone': Raffi, Raf
Example for 'Jennifer Aniston': Jen, Jenny
Example for a name like 'Xiang Li' (assuming 'Li' is family name): Shawn (if a common Western adaptation)

Provide the list for '{name}':"#;

/// Placeholder used when the subject is the only roster member.
pub const NO_OTHER_NAMES: &str = "None available";

/// Token budget for an alias list.
pub const ALIAS_MAX_TOKENS: u32 = 60;

/// Low temperature keeps suggestions to well-known short forms.
pub const ALIAS_TEMPERATURE: f32 = 0.2;

/// Format the alias prompt.
///
/// `others` should already exclude the subject.
pub fn format_alias_prompt(name: &str, others: &[&str]) -> String {
    let others_text = if others.is_empty() {
        NO_OTHER_NAMES.to_string()
    } else {
        others.join(", ")
    };

    ALIAS_PROMPT
        .replace("{others}", &others_text)
        .replace("{name}", name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_alias_prompt_lists_other_names() {
        let formatted = format_alias_prompt("Dr. Eleanor Vance", &["Dr. Tom Smith", "Dr. Yi Chen"]);
        assert!(formatted.contains("'Dr. Eleanor Vance'"));
        assert!(formatted.contains("Dr. Tom Smith, Dr. Yi Chen"));
        assert!(!formatted.contains("{name}"));
        assert!(!formatted.contains("{others}"));
    }

    #[test]
    fn test_format_alias_prompt_without_other_names() {
        let formatted = format_alias_prompt("Raffaele Blasone", &[]);
        assert!(formatted.contains(NO_OTHER_NAMES));
    }
}
