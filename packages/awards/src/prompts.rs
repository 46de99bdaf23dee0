//! LLM prompts for recommendation drafting.

/// System prompt for recommendation drafting.
pub const RECOMMENDATION_SYSTEM_PROMPT: &str = "You are an assistant helping to draft teaching award recommendations. \
Your output should be only the recommendation message text itself, ready to be embedded in a larger document. \
Adhere strictly to character limits if specified elsewhere, though the primary goal is a strong recommendation based on provided inputs. \
Do not add any extra conversational text or markdown formatting like ## or titles within your direct output.";

/// Prompt for one teacher's recommendation.
pub const RECOMMENDATION_PROMPT: &str = r#"Task: Create a compelling and concise recommendation message (up to {max_chars} characters) for a teaching award for {name}.
The message should highlight their strengths based on student feedback and professor opinions.
Begin the recommendation text directly, without any preamble like 'Here is the recommendation message'.
The overall tone should be positive, celebratory, and professional.

Key Information:
- Teacher's Name: {name}

{feedback}

{opinions}

Instructions for the message content:
- Synthesize the provided feedback and opinions into a coherent and impactful recommendation.
- Focus on specific qualities or achievements if evident from the information.
- Ensure the message flows well and is engaging.
- The message itself should be the core content, avoid introductory or concluding phrases not part of the specified final output format.
- Do NOT include a title like 'Recommendation Message:' in your generated text. The surrounding template will handle titles.
- The generated text will be placed within a template, so just provide the message body."#;

const NO_FEEDBACK: &str =
    "Student Positive Feedback: No specific quotes provided, but generally positive performance is implied.";

const NO_OPINIONS: &str = "Professor's Opinions/Comments: No specific quotes provided.";

/// Student quotes included in a prompt.
pub const MAX_FEEDBACK_QUOTES: usize = 5;

/// Colleague opinions included in a prompt.
pub const MAX_OPINION_QUOTES: usize = 3;

/// Character ceiling for a finished message.
pub const MAX_MESSAGE_CHARS: usize = 4000;

/// About 4000 characters.
pub const RECOMMENDATION_MAX_TOKENS: u32 = 1000;

/// Format the recommendation prompt from already-selected quotes.
pub fn format_recommendation_prompt(name: &str, feedback: &[String], opinions: &[String]) -> String {
    let feedback_text = if feedback.is_empty() {
        NO_FEEDBACK.to_string()
    } else {
        let quotes: Vec<String> = feedback
            .iter()
            .enumerate()
            .map(|(i, quote)| format!("  - Student {}: \"{}\"", i + 1, quote))
            .collect();
        format!(
            "Student Positive Feedback (selected quotes):\n{}",
            quotes.join("\n")
        )
    };

    let opinions_text = if opinions.is_empty() {
        NO_OPINIONS.to_string()
    } else {
        let quotes: Vec<String> = opinions
            .iter()
            .enumerate()
            .map(|(i, quote)| format!("  - Professor Comment {}: \"{}\"", i + 1, quote))
            .collect();
        format!(
            "Professor's Opinions/Comments (selected quotes):\n{}",
            quotes.join("\n")
        )
    };

    RECOMMENDATION_PROMPT
        .replace("{name}", name)
        .replace("{max_chars}", &MAX_MESSAGE_CHARS.to_string())
        .replace("{feedback}", &feedback_text)
        .replace("{opinions}", &opinions_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_numbers_quotes() {
        let prompt = format_recommendation_prompt(
            "Dr. Ada Lovelace",
            &["Clear explanations".to_string(), "Always supportive".to_string()],
            &["A standout instructor.".to_string()],
        );

        assert!(prompt.contains("for a teaching award for Dr. Ada Lovelace."));
        assert!(prompt.contains("- Teacher's Name: Dr. Ada Lovelace"));
        assert!(prompt.contains("  - Student 2: \"Always supportive\""));
        assert!(prompt.contains("  - Professor Comment 1: \"A standout instructor.\""));
        assert!(prompt.contains("up to 4000 characters"));
        assert!(!prompt.contains('{'));
    }

    #[test]
    fn test_prompt_without_sources() {
        let prompt = format_recommendation_prompt("Ms. Grace Hopper", &[], &[]);

        assert!(prompt.contains(NO_FEEDBACK));
        assert!(prompt.contains(NO_OPINIONS));
    }
}
