//! Basic OpenAI client usage example

use std::time::Duration;

use openai_client::{ChatRequest, Message, OpenAIClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = OpenAIClient::from_env()?
        .with_timeout(Duration::from_secs(30))
        .with_max_retries(2);

    let response = client
        .chat_completion(
            ChatRequest::new("gpt-4o")
                .message(Message::system(
                    "You are an expert in names and naming conventions.",
                ))
                .message(Message::user(
                    "List common nicknames for 'William Turner' as a comma-separated line.",
                ))
                .temperature(0.2)
                .max_tokens(60),
        )
        .await?;

    println!("Aliases: {}", response.content);
    if let Some(usage) = response.usage {
        println!("Tokens used: {}", usage.total_tokens);
    }

    Ok(())
}
