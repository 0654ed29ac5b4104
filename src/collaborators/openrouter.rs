//! OpenRouter chat-completions keyword extractor.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::collaborators::{check_status, KeywordExtractor};
use crate::error::CollaboratorError;

/// Most keywords kept from one completion
pub const MAX_EXTRACTED_KEYWORDS: usize = 10;

// == Config ==
#[derive(Debug, Clone)]
pub struct OpenRouterConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for OpenRouterConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://openrouter.ai/api/v1".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            max_tokens: 100,
            temperature: 0.3,
        }
    }
}

// == Wire Types ==
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

// == Extractor ==
/// Asks a chat model for a comma-separated keyword list.
#[derive(Debug, Clone)]
pub struct OpenRouterExtractor {
    client: reqwest::Client,
    config: OpenRouterConfig,
}

impl OpenRouterExtractor {
    pub fn new(config: OpenRouterConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn prompt(message: &str) -> String {
        format!(
            "Extract music-related keywords from this user message. Focus on:\n\
             - Moods and emotions (happy, sad, energetic, calm, romantic, etc.)\n\
             - Music genres (rock, pop, jazz, classical, electronic, etc.)\n\
             - Activities (workout, study, party, sleep, driving, etc.)\n\
             - Time periods (80s, 90s, 2000s, etc.)\n\
             - Seasons or occasions (summer, winter, christmas, etc.)\n\n\
             User message: \"{}\"\n\n\
             Return only the keywords as a comma-separated list, no explanations.\n\
             Maximum {} keywords.",
            message, MAX_EXTRACTED_KEYWORDS
        )
    }
}

#[async_trait]
impl KeywordExtractor for OpenRouterExtractor {
    async fn extract(&self, message: &str) -> Result<Vec<String>, CollaboratorError> {
        let url = format!("{}/chat/completions", self.config.base_url);
        let body = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: Self::prompt(message),
            }],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.config.api_key)
            .header("X-Title", "moodtunes")
            .json(&body)
            .send()
            .await?;
        let response = check_status("openrouter", response).await?;
        let completion: ChatResponse = response.json().await?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| {
                warn!("Completion returned no choices");
                CollaboratorError::MalformedResponse("no choices in completion".to_string())
            })?;

        let keywords = parse_keywords(&content);
        debug!(count = keywords.len(), "Extracted keywords");
        Ok(keywords)
    }
}

/// Splits a completion into at most ten trimmed, non-empty keywords.
pub fn parse_keywords(content: &str) -> Vec<String> {
    content
        .split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .take(MAX_EXTRACTED_KEYWORDS)
        .map(str::to_string)
        .collect()
}
