use super::prompt::{build_recipe_message, RECIPE_PARSER_PROMPT};
use super::types::{ChatCompletionRequest, ChatCompletionResponse};
use plainplates_errors::AppError;
use std::time::Duration;

pub struct MistralClient {
    http_client: reqwest::Client,
    api_key: String,
    api_url: String,
    model: String,
}

impl MistralClient {
    pub fn new(
        api_key: String,
        api_url: String,
        model: String,
        timeout: Duration,
    ) -> Result<Self, AppError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            api_key,
            api_url,
            model,
        })
    }

    /// Ask the model to structure `raw_text`. Returns the reply text as-is;
    /// parsing it is the caller's job.
    pub async fn structure_recipe(&self, raw_text: &str) -> Result<String, AppError> {
        let request = ChatCompletionRequest::new(
            &self.model,
            RECIPE_PARSER_PROMPT,
            build_recipe_message(raw_text),
        );

        let response = self
            .http_client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Upstream(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Mistral error: {} - {}", status, body);
            return Err(AppError::Upstream(format!("API error: {}", status)));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(e.to_string()))?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| AppError::Upstream("No response from model".to_string()))
    }
}
