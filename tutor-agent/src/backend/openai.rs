//! OpenAI-compatible chat completions backend.
//!
//! Gemini, OpenAI, Ollama and vLLM all serve this API shape under their
//! own base URL.

use async_trait::async_trait;
use reqwest::{header, Client, Response, StatusCode};

use super::traits::*;

/// Chat completions over HTTP.
pub struct OpenAiBackend {
    client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl OpenAiBackend {
    /// `base_url` is the API root, e.g. `https://api.openai.com/v1`.
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
    ) -> Result<Self, LlmError> {
        let client = Client::builder()
            .build()
            .map_err(|e| LlmError::Unavailable(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    async fn error_for(response: Response) -> LlmError {
        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_ms = response
                .headers()
                .get(header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(|secs| secs * 1000);
            return LlmError::RateLimited { retry_after_ms };
        }
        LlmError::RequestFailed {
            status: status.as_u16(),
            body: response.text().await.unwrap_or_default(),
        }
    }
}

/// Request and response bodies of the chat completions API.
mod wire {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize)]
    pub struct ChatRequest<'a> {
        pub model: &'a str,
        pub messages: Vec<ChatMessage<'a>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub max_tokens: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub temperature: Option<f32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub response_format: Option<ResponseFormat>,
    }

    #[derive(Debug, Serialize)]
    pub struct ChatMessage<'a> {
        pub role: &'static str,
        pub content: &'a str,
    }

    #[derive(Debug, Serialize)]
    pub struct ResponseFormat {
        #[serde(rename = "type")]
        pub kind: &'static str,
    }

    #[derive(Debug, Deserialize)]
    pub struct ChatResponse {
        #[serde(default)]
        pub choices: Vec<Choice>,
        pub usage: Option<TokenCounts>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Choice {
        pub message: AssistantMessage,
        pub finish_reason: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    pub struct AssistantMessage {
        pub content: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    pub struct TokenCounts {
        pub prompt_tokens: u32,
        pub completion_tokens: u32,
    }
}

#[async_trait]
impl LlmBackend for OpenAiBackend {
    fn id(&self) -> &str {
        &self.model
    }

    async fn is_available(&self) -> bool {
        self.authorize(self.client.get(self.endpoint("models")))
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let mut messages = Vec::with_capacity(2);
        if let Some(instructions) = &request.instructions {
            messages.push(wire::ChatMessage {
                role: "system",
                content: instructions,
            });
        }
        messages.push(wire::ChatMessage {
            role: "user",
            content: &request.prompt,
        });

        let body = wire::ChatRequest {
            model: &self.model,
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            response_format: request
                .expects_json()
                .then_some(wire::ResponseFormat { kind: "json_object" }),
        };

        let response = self
            .authorize(self.client.post(self.endpoint("chat/completions")))
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::error_for(response).await);
        }

        let chat: wire::ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::ParseError(e.to_string()))?;

        let choice = chat
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::ParseError("response has no choices".to_string()))?;

        let truncated = matches!(
            choice.finish_reason.as_deref(),
            Some("length") | Some("content_filter")
        );
        let usage = chat
            .usage
            .map(|u| Usage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
            })
            .unwrap_or_default();

        Ok(CompletionResponse {
            content: choice.message.content.unwrap_or_default(),
            truncated,
            usage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn backend_for(server: &MockServer, key: Option<&str>) -> OpenAiBackend {
        OpenAiBackend::new(
            format!("{}/v1/", server.uri()),
            "test-model",
            key.map(str::to_string),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_json_reply_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer secret"))
            .and(body_partial_json(serde_json::json!({
                "model": "test-model",
                "response_format": { "type": "json_object" },
                "messages": [
                    { "role": "system", "content": "Be kind" },
                    { "role": "user", "content": "Hi" }
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{
                    "message": { "content": "أحسنت!" },
                    "finish_reason": "stop"
                }],
                "usage": { "prompt_tokens": 12, "completion_tokens": 3 }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let backend = backend_for(&server, Some("secret")).await;
        let response = backend
            .complete(
                CompletionRequest::new("Hi")
                    .with_instructions("Be kind")
                    .expecting_json(),
            )
            .await
            .unwrap();

        assert_eq!(response.content, "أحسنت!");
        assert!(!response.truncated);
        assert_eq!(response.usage.total(), 15);
    }

    #[tokio::test]
    async fn test_length_stop_marks_truncated() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{ "message": { "content": "رسالة" }, "finish_reason": "length" }]
            })))
            .mount(&server)
            .await;

        let backend = backend_for(&server, None).await;
        let response = backend.complete(CompletionRequest::new("Hi")).await.unwrap();
        assert!(response.truncated);
        assert_eq!(response.usage, Usage::default());
    }

    #[tokio::test]
    async fn test_rate_limit_reads_retry_after() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "2"))
            .mount(&server)
            .await;

        let backend = backend_for(&server, None).await;
        let result = backend.complete(CompletionRequest::new("Hi")).await;

        assert_eq!(
            result.unwrap_err(),
            LlmError::RateLimited { retry_after_ms: Some(2000) }
        );
    }

    #[tokio::test]
    async fn test_server_error_keeps_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let backend = backend_for(&server, None).await;
        let result = backend.complete(CompletionRequest::new("Hi")).await;

        assert_eq!(
            result.unwrap_err(),
            LlmError::RequestFailed {
                status: 503,
                body: "overloaded".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_empty_choices_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "choices": [] })))
            .mount(&server)
            .await;

        let backend = backend_for(&server, None).await;
        let result = backend.complete(CompletionRequest::new("Hi")).await;

        assert!(matches!(result, Err(LlmError::ParseError(_))));
    }

    #[tokio::test]
    async fn test_availability_probe() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/models"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "data": [] })))
            .mount(&server)
            .await;

        assert!(backend_for(&server, None).await.is_available().await);
    }
}
