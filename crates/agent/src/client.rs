// OpenAI-compatible chat client
//
// Works against any `/chat/completions` endpoint: OpenAI, OpenRouter,
// Ollama. Blocking reqwest client; no Tokio runtime required.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use internmatch_config::ai::{AIConfigStatus, ResolvedAIConfig};
use internmatch_engine::Dataset;

use crate::agent::{Agent, AskError};
use crate::context::TableContext;

const DEFAULT_MAX_CONTEXT_ROWS: usize = 500;

// ============================================================================
// OpenAI API types
// ============================================================================

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

// ============================================================================
// OpenAiAgent
// ============================================================================

/// Agent backed by an OpenAI-compatible chat completions API.
#[derive(Clone)]
pub struct OpenAiAgent {
    http: reqwest::blocking::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    max_context_rows: usize,
}

impl OpenAiAgent {
    /// Build from the resolved AI configuration.
    pub fn from_config(config: &ResolvedAIConfig) -> Result<Self, AskError> {
        match config.status {
            AIConfigStatus::Disabled => {
                return Err(AskError::NotConfigured("AI is disabled".to_string()));
            }
            AIConfigStatus::MissingKey => return Err(AskError::MissingKey),
            AIConfigStatus::Ready => {}
        }

        let agent = Self::new(
            &config.endpoint,
            &config.model,
            config.api_key.clone(),
            Duration::from_secs(config.timeout_secs),
        )?;
        Ok(agent.with_max_context_rows(config.max_context_rows))
    }

    /// `endpoint` is the API base, e.g. `https://openrouter.ai/api/v1`.
    pub fn new(
        endpoint: &str,
        model: &str,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, AskError> {
        let mut builder = reqwest::blocking::Client::builder()
            .user_agent(format!("internmatch/{}", env!("CARGO_PKG_VERSION")))
            .timeout(timeout);
        // Local model servers are never reached through a proxy
        if is_loopback(endpoint) {
            builder = builder.no_proxy();
        }
        let http = builder
            .build()
            .map_err(|e| AskError::Network(e.to_string()))?;

        Ok(Self {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key,
            max_context_rows: DEFAULT_MAX_CONTEXT_ROWS,
        })
    }

    pub fn with_max_context_rows(mut self, rows: usize) -> Self {
        self.max_context_rows = rows;
        self
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.endpoint)
    }
}

impl Agent for OpenAiAgent {
    fn ask(&self, prompt: &str, dataset: &Dataset) -> Result<String, AskError> {
        let context = TableContext::from_dataset(dataset, self.max_context_rows);
        for warning in &context.warnings {
            log::info!("{}", warning.message());
        }

        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: build_system_prompt(),
                },
                ChatMessage {
                    role: "user",
                    content: build_user_prompt(prompt, &context),
                },
            ],
            temperature: 0.2,
            max_tokens: 1024,
        };

        log::debug!(
            "POST {} model={} rows={}/{}",
            self.completions_url(),
            self.model,
            context.rows.len(),
            context.total_rows
        );

        let mut builder = self.http.post(self.completions_url()).json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }
        let response = builder
            .send()
            .map_err(|e| AskError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&error_text)
                .map(|body| body.error.message)
                .unwrap_or(error_text);
            return Err(AskError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: ChatResponse = response
            .json()
            .map_err(|e| AskError::Parse(e.to_string()))?;

        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .ok_or_else(|| AskError::InvalidResponse("No choices in response".to_string()))?;

        if content.is_empty() {
            return Err(AskError::InvalidResponse("Empty answer".to_string()));
        }
        Ok(content)
    }
}

fn is_loopback(endpoint: &str) -> bool {
    let Ok(url) = reqwest::Url::parse(endpoint) else {
        return false;
    };
    match url.host_str() {
        Some("localhost") => true,
        Some(host) => host
            .trim_matches(|c| c == '[' || c == ']')
            .parse::<std::net::IpAddr>()
            .map(|ip| ip.is_loopback())
            .unwrap_or(false),
        None => false,
    }
}

fn build_system_prompt() -> String {
    "You are an internship recommendation assistant. You are given a table of \
     internship listings. Answer only from the rows in that table. When you \
     recommend an internship, write its internship name and company exactly as \
     they appear in the table."
        .to_string()
}

fn build_user_prompt(prompt: &str, context: &TableContext) -> String {
    let mut text = String::new();
    text.push_str(&format!(
        "DATASET ({} of {} rows):\n",
        context.rows.len(),
        context.total_rows
    ));
    text.push_str(&context.to_prompt_text());
    text.push_str("\nREQUEST:\n");
    text.push_str(prompt);
    text.push('\n');
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use internmatch_engine::Listing;

    fn dataset() -> Dataset {
        Dataset::new(vec![Listing {
            name: Some("Data Intern".into()),
            company: Some("Acme".into()),
            domain: Some("Data Analytics".into()),
            ..Default::default()
        }])
    }

    fn agent(server: &MockServer, key: Option<&str>) -> OpenAiAgent {
        OpenAiAgent::new(
            &server.url("/v1/"),
            "test-model",
            key.map(String::from),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_ask_returns_first_choice() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/v1/chat/completions")
                .header("authorization", "Bearer sk-test")
                .body_includes("\"model\":\"test-model\"")
                .body_includes("Data Intern | Acme | Data Analytics");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(serde_json::json!({
                    "choices": [
                        { "message": { "role": "assistant", "content": "  Try Data Intern at Acme.  " } }
                    ]
                }));
        });

        let answer = agent(&server, Some("sk-test"))
            .ask("A student says: \"data\".", &dataset())
            .unwrap();
        mock.assert();
        assert_eq!(answer, "Try Data Intern at Acme.");
    }

    #[test]
    fn test_ask_api_error_message() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(429).json_body(serde_json::json!({
                "error": { "message": "Rate limit exceeded", "type": "rate_limit" }
            }));
        });

        let err = agent(&server, Some("sk-test")).ask("q", &dataset()).unwrap_err();
        assert_eq!(
            err,
            AskError::Api {
                status: 429,
                message: "Rate limit exceeded".into()
            }
        );
        assert_eq!(err.to_string(), "API error (429): Rate limit exceeded");
    }

    #[test]
    fn test_ask_plain_text_error_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(502).body("bad gateway");
        });

        let err = agent(&server, None).ask("q", &dataset()).unwrap_err();
        assert_eq!(
            err,
            AskError::Api {
                status: 502,
                message: "bad gateway".into()
            }
        );
    }

    #[test]
    fn test_ask_no_choices() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(200).json_body(serde_json::json!({ "choices": [] }));
        });

        let err = agent(&server, None).ask("q", &dataset()).unwrap_err();
        assert!(matches!(err, AskError::InvalidResponse(_)));
    }

    #[test]
    fn test_ask_malformed_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(200).body("<html>not json</html>");
        });

        let err = agent(&server, None).ask("q", &dataset()).unwrap_err();
        assert!(matches!(err, AskError::Parse(_)));
    }

    #[test]
    fn test_is_loopback() {
        assert!(is_loopback("http://localhost:11434/v1"));
        assert!(is_loopback("http://127.0.0.1:8080"));
        assert!(is_loopback("http://[::1]:8080/v1"));
        assert!(!is_loopback("https://openrouter.ai/api/v1"));
        assert!(!is_loopback("http://localhost.example.com/v1"));
        assert!(!is_loopback("http://127.0.0.1.nip.io/v1"));
        assert!(!is_loopback("localhost:11434"));
    }

    #[test]
    fn test_from_config_rejects_disabled_provider() {
        let config = ResolvedAIConfig::from_settings(&internmatch_config::AISettings {
            provider: internmatch_config::AIProvider::None,
            ..Default::default()
        });
        assert!(matches!(
            OpenAiAgent::from_config(&config),
            Err(AskError::NotConfigured(_))
        ));
    }
}
