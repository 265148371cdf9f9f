use anyhow::Result;
use async_trait::async_trait;
use log::{debug, info};
use reqwest::header::CONTENT_TYPE;
use url::Url;

use crate::config::Config;
use crate::llm::{GenerativeModel, ProviderError, Reply};

use self::types::{GenerateContentRequest, GenerateContentResponse};

pub mod types;

//Gemini REST: https://generativelanguage.googleapis.com/v1beta/models/{model}:generateContent?key={key}
pub struct GeminiClient {
    client: reqwest::Client,
    model: String,
    endpoint: Url,
}

impl GeminiClient {
    pub fn new(
        client: reqwest::Client,
        base_url: &str,
        model: &str,
        api_key: &str,
    ) -> Result<Self> {
        let endpoint = Self::endpoint(base_url, model, api_key)?;
        Ok(Self {
            client,
            model: model.to_string(),
            endpoint,
        })
    }

    pub fn from_config(cfg: &Config) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = cfg.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        Self::new(client, &cfg.base_url, &cfg.model, &cfg.api_key)
    }

    fn endpoint(base_url: &str, model: &str, api_key: &str) -> Result<Url> {
        let mut url = Url::parse(&format!(
            "{}/v1beta/models/{}:generateContent",
            base_url.trim_end_matches('/'),
            model
        ))?;
        url.query_pairs_mut().append_pair("key", api_key);
        Ok(url)
    }

    /// Endpoint without the key, safe to log.
    pub fn redacted_endpoint(&self) -> String {
        let mut url = self.endpoint.clone();
        url.set_query(None);
        url.to_string()
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<Reply, ProviderError> {
        info!("POST {}", self.redacted_endpoint());

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;
        debug!("gemini replied {} ({} bytes)", status, body.len());

        let parsed = serde_json::from_str::<GenerateContentResponse>(&body);

        if let Ok(GenerateContentResponse {
            error: Some(error), ..
        }) = &parsed
        {
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message: error.detail(),
            });
        }

        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        match parsed {
            Ok(reply) => Ok(Reply::Parsed(reply)),
            Err(_) => Ok(Reply::Unparseable),
        }
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server, ServerGuard};
    use serde_json::json;

    const PATH: &str = "/v1beta/models/gemini-2.5-flash:generateContent";

    fn client_for(server: &ServerGuard) -> GeminiClient {
        GeminiClient::new(
            reqwest::Client::new(),
            &server.url(),
            "gemini-2.5-flash",
            "test-key",
        )
        .unwrap()
    }

    #[test]
    fn test_endpoint_embeds_key_as_query() {
        let client = GeminiClient::new(
            reqwest::Client::new(),
            "https://generativelanguage.googleapis.com/",
            "gemini-2.5-flash",
            "secret",
        )
        .unwrap();

        assert_eq!(
            client.endpoint.as_str(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent?key=secret"
        );
        assert!(!client.redacted_endpoint().contains("secret"));
    }

    #[tokio::test]
    async fn test_posts_json_body_with_key() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", PATH)
            .match_query(Matcher::UrlEncoded("key".into(), "test-key".into()))
            .match_header("content-type", "application/json")
            .match_body(Matcher::PartialJson(json!({
                "contents": [ { "parts": [ { "text": "ETH looks weak" } ] } ],
                "generationConfig": { "thinkingConfig": { "thinkingBudget": 0 } }
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"candidates":[{"content":{"parts":[{"text":"NEG"}],"role":"model"}}]}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let request = GenerateContentRequest::new("rubric", "ETH looks weak", 0);
        let reply = client.generate_content(&request).await.unwrap();

        assert!(matches!(reply, Reply::Parsed(_)));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_object_is_provider_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", PATH)
            .match_query(Matcher::Any)
            .with_status(400)
            .with_body(r#"{"error":{"code":400,"message":"API key not valid.","status":"INVALID_ARGUMENT"}}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let request = GenerateContentRequest::new("rubric", "hi", 0);
        let err = client.generate_content(&request).await.unwrap_err();

        assert_eq!(
            err,
            ProviderError::Api {
                status: 400,
                message: "API key not valid. (INVALID_ARGUMENT)".to_string(),
            }
        );
        assert!(err.to_string().contains("API key not valid."));
    }

    #[tokio::test]
    async fn test_non_success_without_error_object() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", PATH)
            .match_query(Matcher::Any)
            .with_status(503)
            .with_body("upstream overloaded")
            .create_async()
            .await;

        let client = client_for(&server);
        let request = GenerateContentRequest::new("rubric", "hi", 0);
        let err = client.generate_content(&request).await.unwrap_err();

        assert!(matches!(err, ProviderError::Status { status: 503, .. }));
        assert!(err.to_string().contains("upstream overloaded"));
    }

    #[tokio::test]
    async fn test_success_with_non_json_body() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", PATH)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>captive portal</html>")
            .create_async()
            .await;

        let client = client_for(&server);
        let request = GenerateContentRequest::new("rubric", "hi", 0);
        let reply = client.generate_content(&request).await.unwrap();

        assert!(matches!(reply, Reply::Unparseable));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let client = GeminiClient::new(
            reqwest::Client::new(),
            "http://127.0.0.1:1",
            "gemini-2.5-flash",
            "test-key",
        )
        .unwrap();
        let request = GenerateContentRequest::new("rubric", "hi", 0);
        let err = client.generate_content(&request).await.unwrap_err();

        assert!(matches!(err, ProviderError::Transport(_)));
        assert!(err.to_string().starts_with("Request failed:"));
    }
}
