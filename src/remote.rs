//! Remote configuration loading
//!
//! One request, no retry, no timeout of its own. Callers wrap it in
//! whatever policy they need.

use std::future::Future;

use crate::error::{Result, SyntaxError};
use crate::syntax::ConfigModel;

/// A transport response: status code and body text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

impl FetchResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Something that can GET a document by URL
pub trait Fetcher {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<FetchResponse>>;
}

impl ConfigModel {
    /// Fetch, validate and index a JSON document through `fetcher`
    pub async fn from_remote_with<F: Fetcher>(fetcher: &F, url: &str) -> Result<Self> {
        let response = fetcher.fetch(url).await?;
        if !response.is_success() {
            return Err(SyntaxError::Fetch {
                url: url.to_string(),
                status: response.status,
            });
        }
        tracing::debug!(url, bytes = response.body.len(), "fetched configuration");
        Self::from_json(&response.body)
    }

    /// Fetch, validate and index a JSON document over HTTP
    #[cfg(feature = "remote")]
    pub async fn from_remote(url: &str) -> Result<Self> {
        Self::from_remote_with(&HttpFetcher::default(), url).await
    }
}

/// HTTP transport backed by reqwest
#[cfg(feature = "remote")]
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

#[cfg(feature = "remote")]
impl HttpFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[cfg(feature = "remote")]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchResponse> {
        let transport = |e: reqwest::Error| SyntaxError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        };
        let response = self.client.get(url).send().await.map_err(transport)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(transport)?;
        Ok(FetchResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct MemoryFetcher {
        documents: HashMap<&'static str, FetchResponse>,
    }

    impl Fetcher for MemoryFetcher {
        async fn fetch(&self, url: &str) -> Result<FetchResponse> {
            self.documents
                .get(url)
                .cloned()
                .ok_or_else(|| SyntaxError::Transport {
                    url: url.to_string(),
                    message: "connection refused".to_string(),
                })
        }
    }

    fn fetcher() -> MemoryFetcher {
        let mut documents = HashMap::new();
        documents.insert(
            "https://example.test/grammar.json",
            FetchResponse {
                status: 200,
                body: r##"{
                    "version": "1.0.0",
                    "highlightingRules": [
                        { "name": "Ops", "matchType": "keyword", "tokens": [
                            { "keyword": "eq", "type": "ComparisonOperator", "description": "Equal" }
                        ] }
                    ],
                    "types": [
                        { "className": "ComparisonOperator", "highlightColor": "#569cd6", "parentType": "Operator" }
                    ]
                }"##
                .to_string(),
            },
        );
        documents.insert(
            "https://example.test/missing.json",
            FetchResponse {
                status: 404,
                body: "not found".to_string(),
            },
        );
        documents.insert(
            "https://example.test/invalid.json",
            FetchResponse {
                status: 200,
                body: r#"{ "version": "1.0.0", "types": [] }"#.to_string(),
            },
        );
        MemoryFetcher { documents }
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let model = ConfigModel::from_remote_with(&fetcher(), "https://example.test/grammar.json")
            .await
            .unwrap();
        assert_eq!(model.operator_keywords(), vec!["eq"]);
    }

    #[tokio::test]
    async fn test_non_success_status_names_url() {
        let err = ConfigModel::from_remote_with(&fetcher(), "https://example.test/missing.json")
            .await
            .unwrap_err();
        assert!(matches!(err, SyntaxError::Fetch { status: 404, .. }));
        assert!(err.to_string().contains("https://example.test/missing.json"));
    }

    #[tokio::test]
    async fn test_transport_failure() {
        let err = ConfigModel::from_remote_with(&fetcher(), "https://example.test/nowhere")
            .await
            .unwrap_err();
        assert!(matches!(err, SyntaxError::Transport { .. }));
    }

    #[tokio::test]
    async fn test_fetched_document_is_validated() {
        let err = ConfigModel::from_remote_with(&fetcher(), "https://example.test/invalid.json")
            .await
            .unwrap_err();
        assert!(matches!(err, SyntaxError::MissingKey("highlightingRules")));
    }
}
