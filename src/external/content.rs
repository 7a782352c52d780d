use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::SanityConfig;
use crate::error::{AppError, AppResult};

#[derive(Debug, Deserialize)]
struct QueryResponse<T> {
    result: Option<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MutateResponse {
    #[allow(dead_code)]
    transaction_id: String,
    #[serde(default)]
    results: Vec<MutateResult>,
}

#[derive(Debug, Deserialize)]
struct MutateResult {
    id: String,
}

/// Client for the headless content backend's HTTP API: GROQ queries for
/// reads, a single `create` mutation for writes.
#[derive(Clone)]
pub struct ContentService {
    client: Client,
    config: SanityConfig,
}

impl ContentService {
    pub fn new(config: SanityConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn query_url(&self) -> String {
        format!(
            "{}/v{}/data/query/{}",
            self.config.api_base(),
            self.config.api_version,
            self.config.dataset
        )
    }

    fn mutate_url(&self) -> String {
        format!(
            "{}/v{}/data/mutate/{}",
            self.config.api_base(),
            self.config.api_version,
            self.config.dataset
        )
    }

    pub async fn query<T: DeserializeOwned>(&self, groq: &str) -> AppResult<Option<T>> {
        self.query_with_params(groq, &[]).await
    }

    /// Runs a GROQ query. Query parameters are passed out of band as
    /// `$name=<json>` pairs, so user input never gets spliced into the
    /// query string itself.
    pub async fn query_with_params<T: DeserializeOwned>(
        &self,
        groq: &str,
        params: &[(&str, &serde_json::Value)],
    ) -> AppResult<Option<T>> {
        let pairs = build_query_pairs(groq, params)?;

        let mut request = self.client.get(self.query_url()).query(&pairs);
        if !self.config.api_token.is_empty() {
            request = request.bearer_auth(&self.config.api_token);
        }

        let response = request.send().await?;
        if response.status().is_success() {
            let body: QueryResponse<T> = response.json().await?;
            Ok(body.result)
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            Err(AppError::ExternalApiError(format!(
                "Content query failed: {error_text}"
            )))
        }
    }

    /// Creates one document and returns its id.
    pub async fn create<T: Serialize>(&self, document: &T) -> AppResult<String> {
        let body = json!({
            "mutations": [{ "create": document }]
        });

        let response = self
            .client
            .post(self.mutate_url())
            .query(&[("returnIds", "true")])
            .bearer_auth(&self.config.api_token)
            .json(&body)
            .send()
            .await?;

        if response.status().is_success() {
            let result: MutateResponse = response.json().await?;
            result
                .results
                .into_iter()
                .next()
                .map(|r| r.id)
                .ok_or_else(|| {
                    AppError::ExternalApiError(
                        "Content mutation returned no document id".to_string(),
                    )
                })
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            Err(AppError::ExternalApiError(format!(
                "Content mutation failed: {error_text}"
            )))
        }
    }
}

fn build_query_pairs(
    groq: &str,
    params: &[(&str, &serde_json::Value)],
) -> AppResult<Vec<(String, String)>> {
    let mut pairs: Vec<(String, String)> = vec![("query".to_string(), groq.to_string())];
    for (name, value) in params {
        pairs.push((format!("${name}"), serde_json::to_string(value)?));
    }
    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SanityConfig {
        SanityConfig {
            project_id: "abc123".to_string(),
            dataset: "production".to_string(),
            api_version: "2024-01-01".to_string(),
            api_token: "sk-token".to_string(),
            base_url: None,
        }
    }

    #[test]
    fn query_and_mutate_urls_follow_the_api_layout() {
        let service = ContentService::new(test_config());
        assert_eq!(
            service.query_url(),
            "https://abc123.api.sanity.io/v2024-01-01/data/query/production"
        );
        assert_eq!(
            service.mutate_url(),
            "https://abc123.api.sanity.io/v2024-01-01/data/mutate/production"
        );
    }

    #[test]
    fn query_params_are_json_encoded() {
        // A quote in user input must arrive escaped inside the JSON value,
        // never spliced into the query text.
        let groq = "*[_type == 'product' && name match $searchParam]";
        let value = serde_json::Value::String("mug\" || true".to_string());
        let pairs = build_query_pairs(groq, &[("searchParam", &value)]).unwrap();

        assert_eq!(pairs[0], ("query".to_string(), groq.to_string()));
        assert_eq!(
            pairs[1],
            ("$searchParam".to_string(), "\"mug\\\" || true\"".to_string())
        );
    }

    #[test]
    fn mutate_response_yields_created_id() {
        let body = r#"{
            "transactionId": "tx1",
            "results": [{"id": "order-doc-1", "operation": "create"}]
        }"#;
        let parsed: MutateResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.results[0].id, "order-doc-1");
    }
}
