#[cfg(test)]
mod tests {
    use crate::api::ApiError;
    use crate::config::ApiConfig;
    use crate::http::RateLimitedHttpClient;
    use reqwest::Method;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn settings(base_url: &str, cache_ttl_seconds: u64) -> ApiConfig {
        ApiConfig {
            base_url: base_url.to_string(),
            token: Some("test-token".to_string()),
            cache_ttl_seconds,
            ..ApiConfig::default()
        }
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let client = RateLimitedHttpClient::new(&settings("http://erp.local/api", 0)).unwrap();
        let url = client
            .endpoint("workflows/", &[("search", "polo shirt".to_string())])
            .unwrap();
        assert_eq!(url.as_str(), "http://erp.local/api/workflows/?search=polo+shirt");
    }

    #[test]
    fn test_zero_rate_limit_is_rejected() {
        let mut config = settings("http://erp.local/api", 0);
        config.rate_limit.requests_per_second = 0;
        assert!(matches!(
            RateLimitedHttpClient::new(&config),
            Err(ApiError::InvalidConfig { .. })
        ));
    }

    #[tokio::test]
    async fn test_get_sends_bearer_token_and_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/workflows/"))
            .and(query_param("priority", "high"))
            .and(header("authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let client = RateLimitedHttpClient::new(&settings(&server.uri(), 0)).unwrap();
        let value: Vec<serde_json::Value> = client
            .get_json("workflows/", &[("priority", "high".to_string())])
            .await
            .unwrap();
        assert!(value.is_empty());
        assert_eq!(client.stats().total_requests, 1);
    }

    #[tokio::test]
    async fn test_cache_serves_repeat_reads_until_mutation() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/workflows/1/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1})))
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/workflow-cards/5/status/"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = RateLimitedHttpClient::new(&settings(&server.uri(), 60)).unwrap();
        let _: serde_json::Value = client.get_json("workflows/1/", &[]).await.unwrap();
        let _: serde_json::Value = client.get_json("workflows/1/", &[]).await.unwrap();
        assert_eq!(client.stats().cache_hits, 1);

        let body = client
            .send_json(Method::PATCH, "workflow-cards/5/status/", &json!({"status": "ready"}))
            .await
            .unwrap();
        assert!(body.is_null());

        // Cache was cleared by the mutation, so this reaches the server again
        let _: serde_json::Value = client.get_json("workflows/1/", &[]).await.unwrap();
        assert_eq!(client.stats().cache_misses, 2);
    }

    #[tokio::test]
    async fn test_error_status_maps_to_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/workflows/"))
            .respond_with(
                ResponseTemplate::new(500).set_body_json(json!({"error": "database unavailable"})),
            )
            .mount(&server)
            .await;

        let client = RateLimitedHttpClient::new(&settings(&server.uri(), 0)).unwrap();
        let result: Result<serde_json::Value, _> = client.get_json("workflows/", &[]).await;
        assert_eq!(
            result.unwrap_err(),
            ApiError::Status {
                status: 500,
                message: "database unavailable".to_string()
            }
        );
        assert_eq!(client.stats().errors, 1);
    }
}
