use pretty_assertions::assert_eq;
use rewriter_engine::{ApiFailure, ApiTarget, OllamaClient, RewriteApi, RewriteRequest};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn target(endpoint_url: &str) -> ApiTarget {
    ApiTarget {
        endpoint_url: endpoint_url.to_string(),
        model_name: "llama3".to_string(),
    }
}

fn request(text: &str) -> RewriteRequest {
    RewriteRequest {
        source_text: text.to_string(),
        style: "professionally".to_string(),
    }
}

#[tokio::test]
async fn rewrite_posts_generate_body_and_trims_the_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(json!({
            "model": "llama3",
            "stream": false,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "  Hello, how are you?  ",
            "done": true,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = OllamaClient::new().expect("client");
    let rewritten = client
        .rewrite(&target(&server.uri()), &request("hey whats up"))
        .await
        .expect("rewrite ok");

    assert_eq!(rewritten, "Hello, how are you?");

    // The prompt carries the style and the verbatim selection.
    let received = server.received_requests().await.expect("recording enabled");
    let body: serde_json::Value = serde_json::from_slice(&received[0].body).unwrap();
    let prompt = body["prompt"].as_str().unwrap();
    assert!(prompt.contains("sound more professionally"));
    assert!(prompt.contains("hey whats up"));
}

#[tokio::test]
async fn rewrite_handles_a_trailing_slash_in_the_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = OllamaClient::new().expect("client");
    let endpoint = format!("{}/", server.uri());
    let rewritten = client
        .rewrite(&target(&endpoint), &request("hey"))
        .await
        .expect("rewrite ok");
    assert_eq!(rewritten, "ok");
}

#[tokio::test]
async fn rewrite_failure_carries_the_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = OllamaClient::new().expect("client");
    let err = client
        .rewrite(&target(&server.uri()), &request("hey"))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ApiFailure::HttpStatus(500));
    assert!(err.message.contains("500"), "message was: {}", err.message);
}

#[tokio::test]
async fn rewrite_rejects_a_non_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = OllamaClient::new().expect("client");
    let err = client
        .rewrite(&target(&server.uri()), &request("hey"))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ApiFailure::MalformedResponse);
}

#[tokio::test]
async fn rewrite_rejects_a_body_without_the_response_field() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"done": true})))
        .mount(&server)
        .await;

    let client = OllamaClient::new().expect("client");
    let err = client
        .rewrite(&target(&server.uri()), &request("hey"))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ApiFailure::MalformedResponse);
}

#[tokio::test]
async fn rewrite_rejects_an_invalid_endpoint_url() {
    let client = OllamaClient::new().expect("client");
    let err = client
        .rewrite(&target("not a url"), &request("hey"))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ApiFailure::InvalidUrl);
}

#[tokio::test]
async fn rewrite_maps_connection_failure_to_a_network_error() {
    let client = OllamaClient::new().expect("client");
    // Port 0 is never connectable.
    let err = client
        .rewrite(&target("http://127.0.0.1:0"), &request("hey"))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ApiFailure::Network);
}

#[tokio::test]
async fn list_models_collects_the_model_names() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "models": [
                {"name": "llama3", "size": 4661224676u64},
                {"name": "mistral"},
            ],
        })))
        .mount(&server)
        .await;

    let client = OllamaClient::new().expect("client");
    let models = client.list_models(&server.uri()).await.expect("tags ok");

    assert_eq!(models, vec!["llama3".to_string(), "mistral".to_string()]);
}

#[tokio::test]
async fn list_models_treats_a_missing_list_as_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let client = OllamaClient::new().expect("client");
    let models = client.list_models(&server.uri()).await.expect("tags ok");

    assert!(models.is_empty());
}

#[tokio::test]
async fn list_models_failure_carries_the_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = OllamaClient::new().expect("client");
    let err = client.list_models(&server.uri()).await.unwrap_err();

    assert_eq!(err.kind, ApiFailure::HttpStatus(404));
    assert!(err.message.contains("404"), "message was: {}", err.message);
}
