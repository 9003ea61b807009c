use serde_json::json;
use wiremock::matchers::{bearer_token, body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use playconv::{
    error::SecretError,
    management::{EnvSecretStore, RemoteSecretStore, SecretStore},
};

#[tokio::test]
async fn test_remote_get_secret() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/get-secret"))
        .and(bearer_token("anon-key"))
        .and(body_json(json!({ "secretName": "GOOGLE_CLIENT_ID" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "secret": "google-client" })))
        .expect(1)
        .mount(&server)
        .await;

    let store = RemoteSecretStore::new(format!("{}/", server.uri()), Some("anon-key".to_string()));

    assert_eq!(store.get_secret("GOOGLE_CLIENT_ID").await.unwrap(), "google-client");
}

#[tokio::test]
async fn test_remote_missing_secret() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/get-secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "secret": null })))
        .mount(&server)
        .await;

    let store = RemoteSecretStore::new(server.uri(), None);

    assert!(matches!(
        store.get_secret("YOUTUBE_API_KEY").await,
        Err(SecretError::Missing(name)) if name == "YOUTUBE_API_KEY"
    ));
}

#[tokio::test]
async fn test_remote_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/get-secret"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let store = RemoteSecretStore::new(server.uri(), None);

    assert!(matches!(store.get_secret("GOOGLE_CLIENT_ID").await, Err(SecretError::Remote(_))));
}

#[tokio::test]
async fn test_remote_set_secret() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/set-secret"))
        .and(body_json(json!({
            "secretName": "GOOGLE_REFRESH_TOKEN",
            "secretValue": "1//refresh"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    let store = RemoteSecretStore::new(server.uri(), None);

    store.set_secret("GOOGLE_REFRESH_TOKEN", "1//refresh").await.unwrap();
}

#[tokio::test]
async fn test_env_store_is_read_only() {
    let store = EnvSecretStore;

    assert!(matches!(
        store.set_secret("GOOGLE_REFRESH_TOKEN", "value").await,
        Err(SecretError::ReadOnly(_))
    ));
    assert!(matches!(
        store.get_secret("PLAYCONV_TEST_SECRET_THAT_IS_NEVER_SET").await,
        Err(SecretError::Missing(_))
    ));
}
