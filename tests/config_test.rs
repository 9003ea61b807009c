use std::{collections::HashMap, time::Duration};

use playconv::{config::Config, error::ConfigError};

fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Config::from_lookup(|name| vars.get(name).cloned())
}

#[test]
fn test_defaults() {
    let config = config_from(&[]).unwrap();

    assert_eq!(config.server_addr.to_string(), "127.0.0.1:8888");
    assert_eq!(config.redirect_uri, "http://127.0.0.1:8888/playlist-tracks");
    assert_eq!(config.callback_path(), "/playlist-tracks");
    assert_eq!(config.spotify_api_url, "https://api.spotify.com/v1");
    assert_eq!(config.youtube_api_url, "https://www.googleapis.com/youtube/v3");
    assert!(config.youtube_scope.contains("https://www.googleapis.com/auth/youtube"));
    assert!(config.secrets_url.is_none());
    assert_eq!(config.request_interval, Duration::from_millis(100));
    assert_eq!(config.session_ttl, Duration::from_secs(900));
}

#[test]
fn test_overrides() {
    let config = config_from(&[
        ("SERVER_ADDRESS", "0.0.0.0:9000"),
        ("REDIRECT_URI", "https://converter.example.test/oauth/callback"),
        ("YOUTUBE_API_URL", "http://localhost:4000/"),
        ("SECRETS_URL", "https://secrets.example.test/functions/v1/"),
        ("SECRETS_KEY", "anon"),
        ("REQUEST_INTERVAL_MS", "0"),
        ("SESSION_TTL_SECS", "60"),
    ])
    .unwrap();

    assert_eq!(config.server_addr.port(), 9000);
    assert_eq!(config.callback_path(), "/oauth/callback");
    assert_eq!(config.youtube_api_url, "http://localhost:4000");
    assert_eq!(config.secrets_url.as_deref(), Some("https://secrets.example.test/functions/v1"));
    assert_eq!(config.secrets_key.as_deref(), Some("anon"));
    assert_eq!(config.request_interval, Duration::ZERO);
    assert_eq!(config.session_ttl, Duration::from_secs(60));
}

#[test]
fn test_redirect_uri_follows_server_address() {
    let config = config_from(&[("SERVER_ADDRESS", "127.0.0.1:3000")]).unwrap();

    assert_eq!(config.redirect_uri, "http://127.0.0.1:3000/playlist-tracks");
}

#[test]
fn test_redirect_uri_without_path_uses_default_route() {
    let config = config_from(&[("REDIRECT_URI", "http://localhost:8888")]).unwrap();

    assert_eq!(config.callback_path(), "/playlist-tracks");
}

#[test]
fn test_blank_values_count_as_unset() {
    let config = config_from(&[("SERVER_ADDRESS", "  "), ("SECRETS_URL", "")]).unwrap();

    assert_eq!(config.server_addr.to_string(), "127.0.0.1:8888");
    assert!(config.secrets_url.is_none());
}

#[test]
fn test_invalid_values() {
    let cases = [
        ("SERVER_ADDRESS", "localhost"),
        ("REDIRECT_URI", "not a url"),
        ("GOOGLE_AUTH_URL", "::"),
        ("REQUEST_INTERVAL_MS", "fast"),
        ("SESSION_TTL_SECS", "-1"),
    ];

    for (name, value) in cases {
        match config_from(&[(name, value)]) {
            Err(ConfigError::Invalid { name: invalid, .. }) => assert_eq!(invalid, name),
            Ok(_) => panic!("{} = {:?} should be rejected", name, value),
        }
    }
}
