//! Unit tests for `AppError` display formats and conversions.

use postpilot::AppError;

#[test]
fn config_error_display_starts_with_config_prefix() {
    let err = AppError::Config("missing base_url".into());
    assert_eq!(err.to_string(), "config: missing base_url");
}

#[test]
fn api_error_display_includes_status_and_body() {
    let err = AppError::Api {
        status: 500,
        body: "upstream error".into(),
    };
    assert_eq!(err.to_string(), "api: status 500: upstream error");
}

#[test]
fn auth_error_is_distinct_from_api_error() {
    let auth = AppError::Auth("token rejected".into());
    let api = AppError::Api {
        status: 401,
        body: "token rejected".into(),
    };
    assert_ne!(auth.to_string(), api.to_string());
    assert!(auth.to_string().starts_with("auth:"));
}

#[test]
fn error_messages_have_no_trailing_period() {
    let errors = [
        AppError::Http("connection refused".into()),
        AppError::Parse("bad timestamp".into()),
        AppError::NotFound("post p1".into()),
        AppError::Io("read failed".into()),
    ];
    for err in errors {
        let s = err.to_string();
        assert!(!s.ends_with('.'), "message must not end with a period: {s}");
    }
}

#[test]
fn implements_std_error_trait() {
    fn assert_error<E: std::error::Error>(_: &E) {}
    assert_error(&AppError::Http("x".into()));
}

#[test]
fn toml_error_converts_to_config() {
    let err = toml::from_str::<toml::Value>("not = = toml").expect_err("invalid toml");
    let app: AppError = err.into();
    assert!(matches!(app, AppError::Config(_)));
}

#[test]
fn json_error_converts_to_parse() {
    let err = serde_json::from_str::<serde_json::Value>("{").expect_err("invalid json");
    let app: AppError = err.into();
    assert!(matches!(app, AppError::Parse(_)));
}
