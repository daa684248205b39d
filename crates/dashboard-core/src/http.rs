//! Helpers shared by the HTTP clients.

use serde::Deserialize;

/// FastAPI-style error payload. `detail` is usually a string but validation
/// errors carry a list of objects.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<serde_json::Value>,
}

/// Read the `detail` field of a non-2xx response, if the body carries one.
pub async fn read_error_detail(response: reqwest::Response) -> Option<String> {
    let body = response.text().await.ok()?;
    detail_from_body(&body)
}

pub fn detail_from_body(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    detail_text(parsed.detail?)
}

/// `detail` of an already parsed JSON body.
pub fn detail_from_value(body: &serde_json::Value) -> Option<String> {
    detail_text(body.get("detail")?.clone())
}

fn detail_text(detail: serde_json::Value) -> Option<String> {
    match detail {
        serde_json::Value::String(s) if !s.is_empty() => Some(s),
        serde_json::Value::String(_) | serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// Join a base URL and path segments without doubling slashes.
pub fn join_url(base: &str, segments: &[&str]) -> String {
    let mut url = base.trim_end_matches('/').to_string();
    for segment in segments {
        url.push('/');
        url.push_str(segment.trim_matches('/'));
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_string() {
        let body = r#"{"detail": "Invalid model name"}"#;
        assert_eq!(detail_from_body(body).as_deref(), Some("Invalid model name"));
    }

    #[test]
    fn test_detail_list() {
        let body = r#"{"detail": [{"loc": ["query", "days"], "msg": "bad"}]}"#;
        let detail = detail_from_body(body).unwrap();
        assert!(detail.contains("days"));
    }

    #[test]
    fn test_detail_missing() {
        assert_eq!(detail_from_body("Internal Server Error"), None);
        assert_eq!(detail_from_body(r#"{"error": "x"}"#), None);
        assert_eq!(detail_from_body(r#"{"detail": ""}"#), None);
    }

    #[test]
    fn test_detail_from_value() {
        let body = serde_json::json!({"detail": "Prophet not installed"});
        assert_eq!(detail_from_value(&body).as_deref(), Some("Prophet not installed"));
        assert_eq!(detail_from_value(&serde_json::json!({"forecast": []})), None);
    }

    #[test]
    fn test_join_url() {
        assert_eq!(
            join_url("http://127.0.0.1:8000/api/predict/", &["lstm", "AAPL"]),
            "http://127.0.0.1:8000/api/predict/lstm/AAPL"
        );
        assert_eq!(join_url("http://h/api/auth", &["login"]), "http://h/api/auth/login");
    }
}
