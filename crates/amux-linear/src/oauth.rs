use chrono::{DateTime, Duration as ChronoDuration, Utc};
use reqwest::blocking::Client as HttpClient;
use url::Url;

use crate::errors::LinearError;

const AUTHORIZE_URL: &str = "https://linear.app/oauth/authorize";
const TOKEN_URL: &str = "https://api.linear.app/oauth/token";
const DEFAULT_SCOPE: &str = "read write";

#[derive(Debug, Clone, serde::Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub token_type: String,
    #[serde(default)]
    pub scope: String,
    pub expires_in: i64,
}

impl TokenResponse {
    /// Wall-clock expiry derived from `now + expires_in`.
    pub fn expires_at(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now + ChronoDuration::seconds(self.expires_in)
    }
}

/// Build the authorize URL a user is sent to, with `read write` scope and
/// an optional anti-CSRF `state` token.
pub fn authorize_url(client_id: &str, redirect_uri: &str, state: Option<&str>) -> String {
    let mut url = Url::parse(AUTHORIZE_URL).expect("authorize URL is a valid constant");
    {
        let mut query = url.query_pairs_mut();
        query.append_pair("client_id", client_id);
        query.append_pair("redirect_uri", redirect_uri);
        query.append_pair("response_type", "code");
        query.append_pair("scope", DEFAULT_SCOPE);
        if let Some(state) = state {
            query.append_pair("state", state);
        }
    }
    url.to_string()
}

/// Exchange an authorization `code` for an access/refresh token pair.
pub fn exchange_code(
    http: &HttpClient,
    client_id: &str,
    client_secret: &str,
    redirect_uri: &str,
    code: &str,
) -> Result<TokenResponse, LinearError> {
    let response = http
        .post(TOKEN_URL)
        .form(&[
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("redirect_uri", redirect_uri),
            ("grant_type", "authorization_code"),
            ("code", code),
        ])
        .send()?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        return Err(LinearError::ApiError { status: status.as_u16(), body });
    }

    Ok(response.json()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorize_url_has_expected_query_params() {
        let url = authorize_url("client-123", "https://app.example/callback", Some("xyz"));
        assert!(url.starts_with("https://linear.app/oauth/authorize?"));
        assert!(url.contains("client_id=client-123"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("scope=read+write") || url.contains("scope=read%20write"));
        assert!(url.contains("state=xyz"));
    }

    #[test]
    fn test_authorize_url_omits_state_when_absent() {
        let url = authorize_url("client-123", "https://app.example/callback", None);
        assert!(!url.contains("state="));
    }

    #[test]
    fn test_expires_at_adds_seconds_to_now() {
        let now = DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z").unwrap().with_timezone(&Utc);
        let token = TokenResponse {
            access_token: "a".into(),
            refresh_token: None,
            token_type: "bearer".into(),
            scope: "read write".into(),
            expires_in: 3600,
        };
        let expiry = token.expires_at(now);
        assert_eq!(expiry.timestamp() - now.timestamp(), 3600);
    }
}
