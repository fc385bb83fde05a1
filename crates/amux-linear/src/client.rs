use std::time::Duration;

use chrono::DateTime;
use reqwest::blocking::Client as HttpClient;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::errors::LinearError;

const DEFAULT_ENDPOINT: &str = "https://api.linear.app/graphql";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(serde::Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlErrorItem>,
}

#[derive(serde::Deserialize)]
struct GraphQlErrorItem {
    message: String,
}

/// A typed POST client for one account's GraphQL endpoint.
///
/// Holds no retry policy: a single request either succeeds, reports a
/// typed rate-limit error, or reports a generic API error.
pub struct Client {
    http: HttpClient,
    endpoint: String,
    token: String,
    /// `"bearer"` (case-insensitive) to send `Authorization: Bearer <token>`;
    /// anything else sends the raw token unprefixed.
    token_type: String,
    actor: Option<String>,
}

impl Client {
    pub fn new(token: impl Into<String>, token_type: impl Into<String>) -> Self {
        Self {
            http: HttpClient::builder().timeout(DEFAULT_TIMEOUT).build().expect("reqwest client"),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            token: token.into(),
            token_type: token_type.into(),
            actor: None,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    fn authorization_header(&self) -> String {
        if self.token_type.eq_ignore_ascii_case("bearer") {
            format!("Bearer {}", self.token)
        } else {
            self.token.clone()
        }
    }

    /// POST `{query, variables}` and decode the `data` field into `T`.
    pub fn do_query<T: DeserializeOwned>(&self, query: &str, variables: Value) -> Result<T, LinearError> {
        let mut url = self.endpoint.clone();
        if let Some(actor) = &self.actor {
            url = format!("{url}?actor={actor}");
        }

        let response = self
            .http
            .post(&url)
            .header("Authorization", self.authorization_header())
            .json(&serde_json::json!({ "query": query, "variables": variables }))
            .send()?;

        let status = response.status();

        if status.as_u16() == 429 {
            let reset = response
                .headers()
                .get("X-RateLimit-Reset")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<i64>().ok())
                .and_then(|epoch| DateTime::from_timestamp(epoch, 0))
                .unwrap_or_else(|| DateTime::from_timestamp(0, 0).expect("epoch zero is valid"));
            let body = response.text().unwrap_or_default();
            return Err(LinearError::RateLimited { status: 429, body, reset });
        }

        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(LinearError::ApiError { status: status.as_u16(), body });
        }

        let parsed: GraphQlResponse<T> = response.json()?;
        if let Some(first) = parsed.errors.into_iter().next() {
            return Err(LinearError::GraphQl(first.message));
        }

        parsed.data.ok_or_else(|| {
            warn!(event = "linear.client.empty_data_field");
            LinearError::GraphQl("response carried neither data nor errors".to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Minimal single-request HTTP server for testing response handling
    /// without a real Linear endpoint.
    fn serve_once(response: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(&stream);
            let mut line = String::new();
            loop {
                line.clear();
                reader.read_line(&mut line).unwrap();
                if line == "\r\n" || line.is_empty() {
                    break;
                }
            }
            let mut stream = stream;
            stream.write_all(response.as_bytes()).unwrap();
        });
        format!("http://{addr}")
    }

    #[test]
    fn test_successful_query_decodes_data() {
        let url = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nConnection: close\r\n\r\n{\"data\":{\"viewer\":{\"id\":1}}}",
        );
        let client = Client::new("token", "").with_endpoint(url);
        let result: Value = client.do_query("query {viewer{id}}", serde_json::json!({})).unwrap();
        assert_eq!(result["viewer"]["id"], 1);
    }

    #[test]
    fn test_graphql_errors_surface_first_message() {
        let url = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nConnection: close\r\n\r\n{\"data\":null,\"errors\":[{\"message\":\"not authorized\"},{\"message\":\"x\"}]}",
        );
        let client = Client::new("token", "bearer").with_endpoint(url);
        let err = client.do_query::<Value>("query {}", serde_json::json!({})).unwrap_err();
        assert!(matches!(err, LinearError::GraphQl(msg) if msg == "not authorized"));
    }

    #[test]
    fn test_rate_limit_parses_reset_header() {
        let url = serve_once(
            "HTTP/1.1 429 Too Many Requests\r\nX-RateLimit-Reset: 1700000000\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        );
        let client = Client::new("token", "").with_endpoint(url);
        let err = client.do_query::<Value>("query {}", serde_json::json!({})).unwrap_err();
        match err {
            LinearError::RateLimited { reset, .. } => {
                assert_eq!(reset.timestamp(), 1700000000);
            }
            other => panic!("expected RateLimited, got {other:?}"),
        }
    }

    #[test]
    fn test_rate_limit_missing_reset_header_defaults_to_epoch_zero() {
        let url = serve_once("HTTP/1.1 429 Too Many Requests\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
        let client = Client::new("token", "").with_endpoint(url);
        let err = client.do_query::<Value>("query {}", serde_json::json!({})).unwrap_err();
        match err {
            LinearError::RateLimited { reset, .. } => assert_eq!(reset.timestamp(), 0),
            other => panic!("expected RateLimited, got {other:?}"),
        }
    }

    #[test]
    fn test_non_2xx_non_429_is_generic_api_error() {
        let url = serve_once("HTTP/1.1 500 Internal Server Error\r\nContent-Length: 5\r\nConnection: close\r\n\r\noops!");
        let client = Client::new("token", "").with_endpoint(url);
        let err = client.do_query::<Value>("query {}", serde_json::json!({})).unwrap_err();
        assert!(matches!(err, LinearError::ApiError { status: 500, .. }));
    }

    #[test]
    fn test_bearer_token_type_is_case_insensitive() {
        let client = Client::new("abc", "Bearer");
        assert_eq!(client.authorization_header(), "Bearer abc");
        let client = Client::new("abc", "");
        assert_eq!(client.authorization_header(), "abc");
    }

    /// Exercises the real Linear wire shape for an issue's `labels` field —
    /// a connection object, not a flat array — through the same
    /// `do_query`/`Issue` path the service's issue fetch uses.
    #[test]
    fn test_query_decodes_issue_with_label_connection_shape() {
        let body = "{\"data\":{\"issues\":{\"nodes\":[{\
            \"id\":\"issue-1\",\"identifier\":\"ENG-1\",\"title\":\"Fix thing\",\
            \"url\":\"https://linear.app/x/issue/ENG-1\",\
            \"state\":{\"id\":\"s1\",\"name\":\"Todo\",\"type\":\"unstarted\"},\
            \"team\":{\"id\":\"t1\",\"key\":\"ENG\",\"name\":\"Engineering\"},\
            \"labels\":{\"nodes\":[{\"name\":\"bug\"}]},\
            \"createdAt\":\"2024-01-01T00:00:00Z\",\"updatedAt\":\"2024-01-01T00:00:00Z\"\
            }],\"pageInfo\":{\"hasNextPage\":false,\"endCursor\":null}}}}";
        let url = serve_once(Box::leak(
            format!("HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nConnection: close\r\n\r\n{body}")
                .into_boxed_str(),
        ));

        #[derive(serde::Deserialize)]
        struct IssuesData {
            issues: IssueConnection,
        }
        #[derive(serde::Deserialize)]
        struct IssueConnection {
            nodes: Vec<amux_protocol::Issue>,
        }

        let client = Client::new("token", "").with_endpoint(url);
        let data: IssuesData = client.do_query("query {}", serde_json::json!({})).unwrap();
        assert_eq!(data.issues.nodes.len(), 1);
        assert_eq!(data.issues.nodes[0].labels, vec!["bug".to_string()]);
    }
}
