use hmac::{Hmac, Mac};
use serde_json::Value;
use sha2::Sha256;

use amux_protocol::LinearAccount;

type HmacSha256 = Hmac<Sha256>;

const TIMESTAMP_SKEW: i64 = 5 * 60;

#[derive(Debug, PartialEq)]
pub struct WebhookPayload {
    pub account: String,
    pub event_type: String,
    pub action: String,
    pub data: Value,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum WebhookError {
    #[error("timestamp outside the allowed skew window")]
    TimestampSkew,
    #[error("signature does not match any configured account")]
    SignatureMismatch,
    #[error("malformed payload body")]
    MalformedBody,
}

/// Constant-time HMAC-SHA256 verification: `signature_hex` must be the
/// lowercase hex digest of `body` keyed by `secret`.
pub fn verify_signature(secret: &[u8], body: &[u8], signature_hex: &str) -> bool {
    if secret.is_empty() || signature_hex.is_empty() {
        return false;
    }
    let Ok(expected) = hex::decode(signature_hex) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(secret) else {
        return false;
    };
    mac.update(body);
    mac.verify_slice(&expected).is_ok()
}

/// Verify and parse an inbound `/linear/webhook` request.
///
/// `now` and `timestamp` are both epoch seconds; the timestamp must fall
/// within `now ± 5 minutes` inclusive. The first configured account whose
/// secret produces a matching signature is attributed.
pub fn receive(
    accounts: &[LinearAccount],
    signature_hex: &str,
    timestamp: i64,
    now: i64,
    body: &[u8],
) -> Result<WebhookPayload, WebhookError> {
    if (timestamp - now).abs() > TIMESTAMP_SKEW {
        return Err(WebhookError::TimestampSkew);
    }

    let account = accounts
        .iter()
        .find(|a| {
            a.webhook_secret
                .as_deref()
                .map(|secret| verify_signature(secret.as_bytes(), body, signature_hex))
                .unwrap_or(false)
        })
        .ok_or(WebhookError::SignatureMismatch)?;

    let parsed: Value = serde_json::from_slice(body).map_err(|_| WebhookError::MalformedBody)?;
    let event_type = parsed.get("type").and_then(Value::as_str).unwrap_or_default().to_string();
    let action = parsed.get("action").and_then(Value::as_str).unwrap_or_default().to_string();
    let data = parsed.get("data").cloned().unwrap_or(Value::Null);

    Ok(WebhookPayload { account: account.name.clone(), event_type, action, data })
}

#[cfg(test)]
mod tests {
    use super::*;
    use amux_protocol::LinearAuth;

    fn account(secret: &str) -> LinearAccount {
        LinearAccount {
            name: "work".into(),
            auth: LinearAuth::ApiKey { key: "k".into() },
            webhook_secret: Some(secret.to_string()),
        }
    }

    fn hex_hmac(secret: &str, body: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(body.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    #[test]
    fn test_verify_signature_matches_known_vector() {
        let sig = hex_hmac("secret", "hello");
        assert!(verify_signature(b"secret", b"hello", &sig));
    }

    #[test]
    fn test_verify_signature_rejects_single_flipped_hex_digit() {
        let mut sig = hex_hmac("secret", "hello");
        let last = sig.pop().unwrap();
        let flipped = if last == '0' { '1' } else { '0' };
        sig.push(flipped);
        assert!(!verify_signature(b"secret", b"hello", &sig));
    }

    #[test]
    fn test_verify_signature_rejects_empty_secret_or_signature() {
        assert!(!verify_signature(b"", b"hello", &hex_hmac("secret", "hello")));
        assert!(!verify_signature(b"secret", b"hello", ""));
    }

    #[test]
    fn test_receive_accepts_timestamp_at_inclusive_bounds() {
        let body = br#"{"type":"Issue","action":"update","data":{"id":"1"}}"#;
        let sig = hex_hmac("secret", std::str::from_utf8(body).unwrap());
        let accounts = vec![account("secret")];

        let payload = receive(&accounts, &sig, 1000 - 300, 1000, body).unwrap();
        assert_eq!(payload.account, "work");
        assert_eq!(payload.event_type, "Issue");
        assert_eq!(payload.action, "update");

        receive(&accounts, &sig, 1000 + 300, 1000, body).unwrap();
    }

    #[test]
    fn test_receive_rejects_timestamp_one_second_past_bound() {
        let body = br#"{"type":"Issue","action":"update","data":{}}"#;
        let sig = hex_hmac("secret", std::str::from_utf8(body).unwrap());
        let accounts = vec![account("secret")];

        let err = receive(&accounts, &sig, 1000 - 301, 1000, body).unwrap_err();
        assert_eq!(err, WebhookError::TimestampSkew);
    }

    #[test]
    fn test_receive_rejects_signature_matching_no_account() {
        let body = br#"{"type":"Issue","action":"update","data":{}}"#;
        let accounts = vec![account("secret")];
        let err = receive(&accounts, "deadbeef", 1000, 1000, body).unwrap_err();
        assert_eq!(err, WebhookError::SignatureMismatch);
    }

    #[test]
    fn test_receive_attributes_first_matching_account() {
        let body = br#"{"type":"Issue","action":"create","data":{}}"#;
        let sig = hex_hmac("secret-b", std::str::from_utf8(body).unwrap());
        let accounts = vec![account("secret-a"), {
            let mut b = account("secret-b");
            b.name = "personal".into();
            b
        }];
        let payload = receive(&accounts, &sig, 1000, 1000, body).unwrap();
        assert_eq!(payload.account, "personal");
    }
}
