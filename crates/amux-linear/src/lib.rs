mod cache;
mod client;
mod errors;
mod mapper;
mod oauth;
mod service;
mod webhook;

pub use client::Client;
pub use errors::LinearError;
pub use mapper::{column_index, map_state_to_column};
pub use oauth::{authorize_url, exchange_code, TokenResponse};
pub use service::Service;
pub use webhook::{receive, verify_signature, WebhookError, WebhookPayload};
