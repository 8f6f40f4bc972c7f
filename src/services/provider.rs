// src/services/provider.rs
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The provider only knows two roles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderRole {
    User,
    Model,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderTurn {
    pub role: ProviderRole,
    pub text: String,
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request to provider failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider did not respond within {0:?}")]
    Timeout(Duration),

    #[error("provider returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed provider response: {0}")]
    Malformed(String),

    #[error("provider returned no text")]
    EmptyReply,

    #[error("{0}")]
    Other(String),
}

/// A generative-language backend the relay delegates to.
///
/// `history` is the prior session context in chronological order; `prompt`
/// is sent as the new user turn.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    async fn generate(
        &self,
        history: Vec<ProviderTurn>,
        prompt: String,
    ) -> Result<String, ProviderError>;
}
