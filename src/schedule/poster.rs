//! Platform poster seam.
//!
//! The scheduler hands finished content to a [`Poster`] and records whatever it reports.
//! Concrete platform clients are external; [`WebhookPoster`] forwards a JSON payload to a
//! configured endpoint, which is how a deployment wires in its own relay.

use crate::error::PostingError;
use crate::schedule::post::PostContent;
use crate::types::Platform;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// What a poster reports for one attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostOutcome {
    pub success: bool,
    #[serde(default)]
    pub remote_id: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl PostOutcome {
    pub fn posted(remote_id: Option<String>) -> Self {
        Self {
            success: true,
            remote_id,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            remote_id: None,
            error: Some(error.into()),
        }
    }
}

/// Platform poster trait
#[async_trait]
pub trait Poster: Send + Sync {
    /// Publish `content` to `platform`. `Err` means the attempt never got an answer.
    async fn post(&self, content: &PostContent, platform: Platform)
        -> Result<PostOutcome, PostingError>;

    fn name(&self) -> &str;
}

/// Posters keyed by platform.
#[derive(Clone, Default)]
pub struct PosterRegistry {
    posters: HashMap<Platform, Arc<dyn Poster>>,
}

impl fmt::Debug for PosterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self
            .posters
            .iter()
            .map(|(platform, poster)| format!("{}={}", platform, poster.name()))
            .collect();
        names.sort();
        f.debug_struct("PosterRegistry").field("posters", &names).finish()
    }
}

impl PosterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, platform: Platform, poster: Arc<dyn Poster>) {
        self.posters.insert(platform, poster);
    }

    pub fn with(mut self, platform: Platform, poster: Arc<dyn Poster>) -> Self {
        self.register(platform, poster);
        self
    }

    pub fn get(&self, platform: Platform) -> Option<Arc<dyn Poster>> {
        self.posters.get(&platform).cloned()
    }

    pub fn platforms(&self) -> Vec<Platform> {
        let mut platforms: Vec<_> = self.posters.keys().copied().collect();
        platforms.sort();
        platforms
    }
}

const WEBHOOK_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Serialize)]
struct WebhookPayload<'a> {
    platform: &'a str,
    text: &'a str,
    hashtags: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    media: Option<&'a str>,
}

#[derive(Deserialize, Default)]
struct WebhookReply {
    #[serde(default, alias = "post_id")]
    id: Option<String>,
}

/// Forwards posts as JSON to an HTTP endpoint.
pub struct WebhookPoster {
    client: Client,
    endpoint: String,
    token: Option<String>,
}

impl WebhookPoster {
    pub fn new(endpoint: impl Into<String>, token: Option<String>) -> Result<Self, PostingError> {
        let client = Client::builder()
            .connect_timeout(WEBHOOK_CONNECT_TIMEOUT)
            .build()
            .map_err(|e| PostingError::Transport(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            token,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Poster for WebhookPoster {
    async fn post(
        &self,
        content: &PostContent,
        platform: Platform,
    ) -> Result<PostOutcome, PostingError> {
        let payload = WebhookPayload {
            platform: platform.as_str(),
            text: &content.text,
            hashtags: &content.hashtags,
            media: content.media.as_deref(),
        };

        let mut request = self.client.post(&self.endpoint).json(&payload);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                PostingError::Transport(format!("Request timeout: {}", e))
            } else if e.is_connect() {
                PostingError::Transport(format!("Connection error: {}", e))
            } else {
                PostingError::Transport(format!("HTTP error: {}", e))
            }
        })?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Ok(PostOutcome::failed(format!("HTTP {}: {}", status, body.trim())));
        }

        let reply: WebhookReply = serde_json::from_str(&body).unwrap_or_default();
        Ok(PostOutcome::posted(reply.id))
    }

    fn name(&self) -> &str {
        "webhook"
    }
}
