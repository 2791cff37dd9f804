//! Generation backend seam.
//!
//! A `ContentGenerator` turns a validated [`ContentPlan`] into postable text. Real
//! backends (hosted models, fine-tuned adapters) live outside this crate; the
//! [`DraftGenerator`] renders the plan anchors directly and is what the CLI uses.

use crate::error::ApiError;
use crate::plan::ContentPlan;
use crate::schedule::PostContent;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Output of a generation backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedContent {
    pub text: String,
    #[serde(default)]
    pub hashtags: Vec<String>,
    #[serde(default)]
    pub media: Option<String>,
}

impl From<GeneratedContent> for PostContent {
    fn from(generated: GeneratedContent) -> Self {
        PostContent {
            text: generated.text,
            hashtags: generated.hashtags,
            media: generated.media,
        }
    }
}

/// Generation backend trait
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Produce content for a plan. Failures surface as `ApiError::GenerationFailed`.
    async fn generate(&self, plan: &ContentPlan) -> Result<GeneratedContent, ApiError>;

    /// Backend name, for logs.
    fn name(&self) -> &str;
}

/// Renders plan anchors into a plain draft without calling any model.
///
/// Sections are added in priority order and dropped once the platform limit would be
/// exceeded. Trailing hashtags that do not fit are dropped too, so the draft never
/// exceeds the plan's platform limit.
#[derive(Debug, Default, Clone, Copy)]
pub struct DraftGenerator;

impl DraftGenerator {
    pub fn render(plan: &ContentPlan) -> String {
        let limit = plan.platform().map(|p| p.max_text_len());
        let tags = fit_tags(plan.hashtags(), limit);

        let sections = [
            format!("{} {}", plan.brand_phrase(), plan.trend()),
            format!("The decision: {}", plan.decision()),
            format!("The constraint: {}", plan.constraint()),
            format!("Who carries the risk: {}", plan.risk_owner()),
            format!("People in the loop: {}", plan.human_roles().join(", ")),
            plan.quiet_anchor().to_string(),
            plan.footer().to_string(),
        ];

        let reserved = if tags.is_empty() {
            0
        } else {
            tags.chars().count() + 2
        };
        let mut body = String::new();
        for section in sections.iter() {
            let candidate = if body.is_empty() {
                section.clone()
            } else {
                format!("{}\n\n{}", body, section)
            };
            match limit {
                Some(max) if candidate.chars().count() + reserved > max => break,
                _ => body = candidate,
            }
        }

        match (body.is_empty(), tags.is_empty()) {
            (true, _) => tags,
            (false, true) => body,
            (false, false) => format!("{}\n\n{}", body, tags),
        }
    }
}

/// Leading hashtags, space-joined, that fit within `limit` characters.
fn fit_tags(hashtags: &[String], limit: Option<usize>) -> String {
    let mut line = String::new();
    for tag in hashtags {
        let candidate = if line.is_empty() {
            format!("#{}", tag)
        } else {
            format!("{} #{}", line, tag)
        };
        match limit {
            Some(max) if candidate.chars().count() > max => break,
            _ => line = candidate,
        }
    }
    line
}

#[async_trait]
impl ContentGenerator for DraftGenerator {
    async fn generate(&self, plan: &ContentPlan) -> Result<GeneratedContent, ApiError> {
        let text = Self::render(plan);
        if text.trim().is_empty() {
            return Err(ApiError::GenerationFailed(
                "Draft rendered empty text".to_string(),
            ));
        }
        Ok(GeneratedContent {
            text,
            hashtags: plan.hashtags().to_vec(),
            media: None,
        })
    }

    fn name(&self) -> &str {
        "draft"
    }
}
