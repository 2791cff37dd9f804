//! Content plan assembly and its validation gate.

use crate::error::PlanError;
use crate::lens::{Lens, LensChoice};
use crate::plan::brand;
use crate::plan::trend::TrendCandidate;
use crate::skeleton::Skeleton;
use crate::types::Platform;
use serde::Serialize;

/// Number of hashtags every plan carries.
pub const HASHTAG_COUNT: usize = 4;

/// Immutable description of one post to generate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentPlan {
    lens: Lens,
    post_type: String,
    domain: String,
    trend: String,
    trend_description: String,
    hashtags: Vec<String>,
    decision: String,
    constraint: String,
    risk_owner: String,
    human_roles: Vec<String>,
    brand_phrase: String,
    quiet_anchor: String,
    footer: String,
    workflow_focus: String,
    constraint_focus: String,
    banned_phrases: Vec<String>,
    framing_rules: Vec<String>,
    platform: Option<Platform>,
}

impl ContentPlan {
    pub fn lens(&self) -> Lens {
        self.lens
    }
    pub fn post_type(&self) -> &str {
        &self.post_type
    }
    pub fn domain(&self) -> &str {
        &self.domain
    }
    pub fn trend(&self) -> &str {
        &self.trend
    }
    pub fn trend_description(&self) -> &str {
        &self.trend_description
    }
    pub fn hashtags(&self) -> &[String] {
        &self.hashtags
    }
    pub fn decision(&self) -> &str {
        &self.decision
    }
    pub fn constraint(&self) -> &str {
        &self.constraint
    }
    pub fn risk_owner(&self) -> &str {
        &self.risk_owner
    }
    pub fn human_roles(&self) -> &[String] {
        &self.human_roles
    }
    pub fn brand_phrase(&self) -> &str {
        &self.brand_phrase
    }
    pub fn quiet_anchor(&self) -> &str {
        &self.quiet_anchor
    }
    pub fn footer(&self) -> &str {
        &self.footer
    }
    pub fn workflow_focus(&self) -> &str {
        &self.workflow_focus
    }
    pub fn constraint_focus(&self) -> &str {
        &self.constraint_focus
    }
    pub fn banned_phrases(&self) -> &[String] {
        &self.banned_phrases
    }
    pub fn framing_rules(&self) -> &[String] {
        &self.framing_rules
    }
    pub fn platform(&self) -> Option<Platform> {
        self.platform
    }

    /// New plan targeting `platform`; `self` is left untouched.
    pub fn with_platform(&self, platform: Platform) -> ContentPlan {
        ContentPlan {
            platform: Some(platform),
            ..self.clone()
        }
    }
}

/// Composes lens, skeleton and trend into a validated [`ContentPlan`].
#[derive(Debug, Clone, Default)]
pub struct ContentPlanBuilder {
    rotation_seed: usize,
    platform: Option<Platform>,
}

impl ContentPlanBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed for brand phrase rotation (the current history length).
    pub fn rotation_seed(mut self, seed: usize) -> Self {
        self.rotation_seed = seed;
        self
    }

    pub fn platform(mut self, platform: Option<Platform>) -> Self {
        self.platform = platform;
        self
    }

    pub fn build(
        &self,
        trend_candidates: &[TrendCandidate],
        lens_choice: &LensChoice,
        skeleton: &Skeleton,
    ) -> Result<ContentPlan, PlanError> {
        let picked = pick_candidate(trend_candidates, lens_choice.domain.as_deref())
            .ok_or(PlanError::NoCandidates)?;

        let domain = picked
            .domain_name()
            .map(str::to_string)
            .or_else(|| lens_choice.domain.clone())
            .unwrap_or_else(|| skeleton.domain.name().to_string());

        let hashtags = if picked.hashtags.is_empty() {
            normalize_hashtags(skeleton.default_hashtags.iter().take(HASHTAG_COUNT))
        } else {
            normalize_hashtags(picked.hashtags.iter())
        };

        let plan = ContentPlan {
            lens: lens_choice.lens,
            post_type: lens_choice.lens.post_type().to_string(),
            trend: picked.trend.trim().to_string(),
            trend_description: picked
                .description
                .as_deref()
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .unwrap_or(picked.trend.trim())
                .to_string(),
            hashtags,
            decision: skeleton.decision.clone(),
            constraint: skeleton.constraint.clone(),
            risk_owner: skeleton.risk_owner.clone(),
            human_roles: skeleton.human_roles.clone(),
            brand_phrase: brand::brand_phrase(self.rotation_seed).to_string(),
            quiet_anchor: brand::quiet_anchor(self.rotation_seed).to_string(),
            footer: brand::FOOTER.to_string(),
            workflow_focus: lens_choice.lens.workflow_focus().to_string(),
            constraint_focus: lens_choice.lens.constraint_focus().to_string(),
            banned_phrases: brand::BANNED_HYPE.iter().map(|s| s.to_string()).collect(),
            framing_rules: brand::FRAMING_RULES.iter().map(|s| s.to_string()).collect(),
            platform: self.platform,
            domain,
        };

        validate(&plan)?;
        Ok(plan)
    }
}

/// Required anchors present and exactly four hashtags.
pub fn validate(plan: &ContentPlan) -> Result<(), PlanError> {
    let required = [
        ("decision", &plan.decision),
        ("constraint", &plan.constraint),
        ("risk_owner", &plan.risk_owner),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(PlanError::MissingField {
                field,
                domain: plan.domain.clone(),
            });
        }
    }
    if plan.human_roles.iter().all(|r| r.trim().is_empty()) {
        return Err(PlanError::MissingField {
            field: "human_roles",
            domain: plan.domain.clone(),
        });
    }
    if plan.hashtags.len() != HASHTAG_COUNT {
        return Err(PlanError::HashtagCount {
            count: plan.hashtags.len(),
        });
    }
    Ok(())
}

/// Highest score wins, first in input order on ties. Candidates in `domain` are
/// preferred when any exist.
fn pick_candidate<'a>(
    candidates: &'a [TrendCandidate],
    domain: Option<&str>,
) -> Option<&'a TrendCandidate> {
    let in_domain = |c: &&TrendCandidate| match domain {
        Some(d) => c
            .domain_name()
            .map(|cd| cd.eq_ignore_ascii_case(d.trim()))
            .unwrap_or(false),
        None => true,
    };
    let pool: Vec<&TrendCandidate> = if candidates.iter().any(|c| in_domain(&c)) {
        candidates.iter().filter(in_domain).collect()
    } else {
        candidates.iter().collect()
    };

    let mut best: Option<&TrendCandidate> = None;
    for candidate in pool {
        match best {
            Some(b) if candidate.effective_score() <= b.effective_score() => {}
            _ => best = Some(candidate),
        }
    }
    best
}

/// Strip `#`, trim, drop empties, dedupe case-insensitively keeping first spelling.
fn normalize_hashtags<'a, I>(tags: I) -> Vec<String>
where
    I: Iterator<Item = &'a String>,
{
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.trim().trim_start_matches('#').trim();
        if tag.is_empty() {
            continue;
        }
        if !out.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
            out.push(tag.to_string());
        }
    }
    out
}
