//! Planning pipeline: lens choice, skeleton, build, then rotation commit.

use crate::error::{ApiError, PlanError};
use crate::lens::LensRotationEngine;
use crate::plan::builder::{ContentPlan, ContentPlanBuilder};
use crate::plan::trend::{candidate_domains, TrendCandidate};
use crate::skeleton;
use crate::types::Platform;
use tracing::{info, warn};

/// Drives one plan per call against a rotation engine.
pub struct ContentPlanner<'a> {
    engine: &'a mut LensRotationEngine,
}

impl<'a> ContentPlanner<'a> {
    pub fn new(engine: &'a mut LensRotationEngine) -> Self {
        Self { engine }
    }

    /// Build a plan and advance rotation. Rotation state only changes when the
    /// plan validates and the new state is on disk.
    ///
    /// `fallback_domain` is used when no candidate names a domain.
    pub fn plan(
        &mut self,
        candidates: &[TrendCandidate],
        platform: Option<Platform>,
        fallback_domain: Option<&str>,
    ) -> Result<ContentPlan, ApiError> {
        if candidates.is_empty() {
            return Err(PlanError::NoCandidates.into());
        }

        let mut choice = self.engine.preview(&candidate_domains(candidates));
        if choice.domain.is_none() {
            choice.domain = fallback_domain
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string);
        }

        let skeleton = skeleton::resolve(choice.domain.as_deref().unwrap_or_default());
        if choice.domain.is_some() && skeleton.domain == skeleton::Domain::General {
            warn!(
                domain = ?choice.domain,
                "No workflow skeleton for domain, using General"
            );
        }

        let plan = ContentPlanBuilder::new()
            .rotation_seed(self.engine.state().history().len())
            .platform(platform)
            .build(candidates, &choice, &skeleton)?;

        self.engine.commit(&choice, Some(plan.trend()), platform)?;

        info!(
            lens = plan.lens().name(),
            post_type = plan.post_type(),
            domain = plan.domain(),
            trend = plan.trend(),
            "Content plan built"
        );
        Ok(plan)
    }
}
