//! The fixed lens cycle.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Analytical framing applied to a post. The cycle order is constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Lens {
    #[serde(rename = "What Everyone Gets Wrong")]
    EveryoneGetsWrong,
    #[serde(rename = "The Real Constraint")]
    RealConstraint,
    #[serde(rename = "How This Plays Out in Practice")]
    InPractice,
    #[serde(rename = "Where This Breaks at Scale")]
    BreaksAtScale,
    #[serde(rename = "The Hidden Tradeoff")]
    HiddenTradeoff,
    #[serde(rename = "How We Evaluate It")]
    HowWeEvaluate,
    #[serde(rename = "What Changes After Adoption")]
    AfterAdoption,
    #[serde(rename = "The Open Question We're Exploring")]
    OpenQuestion,
}

pub const LENS_CYCLE: [Lens; 8] = [
    Lens::EveryoneGetsWrong,
    Lens::RealConstraint,
    Lens::InPractice,
    Lens::BreaksAtScale,
    Lens::HiddenTradeoff,
    Lens::HowWeEvaluate,
    Lens::AfterAdoption,
    Lens::OpenQuestion,
];

impl Lens {
    pub fn at(index: usize) -> Lens {
        LENS_CYCLE[index % LENS_CYCLE.len()]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Lens::EveryoneGetsWrong => "What Everyone Gets Wrong",
            Lens::RealConstraint => "The Real Constraint",
            Lens::InPractice => "How This Plays Out in Practice",
            Lens::BreaksAtScale => "Where This Breaks at Scale",
            Lens::HiddenTradeoff => "The Hidden Tradeoff",
            Lens::HowWeEvaluate => "How We Evaluate It",
            Lens::AfterAdoption => "What Changes After Adoption",
            Lens::OpenQuestion => "The Open Question We're Exploring",
        }
    }

    /// Post type paired 1:1 with the lens.
    pub fn post_type(&self) -> &'static str {
        match self {
            Lens::EveryoneGetsWrong => "Correction",
            Lens::RealConstraint => "Constraint-First",
            Lens::InPractice => "Workflow Walkthrough",
            Lens::BreaksAtScale => "Scale Failure Mode",
            Lens::HiddenTradeoff => "Tradeoff Analysis",
            Lens::HowWeEvaluate => "Decision Framework",
            Lens::AfterAdoption => "Second-Order Effects",
            Lens::OpenQuestion => "Field Note",
        }
    }

    /// Workflow-mapping instruction handed to the generator.
    pub fn workflow_focus(&self) -> &'static str {
        match self {
            Lens::EveryoneGetsWrong => {
                "Map the common misconception about this trend and where people typically go wrong in their thinking."
            }
            Lens::RealConstraint => {
                "Map the actual workflow where this trend is applied and the real bottlenecks in it."
            }
            Lens::InPractice => {
                "Map the step-by-step workflow of how this trend is implemented, start to finish."
            }
            Lens::BreaksAtScale => {
                "Map the workflow at small scale, then show the transition point where it fails as volume grows."
            }
            Lens::HiddenTradeoff => {
                "Map the decision points where one benefit is gained at the cost of another."
            }
            Lens::HowWeEvaluate => {
                "Map the evaluation workflow: how people decide whether this trend is working."
            }
            Lens::AfterAdoption => {
                "Map the workflow before and after adoption and the second-order effects of the change."
            }
            Lens::OpenQuestion => {
                "Map the current workflow and mark the areas that are still unknown."
            }
        }
    }

    /// Constraint-identification instruction handed to the generator.
    pub fn constraint_focus(&self) -> &'static str {
        match self {
            Lens::EveryoneGetsWrong => {
                "Contrast what people think the constraint is with what it actually is."
            }
            Lens::RealConstraint => {
                "Name the specific constraint that limits effectiveness: the actual barrier, not the perceived one."
            }
            Lens::InPractice => "Identify where human judgment is required in the workflow.",
            Lens::BreaksAtScale => {
                "Name the bottleneck that only appears when volume increases."
            }
            Lens::HiddenTradeoff => "Name the limitation that makes the tradeoff necessary.",
            Lens::HowWeEvaluate => "Name what makes success hard to measure.",
            Lens::AfterAdoption => "Name the limitation that appears only after adoption.",
            Lens::OpenQuestion => "Name the limitation still under investigation.",
        }
    }

    pub fn index(&self) -> usize {
        LENS_CYCLE
            .iter()
            .position(|l| l == self)
            .unwrap_or_default()
    }
}

impl fmt::Display for Lens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
