//! Domain workflow skeletons.
//!
//! Every post must name a decision point, the constraint it is made under, and who
//! owns the risk. Known domains carry their own skeleton; anything else resolves to
//! the `General` skeleton so planning never blocks on an unrecognized domain.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Domain {
    Foreclosures,
    #[serde(rename = "Assisted Living")]
    AssistedLiving,
    #[serde(rename = "Trading Futures")]
    TradingFutures,
    General,
}

const KNOWN_DOMAINS: [Domain; 3] = [
    Domain::Foreclosures,
    Domain::AssistedLiving,
    Domain::TradingFutures,
];

/// Required argument structure for a domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skeleton {
    pub domain: Domain,
    pub decision: String,
    pub constraint: String,
    pub risk_owner: String,
    pub human_roles: Vec<String>,
    /// Used when a trend candidate brings no hashtags of its own.
    pub default_hashtags: Vec<String>,
}

impl Domain {
    /// Case-insensitive lookup; unknown names map to `General`.
    pub fn from_name(name: &str) -> Domain {
        let name = name.trim();
        KNOWN_DOMAINS
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(name))
            .unwrap_or(Domain::General)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Domain::Foreclosures => "Foreclosures",
            Domain::AssistedLiving => "Assisted Living",
            Domain::TradingFutures => "Trading Futures",
            Domain::General => "General",
        }
    }

    pub fn skeleton(&self) -> Skeleton {
        let (decision, constraint, risk_owner, roles, tags): (
            &str,
            &str,
            &str,
            [&str; 3],
            [&str; 5],
        ) = match self {
            Domain::Foreclosures => (
                "What is the next best step for the homeowner to take right now (without giving legal advice)?",
                "High uncertainty, time pressure, emotional overwhelm, and incomplete information.",
                "Homeowner (stress + missed deadlines) and any professionals they consult (accuracy and boundaries).",
                ["Homeowner", "Housing counselor / attorney", "Servicer / lender representative"],
                ["ForeclosureSupport", "Homeowners", "Housing", "ProcessClarity", "SystemDesign"],
            ),
            Domain::AssistedLiving => (
                "What care path should the family explore next (without medical advice)?",
                "Time pressure, limited availability, cost constraints, and family uncertainty/emotions.",
                "Family decision-maker (fit and safety) and care provider team (quality and communication).",
                ["Family decision-maker", "Caregiver", "Community admissions / care team"],
                ["AssistedLiving", "Caregiving", "SeniorCare", "RealWorldAI", "SystemDesign"],
            ),
            Domain::TradingFutures => (
                "Do we enter, exit, reduce risk, or stand down under the current rules?",
                "Volatility, slippage, execution limits, and drawdown/consistency rules.",
                "Trader (discipline and sizing) and prop firm/broker ruleset (compliance constraints).",
                ["Trader", "Risk rules / prop constraints", "Execution platform"],
                ["FuturesTrading", "RiskManagement", "TradingDiscipline", "RealWorldAI", "SystemDesign"],
            ),
            Domain::General => (
                "What action should be taken given current conditions and constraints?",
                "Limited resources, time pressure, and uncertainty in outcomes.",
                "Decision maker and stakeholders (consequences of poor decisions).",
                ["Decision maker", "Operator", "Stakeholder"],
                ["RealWorldAI", "SystemDesign", "ProcessClarity", "DecisionMaking", "Operations"],
            ),
        };

        Skeleton {
            domain: *self,
            decision: decision.to_string(),
            constraint: constraint.to_string(),
            risk_owner: risk_owner.to_string(),
            human_roles: roles.iter().map(|r| r.to_string()).collect(),
            default_hashtags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Skeleton for a domain name.
pub fn resolve(domain: &str) -> Skeleton {
    Domain::from_name(domain).skeleton()
}

/// Domains with a dedicated skeleton (excludes the `General` fallback).
pub fn available_domains() -> Vec<&'static str> {
    KNOWN_DOMAINS.iter().map(|d| d.name()).collect()
}
