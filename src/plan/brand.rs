//! Brand voice constants attached to every plan.

/// Neutral openers, rotated by history length.
pub const BRAND_PHRASES: [&str; 3] = [
    "What we're noticing:",
    "The real moment that matters:",
    "A grounded way to look at it:",
];

/// Non-salesy brand mentions, rotated by history length.
pub const QUIET_BRAND_ANCHORS: [&str; 3] = [
    "This is the kind of clarity-first framing we build at Elevare.",
    "Elevare lens: people move faster once the next step is clear.",
    "We keep studying what helps people act under pressure.",
];

/// Appended to every post after the body.
pub const FOOTER: &str =
    "\u{2014} Elevare by Amaziah\nInsights from Elevare by Amaziah, building real-world systems with AI.";

pub const BANNED_HYPE: [&str; 7] = [
    "unlock the power",
    "revolutionize",
    "game-changer",
    "are you ready",
    "cutting-edge",
    "seamless",
    "transform",
];

pub const FRAMING_RULES: [&str; 3] = [
    "Be clear about boundaries: support and education, not advice or guarantees",
    "Name one real constraint (time, uncertainty, capacity, rules, or emotional bandwidth)",
    "End with one grounded question that invites reflection or a next step",
];

pub fn brand_phrase(seed: usize) -> &'static str {
    BRAND_PHRASES[seed % BRAND_PHRASES.len()]
}

pub fn quiet_anchor(seed: usize) -> &'static str {
    QUIET_BRAND_ANCHORS[seed % QUIET_BRAND_ANCHORS.len()]
}
