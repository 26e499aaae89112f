// Format enforcement for generated explanations.
//
// The contract is two clauses, "It's <harm>. This <effect>.", with one
// internal boundary. The generator usually complies but is not trusted to:
// `fix` deterministically reshapes whatever it returns.
//
// `fix` corrects the clause count and the first clause's lead-in only. It
// does not check or repair the second clause's "This"; `inspect` reports
// that case so it can be logged.

use crate::models::{Explanation, RawGeneration};

/// Required start of the first clause.
pub const LEAD_IN: &str = "It's";
/// Expected start of the second clause. Reported, never enforced.
pub const CONNECTIVE: &str = "This";
/// Sentence boundary between clauses.
pub const BOUNDARY: char = '.';

/// Reshape raw generator output toward the two-clause contract.
///
/// 1. More than one boundary: keep the first two clauses, trimmed, joined
///    as `"<first>. <second>."`. Zero or one boundary passes through unsplit.
/// 2. If the (first) clause does not start with `It's`, prepend `"It's "`.
///
/// Pure and idempotent: `fix(&fix(x)) == fix(x)`. Empty input yields `"It's "`.
pub fn fix(raw: &str) -> String {
    if raw.matches(BOUNDARY).count() > 1 {
        let mut clauses = raw.split(BOUNDARY);
        let first = clauses.next().unwrap_or_default().trim();
        let second = clauses.next().unwrap_or_default().trim();
        // trim_end keeps an empty first clause from leaving "It's " before the boundary
        let first = with_lead_in(first);
        format!("{}{BOUNDARY} {second}{BOUNDARY}", first.trim_end())
    } else {
        with_lead_in(raw)
    }
}

fn with_lead_in(clause: &str) -> String {
    if clause.starts_with(LEAD_IN) {
        clause.to_string()
    } else {
        format!("{LEAD_IN} {clause}")
    }
}

/// Apply `fix` to a generation and wrap it as the outbound explanation.
pub fn enforce(raw: &RawGeneration) -> Explanation {
    Explanation::new(fix(&raw.content))
}

/// How a piece of text measures against the two-clause contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContractCheck {
    pub has_lead_in: bool,
    pub has_connective: bool,
    /// Boundaries other than a single trailing one.
    pub internal_boundaries: usize,
}

impl ContractCheck {
    pub fn is_compliant(&self) -> bool {
        self.has_lead_in && self.has_connective && self.internal_boundaries == 1
    }
}

/// Inspect `text` without changing it.
pub fn inspect(text: &str) -> ContractCheck {
    let trimmed = text.trim_end();
    let total = trimmed.matches(BOUNDARY).count();
    let internal_boundaries = if trimmed.ends_with(BOUNDARY) {
        total - 1
    } else {
        total
    };

    let has_connective = trimmed
        .split_once(BOUNDARY)
        .map(|(_, rest)| rest.trim_start().starts_with(CONNECTIVE))
        .unwrap_or(false);

    ContractCheck {
        has_lead_in: text.starts_with(LEAD_IN),
        has_connective,
        internal_boundaries,
    }
}
