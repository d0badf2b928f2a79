//! The reputation formula.
//!
//! Four sub-scores, each in `[0, 10]`, averaged and rounded to one decimal:
//! - win rate: `win_rate / 10`
//! - volume: `min(total_votes, 10)`
//! - stake: `min(total_staked / 50 × 10, 10)`, stake in display units
//! - proposals: 5 when there is nothing to judge, otherwise
//!   `clamp(5 + accepted − 0.5 × rejected − voided, 0, 10)` over terminal proposals

use historia_adjudication::Event;
use historia_types::{EventStatus, Outcome};
use serde::{Deserialize, Serialize};

const NEUTRAL_PROPOSAL_SCORE: f64 = 5.0;
const MAX_SUBSCORE: f64 = 10.0;
const STAKE_FOR_MAX_SCORE: f64 = 50.0;

/// The parts of a proposed event the score looks at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProposalSummary {
    pub status: EventStatus,
    pub outcome: Outcome,
}

impl From<&Event> for ProposalSummary {
    fn from(e: &Event) -> Self {
        Self {
            // Non-terminal events are skipped, so the clock does not matter.
            status: e.terminal.unwrap_or(EventStatus::Commit),
            outcome: e.outcome,
        }
    }
}

pub fn score(
    win_rate: f64,
    total_votes: u64,
    total_staked_units: f64,
    proposals: &[ProposalSummary],
) -> f64 {
    let win_rate_score = (win_rate / 10.0).clamp(0.0, MAX_SUBSCORE);
    let volume_score = total_votes.min(10) as f64;
    let stake_score =
        (total_staked_units / STAKE_FOR_MAX_SCORE * MAX_SUBSCORE).clamp(0.0, MAX_SUBSCORE);
    let proposal_score = proposal_score(proposals);

    let mean = (win_rate_score + volume_score + stake_score + proposal_score) / 4.0;
    (mean * 10.0).round() / 10.0
}

fn proposal_score(proposals: &[ProposalSummary]) -> f64 {
    let terminal: Vec<_> = proposals.iter().filter(|p| p.status.is_terminal()).collect();
    if terminal.is_empty() {
        return NEUTRAL_PROPOSAL_SCORE;
    }
    let accepted = terminal.iter().filter(|p| p.outcome == Outcome::Accepted).count() as f64;
    let rejected = terminal.iter().filter(|p| p.outcome == Outcome::Rejected).count() as f64;
    let voided = terminal
        .iter()
        .filter(|p| p.status == EventStatus::Voided)
        .count() as f64;
    (NEUTRAL_PROPOSAL_SCORE + accepted - 0.5 * rejected - voided).clamp(0.0, MAX_SUBSCORE)
}

/// Qualitative band of a score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScoreLabel {
    Excellent,
    Good,
    Average,
    Poor,
    VeryPoor,
}

impl ScoreLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Average => "Average",
            Self::Poor => "Poor",
            Self::VeryPoor => "Very Poor",
        }
    }
}

impl std::fmt::Display for ScoreLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn label(score: f64) -> ScoreLabel {
    if score >= 8.0 {
        ScoreLabel::Excellent
    } else if score >= 6.0 {
        ScoreLabel::Good
    } else if score >= 4.0 {
        ScoreLabel::Average
    } else if score >= 2.0 {
        ScoreLabel::Poor
    } else {
        ScoreLabel::VeryPoor
    }
}
