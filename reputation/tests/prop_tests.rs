use proptest::prelude::*;

use historia_reputation::{label, score, ProposalSummary, ScoreLabel};
use historia_types::{EventStatus, Outcome};

fn proposal_strategy() -> impl Strategy<Value = ProposalSummary> {
    (
        prop_oneof![
            Just(EventStatus::Commit),
            Just(EventStatus::Reveal),
            Just(EventStatus::Resolved),
            Just(EventStatus::Voided),
        ],
        prop_oneof![
            Just(Outcome::Pending),
            Just(Outcome::Accepted),
            Just(Outcome::Rejected),
            Just(Outcome::Tied),
        ],
    )
        .prop_map(|(status, outcome)| ProposalSummary { status, outcome })
}

proptest! {
    /// The score is always within [0, 10] and has at most one decimal.
    #[test]
    fn score_is_bounded(
        win_rate in 0u32..=100,
        votes in 0u64..10_000,
        staked in 0.0f64..1e9,
        proposals in prop::collection::vec(proposal_strategy(), 0..30),
    ) {
        let s = score(f64::from(win_rate), votes, staked, &proposals);
        prop_assert!((0.0..=10.0).contains(&s));
        prop_assert!(((s * 10.0).round() - s * 10.0).abs() < 1e-9);
    }

    /// More correct votes never lower the score.
    #[test]
    fn score_monotone_in_win_rate(a in 0u32..=100, b in 0u32..=100, votes in 0u64..20) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(score(f64::from(lo), votes, 1.0, &[]) <= score(f64::from(hi), votes, 1.0, &[]));
    }

    /// Labels partition the range.
    #[test]
    fn label_matches_band(s in 0.0f64..=10.0) {
        let expected = match s {
            x if x >= 8.0 => ScoreLabel::Excellent,
            x if x >= 6.0 => ScoreLabel::Good,
            x if x >= 4.0 => ScoreLabel::Average,
            x if x >= 2.0 => ScoreLabel::Poor,
            _ => ScoreLabel::VeryPoor,
        };
        prop_assert_eq!(label(s), expected);
    }
}
