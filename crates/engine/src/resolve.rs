//! Validation and ranking of module proposals.
//!
//! Every candidate passes through the strain-length, point-range and legality
//! validators (the first two unless it opts out), the survivors are ranked by
//! priority and then by source id, and the winner is made legal by promotion
//! or demotion if it is insufficient.

use crate::candidate::{Bypass, Candidate};
use crate::config::{Range, ValidationConfig};
use crate::error::EngineError;
use crate::features::Features;
use crate::trace::{CandidateTrace, DecisionTrace, Outcome, Rejection};
use std::cmp::Reverse;
use tracing::{debug, error};
use types::{Call, Legality};

/// The pipeline's answer for one turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub candidate: Candidate,
    /// Set when an insufficient bid was raised to the cheapest legal level.
    pub promoted_from: Option<Call>,
}

/// Check `candidate` against the validators it has not opted out of.
pub fn validate(
    candidate: &Candidate,
    features: &Features,
    validation: &ValidationConfig,
) -> Outcome {
    let call = candidate.call;
    let legality = features.auction.auction.legality(&call);
    if legality == Legality::Illegal {
        return Outcome::Rejected(Rejection::Illegal);
    }
    if !candidate.bypasses(Bypass::StrainLength) {
        if let Some(suit) = call.suit() {
            let need = candidate
                .shows
                .min_length
                .unwrap_or(validation.min_suit_length);
            let have = features.length(suit);
            if have < need {
                return Outcome::Rejected(Rejection::StrainLength { suit, need, have });
            }
        }
    }
    if !candidate.bypasses(Bypass::PointRange) {
        let range = candidate.shows.points.or_else(|| {
            call.level()
                .map(|level| Range::at_least(validation.level_minimum(level)))
        });
        let points = features.points();
        if let Some(range) = range.filter(|r| !r.contains(points)) {
            return Outcome::Rejected(Rejection::PointRange { range, points });
        }
    }
    if call.is_pass() && features.forcing.must_bid {
        return Outcome::PassWhileForced;
    }
    match legality {
        Legality::Insufficient => Outcome::Insufficient,
        _ => Outcome::Valid,
    }
}

/// Pick the single call to make from `candidates`.
pub fn resolve(
    mut candidates: Vec<Candidate>,
    features: &Features,
    validation: &ValidationConfig,
    trace: &mut DecisionTrace,
) -> Result<Resolved, EngineError> {
    let facts = &features.auction;
    let forcing = features.forcing;
    candidates.sort_by_key(|c| (Reverse(c.priority), c.source));

    let mut survivors = Vec::new();
    for candidate in candidates {
        let outcome = validate(&candidate, features, validation);
        if let Outcome::Rejected(_) | Outcome::PassWhileForced = outcome {
            debug!(
                source = candidate.source,
                call = %candidate.call,
                %outcome,
                "candidate discarded"
            );
        }
        trace.candidates.push(CandidateTrace {
            source: candidate.source,
            call: candidate.call,
            priority: candidate.priority,
            rationale: candidate.rationale.clone(),
            outcome,
        });
        if let Outcome::Valid | Outcome::Insufficient = outcome {
            survivors.push((candidate, outcome));
        }
    }

    let mut survivors = survivors.into_iter().peekable();
    while let Some((mut candidate, outcome)) = survivors.next() {
        // Equal keys mean the order between them is arbitrary.
        if let Some((next, _)) = survivors.peek() {
            if (next.priority, next.source) == (candidate.priority, candidate.source) {
                error!(
                    source = candidate.source,
                    priority = candidate.priority,
                    first = %candidate.call,
                    second = %next.call,
                    "ambiguous tie between candidates"
                );
                return Err(EngineError::AmbiguousTie {
                    module: candidate.source,
                    priority: candidate.priority,
                });
            }
        }
        if outcome == Outcome::Valid {
            trace.selected = Some(candidate.call);
            return Ok(Resolved {
                candidate,
                promoted_from: None,
            });
        }
        let original = candidate.call;
        match facts
            .auction
            .next_legal_same_strain(&original)
            .filter(|c| facts.auction.is_legal(c))
        {
            Some(promoted) => {
                debug!(source = candidate.source, from = %original, to = %promoted, "promoted");
                candidate.call = promoted;
                candidate.rationale = format!(
                    "{} (promoted from {original} to {promoted})",
                    candidate.rationale
                );
                trace.selected = Some(promoted);
                trace.promoted_from = Some(original);
                return Ok(Resolved {
                    candidate,
                    promoted_from: Some(original),
                });
            }
            None if !forcing.must_bid => {
                debug!(source = candidate.source, call = %original, "demoted to pass");
                let demoted = Candidate {
                    call: Call::Pass,
                    rationale: format!("Pass: {original} cannot be made legal"),
                    forcing: None,
                    ..candidate
                };
                trace.selected = Some(Call::Pass);
                return Ok(Resolved {
                    candidate: demoted,
                    promoted_from: None,
                });
            }
            None => continue,
        }
    }

    if forcing.must_bid {
        error!(
            position = %facts.position,
            level = ?forcing.level,
            "forced to bid but no legal non-pass candidate"
        );
        return Err(EngineError::ForcingViolation {
            position: facts.position,
            level: forcing.level,
        });
    }
    Err(EngineError::NoCandidate {
        position: facts.position,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::priority;
    use crate::forcing::{ForcingLevel, ForcingStatus};
    use crate::rules::testing::{call, config, features, hand};

    fn run(
        candidates: Vec<Candidate>,
        hand_str: &str,
        calls: &str,
    ) -> (Result<Resolved, EngineError>, DecisionTrace) {
        let h = hand(hand_str);
        let f = features(&h, calls);
        let mut trace = DecisionTrace::new(f.auction.position);
        let result = resolve(candidates, &f, &config().validation, &mut trace);
        (result, trace)
    }

    fn candidate(s: &str, priority: u16, source: &'static str) -> Candidate {
        let mut c = Candidate::new(call(s), priority, format!("{s} from {source}"));
        c.source = source;
        c
    }

    /// 14 points, four diamonds, three hearts.
    const HAND: &str = "K32.AQ32.K32.Q32";
    const WEAK: &str = "5432.5432.432.32";

    #[test]
    fn test_highest_priority_wins() {
        let (result, trace) = run(
            vec![
                candidate("1N", priority::NATURAL, "a"),
                candidate("P", priority::PASS, "b"),
                candidate("1D", priority::CONVENTION, "c"),
            ],
            HAND,
            "",
        );
        assert_eq!(result.unwrap().candidate.call, call("1D"));
        let order: Vec<&str> = trace.candidates.iter().map(|c| c.source).collect();
        assert_eq!(order, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_source_breaks_priority_ties() {
        let (result, _) = run(
            vec![
                candidate("1D", priority::NATURAL, "z.module"),
                candidate("1N", priority::NATURAL, "a.module"),
            ],
            HAND,
            "",
        );
        assert_eq!(result.unwrap().candidate.source, "a.module");
    }

    #[test]
    fn test_identical_keys_are_an_error() {
        let (result, _) = run(
            vec![
                candidate("1D", priority::NATURAL, "same"),
                candidate("1N", priority::NATURAL, "same"),
            ],
            HAND,
            "",
        );
        assert!(matches!(
            result,
            Err(EngineError::AmbiguousTie {
                module: "same",
                priority: priority::NATURAL
            })
        ));
    }

    #[test]
    fn test_strain_length_validator() {
        let (result, trace) = run(
            vec![
                candidate("1H", priority::NATURAL, "a"),
                candidate("P", priority::PASS, "b"),
            ],
            HAND,
            "",
        );
        assert_eq!(result.unwrap().candidate.call, Call::Pass);
        assert!(matches!(
            trace.candidates[0].outcome,
            Outcome::Rejected(Rejection::StrainLength {
                need: 4,
                have: 3,
                ..
            })
        ));
    }

    #[test]
    fn test_bypass_skips_validators() {
        let artificial = candidate("2C", priority::CONVENTION, "a")
            .artificial()
            .bypassing(Bypass::PointRange);
        let (result, _) = run(vec![artificial], WEAK, "1N P");
        assert_eq!(result.unwrap().candidate.call, call("2C"));
    }

    #[test]
    fn test_point_range_validator() {
        let strong = candidate("1D", priority::NATURAL, "a").showing_points(Range::new(15, 17));
        let (result, trace) = run(vec![strong, candidate("P", priority::PASS, "b")], HAND, "");
        assert_eq!(result.unwrap().candidate.call, Call::Pass);
        assert!(matches!(
            trace.candidates[0].outcome,
            Outcome::Rejected(Rejection::PointRange { points: 14, .. })
        ));
    }

    #[test]
    fn test_illegal_rejected() {
        // Doubling partner.
        let (result, trace) = run(
            vec![
                candidate("X", priority::CONVENTION, "a"),
                candidate("P", priority::PASS, "b"),
            ],
            HAND,
            "1H P",
        );
        assert_eq!(result.unwrap().candidate.call, Call::Pass);
        assert_eq!(
            trace.candidates[0].outcome,
            Outcome::Rejected(Rejection::Illegal)
        );
    }

    #[test]
    fn test_bypass_never_skips_legality() {
        // Doubling partner, with both length and strength checks waived.
        let artificial = candidate("X", priority::CONVENTION, "a")
            .artificial()
            .bypassing(Bypass::PointRange);
        let (result, trace) = run(
            vec![artificial, candidate("P", priority::PASS, "b")],
            WEAK,
            "1H P",
        );
        let resolved = result.unwrap();
        assert_eq!(resolved.candidate.call, Call::Pass);
        assert_eq!(resolved.candidate.source, "b");
        assert_eq!(
            trace.candidates[0].outcome,
            Outcome::Rejected(Rejection::Illegal)
        );
        assert_eq!(trace.selected, Some(Call::Pass));
    }

    #[test]
    fn test_tie_behind_skipped_candidate_is_an_error() {
        let h = hand(HAND);
        let mut f = features(&h, "7S P");
        f.forcing = ForcingStatus {
            level: ForcingLevel::OneRoundForcing,
            must_bid: true,
        };
        // 6D cannot be promoted and a forced hand may not pass, so resolution
        // reaches the two equal 7N candidates.
        let candidates = vec![
            candidate("6D", priority::NATURAL, "a").bypassing(Bypass::PointRange),
            candidate("7N", priority::FALLBACK, "same").bypassing(Bypass::PointRange),
            candidate("7N", priority::FALLBACK, "same").bypassing(Bypass::PointRange),
        ];
        let mut trace = DecisionTrace::new(f.auction.position);
        let result = resolve(candidates, &f, &config().validation, &mut trace);
        assert!(matches!(
            result,
            Err(EngineError::AmbiguousTie {
                module: "same",
                priority: priority::FALLBACK
            })
        ));
        assert_eq!(trace.candidates[0].outcome, Outcome::Insufficient);
    }

    #[test]
    fn test_insufficient_bid_promoted() {
        let (result, trace) = run(vec![candidate("1D", priority::NATURAL, "a")], HAND, "1S P");
        let resolved = result.unwrap();
        assert_eq!(resolved.candidate.call, call("2D"));
        assert_eq!(resolved.promoted_from, Some(call("1D")));
        assert!(resolved
            .candidate
            .rationale
            .ends_with("(promoted from 1D to 2D)"));
        assert_eq!(trace.candidates[0].outcome, Outcome::Insufficient);
        assert_eq!(trace.promoted_from, Some(call("1D")));
        assert_eq!(trace.selected, Some(call("2D")));
    }

    #[test]
    fn test_unpromotable_bid_demoted_to_pass() {
        let (result, _) = run(
            vec![candidate("6D", priority::NATURAL, "a").bypassing(Bypass::PointRange)],
            HAND,
            "7S P",
        );
        let resolved = result.unwrap();
        assert_eq!(resolved.candidate.call, Call::Pass);
        assert!(resolved.candidate.rationale.contains("6D"));
    }

    #[test]
    fn test_pass_discarded_when_forced() {
        // Strong 2C forces responder.
        let (result, trace) = run(vec![candidate("P", priority::PASS, "a")], WEAK, "2C P");
        assert!(matches!(result, Err(EngineError::ForcingViolation { .. })));
        assert_eq!(trace.candidates[0].outcome, Outcome::PassWhileForced);
    }

    #[test]
    fn test_nothing_left() {
        let (result, _) = run(Vec::new(), HAND, "");
        assert!(matches!(result, Err(EngineError::NoCandidate { .. })));
    }
}
