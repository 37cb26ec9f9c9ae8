//! Jacoby 2NT: a game-forcing major raise and opener's descriptive rebids.

use super::{bid, one_level_suit, suit_name, RuleModule, SourceId, NOTRUMP_2, NOTRUMP_3};
use crate::candidate::{priority, Bypass, Candidate};
use crate::config::{Range, SystemConfig, Thresholds};
use crate::error::RuleFault;
use crate::features::{AuctionFacts, Features, Role};
use crate::forcing::ForcingLevel;
use types::{Call, Hand, Strain, Suit};

pub struct Jacoby2NT {
    t: Thresholds,
}

/// The major partner opened, when the caller may bid Jacoby 2NT over it.
fn raise_context(facts: &AuctionFacts) -> Option<Suit> {
    let major = one_level_suit(facts.opening).filter(|s| s.is_major())?;
    (facts.partner_opened()
        && !facts.has_acted()
        && !facts.passed_hand
        && facts.opponents_silent()
        && facts.cheapest(Strain::NoTrump) == Some(NOTRUMP_2))
    .then_some(major)
}

/// The caller opened a major and partner's only call was Jacoby 2NT.
fn is_jacoby_auction(facts: &AuctionFacts) -> Option<Suit> {
    let major = one_level_suit(facts.opening).filter(|s| s.is_major())?;
    let (before, call) = facts.before_last_call_of(facts.partner())?;
    (facts.opener == Some(facts.position)
        && call == NOTRUMP_2
        && raise_context(&before) == Some(major))
    .then_some(major)
}

impl Jacoby2NT {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            t: config.thresholds.clone(),
        }
    }

    fn raise(&self, features: &Features, major: Suit) -> Option<Candidate> {
        let p = features.points();
        let support = features.length(major);
        (p >= self.t.jacoby_2nt_min && support >= 4).then(|| {
            Candidate::new(
                NOTRUMP_2,
                priority::CONVENTION,
                format!(
                    "2NT: Jacoby, {p} points, {support} {}",
                    suit_name(major)
                ),
            )
            .showing_points(Range::at_least(self.t.jacoby_2nt_min))
            .forcing(ForcingLevel::GameForcing)
        })
    }

    fn opener_rebid(&self, hand: &Hand, features: &Features, major: Suit) -> Candidate {
        let h = &features.hand;
        let p = h.points;
        let side_suits: Vec<Suit> = Suit::ALL.into_iter().filter(|s| *s != major).collect();

        let short = side_suits
            .iter()
            .copied()
            .filter(|s| h.length(*s) <= 1)
            .min_by_key(|s| (h.length(*s), std::cmp::Reverse(*s)));
        if let Some(suit) = short {
            let call = bid(3, suit);
            return Candidate::new(
                call,
                priority::CONVENTION_RESPONSE,
                format!("{call}: shortness in {}", suit_name(suit)),
            )
            .artificial()
            .bypassing(Bypass::PointRange);
        }

        let good: Vec<Suit> = side_suits
            .iter()
            .copied()
            .filter(|s| h.length(*s) >= 5 && hand.top_honors(*s, 5) >= 3)
            .collect();
        if let Some(suit) = h.longest_of(&good) {
            let call = bid(4, suit);
            return Candidate::new(
                call,
                priority::CONVENTION_RESPONSE,
                format!("{call}: good five-card {} side suit", suit_name(suit)),
            )
            .showing_length(5)
            .bypassing(Bypass::PointRange);
        }

        let semi_balanced = h.balanced || h.shape == types::Shape::SemiBalanced;
        let (call, rationale) = if self.t.one_notrump.contains(p) && semi_balanced {
            (NOTRUMP_3, format!("3NT: {p} points, no shortness"))
        } else if p >= self.t.one_notrump.min {
            (bid(3, major), format!("3{}: {p} points, extras", major.to_char()))
        } else {
            (bid(4, major), format!("4{}: {p} points, minimum", major.to_char()))
        };
        Candidate::new(call, priority::CONVENTION_RESPONSE, rationale)
            .artificial()
            .bypassing(Bypass::PointRange)
    }
}

impl RuleModule for Jacoby2NT {
    fn id(&self) -> SourceId {
        "convention.jacoby_2nt"
    }

    fn evaluate(&self, hand: &Hand, features: &Features) -> Result<Option<Candidate>, RuleFault> {
        let facts = &features.auction;
        let candidate = match features.role() {
            Role::Responder => raise_context(facts).and_then(|m| self.raise(features, m)),
            Role::OpenerRebid if facts.my_bids().len() == 1 && facts.rho_passed() => {
                is_jacoby_auction(facts).map(|m| self.opener_rebid(hand, features, m))
            }
            _ => None,
        };
        Ok(candidate)
    }

    fn announces(&self, facts: &AuctionFacts, call: &Call) -> Option<ForcingLevel> {
        (*call == NOTRUMP_2 && raise_context(facts).is_some()).then_some(ForcingLevel::GameForcing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testing::{announced, config, proposal};

    fn module() -> Jacoby2NT {
        Jacoby2NT::new(&config())
    }

    fn call(s: &str) -> Option<Call> {
        Some(s.parse().unwrap())
    }

    #[test]
    fn test_raise_needs_four_trumps_and_values() {
        assert_eq!(proposal(&module(), "A32.K32.K32.QJ32", "1S P"), call("2N"));
        // Three trumps.
        assert_eq!(proposal(&module(), "A32.K432.K32.QJ2", "1S P"), None);
        // Too weak.
        assert_eq!(proposal(&module(), "432.K32.K32.QJ32", "1S P"), None);
        // Not over a minor, and not after interference.
        assert_eq!(proposal(&module(), "A32.K32.QJ32.K32", "1D P"), None);
        assert_eq!(proposal(&module(), "A32.K32.K32.QJ32", "1S 2C"), None);
    }

    #[test]
    fn test_opener_shows_shortness_first() {
        assert_eq!(
            proposal(&module(), "A32.2.KQ32.AQJ32", "1S P 2N P"),
            call("3D")
        );
    }

    #[test]
    fn test_opener_shows_good_side_suit() {
        assert_eq!(
            proposal(&module(), "AQJ32.32.32.KQ32", "1S P 2N P"),
            call("4C")
        );
    }

    #[test]
    fn test_opener_rebids_by_strength() {
        // 13 points: minimum.
        assert_eq!(
            proposal(&module(), "K32.Q32.A2.KJ432", "1S P 2N P"),
            call("4S")
        );
        // 15 points, 5-3-3-2: 3NT.
        assert_eq!(
            proposal(&module(), "K32.A32.A2.KJ432", "1S P 2N P"),
            call("3N")
        );
        // 18 points: 3S.
        assert_eq!(
            proposal(&module(), "KQ2.A32.A2.AJ432", "1S P 2N P"),
            call("3S")
        );
    }

    #[test]
    fn test_announces_game_force() {
        assert_eq!(
            announced(&module(), "1H P", "2N"),
            Some(ForcingLevel::GameForcing)
        );
        assert_eq!(announced(&module(), "1C P", "2N"), None);
    }
}
