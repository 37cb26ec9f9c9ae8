use super::{suit_name, RuleModule, SourceId, NOTRUMP_1};
use crate::candidate::{priority, Bypass, Candidate};
use crate::config::{Range, SystemConfig, Thresholds};
use crate::error::RuleFault;
use crate::features::{Features, Role};
use crate::forcing::ForcingLevel;
use types::{Hand, Strain, Suit};

/// Advances of partner's natural overcall: raises, cuebid raises, new suits
/// and notrump.
pub struct NaturalAdvance {
    t: Thresholds,
}

impl NaturalAdvance {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            t: config.thresholds.clone(),
        }
    }

    fn over_notrump(&self, features: &Features) -> Option<Candidate> {
        let facts = &features.auction;
        let p = features.points();
        let call = if p >= self.t.two_level_response_min {
            facts.cheapest_up_to(Strain::NoTrump, 3)?
        } else if p >= self.t.response_min + 2 {
            facts.cheapest_up_to(Strain::NoTrump, 2)?
        } else {
            return None;
        };
        Some(
            Candidate::new(
                call,
                priority::NATURAL,
                format!("{call}: {p} points opposite a 1NT overcall"),
            )
            .bypassing(Bypass::PointRange),
        )
    }

    fn over_suit(&self, hand: &Hand, features: &Features, overcall: Suit) -> Option<Candidate> {
        let facts = &features.auction;
        let h = &features.hand;
        let p = h.points;
        let support = h.length(overcall);
        let raise_min = self.t.response_min + 2;
        let theirs = facts.their_suits();

        if support >= 3 && p >= self.t.two_level_response_min + 1 {
            let opened = facts.opening.and_then(|c| c.suit())?;
            let call = facts.cheapest(opened.into())?;
            return Some(
                Candidate::new(
                    call,
                    priority::NATURAL,
                    format!("{call}: cuebid raise, {p} points, {support} {}", suit_name(overcall)),
                )
                .artificial()
                .showing_points(Range::at_least(self.t.two_level_response_min + 1))
                .forcing(ForcingLevel::OneRoundForcing),
            );
        }
        if support >= 3 && p >= raise_min {
            let call = facts.cheapest(overcall.into())?;
            return Some(
                Candidate::new(
                    call,
                    priority::NATURAL,
                    format!("{call}: raise, {p} points, {support} {}", suit_name(overcall)),
                )
                .showing_length(3)
                .showing_points(Range::new(raise_min, self.t.two_level_response_min)),
            );
        }

        let own: Vec<Suit> = Suit::ALL
            .into_iter()
            .filter(|s| {
                *s != overcall && !theirs.contains(s) && h.length(*s) >= 5 && hand.is_good_suit(*s)
            })
            .collect();
        if p >= self.t.two_level_response_min {
            if let Some(suit) = h.longest_of(&own) {
                if let Some(call) = facts.cheapest_up_to(suit.into(), 2) {
                    return Some(
                        Candidate::new(
                            call,
                            priority::NATURAL,
                            format!("{call}: {p} points, {} {}", h.length(suit), suit_name(suit)),
                        )
                        .showing_length(5)
                        .showing_points(Range::at_least(self.t.two_level_response_min)),
                    );
                }
            }
        }

        let stopped = theirs.iter().all(|s| h.stopper(*s).is_stopped());
        let notrump = Range::new(raise_min, self.t.two_level_response_min + 1);
        if h.balanced && stopped && notrump.contains(p) {
            let call = facts.cheapest_up_to(Strain::NoTrump, 2)?;
            return Some(
                Candidate::new(
                    call,
                    priority::NATURAL,
                    format!("{call}: {p} points, stopper in their suit"),
                )
                .showing_points(notrump),
            );
        }
        None
    }
}

impl RuleModule for NaturalAdvance {
    fn id(&self) -> SourceId {
        "natural.advance"
    }

    fn evaluate(&self, hand: &Hand, features: &Features) -> Result<Option<Candidate>, RuleFault> {
        let facts = &features.auction;
        if features.role() != Role::Advancer || facts.has_acted() {
            return Ok(None);
        }
        let Some((before, overcall)) = facts.before_last_call_of(facts.partner()) else {
            return Ok(None);
        };
        if !overcall.is_bid() || facts.partner_bids().len() != 1 {
            return Ok(None);
        }
        let candidate = match overcall.suit() {
            None if overcall == NOTRUMP_1 => self.over_notrump(features),
            // 2NT and cuebids are conventional.
            None => None,
            Some(suit) if before.their_suits().contains(&suit) => None,
            Some(suit) => self.over_suit(hand, features, suit),
        };
        Ok(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testing::{config, proposal};
    use types::Call;

    fn advance(hand: &str, calls: &str) -> Option<Call> {
        proposal(&NaturalAdvance::new(&config()), hand, calls)
    }

    fn call(s: &str) -> Option<Call> {
        Some(s.parse().unwrap())
    }

    #[test]
    fn test_raise_partner_overcall() {
        assert_eq!(advance("K432.432.Q32.KJ2", "1D 1S P"), call("2S"));
    }

    #[test]
    fn test_cuebid_raise() {
        assert_eq!(advance("K432.A32.Q32.KJ2", "1D 1S P"), call("2D"));
    }

    #[test]
    fn test_new_suit_advance() {
        assert_eq!(advance("432.432.AKJ32.K2", "1D 1S P"), call("2H"));
    }

    #[test]
    fn test_notrump_overcall_advance() {
        assert_eq!(advance("K432.432.Q32.A32", "1D 1N P"), call("2N"));
    }

    #[test]
    fn test_not_after_partner_opened() {
        assert_eq!(advance("K432.432.Q32.KJ2", "1S P"), None);
    }

    #[test]
    fn test_michaels_is_not_natural() {
        assert_eq!(advance("K432.432.Q32.KJ2", "1D 2D P"), None);
    }
}
