use super::{jump, suit_name, RuleModule, SourceId};
use crate::candidate::{priority, Candidate};
use crate::config::{SystemConfig, Thresholds};
use crate::error::RuleFault;
use crate::features::{Features, Role};
use types::{Hand, Strain, Suit};

/// Suit overcalls, weak jump overcalls and the 1NT overcall.
pub struct NaturalOvercall {
    t: Thresholds,
}

impl NaturalOvercall {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            t: config.thresholds.clone(),
        }
    }
}

impl RuleModule for NaturalOvercall {
    fn id(&self) -> SourceId {
        "natural.overcall"
    }

    fn evaluate(&self, hand: &Hand, features: &Features) -> Result<Option<Candidate>, RuleFault> {
        let facts = &features.auction;
        if features.role() != Role::Overcaller || facts.has_acted() {
            return Ok(None);
        }
        let h = &features.hand;
        let p = h.points;
        let theirs = facts.their_suits();

        if h.balanced
            && self.t.notrump_overcall.contains(p)
            && theirs.iter().all(|s| h.stopper(*s).is_stopped())
        {
            if let Some(call) = facts.cheapest_up_to(Strain::NoTrump, 1) {
                return Ok(Some(
                    Candidate::new(
                        call,
                        priority::NATURAL,
                        format!("1NT: {p} points, balanced with a stopper"),
                    )
                    .showing_points(self.t.notrump_overcall),
                ));
            }
        }

        let suits: Vec<Suit> = Suit::ALL
            .into_iter()
            .filter(|s| !theirs.contains(s) && h.length(*s) >= 5 && hand.is_good_suit(*s))
            .collect();
        let Some(suit) = h.longest_of(&suits) else {
            return Ok(None);
        };
        let len = h.length(suit);
        let name = suit_name(suit);

        if len >= 6 && self.t.weak_jump_overcall.contains(p) && p < self.t.overcall_one_level.min + 2
        {
            if let Some(call) = jump(facts, suit.into()).filter(|c| c.level() <= Some(3)) {
                return Ok(Some(
                    Candidate::new(
                        call,
                        priority::NATURAL,
                        format!("{call}: weak jump overcall, {p} points, {len} {name}"),
                    )
                    .showing_length(6)
                    .showing_points(self.t.weak_jump_overcall),
                ));
            }
        }

        let Some(call) = facts.cheapest(suit.into()) else {
            return Ok(None);
        };
        let range = match call.level() {
            Some(1) => self.t.overcall_one_level,
            Some(2) => self.t.overcall_two_level,
            _ => return Ok(None),
        };
        if !range.contains(p) {
            return Ok(None);
        }
        Ok(Some(
            Candidate::new(
                call,
                priority::NATURAL,
                format!("{call}: overcall, {p} points, {len} {name}"),
            )
            .showing_length(5)
            .showing_points(range),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testing::{config, proposal};
    use types::Call;

    fn overcall(hand: &str, calls: &str) -> Option<Call> {
        proposal(&NaturalOvercall::new(&config()), hand, calls)
    }

    fn call(s: &str) -> Option<Call> {
        Some(s.parse().unwrap())
    }

    #[test]
    fn test_one_level_overcall() {
        assert_eq!(overcall("432.K32.32.AQJ32", "1H"), call("1S"));
    }

    #[test]
    fn test_two_level_needs_more() {
        // 9 points with good clubs: too light at the two level.
        assert_eq!(overcall("AQJ32.Q32.32.432", "1H"), None);
        assert_eq!(overcall("AQJ32.K32.32.K32", "1H"), call("2C"));
    }

    #[test]
    fn test_weak_jump_overcall() {
        assert_eq!(overcall("432.32.2.KQJ5432", "1H"), call("2S"));
    }

    #[test]
    fn test_notrump_overcall() {
        assert_eq!(overcall("K32.AQ2.KQ2.KJ32", "1H"), call("1N"));
    }

    #[test]
    fn test_poor_suit() {
        assert_eq!(overcall("432.K32.32.96432", "1H"), None);
    }
}
