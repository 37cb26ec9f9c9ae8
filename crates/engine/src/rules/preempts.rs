//! Weak two-bids and higher preemptive openings.

use super::{bid, suit_name, RuleModule, SourceId};
use crate::candidate::{priority, Candidate};
use crate::config::{SystemConfig, Thresholds};
use crate::error::RuleFault;
use crate::features::{Features, Role};
use types::{Hand, Suit};

/// 2D, 2H or 2S: exactly six cards with two of the top five honors.
pub struct WeakTwo {
    t: Thresholds,
}

impl WeakTwo {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            t: config.thresholds.clone(),
        }
    }
}

impl RuleModule for WeakTwo {
    fn id(&self) -> SourceId {
        "convention.weak_two"
    }

    fn evaluate(&self, hand: &Hand, features: &Features) -> Result<Option<Candidate>, RuleFault> {
        let p = features.points();
        if features.role() != Role::Opener
            || features.auction.seat == 4
            || !self.t.weak_two.contains(p)
        {
            return Ok(None);
        }
        let suits: Vec<Suit> = [Suit::Diamonds, Suit::Hearts, Suit::Spades]
            .into_iter()
            .filter(|s| features.length(*s) == 6 && hand.top_honors(*s, 5) >= 2)
            .collect();
        let Some(suit) = features.hand.longest_of(&suits) else {
            return Ok(None);
        };
        let call = bid(2, suit);
        Ok(Some(
            Candidate::new(
                call,
                priority::CONVENTION,
                format!("{call}: weak two, {p} points, six {}", suit_name(suit)),
            )
            .showing_length(6)
            .showing_points(self.t.weak_two),
        ))
    }
}

/// Three-level openings with seven cards, four-level with eight or more.
pub struct Preempt {
    t: Thresholds,
}

impl Preempt {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            t: config.thresholds.clone(),
        }
    }
}

impl RuleModule for Preempt {
    fn id(&self) -> SourceId {
        "convention.preempt"
    }

    fn evaluate(&self, hand: &Hand, features: &Features) -> Result<Option<Candidate>, RuleFault> {
        let p = features.points();
        if features.role() != Role::Opener
            || features.auction.seat == 4
            || !self.t.preempt.contains(p)
        {
            return Ok(None);
        }
        let suit = features.hand.longest_suit();
        let len = features.length(suit);
        if len < 7 || hand.top_honors(suit, 5) < 2 {
            return Ok(None);
        }
        let level = if len >= 8 { 4 } else { 3 };
        let call = bid(level, suit);
        Ok(Some(
            Candidate::new(
                call,
                priority::CONVENTION,
                format!("{call}: preempt, {p} points, {len} {}", suit_name(suit)),
            )
            .showing_length(len)
            .showing_points(self.t.preempt),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testing::{config, proposal};
    use types::Call;

    fn call(s: &str) -> Option<Call> {
        Some(s.parse().unwrap())
    }

    #[test]
    fn test_weak_two() {
        let m = WeakTwo::new(&config());
        assert_eq!(proposal(&m, "32.32.KQJ432.432", ""), call("2H"));
        // Clubs are not a weak two suit.
        assert_eq!(proposal(&m, "KQJ432.32.32.432", ""), None);
        // Poor suit.
        assert_eq!(proposal(&m, "K2.Q2.J65432.432", ""), None);
        // Not in fourth seat.
        assert_eq!(proposal(&m, "32.32.KQJ432.432", "P P P"), None);
    }

    #[test]
    fn test_preempt_levels() {
        let m = Preempt::new(&config());
        assert_eq!(proposal(&m, "432.32.2.KQJ5432", ""), call("3S"));
        assert_eq!(proposal(&m, "32.32.2.KQJ65432", ""), call("4S"));
        assert_eq!(proposal(&m, "KQJ5432.32.32.32", ""), call("3C"));
        // Too strong.
        assert_eq!(proposal(&m, "A2.K2.32.AKQ5432", ""), None);
    }
}
