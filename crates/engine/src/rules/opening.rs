//! One-level and notrump openings.

use super::{bid, suit_name, RuleModule, SourceId, NOTRUMP_1, NOTRUMP_2};
use crate::candidate::{priority, Bypass, Candidate};
use crate::config::{Range, SystemConfig, Thresholds};
use crate::error::RuleFault;
use crate::features::{Features, HandFeatures, Role};
use types::{Hand, Suit};

pub struct NaturalOpening {
    t: Thresholds,
}

impl NaturalOpening {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            t: config.thresholds.clone(),
        }
    }

    /// Light openings: the Rule of 20 in first three seats, the Rule of 15
    /// in fourth.
    fn light_opening(&self, hand: &HandFeatures, seat: u8) -> Option<&'static str> {
        if seat == 4 {
            let rule_of_fifteen = hand.points.saturating_add(hand.length(Suit::Spades));
            (rule_of_fifteen >= self.t.rule_of_fifteen).then_some("Rule of 15")
        } else {
            (hand.rule_of_twenty() >= self.t.rule_of_twenty).then_some("Rule of 20")
        }
    }
}

/// Longer major with five or more, unless a minor is longer still; otherwise
/// the better minor (clubs with 3-3, diamonds with 4-4 or longer).
pub(crate) fn opening_suit(hand: &HandFeatures) -> Suit {
    let major = hand
        .longest_of(&[Suit::Hearts, Suit::Spades])
        .unwrap_or(Suit::Spades);
    let minor = match hand.length(Suit::Clubs).cmp(&hand.length(Suit::Diamonds)) {
        std::cmp::Ordering::Greater => Suit::Clubs,
        std::cmp::Ordering::Less => Suit::Diamonds,
        std::cmp::Ordering::Equal if hand.length(Suit::Clubs) == 3 => Suit::Clubs,
        std::cmp::Ordering::Equal => Suit::Diamonds,
    };
    if hand.length(major) >= 5 && hand.length(major) >= hand.length(minor) {
        major
    } else {
        minor
    }
}

impl RuleModule for NaturalOpening {
    fn id(&self) -> SourceId {
        "natural.opening"
    }

    fn evaluate(&self, _hand: &Hand, features: &Features) -> Result<Option<Candidate>, RuleFault> {
        if features.role() != Role::Opener {
            return Ok(None);
        }
        let h = &features.hand;
        let p = h.points;
        if h.balanced && self.t.one_notrump.contains(p) {
            return Ok(Some(
                Candidate::new(
                    NOTRUMP_1,
                    priority::NATURAL,
                    format!("1NT: {p} points, balanced"),
                )
                .showing_points(self.t.one_notrump),
            ));
        }
        if h.balanced && self.t.two_notrump.contains(p) {
            return Ok(Some(
                Candidate::new(
                    NOTRUMP_2,
                    priority::NATURAL,
                    format!("2NT: {p} points, balanced"),
                )
                .showing_points(self.t.two_notrump),
            ));
        }

        let suit = opening_suit(h);
        let len = h.length(suit);
        let min_len = if suit.is_major() { 5 } else { 3 };
        let call = bid(1, suit);
        let candidate = if p >= self.t.opening_min {
            Candidate::new(
                call,
                priority::NATURAL,
                format!("{call}: {p} points, {len} {}", suit_name(suit)),
            )
            .showing_points(Range::at_least(self.t.opening_min))
        } else if let Some(rule) = self.light_opening(h, features.auction.seat) {
            Candidate::new(
                call,
                priority::NATURAL,
                format!("{call}: {p} points, {len} {}, {rule}", suit_name(suit)),
            )
            .bypassing(Bypass::PointRange)
        } else {
            return Ok(None);
        };
        Ok(Some(candidate.showing_length(min_len)))
    }
}
