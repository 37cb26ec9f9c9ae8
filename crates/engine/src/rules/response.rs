//! Responder's first call opposite partner's natural opening.

use super::{bid, jump, suit_name, RuleModule, SourceId};
use crate::candidate::{priority, Candidate};
use crate::config::{Range, SystemConfig, Thresholds};
use crate::error::RuleFault;
use crate::features::{Features, Interference, Role};
use types::{Hand, Strain, Suit};

pub struct NaturalResponse {
    t: Thresholds,
}

impl NaturalResponse {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            t: config.thresholds.clone(),
        }
    }

    fn raise(&self, features: &Features, opened: Suit) -> Option<Candidate> {
        let facts = &features.auction;
        let h = &features.hand;
        let p = h.points;
        let need = if opened.is_major() { 3 } else { 4 };
        let support = h.length(opened);
        if support < need {
            return None;
        }
        let t = &self.t;
        let (call, range, what) = if p > t.limit_raise.max {
            (
                facts.game_in(opened.into())?,
                Range::at_least(t.limit_raise.max + 1),
                "game raise",
            )
        } else if t.limit_raise.contains(p) {
            let call = bid(3, opened);
            (
                facts.auction.is_legal(&call).then_some(call)?,
                t.limit_raise,
                "limit raise",
            )
        } else if t.single_raise.contains(p) {
            (facts.cheapest_up_to(opened.into(), 2)?, t.single_raise, "single raise")
        } else {
            return None;
        };
        Some(
            Candidate::new(
                call,
                priority::NATURAL,
                format!("{call}: {what}, {p} points, {support} {}", suit_name(opened)),
            )
            .showing_length(need)
            .showing_points(range),
        )
    }

    fn jump_shift(&self, hand: &Hand, features: &Features, opened: Suit) -> Option<Candidate> {
        let facts = &features.auction;
        let h = &features.hand;
        let p = h.points;
        if p < self.t.jump_shift_min {
            return None;
        }
        let theirs = facts.their_suits();
        let suits: Vec<Suit> = Suit::ALL
            .into_iter()
            .filter(|s| *s != opened && !theirs.contains(s) && h.length(*s) >= 5)
            .filter(|s| hand.is_good_suit(*s))
            .collect();
        let suit = h.longest_of(&suits)?;
        let call = jump(facts, suit.into()).filter(|c| c.level() <= Some(3))?;
        Some(
            Candidate::new(
                call,
                priority::NATURAL,
                format!("{call}: jump shift, {p} points, {} {}", h.length(suit), suit_name(suit)),
            )
            .showing_length(5)
            .showing_points(Range::at_least(self.t.jump_shift_min)),
        )
    }

    fn new_suit(&self, features: &Features, opened: Suit) -> Option<Candidate> {
        let facts = &features.auction;
        let h = &features.hand;
        let p = h.points;
        let theirs = facts.their_suits();
        let open_suits: Vec<Suit> = Suit::ALL
            .into_iter()
            .filter(|s| *s != opened && !theirs.contains(s))
            .collect();

        let one_level: Vec<Suit> = open_suits
            .iter()
            .copied()
            .filter(|s| h.length(*s) >= 4 && facts.cheapest_up_to((*s).into(), 1).is_some())
            .collect();
        if p >= self.t.response_min {
            let five: Vec<Suit> = one_level
                .iter()
                .copied()
                .filter(|s| h.length(*s) >= 5)
                .collect();
            // Up the line with four-card suits, longest first otherwise.
            let suit = h.longest_of(&five).or_else(|| one_level.first().copied());
            if let Some(suit) = suit {
                let call = bid(1, suit);
                return Some(
                    Candidate::new(
                        call,
                        priority::NATURAL,
                        format!("{call}: {p} points, {} {}", h.length(suit), suit_name(suit)),
                    )
                    .showing_length(4)
                    .showing_points(Range::at_least(self.t.response_min)),
                );
            }
        }

        if p < self.t.two_level_response_min {
            return None;
        }
        let need = |s: Suit| if s.is_major() { 5 } else { 4 };
        let two_level: Vec<Suit> = open_suits
            .into_iter()
            .filter(|s| h.length(*s) >= need(*s))
            .filter(|s| facts.cheapest((*s).into()).and_then(|c| c.level()) == Some(2))
            .collect();
        let suit = h.longest_of(&two_level)?;
        let call = bid(2, suit);
        Some(
            Candidate::new(
                call,
                priority::NATURAL,
                format!("{call}: {p} points, {} {}", h.length(suit), suit_name(suit)),
            )
            .showing_length(need(suit))
            .showing_points(Range::at_least(self.t.two_level_response_min)),
        )
    }

    fn notrump(&self, features: &Features) -> Option<Candidate> {
        let facts = &features.auction;
        let h = &features.hand;
        let p = h.points;
        let t = &self.t;
        let uncontested = facts.interference == Interference::None && facts.opponents_silent();
        let invite = Range::new(t.limit_raise.max + 1, t.limit_raise.max + 3);
        let game = Range::new(invite.max + 1, invite.max + 3);

        let (call, range) = if uncontested && h.balanced && invite.contains(p) {
            (facts.cheapest_up_to(Strain::NoTrump, 2)?, invite)
        } else if uncontested && h.balanced && game.contains(p) {
            (facts.game_in(Strain::NoTrump)?, game)
        } else {
            let range = Range::new(t.response_min, t.limit_raise.min);
            let stopped = facts
                .their_suits()
                .iter()
                .all(|s| h.stopper(*s).is_stopped());
            if !range.contains(p) || !stopped {
                return None;
            }
            (facts.cheapest_up_to(Strain::NoTrump, 1)?, range)
        };
        Some(
            Candidate::new(call, priority::NATURAL, format!("{call}: {p} points"))
                .showing_points(range),
        )
    }

    fn over_one_suit(&self, hand: &Hand, features: &Features, opened: Suit) -> Option<Candidate> {
        if let Some(c) = self.jump_shift(hand, features, opened) {
            return Some(c);
        }
        if opened.is_major() {
            self.raise(features, opened)
                .or_else(|| self.new_suit(features, opened))
        } else {
            self.new_suit(features, opened)
                .or_else(|| self.raise(features, opened))
        }
        .or_else(|| self.notrump(features))
    }

    fn over_notrump(&self, features: &Features, level: u8) -> Option<Candidate> {
        let facts = &features.auction;
        let p = features.points();
        let (call, range) = match level {
            1 if p >= self.t.two_level_response_min => {
                (facts.game_in(Strain::NoTrump)?, Range::at_least(self.t.two_level_response_min))
            }
            1 if p >= self.t.response_min + 2 => (
                facts.cheapest_up_to(Strain::NoTrump, 2)?,
                Range::new(self.t.response_min + 2, self.t.two_level_response_min - 1),
            ),
            2 if p >= 4 => (facts.game_in(Strain::NoTrump)?, Range::at_least(4)),
            _ => return None,
        };
        Some(
            Candidate::new(
                call,
                priority::NATURAL,
                format!("{call}: {p} points opposite {level}NT"),
            )
            .showing_points(range),
        )
    }

    /// Raising a preempt to game.
    fn over_preempt(&self, features: &Features, opened: Suit, level: u8) -> Option<Candidate> {
        let facts = &features.auction;
        let h = &features.hand;
        let p = h.points;
        let (need, min) = if level == 2 { (3, 14) } else { (2, 15) };
        if opened.is_major() && h.length(opened) >= need && p >= min {
            let call = facts.game_in(opened.into())?;
            return Some(
                Candidate::new(
                    call,
                    priority::NATURAL,
                    format!("{call}: {p} points, {} {}", h.length(opened), suit_name(opened)),
                )
                .showing_length(need)
                .showing_points(Range::at_least(min)),
            );
        }
        let stopped = Suit::ALL
            .into_iter()
            .filter(|s| *s != opened)
            .all(|s| h.stopper(s).is_stopped());
        if !opened.is_major() && h.balanced && stopped && p >= min + 1 {
            let call = facts.game_in(Strain::NoTrump)?;
            return Some(
                Candidate::new(call, priority::NATURAL, format!("{call}: {p} points, stoppers"))
                    .showing_points(Range::at_least(min + 1)),
            );
        }
        None
    }
}

impl RuleModule for NaturalResponse {
    fn id(&self) -> SourceId {
        "natural.response"
    }

    fn evaluate(&self, hand: &Hand, features: &Features) -> Result<Option<Candidate>, RuleFault> {
        let facts = &features.auction;
        if features.role() != Role::Responder || facts.has_acted() {
            return Ok(None);
        }
        let Some(opening) = facts.opening else {
            return Err(RuleFault::UnexpectedAuction(
                "responder without an opening".into(),
            ));
        };
        let candidate = match (opening.level(), opening.strain()) {
            (Some(level), Some(Strain::NoTrump)) => self.over_notrump(features, level),
            (Some(1), Some(strain)) => strain
                .to_suit()
                .and_then(|s| self.over_one_suit(hand, features, s)),
            // Strong 2C has its own module.
            (Some(2), Some(Strain::Clubs)) => None,
            (Some(level @ (2 | 3)), Some(strain)) => strain
                .to_suit()
                .and_then(|s| self.over_preempt(features, s, level)),
            _ => None,
        };
        Ok(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testing::{config, proposal};
    use types::Call;

    fn respond(hand: &str, calls: &str) -> Option<Call> {
        proposal(&NaturalResponse::new(&config()), hand, calls)
    }

    fn call(s: &str) -> Option<Call> {
        Some(s.parse().unwrap())
    }

    #[test]
    fn test_single_raise() {
        assert_eq!(respond("Q32.K432.K32.432", "1H P"), call("2H"));
    }

    #[test]
    fn test_limit_raise() {
        assert_eq!(respond("A32.K432.K32.J32", "1H P"), call("3H"));
    }

    #[test]
    fn test_new_suit_at_one_level() {
        assert_eq!(respond("432.K32.Q32.KJ32", "1C P"), call("1S"));
    }

    #[test]
    fn test_four_card_suits_up_the_line() {
        assert_eq!(respond("32.432.KJ32.Q432", "1C P"), call("1H"));
    }

    #[test]
    fn test_two_over_one() {
        assert_eq!(respond("AQ432.K32.K32.32", "1S P"), call("2C"));
    }

    #[test]
    fn test_one_notrump_response() {
        assert_eq!(respond("Q32.K432.J432.32", "1S P"), call("1N"));
    }

    #[test]
    fn test_notrump_opening() {
        assert_eq!(respond("K32.Q432.K32.432", "1N P"), call("2N"));
    }

    #[test]
    fn test_jump_shift() {
        assert_eq!(respond("A2.K2.AKQ32.KQ32", "1D P"), call("2H"));
    }

    #[test]
    fn test_raise_weak_two_to_game() {
        assert_eq!(respond("A32.A32.K32.KQ32", "2H P"), call("4H"));
    }

    #[test]
    fn test_weak_hand_has_nothing() {
        assert_eq!(respond("5432.5432.432.32", "1H P"), None);
    }

    #[test]
    fn test_only_first_response() {
        assert_eq!(respond("Q32.K432.K32.432", "1H P 2H P 3H P"), None);
    }
}
