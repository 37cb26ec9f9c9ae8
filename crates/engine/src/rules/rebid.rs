//! Opener's second call after a natural response.

use super::{bid, jump, suit_name, RuleModule, SourceId, NOTRUMP_1, NOTRUMP_2};
use crate::candidate::{priority, Candidate};
use crate::config::{Range, SystemConfig, Thresholds};
use crate::error::RuleFault;
use crate::features::{Features, Role};
use types::{Call, Hand, Strain, Suit};

pub struct NaturalRebid {
    t: Thresholds,
}

fn natural(call: Call, rationale: String) -> Candidate {
    Candidate::new(call, priority::NATURAL, rationale)
}

impl NaturalRebid {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            t: config.thresholds.clone(),
        }
    }

    /// Strong balanced hands that jump in notrump after a new suit.
    fn jump_notrump(&self) -> Range {
        Range::new(self.t.one_notrump.max + 1, self.t.two_notrump.min - 1)
    }

    /// Partner raised our suit.
    fn after_raise(&self, features: &Features, opened: Suit, level: u8) -> Option<Candidate> {
        let facts = &features.auction;
        let p = features.points();
        let game = facts.game_in(opened.into())?;
        let name = suit_name(opened);
        match level {
            2 if p >= self.t.one_notrump.max + 2 => {
                Some(natural(game, format!("{game}: {p} points opposite a raise of {name}")))
            }
            2 if p > self.t.one_notrump.min => {
                let call = bid(3, opened);
                Some(
                    natural(call, format!("{call}: game try, {p} points"))
                        .showing_points(Range::new(self.t.one_notrump.min + 1, self.t.one_notrump.max + 1)),
                )
            }
            3 if p >= self.t.opening_min + 2 => {
                Some(natural(game, format!("{game}: {p} points accepting the invitation")))
            }
            _ => None,
        }
    }

    /// Partner responded in notrump.
    fn after_notrump(&self, features: &Features, opened: Suit, level: u8) -> Option<Candidate> {
        let facts = &features.auction;
        let h = &features.hand;
        let p = h.points;
        match level {
            1 => {
                if h.balanced && self.jump_notrump().contains(p) {
                    let call = facts.cheapest_up_to(Strain::NoTrump, 2)?;
                    return Some(
                        natural(call, format!("{call}: {p} points, balanced"))
                            .showing_points(self.jump_notrump()),
                    );
                }
                if h.length(opened) >= 6 {
                    let call = facts.cheapest_up_to(opened.into(), 2)?;
                    return Some(
                        natural(call, format!("{call}: {} {}", h.length(opened), suit_name(opened)))
                            .showing_length(6),
                    );
                }
                let lower: Vec<Suit> = Suit::ALL
                    .into_iter()
                    .filter(|s| *s < opened && h.length(*s) >= 4)
                    .collect();
                let suit = h.longest_of(&lower)?;
                let call = facts.cheapest_up_to(suit.into(), 2)?;
                Some(
                    natural(call, format!("{call}: {} {}", h.length(suit), suit_name(suit)))
                        .showing_length(4),
                )
            }
            2 => {
                let call = facts.game_in(Strain::NoTrump)?;
                Some(natural(call, format!("{call}: {p} points opposite 2NT")))
            }
            _ => None,
        }
    }

    /// Partner bid a new suit.
    fn after_new_suit(
        &self,
        features: &Features,
        opened: Suit,
        response: Suit,
    ) -> Option<Candidate> {
        let facts = &features.auction;
        let h = &features.hand;
        let p = h.points;
        let t = &self.t;
        let theirs = facts.their_suits();
        let medium = Range::new(t.one_notrump.min + 1, t.one_notrump.max + 1);

        let support = h.length(response);
        if support >= 4 {
            let cheapest = facts.cheapest(response.into())?;
            let call = if p > medium.max {
                if response.is_major() {
                    facts.game_in(response.into())?
                } else {
                    jump(facts, response.into())?
                }
            } else if medium.contains(p) {
                jump(facts, response.into())?
            } else {
                cheapest
            };
            return Some(
                natural(
                    call,
                    format!("{call}: {p} points, {support} {}", suit_name(response)),
                )
                .showing_length(4),
            );
        }

        let unbid: Vec<Suit> = Suit::ALL
            .into_iter()
            .filter(|s| *s != opened && *s != response && !theirs.contains(s))
            .collect();
        if let Some(suit) = unbid
            .iter()
            .copied()
            .find(|s| h.length(*s) >= 4 && facts.cheapest_up_to((*s).into(), 1).is_some())
        {
            let call = bid(1, suit);
            return Some(
                natural(call, format!("{call}: {} {}", h.length(suit), suit_name(suit)))
                    .showing_length(4),
            );
        }

        let minimum = Range::new(t.opening_min, t.one_notrump.min - 1);
        if h.balanced && minimum.contains(p) {
            if let Some(call) = facts.cheapest_up_to(Strain::NoTrump, 2) {
                return Some(
                    natural(call, format!("{call}: {p} points, balanced")).showing_points(minimum),
                );
            }
        }
        if h.balanced && self.jump_notrump().contains(p) {
            if let Some(call) = jump(facts, Strain::NoTrump).filter(|c| c.level() <= Some(3)) {
                return Some(
                    natural(call, format!("{call}: {p} points, balanced"))
                        .showing_points(self.jump_notrump()),
                );
            }
        }

        let own = h.length(opened);
        if own >= 6 {
            let call = if medium.contains(p) {
                jump(facts, opened.into()).filter(|c| c.level() <= Some(3))
            } else {
                None
            };
            let call = call.or_else(|| facts.cheapest(opened.into()))?;
            return Some(
                natural(call, format!("{call}: {own} {}", suit_name(opened))).showing_length(6),
            );
        }

        let second: Vec<Suit> = unbid
            .into_iter()
            .filter(|s| h.length(*s) >= 4)
            .filter(|s| facts.cheapest_up_to((*s).into(), 2).is_some())
            // A reverse needs extra values.
            .filter(|s| *s < opened || p > t.one_notrump.min + 1)
            .collect();
        if let Some(suit) = h.longest_of(&second) {
            let call = facts.cheapest(suit.into())?;
            return Some(
                natural(call, format!("{call}: {} {}", h.length(suit), suit_name(suit)))
                    .showing_length(4),
            );
        }

        if own >= 5 {
            let call = facts.cheapest(opened.into())?;
            return Some(
                natural(call, format!("{call}: {own} {}", suit_name(opened))).showing_length(5),
            );
        }
        let call = facts.cheapest_up_to(Strain::NoTrump, 2)?;
        Some(natural(call, format!("{call}: {p} points, nothing else to show")))
    }

    /// Opener of 1NT after a natural invitation.
    fn after_one_notrump(&self, features: &Features, response: Call) -> Option<Candidate> {
        let facts = &features.auction;
        let h = &features.hand;
        let p = h.points;
        let maximum = p > self.t.one_notrump.min;
        if response == NOTRUMP_2 {
            return maximum.then(|| {
                let call = Call::bid(3, Strain::NoTrump);
                natural(call, format!("{call}: maximum, {p} points"))
            });
        }
        let major = response
            .suit()
            .filter(|s| s.is_major() && response.level() == Some(3))?;
        let call = if h.length(major) >= 3 {
            facts.game_in(major.into())?
        } else {
            facts.game_in(Strain::NoTrump)?
        };
        Some(natural(call, format!("{call}: {} {}", h.length(major), suit_name(major))))
    }
}

impl RuleModule for NaturalRebid {
    fn id(&self) -> SourceId {
        "natural.rebid"
    }

    fn evaluate(&self, _hand: &Hand, features: &Features) -> Result<Option<Candidate>, RuleFault> {
        let facts = &features.auction;
        if features.role() != Role::OpenerRebid || facts.my_bids().len() != 1 {
            return Ok(None);
        }
        let (Some(opening), Some(response)) = (facts.opening, facts.last_calls.partner) else {
            return Ok(None);
        };
        if !response.is_bid() || facts.partner_bids().len() != 1 {
            return Ok(None);
        }
        if opening == NOTRUMP_1 {
            return Ok(self.after_one_notrump(features, response));
        }
        let Some(opened) = opening.suit().filter(|_| opening.level() == Some(1)) else {
            return Ok(None);
        };
        // 2NT over a major is Jacoby when the opponents are silent.
        if response == NOTRUMP_2 && opened.is_major() && facts.opponents_silent() {
            return Ok(None);
        }
        let Some(level) = response.level() else {
            return Ok(None);
        };
        let candidate = match response.suit() {
            Some(s) if s == opened => self.after_raise(features, opened, level),
            Some(s) if facts.their_suits().contains(&s) => None,
            Some(s) => self.after_new_suit(features, opened, s),
            None => self.after_notrump(features, opened, level),
        };
        Ok(candidate)
    }
}
