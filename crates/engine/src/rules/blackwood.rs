//! Blackwood: 4NT asks for aces once a trump suit is agreed, 5NT for kings.

use super::{RuleModule, SourceId, NOTRUMP_4, NOTRUMP_5};
use crate::candidate::{priority, Bypass, Candidate};
use crate::config::{SystemConfig, Thresholds};
use crate::error::RuleFault;
use crate::features::{AuctionFacts, Features, Role};
use crate::forcing::ForcingLevel;
use types::{Call, Hand, Position, Rank, Strain};

pub struct Blackwood {
    t: Thresholds,
}

/// 4NT as an ace ask: a suit is agreed, the opponents are silent and our
/// side has not asked before.
fn is_ace_ask(facts: &AuctionFacts, call: &Call) -> bool {
    *call == NOTRUMP_4
        && facts.agreed_suit().is_some()
        && facts.opponents_silent()
        && !facts
            .auction
            .iter()
            .any(|(pos, c)| !pos.is_opponent_of(facts.position) && c == NOTRUMP_4)
}

/// 5NT by someone whose previous call was an ace ask.
fn is_king_ask(facts: &AuctionFacts, call: &Call) -> bool {
    *call == NOTRUMP_5
        && facts.last_calls.me == Some(NOTRUMP_4)
        && facts
            .before_last_call_of(facts.position)
            .is_some_and(|(before, ask)| is_ace_ask(&before, &ask))
}

/// Step response: 0 or 4, 1, 2, 3 as clubs, diamonds, hearts, spades.
fn step(count: u8, level: u8) -> Call {
    let strain = match count % 4 {
        0 => Strain::Clubs,
        1 => Strain::Diamonds,
        2 => Strain::Hearts,
        _ => Strain::Spades,
    };
    Call::bid(level, strain)
}

/// Partner's count from a step response, resolving 0-or-4 against our own.
fn decode(response: Call, mine: u8) -> Option<u8> {
    Some(match response.strain()? {
        Strain::Clubs if mine == 0 => 4,
        Strain::Clubs => 0,
        Strain::Diamonds => 1,
        Strain::Hearts => 2,
        Strain::Spades => 3,
        Strain::NoTrump => return None,
    })
}

/// First bid `by` made, with the auction as they saw it.
fn first_bid_of(facts: &AuctionFacts, by: Position) -> Option<(AuctionFacts, Call)> {
    let idx = facts
        .auction
        .iter()
        .position(|(pos, call)| pos == by && call.is_bid())?;
    let call = *facts.auction.calls().get(idx)?;
    Some((AuctionFacts::new(&facts.auction.prefix(idx), by), call))
}

impl Blackwood {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            t: config.thresholds.clone(),
        }
    }

    /// Least strength partner's first bid promised.
    fn partner_minimum(&self, facts: &AuctionFacts) -> u8 {
        let t = &self.t;
        let Some((before, call)) = first_bid_of(facts, facts.partner()) else {
            return 0;
        };
        match before.role {
            Role::Opener => match (call.level(), call.strain()) {
                (Some(1), Some(Strain::NoTrump)) => t.one_notrump.min,
                (Some(2), Some(Strain::NoTrump)) => t.two_notrump.min,
                (Some(2), Some(Strain::Clubs)) => t.strong_two_clubs,
                (Some(1), _) => t.opening_min,
                _ => t.weak_two.min,
            },
            Role::Responder => {
                let opened = before.opening.and_then(|c| c.suit());
                if call == Call::bid(2, Strain::NoTrump) && opened.is_some_and(|s| s.is_major()) {
                    t.jacoby_2nt_min
                } else if call.suit().is_some() && call.suit() == opened {
                    if call.level() == Some(2) {
                        t.single_raise.min
                    } else {
                        t.limit_raise.min
                    }
                } else if before.is_jump(&call) && call.suit().is_some() {
                    t.jump_shift_min
                } else if call.level() == Some(2) && call.suit().is_some() {
                    t.two_level_response_min
                } else {
                    t.response_min
                }
            }
            Role::Overcaller => t.overcall_one_level.min,
            Role::Advancer | Role::OpenerRebid => t.response_min,
        }
    }

    fn ask(&self, features: &Features) -> Option<Candidate> {
        let facts = &features.auction;
        let trump = facts.agreed_suit()?;
        if !is_ace_ask(facts, &NOTRUMP_4) || !facts.auction.is_legal(&NOTRUMP_4) {
            return None;
        }
        let p = features.points();
        let theirs = self.partner_minimum(facts);
        (p.saturating_add(theirs) >= self.t.slam).then(|| {
            Candidate::new(
                NOTRUMP_4,
                priority::CONVENTION + 50,
                format!(
                    "4NT: Blackwood, {p} points opposite {theirs}+, {} agreed",
                    Strain::from(trump)
                ),
            )
            .bypassing(Bypass::PointRange)
            .forcing(ForcingLevel::OneRoundForcing)
        })
    }

    fn answer(hand: &Hand, rank: Rank, level: u8) -> Candidate {
        let count = hand.count_rank(rank);
        let call = step(count, level);
        let what = if rank == Rank::Ace { "aces" } else { "kings" };
        Candidate::new(
            call,
            priority::CONVENTION_RESPONSE,
            format!("{call}: {count} {what}"),
        )
        .artificial()
        .bypassing(Bypass::PointRange)
    }

    /// The asker places the contract after the ace response.
    fn after_aces(&self, hand: &Hand, features: &Features, response: Call) -> Option<Candidate> {
        let facts = &features.auction;
        let trump = Strain::from(facts.agreed_suit()?);
        let mine = hand.count_rank(Rank::Ace);
        let total = mine + decode(response, mine)?;
        let combined = features
            .points()
            .saturating_add(self.partner_minimum(facts));
        let (call, forcing) = match total {
            4 if combined >= self.t.grand_slam => (NOTRUMP_5, Some(ForcingLevel::OneRoundForcing)),
            3 | 4 => (Call::bid(6, trump), None),
            _ => {
                let signoff = facts.cheapest(trump)?;
                if signoff.level() != Some(5) && response.strain() == Some(trump) {
                    return Some(Candidate::pass(
                        priority::CONVENTION_RESPONSE,
                        format!("Pass: {total} aces between us, stop in five"),
                    ));
                }
                (signoff, None)
            }
        };
        let mut candidate = Candidate::new(
            call,
            priority::CONVENTION_RESPONSE,
            format!("{call}: {total} aces between us"),
        )
        .artificial()
        .bypassing(Bypass::PointRange);
        if let Some(level) = forcing {
            candidate = candidate.forcing(level);
        }
        Some(candidate)
    }

    fn after_kings(&self, hand: &Hand, features: &Features, response: Call) -> Option<Candidate> {
        let facts = &features.auction;
        let trump = Strain::from(facts.agreed_suit()?);
        let mine = hand.count_rank(Rank::King);
        let total = mine + decode(response, mine)?;
        let grand = Call::bid(7, trump);
        let small = Call::bid(6, trump);
        let call = if total == 4 && facts.auction.is_legal(&grand) {
            grand
        } else if facts.auction.is_legal(&small) {
            small
        } else {
            return None;
        };
        Some(
            Candidate::new(
                call,
                priority::CONVENTION_RESPONSE,
                format!("{call}: {total} kings between us"),
            )
            .artificial()
            .bypassing(Bypass::PointRange),
        )
    }
}

impl RuleModule for Blackwood {
    fn id(&self) -> SourceId {
        "convention.blackwood"
    }

    fn evaluate(&self, hand: &Hand, features: &Features) -> Result<Option<Candidate>, RuleFault> {
        let facts = &features.auction;
        if !facts.opponents_silent() {
            return Ok(None);
        }
        if let Some((before, ask)) = facts.before_last_call_of(facts.partner()) {
            if is_ace_ask(&before, &ask) {
                return Ok(Some(Self::answer(hand, Rank::Ace, 5)));
            }
            if is_king_ask(&before, &ask) {
                return Ok(Some(Self::answer(hand, Rank::King, 6)));
            }
        }
        if let (Some((before, mine)), Some(response)) = (
            facts.before_last_call_of(facts.position),
            facts.last_calls.partner,
        ) {
            if is_ace_ask(&before, &mine) {
                return Ok(self.after_aces(hand, features, response));
            }
            if is_king_ask(&before, &mine) {
                return Ok(self.after_kings(hand, features, response));
            }
        }
        Ok(self.ask(features))
    }

    fn announces(&self, facts: &AuctionFacts, call: &Call) -> Option<ForcingLevel> {
        (is_ace_ask(facts, call) || is_king_ask(facts, call))
            .then_some(ForcingLevel::OneRoundForcing)
    }
}
