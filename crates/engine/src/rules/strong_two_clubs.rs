//! Strong artificial 2C and the auctions that follow it.

use super::{bid, suit_name, RuleModule, SourceId};
use crate::candidate::{priority, Bypass, Candidate};
use crate::config::{Range, SystemConfig, Thresholds};
use crate::error::RuleFault;
use crate::features::{AuctionFacts, Features, Role};
use crate::forcing::ForcingLevel;
use types::{Call, Hand, Strain, Suit};

const TWO_CLUBS: Call = Call::bid(2, Strain::Clubs);
const TWO_DIAMONDS: Call = Call::bid(2, Strain::Diamonds);

/// Points needed for a positive response instead of 2D.
const POSITIVE_MIN: u8 = 8;

pub struct StrongTwoClubs {
    t: Thresholds,
}

impl StrongTwoClubs {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            t: config.thresholds.clone(),
        }
    }

    fn open(&self, features: &Features) -> Option<Candidate> {
        let p = features.points();
        (p >= self.t.strong_two_clubs).then(|| {
            Candidate::new(
                TWO_CLUBS,
                priority::CONVENTION,
                format!("2C: {p} points, strong and artificial"),
            )
            .artificial()
            .showing_points(Range::at_least(self.t.strong_two_clubs))
            .forcing(ForcingLevel::GameForcing)
        })
    }

    fn respond(&self, hand: &Hand, features: &Features) -> Option<Candidate> {
        let p = features.points();
        let good_suits: Vec<Suit> = Suit::ALL
            .into_iter()
            .filter(|s| features.length(*s) >= 5 && hand.top_honors(*s, 3) >= 2)
            .collect();
        if p >= POSITIVE_MIN {
            if let Some(suit) = features.hand.longest_of(&good_suits) {
                let call = bid(if suit.is_major() { 2 } else { 3 }, suit);
                return Some(
                    Candidate::new(
                        call,
                        priority::CONVENTION_RESPONSE,
                        format!("{call}: positive response, {p} points, good {}", suit_name(suit)),
                    )
                    .showing_length(5)
                    .showing_points(Range::at_least(POSITIVE_MIN)),
                );
            }
        }
        Some(
            Candidate::new(
                TWO_DIAMONDS,
                priority::CONVENTION_RESPONSE,
                format!("2D: waiting, {p} points"),
            )
            .artificial()
            .bypassing(Bypass::PointRange),
        )
    }

    fn opener_rebid(&self, features: &Features, response: Call) -> Option<Candidate> {
        let facts = &features.auction;
        let h = &features.hand;
        let p = h.points;
        if h.balanced {
            let call = if response == TWO_DIAMONDS && p <= self.t.strong_two_clubs + 2 {
                facts.cheapest(Strain::NoTrump)?
            } else {
                facts.cheapest_up_to(Strain::NoTrump, 3)?
            };
            return Some(
                Candidate::new(
                    call,
                    priority::CONVENTION_RESPONSE,
                    format!("{call}: {p} points, balanced"),
                )
                .bypassing(Bypass::PointRange),
            );
        }
        if let Some(suit) = response.suit().filter(|_| response != TWO_DIAMONDS) {
            if features.length(suit) >= 3 {
                let call = facts.cheapest(suit.into())?;
                return Some(
                    Candidate::new(
                        call,
                        priority::CONVENTION_RESPONSE,
                        format!("{call}: support for partner's {}", suit_name(suit)),
                    )
                    .showing_length(3)
                    .bypassing(Bypass::PointRange),
                );
            }
        }
        let suit = h.longest_suit();
        let len = features.length(suit);
        let call = facts.cheapest(suit.into())?;
        Some(
            Candidate::new(
                call,
                priority::CONVENTION_RESPONSE,
                format!("{call}: {p} points, {len} {}", suit_name(suit)),
            )
            .showing_length(len.min(5))
            .bypassing(Bypass::PointRange),
        )
    }

    fn responder_rebid(&self, features: &Features, rebid: Call) -> Option<Candidate> {
        let facts = &features.auction;
        let call = match rebid.suit() {
            None => facts.cheapest_up_to(Strain::NoTrump, 3)?,
            Some(suit) => {
                let support = if suit.is_major() { 3 } else { 4 };
                if features.length(suit) >= support {
                    if suit.is_minor() {
                        facts
                            .cheapest_up_to(Strain::NoTrump, 3)
                            .or_else(|| facts.game_in(suit.into()))?
                    } else {
                        facts.game_in(suit.into())?
                    }
                } else {
                    let own = features.hand.longest_suit();
                    match facts.cheapest_up_to(own.into(), 3) {
                        Some(call) if own != suit && features.length(own) >= 5 => call,
                        _ => facts.cheapest_up_to(Strain::NoTrump, 3)?,
                    }
                }
            }
        };
        Some(
            Candidate::new(
                call,
                priority::CONVENTION_RESPONSE,
                format!("{call}: game forcing after 2C, {} points", features.points()),
            )
            .artificial()
            .bypassing(Bypass::PointRange),
        )
    }
}

fn partner_opened_strong(facts: &AuctionFacts) -> bool {
    facts.partner_opened() && facts.opening == Some(TWO_CLUBS)
}

impl RuleModule for StrongTwoClubs {
    fn id(&self) -> SourceId {
        "convention.strong_two_clubs"
    }

    fn evaluate(&self, hand: &Hand, features: &Features) -> Result<Option<Candidate>, RuleFault> {
        let facts = &features.auction;
        let candidate = match features.role() {
            Role::Opener => self.open(features),
            _ if !facts.rho_passed() => None,
            Role::Responder if partner_opened_strong(facts) => {
                match (facts.my_bids().len(), facts.partner_bids().as_slice()) {
                    (0, _) if !facts.has_acted() => self.respond(hand, features),
                    (1, [_, rebid]) => self.responder_rebid(features, *rebid),
                    _ => None,
                }
            }
            Role::OpenerRebid if facts.opening == Some(TWO_CLUBS) => {
                match (facts.my_bids().len(), facts.partner_bids().as_slice()) {
                    (1, [response]) => self.opener_rebid(features, *response),
                    _ => None,
                }
            }
            _ => None,
        };
        Ok(candidate)
    }

    fn announces(&self, facts: &AuctionFacts, call: &Call) -> Option<ForcingLevel> {
        (facts.opener.is_none() && *call == TWO_CLUBS).then_some(ForcingLevel::GameForcing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testing::{announced, config, proposal};

    fn module() -> StrongTwoClubs {
        StrongTwoClubs::new(&config())
    }

    fn call(s: &str) -> Option<Call> {
        Some(s.parse().unwrap())
    }

    #[test]
    fn test_opens_strong_hands() {
        assert_eq!(proposal(&module(), "A2.AK2.AKQ2.AK32", ""), call("2C"));
        assert_eq!(proposal(&module(), "J32.Q32.KQ2.AK32", ""), None);
    }

    #[test]
    fn test_responses() {
        assert_eq!(proposal(&module(), "5432.432.432.432", "2C P"), call("2D"));
        assert_eq!(proposal(&module(), "432.432.AKJ54.32", "2C P"), call("2H"));
        // Good diamonds are shown at the three level.
        assert_eq!(proposal(&module(), "432.AKJ54.432.32", "2C P"), call("3D"));
    }

    #[test]
    fn test_opener_rebids() {
        assert_eq!(proposal(&module(), "2.AK2.AKQ2.AKQ32", "2C P 2D P"), call("2S"));
        assert_eq!(proposal(&module(), "Q2.AK2.AQ32.AKQ2", "2C P 2D P"), call("2N"));
    }

    #[test]
    fn test_responder_reaches_game() {
        assert_eq!(
            proposal(&module(), "5432.432.Q32.J32", "2C P 2D P 2S P"),
            call("4S")
        );
        assert_eq!(
            proposal(&module(), "5432.432.Q32.J32", "2C P 2D P 2N P"),
            call("3N")
        );
    }

    #[test]
    fn test_announces_game_force() {
        assert_eq!(
            announced(&module(), "", "2C"),
            Some(ForcingLevel::GameForcing)
        );
        assert_eq!(announced(&module(), "1H P", "2C"), None);
    }
}
