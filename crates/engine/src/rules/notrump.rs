//! Stayman and Jacoby transfers over partner's 1NT opening.

use super::{bid, suit_name, RuleModule, SourceId, NOTRUMP_1, NOTRUMP_2, NOTRUMP_3};
use crate::candidate::{priority, Bypass, Candidate};
use crate::config::{Range, SystemConfig, Thresholds};
use crate::error::RuleFault;
use crate::features::{AuctionFacts, Features, Role};
use crate::forcing::ForcingLevel;
use types::{Call, Hand, Strain, Suit};

const TWO_CLUBS: Call = Call::bid(2, Strain::Clubs);
const TWO_DIAMONDS: Call = Call::bid(2, Strain::Diamonds);
const TWO_HEARTS: Call = Call::bid(2, Strain::Hearts);

/// Minimum strength to bid Stayman.
const STAYMAN_MIN: u8 = 8;

/// Responder's first call over an uncontested 1NT opening.
fn over_notrump(facts: &AuctionFacts) -> bool {
    facts.partner_opened()
        && facts.opening == Some(NOTRUMP_1)
        && !facts.has_acted()
        && facts.opponents_silent()
}

/// The 1NT opener, after partner's single uncontested response.
fn opener_facing(facts: &AuctionFacts) -> Option<Call> {
    if facts.opener != Some(facts.position)
        || facts.opening != Some(NOTRUMP_1)
        || !facts.opponents_silent()
    {
        return None;
    }
    match facts.partner_bids().as_slice() {
        [response] => Some(*response),
        _ => None,
    }
}

/// Major shown by a transfer bid.
fn transfer_target(call: Call) -> Option<Suit> {
    match call {
        TWO_DIAMONDS => Some(Suit::Hearts),
        TWO_HEARTS => Some(Suit::Spades),
        _ => None,
    }
}

/// `facts.position` made `call` as a transfer, looking back from a later turn.
fn transferred(facts: &AuctionFacts, by: types::Position) -> Option<Suit> {
    let idx = facts.auction.iter().position(|(pos, call)| pos == by && call.is_bid())?;
    let call = *facts.auction.calls().get(idx)?;
    let before = AuctionFacts::new(&facts.auction.prefix(idx), by);
    over_notrump(&before).then(|| transfer_target(call)).flatten()
}

/// `by` bid Stayman as their first bid.
fn used_stayman(facts: &AuctionFacts, by: types::Position) -> bool {
    let Some(idx) = facts.auction.iter().position(|(pos, call)| pos == by && call.is_bid()) else {
        return false;
    };
    let before = AuctionFacts::new(&facts.auction.prefix(idx), by);
    facts.auction.calls().get(idx) == Some(&TWO_CLUBS) && over_notrump(&before)
}

pub struct Stayman {
    t: Thresholds,
}

impl Stayman {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            t: config.thresholds.clone(),
        }
    }

    fn ask(&self, features: &Features) -> Option<Candidate> {
        let p = features.points();
        let hearts = features.length(Suit::Hearts);
        let spades = features.length(Suit::Spades);
        let four_card_major = hearts == 4 || spades == 4;
        (p >= STAYMAN_MIN && four_card_major && hearts < 5 && spades < 5).then(|| {
            Candidate::new(
                TWO_CLUBS,
                priority::CONVENTION,
                format!("2C: Stayman, {p} points, four-card major"),
            )
            .artificial()
            .showing_points(Range::at_least(STAYMAN_MIN))
            .forcing(ForcingLevel::OneRoundForcing)
        })
    }

    fn answer(&self, features: &Features) -> Candidate {
        let (call, rationale) = if features.length(Suit::Hearts) >= 4 {
            (TWO_HEARTS, "2H: four hearts".to_string())
        } else if features.length(Suit::Spades) >= 4 {
            (bid(2, Suit::Spades), "2S: four spades, not four hearts".to_string())
        } else {
            (TWO_DIAMONDS, "2D: no four-card major".to_string())
        };
        let candidate = Candidate::new(call, priority::CONVENTION_RESPONSE, rationale)
            .bypassing(Bypass::PointRange);
        if call == TWO_DIAMONDS {
            candidate.artificial()
        } else {
            candidate.showing_length(4)
        }
    }

    /// Responder places the contract after opener's answer.
    fn place(&self, features: &Features, answer: Call) -> Option<Candidate> {
        let facts = &features.auction;
        let p = features.points();
        let invite = p < self.t.two_level_response_min;
        let fit = answer
            .suit()
            .filter(|s| s.is_major() && features.length(*s) >= 4);
        let call = match fit {
            Some(major) if invite => Call::bid(3, major.into()),
            Some(major) => facts.game_in(major.into())?,
            None if invite => facts.cheapest_up_to(Strain::NoTrump, 2)?,
            None => facts.cheapest_up_to(Strain::NoTrump, 3)?,
        };
        let rationale = match fit {
            Some(major) => format!("{call}: {p} points, four {}", suit_name(major)),
            None => format!("{call}: {p} points, no major fit"),
        };
        Some(
            Candidate::new(call, priority::CONVENTION_RESPONSE, rationale)
                .showing_length(4)
                .bypassing(Bypass::PointRange),
        )
    }

    /// Opener answers responder's invitation or choice of game.
    fn accept(&self, features: &Features, last: Call) -> Option<Candidate> {
        let facts = &features.auction;
        let p = features.points();
        let maximum = p > self.t.one_notrump.min;
        let spades = features.length(Suit::Spades) >= 4;
        // Responder promised a four-card major; after 2H it must be spades.
        let hearts_shown = facts.my_bids().get(1) == Some(&TWO_HEARTS);
        let call = match (last, last.suit()) {
            (NOTRUMP_2, _) if hearts_shown && spades => {
                if maximum {
                    bid(4, Suit::Spades)
                } else {
                    bid(3, Suit::Spades)
                }
            }
            (NOTRUMP_2, _) if maximum => NOTRUMP_3,
            (NOTRUMP_3, _) if hearts_shown && spades => bid(4, Suit::Spades),
            (_, Some(major)) if last.level() == Some(3) && maximum => {
                facts.game_in(major.into())?
            }
            _ => return None,
        };
        Some(
            Candidate::new(
                call,
                priority::CONVENTION_RESPONSE,
                format!("{call}: {p} points after Stayman"),
            )
            .bypassing(Bypass::StrainLength)
            .bypassing(Bypass::PointRange),
        )
    }
}

impl RuleModule for Stayman {
    fn id(&self) -> SourceId {
        "convention.stayman"
    }

    fn evaluate(&self, _hand: &Hand, features: &Features) -> Result<Option<Candidate>, RuleFault> {
        let facts = &features.auction;
        if !facts.opponents_silent() {
            return Ok(None);
        }
        let candidate = match features.role() {
            Role::Responder if over_notrump(facts) => self.ask(features),
            Role::Responder if used_stayman(facts, facts.position) => {
                match (facts.my_bids().len(), facts.partner_bids().as_slice()) {
                    (1, [_, answer]) => self.place(features, *answer),
                    _ => None,
                }
            }
            Role::OpenerRebid => match opener_facing(facts) {
                Some(TWO_CLUBS) if facts.my_bids().len() == 1 => Some(self.answer(features)),
                _ if used_stayman(facts, facts.partner()) && facts.my_bids().len() == 2 => {
                    facts.partner_last_bid().and_then(|last| self.accept(features, last))
                }
                _ => None,
            },
            _ => None,
        };
        Ok(candidate)
    }

    fn announces(&self, facts: &AuctionFacts, call: &Call) -> Option<ForcingLevel> {
        (*call == TWO_CLUBS && over_notrump(facts)).then_some(ForcingLevel::OneRoundForcing)
    }
}

pub struct JacobyTransfer {
    t: Thresholds,
}

impl JacobyTransfer {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            t: config.thresholds.clone(),
        }
    }

    fn transfer(&self, features: &Features) -> Option<Candidate> {
        let major = features.hand.longest_of(&[Suit::Hearts, Suit::Spades])?;
        let len = features.length(major);
        if len < 5 {
            return None;
        }
        let call = if major == Suit::Hearts {
            TWO_DIAMONDS
        } else {
            TWO_HEARTS
        };
        Some(
            Candidate::new(
                call,
                priority::CONVENTION + 10,
                format!("{call}: transfer, {len} {}", suit_name(major)),
            )
            .artificial()
            .bypassing(Bypass::PointRange)
            .forcing(ForcingLevel::OneRoundForcing),
        )
    }

    fn complete(&self, features: &Features, major: Suit) -> Option<Candidate> {
        let facts = &features.auction;
        let p = features.points();
        let super_accept = features.length(major) >= 4 && p >= self.t.one_notrump.max;
        let call = if super_accept {
            Call::bid(3, major.into())
        } else {
            facts.cheapest(major.into())?
        };
        let rationale = if super_accept {
            format!("{call}: super-accept, {p} points, four {}", suit_name(major))
        } else {
            format!("{call}: completes the transfer")
        };
        Some(
            Candidate::new(call, priority::CONVENTION_RESPONSE, rationale)
                .artificial()
                .bypassing(Bypass::PointRange),
        )
    }

    /// Responder describes after the transfer is completed.
    fn continue_after(&self, features: &Features, major: Suit, completion: Call) -> Option<Candidate> {
        let facts = &features.auction;
        let p = features.points();
        let len = features.length(major);
        let call = if completion.level() == Some(3) {
            if p < self.t.response_min {
                return None;
            }
            facts.game_in(major.into())?
        } else if p < STAYMAN_MIN {
            return Some(Candidate::pass(
                priority::CONVENTION_RESPONSE,
                format!("Pass: {p} points, play the transfer"),
            ));
        } else if p < self.t.two_level_response_min {
            if len >= 6 {
                Call::bid(3, major.into())
            } else {
                NOTRUMP_2
            }
        } else if len >= 6 {
            facts.game_in(major.into())?
        } else {
            NOTRUMP_3
        };
        Some(
            Candidate::new(
                call,
                priority::CONVENTION_RESPONSE,
                format!("{call}: {p} points, {len} {}", suit_name(major)),
            )
            .showing_length(5)
            .bypassing(Bypass::PointRange),
        )
    }

    /// Opener chooses between notrump and the major.
    fn choose(&self, features: &Features, major: Suit, last: Call) -> Option<Candidate> {
        let facts = &features.auction;
        let p = features.points();
        let fit = features.length(major) >= 3;
        let maximum = p > self.t.one_notrump.min;
        let call = match last {
            NOTRUMP_3 if fit => facts.game_in(major.into())?,
            NOTRUMP_2 => match (fit, maximum) {
                (true, true) => facts.game_in(major.into())?,
                (true, false) => Call::bid(3, major.into()),
                (false, true) => NOTRUMP_3,
                (false, false) => return None,
            },
            _ if last.suit() == Some(major) && last.level() == Some(3) && maximum => {
                facts.game_in(major.into())?
            }
            _ => return None,
        };
        Some(
            Candidate::new(
                call,
                priority::CONVENTION_RESPONSE,
                format!("{call}: {p} points, {} {}", features.length(major), suit_name(major)),
            )
            .artificial()
            .bypassing(Bypass::PointRange),
        )
    }
}

impl RuleModule for JacobyTransfer {
    fn id(&self) -> SourceId {
        "convention.transfer"
    }

    fn evaluate(&self, _hand: &Hand, features: &Features) -> Result<Option<Candidate>, RuleFault> {
        let facts = &features.auction;
        if !facts.opponents_silent() {
            return Ok(None);
        }
        let candidate = match features.role() {
            Role::Responder if over_notrump(facts) => self.transfer(features),
            Role::Responder => match transferred(facts, facts.position) {
                Some(major) if facts.my_bids().len() == 1 => {
                    match facts.partner_bids().as_slice() {
                        [_, completion] if completion.suit() == Some(major) => {
                            self.continue_after(features, major, *completion)
                        }
                        _ => None,
                    }
                }
                _ => None,
            },
            Role::OpenerRebid => match opener_facing(facts).and_then(transfer_target) {
                Some(major) if facts.my_bids().len() == 1 => self.complete(features, major),
                _ => match transferred(facts, facts.partner()) {
                    Some(major) if facts.my_bids().len() == 2 => facts
                        .partner_last_bid()
                        .and_then(|last| self.choose(features, major, last)),
                    _ => None,
                },
            },
            _ => None,
        };
        Ok(candidate)
    }

    fn announces(&self, facts: &AuctionFacts, call: &Call) -> Option<ForcingLevel> {
        (transfer_target(*call).is_some() && over_notrump(facts))
            .then_some(ForcingLevel::OneRoundForcing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testing::{announced, config, proposal};

    fn call(s: &str) -> Option<Call> {
        Some(s.parse().unwrap())
    }

    fn stayman() -> Stayman {
        Stayman::new(&config())
    }

    fn transfer() -> JacobyTransfer {
        JacobyTransfer::new(&config())
    }

    #[test]
    fn test_stayman_ask() {
        assert_eq!(proposal(&stayman(), "K32.Q32.A432.J32", "1N P"), call("2C"));
        // No four-card major.
        assert_eq!(proposal(&stayman(), "K432.Q432.A32.J2", "1N P"), None);
        // Five hearts go through the transfer.
        assert_eq!(proposal(&stayman(), "K32.Q2.A5432.J32", "1N P"), None);
        // Not after interference.
        assert_eq!(proposal(&stayman(), "K32.Q32.A432.J32", "1N 2D"), None);
    }

    #[test]
    fn test_stayman_answers() {
        assert_eq!(proposal(&stayman(), "KQ2.A32.KJ32.Q32", "1N P 2C P"), call("2H"));
        assert_eq!(proposal(&stayman(), "KQ2.A32.Q32.KJ32", "1N P 2C P"), call("2S"));
        assert_eq!(proposal(&stayman(), "KQ32.AJ32.Q32.K2", "1N P 2C P"), call("2D"));
    }

    #[test]
    fn test_stayman_placement() {
        // Fit found, game values.
        assert_eq!(
            proposal(&stayman(), "K32.Q32.A432.KJ2", "1N P 2C P 2H P"),
            call("4H")
        );
        // No fit, invitational.
        assert_eq!(
            proposal(&stayman(), "K432.Q32.32.A432", "1N P 2C P 2H P"),
            call("2N")
        );
    }

    #[test]
    fn test_stayman_opener_accepts_spade_fit() {
        assert_eq!(
            proposal(&stayman(), "KQ2.A2.KJ32.Q432", "1N P 2C P 2H P 2N P"),
            call("3S")
        );
    }

    #[test]
    fn test_transfers() {
        assert_eq!(proposal(&transfer(), "32.432.Q5432.J32", "1N P"), call("2D"));
        assert_eq!(proposal(&transfer(), "32.432.J32.Q5432", "1N P"), call("2H"));
        assert_eq!(proposal(&transfer(), "K32.Q32.A432.J32", "1N P"), None);
    }

    #[test]
    fn test_transfer_completion() {
        assert_eq!(proposal(&transfer(), "KQ2.A32.KJ32.Q32", "1N P 2D P"), call("2H"));
        // Maximum with four trumps.
        assert_eq!(proposal(&transfer(), "KQ2.A32.KJ32.KJ2", "1N P 2D P"), call("3H"));
    }

    #[test]
    fn test_transfer_continuations() {
        // Weak: pass.
        assert_eq!(
            proposal(&transfer(), "32.432.Q5432.J32", "1N P 2D P 2H P"),
            Some(Call::Pass)
        );
        // Game values with five: choice of games.
        assert_eq!(
            proposal(&transfer(), "A2.K32.Q5432.K32", "1N P 2D P 2H P"),
            call("3N")
        );
        // Opener with three hearts picks the major.
        assert_eq!(
            proposal(&transfer(), "KQ2.A32.K32.QJ32", "1N P 2D P 2H P 3N P"),
            call("4H")
        );
    }

    #[test]
    fn test_announcements() {
        assert_eq!(
            announced(&stayman(), "1N P", "2C"),
            Some(ForcingLevel::OneRoundForcing)
        );
        assert_eq!(
            announced(&transfer(), "1N P", "2H"),
            Some(ForcingLevel::OneRoundForcing)
        );
        assert_eq!(announced(&transfer(), "1S P", "2H"), None);
    }
}
