//! Competitive conventions: takeout and negative doubles, Michaels cuebids
//! and the Unusual 2NT, with partner's replies to each.

use super::{bid, jump, one_level_suit, suit_name, RuleModule, SourceId, NOTRUMP_2};
use crate::candidate::{priority, Bypass, Candidate};
use crate::config::{Range, SystemConfig, Thresholds};
use crate::error::RuleFault;
use crate::features::{AuctionFacts, Features, Interference, Role};
use crate::forcing::ForcingLevel;
use types::{Call, Hand, Strain, Suit};

/// Our side's first action directly over the opponents' one-level suit
/// opening, nothing else bid yet.
fn over_opening(facts: &AuctionFacts) -> Option<Suit> {
    let opened = one_level_suit(facts.opening)?;
    (facts.opponents_opened()
        && !facts.has_acted()
        && !facts.partner_has_acted()
        && facts.last_bid.map(|(_, c)| c) == facts.opening)
        .then_some(opened)
}

/// Partner's last call, if it was one `recognize` accepts in the auction
/// partner saw, and RHO has passed since.
fn partner_convention<T>(
    facts: &AuctionFacts,
    recognize: impl Fn(&AuctionFacts, &Call) -> Option<T>,
) -> Option<T> {
    if facts.has_acted() || !facts.rho_passed() {
        return None;
    }
    let (before, call) = facts.before_last_call_of(facts.partner())?;
    recognize(&before, &call)
}

fn advance(call: Call, rationale: String) -> Candidate {
    Candidate::new(call, priority::CONVENTION_RESPONSE, rationale)
        .bypassing(Bypass::StrainLength)
        .bypassing(Bypass::PointRange)
}

// Takeout double

/// The opponents' bid a takeout double would be made over.
fn takeout_context(facts: &AuctionFacts) -> Option<Call> {
    let (by, last) = facts.last_bid?;
    (facts.opponents_opened()
        && !facts.has_acted()
        && !facts.partner_has_acted()
        && by.is_opponent_of(facts.position)
        && last.suit().is_some()
        && last.level().is_some_and(|l| l <= 2)
        && facts.auction.is_legal(&Call::Double))
    .then_some(last)
}

fn is_takeout_double(facts: &AuctionFacts, call: &Call) -> Option<Call> {
    (*call == Call::Double).then(|| takeout_context(facts)).flatten()
}

pub struct TakeoutDouble {
    t: Thresholds,
}

impl TakeoutDouble {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            t: config.thresholds.clone(),
        }
    }

    fn double(&self, features: &Features) -> Option<Candidate> {
        let facts = &features.auction;
        let h = &features.hand;
        let p = h.points;
        takeout_context(facts)?;
        let theirs = facts.their_suits();
        let unbid: Vec<Suit> = Suit::ALL
            .into_iter()
            .filter(|s| !theirs.contains(s))
            .collect();
        let shape = unbid.iter().all(|s| h.length(*s) >= 3)
            && theirs.iter().all(|s| h.length(*s) <= 2);
        let long_major = unbid.iter().any(|s| s.is_major() && h.length(*s) >= 5);
        let notrump_overcall = h.balanced
            && self.t.notrump_overcall.contains(p)
            && theirs.iter().all(|s| h.stopper(*s).is_stopped());

        let rationale = if p >= self.t.takeout_double_min && shape && !long_major {
            format!("X: takeout, {p} points, support for the unbid suits")
        } else if p >= self.t.takeout_double_any_shape && !notrump_overcall {
            format!("X: takeout, {p} points, too strong to overcall")
        } else {
            return None;
        };
        Some(
            Candidate::new(Call::Double, priority::CONVENTION, rationale)
                .showing_points(Range::at_least(self.t.takeout_double_min))
                .forcing(ForcingLevel::OneRoundForcing),
        )
    }

    fn advance(&self, features: &Features, doubled: Call) -> Option<Candidate> {
        let facts = &features.auction;
        let h = &features.hand;
        let p = h.points;
        let their_suit = doubled.suit()?;
        let theirs = facts.their_suits();
        let unbid: Vec<Suit> = Suit::ALL
            .into_iter()
            .filter(|s| !theirs.contains(s))
            .collect();
        let majors: Vec<Suit> = unbid
            .iter()
            .copied()
            .filter(|s| s.is_major() && h.length(*s) >= 4)
            .collect();
        let suit = h.longest_of(&majors).or_else(|| h.longest_of(&unbid))?;

        if p >= self.t.two_level_response_min + 2 {
            let call = facts.cheapest(their_suit.into())?;
            return Some(
                advance(call, format!("{call}: cuebid, {p} points"))
                    .forcing(ForcingLevel::OneRoundForcing),
            );
        }
        if p >= self.t.two_level_response_min - 1 && h.length(suit) >= 4 {
            let call = jump(facts, suit.into())?;
            return Some(advance(
                call,
                format!("{call}: {p} points, {} {}", h.length(suit), suit_name(suit)),
            ));
        }
        if majors.is_empty()
            && h.balanced
            && p >= self.t.response_min
            && h.stopper(their_suit).is_stopped()
        {
            if let Some(call) = facts.cheapest_up_to(Strain::NoTrump, 1) {
                return Some(advance(call, format!("1NT: {p} points, stopper")));
            }
        }
        let call = facts.cheapest(suit.into())?;
        Some(advance(
            call,
            format!("{call}: {p} points, {} {}", h.length(suit), suit_name(suit)),
        ))
    }
}

impl RuleModule for TakeoutDouble {
    fn id(&self) -> SourceId {
        "convention.takeout_double"
    }

    fn evaluate(&self, _hand: &Hand, features: &Features) -> Result<Option<Candidate>, RuleFault> {
        let facts = &features.auction;
        let candidate = match features.role() {
            Role::Overcaller => self.double(features),
            Role::Advancer => partner_convention(facts, is_takeout_double)
                .and_then(|doubled| self.advance(features, doubled)),
            _ => None,
        };
        Ok(candidate)
    }

    fn announces(&self, facts: &AuctionFacts, call: &Call) -> Option<ForcingLevel> {
        is_takeout_double(facts, call).map(|_| ForcingLevel::OneRoundForcing)
    }
}

// Negative double

/// RHO's overcall of partner's one-level opening.
fn negative_context(facts: &AuctionFacts) -> Option<Call> {
    one_level_suit(facts.opening)?;
    let Interference::Overcall(overcall) = facts.interference else {
        return None;
    };
    (facts.partner_opened()
        && !facts.has_acted()
        && overcall.suit().is_some()
        && overcall.level().is_some_and(|l| l <= 3)
        && facts.last_calls.rho == Some(overcall)
        && facts.auction.is_legal(&Call::Double))
    .then_some(overcall)
}

fn is_negative_double(facts: &AuctionFacts, call: &Call) -> Option<Call> {
    (*call == Call::Double).then(|| negative_context(facts)).flatten()
}

/// Majors neither side has bid.
fn unbid_majors(facts: &AuctionFacts) -> Vec<Suit> {
    facts
        .unbid_suits()
        .into_iter()
        .filter(|s| s.is_major())
        .collect()
}

pub struct NegativeDouble {
    t: Thresholds,
}

impl NegativeDouble {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            t: config.thresholds.clone(),
        }
    }

    fn double(&self, features: &Features) -> Option<Candidate> {
        let facts = &features.auction;
        let overcall = negative_context(facts)?;
        let majors = unbid_majors(facts);
        if majors.is_empty() {
            return None;
        }
        let p = features.points();
        let min = if overcall.level() == Some(1) {
            self.t.negative_double_min
        } else {
            self.t.negative_double_min + 2
        };
        // Four cards, or a longer suit too weak to bid freely.
        let shows_majors = majors.iter().all(|s| {
            let len = features.length(*s);
            len == 4
                || (len >= 5
                    && p < self.t.two_level_response_min
                    && facts.cheapest(Strain::from(*s)).and_then(|c| c.level()) >= Some(2))
        });
        (p >= min && shows_majors).then(|| {
            let names: Vec<&str> = majors.iter().map(|s| suit_name(*s)).collect();
            Candidate::new(
                Call::Double,
                priority::CONVENTION,
                format!("X: negative, {p} points, {}", names.join(" and ")),
            )
            .showing_points(Range::at_least(min))
            .forcing(ForcingLevel::OneRoundForcing)
        })
    }

    fn opener_rebid(&self, features: &Features) -> Option<Candidate> {
        let facts = &features.auction;
        let h = &features.hand;
        let p = h.points;
        let opened = one_level_suit(facts.opening)?;
        let theirs = facts.their_suits();

        let majors: Vec<Suit> = unbid_majors(facts)
            .into_iter()
            .filter(|s| h.length(*s) >= 4)
            .collect();
        if let Some(major) = h.longest_of(&majors) {
            let call = facts.cheapest(major.into())?;
            return Some(
                Candidate::new(
                    call,
                    priority::CONVENTION_RESPONSE,
                    format!("{call}: {} {} for partner's double", h.length(major), suit_name(major)),
                )
                .showing_length(4)
                .bypassing(Bypass::PointRange),
            );
        }
        if h.balanced && theirs.iter().all(|s| h.stopper(*s).is_stopped()) {
            if let Some(call) = facts.cheapest_up_to(Strain::NoTrump, 2) {
                return Some(
                    Candidate::new(
                        call,
                        priority::CONVENTION_RESPONSE,
                        format!("{call}: {p} points, balanced with a stopper"),
                    )
                    .bypassing(Bypass::PointRange),
                );
            }
        }
        let others: Vec<Suit> = facts
            .unbid_suits()
            .into_iter()
            .filter(|s| h.length(*s) >= 4)
            .collect();
        let (suit, shown) = if h.length(opened) >= 6 {
            (opened, 6)
        } else if let Some(other) = h.longest_of(&others) {
            (other, 4)
        } else {
            (opened, h.length(opened).min(5))
        };
        let call = facts.cheapest(suit.into())?;
        Some(
            Candidate::new(
                call,
                priority::CONVENTION_RESPONSE,
                format!("{call}: {p} points, {} {}", h.length(suit), suit_name(suit)),
            )
            .showing_length(shown)
            .bypassing(Bypass::PointRange),
        )
    }
}

impl RuleModule for NegativeDouble {
    fn id(&self) -> SourceId {
        "convention.negative_double"
    }

    fn evaluate(&self, _hand: &Hand, features: &Features) -> Result<Option<Candidate>, RuleFault> {
        let facts = &features.auction;
        let candidate = match features.role() {
            Role::Responder => self.double(features),
            Role::OpenerRebid
                if facts.my_bids().len() == 1
                    && facts.rho_passed()
                    && facts
                        .before_last_call_of(facts.partner())
                        .is_some_and(|(before, call)| is_negative_double(&before, &call).is_some()) =>
            {
                self.opener_rebid(features)
            }
            _ => None,
        };
        Ok(candidate)
    }

    fn announces(&self, facts: &AuctionFacts, call: &Call) -> Option<ForcingLevel> {
        is_negative_double(facts, call).map(|_| ForcingLevel::OneRoundForcing)
    }
}

// Michaels cuebid

fn is_michaels(facts: &AuctionFacts, call: &Call) -> Option<Suit> {
    let opened = over_opening(facts)?;
    (*call == bid(2, opened)).then_some(opened)
}

/// 2NT asking the Michaels bidder for their minor.
fn is_minor_ask(facts: &AuctionFacts, call: &Call) -> bool {
    *call == NOTRUMP_2
        && partner_convention(facts, is_michaels).is_some_and(|opened| opened.is_major())
}

pub struct Michaels {
    t: Thresholds,
}

impl Michaels {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            t: config.thresholds.clone(),
        }
    }

    fn cuebid(&self, features: &Features) -> Option<Candidate> {
        let opened = over_opening(&features.auction)?;
        let p = features.points();
        let five = |s: Suit| features.length(s) >= 5;
        let shown = if opened.is_minor() {
            (five(Suit::Hearts) && five(Suit::Spades)).then_some("both majors")
        } else {
            let other = if opened == Suit::Hearts {
                Suit::Spades
            } else {
                Suit::Hearts
            };
            (five(other) && (five(Suit::Clubs) || five(Suit::Diamonds)))
                .then_some(if other == Suit::Spades {
                    "spades and a minor"
                } else {
                    "hearts and a minor"
                })
        }?;
        (p >= self.t.two_suited_min).then(|| {
            let call = bid(2, opened);
            Candidate::new(
                call,
                priority::CONVENTION + 20,
                format!("{call}: Michaels, {p} points, {shown}"),
            )
            .artificial()
            .showing_points(Range::at_least(self.t.two_suited_min))
            .forcing(ForcingLevel::OneRoundForcing)
        })
    }

    fn advance(&self, features: &Features, opened: Suit) -> Option<Candidate> {
        let facts = &features.auction;
        let p = features.points();
        let game_values = p >= self.t.two_level_response_min + 1;
        let major = if opened.is_minor() {
            features.hand.longest_of(&[Suit::Hearts, Suit::Spades])?
        } else {
            let other = if opened == Suit::Hearts {
                Suit::Spades
            } else {
                Suit::Hearts
            };
            if features.length(other) < 3 {
                let call = facts.cheapest_up_to(Strain::NoTrump, 2)?;
                return Some(
                    advance(call, format!("{call}: asks for partner's minor"))
                        .forcing(ForcingLevel::OneRoundForcing),
                );
            }
            other
        };
        let call = if game_values && features.length(major) >= 3 {
            facts.game_in(major.into())?
        } else {
            facts.cheapest(major.into())?
        };
        Some(advance(
            call,
            format!("{call}: {p} points, {} {}", features.length(major), suit_name(major)),
        ))
    }

    fn show_minor(&self, features: &Features) -> Option<Candidate> {
        let suit = features.hand.longest_of(&[Suit::Clubs, Suit::Diamonds])?;
        let call = features.auction.cheapest(suit.into())?;
        Some(
            Candidate::new(
                call,
                priority::CONVENTION_RESPONSE,
                format!("{call}: the minor is {}", suit_name(suit)),
            )
            .showing_length(5)
            .bypassing(Bypass::PointRange),
        )
    }
}

impl RuleModule for Michaels {
    fn id(&self) -> SourceId {
        "convention.michaels"
    }

    fn evaluate(&self, _hand: &Hand, features: &Features) -> Result<Option<Candidate>, RuleFault> {
        let facts = &features.auction;
        let candidate = match features.role() {
            Role::Overcaller if !facts.has_acted() => self.cuebid(features),
            Role::Overcaller => {
                let asked = facts
                    .before_last_call_of(facts.partner())
                    .is_some_and(|(before, call)| is_minor_ask(&before, &call));
                let mine = facts
                    .before_last_call_of(facts.position)
                    .and_then(|(before, call)| is_michaels(&before, &call));
                (asked && mine.is_some() && facts.my_bids().len() == 1 && facts.rho_passed())
                    .then(|| self.show_minor(features))
                    .flatten()
            }
            Role::Advancer => partner_convention(facts, is_michaels)
                .and_then(|opened| self.advance(features, opened)),
            _ => None,
        };
        Ok(candidate)
    }

    fn announces(&self, facts: &AuctionFacts, call: &Call) -> Option<ForcingLevel> {
        (is_michaels(facts, call).is_some() || is_minor_ask(facts, call))
            .then_some(ForcingLevel::OneRoundForcing)
    }
}

// Unusual 2NT

/// The two lowest suits the opponents have not opened.
fn unusual_suits(opened: Suit) -> [Suit; 2] {
    match opened {
        Suit::Clubs => [Suit::Diamonds, Suit::Hearts],
        Suit::Diamonds => [Suit::Clubs, Suit::Hearts],
        Suit::Hearts | Suit::Spades => [Suit::Clubs, Suit::Diamonds],
    }
}

fn is_unusual(facts: &AuctionFacts, call: &Call) -> Option<Suit> {
    let opened = over_opening(facts)?;
    (*call == NOTRUMP_2).then_some(opened)
}

pub struct UnusualNotrump {
    t: Thresholds,
}

impl UnusualNotrump {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            t: config.thresholds.clone(),
        }
    }

    fn overcall(&self, features: &Features) -> Option<Candidate> {
        let opened = over_opening(&features.auction)?;
        let [low, high] = unusual_suits(opened);
        let p = features.points();
        (p >= self.t.two_suited_min && features.length(low) >= 5 && features.length(high) >= 5)
            .then(|| {
                Candidate::new(
                    NOTRUMP_2,
                    priority::CONVENTION + 20,
                    format!(
                        "2NT: unusual, {p} points, {} and {}",
                        suit_name(low),
                        suit_name(high)
                    ),
                )
                .showing_points(Range::at_least(self.t.two_suited_min))
                .forcing(ForcingLevel::OneRoundForcing)
            })
    }

    fn advance(&self, features: &Features, opened: Suit) -> Option<Candidate> {
        let suit = features.hand.longest_of(&unusual_suits(opened))?;
        let call = features.auction.cheapest(suit.into())?;
        Some(advance(
            call,
            format!("{call}: preference for {}", suit_name(suit)),
        ))
    }
}

impl RuleModule for UnusualNotrump {
    fn id(&self) -> SourceId {
        "convention.unusual_2nt"
    }

    fn evaluate(&self, _hand: &Hand, features: &Features) -> Result<Option<Candidate>, RuleFault> {
        let facts = &features.auction;
        let candidate = match features.role() {
            Role::Overcaller => self.overcall(features),
            Role::Advancer => partner_convention(facts, is_unusual)
                .and_then(|opened| self.advance(features, opened)),
            _ => None,
        };
        Ok(candidate)
    }

    fn announces(&self, facts: &AuctionFacts, call: &Call) -> Option<ForcingLevel> {
        is_unusual(facts, call).map(|_| ForcingLevel::OneRoundForcing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testing::{announced, config, proposal};

    fn call(s: &str) -> Option<Call> {
        Some(s.parse().unwrap())
    }

    #[test]
    fn test_takeout_double() {
        let m = TakeoutDouble::new(&config());
        assert_eq!(proposal(&m, "KJ32.AJ32.2.KQ32", "1H"), Some(Call::Double));
        // Five spades: overcall instead.
        assert_eq!(proposal(&m, "KJ2.AJ32.2.KQ432", "1H"), None);
        // Strong hand, wrong shape.
        assert_eq!(proposal(&m, "AKQ432.AJ2.32.K2", "1H"), Some(Call::Double));
    }

    #[test]
    fn test_takeout_double_advances() {
        let m = TakeoutDouble::new(&config());
        assert_eq!(proposal(&m, "432.5432.32.J432", "1H X P"), call("1S"));
        assert_eq!(proposal(&m, "K32.Q432.32.AJ32", "1H X P"), call("2S"));
        assert_eq!(proposal(&m, "K32.A432.32.AJ32", "1H X P"), call("2H"));
    }

    #[test]
    fn test_negative_double() {
        let m = NegativeDouble::new(&config());
        assert_eq!(proposal(&m, "432.K32.Q432.J32", "1C 1S"), Some(Call::Double));
        // No unbid major.
        assert_eq!(proposal(&m, "432.K32.Q432.J32", "1H 1S"), None);
        // Opener shows the major.
        assert_eq!(proposal(&m, "AK32.Q32.KJ32.32", "1C 1S X P"), call("2H"));
    }

    #[test]
    fn test_michaels() {
        let m = Michaels::new(&config());
        assert_eq!(proposal(&m, "2.32.KQ432.QJ432", "1C"), call("2C"));
        assert_eq!(proposal(&m, "KQ432.2.32.KJ432", "1H"), call("2H"));
        assert_eq!(proposal(&m, "5432.432.32.J432", "1H 2H P"), call("2S"));
    }

    #[test]
    fn test_unusual_notrump() {
        let m = UnusualNotrump::new(&config());
        assert_eq!(proposal(&m, "KQ432.QJ432.32.2", "1H"), call("2N"));
        assert_eq!(proposal(&m, "5432.Q432.32.432", "1H 2N P"), call("3D"));
    }

    #[test]
    fn test_announcements() {
        assert_eq!(
            announced(&TakeoutDouble::new(&config()), "1H", "X"),
            Some(ForcingLevel::OneRoundForcing)
        );
        assert_eq!(
            announced(&NegativeDouble::new(&config()), "1C 1S", "X"),
            Some(ForcingLevel::OneRoundForcing)
        );
        assert_eq!(
            announced(&Michaels::new(&config()), "1C", "2C"),
            Some(ForcingLevel::OneRoundForcing)
        );
        assert_eq!(announced(&UnusualNotrump::new(&config()), "1C P", "2N"), None);
    }
}
