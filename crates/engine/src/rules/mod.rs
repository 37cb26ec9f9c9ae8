//! Rule modules.
//!
//! Every module answers one question for one kind of hand and auction: what
//! call, if any, it recommends. Modules are independent of each other and of
//! evaluation order; the resolution pipeline decides among their proposals.

pub mod advance;
pub mod blackwood;
pub mod competitive;
pub mod jacoby_2nt;
pub mod notrump;
pub mod opening;
pub mod overcalls;
pub mod pass;
pub mod preempts;
pub mod rebid;
pub mod registry;
pub mod response;
pub mod strong_two_clubs;

use crate::candidate::Candidate;
use crate::error::RuleFault;
use crate::features::{AuctionFacts, Features};
use crate::forcing::ForcingLevel;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use tracing::warn;
use types::{Call, Hand, Strain, Suit};

pub use registry::RuleRegistry;

/// Stable, content-derived module identifier, e.g. `"convention.stayman"`.
/// The final tie-break key when ranking candidates.
pub type SourceId = &'static str;

pub trait RuleModule: Send + Sync {
    fn id(&self) -> SourceId;

    /// Propose at most one call for this hand.
    fn evaluate(&self, hand: &Hand, features: &Features) -> Result<Option<Candidate>, RuleFault>;

    /// Forcing level this module assigns to `call` when made by
    /// `facts.position` after `facts.auction`. `None` when the call is not
    /// one of this module's.
    fn announces(&self, _facts: &AuctionFacts, _call: &Call) -> Option<ForcingLevel> {
        None
    }
}

/// Run one module step, turning both error returns and panics into a logged
/// [`RuleFault`].
pub(crate) fn isolate<T>(
    id: SourceId,
    step: impl FnOnce() -> Result<T, RuleFault>,
) -> Result<T, RuleFault> {
    let result = panic::catch_unwind(AssertUnwindSafe(step))
        .unwrap_or_else(|payload| Err(RuleFault::Panicked(panic_message(payload.as_ref()))));
    if let Err(fault) = &result {
        warn!(module = id, %fault, "rule module fault; its candidate is discarded");
    }
    result
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

pub(crate) fn suit_name(suit: Suit) -> &'static str {
    match suit {
        Suit::Clubs => "clubs",
        Suit::Diamonds => "diamonds",
        Suit::Hearts => "hearts",
        Suit::Spades => "spades",
    }
}

pub(crate) fn bid(level: u8, suit: Suit) -> Call {
    Call::bid(level, Strain::from(suit))
}

/// One level above the cheapest bid in `strain`.
pub(crate) fn jump(facts: &AuctionFacts, strain: Strain) -> Option<Call> {
    let level = facts.cheapest(strain)?.level()? + 1;
    (level <= 7).then(|| Call::bid(level, strain))
}

/// The suit of a one-level suit opening.
pub(crate) fn one_level_suit(call: Option<Call>) -> Option<Suit> {
    call.filter(|c| c.level() == Some(1)).and_then(|c| c.suit())
}

pub(crate) const NOTRUMP_1: Call = Call::bid(1, Strain::NoTrump);
pub(crate) const NOTRUMP_2: Call = Call::bid(2, Strain::NoTrump);
pub(crate) const NOTRUMP_3: Call = Call::bid(3, Strain::NoTrump);
pub(crate) const NOTRUMP_4: Call = Call::bid(4, Strain::NoTrump);
pub(crate) const NOTRUMP_5: Call = Call::bid(5, Strain::NoTrump);


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_isolate_passes_through_values() {
        assert_eq!(isolate("test.ok", || Ok(3)), Ok(3));
    }

    #[test]
    fn test_isolate_reports_errors() {
        let fault = RuleFault::UnexpectedAuction("boom".into());
        assert_eq!(
            isolate::<()>("test.err", || Err(fault.clone())),
            Err(fault)
        );
    }

    #[test]
    fn test_isolate_catches_panics() {
        let result = isolate::<()>("test.panic", || panic!("module exploded"));
        assert_eq!(
            result,
            Err(RuleFault::Panicked("module exploded".to_string()))
        );
    }

    #[test]
    fn test_jump() {
        let auction = types::Auction::bidding(types::Position::North, "1H P");
        let facts = AuctionFacts::new(&auction, auction.current_player());
        assert_eq!(jump(&facts, Strain::Spades), Some(bid(2, Suit::Spades)));
        assert_eq!(jump(&facts, Strain::Clubs), Some(bid(3, Suit::Clubs)));
    }
}
