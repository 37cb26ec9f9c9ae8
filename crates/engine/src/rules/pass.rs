//! The floor of every decision: pass, or the least descriptive bid when
//! partner's call does not allow a pass.

use super::{suit_name, RuleModule, SourceId};
use crate::candidate::{priority, Bypass, Candidate};
use crate::config::{SystemConfig, Thresholds};
use crate::error::RuleFault;
use crate::features::{Features, Role};
use types::{Hand, Strain, Suit};

pub struct NaturalPass {
    t: Thresholds,
}

impl NaturalPass {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            t: config.thresholds.clone(),
        }
    }
}

impl RuleModule for NaturalPass {
    fn id(&self) -> SourceId {
        "natural.pass"
    }

    fn evaluate(&self, _hand: &Hand, features: &Features) -> Result<Option<Candidate>, RuleFault> {
        let p = features.points();
        let first_action = !features.auction.has_acted();
        let minimum = match features.role() {
            Role::Opener => Some((self.t.opening_min, "open")),
            Role::Responder if first_action => Some((self.t.response_min, "respond")),
            Role::Overcaller => Some((self.t.overcall_one_level.min, "overcall")),
            Role::Advancer if first_action => Some((self.t.response_min, "advance")),
            _ => None,
        };
        let rationale = match minimum {
            Some((min, what)) if p < min => {
                format!("Pass: {p} points is insufficient strength to {what}")
            }
            _ => "Pass: no descriptive call fits this hand".to_string(),
        };
        Ok(Some(Candidate::pass(priority::PASS, rationale)))
    }
}

/// The cheapest sensible bid when passing would break a forcing sequence.
pub struct ForcedContinuation;

impl RuleModule for ForcedContinuation {
    fn id(&self) -> SourceId {
        "natural.continuation"
    }

    fn evaluate(&self, _hand: &Hand, features: &Features) -> Result<Option<Candidate>, RuleFault> {
        if !features.forcing.must_bid {
            return Ok(None);
        }
        let facts = &features.auction;
        let h = &features.hand;

        let support = facts
            .partner_last_bid()
            .and_then(|c| c.suit())
            .filter(|s| h.length(*s) >= 3)
            .and_then(|s| {
                facts
                    .cheapest(s.into())
                    .map(|c| (c, format!("support for {}", suit_name(s))))
            });
        let longest = || {
            let suit: Suit = h.longest_suit();
            facts
                .cheapest(suit.into())
                .map(|c| (c, format!("longest suit, {} {}", h.length(suit), suit_name(suit))))
        };
        let notrump = || {
            facts
                .cheapest(Strain::NoTrump)
                .map(|c| (c, "nothing better to show".to_string()))
        };
        let anything = || {
            facts
                .auction
                .legal_calls()
                .into_iter()
                .find(|c| c.is_bid())
                .map(|c| (c, "the cheapest bid available".to_string()))
        };
        let Some((call, why)) = support
            .or_else(longest)
            .or_else(notrump)
            .or_else(anything)
        else {
            return Ok(None);
        };
        Ok(Some(
            Candidate::new(
                call,
                priority::FALLBACK,
                format!("{call}: forced to bid, {why}"),
            )
            .bypassing(Bypass::StrainLength)
            .bypassing(Bypass::PointRange),
        ))
    }
}
