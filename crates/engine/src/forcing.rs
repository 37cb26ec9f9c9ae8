//! Forcing status: may the caller pass?
//!
//! The status is rebuilt every turn by replaying the auction. Each call is
//! checked against the configured trigger table and against every rule module
//! (conventions know which of their own calls are forcing). Obligations are
//! recorded per partnership, so a forcing call binds its maker's partner and,
//! for game forces, the maker too.

use crate::config::{parse_trigger_call, ForcingConfig, ForcingTrigger};
use crate::error::ConfigError;
use crate::features::AuctionFacts;
use crate::rules::{isolate, RuleModule};
use serde::{Deserialize, Serialize};
use types::{Auction, Call, Position};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub enum ForcingLevel {
    #[default]
    NonForcing,
    OneRoundForcing,
    GameForcing,
}

impl ForcingLevel {
    pub fn is_forcing(self) -> bool {
        self != ForcingLevel::NonForcing
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct ForcingStatus {
    pub level: ForcingLevel,
    /// Forcing, and nobody has bid since to relieve the obligation.
    pub must_bid: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Trigger {
    Opening(Call, ForcingLevel),
    NewSuitResponse(u8, ForcingLevel),
    JumpShift(ForcingLevel),
    OpponentCuebid(ForcingLevel),
}

impl Trigger {
    /// Forcing level `call` creates when made by `facts.position`.
    fn fires(&self, facts: &AuctionFacts, call: &Call) -> Option<ForcingLevel> {
        match self {
            Trigger::Opening(opening, status) => {
                (facts.opener.is_none() && call == opening).then_some(*status)
            }
            Trigger::NewSuitResponse(min_level, status) => (is_new_suit_response(facts, call)
                && call.level().is_some_and(|l| l >= *min_level))
            .then_some(*status),
            Trigger::JumpShift(status) => {
                (is_new_suit_response(facts, call) && facts.is_jump(call)).then_some(*status)
            }
            Trigger::OpponentCuebid(status) => {
                let cuebid = call
                    .suit()
                    .is_some_and(|suit| facts.their_suits().contains(&suit));
                (cuebid && facts.partner_has_acted()).then_some(*status)
            }
        }
    }
}

/// An unpassed responder's first action, naming a suit our side has not bid.
fn is_new_suit_response(facts: &AuctionFacts, call: &Call) -> bool {
    facts.partner_opened()
        && !facts.has_acted()
        && !facts.passed_hand
        && call
            .suit()
            .is_some_and(|suit| !facts.our_suits().contains(&suit))
}

#[derive(Debug, Clone, Copy, Default)]
struct SideState {
    game_forcing: bool,
    /// Player who owes partner one more call.
    pending: Option<Position>,
}

/// The trigger table compiled from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForcingTable {
    triggers: Vec<Trigger>,
}

impl ForcingTable {
    pub fn from_config(config: &ForcingConfig) -> Result<Self, ConfigError> {
        let triggers = config
            .triggers
            .iter()
            .map(|trigger| {
                Ok(match trigger {
                    ForcingTrigger::StrongOpening { call, status } => {
                        Trigger::Opening(parse_trigger_call(call)?, *status)
                    }
                    ForcingTrigger::NewSuitResponse { min_level, status } => {
                        Trigger::NewSuitResponse(*min_level, *status)
                    }
                    ForcingTrigger::JumpShift { status } => Trigger::JumpShift(*status),
                    ForcingTrigger::OpponentCuebid { status } => Trigger::OpponentCuebid(*status),
                })
            })
            .collect::<Result<_, ConfigError>>()?;
        Ok(Self { triggers })
    }

    /// The forcing level `call` creates when `by` makes it after `prefix`.
    pub fn created_by(
        &self,
        prefix: &Auction,
        by: Position,
        call: &Call,
        modules: &[Box<dyn RuleModule>],
    ) -> ForcingLevel {
        if call.is_pass() {
            return ForcingLevel::NonForcing;
        }
        let facts = AuctionFacts::new(prefix, by);
        let from_table = self.triggers.iter().filter_map(|t| t.fires(&facts, call));
        let from_modules = modules.iter().filter_map(|module| {
            isolate(module.id(), || Ok(module.announces(&facts, call)))
                .ok()
                .flatten()
        });
        from_table.chain(from_modules).max().unwrap_or_default()
    }

    /// Forcing status for `caller`, who is about to act on `auction`.
    pub fn analyze(
        &self,
        auction: &Auction,
        caller: Position,
        modules: &[Box<dyn RuleModule>],
    ) -> ForcingStatus {
        let mut sides = [SideState::default(); 2];
        for (idx, (by, call)) in auction.iter().enumerate() {
            let created = self.created_by(&auction.prefix(idx), by, &call, modules);
            let side = &mut sides[by.partnership().idx()];
            if side.pending == Some(by) {
                side.pending = None;
            }
            match created {
                ForcingLevel::GameForcing => {
                    side.game_forcing = true;
                    side.pending = Some(by.partner());
                }
                ForcingLevel::OneRoundForcing => side.pending = Some(by.partner()),
                ForcingLevel::NonForcing => {}
            }
            if call.is_game_or_higher() {
                for side in &mut sides {
                    side.game_forcing = false;
                }
            }
        }

        let side = sides[caller.partnership().idx()];
        // Partner's last call may force me; a game force binds both of us no
        // matter which of us created it.
        let forced_by_partner = side.pending == Some(caller);
        let level = if side.game_forcing {
            ForcingLevel::GameForcing
        } else if forced_by_partner {
            ForcingLevel::OneRoundForcing
        } else {
            ForcingLevel::NonForcing
        };
        let rho_quiet = auction
            .last_call_by(caller.rho())
            .map_or(true, |call| call.is_pass());
        ForcingStatus {
            level,
            must_bid: level.is_forcing() && rho_quiet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SystemConfig;

    fn table() -> ForcingTable {
        ForcingTable::from_config(&SystemConfig::standard().unwrap().forcing).unwrap()
    }

    fn status(calls: &str) -> ForcingStatus {
        let auction = Auction::bidding(Position::North, calls);
        table().analyze(&auction, auction.current_player(), &[])
    }

    #[test]
    fn test_no_forcing_at_start() {
        assert_eq!(status(""), ForcingStatus::default());
        assert_eq!(status("1H"), ForcingStatus::default());
    }

    #[test]
    fn test_new_suit_forces_opener() {
        let s = status("1S P 2D P");
        assert_eq!(s.level, ForcingLevel::OneRoundForcing);
        assert!(s.must_bid);
    }

    #[test]
    fn test_intervention_relieves_must_bid() {
        let s = status("1S P 2D 2H");
        assert_eq!(s.level, ForcingLevel::OneRoundForcing);
        assert!(!s.must_bid);
    }

    #[test]
    fn test_obligation_discharged_after_rebid() {
        // Opener rebid; now responder is free again.
        assert_eq!(status("1S P 2D P 2S P"), ForcingStatus::default());
    }

    #[test]
    fn test_raise_and_notrump_are_not_forcing() {
        assert_eq!(status("1S P 2S P"), ForcingStatus::default());
        assert_eq!(status("1S P 1N P"), ForcingStatus::default());
    }

    #[test]
    fn test_passed_hand_new_suit_not_forcing() {
        // North passed before South opened in third seat.
        let s = status("P P 1H P 2C P");
        assert_eq!(s.level, ForcingLevel::NonForcing);
    }

    #[test]
    fn test_strong_opening_game_forcing_until_game() {
        let s = status("2C P 2D P");
        assert_eq!(s.level, ForcingLevel::GameForcing);
        assert!(s.must_bid);
        // Responder is still bound after opener's rebid.
        let s = status("2C P 2D P 2H P");
        assert_eq!(s.level, ForcingLevel::GameForcing);
        assert!(s.must_bid);
        // Game reached.
        assert_eq!(status("2C P 2D P 2H P 4H P"), ForcingStatus::default());
    }

    #[test]
    fn test_jump_shift_game_forcing() {
        let s = status("1D P 2S P");
        assert_eq!(s.level, ForcingLevel::GameForcing);
        let s = status("1D P 2S P 3D P");
        assert_eq!(s.level, ForcingLevel::GameForcing);
        assert!(s.must_bid);
    }

    #[test]
    fn test_advancer_cuebid_forces_overcaller() {
        // East overcalls, West cuebids; East must bid again.
        let s = status("1H 1S P 2H P");
        assert_eq!(s.level, ForcingLevel::OneRoundForcing);
        assert!(s.must_bid);
    }

    #[test]
    fn test_created_by() {
        let t = table();
        let prefix = Auction::bidding(Position::North, "1S P");
        let call: Call = "2D".parse().unwrap();
        assert_eq!(
            t.created_by(&prefix, Position::South, &call, &[]),
            ForcingLevel::OneRoundForcing
        );
        assert_eq!(
            t.created_by(&prefix, Position::South, &Call::Pass, &[]),
            ForcingLevel::NonForcing
        );
    }

    #[test]
    fn test_trigger_table_is_configurable() {
        let config = ForcingConfig {
            triggers: vec![ForcingTrigger::NewSuitResponse {
                min_level: 2,
                status: ForcingLevel::OneRoundForcing,
            }],
        };
        let t = ForcingTable::from_config(&config).unwrap();
        let auction = Auction::bidding(Position::North, "1D P 1S P");
        assert_eq!(
            t.analyze(&auction, Position::North, &[]).level,
            ForcingLevel::NonForcing
        );
        let auction = Auction::bidding(Position::North, "2C P 2D P");
        assert_eq!(
            t.analyze(&auction, Position::North, &[]).level,
            ForcingLevel::OneRoundForcing
        );
    }
}
