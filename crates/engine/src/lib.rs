//! Turn-by-turn bidding decisions.
//!
//! Given one player's hand and the auction so far, the [`Engine`] extracts
//! features, asks every registered rule module for a proposal, validates and
//! ranks the proposals, and returns the single legal call to make together
//! with the reason for it.

pub mod candidate;
pub mod config;
pub mod error;
pub mod features;
pub mod forcing;
pub mod resolve;
pub mod rules;
pub mod trace;

pub use candidate::{Bypass, Candidate};
pub use config::SystemConfig;
pub use error::{ConfigError, EngineError, RuleFault};
pub use features::{Features, Role};
pub use forcing::{ForcingLevel, ForcingStatus, ForcingTable};
pub use rules::{RuleModule, RuleRegistry, SourceId};
pub use trace::DecisionTrace;

use rand::seq::SliceRandom;
use serde::Serialize;
use tracing::debug;
use types::io::identifier;
use types::{Auction, Board, Call, Card, Hand, Position, Vulnerability};

/// One turn to decide. Dealer and vulnerability travel with the auction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BidRequest {
    pub hand: Hand,
    pub auction: Auction,
    pub position: Position,
}

impl BidRequest {
    pub fn new(hand: Hand, auction: Auction, position: Position) -> Self {
        Self {
            hand,
            auction,
            position,
        }
    }

    /// A request for whoever is to act on `auction`.
    pub fn for_current_player(hand: Hand, auction: Auction) -> Self {
        let position = auction.current_player();
        Self::new(hand, auction, position)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        self.hand.validate()?;
        if self.auction.is_finished() {
            return Err(EngineError::AuctionFinished);
        }
        if !self.auction.is_valid() {
            return Err(EngineError::InvalidAuction);
        }
        let expected = self.auction.current_player();
        if expected != self.position {
            return Err(EngineError::NotYourTurn {
                expected,
                requested: self.position,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BidDecision {
    pub call: Call,
    pub rationale: String,
    /// Module that proposed the call.
    pub source: Option<SourceId>,
    /// How strongly the call obliges partner to bid again.
    pub forcing: ForcingLevel,
}

/// The decision engine. Immutable once built; share it freely.
pub struct Engine {
    config: SystemConfig,
    forcing: ForcingTable,
    registry: RuleRegistry,
}

const _: fn() = || {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Engine>();
};

impl Engine {
    pub fn new(config: SystemConfig) -> Result<Self, EngineError> {
        let registry = RuleRegistry::standard(&config)?;
        Self::with_registry(config, registry)
    }

    /// The bundled standard system.
    pub fn standard() -> Result<Self, EngineError> {
        Self::new(SystemConfig::standard()?)
    }

    /// An engine consulting `registry` instead of the standard modules.
    pub fn with_registry(
        config: SystemConfig,
        registry: RuleRegistry,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        let forcing = ForcingTable::from_config(&config.forcing)?;
        Ok(Self {
            config,
            forcing,
            registry,
        })
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Whether `position`, about to act on `auction`, may pass.
    pub fn forcing_status(&self, auction: &Auction, position: Position) -> ForcingStatus {
        self.forcing
            .analyze(auction, position, self.registry.modules())
    }

    pub fn features(&self, request: &BidRequest) -> Features {
        Features::extract(
            &request.hand,
            &request.auction,
            request.position,
            &self.config.points,
            self.forcing_status(&request.auction, request.position),
        )
    }

    pub fn decide(&self, request: &BidRequest) -> Result<BidDecision, EngineError> {
        self.decide_with_trace(request).0
    }

    /// Like [`Engine::decide`], also returning the record of every proposal.
    pub fn decide_with_trace(
        &self,
        request: &BidRequest,
    ) -> (Result<BidDecision, EngineError>, DecisionTrace) {
        let mut trace = DecisionTrace::new(request.position);
        let result = self.run(request, &mut trace);
        (result, trace)
    }

    fn run(
        &self,
        request: &BidRequest,
        trace: &mut DecisionTrace,
    ) -> Result<BidDecision, EngineError> {
        request.validate()?;
        let features = self.features(request);
        trace.features = Some(features.clone());

        let candidates = self.registry.evaluate(&request.hand, &features, trace);
        let resolved = resolve::resolve(candidates, &features, &self.config.validation, trace)?;
        let candidate = resolved.candidate;

        let created = self.forcing.created_by(
            &request.auction,
            request.position,
            &candidate.call,
            self.registry.modules(),
        );
        let forcing = candidate.forcing.unwrap_or_default().max(created);
        debug!(
            position = %request.position,
            call = %candidate.call,
            source = candidate.source,
            ?forcing,
            "decided"
        );
        Ok(BidDecision {
            call: candidate.call,
            rationale: candidate.rationale,
            source: (!candidate.source.is_empty()).then_some(candidate.source),
            forcing,
        })
    }

    /// The next call for the player to act in a `<board>-<deal>[:calls]`
    /// identifier.
    pub fn decide_for_identifier(&self, identifier: &str) -> Result<BidDecision, EngineError> {
        let (board, auction) = identifier::import_board(identifier)?;
        let auction = auction
            .unwrap_or_else(|| Auction::with_vulnerability(board.dealer, board.vulnerability));
        let position = auction.current_player();
        self.decide(&BidRequest::new(
            board.hand(position).clone(),
            auction,
            position,
        ))
    }

    /// Bid `board` out with all four seats played by this engine.
    pub fn bid_board(&self, board: &Board) -> Result<Vec<BidDecision>, EngineError> {
        let mut auction = Auction::with_vulnerability(board.dealer, board.vulnerability);
        let mut decisions = Vec::new();
        while !auction.is_finished() {
            let position = auction.current_player();
            let request = BidRequest::new(board.hand(position).clone(), auction.clone(), position);
            let decision = self.decide(&request)?;
            auction.add_call(decision.call)?;
            decisions.push(decision);
        }
        Ok(decisions)
    }
}

/// Deal a random board with the dealer and vulnerability of `board_number`.
pub fn generate_random_board(board_number: u32, rng: &mut impl rand::Rng) -> Board {
    let mut deck: Vec<Card> = Card::deck();
    deck.shuffle(rng);
    let hands: [Hand; 4] =
        std::array::from_fn(|i| Hand::new(deck[i * 13..(i + 1) * 13].to_vec()));
    Board::new(
        Position::dealer_from_board_number(board_number),
        Vulnerability::from_board_number(board_number),
        hands,
    )
}
