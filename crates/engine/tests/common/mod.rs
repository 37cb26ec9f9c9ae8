//! Shared setup for the engine integration tests.

#![allow(dead_code)]

use engine::{BidDecision, BidRequest, DecisionTrace, Engine, EngineError};
use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};
use types::{Auction, Hand, Position};

static LOGGING: OnceCell<()> = OnceCell::new();

/// Install a test-captured subscriber once. The level comes from `TEST_LOG`,
/// then `RUST_LOG`, then defaults to `warn`.
pub fn init_logging() {
    LOGGING.get_or_init(|| {
        let filter = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .map(EnvFilter::new)
            .unwrap_or_else(|_| EnvFilter::new("warn"));
        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .try_init()
            .ok();
    });
}

pub fn engine() -> Engine {
    init_logging();
    Engine::standard().expect("standard engine builds")
}

pub fn hand(s: &str) -> Hand {
    let hand = Hand::parse(s).expect("valid hand string");
    hand.validate().expect("13 distinct cards");
    hand
}

/// A request for the player to act after `calls`, dealer North.
pub fn request(hand_str: &str, calls: &str) -> BidRequest {
    let auction = Auction::bidding(Position::North, calls);
    BidRequest::for_current_player(hand(hand_str), auction)
}

pub fn decide(engine: &Engine, hand_str: &str, calls: &str) -> Result<BidDecision, EngineError> {
    engine.decide(&request(hand_str, calls))
}

pub fn trace(engine: &Engine, hand_str: &str, calls: &str) -> DecisionTrace {
    engine.decide_with_trace(&request(hand_str, calls)).1
}
