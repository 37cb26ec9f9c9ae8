use crate::forcing::ForcingLevel;
use crate::rules::SourceId;
use std::path::PathBuf;
use thiserror::Error;
use types::{AuctionError, HandError, IdentifierError, ParseCallError, Position};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse system file: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{field}: bad call {value:?}: {source}")]
    BadCall {
        field: &'static str,
        value: String,
        source: ParseCallError,
    },
    #[error("{field}: range {min}..={max} is empty")]
    EmptyRange {
        field: &'static str,
        min: u8,
        max: u8,
    },
    #[error("{0}")]
    Invalid(String),
}

/// A rule module could not evaluate the hand. Isolated to that module.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleFault {
    #[error("unexpected auction state: {0}")]
    UnexpectedAuction(String),
    #[error("panicked: {0}")]
    Panicked(String),
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("invalid hand: {0}")]
    Hand(#[from] HandError),
    #[error("the auction is already finished")]
    AuctionFinished,
    #[error("the auction contains a call that was not legal when made")]
    InvalidAuction,
    #[error(transparent)]
    Auction(#[from] AuctionError),
    #[error("bad board identifier: {0}")]
    Identifier(#[from] IdentifierError),
    #[error("it is {expected}'s turn, not {requested}'s")]
    NotYourTurn {
        expected: Position,
        requested: Position,
    },
    #[error("rule module {0:?} is registered more than once")]
    DuplicateSource(SourceId),
    #[error("{position} must bid ({level:?}) but no rule produced a legal non-pass call")]
    ForcingViolation {
        position: Position,
        level: ForcingLevel,
    },
    #[error("two candidates from {module} tie at priority {priority}")]
    AmbiguousTie { module: SourceId, priority: u16 },
    #[error("no legal call available for {position}")]
    NoCandidate { position: Position },
}
