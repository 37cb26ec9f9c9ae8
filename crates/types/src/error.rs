use crate::call::Call;
use crate::card::Card;
use crate::board::Position;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseCallError {
    #[error("empty call string")]
    Empty,
    #[error("unrecognized call: {0:?}")]
    Unrecognized(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuctionError {
    #[error("auction is finished; {call} cannot be appended")]
    Finished { call: Call },
    #[error("{call} is not legal for {position} at this point")]
    IllegalCall { call: Call, position: Position },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandError {
    #[error("a hand holds 13 cards, got {0}")]
    WrongCardCount(usize),
    #[error("duplicate card {0}")]
    DuplicateCard(Card),
    #[error("malformed hand string {0:?}")]
    Malformed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    #[error("identifier {0:?} is not of the form <board>-<deal>[:calls]")]
    Malformed(String),
    #[error("bad board number {0:?}")]
    BoardNumber(String),
    #[error("deal must be 26 hex digits, got {0:?}")]
    Deal(String),
    #[error(transparent)]
    Call(#[from] ParseCallError),
    #[error(transparent)]
    Auction(#[from] AuctionError),
}
