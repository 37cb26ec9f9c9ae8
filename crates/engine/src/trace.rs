//! Tracing for one decision
use crate::config::Range;
use crate::error::RuleFault;
use crate::features::Features;
use crate::rules::SourceId;
use serde::Serialize;
use types::{Call, Position, Suit};

/// A detailed record of how a call was chosen
#[derive(Debug, Clone, Serialize)]
pub struct DecisionTrace {
    /// The player to act
    pub position: Position,
    /// Features the modules saw (absent if the request was rejected)
    pub features: Option<Features>,
    /// Every proposal, in ranking order once resolution has run
    pub candidates: Vec<CandidateTrace>,
    /// Modules that failed this turn
    pub faults: Vec<FaultTrace>,
    /// The call selected (if any)
    pub selected: Option<Call>,
    /// The insufficient call the selection was promoted from
    pub promoted_from: Option<Call>,
}

/// One module's proposal and what the pipeline made of it
#[derive(Debug, Clone, Serialize)]
pub struct CandidateTrace {
    pub source: SourceId,
    pub call: Call,
    pub priority: u16,
    pub rationale: String,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
    Valid,
    /// Legal in strain but below the last bid; kept for promotion.
    Insufficient,
    Rejected(Rejection),
    /// Discarded because the caller must bid.
    PassWhileForced,
}

/// Why a validator turned a candidate down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Rejection {
    StrainLength { suit: Suit, need: u8, have: u8 },
    PointRange { range: Range, points: u8 },
    Illegal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FaultTrace {
    pub source: SourceId,
    pub message: String,
}

impl DecisionTrace {
    pub fn new(position: Position) -> Self {
        Self {
            position,
            features: None,
            candidates: Vec::new(),
            faults: Vec::new(),
            selected: None,
            promoted_from: None,
        }
    }

    pub(crate) fn record_fault(&mut self, source: SourceId, fault: &RuleFault) {
        self.faults.push(FaultTrace {
            source,
            message: fault.to_string(),
        });
    }

    /// Proposals that survived validation.
    pub fn valid(&self) -> impl Iterator<Item = &CandidateTrace> {
        self.candidates
            .iter()
            .filter(|c| matches!(c.outcome, Outcome::Valid | Outcome::Insufficient))
    }

    pub fn rejected(&self) -> impl Iterator<Item = &CandidateTrace> {
        self.candidates
            .iter()
            .filter(|c| matches!(c.outcome, Outcome::Rejected(_) | Outcome::PassWhileForced))
    }
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rejection::StrainLength { suit, need, have } => {
                write!(f, "needs {need}+ {suit:?}, holds {have}")
            }
            Rejection::PointRange { range, points } => {
                write!(f, "shows {range} points, holds {points}")
            }
            Rejection::Illegal => write!(f, "illegal in this auction"),
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Valid => write!(f, "valid"),
            Outcome::Insufficient => write!(f, "insufficient"),
            Outcome::Rejected(why) => write!(f, "rejected: {why}"),
            Outcome::PassWhileForced => write!(f, "rejected: pass while forced"),
        }
    }
}
