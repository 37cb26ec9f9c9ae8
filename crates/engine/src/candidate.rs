use crate::config::Range;
use crate::forcing::ForcingLevel;
use crate::rules::SourceId;
use serde::Serialize;
use std::collections::BTreeSet;
use types::Call;

/// Rank bands. Higher wins; modules nudge within a band.
pub mod priority {
    /// Answering or continuing a convention partner started.
    pub const CONVENTION_RESPONSE: u16 = 400;
    pub const CONVENTION: u16 = 300;
    pub const NATURAL: u16 = 200;
    /// Something to say when forced and nothing better applies.
    pub const FALLBACK: u16 = 100;
    pub const PASS: u16 = 0;
}

/// Generic validators a conventional call may opt out of. Legality against the
/// auction is never optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Bypass {
    StrainLength,
    PointRange,
}

/// What the call promises about the hand, checked by the validators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Shows {
    /// Cards held in the call's suit.
    pub min_length: Option<u8>,
    pub points: Option<Range>,
}

/// One module's proposal for this turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub call: Call,
    pub rationale: String,
    pub priority: u16,
    pub bypass: BTreeSet<Bypass>,
    pub shows: Shows,
    /// Forcing level the module attaches to its own call.
    pub forcing: Option<ForcingLevel>,
    /// Stamped by the pipeline from the proposing module.
    pub source: SourceId,
}

impl Candidate {
    pub fn new(call: Call, priority: u16, rationale: impl Into<String>) -> Self {
        Self {
            call,
            rationale: rationale.into(),
            priority,
            bypass: BTreeSet::new(),
            shows: Shows::default(),
            forcing: None,
            source: "",
        }
    }

    pub fn pass(priority: u16, rationale: impl Into<String>) -> Self {
        Self::new(Call::Pass, priority, rationale)
    }

    pub fn showing_length(mut self, min_length: u8) -> Self {
        self.shows.min_length = Some(min_length);
        self
    }

    pub fn showing_points(mut self, points: Range) -> Self {
        self.shows.points = Some(points);
        self
    }

    pub fn bypassing(mut self, validator: Bypass) -> Self {
        self.bypass.insert(validator);
        self
    }

    /// Artificial call: the named strain says nothing about length.
    pub fn artificial(self) -> Self {
        self.bypassing(Bypass::StrainLength)
    }

    pub fn forcing(mut self, level: ForcingLevel) -> Self {
        self.forcing = Some(level);
        self
    }

    pub fn bypasses(&self, validator: Bypass) -> bool {
        self.bypass.contains(&validator)
    }
}
