use crate::board::{Partnership, Position, Vulnerability};
use crate::call::Call;
use crate::contract::{Contract, DoubleStatus};
use crate::error::AuctionError;
use crate::strain::Strain;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// How a call fits the auction for the player whose turn it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Legality {
    Legal,
    /// A bid that does not outrank the last bid. The strain may still be
    /// reachable at a higher level.
    Insufficient,
    /// Structurally impossible: doubling partner, redoubling without a double,
    /// acting after the auction closed, or a level outside 1..=7.
    Illegal,
}

/// An append-only auction. Every call stored here was legal when appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Auction {
    pub dealer: Position,
    #[serde(default)]
    pub vulnerability: Vulnerability,
    calls: Vec<Call>,
}

impl Auction {
    pub fn new(dealer: Position) -> Self {
        Self::with_vulnerability(dealer, Vulnerability::None)
    }

    pub fn with_vulnerability(dealer: Position, vulnerability: Vulnerability) -> Self {
        Self {
            dealer,
            vulnerability,
            calls: Vec::new(),
        }
    }

    /// Replay `calls` from `dealer`, rejecting the first call that is not legal.
    pub fn from_calls(
        dealer: Position,
        vulnerability: Vulnerability,
        calls: impl IntoIterator<Item = Call>,
    ) -> Result<Self, AuctionError> {
        let mut auction = Self::with_vulnerability(dealer, vulnerability);
        for call in calls {
            auction.add_call(call)?;
        }
        Ok(auction)
    }

    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Position, Call)> + '_ {
        let mut p = self.dealer;
        self.calls.iter().map(move |call| {
            let pos = p;
            p = p.next();
            (pos, *call)
        })
    }

    /// The auction as it stood after the first `len` calls.
    pub fn prefix(&self, len: usize) -> Auction {
        Auction {
            dealer: self.dealer,
            vulnerability: self.vulnerability,
            calls: self.calls[..len.min(self.calls.len())].to_vec(),
        }
    }

    /// Append a call for the player whose turn it is.
    pub fn add_call(&mut self, call: Call) -> Result<(), AuctionError> {
        if self.is_finished() {
            return Err(AuctionError::Finished { call });
        }
        if self.legality(&call) != Legality::Legal {
            return Err(AuctionError::IllegalCall {
                call,
                position: self.current_player(),
            });
        }
        self.calls.push(call);
        Ok(())
    }

    /// Parse and add a single call from a string like "1C", "P", or "X".
    /// Panics on invalid input; for tests and known-good data only.
    pub fn bid(&mut self, s: &str) {
        let call: Call = s.parse().expect("invalid call");
        self.add_call(call).expect("illegal call");
    }

    /// Parse and add multiple space-separated calls like "P 1C P".
    /// Panics on invalid input; for tests and known-good data only.
    pub fn bids(&mut self, s: &str) {
        for token in s.split_whitespace() {
            self.bid(token);
        }
    }

    /// Build an auction from space-separated calls like "P 1C P 2C".
    /// Panics on invalid input; for tests and known-good data only.
    pub fn bidding(dealer: Position, calls: &str) -> Self {
        let mut auction = Self::new(dealer);
        auction.bids(calls);
        auction
    }

    pub fn current_partnership(&self) -> Partnership {
        self.current_player().partnership()
    }

    pub fn current_player(&self) -> Position {
        self.position_at(self.calls.len())
    }

    /// Who makes (or made) the call at `index`.
    pub fn position_at(&self, index: usize) -> Position {
        Position::ALL[(self.dealer.idx() + index) % 4]
    }

    /// Seat of the player to act relative to the dealer, 1 through 4.
    pub fn current_seat(&self) -> u8 {
        (self.calls.len() % 4) as u8 + 1
    }

    pub fn is_finished(&self) -> bool {
        let len = self.calls.len();
        if len < 4 {
            return false;
        }
        if self.calls.iter().all(Call::is_pass) {
            return true;
        }
        self.calls[len - 3..].iter().all(Call::is_pass)
    }

    pub fn is_open(&self) -> bool {
        self.calls.iter().any(|c| c.is_bid())
    }

    /// The first bid and who made it.
    pub fn opening(&self) -> Option<(Position, Call)> {
        self.iter().find(|(_, call)| call.is_bid())
    }

    pub fn opener(&self) -> Option<Position> {
        self.opening().map(|(position, _)| position)
    }

    /// Returns the last bid (not pass/double/redouble) and who made it.
    pub fn last_bid(&self) -> Option<(Position, Call)> {
        self.iter().filter(|(_, call)| call.is_bid()).last()
    }

    /// Returns the last call that was not a pass and who made it.
    pub fn last_non_pass(&self) -> Option<(Position, Call)> {
        self.iter().filter(|(_, call)| !call.is_pass()).last()
    }

    /// Most recent call made by `position`, pass included.
    pub fn last_call_by(&self, position: Position) -> Option<Call> {
        self.last_call_index_for_position(position)
            .map(|idx| self.calls[idx])
    }

    /// All calls made by `position`, oldest first.
    pub fn calls_by(&self, position: Position) -> impl Iterator<Item = Call> + '_ {
        self.iter()
            .filter(move |(pos, _)| *pos == position)
            .map(|(_, call)| call)
    }

    /// Returns the index of the last call made by the given position.
    pub fn last_call_index_for_position(&self, position: Position) -> Option<usize> {
        let num_calls = self.calls.len();
        let first_call_idx = (position.idx() + 4 - self.dealer.idx()) % 4;

        if num_calls <= first_call_idx {
            return None;
        }

        let k = (num_calls - first_call_idx - 1) / 4;
        Some(first_call_idx + 4 * k)
    }

    /// Returns true if a player has made any non-Pass call (bid, double, or redouble).
    pub fn player_has_acted(&self, player: Position) -> bool {
        self.calls_by(player).any(|call| !call.is_pass())
    }

    /// Returns true if a partnership has made at least one bid (not pass/double/redouble).
    pub fn partnership_has_bid(&self, partnership: Partnership) -> bool {
        self.iter()
            .any(|(pos, call)| pos.partnership() == partnership && call.is_bid())
    }

    /// Returns the minimum legal bid for the given strain.
    pub fn minimum_bid_in(&self, strain: Strain) -> Option<Call> {
        if self.is_finished() {
            return None;
        }
        let Some((_, Call::Bid { level, strain: last_strain })) = self.last_bid() else {
            return Some(Call::Bid { level: 1, strain });
        };
        let min_level = if strain > last_strain { level } else { level + 1 };
        (min_level <= 7).then_some(Call::Bid {
            level: min_level,
            strain,
        })
    }

    /// Classify `call` for the player whose turn it is.
    pub fn legality(&self, call: &Call) -> Legality {
        if call.is_pass() {
            return Legality::Legal;
        }
        if self.is_finished() {
            return Legality::Illegal;
        }
        let me = self.current_player();
        match call {
            Call::Pass => Legality::Legal,
            Call::Bid { level, .. } if !(1..=7).contains(level) => Legality::Illegal,
            Call::Bid { .. } => match self.last_bid() {
                Some((_, last)) if call.compare_bids(&last) != Some(Ordering::Greater) => {
                    Legality::Insufficient
                }
                _ => Legality::Legal,
            },
            Call::Double => match self.last_non_pass() {
                Some((by, Call::Bid { .. })) if by.is_opponent_of(me) => Legality::Legal,
                _ => Legality::Illegal,
            },
            Call::Redouble => match self.last_non_pass() {
                Some((by, Call::Double)) if by.is_opponent_of(me) => Legality::Legal,
                _ => Legality::Illegal,
            },
        }
    }

    pub fn is_legal(&self, call: &Call) -> bool {
        self.legality(call) == Legality::Legal
    }

    /// Smallest legal bid in `target`'s strain, if any.
    pub fn next_legal_same_strain(&self, target: &Call) -> Option<Call> {
        self.minimum_bid_in(target.strain()?)
    }

    /// Return all calls that would be legal as the next call in this auction.
    pub fn legal_calls(&self) -> Vec<Call> {
        if self.is_finished() {
            return Vec::new();
        }
        let mut result = vec![Call::Pass];
        for level in 1..=7u8 {
            for strain in Strain::ALL {
                let call = Call::Bid { level, strain };
                if self.is_legal(&call) {
                    result.push(call);
                }
            }
        }
        for call in [Call::Double, Call::Redouble] {
            if self.is_legal(&call) {
                result.push(call);
            }
        }
        result
    }

    pub fn current_contract(&self) -> Option<Contract> {
        let mut last_bid = None;
        let mut double_status = DoubleStatus::Undoubled;

        // First player of each side to name each strain: [side][strain].
        let mut first_bidders: [[Option<Position>; 5]; 2] = [[None; 5]; 2];

        for (position, call) in self.iter() {
            match call {
                Call::Bid { level, strain } => {
                    let declarer = *first_bidders[position.partnership().idx()][strain.idx()]
                        .get_or_insert(position);
                    last_bid = Some((level, strain, declarer));
                    double_status = DoubleStatus::Undoubled;
                }
                Call::Double => double_status = DoubleStatus::Doubled,
                Call::Redouble => double_status = DoubleStatus::Redoubled,
                Call::Pass => {}
            }
        }

        last_bid.map(|(level, strain, declarer)| Contract {
            level,
            strain,
            double_status,
            declarer,
        })
    }

    /// The contract handed to trick play; `None` while bidding continues or
    /// after a pass-out.
    pub fn final_contract(&self) -> Option<Contract> {
        if self.is_finished() {
            self.current_contract()
        } else {
            None
        }
    }

    /// Re-check every stored call against the prefix before it. Auctions
    /// built through `add_call` always pass; deserialized ones may not.
    pub fn is_valid(&self) -> bool {
        Self::from_calls(self.dealer, self.vulnerability, self.calls.iter().copied()).is_ok()
    }
}

/// Free-function form of [`Auction::is_legal`].
pub fn is_legal(call: &Call, auction: &Auction) -> bool {
    auction.is_legal(call)
}

/// Free-function form of [`Auction::next_legal_same_strain`].
pub fn next_legal_same_strain(target: &Call, auction: &Auction) -> Option<Call> {
    auction.next_legal_same_strain(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(s: &str) -> Call {
        s.parse().unwrap()
    }

    #[test]
    fn test_auction_finished() {
        let mut auction = Auction::new(Position::North);
        auction.bids("1S P P");
        assert!(!auction.is_finished());
        auction.bid("P");
        assert!(auction.is_finished());
    }

    #[test]
    fn test_pass_out() {
        let mut auction = Auction::bidding(Position::East, "P P P");
        assert!(!auction.is_finished());
        auction.bid("P");
        assert!(auction.is_finished());
        assert_eq!(auction.final_contract(), None);
    }

    #[test]
    fn test_frozen_after_finish() {
        let mut auction = Auction::bidding(Position::North, "1C P P P");
        assert_eq!(
            auction.add_call(call("1D")),
            Err(AuctionError::Finished { call: call("1D") })
        );
        assert_eq!(
            auction.add_call(Call::Pass),
            Err(AuctionError::Finished { call: Call::Pass })
        );
        assert_eq!(auction.len(), 4);
    }

    #[test]
    fn test_add_call_rejects_illegal() {
        let mut auction = Auction::bidding(Position::North, "1H");
        assert_eq!(
            auction.add_call(call("1D")),
            Err(AuctionError::IllegalCall {
                call: call("1D"),
                position: Position::East
            })
        );
        assert!(auction.add_call(call("1S")).is_ok());
    }

    #[test]
    fn test_is_open() {
        let mut auction = Auction::new(Position::North);
        assert!(!auction.is_open());
        assert_eq!(auction.opener(), None);
        auction.bid("P");
        assert!(!auction.is_open());
        auction.bid("1C");
        assert!(auction.is_open());
        assert_eq!(auction.opener(), Some(Position::East));
        assert_eq!(auction.opening(), Some((Position::East, call("1C"))));
    }

    #[test]
    fn test_current_player_and_seat() {
        let mut auction = Auction::new(Position::West);
        assert_eq!(auction.current_player(), Position::West);
        assert_eq!(auction.current_seat(), 1);
        auction.bids("P P P");
        assert_eq!(auction.current_player(), Position::South);
        assert_eq!(auction.current_seat(), 4);
        assert_eq!(auction.current_partnership(), Partnership::NS);
    }

    #[test]
    fn test_current_contract() {
        let mut auction = Auction::new(Position::North);
        assert_eq!(auction.current_contract(), None);

        auction.bids("1C X XX");
        assert_eq!(
            auction.current_contract(),
            Some(Contract {
                level: 1,
                strain: Strain::Clubs,
                double_status: DoubleStatus::Redoubled,
                declarer: Position::North,
            })
        );

        auction.bid("1D");
        assert_eq!(
            auction.current_contract(),
            Some(Contract {
                level: 1,
                strain: Strain::Diamonds,
                double_status: DoubleStatus::Undoubled,
                declarer: Position::West,
            })
        );
    }

    #[test]
    fn test_declarer_logic() {
        // East was the first to bid clubs for EW.
        let mut auction = Auction::bidding(Position::North, "P 1C P 2C");
        assert_eq!(
            auction.current_contract().map(|c| c.declarer),
            Some(Position::East)
        );
        auction.bids("2D P 3D");
        assert_eq!(
            auction.current_contract().map(|c| c.declarer),
            Some(Position::North)
        );
    }

    #[test]
    fn test_final_contract() {
        let mut auction = Auction::bidding(Position::North, "1C");
        assert_eq!(auction.final_contract(), None);
        auction.bids("P P P");
        assert_eq!(
            auction.final_contract(),
            Some(Contract {
                level: 1,
                strain: Strain::Clubs,
                double_status: DoubleStatus::Undoubled,
                declarer: Position::North,
            })
        );
    }

    #[test]
    fn test_minimum_bid_in() {
        let mut auction = Auction::new(Position::North);
        assert_eq!(auction.minimum_bid_in(Strain::Clubs), Some(call("1C")));
        auction.bid("1D");
        assert_eq!(auction.minimum_bid_in(Strain::Clubs), Some(call("2C")));
        assert_eq!(auction.minimum_bid_in(Strain::Hearts), Some(call("1H")));
        assert_eq!(auction.minimum_bid_in(Strain::Diamonds), Some(call("2D")));
        auction.bids("P P P");
        assert_eq!(auction.minimum_bid_in(Strain::Spades), None);
    }

    #[test]
    fn test_minimum_bid_above_seven() {
        let auction = Auction::bidding(Position::North, "7N");
        assert_eq!(auction.minimum_bid_in(Strain::Clubs), None);
        assert_eq!(auction.next_legal_same_strain(&call("7C")), None);
    }

    #[test]
    fn test_last_bid_and_last_non_pass() {
        let mut auction = Auction::bidding(Position::North, "1C P 1S");
        assert_eq!(auction.last_bid(), Some((Position::South, call("1S"))));
        auction.bid("X");
        assert_eq!(auction.last_bid(), Some((Position::South, call("1S"))));
        assert_eq!(auction.last_non_pass(), Some((Position::West, Call::Double)));
    }

    #[test]
    fn test_last_call_by() {
        let auction = Auction::bidding(Position::North, "1C P 1S P 2S");
        assert_eq!(auction.last_call_by(Position::North), Some(call("2S")));
        assert_eq!(auction.last_call_by(Position::East), Some(Call::Pass));
        assert_eq!(auction.last_call_by(Position::South), Some(call("1S")));
        let calls: Vec<Call> = auction.calls_by(Position::North).collect();
        assert_eq!(calls, vec![call("1C"), call("2S")]);
    }

    #[test]
    fn test_player_has_acted() {
        let auction = Auction::bidding(Position::North, "1C X");
        assert!(auction.player_has_acted(Position::North));
        assert!(auction.player_has_acted(Position::East));
        assert!(!auction.partnership_has_bid(Partnership::EW));
        let auction = Auction::bidding(Position::North, "P P");
        assert!(!auction.player_has_acted(Position::North));
    }

    #[test]
    fn test_pass_is_always_structurally_legal() {
        let auction = Auction::new(Position::North);
        assert!(is_legal(&Call::Pass, &auction));
        let auction = Auction::bidding(Position::North, "1C X XX");
        assert!(is_legal(&Call::Pass, &auction));
        let auction = Auction::bidding(Position::North, "1C P P P");
        assert!(is_legal(&Call::Pass, &auction));
    }

    #[test]
    fn test_bid_legality() {
        let auction = Auction::bidding(Position::North, "1H");
        assert_eq!(auction.legality(&call("1D")), Legality::Insufficient);
        assert_eq!(auction.legality(&call("1H")), Legality::Insufficient);
        assert_eq!(auction.legality(&call("1S")), Legality::Legal);
        assert_eq!(auction.legality(&call("2C")), Legality::Legal);
        assert_eq!(
            auction.legality(&Call::Bid {
                level: 8,
                strain: Strain::Clubs
            }),
            Legality::Illegal
        );
    }

    #[test]
    fn test_double_legality() {
        // Opponent's bid: double is legal.
        assert!(Auction::bidding(Position::North, "1C").is_legal(&Call::Double));
        // Partner's bid: illegal.
        assert!(!Auction::bidding(Position::North, "1C P").is_legal(&Call::Double));
        // Opponent's bid, two passes later: still legal (balancing double).
        assert!(Auction::bidding(Position::North, "1C P P").is_legal(&Call::Double));
        // Already doubled.
        assert!(!Auction::bidding(Position::North, "1C X P").is_legal(&Call::Double));
        // No bid yet.
        assert!(!Auction::new(Position::North).is_legal(&Call::Double));
    }

    #[test]
    fn test_redouble_legality() {
        assert!(Auction::bidding(Position::North, "1C X").is_legal(&Call::Redouble));
        assert!(Auction::bidding(Position::North, "1C X P P").is_legal(&Call::Redouble));
        // The doubler's partner cannot redouble their own side's double.
        assert!(!Auction::bidding(Position::North, "1C X P").is_legal(&Call::Redouble));
        assert!(!Auction::bidding(Position::North, "1C").is_legal(&Call::Redouble));
        assert!(!Auction::bidding(Position::North, "1C X XX").is_legal(&Call::Redouble));
    }

    #[test]
    fn test_next_legal_same_strain() {
        let auction = Auction::bidding(Position::North, "1S");
        let promoted = next_legal_same_strain(&call("1H"), &auction);
        assert_eq!(promoted, Some(call("2H")));
        assert!(promoted.is_some_and(|c| auction.is_legal(&c)));
        assert_eq!(next_legal_same_strain(&Call::Pass, &auction), None);
    }

    #[test]
    fn test_legal_calls_empty_auction() {
        let calls = Auction::new(Position::North).legal_calls();
        // Pass + 35 bids
        assert_eq!(calls.len(), 36);
        assert_eq!(calls[0], Call::Pass);
        assert_eq!(calls[1], call("1C"));
    }

    #[test]
    fn test_legal_calls_after_bid() {
        let calls = Auction::bidding(Position::North, "1H").legal_calls();
        assert!(calls.contains(&Call::Pass));
        assert!(calls.contains(&Call::Double));
        assert!(!calls.contains(&Call::Redouble));
        assert!(!calls.contains(&call("1C")));
        assert!(calls.contains(&call("1S")));
    }

    #[test]
    fn test_legal_calls_finished_auction() {
        assert!(Auction::bidding(Position::North, "P P P P")
            .legal_calls()
            .is_empty());
    }

    #[test]
    fn test_last_call_index_for_position() {
        let mut auction = Auction::new(Position::East);
        assert_eq!(auction.last_call_index_for_position(Position::East), None);
        auction.bids("1C P 1S P 2S");
        assert_eq!(auction.last_call_index_for_position(Position::East), Some(4));
        assert_eq!(auction.last_call_index_for_position(Position::South), Some(1));
        assert_eq!(auction.last_call_index_for_position(Position::West), Some(2));
        assert_eq!(auction.last_call_index_for_position(Position::North), Some(3));
    }

    #[test]
    fn test_prefix() {
        let auction = Auction::bidding(Position::North, "1C P 1S P");
        let prefix = auction.prefix(2);
        assert_eq!(prefix.calls(), &[call("1C"), Call::Pass]);
        assert_eq!(prefix.current_player(), Position::South);
        assert_eq!(auction.prefix(99).len(), 4);
    }

    #[test]
    fn test_serde_roundtrip_and_validation() {
        let auction = Auction::bidding(Position::South, "1N P 2D P");
        let json = serde_json::to_string(&auction).unwrap();
        let back: Auction = serde_json::from_str(&json).unwrap();
        assert_eq!(back, auction);
        assert!(back.is_valid());

        let forged = r#"{"dealer":"North","calls":[{"Bid":{"level":1,"strain":"Spades"}},{"Bid":{"level":1,"strain":"Hearts"}}]}"#;
        let forged: Auction = serde_json::from_str(forged).unwrap();
        assert!(!forged.is_valid());
    }

    #[test]
    #[should_panic(expected = "invalid call")]
    fn test_bid_invalid_panics() {
        let mut auction = Auction::new(Position::North);
        auction.bid("zzz");
    }
}
