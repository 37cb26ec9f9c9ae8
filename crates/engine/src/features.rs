//! Per-turn facts about the hand and the auction.
//!
//! Everything here is recomputed from scratch for each decision; nothing is
//! cached between turns.

use crate::config::PointWeights;
use crate::forcing::ForcingStatus;
use serde::Serialize;
use types::{Auction, Call, Hand, Partnership, Position, Shape, Stopper, Strain, Suit};

/// The caller's structural role, from who first made a non-pass call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Role {
    /// Nobody has bid yet.
    Opener,
    /// The caller opened and is bidding again.
    OpenerRebid,
    /// Partner opened.
    Responder,
    /// The opponents opened; the caller acts first for our side.
    Overcaller,
    /// The opponents opened and partner has already acted.
    Advancer,
}

/// What the opponents did since partner last called.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Interference {
    None,
    Double,
    Redouble,
    Overcall(Call),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HandFeatures {
    pub points: u8,
    /// Indexed by `Suit::idx()`.
    pub lengths: [u8; 4],
    pub sorted_shape: [u8; 4],
    pub shape: Shape,
    pub balanced: bool,
    /// Indexed by `Suit::idx()`.
    pub stoppers: [Stopper; 4],
}

impl HandFeatures {
    pub fn extract(hand: &Hand, weights: &PointWeights) -> Self {
        let shape = hand.shape();
        Self {
            points: weights.count(hand),
            lengths: hand.lengths(),
            sorted_shape: hand.sorted_shape(),
            shape,
            balanced: shape == Shape::Balanced,
            stoppers: Suit::ALL.map(|suit| hand.stopper(suit)),
        }
    }

    pub fn length(&self, suit: Suit) -> u8 {
        self.lengths[suit.idx()]
    }

    pub fn stopper(&self, suit: Suit) -> Stopper {
        self.stoppers[suit.idx()]
    }

    /// Longest of `suits`; ties go to the higher-ranking suit.
    pub fn longest_of(&self, suits: &[Suit]) -> Option<Suit> {
        suits
            .iter()
            .copied()
            .max_by_key(|suit| (self.length(*suit), *suit))
    }

    pub fn longest_suit(&self) -> Suit {
        self.longest_of(&Suit::ALL).unwrap_or(Suit::Spades)
    }

    /// Points plus the lengths of the two longest suits.
    pub fn rule_of_twenty(&self) -> u8 {
        self.points
            .saturating_add(self.sorted_shape[0])
            .saturating_add(self.sorted_shape[1])
    }
}

/// Most recent call by each seat relative to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub struct LastCalls {
    pub me: Option<Call>,
    pub partner: Option<Call>,
    pub lho: Option<Call>,
    pub rho: Option<Call>,
}

/// Auction-derived facts for one position. Independent of the caller's cards,
/// so the forcing analyzer can build these for any prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuctionFacts {
    pub position: Position,
    pub auction: Auction,
    /// 1 through 4, counted from the dealer.
    pub seat: u8,
    pub role: Role,
    pub opener: Option<Position>,
    pub opening: Option<Call>,
    pub last_calls: LastCalls,
    pub interference: Interference,
    pub last_bid: Option<(Position, Call)>,
    /// The caller passed before anyone opened.
    pub passed_hand: bool,
    pub vulnerable: bool,
    pub opponents_vulnerable: bool,
}

impl AuctionFacts {
    pub fn new(auction: &Auction, position: Position) -> Self {
        let partner = position.partner();
        let (opener, opening) = match auction.opening() {
            Some((pos, call)) => (Some(pos), Some(call)),
            None => (None, None),
        };
        Self {
            position,
            auction: auction.clone(),
            seat: seat_of(auction, position),
            role: role_of(auction, position, opener),
            opener,
            opening,
            last_calls: LastCalls {
                me: auction.last_call_by(position),
                partner: auction.last_call_by(partner),
                lho: auction.last_call_by(position.lho()),
                rho: auction.last_call_by(position.rho()),
            },
            interference: interference_for(auction, position),
            last_bid: auction.last_bid(),
            passed_hand: passed_before_opening(auction, position),
            vulnerable: auction.vulnerability.is_vulnerable(position),
            opponents_vulnerable: auction.vulnerability.is_vulnerable(position.lho()),
        }
    }

    pub fn partner(&self) -> Position {
        self.position.partner()
    }

    pub fn side(&self) -> Partnership {
        self.position.partnership()
    }

    pub fn my_calls(&self) -> Vec<Call> {
        self.auction.calls_by(self.position).collect()
    }

    pub fn partner_calls(&self) -> Vec<Call> {
        self.auction.calls_by(self.partner()).collect()
    }

    pub fn my_bids(&self) -> Vec<Call> {
        bids_of(&self.auction, self.position)
    }

    pub fn partner_bids(&self) -> Vec<Call> {
        bids_of(&self.auction, self.partner())
    }

    /// The caller has made a non-pass call.
    pub fn has_acted(&self) -> bool {
        self.auction.player_has_acted(self.position)
    }

    pub fn partner_has_acted(&self) -> bool {
        self.auction.player_has_acted(self.partner())
    }

    pub fn partner_opened(&self) -> bool {
        self.opener == Some(self.partner())
    }

    pub fn opponents_opened(&self) -> bool {
        self.opener.is_some_and(|p| p.is_opponent_of(self.position))
    }

    pub fn rho_passed(&self) -> bool {
        self.last_calls.rho == Some(Call::Pass)
    }

    /// The opponents have made nothing but passes.
    pub fn opponents_silent(&self) -> bool {
        self.auction
            .iter()
            .all(|(pos, call)| !pos.is_opponent_of(self.position) || call.is_pass())
    }

    /// Suits named by bids from `side`, first mention first.
    pub fn suits_bid_by(&self, side: Partnership) -> Vec<Suit> {
        let mut suits = Vec::new();
        for (pos, call) in self.auction.iter() {
            if let Some(suit) = call.suit() {
                if pos.partnership() == side && !suits.contains(&suit) {
                    suits.push(suit);
                }
            }
        }
        suits
    }

    pub fn our_suits(&self) -> Vec<Suit> {
        self.suits_bid_by(self.side())
    }

    pub fn their_suits(&self) -> Vec<Suit> {
        self.suits_bid_by(self.side().opponent())
    }

    /// Suits nobody has bid.
    pub fn unbid_suits(&self) -> Vec<Suit> {
        let ours = self.our_suits();
        let theirs = self.their_suits();
        Suit::ALL
            .into_iter()
            .filter(|s| !ours.contains(s) && !theirs.contains(s))
            .collect()
    }

    /// The most recently bid suit that both partners have named.
    pub fn agreed_suit(&self) -> Option<Suit> {
        let mine = self.my_bids();
        let partners = self.partner_bids();
        self.auction
            .iter()
            .filter(|(pos, _)| !pos.is_opponent_of(self.position))
            .filter_map(|(_, call)| call.suit())
            .filter(|suit| {
                mine.iter().any(|c| c.suit() == Some(*suit))
                    && partners.iter().any(|c| c.suit() == Some(*suit))
            })
            .last()
    }

    /// Cheapest legal bid in `strain`.
    pub fn cheapest(&self, strain: Strain) -> Option<Call> {
        self.auction.minimum_bid_in(strain)
    }

    /// Cheapest legal bid in `strain`, if it is at or below `max_level`.
    pub fn cheapest_up_to(&self, strain: Strain, max_level: u8) -> Option<Call> {
        self.cheapest(strain)
            .filter(|c| c.level().is_some_and(|l| l <= max_level))
    }

    /// A bid one or more levels above the cheapest available in its strain.
    pub fn is_jump(&self, call: &Call) -> bool {
        match (call.strain().and_then(|s| self.cheapest(s)), call.level()) {
            (Some(cheapest), Some(level)) => cheapest.level().is_some_and(|c| level > c),
            _ => false,
        }
    }

    /// Game in `strain`, if still legal.
    pub fn game_in(&self, strain: Strain) -> Option<Call> {
        let game = Call::bid(strain.game_level(), strain);
        self.auction.is_legal(&game).then_some(game)
    }

    pub fn partner_last_bid(&self) -> Option<Call> {
        self.partner_bids().last().copied()
    }

    pub fn my_last_bid(&self) -> Option<Call> {
        self.my_bids().last().copied()
    }

    /// The auction as `position` saw it just before their most recent call,
    /// together with that call.
    pub fn before_last_call_of(&self, position: Position) -> Option<(AuctionFacts, Call)> {
        let idx = self.auction.last_call_index_for_position(position)?;
        let call = *self.auction.calls().get(idx)?;
        Some((AuctionFacts::new(&self.auction.prefix(idx), position), call))
    }
}

/// Everything a rule module sees about the turn besides the cards themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Features {
    pub hand: HandFeatures,
    pub auction: AuctionFacts,
    pub forcing: ForcingStatus,
}

impl Features {
    pub fn extract(
        hand: &Hand,
        auction: &Auction,
        position: Position,
        weights: &PointWeights,
        forcing: ForcingStatus,
    ) -> Self {
        Self {
            hand: HandFeatures::extract(hand, weights),
            auction: AuctionFacts::new(auction, position),
            forcing,
        }
    }

    pub fn points(&self) -> u8 {
        self.hand.points
    }

    pub fn length(&self, suit: Suit) -> u8 {
        self.hand.length(suit)
    }

    pub fn role(&self) -> Role {
        self.auction.role
    }
}

fn bids_of(auction: &Auction, position: Position) -> Vec<Call> {
    auction.calls_by(position).filter(Call::is_bid).collect()
}

fn seat_of(auction: &Auction, position: Position) -> u8 {
    ((position.idx() + 4 - auction.dealer.idx()) % 4) as u8 + 1
}

fn role_of(auction: &Auction, position: Position, opener: Option<Position>) -> Role {
    let partner = position.partner();
    match opener {
        None => Role::Opener,
        Some(p) if p == position => Role::OpenerRebid,
        Some(p) if p == partner => Role::Responder,
        Some(_) => {
            let first_for_side = auction
                .iter()
                .find(|(pos, call)| !pos.is_opponent_of(position) && !call.is_pass())
                .map(|(pos, _)| pos);
            if first_for_side == Some(partner) {
                Role::Advancer
            } else {
                Role::Overcaller
            }
        }
    }
}

fn interference_for(auction: &Auction, position: Position) -> Interference {
    let Some(partner_idx) = auction.last_call_index_for_position(position.partner()) else {
        return Interference::None;
    };
    auction
        .iter()
        .skip(partner_idx + 1)
        .filter(|(pos, call)| pos.is_opponent_of(position) && !call.is_pass())
        .last()
        .map_or(Interference::None, |(_, call)| match call {
            Call::Double => Interference::Double,
            Call::Redouble => Interference::Redouble,
            _ => Interference::Overcall(call),
        })
}

fn passed_before_opening(auction: &Auction, position: Position) -> bool {
    for (pos, call) in auction.iter() {
        if call.is_bid() {
            return false;
        }
        if pos == position {
            return call.is_pass();
        }
    }
    false
}
