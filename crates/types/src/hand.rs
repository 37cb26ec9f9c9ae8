// cspell:ignore AKQJT AKQJ Jxxx
use crate::card::Card;
use crate::error::HandError;
use crate::rank::Rank;
use crate::suit::Suit;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Shape {
    /// No singletons, no voids, max one doubleton (4-3-3-3, 4-4-3-2, 5-3-3-2)
    Balanced,
    /// One singleton OR two doubletons, no voids (5-4-2-2, 6-3-2-2)
    SemiBalanced,
    /// Everything else
    Unbalanced,
}

/// How well a holding stops the run of a suit in notrump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Stopper {
    None,
    /// Kx, Qxx or Jxxx: an honor guarded by enough small cards.
    Partial,
    /// The ace, or king-queen.
    Solid,
}

impl Stopper {
    pub fn is_stopped(self) -> bool {
        self != Stopper::None
    }
}

pub const HAND_SIZE: usize = 13;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    /// Build a hand from cards. Use [`Hand::validate`] to check it is a legal deal.
    pub fn new(mut cards: Vec<Card>) -> Self {
        sort_cards(&mut cards);
        Self { cards }
    }

    /// Parse a hand string in the format "Clubs.Diamonds.Hearts.Spades".
    pub fn parse(s: &str) -> Result<Self, HandError> {
        crate::io::hand_parser::parse_hand(s)
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Check the hand holds exactly 13 distinct cards.
    pub fn validate(&self) -> Result<(), HandError> {
        if self.cards.len() != HAND_SIZE {
            return Err(HandError::WrongCardCount(self.cards.len()));
        }
        let mut seen = BTreeSet::new();
        for card in &self.cards {
            if !seen.insert(*card) {
                return Err(HandError::DuplicateCard(*card));
            }
        }
        Ok(())
    }

    pub fn holds(&self, card: Card) -> bool {
        self.cards.contains(&card)
    }

    pub fn has(&self, suit: Suit, rank: Rank) -> bool {
        self.holds(Card::new(suit, rank))
    }

    /// Milton Work count (A=4, K=3, Q=2, J=1).
    pub fn hcp(&self) -> u8 {
        self.cards
            .iter()
            .map(|c| match c.rank {
                Rank::Ace => 4,
                Rank::King => 3,
                Rank::Queen => 2,
                Rank::Jack => 1,
                _ => 0,
            })
            .sum()
    }

    pub fn length(&self, suit: Suit) -> u8 {
        self.cards.iter().filter(|c| c.suit == suit).count() as u8
    }

    /// Suit lengths indexed by `Suit::idx()`.
    pub fn lengths(&self) -> [u8; 4] {
        let mut lengths = [0u8; 4];
        for card in &self.cards {
            lengths[card.suit.idx()] += 1;
        }
        lengths
    }

    /// Suit lengths longest first, e.g. `[5, 4, 3, 1]`.
    pub fn sorted_shape(&self) -> [u8; 4] {
        let mut d = self.lengths();
        d.sort_by(|a, b| b.cmp(a));
        d
    }

    pub fn count_rank(&self, rank: Rank) -> u8 {
        self.cards.iter().filter(|c| c.rank == rank).count() as u8
    }

    /// Returns the shape classification of this hand
    pub fn shape(&self) -> Shape {
        let sorted_lengths = self.sorted_shape();

        let longest = sorted_lengths[0];
        let doubleton_count = sorted_lengths.iter().filter(|&&l| l == 2).count();
        let singleton_count = sorted_lengths.iter().filter(|&&l| l == 1).count();
        let void_count = sorted_lengths.iter().filter(|&&l| l == 0).count();

        if singleton_count == 0 && void_count == 0 && doubleton_count <= 1 {
            Shape::Balanced
        } else if longest <= 6 && void_count == 0 && (singleton_count == 1 || doubleton_count == 2)
        {
            Shape::SemiBalanced
        } else {
            Shape::Unbalanced
        }
    }

    pub fn is_balanced(&self) -> bool {
        matches!(self.shape(), Shape::Balanced)
    }

    /// The longest suit; among equal lengths the higher-ranking suit wins.
    pub fn longest_suit(&self) -> Suit {
        let lengths = self.lengths();
        let mut longest = Suit::Clubs;
        for suit in Suit::ALL {
            if lengths[suit.idx()] >= lengths[longest.idx()] {
                longest = suit;
            }
        }
        longest
    }

    /// Count how many of the top N honors (A, K, Q, J, T) the hand holds in a suit.
    ///
    /// `top_honors(suit, 3)` counts honors among {A, K, Q}.
    /// `top_honors(suit, 5)` counts honors among {A, K, Q, J, T}.
    pub fn top_honors(&self, suit: Suit, n: u8) -> u8 {
        const HONOR_RANKS: [Rank; 5] = [Rank::Ace, Rank::King, Rank::Queen, Rank::Jack, Rank::Ten];
        let top_n = &HONOR_RANKS[..(n as usize).min(HONOR_RANKS.len())];
        self.cards
            .iter()
            .filter(|c| c.suit == suit && top_n.contains(&c.rank))
            .count() as u8
    }

    /// Two of the top three or three of the top five honors.
    pub fn is_good_suit(&self, suit: Suit) -> bool {
        self.top_honors(suit, 3) >= 2 || self.top_honors(suit, 5) >= 3
    }

    pub fn stopper(&self, suit: Suit) -> Stopper {
        let len = self.length(suit);
        let has = |rank| self.has(suit, rank);
        if has(Rank::Ace) || (has(Rank::King) && has(Rank::Queen)) {
            Stopper::Solid
        } else if (has(Rank::King) && len >= 2)
            || (has(Rank::Queen) && len >= 3)
            || (has(Rank::Jack) && len >= 4)
        {
            Stopper::Partial
        } else {
            Stopper::None
        }
    }
}

/// Spades first, then hearts, diamonds, clubs; high cards first within a suit.
fn sort_cards(cards: &mut [Card]) {
    cards.sort_by(|a, b| b.suit.cmp(&a.suit).then(b.rank.cmp(&a.rank)));
}
