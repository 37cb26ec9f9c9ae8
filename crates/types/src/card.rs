use crate::rank::Rank;
use crate::suit::Suit;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Card {
    pub suit: Suit,
    pub rank: Rank,
}

impl Card {
    pub fn new(suit: Suit, rank: Rank) -> Self {
        Self { suit, rank }
    }

    /// Dense index in `0..52`, clubs two first, spade ace last.
    pub fn id(self) -> u8 {
        (self.suit.idx() * 13 + self.rank.idx()) as u8
    }

    pub fn from_id(id: u8) -> Option<Self> {
        if id >= 52 {
            return None;
        }
        let suit = Suit::ALL[(id / 13) as usize];
        let rank = Rank::ALL[(id % 13) as usize];
        Some(Self { suit, rank })
    }

    /// The full 52-card deck in id order.
    pub fn deck() -> Vec<Card> {
        (0..52).filter_map(Card::from_id).collect()
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.suit.to_char(), self.rank.to_char())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_id_mapping() {
        assert_eq!(Card::new(Suit::Clubs, Rank::Two).id(), 0);
        assert_eq!(Card::new(Suit::Clubs, Rank::Ace).id(), 12);
        assert_eq!(Card::new(Suit::Spades, Rank::Ace).id(), 51);
        assert_eq!(Card::from_id(52), None);
    }

    #[test]
    fn test_deck_is_complete() {
        let deck = Card::deck();
        assert_eq!(deck.len(), 52);
        for (i, card) in deck.iter().enumerate() {
            assert_eq!(card.id() as usize, i);
        }
    }
}
