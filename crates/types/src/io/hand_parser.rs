use crate::card::Card;
use crate::error::HandError;
use crate::hand::Hand;
use crate::rank::Rank;
use crate::suit::Suit;

/// Parses a hand string in the format "Clubs.Diamonds.Hearts.Spades".
///
/// Suits are listed in ascending rank order (C, D, H, S). Card counts are not
/// checked here; call [`Hand::validate`] for that.
pub fn parse_hand(s: &str) -> Result<Hand, HandError> {
    let suits: Vec<&str> = s.trim().split('.').collect();
    if suits.len() != Suit::ALL.len() {
        return Err(HandError::Malformed(s.to_string()));
    }
    let mut cards = Vec::new();
    for (suit, suit_str) in Suit::ALL.into_iter().zip(suits) {
        for c in suit_str.chars().filter(|c| !c.is_whitespace()) {
            let rank = Rank::from_char(c).ok_or_else(|| HandError::Malformed(s.to_string()))?;
            cards.push(Card { suit, rank });
        }
    }
    Ok(Hand::new(cards))
}

/// Render a hand back into "Clubs.Diamonds.Hearts.Spades" form.
pub fn format_hand(hand: &Hand) -> String {
    Suit::ALL
        .iter()
        .map(|&suit| {
            hand.cards()
                .iter()
                .filter(|c| c.suit == suit)
                .map(|c| c.rank.to_char())
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join(".")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_format() {
        let hand = parse_hand("AJ4.73.T86.KQ752").unwrap();
        assert_eq!(hand.cards().len(), 13);
        assert_eq!(hand.length(Suit::Spades), 5);
        assert_eq!(format_hand(&hand), "AJ4.73.T86.KQ752");
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(matches!(parse_hand("AK.QJ"), Err(HandError::Malformed(_))));
        assert!(matches!(
            parse_hand("AZ.QJ.2.3"),
            Err(HandError::Malformed(_))
        ));
    }
}
