use crate::auction::Auction;
use crate::board::{Board, Position, Vulnerability};
use crate::call::Call;
use crate::card::Card;
use crate::error::IdentifierError;
use crate::hand::Hand;

const HEX: &[u8; 16] = b"0123456789abcdef";

/// Imports a board and optionally an auction from a deal identifier.
/// Format: `<board_number>-<deal_hex>[:<calls>]`, calls comma or space separated.
///
/// Dealer and vulnerability follow the standard board rotation.
pub fn import_board(identifier: &str) -> Result<(Board, Option<Auction>), IdentifierError> {
    let (board_part, deal_part) = identifier
        .trim()
        .split_once('-')
        .ok_or_else(|| IdentifierError::Malformed(identifier.to_string()))?;
    let board_number: u32 = board_part
        .parse()
        .map_err(|_| IdentifierError::BoardNumber(board_part.to_string()))?;

    let (deal, calls) = match deal_part.split_once(':') {
        Some((deal, calls)) => (deal, Some(calls)),
        None => (deal_part, None),
    };

    let board = Board::new(
        Position::dealer_from_board_number(board_number),
        Vulnerability::from_board_number(board_number),
        import_hex_deal(deal)?,
    );

    let auction = calls
        .map(|calls| import_calls(&board, calls))
        .transpose()?;
    Ok((board, auction))
}

fn import_calls(board: &Board, calls: &str) -> Result<Auction, IdentifierError> {
    let separator = if calls.contains(',') { ',' } else { ' ' };
    let mut auction = Auction::with_vulnerability(board.dealer, board.vulnerability);
    for name in calls.split(separator).map(str::trim).filter(|s| !s.is_empty()) {
        auction.add_call(name.parse::<Call>()?)?;
    }
    Ok(auction)
}

/// Each hex digit packs the owners of two consecutive cards (by [`Card::id`]):
/// `high_owner * 4 + low_owner`, owners indexed by [`Position::idx`].
pub fn import_hex_deal(identifier: &str) -> Result<[Hand; 4], IdentifierError> {
    if identifier.len() != 26 {
        return Err(IdentifierError::Deal(identifier.to_string()));
    }

    let mut cards: [Vec<Card>; 4] = Default::default();
    for (char_idx, c) in identifier.chars().enumerate() {
        let value = c
            .to_digit(16)
            .ok_or_else(|| IdentifierError::Deal(identifier.to_string()))? as usize;
        for (offset, owner) in [(0, value / 4), (1, value % 4)] {
            if let Some(card) = Card::from_id((char_idx * 2 + offset) as u8) {
                cards[owner].push(card);
            }
        }
    }

    Ok(cards.map(Hand::new))
}

pub fn export_board(board: &Board, board_number: u32, auction: Option<&Auction>) -> String {
    let mut identifier = format!("{}-{}", board_number, export_hex_deal(&board.hands));
    if let Some(a) = auction.filter(|a| !a.is_empty()) {
        let calls: Vec<String> = a.calls().iter().map(|c| c.render()).collect();
        identifier.push(':');
        identifier.push_str(&calls.join(","));
    }
    identifier
}

pub fn export_hex_deal(hands: &[Hand; 4]) -> String {
    let mut owner = [0u8; 52];
    for (pos_idx, hand) in hands.iter().enumerate() {
        for card in hand.cards() {
            owner[card.id() as usize] = pos_idx as u8;
        }
    }

    owner
        .chunks(2)
        .map(|pair| HEX[(pair[0] * 4 + pair[1]) as usize] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strain::Strain;

    fn dealt_round_robin() -> [Hand; 4] {
        let mut cards: [Vec<Card>; 4] = Default::default();
        for card in Card::deck() {
            cards[card.id() as usize % 4].push(card);
        }
        cards.map(Hand::new)
    }

    #[test]
    fn test_hex_deal_roundtrip() {
        let hands = dealt_round_robin();
        let exported = export_hex_deal(&hands);
        assert_eq!(exported.len(), 26);
        let imported = import_hex_deal(&exported).unwrap();
        for (hand, back) in hands.iter().zip(imported.iter()) {
            assert_eq!(back.cards().len(), 13);
            assert_eq!(hand, back);
            assert!(back.validate().is_ok());
        }
    }

    #[test]
    fn test_import_board_identifier() {
        // Every digit 0 puts every card with North.
        let identifier = "1-00000000000000000000000000:1S,P,X,XX";
        let (board, auction) = import_board(identifier).unwrap();

        assert_eq!(board.dealer, Position::North);
        assert_eq!(board.vulnerability, Vulnerability::None);
        assert_eq!(board.hand(Position::North).cards().len(), 52);

        let a = auction.unwrap();
        assert_eq!(
            a.calls(),
            &[
                Call::bid(1, Strain::Spades),
                Call::Pass,
                Call::Double,
                Call::Redouble
            ]
        );
    }

    #[test]
    fn test_import_rejects_bad_input() {
        assert!(matches!(
            import_board("nodash"),
            Err(IdentifierError::Malformed(_))
        ));
        assert!(matches!(
            import_board("x-00000000000000000000000000"),
            Err(IdentifierError::BoardNumber(_))
        ));
        assert!(matches!(import_board("1-0000"), Err(IdentifierError::Deal(_))));
        assert!(matches!(
            import_board("1-0000000000000000000000000z"),
            Err(IdentifierError::Deal(_))
        ));
        assert!(matches!(
            import_board("1-00000000000000000000000000:1S,1H"),
            Err(IdentifierError::Auction(_))
        ));
        assert!(matches!(
            import_board("1-00000000000000000000000000:1Q"),
            Err(IdentifierError::Call(_))
        ));
    }

    #[test]
    fn test_export_board_with_auction() {
        let hands = dealt_round_robin();
        let board = Board::new(Position::East, Vulnerability::NS, hands);
        let auction = Auction::bidding(Position::East, "1N P 2C");
        let id = export_board(&board, 2, Some(&auction));
        assert!(id.starts_with("2-"));
        assert!(id.ends_with(":1N,P,2C"));
        let (back, back_auction) = import_board(&id).unwrap();
        assert_eq!(back, board);
        assert_eq!(back_auction, Some(auction));
    }
}
