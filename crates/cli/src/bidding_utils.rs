use engine::trace::{DecisionTrace, Outcome};
use engine::{BidDecision, Features};
use tracing_subscriber::EnvFilter;
use types::{Auction, Board, Call, Hand, ParseCallError, Position, Suit, Vulnerability};

/// Log to stderr, filtered by `RUST_LOG` (default `warn`).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

pub fn get_hand_suits(hand: &Hand) -> Vec<String> {
    [Suit::Spades, Suit::Hearts, Suit::Diamonds, Suit::Clubs]
        .iter()
        .map(|&suit| {
            let cards: String = hand
                .cards()
                .iter()
                .filter(|c| c.suit == suit)
                .map(|c| c.rank.to_char())
                .collect();
            format!(
                "{}: {}",
                suit.to_char(),
                if cards.is_empty() { "-" } else { &cards }
            )
        })
        .collect()
}

pub fn format_hands_table(board: &Board) -> String {
    let [n, e, s, w] = [
        Position::North,
        Position::East,
        Position::South,
        Position::West,
    ]
    .map(|p| get_hand_suits(board.hand(p)));
    let indent = "        ";

    let mut lines = vec![format!("{indent}North")];
    lines.extend(n.iter().map(|s| format!("{indent}{s}")));
    lines.push(String::new());
    lines.push(format!("{:<20} East", "West"));
    lines.extend(w.iter().zip(&e).map(|(w, e)| format!("{w:<20} {e}")));
    lines.push(String::new());
    lines.push(format!("{indent}South"));
    lines.extend(s.iter().map(|s| format!("{indent}{s}")));
    lines.join("\n") + "\n"
}

pub fn parse_calls(s: &str) -> Result<Vec<Call>, ParseCallError> {
    s.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(str::parse)
        .collect()
}

/// One hand in an auction, as used by the bidding vectors:
/// `["Hand", "ExpectedBid", "Auction"?, "Vulnerability"?]`, dealer North.
#[derive(Debug, Clone)]
pub struct TestCase {
    pub hand: Hand,
    pub auction: Auction,
    pub expected: Option<Call>,
}

pub fn parse_test_case(test_case_json: &str) -> Result<TestCase, String> {
    let parts: Vec<String> =
        serde_json::from_str(test_case_json).map_err(|e| format!("Invalid test case JSON: {e}"))?;
    let hand_str = parts.first().ok_or("Empty test case")?;
    let hand = Hand::parse(hand_str).map_err(|e| e.to_string())?;
    hand.validate().map_err(|e| e.to_string())?;

    let expected = match parts.get(1).map(String::as_str) {
        None | Some("") => None,
        Some(s) => Some(s.parse::<Call>().map_err(|e| e.to_string())?),
    };
    let history = parse_calls(parts.get(2).map_or("", String::as_str)).map_err(|e| e.to_string())?;
    let vuln_str = parts.get(3).map_or("None", String::as_str);
    let vulnerability =
        Vulnerability::parse(vuln_str).ok_or_else(|| format!("Unknown vulnerability {vuln_str:?}"))?;
    let auction =
        Auction::from_calls(Position::North, vulnerability, history).map_err(|e| e.to_string())?;

    Ok(TestCase {
        hand,
        auction,
        expected,
    })
}

pub fn format_row(idx: usize, pos: Position, call: &str, source: &str, desc: &str) -> String {
    format!(
        "{:<3} | {:<3} | {:<5} | {:<30} | {}",
        idx,
        pos.to_char(),
        call,
        source,
        desc
    )
}

pub fn format_table_header() -> String {
    format!(
        "{:<3} | {:<3} | {:<5} | {:<30} | Rationale\n{:-<3}-+-{:-<3}-+-{:-<5}-+-{:-<30}-+---------------------------\n",
        "Idx", "Pos", "Call", "Source", "", "", "", ""
    )
}

pub fn format_decision_row(idx: usize, pos: Position, decision: &BidDecision) -> String {
    let source = decision.source.unwrap_or("-");
    let desc = if decision.forcing.is_forcing() {
        format!("{} [{:?}]", decision.rationale, decision.forcing)
    } else {
        decision.rationale.clone()
    };
    format_row(idx, pos, &decision.call.render(), source, &desc)
}

pub fn format_features(features: &Features) -> String {
    let hand = &features.hand;
    let lengths: Vec<String> = Suit::ALL
        .iter()
        .rev()
        .map(|&s| format!("{}:{}", s.to_char(), hand.length(s)))
        .collect();
    format!(
        "  Role: {:?}\n  Points: {}\n  Shape: {:?} ({})\n  Forcing: {:?}{}\n",
        features.role(),
        hand.points,
        hand.shape,
        lengths.join(" "),
        features.forcing.level,
        if features.forcing.must_bid {
            ", must bid"
        } else {
            ""
        }
    )
}

pub fn format_full_trace(bid_num: usize, trace: &DecisionTrace) -> String {
    let mut lines = vec![
        format!("\nFull Trace for Bid {bid_num} ({}):", trace.position),
        "=======================".to_string(),
    ];
    if let Some(features) = &trace.features {
        lines.push("\nFeatures:".to_string());
        lines.push(format_features(features));
    }

    lines.push("Candidates:".to_string());
    for c in &trace.candidates {
        let mark = match c.outcome {
            Outcome::Valid | Outcome::Insufficient if Some(c.call) == trace.promoted_from => "^",
            Outcome::Valid if Some(c.call) == trace.selected => "*",
            Outcome::Valid | Outcome::Insufficient => "✓",
            Outcome::Rejected(_) | Outcome::PassWhileForced => "✗",
        };
        lines.push(format!(
            "  {mark} [{:>3}] {:<5} {:<30} {} ({})",
            c.priority,
            c.call.render(),
            c.source,
            c.rationale,
            c.outcome
        ));
    }
    for fault in &trace.faults {
        lines.push(format!("  ! {} faulted: {}", fault.source, fault.message));
    }
    if let (Some(from), Some(to)) = (trace.promoted_from, trace.selected) {
        lines.push(format!("Promoted {} to {}", from.render(), to.render()));
    }
    lines.push("=======================\n".to_string());
    lines.join("\n")
}
