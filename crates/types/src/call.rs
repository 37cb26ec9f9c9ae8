use crate::error::ParseCallError;
use crate::strain::Strain;
use crate::suit::Suit;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Call {
    Pass,
    Double,
    Redouble,
    Bid { level: u8, strain: Strain },
}

impl Call {
    pub const fn bid(level: u8, strain: Strain) -> Self {
        Call::Bid { level, strain }
    }

    pub fn is_bid(&self) -> bool {
        matches!(self, Call::Bid { .. })
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, Call::Pass)
    }

    /// Returns the level of this call, if it's a bid.
    pub fn level(&self) -> Option<u8> {
        match self {
            Call::Bid { level, .. } => Some(*level),
            _ => None,
        }
    }

    /// Returns the strain of this call, if it's a bid.
    pub fn strain(&self) -> Option<Strain> {
        match self {
            Call::Bid { strain, .. } => Some(*strain),
            _ => None,
        }
    }

    /// Returns the suit of this call, if it's a suited bid.
    pub fn suit(&self) -> Option<Suit> {
        self.strain().and_then(|s| s.to_suit())
    }

    /// Total order over bids by `(level, strain)`. Pass, double and redouble
    /// are not part of the order and yield `None`.
    pub fn compare_bids(&self, other: &Call) -> Option<Ordering> {
        match (self, other) {
            (
                Call::Bid { level, strain },
                Call::Bid {
                    level: other_level,
                    strain: other_strain,
                },
            ) => Some(level.cmp(other_level).then(strain.cmp(other_strain))),
            _ => None,
        }
    }

    /// True for a bid at or above game in its strain.
    pub fn is_game_or_higher(&self) -> bool {
        match self {
            Call::Bid { level, strain } => *level >= strain.game_level(),
            _ => false,
        }
    }

    pub fn render(self) -> String {
        match self {
            Call::Pass => "P".to_string(),
            Call::Double => "X".to_string(),
            Call::Redouble => "XX".to_string(),
            Call::Bid { level, strain } => format!("{}{}", level, strain.to_char()),
        }
    }
}

/// Compare two bids by `(level, strain)`. Non-bids compare equal to
/// everything; use [`Call::compare_bids`] to tell the cases apart.
pub fn compare(a: &Call, b: &Call) -> Ordering {
    a.compare_bids(b).unwrap_or(Ordering::Equal)
}

impl FromStr for Call {
    type Err = ParseCallError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_uppercase();
        if s.is_empty() {
            return Err(ParseCallError::Empty);
        }
        match s.as_str() {
            "P" | "PASS" => return Ok(Call::Pass),
            "X" | "DBL" | "DOUBLE" => return Ok(Call::Double),
            "XX" | "RDBL" | "REDOUBLE" => return Ok(Call::Redouble),
            _ => {}
        }
        let mut chars = s.chars();
        let level = chars
            .next()
            .and_then(|c| c.to_digit(10))
            .map(|d| d as u8)
            .filter(|l| (1..=7).contains(l))
            .ok_or_else(|| ParseCallError::Unrecognized(s.clone()))?;
        let rest: String = chars.collect();
        let strain = match rest.as_str() {
            "NT" => Some(Strain::NoTrump),
            r if r.chars().count() == 1 => r.chars().next().and_then(Strain::from_char),
            _ => None,
        }
        .ok_or_else(|| ParseCallError::Unrecognized(s.clone()))?;
        Ok(Call::Bid { level, strain })
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(s: &str) -> Call {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_calls() {
        assert_eq!(call("p"), Call::Pass);
        assert_eq!(call("Dbl"), Call::Double);
        assert_eq!(call("XX"), Call::Redouble);
        assert_eq!(call("1N"), Call::bid(1, Strain::NoTrump));
        assert_eq!(call("3NT"), Call::bid(3, Strain::NoTrump));
        assert_eq!(call("2h"), Call::bid(2, Strain::Hearts));
        assert!("8C".parse::<Call>().is_err());
        assert!("1Z".parse::<Call>().is_err());
        assert_eq!("".parse::<Call>(), Err(ParseCallError::Empty));
    }

    #[test]
    fn test_compare_bids() {
        assert_eq!(compare(&call("1C"), &call("1D")), Ordering::Less);
        assert_eq!(compare(&call("1N"), &call("2C")), Ordering::Less);
        assert_eq!(compare(&call("2S"), &call("2H")), Ordering::Greater);
        assert_eq!(call("3D").compare_bids(&call("3D")), Some(Ordering::Equal));
        assert_eq!(Call::Pass.compare_bids(&call("1C")), None);
        assert_eq!(call("1C").compare_bids(&Call::Double), None);
    }

    #[test]
    fn test_game_level() {
        assert!(call("3N").is_game_or_higher());
        assert!(!call("3S").is_game_or_higher());
        assert!(call("4H").is_game_or_higher());
        assert!(!call("4D").is_game_or_higher());
        assert!(call("5C").is_game_or_higher());
        assert!(!Call::Pass.is_game_or_higher());
    }

    #[test]
    fn test_render_roundtrip() {
        for s in ["P", "X", "XX", "1C", "4S", "7N"] {
            assert_eq!(call(s).render(), s);
        }
    }
}
