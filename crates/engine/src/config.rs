//! Bidding system configuration.
//!
//! Point thresholds and the forcing trigger table are data, loaded from YAML.
//! The standard system ships embedded in the binary; alternates can be read
//! from disk.

use crate::error::ConfigError;
use crate::forcing::ForcingLevel;
use serde::{Deserialize, Serialize};
use std::path::Path;
use types::{Call, Hand, Rank};

const STANDARD_SYSTEM: &str = include_str!("system/standard.yaml");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SystemConfig {
    pub name: String,
    #[serde(default)]
    pub points: PointWeights,
    pub thresholds: Thresholds,
    #[serde(default)]
    pub validation: ValidationConfig,
    #[serde(default)]
    pub forcing: ForcingConfig,
}

/// Inclusive point range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub min: u8,
    pub max: u8,
}

impl Range {
    pub const fn new(min: u8, max: u8) -> Self {
        Self { min, max }
    }

    pub const fn at_least(min: u8) -> Self {
        Self { min, max: u8::MAX }
    }

    pub fn contains(&self, points: u8) -> bool {
        (self.min..=self.max).contains(&points)
    }
}

impl std::fmt::Display for Range {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.max == u8::MAX {
            write!(f, "{}+", self.min)
        } else {
            write!(f, "{}-{}", self.min, self.max)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PointWeights {
    pub ace: u8,
    pub king: u8,
    pub queen: u8,
    pub jack: u8,
}

impl Default for PointWeights {
    fn default() -> Self {
        Self {
            ace: 4,
            king: 3,
            queen: 2,
            jack: 1,
        }
    }
}

impl PointWeights {
    pub fn weight(&self, rank: Rank) -> u8 {
        match rank {
            Rank::Ace => self.ace,
            Rank::King => self.king,
            Rank::Queen => self.queen,
            Rank::Jack => self.jack,
            _ => 0,
        }
    }

    pub fn count(&self, hand: &Hand) -> u8 {
        hand.cards()
            .iter()
            .fold(0u8, |total, c| total.saturating_add(self.weight(c.rank)))
    }

    /// Points in the whole deck. Must fit a `u8` so any hand's count does.
    pub fn deck_total(&self) -> u16 {
        4 * (u16::from(self.ace)
            + u16::from(self.king)
            + u16::from(self.queen)
            + u16::from(self.jack))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Thresholds {
    pub opening_min: u8,
    pub rule_of_twenty: u8,
    pub rule_of_fifteen: u8,
    pub one_notrump: Range,
    pub two_notrump: Range,
    pub strong_two_clubs: u8,
    pub weak_two: Range,
    pub preempt: Range,
    pub response_min: u8,
    pub two_level_response_min: u8,
    pub single_raise: Range,
    pub limit_raise: Range,
    pub jacoby_2nt_min: u8,
    pub jump_shift_min: u8,
    pub overcall_one_level: Range,
    pub overcall_two_level: Range,
    pub weak_jump_overcall: Range,
    pub notrump_overcall: Range,
    pub two_suited_min: u8,
    pub takeout_double_min: u8,
    pub takeout_double_any_shape: u8,
    pub negative_double_min: u8,
    pub game: u8,
    pub slam: u8,
    pub grand_slam: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValidationConfig {
    /// Cards required in a named suit when the candidate does not say.
    pub min_suit_length: u8,
    /// Points required for a bid at each level when the candidate does not say.
    pub level_minimums: [u8; 7],
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_suit_length: 4,
            level_minimums: [6, 6, 8, 10, 10, 12, 14],
        }
    }
}

impl ValidationConfig {
    pub fn level_minimum(&self, level: u8) -> u8 {
        let idx = usize::from(level.clamp(1, 7)) - 1;
        self.level_minimums[idx]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ForcingConfig {
    #[serde(default)]
    pub triggers: Vec<ForcingTrigger>,
}

/// One row of the forcing table. Convention modules add their own forcing
/// calls on top of these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ForcingTrigger {
    /// A specific opening call, e.g. an artificial strong 2C.
    StrongOpening { call: String, status: ForcingLevel },
    /// A new strain by an unpassed responder at or above `min_level`.
    NewSuitResponse { min_level: u8, status: ForcingLevel },
    /// Responder's jump in a new suit.
    JumpShift { status: ForcingLevel },
    /// A bid in the opponents' suit after partner has acted.
    OpponentCuebid { status: ForcingLevel },
}

impl SystemConfig {
    /// The bundled standard system.
    pub fn standard() -> Result<Self, ConfigError> {
        Self::from_yaml(STANDARD_SYSTEM)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: SystemConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&yaml)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let deck_total = self.points.deck_total();
        if deck_total > u16::from(u8::MAX) {
            return Err(ConfigError::Invalid(format!(
                "points: the deck totals {deck_total} points, more than {}",
                u8::MAX
            )));
        }
        let t = &self.thresholds;
        let ranges = [
            ("thresholds.one_notrump", t.one_notrump),
            ("thresholds.two_notrump", t.two_notrump),
            ("thresholds.weak_two", t.weak_two),
            ("thresholds.preempt", t.preempt),
            ("thresholds.single_raise", t.single_raise),
            ("thresholds.limit_raise", t.limit_raise),
            ("thresholds.overcall_one_level", t.overcall_one_level),
            ("thresholds.overcall_two_level", t.overcall_two_level),
            ("thresholds.weak_jump_overcall", t.weak_jump_overcall),
            ("thresholds.notrump_overcall", t.notrump_overcall),
        ];
        for (field, range) in ranges {
            if range.min > range.max {
                return Err(ConfigError::EmptyRange {
                    field,
                    min: range.min,
                    max: range.max,
                });
            }
        }
        if !(t.game <= t.slam && t.slam <= t.grand_slam) {
            return Err(ConfigError::Invalid(format!(
                "thresholds: game {} <= slam {} <= grand_slam {} does not hold",
                t.game, t.slam, t.grand_slam
            )));
        }
        if !(1..=13).contains(&self.validation.min_suit_length) {
            return Err(ConfigError::Invalid(format!(
                "validation.min_suit_length: {} is not a suit length",
                self.validation.min_suit_length
            )));
        }
        for trigger in &self.forcing.triggers {
            match trigger {
                ForcingTrigger::StrongOpening { call, .. } => {
                    parse_trigger_call(call)?;
                }
                ForcingTrigger::NewSuitResponse { min_level, .. } if !(1..=7).contains(min_level) => {
                    return Err(ConfigError::Invalid(format!(
                        "forcing.triggers: NewSuitResponse min_level {min_level} is not a level"
                    )));
                }
                _ => {}
            }
        }
        Ok(())
    }
}

pub(crate) fn parse_trigger_call(value: &str) -> Result<Call, ConfigError> {
    value.parse().map_err(|source| ConfigError::BadCall {
        field: "forcing.triggers.call",
        value: value.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_system_loads() {
        let config = SystemConfig::standard().expect("bundled system parses");
        assert_eq!(config.points, PointWeights::default());
        assert_eq!(config.thresholds.one_notrump, Range::new(15, 17));
        assert_eq!(config.thresholds.strong_two_clubs, 22);
        assert!(config.forcing.triggers.contains(&ForcingTrigger::StrongOpening {
            call: "2C".into(),
            status: ForcingLevel::GameForcing,
        }));
    }

    #[test]
    fn test_deserialize_trigger() {
        let yaml = "type: NewSuitResponse\nmin_level: 2\nstatus: OneRoundForcing\n";
        let trigger: ForcingTrigger = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            trigger,
            ForcingTrigger::NewSuitResponse {
                min_level: 2,
                status: ForcingLevel::OneRoundForcing
            }
        );
    }

    #[test]
    fn test_rejects_unknown_fields() {
        let yaml = STANDARD_SYSTEM.replace("thresholds:", "thresholds:\n  bogus: 3");
        assert!(matches!(
            SystemConfig::from_yaml(&yaml),
            Err(ConfigError::Yaml(_))
        ));
    }

    #[test]
    fn test_rejects_oversized_point_weights() {
        let mut config = SystemConfig::standard().unwrap();
        config.points = PointWeights {
            ace: 40,
            king: 30,
            queen: 20,
            jack: 10,
        };
        assert_eq!(config.points.deck_total(), 400);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        // The largest weights that still fit.
        config.points = PointWeights {
            ace: 20,
            king: 20,
            queen: 15,
            jack: 8,
        };
        assert_eq!(config.points.deck_total(), 252);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_point_count_saturates() {
        let weights = PointWeights {
            ace: 200,
            king: 200,
            queen: 0,
            jack: 0,
        };
        let hand = Hand::parse("AK32.AK32.32.432").unwrap();
        assert_eq!(weights.count(&hand), u8::MAX);
    }

    #[test]
    fn test_rejects_empty_range() {
        let mut config = SystemConfig::standard().unwrap();
        config.thresholds.weak_two = Range::new(11, 5);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyRange {
                field: "thresholds.weak_two",
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_bad_trigger_call() {
        let mut config = SystemConfig::standard().unwrap();
        config.forcing.triggers.push(ForcingTrigger::StrongOpening {
            call: "9Q".into(),
            status: ForcingLevel::GameForcing,
        });
        assert!(matches!(
            config.validate(),
            Err(ConfigError::BadCall { .. })
        ));
    }

    #[test]
    fn test_from_path_reports_missing_file() {
        let err = SystemConfig::from_path("/nonexistent/system.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/system.yaml"));
    }

    #[test]
    fn test_custom_weights() {
        let weights = PointWeights {
            ace: 3,
            king: 2,
            queen: 1,
            jack: 0,
        };
        let hand = Hand::parse("AKQJ.2.3.4").unwrap();
        assert_eq!(weights.count(&hand), 6);
        assert_eq!(PointWeights::default().count(&hand), 10);
    }

    #[test]
    fn test_level_minimum_clamps() {
        let validation = ValidationConfig::default();
        assert_eq!(validation.level_minimum(1), 6);
        assert_eq!(validation.level_minimum(7), 14);
        assert_eq!(validation.level_minimum(9), 14);
    }
}
