use crate::{error::ConfigError, model::Difficulty};
use serde::{Deserialize, Serialize};
use std::{env, fmt::Display, str::FromStr};
use validator::Validate;

/// Panel refresh interval and rank bonus of one difficulty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct DifficultyRule {
    #[validate(range(min = 1))]
    pub panel_interval_ms: u32,
    #[validate(range(min = 0.0))]
    pub rank_bonus: f64,
}

/// Virus weight of weak, same and strong panels.
///
/// Bounded so that a full `i32` panel count times any weight stays within `i64`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct PanelWeights {
    #[validate(range(min = 0, max = 1_000_000))]
    pub weak: i64,
    #[validate(range(min = 0, max = 1_000_000))]
    pub same: i64,
    #[validate(range(min = 0, max = 1_000_000))]
    pub strong: i64,
}

/// Fractions of the theoretical maximum score a rank requires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_coefficient_order"))]
pub struct RankCoefficients {
    #[validate(range(min = 0.0))]
    pub s: f64,
    #[validate(range(min = 0.0))]
    pub a: f64,
    #[validate(range(min = 0.0))]
    pub b: f64,
    #[validate(range(min = 0.0))]
    pub c: f64,
}

fn validate_coefficient_order(
    coefficients: &RankCoefficients,
) -> Result<(), validator::ValidationError> {
    if coefficients.s >= coefficients.a
        && coefficients.a >= coefficients.b
        && coefficients.b >= coefficients.c
    {
        Ok(())
    } else {
        Err(validator::ValidationError::new(
            "rank coefficients must be non-increasing from S to C",
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ScoringConfig {
    #[validate(range(min = 0.0))]
    pub score_per_virus: f64,
    #[validate(range(min = 1))]
    pub play_window_secs: u32,
    #[validate]
    pub easy: DifficultyRule,
    #[validate]
    pub normal: DifficultyRule,
    #[validate]
    pub hard: DifficultyRule,
    #[validate]
    pub lunatic: DifficultyRule,
    #[validate]
    pub weights: PanelWeights,
    #[validate]
    pub coefficients: RankCoefficients,
    #[validate(range(min = 0.0))]
    pub clear_multiplier: f64,
    #[validate(range(min = 0.0))]
    pub failed_multiplier: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            score_per_virus: 600.0,
            play_window_secs: 50,
            easy: DifficultyRule {
                panel_interval_ms: 1500,
                rank_bonus: 0.0,
            },
            normal: DifficultyRule {
                panel_interval_ms: 1000,
                rank_bonus: 0.0,
            },
            hard: DifficultyRule {
                panel_interval_ms: 600,
                rank_bonus: 0.0,
            },
            lunatic: DifficultyRule {
                panel_interval_ms: 300,
                rank_bonus: 10000.0,
            },
            weights: PanelWeights {
                weak: 0,
                same: 1,
                strong: 2,
            },
            coefficients: RankCoefficients {
                s: 0.7,
                a: 0.4,
                b: 0.2,
                c: 0.0,
            },
            clear_multiplier: 1.0,
            failed_multiplier: 0.6,
        }
    }
}

impl ScoringConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from `lookup`, falling back to the defaults for missing keys.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let default = Self::default();

        let config = Self {
            score_per_virus: read(&lookup, "SCORE_PER_VIRUS", default.score_per_virus)?,
            play_window_secs: read(&lookup, "PLAY_WINDOW_SECONDS", default.play_window_secs)?,
            easy: read_rule(
                &lookup,
                "PANEL_INTERVAL_EASY_MS",
                "RANK_BONUS_EASY",
                &default.easy,
            )?,
            normal: read_rule(
                &lookup,
                "PANEL_INTERVAL_NORMAL_MS",
                "RANK_BONUS_NORMAL",
                &default.normal,
            )?,
            hard: read_rule(
                &lookup,
                "PANEL_INTERVAL_HARD_MS",
                "RANK_BONUS_HARD",
                &default.hard,
            )?,
            lunatic: read_rule(
                &lookup,
                "PANEL_INTERVAL_LUNATIC_MS",
                "RANK_BONUS_LUNATIC",
                &default.lunatic,
            )?,
            weights: PanelWeights {
                weak: read(&lookup, "PANEL_WEIGHT_WEAK", default.weights.weak)?,
                same: read(&lookup, "PANEL_WEIGHT_SAME", default.weights.same)?,
                strong: read(&lookup, "PANEL_WEIGHT_STRONG", default.weights.strong)?,
            },
            coefficients: RankCoefficients {
                s: read(&lookup, "RANK_COEFFICIENT_S", default.coefficients.s)?,
                a: read(&lookup, "RANK_COEFFICIENT_A", default.coefficients.a)?,
                b: read(&lookup, "RANK_COEFFICIENT_B", default.coefficients.b)?,
                c: read(&lookup, "RANK_COEFFICIENT_C", default.coefficients.c)?,
            },
            clear_multiplier: read(&lookup, "CLEAR_MULTIPLIER", default.clear_multiplier)?,
            failed_multiplier: read(&lookup, "FAILED_MULTIPLIER", default.failed_multiplier)?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn rule(&self, difficulty: Difficulty) -> &DifficultyRule {
        match difficulty {
            Difficulty::Easy => &self.easy,
            Difficulty::Normal => &self.normal,
            Difficulty::Hard => &self.hard,
            Difficulty::Lunatic => &self.lunatic,
        }
    }

    /// Theoretical number of panels capturable during the play window.
    pub fn max_panel_num(&self, difficulty: Difficulty) -> i64 {
        let window_ms = i64::from(self.play_window_secs) * 1000;
        window_ms / i64::from(self.rule(difficulty).panel_interval_ms)
    }

    pub fn rank_bonus(&self, difficulty: Difficulty) -> f64 {
        self.rule(difficulty).rank_bonus
    }

    pub fn threshold(&self, difficulty: Difficulty, coefficient: f64) -> f64 {
        self.max_panel_num(difficulty) as f64 * self.score_per_virus * coefficient
    }
}

/// Settings of the scoreboard views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreboardConfig {
    /// Number of viruses in the whole event, counted down by every result.
    pub max_virus: i64,
}

impl Default for ScoreboardConfig {
    fn default() -> Self {
        Self { max_virus: 5000 }
    }
}

impl ScoreboardConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            max_virus: read(&lookup, "MAX_VIRUS", Self::default().max_virus)?,
        })
    }
}

fn read_rule(
    lookup: &impl Fn(&str) -> Option<String>,
    interval_key: &'static str,
    bonus_key: &'static str,
    default: &DifficultyRule,
) -> Result<DifficultyRule, ConfigError> {
    Ok(DifficultyRule {
        panel_interval_ms: read(lookup, interval_key, default.panel_interval_ms)?,
        rank_bonus: read(lookup, bonus_key, default.rank_bonus)?,
    })
}

fn read<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr + Display,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Parse { key, value }),
        None => {
            tracing::debug!("{} is not set. Default value `{}` will be used.", key, default);
            Ok(default)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn default_config_is_valid() {
        assert!(ScoringConfig::default().validate().is_ok());
    }

    #[test]
    fn max_panel_num_per_difficulty() {
        let config = ScoringConfig::default();
        assert_eq!(config.max_panel_num(Difficulty::Easy), 33);
        assert_eq!(config.max_panel_num(Difficulty::Normal), 50);
        assert_eq!(config.max_panel_num(Difficulty::Hard), 83);
        assert_eq!(config.max_panel_num(Difficulty::Lunatic), 166);
    }

    #[test]
    fn rank_bonus_only_for_lunatic() {
        let config = ScoringConfig::default();
        assert_eq!(config.rank_bonus(Difficulty::Easy), 0.0);
        assert_eq!(config.rank_bonus(Difficulty::Normal), 0.0);
        assert_eq!(config.rank_bonus(Difficulty::Hard), 0.0);
        assert_eq!(config.rank_bonus(Difficulty::Lunatic), 10000.0);
    }

    #[test]
    fn empty_lookup_gives_defaults() {
        let config = ScoringConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, ScoringConfig::default());

        let scoreboard = ScoreboardConfig::from_lookup(|_| None).unwrap();
        assert_eq!(scoreboard.max_virus, 5000);
    }

    #[test]
    fn override_from_lookup() {
        let config = ScoringConfig::from_lookup(lookup_from(&[
            ("SCORE_PER_VIRUS", "100"),
            ("PANEL_INTERVAL_EASY_MS", "2000"),
            ("RANK_BONUS_LUNATIC", " 500 "),
            ("FAILED_MULTIPLIER", "0.5"),
        ]))
        .unwrap();

        assert_eq!(config.score_per_virus, 100.0);
        assert_eq!(config.max_panel_num(Difficulty::Easy), 25);
        assert_eq!(config.rank_bonus(Difficulty::Lunatic), 500.0);
        assert_eq!(config.failed_multiplier, 0.5);
        assert_eq!(config.clear_multiplier, 1.0);
    }

    #[test]
    fn unparsable_value_names_key() {
        let error = ScoringConfig::from_lookup(lookup_from(&[("PLAY_WINDOW_SECONDS", "fifty")]))
            .unwrap_err();
        match error {
            ConfigError::Parse { key, value } => {
                assert_eq!(key, "PLAY_WINDOW_SECONDS");
                assert_eq!(value, "fifty");
            }
            other => panic!("unexpected error: {:?}", other),
        }

        assert!(ScoreboardConfig::from_lookup(lookup_from(&[("MAX_VIRUS", "many")])).is_err());
    }

    #[test]
    fn reject_zero_interval() {
        let result = ScoringConfig::from_lookup(lookup_from(&[("PANEL_INTERVAL_HARD_MS", "0")]));
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn reject_increasing_coefficients() {
        let result = ScoringConfig::from_lookup(lookup_from(&[("RANK_COEFFICIENT_B", "0.5")]));
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn reject_oversized_weight() {
        let result =
            ScoringConfig::from_lookup(lookup_from(&[("PANEL_WEIGHT_STRONG", "9223372036854775807")]));
        assert!(matches!(result, Err(ConfigError::Invalid(_))));

        let config =
            ScoringConfig::from_lookup(lookup_from(&[("PANEL_WEIGHT_STRONG", "1000000")])).unwrap();
        assert_eq!(config.weights.strong, 1_000_000);
    }

    #[test]
    fn reject_negative_multiplier() {
        let result = ScoringConfig::from_lookup(lookup_from(&[("CLEAR_MULTIPLIER", "-1")]));
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }
}
