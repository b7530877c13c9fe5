//! Scoring of game-result submissions.
//!
//! A submission is scored in six steps: team resolution, difficulty resolution, virus count,
//! raw score, clear/failed adjustment and rank assignment. The engine owns no state besides
//! its configuration and performs no I/O.

use crate::{
    config::ScoringConfig,
    error::ValidationError,
    model::{Difficulty, GameResult, PlayerResult, RawSubmission, Rank, Team},
};

/// Captured panels seen from the player's team.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeamPoints {
    pub weak: i64,
    pub same: i64,
    pub strong: i64,
}

impl TeamPoints {
    pub fn resolve(team: Team, raw: &RawSubmission) -> Self {
        let (red, green, blue) = (
            i64::from(raw.red_point),
            i64::from(raw.green_point),
            i64::from(raw.blue_point),
        );
        match team {
            Team::Red => TeamPoints {
                weak: blue,
                same: red,
                strong: green,
            },
            Team::Green => TeamPoints {
                weak: red,
                same: green,
                strong: blue,
            },
            Team::Blue => TeamPoints {
                weak: green,
                same: blue,
                strong: red,
            },
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScoreEngine {
    config: ScoringConfig,
}

impl ScoreEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Scores `raw`.
    ///
    /// Unknown team or difficulty codes and negative panel counts or remaining time are
    /// rejected before any arithmetic happens.
    pub fn compute_result(&self, raw: &RawSubmission) -> Result<PlayerResult, ValidationError> {
        let team = Team::from_code(raw.team)?;
        let difficulty = Difficulty::from_code(raw.difficulty)?;
        for (field, value) in [
            ("redPoint", raw.red_point),
            ("bluePoint", raw.blue_point),
            ("greenPoint", raw.green_point),
            ("remainingTime", raw.remaining_time),
        ] {
            if value < 0 {
                return Err(ValidationError::Negative { field, value });
            }
        }

        let points = TeamPoints::resolve(team, raw);
        let virusnum = self.virusnum(&points);
        let raw_score = virusnum as f64 * self.config.score_per_virus;

        // hit_point == 0 counts as a failure
        let (game_result, score, rank_bonus) = if raw.hit_point > 0 {
            (
                GameResult::Clear,
                raw_score * self.config.clear_multiplier,
                self.config.rank_bonus(difficulty),
            )
        } else {
            (
                GameResult::Failed,
                raw_score * self.config.failed_multiplier,
                0.0,
            )
        };

        Ok(PlayerResult {
            name: raw.name.clone(),
            team: Some(team),
            difficulty: Some(difficulty),
            score,
            rank: Some(self.classify(difficulty, score + rank_bonus)),
            virusnum,
            game_result,
            red_point: raw.red_point,
            blue_point: raw.blue_point,
            green_point: raw.green_point,
            hit_point: raw.hit_point,
            remaining_time: raw.remaining_time,
        })
    }

    pub fn virusnum(&self, points: &TeamPoints) -> i64 {
        let weights = &self.config.weights;
        points.weak * weights.weak + points.same * weights.same + points.strong * weights.strong
    }

    /// Rank of a rank-bonus-adjusted score. First matching threshold wins.
    pub fn classify(&self, difficulty: Difficulty, adjusted_score: f64) -> Rank {
        let coefficients = &self.config.coefficients;
        [
            (Rank::S, coefficients.s),
            (Rank::A, coefficients.a),
            (Rank::B, coefficients.b),
            (Rank::C, coefficients.c),
        ]
        .into_iter()
        .find(|(_, coefficient)| adjusted_score >= self.config.threshold(difficulty, *coefficient))
        .map(|(rank, _)| rank)
        .unwrap_or(Rank::Err)
    }
}

pub fn empty_result() -> PlayerResult {
    PlayerResult::empty()
}
