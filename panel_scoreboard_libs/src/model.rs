use crate::error::ValidationError;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Player team. Each team captures the panels of its own color at weight 1, the color it beats
/// at weight 0 and the color that beats it at weight 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Team {
    Red,
    Green,
    Blue,
}

impl Team {
    pub const ALL: [Team; 3] = [Team::Red, Team::Green, Team::Blue];

    pub fn from_code(code: i32) -> Result<Self, ValidationError> {
        match code {
            1 => Ok(Team::Red),
            2 => Ok(Team::Green),
            3 => Ok(Team::Blue),
            _ => Err(ValidationError::UnknownTeam(code)),
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            Team::Red => 1,
            Team::Green => 2,
            Team::Blue => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Team::Red => "Red",
            Team::Green => "Green",
            Team::Blue => "Blue",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
    Lunatic,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Normal,
        Difficulty::Hard,
        Difficulty::Lunatic,
    ];

    pub fn from_code(code: i32) -> Result<Self, ValidationError> {
        match code {
            1 => Ok(Difficulty::Easy),
            2 => Ok(Difficulty::Normal),
            3 => Ok(Difficulty::Hard),
            4 => Ok(Difficulty::Lunatic),
            _ => Err(ValidationError::UnknownDifficulty(code)),
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Normal => 2,
            Difficulty::Hard => 3,
            Difficulty::Lunatic => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
            Difficulty::Lunatic => "Lunatic",
        }
    }
}

/// Letter rank. `Err` is only produced when a score falls below the C threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rank {
    Err,
    C,
    B,
    A,
    S,
}

impl Rank {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rank::S => "S",
            Rank::A => "A",
            Rank::B => "B",
            Rank::C => "C",
            Rank::Err => "Err",
        }
    }
}

macro_rules! impl_text_conversion {
    ($($name:ident => [$($variant:ident),*]),*) => {
        $(
            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                    write!(f, "{}", self.as_str())
                }
            }

            impl FromStr for $name {
                type Err = String;

                fn from_str(s: &str) -> Result<Self, String> {
                    match s {
                        $(stringify!($variant) => Ok($name::$variant),)*
                        _ => Err(format!("unknown {} `{}`", stringify!($name), s)),
                    }
                }
            }
        )*
    };
}

impl_text_conversion!(
    Team => [Red, Green, Blue],
    Difficulty => [Easy, Normal, Hard, Lunatic],
    Rank => [S, A, B, C, Err]
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum GameResult {
    Failed,
    Clear,
}

impl GameResult {
    pub fn is_clear(&self) -> bool {
        matches!(self, GameResult::Clear)
    }
}

impl From<GameResult> for i32 {
    fn from(result: GameResult) -> i32 {
        match result {
            GameResult::Failed => 0,
            GameResult::Clear => 1,
        }
    }
}

impl TryFrom<i32> for GameResult {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, String> {
        match value {
            0 => Ok(GameResult::Failed),
            1 => Ok(GameResult::Clear),
            _ => Err(format!("unknown game result `{}`", value)),
        }
    }
}

/// Game result exactly as the game master device submitted it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSubmission {
    pub name: String,
    pub team: i32,
    pub difficulty: i32,
    pub red_point: i32,
    pub blue_point: i32,
    pub green_point: i32,
    pub hit_point: i32,
    pub remaining_time: i32,
}

/// Scored game result.
///
/// `team`, `difficulty` and `rank` are only absent in [`PlayerResult::empty`], and serialize
/// as empty strings there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerResult {
    pub name: String,
    #[serde(with = "blank")]
    pub team: Option<Team>,
    #[serde(with = "blank")]
    pub difficulty: Option<Difficulty>,
    pub score: f64,
    #[serde(with = "blank")]
    pub rank: Option<Rank>,
    pub virusnum: i64,
    pub game_result: GameResult,
    pub red_point: i32,
    pub blue_point: i32,
    pub green_point: i32,
    pub hit_point: i32,
    pub remaining_time: i32,
}

impl PlayerResult {
    /// Placeholder shown while no result has been stored yet.
    pub fn empty() -> Self {
        Self {
            name: String::new(),
            team: None,
            difficulty: None,
            score: 0.0,
            rank: None,
            virusnum: 0,
            game_result: GameResult::Failed,
            red_point: 0,
            blue_point: 0,
            green_point: 0,
            hit_point: 0,
            remaining_time: 0,
        }
    }
}

impl Default for PlayerResult {
    fn default() -> Self {
        Self::empty()
    }
}

/// A persisted record together with its row id and insertion time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stored<T> {
    pub id: i64,
    pub created_at: DateTime<Local>,
    #[serde(flatten)]
    pub record: T,
}

mod blank {
    use serde::{de, Deserialize, Deserializer, Serializer};
    use std::{fmt::Display, str::FromStr};

    pub fn serialize<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Display,
        S: Serializer,
    {
        match value {
            Some(value) => serializer.collect_str(value),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        T: FromStr,
        T::Err: Display,
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        if text.is_empty() {
            Ok(None)
        } else {
            text.parse().map(Some).map_err(de::Error::custom)
        }
    }
}
