use thiserror::Error;

/// Rejected game-result submission.
///
/// Every variant names the wire field that caused the rejection.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ValidationError {
    #[error("team: unknown team code {0}")]
    UnknownTeam(i32),
    #[error("difficulty: unknown difficulty code {0}")]
    UnknownDifficulty(i32),
    #[error("{field}: must be non-negative, but got {value}")]
    Negative { field: &'static str, value: i32 },
}

impl ValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::UnknownTeam(_) => "team",
            ValidationError::UnknownDifficulty(_) => "difficulty",
            ValidationError::Negative { field, .. } => field,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("couldn't parse {key}=`{value}`")]
    Parse { key: &'static str, value: String },
    #[error("invalid scoring configuration: {0}")]
    Invalid(#[from] validator::ValidationErrors),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database operation failed")]
    Database(#[from] sqlx::Error),
    #[error("unexpected value `{value}` in column {column}")]
    Corrupt { column: &'static str, value: String },
}
