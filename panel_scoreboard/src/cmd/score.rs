use anyhow::{Context, Result};
use clap::Args;
use panel_scoreboard_libs::{config::ScoringConfig, model::RawSubmission, ScoreEngine};

#[derive(Debug, Args)]
pub struct ScoreArgs {
    /// Team code: 1 = Red, 2 = Green, 3 = Blue
    #[arg(long)]
    team: i32,
    /// Difficulty code: 1 = Easy, 2 = Normal, 3 = Hard, 4 = Lunatic
    #[arg(long)]
    difficulty: i32,
    #[arg(long, default_value_t = 0)]
    red: i32,
    #[arg(long, default_value_t = 0)]
    blue: i32,
    #[arg(long, default_value_t = 0)]
    green: i32,
    /// Remaining hit points. Zero or less means the game was failed.
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    hit: i32,
    #[arg(long, default_value_t = 0)]
    remaining: i32,
    #[arg(long, default_value = "")]
    name: String,
}

impl From<ScoreArgs> for RawSubmission {
    fn from(args: ScoreArgs) -> Self {
        RawSubmission {
            name: args.name,
            team: args.team,
            difficulty: args.difficulty,
            red_point: args.red,
            blue_point: args.blue,
            green_point: args.green,
            hit_point: args.hit,
            remaining_time: args.remaining,
        }
    }
}

pub async fn run(args: ScoreArgs) -> Result<()> {
    let config = ScoringConfig::from_env().with_context(|| {
        let message = "invalid scoring configuration";
        tracing::error!(message);
        message
    })?;
    let engine = ScoreEngine::new(config);

    let raw = RawSubmission::from(args);
    let result = engine.compute_result(&raw).map_err(|e| {
        tracing::error!("rejected submission: {}", e);
        e
    })?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
