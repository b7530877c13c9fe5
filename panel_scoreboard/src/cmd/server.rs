use crate::{
    cmd::connect_database,
    modules::{
        handlers::{
            index,
            info::{db_debug, info},
            liveness,
            ranking::ranking,
            result::{latest_result, post_result, print_result},
            SharedStore,
        },
        migration::MIGRATOR,
    },
};
use anyhow::{Context, Result};
use axum::{extract::Extension, routing, Router, Server};
use clap::Args;
use panel_scoreboard_libs::{
    config::{ScoreboardConfig, ScoringConfig},
    store::{MemoryScoreStore, PgScoreStore},
    ScoreEngine,
};
use std::{env, net::SocketAddr, sync::Arc};
use tower_http::{cors::CorsLayer, services::ServeDir};

#[derive(Debug, Args)]
pub struct ServerArgs {
    #[arg(long)]
    port: Option<u16>,
    /// Keep results in memory instead of PostgreSQL
    #[arg(long)]
    memory: bool,
}

pub async fn run(args: ServerArgs) -> Result<()> {
    let scoring = ScoringConfig::from_env().with_context(|| {
        let message = "invalid scoring configuration";
        tracing::error!(message);
        message
    })?;
    let config = ScoreboardConfig::from_env().with_context(|| {
        let message = "invalid scoreboard configuration";
        tracing::error!(message);
        message
    })?;

    let store: SharedStore = if args.memory {
        tracing::warn!("Results are kept in memory and will be lost on shutdown.");
        Arc::new(MemoryScoreStore::new())
    } else {
        let pool = connect_database().await?;
        MIGRATOR.run(&pool).await.with_context(|| {
            let message = "failed to apply migrations";
            tracing::error!(message);
            message
        })?;
        Arc::new(PgScoreStore::new(pool))
    };

    store.ping().await.with_context(|| {
        let message = "score store is not available";
        tracing::error!(message);
        message
    })?;

    let assets_dir = env::var("ASSETS_DIR").unwrap_or_else(|_| {
        tracing::warn!("ASSETS_DIR environment variable is not set. Default value `assets` will be used.");
        String::from("assets")
    });

    let app = create_router(store, ScoreEngine::new(scoring), config, &assets_dir);
    let port = match args.port {
        Some(port) => port,
        None => match env::var("PORT").ok().and_then(|port| port.parse().ok()) {
            Some(port) => port,
            None => {
                tracing::warn!("Scoreboard server will be launched at default port number 4567");
                4567u16
            }
        },
    };
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Server start at port {}", port);
    Server::bind(&addr)
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server stopped unexpectedly")?;

    Ok(())
}

fn create_router(
    store: SharedStore,
    engine: ScoreEngine,
    config: ScoreboardConfig,
    assets_dir: &str,
) -> Router {
    Router::new()
        .route("/", routing::get(index))
        .route("/result", routing::get(latest_result).post(post_result))
        .route("/ranking", routing::get(ranking))
        .route("/print", routing::get(print_result))
        .route("/info", routing::get(info))
        .route("/dbdebug", routing::get(db_debug))
        .route("/api/liveness", routing::get(liveness))
        .nest_service("/assets", ServeDir::new(assets_dir))
        .layer(Extension(store))
        .layer(Extension(Arc::new(engine)))
        .layer(Extension(Arc::new(config)))
        .layer(CorsLayer::permissive())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler.");
    };

    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("SIGINT signal received, starting graceful shutdown.");
}

#[cfg(test)]
mod test {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use panel_scoreboard_libs::store::PlayerResultStore;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn router(store: SharedStore) -> Router {
        create_router(
            store,
            ScoreEngine::default(),
            ScoreboardConfig { max_virus: 100 },
            "assets",
        )
    }

    fn post(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/result")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn submission(name: &str, team: i32, red: i32, green: i32, blue: i32) -> String {
        format!(
            "name={}&team={}&difficulty=1&redPoint={}&greenPoint={}&bluePoint={}&hitPoint=1&remainingTime=5",
            name, team, red, green, blue
        )
    }

    async fn call(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = hyper::body::to_bytes(response.into_body()).await.unwrap();
        let value = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn post_and_read_back() {
        let store: SharedStore = Arc::new(MemoryScoreStore::new());
        let app = router(store);

        let (status, body) = call(&app, post(&submission("alice", 1, 10, 0, 0))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], json!("alice"));
        assert_eq!(body["team"], json!("Red"));
        assert_eq!(body["score"], json!(6000.0));
        assert_eq!(body["rank"], json!("B"));
        assert_eq!(body["virusnum"], json!(10));

        let (status, body) = call(&app, get("/result")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["remainingVirus"], json!(90));
        assert_eq!(body["difficultyImage"], json!("easy"));
        assert_eq!(body["gameResult"], json!("clear"));
        assert_eq!(body["team"], json!("red"));
        assert_eq!(body["player"]["name"], json!("alice"));

        let (_, body) = call(&app, get("/print")).await;
        assert_eq!(body["gameResult"], json!("Clear!!"));
    }

    #[tokio::test]
    async fn empty_board_shows_placeholder() {
        let app = router(Arc::new(MemoryScoreStore::new()));

        let (status, body) = call(&app, get("/result")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["remainingVirus"], json!(100));
        assert_eq!(body["difficultyImage"], json!("nil"));
        assert_eq!(body["player"]["name"], json!(""));
        assert_eq!(body["player"]["team"], json!(""));

        let (_, body) = call(&app, get("/print")).await;
        assert_eq!(body["gameResult"], json!("Failed..."));
    }

    #[tokio::test]
    async fn unknown_team_is_rejected() {
        let store = Arc::new(MemoryScoreStore::new());
        let app = router(store.clone());

        let (status, body) = call(&app, post(&submission("mallory", 9, 1, 1, 1))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].as_str().unwrap().contains('9'));
        assert!(store.latest().await.unwrap().is_none());

        let (_, body) = call(&app, get("/dbdebug")).await;
        assert_eq!(body["rawData"].as_array().unwrap().len(), 1);
        assert_eq!(body["playerData"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn empty_name_is_stored_and_scored() {
        let store = Arc::new(MemoryScoreStore::new());
        let app = router(store.clone());

        let (status, body) = call(&app, post(&submission("", 1, 10, 0, 0))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], json!(""));
        assert_eq!(body["virusnum"], json!(10));
        assert_eq!(body["rank"], json!("B"));

        let latest = store.latest().await.unwrap().unwrap();
        assert_eq!(latest.record.name, "");
        assert_eq!(latest.record.score, 6000.0);
    }

    #[tokio::test]
    async fn raw_name_is_kept_verbatim() {
        let app = router(Arc::new(MemoryScoreStore::new()));

        let (status, body) = call(&app, post(&submission("%20alice%20", 1, 10, 0, 0))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], json!("alice"));

        let (_, body) = call(&app, get("/dbdebug")).await;
        assert_eq!(body["rawData"][0]["name"], json!(" alice "));
        assert_eq!(body["playerData"][0]["name"], json!("alice"));
    }

    #[tokio::test]
    async fn malformed_form_is_rejected() {
        let app = router(Arc::new(MemoryScoreStore::new()));

        let (status, _) = call(&app, post("name=alice&team=1")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn ranking_is_ordered_by_score() {
        let app = router(Arc::new(MemoryScoreStore::new()));

        for body in [
            submission("low", 1, 1, 0, 0),
            submission("high", 2, 0, 0, 50),
            submission("mid", 3, 0, 0, 10),
        ] {
            let (status, _) = call(&app, post(&body)).await;
            assert_eq!(status, StatusCode::OK);
        }

        let (status, body) = call(&app, get("/ranking")).await;
        assert_eq!(status, StatusCode::OK);
        let names: Vec<&str> = body["players"]
            .as_array()
            .unwrap()
            .iter()
            .map(|player| player["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["high", "mid", "low"]);
        assert_eq!(body["players"][0]["position"], json!(1));
    }

    #[tokio::test]
    async fn info_sums_per_team() {
        let app = router(Arc::new(MemoryScoreStore::new()));

        // Red: same=red, Blue: same=blue
        call(&app, post(&submission("r", 1, 30, 0, 0))).await;
        call(&app, post(&submission("b", 3, 0, 0, 80))).await;

        let (status, body) = call(&app, get("/info")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["redTeamSum"], json!(30));
        assert_eq!(body["greenTeamSum"], json!(0));
        assert_eq!(body["blueTeamSum"], json!(80));
        assert_eq!(body["maxVirus"], json!(100));
        assert_eq!(body["remainingVirus"], json!(0));
    }

    #[tokio::test]
    async fn index_and_liveness() {
        let app = router(Arc::new(MemoryScoreStore::new()));

        let (status, body) = call(&app, get("/")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], json!("panel_scoreboard"));

        let (status, _) = call(&app, get("/api/liveness")).await;
        assert_eq!(status, StatusCode::OK);
    }
}
