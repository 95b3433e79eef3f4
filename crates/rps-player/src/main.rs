//! Rock-Paper-Scissors Player Service
//!
//! HTTP service hosting one player session: submit moves, switch modes,
//! download the match history and read the leaderboard.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use rps_core::{
    HttpRefereeClient, ModeToggle, Move, RefereeError, SessionConfig, SessionController,
    SessionError, SessionMode, SessionView,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Application error type
struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status, self.message).into_response()
    }
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        let status = match &err {
            SessionError::RoundInFlight => StatusCode::CONFLICT,
            SessionError::NoRounds => StatusCode::NOT_FOUND,
            SessionError::EmptyName => StatusCode::BAD_REQUEST,
            SessionError::Referee(RefereeError::Status(_))
            | SessionError::Referee(RefereeError::InvalidResponse(_)) => StatusCode::BAD_GATEWAY,
            SessionError::Referee(RefereeError::NetworkError(_)) => StatusCode::SERVICE_UNAVAILABLE,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

/// Player state
struct PlayerState {
    session: SessionController,
}

// === Request/Response types ===

#[derive(Deserialize)]
struct MoveRequest {
    choice: String,
}

#[derive(Serialize)]
struct MoveResponse {
    status: String,
}

#[derive(Deserialize)]
struct ModeRequest {
    confirm: bool,
}

#[derive(Serialize)]
struct ModeResponse {
    switched: bool,
    mode: SessionMode,
}

#[derive(Deserialize)]
struct NameRequest {
    name: String,
}

#[derive(Serialize)]
struct NameResponse {
    name: String,
}

// === Route handlers ===

async fn get_session(State(state): State<Arc<PlayerState>>) -> Json<SessionView> {
    Json(state.session.view())
}

async fn submit_move(
    State(state): State<Arc<PlayerState>>,
    Json(req): Json<MoveRequest>,
) -> Result<(StatusCode, Json<MoveResponse>), AppError> {
    let choice: Move = req
        .choice
        .parse()
        .map_err(|e: rps_core::games::UnknownMove| AppError::bad_request(e.to_string()))?;

    state.session.submit_move(choice)?;

    Ok((
        StatusCode::ACCEPTED,
        Json(MoveResponse {
            status: "submitted".to_string(),
        }),
    ))
}

async fn toggle_mode(
    State(state): State<Arc<PlayerState>>,
    Json(req): Json<ModeRequest>,
) -> Result<Json<ModeResponse>, AppError> {
    let confirm = req.confirm;
    let answer = state.session.toggle_mode(&|_: &str| confirm)?;

    Ok(Json(match answer {
        ModeToggle::Switched(mode) => ModeResponse { switched: true, mode },
        ModeToggle::Declined => ModeResponse {
            switched: false,
            mode: state.session.mode(),
        },
    }))
}

async fn download_history(State(state): State<Arc<PlayerState>>) -> Result<Response, AppError> {
    let export = state.session.export_history()?;

    Ok((
        [
            (header::CONTENT_TYPE, export.mime.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", export.file_name),
            ),
        ],
        export.content,
    )
        .into_response())
}

async fn set_player_name(
    State(state): State<Arc<PlayerState>>,
    Json(req): Json<NameRequest>,
) -> Result<Json<NameResponse>, AppError> {
    let name = state.session.set_player_name(&req.name)?;
    Ok(Json(NameResponse { name }))
}

async fn get_leaderboard(
    State(state): State<Arc<PlayerState>>,
) -> Result<Json<Vec<rps_core::LeaderboardEntry>>, AppError> {
    Ok(Json(state.session.leaderboard().await?))
}

async fn health() -> &'static str {
    "ok"
}

fn create_router(state: Arc<PlayerState>) -> Router {
    Router::new()
        .route("/api/session", get(get_session))
        .route("/api/session/move", post(submit_move))
        .route("/api/session/mode", post(toggle_mode))
        .route("/api/session/history.csv", get(download_history))
        .route("/api/player/name", post(set_player_name))
        .route("/api/leaderboard", get(get_leaderboard))
        .route("/api/health", get(health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = SessionConfig::from_env();
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(3001);

    let client = HttpRefereeClient::with_timeout(
        config.backend_url.clone(),
        config.leaderboard_url.clone(),
        config.http_timeout,
    )
    .expect("failed to build HTTP client");

    info!("Referee backend: {}", config.backend_url);
    info!("Leaderboard: {}", config.leaderboard_url);

    let session = SessionController::new(config, Arc::new(client));
    info!("Session user id: {}", session.user_id());

    let app = create_router(Arc::new(PlayerState { session }));

    let listener = TcpListener::bind(format!("0.0.0.0:{}", port)).await.unwrap();
    info!("Player service listening on http://0.0.0.0:{}", port);

    axum::serve(listener, app).await.unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use rps_core::{LeaderboardEntry, MockRefereeClient, UserId};
    use std::time::Duration;
    use tower::ServiceExt;

    fn test_app(mode: SessionMode) -> (Router, SessionController, MockRefereeClient) {
        let mock = MockRefereeClient::new();
        let session = SessionController::with_user(
            SessionConfig::default(),
            Arc::new(mock.clone()),
            UserId::from_string("user_http"),
            mode,
        );
        let app = create_router(Arc::new(PlayerState {
            session: session.clone(),
        }));
        (app, session, mock)
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _, _) = test_app(SessionMode::Remote);
        let response = app.oneshot(get("/api/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_move_is_bad_request() {
        let (app, session, _) = test_app(SessionMode::Remote);
        let response = app
            .oneshot(post_json(
                "/api/session/move",
                serde_json::json!({"choice": "lizard"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(session.phase(), rps_core::RoundPhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_move_then_view() {
        let (app, session, mock) = test_app(SessionMode::Remote);
        mock.push_computer_move(Move::Rock);

        let response = app
            .clone()
            .oneshot(post_json(
                "/api/session/move",
                serde_json::json!({"choice": "paper"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);

        session.wait_idle().await;

        let view = body_json(app.oneshot(get("/api/session")).await.unwrap()).await;
        assert_eq!(view["wins"], 1);
        assert_eq!(view["total"], 1);
        assert_eq!(view["player_move"], "paper");
        assert_eq!(view["computer_move"], "rock");
        assert_eq!(view["result"], "You win!");
        assert_eq!(view["mode"], "remote");
        assert_eq!(view["can_export"], true);
    }

    #[tokio::test(start_paused = true)]
    async fn test_move_while_in_flight_conflicts() {
        let (app, session, mock) = test_app(SessionMode::Remote);
        mock.set_latency(Duration::from_secs(2));

        session.submit_move(Move::Rock).unwrap();
        tokio::time::sleep(Duration::from_millis(600)).await;

        let response = app
            .oneshot(post_json(
                "/api/session/move",
                serde_json::json!({"choice": "scissors"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        session.wait_idle().await;
        assert_eq!(session.history_len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_history_download() {
        let (app, session, _) = test_app(SessionMode::Random);

        let empty = app
            .clone()
            .oneshot(get("/api/session/history.csv"))
            .await
            .unwrap();
        assert_eq!(empty.status(), StatusCode::NOT_FOUND);

        session.submit_move(Move::Rock).unwrap();
        session.wait_idle().await;

        let response = app.oneshot(get("/api/session/history.csv")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/csv;charset=utf-8"
        );
        let disposition = response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.starts_with("attachment; filename=\"game_history_"));

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let csv = String::from_utf8(bytes.to_vec()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "User Choice,Computer Choice,Result,Random");
        assert!(lines[1].starts_with("rock,"));
        assert!(lines[1].ends_with(",true"));
    }

    #[tokio::test]
    async fn test_mode_toggle_requires_confirmation() {
        let (app, session, _) = test_app(SessionMode::Remote);

        let declined = body_json(
            app.clone()
                .oneshot(post_json(
                    "/api/session/mode",
                    serde_json::json!({"confirm": false}),
                ))
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(declined["switched"], false);
        assert_eq!(declined["mode"], "remote");
        assert_eq!(session.mode(), SessionMode::Remote);

        let switched = body_json(
            app.oneshot(post_json(
                "/api/session/mode",
                serde_json::json!({"confirm": true}),
            ))
            .await
            .unwrap(),
        )
        .await;
        assert_eq!(switched["switched"], true);
        assert_eq!(switched["mode"], "random");
        assert_eq!(session.mode(), SessionMode::Random);
    }

    #[tokio::test]
    async fn test_player_name() {
        let (app, session, _) = test_app(SessionMode::Remote);

        let blank = app
            .clone()
            .oneshot(post_json(
                "/api/player/name",
                serde_json::json!({"name": "   "}),
            ))
            .await
            .unwrap();
        assert_eq!(blank.status(), StatusCode::BAD_REQUEST);

        let named = body_json(
            app.oneshot(post_json(
                "/api/player/name",
                serde_json::json!({"name": " Ada "}),
            ))
            .await
            .unwrap(),
        )
        .await;
        assert_eq!(named["name"], "Ada");
        assert_eq!(session.view().user_name.as_deref(), Some("Ada"));
    }

    #[tokio::test]
    async fn test_leaderboard_proxy() {
        let (app, _, mock) = test_app(SessionMode::Remote);
        mock.set_leaderboard(vec![LeaderboardEntry {
            user_id: "user_x".to_string(),
            user_name: "Grace".to_string(),
            wins: 2,
            losses: 0,
            ties: 1,
            total: 3,
        }]);

        let board = body_json(app.oneshot(get("/api/leaderboard")).await.unwrap()).await;
        assert_eq!(board[0]["UserName"], "Grace");
        assert_eq!(board[0]["total"], 3);
    }
}
