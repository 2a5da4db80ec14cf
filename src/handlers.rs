// region:    --- Imports
use crate::auth::{authenticate, CredentialVerifier, Identity};
use crate::bidding::commands::{
    handle_create_auction, handle_place_bid, CreateAuctionCommand, PlaceBidCommand,
};
use crate::error::StoreError;
use crate::gateway;
use crate::room::coordinator::RoomCoordinator;
use crate::store::AuctionStore;
use axum::extract::{DefaultBodyLimit, Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

// endregion: --- Imports

// region:    --- App State
#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<RoomCoordinator>,
    pub store: Arc<dyn AuctionStore>,
    pub verifier: Arc<dyn CredentialVerifier>,
}

/// 라우터 설정
pub fn routes(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/ws", get(gateway::ws_handler))
        .route(
            "/auctions",
            post(handle_create_auction_request).get(handle_get_auctions),
        )
        .route("/auctions/:id", get(handle_get_auction))
        .route("/auctions/:id/bid", post(handle_place_bid_request))
        .layer(cors)
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .with_state(state)
}

// endregion: --- App State

// region:    --- Helpers

/// Authorization 헤더의 JWT 검증
fn authorize(state: &AppState, headers: &HeaderMap) -> Result<Identity, Response> {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    authenticate(state.verifier.as_ref(), authorization).map_err(|e| {
        warn!("{:<12} --> 인증 실패: {}", "Handler", e);
        error_response(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", e.to_string())
    })
}

fn error_response(status: StatusCode, code: &str, message: String) -> Response {
    (
        status,
        Json(serde_json::json!({
            "error": message,
            "code": code
        })),
    )
        .into_response()
}

fn store_error_response(e: StoreError) -> Response {
    let status = match &e {
        StoreError::NotFound(_) => StatusCode::NOT_FOUND,
        StoreError::BidTooLow { .. } => StatusCode::BAD_REQUEST,
        StoreError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error_response(status, e.code(), e.to_string())
}

// endregion: --- Helpers

// region:    --- Command Handlers

/// 경매 생성 (관리자 전용)
pub async fn handle_create_auction_request(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(cmd): Json<CreateAuctionCommand>,
) -> Response {
    let identity = match authorize(&state, &headers) {
        Ok(identity) => identity,
        Err(response) => return response,
    };
    if !identity.is_admin() {
        return error_response(
            StatusCode::FORBIDDEN,
            "FORBIDDEN",
            "Only admins can create auctions".to_string(),
        );
    }
    if let Err(message) = cmd.validate() {
        return error_response(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message);
    }

    match handle_create_auction(cmd, state.store.as_ref()).await {
        Ok(auction) => (StatusCode::CREATED, Json(auction)).into_response(),
        Err(e) => store_error_response(e),
    }
}

/// 입찰 (현재 입찰가보다 높아야 함)
pub async fn handle_place_bid_request(
    State(state): State<AppState>,
    Path(auction_id): Path<String>,
    headers: HeaderMap,
    Json(cmd): Json<PlaceBidCommand>,
) -> Response {
    let identity = match authorize(&state, &headers) {
        Ok(identity) => identity,
        Err(response) => return response,
    };

    match handle_place_bid(&auction_id, &identity.id, cmd, state.store.as_ref()).await {
        Ok(auction) => Json(auction).into_response(),
        Err(e) => store_error_response(e),
    }
}

// endregion: --- Command Handlers

// region:    --- Query Handlers

/// 모든 경매 조회
pub async fn handle_get_auctions(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let identity = match authorize(&state, &headers) {
        Ok(identity) => identity,
        Err(response) => return response,
    };
    info!("{:<12} --> 모든 경매 조회 user: {}", "HandlerQuery", identity.id);
    match state.store.get_auctions().await {
        Ok(auctions) => Json(auctions).into_response(),
        Err(e) => store_error_response(e),
    }
}

/// 경매 조회
pub async fn handle_get_auction(
    State(state): State<AppState>,
    Path(auction_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = authorize(&state, &headers) {
        return response;
    }
    info!("{:<12} --> 경매 조회 id: {}", "HandlerQuery", auction_id);
    match state.store.get_auction_by_id(&auction_id).await {
        Ok(auction) => Json(auction).into_response(),
        Err(e) => store_error_response(e),
    }
}

// endregion: --- Query Handlers
