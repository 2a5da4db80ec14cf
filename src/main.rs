// region:    --- Imports
use live_auction::auth::JwtVerifier;
use live_auction::config::Config;
use live_auction::database::DatabaseManager;
use live_auction::handlers::{self, AppState};
use live_auction::room::coordinator::RoomCoordinator;
use live_auction::store::{AuctionStore, MemoryAuctionStore, PostgresAuctionStore};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
// endregion: --- Imports

// region:    --- Main
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // logging 초기화
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .without_time()
        .with_target(false)
        .init();

    // 설정 로드
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{:<12} --> 설정 로드 실패: {}", "Main", e);
            return Err(e.into());
        }
    };

    // 경매 저장소 선택
    let store: Arc<dyn AuctionStore> = match &config.database_url {
        Some(url) => {
            let db_manager =
                Arc::new(DatabaseManager::new(url, config.database_max_connections).await?);
            if let Err(e) = db_manager.initialize_database().await {
                error!("{:<12} --> 데이터베이스 초기화 실패: {:?}", "Main", e);
                return Err(e.into());
            }
            info!("{:<12} --> 데이터베이스 초기화 성공", "Main");
            Arc::new(PostgresAuctionStore::new(db_manager))
        }
        None => {
            warn!(
                "{:<12} --> DATABASE_URL 미설정: 메모리 저장소 사용",
                "Main"
            );
            Arc::new(MemoryAuctionStore::new())
        }
    };

    let state = AppState {
        coordinator: Arc::new(RoomCoordinator::new(config.room.clone())),
        store,
        verifier: Arc::new(JwtVerifier::new(&config.jwt_secret)),
    };

    // 리스너 생성
    let listener = TcpListener::bind(config.bind_addr).await?;
    info!(
        "{:<12} --> Web Server: Listening on {}",
        "Main",
        listener.local_addr()?
    );

    // 서버 실행
    if let Err(err) = axum::serve(listener, handlers::routes(state).into_make_service()).await {
        error!("{:<12} --> Server error: {}", "Main", err);
    }
    Ok(())
}
// endregion: --- Main
