/// 경매 저장소 (외부 영속성 협력자 경계)
/// 실시간 입찰 원장과 달리 저장소 입찰은 현재 입찰가보다 높아야 한다.
// region:    --- Modules
mod memory;
mod postgres;

pub use memory::MemoryAuctionStore;
pub use postgres::PostgresAuctionStore;

// endregion: --- Modules

// region:    --- Imports
use crate::auction::model::Auction;
use crate::error::StoreError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

// endregion: --- Imports

/// 경매 저장소 트레이트
#[async_trait]
pub trait AuctionStore: Send + Sync {
    async fn create_auction(
        &self,
        title: &str,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Result<Auction, StoreError>;

    async fn get_auctions(&self) -> Result<Vec<Auction>, StoreError>;

    async fn get_auction_by_id(&self, id: &str) -> Result<Auction, StoreError>;

    /// 입찰 저장 (amount <= current_bid 이면 BidTooLow)
    async fn place_bid(
        &self,
        auction_id: &str,
        user_id: &str,
        amount: f64,
    ) -> Result<Auction, StoreError>;
}
