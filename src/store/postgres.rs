// region:    --- Imports
use super::AuctionStore;
use crate::auction::model::Auction;
use crate::database::DatabaseManager;
use crate::error::StoreError;
use crate::query::handlers;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

// endregion: --- Imports

/// Postgres 경매 저장소
pub struct PostgresAuctionStore {
    db_manager: Arc<DatabaseManager>,
}

impl PostgresAuctionStore {
    pub fn new(db_manager: Arc<DatabaseManager>) -> Self {
        Self { db_manager }
    }
}

#[async_trait]
impl AuctionStore for PostgresAuctionStore {
    async fn create_auction(
        &self,
        title: &str,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Result<Auction, StoreError> {
        let id = Uuid::new_v4().to_string();
        Ok(handlers::insert_auction(
            &self.db_manager,
            id,
            title.to_string(),
            start_time,
            end_time,
        )
        .await?)
    }

    async fn get_auctions(&self) -> Result<Vec<Auction>, StoreError> {
        Ok(handlers::get_all_auctions(&self.db_manager).await?)
    }

    async fn get_auction_by_id(&self, id: &str) -> Result<Auction, StoreError> {
        handlers::get_auction(&self.db_manager, id)
            .await?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn place_bid(
        &self,
        auction_id: &str,
        user_id: &str,
        amount: f64,
    ) -> Result<Auction, StoreError> {
        handlers::insert_bid(&self.db_manager, auction_id, user_id, amount).await
    }
}
