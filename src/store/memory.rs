// region:    --- Imports
use super::AuctionStore;
use crate::auction::model::Auction;
use crate::bidding::commands::ensure_higher_bid;
use crate::bidding::model::PersistedBid;
use crate::error::StoreError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

// endregion: --- Imports

/// 메모리 경매 저장소 (생성 순서 유지)
#[derive(Default)]
pub struct MemoryAuctionStore {
    auctions: RwLock<Vec<Auction>>,
}

impl MemoryAuctionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AuctionStore for MemoryAuctionStore {
    async fn create_auction(
        &self,
        title: &str,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Result<Auction, StoreError> {
        let auction = Auction {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            start_time,
            end_time,
            current_bid: 0.0,
            bids: Vec::new(),
        };
        self.auctions.write().await.push(auction.clone());
        Ok(auction)
    }

    async fn get_auctions(&self) -> Result<Vec<Auction>, StoreError> {
        Ok(self.auctions.read().await.clone())
    }

    async fn get_auction_by_id(&self, id: &str) -> Result<Auction, StoreError> {
        self.auctions
            .read()
            .await
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn place_bid(
        &self,
        auction_id: &str,
        user_id: &str,
        amount: f64,
    ) -> Result<Auction, StoreError> {
        let mut auctions = self.auctions.write().await;
        let auction = auctions
            .iter_mut()
            .find(|a| a.id == auction_id)
            .ok_or_else(|| StoreError::NotFound(auction_id.to_string()))?;

        ensure_higher_bid(auction.current_bid, amount)?;
        auction.bids.push(PersistedBid {
            user_id: user_id.to_string(),
            amount,
            placed_at: Utc::now(),
        });
        auction.current_bid = amount;
        Ok(auction.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    async fn store_with_auction() -> (MemoryAuctionStore, Auction) {
        let store = MemoryAuctionStore::new();
        let now = Utc::now();
        let auction = store
            .create_auction("Truck auction", now, now + Duration::hours(2))
            .await
            .unwrap();
        (store, auction)
    }

    #[tokio::test]
    async fn test_create_and_fetch() {
        let (store, auction) = store_with_auction().await;
        assert_eq!(auction.current_bid, 0.0);
        assert!(auction.bids.is_empty());

        let fetched = store.get_auction_by_id(&auction.id).await.unwrap();
        assert_eq!(fetched, auction);
        assert_eq!(store.get_auctions().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_auction() {
        let store = MemoryAuctionStore::new();
        assert!(matches!(
            store.get_auction_by_id("missing").await,
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            store.place_bid("missing", "u-1", 10.0).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_bids_must_increase() {
        let (store, auction) = store_with_auction().await;

        let updated = store.place_bid(&auction.id, "u-1", 150.0).await.unwrap();
        assert_eq!(updated.current_bid, 150.0);
        assert_eq!(updated.bids.len(), 1);

        for amount in [150.0, 120.0] {
            let err = store.place_bid(&auction.id, "u-2", amount).await.unwrap_err();
            assert!(matches!(err, StoreError::BidTooLow { .. }));
        }

        let fetched = store.get_auction_by_id(&auction.id).await.unwrap();
        assert_eq!(fetched.current_bid, 150.0);
        assert_eq!(fetched.bids.len(), 1);
        assert_eq!(fetched.bids[0].user_id, "u-1");
    }
}
