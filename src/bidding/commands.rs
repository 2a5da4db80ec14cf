/// 저장소 경로 커맨드 처리
/// 1. 경매 생성
/// 2. 입찰 (현재 입찰가보다 높아야 함)
/// 실시간 룸의 입찰 원장은 금액을 검증하지 않으므로 두 경로의 규칙이 다르다.
// region:    --- Imports
use crate::auction::model::Auction;
use crate::error::StoreError;
use crate::store::AuctionStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

// endregion: --- Imports

// region:    --- Commands
/// 경매 생성 명령
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAuctionCommand {
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl CreateAuctionCommand {
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("title is required".to_string());
        }
        if self.end_time <= self.start_time {
            return Err("endTime must be after startTime".to_string());
        }
        Ok(())
    }
}

/// 입찰 명령
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceBidCommand {
    pub bid_amount: f64,
}

/// 입찰 금액이 현재 입찰가보다 높은지 검증
pub fn ensure_higher_bid(current_bid: f64, amount: f64) -> Result<(), StoreError> {
    if amount <= current_bid {
        return Err(StoreError::BidTooLow {
            amount,
            current_bid,
        });
    }
    Ok(())
}

/// 1. 경매 생성
pub async fn handle_create_auction(
    cmd: CreateAuctionCommand,
    store: &dyn AuctionStore,
) -> Result<Auction, StoreError> {
    info!("{:<12} --> 경매 생성 요청: {:?}", "Command", cmd);
    store
        .create_auction(&cmd.title, cmd.start_time, cmd.end_time)
        .await
}

/// 2. 입찰
pub async fn handle_place_bid(
    auction_id: &str,
    user_id: &str,
    cmd: PlaceBidCommand,
    store: &dyn AuctionStore,
) -> Result<Auction, StoreError> {
    info!(
        "{:<12} --> 입찰 요청: auction={}, user={}, {:?}",
        "Command", auction_id, user_id, cmd
    );
    store.place_bid(auction_id, user_id, cmd.bid_amount).await
}

// endregion: --- Commands

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_ensure_higher_bid() {
        assert!(ensure_higher_bid(100.0, 110.0).is_ok());
        assert!(matches!(
            ensure_higher_bid(100.0, 100.0),
            Err(StoreError::BidTooLow { .. })
        ));
        assert!(matches!(
            ensure_higher_bid(100.0, 50.0),
            Err(StoreError::BidTooLow { .. })
        ));
    }

    #[test]
    fn test_create_auction_validation() {
        let now = Utc::now();
        let mut cmd = CreateAuctionCommand {
            title: "Truck auction".to_string(),
            start_time: now,
            end_time: now + Duration::hours(1),
        };
        assert!(cmd.validate().is_ok());

        cmd.end_time = now;
        assert!(cmd.validate().is_err());

        cmd.end_time = now + Duration::hours(1);
        cmd.title = "  ".to_string();
        assert!(cmd.validate().is_err());
    }
}
