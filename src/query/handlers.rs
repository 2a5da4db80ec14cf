// region:    --- Imports
use super::queries;
use crate::auction::model::Auction;
use crate::bidding::commands::ensure_higher_bid;
use crate::bidding::model::PersistedBid;
use crate::database::DatabaseManager;
use crate::error::StoreError;
use chrono::{DateTime, Utc};
use sqlx::Error as SqlxError;
use sqlx::FromRow;
use std::collections::HashMap;
use tracing::info;

// endregion: --- Imports

// region:    --- Rows
#[derive(Debug, FromRow)]
struct AuctionRow {
    id: String,
    title: String,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    current_bid: f64,
}

impl AuctionRow {
    fn into_auction(self, bids: Vec<PersistedBid>) -> Auction {
        Auction {
            id: self.id,
            title: self.title,
            start_time: self.start_time,
            end_time: self.end_time,
            current_bid: self.current_bid,
            bids,
        }
    }
}

#[derive(Debug, FromRow)]
struct BidRow {
    auction_id: String,
    user_id: String,
    amount: f64,
    placed_at: DateTime<Utc>,
}

// endregion: --- Rows

// region:    --- Query Handlers

/// 경매 생성
pub async fn insert_auction(
    db_manager: &DatabaseManager,
    id: String,
    title: String,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
) -> Result<Auction, SqlxError> {
    info!("{:<12} --> 경매 생성 id: {}", "Query", id);
    let row = db_manager
        .transaction(|tx| {
            Box::pin(async move {
                sqlx::query_as::<_, AuctionRow>(queries::INSERT_AUCTION)
                    .bind(id)
                    .bind(title)
                    .bind(start_time)
                    .bind(end_time)
                    .fetch_one(&mut **tx)
                    .await
            })
        })
        .await?;
    Ok(row.into_auction(Vec::new()))
}

/// 모든 경매 조회
pub async fn get_all_auctions(db_manager: &DatabaseManager) -> Result<Vec<Auction>, SqlxError> {
    info!("{:<12} --> 모든 경매 조회", "Query");
    let rows = sqlx::query_as::<_, AuctionRow>(queries::GET_ALL_AUCTIONS)
        .fetch_all(db_manager.pool())
        .await?;
    let bid_rows = sqlx::query_as::<_, BidRow>(queries::GET_ALL_BIDS)
        .fetch_all(db_manager.pool())
        .await?;

    let mut bids_by_auction: HashMap<String, Vec<PersistedBid>> = HashMap::new();
    for bid in bid_rows {
        bids_by_auction
            .entry(bid.auction_id)
            .or_default()
            .push(PersistedBid {
                user_id: bid.user_id,
                amount: bid.amount,
                placed_at: bid.placed_at,
            });
    }

    Ok(rows
        .into_iter()
        .map(|row| {
            let bids = bids_by_auction.remove(&row.id).unwrap_or_default();
            row.into_auction(bids)
        })
        .collect())
}

/// 경매 조회 (없으면 None)
pub async fn get_auction(
    db_manager: &DatabaseManager,
    auction_id: &str,
) -> Result<Option<Auction>, SqlxError> {
    info!("{:<12} --> 경매 조회 id: {}", "Query", auction_id);
    let Some(row) = sqlx::query_as::<_, AuctionRow>(queries::GET_AUCTION)
        .bind(auction_id)
        .fetch_optional(db_manager.pool())
        .await?
    else {
        return Ok(None);
    };
    let bids = sqlx::query_as::<_, PersistedBid>(queries::GET_AUCTION_BIDS)
        .bind(auction_id)
        .fetch_all(db_manager.pool())
        .await?;
    Ok(Some(row.into_auction(bids)))
}

/// 입찰 저장: 경매 행을 잠근 뒤 현재 입찰가보다 높은 경우에만 기록
pub async fn insert_bid(
    db_manager: &DatabaseManager,
    auction_id: &str,
    user_id: &str,
    amount: f64,
) -> Result<Auction, StoreError> {
    info!(
        "{:<12} --> 입찰 저장 id: {}, amount: {}",
        "Query", auction_id, amount
    );
    let mut tx = db_manager.pool().begin().await?;

    let current_bid: f64 = sqlx::query_scalar(queries::LOCK_AUCTION_CURRENT_BID)
        .bind(auction_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| StoreError::NotFound(auction_id.to_string()))?;

    if let Err(e) = ensure_higher_bid(current_bid, amount) {
        tx.rollback().await?;
        return Err(e);
    }

    sqlx::query(queries::INSERT_BID)
        .bind(auction_id)
        .bind(user_id)
        .bind(amount)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;
    sqlx::query(queries::UPDATE_CURRENT_BID)
        .bind(amount)
        .bind(auction_id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    get_auction(db_manager, auction_id)
        .await?
        .ok_or_else(|| StoreError::NotFound(auction_id.to_string()))
}

// endregion: --- Query Handlers
