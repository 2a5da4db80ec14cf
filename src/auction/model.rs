use crate::bidding::model::{Bid, PersistedBid};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// 미디어 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
}

// 미디어 모델
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: MediaType,
    pub url: String,
    pub description: String,
}

impl MediaItem {
    /// 미디어가 지정되지 않은 룸의 기본 미디어
    pub fn placeholder() -> Self {
        Self {
            id: 1,
            kind: MediaType::Image,
            url: "/media/no_media.gif".to_string(),
            description: String::new(),
        }
    }
}

// 경매 물품(랏) 모델
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lot {
    pub id: String,
    pub title: String,
    pub description: String,
    pub start_price: f64,
    pub increment: f64,
    #[serde(default)]
    pub media: Vec<MediaItem>,
}

// 룸 초기 데이터 (입장/새로고침 시)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSnapshot {
    pub current_bid: Bid,
    pub bid_history: Vec<Bid>,
    pub current_media: Option<MediaItem>,
    pub current_lot: Lot,
}

// 저장소 경매 모델
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Auction {
    pub id: String,
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub current_bid: f64,
    pub bids: Vec<PersistedBid>,
}
