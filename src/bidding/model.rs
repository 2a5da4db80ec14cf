use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// 실시간 입찰 모델
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bid {
    pub auction_id: String,
    pub username: String,
    pub bid_amount: f64,
}

impl Bid {
    /// 입찰이 없을 때의 현재 입찰 값
    pub fn placeholder() -> Self {
        Self {
            auction_id: String::new(),
            username: String::new(),
            bid_amount: 0.0,
        }
    }
}

// 저장소 입찰 모델
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PersistedBid {
    pub user_id: String,
    pub amount: f64,
    pub placed_at: DateTime<Utc>,
}
