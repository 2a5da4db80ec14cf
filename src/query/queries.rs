/// 경매 생성
pub const INSERT_AUCTION: &str = r#"
    INSERT INTO auctions (id, title, start_time, end_time, current_bid)
    VALUES ($1, $2, $3, $4, 0)
    RETURNING id, title, start_time, end_time, current_bid
"#;

/// 모든 경매 조회
pub const GET_ALL_AUCTIONS: &str =
    "SELECT id, title, start_time, end_time, current_bid FROM auctions ORDER BY created_at, id";

/// 경매 조회
pub const GET_AUCTION: &str =
    "SELECT id, title, start_time, end_time, current_bid FROM auctions WHERE id = $1";

/// 입찰 검증을 위한 경매 잠금 조회
pub const LOCK_AUCTION_CURRENT_BID: &str =
    "SELECT current_bid FROM auctions WHERE id = $1 FOR UPDATE";

/// 경매 입찰 이력 조회
pub const GET_AUCTION_BIDS: &str = r#"
    SELECT user_id, amount, placed_at
    FROM auction_bids
    WHERE auction_id = $1
    ORDER BY id
"#;

/// 모든 입찰 이력 조회
pub const GET_ALL_BIDS: &str = r#"
    SELECT auction_id, user_id, amount, placed_at
    FROM auction_bids
    ORDER BY id
"#;

/// 입찰 기록 추가
pub const INSERT_BID: &str =
    "INSERT INTO auction_bids (auction_id, user_id, amount, placed_at) VALUES ($1, $2, $3, $4)";

/// 현재 입찰가 갱신
pub const UPDATE_CURRENT_BID: &str = "UPDATE auctions SET current_bid = $1 WHERE id = $2";
