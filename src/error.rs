// region:    --- Imports
use thiserror::Error;

// endregion: --- Imports

// region:    --- Room Error
/// 룸 코디네이터 이벤트 처리 결과 에러
/// 디스패처에서만 소비되며 그 밖으로 전파되지 않는다.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RoomError {
    /// 자격 증명 누락/위조/만료 (연결 단계에서만 발생)
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    /// 검증된 사용자이지만 권한 부족
    #[error("forbidden: {0}")]
    Forbidden(String),
    /// 존재하지 않는 경매 룸 또는 세션
    #[error("not found: {0}")]
    NotFound(String),
    /// 잘못된 페이로드
    #[error("validation error: {0}")]
    Validation(String),
}

impl RoomError {
    /// 클라이언트에 전달되는 에러 코드
    pub fn code(&self) -> &'static str {
        match self {
            RoomError::Unauthorized(_) => "UNAUTHORIZED",
            RoomError::Forbidden(_) => "FORBIDDEN",
            RoomError::NotFound(_) => "NOT_FOUND",
            RoomError::Validation(_) => "VALIDATION_ERROR",
        }
    }
}

// endregion: --- Room Error

// region:    --- Store Error
/// 경매 저장소 에러
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("auction not found: {0}")]
    NotFound(String),
    #[error("bid must be higher than the current bid ({amount} <= {current_bid})")]
    BidTooLow { amount: f64, current_bid: f64 },
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::NotFound(_) => "NOT_FOUND",
            StoreError::BidTooLow { .. } => "LOW_BID",
            StoreError::Database(_) => "DATABASE_ERROR",
        }
    }
}

// endregion: --- Store Error

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_error_codes() {
        assert_eq!(RoomError::Forbidden("x".into()).code(), "FORBIDDEN");
        assert_eq!(RoomError::NotFound("x".into()).code(), "NOT_FOUND");
        assert_eq!(RoomError::Validation("x".into()).code(), "VALIDATION_ERROR");
        assert_eq!(RoomError::Unauthorized("x".into()).code(), "UNAUTHORIZED");
    }

    #[test]
    fn test_low_bid_message() {
        let err = StoreError::BidTooLow {
            amount: 90.0,
            current_bid: 100.0,
        };
        assert_eq!(err.code(), "LOW_BID");
        assert!(err.to_string().contains("90 <= 100"));
    }
}
