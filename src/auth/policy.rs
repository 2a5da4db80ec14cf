use super::Identity;
use crate::error::RoomError;

/// 관리자 전용 작업 권한 확인
/// 실패 시 상태 변경이나 브로드캐스트 없이 Forbidden 반환
pub fn require_admin(identity: &Identity, action: &str) -> Result<(), RoomError> {
    if identity.is_admin() {
        Ok(())
    } else {
        Err(RoomError::Forbidden(format!("only admins can {}", action)))
    }
}
