// region:    --- Imports
use crate::auction::events::ServerEvent;
use crate::auth::Identity;
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, warn};
use uuid::Uuid;

// endregion: --- Imports

/// 세션(연결) 식별자
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 세션 송신 채널 (크기 제한)
pub type Outbox = mpsc::Sender<ServerEvent>;

/// 세션 수신 측 (전송 계층이 소유)
pub type Inbox = mpsc::Receiver<ServerEvent>;

/// 연결된 세션
/// 전송 계층이 소유하며, 코디네이터는 식별자/사용자 정보/송신 채널만 사용한다.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: SessionId,
    pub identity: Identity,
    outbox: Outbox,
}

impl Session {
    pub fn new(identity: Identity, outbox: Outbox) -> Self {
        Self {
            id: SessionId::new(),
            identity,
            outbox,
        }
    }

    pub fn outbox(&self) -> Outbox {
        self.outbox.clone()
    }

    /// 세션에 이벤트 전송 (큐가 가득 찼거나 수신 측이 끊긴 경우 버림)
    pub fn send(&self, event: ServerEvent) {
        deliver(&self.id, &self.outbox, event);
    }
}

/// 대기 없이 전송. 룸 잠금을 쥔 채 호출되므로 절대 블록하지 않는다.
pub(crate) fn deliver(id: &SessionId, outbox: &Outbox, event: ServerEvent) {
    match outbox.try_send(event) {
        Ok(()) => {}
        Err(TrySendError::Full(_)) => {
            warn!("{:<12} --> 송신 큐 가득 참, 이벤트 버림: {}", "Session", id);
        }
        Err(TrySendError::Closed(_)) => {
            debug!("{:<12} --> 닫힌 세션으로 전송 무시: {}", "Session", id);
        }
    }
}
