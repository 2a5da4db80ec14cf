/// 룸 레지스트리
/// 경매 id -> 룸, 세션 -> 경매 id 를 관리한다.
/// 잠금 순서는 항상 레지스트리 -> 룸이며, 한 번에 하나의 룸만 잠근다.
// region:    --- Imports
use super::session::{Session, SessionId};
use super::{AuctionRoom, SharedRoom};
use crate::auction::events::ServerEvent;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

// endregion: --- Imports

const AUCTION_STOPPED_MESSAGE: &str = "Auction has been stopped";

#[derive(Default)]
struct RegistryInner {
    rooms: HashMap<String, SharedRoom>,
    memberships: HashMap<SessionId, String>,
}

/// 퇴장 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaveOutcome {
    pub auction_id: String,
    /// 관리자 퇴장으로 경매가 중지되었는지
    pub auction_stopped: bool,
    /// 마지막 멤버가 나가 룸이 제거되었는지
    pub room_removed: bool,
}

// region:    --- Room Registry
#[derive(Default)]
pub struct RoomRegistry {
    inner: RwLock<RegistryInner>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, auction_id: &str) -> Option<SharedRoom> {
        self.inner.read().await.rooms.get(auction_id).cloned()
    }

    pub async fn room_of(&self, session_id: &SessionId) -> Option<String> {
        self.inner.read().await.memberships.get(session_id).cloned()
    }

    pub async fn room_count(&self) -> usize {
        self.inner.read().await.rooms.len()
    }

    pub async fn members(&self, auction_id: &str) -> Vec<SessionId> {
        match self.get(auction_id).await {
            Some(room) => room.lock().await.member_ids(),
            None => Vec::new(),
        }
    }

    /// 룸 입장 (멱등). 룸이 없으면 생성한다.
    /// 다른 룸에 있던 세션은 먼저 그 룸에서 퇴장한다.
    pub async fn join(&self, auction_id: &str, session: &Session) -> SharedRoom {
        let mut inner = self.inner.write().await;

        if let Some(previous) = inner.memberships.get(&session.id).cloned() {
            if previous != auction_id {
                Self::leave_locked(&mut inner, session).await;
            }
        }

        let room = Arc::clone(inner.rooms.entry(auction_id.to_string()).or_insert_with(|| {
            info!("{:<12} --> 경매 룸 생성: {}", "Registry", auction_id);
            AuctionRoom::shared(auction_id)
        }));
        inner
            .memberships
            .insert(session.id, auction_id.to_string());

        let mut guard = room.lock().await;
        let added = guard.add_member(session);
        info!(
            "{:<12} --> 세션 {} 경매 {} 입장 (members={})",
            "Registry",
            session.id,
            auction_id,
            guard.member_count()
        );

        session.send(ServerEvent::AuctionJoined {
            client_id: session.id,
            auction_id: auction_id.to_string(),
        });
        if added {
            guard.broadcast_except(
                &session.id,
                &ServerEvent::UserJoined {
                    client_id: session.id,
                    auction_id: auction_id.to_string(),
                },
            );
        }
        drop(guard);

        room
    }

    /// 세션 퇴장 (입장한 적 없는 세션은 None)
    pub async fn leave(&self, session: &Session) -> Option<LeaveOutcome> {
        let mut inner = self.inner.write().await;
        Self::leave_locked(&mut inner, session).await
    }

    async fn leave_locked(inner: &mut RegistryInner, session: &Session) -> Option<LeaveOutcome> {
        let auction_id = inner.memberships.remove(&session.id)?;
        let room = inner.rooms.get(&auction_id).cloned()?;

        let mut guard = room.lock().await;
        guard.remove_member(&session.id)?;
        info!(
            "{:<12} --> 세션 {} 경매 {} 퇴장",
            "Registry", session.id, auction_id
        );
        guard.broadcast(&ServerEvent::UserLeft {
            client_id: session.id,
            auction_id: auction_id.clone(),
        });

        let auction_stopped = session.identity.is_admin();
        if auction_stopped {
            guard.reset();
            guard.broadcast(&ServerEvent::AuctionStopped {
                auction_id: auction_id.clone(),
                message: AUCTION_STOPPED_MESSAGE.to_string(),
            });
            info!(
                "{:<12} --> 관리자 퇴장으로 경매 중지: {}",
                "Registry", auction_id
            );
        }

        let room_removed = guard.is_empty();
        if room_removed {
            guard.reset();
            drop(guard);
            inner.rooms.remove(&auction_id);
            info!("{:<12} --> 빈 경매 룸 제거: {}", "Registry", auction_id);
        }

        Some(LeaveOutcome {
            auction_id,
            auction_stopped,
            room_removed,
        })
    }

    /// 경매 중지: 전체 멤버에게 알린 뒤 상태 초기화, 멤버 해제, 룸 제거
    /// 룸이 없으면 None
    pub async fn close(&self, auction_id: &str) -> Option<Vec<SessionId>> {
        let mut inner = self.inner.write().await;
        let room = inner.rooms.remove(auction_id)?;

        let mut guard = room.lock().await;
        guard.broadcast(&ServerEvent::AuctionStopped {
            auction_id: auction_id.to_string(),
            message: AUCTION_STOPPED_MESSAGE.to_string(),
        });
        guard.reset();
        let released = guard.clear_members();
        drop(guard);

        for id in &released {
            inner.memberships.remove(id);
        }
        info!(
            "{:<12} --> 경매 중지 및 룸 해제: {} (members={})",
            "Registry",
            auction_id,
            released.len()
        );
        Some(released)
    }
}

// endregion: --- Room Registry
