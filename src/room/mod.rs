/// 실시간 경매 룸
/// 룸 상태(멤버, 랏/미디어, 입찰 원장, 타이머)는 룸 단위 Mutex 로 단일 작성자 원칙을 지킨다.
// region:    --- Modules
pub mod coordinator;
pub mod registry;
pub mod session;
pub mod signaling;

// endregion: --- Modules

// region:    --- Imports
use crate::auction::events::ServerEvent;
use crate::auction::model::RoomSnapshot;
use crate::auction::state::AuctionState;
use crate::bidding::ledger::BidLedger;
use crate::scheduler::{RoomTimer, TimerController};
use session::{deliver, Outbox, Session, SessionId};
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use tokio::sync::Mutex;

// endregion: --- Imports

pub type SharedRoom = Arc<Mutex<AuctionRoom>>;

// region:    --- Auction Room
#[derive(Debug)]
pub struct AuctionRoom {
    auction_id: String,
    /// 멤버 세션 -> 송신 채널
    members: HashMap<SessionId, Outbox>,
    pub state: AuctionState,
    pub ledger: BidLedger,
    pub timer: RoomTimer,
    this: Weak<Mutex<AuctionRoom>>,
}

impl AuctionRoom {
    /// 공유 룸 생성 (타이머 작업이 룸을 약한 참조로 가리킬 수 있도록)
    pub fn shared(auction_id: &str) -> SharedRoom {
        Arc::new_cyclic(|this| {
            Mutex::new(Self {
                auction_id: auction_id.to_string(),
                members: HashMap::new(),
                state: AuctionState::new(),
                ledger: BidLedger::new(),
                timer: RoomTimer::default(),
                this: this.clone(),
            })
        })
    }

    pub fn auction_id(&self) -> &str {
        &self.auction_id
    }

    pub fn downgrade(&self) -> Weak<Mutex<AuctionRoom>> {
        self.this.clone()
    }

    // -- 멤버 관리

    /// 멤버 추가 (이미 멤버이면 false)
    pub fn add_member(&mut self, session: &Session) -> bool {
        if self.members.contains_key(&session.id) {
            return false;
        }
        self.members.insert(session.id, session.outbox());
        true
    }

    pub fn remove_member(&mut self, id: &SessionId) -> Option<Outbox> {
        self.members.remove(id)
    }

    pub fn member_ids(&self) -> Vec<SessionId> {
        self.members.keys().copied().collect()
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// 모든 멤버 제거 후 제거된 세션 목록 반환
    pub fn clear_members(&mut self) -> Vec<SessionId> {
        self.members.drain().map(|(id, _)| id).collect()
    }

    // -- 전송

    pub fn broadcast(&self, event: &ServerEvent) {
        for (id, outbox) in &self.members {
            deliver(id, outbox, event.clone());
        }
    }

    pub fn broadcast_except(&self, except: &SessionId, event: &ServerEvent) {
        for (id, outbox) in self.members.iter().filter(|(id, _)| *id != except) {
            deliver(id, outbox, event.clone());
        }
    }

    /// 특정 멤버에게 전송 (멤버가 아니면 false)
    pub fn send_to(&self, id: &SessionId, event: ServerEvent) -> bool {
        match self.members.get(id) {
            Some(outbox) => {
                deliver(id, outbox, event);
                true
            }
            None => false,
        }
    }

    pub(crate) fn outbox_of(&self, id: &SessionId) -> Option<&Outbox> {
        self.members.get(id)
    }

    // -- 상태

    pub fn snapshot(&self) -> RoomSnapshot {
        RoomSnapshot {
            current_bid: self.ledger.current(),
            bid_history: self.ledger.history().to_vec(),
            current_media: self.state.media().cloned(),
            current_lot: self.state.lot().clone(),
        }
    }

    /// 경매 상태 전체 초기화 (랏, 미디어, 입찰, 타이머)
    pub fn reset(&mut self) {
        TimerController::cancel(self);
        self.state.reset();
        self.ledger.clear();
    }
}

// endregion: --- Auction Room

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Identity, Role};
    use crate::bidding::model::Bid;
    use crate::room::session::Inbox;
    use std::time::Duration;
    use tokio::sync::mpsc;

    fn session(id: &str) -> (Session, Inbox) {
        let (tx, rx) = mpsc::channel(16);
        let identity = Identity {
            id: id.to_string(),
            role: Role::User,
            exp: 0,
        };
        (Session::new(identity, tx), rx)
    }

    #[tokio::test]
    async fn test_members_are_unique() {
        let shared = AuctionRoom::shared("A1");
        let mut room = shared.lock().await;
        let (a, _a_rx) = session("a");

        assert!(room.add_member(&a));
        assert!(!room.add_member(&a));
        assert_eq!(room.member_ids(), vec![a.id]);
        assert!(room.remove_member(&a.id).is_some());
        assert!(room.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_cancels_timer_and_clears_state() {
        let shared = AuctionRoom::shared("A1");
        let (a, mut a_rx) = session("a");
        {
            let mut room = shared.lock().await;
            room.add_member(&a);
            room.ledger.append(Bid {
                auction_id: "A1".to_string(),
                username: "a".to_string(),
                bid_amount: 10.0,
            });
            TimerController::start(&mut room, 5, Duration::from_secs(1));
            room.reset();
            assert!(!room.timer.is_running());
            assert!(room.ledger.is_empty());
            assert_eq!(room.snapshot().current_bid, Bid::placeholder());
        }

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(a_rx.try_recv().is_err());
    }
}
