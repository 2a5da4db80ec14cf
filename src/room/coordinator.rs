/// 룸 코디네이터
/// 모든 클라이언트 이벤트의 단일 진입점.
/// 1. 권한 확인 (관리자 전용 이벤트)
/// 2. 레지스트리/경매 상태/입찰 원장/타이머 변경
/// 3. 결과 브로드캐스트
/// 처리 결과 에러는 dispatch 에서 소비되며 그 밖으로 전파되지 않는다.
// region:    --- Imports
use super::registry::{LeaveOutcome, RoomRegistry};
use super::session::{Inbox, Outbox, Session, SessionId};
use super::signaling::{self, SignalKind};
use super::SharedRoom;
use crate::auction::events::{
    ClientEvent, PlaceBidPayload, RoomRef, ServerEvent, SignalPayload, StartTimerPayload,
    UpdateLotPayload, UpdateMediaPayload,
};
use crate::auction::model::RoomSnapshot;
use crate::auth::policy::require_admin;
use crate::auth::Identity;
use crate::config::RoomConfig;
use crate::error::RoomError;
use crate::scheduler::TimerController;
use std::collections::HashMap;
use tokio::sync::{mpsc, RwLock};
use tracing::{info, warn};

// endregion: --- Imports

pub struct RoomCoordinator {
    registry: RoomRegistry,
    sessions: RwLock<HashMap<SessionId, Outbox>>,
    config: RoomConfig,
}

impl Default for RoomCoordinator {
    fn default() -> Self {
        Self::new(RoomConfig::default())
    }
}

impl RoomCoordinator {
    pub fn new(config: RoomConfig) -> Self {
        Self {
            registry: RoomRegistry::new(),
            sessions: RwLock::new(HashMap::new()),
            config,
        }
    }

    pub fn registry(&self) -> &RoomRegistry {
        &self.registry
    }

    // region:    --- Session Lifecycle

    /// 검증된 사용자로 세션 생성
    pub async fn connect(&self, identity: Identity) -> (Session, Inbox) {
        let (tx, rx) = mpsc::channel(self.config.outbox_capacity);
        let session = Session::new(identity, tx);
        self.sessions
            .write()
            .await
            .insert(session.id, session.outbox());
        info!(
            "{:<12} --> 세션 연결: {} (user={})",
            "Coordinator", session.id, session.identity.id
        );
        (session, rx)
    }

    /// 연결 종료: 룸 퇴장 후 세션 제거
    pub async fn disconnect(&self, session: &Session) -> Option<LeaveOutcome> {
        let outcome = self.registry.leave(session).await;
        self.sessions.write().await.remove(&session.id);
        info!("{:<12} --> 세션 종료: {}", "Coordinator", session.id);
        outcome
    }

    // endregion: --- Session Lifecycle

    // region:    --- Dispatch

    /// 이벤트 처리. 실패는 로그로 남긴다.
    /// 권한 실패와 관리자 전용 이벤트의 모든 실패는 호출자에게만 거절 메시지를 보낸다.
    pub async fn dispatch(&self, session: &Session, event: ClientEvent) {
        let name = event.name();
        let admin_only = event.is_admin_only();
        let Err(e) = self.handle(session, event).await else {
            return;
        };

        let notify = admin_only
            || matches!(e, RoomError::Forbidden(_) | RoomError::Unauthorized(_));
        if notify {
            warn!(
                "{:<12} --> {} 거절: session={}, {}",
                "Coordinator", name, session.id, e
            );
            session.send(ServerEvent::rejected(name, &e));
        } else {
            warn!(
                "{:<12} --> {} 무시: session={}, {}",
                "Coordinator", name, session.id, e
            );
        }
    }

    /// 이벤트 종류별 처리 (관리자 전용 이벤트는 변경 전에 권한 확인)
    pub async fn handle(&self, session: &Session, event: ClientEvent) -> Result<(), RoomError> {
        if event.auction_id().trim().is_empty() {
            return Err(RoomError::Validation("auctionId is required".to_string()));
        }

        match event {
            ClientEvent::JoinAuction(p) => self.join_auction(session, p).await,
            ClientEvent::RequestInitialData(p) => self.request_initial_data(session, p).await,
            ClientEvent::PlaceBid(p) => self.place_bid(session, p).await,
            ClientEvent::UpdateLot(p) => self.update_lot(session, p).await,
            ClientEvent::UpdateMedia(p) => self.update_media(session, p).await,
            ClientEvent::StartTimer(p) => self.start_timer(session, p).await,
            ClientEvent::ResetTimer(p) => self.reset_timer(session, p).await,
            ClientEvent::StopAuction(p) => self.stop_auction(session, p).await,
            ClientEvent::StartStream(p) => self.start_stream(session, p).await,
            ClientEvent::StopStream(p) => self.stop_stream(session, p).await,
            ClientEvent::Offer(p) => self.relay_signal(session, SignalKind::Offer, p).await,
            ClientEvent::Answer(p) => self.relay_signal(session, SignalKind::Answer, p).await,
        }
    }

    async fn room(&self, auction_id: &str) -> Result<SharedRoom, RoomError> {
        self.registry
            .get(auction_id)
            .await
            .ok_or_else(|| RoomError::NotFound(format!("auction room {}", auction_id)))
    }

    // endregion: --- Dispatch

    // region:    --- Room Membership

    async fn join_auction(&self, session: &Session, p: RoomRef) -> Result<(), RoomError> {
        self.registry.join(&p.auction_id, session).await;
        Ok(())
    }

    async fn stop_auction(&self, session: &Session, p: RoomRef) -> Result<(), RoomError> {
        require_admin(&session.identity, "stop auctions")?;
        self.registry
            .close(&p.auction_id)
            .await
            .ok_or_else(|| RoomError::NotFound(format!("auction room {}", p.auction_id)))?;
        Ok(())
    }

    // endregion: --- Room Membership

    // region:    --- Auction State

    /// 입장/새로고침한 세션을 위한 초기 데이터
    pub async fn snapshot(&self, auction_id: &str) -> Result<RoomSnapshot, RoomError> {
        let room = self.room(auction_id).await?;
        let snapshot = room.lock().await.snapshot();
        Ok(snapshot)
    }

    async fn request_initial_data(&self, session: &Session, p: RoomRef) -> Result<(), RoomError> {
        let snapshot = self.snapshot(&p.auction_id).await?;
        session.send(ServerEvent::InitialData {
            client_id: session.id,
            current_bid: snapshot.current_bid,
            bid_history: snapshot.bid_history,
            current_media: snapshot.current_media,
            lot: snapshot.current_lot,
        });
        Ok(())
    }

    /// 랏 교체: 입찰 이력/현재 입찰 초기화, 미디어는 랏의 첫 번째 미디어
    async fn update_lot(&self, session: &Session, p: UpdateLotPayload) -> Result<(), RoomError> {
        require_admin(&session.identity, "change lots")?;
        let room = self.room(&p.auction_id).await?;
        let mut room = room.lock().await;

        room.state.set_lot(p.lot.clone());
        room.ledger.clear();
        info!(
            "{:<12} --> 랏 변경: auction={}, lot={}",
            "Coordinator", p.auction_id, p.lot.id
        );
        room.broadcast(&ServerEvent::LotUpdated { lot: p.lot });
        Ok(())
    }

    /// 미디어 교체 (송신자 제외 브로드캐스트)
    async fn update_media(
        &self,
        session: &Session,
        p: UpdateMediaPayload,
    ) -> Result<(), RoomError> {
        require_admin(&session.identity, "send media")?;
        let room = self.room(&p.auction_id).await?;
        let mut room = room.lock().await;

        room.state.set_media(p.media.clone());
        info!(
            "{:<12} --> 미디어 변경: auction={}, media={}",
            "Coordinator", p.auction_id, p.media.id
        );
        room.broadcast_except(&session.id, &ServerEvent::MediaUpdated { media: p.media });
        Ok(())
    }

    // endregion: --- Auction State

    // region:    --- Bid Ledger

    /// 실시간 입찰: 금액 검증 없이 도착 순서대로 추가
    async fn place_bid(&self, session: &Session, p: PlaceBidPayload) -> Result<(), RoomError> {
        let PlaceBidPayload {
            auction_id,
            mut bid,
        } = p;
        if bid.auction_id.is_empty() {
            bid.auction_id = auction_id.clone();
        } else if bid.auction_id != auction_id {
            return Err(RoomError::Validation(format!(
                "bid for auction {} sent to room {}",
                bid.auction_id, auction_id
            )));
        }

        let room = self.room(&auction_id).await?;
        let mut room = room.lock().await;

        room.ledger.append(bid);
        info!(
            "{:<12} --> 입찰: auction={}, session={}, count={}",
            "Coordinator",
            auction_id,
            session.id,
            room.ledger.len()
        );
        room.broadcast(&ServerEvent::BidUpdated {
            bid_list: room.ledger.history().to_vec(),
            current_bid: room.ledger.current(),
        });
        Ok(())
    }

    // endregion: --- Bid Ledger

    // region:    --- Timer

    async fn start_timer(&self, session: &Session, p: StartTimerPayload) -> Result<(), RoomError> {
        require_admin(&session.identity, "start the timer")?;
        let duration = u32::try_from(p.duration)
            .ok()
            .filter(|d| *d > 0)
            .ok_or_else(|| {
                RoomError::Validation(format!("invalid timer duration {}", p.duration))
            })?;

        let room = self.room(&p.auction_id).await?;
        let mut room = room.lock().await;
        TimerController::start(&mut room, duration, self.config.tick_period);

        session.send(ServerEvent::TimerStarted {
            auction_id: p.auction_id,
            duration: i64::from(duration),
        });
        Ok(())
    }

    /// 타이머 리셋: 기존 카운트다운 취소 후 기본 시간으로 재시작, 관리자에게 확인 메시지
    async fn reset_timer(&self, session: &Session, p: RoomRef) -> Result<(), RoomError> {
        require_admin(&session.identity, "reset the timer")?;
        let room = self.room(&p.auction_id).await?;
        let mut room = room.lock().await;

        let duration = self.config.reset_duration_secs;
        TimerController::start(&mut room, duration, self.config.tick_period);

        session.send(ServerEvent::TimerReset {
            auction_id: p.auction_id,
            message: format!("Timer reset to {} seconds", duration),
            duration: i64::from(duration),
        });
        Ok(())
    }

    // endregion: --- Timer

    // region:    --- Stream & Signaling

    async fn start_stream(&self, session: &Session, p: RoomRef) -> Result<(), RoomError> {
        require_admin(&session.identity, "start a stream")?;
        let room = self.room(&p.auction_id).await?;
        let room = room.lock().await;

        info!(
            "{:<12} --> 스트림 시작: auction={}, broadcaster={}",
            "Coordinator", p.auction_id, session.id
        );
        room.broadcast_except(
            &session.id,
            &ServerEvent::StreamStarted {
                auction_id: p.auction_id.clone(),
                broadcaster_id: session.id,
            },
        );
        session.send(ServerEvent::AwaitingOffer {
            auction_id: p.auction_id,
        });
        Ok(())
    }

    async fn stop_stream(&self, session: &Session, p: RoomRef) -> Result<(), RoomError> {
        require_admin(&session.identity, "stop a stream")?;
        let room = self.room(&p.auction_id).await?;
        let room = room.lock().await;

        info!("{:<12} --> 스트림 중지: {}", "Coordinator", p.auction_id);
        room.broadcast_except(
            &session.id,
            &ServerEvent::StreamStopped {
                auction_id: p.auction_id,
                message: "Stream has been stopped".to_string(),
            },
        );
        Ok(())
    }

    async fn relay_signal(
        &self,
        session: &Session,
        kind: SignalKind,
        p: SignalPayload,
    ) -> Result<(), RoomError> {
        let room = self.room(&p.auction_id).await?;
        let room = room.lock().await;
        let directory = self.sessions.read().await;
        signaling::relay(&room, &directory, session.id, kind, p)?;
        Ok(())
    }

    // endregion: --- Stream & Signaling
}
