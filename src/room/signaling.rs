/// WebRTC offer/answer 중계
/// signalData 는 해석하지 않고 그대로 전달하며, 상태를 저장하지 않는다.
// region:    --- Imports
use super::session::{deliver, Outbox, SessionId};
use super::AuctionRoom;
use crate::auction::events::{ServerEvent, SignalPayload};
use crate::error::RoomError;
use std::collections::{HashMap, HashSet};
use tracing::debug;

// endregion: --- Imports

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKind {
    Offer,
    Answer,
}

impl SignalKind {
    fn event(self, from: SessionId, payload: SignalPayload) -> ServerEvent {
        match self {
            SignalKind::Offer => ServerEvent::Offer {
                auction_id: payload.auction_id,
                from,
                signal_data: payload.signal_data,
            },
            SignalKind::Answer => ServerEvent::Answer {
                auction_id: payload.auction_id,
                from,
                signal_data: payload.signal_data,
            },
        }
    }
}

/// 시그널 중계
/// 대상이 없으면 송신자를 제외한 룸 전체에, 대상이 있으면 대상 세션과 룸(송신자 제외)에 한 번씩 전달한다.
/// 전달된 세션 수를 반환한다.
pub fn relay(
    room: &AuctionRoom,
    directory: &HashMap<SessionId, Outbox>,
    from: SessionId,
    kind: SignalKind,
    payload: SignalPayload,
) -> Result<usize, RoomError> {
    let target = payload.target_id;
    let target_outbox = match target {
        Some(id) if id != from => {
            let outbox = room
                .outbox_of(&id)
                .or_else(|| directory.get(&id))
                .ok_or_else(|| RoomError::NotFound(format!("signal target {}", id)))?;
            Some((id, outbox.clone()))
        }
        _ => None,
    };

    let event = kind.event(from, payload);
    let mut delivered: HashSet<SessionId> = HashSet::new();

    if let Some((id, outbox)) = target_outbox {
        deliver(&id, &outbox, event.clone());
        delivered.insert(id);
    }
    for id in room.member_ids() {
        if id == from || delivered.contains(&id) {
            continue;
        }
        room.send_to(&id, event.clone());
        delivered.insert(id);
    }

    debug!(
        "{:<12} --> {:?} 중계: auction={}, from={}, recipients={}",
        "Signaling",
        kind,
        room.auction_id(),
        from,
        delivered.len()
    );
    Ok(delivered.len())
}
