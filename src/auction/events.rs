// region:    --- Imports
use crate::auction::model::{Lot, MediaItem};
use crate::bidding::model::Bid;
use crate::error::RoomError;
use crate::room::session::SessionId;
use serde::{Deserialize, Serialize};

// endregion: --- Imports

// region:    --- Client Events
/// 경매 룸만 지정하는 페이로드
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomRef {
    pub auction_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceBidPayload {
    pub auction_id: String,
    pub bid: Bid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLotPayload {
    pub auction_id: String,
    pub lot: Lot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMediaPayload {
    pub auction_id: String,
    pub media: MediaItem,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartTimerPayload {
    pub auction_id: String,
    pub duration: i64,
}

/// WebRTC 시그널링 페이로드 (signalData 는 해석하지 않음)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalPayload {
    pub auction_id: String,
    pub signal_data: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_id: Option<SessionId>,
}

/// 클라이언트 -> 서버 이벤트
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientEvent {
    JoinAuction(RoomRef),
    RequestInitialData(RoomRef),
    PlaceBid(PlaceBidPayload),
    UpdateLot(UpdateLotPayload),
    UpdateMedia(UpdateMediaPayload),
    StartTimer(StartTimerPayload),
    ResetTimer(RoomRef),
    StopAuction(RoomRef),
    StartStream(RoomRef),
    StopStream(RoomRef),
    Offer(SignalPayload),
    Answer(SignalPayload),
}

impl ClientEvent {
    /// 텍스트 프레임 디코딩
    pub fn from_text(text: &str) -> Result<Self, RoomError> {
        serde_json::from_str(text).map_err(|e| RoomError::Validation(e.to_string()))
    }

    pub fn name(&self) -> &'static str {
        match self {
            ClientEvent::JoinAuction(_) => "joinAuction",
            ClientEvent::RequestInitialData(_) => "requestInitialData",
            ClientEvent::PlaceBid(_) => "placeBid",
            ClientEvent::UpdateLot(_) => "updateLot",
            ClientEvent::UpdateMedia(_) => "updateMedia",
            ClientEvent::StartTimer(_) => "startTimer",
            ClientEvent::ResetTimer(_) => "resetTimer",
            ClientEvent::StopAuction(_) => "stopAuction",
            ClientEvent::StartStream(_) => "startStream",
            ClientEvent::StopStream(_) => "stopStream",
            ClientEvent::Offer(_) => "offer",
            ClientEvent::Answer(_) => "answer",
        }
    }

    /// 관리자 전용 이벤트 (실패 시 항상 호출자에게 거절 응답)
    pub fn is_admin_only(&self) -> bool {
        matches!(
            self,
            ClientEvent::UpdateLot(_)
                | ClientEvent::UpdateMedia(_)
                | ClientEvent::StartTimer(_)
                | ClientEvent::ResetTimer(_)
                | ClientEvent::StopAuction(_)
                | ClientEvent::StartStream(_)
                | ClientEvent::StopStream(_)
        )
    }

    pub fn auction_id(&self) -> &str {
        match self {
            ClientEvent::JoinAuction(p)
            | ClientEvent::RequestInitialData(p)
            | ClientEvent::ResetTimer(p)
            | ClientEvent::StopAuction(p)
            | ClientEvent::StartStream(p)
            | ClientEvent::StopStream(p) => &p.auction_id,
            ClientEvent::PlaceBid(p) => &p.auction_id,
            ClientEvent::UpdateLot(p) => &p.auction_id,
            ClientEvent::UpdateMedia(p) => &p.auction_id,
            ClientEvent::StartTimer(p) => &p.auction_id,
            ClientEvent::Offer(p) | ClientEvent::Answer(p) => &p.auction_id,
        }
    }
}

// endregion: --- Client Events

// region:    --- Server Events
/// 서버 -> 클라이언트 이벤트
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "event",
    content = "data",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum ServerEvent {
    AuctionJoined {
        client_id: SessionId,
        auction_id: String,
    },
    UserJoined {
        client_id: SessionId,
        auction_id: String,
    },
    UserLeft {
        client_id: SessionId,
        auction_id: String,
    },
    LotUpdated {
        lot: Lot,
    },
    MediaUpdated {
        media: MediaItem,
    },
    BidUpdated {
        bid_list: Vec<Bid>,
        current_bid: Bid,
    },
    TimerUpdate {
        remaining_time: i64,
    },
    AuctionEnded {
        auction_id: String,
        message: String,
    },
    AuctionStopped {
        auction_id: String,
        message: String,
    },
    InitialData {
        client_id: SessionId,
        current_bid: Bid,
        bid_history: Vec<Bid>,
        current_media: Option<MediaItem>,
        lot: Lot,
    },
    StreamStarted {
        auction_id: String,
        broadcaster_id: SessionId,
    },
    StreamStopped {
        auction_id: String,
        message: String,
    },
    AwaitingOffer {
        auction_id: String,
    },
    Offer {
        auction_id: String,
        from: SessionId,
        signal_data: serde_json::Value,
    },
    Answer {
        auction_id: String,
        from: SessionId,
        signal_data: serde_json::Value,
    },
    TimerStarted {
        auction_id: String,
        duration: i64,
    },
    TimerReset {
        auction_id: String,
        message: String,
        duration: i64,
    },
    ActionRejected {
        event: String,
        code: String,
        message: String,
    },
}

impl ServerEvent {
    pub fn rejected(event: &str, error: &RoomError) -> Self {
        ServerEvent::ActionRejected {
            event: event.to_string(),
            code: error.code().to_string(),
            message: error.to_string(),
        }
    }
}

// endregion: --- Server Events

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_place_bid() {
        let text = r#"{"event":"placeBid","data":{"auctionId":"A1","bid":{"auctionId":"A1","username":"U1","bidAmount":150}}}"#;
        let event = ClientEvent::from_text(text).unwrap();
        assert_eq!(event.name(), "placeBid");
        assert_eq!(event.auction_id(), "A1");
        match event {
            ClientEvent::PlaceBid(p) => {
                assert_eq!(p.bid.username, "U1");
                assert_eq!(p.bid.bid_amount, 150.0);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_decode_lot_with_media() {
        let text = json!({
            "event": "updateLot",
            "data": {
                "auctionId": "A1",
                "lot": {
                    "id": "L1",
                    "title": "Truck",
                    "description": "Blue truck",
                    "startPrice": 100,
                    "increment": 10,
                    "media": [{"id": 7, "type": "video", "url": "/v.mp4", "description": "walkaround"}]
                }
            }
        })
        .to_string();
        match ClientEvent::from_text(&text).unwrap() {
            ClientEvent::UpdateLot(p) => {
                assert_eq!(p.lot.start_price, 100.0);
                assert_eq!(p.lot.media.len(), 1);
                assert_eq!(p.lot.media[0].kind, crate::auction::model::MediaType::Video);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_decode_signal_without_target() {
        let text = r#"{"event":"offer","data":{"auctionId":"A1","signalData":{"sdp":"v=0"}}}"#;
        match ClientEvent::from_text(text).unwrap() {
            ClientEvent::Offer(p) => {
                assert_eq!(p.target_id, None);
                assert_eq!(p.signal_data, json!({"sdp": "v=0"}));
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_admin_only_events() {
        let room = || RoomRef {
            auction_id: "A1".to_string(),
        };
        assert!(ClientEvent::ResetTimer(room()).is_admin_only());
        assert!(ClientEvent::StopAuction(room()).is_admin_only());
        assert!(ClientEvent::StartStream(room()).is_admin_only());
        assert!(ClientEvent::StopStream(room()).is_admin_only());
        assert!(ClientEvent::StartTimer(StartTimerPayload {
            auction_id: "A1".to_string(),
            duration: 10,
        })
        .is_admin_only());

        assert!(!ClientEvent::JoinAuction(room()).is_admin_only());
        assert!(!ClientEvent::RequestInitialData(room()).is_admin_only());
        assert!(!ClientEvent::Offer(SignalPayload {
            auction_id: "A1".to_string(),
            signal_data: json!({}),
            target_id: None,
        })
        .is_admin_only());
    }

    #[test]
    fn test_malformed_frames_are_validation_errors() {
        for text in [
            "not json",
            r#"{"event":"launchRocket","data":{}}"#,
            r#"{"event":"placeBid","data":{"auctionId":"A1"}}"#,
        ] {
            let err = ClientEvent::from_text(text).unwrap_err();
            assert_eq!(err.code(), "VALIDATION_ERROR", "frame: {}", text);
        }
    }

    #[test]
    fn test_encode_server_event_shape() {
        let event = ServerEvent::TimerUpdate { remaining_time: 2 };
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({"event": "timerUpdate", "data": {"remainingTime": 2}})
        );

        let rejected = ServerEvent::rejected(
            "updateLot",
            &RoomError::Forbidden("only admins can change lots".into()),
        );
        assert_eq!(
            serde_json::to_value(&rejected).unwrap(),
            json!({
                "event": "actionRejected",
                "data": {
                    "event": "updateLot",
                    "code": "FORBIDDEN",
                    "message": "forbidden: only admins can change lots"
                }
            })
        );
    }
}
