/// WebSocket 게이트웨이
/// 1. 업그레이드 전에 자격 증명 검증 (실패 시 401, 소켓 생성 안 함)
/// 2. 세션 생성 및 송신 작업 시작
/// 3. 수신 프레임을 코디네이터로 디스패치
/// 4. 연결 종료 시 룸 퇴장
// region:    --- Imports
use crate::auction::events::ClientEvent;
use crate::auth::{authenticate, Identity};
use crate::handlers::AppState;
use crate::room::coordinator::RoomCoordinator;
use crate::room::session::Inbox;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

// endregion: --- Imports

#[derive(Debug, Default, Deserialize)]
pub struct ConnectParams {
    pub token: Option<String>,
}

/// WebSocket 업그레이드 요청 처리
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Query(params): Query<ConnectParams>,
    headers: HeaderMap,
) -> Response {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .or(params.token);

    let identity = match authenticate(state.verifier.as_ref(), authorization.as_deref()) {
        Ok(identity) => identity,
        Err(e) => {
            warn!("{:<12} --> 연결 거부: {}", "Gateway", e);
            return (
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({
                    "error": e.to_string(),
                    "code": "UNAUTHORIZED"
                })),
            )
                .into_response();
        }
    };

    let coordinator = Arc::clone(&state.coordinator);
    ws.on_upgrade(move |socket| handle_socket(socket, coordinator, identity))
}

async fn handle_socket(socket: WebSocket, coordinator: Arc<RoomCoordinator>, identity: Identity) {
    let (session, rx) = coordinator.connect(identity).await;
    let (sender, mut receiver) = socket.split();

    let mut send_task = tokio::spawn(forward_events(sender, rx));

    loop {
        tokio::select! {
            _ = &mut send_task => break,
            frame = receiver.next() => match frame {
                Some(Ok(Message::Text(text))) => match ClientEvent::from_text(&text) {
                    Ok(event) => coordinator.dispatch(&session, event).await,
                    Err(e) => warn!(
                        "{:<12} --> 잘못된 프레임 무시: session={}, {}",
                        "Gateway", session.id, e
                    ),
                },
                Some(Ok(Message::Binary(_))) => {
                    warn!("{:<12} --> 바이너리 프레임 미지원: {}", "Gateway", session.id);
                }
                Some(Ok(Message::Ping(_))) | Some(Ok(Message::Pong(_))) => {}
                Some(Ok(Message::Close(_))) | None => break,
                Some(Err(e)) => {
                    debug!("{:<12} --> 수신 오류: session={}, {}", "Gateway", session.id, e);
                    break;
                }
            },
        }
    }

    coordinator.disconnect(&session).await;
    send_task.abort();
    info!("{:<12} --> 연결 종료: {}", "Gateway", session.id);
}

/// 세션 송신 채널의 이벤트를 텍스트 프레임으로 전송
async fn forward_events<S>(mut sender: S, mut rx: Inbox)
where
    S: futures::Sink<Message> + Unpin,
{
    while let Some(event) = rx.recv().await {
        let text = match serde_json::to_string(&event) {
            Ok(text) => text,
            Err(e) => {
                warn!("{:<12} --> 직렬화 오류: {}", "Gateway", e);
                continue;
            }
        };
        if sender.send(Message::Text(text)).await.is_err() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auction::events::ServerEvent;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_forward_events_writes_text_frames() {
        let (tx, rx) = mpsc::channel(4);
        let (sink, mut frames) = futures::channel::mpsc::unbounded::<Message>();

        tx.try_send(ServerEvent::TimerUpdate { remaining_time: 4 }).unwrap();
        drop(tx);
        forward_events(sink, rx).await;

        match frames.next().await {
            Some(Message::Text(text)) => {
                let value: serde_json::Value = serde_json::from_str(&text).unwrap();
                assert_eq!(value["event"], "timerUpdate");
                assert_eq!(value["data"]["remainingTime"], 4);
            }
            other => panic!("unexpected frame: {:?}", other),
        }
        assert!(frames.next().await.is_none());
    }
}
