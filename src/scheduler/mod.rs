/// 경매 룸 카운트다운 타이머
/// 룸마다 최대 하나의 카운트다운만 동작한다. 새 카운트다운은 항상 기존 것을 취소한 뒤 시작된다.
/// Idle -> Running -> Idle (만료), Running/Idle -> Running (start/reset)
// region:    --- Imports
use crate::auction::events::ServerEvent;
use crate::room::AuctionRoom;
use std::sync::Weak;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Duration, Instant};
use tracing::{debug, info, warn};

// endregion: --- Imports

// region:    --- Room Timer
/// 룸별 타이머 핸들 (start/cancel 만이 상태를 바꾼다)
#[derive(Debug, Default)]
pub struct RoomTimer {
    remaining: i64,
    generation: u64,
    handle: Option<JoinHandle<()>>,
}

impl RoomTimer {
    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    pub fn remaining(&self) -> i64 {
        self.remaining
    }

    /// 동작 중인 카운트다운 취소 (이미 Idle 이면 아무것도 하지 않음)
    pub fn cancel(&mut self) -> bool {
        match self.handle.take() {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    fn arm(&mut self, duration: i64) -> u64 {
        self.cancel();
        self.generation += 1;
        self.remaining = duration;
        self.generation
    }

    /// 현재 세대의 틱이면 1초 감소 후 남은 시간 반환
    fn tick(&mut self, generation: u64) -> Option<i64> {
        if generation != self.generation || self.handle.is_none() {
            return None;
        }
        self.remaining -= 1;
        Some(self.remaining)
    }

    fn finish(&mut self) {
        self.handle = None;
    }
}

impl Drop for RoomTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

// endregion: --- Room Timer

// region:    --- Timer Controller
pub struct TimerController;

impl TimerController {
    /// 카운트다운 시작 (기존 카운트다운은 먼저 취소)
    /// 호출자는 룸 잠금을 보유한 상태여야 한다.
    pub fn start(room: &mut AuctionRoom, duration: u32, period: Duration) {
        let generation = room.timer.arm(i64::from(duration));
        let handle = tokio::spawn(run_countdown(
            room.downgrade(),
            room.auction_id().to_string(),
            generation,
            period,
        ));
        room.timer.handle = Some(handle);
        info!(
            "{:<12} --> 카운트다운 시작: auction={}, duration={}",
            "Timer",
            room.auction_id(),
            duration
        );
    }

    pub fn cancel(room: &mut AuctionRoom) -> bool {
        let cancelled = room.timer.cancel();
        if cancelled {
            info!("{:<12} --> 카운트다운 취소: {}", "Timer", room.auction_id());
        }
        cancelled
    }
}

/// 1초마다 남은 시간을 브로드캐스트하고 0 이 되면 경매 종료를 알린다.
async fn run_countdown(
    weak: Weak<Mutex<AuctionRoom>>,
    auction_id: String,
    generation: u64,
    period: Duration,
) {
    let mut interval = interval_at(Instant::now() + period, period);
    loop {
        interval.tick().await;

        let Some(shared) = weak.upgrade() else {
            warn!(
                "{:<12} --> 룸이 없어 카운트다운 중단: {}",
                "Timer", auction_id
            );
            return;
        };
        let mut room = shared.lock().await;

        let Some(remaining) = room.timer.tick(generation) else {
            debug!("{:<12} --> 이전 카운트다운 종료: {}", "Timer", auction_id);
            return;
        };

        debug!(
            "{:<12} --> 남은 시간: auction={}, remaining={}",
            "Timer", auction_id, remaining
        );
        room.broadcast(&ServerEvent::TimerUpdate {
            remaining_time: remaining,
        });

        if remaining <= 0 {
            room.timer.finish();
            room.broadcast(&ServerEvent::AuctionEnded {
                auction_id: auction_id.clone(),
                message: "Auction ended".to_string(),
            });
            info!("{:<12} --> 경매 종료: {}", "Timer", auction_id);
            return;
        }
    }
}

// endregion: --- Timer Controller

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_timer() {
        let mut timer = RoomTimer::default();
        assert!(!timer.is_running());
        assert!(!timer.cancel());
        assert_eq!(timer.tick(0), None);
    }

    #[test]
    fn test_rearm_invalidates_previous_generation() {
        let mut timer = RoomTimer::default();
        let first = timer.arm(5);
        let second = timer.arm(3);
        assert_ne!(first, second);
        assert_eq!(timer.remaining(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_countdown_task_decrements() {
        let shared = AuctionRoom::shared("A1");
        {
            let mut room = shared.lock().await;
            TimerController::start(&mut room, 2, Duration::from_secs(1));
            assert!(room.timer.is_running());
        }

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(shared.lock().await.timer.remaining(), 1);

        tokio::time::sleep(Duration::from_secs(1)).await;
        let room = shared.lock().await;
        assert_eq!(room.timer.remaining(), 0);
        assert!(!room.timer.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_countdown() {
        let shared = AuctionRoom::shared("A1");
        {
            let mut room = shared.lock().await;
            TimerController::start(&mut room, 5, Duration::from_secs(1));
            assert!(TimerController::cancel(&mut room));
            assert!(!TimerController::cancel(&mut room));
        }

        tokio::time::sleep(Duration::from_secs(3)).await;
        let room = shared.lock().await;
        assert_eq!(room.timer.remaining(), 5);
        assert!(!room.timer.is_running());
    }
}
