//! 캘린더 동기화 데몬 루프.
//!
//! # 상태 전이
//!
//! ```text
//! Idle ──(동기화 필요)──▶ Syncing ──▶ Idle
//!   │
//!   └──(종료 토큰)──▶ Stopping ──▶ Stopped
//! ```
//!
//! - 시작 직후 한 번 동기화합니다 (`last_sync_at`이 비어 있음).
//! - 대기 중에는 `check_frequency`마다 동기화 필요 여부를 점검합니다.
//!   대기는 `poll_granularity` 단위로 나뉘며 종료 토큰이 취소되면 즉시 깨어납니다.
//! - 진행 중인 패스는 종료 신호와 무관하게 끝까지 실행됩니다.
//! - 패스 실패는 로그만 남기고 다음 점검 주기에 다시 시도합니다.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use refdata_core::{DateRange, EventProvider, EventStore};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::config::CalendarConfig;
use crate::modules::calendar_sync::run_sync_pass;
use crate::{Result, SyncStats};

/// 루프 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopPhase {
    /// 다음 점검 대기
    Idle,
    /// 패스 실행 중
    Syncing,
    /// 종료 처리 중
    Stopping,
    /// 종료됨
    Stopped,
}

/// 프로세스 로컬 동기화 상태 (영속화하지 않음)
#[derive(Debug, Clone)]
pub struct SyncState {
    pub phase: LoopPhase,
    /// 마지막으로 성공한 동기화 시각
    pub last_sync_at: Option<DateTime<Utc>>,
    pub passes_completed: u64,
    pub passes_failed: u64,
}

impl Default for SyncState {
    fn default() -> Self {
        Self {
            phase: LoopPhase::Idle,
            last_sync_at: None,
            passes_completed: 0,
            passes_failed: 0,
        }
    }
}

impl SyncState {
    /// 동기화가 필요한지 여부.
    ///
    /// 한 번도 동기화하지 않았거나 마지막 동기화 후 `interval` 이상 지났으면 `true`.
    pub fn is_due(&self, now: DateTime<Utc>, interval: chrono::Duration) -> bool {
        match self.last_sync_at {
            None => true,
            Some(last) => now - last >= interval,
        }
    }
}

/// 현재 시각 제공자.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// 시스템 시계.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// 캘린더 동기화 루프.
pub struct CalendarSyncLoop {
    provider: Arc<dyn EventProvider>,
    store: Arc<dyn EventStore>,
    config: CalendarConfig,
    clock: Arc<dyn Clock>,
    shutdown: CancellationToken,
    state: SyncState,
}

impl CalendarSyncLoop {
    /// 새 루프 생성.
    pub fn new(
        provider: Arc<dyn EventProvider>,
        store: Arc<dyn EventStore>,
        config: CalendarConfig,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            provider,
            store,
            config,
            clock: Arc::new(SystemClock),
            shutdown,
            state: SyncState::default(),
        }
    }

    /// 시계 교체.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn state(&self) -> &SyncState {
        &self.state
    }

    /// 전방 구간 `[now, now + default_forward_days]` 동기화 패스 실행.
    ///
    /// 성공 시에만 `last_sync_at`을 갱신합니다.
    pub async fn run_pass(&mut self) -> Result<SyncStats> {
        self.state.phase = LoopPhase::Syncing;
        let range = DateRange::forward(self.clock.now(), self.config.default_forward_days);

        let result = run_sync_pass(self.provider.as_ref(), self.store.as_ref(), range).await;
        match &result {
            Ok(_) => {
                self.state.last_sync_at = Some(self.clock.now());
                self.state.passes_completed += 1;
            }
            Err(_) => self.state.passes_failed += 1,
        }

        self.state.phase = LoopPhase::Idle;
        result
    }

    /// 동기화가 필요하면 패스 실행. 실행하지 않았으면 `None`.
    pub async fn tick(&mut self) -> Option<Result<SyncStats>> {
        let now = self.clock.now();
        if !self.state.is_due(now, self.config.sync_interval()) {
            if let Some(last) = self.state.last_sync_at {
                debug!(
                    last_sync_at = %last,
                    next_due = %(last + self.config.sync_interval()),
                    "동기화 불필요"
                );
            }
            return None;
        }
        Some(self.run_pass().await)
    }

    /// 종료 토큰이 취소될 때까지 실행하고 최종 상태를 반환.
    pub async fn run(mut self) -> SyncState {
        info!(
            source = self.provider.source_name(),
            store = self.store.backend_name(),
            sync_interval_secs = self.config.sync_interval_seconds,
            check_frequency_secs = self.config.check_frequency_seconds,
            forward_days = self.config.default_forward_days,
            "캘린더 동기화 루프 시작"
        );

        loop {
            if self.shutdown.is_cancelled() {
                break;
            }

            match self.tick().await {
                Some(Ok(stats)) => {
                    stats.log_summary("캘린더 동기화");
                }
                Some(Err(e)) => {
                    error!(
                        error = %e,
                        failed = self.state.passes_failed,
                        "캘린더 동기화 실패, 다음 점검 주기에 재시도"
                    );
                }
                None => {}
            }

            if !self.idle_wait(self.config.check_frequency()).await {
                break;
            }
        }

        self.state.phase = LoopPhase::Stopping;
        info!(
            completed = self.state.passes_completed,
            failed = self.state.passes_failed,
            "종료 신호 수신, 캘린더 동기화 루프 종료 중"
        );
        self.state.phase = LoopPhase::Stopped;
        self.state
    }

    /// `total` 동안 대기. 종료 토큰이 취소되면 `false`.
    ///
    /// 마감 시각을 표현할 수 없으면 종료 토큰이 취소될 때까지 대기합니다.
    async fn idle_wait(&self, total: Duration) -> bool {
        let deadline = Instant::now().checked_add(total);
        let step = self.config.poll_granularity();

        loop {
            let now = Instant::now();
            let wait = match deadline {
                Some(deadline) if now >= deadline => return !self.shutdown.is_cancelled(),
                Some(deadline) => step.min(deadline - now),
                None => step,
            };
            tokio::select! {
                _ = self.shutdown.cancelled() => return false,
                _ = tokio::time::sleep(wait) => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_is_due_when_never_synced() {
        let state = SyncState::default();
        assert!(state.is_due(at(0), chrono::Duration::hours(24)));
    }

    #[test]
    fn test_is_due_boundary() {
        let state = SyncState {
            last_sync_at: Some(at(0)),
            ..SyncState::default()
        };
        let interval = chrono::Duration::hours(24);

        assert!(!state.is_due(at(23), interval));
        assert!(!state.is_due(at(0) + interval - chrono::Duration::seconds(1), interval));
        assert!(state.is_due(at(0) + interval, interval));
        assert!(state.is_due(at(0) + interval + chrono::Duration::hours(3), interval));
    }

    #[test]
    fn test_default_state() {
        let state = SyncState::default();
        assert_eq!(state.phase, LoopPhase::Idle);
        assert_eq!(state.passes_completed, 0);
        assert!(state.last_sync_at.is_none());
    }
}
