//! 캘린더 동기화 패스.
//!
//! 한 번의 패스는 피드 조회 → 출처 기록 → 단일 트랜잭션 UPSERT로 구성됩니다.
//! 피드 조회가 실패하면 저장소는 변경되지 않습니다.

use std::time::Instant;

use chrono::{DateTime, Utc};
use refdata_core::{DateRange, EventProvider, EventRecord, EventStore};
use tracing::{info, warn};

use crate::config::{check_window_days, CalendarConfig};
use crate::modules::upcoming::list_upcoming;
use crate::{Result, SyncStats};

/// 단일 동기화 패스 실행.
pub async fn run_sync_pass(
    provider: &dyn EventProvider,
    store: &dyn EventStore,
    range: DateRange,
) -> Result<SyncStats> {
    let start = Instant::now();
    let mut stats = SyncStats::new();
    let source = provider.source_name().to_string();

    info!(source = %source, range = %range, "캘린더 동기화 패스 시작");

    let mut records = match provider.fetch_events(range).await {
        Ok(records) => records,
        Err(e) => {
            warn!(source = %source, error = %e, "피드 조회 실패, 저장소 변경 없음");
            return Err(e.into());
        }
    };
    stats.fetched = records.len();

    for record in &mut records {
        record.source.clone_from(&source);
    }

    let summary = store.upsert_pass(&records).await?;
    stats.apply(summary);
    stats.elapsed = start.elapsed();

    Ok(stats)
}

/// run-once 실행 결과.
#[derive(Debug)]
pub struct RunOnceReport {
    /// 동기화 통계
    pub stats: SyncStats,
    /// 목록 구간 내 예정 이벤트
    pub upcoming: Vec<EventRecord>,
}

/// 한 번 동기화 후 예정 이벤트 목록 조회.
///
/// 루프 없이 패스 하나만 실행합니다.
pub async fn run_once(
    provider: &dyn EventProvider,
    store: &dyn EventStore,
    config: &CalendarConfig,
    now: DateTime<Utc>,
) -> Result<RunOnceReport> {
    let range = DateRange::forward(now, config.default_forward_days);
    let stats = run_sync_pass(provider, store, range).await?;
    stats.log_summary("캘린더 동기화 (run-once)");

    let upcoming = list_upcoming(store, now, config.listing_window_days).await?;
    Ok(RunOnceReport { stats, upcoming })
}

/// 넓은 전방 구간으로 한 번 동기화 (재적재용).
///
/// `days`를 지정하지 않으면 `backfill_forward_days`를 사용합니다.
/// 구간이 허용 범위를 벗어나면 피드를 호출하지 않고 설정 에러를 반환합니다.
pub async fn run_backfill(
    provider: &dyn EventProvider,
    store: &dyn EventStore,
    config: &CalendarConfig,
    now: DateTime<Utc>,
    days: Option<u32>,
) -> Result<SyncStats> {
    let days = check_window_days(
        "backfill --days",
        days.unwrap_or(config.backfill_forward_days),
    )?;
    let stats = run_sync_pass(provider, store, DateRange::forward(now, days)).await?;
    stats.log_summary("캘린더 백필");
    Ok(stats)
}
