//! 인메모리 이벤트 저장소.
//!
//! 자연 키 순으로 정렬된 `BTreeMap`에 이벤트를 보관합니다.
//! `--dry-run` 실행과 테스트에서 사용하며, PostgreSQL 저장소와 동일한
//! UPSERT / 패스 단위 롤백 규칙을 따릅니다.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use refdata_core::{DateRange, EventKey, EventRecord, EventStore, StoreError, UpsertSummary};
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// 인메모리 [`EventStore`].
#[derive(Debug, Default)]
pub struct MemoryEventStore {
    rows: RwLock<BTreeMap<EventKey, EventRecord>>,
}

impl MemoryEventStore {
    /// 빈 저장소 생성.
    pub fn new() -> Self {
        Self::default()
    }

    /// 저장된 전체 레코드 (키 순).
    pub async fn snapshot(&self) -> Vec<EventRecord> {
        self.rows.read().await.values().cloned().collect()
    }
}

/// 맵에 레코드 하나를 반영. 신규 삽입이면 `true`.
fn apply(
    rows: &mut BTreeMap<EventKey, EventRecord>,
    record: &EventRecord,
) -> Result<bool, StoreError> {
    let key = record.key();
    record.validate().map_err(|reason| StoreError::RecordWrite {
        key: key.to_string(),
        reason,
    })?;

    let now = Utc::now();
    match rows.get_mut(&key) {
        Some(existing) => {
            existing.event_name = record.event_name.clone();
            existing.importance = record.importance;
            existing.notes = record.notes.clone();
            existing.source = record.source.clone();
            existing.updated_at = Some(now);
            Ok(false)
        }
        None => {
            let mut stored = record.clone();
            stored.updated_at = Some(now);
            rows.insert(key, stored);
            Ok(true)
        }
    }
}

#[async_trait]
impl EventStore for MemoryEventStore {
    async fn ensure_schema(&self) -> Result<(), StoreError> {
        debug!("인메모리 저장소: 스키마 준비 불필요");
        Ok(())
    }

    async fn upsert(&self, record: &EventRecord) -> Result<bool, StoreError> {
        let mut rows = self.rows.write().await;
        apply(&mut rows, record)
    }

    async fn upsert_pass(&self, records: &[EventRecord]) -> Result<UpsertSummary, StoreError> {
        let mut rows = self.rows.write().await;

        // 사본에 적용 후 전부 성공했을 때만 교체
        let mut staged = rows.clone();
        let mut summary = UpsertSummary::default();
        for record in records {
            match apply(&mut staged, record) {
                Ok(inserted) => summary.record(inserted),
                Err(e) => {
                    warn!(key = %record.key(), error = %e, "레코드 저장 실패, 패스 전체 롤백");
                    return Err(e);
                }
            }
        }

        *rows = staged;
        Ok(summary)
    }

    async fn query_range(&self, range: DateRange) -> Result<Vec<EventRecord>, StoreError> {
        let rows = self.rows.read().await;
        Ok(rows
            .values()
            .filter(|r| range.contains(r.event_date))
            .cloned()
            .collect())
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.rows.read().await.len() as u64)
    }

    fn backend_name(&self) -> &str {
        "memory"
    }
}
