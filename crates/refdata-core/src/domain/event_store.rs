//! 이벤트 저장소 추상화.
//!
//! 자연 키 기반 멱등 UPSERT와 구간 조회를 제공하는 영속화 인터페이스입니다.
//! PostgreSQL, 인메모리 등 저장 엔진을 수집 루프 변경 없이 교체할 수 있습니다.

use async_trait::async_trait;
use thiserror::Error;

use super::{DateRange, EventRecord};

/// EventStore 에러.
#[derive(Debug, Error)]
pub enum StoreError {
    /// 데이터베이스 에러
    #[error("데이터베이스 에러: {0}")]
    Database(String),

    /// 개별 레코드 저장 실패. `key`는 문제 레코드의 자연 키입니다.
    #[error("레코드 저장 실패 [{key}]: {reason}")]
    RecordWrite { key: String, reason: String },

    /// 스키마 준비 실패
    #[error("스키마 준비 실패: {0}")]
    Schema(String),

    /// 저장된 행 변환 실패
    #[error("레코드 변환 실패: {0}")]
    Decode(String),
}

/// 패스 단위 UPSERT 결과.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpsertSummary {
    /// 신규 삽입 행 수
    pub inserted: usize,
    /// 기존 행 갱신 수
    pub updated: usize,
}

impl UpsertSummary {
    /// 단건 결과 반영 (`true` = 삽입).
    pub fn record(&mut self, inserted: bool) {
        if inserted {
            self.inserted += 1;
        } else {
            self.updated += 1;
        }
    }

    /// 처리된 총 레코드 수.
    pub fn total(&self) -> usize {
        self.inserted + self.updated
    }
}

/// 이벤트 저장소 trait.
///
/// 모든 쓰기는 자연 키 `(event_date, event_type, country)` 기준 UPSERT이며
/// 동일 입력을 반복 적용해도 행은 하나만 유지됩니다. 행 삭제는 하지 않습니다.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// 저장 구조 생성 (이미 있으면 아무것도 하지 않음).
    async fn ensure_schema(&self) -> Result<(), StoreError>;

    /// 단건 UPSERT.
    ///
    /// 신규 삽입이면 `true`, 기존 행 갱신이면 `false`를 반환합니다.
    async fn upsert(&self, record: &EventRecord) -> Result<bool, StoreError>;

    /// 한 동기화 패스의 레코드를 단일 트랜잭션으로 UPSERT.
    ///
    /// 레코드 하나라도 실패하면 전체를 롤백하고
    /// 실패 레코드의 키를 담은 [`StoreError::RecordWrite`]를 반환합니다.
    async fn upsert_pass(&self, records: &[EventRecord]) -> Result<UpsertSummary, StoreError>;

    /// 구간 조회 (`event_date` 오름차순).
    async fn query_range(&self, range: DateRange) -> Result<Vec<EventRecord>, StoreError>;

    /// 저장된 전체 행 수.
    async fn count(&self) -> Result<u64, StoreError>;

    /// 저장소 이름 (로그용).
    fn backend_name(&self) -> &str;
}
