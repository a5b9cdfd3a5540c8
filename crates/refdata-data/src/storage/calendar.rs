//! 경제 캘린더 PostgreSQL 저장소.
//!
//! `economic_calendar` 테이블에 자연 키 `(event_date, event_type, country)`
//! 기준 UPSERT를 수행합니다.
//!
//! # 사용 예제
//!
//! ```rust,ignore
//! use refdata_data::PgEventStore;
//!
//! let store = PgEventStore::new(pool);
//! store.ensure_schema().await?;
//! let summary = store.upsert_pass(&records).await?;
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use refdata_core::{DateRange, EventRecord, EventStore, StoreError, UpsertSummary};
use sqlx::postgres::PgPool;
use sqlx::FromRow;
use tracing::{debug, info, instrument, warn};

const CREATE_TABLE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS economic_calendar (
    id          BIGSERIAL PRIMARY KEY,
    event_date  TIMESTAMPTZ  NOT NULL,
    event_name  VARCHAR(255) NOT NULL,
    event_type  VARCHAR(50)  NOT NULL,
    country     VARCHAR(3)   NOT NULL DEFAULT 'US',
    importance  VARCHAR(10)  NOT NULL DEFAULT 'high'
                CHECK (importance IN ('low', 'medium', 'high')),
    notes       TEXT,
    source      VARCHAR(100) NOT NULL DEFAULT '',
    created_at  TIMESTAMPTZ  NOT NULL DEFAULT NOW(),
    updated_at  TIMESTAMPTZ  NOT NULL DEFAULT NOW(),
    CONSTRAINT uq_economic_calendar_event UNIQUE (event_date, event_type, country)
)
"#;

const CREATE_INDEX_SQL: &str = r#"
CREATE INDEX IF NOT EXISTS idx_economic_calendar_event_date
    ON economic_calendar (event_date)
"#;

// xmax = 0 이면 이번 문장에서 새로 삽입된 행
const UPSERT_SQL: &str = r#"
INSERT INTO economic_calendar
    (event_date, event_name, event_type, country, importance, notes, source, updated_at)
VALUES ($1, $2, $3, $4, $5, $6, $7, NOW())
ON CONFLICT (event_date, event_type, country) DO UPDATE SET
    event_name = EXCLUDED.event_name,
    importance = EXCLUDED.importance,
    notes      = EXCLUDED.notes,
    source     = EXCLUDED.source,
    updated_at = NOW()
RETURNING (xmax = 0) AS inserted
"#;

/// 캘린더 이벤트 DB 레코드.
#[derive(Debug, Clone, FromRow)]
pub struct CalendarEventRow {
    pub event_date: DateTime<Utc>,
    pub event_name: String,
    pub event_type: String,
    pub country: String,
    pub importance: String,
    pub notes: Option<String>,
    pub source: String,
    pub updated_at: DateTime<Utc>,
}

impl CalendarEventRow {
    /// 도메인 레코드로 변환.
    pub fn into_record(self) -> Result<EventRecord, StoreError> {
        let importance = self.importance.parse().map_err(StoreError::Decode)?;
        Ok(EventRecord {
            event_date: self.event_date,
            event_name: self.event_name,
            event_type: self.event_type,
            country: self.country,
            importance,
            notes: self.notes,
            source: self.source,
            updated_at: Some(self.updated_at),
        })
    }
}

/// PostgreSQL 기반 [`EventStore`].
#[derive(Clone)]
pub struct PgEventStore {
    pool: PgPool,
}

impl PgEventStore {
    /// 새 저장소 생성.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 주어진 executor(풀 또는 트랜잭션)로 단건 UPSERT.
    async fn upsert_with<'e, E>(executor: E, record: &EventRecord) -> Result<bool, StoreError>
    where
        E: sqlx::PgExecutor<'e>,
    {
        record.validate().map_err(|reason| StoreError::RecordWrite {
            key: record.key().to_string(),
            reason,
        })?;

        sqlx::query_scalar::<_, bool>(UPSERT_SQL)
            .bind(record.event_date)
            .bind(&record.event_name)
            .bind(&record.event_type)
            .bind(&record.country)
            .bind(record.importance.as_str())
            .bind(record.notes.as_deref())
            .bind(&record.source)
            .fetch_one(executor)
            .await
            .map_err(|e| StoreError::RecordWrite {
                key: record.key().to_string(),
                reason: e.to_string(),
            })
    }
}

fn db_err(e: sqlx::Error) -> StoreError {
    StoreError::Database(e.to_string())
}

#[async_trait]
impl EventStore for PgEventStore {
    async fn ensure_schema(&self) -> Result<(), StoreError> {
        for statement in [CREATE_TABLE_SQL, CREATE_INDEX_SQL] {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| StoreError::Schema(e.to_string()))?;
        }
        info!("economic_calendar 스키마 준비 완료");
        Ok(())
    }

    async fn upsert(&self, record: &EventRecord) -> Result<bool, StoreError> {
        Self::upsert_with(&self.pool, record).await
    }

    #[instrument(skip(self, records), fields(count = records.len()))]
    async fn upsert_pass(&self, records: &[EventRecord]) -> Result<UpsertSummary, StoreError> {
        let mut summary = UpsertSummary::default();
        if records.is_empty() {
            return Ok(summary);
        }

        let mut tx = self.pool.begin().await.map_err(db_err)?;

        for record in records {
            match Self::upsert_with(&mut *tx, record).await {
                Ok(inserted) => summary.record(inserted),
                Err(e) => {
                    warn!(key = %record.key(), error = %e, "레코드 저장 실패, 패스 전체 롤백");
                    if let Err(rollback_err) = tx.rollback().await {
                        warn!(error = %rollback_err, "롤백 실패");
                    }
                    return Err(e);
                }
            }
        }

        tx.commit().await.map_err(db_err)?;

        debug!(
            inserted = summary.inserted,
            updated = summary.updated,
            "패스 커밋 완료"
        );
        Ok(summary)
    }

    #[instrument(skip(self))]
    async fn query_range(&self, range: DateRange) -> Result<Vec<EventRecord>, StoreError> {
        let rows: Vec<CalendarEventRow> = sqlx::query_as(
            r#"
            SELECT event_date, event_name, event_type, country, importance, notes, source, updated_at
            FROM economic_calendar
            WHERE event_date >= $1 AND event_date <= $2
            ORDER BY event_date ASC, event_type ASC, country ASC
            "#,
        )
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.into_iter().map(CalendarEventRow::into_record).collect()
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM economic_calendar")
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(count.max(0) as u64)
    }

    fn backend_name(&self) -> &str {
        "postgres"
    }
}
