//! 에러 타입 정의.

use refdata_core::{ProviderError, StoreError};
use refdata_data::DataError;
use thiserror::Error;

/// Collector 에러 타입
#[derive(Debug, Error)]
pub enum CollectorError {
    /// 설정 에러 (시작 시 치명적)
    #[error("Configuration error: {0}")]
    Config(String),

    /// 이벤트 피드 조회 실패 (패스 단위, 복구 가능)
    #[error("Provider fetch error: {0}")]
    ProviderFetch(#[from] ProviderError),

    /// 레코드 저장 실패 (패스 전체 롤백, 복구 가능)
    #[error("Record write error: {0}")]
    RecordWrite(StoreError),

    /// 기타 저장소 에러
    #[error("Store error: {0}")]
    Store(StoreError),

    /// 데이터베이스 연결 에러
    #[error("Database error: {0}")]
    Database(#[from] DataError),
}

impl From<StoreError> for CollectorError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::RecordWrite { .. } => Self::RecordWrite(err),
            other => Self::Store(other),
        }
    }
}

impl CollectorError {
    /// 프로세스를 종료해야 하는 에러인지 여부.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Config(_) | Self::Database(_))
    }
}

/// Result 타입 별칭
pub type Result<T> = std::result::Result<T, CollectorError>;
