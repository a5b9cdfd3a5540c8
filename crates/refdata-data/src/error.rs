//! 데이터 계층 에러 타입.

use thiserror::Error;

/// 데이터 계층 에러.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("데이터베이스 연결 실패: {0}")]
    ConnectionError(String),
}

/// Result 타입 별칭
pub type Result<T> = std::result::Result<T, DataError>;
