//! PostgreSQL 커넥션 풀.

use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use crate::error::{DataError, Result};

/// 커넥션 풀 설정.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// 데이터베이스 URL
    pub url: String,
    /// 최대 커넥션 수
    pub max_connections: u32,
    /// 최소 유지 커넥션 수
    pub min_connections: u32,
    /// 커넥션 획득 타임아웃
    pub acquire_timeout: Duration,
    /// 유휴 커넥션 정리 시간
    pub idle_timeout: Option<Duration>,
}

impl DatabaseConfig {
    /// 기본 설정.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 10,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(30),
            idle_timeout: Some(Duration::from_secs(600)),
        }
    }

    /// 데몬용 설정.
    ///
    /// 동기화 패스는 순차 실행되므로 적은 수의 커넥션으로 충분합니다.
    pub fn for_daemon(url: impl Into<String>) -> Self {
        Self {
            max_connections: 5,
            ..Self::new(url)
        }
    }

    /// 최대 커넥션 수 지정.
    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections.max(1);
        self.min_connections = self.min_connections.min(self.max_connections);
        self
    }
}

/// 커넥션 풀 래퍼.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// 풀 생성 및 연결.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.acquire_timeout)
            .idle_timeout(config.idle_timeout)
            .connect(&config.url)
            .await
            .map_err(|e| DataError::ConnectionError(e.to_string()))?;

        info!(
            max_connections = config.max_connections,
            "데이터베이스 연결 완료"
        );

        Ok(Self { pool })
    }

    /// 내부 풀 참조.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// 풀 종료.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_daemon_config() {
        let config = DatabaseConfig::for_daemon("postgres://localhost/refdata");
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.min_connections, 1);
        assert_eq!(config.url, "postgres://localhost/refdata");
    }

    #[test]
    fn test_with_max_connections_clamps() {
        let config = DatabaseConfig::new("postgres://localhost/refdata").with_max_connections(0);
        assert_eq!(config.max_connections, 1);
        assert!(config.min_connections <= config.max_connections);
    }
}
