//! 이벤트 저장소 및 캘린더 피드 제공자 구현.
//!
//! - [`storage`]: PostgreSQL / 인메모리 [`EventStore`](refdata_core::EventStore) 구현
//! - [`provider`]: JSON 파일 / HTTP 피드 [`EventProvider`](refdata_core::EventProvider) 구현
//! - [`database`]: 커넥션 풀 설정

pub mod database;
pub mod error;
pub mod provider;
pub mod storage;

pub use database::{Database, DatabaseConfig};
pub use error::{DataError, Result};
pub use provider::{HttpFeedProvider, JsonFileProvider};
pub use storage::{MemoryEventStore, PgEventStore};
