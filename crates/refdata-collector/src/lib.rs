//! 경제 캘린더 동기화 수집기.
//!
//! 외부 캘린더 피드에서 이벤트를 주기적으로 가져와 저장소에 멱등 UPSERT합니다.

pub mod config;
pub mod error;
pub mod modules;
pub mod stats;

pub use config::{
    check_window_days, mask_database_url, CalendarConfig, CollectorConfig, FeedConfig,
    MAX_PERIOD_SECONDS, MAX_WINDOW_DAYS,
};
pub use error::{CollectorError, Result};
pub use stats::SyncStats;
