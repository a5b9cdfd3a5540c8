//! 캘린더 피드 제공자 구현.

pub mod feed;
pub mod file;
pub mod http;

pub use feed::{parse_event_date, parse_feed, FeedEvent};
pub use file::JsonFileProvider;
pub use http::HttpFeedProvider;
