//! 로컬 JSON 파일 기반 이벤트 제공자.

use std::path::PathBuf;

use async_trait::async_trait;
use refdata_core::{DateRange, EventProvider, EventRecord, ProviderError};
use tracing::debug;

use super::feed::parse_feed;

/// JSON 피드 파일을 읽는 [`EventProvider`].
///
/// 매 호출마다 파일을 다시 읽으므로 데몬 실행 중 파일을 교체하면
/// 다음 패스부터 반영됩니다.
#[derive(Debug, Clone)]
pub struct JsonFileProvider {
    path: PathBuf,
    source: String,
}

impl JsonFileProvider {
    pub fn new(path: impl Into<PathBuf>, source: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            source: source.into(),
        }
    }
}

#[async_trait]
impl EventProvider for JsonFileProvider {
    fn source_name(&self) -> &str {
        &self.source
    }

    async fn fetch_events(&self, range: DateRange) -> Result<Vec<EventRecord>, ProviderError> {
        let body = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| ProviderError::Io(format!("{}: {}", self.path.display(), e)))?;

        let records = parse_feed(&body, &self.source, range)?;
        debug!(
            path = %self.path.display(),
            range = %range,
            count = records.len(),
            "피드 파일 조회 완료"
        );
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::io::Write;

    #[tokio::test]
    async fn test_reads_feed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"event_date": "2025-03-19T18:00:00Z", "event_name": "FOMC Meeting", "event_type": "FOMC"}}]"#
        )
        .unwrap();

        let provider = JsonFileProvider::new(file.path(), "file_feed");
        let range = DateRange::forward(Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap(), 365);
        let records = provider.fetch_events(range).await.unwrap();

        assert_eq!(provider.source_name(), "file_feed");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].event_name, "FOMC Meeting");
        assert_eq!(records[0].source, "file_feed");
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let provider = JsonFileProvider::new(dir.path().join("missing.json"), "file_feed");
        let result = provider
            .fetch_events(DateRange::forward(Utc::now(), 30))
            .await;
        assert!(matches!(result, Err(ProviderError::Io(_))));
    }
}
