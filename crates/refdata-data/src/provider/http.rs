//! HTTP JSON 피드 기반 이벤트 제공자.
//!
//! `GET {url}?start=<RFC3339>&end=<RFC3339>` 요청으로 피드를 받아
//! [`parse_feed`](super::feed::parse_feed)로 변환합니다. 서버가 구간 파라미터를
//! 무시하더라도 클라이언트 측에서 다시 구간 필터링합니다.

use std::time::Duration;

use async_trait::async_trait;
use chrono::SecondsFormat;
use refdata_core::{DateRange, EventProvider, EventRecord, ProviderError};
use tracing::{debug, warn};

use super::feed::parse_feed;

/// 에러 응답 본문 로그 최대 길이
const MAX_ERROR_BODY_LEN: usize = 200;

/// HTTP 피드 [`EventProvider`].
pub struct HttpFeedProvider {
    url: String,
    source: String,
    client: reqwest::Client,
}

impl HttpFeedProvider {
    /// 새 제공자 생성.
    pub fn new(
        url: impl Into<String>,
        source: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("refdata-collector/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ProviderError::Other(format!("HTTP 클라이언트 생성 실패: {}", e)))?;

        Ok(Self {
            url: url.into(),
            source: source.into(),
            client,
        })
    }
}

#[async_trait]
impl EventProvider for HttpFeedProvider {
    fn source_name(&self) -> &str {
        &self.source
    }

    async fn fetch_events(&self, range: DateRange) -> Result<Vec<EventRecord>, ProviderError> {
        let start = range.start.to_rfc3339_opts(SecondsFormat::Secs, true);
        let end = range.end.to_rfc3339_opts(SecondsFormat::Secs, true);

        let response = self
            .client
            .get(&self.url)
            .query(&[("start", start.as_str()), ("end", end.as_str())])
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message: String = body.chars().take(MAX_ERROR_BODY_LEN).collect();
            warn!(url = %self.url, status = status.as_u16(), "피드 요청 실패");
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let records = parse_feed(&body, &self.source, range)?;
        debug!(url = %self.url, range = %range, count = records.len(), "피드 조회 완료");
        Ok(records)
    }
}
