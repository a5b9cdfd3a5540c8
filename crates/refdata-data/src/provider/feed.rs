//! JSON 캘린더 피드 형식.
//!
//! 파일/HTTP 제공자가 공유하는 피드 파싱 로직입니다.
//!
//! ```json
//! [
//!   {"event_date": "2025-03-19T18:00:00Z", "event_name": "FOMC Meeting",
//!    "event_type": "FOMC", "country": "US", "importance": "high", "notes": null}
//! ]
//! ```
//!
//! `country`, `importance`, `notes`는 생략 가능하며, `event_date`에 날짜만
//! 주어지면 (`"2025-03-19"`) UTC 자정으로 해석합니다.

use chrono::{DateTime, NaiveDate, Utc};
use refdata_core::{DateRange, EventRecord, Importance, ProviderError};
use serde::{Deserialize, Deserializer};

/// 피드 원본 이벤트.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedEvent {
    #[serde(deserialize_with = "deserialize_event_date")]
    pub event_date: DateTime<Utc>,
    pub event_name: String,
    pub event_type: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub importance: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl FeedEvent {
    /// 도메인 레코드로 변환.
    pub fn into_record(self, source: &str) -> Result<EventRecord, ProviderError> {
        let importance = match self.importance.as_deref() {
            Some(raw) => raw.parse::<Importance>().map_err(ProviderError::Parse)?,
            None => Importance::default(),
        };

        let mut record = EventRecord::new(self.event_date, self.event_name, self.event_type)
            .with_importance(importance)
            .with_source(source);
        if let Some(country) = self.country.filter(|c| !c.trim().is_empty()) {
            record = record.with_country(country);
        }
        record.notes = self.notes.filter(|n| !n.trim().is_empty());
        Ok(record)
    }
}

fn deserialize_event_date<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_event_date(&raw).map_err(serde::de::Error::custom)
}

/// RFC 3339 시각 또는 `YYYY-MM-DD` 날짜 파싱.
pub fn parse_event_date(raw: &str) -> Result<DateTime<Utc>, String> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| format!("잘못된 event_date 형식: {}", raw))
}

/// 피드 본문을 파싱하여 구간 내 레코드만 반환 (피드 순서 유지).
pub fn parse_feed(
    body: &str,
    source: &str,
    range: DateRange,
) -> Result<Vec<EventRecord>, ProviderError> {
    let events: Vec<FeedEvent> =
        serde_json::from_str(body).map_err(|e| ProviderError::Parse(e.to_string()))?;

    let mut records = Vec::with_capacity(events.len());
    for event in events {
        if range.contains(event.event_date) {
            records.push(event.into_record(source)?);
        }
    }
    Ok(records)
}
