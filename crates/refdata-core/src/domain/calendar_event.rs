//! 경제 캘린더 이벤트 엔티티.
//!
//! FOMC, CPI, 고용지표 발표 등 시장에 영향을 주는 일정 이벤트를
//! 정규화된 형태로 표현합니다.
//!
//! # 자연 키
//!
//! `(event_date, event_type, country)` 조합이 하나의 논리적 이벤트를 식별합니다.
//! `event_name`, `importance`, `notes`, `source`는 재동기화 시 갱신되는 가변 속성입니다.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 국가 코드 기본값
pub const DEFAULT_COUNTRY: &str = "US";

/// event_type 최대 길이 (DB 컬럼 VARCHAR(50)과 동일)
pub const MAX_EVENT_TYPE_LEN: usize = 50;

// =============================================================================
// 중요도
// =============================================================================

/// 이벤트 중요도.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    /// 낮음
    Low,
    /// 보통
    Medium,
    /// 높음 (기본값)
    #[default]
    High,
}

impl Importance {
    /// DB 저장용 문자열.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Importance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Importance {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(format!("알 수 없는 중요도: {}", other)),
        }
    }
}

// =============================================================================
// 자연 키
// =============================================================================

/// 이벤트 자연 키.
///
/// 정렬 순서는 `event_date` → `event_type` → `country`이며
/// 저장소의 범위 조회 결과 정렬과 일치합니다.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventKey {
    pub event_date: DateTime<Utc>,
    pub event_type: String,
    pub country: String,
}

impl fmt::Display for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.event_date.to_rfc3339(),
            self.event_type,
            self.country
        )
    }
}

// =============================================================================
// 이벤트 레코드
// =============================================================================

/// 정규화된 경제 캘린더 이벤트.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// 이벤트 발생 시각
    pub event_date: DateTime<Utc>,
    /// 이벤트 제목 (예: "FOMC Meeting")
    pub event_name: String,
    /// 이벤트 분류 코드 (예: "FOMC", "CPI")
    pub event_type: String,
    /// 국가 코드 (ISO 형식, 대문자)
    pub country: String,
    /// 중요도
    pub importance: Importance,
    /// 비고
    pub notes: Option<String>,
    /// 데이터 출처 (동기화 패스 단위로 고정)
    pub source: String,
    /// 마지막 저장 시각 (저장소가 매 쓰기마다 설정)
    pub updated_at: Option<DateTime<Utc>>,
}

impl EventRecord {
    /// 새 이벤트 생성 (국가 US, 중요도 high).
    pub fn new(
        event_date: DateTime<Utc>,
        event_name: impl Into<String>,
        event_type: impl Into<String>,
    ) -> Self {
        Self {
            event_date,
            event_name: event_name.into(),
            event_type: event_type.into(),
            country: DEFAULT_COUNTRY.to_string(),
            importance: Importance::default(),
            notes: None,
            source: String::new(),
            updated_at: None,
        }
    }

    /// 국가 코드 설정 (대문자로 정규화).
    pub fn with_country(mut self, country: impl AsRef<str>) -> Self {
        self.country = country.as_ref().trim().to_uppercase();
        self
    }

    /// 중요도 설정.
    pub fn with_importance(mut self, importance: Importance) -> Self {
        self.importance = importance;
        self
    }

    /// 비고 설정.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// 출처 설정.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// 자연 키.
    pub fn key(&self) -> EventKey {
        EventKey {
            event_date: self.event_date,
            event_type: self.event_type.clone(),
            country: self.country.clone(),
        }
    }

    /// 저장 전 유효성 검사.
    ///
    /// 실패 시 사유 문자열을 반환합니다.
    pub fn validate(&self) -> Result<(), String> {
        if self.event_name.trim().is_empty() {
            return Err("event_name이 비어 있습니다".to_string());
        }
        if self.event_type.trim().is_empty() {
            return Err("event_type이 비어 있습니다".to_string());
        }
        if self.event_type.chars().count() > MAX_EVENT_TYPE_LEN {
            return Err(format!(
                "event_type 길이 초과 ({}자 > {}자)",
                self.event_type.chars().count(),
                MAX_EVENT_TYPE_LEN
            ));
        }
        let country_ok = (2..=3).contains(&self.country.len())
            && self.country.chars().all(|c| c.is_ascii_uppercase());
        if !country_ok {
            return Err(format!("잘못된 국가 코드: {:?}", self.country));
        }
        Ok(())
    }
}

// =============================================================================
// 조회 구간
// =============================================================================

/// 이벤트 조회 구간 (양 끝 포함).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    /// 새 구간 생성. `end`가 `start`보다 앞서면 두 값을 교환합니다.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        if end < start {
            Self {
                start: end,
                end: start,
            }
        } else {
            Self { start, end }
        }
    }

    /// `from`부터 `days`일 뒤까지의 전방 구간.
    ///
    /// 끝 시각이 표현 가능한 최대 시각을 넘으면 최대 시각으로 제한합니다.
    pub fn forward(from: DateTime<Utc>, days: u32) -> Self {
        let end = Duration::try_days(i64::from(days))
            .and_then(|span| from.checked_add_signed(span))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self::new(from, end)
    }

    /// 시각이 구간에 포함되는지 여부.
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && at <= self.end
    }

    /// 구간 길이 (일, 내림).
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ~ {}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fomc_date() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 19, 18, 0, 0).unwrap()
    }

    #[test]
    fn test_new_record_defaults() {
        let record = EventRecord::new(fomc_date(), "FOMC Meeting", "FOMC");
        assert_eq!(record.country, "US");
        assert_eq!(record.importance, Importance::High);
        assert!(record.notes.is_none());
        assert!(record.updated_at.is_none());
    }

    #[test]
    fn test_key_ignores_mutable_fields() {
        let a = EventRecord::new(fomc_date(), "FOMC Meeting", "FOMC");
        let b = EventRecord::new(fomc_date(), "FOMC Rate Decision", "FOMC")
            .with_importance(Importance::Medium)
            .with_notes("press conference");
        assert_eq!(a.key(), b.key());

        let c = a.clone().with_country("jp");
        assert_ne!(a.key(), c.key());
        assert_eq!(c.country, "JP");
    }

    #[test]
    fn test_importance_parse_and_display() {
        assert_eq!("HIGH".parse::<Importance>().unwrap(), Importance::High);
        assert_eq!(" medium ".parse::<Importance>().unwrap(), Importance::Medium);
        assert!("critical".parse::<Importance>().is_err());
        assert_eq!(Importance::Low.to_string(), "low");

        let json = serde_json::to_string(&Importance::Medium).unwrap();
        assert_eq!(json, "\"medium\"");
    }

    #[test]
    fn test_validate() {
        let ok = EventRecord::new(fomc_date(), "FOMC Meeting", "FOMC");
        assert!(ok.validate().is_ok());

        let empty_name = EventRecord::new(fomc_date(), "  ", "FOMC");
        assert!(empty_name.validate().is_err());

        let long_type = EventRecord::new(fomc_date(), "x", "T".repeat(MAX_EVENT_TYPE_LEN + 1));
        assert!(long_type.validate().is_err());

        let bad_country = ok.clone().with_country("U1");
        assert!(bad_country.validate().is_err());
    }

    #[test]
    fn test_date_range() {
        let start = fomc_date();
        let range = DateRange::forward(start, 7);
        assert_eq!(range.num_days(), 7);
        assert!(range.contains(start));
        assert!(range.contains(start + Duration::days(7)));
        assert!(!range.contains(start + Duration::days(8)));

        // 역순 입력은 정규화
        let swapped = DateRange::new(range.end, range.start);
        assert_eq!(swapped, range);
    }

    #[test]
    fn test_forward_range_saturates_at_max_time() {
        let range = DateRange::forward(fomc_date(), u32::MAX);
        assert_eq!(range.start, fomc_date());
        assert_eq!(range.end, DateTime::<Utc>::MAX_UTC);
        assert!(range.contains(fomc_date() + Duration::days(365 * 1000)));
    }

    #[test]
    fn test_key_ordering_by_date_first() {
        let early = EventRecord::new(fomc_date(), "a", "ZZZ").key();
        let late = EventRecord::new(fomc_date() + Duration::hours(1), "b", "AAA").key();
        assert!(early < late);
        assert_eq!(early.to_string(), "2025-03-19T18:00:00+00:00/ZZZ/US");
    }
}
