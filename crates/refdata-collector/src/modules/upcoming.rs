//! 예정 이벤트 조회 (읽기 전용).

use chrono::{DateTime, Utc};
use refdata_core::{DateRange, EventRecord, EventStore};

use crate::config::check_window_days;
use crate::Result;

/// `now`부터 `days`일 이내의 저장된 이벤트 (시간순).
pub async fn list_upcoming(
    store: &dyn EventStore,
    now: DateTime<Utc>,
    days: u32,
) -> Result<Vec<EventRecord>> {
    let days = check_window_days("upcoming --days", days)?;
    Ok(store.query_range(DateRange::forward(now, days)).await?)
}

/// 다음 이벤트 하나.
///
/// `horizon_days` 안에 이벤트가 없으면 `None`.
pub async fn next_event(
    store: &dyn EventStore,
    now: DateTime<Utc>,
    horizon_days: u32,
) -> Result<Option<EventRecord>> {
    Ok(list_upcoming(store, now, horizon_days)
        .await?
        .into_iter()
        .next())
}

/// 목록 출력용 한 줄 포맷.
pub fn format_event_line(record: &EventRecord) -> String {
    let mut line = format!(
        "  {} | {:<3} | {:<6} | {:<10} | {}",
        record.event_date.format("%Y-%m-%d %H:%M UTC"),
        record.country,
        record.importance.as_str(),
        record.event_type,
        record.event_name
    );
    if let Some(notes) = &record.notes {
        line.push_str(&format!(" ({})", notes));
    }
    line
}

/// 예정 이벤트 목록을 표준 출력으로 출력.
pub fn print_upcoming(records: &[EventRecord], days: u32) {
    if records.is_empty() {
        println!("향후 {}일 이내 예정된 이벤트가 없습니다.", days);
        return;
    }

    println!("\n📅 향후 {}일 예정 이벤트 ({}건):", days, records.len());
    println!("{:-<80}", "");
    for record in records {
        println!("{}", format_event_line(record));
    }
    println!("{:-<80}", "");
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use refdata_core::Importance;
    use refdata_data::MemoryEventStore;

    #[test]
    fn test_format_event_line() {
        let record = EventRecord::new(
            Utc.with_ymd_and_hms(2025, 3, 19, 18, 0, 0).unwrap(),
            "FOMC Meeting",
            "FOMC",
        )
        .with_importance(Importance::Medium)
        .with_notes("SEP");

        let line = format_event_line(&record);
        assert!(line.contains("2025-03-19 18:00 UTC"));
        assert!(line.contains("medium"));
        assert!(line.ends_with("FOMC Meeting (SEP)"));
    }

    #[tokio::test]
    async fn test_next_event() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        let store = MemoryEventStore::new();
        assert!(next_event(&store, now, 30).await.unwrap().is_none());

        store
            .upsert(&EventRecord::new(now + Duration::days(5), "NFP", "NFP"))
            .await
            .unwrap();
        store
            .upsert(&EventRecord::new(now + Duration::days(2), "CPI", "CPI"))
            .await
            .unwrap();
        // 과거 이벤트는 제외
        store
            .upsert(&EventRecord::new(now - Duration::days(2), "PPI", "PPI"))
            .await
            .unwrap();

        let next = next_event(&store, now, 30).await.unwrap().unwrap();
        assert_eq!(next.event_type, "CPI");
    }

    #[tokio::test]
    async fn test_list_upcoming_rejects_out_of_range_days() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        let store = MemoryEventStore::new();

        let result = list_upcoming(&store, now, u32::MAX).await;
        assert!(matches!(result, Err(crate::CollectorError::Config(_))));
        assert!(list_upcoming(&store, now, 0).await.is_err());
    }
}
