//! 동기화 통계 구조체.

use std::time::Duration;

use refdata_core::UpsertSummary;

/// 동기화 패스 통계
#[derive(Debug, Clone, Default)]
pub struct SyncStats {
    /// 피드에서 받은 레코드 수
    pub fetched: usize,
    /// 신규 삽입 수
    pub inserted: usize,
    /// 기존 행 갱신 수
    pub updated: usize,
    /// 소요 시간
    pub elapsed: Duration,
}

impl SyncStats {
    /// 새 통계 객체 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 저장소 결과 반영
    pub fn apply(&mut self, summary: UpsertSummary) {
        self.inserted += summary.inserted;
        self.updated += summary.updated;
    }

    /// 저장된 총 레코드 수
    pub fn written(&self) -> usize {
        self.inserted + self.updated
    }

    /// 통계 요약 로그 출력
    pub fn log_summary(&self, operation: &str) {
        tracing::info!(
            operation = operation,
            fetched = self.fetched,
            inserted = self.inserted,
            updated = self.updated,
            written = self.written(),
            elapsed = format!("{:.1}s", self.elapsed.as_secs_f64()),
            "동기화 완료"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_summary() {
        let mut stats = SyncStats::new();
        stats.fetched = 3;
        stats.apply(UpsertSummary {
            inserted: 2,
            updated: 1,
        });
        assert_eq!(stats.written(), 3);
        assert_eq!(stats.inserted, 2);
    }
}
