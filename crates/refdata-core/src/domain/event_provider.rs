//! 이벤트 제공자 추상화.
//!
//! 외부 캘린더 피드로부터 주어진 구간의 이벤트를 가져오기 위한
//! 피드 중립적인 인터페이스입니다. 수집 루프는 구체 구현을 알지 못합니다.

use async_trait::async_trait;
use thiserror::Error;

use super::{DateRange, EventRecord};

/// EventProvider 에러.
///
/// 호출 전체의 실패를 나타냅니다. 한 패스 안에서 재시도하지 않습니다.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// 네트워크 에러
    #[error("네트워크 에러: {0}")]
    Network(String),

    /// API 에러 (비정상 응답 코드)
    #[error("API 에러 ({status}): {message}")]
    Api { status: u16, message: String },

    /// 파싱 에러
    #[error("파싱 에러: {0}")]
    Parse(String),

    /// 파일 입출력 에러
    #[error("입출력 에러: {0}")]
    Io(String),

    /// 기타 에러
    #[error("기타 에러: {0}")]
    Other(String),
}

/// 이벤트 제공자 trait.
///
/// # 구현 예시
///
/// ```ignore
/// pub struct MyFeedProvider {
///     client: reqwest::Client,
/// }
///
/// #[async_trait]
/// impl EventProvider for MyFeedProvider {
///     fn source_name(&self) -> &str {
///         "my_feed"
///     }
///
///     async fn fetch_events(&self, range: DateRange) -> Result<Vec<EventRecord>, ProviderError> {
///         // 피드 호출 및 변환
///     }
/// }
/// ```
#[async_trait]
pub trait EventProvider: Send + Sync {
    /// 출처 식별자. 동기화 패스는 이 값을 각 레코드의 `source`로 기록합니다.
    fn source_name(&self) -> &str;

    /// 구간 내 이벤트 조회.
    ///
    /// 유한한 목록을 반환하며 비어 있을 수 있습니다.
    async fn fetch_events(&self, range: DateRange) -> Result<Vec<EventRecord>, ProviderError>;
}
