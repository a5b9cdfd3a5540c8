//! 레퍼런스 데이터 수집 핵심 도메인.
//!
//! 경제 캘린더 이벤트 엔티티와, 수집 루프가 의존하는
//! 이벤트 제공자(`EventProvider`) / 이벤트 저장소(`EventStore`) 추상화를 제공합니다.

pub mod domain;

pub use domain::*;
