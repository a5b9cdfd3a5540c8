//! 이벤트 저장소 구현.

pub mod calendar;
pub mod memory;

pub use calendar::{CalendarEventRow, PgEventStore};
pub use memory::MemoryEventStore;
