//! 캘린더 동기화 모듈.

pub mod calendar_sync;
pub mod sync_loop;
pub mod upcoming;

pub use calendar_sync::{run_backfill, run_once, run_sync_pass, RunOnceReport};
pub use sync_loop::{CalendarSyncLoop, Clock, LoopPhase, SyncState, SystemClock};
pub use upcoming::{format_event_line, list_upcoming, next_event, print_upcoming};
