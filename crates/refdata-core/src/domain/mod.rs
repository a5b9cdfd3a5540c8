//! 도메인 모델 및 협력자 trait.

pub mod calendar_event;
pub mod event_provider;
pub mod event_store;

pub use calendar_event::{
    DateRange, EventKey, EventRecord, Importance, DEFAULT_COUNTRY, MAX_EVENT_TYPE_LEN,
};
pub use event_provider::{EventProvider, ProviderError};
pub use event_store::{EventStore, StoreError, UpsertSummary};
