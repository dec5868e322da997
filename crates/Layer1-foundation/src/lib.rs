//! # eventer-foundation
//!
//! Foundation layer for Eventer:
//! - Error: 에러 타입 (Usage, UnknownEvent, Handler)
//! - Config: 엔진 설정 (EventerConfig, ConfigStore)
//! - Event: 이벤트 이름, meta 이름, 실행 프로토콜
//! - Handler: 콜백, Outcome, 구독 레코드
//!
//! ## 아키텍처
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Layer2-core: Registry / Once / Dispatcher / Meta       │
//! │                     │                                   │
//! │                     ▼                                   │
//! │  Layer1-foundation                                      │
//! │   ├── Callback ──► Outcome (Ready | Deferred)           │
//! │   ├── HandlerRecord (id, event, origin, prereqs)        │
//! │   └── EventerConfig / Error                             │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod event;
pub mod handler;

#[doc(hidden)]
pub use serde_json;

// ============================================================================
// Error
// ============================================================================
pub use error::{Error, Rejection, Result};

// ============================================================================
// Config (설정)
// ============================================================================
pub use config::{ConfigLayer, ConfigStore, EventerConfig, EVENTER_CONFIG_FILE};

// ============================================================================
// Event (이름 / 프로토콜)
// ============================================================================
pub use event::{
    is_meta, IntoEventNames, Protocol, DEFERRED_REJECT, DEFERRED_RESOLVE, META_POST_EMIT,
    META_PRE_EMIT,
};

// ============================================================================
// Handler (콜백 / 레코드)
// ============================================================================
pub use handler::{
    Args, Callback, HandlerFuture, HandlerId, HandlerRecord, HandlerResult, Listener, OnOptions,
    Order, Origin, Outcome,
};

/// 인자 목록 생성
///
/// ```ignore
/// let args = args![1, "two", json!({ "three": 3 })];
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::serde_json::Value>::new()
    };
    ($($value:expr),+ $(,)?) => {
        ::std::vec![$($crate::serde_json::json!($value)),+]
    };
}
