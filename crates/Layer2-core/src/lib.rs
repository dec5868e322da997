//! # eventer-core
//!
//! In-process publish/subscribe engine:
//! - Registry: 이벤트 이름별 핸들러 버킷 (snapshot 기반 교체)
//! - Once: 첫 호출에서 스스로 제거되는 핸들러
//! - Dispatch: parallel / reduce / sync 프로토콜
//! - Meta: 모든 dispatch 전후의 `meta:preEmit` / `meta:postEmit` hook
//! - Monitor: 미완료 핸들러 진단 로그
//!
//! ## 아키텍처
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  Eventer                                                  │
//! │   on / off / once ──► Registry (name -> Arc<[record]>)    │
//! │   emit / emit_reduce / emit_sync / dispatch               │
//! │        │                                                  │
//! │        ▼                                                  │
//! │   Dispatcher ── snapshot ──► pre hook ─► bucket ─► post   │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod dispatch;
pub mod eventer;
mod meta;
mod monitor;
mod once;
pub mod registry;

pub use dispatch::{Dispatched, Dispatcher, Emitted, Pending};
pub use eventer::{Eventer, WeakEventer};
pub use registry::{Bucket, Registry};

// Layer1 재노출
pub use eventer_foundation::{
    args, Args, Callback, Error, EventerConfig, HandlerId, HandlerRecord, HandlerResult,
    is_meta, IntoEventNames, Listener, OnOptions, Order, Origin, Outcome, Protocol, Rejection,
    Result, DEFERRED_REJECT, DEFERRED_RESOLVE, META_POST_EMIT, META_PRE_EMIT,
};
