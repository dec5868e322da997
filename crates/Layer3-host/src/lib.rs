//! # eventer-host
//!
//! Eventer를 애플리케이션 타입에 붙이기 위한 레이어입니다.
//!
//! - **Host**: `HasEventer` / `EventerExt` 합성 기반 API, `Hosted<T>` 래퍼
//! - **Forward**: 엔진 간 이벤트 재발행 (`forward`, `proxy`)
//! - **Deferred**: `end` / `error` 이벤트를 future로 노출
//!
//! ## 구조
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  Hosted<T> / 사용자 타입 (HasEventer)         │
//! │       │ EventerExt                           │
//! │       ▼                                      │
//! │  Eventer ──forward/proxy──► Eventer          │
//! │       │                                      │
//! │       └── end / error ──► Deferred (watch)   │
//! └──────────────────────────────────────────────┘
//! ```

pub mod deferred;
pub mod forward;
pub mod host;

pub use deferred::{Deferred, Settlement};
pub use forward::{forward, proxy, Forwarding};
pub use host::{EventerExt, HasEventer, Hosted};
