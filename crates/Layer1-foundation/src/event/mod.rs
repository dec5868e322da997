//! Event - 이벤트 이름과 프로토콜
//!
//! 이벤트는 문자열 이름으로 식별됩니다. 두 개의 meta 이름은 모든 dispatch를
//! 관찰하는 데 쓰이며 일반 이벤트 목록에는 나타나지 않습니다.
//!
//! ```text
//! emit("foo", args)
//!   ├── meta:preEmit  ("foo", args...)
//!   ├── foo handlers  (args...)
//!   └── meta:postEmit ("foo", args...)
//! ```

pub mod types;

pub use types::{
    is_meta, IntoEventNames, Protocol, DEFERRED_REJECT, DEFERRED_RESOLVE, META_POST_EMIT,
    META_PRE_EMIT,
};
