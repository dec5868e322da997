//! Handler - 콜백과 구독 레코드

pub mod callback;
pub mod record;

pub use callback::{Args, Callback, HandlerFuture, HandlerResult, Listener, Outcome};
pub use record::{HandlerId, HandlerRecord, OnOptions, Order, Origin};
