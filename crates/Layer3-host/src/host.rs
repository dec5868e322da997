//! Host surface - 다른 타입에 이벤트 API를 붙이는 방법
//!
//! 프로토타입 확장 대신 합성을 사용합니다. host는 자신의 `Eventer`를
//! 소유하고 `HasEventer`로 노출하면, `EventerExt`가 나머지 메서드를
//! 제공합니다. 체이닝 메서드는 host 자신을 반환합니다.
//!
//! ```ignore
//! struct Session { id: String, events: Eventer }
//!
//! impl HasEventer for Session {
//!     fn eventer(&self) -> &Eventer { &self.events }
//! }
//!
//! session.on("close", cb).once("open", other);
//! ```

use eventer_core::{
    Args, Callback, Dispatched, Emitted, Eventer, EventerConfig, IntoEventNames, OnOptions,
    Pending, Protocol, Result,
};
use serde_json::Value;
use std::ops::{Deref, DerefMut};

/// 이벤트 엔진을 소유한 타입
pub trait HasEventer {
    fn eventer(&self) -> &Eventer;
}

impl HasEventer for Eventer {
    fn eventer(&self) -> &Eventer {
        self
    }
}

/// `HasEventer` 구현체에 붙는 포워딩 메서드
pub trait EventerExt: HasEventer {
    #[track_caller]
    fn on(&self, names: impl IntoEventNames, callback: Callback) -> &Self {
        self.eventer().on(names, callback);
        self
    }

    #[track_caller]
    fn on_with(&self, names: impl IntoEventNames, callback: Callback, options: OnOptions) -> &Self {
        self.eventer().on_with(names, callback, options);
        self
    }

    #[track_caller]
    fn once(&self, names: impl IntoEventNames, callback: Callback) -> &Self {
        self.eventer().once(names, callback);
        self
    }

    fn off(&self, names: impl IntoEventNames, callback: Option<&Callback>) -> &Self {
        self.eventer().off(names, callback);
        self
    }

    fn emit(&self, event: &str, args: Args) -> Result<Pending<Emitted>> {
        self.eventer().emit(event, args)
    }

    fn emit_reduce(&self, event: &str, args: Args) -> Result<Pending<Option<Value>>> {
        self.eventer().emit_reduce(event, args)
    }

    fn emit_sync(&self, event: &str, args: Args) -> Result<&Self> {
        self.eventer().emit_sync(event, args)?;
        Ok(self)
    }

    fn dispatch(
        &self,
        event: &str,
        args: Args,
        protocol: Option<Protocol>,
    ) -> Result<Pending<Dispatched>> {
        self.eventer().dispatch(event, args, protocol)
    }

    fn listener_count(&self, event: &str) -> usize {
        self.eventer().listener_count(event)
    }

    fn event_names(&self) -> Vec<String> {
        self.eventer().event_names()
    }
}

impl<T: HasEventer + ?Sized> EventerExt for T {}

// ============================================================================
// Hosted
// ============================================================================

/// 임의의 값에 전용 `Eventer`를 붙인 래퍼
///
/// 내부 값은 `Deref`로 그대로 접근할 수 있습니다.
#[derive(Debug, Clone)]
pub struct Hosted<T> {
    inner: T,
    eventer: Eventer,
}

impl<T> Hosted<T> {
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, EventerConfig::default())
    }

    pub fn with_config(inner: T, config: EventerConfig) -> Self {
        Self {
            inner,
            eventer: Eventer::with_config(config),
        }
    }

    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: Default> Default for Hosted<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> HasEventer for Hosted<T> {
    fn eventer(&self) -> &Eventer {
        &self.eventer
    }
}

impl<T> Deref for Hosted<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.inner
    }
}

impl<T> DerefMut for Hosted<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eventer_core::args;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Counter {
        hits: usize,
    }

    #[test]
    fn test_hosted_chains_and_derefs() {
        let mut host = Hosted::new(Counter { hits: 0 });
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();

        host.on(
            "tick",
            Callback::sync(move |_| {
                seen.fetch_add(1, Ordering::SeqCst);
                Ok(None)
            }),
        )
        .emit_sync("tick", args![])
        .unwrap()
        .emit_sync("tick", args![])
        .unwrap();

        host.hits += 1;
        assert_eq!(host.hits, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(host.event_names(), vec!["tick".to_string()]);
        assert_eq!(host.into_inner().hits, 1);
    }

    #[test]
    fn test_origin_points_at_host_call_site() {
        let host = Hosted::new(());
        host.on("foo", Callback::sync(|_| Ok(None)));

        let records = host.eventer().handlers("foo");
        assert_eq!(records[0].origin.file(), Some(file!()));
    }

    #[tokio::test]
    async fn test_emit_through_host() {
        let host = Hosted::new(());
        host.on("double", Callback::sync(|a| Ok(a[0].as_i64().map(|v| json!(v * 2)))));

        let out = host.emit_reduce("double", args![21]).unwrap().await.unwrap();
        assert_eq!(out, Some(json!(42)));
        assert_eq!(host.listener_count("double"), 1);
    }
}
