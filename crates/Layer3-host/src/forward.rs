//! Forwarding - 한 엔진의 이벤트를 다른 엔진으로 재발행
//!
//! ```text
//! source.emit("hello", ["world"])
//!     │
//!     ├── forward: "hello" 핸들러 ──► target.emit("hello", ["world"]) (await)
//!     │
//!     └── proxy:   meta:preEmit   ──► target.emit("hello", ["world"]) (detached)
//! ```
//!
//! 두 방식 모두 target을 약한 참조로 잡습니다. target이 사라지면
//! 포워딩은 조용히 아무것도 하지 않습니다.

use crate::host::HasEventer;
use eventer_core::{Args, Callback, Eventer, Outcome, WeakEventer, META_PRE_EMIT};
use serde_json::Value;
use tracing::{debug, warn};

/// 등록된 포워딩 핸들러 묶음
///
/// drop해도 포워딩은 유지됩니다. 해제하려면 `stop()`을 호출하세요.
#[derive(Debug)]
pub struct Forwarding {
    source: WeakEventer,
    routes: Vec<(String, Callback)>,
}

impl Forwarding {
    /// 포워딩 중인 source 이벤트 이름
    pub fn names(&self) -> Vec<&str> {
        self.routes.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// source에서 포워딩 핸들러 제거
    pub fn stop(self) {
        let Some(source) = self.source.upgrade() else {
            return;
        };
        for (name, callback) in &self.routes {
            source.off(name.as_str(), Some(callback));
        }
        debug!(routes = self.routes.len(), "Forwarding stopped");
    }
}

/// 지정한 이벤트를 target에 같은 이름, 같은 인자로 parallel 재발행
///
/// source의 dispatch는 target dispatch가 끝날 때까지 기다리며
/// target의 실패는 source 핸들러의 실패가 됩니다. 핸들러가 deferred
/// 결과를 반환하므로 source를 sync로 발행하면 sync 규칙이 적용됩니다.
pub fn forward<S, T>(source: &S, target: &T, names: &[&str]) -> Forwarding
where
    S: HasEventer + ?Sized,
    T: HasEventer + ?Sized,
{
    let source = source.eventer();
    let target = target.eventer().downgrade();

    let routes = names
        .iter()
        .map(|name| {
            let callback = relay(target.clone(), (*name).to_string());
            source.on(*name, callback.clone());
            ((*name).to_string(), callback)
        })
        .collect();

    Forwarding {
        source: source.downgrade(),
        routes,
    }
}

fn relay(target: WeakEventer, event: String) -> Callback {
    Callback::new(move |args| {
        let Some(target) = target.upgrade() else {
            return Outcome::none();
        };
        match target.emit(&event, args) {
            Ok(pending) => Outcome::deferred(async move {
                pending.await?;
                Ok(None)
            }),
            Err(error) => Outcome::fail(error),
        }
    })
}

/// source의 모든 dispatch를 target으로 재발행
///
/// source의 `meta:preEmit` hook으로 동작하므로 hook까지 도달한 dispatch만
/// 포워딩됩니다 (리스너가 없는 permissive emit은 제외). target dispatch는
/// 기다리지 않으며 실패는 로그로만 남습니다.
pub fn proxy<S, T>(source: &S, target: &T) -> Forwarding
where
    S: HasEventer + ?Sized,
    T: HasEventer + ?Sized,
{
    let source = source.eventer();
    let target = target.eventer().downgrade();

    let callback = Callback::sync(move |args| {
        if let Some(target) = target.upgrade() {
            relay_detached(&target, args);
        }
        Ok(None)
    });
    source.on(META_PRE_EMIT, callback.clone());

    Forwarding {
        source: source.downgrade(),
        routes: vec![(META_PRE_EMIT.to_string(), callback)],
    }
}

fn relay_detached(target: &Eventer, hook_args: Args) {
    let mut args = hook_args.into_iter();
    let Some(Value::String(event)) = args.next() else {
        return;
    };

    let pending = match target.emit(&event, args.collect()) {
        Ok(pending) => pending,
        Err(error) => {
            debug!(event = %event, error = %error, "Proxy target rejected emit");
            return;
        }
    };

    match tokio::runtime::Handle::try_current() {
        Ok(handle) => {
            handle.spawn(async move {
                if let Err(error) = pending.await {
                    warn!(event = %event, error = %error, "Proxied dispatch failed");
                }
            });
        }
        Err(_) => debug!(event = %event, "No runtime available, proxied dispatch dropped"),
    }
}
