//! Deferred - `end` / `error` 이벤트를 future로 노출
//!
//! 엔진의 예약 이름 두 개를 결과 채널로 사용합니다.
//!
//! | 이벤트  | 의미 | 첫 번째 인자 |
//! |---------|------|--------------|
//! | `end`   | 성공 | 결과 값      |
//! | `error` | 실패 | 거부 사유    |
//!
//! 처음 도착한 settlement만 유효하고 이후 이벤트는 무시됩니다.
//! `resolve` / `reject`는 해당 이벤트를 sync로 발행하므로 같은 이름의
//! 다른 리스너도 함께 호출됩니다.

use eventer_core::{
    Callback, Error, Eventer, Pending, Rejection, Result, DEFERRED_REJECT, DEFERRED_RESOLVE,
};
use futures::future::{FutureExt, TryFutureExt};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

/// 확정된 결과
#[derive(Debug, Clone, PartialEq)]
pub enum Settlement {
    Resolved(Value),
    Rejected(Value),
}

/// 엔진에 연결된 결과 핸들
#[derive(Debug, Clone)]
pub struct Deferred {
    eventer: Eventer,
    state: Arc<watch::Sender<Option<Settlement>>>,
    routes: [Callback; 2],
}

impl Deferred {
    /// `end` / `error` 리스너를 등록하고 핸들 반환
    pub fn attach(eventer: &Eventer) -> Self {
        let (tx, _) = watch::channel(None);
        let state = Arc::new(tx);

        let on_end = settle_with(state.clone(), Settlement::Resolved);
        let on_error = settle_with(state.clone(), Settlement::Rejected);
        eventer
            .on(DEFERRED_RESOLVE, on_end.clone())
            .on(DEFERRED_REJECT, on_error.clone());

        Self {
            eventer: eventer.clone(),
            state,
            routes: [on_end, on_error],
        }
    }

    /// `end` 발행
    pub fn resolve(&self, value: impl Into<Value>) -> Result<()> {
        self.eventer
            .emit_sync(DEFERRED_RESOLVE, vec![value.into()])
            .map(|_| ())
    }

    /// `error` 발행
    pub fn reject(&self, reason: impl Into<Value>) -> Result<()> {
        self.eventer
            .emit_sync(DEFERRED_REJECT, vec![reason.into()])
            .map(|_| ())
    }

    pub fn is_settled(&self) -> bool {
        self.state.borrow().is_some()
    }

    pub fn settlement(&self) -> Option<Settlement> {
        self.state.borrow().clone()
    }

    /// 확정될 때까지 대기
    ///
    /// 거부되면 `Error::Handler`(event = `error`)이며
    /// `Error::rejection()`으로 사유를 꺼낼 수 있습니다.
    pub fn wait(&self) -> Pending<Value> {
        let mut rx = self.state.subscribe();

        async move {
            let settlement = rx
                .wait_for(Option::is_some)
                .await
                .map_err(|_| Error::usage("deferred state closed before settlement"))?
                .clone();

            match settlement {
                Some(Settlement::Resolved(value)) => Ok(value),
                Some(Settlement::Rejected(reason)) => Err(Error::handler(
                    DEFERRED_REJECT,
                    Rejection::new(reason).into(),
                )),
                None => Err(Error::usage("deferred woke without settlement")),
            }
        }
        .boxed()
    }

    /// 성공 값에 변환 적용
    pub fn then<F, T>(&self, f: F) -> Pending<T>
    where
        F: FnOnce(Value) -> T + Send + 'static,
        T: Send + 'static,
    {
        self.wait().map_ok(f).boxed()
    }

    /// 엔진에서 리스너 제거 (이미 확정된 결과는 유지)
    pub fn detach(&self) {
        let [on_end, on_error] = &self.routes;
        self.eventer
            .off(DEFERRED_RESOLVE, Some(on_end))
            .off(DEFERRED_REJECT, Some(on_error));
    }
}

fn settle_with(
    state: Arc<watch::Sender<Option<Settlement>>>,
    kind: fn(Value) -> Settlement,
) -> Callback {
    Callback::sync(move |args| {
        let value = args.into_iter().next().unwrap_or(Value::Null);
        let settlement = kind(value);

        let accepted = state.send_if_modified(|slot| {
            if slot.is_some() {
                return false;
            }
            *slot = Some(settlement);
            true
        });
        if !accepted {
            debug!("Deferred already settled, ignoring");
        }
        Ok(None)
    })
}
