//! Callback - 핸들러 실행 단위
//!
//! 핸들러는 인자 목록을 받아 [`Outcome`]을 돌려줍니다. Outcome은 즉시 결과
//! (값 / 없음 / 실패)이거나 아직 완료되지 않은 deferred 결과입니다.
//! Dispatcher는 런타임 타입 검사 대신 [`Outcome::is_deferred`]로 분기합니다.

use async_trait::async_trait;
use futures::future::{self, BoxFuture, FutureExt};
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// 핸들러에 전달되는 인자 목록
pub type Args = Vec<Value>;

/// 핸들러 결과 (`None` = 아무것도 반환하지 않음)
pub type HandlerResult = anyhow::Result<Option<Value>>;

/// 아직 완료되지 않은 핸들러 결과
pub type HandlerFuture = BoxFuture<'static, HandlerResult>;

// ============================================================================
// Outcome
// ============================================================================

/// 핸들러 호출 결과
pub enum Outcome {
    /// 호출 프레임 안에서 이미 완료됨
    Ready(HandlerResult),
    /// 나중에 완료되는 결과
    Deferred(HandlerFuture),
}

impl Outcome {
    pub fn value(value: impl Into<Value>) -> Self {
        Outcome::Ready(Ok(Some(value.into())))
    }

    pub fn none() -> Self {
        Outcome::Ready(Ok(None))
    }

    pub fn fail(error: impl Into<anyhow::Error>) -> Self {
        Outcome::Ready(Err(error.into()))
    }

    pub fn deferred<F>(fut: F) -> Self
    where
        F: Future<Output = HandlerResult> + Send + 'static,
    {
        Outcome::Deferred(fut.boxed())
    }

    /// 아직 완료되지 않은 결과인지 확인
    pub fn is_deferred(&self) -> bool {
        matches!(self, Outcome::Deferred(_))
    }

    /// 즉시 결과도 future로 통일
    pub fn into_future(self) -> HandlerFuture {
        match self {
            Outcome::Ready(result) => future::ready(result).boxed(),
            Outcome::Deferred(fut) => fut,
        }
    }
}

impl From<HandlerResult> for Outcome {
    fn from(result: HandlerResult) -> Self {
        Outcome::Ready(result)
    }
}

impl fmt::Debug for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Ready(result) => f.debug_tuple("Ready").field(result).finish(),
            Outcome::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

// ============================================================================
// Listener Trait
// ============================================================================

/// 구조체 기반 핸들러
///
/// 상태를 가진 컴포넌트가 구현합니다. [`Callback::listener`]로 감싸면
/// 항상 deferred 결과를 내므로 sync 프로토콜에서는 사용할 수 없습니다.
#[async_trait]
pub trait Listener: Send + Sync {
    /// 리스너 이름 (디버깅용)
    fn name(&self) -> &str;

    /// 이벤트 처리
    async fn handle(&self, args: Args) -> HandlerResult;
}

// ============================================================================
// Callback
// ============================================================================

type CallbackFn = dyn Fn(Args) -> Outcome + Send + Sync;

/// 등록 가능한 콜백
///
/// 복제해도 같은 identity를 유지합니다. `off`는 이 identity로 레코드를 찾습니다.
#[derive(Clone)]
pub struct Callback {
    inner: Arc<CallbackFn>,
}

impl Callback {
    /// Outcome을 직접 반환하는 콜백
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Args) -> Outcome + Send + Sync + 'static,
    {
        Self { inner: Arc::new(f) }
    }

    /// 동기 콜백 (값 / 없음 / 실패)
    pub fn sync<F>(f: F) -> Self
    where
        F: Fn(Args) -> HandlerResult + Send + Sync + 'static,
    {
        Self::new(move |args| Outcome::Ready(f(args)))
    }

    /// 비동기 콜백
    pub fn future<F, Fut>(f: F) -> Self
    where
        F: Fn(Args) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        Self::new(move |args| Outcome::deferred(f(args)))
    }

    /// [`Listener`] 구현체를 콜백으로 변환
    pub fn listener(listener: Arc<dyn Listener>) -> Self {
        Self::new(move |args| {
            let listener = listener.clone();
            Outcome::deferred(async move { listener.handle(args).await })
        })
    }

    /// 콜백 실행
    pub fn call(&self, args: Args) -> Outcome {
        (self.inner)(args)
    }

    /// 같은 콜백인지 확인 (포인터 identity)
    pub fn same(&self, other: &Callback) -> bool {
        std::ptr::eq(
            Arc::as_ptr(&self.inner) as *const (),
            Arc::as_ptr(&other.inner) as *const (),
        )
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Callback({:p})", Arc::as_ptr(&self.inner) as *const ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Doubler;

    #[async_trait]
    impl Listener for Doubler {
        fn name(&self) -> &str {
            "doubler"
        }

        async fn handle(&self, args: Args) -> HandlerResult {
            let n = args.first().and_then(Value::as_i64).unwrap_or(0);
            Ok(Some(json!(n * 2)))
        }
    }

    #[test]
    fn test_identity_survives_clone() {
        let a = Callback::sync(|_| Ok(None));
        let b = a.clone();
        let c = Callback::sync(|_| Ok(None));

        assert!(a.same(&b));
        assert!(!a.same(&c));
    }

    #[test]
    fn test_capability_check() {
        let ready = Callback::sync(|_| Ok(Some(json!(1))));
        let deferred = Callback::future(|_| async { Ok(None) });

        assert!(!ready.call(vec![]).is_deferred());
        assert!(deferred.call(vec![]).is_deferred());
    }

    #[tokio::test]
    async fn test_listener_callback() {
        let cb = Callback::listener(Arc::new(Doubler));
        let outcome = cb.call(vec![json!(21)]);
        assert!(outcome.is_deferred());
        assert_eq!(outcome.into_future().await.unwrap(), Some(json!(42)));
    }
}
