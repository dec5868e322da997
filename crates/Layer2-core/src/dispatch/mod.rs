//! Dispatcher - 이벤트 발행과 세 가지 실행 프로토콜
//!
//! ## 프로토콜
//!
//! | Protocol | 실행 | 결과 |
//! |----------|------|------|
//! | Parallel | 모든 핸들러 동시 실행 | 버킷 순서의 결과 목록 |
//! | Reduce   | 순서대로, 첫 인자 갱신 | 마지막 첫 인자 |
//! | Sync     | 호출 프레임 안에서 순서대로 | 없음 (host 반환) |
//!
//! 이름 검증, unknown 이벤트 검사, 버킷 snapshot은 모두 호출 시점에
//! 동기적으로 수행됩니다. 반환된 future는 그 snapshot만 실행합니다.
//!
//! 리스너가 없는 permissive 발행은 핸들러도 meta hook도 없이 첫 번째 인자를
//! 그대로 돌려줍니다 (Parallel은 `Emitted::Unhandled`, Reduce는 그 값 자체).

pub(crate) mod parallel;
pub(crate) mod reduce;
pub(crate) mod sync;

pub(crate) use parallel::ParallelOptions;

use crate::meta::MetaBroadcaster;
use crate::registry::{Bucket, Registry};
use eventer_foundation::{Args, Error, EventerConfig, Protocol, Result};
use futures::future::{self, BoxFuture, FutureExt, TryFutureExt};
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

/// 진행 중인 dispatch
///
/// poll되기 전까지 핸들러는 실행되지 않습니다.
pub type Pending<T> = BoxFuture<'static, Result<T>>;

/// Parallel 발행 결과
#[derive(Debug, Clone, PartialEq)]
pub enum Emitted {
    /// 버킷 순서의 핸들러 결과 (`None` = 반환값 없음)
    Handled(Vec<Option<Value>>),
    /// 리스너 없음: 첫 번째 인자 그대로 (인자가 없으면 `None`)
    Unhandled(Option<Value>),
}

impl Emitted {
    pub fn is_handled(&self) -> bool {
        matches!(self, Emitted::Handled(_))
    }

    /// 핸들러 결과 목록 (리스너가 없었으면 빈 목록)
    pub fn into_results(self) -> Vec<Option<Value>> {
        match self {
            Emitted::Handled(results) => results,
            Emitted::Unhandled(_) => Vec::new(),
        }
    }
}

impl From<Emitted> for Dispatched {
    fn from(emitted: Emitted) -> Self {
        match emitted {
            Emitted::Handled(results) => Dispatched::Parallel(results),
            Emitted::Unhandled(first) => Dispatched::Unhandled(first),
        }
    }
}

/// 프로토콜별 dispatch 결과
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatched {
    /// 버킷 순서의 핸들러 결과 (`None` = 반환값 없음)
    Parallel(Vec<Option<Value>>),
    /// Parallel 발행에 리스너가 없을 때 돌려받은 첫 번째 인자
    Unhandled(Option<Value>),
    /// 파이프라인을 통과한 첫 번째 인자
    Reduce(Option<Value>),
    /// 결과 없음
    Sync,
}

/// 이벤트 디스패처
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<Registry>,
    config: Arc<EventerConfig>,
    meta: MetaBroadcaster,
}

impl Dispatcher {
    pub fn new(registry: Arc<Registry>, config: Arc<EventerConfig>) -> Self {
        let meta = MetaBroadcaster::new(
            registry.clone(),
            ParallelOptions::from(config.as_ref()),
            config.sync_deferred_throws,
        );

        Self {
            registry,
            config,
            meta,
        }
    }

    /// 공통 전제 조건 검사 + snapshot
    ///
    /// 리스너가 없고 permissive 설정이면 `None`.
    fn begin(&self, event: &str) -> Result<Option<Bucket>> {
        if event.is_empty() {
            return Err(Error::usage("event name must be a non-empty string"));
        }

        let bucket = self.registry.snapshot(event);
        if bucket.is_empty() {
            if self.config.emit_on_unknown_throws {
                return Err(Error::UnknownEvent(event.to_string()));
            }
            debug!(event, "Emit (no listeners)");
            return Ok(None);
        }

        debug!(event, listeners = bucket.len(), "Emit");
        Ok(Some(bucket))
    }

    /// Parallel 프로토콜
    pub fn parallel(&self, event: &str, args: Args) -> Result<Pending<Emitted>> {
        let Some(bucket) = self.begin(event)? else {
            let first = args.into_iter().next();
            return Ok(future::ready(Ok(Emitted::Unhandled(first))).boxed());
        };

        let meta = self.meta.clone();
        let options = ParallelOptions::from(self.config.as_ref());
        let event = event.to_string();

        Ok(async move {
            meta.before(&event, &args).await?;
            let results = parallel::run(&event, bucket, &args, options).await?;
            meta.after(&event, &args).await?;
            Ok::<_, Error>(Emitted::Handled(results))
        }
        .boxed())
    }

    /// Reduce 프로토콜
    pub fn reduce(&self, event: &str, args: Args) -> Result<Pending<Option<Value>>> {
        let Some(bucket) = self.begin(event)? else {
            return Ok(future::ready(Ok(args.into_iter().next())).boxed());
        };

        let meta = self.meta.clone();
        let event = event.to_string();

        Ok(async move {
            meta.before(&event, &args).await?;
            let result = reduce::run(&event, bucket, args.clone()).await?;
            meta.after(&event, &args).await?;
            Ok::<_, Error>(result)
        }
        .boxed())
    }

    /// Sync 프로토콜 (호출 프레임 안에서 완료)
    pub fn sync(&self, event: &str, args: Args) -> Result<()> {
        let Some(bucket) = self.begin(event)? else {
            return Ok(());
        };

        self.meta.before_sync(event, &args)?;
        sync::run(event, &bucket, &args, self.config.sync_deferred_throws)?;
        self.meta.after_sync(event, &args)
    }

    /// 프로토콜 선택 dispatch (`None`이면 설정의 기본 프로토콜)
    pub fn dispatch(
        &self,
        event: &str,
        args: Args,
        protocol: Option<Protocol>,
    ) -> Result<Pending<Dispatched>> {
        match protocol.unwrap_or(self.config.default_protocol) {
            Protocol::Parallel => Ok(self
                .parallel(event, args)?
                .map_ok(Dispatched::from)
                .boxed()),
            Protocol::Reduce => Ok(self.reduce(event, args)?.map_ok(Dispatched::Reduce).boxed()),
            Protocol::Sync => {
                self.sync(event, args)?;
                Ok(future::ready(Ok(Dispatched::Sync)).boxed())
            }
        }
    }
}

/// 기다리지 않는 작업을 현재 tokio 런타임에 넘김 (없으면 버림)
pub(crate) fn detach<F>(work: F, what: &'static str)
where
    F: Future<Output = ()> + Send + 'static,
{
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => {
            handle.spawn(work);
        }
        Err(_) => debug!(what, "No runtime available, dropping detached work"),
    }
}
